use clap::Parser;

use linkhop::cli::{Cli, Commands};
use linkhop::config::{get_config, init_config};
use linkhop::errors::LinkhopError;
use linkhop::runtime::modes::{run_generate_config, run_issue_token, run_server};
use linkhop::system::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::GenerateConfig { output_path } => run_generate_config(output_path.as_deref()),
        Commands::IssueToken { user } => {
            init_config(cli.config.as_deref());
            let token = run_issue_token(&get_config(), &user)?;
            println!("{}", token);
            Ok(())
        }
        Commands::Serve => {
            init_config(cli.config.as_deref());
            let config = get_config();
            let _guard = init_logging(&config.logging)?;

            if let Err(e) = run_server(&config).await {
                // 启动失败时给终端用户一个可读的错误
                if let Some(err) = e.downcast_ref::<LinkhopError>() {
                    eprintln!("{}", err.format_colored());
                }
                return Err(e);
            }
            Ok(())
        }
    }
}
