pub mod health;
pub mod links;
pub mod redirect;
pub mod types;

pub use health::{AppStartTime, HealthService, health_routes};
pub use links::links_routes;
pub use redirect::{RedirectService, redirect_routes};
