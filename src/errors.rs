use std::fmt;

#[derive(Debug, Clone)]
pub enum LinkhopError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    FileOperation(String),
    Validation(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
    Serialization(String),
}

impl LinkhopError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            LinkhopError::DatabaseConfig(_) => "E001",
            LinkhopError::DatabaseConnection(_) => "E002",
            LinkhopError::DatabaseOperation(_) => "E003",
            LinkhopError::FileOperation(_) => "E004",
            LinkhopError::Validation(_) => "E005",
            LinkhopError::NotFound(_) => "E006",
            LinkhopError::Conflict(_) => "E007",
            LinkhopError::Unauthorized(_) => "E008",
            LinkhopError::Serialization(_) => "E009",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            LinkhopError::DatabaseConfig(_) => "Database Configuration Error",
            LinkhopError::DatabaseConnection(_) => "Database Connection Error",
            LinkhopError::DatabaseOperation(_) => "Database Operation Error",
            LinkhopError::FileOperation(_) => "File Operation Error",
            LinkhopError::Validation(_) => "Validation Error",
            LinkhopError::NotFound(_) => "Resource Not Found",
            LinkhopError::Conflict(_) => "Resource Conflict",
            LinkhopError::Unauthorized(_) => "Unauthorized",
            LinkhopError::Serialization(_) => "Serialization Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            LinkhopError::DatabaseConfig(msg)
            | LinkhopError::DatabaseConnection(msg)
            | LinkhopError::DatabaseOperation(msg)
            | LinkhopError::FileOperation(msg)
            | LinkhopError::Validation(msg)
            | LinkhopError::NotFound(msg)
            | LinkhopError::Conflict(msg)
            | LinkhopError::Unauthorized(msg)
            | LinkhopError::Serialization(msg) => msg,
        }
    }

    /// Whether the failure comes from the store rather than from the caller's input.
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            LinkhopError::DatabaseConfig(_)
                | LinkhopError::DatabaseConnection(_)
                | LinkhopError::DatabaseOperation(_)
                | LinkhopError::FileOperation(_)
                | LinkhopError::Serialization(_)
        )
    }

    /// 格式化为彩色输出（用于终端启动错误）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for LinkhopError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for LinkhopError {}

// 便捷的构造函数
impl LinkhopError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        LinkhopError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        LinkhopError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        LinkhopError::DatabaseOperation(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        LinkhopError::FileOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        LinkhopError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        LinkhopError::NotFound(msg.into())
    }

    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        LinkhopError::Conflict(msg.into())
    }

    pub fn unauthorized<T: Into<String>>(msg: T) -> Self {
        LinkhopError::Unauthorized(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        LinkhopError::Serialization(msg.into())
    }
}

impl From<sea_orm::DbErr> for LinkhopError {
    fn from(err: sea_orm::DbErr) -> Self {
        LinkhopError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for LinkhopError {
    fn from(err: std::io::Error) -> Self {
        LinkhopError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for LinkhopError {
    fn from(err: serde_json::Error) -> Self {
        LinkhopError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LinkhopError>;

/// Terminal failure of the resolution path.
///
/// `NotFound` is the caller's problem (no such code); `Infra` means the store
/// could not answer. Both may render the same page, but they are logged and
/// tested separately.
#[derive(Debug, Clone)]
pub enum ResolveError {
    NotFound,
    Infra(LinkhopError),
}

impl ResolveError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ResolveError::NotFound)
    }
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::NotFound => write!(f, "short code not found"),
            ResolveError::Infra(e) => write!(f, "store failure during resolution: {}", e),
        }
    }
}

impl std::error::Error for ResolveError {}

impl From<LinkhopError> for ResolveError {
    fn from(err: LinkhopError) -> Self {
        ResolveError::Infra(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct() {
        let all = [
            LinkhopError::database_config("x"),
            LinkhopError::database_connection("x"),
            LinkhopError::database_operation("x"),
            LinkhopError::file_operation("x"),
            LinkhopError::validation("x"),
            LinkhopError::not_found("x"),
            LinkhopError::conflict("x"),
            LinkhopError::unauthorized("x"),
            LinkhopError::serialization("x"),
        ];
        let mut codes: Vec<&str> = all.iter().map(|e| e.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), all.len());
    }

    #[test]
    fn test_display_uses_simple_format() {
        let err = LinkhopError::conflict("code 'abc' is taken");
        assert_eq!(err.to_string(), "Resource Conflict: code 'abc' is taken");
    }

    #[test]
    fn test_infrastructure_classification() {
        assert!(LinkhopError::database_operation("boom").is_infrastructure());
        assert!(LinkhopError::database_connection("boom").is_infrastructure());
        assert!(!LinkhopError::not_found("gone").is_infrastructure());
        assert!(!LinkhopError::validation("bad").is_infrastructure());
    }

    #[test]
    fn test_resolve_error_from_store_error_is_infra() {
        let err: ResolveError = LinkhopError::database_connection("down").into();
        assert!(matches!(err, ResolveError::Infra(_)));
        assert!(!err.is_not_found());
        assert!(ResolveError::NotFound.is_not_found());
    }
}
