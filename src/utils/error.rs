use rtm_client::RtmError;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    MissingInbox,
    UnknownList { task_id: String, list_id: String },
    RtmApi(RtmError),
    ConfigError(String),
    IoError(std::io::Error),
    JsonError(serde_json::Error),
    GlobError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::MissingInbox => write!(f, "Export has no list named \"Inbox\""),
            AppError::UnknownList { task_id, list_id } => {
                write!(f, "Task {} references unknown list {}", task_id, list_id)
            }
            AppError::RtmApi(err) => write!(f, "RTM API error: {}", err),
            AppError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            AppError::IoError(err) => write!(f, "IO error: {}", err),
            AppError::JsonError(err) => write!(f, "JSON error: {}", err),
            AppError::GlobError(msg) => write!(f, "Export lookup error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::RtmApi(err) => Some(err),
            AppError::IoError(err) => Some(err),
            AppError::JsonError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RtmError> for AppError {
    fn from(err: RtmError) -> Self {
        AppError::RtmApi(err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::JsonError(err)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

impl From<glob::PatternError> for AppError {
    fn from(err: glob::PatternError) -> Self {
        AppError::GlobError(err.to_string())
    }
}

impl From<glob::GlobError> for AppError {
    fn from(err: glob::GlobError) -> Self {
        AppError::GlobError(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
