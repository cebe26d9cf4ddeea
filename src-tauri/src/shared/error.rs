use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Serialize)]
#[serde(tag = "type", content = "message")]
pub enum AppError {
    #[error("I/O Error: {0}")]
    Io(String),

    #[error("Window Error: {0}")]
    Window(String),

    #[error("Validation Error: {0}")]
    Validation(String),

    #[error("Settings Error: {0}")]
    Settings(String),

    #[error("Shortcut Error: {0}")]
    Shortcut(String),

    #[error("Download Error: {0}")]
    Download(String),

    #[error("Unknown Error: {0}")]
    Unknown(String),
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(format!("Serialization error: {}", err))
    }
}

impl From<tauri::Error> for AppError {
    fn from(err: tauri::Error) -> Self {
        AppError::Window(err.to_string())
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::Validation(format!("Invalid URL: {}", err))
    }
}

impl From<String> for AppError {
    fn from(err: String) -> Self {
        AppError::Unknown(err)
    }
}

impl From<&str> for AppError {
    fn from(err: &str) -> Self {
        AppError::Unknown(err.to_string())
    }
}

// Helper for Tauri Result
pub type AppResult<T> = Result<T, AppError>;
