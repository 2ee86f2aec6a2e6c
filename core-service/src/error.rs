use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Core initialization failed: {0}")]
    InitializationFailed(String),

    #[error("Configuration error: {0}")]
    Config(#[from] core_runtime::Error),

    #[error("API error: {0}")]
    Api(#[from] core_api::ApiError),

    #[error("Authentication error: {0}")]
    Auth(#[from] core_auth::AuthError),

    #[error("Storage error: {0}")]
    Storage(#[from] core_storage::StorageError),
}

impl CoreError {
    /// Portuguese text for alert dialogs
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(e) => e.user_message(),
            Self::Auth(e) => e.user_message().to_string(),
            _ => "Ocorreu um erro inesperado. Tente novamente.".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
