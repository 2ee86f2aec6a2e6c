//! Error types for the fleet REST API

use bridge_traits::error::BridgeError;
use core_fleet::{FleetError, ValidationReport};
use thiserror::Error;

/// Fleet API errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// The server answered with a non-2xx status
    #[error("API error (status {status}): {body}")]
    Status { status: u16, body: String },

    /// Transport failure (connection refused, timeout, TLS)
    #[error(transparent)]
    Network(#[from] BridgeError),

    /// The body did not match the expected wire shape
    #[error("Failed to decode API response: {0}")]
    Decode(String),

    /// The form was rejected before any request was sent
    #[error("Invalid form: {0}")]
    Validation(ValidationReport),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A failed operation, with the message shown to the operator
    #[error("{message}")]
    Service {
        message: String,
        status: Option<u16>,
        #[source]
        source: Box<ApiError>,
    },
}

/// Result type for fleet API operations
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    pub(crate) fn service(message: impl Into<String>, source: ApiError) -> Self {
        Self::Service {
            message: message.into(),
            status: source.status(),
            source: Box::new(source),
        }
    }

    /// HTTP status behind the error, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Service { status, .. } => *status,
            _ => None,
        }
    }

    pub fn validation_report(&self) -> Option<&ValidationReport> {
        match self {
            Self::Validation(report) => Some(report),
            _ => None,
        }
    }

    /// Whether the request never reached the server
    pub fn is_network(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Service { source, .. } => source.is_network(),
            _ => false,
        }
    }

    /// Portuguese text suitable for an alert dialog.
    pub fn user_message(&self) -> String {
        match self {
            Self::Service { message, .. } => message.clone(),
            Self::Validation(report) => report
                .first_message()
                .unwrap_or("Verifique os campos do formulário.")
                .to_string(),
            Self::Network(_) => {
                "Não foi possível conectar ao servidor. Verifique sua conexão.".to_string()
            }
            Self::Status { status, .. } if *status >= 500 => {
                "Erro interno do servidor. Tente novamente mais tarde.".to_string()
            }
            Self::Status { .. } => "A requisição foi recusada pelo servidor.".to_string(),
            Self::Decode(_) => "Resposta inválida do servidor.".to_string(),
            Self::InvalidUrl(_) => "Endereço da API inválido.".to_string(),
        }
    }
}

impl From<FleetError> for ApiError {
    fn from(error: FleetError) -> Self {
        match error {
            FleetError::Validation(report) => Self::Validation(report),
            other => Self::Decode(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(error: serde_json::Error) -> Self {
        Self::Decode(error.to_string())
    }
}
