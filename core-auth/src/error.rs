use bridge_traits::error::BridgeError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identity provider failures the app knows how to explain.
///
/// Both the REST codes (`EMAIL_EXISTS`) and the SDK codes
/// (`auth/email-already-in-use`) map onto the same variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthErrorCode {
    EmailAlreadyInUse,
    InvalidEmail,
    WeakPassword,
    MissingPassword,
    UserNotFound,
    WrongPassword,
    InvalidCredential,
    UserDisabled,
    TooManyRequests,
    NetworkRequestFailed,
    OperationNotAllowed,
    RequiresRecentLogin,
    Unknown,
}

const CODE_TABLE: &[(&str, AuthErrorCode)] = &[
    ("EMAIL_EXISTS", AuthErrorCode::EmailAlreadyInUse),
    ("auth/email-already-in-use", AuthErrorCode::EmailAlreadyInUse),
    ("INVALID_EMAIL", AuthErrorCode::InvalidEmail),
    ("auth/invalid-email", AuthErrorCode::InvalidEmail),
    ("WEAK_PASSWORD", AuthErrorCode::WeakPassword),
    ("auth/weak-password", AuthErrorCode::WeakPassword),
    ("MISSING_PASSWORD", AuthErrorCode::MissingPassword),
    ("auth/missing-password", AuthErrorCode::MissingPassword),
    ("EMAIL_NOT_FOUND", AuthErrorCode::UserNotFound),
    ("USER_NOT_FOUND", AuthErrorCode::UserNotFound),
    ("auth/user-not-found", AuthErrorCode::UserNotFound),
    ("INVALID_PASSWORD", AuthErrorCode::WrongPassword),
    ("auth/wrong-password", AuthErrorCode::WrongPassword),
    ("INVALID_LOGIN_CREDENTIALS", AuthErrorCode::InvalidCredential),
    ("auth/invalid-credential", AuthErrorCode::InvalidCredential),
    ("USER_DISABLED", AuthErrorCode::UserDisabled),
    ("auth/user-disabled", AuthErrorCode::UserDisabled),
    ("TOO_MANY_ATTEMPTS_TRY_LATER", AuthErrorCode::TooManyRequests),
    ("auth/too-many-requests", AuthErrorCode::TooManyRequests),
    ("auth/network-request-failed", AuthErrorCode::NetworkRequestFailed),
    ("OPERATION_NOT_ALLOWED", AuthErrorCode::OperationNotAllowed),
    ("auth/operation-not-allowed", AuthErrorCode::OperationNotAllowed),
    ("CREDENTIAL_TOO_OLD_LOGIN_AGAIN", AuthErrorCode::RequiresRecentLogin),
    ("TOKEN_EXPIRED", AuthErrorCode::RequiresRecentLogin),
    ("auth/requires-recent-login", AuthErrorCode::RequiresRecentLogin),
];

impl AuthErrorCode {
    /// Maps a provider code. REST messages such as
    /// `WEAK_PASSWORD : Password should be at least 6 characters` are matched
    /// on the part before the colon.
    pub fn from_provider_code(raw: &str) -> Self {
        let code = raw.split(" : ").next().unwrap_or_default().trim();
        CODE_TABLE
            .iter()
            .find(|(known, _)| *known == code)
            .map(|(_, mapped)| *mapped)
            .unwrap_or(Self::Unknown)
    }

    /// Localization key
    pub fn key(&self) -> &'static str {
        match self {
            Self::EmailAlreadyInUse => "auth.errors.emailAlreadyInUse",
            Self::InvalidEmail => "auth.errors.invalidEmail",
            Self::WeakPassword => "auth.errors.weakPassword",
            Self::MissingPassword => "auth.errors.missingPassword",
            Self::UserNotFound => "auth.errors.userNotFound",
            Self::WrongPassword => "auth.errors.wrongPassword",
            Self::InvalidCredential => "auth.errors.invalidCredential",
            Self::UserDisabled => "auth.errors.userDisabled",
            Self::TooManyRequests => "auth.errors.tooManyRequests",
            Self::NetworkRequestFailed => "auth.errors.networkRequestFailed",
            Self::OperationNotAllowed => "auth.errors.operationNotAllowed",
            Self::RequiresRecentLogin => "auth.errors.requiresRecentLogin",
            Self::Unknown => "auth.errors.unknown",
        }
    }

    /// Default Portuguese message
    pub fn message(&self) -> &'static str {
        match self {
            Self::EmailAlreadyInUse => "Este e-mail já está em uso por outra conta.",
            Self::InvalidEmail => "O e-mail informado é inválido.",
            Self::WeakPassword => "A senha deve ter pelo menos 6 caracteres.",
            Self::MissingPassword => "Informe a senha.",
            Self::UserNotFound => "Usuário não encontrado.",
            Self::WrongPassword => "Senha incorreta.",
            Self::InvalidCredential => "E-mail ou senha incorretos.",
            Self::UserDisabled => "Esta conta foi desativada.",
            Self::TooManyRequests => "Muitas tentativas. Tente novamente mais tarde.",
            Self::NetworkRequestFailed => "Erro de conexão. Verifique sua internet.",
            Self::OperationNotAllowed => "Operação não permitida.",
            Self::RequiresRecentLogin => "Faça login novamente para continuar.",
            Self::Unknown => "Ocorreu um erro inesperado. Tente novamente.",
        }
    }
}

#[derive(Error, Debug)]
pub enum AuthError {
    /// The identity provider rejected the call
    #[error("{} ({raw})", .code.message())]
    Provider { code: AuthErrorCode, raw: String },

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error(transparent)]
    Network(#[from] BridgeError),

    #[error("Invalid identity provider response: {0}")]
    InvalidResponse(String),

    #[error("Invalid identity provider URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl AuthError {
    pub fn provider(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        Self::Provider {
            code: AuthErrorCode::from_provider_code(&raw),
            raw,
        }
    }

    pub fn code(&self) -> AuthErrorCode {
        match self {
            Self::Provider { code, .. } => *code,
            Self::Network(_) => AuthErrorCode::NetworkRequestFailed,
            Self::NotAuthenticated => AuthErrorCode::RequiresRecentLogin,
            Self::InvalidResponse(_) | Self::InvalidUrl(_) => AuthErrorCode::Unknown,
        }
    }

    pub fn user_message(&self) -> &'static str {
        self.code().message()
    }
}

pub type Result<T> = std::result::Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rest_and_sdk_codes_share_variants() {
        assert_eq!(
            AuthErrorCode::from_provider_code("EMAIL_EXISTS"),
            AuthErrorCode::from_provider_code("auth/email-already-in-use")
        );
        assert_eq!(
            AuthErrorCode::from_provider_code("INVALID_LOGIN_CREDENTIALS"),
            AuthErrorCode::InvalidCredential
        );
        assert_eq!(
            AuthErrorCode::from_provider_code("auth/too-many-requests"),
            AuthErrorCode::TooManyRequests
        );
    }

    #[test]
    fn test_rest_message_suffix_is_ignored() {
        assert_eq!(
            AuthErrorCode::from_provider_code(
                "WEAK_PASSWORD : Password should be at least 6 characters"
            ),
            AuthErrorCode::WeakPassword
        );
    }

    #[test]
    fn test_unknown_codes_fall_back() {
        let error = AuthError::provider("SOMETHING_NEW");
        assert_eq!(error.code(), AuthErrorCode::Unknown);
        assert_eq!(error.user_message(), AuthErrorCode::Unknown.message());
        assert_eq!(error.code().key(), "auth.errors.unknown");
    }

    #[test]
    fn test_network_errors_map_to_connection_message() {
        let error = AuthError::from(BridgeError::ConnectionFailed("offline".to_string()));
        assert_eq!(error.code(), AuthErrorCode::NetworkRequestFailed);
        assert_eq!(
            error.user_message(),
            "Erro de conexão. Verifique sua internet."
        );
    }
}
