use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity shown in the app and mirrored under `@auth_user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub uid: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl AuthUser {
    /// Display name, or the part of the email before `@`
    pub fn greeting_name(&self) -> &str {
        match self.display_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => self.email.split('@').next().unwrap_or_default(),
        }
    }
}

/// A live provider session. Kept in memory only.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub user: AuthUser,
    pub id_token: String,
    pub refresh_token: String,
    /// Token lifetime reported by the provider, in seconds
    pub expires_in: Option<u64>,
    pub signed_in_at: DateTime<Utc>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("uid", &self.user.uid)
            .field("id_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_in", &self.expires_in)
            .field("signed_in_at", &self.signed_in_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(display_name: Option<&str>) -> AuthUser {
        AuthUser {
            uid: "u1".to_string(),
            email: "ana@frota.com".to_string(),
            display_name: display_name.map(str::to_string),
        }
    }

    #[test]
    fn test_greeting_name() {
        assert_eq!(user(Some("Ana Souza")).greeting_name(), "Ana Souza");
        assert_eq!(user(Some("  ")).greeting_name(), "ana");
        assert_eq!(user(None).greeting_name(), "ana");
    }

    #[test]
    fn test_mirror_shape() {
        let json = serde_json::to_value(user(Some("Ana"))).unwrap();
        assert_eq!(json["uid"], "u1");
        assert_eq!(json["displayName"], "Ana");
    }

    #[test]
    fn test_session_debug_hides_tokens() {
        let session = Session {
            user: user(None),
            id_token: "secret-id".to_string(),
            refresh_token: "secret-refresh".to_string(),
            expires_in: Some(3600),
            signed_in_at: Utc::now(),
        };
        let debug = format!("{:?}", session);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("u1"));
    }
}
