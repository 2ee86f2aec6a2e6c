//! # Authentication Module
//!
//! Email/password authentication for fleet operators.
//!
//! ## Overview
//!
//! - [`IdentityProvider`] abstracts the identity backend; [`RestIdentityProvider`]
//!   speaks the identity toolkit REST API.
//! - [`AuthManager`] owns the in-memory session, mirrors the signed-in user into
//!   the settings store and emits auth events.
//! - Provider error codes map to [`AuthErrorCode`], each with a localization key
//!   and a Portuguese default message.

pub mod error;
pub mod manager;
pub mod provider;
pub mod types;

pub use error::{AuthError, AuthErrorCode, Result};
pub use manager::{AuthManager, AUTH_USER_KEY};
pub use provider::{IdentityProvider, RestIdentityProvider};
pub use types::{AuthUser, Session};
