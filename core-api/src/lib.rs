//! # Fleet REST API
//!
//! Typed clients for the fleet backend.
//!
//! - [`ApiClient`] - the shared request pipeline: base URL, timeout, static
//!   headers and request/response logging. One attempt per request.
//! - [`MotoService`] - motorcycles under `/Moto`
//! - [`FilialService`] - branches under `/v1/filial`
//!
//! Failures reach callers as [`ApiError::Service`] carrying a Portuguese
//! message ready for display and the underlying cause.

pub mod client;
pub mod dto;
pub mod error;
pub mod filial;
pub mod moto;

pub use client::ApiClient;
pub use error::{ApiError, Result};
pub use filial::{classify_delete_failure, DeleteFailure, FilialService};
pub use moto::MotoService;
