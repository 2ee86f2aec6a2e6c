//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the fleet core:
//! - Logging and tracing infrastructure
//! - Configuration management
//! - Event bus system
//! - Build metadata resolution
//!
//! ## Overview
//!
//! This crate contains the runtime utilities every other core crate depends
//! on. It establishes the logging conventions, the configuration builder that
//! injects host bridges, and the broadcast channel used for auth and yard
//! events.

pub mod build_info;
pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
