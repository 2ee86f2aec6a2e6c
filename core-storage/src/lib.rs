//! # Local Storage Module
//!
//! Client-side persistence on top of the host [`SettingsStore`](bridge_traits::SettingsStore).
//!
//! ## Overview
//!
//! - [`LocalStore`]: the `@motos`, `@vagas` and `@manutencoes` collections,
//!   each stored as one JSON array
//! - [`mock_data`]: first-run yard seeding
//! - [`Preferences`]: theme mode and language
//!
//! ## Failure Semantics
//!
//! The public operations never fail. Reads degrade to an empty collection or
//! a default preference, writes become no-ops, and every failure is logged
//! through `tracing`. Read-modify-write cycles are not synchronized: two
//! overlapping writers race and the last one wins.

pub mod error;
pub mod local_store;
pub mod mock_data;
pub mod preferences;

pub use error::{Result, StorageError};
pub use local_store::{LocalStore, MANUTENCOES_KEY, MOTOS_KEY, VAGAS_KEY};
pub use mock_data::{generate_mock_data, MockYard};
pub use preferences::{Language, Preferences, ThemeMode, LANGUAGE_KEY, THEME_MODE_KEY};
