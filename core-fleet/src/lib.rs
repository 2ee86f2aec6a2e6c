//! # Fleet Domain Module
//!
//! Entities and form rules shared by the storage, API and service layers.
//!
//! ## Overview
//!
//! - [`models`]: `Moto`, `Vaga`, `Manutencao`, `Filial` and their status enums
//! - [`validation`]: form types with field-level rules and [`ValidationReport`]
//! - [`yard`]: slot-grid helpers used by the yard map
//!
//! Entity types accept any values. Plate length, year range and the other
//! form rules live only in [`validation`].

pub mod error;
pub mod models;
pub mod validation;
pub mod yard;

pub use error::{FleetError, Result};
pub use models::{
    new_local_id, Endereco, Filial, Identifiable, Manutencao, Moto, MotoStatus, TipoManutencao,
    Vaga, VagaStatus,
};
pub use validation::{FilialForm, ManutencaoForm, MotoForm, ValidationReport};
pub use yard::{SlotPosition, YardSummary};
