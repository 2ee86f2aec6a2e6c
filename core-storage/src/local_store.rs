//! Local Key-Value Store
//!
//! Three flat collections, each a JSON array under its own key. Every
//! mutation reads the whole collection, transforms it in memory and writes it
//! back.

use crate::error::{Result, StorageError};
use crate::mock_data::{generate_mock_data, MockYard};
use bridge_traits::SettingsStore;
use core_fleet::{Identifiable, Manutencao, Moto, Vaga};
use rand::Rng;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

pub const MOTOS_KEY: &str = "@motos";
pub const VAGAS_KEY: &str = "@vagas";
pub const MANUTENCOES_KEY: &str = "@manutencoes";

/// Fail-open store for the yard collections.
#[derive(Clone)]
pub struct LocalStore {
    store: Arc<dyn SettingsStore>,
}

impl LocalStore {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }

    // ------------------------------------------------------------------
    // Fallible collection primitives
    // ------------------------------------------------------------------

    /// Reads a collection, surfacing backend and decoding errors.
    ///
    /// A missing key is an empty collection.
    pub async fn read_collection<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        match self.store.get_string(key).await? {
            Some(raw) => serde_json::from_str(&raw).map_err(|source| StorageError::Corrupted {
                key: key.to_string(),
                source,
            }),
            None => Ok(Vec::new()),
        }
    }

    pub async fn write_collection<T: Serialize + Sync>(&self, key: &str, items: &[T]) -> Result<()> {
        let raw = serde_json::to_string(items)?;
        self.store.set_string(key, &raw).await?;
        debug!(key, count = items.len(), "Wrote collection");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Fail-open generic operations
    // ------------------------------------------------------------------

    async fn load<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        match self.read_collection(key).await {
            Ok(items) => items,
            Err(e) => {
                warn!(key, error = %e, "Failed to read collection, using empty list");
                Vec::new()
            }
        }
    }

    async fn store_all<T: Serialize + Sync>(&self, key: &str, items: &[T]) {
        if let Err(e) = self.write_collection(key, items).await {
            warn!(key, error = %e, "Failed to write collection");
        }
    }

    /// Reads without falling back, so a failed read never triggers a write.
    async fn load_for_update<T: DeserializeOwned>(&self, key: &str) -> Option<Vec<T>> {
        match self.read_collection(key).await {
            Ok(items) => Some(items),
            Err(e) => {
                warn!(key, error = %e, "Failed to read collection, skipping update");
                None
            }
        }
    }

    async fn append<T>(&self, key: &str, item: &T)
    where
        T: Serialize + DeserializeOwned + Clone + Sync,
    {
        let Some(mut items) = self.load_for_update::<T>(key).await else {
            return;
        };
        items.push(item.clone());
        self.store_all(key, &items).await;
    }

    async fn replace<T>(&self, key: &str, item: &T)
    where
        T: Serialize + DeserializeOwned + Identifiable + Clone + Sync,
    {
        let Some(mut items) = self.load_for_update::<T>(key).await else {
            return;
        };
        let Some(slot) = items.iter_mut().find(|existing| existing.id() == item.id()) else {
            debug!(key, id = item.id(), "Update for unknown id ignored");
            return;
        };
        *slot = item.clone();
        self.store_all(key, &items).await;
    }

    async fn remove<T>(&self, key: &str, id: &str)
    where
        T: Serialize + DeserializeOwned + Identifiable + Sync,
    {
        let Some(mut items) = self.load_for_update::<T>(key).await else {
            return;
        };
        let before = items.len();
        items.retain(|existing| existing.id() != id);
        if items.len() == before {
            debug!(key, id, "Delete for unknown id ignored");
            return;
        }
        self.store_all(key, &items).await;
    }

    async fn find<T>(&self, key: &str, id: &str) -> Option<T>
    where
        T: DeserializeOwned + Identifiable,
    {
        self.load::<T>(key)
            .await
            .into_iter()
            .find(|item| item.id() == id)
    }

    // ------------------------------------------------------------------
    // Motos
    // ------------------------------------------------------------------

    pub async fn get_motos(&self) -> Vec<Moto> {
        self.load(MOTOS_KEY).await
    }

    pub async fn get_moto_by_id(&self, id: &str) -> Option<Moto> {
        self.find(MOTOS_KEY, id).await
    }

    #[instrument(skip(self, moto), fields(id = %moto.id))]
    pub async fn save_moto(&self, moto: &Moto) {
        self.append(MOTOS_KEY, moto).await;
    }

    #[instrument(skip(self, moto), fields(id = %moto.id))]
    pub async fn update_moto(&self, moto: &Moto) {
        self.replace(MOTOS_KEY, moto).await;
    }

    #[instrument(skip(self))]
    pub async fn delete_moto(&self, id: &str) {
        self.remove::<Moto>(MOTOS_KEY, id).await;
    }

    // ------------------------------------------------------------------
    // Vagas
    // ------------------------------------------------------------------

    pub async fn get_vagas(&self) -> Vec<Vaga> {
        self.load(VAGAS_KEY).await
    }

    pub async fn get_vaga_by_id(&self, id: &str) -> Option<Vaga> {
        self.find(VAGAS_KEY, id).await
    }

    pub async fn save_vaga(&self, vaga: &Vaga) {
        self.append(VAGAS_KEY, vaga).await;
    }

    pub async fn update_vaga(&self, vaga: &Vaga) {
        self.replace(VAGAS_KEY, vaga).await;
    }

    pub async fn delete_vaga(&self, id: &str) {
        self.remove::<Vaga>(VAGAS_KEY, id).await;
    }

    // ------------------------------------------------------------------
    // Manutencoes
    // ------------------------------------------------------------------

    pub async fn get_manutencoes(&self) -> Vec<Manutencao> {
        self.load(MANUTENCOES_KEY).await
    }

    pub async fn get_manutencao_by_id(&self, id: &str) -> Option<Manutencao> {
        self.find(MANUTENCOES_KEY, id).await
    }

    /// Maintenance history of one motorcycle, in insertion order
    pub async fn get_manutencoes_by_moto(&self, moto_id: &str) -> Vec<Manutencao> {
        self.get_manutencoes()
            .await
            .into_iter()
            .filter(|m| m.moto_id == moto_id)
            .collect()
    }

    pub async fn save_manutencao(&self, manutencao: &Manutencao) {
        self.append(MANUTENCOES_KEY, manutencao).await;
    }

    pub async fn update_manutencao(&self, manutencao: &Manutencao) {
        self.replace(MANUTENCOES_KEY, manutencao).await;
    }

    pub async fn delete_manutencao(&self, id: &str) {
        self.remove::<Manutencao>(MANUTENCOES_KEY, id).await;
    }

    // ------------------------------------------------------------------
    // Seeding & maintenance
    // ------------------------------------------------------------------

    /// Seeds the yard once, using unseeded randomness.
    ///
    /// Returns the generated data, or `None` when slots already exist or the
    /// slot collection could not be read.
    pub async fn initialize_mock_data(&self) -> Option<MockYard> {
        self.seed_with(|| generate_mock_data(&mut rand::thread_rng()))
            .await
    }

    /// Same as [`initialize_mock_data`](Self::initialize_mock_data) with a
    /// caller-supplied generator.
    pub async fn initialize_mock_data_with<R: Rng + Send>(&self, mut rng: R) -> Option<MockYard> {
        self.seed_with(move || generate_mock_data(&mut rng)).await
    }

    #[instrument(skip_all)]
    async fn seed_with<F>(&self, generate: F) -> Option<MockYard>
    where
        F: FnOnce() -> MockYard + Send,
    {
        let existing = self.load_for_update::<Vaga>(VAGAS_KEY).await?;
        if !existing.is_empty() {
            debug!(vagas = existing.len(), "Yard already initialized");
            return None;
        }

        let yard = generate();

        // Generated motos are added next to any motos already stored
        let mut motos = self.load_for_update::<Moto>(MOTOS_KEY).await?;
        motos.extend(yard.motos.iter().cloned());

        self.store_all(VAGAS_KEY, &yard.vagas).await;
        self.store_all(MOTOS_KEY, &motos).await;

        info!(
            vagas = yard.vagas.len(),
            motos = yard.motos.len(),
            "Seeded yard with mock data"
        );
        Some(yard)
    }

    /// Drops the three collections. Preferences and identity are kept.
    pub async fn clear_all(&self) {
        for key in [MOTOS_KEY, VAGAS_KEY, MANUTENCOES_KEY] {
            if let Err(e) = self.store.delete(key).await {
                warn!(key, error = %e, "Failed to clear collection");
            }
        }
        info!("Cleared local collections");
    }
}
