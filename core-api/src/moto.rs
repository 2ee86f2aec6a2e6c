//! Motorcycle resource client (`/Moto`)

use crate::client::ApiClient;
use crate::dto::{ListResponse, MotoPayload};
use crate::error::{ApiError, Result};
use core_fleet::{Moto, MotoForm};
use tracing::{error, info, instrument};

const RESOURCE: &str = "Moto";

#[derive(Clone)]
pub struct MotoService {
    client: ApiClient,
}

impl MotoService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    fn fail(message: &str, cause: ApiError) -> ApiError {
        error!(error = %cause, "{}", message);
        ApiError::service(message, cause)
    }

    #[instrument(skip(self))]
    pub async fn get_all(&self) -> Result<Vec<Moto>> {
        let url = self.client.endpoint(&[RESOURCE]);
        let list: ListResponse<Moto> = self
            .client
            .get(&url)
            .await
            .map_err(|e| Self::fail("Não foi possível carregar as motos.", e))?;
        Ok(list.into_items())
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: &str) -> Result<Moto> {
        let url = self.client.endpoint(&[RESOURCE, id]);
        self.client
            .get(&url)
            .await
            .map_err(|e| Self::fail("Não foi possível carregar os dados da moto.", e))
    }

    /// Validates the form, then registers the motorcycle.
    ///
    /// When the server answers without a body the submitted record is
    /// returned with an empty id.
    #[instrument(skip(self, form), fields(placa = %form.placa))]
    pub async fn create(&self, form: &MotoForm) -> Result<Moto> {
        let moto = form.clone().into_moto(String::new())?;
        let url = self.client.endpoint(&[RESOURCE]);

        let created: Option<Moto> = self
            .client
            .post(&url, &MotoPayload::from(&moto))
            .await
            .map_err(|e| Self::fail("Não foi possível cadastrar a moto.", e))?;

        let created = created.unwrap_or(moto);
        info!(id = %created.id, placa = %created.placa, "Moto registered");
        Ok(created)
    }

    #[instrument(skip(self, form))]
    pub async fn update(&self, id: &str, form: &MotoForm) -> Result<Moto> {
        let moto = form.clone().into_moto(id)?;
        let url = self.client.endpoint(&[RESOURCE, id]);

        let updated: Option<Moto> = self
            .client
            .put(&url, &MotoPayload::from(&moto))
            .await
            .map_err(|e| Self::fail("Não foi possível atualizar a moto.", e))?;

        Ok(updated.unwrap_or(moto))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<()> {
        let url = self.client.endpoint(&[RESOURCE, id]);
        self.client
            .delete(&url)
            .await
            .map_err(|e| Self::fail("Não foi possível excluir a moto.", e))?;
        info!(id, "Moto deleted");
        Ok(())
    }
}
