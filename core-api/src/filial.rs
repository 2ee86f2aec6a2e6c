//! Branch resource client (`/v1/filial`)

use crate::client::ApiClient;
use crate::dto::{FilialDto, FilialPayload, ListResponse};
use crate::error::{ApiError, Result};
use core_fleet::{Filial, FilialForm};
use tracing::{error, info, instrument};

const VERSION: &str = "v1";
const RESOURCE: &str = "filial";

/// Fixed page size for the branch list
pub const PAGE_SIZE: u32 = 100;

/// Server message fragment returned when motorcycles still reference a branch
const ASSOCIATION_MARKER: &str = "association between entity types";

/// Why a branch deletion was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteFailure {
    BadRequest,
    NotFound,
    HasMotos,
    ServerError,
    Other,
}

impl DeleteFailure {
    pub fn message(&self) -> &'static str {
        match self {
            Self::BadRequest => {
                "Não é possível excluir esta filial. Verifique se não há motos vinculadas a ela."
            }
            Self::NotFound => "Filial não encontrada.",
            Self::HasMotos => {
                "Não é possível excluir esta filial porque existem motos associadas a ela. \
                 Remova ou transfira as motos antes de excluir."
            }
            Self::ServerError => {
                "Erro interno do servidor ao excluir a filial. Tente novamente mais tarde."
            }
            Self::Other => "Não foi possível excluir a filial.",
        }
    }
}

/// Maps a failed deletion to its operator message.
///
/// The backend reports foreign-key violations only as free text inside a
/// 500 body, so that case is recognised by substring.
pub fn classify_delete_failure(status: Option<u16>, body: &str) -> DeleteFailure {
    match status {
        Some(400) => DeleteFailure::BadRequest,
        Some(404) => DeleteFailure::NotFound,
        Some(500) if body.contains(ASSOCIATION_MARKER) => DeleteFailure::HasMotos,
        Some(500) => DeleteFailure::ServerError,
        _ => DeleteFailure::Other,
    }
}

#[derive(Clone)]
pub struct FilialService {
    client: ApiClient,
}

impl FilialService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    fn fail(message: &str, cause: ApiError) -> ApiError {
        error!(error = %cause, "{}", message);
        ApiError::service(message, cause)
    }

    #[instrument(skip(self))]
    pub async fn get_all(&self) -> Result<Vec<Filial>> {
        let mut url = self.client.endpoint(&[VERSION, RESOURCE]);
        url.query_pairs_mut()
            .append_pair("pageSize", &PAGE_SIZE.to_string());

        let list: ListResponse<FilialDto> = self
            .client
            .get(&url)
            .await
            .map_err(|e| Self::fail("Não foi possível carregar as filiais.", e))?;

        Ok(list.into_items().into_iter().map(Filial::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: &str) -> Result<Filial> {
        let url = self.client.endpoint(&[VERSION, RESOURCE, id]);
        let dto: FilialDto = self
            .client
            .get(&url)
            .await
            .map_err(|e| Self::fail("Não foi possível carregar os dados da filial.", e))?;
        Ok(dto.into())
    }

    /// Validates the form, then creates the branch.
    #[instrument(skip(self, form), fields(nome = %form.nome))]
    pub async fn create(&self, form: &FilialForm) -> Result<Filial> {
        let filial = form.clone().into_filial(String::new())?;
        let url = self.client.endpoint(&[VERSION, RESOURCE]);

        let created: Option<FilialDto> = self
            .client
            .post(&url, &FilialPayload::from(&filial))
            .await
            .map_err(|e| Self::fail("Não foi possível cadastrar a filial.", e))?;

        let created = created.map(Filial::from).unwrap_or(filial);
        info!(id = %created.id, "Filial created");
        Ok(created)
    }

    #[instrument(skip(self, form))]
    pub async fn update(&self, id: &str, form: &FilialForm) -> Result<Filial> {
        let filial = form.clone().into_filial(id)?;
        let url = self.client.endpoint(&[VERSION, RESOURCE, id]);

        let updated: Option<FilialDto> = self
            .client
            .put(&url, &FilialPayload::from(&filial))
            .await
            .map_err(|e| Self::fail("Não foi possível atualizar a filial.", e))?;

        Ok(updated.map(Filial::from).unwrap_or(filial))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<()> {
        let url = self.client.endpoint(&[VERSION, RESOURCE, id]);
        if let Err(cause) = self.client.delete(&url).await {
            let body = match &cause {
                ApiError::Status { body, .. } => body.as_str(),
                _ => "",
            };
            let failure = classify_delete_failure(cause.status(), body);
            return Err(Self::fail(failure.message(), cause));
        }
        info!(id, "Filial deleted");
        Ok(())
    }

    /// Flips `ativo`. `None` when the server acknowledges without a body.
    #[instrument(skip(self))]
    pub async fn toggle_active(&self, id: &str) -> Result<Option<Filial>> {
        let url = self
            .client
            .endpoint(&[VERSION, RESOURCE, id, "toggle-status"]);
        let toggled: Option<FilialDto> = self
            .client
            .patch(&url)
            .await
            .map_err(|e| Self::fail("Não foi possível alterar o status da filial.", e))?;
        Ok(toggled.map(Filial::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{response, MockHttpClient, BASE_URL};
    use bridge_traits::HttpMethod;
    use std::sync::Arc;
    use std::time::Duration;

    fn service(mock: MockHttpClient) -> FilialService {
        let client =
            ApiClient::new(Arc::new(mock), BASE_URL, "test-key", Duration::from_secs(10)).unwrap();
        FilialService::new(client)
    }

    const FILIAL_JSON: &str = r#"{"id":"f-1","nome":"Filial Centro","logradouro":"Rua Direita","numero":"10","bairro":"Sé","cidade":"São Paulo","estado":"SP","cep":"01002000","ativo":true}"#;

    #[test]
    fn test_classify_delete_failure() {
        assert_eq!(classify_delete_failure(Some(400), ""), DeleteFailure::BadRequest);
        assert_eq!(classify_delete_failure(Some(404), ""), DeleteFailure::NotFound);
        assert_eq!(
            classify_delete_failure(
                Some(500),
                "The association between entity types 'Filial' and 'Moto' has been severed"
            ),
            DeleteFailure::HasMotos
        );
        assert_eq!(
            classify_delete_failure(Some(500), "NullReferenceException"),
            DeleteFailure::ServerError
        );
        assert_eq!(classify_delete_failure(Some(409), ""), DeleteFailure::Other);
        assert_eq!(classify_delete_failure(None, ""), DeleteFailure::Other);
    }

    #[tokio::test]
    async fn test_get_all_uses_fixed_page_size() {
        let mut mock = MockHttpClient::new();
        mock.expect_execute()
            .withf(|req| {
                req.method == HttpMethod::Get
                    && req.url == format!("{}/v1/filial?pageSize=100", BASE_URL)
            })
            .times(1)
            .returning(|_| Ok(response(200, &format!(r#"{{"items":[{}]}}"#, FILIAL_JSON))));

        let filiais = service(mock).get_all().await.unwrap();
        assert_eq!(filiais.len(), 1);
        assert_eq!(
            filiais[0].endereco_completo,
            "Rua Direita, 10 - Sé, São Paulo - SP, 01002-000"
        );
    }

    #[tokio::test]
    async fn test_toggle_active() {
        let mut mock = MockHttpClient::new();
        mock.expect_execute()
            .withf(|req| {
                req.method == HttpMethod::Patch
                    && req.url == format!("{}/v1/filial/f-1/toggle-status", BASE_URL)
            })
            .times(1)
            .returning(|_| {
                Ok(response(
                    200,
                    &FILIAL_JSON.replace(r#""ativo":true"#, r#""ativo":false"#),
                ))
            });

        let toggled = service(mock).toggle_active("f-1").await.unwrap().unwrap();
        assert!(!toggled.ativo);
    }

    #[tokio::test]
    async fn test_toggle_active_without_body() {
        let mut mock = MockHttpClient::new();
        mock.expect_execute()
            .times(1)
            .returning(|_| Ok(response(204, "")));

        assert!(service(mock).toggle_active("f-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_not_found() {
        let mut mock = MockHttpClient::new();
        mock.expect_execute()
            .withf(|req| req.method == HttpMethod::Delete)
            .times(1)
            .returning(|_| Ok(response(404, "")));

        let err = service(mock).delete("f-9").await.unwrap_err();
        assert_eq!(err.user_message(), "Filial não encontrada.");
    }

    #[tokio::test]
    async fn test_delete_network_failure_is_generic() {
        let mut mock = MockHttpClient::new();
        mock.expect_execute().times(1).returning(|_| {
            Err(bridge_traits::BridgeError::Timeout("10s".to_string()))
        });

        let err = service(mock).delete("f-1").await.unwrap_err();
        assert_eq!(err.user_message(), DeleteFailure::Other.message());
        assert!(err.is_network());
    }

    #[tokio::test]
    async fn test_update_sends_flat_address() {
        let mut mock = MockHttpClient::new();
        mock.expect_execute()
            .withf(|req| {
                let body: serde_json::Value =
                    serde_json::from_slice(req.body.as_deref().unwrap_or_default()).unwrap();
                req.method == HttpMethod::Put
                    && req.url == format!("{}/v1/filial/f-1", BASE_URL)
                    && body["cep"] == "01002000"
                    && body["estado"] == "SP"
            })
            .times(1)
            .returning(|_| Ok(response(200, FILIAL_JSON)));

        let form = FilialForm {
            nome: "Filial Centro".to_string(),
            logradouro: "Rua Direita".to_string(),
            numero: "10".to_string(),
            bairro: "Sé".to_string(),
            cidade: "São Paulo".to_string(),
            estado: "sp".to_string(),
            cep: "01002-000".to_string(),
            ..FilialForm::default()
        };
        let updated = service(mock).update("f-1", &form).await.unwrap();
        assert_eq!(updated.id, "f-1");
    }
}
