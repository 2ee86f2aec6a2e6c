//! End-to-end branch flows against a mocked HTTP bridge

use async_trait::async_trait;
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use bytes::Bytes;
use core_api::{ApiClient, ApiError, FilialService, MotoService};
use core_fleet::{FilialForm, MotoForm};
use core_runtime::config::{ApiConfig, ApiEnvironment};
use mockall::mock;
use std::collections::HashMap;
use std::sync::Arc;

mock! {
    Http {}

    #[async_trait]
    impl HttpClient for Http {
        async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
        async fn is_connected(&self) -> bool;
    }
}

fn response(status: u16, body: &str) -> HttpResponse {
    HttpResponse {
        status,
        headers: HashMap::new(),
        body: Bytes::from(body.to_string()),
    }
}

fn client(mock: MockHttp) -> ApiClient {
    let config = ApiConfig {
        environment: ApiEnvironment::IosSimulator,
        ..ApiConfig::default()
    };
    ApiClient::from_config(Arc::new(mock), &config).unwrap()
}

fn branch_form() -> FilialForm {
    FilialForm {
        nome: "Filial Paulista".to_string(),
        logradouro: "Av. Paulista".to_string(),
        numero: "1000".to_string(),
        bairro: "Bela Vista".to_string(),
        cidade: "São Paulo".to_string(),
        estado: "SP".to_string(),
        cep: "01310-100".to_string(),
        email: Some("paulista@fleet.example".to_string()),
        ..FilialForm::default()
    }
}

#[tokio::test]
async fn test_three_letter_state_is_rejected_before_any_request() {
    let mut mock = MockHttp::new();
    mock.expect_execute().never();
    let service = FilialService::new(client(mock));

    let mut form = branch_form();
    form.estado = "SAO".to_string();

    let err = service.create(&form).await.unwrap_err();
    match &err {
        ApiError::Validation(report) => {
            assert_eq!(
                report.messages_for("estado"),
                ["O estado deve ter exatamente 2 letras".to_string()]
            );
        }
        other => panic!("expected validation error, got {:?}", other),
    }
    assert_eq!(err.user_message(), "O estado deve ter exatamente 2 letras");
}

#[tokio::test]
async fn test_deleting_branch_with_motos_explains_the_association() {
    let mut mock = MockHttp::new();
    mock.expect_execute()
        .withf(|req| {
            req.method == HttpMethod::Delete
                && req.url == "http://localhost:5000/api/v1/filial/3"
        })
        .times(1)
        .returning(|_| {
            Ok(response(
                500,
                "System.InvalidOperationException: The association between entity types \
                 'Filial' and 'Moto' has been severed",
            ))
        });
    let service = FilialService::new(client(mock));

    let err = service.delete("3").await.unwrap_err();
    assert!(err.user_message().contains("existem motos associadas"));
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn test_create_then_list_branches() {
    let mut mock = MockHttp::new();
    let mut seq = mockall::Sequence::new();
    mock.expect_execute()
        .withf(|req| req.method == HttpMethod::Post)
        .times(1)
        .in_sequence(&mut seq)
        .returning(|req| {
            let mut body: serde_json::Value =
                serde_json::from_slice(req.body.as_deref().unwrap_or_default()).unwrap();
            body["id"] = serde_json::json!(3);
            Ok(response(201, &body.to_string()))
        });
    mock.expect_execute()
        .withf(|req| req.method == HttpMethod::Get)
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| {
            Ok(response(
                200,
                r#"[{"id":3,"nome":"Filial Paulista","logradouro":"Av. Paulista","numero":"1000","bairro":"Bela Vista","cidade":"São Paulo","estado":"SP","cep":"01310100","ativo":true}]"#,
            ))
        });
    let service = FilialService::new(client(mock));

    let created = service.create(&branch_form()).await.unwrap();
    assert_eq!(created.id, "3");
    assert_eq!(created.endereco.cep, "01310100");

    let all = service.get_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].endereco_completo, created.endereco_completo);
}

#[tokio::test]
async fn test_moto_service_shares_the_pipeline() {
    let mut mock = MockHttp::new();
    mock.expect_execute()
        .withf(|req| {
            req.url == "http://localhost:5000/api/Moto"
                && req.headers.contains_key("X-Api-Key")
        })
        .times(1)
        .returning(|_| Ok(response(200, "[]")));

    let motos = MotoService::new(client(mock)).get_all().await.unwrap();
    assert!(motos.is_empty());

    let blank = MotoForm::default();
    let mut untouched = MockHttp::new();
    untouched.expect_execute().never();
    let err = MotoService::new(client(untouched))
        .create(&blank)
        .await
        .unwrap_err();
    assert!(err.validation_report().is_some());
}
