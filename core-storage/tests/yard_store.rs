//! Local store round-trips through the desktop SQLite backend

use bridge_desktop::SqliteSettingsStore;
use bridge_traits::SettingsStore;
use core_fleet::yard::YardSummary;
use core_fleet::{MotoForm, MotoStatus};
use core_storage::{LocalStore, Preferences, ThemeMode, MOTOS_KEY, VAGAS_KEY};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

fn temp_db() -> std::path::PathBuf {
    std::env::temp_dir()
        .join(format!("fleet-store-{}-{}", std::process::id(), rand::random::<u32>()))
        .join("storage.db")
}

#[tokio::test]
async fn test_seeded_yard_survives_reopen() {
    let path = temp_db();

    let seeded = {
        let backend = SqliteSettingsStore::new(path.clone()).await.unwrap();
        let store = LocalStore::new(Arc::new(backend));
        store
            .initialize_mock_data_with(StdRng::seed_from_u64(2024))
            .await
            .expect("empty yard gets seeded")
    };

    let backend = Arc::new(SqliteSettingsStore::new(path.clone()).await.unwrap());
    let store = LocalStore::new(backend.clone());

    let vagas = store.get_vagas().await;
    assert_eq!(vagas, seeded.vagas);
    assert_eq!(store.get_motos().await, seeded.motos);

    let summary = YardSummary::from_vagas(&vagas);
    assert_eq!(summary.total, 80);
    assert_eq!(summary.ocupadas, seeded.motos.len());

    // Already seeded: a second run leaves both collections alone
    let raw_before = backend.get_string(VAGAS_KEY).await.unwrap();
    assert!(store
        .initialize_mock_data_with(StdRng::seed_from_u64(1))
        .await
        .is_none());
    assert_eq!(backend.get_string(VAGAS_KEY).await.unwrap(), raw_before);

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

#[tokio::test]
async fn test_form_to_store_workflow() {
    let backend = Arc::new(SqliteSettingsStore::in_memory().await.unwrap());
    let store = LocalStore::new(backend.clone());

    let moto = MotoForm {
        placa: "bra2e19".to_string(),
        modelo: "Mottu-E".to_string(),
        ano: "2024".to_string(),
        cor: "Verde".to_string(),
        filial_id: "f-9".to_string(),
        ..MotoForm::default()
    }
    .into_moto(core_fleet::new_local_id())
    .unwrap();

    store.save_moto(&moto).await;

    let mut edited = moto.clone();
    edited.status = MotoStatus::Ocupada;
    edited.vaga = Some("D6".to_string());
    store.update_moto(&edited).await;

    let raw = backend.get_string(MOTOS_KEY).await.unwrap().unwrap();
    assert!(raw.contains("\"placa\":\"BRA2E19\""));
    assert!(raw.contains("\"filialId\":\"f-9\""));
    assert_eq!(store.get_motos().await, vec![edited]);

    store.delete_moto(&moto.id).await;
    assert!(store.get_motos().await.is_empty());
}

#[tokio::test]
async fn test_clear_all_keeps_preferences() {
    let backend = Arc::new(SqliteSettingsStore::in_memory().await.unwrap());
    let store = LocalStore::new(backend.clone());
    let preferences = Preferences::new(backend);

    preferences.set_theme_mode(ThemeMode::Light).await;
    store.initialize_mock_data().await;
    store.clear_all().await;

    assert!(store.get_vagas().await.is_empty());
    assert_eq!(preferences.theme_mode().await, ThemeMode::Light);
}
