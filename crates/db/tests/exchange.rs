//! Pack export and import.

use assert_matches::assert_matches;
use sqlx::SqlitePool;
use taleforge_core::error::CoreError;
use taleforge_core::exchange::{ExportedTemplate, PackExport};
use taleforge_core::hashing::content_hash;
use taleforge_core::shipped;
use taleforge_core::variables::VariableType;
use taleforge_db::StoreError;

mod common;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_export_then_import_reproduces_pack(pool: SqlitePool) {
    let store = common::seeded_store(pool).await;
    let pack = common::create_pack(&store, "Noir").await;
    store
        .create_custom_variable(pack.id, &common::new_variable("weather", VariableType::Text, Some("rain")))
        .await
        .unwrap();
    store
        .set_template_content(pack.id, shipped::STORY_TURN, "{{ weather }}: {{ userAction }}")
        .await
        .unwrap();

    let export = store.export_pack(pack.id).await.unwrap();
    assert_eq!(export.pack.name, "Noir");
    assert_eq!(export.variables.len(), 1);

    // Through JSON, as a file would carry it.
    let json = serde_json::to_string(&export).unwrap();
    let parsed: PackExport = serde_json::from_str(&json).unwrap();
    let imported = store.import_pack(&parsed).await.unwrap();

    assert_eq!(imported.name, "Noir (2)");
    assert!(!imported.is_default);

    let original = store.get_pack_templates(pack.id).await.unwrap();
    let copy = store.get_pack_templates(imported.id).await.unwrap();
    assert_eq!(original.len(), copy.len());
    for (a, b) in original.iter().zip(&copy) {
        assert_eq!(a.template_id, b.template_id);
        assert_eq!(a.content, b.content);
        assert_eq!(a.content_hash, b.content_hash);
    }

    let variables = store.get_pack_variables(imported.id).await.unwrap();
    assert_eq!(variables.len(), 1);
    assert_eq!(variables[0].variable_name, "weather");
    assert_eq!(variables[0].default_value.as_deref(), Some("rain"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_import_fills_missing_templates_and_recomputes_hashes(pool: SqlitePool) {
    let store = common::seeded_store(pool).await;
    let default = store.get_default_pack().await.unwrap();
    let mut export = store.export_pack(default.id).await.unwrap();
    export.pack.name = "Sparse".to_string();
    export.templates = vec![ExportedTemplate {
        template_id: shipped::STORY_TURN.to_string(),
        content: "Go: {{ userAction }}".to_string(),
        content_hash: Some("forged".to_string()),
    }];

    let imported = store.import_pack(&export).await.unwrap();
    assert_eq!(imported.name, "Sparse");

    let templates = store.get_pack_templates(imported.id).await.unwrap();
    assert_eq!(templates.len(), shipped::SHIPPED_TEMPLATES.len());
    let turn = templates
        .iter()
        .find(|t| t.template_id == shipped::STORY_TURN)
        .unwrap();
    assert_eq!(turn.content, "Go: {{ userAction }}");
    assert_eq!(turn.content_hash, content_hash("Go: {{ userAction }}"));

    let statuses = store.get_template_statuses(imported.id).await.unwrap();
    assert_eq!(statuses.iter().filter(|s| s.status.is_modified()).count(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_import_rejects_invalid_template_without_writing(pool: SqlitePool) {
    let store = common::seeded_store(pool).await;
    let default = store.get_default_pack().await.unwrap();
    let mut export = store.export_pack(default.id).await.unwrap();
    export.pack.name = "Broken".to_string();
    let turn = export
        .templates
        .iter_mut()
        .find(|t| t.template_id == shipped::STORY_TURN)
        .unwrap();
    turn.content = "{% if mode %}unclosed".to_string();

    assert_matches!(
        store.import_pack(&export).await,
        Err(StoreError::Core(CoreError::InvalidTemplate { .. }))
    );
    assert_eq!(store.get_all_packs().await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_import_rejects_unsupported_version(pool: SqlitePool) {
    let store = common::seeded_store(pool).await;
    let default = store.get_default_pack().await.unwrap();
    let mut export = store.export_pack(default.id).await.unwrap();
    export.format_version += 1;

    assert_matches!(
        store.import_pack(&export).await,
        Err(StoreError::Core(CoreError::Validation(_)))
    );
}
