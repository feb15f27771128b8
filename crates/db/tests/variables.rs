//! Custom variables and per-story override values.

use assert_matches::assert_matches;
use serde_json::json;
use sqlx::SqlitePool;
use taleforge_core::error::CoreError;
use taleforge_core::variables::{EnumOption, VariableType};
use taleforge_db::models::pack_variable::UpdatePackVariable;
use taleforge_db::StoreError;

mod common;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_custom_variable_crud(pool: SqlitePool) {
    let store = common::seeded_store(pool).await;
    let pack = common::create_pack(&store, "Noir").await;

    let tone = store
        .create_custom_variable(pack.id, &common::new_variable("tone", VariableType::Text, Some("wry")))
        .await
        .unwrap();
    let mut era = common::new_variable("era", VariableType::Enum, Some("1940s"));
    era.enum_options = Some(vec![
        EnumOption::new("Forties", "1940s"),
        EnumOption::new("Eighties", "1980s"),
    ]);
    let era = store.create_custom_variable(pack.id, &era).await.unwrap();
    assert_eq!((tone.sort_order, era.sort_order), (0, 1));

    let def = era.to_definition().unwrap();
    assert_eq!(def.variable_type, VariableType::Enum);
    assert_eq!(def.enum_options.as_ref().map(Vec::len), Some(2));

    let updated = store
        .update_custom_variable(
            pack.id,
            tone.id,
            &UpdatePackVariable {
                variable_name: Some("mood".to_string()),
                default_value: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.variable_name, "mood");
    assert_eq!(updated.default_value, None);
    assert_eq!(updated.display_name, "tone");

    store.delete_custom_variable(pack.id, era.id).await.unwrap();
    let names: Vec<String> = store
        .get_pack_variables(pack.id)
        .await
        .unwrap()
        .into_iter()
        .map(|v| v.variable_name)
        .collect();
    assert_eq!(names, vec!["mood"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_variable_name_is_rejected(pool: SqlitePool) {
    let store = common::seeded_store(pool).await;
    let pack = common::create_pack(&store, "Noir").await;
    let tone = common::new_variable("tone", VariableType::Text, None);
    store.create_custom_variable(pack.id, &tone).await.unwrap();
    let mood = store
        .create_custom_variable(pack.id, &common::new_variable("mood", VariableType::Text, None))
        .await
        .unwrap();

    assert_matches!(
        store.create_custom_variable(pack.id, &tone).await,
        Err(StoreError::Core(CoreError::DuplicateName { kind: "variable", .. }))
    );
    assert_matches!(
        store
            .update_custom_variable(
                pack.id,
                mood.id,
                &UpdatePackVariable {
                    variable_name: Some("tone".to_string()),
                    ..Default::default()
                },
            )
            .await,
        Err(StoreError::Core(CoreError::DuplicateName { .. }))
    );

    // Same name in another pack is fine.
    let other = common::create_pack(&store, "Pulp").await;
    store.create_custom_variable(other.id, &tone).await.unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invalid_definitions_are_rejected(pool: SqlitePool) {
    let store = common::seeded_store(pool).await;
    let pack = common::create_pack(&store, "Noir").await;

    for bad in [
        common::new_variable("2fast", VariableType::Text, None),
        common::new_variable("for", VariableType::Text, None),
        common::new_variable("count", VariableType::Number, Some("many")),
        common::new_variable("choice", VariableType::Enum, None),
    ] {
        assert_matches!(
            store.create_custom_variable(pack.id, &bad).await,
            Err(StoreError::Core(CoreError::Validation(_))),
            "{}",
            bad.variable_name
        );
    }
    assert!(store.get_pack_variables(pack.id).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_default_pack_variables_are_read_only(pool: SqlitePool) {
    let store = common::seeded_store(pool).await;
    let default = store.get_default_pack().await.unwrap();
    assert_matches!(
        store
            .create_custom_variable(default.id, &common::new_variable("tone", VariableType::Text, None))
            .await,
        Err(StoreError::Core(CoreError::Validation(_)))
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_variable_of_another_pack_is_not_found(pool: SqlitePool) {
    let store = common::seeded_store(pool).await;
    let noir = common::create_pack(&store, "Noir").await;
    let pulp = common::create_pack(&store, "Pulp").await;
    let tone = store
        .create_custom_variable(noir.id, &common::new_variable("tone", VariableType::Text, None))
        .await
        .unwrap();

    assert_matches!(
        store.delete_custom_variable(pulp.id, tone.id).await,
        Err(StoreError::Core(CoreError::NotFound { .. }))
    );
}

// ---------------------------------------------------------------------------
// Story values
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_story_values_are_validated_against_pack(pool: SqlitePool) {
    let store = common::seeded_store(pool).await;
    let pack = common::create_pack(&store, "Noir").await;
    store
        .create_custom_variable(pack.id, &common::new_variable("y", VariableType::Number, Some("2")))
        .await
        .unwrap();
    let story = common::create_story(&store, pack.id).await;

    assert!(store.get_story_variable_values(story.id).await.unwrap().is_empty());

    let values = json!({"y": 5});
    let saved = store
        .set_story_variable_values(story.id, values.as_object().unwrap())
        .await
        .unwrap();
    assert_eq!(saved.get("y"), Some(&json!(5)));
    assert_eq!(
        store.get_story_variable_values(story.id).await.unwrap().get("y"),
        Some(&json!(5))
    );

    for bad in [json!({"y": "five"}), json!({"z": 1}), json!({"y": {"nested": 1}})] {
        assert_matches!(
            store.set_story_variable_values(story.id, bad.as_object().unwrap()).await,
            Err(StoreError::Core(CoreError::Validation(_)))
        );
    }
    assert_eq!(
        store.get_story_variable_values(story.id).await.unwrap().get("y"),
        Some(&json!(5))
    );
}
