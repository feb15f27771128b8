//! Shared helpers for the store integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use sqlx::SqlitePool;
use taleforge_core::template::TemplateEngine;
use taleforge_core::types::DbId;
use taleforge_core::variables::{VariableRegistry, VariableType};
use taleforge_db::models::pack_variable::CreatePackVariable;
use taleforge_db::models::preset_pack::{CreatePresetPack, PresetPack};
use taleforge_db::models::story::{CreateStory, Story};
use taleforge_db::repositories::StoryRepo;
use taleforge_db::PackStore;
use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A store over `pool` with the system variables registered. Not seeded.
pub fn store(pool: SqlitePool) -> PackStore {
    init_tracing();
    PackStore::new(
        pool,
        Arc::new(TemplateEngine::new()),
        Arc::new(VariableRegistry::with_system_variables()),
    )
}

/// A store whose default pack has been seeded.
pub async fn seeded_store(pool: SqlitePool) -> PackStore {
    let store = store(pool);
    store.seed_shipped_templates().await.unwrap();
    store
}

pub async fn create_pack(store: &PackStore, name: &str) -> PresetPack {
    store
        .create_pack(&CreatePresetPack::named(name))
        .await
        .unwrap()
}

pub async fn create_story(store: &PackStore, pack_id: DbId) -> Story {
    StoryRepo::create(
        store.pool(),
        &CreateStory {
            title: "The Sunken Keep".to_string(),
            pack_id,
            ..Default::default()
        },
    )
    .await
    .unwrap()
}

pub fn new_variable(name: &str, variable_type: VariableType, default: Option<&str>) -> CreatePackVariable {
    CreatePackVariable {
        variable_name: name.to_string(),
        display_name: name.to_string(),
        variable_type,
        is_required: false,
        default_value: default.map(str::to_string),
        enum_options: None,
        description: None,
        sort_order: None,
    }
}
