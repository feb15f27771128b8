//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods. Every
//! method takes any SQLite executor as its first argument, so the same call
//! works against the pool or inside a transaction (`&mut *tx`).

pub mod pack_template_repo;
pub mod pack_variable_repo;
pub mod preset_pack_repo;
pub mod story_repo;

pub use pack_template_repo::PackTemplateRepo;
pub use pack_variable_repo::PackVariableRepo;
pub use preset_pack_repo::PresetPackRepo;
pub use story_repo::StoryRepo;

/// SQL expression for the current UTC time, in the format the `*_at` columns
/// are written with.
pub(crate) const NOW: &str = "strftime('%Y-%m-%dT%H:%M:%fZ', 'now')";
