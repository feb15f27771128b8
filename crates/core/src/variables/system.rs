//! System variables: values filled automatically from the story record.

use serde::{Deserialize, Serialize};

use crate::context::{ContextValue, RenderContext};

use super::definition::{EnumOption, VariableCategory, VariableDefinition};
use super::registry::VariableRegistry;

pub const STORY_TITLE: &str = "storyTitle";
pub const GENRE: &str = "genre";
pub const MODE: &str = "mode";
pub const POV: &str = "pov";
pub const TENSE: &str = "tense";
pub const PROTAGONIST_NAME: &str = "protagonistName";

pub const MODE_ADVENTURE: &str = "adventure";
pub const MODE_CREATIVE_WRITING: &str = "creative-writing";

/// Definitions of every system variable, in display order.
pub fn system_variables() -> Vec<VariableDefinition> {
    vec![
        VariableDefinition::text(STORY_TITLE, "Story title", VariableCategory::System)
            .with_description("Title of the current story"),
        VariableDefinition::text(GENRE, "Genre", VariableCategory::System)
            .with_default("fantasy")
            .with_description("Genre chosen when the story was created"),
        VariableDefinition::text(MODE, "Story mode", VariableCategory::System)
            .with_options(vec![
                EnumOption::new("Adventure", MODE_ADVENTURE),
                EnumOption::new("Creative writing", MODE_CREATIVE_WRITING),
            ])
            .with_default(MODE_ADVENTURE)
            .with_description("Adventure (the reader acts) or creative writing (the reader directs)"),
        VariableDefinition::text(POV, "Point of view", VariableCategory::System)
            .with_options(vec![
                EnumOption::new("First person", "first"),
                EnumOption::new("Second person", "second"),
                EnumOption::new("Third person", "third"),
            ])
            .with_default("second"),
        VariableDefinition::text(TENSE, "Tense", VariableCategory::System)
            .with_options(vec![
                EnumOption::new("Past", "past"),
                EnumOption::new("Present", "present"),
            ])
            .with_default("present"),
        VariableDefinition::text(PROTAGONIST_NAME, "Protagonist name", VariableCategory::System)
            .with_default("the protagonist")
            .with_description("Name of the main character"),
    ]
}

/// Story fields that feed the system variables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoryFacts {
    pub title: Option<String>,
    pub genre: Option<String>,
    pub mode: Option<String>,
    pub pov: Option<String>,
    pub tense: Option<String>,
    pub protagonist_name: Option<String>,
}

/// Build the system layer of a render context.
///
/// Every system variable in the registry contributes its default value (if
/// any); fields present on `facts` then replace those defaults. Empty story
/// fields keep the default.
pub fn system_context(registry: &VariableRegistry, facts: Option<&StoryFacts>) -> RenderContext {
    let mut context = RenderContext::new();
    for def in registry.get_by_category(VariableCategory::System) {
        if let Some(default) = def.default_value.as_deref() {
            context.insert(&def.name, ContextValue::coerce(default, def.variable_type));
        }
    }

    let Some(facts) = facts else {
        return context;
    };
    let fields = [
        (STORY_TITLE, &facts.title),
        (GENRE, &facts.genre),
        (MODE, &facts.mode),
        (POV, &facts.pov),
        (TENSE, &facts.tense),
        (PROTAGONIST_NAME, &facts.protagonist_name),
    ];
    for (name, value) in fields {
        if let Some(value) = value.as_deref().filter(|v| !v.trim().is_empty()) {
            context.insert(name, ContextValue::from(value));
        }
    }
    context
}
