//! Templates that ship with the application.
//!
//! The catalog seeds the default pack, supplies the runtime variables each
//! template's calling service injects (accepted as known when that template
//! is validated) and marks templates that are consumed by an external
//! service and must not be rendered here.

use serde::Serialize;

/// Which part of the application consumes a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateCategory {
    Narrative,
    Memory,
    Lore,
    Suggestions,
    Image,
    Agent,
}

/// One shipped template.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ShippedTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub category: TemplateCategory,
    pub description: &'static str,
    pub content: &'static str,
    /// Passed to an external service verbatim instead of being rendered.
    pub external: bool,
    /// Variables the calling service adds at render time.
    pub runtime_variables: &'static [&'static str],
}

pub const STORY_SYSTEM_PROMPT: &str = "story-system-prompt";
pub const STORY_TURN: &str = "story-turn";
pub const MEMORY_SUMMARY: &str = "memory-summary";
pub const LORE_EXTRACTION: &str = "lore-extraction";
pub const SUGGESTION_PROMPT: &str = "suggestion-prompt";
pub const IMAGE_PROMPT: &str = "image-prompt";
pub const AGENT_TOOL_INSTRUCTIONS: &str = "agent-tool-instructions";

pub const SHIPPED_TEMPLATES: &[ShippedTemplate] = &[
    ShippedTemplate {
        id: STORY_SYSTEM_PROMPT,
        name: "Narrator system prompt",
        category: TemplateCategory::Narrative,
        description: "Sets up the narrator's role, voice, point of view and tense.",
        content: "\
You are the narrator of an interactive story{% if storyTitle %} titled \"{{ storyTitle }}\"{% endif %}.
Genre: {{ genre | capitalize }}.
{% if mode == 'adventure' %}The reader plays {{ protagonistName }}. Describe what happens in response to their actions. Never act or speak for them.
{% else %}You are co-writing a story with an author. Continue the prose in the author's voice and follow their direction.
{% endif %}{% if pov == 'first' %}Write in the first person.{% elsif pov == 'third' %}Write in the third person, following {{ protagonistName }}.{% else %}Write in the second person, addressing the protagonist as \"you\".{% endif %}
Use the {{ tense }} tense.",
        external: false,
        runtime_variables: &[],
    },
    ShippedTemplate {
        id: STORY_TURN,
        name: "Story turn",
        category: TemplateCategory::Narrative,
        description: "The per-turn request: recent story, summary and the reader's action.",
        content: "\
{% if storySummary %}Story so far:
{{ storySummary }}

{% endif %}{% if recentEntries %}Recent passages:
{{ recentEntries | bullets }}

{% endif %}{% if mode == 'adventure' %}{{ protagonistName | capitalize }} acts: {{ userAction }}
Continue the story from here.{% else %}Author's direction: {{ userAction }}
Write the next passage.{% endif %}",
        external: false,
        runtime_variables: &["userAction", "recentEntries", "storySummary"],
    },
    ShippedTemplate {
        id: MEMORY_SUMMARY,
        name: "Chapter summary",
        category: TemplateCategory::Memory,
        description: "Condenses a finished chapter into a short memory.",
        content: "\
Summarize the following chapter of \"{{ storyTitle }}\" in a few sentences.
Keep names, places and unresolved threads. Write in the past tense.

{{ chapterText }}",
        external: false,
        runtime_variables: &["chapterText"],
    },
    ShippedTemplate {
        id: LORE_EXTRACTION,
        name: "Lore extraction",
        category: TemplateCategory::Lore,
        description: "Finds new characters, places and items in a passage.",
        content: "\
List any new characters, locations or items introduced in the passage below.
{% if existingLore %}Ignore entries already known:
{{ existingLore | bullets }}
{% endif %}
Passage:
{{ passage }}",
        external: false,
        runtime_variables: &["passage", "existingLore"],
    },
    ShippedTemplate {
        id: SUGGESTION_PROMPT,
        name: "Action suggestions",
        category: TemplateCategory::Suggestions,
        description: "Proposes what the reader might do next.",
        content: "\
Based on the latest passages of this {{ genre }} story, suggest {{ suggestionCount | default(3) }} short, distinct things {{ protagonistName }} could do next.
{{ recentEntries | bullets }}",
        external: false,
        runtime_variables: &["recentEntries", "suggestionCount"],
    },
    ShippedTemplate {
        id: IMAGE_PROMPT,
        name: "Scene illustration",
        category: TemplateCategory::Image,
        description: "Prompt handed to the image provider as-is.",
        content: "Illustration of the current scene, {style}, detailed, no text.",
        external: true,
        runtime_variables: &[],
    },
    ShippedTemplate {
        id: AGENT_TOOL_INSTRUCTIONS,
        name: "Agent tool instructions",
        category: TemplateCategory::Agent,
        description: "Tool-use instructions read by the story agents.",
        content: "Use the available tools to look up lore entries before answering. Call one tool at a time.",
        external: true,
        runtime_variables: &[],
    },
];

/// Look up a shipped template by id.
pub fn find(id: &str) -> Option<&'static ShippedTemplate> {
    SHIPPED_TEMPLATES.iter().find(|t| t.id == id)
}

/// Whether `id` names a template that is returned raw instead of rendered.
pub fn is_external(id: &str) -> bool {
    find(id).is_some_and(|t| t.external)
}

/// Runtime variables injected for template `id`; empty for unknown ids.
pub fn runtime_variables_for(id: &str) -> Vec<String> {
    find(id)
        .map(|t| t.runtime_variables.iter().map(|v| v.to_string()).collect())
        .unwrap_or_default()
}
