//! Template rendering engine.
//!
//! A constrained Jinja-style language backed by minijinja, exposed through two
//! contracts: a strict parse used while editing and a lenient render used in
//! production that never fails.

pub mod engine;
pub mod filters;
pub mod scan;

pub use engine::{ParseError, ParseErrorKind, ParsedTemplate, TemplateEngine};
pub use filters::KNOWN_FILTERS;
