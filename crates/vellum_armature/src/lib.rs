//! Armature - The structural parser for Vellum templates.
//!
//! A small state-machine HTML tokenizer feeding a tree builder that writes
//! straight into a [`vellum_relief::Document`]. Template syntax is not
//! interpreted here: directive attributes stay plain attributes and
//! interpolations stay plain text, to be discovered later by the compiler.

pub mod errors;
pub mod parser;
pub mod tokenizer;

pub use errors::{ErrorCode, ParseError, Position};
pub use parser::{parse_document, parse_fragment, parse_into, Parser};
