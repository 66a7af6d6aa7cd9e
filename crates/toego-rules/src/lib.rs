//! toego-rules: rule-driven manuscript analysis.
//!
//! Four detector families mirror the analysis phases of the editing
//! pipeline:
//! - structural: paragraph shape, dialogue balance, scene scope
//! - line: clichés, translation style, repetition, sentence length
//! - copy-edit: direct corrections, grammar patterns
//! - proofreading: numerals, name spacing, particle repetition
//!
//! [`analyze`] dispatches on the phase, runs the family's detectors in
//! parallel, and returns marks plus any rules it had to skip. Rule content
//! (cliché tables, corrections, particles) is injected configuration; the
//! engine ships no language content of its own.

pub mod analyzer;
pub mod config;
pub mod text;

mod copyedit;
mod line;
mod proofread;
mod structural;

pub use analyzer::*;
pub use config::*;
