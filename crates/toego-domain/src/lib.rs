//! Shared domain types for the toego editorial engine
//!
//! This crate provides the vocabulary shared by the manuscript analyzers and
//! the workflow engine:
//! - DocumentSnapshot / Span: the text under analysis and byte-offset
//!   intervals into it
//! - Mark: a span-anchored annotation with a resolve-once lifecycle
//! - EditSession / PhaseRecord / EditPhase: the seven-phase pipeline state
//!
//! Everything here is plain serializable data plus construction-time
//! validation; analysis lives in `toego-rules` and mutation in
//! `toego-workflow`.

pub mod document;
pub mod error;
pub mod mark;
pub mod session;

pub use document::*;
pub use error::*;
pub use mark::*;
pub use session::*;
