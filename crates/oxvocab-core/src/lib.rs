//! oxvocab-core — Adaptive word selection, answer validation, and persistence.
//!
//! This crate holds the vocabulary model, the weighted selector that decides
//! which word to ask next, the rules for accepting an answer, and the stores
//! that keep progress between games.

pub mod error;
pub mod meanings;
pub mod model;
pub mod scores;
pub mod selector;
pub mod statistics;
pub mod store;
pub mod traits;
pub mod validation;
pub mod vocabulary;
