//! Core domain types
//!
//! These types mirror the JSON documents served by the pipeline backend.
//! They are loaded whole, edited in memory by the editor store and written
//! back whole, so every type keeps the fields it does not know about.

pub mod data_source;
pub mod pipeline;
