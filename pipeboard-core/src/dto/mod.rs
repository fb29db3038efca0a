//! Data Transfer Objects
//!
//! Lightweight edit payloads produced by front ends (the CLI, tests) and
//! applied to domain values by the editor store.

pub mod step;
