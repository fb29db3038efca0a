//! Pipeboard Core
//!
//! Core types shared by every Pipeboard crate.
//!
//! This crate contains:
//! - Domain types: the pipeline document as the backend serves it (Pipeline, Version, Step, DataSource)
//! - DTOs: partial edits applied to domain types by the editor and the CLI

pub mod domain;
pub mod dto;
