// LogMon - core/mod.rs
//
// Core business logic layer: data model, tail reader, phrase matcher,
// report rendering.
// Must NOT depend on: app or platform.

pub mod export;
pub mod matcher;
pub mod model;
pub mod tail;
