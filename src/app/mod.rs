// LogMon - app/mod.rs
//
// Application layer: orchestration of monitor runs and the log check set.
// Dependencies: core layer.

pub mod monitor;
pub mod registry;
