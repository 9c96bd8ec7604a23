// LogMon - platform/mod.rs
//
// Platform layer: config directory resolution and config file loading.

pub mod config;
