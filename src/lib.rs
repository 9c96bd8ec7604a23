// LogMon - lib.rs
//
// Library entry point, exposing the tail reader, phrase matcher, monitor
// orchestration, and configuration loading for integration testing and for
// embedding in other front-ends (an HTTP health endpoint, a cron job).

pub mod app;
pub mod core;
pub mod platform;
pub mod util;
