// src/monitor/mod.rs
mod runner;

pub use runner::{Monitor, MonitorHandle};
