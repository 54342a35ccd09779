//! Data models for incident reports and pipeline configuration.

pub mod config;
pub mod record;
