//! cmplint core - configuration and orchestrator

pub mod config;
pub mod orchestrator;
