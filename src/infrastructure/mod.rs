//! Infrastructure layer - External adapters and implementations
//!
//! This layer contains:
//! - Config: Application configuration
//! - Remote backend: HTTP client for a story generation service
//! - Process backend: Local model runtime invoked as a subprocess
//! - Template backend: Offline deterministic chapters
//! - Persistence: In-memory storage used by the demo runner

pub mod config;
pub mod persistence;
pub mod process_backend;
pub mod process_runner;
pub mod remote_backend;
pub mod template_backend;
