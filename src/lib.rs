//! FAIryTale Engine - Branching children's story generation
//!
//! The engine:
//! - Writes story chapters through a chain of generation backends
//!   (remote service, local model runtime, offline templates)
//! - Decides which chapters end in a two-way choice
//! - Applies the chosen branch's stat effects to the character
//! - Tracks story progression through to completion

pub mod application;
pub mod domain;
pub mod infrastructure;
