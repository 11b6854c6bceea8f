//! Domain layer - Core story rules with no external dependencies
//!
//! This layer contains:
//! - Entities: Character, Story, Chapter
//! - Value Objects: stats, choice sets, identifiers, story settings
//! - Domain Services: choice policy and progression tracking

pub mod entities;
pub mod services;
pub mod value_objects;
