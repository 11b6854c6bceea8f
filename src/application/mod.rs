//! Application layer - Use cases, ports and boundary DTOs

pub mod dto;
pub mod ports;
pub mod services;
