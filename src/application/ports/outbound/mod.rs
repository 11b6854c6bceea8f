//! Outbound ports - Interfaces that the application requires from external systems

mod generation_port;
mod process_port;
mod repository_port;

pub use generation_port::{BackendOutput, GenerationError, StoryBackend};
pub use process_port::{ProcessError, ProcessOutput, ProcessRunner};
pub use repository_port::StoryStoragePort;
