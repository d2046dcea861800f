pub mod logging;
pub use logging::{default_level, init_stdout_logger, level_from_env, StdoutLogger};

mod rect;
pub use rect::*;

mod tensor;
pub use tensor::*;

mod vec2;
pub use vec2::*;

mod vec3;
pub use vec3::*;

// Re-export log crate so downstream crates can use base::log::*
pub use log;
