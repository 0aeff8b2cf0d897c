pub mod config;
pub mod gemini;
pub mod http_client;
pub mod prompts;

pub use config::*;
pub use gemini::*;
