//! Fight Analysis Pipeline
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  1. ENCODE: both videos → base64 inline payloads (media)     │
//! │  2. PROMPT: names + weight class instruction (ai::prompts)   │
//! │  3. SCHEMA: four-part result shape (schema)                  │
//! │  4. SEND: one generateContent call (provider)                │
//! │  5. PARSE: strict, all-or-nothing AnalysisResult (client)    │
//! └──────────────────────────────────────────────────────────────┘
//! ```

mod client;
mod error;
mod media;
mod provider;
mod schema;
mod utils;

#[cfg(test)]
mod test_server;

pub mod types;

// Public API - used by commands/analysis.rs and the CLI
pub use client::{parse_analysis_response, FightAnalysisClient};
pub use error::{
    AnalysisError, AnalysisFormatError, EncodingError, ProviderError, FORMAT_ERROR_MESSAGE,
};
pub use media::{encode_bytes, encode_video};
pub use provider::{AnalysisProvider, GeminiProvider, GenerateRequest};
pub use schema::{analysis_result_schema, SchemaNode, SchemaViolation};
pub use types::{
    AnalysisRequest, AnalysisResult, FighterProfile, GamePlan, HeadToHead, MediaPayload,
    VideoUpload,
};
