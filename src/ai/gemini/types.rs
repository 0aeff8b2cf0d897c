//! Shared types for the fight analysis pipeline

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Breakdown of a single fighter, as seen in their footage
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FighterProfile {
    /// Overall style (e.g. "Pressure boxer with a high guard")
    pub fighting_style: String,

    pub strengths: Vec<String>,

    pub weaknesses: Vec<String>,

    /// Recurring habits (e.g. "Drops the left hand after jabbing")
    pub fighting_habits: Vec<String>,

    /// Typical sequences and rhythms across rounds
    pub fighting_pattern: Vec<String>,
}

/// Predicted outcome of the matchup
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HeadToHead {
    pub prediction: String,

    /// Confidence score (0-100)
    pub confidence: f64,
}

/// Recommended plan for the first-named fighter
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GamePlan {
    pub strategy: String,
    pub key_tactics: Vec<String>,
    pub drills: Vec<String>,
}

/// Complete analysis returned by the provider
///
/// Built in one step from a single response. Every field is required, so a
/// response missing any part fails to deserialize instead of producing a
/// partial result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub fighter_analysis: FighterProfile,
    pub opponent_analysis: FighterProfile,
    pub head_to_head: HeadToHead,
    pub game_plan: GamePlan,
}

/// Base64-encoded file contents tagged with their media type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MediaPayload {
    pub mime_type: String,
    pub data: String,
}

/// An uploaded video and its declared media type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoUpload {
    pub path: PathBuf,
    pub mime_type: String,
}

impl VideoUpload {
    /// Declare a video with an explicit media type
    pub fn new(path: impl Into<PathBuf>, mime_type: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Declare a video, guessing the media type from the file extension
    ///
    /// Unknown extensions fall back to `application/octet-stream`.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mime_type = mime_guess::from_path(&path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Self { path, mime_type }
    }
}

/// Everything needed for one analysis
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub fighter_name: String,
    pub opponent_name: String,
    /// Weight class label, e.g. "Heavyweight (265 lbs)"
    pub weight_class: String,
    pub fighter_video: VideoUpload,
    pub opponent_video: VideoUpload,
}
