//! Analysis Commands
//!
//! The front-end side of an analysis: checks what the user submitted
//! (upload size and type, weight class, file presence) before handing it to the
//! client, and maps the outcome to something the UI can show.

use crate::ai::gemini::{
    AnalysisError, AnalysisProvider, AnalysisRequest, AnalysisResult, FightAnalysisClient,
    VideoUpload,
};
use crate::weight_class::WeightClass;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Maximum accepted upload size per video (50 MB)
pub const MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

/// Generic headline shown for any failed analysis
pub const FAILURE_HEADLINE: &str = "Analysis failed. Please try again.";

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

/// What the user filled in
#[derive(Debug, Clone, Default)]
pub struct AnalysisForm {
    pub fighter_name: String,
    pub opponent_name: String,
    pub weight_class: String,
    pub fighter_video: PathBuf,
    pub opponent_video: PathBuf,
}

/// Analysis response for the UI
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub fighter_name: String,
    pub opponent_name: String,
    pub weight_class: String,
    pub analysis: AnalysisResult,
}

/// Check a chosen video against the upload rules
///
/// The file must exist, fit the size limit, and have a `video/*` type as
/// guessed from its extension.
pub async fn validate_upload(path: &Path) -> Result<VideoUpload, CommandError> {
    let metadata = tokio::fs::metadata(path).await.map_err(|e| {
        CommandError::Validation(format!("Cannot open video {}: {}", path.display(), e))
    })?;

    if !metadata.is_file() {
        return Err(CommandError::Validation(format!(
            "{} is not a file",
            path.display()
        )));
    }

    if metadata.len() > MAX_UPLOAD_BYTES {
        return Err(CommandError::Validation(format!(
            "{} is {:.1} MB; videos must be 50 MB or smaller",
            path.display(),
            metadata.len() as f64 / (1024.0 * 1024.0)
        )));
    }

    let upload = VideoUpload::from_path(path);
    if !upload.mime_type.starts_with("video/") {
        return Err(CommandError::Validation(format!(
            "{} does not look like a video ({})",
            path.display(),
            upload.mime_type
        )));
    }

    Ok(upload)
}

/// Resolve the weight class to its canonical label
pub fn validate_weight_class(input: &str) -> Result<String, CommandError> {
    WeightClass::from_label(input)
        .map(|class| class.label())
        .ok_or_else(|| {
            CommandError::Validation(format!(
                "Unknown weight class {:?}; choose one of the listed classes",
                input
            ))
        })
}

/// Validate the form and run the analysis
pub async fn run_analysis<P: AnalysisProvider>(
    client: &FightAnalysisClient<P>,
    form: AnalysisForm,
) -> Result<AnalysisReport, CommandError> {
    let weight_class = validate_weight_class(&form.weight_class)?;
    let fighter_video = validate_upload(&form.fighter_video).await?;
    let opponent_video = validate_upload(&form.opponent_video).await?;

    let request = AnalysisRequest {
        fighter_name: form.fighter_name.clone(),
        opponent_name: form.opponent_name.clone(),
        weight_class: weight_class.clone(),
        fighter_video,
        opponent_video,
    };

    let analysis = client.analyze(request).await.map_err(|e| {
        warn!(error = %e, "Analysis failed");
        e
    })?;

    Ok(AnalysisReport {
        fighter_name: form.fighter_name,
        opponent_name: form.opponent_name,
        weight_class,
        analysis,
    })
}
