//! Fine-tuning workflow commands: upload, tune, status, moderate.
//!
//! Each command issues one request, renders the interesting fields plus the
//! full response JSON, and returns the parsed response.

use std::path::Path;

use serde::Serialize;

use crate::api::ApiClient;
use crate::config::ApiConfig;
use crate::error::{ConfigError, TrainingError};
use crate::types::{
    FileObject, FineTuningJob, FineTuningJobRequest, ModerationRequest, ModerationResponse,
};
use crate::ui::RenderSink;

/// Upload a JSONL training set with `purpose=fine-tune`.
pub async fn upload(
    client: &ApiClient,
    path: &Path,
    renderer: &dyn RenderSink,
) -> Result<FileObject, TrainingError> {
    let contents = tokio::fs::read(path).await.map_err(|source| TrainingError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "training.jsonl".to_string());

    renderer.section(&format!("uploading training set {}", path.display()));
    let file = client.upload_training_file(&file_name, contents).await?;

    renderer.field("id", &file.id);
    render_optional(renderer, "filename", file.filename.as_deref());
    render_optional(renderer, "bytes", file.bytes.map(|b| b.to_string()).as_deref());
    render_optional(renderer, "status", file.status.as_deref());
    render_json(renderer, &file);
    renderer.success("Training set successfully uploaded");
    Ok(file)
}

/// Start a fine-tuning job on an uploaded file.
pub async fn tune(
    client: &ApiClient,
    api: &ApiConfig,
    file_id: &str,
    renderer: &dyn RenderSink,
) -> Result<FineTuningJob, TrainingError> {
    let model = api.training_model.clone().ok_or_else(|| {
        ConfigError::Invalid(
            "api.training_model must be set (or FINETALK_TRAINING_MODEL / OPENAI_TRAINING_MODEL) to start a fine-tuning job"
                .to_string(),
        )
    })?;

    renderer.section(&format!("preparing to tune {file_id}"));
    let job = client
        .create_fine_tuning_job(&FineTuningJobRequest {
            training_file: file_id.trim().to_string(),
            model,
        })
        .await?;

    render_job(renderer, &job);
    renderer.success("Fine tuning job created successfully");
    Ok(job)
}

/// Fetch the current state of a fine-tuning job.
pub async fn status(
    client: &ApiClient,
    job_id: &str,
    renderer: &dyn RenderSink,
) -> Result<FineTuningJob, TrainingError> {
    renderer.section(&format!("checking status of job {job_id}"));
    let job = client.retrieve_fine_tuning_job(job_id).await?;
    render_job(renderer, &job);
    renderer.success("Fine tuning status checked successfully");
    Ok(job)
}

/// Run a moderation check over `text`.
pub async fn moderate(
    client: &ApiClient,
    api: &ApiConfig,
    text: &str,
    renderer: &dyn RenderSink,
) -> Result<ModerationResponse, TrainingError> {
    renderer.section("running moderation check");
    let response = client
        .moderate(&ModerationRequest {
            input: text.to_string(),
            model: api.moderation_model.clone(),
        })
        .await?;

    for result in &response.results {
        renderer.field("flagged", if result.flagged { "yes" } else { "no" });
        let categories = result.flagged_categories();
        if !categories.is_empty() {
            renderer.field("categories", &categories.join(", "));
        }
    }
    render_json(renderer, &response);
    Ok(response)
}

fn render_job(renderer: &dyn RenderSink, job: &FineTuningJob) {
    renderer.field("id", &job.id);
    render_optional(renderer, "status", job.status.as_deref());
    render_optional(renderer, "model", job.model.as_deref());
    render_optional(renderer, "fine_tuned_model", job.fine_tuned_model.as_deref());
    render_optional(
        renderer,
        "trained_tokens",
        job.trained_tokens.map(|t| t.to_string()).as_deref(),
    );
    render_json(renderer, job);
}

fn render_optional(renderer: &dyn RenderSink, key: &str, value: Option<&str>) {
    if let Some(value) = value {
        renderer.field(key, value);
    }
}

fn render_json<T: Serialize>(renderer: &dyn RenderSink, value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => renderer.detail(&json),
        Err(err) => tracing::warn!(error = %err, "failed to render response json"),
    }
}
