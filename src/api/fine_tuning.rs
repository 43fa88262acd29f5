//! `/fine_tuning/jobs` helpers.

use super::{read_json, with_bearer};
use crate::error::ApiError;
use crate::types::{FineTuningJob, FineTuningJobRequest};

pub(crate) async fn create(
    http: &reqwest::Client,
    base_url: &str,
    request: &FineTuningJobRequest,
    bearer: Option<&str>,
) -> Result<FineTuningJob, ApiError> {
    let url = format!("{base_url}/fine_tuning/jobs");
    let response = with_bearer(http.post(&url).json(request), bearer)
        .send()
        .await?;
    read_json(response).await
}

pub(crate) async fn retrieve(
    http: &reqwest::Client,
    base_url: &str,
    job_id: &str,
    bearer: Option<&str>,
) -> Result<FineTuningJob, ApiError> {
    let url = format!("{base_url}/fine_tuning/jobs/{}", job_id.trim());
    let response = with_bearer(http.get(&url), bearer).send().await?;
    read_json(response).await
}
