//! `/moderations` helper.

use super::{read_json, with_bearer};
use crate::error::ApiError;
use crate::types::{ModerationRequest, ModerationResponse};

pub(crate) async fn request(
    http: &reqwest::Client,
    base_url: &str,
    request: &ModerationRequest,
    bearer: Option<&str>,
) -> Result<ModerationResponse, ApiError> {
    let url = format!("{base_url}/moderations");
    let response = with_bearer(http.post(&url).json(request), bearer)
        .send()
        .await?;
    let parsed: ModerationResponse = read_json(response).await?;
    if parsed.results.is_empty() {
        return Err(ApiError::InvalidResponse(
            "moderation response contained no results".to_string(),
        ));
    }
    Ok(parsed)
}
