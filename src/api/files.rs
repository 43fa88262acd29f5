//! `/files` upload helper.

use reqwest::multipart::{Form, Part};

use super::{read_json, with_bearer};
use crate::error::ApiError;
use crate::types::FileObject;

/// Purpose tag required for fine-tuning training files.
pub(crate) const FINE_TUNE_PURPOSE: &str = "fine-tune";

/// Upload one file as multipart form data.
pub(crate) async fn upload(
    http: &reqwest::Client,
    base_url: &str,
    file_name: &str,
    contents: Vec<u8>,
    purpose: &str,
    bearer: Option<&str>,
) -> Result<FileObject, ApiError> {
    let url = format!("{base_url}/files");
    let form = Form::new()
        .text("purpose", purpose.to_string())
        .part("file", Part::bytes(contents).file_name(file_name.to_string()));
    let response = with_bearer(http.post(&url).multipart(form), bearer)
        .send()
        .await?;
    read_json(response).await
}
