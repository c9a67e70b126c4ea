use bytes::Bytes;
use explainer_logging::{explainer_debug, explainer_info};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;

use crate::types::ErrorBody;
use crate::{
    BackendError, BackendSettings, FailureKind, GenerateResponse, StatusResponse, SubmitRequest,
};

const PDF_MIME: &str = "application/pdf";
const SUBMIT_FAILED: &str = "Failed to submit job.";
const STATUS_FAILED: &str = "Failed to fetch job status.";

/// The HTTP contract of the generation backend.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    /// Uploads the PDF and returns the server-assigned job id.
    async fn submit(&self, request: &SubmitRequest) -> Result<String, BackendError>;

    /// Fetches the current status snapshot of a job.
    async fn status(&self, job_id: &str) -> Result<StatusResponse, BackendError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    settings: BackendSettings,
    client: reqwest::Client,
}

impl ReqwestBackend {
    pub fn new(settings: BackendSettings) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| BackendError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &BackendSettings {
        &self.settings
    }

    async fn build_form(&self, request: &SubmitRequest) -> Result<Form, BackendError> {
        let payload = tokio::fs::read(&request.pdf_path).await.map_err(|err| {
            BackendError::new(
                FailureKind::Io,
                format!("Could not read {}: {err}", request.pdf_path.display()),
            )
        })?;
        let payload = Bytes::from(payload);
        let length = payload.len() as u64;

        let pdf = Part::stream_with_length(payload, length)
            .file_name(request.file_name.clone())
            .mime_str(PDF_MIME)
            .map_err(|err| BackendError::new(FailureKind::Network, err.to_string()))?;

        let mut form = Form::new()
            .part("pdf", pdf)
            .text("api_key", request.api_key.clone());
        if request.use_rag {
            form = form.text("use_rag", "true");
        }
        if let Some(model) = &request.model {
            form = form.text("model", model.clone());
        }
        if let Some(helper_model) = &request.helper_model {
            form = form.text("helper_model", helper_model.clone());
        }
        Ok(form)
    }
}

#[async_trait::async_trait]
impl Backend for ReqwestBackend {
    async fn submit(&self, request: &SubmitRequest) -> Result<String, BackendError> {
        let form = self.build_form(request).await?;
        let url = self.settings.endpoint(&["api", "generate"]);
        explainer_info!("Submitting {} to {}", request.file_name, url);

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let body: GenerateResponse = read_json(response, SUBMIT_FAILED).await?;
        Ok(body.job_id)
    }

    async fn status(&self, job_id: &str) -> Result<StatusResponse, BackendError> {
        let url = self.settings.endpoint(&["api", "status", job_id]);
        explainer_debug!("Polling {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        read_json(response, STATUS_FAILED).await
    }
}

async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
    failure: &str,
) -> Result<T, BackendError> {
    let status = response.status();
    let body = response.bytes().await.map_err(map_reqwest_error)?;

    if !status.is_success() {
        let detail = serde_json::from_slice::<ErrorBody>(&body)
            .ok()
            .and_then(|body| body.detail_text());
        let message = match detail {
            Some(detail) => format!("{failure} {detail}"),
            None => failure.to_string(),
        };
        return Err(BackendError::new(
            FailureKind::HttpStatus(status.as_u16()),
            message,
        ));
    }

    serde_json::from_slice(&body)
        .map_err(|err| BackendError::new(FailureKind::Decode, format!("{failure} {err}")))
}

fn map_reqwest_error(err: reqwest::Error) -> BackendError {
    if err.is_timeout() {
        return BackendError::new(FailureKind::Timeout, err.to_string());
    }
    BackendError::new(FailureKind::Network, err.to_string())
}
