use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Url;

use crate::backend::InferenceBackend;
use crate::config::BackendConfig;
use crate::types::{ClassificationRequest, ClassificationResponse};

pub const INFER_PATH: &str = "infer";

pub struct HttpBackend {
    client: reqwest::Client,
    infer_url: Url,
}

impl HttpBackend {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let mut base = Url::parse(&config.base_url)
            .with_context(|| format!("invalid backend url {:?}", config.base_url))?;
        // Keep any path prefix on the base: `http://h/api` posts to `/api/infer`
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let infer_url = base.join(INFER_PATH)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("failed to build HTTP client")?;

        tracing::debug!(%infer_url, timeout = ?config.timeout, "HTTP backend ready");
        Ok(Self { client, infer_url })
    }

    pub fn infer_url(&self) -> &Url {
        &self.infer_url
    }
}

#[async_trait]
impl InferenceBackend for HttpBackend {
    #[tracing::instrument(skip(self, request), fields(url = %self.infer_url, use_base_model = request.use_base_model))]
    async fn infer(&self, request: ClassificationRequest) -> Result<ClassificationResponse> {
        // `.json` sets `Content-Type: application/json`
        let response = self
            .client
            .post(self.infer_url.clone())
            .json(&request)
            .send()
            .await
            .context("request to inference service failed")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Network response was not ok: {status}");
        }

        let body = response
            .bytes()
            .await
            .context("failed to read inference response body")?;
        let parsed: ClassificationResponse =
            serde_json::from_slice(&body).context("inference response is not valid JSON")?;

        tracing::debug!(status = %status, "Inference response received");
        Ok(parsed)
    }
}
