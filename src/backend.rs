use crate::types::{ClassificationRequest, ClassificationResponse};
use anyhow::Result;
use async_trait::async_trait;

/// The service behind `POST /infer`.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    async fn infer(&self, request: ClassificationRequest) -> Result<ClassificationResponse>;
}
