//! Classification requests and the HTTP client that sends them.

use crate::capture::ImageHandle;
use crate::config::EndpointConfig;
use crate::error::ClassifyError;
use anyhow::{Context, Result};
use reqwest::blocking::{Client, multipart};
use serde_json::Value;
use std::fs;

pub const FILE_FIELD: &str = "file";
pub const UPLOAD_FILE_NAME: &str = "image.jpg";
pub const UPLOAD_CONTENT_TYPE: &str = "image/jpeg";

/// One attempt at classifying an image. Built fresh for every retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationRequest {
    image: ImageHandle,
    attempt: u64,
}

impl ClassificationRequest {
    pub fn new(image: &ImageHandle, attempt: u64) -> Self {
        Self {
            image: image.clone(),
            attempt,
        }
    }

    pub fn image(&self) -> &ImageHandle {
        &self.image
    }

    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    /// Multipart body with a single `file` part.
    pub fn to_form(&self) -> Result<multipart::Form, ClassifyError> {
        let bytes = fs::read(self.image.local_path()).map_err(|source| ClassifyError::Image {
            uri: self.image.uri().to_string(),
            source,
        })?;
        let part = multipart::Part::bytes(bytes)
            .file_name(UPLOAD_FILE_NAME)
            .mime_str(UPLOAD_CONTENT_TYPE)?;
        Ok(multipart::Form::new().part(FILE_FIELD, part))
    }
}

/// Remote classification service. Returns the raw JSON body; parsing into a
/// [`crate::ClassificationResult`] happens in the pipeline.
pub trait Classifier: Send + Sync {
    fn classify(&self, request: &ClassificationRequest) -> Result<Value, ClassifyError>;
}

/// `POST <base-url>/predict` over a blocking reqwest client.
pub struct HttpClassifier {
    client: Client,
    url: String,
    include_nutrition: bool,
    include_recipes: bool,
}

impl HttpClassifier {
    pub fn new(cfg: &EndpointConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = cfg.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("cannot build HTTP client")?;
        Ok(Self {
            client,
            url: cfg.predict_url(),
            include_nutrition: cfg.include_nutrition,
            include_recipes: cfg.include_recipes,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Classifier for HttpClassifier {
    fn classify(&self, request: &ClassificationRequest) -> Result<Value, ClassifyError> {
        let form = request.to_form()?;
        tracing::info!(
            "POST {} (attempt {}, image {})",
            self.url,
            request.attempt(),
            request.image().uri()
        );
        let response = self
            .client
            .post(&self.url)
            .query(&[
                ("include_nutrition", self.include_nutrition),
                ("include_recipes", self.include_recipes),
            ])
            .multipart(form)
            .send()
            .map_err(|e| ClassifyError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClassifyError::Status(status.as_u16()));
        }
        let body = response
            .text()
            .map_err(|e| ClassifyError::Transport(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| ClassifyError::Malformed(e.to_string()))
    }
}
