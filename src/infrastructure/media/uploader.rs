use crate::core::errors::LedgerError;
use crate::infrastructure::media::MediaHost;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

/// Unsigned multipart upload to a Cloudinary-style endpoint.
pub struct HttpMediaHost {
    client: reqwest::Client,
    upload_url: String,
    upload_preset: String,
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: String,
}

impl HttpMediaHost {
    pub fn new(upload_url: String, upload_preset: String) -> Self {
        HttpMediaHost {
            client: reqwest::Client::new(),
            upload_url,
            upload_preset,
        }
    }
}

#[async_trait]
impl MediaHost for HttpMediaHost {
    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<String, LedgerError> {
        if self.upload_url.is_empty() {
            return Err(LedgerError::UploadFailed("media host is not configured".to_string()));
        }
        let form = Form::new()
            .text("upload_preset", self.upload_preset.clone())
            .part("file", Part::bytes(bytes).file_name(file_name.to_string()));

        let response: UploadResponse = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| LedgerError::UploadFailed(e.to_string()))?
            .json()
            .await
            .map_err(|e| LedgerError::UploadFailed(e.to_string()))?;
        Ok(response.secure_url)
    }
}
