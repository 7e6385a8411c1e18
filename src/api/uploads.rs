//! Evidence upload endpoints (multipart upload, blob download).

use reqwest::multipart::{Form, Part};

use super::ApiClient;
use super::client::{require, seg};
use crate::error::AppResult;
use crate::models::UploadResponse;

pub struct UploadsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> UploadsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Upload a file, optionally linking it to a test case.
    pub async fn upload(
        &self,
        file_name: &str,
        data: Vec<u8>,
        test_case_id: Option<&str>,
    ) -> AppResult<UploadResponse> {
        require(file_name, "File name")?;
        let mut form = Form::new().part("File", Part::bytes(data).file_name(file_name.to_string()));
        if let Some(id) = test_case_id.filter(|id| !id.trim().is_empty()) {
            form = form.text("TestCaseId", id.to_string());
        }
        self.client.post_multipart("/uploads", form).await
    }

    pub async fn download(&self, id: &str) -> AppResult<Vec<u8>> {
        require(id, "Upload ID")?;
        self.client
            .get_bytes(&format!("/uploads/{}", seg(id)))
            .await
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        require(id, "Upload ID")?;
        self.client.delete(&format!("/uploads/{}", seg(id))).await
    }
}
