use async_trait::async_trait;
use serde::Deserialize;

/// Result reported by the image host. `success: false` with a 200 response
/// is a normal outcome and must abort the enclosing submission.
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub success: bool,
    pub url: Option<String>,
}

#[async_trait]
pub trait MediaUploader: Send + Sync {
    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> anyhow::Result<UploadOutcome>;
}

#[derive(Deserialize)]
struct ImgbbResponse {
    success: bool,
    data: Option<ImgbbData>,
}

#[derive(Deserialize)]
struct ImgbbData {
    url: String,
}

/// ImgBB-style image host client: multipart POST with the API key in the
/// query string. No request timeout is configured, matching the store client.
pub struct ImgbbUploader {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl ImgbbUploader {
    pub fn new(endpoint: &str, api_key: &str) -> Self {
        ImgbbUploader {
            client: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl MediaUploader for ImgbbUploader {
    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> anyhow::Result<UploadOutcome> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new().part("image", part);

        let resp = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;

        let body: ImgbbResponse = resp.json().await?;
        Ok(UploadOutcome {
            success: body.success,
            url: body.data.map(|d| d.url),
        })
    }
}
