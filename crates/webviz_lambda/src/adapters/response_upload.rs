use reqwest::header::CONTENT_TYPE;

pub trait ResponseUploader {
    fn upload(&self, url: &str, body: &[u8]) -> Result<(), String>;
}

/// Uploads provisioning responses to pre-signed CloudFormation URLs.
#[derive(Clone, Default)]
pub struct HttpResponseUploader {
    client: reqwest::Client,
}

impl HttpResponseUploader {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl ResponseUploader for HttpResponseUploader {
    fn upload(&self, url: &str, body: &[u8]) -> Result<(), String> {
        // The pre-signed URL is signed without a content type.
        let request = self
            .client
            .put(url)
            .header(CONTENT_TYPE, "")
            .body(body.to_vec());

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let response = request
                    .send()
                    .await
                    .map_err(|error| format!("failed to upload provisioning response: {error}"))?;
                let status = response.status();
                if status.is_success() {
                    Ok(())
                } else {
                    Err(format!(
                        "provisioning response upload returned HTTP {status}"
                    ))
                }
            })
        })
    }
}
