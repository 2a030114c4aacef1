//! HTTP client for the Azure Computer Vision v3.2 REST API.

use async_trait::async_trait;
use pipeline::{AnalysisError, Caption, ImageAnalyzer, ImageUrl, Tag, VisionRowError};
use serde::de::DeserializeOwned;

use crate::responses::{caption_from, tags_from, AnalyzeResponse, DescribeResponse};

/// Request header carrying the subscription key.
const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Transport-level ceiling, well above the pipeline's per-record race. The
/// race owns responsiveness; this only stops a dead connection from holding a
/// socket forever.
const TRANSPORT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// [`ImageAnalyzer`] backed by the Azure Computer Vision v3.2 REST API.
///
/// One client is shared across the whole run; `reqwest::Client` pools
/// connections internally.
pub struct AzureVisionClient {
    http: reqwest::Client,
    endpoint: String,
    key: String,
}

impl AzureVisionClient {
    /// Creates a client for `endpoint`, authenticating with `key`.
    ///
    /// `endpoint` is the service base URL (e.g.
    /// `https://myresource.cognitiveservices.azure.com`); a trailing slash is
    /// tolerated.
    pub fn new(endpoint: &str, key: &str) -> Result<Self, VisionRowError> {
        if endpoint.is_empty() {
            return Err(VisionRowError::Configuration {
                message: "analysis service endpoint is empty".into(),
            });
        }
        if key.is_empty() {
            return Err(VisionRowError::Configuration {
                message: "analysis service subscription key is empty".into(),
            });
        }

        let http = reqwest::Client::builder()
            .timeout(TRANSPORT_TIMEOUT)
            .build()
            .map_err(|e| VisionRowError::Configuration {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            key: key.to_string(),
        })
    }

    /// Issues one analysis POST with the image URL as the JSON body.
    async fn post<T: DeserializeOwned>(
        &self,
        path_and_query: &str,
        url: &ImageUrl,
    ) -> Result<T, AnalysisError> {
        tracing::debug!(image = url.file_name(), path = path_and_query, "issuing analysis request");
        let response = self
            .http
            .post(format!("{}/{path_and_query}", self.endpoint))
            .header(SUBSCRIPTION_KEY_HEADER, self.key.as_str())
            .json(&serde_json::json!({ "url": url.as_str() }))
            .send()
            .await
            .map_err(|e| AnalysisError::Transport {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnalysisError::Service {
                status: status.as_u16(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AnalysisError::MalformedResponse {
                message: e.to_string(),
            })
    }
}

#[async_trait]
impl ImageAnalyzer for AzureVisionClient {
    async fn describe(&self, url: &ImageUrl) -> Result<Caption, AnalysisError> {
        let response: DescribeResponse = self
            .post("vision/v3.2/describe?maxCandidates=1", url)
            .await?;
        caption_from(response)
    }

    async fn tag(&self, url: &ImageUrl) -> Result<Vec<Tag>, AnalysisError> {
        let response: AnalyzeResponse = self
            .post("vision/v3.2/analyze?visualFeatures=Tags", url)
            .await?;
        tags_from(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_endpoint_and_key() {
        assert!(matches!(
            AzureVisionClient::new("", "secret"),
            Err(VisionRowError::Configuration { .. })
        ));
        assert!(matches!(
            AzureVisionClient::new("https://example.cognitiveservices.azure.com", ""),
            Err(VisionRowError::Configuration { .. })
        ));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client =
            AzureVisionClient::new("https://example.cognitiveservices.azure.com/", "secret")
                .unwrap();
        assert_eq!(
            client.endpoint,
            "https://example.cognitiveservices.azure.com"
        );
    }
}
