use poetry_image_core::Software;

/// A list of release identifiers published upstream for one software.
#[allow(async_fn_in_trait)]
pub trait TagSource: Send + Sync {
    fn software(&self) -> Software;

    /// Fetch every tag name, unfiltered and in upstream order.
    async fn fetch_tags(&self) -> Result<Vec<String>, UpstreamError>;
}

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("failed to build HTTP client")]
    Client { source: reqwest::Error },

    #[error("request to {url} failed")]
    Network { url: String, source: reqwest::Error },

    #[error("{url} returned status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("invalid response from {url}")]
    InvalidResponse { url: String, source: reqwest::Error },
}

/// Shared request plumbing: send, check the status, decode JSON.
pub(crate) async fn get_json<T: serde::de::DeserializeOwned>(
    request: reqwest::RequestBuilder,
    url: &str,
) -> Result<T, UpstreamError> {
    tracing::debug!(url, "fetching");
    let response = request.send().await.map_err(|e| UpstreamError::Network {
        url: url.to_owned(),
        source: e,
    })?;

    let status = response.status();
    if !status.is_success() {
        tracing::warn!(url, %status, "unexpected upstream status");
        return Err(UpstreamError::Status {
            url: url.to_owned(),
            status,
        });
    }

    response
        .json()
        .await
        .map_err(|e| UpstreamError::InvalidResponse {
            url: url.to_owned(),
            source: e,
        })
}

pub(crate) fn http_client() -> Result<reqwest::Client, UpstreamError> {
    reqwest::Client::builder()
        .user_agent(concat!("poetry-image/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| UpstreamError::Client { source: e })
}
