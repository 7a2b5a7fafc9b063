//! Poetry releases, read from the GitHub tags API.

use poetry_image_core::Software;
use serde::Deserialize;

use crate::source::{TagSource, UpstreamError, get_json, http_client};

#[derive(Debug, Deserialize)]
struct Tag {
    name: String,
}

pub struct GitHubTags {
    client: reqwest::Client,
    base_url: String,
    repository: String,
    token: Option<String>,
}

impl GitHubTags {
    pub fn new(base_url: &str, repository: &str) -> Result<Self, UpstreamError> {
        Ok(Self {
            client: http_client()?,
            base_url: base_url.trim_end_matches('/').to_owned(),
            repository: repository.to_owned(),
            token: None,
        })
    }

    /// Authenticate requests, lifting the anonymous rate limit.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }
}

impl TagSource for GitHubTags {
    fn software(&self) -> Software {
        Software::Poetry
    }

    async fn fetch_tags(&self) -> Result<Vec<String>, UpstreamError> {
        let url = format!("{}/repos/{}/tags", self.base_url, self.repository);
        let mut request = self
            .client
            .get(&url)
            .query(&[("per_page", "100")])
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let tags: Vec<Tag> = get_json(request, &url).await?;
        Ok(tags.into_iter().map(|t| t.name).collect())
    }
}
