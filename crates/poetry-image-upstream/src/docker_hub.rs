//! Python releases, read from the official image's tag list on Docker Hub.
//!
//! The registry needs a pull token even for public repositories, so every
//! fetch is two requests: token, then `tags/list`.

use poetry_image_core::Software;
use serde::Deserialize;

use crate::source::{TagSource, UpstreamError, get_json, http_client};

#[derive(Debug, Deserialize)]
struct Token {
    token: String,
}

#[derive(Debug, Deserialize)]
struct TagList {
    #[serde(default)]
    tags: Vec<String>,
}

pub struct DockerHubTags {
    client: reqwest::Client,
    auth_url: String,
    registry_url: String,
    repository: String,
}

impl DockerHubTags {
    pub fn new(
        auth_url: &str,
        registry_url: &str,
        repository: &str,
    ) -> Result<Self, UpstreamError> {
        Ok(Self {
            client: http_client()?,
            auth_url: auth_url.trim_end_matches('/').to_owned(),
            registry_url: registry_url.trim_end_matches('/').to_owned(),
            repository: repository.to_owned(),
        })
    }

    async fn pull_token(&self) -> Result<String, UpstreamError> {
        let url = format!("{}/token", self.auth_url);
        let scope = format!("repository:{}:pull", self.repository);
        let request = self
            .client
            .get(&url)
            .query(&[("service", "registry.docker.io"), ("scope", scope.as_str())]);
        let token: Token = get_json(request, &url).await?;
        Ok(token.token)
    }
}

impl TagSource for DockerHubTags {
    fn software(&self) -> Software {
        Software::Python
    }

    async fn fetch_tags(&self) -> Result<Vec<String>, UpstreamError> {
        let token = self.pull_token().await?;
        let url = format!("{}/v2/{}/tags/list", self.registry_url, self.repository);
        let request = self.client.get(&url).bearer_auth(token);
        let list: TagList = get_json(request, &url).await?;
        Ok(list.tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn token_query() -> Matcher {
        Matcher::AllOf(vec![
            Matcher::UrlEncoded("service".into(), "registry.docker.io".into()),
            Matcher::UrlEncoded("scope".into(), "repository:library/python:pull".into()),
        ])
    }

    #[tokio::test]
    async fn fetch_tags_exchanges_token_then_lists_tags() {
        let mut server = Server::new_async().await;

        let token = server
            .mock("GET", "/token")
            .match_query(token_query())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"token": "abc123", "expires_in": 300}"#)
            .create_async()
            .await;
        let list = server
            .mock("GET", "/v2/library/python/tags/list")
            .match_header("authorization", "Bearer abc123")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"name": "library/python", "tags": ["3.11.4", "3.11.4-slim", "3.12.0rc1", "latest"]}"#,
            )
            .create_async()
            .await;

        let source = DockerHubTags::new(&server.url(), &server.url(), "library/python").unwrap();
        let tags = source.fetch_tags().await.unwrap();

        token.assert_async().await;
        list.assert_async().await;
        assert_eq!(tags, ["3.11.4", "3.11.4-slim", "3.12.0rc1", "latest"]);
        assert_eq!(source.software(), Software::Python);
    }

    #[tokio::test]
    async fn failed_token_request_skips_tag_list() {
        let mut server = Server::new_async().await;

        let token = server
            .mock("GET", "/token")
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;
        let list = server
            .mock("GET", "/v2/library/python/tags/list")
            .expect(0)
            .create_async()
            .await;

        let source = DockerHubTags::new(&server.url(), &server.url(), "library/python").unwrap();
        let result = source.fetch_tags().await;

        token.assert_async().await;
        list.assert_async().await;
        let Err(UpstreamError::Status { url, status }) = result else {
            panic!("expected Status error, got {result:?}");
        };
        assert!(url.ends_with("/token"));
        assert_eq!(status, reqwest::StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn unauthorized_tag_list_is_an_error() {
        let mut server = Server::new_async().await;

        let _token = server
            .mock("GET", "/token")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"token": "expired"}"#)
            .create_async()
            .await;
        let list = server
            .mock("GET", "/v2/library/python/tags/list")
            .with_status(401)
            .create_async()
            .await;

        let source = DockerHubTags::new(&server.url(), &server.url(), "library/python").unwrap();
        let result = source.fetch_tags().await;

        list.assert_async().await;
        assert!(matches!(result, Err(UpstreamError::Status { .. })));
    }

    #[tokio::test]
    async fn missing_tags_field_is_empty() {
        let mut server = Server::new_async().await;

        let _token = server
            .mock("GET", "/token")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"token": "abc"}"#)
            .create_async()
            .await;
        let _list = server
            .mock("GET", "/v2/library/python/tags/list")
            .with_status(200)
            .with_body(r#"{"name": "library/python"}"#)
            .create_async()
            .await;

        let source = DockerHubTags::new(&server.url(), &server.url(), "library/python").unwrap();
        assert!(source.fetch_tags().await.unwrap().is_empty());
    }
}
