//! GitHub contents API client.

use std::fmt;

use async_trait::async_trait;
use reqwest::{header, RequestBuilder};
use serde::Deserialize;

use super::{
    parse_response, status_error, ContentApi, PutFileRequest, RemoteError, RemoteFile,
    RemoteResult,
};
use crate::config::StoreConfig;
use crate::util::{is_http_url, normalize_text_option};

const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";
const USER_AGENT: &str = concat!("roster/", env!("CARGO_PKG_VERSION"));

/// Reads and writes repository files through `/repos/{repo}/contents/{path}`.
#[derive(Clone)]
pub struct GitHubContentsClient {
    base_url: String,
    repository: String,
    token: String,
    client: reqwest::Client,
}

impl fmt::Debug for GitHubContentsClient {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("GitHubContentsClient")
            .field("base_url", &self.base_url)
            .field("repository", &self.repository)
            .field("token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl GitHubContentsClient {
    pub fn new(config: &StoreConfig) -> RemoteResult<Self> {
        let base_url = normalize_base_url(&config.api_base_url)?;
        let repository = normalize_repository(&config.repository)?;
        let token = normalize_text_option(Some(config.token.clone())).ok_or_else(|| {
            RemoteError::InvalidConfiguration("access token must not be empty".to_string())
        })?;
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            base_url,
            repository,
            token,
            client,
        })
    }

    /// Contents URL for a file, with each path segment percent-encoded.
    pub fn contents_url(&self, path: &str) -> String {
        let encoded = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        format!(
            "{}/repos/{}/contents/{encoded}",
            self.base_url, self.repository
        )
    }

    fn get_request(&self, path: &str) -> RequestBuilder {
        self.authorized(self.client.get(self.contents_url(path)))
    }

    fn put_request(&self, path: &str, request: &PutFileRequest) -> RequestBuilder {
        self.authorized(self.client.put(self.contents_url(path)))
            .json(request)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header(header::AUTHORIZATION, format!("token {}", self.token))
            .header(header::ACCEPT, GITHUB_ACCEPT)
    }
}

#[async_trait]
impl ContentApi for GitHubContentsClient {
    async fn get_file(&self, path: &str) -> RemoteResult<RemoteFile> {
        tracing::debug!("GET {} from {}", path, self.repository);
        let response = self.get_request(path).send().await?;
        let status = response.status();
        let body = response.text().await?;

        parse_response::<ContentsResponse>(path, status, &body)?.try_into()
    }

    async fn get_version(&self, path: &str) -> RemoteResult<String> {
        tracing::debug!("GET revision of {} from {}", path, self.repository);
        let response = self.get_request(path).send().await?;
        let status = response.status();
        let body = response.text().await?;

        Ok(parse_response::<RevisionResponse>(path, status, &body)?.sha)
    }

    async fn put_file(&self, path: &str, request: &PutFileRequest) -> RemoteResult<()> {
        tracing::debug!(
            "PUT {} to {} (replacing {})",
            path,
            self.repository,
            request.sha.as_deref().unwrap_or("nothing")
        );
        let response = self.put_request(path, request).send().await?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        status_error(path, status, &body).map_or(Ok(()), Err)
    }
}

/// Revision metadata. Files over 1 MB come back with `encoding: "none"` and
/// no content, but still carry their `sha`.
#[derive(Debug, Deserialize)]
struct RevisionResponse {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct ContentsResponse {
    sha: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    encoding: Option<String>,
}

impl TryFrom<ContentsResponse> for RemoteFile {
    type Error = RemoteError;

    fn try_from(value: ContentsResponse) -> RemoteResult<Self> {
        if let Some(encoding) = value.encoding.as_deref() {
            if encoding != "base64" {
                return Err(RemoteError::InvalidPayload(format!(
                    "unsupported content encoding '{encoding}'"
                )));
            }
        }
        let content = value.content.ok_or_else(|| {
            RemoteError::InvalidPayload("response did not include content".to_string())
        })?;

        Ok(Self {
            content,
            sha: value.sha,
        })
    }
}

fn normalize_base_url(raw: &str) -> RemoteResult<String> {
    let url = normalize_text_option(Some(raw.to_string())).ok_or_else(|| {
        RemoteError::InvalidConfiguration("API base URL must not be empty".to_string())
    })?;
    if is_http_url(&url) {
        Ok(url.trim_end_matches('/').to_string())
    } else {
        Err(RemoteError::InvalidConfiguration(
            "API base URL must include http:// or https://".to_string(),
        ))
    }
}

fn normalize_repository(raw: &str) -> RemoteResult<String> {
    let repository = raw.trim().trim_matches('/');
    match repository.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
            Ok(repository.to_string())
        }
        _ => Err(RemoteError::InvalidConfiguration(format!(
            "repository '{repository}' must be in owner/name form"
        ))),
    }
}
