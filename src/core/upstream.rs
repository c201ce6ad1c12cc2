use crate::core::{ConfigProvider, DownstreamResponse, RelayQuery, Upstream};
use crate::utils::error::{RelayError, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use url::Url;

/// Builds `<base>/<control_list>/<format>?top=<limit>`.
///
/// Values go through the path segment and query encoders, so nothing from
/// the request can change the host or add path components.
pub fn build_downstream_url(base: &Url, query: &RelayQuery) -> Result<Url> {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);

    {
        let mut segments = url.path_segments_mut().map_err(|_| RelayError::ConfigError {
            message: format!("API base '{}' cannot carry a path", base),
        })?;
        segments
            .pop_if_empty()
            .push(query.control_list.as_str())
            .push(query.format.as_str());
    }

    if let Some(limit) = query.limit {
        url.query_pairs_mut()
            .append_pair("top", &limit.to_string());
    }

    Ok(url)
}

/// `Upstream` backed by the brevet REST API over HTTP.
#[derive(Debug, Clone)]
pub struct HttpUpstream {
    client: Client,
    api_base: Url,
}

impl HttpUpstream {
    pub fn new<C: ConfigProvider>(config: &C) -> Result<Self> {
        let api_base = Url::parse(config.api_base())?;
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent())
            .build()?;

        Ok(Self { client, api_base })
    }

    pub fn api_base(&self) -> &Url {
        &self.api_base
    }
}

#[async_trait::async_trait]
impl Upstream for HttpUpstream {
    async fn fetch(&self, query: &RelayQuery) -> Result<DownstreamResponse> {
        let url = build_downstream_url(&self.api_base, query)?;

        tracing::debug!("Making upstream request to: {}", url);
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        tracing::debug!("Upstream response status: {}", status);

        if !status.is_success() {
            return Err(RelayError::UpstreamStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await?;
        tracing::debug!("Upstream body: {} bytes", body.len());

        Ok(DownstreamResponse {
            url: url.to_string(),
            status: status.as_u16(),
            content_type,
            body,
        })
    }
}
