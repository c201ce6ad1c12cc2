use crate::core::render::render;
use crate::core::{LimitPolicy, RawQuery, RelayQuery, RenderedOutput, Upstream};
use crate::utils::error::Result;

/// Forwards one validated query upstream and renders the answer.
pub struct RelayEngine<U: Upstream> {
    upstream: U,
    limit_policy: LimitPolicy,
}

impl<U: Upstream> RelayEngine<U> {
    pub fn new(upstream: U) -> Self {
        Self::with_limit_policy(upstream, LimitPolicy::default())
    }

    pub fn with_limit_policy(upstream: U, limit_policy: LimitPolicy) -> Self {
        Self {
            upstream,
            limit_policy,
        }
    }

    pub fn limit_policy(&self) -> LimitPolicy {
        self.limit_policy
    }

    pub fn parse_query(&self, raw: &RawQuery) -> Result<RelayQuery> {
        RelayQuery::parse(raw, self.limit_policy)
    }

    pub async fn relay(&self, query: &RelayQuery) -> Result<RenderedOutput> {
        let response = self.upstream.fetch(query).await?;

        tracing::info!(
            control_list = %query.control_list,
            format = %query.format,
            status = response.status,
            bytes = response.body.len(),
            "Relayed {}",
            response.url
        );

        Ok(render(query.format, &response.body))
    }

    /// Parses raw form input and relays it.
    pub async fn relay_raw(&self, raw: &RawQuery) -> Result<(RelayQuery, RenderedOutput)> {
        let query = self.parse_query(raw)?;
        let output = self.relay(&query).await?;
        Ok((query, output))
    }
}
