use crate::domain::model::{DownstreamResponse, LimitPolicy, RelayQuery};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Source of control list data for a relay.
#[async_trait]
pub trait Upstream: Send + Sync {
    async fn fetch(&self, query: &RelayQuery) -> Result<DownstreamResponse>;
}

pub trait ConfigProvider: Send + Sync {
    fn api_base(&self) -> &str;
    fn bind_address(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    fn user_agent(&self) -> &str;
    fn limit_policy(&self) -> LimitPolicy;
}
