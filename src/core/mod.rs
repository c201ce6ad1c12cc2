pub mod relay;
pub mod render;
pub mod upstream;

pub use crate::domain::model::{
    DisplayRecord, DownstreamResponse, LimitPolicy, RawQuery, RelayQuery, RenderedOutput,
};
pub use crate::domain::ports::{ConfigProvider, Upstream};
pub use crate::utils::error::Result;
