pub mod client;
pub mod error;
pub mod record;

pub use client::ApiClient;
pub use error::ClientError;
pub use record::{BacklinkRecord, BacklinksResponse, Balance, MetricMap, MetricValue};
