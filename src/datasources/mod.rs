pub mod sentinelhub;

pub use sentinelhub::{NdviRequest, SentinelHubClient};
