pub mod market_status;
pub mod query;
pub mod report;
pub mod snapshot;
