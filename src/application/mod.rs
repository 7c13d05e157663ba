pub mod ask;
pub mod data_report;
pub mod decode;
pub mod digest;
pub mod fetch;
pub mod format;
pub mod interpret;
pub mod synthesize;
pub mod validate;
