pub mod language_model;
pub mod market_data;
