pub mod data_point;
pub mod horizon;
pub mod intent;
pub mod intent_profile;
pub mod lexicon;
pub mod ticker;
pub mod timespan;
