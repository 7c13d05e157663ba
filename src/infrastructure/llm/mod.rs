pub mod offline;
pub mod openai;
