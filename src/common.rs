pub mod error;
pub mod pagination;
pub mod time;
