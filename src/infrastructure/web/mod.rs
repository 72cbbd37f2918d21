pub mod executor;
pub mod payload;
pub mod query;
pub mod transport;
