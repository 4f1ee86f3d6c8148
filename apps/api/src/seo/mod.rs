pub mod audit;
pub mod handlers;
pub mod store;
