pub mod config;
pub mod context;
pub mod error;
pub mod host;
pub mod repository;
pub mod scheduler;
pub mod source;
pub mod store;
pub mod system;
pub mod task;
pub mod validate;
pub mod version;
