pub mod agent;
pub mod capture;
pub mod error;
pub mod executor;
