pub mod acquire;
pub mod aggregate;
pub mod config;
pub mod error;
pub mod facets;
pub mod features;
pub mod loader;
pub mod output;
pub mod pipeline;
pub mod reshape;
