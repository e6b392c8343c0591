pub mod config;
pub mod image_pipeline;
pub mod logger;
pub mod metadata;
pub mod server;
pub mod service;
pub mod store;

#[cfg(test)]
mod test_helpers;
