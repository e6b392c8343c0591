//! Common utilities module
//!
//! This module contains the error type shared by the pipeline, the store and the service.

pub mod error;

pub use error::{PipelineError, Result};
