//! Career Guidance Backend
//!
//! A career guidance site with:
//! - Personality quiz scored across six dimensions
//! - Career category recommendation from pre-trained model artifacts
//! - Mentor questions answered by a local language model

pub mod api;
pub mod config;
pub mod error;
pub mod guidance;
pub mod llm;
pub mod pages;

pub use api::*;
pub use config::ServerConfig;
pub use error::{ApiError, ErrorBody};
