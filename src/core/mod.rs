pub mod engine;
pub mod image;
pub mod image_pipeline;
pub mod pipeline;
pub mod rewriter;
pub mod rules;
pub mod scanner;

pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
