pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::adapters::LocalStorage;
#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::FixerConfig;

pub use crate::core::image::{
    base64_json_to_image, decode_base64_json, failure_diagnostic, save_base64_json_image,
    strip_data_uri_prefix, write_image_bytes, DEFAULT_DATA_KEY,
};
pub use crate::core::{
    engine::Engine, image_pipeline::ImagePipeline, pipeline::NodeFixPipeline,
    rewriter::NodeDefinitionRewriter,
};
pub use crate::domain::model::{FileOutcome, FixSummary, ImageSummary};
pub use crate::utils::error::{FixError, Result};
