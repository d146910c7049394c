use crate::core::image::decode_base64_json;
use crate::core::{Pipeline, Storage};
use crate::domain::model::ImageSummary;
use crate::utils::error::{FixError, Result};

/// 讀取 JSON 檔、解碼圖片並寫出
pub struct ImagePipeline<S: Storage> {
    storage: S,
    input_path: String,
    output_path: String,
    key: String,
}

impl<S: Storage> ImagePipeline<S> {
    pub fn new(
        storage: S,
        input_path: impl Into<String>,
        output_path: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            input_path: input_path.into(),
            output_path: output_path.into(),
            key: key.into(),
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage> Pipeline for ImagePipeline<S> {
    type Extracted = String;
    type Transformed = Vec<u8>;
    type Summary = ImageSummary;

    async fn extract(&self) -> Result<String> {
        tracing::debug!("Reading JSON document from {}", self.input_path);
        let bytes = self.storage.read_file(&self.input_path).await?;
        String::from_utf8(bytes).map_err(|_| FixError::EncodingError {
            path: self.input_path.clone(),
        })
    }

    async fn transform(&self, json: String) -> Result<Vec<u8>> {
        let image_data = decode_base64_json(&json, &self.key)?;
        tracing::debug!("Decoded {} bytes from field '{}'", image_data.len(), self.key);
        Ok(image_data)
    }

    async fn load(&self, image_data: Vec<u8>) -> Result<ImageSummary> {
        self.storage.write_file(&self.output_path, &image_data).await?;
        tracing::info!("✅ Image saved to {}", self.output_path);

        Ok(ImageSummary {
            output_path: self.output_path.clone(),
            bytes_written: image_data.len(),
        })
    }
}
