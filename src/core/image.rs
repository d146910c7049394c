//! 從 JSON 文件取出 Base64 圖片並寫成檔案。

use crate::utils::error::{FixError, Result};
use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::path::Path;

/// 圖片資料預設所在的欄位
pub const DEFAULT_DATA_KEY: &str = "b64_json";

static DATA_URI_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^data:image/[\w.+-]+;base64,").expect("data uri pattern"));

/// 移除 `data:image/<type>;base64,` 前綴，沒有前綴時原樣回傳
pub fn strip_data_uri_prefix(payload: &str) -> &str {
    match DATA_URI_PREFIX.find(payload) {
        Some(prefix) => &payload[prefix.end()..],
        None => payload,
    }
}

/// 解析 JSON、取出欄位並以標準 Base64 解碼
pub fn decode_base64_json(json: &str, key: &str) -> Result<Vec<u8>> {
    let data: Value = serde_json::from_str(json)?;

    let payload = data
        .get(key)
        .ok_or_else(|| FixError::MissingFieldError {
            key: key.to_string(),
        })?
        .as_str()
        .ok_or_else(|| FixError::FieldTypeError {
            key: key.to_string(),
        })?;

    Ok(BASE64_STANDARD.decode(strip_data_uri_prefix(payload))?)
}

/// 以二進位模式寫出圖片資料
pub fn write_image_bytes(image_data: &[u8], output_path: impl AsRef<Path>) -> Result<()> {
    let output_path = output_path.as_ref();
    std::fs::write(output_path, image_data)
        .map_err(|e| FixError::file(output_path.display().to_string(), e))
}

pub fn base64_json_to_image(json: &str, output_path: impl AsRef<Path>, key: &str) -> Result<()> {
    let image_data = decode_base64_json(json, key)?;
    write_image_bytes(&image_data, &output_path)?;
    tracing::info!(
        "Image saved to {} ({} bytes)",
        output_path.as_ref().display(),
        image_data.len()
    );
    Ok(())
}

/// 失敗時的診斷訊息
pub fn failure_diagnostic(error: &FixError) -> String {
    format!(
        "❌ {} (Category: {:?})",
        error.user_friendly_message(),
        error.category()
    )
}

/// 失敗時輸出診斷訊息並回傳 false，不往外傳遞錯誤。
/// 沒有安裝全域 subscriber 時改寫到 stderr。
pub fn save_base64_json_image(json: &str, output_path: impl AsRef<Path>, key: &str) -> bool {
    match base64_json_to_image(json, output_path, key) {
        Ok(()) => true,
        Err(e) => {
            let diagnostic = failure_diagnostic(&e);
            if tracing::dispatcher::has_been_set() {
                tracing::error!("{}", diagnostic);
                tracing::debug!("💡 {}", e.recovery_suggestion());
            } else {
                eprintln!("{}", diagnostic);
                eprintln!("💡 {}", e.recovery_suggestion());
            }
            false
        }
    }
}
