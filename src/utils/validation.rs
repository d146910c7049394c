use crate::utils::error::{FixError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(FixError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(FixError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(FixError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// 副檔名不含開頭的點，也不能含路徑分隔符
pub fn validate_extension(field_name: &str, extension: &str) -> Result<()> {
    validate_non_empty_string(field_name, extension)?;

    let reason = if extension.starts_with('.') {
        Some("Extension must not start with a dot")
    } else if extension.contains(['/', '\\', '\0']) {
        Some("Extension contains path separators or null bytes")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(FixError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: extension.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

/// 解析 `MAJOR.MINOR.PATCH` 版本號
pub fn parse_version_triple(field_name: &str, value: &str) -> Result<(u64, u64, u64)> {
    let invalid = || FixError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: "Expected a MAJOR.MINOR.PATCH version such as 1.0.0".to_string(),
    };

    let parts = value
        .trim()
        .split('.')
        .map(|part| part.parse::<u64>().map_err(|_| invalid()))
        .collect::<Result<Vec<_>>>()?;

    match parts.as_slice() {
        [major, minor, patch] => Ok((*major, *minor, *patch)),
        _ => Err(invalid()),
    }
}
