use crate::core::rules::RuleKind;
use crate::core::ConfigProvider;
use crate::utils::error::{FixError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_ROOT: &str = "src";
pub const DEFAULT_EXTENSION: &str = "rs";
pub const DEFAULT_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixerConfig {
    pub root: String,
    pub extension: String,
    pub dry_run: bool,
    pub rules: RulesConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub disabled: Vec<String>,
    pub default_version: String,
}

impl Default for FixerConfig {
    fn default() -> Self {
        Self {
            root: DEFAULT_ROOT.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
            dry_run: false,
            rules: RulesConfig::default(),
        }
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            disabled: Vec::new(),
            default_version: DEFAULT_VERSION.to_string(),
        }
    }
}

impl FixerConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let display = path.as_ref().display().to_string();
        let content = std::fs::read_to_string(&path).map_err(|e| FixError::file(display, e))?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| FixError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SOURCE_ROOT})，找不到的變數保留原樣
    fn substitute_env_vars(content: &str) -> String {
        use once_cell::sync::Lazy;
        use regex::Regex;

        static ENV_VAR: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern"));

        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }
}

impl Validate for FixerConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("root", &self.root)?;
        validation::validate_extension("extension", &self.extension)?;
        self.disabled_rules()?;
        self.default_version()?;
        Ok(())
    }
}

impl ConfigProvider for FixerConfig {
    fn root(&self) -> &str {
        &self.root
    }

    fn extension(&self) -> &str {
        &self.extension
    }

    fn dry_run(&self) -> bool {
        self.dry_run
    }

    fn disabled_rules(&self) -> Result<Vec<RuleKind>> {
        self.rules.disabled.iter().map(|name| name.parse()).collect()
    }

    fn default_version(&self) -> Result<(u64, u64, u64)> {
        validation::parse_version_triple("rules.default_version", &self.rules.default_version)
    }
}
