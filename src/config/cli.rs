use crate::config::toml_config::FixerConfig;
use crate::utils::error::Result;
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, Parser)]
#[command(name = "fix-node-definitions")]
#[command(about = "Migrate NodeDefinition builder calls to chained method calls")]
pub struct CliConfig {
    /// Directory to scan (default: src)
    #[arg(long)]
    pub root: Option<String>,

    /// File extension to rewrite, without the dot (default: rs)
    #[arg(long)]
    pub extension: Option<String>,

    /// Optional TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Rules to skip, comma separated
    #[arg(long, value_delimiter = ',')]
    pub disable: Vec<String>,

    /// Version inserted into two-argument NodeDefinition::new calls
    #[arg(long)]
    pub default_version: Option<String>,

    /// Report changes without writing files
    #[arg(long)]
    pub dry_run: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Log process CPU and memory per phase
    #[arg(long)]
    pub monitor: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// 預設值 < TOML 檔 < 命令列參數
    pub fn resolve(&self) -> Result<FixerConfig> {
        let mut config = match &self.config {
            Some(path) => FixerConfig::from_file(path)?,
            None => FixerConfig::default(),
        };

        if let Some(root) = &self.root {
            config.root = root.clone();
        }
        if let Some(extension) = &self.extension {
            config.extension = extension.clone();
        }
        if let Some(version) = &self.default_version {
            config.rules.default_version = version.clone();
        }
        for rule in &self.disable {
            if !config.rules.disabled.contains(rule) {
                config.rules.disabled.push(rule.clone());
            }
        }
        config.dry_run |= self.dry_run;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_no_flags_uses_defaults() {
        let cli = CliConfig::parse_from(["fix-node-definitions"]);
        assert_eq!(cli.resolve().unwrap(), FixerConfig::default());
    }

    #[test]
    fn test_flags_override_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("codefix.toml");
        std::fs::write(
            &config_path,
            "root = \"nodes\"\n[rules]\ndisabled = [\"expand-inputs\"]\ndefault_version = \"3.0.0\"\n",
        )
        .unwrap();

        let cli = CliConfig::parse_from([
            "fix-node-definitions",
            "--config",
            config_path.to_str().unwrap(),
            "--root",
            "other",
            "--disable",
            "expand-inputs,expand-outputs",
            "--dry-run",
        ]);
        let config = cli.resolve().unwrap();

        assert_eq!(config.root, "other");
        assert_eq!(config.extension, "rs");
        assert_eq!(config.rules.default_version, "3.0.0");
        assert_eq!(config.rules.disabled, vec!["expand-inputs", "expand-outputs"]);
        assert!(config.dry_run);
    }
}
