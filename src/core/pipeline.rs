use crate::core::rewriter::NodeDefinitionRewriter;
use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::domain::model::{FileFix, FileOutcome, FixBatch, FixSummary};
use crate::utils::error::{FixError, Result};
use std::io::ErrorKind;
use std::panic::{self, AssertUnwindSafe};

/// 掃描原始碼目錄並套用 NodeDefinition 遷移
pub struct NodeFixPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    rewriter: NodeDefinitionRewriter,
}

impl<S: Storage, C: ConfigProvider> NodeFixPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let rewriter =
            NodeDefinitionRewriter::new(&config.disabled_rules()?, config.default_version()?);
        tracing::debug!("Active rules: {:?}", rewriter.rule_kinds());
        Ok(Self {
            storage,
            config,
            rewriter,
        })
    }

    async fn fix_file(&self, path: &str) -> Result<FileFix> {
        tracing::debug!("Fixing file: {}", path);

        let bytes = self.storage.read_file(path).await?;
        let original = String::from_utf8(bytes).map_err(|_| FixError::EncodingError {
            path: path.to_string(),
        })?;

        // 規則本身出錯時只影響這個檔案
        let (rewritten, applied) =
            panic::catch_unwind(AssertUnwindSafe(|| self.rewriter.rewrite(&original))).map_err(
                |_| FixError::ProcessingError {
                    message: format!("rewrite rules panicked on {}", path),
                },
            )?;

        Ok(FileFix {
            path: path.to_string(),
            original,
            rewritten,
            applied,
        })
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for NodeFixPipeline<S, C> {
    type Extracted = Vec<String>;
    type Transformed = FixBatch;
    type Summary = FixSummary;

    async fn extract(&self) -> Result<Vec<String>> {
        let root = self.config.root();
        let extension = self.config.extension();

        match self.storage.list_files(root, extension).await {
            Ok(files) => {
                tracing::info!("Found {} .{} file(s) under {}", files.len(), extension, root);
                Ok(files)
            }
            Err(FixError::FileError { source, .. }) if source.kind() == ErrorKind::NotFound => {
                tracing::warn!("⚠️ Directory {} does not exist, nothing to fix", root);
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    async fn transform(&self, paths: Vec<String>) -> Result<FixBatch> {
        let mut batch = FixBatch::default();

        for path in paths {
            match self.fix_file(&path).await {
                Ok(fix) => batch.files.push(fix),
                Err(e) => {
                    tracing::error!("❌ Failed to fix {}: {}", path, e);
                    batch.failures.push(FileOutcome::Failed {
                        reason: e.to_string(),
                        path,
                    });
                }
            }
        }

        Ok(batch)
    }

    async fn load(&self, batch: FixBatch) -> Result<FixSummary> {
        let dry_run = self.config.dry_run();
        let mut summary = FixSummary {
            scanned: batch.files.len() + batch.failures.len(),
            dry_run,
            ..FixSummary::default()
        };

        for failure in batch.failures {
            summary.record(failure);
        }

        for fix in batch.files {
            if !fix.is_changed() {
                tracing::info!("No changes needed: {}", fix.path);
                summary.record(FileOutcome::Unchanged { path: fix.path });
                continue;
            }

            let outcome = if dry_run {
                tracing::info!("🔍 Would fix: {} ({} site(s))", fix.path, fix.replacements());
                fixed_outcome(&fix)
            } else {
                match self
                    .storage
                    .write_file(&fix.path, fix.rewritten.as_bytes())
                    .await
                {
                    Ok(()) => {
                        tracing::info!("✅ Fixed file: {} ({} site(s))", fix.path, fix.replacements());
                        fixed_outcome(&fix)
                    }
                    Err(e) => {
                        tracing::error!("❌ Failed to write {}: {}", fix.path, e);
                        FileOutcome::Failed {
                            path: fix.path.clone(),
                            reason: e.to_string(),
                        }
                    }
                }
            };
            summary.record(outcome);
        }

        summary.outcomes.sort_by(|a, b| a.path().cmp(b.path()));
        Ok(summary)
    }
}

fn fixed_outcome(fix: &FileFix) -> FileOutcome {
    FileOutcome::Fixed {
        path: fix.path.clone(),
        replacements: fix.replacements(),
        rules: fix.applied.clone(),
    }
}
