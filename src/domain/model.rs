use crate::core::rules::RuleKind;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AppliedRule {
    pub rule: RuleKind,
    pub replacements: usize,
}

/// 單一檔案在記憶體中的改寫結果
#[derive(Debug, Clone)]
pub struct FileFix {
    pub path: String,
    pub original: String,
    pub rewritten: String,
    pub applied: Vec<AppliedRule>,
}

impl FileFix {
    pub fn is_changed(&self) -> bool {
        self.rewritten != self.original
    }

    pub fn replacements(&self) -> usize {
        self.applied.iter().map(|a| a.replacements).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    Fixed {
        path: String,
        replacements: usize,
        rules: Vec<AppliedRule>,
    },
    Unchanged {
        path: String,
    },
    Failed {
        path: String,
        reason: String,
    },
}

impl FileOutcome {
    pub fn path(&self) -> &str {
        match self {
            FileOutcome::Fixed { path, .. }
            | FileOutcome::Unchanged { path }
            | FileOutcome::Failed { path, .. } => path,
        }
    }
}

/// transform 階段的輸出：成功改寫的檔案與讀取失敗的檔案
#[derive(Debug, Clone, Default)]
pub struct FixBatch {
    pub files: Vec<FileFix>,
    pub failures: Vec<FileOutcome>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FixSummary {
    pub scanned: usize,
    pub fixed: usize,
    pub unchanged: usize,
    pub failed: usize,
    pub dry_run: bool,
    pub outcomes: Vec<FileOutcome>,
}

impl FixSummary {
    pub fn record(&mut self, outcome: FileOutcome) {
        match outcome {
            FileOutcome::Fixed { .. } => self.fixed += 1,
            FileOutcome::Unchanged { .. } => self.unchanged += 1,
            FileOutcome::Failed { .. } => self.failed += 1,
        }
        self.outcomes.push(outcome);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageSummary {
    pub output_path: String,
    pub bytes_written: usize,
}
