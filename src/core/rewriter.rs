use crate::core::rules::{
    DropVersionCall, ExpandList, FinishBuilder, RewriteRule, RuleKind, UnwrapBaseDefinition,
    VersionArgument,
};
use crate::domain::model::AppliedRule;

/// 依固定順序套用 NodeDefinition 遷移規則
pub struct NodeDefinitionRewriter {
    rules: Vec<Box<dyn RewriteRule>>,
}

impl NodeDefinitionRewriter {
    pub fn new(disabled: &[RuleKind], default_version: (u64, u64, u64)) -> Self {
        let rules = RuleKind::ALL
            .into_iter()
            .filter(|kind| !disabled.contains(kind))
            .map(|kind| -> Box<dyn RewriteRule> {
                match kind {
                    RuleKind::DropVersionCall => Box::new(DropVersionCall),
                    RuleKind::ExpandInputs => Box::new(ExpandList::inputs()),
                    RuleKind::ExpandOutputs => Box::new(ExpandList::outputs()),
                    RuleKind::ExpandProperties => Box::new(ExpandList::properties()),
                    RuleKind::FinishKindOptionsBuilder => Box::new(FinishBuilder::kind_options()),
                    RuleKind::FinishPropertyBuilder => Box::new(FinishBuilder::property()),
                    RuleKind::UnwrapBaseDefinition => Box::new(UnwrapBaseDefinition),
                    RuleKind::VersionArgument => Box::new(VersionArgument::new(default_version)),
                }
            })
            .collect();

        Self { rules }
    }

    pub fn rule_kinds(&self) -> Vec<RuleKind> {
        self.rules.iter().map(|rule| rule.kind()).collect()
    }

    /// 回傳改寫後的文字與實際生效的規則
    pub fn rewrite(&self, text: &str) -> (String, Vec<AppliedRule>) {
        let mut current = text.to_string();
        let mut applied = Vec::new();

        for rule in &self.rules {
            let result = rule.apply(&current);
            if result.replacements > 0 {
                tracing::debug!("rule {} matched {} site(s)", rule.kind(), result.replacements);
                applied.push(AppliedRule {
                    rule: rule.kind(),
                    replacements: result.replacements,
                });
                current = result.text;
            }
        }

        (current, applied)
    }
}

impl Default for NodeDefinitionRewriter {
    fn default() -> Self {
        Self::new(&[], (1, 0, 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEGACY: &str = r#"use crate::prelude::*;

pub fn create_definition() -> Result<NodeDefinition, ValidationError> {
    let base = NodeDefinition::new("http_request", "HTTP Request")
        .version(Version::new(1, 0, 0))
        .inputs([InputPortConfig::new(ConnectionKind::Main, "Input")])
        .outputs([OutputPortConfig::new(ConnectionKind::Main, "Output"), OutputPortConfig::new(ConnectionKind::Error, "Error")])
        .properties([
            NodeProperty::builder()
                .name("url")
                .kind(NodePropertyKind::String),
            NodeProperty::builder()
                .name("method")
                .kind_options(NodePropertyKindOptions::builder().options(vec!["GET", "POST"]))
                .build(),
        ]);
    let definition = base?;
    Ok(definition)
}
"#;

    const MIGRATED: &str = r#"use crate::prelude::*;

pub fn create_definition() -> Result<NodeDefinition, ValidationError> {
    let base = NodeDefinition::new("http_request", "HTTP Request", Version::new(1, 0, 0))
        .add_input(InputPortConfig::new(ConnectionKind::Main, "Input"))
        .add_output(OutputPortConfig::new(ConnectionKind::Main, "Output")).add_output(OutputPortConfig::new(ConnectionKind::Error, "Error"))
        .add_property(NodeProperty::builder()
                .name("url")
                .kind(NodePropertyKind::String).build()).add_property(NodeProperty::builder()
                .name("method")
                .kind_options(NodePropertyKindOptions::builder().options(vec!["GET", "POST"]).build())
                .build());
    let definition = base;
    Ok(definition)
}
"#;

    #[test]
    fn test_full_migration() {
        let rewriter = NodeDefinitionRewriter::default();
        let (text, applied) = rewriter.rewrite(LEGACY);
        assert_eq!(text, MIGRATED);

        let kinds: Vec<RuleKind> = applied.iter().map(|a| a.rule).collect();
        assert_eq!(kinds, RuleKind::ALL.to_vec());
    }

    #[test]
    fn test_second_pass_is_noop() {
        let rewriter = NodeDefinitionRewriter::default();
        let (first, _) = rewriter.rewrite(LEGACY);
        let (second, applied) = rewriter.rewrite(&first);
        assert_eq!(second, first);
        assert!(applied.is_empty());
    }

    #[test]
    fn test_untouched_text_is_identity() {
        let input = "fn main() {\n    let v = vec![1, 2, 3];\n    println!(\"{:?}\", v);\n}\n";
        let (text, applied) = NodeDefinitionRewriter::default().rewrite(input);
        assert_eq!(text, input);
        assert!(applied.is_empty());
    }

    #[test]
    fn test_disabled_rules_are_skipped() {
        let rewriter = NodeDefinitionRewriter::new(
            &[RuleKind::DropVersionCall, RuleKind::VersionArgument],
            (1, 0, 0),
        );
        assert_eq!(rewriter.rule_kinds().len(), 6);

        let input = r#"NodeDefinition::new("a", "A").version(Version::new(1, 0, 0)).inputs([x])"#;
        let (text, _) = rewriter.rewrite(input);
        assert_eq!(
            text,
            r#"NodeDefinition::new("a", "A").version(Version::new(1, 0, 0)).add_input(x)"#
        );
    }
}
