use crate::core::scanner::{chain_end, is_code_position, matching_close, split_top_level};
use crate::utils::error::{FixError, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

static KIND_OPTIONS_BUILDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bNodePropertyKindOptions::builder\(\)").expect("kind options builder pattern")
});

static PROPERTY_BUILDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bNodeProperty::builder\(\)").expect("property builder pattern"));

static BASE_DEFINITION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"let\s+definition\s*=\s*base\?\s*;").expect("base definition pattern")
});

static DEFINITION_NEW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\bNodeDefinition::new\(\s*"([^"]+)"\s*,\s*"([^"]+)"\s*\)"#)
        .expect("definition constructor pattern")
});

/// 規則名稱，順序即套用順序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleKind {
    DropVersionCall,
    ExpandInputs,
    ExpandOutputs,
    ExpandProperties,
    FinishKindOptionsBuilder,
    FinishPropertyBuilder,
    UnwrapBaseDefinition,
    VersionArgument,
}

impl RuleKind {
    pub const ALL: [RuleKind; 8] = [
        RuleKind::DropVersionCall,
        RuleKind::ExpandInputs,
        RuleKind::ExpandOutputs,
        RuleKind::ExpandProperties,
        RuleKind::FinishKindOptionsBuilder,
        RuleKind::FinishPropertyBuilder,
        RuleKind::UnwrapBaseDefinition,
        RuleKind::VersionArgument,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RuleKind::DropVersionCall => "drop-version-call",
            RuleKind::ExpandInputs => "expand-inputs",
            RuleKind::ExpandOutputs => "expand-outputs",
            RuleKind::ExpandProperties => "expand-properties",
            RuleKind::FinishKindOptionsBuilder => "finish-kind-options-builder",
            RuleKind::FinishPropertyBuilder => "finish-property-builder",
            RuleKind::UnwrapBaseDefinition => "unwrap-base-definition",
            RuleKind::VersionArgument => "version-argument",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleKind {
    type Err = FixError;

    fn from_str(s: &str) -> Result<Self> {
        RuleKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s.trim())
            .ok_or_else(|| FixError::InvalidConfigValueError {
                field: "rules.disabled".to_string(),
                value: s.to_string(),
                reason: format!(
                    "Unknown rule. Known rules: {}",
                    RuleKind::ALL.map(RuleKind::as_str).join(", ")
                ),
            })
    }
}

/// 單一規則的改寫結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub text: String,
    pub replacements: usize,
}

impl Rewrite {
    fn unchanged(text: &str) -> Self {
        Self {
            text: text.to_string(),
            replacements: 0,
        }
    }
}

pub trait RewriteRule: Send + Sync {
    fn kind(&self) -> RuleKind;
    fn apply(&self, text: &str) -> Rewrite;
}

/// 找出位於程式碼中的 `needle`，字串與註解內的出現位置略過
fn code_matches(text: &str, needle: &str) -> Vec<usize> {
    text.match_indices(needle)
        .map(|(i, _)| i)
        .filter(|&i| is_code_position(text, i))
        .collect()
}

fn next_non_whitespace(text: &str, from: usize) -> Option<usize> {
    text[from..]
        .find(|c: char| !c.is_whitespace())
        .map(|offset| from + offset)
}

/// 移除帶參數的 `.version(...)`；整行只有這個呼叫時連同該行刪除
pub struct DropVersionCall;

impl DropVersionCall {
    const NEEDLE: &'static str = ".version(";

    fn removal_range(text: &str, start: usize, close: usize) -> (usize, usize) {
        let line_start = text[..start].rfind('\n').map_or(0, |p| p + 1);
        let after = close + 1;
        let line_end = text[after..].find('\n').map(|p| after + p);

        match line_end {
            Some(line_end)
                if text[line_start..start].trim().is_empty()
                    && text[after..line_end].trim().is_empty() =>
            {
                (line_start, line_end + 1)
            }
            _ => (start, after),
        }
    }
}

impl RewriteRule for DropVersionCall {
    fn kind(&self) -> RuleKind {
        RuleKind::DropVersionCall
    }

    fn apply(&self, text: &str) -> Rewrite {
        let starts = code_matches(text, Self::NEEDLE);
        if starts.is_empty() {
            return Rewrite::unchanged(text);
        }

        let mut out = text.to_string();
        let mut replacements = 0;
        for start in starts.into_iter().rev() {
            let paren = start + Self::NEEDLE.len() - 1;
            let Some(close) = matching_close(&out, paren) else {
                continue;
            };
            // 無參數的 getter 不動
            if out[paren + 1..close].trim().is_empty() {
                continue;
            }
            let (from, to) = Self::removal_range(&out, start, close);
            out.replace_range(from..to, "");
            replacements += 1;
        }

        Rewrite {
            text: out,
            replacements,
        }
    }
}

/// `.method([a, b])` 展開為 `.target(a).target(b)`
pub struct ExpandList {
    kind: RuleKind,
    needle: &'static str,
    target: &'static str,
}

impl ExpandList {
    pub fn inputs() -> Self {
        Self {
            kind: RuleKind::ExpandInputs,
            needle: ".inputs(",
            target: "add_input",
        }
    }

    pub fn outputs() -> Self {
        Self {
            kind: RuleKind::ExpandOutputs,
            needle: ".outputs(",
            target: "add_output",
        }
    }

    pub fn properties() -> Self {
        Self {
            kind: RuleKind::ExpandProperties,
            needle: ".properties(",
            target: "add_property",
        }
    }

    /// 回傳整個呼叫的結束位置 (含右小括號) 與展開後的呼叫鏈
    fn expand_at(&self, text: &str, start: usize) -> Option<(usize, String)> {
        let after_paren = start + self.needle.len();
        let open = next_non_whitespace(text, after_paren)?;
        if text.as_bytes()[open] != b'[' {
            return None;
        }
        let close = matching_close(text, open)?;
        let paren_close = next_non_whitespace(text, close + 1)?;
        if text.as_bytes()[paren_close] != b')' {
            return None;
        }

        let calls = split_top_level(&text[open + 1..close])
            .into_iter()
            .map(|item| format!(".{}({})", self.target, item))
            .collect();
        Some((paren_close + 1, calls))
    }
}

impl RewriteRule for ExpandList {
    fn kind(&self) -> RuleKind {
        self.kind
    }

    fn apply(&self, text: &str) -> Rewrite {
        let starts = code_matches(text, self.needle);
        if starts.is_empty() {
            return Rewrite::unchanged(text);
        }

        let mut out = text.to_string();
        let mut replacements = 0;
        for start in starts.into_iter().rev() {
            if let Some((end, calls)) = self.expand_at(&out, start) {
                out.replace_range(start..end, &calls);
                replacements += 1;
            }
        }

        Rewrite {
            text: out,
            replacements,
        }
    }
}

/// 確保 builder 鏈以 `.build()` 結尾
pub struct FinishBuilder {
    kind: RuleKind,
    pattern: &'static Lazy<Regex>,
}

impl FinishBuilder {
    pub fn kind_options() -> Self {
        Self {
            kind: RuleKind::FinishKindOptionsBuilder,
            pattern: &KIND_OPTIONS_BUILDER,
        }
    }

    pub fn property() -> Self {
        Self {
            kind: RuleKind::FinishPropertyBuilder,
            pattern: &PROPERTY_BUILDER,
        }
    }
}

impl RewriteRule for FinishBuilder {
    fn kind(&self) -> RuleKind {
        self.kind
    }

    fn apply(&self, text: &str) -> Rewrite {
        let ends: Vec<usize> = self
            .pattern
            .find_iter(text)
            .filter(|m| is_code_position(text, m.start()))
            .map(|m| m.end())
            .collect();
        if ends.is_empty() {
            return Rewrite::unchanged(text);
        }

        let mut out = text.to_string();
        let mut replacements = 0;
        for end in ends.into_iter().rev() {
            match chain_end(&out, end) {
                Some(chain) if !chain.has_build => {
                    out.insert_str(chain.insert_at, ".build()");
                    replacements += 1;
                }
                _ => {}
            }
        }

        Rewrite {
            text: out,
            replacements,
        }
    }
}

/// 以正規表示式替換程式碼中的符合項目，由後往前套用
fn replace_in_code(
    text: &str,
    pattern: &Regex,
    replacement: impl Fn(&Captures) -> String,
) -> Rewrite {
    let found: Vec<(usize, usize, String)> = pattern
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            is_code_position(text, whole.start())
                .then(|| (whole.start(), whole.end(), replacement(&caps)))
        })
        .collect();
    if found.is_empty() {
        return Rewrite::unchanged(text);
    }

    let mut out = text.to_string();
    for (start, end, new) in found.iter().rev() {
        out.replace_range(*start..*end, new);
    }
    Rewrite {
        text: out,
        replacements: found.len(),
    }
}

/// `let definition = base?;` 改為直接指派
pub struct UnwrapBaseDefinition;

impl RewriteRule for UnwrapBaseDefinition {
    fn kind(&self) -> RuleKind {
        RuleKind::UnwrapBaseDefinition
    }

    fn apply(&self, text: &str) -> Rewrite {
        replace_in_code(text, &BASE_DEFINITION, |_| "let definition = base;".to_string())
    }
}

/// 兩參數的 `NodeDefinition::new` 補上預設版本
pub struct VersionArgument {
    version: (u64, u64, u64),
}

impl VersionArgument {
    pub fn new(version: (u64, u64, u64)) -> Self {
        Self { version }
    }
}

impl RewriteRule for VersionArgument {
    fn kind(&self) -> RuleKind {
        RuleKind::VersionArgument
    }

    fn apply(&self, text: &str) -> Rewrite {
        let (major, minor, patch) = self.version;
        replace_in_code(text, &DEFINITION_NEW, |caps| {
            format!(
                r#"NodeDefinition::new("{}", "{}", Version::new({}, {}, {}))"#,
                &caps[1], &caps[2], major, minor, patch
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_idempotent(rule: &dyn RewriteRule, input: &str) -> String {
        let first = rule.apply(input);
        let second = rule.apply(&first.text);
        assert_eq!(second.replacements, 0, "{} is not idempotent", rule.kind());
        assert_eq!(second.text, first.text);
        first.text
    }

    #[test]
    fn test_rule_names_round_trip() {
        for kind in RuleKind::ALL {
            assert_eq!(kind.as_str().parse::<RuleKind>().unwrap(), kind);
        }
        assert!("no-such-rule".parse::<RuleKind>().is_err());
    }

    #[test]
    fn test_drop_version_call_inline() {
        let input = "NodeDefinition::new(\"a\", \"A\").version(Version::new(1, 0, 0)).inputs([x])";
        let out = assert_idempotent(&DropVersionCall, input);
        assert_eq!(out, "NodeDefinition::new(\"a\", \"A\").inputs([x])");
    }

    #[test]
    fn test_drop_version_call_whole_line() {
        let input = "let base = NodeDefinition::new(\"a\", \"A\")\n    .version(Version::new(1, 0, 0))\n    .add_input(x);\n";
        let out = assert_idempotent(&DropVersionCall, input);
        assert_eq!(
            out,
            "let base = NodeDefinition::new(\"a\", \"A\")\n    .add_input(x);\n"
        );
    }

    #[test]
    fn test_drop_version_call_keeps_getter() {
        let input = "let v = definition.version();";
        let result = DropVersionCall.apply(input);
        assert_eq!(result.replacements, 0);
        assert_eq!(result.text, input);
    }

    #[test]
    fn test_expand_inputs_and_outputs() {
        let input = ".inputs([ConnectionKind::Main, ConnectionKind::AiTool]).outputs([ConnectionKind::Main])";
        let out = assert_idempotent(&ExpandList::inputs(), input);
        let out = assert_idempotent(&ExpandList::outputs(), &out);
        assert_eq!(
            out,
            ".add_input(ConnectionKind::Main).add_input(ConnectionKind::AiTool).add_output(ConnectionKind::Main)"
        );
    }

    #[test]
    fn test_expand_properties_nested_items() {
        let input = r#".properties([
        NodeProperty::builder().name("a").options(vec![x, y]).build(),
        NodeProperty::builder().name("b").kind(f(1, [2, 3])).build(),
    ])"#;
        let out = assert_idempotent(&ExpandList::properties(), input);
        assert_eq!(
            out,
            r#".add_property(NodeProperty::builder().name("a").options(vec![x, y]).build()).add_property(NodeProperty::builder().name("b").kind(f(1, [2, 3])).build())"#
        );
    }

    #[test]
    fn test_expand_properties_simple() {
        let result = ExpandList::properties().apply(".properties([A, B, C])");
        assert_eq!(result.text, ".add_property(A).add_property(B).add_property(C)");
        assert_eq!(result.replacements, 1);
    }

    #[test]
    fn test_expand_list_skips_unmatched_and_non_list() {
        let unmatched = ".properties([A, B)";
        assert_eq!(ExpandList::properties().apply(unmatched).text, unmatched);

        let not_a_list = ".inputs(vec![a, b])";
        assert_eq!(ExpandList::inputs().apply(not_a_list).text, not_a_list);

        let no_paren = ".outputs([a, b].to_vec())";
        assert_eq!(ExpandList::outputs().apply(no_paren).text, no_paren);
    }

    #[test]
    fn test_expand_list_empty() {
        let result = ExpandList::inputs().apply("base.inputs([]);");
        assert_eq!(result.text, "base;");
        assert_eq!(result.replacements, 1);
    }

    #[test]
    fn test_expand_list_trailing_comment() {
        let input = "base.inputs([\n    a,\n    b // main port\n]);\n";
        let out = assert_idempotent(&ExpandList::inputs(), input);
        assert_eq!(out, "base.add_input(a).add_input(b);\n");
    }

    #[test]
    fn test_rules_ignore_comments_and_strings() {
        let doc = "/// Built with NodeProperty::builder()\nlet x = 1;\n";
        let result = FinishBuilder::property().apply(doc);
        assert_eq!(result.replacements, 0);
        assert_eq!(result.text, doc);

        let note = "// call .version(x) was removed\nlet s = \".inputs([a, b])\";\n";
        assert_eq!(DropVersionCall.apply(note).text, note);
        assert_eq!(ExpandList::inputs().apply(note).text, note);

        let commented = "// let definition = base?;\n/* NodeDefinition::new(\"a\", \"A\") */\n";
        assert_eq!(UnwrapBaseDefinition.apply(commented).replacements, 0);
        assert_eq!(VersionArgument::new((1, 0, 0)).apply(commented).text, commented);

        // 註解之後的程式碼照常改寫
        let mixed = "// NodeProperty::builder()\nf(NodeProperty::builder().name(\"a\"));";
        assert_eq!(
            FinishBuilder::property().apply(mixed).text,
            "// NodeProperty::builder()\nf(NodeProperty::builder().name(\"a\").build());"
        );
    }

    #[test]
    fn test_finish_property_builder() {
        let input = "props.push(NodeProperty::builder().name(\"a\"));\nlet p = NodeProperty::builder()\n    .name(\"b\")\n    .build();";
        let out = assert_idempotent(&FinishBuilder::property(), input);
        assert_eq!(
            out,
            "props.push(NodeProperty::builder().name(\"a\").build());\nlet p = NodeProperty::builder()\n    .name(\"b\")\n    .build();"
        );
    }

    #[test]
    fn test_finish_builder_nested() {
        let input = "vec![NodeProperty::builder().kind_options(NodePropertyKindOptions::builder().min(1)), x]";
        let out = assert_idempotent(&FinishBuilder::kind_options(), input);
        let out = assert_idempotent(&FinishBuilder::property(), &out);
        assert_eq!(
            out,
            "vec![NodeProperty::builder().kind_options(NodePropertyKindOptions::builder().min(1).build()).build(), x]"
        );
    }

    #[test]
    fn test_finish_property_builder_ignores_kind_options() {
        let input = "f(NodePropertyKindOptions::builder().build())";
        assert_eq!(FinishBuilder::property().apply(input).replacements, 0);
    }

    #[test]
    fn test_unwrap_base_definition() {
        let input = "let definition =  base? ;\nlet definition=base?;";
        let out = assert_idempotent(&UnwrapBaseDefinition, input);
        assert_eq!(out, "let definition = base;\nlet definition = base;");
    }

    #[test]
    fn test_version_argument() {
        let input = r#"let base = NodeDefinition::new( "http_request", "HTTP Request" );"#;
        let out = assert_idempotent(&VersionArgument::new((1, 0, 0)), input);
        assert_eq!(
            out,
            r#"let base = NodeDefinition::new("http_request", "HTTP Request", Version::new(1, 0, 0));"#
        );

        let custom = VersionArgument::new((2, 1, 0)).apply(r#"NodeDefinition::new("a", "A")"#);
        assert_eq!(custom.text, r#"NodeDefinition::new("a", "A", Version::new(2, 1, 0))"#);
    }
}
