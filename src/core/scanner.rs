//! 以括號深度為基礎的文字掃描。
//!
//! 只辨識足以完成遷移的語法：三種括號、字串與字元字面值、行與區塊註解。
//! 所有位置都是位元組索引；結構字元皆為 ASCII，因此索引一定落在字元邊界上。

/// 方法鏈掃描結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainEnd {
    /// 停止字元的位置 (`,` `;` 或頂層的右括號)
    pub stop: usize,
    /// 最後一個程式碼字元之後的位置，新的呼叫插在這裡
    pub insert_at: usize,
    /// 頂層是否已有 `.build()`
    pub has_build: bool,
}

fn is_open(byte: u8) -> bool {
    matches!(byte, b'(' | b'[' | b'{')
}

fn is_close(byte: u8) -> bool {
    matches!(byte, b')' | b']' | b'}')
}

/// 若 `i` 是字面值或註解的開頭，回傳其結束後的位置
fn skip_inert(bytes: &[u8], i: usize) -> Option<usize> {
    let len = bytes.len();
    match bytes[i] {
        b'"' => {
            let mut j = i + 1;
            while j < len {
                match bytes[j] {
                    b'\\' => j += 2,
                    b'"' => return Some(j + 1),
                    _ => j += 1,
                }
            }
            Some(len)
        }
        b'\'' => {
            if bytes.get(i + 1) == Some(&b'\\') {
                // 跳過被跳脫的位元組，`'\''` 的第二個引號不是結尾
                let close = bytes.get(i + 3..)?.iter().position(|&b| b == b'\'')?;
                Some(i + 3 + close + 1)
            } else if bytes.get(i + 2) == Some(&b'\'') {
                Some(i + 3)
            } else {
                // lifetime
                None
            }
        }
        b'/' => match bytes.get(i + 1) {
            Some(b'/') => Some(
                bytes[i..]
                    .iter()
                    .position(|&b| b == b'\n')
                    .map_or(len, |offset| i + offset),
            ),
            Some(b'*') => Some(
                bytes[i + 2..]
                    .windows(2)
                    .position(|w| w == b"*/")
                    .map_or(len, |offset| i + 2 + offset + 2),
            ),
            _ => None,
        },
        _ => None,
    }
}

fn is_comment_start(bytes: &[u8], i: usize) -> bool {
    bytes[i] == b'/' && matches!(bytes.get(i + 1), Some(b'/') | Some(b'*'))
}

/// 從 `open` 位置的左括號找出讓深度回到零的右括號
pub fn matching_close(text: &str, open: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    if !bytes.get(open).copied().is_some_and(is_open) {
        return None;
    }

    let mut depth = 0usize;
    let mut i = open;
    while i < bytes.len() {
        if let Some(next) = skip_inert(bytes, i) {
            i = next;
            continue;
        }
        let byte = bytes[i];
        if is_open(byte) {
            depth += 1;
        } else if is_close(byte) {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
        i += 1;
    }
    None
}

fn char_end(text: &str, i: usize) -> usize {
    let mut end = i + 1;
    while !text.is_char_boundary(end) {
        end += 1;
    }
    end
}

/// `pos` 是否落在程式碼中，而非字串、字元字面值或註解內
pub fn is_code_position(text: &str, pos: usize) -> bool {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i <= pos && i < bytes.len() {
        match skip_inert(bytes, i) {
            Some(next) if pos < next => return false,
            Some(next) => i = next,
            None => i += 1,
        }
    }
    true
}

/// 以頂層逗號切割清單內容，巢狀括號內的逗號不切割。
/// 每個項目截止於最後一個程式碼字元，尾端註解不納入。
pub fn split_top_level(inner: &str) -> Vec<&str> {
    let bytes = inner.as_bytes();
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut item_end = 0;
    let mut i = 0;

    while i < bytes.len() {
        if let Some(next) = skip_inert(bytes, i) {
            if !is_comment_start(bytes, i) {
                item_end = next;
            }
            i = next;
            continue;
        }
        match bytes[i] {
            b',' if depth == 0 => {
                items.push(&inner[start..item_end.max(start)]);
                start = i + 1;
                item_end = start;
                i += 1;
                continue;
            }
            byte if is_open(byte) => depth += 1,
            byte if is_close(byte) => depth = depth.saturating_sub(1),
            _ => {}
        }
        if !bytes[i].is_ascii_whitespace() {
            item_end = char_end(inner, i);
        }
        i += 1;
    }
    items.push(&inner[start..item_end.max(start)]);

    items
        .into_iter()
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect()
}

/// 從 `start` 往後掃描一條方法鏈，直到頂層的 `,` `;` 或右括號
pub fn chain_end(text: &str, start: usize) -> Option<ChainEnd> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut has_build = false;
    let mut insert_at = start;
    let mut i = start;

    while i < bytes.len() {
        if let Some(next) = skip_inert(bytes, i) {
            if !is_comment_start(bytes, i) {
                insert_at = next;
            }
            i = next;
            continue;
        }

        let byte = bytes[i];
        if depth == 0 && (matches!(byte, b',' | b';') || is_close(byte)) {
            return Some(ChainEnd {
                stop: i,
                insert_at,
                has_build,
            });
        }

        if is_open(byte) {
            depth += 1;
        } else if is_close(byte) {
            depth -= 1;
        } else if depth == 0 && bytes[i..].starts_with(b".build()") {
            has_build = true;
        }

        if !byte.is_ascii_whitespace() {
            insert_at = char_end(text, i);
        }
        i += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_close_nested() {
        let text = "x([a, [b, c], (d)]) tail";
        let open = text.find('[').unwrap();
        assert_eq!(matching_close(text, open), Some(17));
        assert_eq!(&text[open..=17], "[a, [b, c], (d)]");
    }

    #[test]
    fn test_matching_close_ignores_brackets_in_literals() {
        let text = r#"[")", ']', /* ] */ x]"#;
        assert_eq!(matching_close(text, 0), Some(text.len() - 1));
    }

    #[test]
    fn test_matching_close_unmatched() {
        assert_eq!(matching_close("[a, (b]", 0), None);
        assert_eq!(matching_close("[a, b", 0), None);
        assert_eq!(matching_close("a", 0), None);
    }

    #[test]
    fn test_split_top_level() {
        let items = split_top_level(" a, f(b, c), [d, e], \"x, y\", ");
        assert_eq!(items, vec!["a", "f(b, c)", "[d, e]", "\"x, y\""]);
    }

    #[test]
    fn test_split_top_level_empty() {
        assert!(split_top_level("").is_empty());
        assert!(split_top_level("  \n ").is_empty());
    }

    #[test]
    fn test_split_top_level_drops_trailing_comments() {
        let items = split_top_level("\n    a, // first\n    b /* main */\n    // end\n");
        assert_eq!(items, vec!["a", "// first\n    b"]);

        let items = split_top_level(" \"說明\" // 註解\n");
        assert_eq!(items, vec!["\"說明\""]);
    }

    #[test]
    fn test_escaped_quote_char_literal() {
        let text = r"[ '\'', ']' ]";
        assert_eq!(matching_close(text, 0), Some(text.len() - 1));
        assert_eq!(split_top_level(r"'\'', ','"), vec![r"'\''", "','"]);
    }

    #[test]
    fn test_is_code_position() {
        let text = "a // NodeProperty::builder()\nlet s = \".version(x)\"; /* .inputs( */ b.inputs(";
        assert!(is_code_position(text, 0));
        assert!(!is_code_position(text, text.find("NodeProperty").unwrap()));
        assert!(!is_code_position(text, text.find(".version").unwrap()));
        assert!(!is_code_position(text, text.find(".inputs").unwrap()));
        assert!(is_code_position(text, text.rfind(".inputs").unwrap()));
        assert!(is_code_position(text, text.find("let").unwrap()));
    }

    #[test]
    fn test_chain_end_stops_at_top_level() {
        let text = "b().name(\"a,b\").kind(x(1, 2)),\n";
        let end = chain_end(text, 3).unwrap();
        assert_eq!(&text[end.stop..end.stop + 1], ",");
        assert_eq!(end.insert_at, end.stop);
        assert!(!end.has_build);
    }

    #[test]
    fn test_chain_end_detects_build() {
        let text = "b().name(\"a\")\n    .build();";
        let end = chain_end(text, 3).unwrap();
        assert!(end.has_build);

        let nested = "b().opts(o().build()),";
        assert!(!chain_end(nested, 3).unwrap().has_build);
    }

    #[test]
    fn test_chain_end_insert_before_trailing_comment() {
        let text = "b().name(\"a\") // trailing, note\n    ,";
        let end = chain_end(text, 3).unwrap();
        assert_eq!(&text[..end.insert_at], "b().name(\"a\")");
        assert_eq!(end.stop, text.len() - 1);
    }

    #[test]
    fn test_chain_end_non_ascii() {
        let text = "b().label(名稱).note(\"說明\"),";
        let end = chain_end(text, 3).unwrap();
        assert_eq!(end.insert_at, end.stop);
        assert!(text.is_char_boundary(end.insert_at));
    }

    #[test]
    fn test_chain_end_runs_off_text() {
        assert_eq!(chain_end("b().name(\"a\")", 3), None);
    }
}
