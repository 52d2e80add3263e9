// file: src/generator/sanitize.rs
// description: cleanup of model replies before JSON parsing and before rendering
// reference: https://docs.rs/regex

use crate::error::{DspError, Result};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

lazy_static! {
    // fence lines only: opening with optional info string, or a bare closing fence
    pub static ref CODE_FENCE: Regex = Regex::new(
        r"(?m)^[ \t]*```[A-Za-z0-9_+-]*[ \t]*\r?\n?"
    ).expect("CODE_FENCE regex is valid");

    pub static ref HTML_TAG: Regex = Regex::new(
        r"</?[A-Za-z][^<>]*>"
    ).expect("HTML_TAG regex is valid");
}

pub fn strip_code_fences(text: &str) -> String {
    CODE_FENCE.replace_all(text, "").into_owned()
}

pub fn strip_html_tags(text: &str) -> String {
    HTML_TAG.replace_all(text, "").into_owned()
}

/// Markdown body ready for rendering: no fences, no HTML tags, trimmed.
pub fn sanitize_content(text: &str) -> String {
    strip_html_tags(&strip_code_fences(text)).trim().to_string()
}

/// Parses a reply that should be a JSON object, tolerating code fences and
/// stray prose around the object.
pub fn parse_json_reply(raw: &str) -> Result<Value> {
    let cleaned = strip_code_fences(raw);
    let cleaned = cleaned.trim();

    if cleaned.is_empty() {
        return Err(DspError::Response("Empty response".to_string()));
    }

    match serde_json::from_str(cleaned) {
        Ok(value) => Ok(value),
        Err(first_err) => {
            let object = match (cleaned.find('{'), cleaned.rfind('}')) {
                (Some(start), Some(end)) if start < end => &cleaned[start..=end],
                _ => return Err(first_err.into()),
            };
            serde_json::from_str(object).map_err(|_| first_err.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_sanitize_fenced_html() {
        assert_eq!(sanitize_content("```markdown\n<p>Hello</p>\n```"), "Hello");
    }

    #[test]
    fn test_inline_backticks_survive() {
        assert_eq!(
            sanitize_content("```\nA ```rust code``` B\n```"),
            "A ```rust code``` B"
        );
        assert_eq!(
            strip_code_fences("  ```toml\nkey = 1\n  ```\n"),
            "key = 1\n"
        );
    }

    #[test]
    fn test_parse_single_line_fenced_json() {
        let value = parse_json_reply("```json {\"a\": 1} ```").unwrap();
        assert_eq!(value, json!({ "a": 1 }));
    }

    #[test]
    fn test_sanitize_keeps_markdown() {
        let text = "The team will:\n\n- encrypt drives\n- use **MFA**\n\nCost < 5 units.";
        assert_eq!(sanitize_content(text), text);
    }

    #[test]
    fn test_strip_html_variants() {
        assert_eq!(
            strip_html_tags("<div class=\"x\">A<br/>B</div><h2>C</h2>"),
            "ABC"
        );
    }

    #[test]
    fn test_parse_fenced_json() {
        let value = parse_json_reply("```json\n{\"section_content\": \"Body\"}\n```").unwrap();
        assert_eq!(value, json!({ "section_content": "Body" }));
    }

    #[test]
    fn test_parse_json_with_surrounding_prose() {
        let value = parse_json_reply("Here you go:\n{\"a\": 1}\nThanks!").unwrap();
        assert_eq!(value, json!({ "a": 1 }));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse_json_reply("not json at all"),
            Err(DspError::Serialization(_))
        ));
        assert!(matches!(parse_json_reply("```\n```"), Err(DspError::Response(_))));
    }
}
