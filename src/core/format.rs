//! Response formatting for assistant replies.
//!
//! Replies are escaped as a whole before fenced code regions are located, so
//! nothing outside a code block can ever be interpreted as markup. Code bodies
//! are unescaped back to their literal text and re-escaped exactly once when
//! serialized as HTML.

use regex::Regex;
use std::sync::OnceLock;

/// Language label used when a fence carries no tag.
pub const DEFAULT_LANGUAGE: &str = "plaintext";

static FENCE_REGEX: OnceLock<Regex> = OnceLock::new();

fn fence_regex() -> &'static Regex {
    FENCE_REGEX.get_or_init(|| {
        // Optional ASCII word tag on the opening fence, then the shortest body
        // that reaches a closing fence. An opening fence without a closing one
        // is left alone.
        Regex::new(r"```((?-u:\w)+)?\s*([\s\S]+?)```").expect("Failed to compile fence regex")
    })
}

/// Escape the five markup-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Reverse [`escape_html`] in a single pass, so `&amp;lt;` decodes to `&lt;`
/// rather than `<`.
pub fn unescape_html(text: &str) -> String {
    const ENTITIES: [(&str, char); 5] = [
        ("&amp;", '&'),
        ("&lt;", '<'),
        ("&gt;", '>'),
        ("&quot;", '"'),
        ("&#39;", '\''),
    ];

    let mut unescaped = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('&') {
        unescaped.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match ENTITIES
            .iter()
            .find(|(entity, _)| tail.starts_with(entity))
        {
            Some((entity, ch)) => {
                unescaped.push(*ch);
                rest = &tail[entity.len()..];
            }
            None => {
                unescaped.push('&');
                rest = &tail[1..];
            }
        }
    }
    unescaped.push_str(rest);
    unescaped
}

/// Escape text destined for an HTML text node (quotes are left as-is).
fn escape_text_node(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    pub language: String,
    /// Verbatim code, already unescaped.
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Escaped markup text, inert when rendered.
    Text(String),
    Code(CodeBlock),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormattedResponse {
    pub segments: Vec<Segment>,
}

impl FormattedResponse {
    pub fn code_blocks(&self) -> impl Iterator<Item = &CodeBlock> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Code(block) => Some(block),
            Segment::Text(_) => None,
        })
    }

    pub fn has_code(&self) -> bool {
        self.code_blocks().next().is_some()
    }

    /// Serialize to markup. Text segments are emitted as-is (they are already
    /// escaped); code bodies are escaped once as text nodes.
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => html.push_str(text),
                Segment::Code(block) => {
                    html.push_str(&format!(
                        "<div class=\"code-block-wrapper\"><div class=\"code-block-header\">\
                         <span class=\"language-name\">{lang}</span>\
                         <button class=\"copy-code-btn\">Copy Code</button></div>\
                         <pre><code class=\"language-{lang}\">{code}</code></pre></div>",
                        lang = block.language,
                        code = escape_text_node(&block.code),
                    ));
                }
            }
        }
        html
    }
}

/// Split a raw reply into escaped text and code blocks.
pub fn format_response(text: &str) -> FormattedResponse {
    let escaped = escape_html(text);
    let mut segments = Vec::new();
    let mut last_end = 0;

    for captures in fence_regex().captures_iter(&escaped) {
        let Some(whole) = captures.get(0) else {
            continue;
        };
        if whole.start() > last_end {
            segments.push(Segment::Text(escaped[last_end..whole.start()].to_string()));
        }

        let language = captures
            .get(1)
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
        let body = captures.get(2).map(|m| m.as_str()).unwrap_or_default();
        segments.push(Segment::Code(CodeBlock {
            language,
            code: unescape_html(body.trim()),
        }));
        last_end = whole.end();
    }

    if last_end < escaped.len() {
        segments.push(Segment::Text(escaped[last_end..].to_string()));
    }

    FormattedResponse { segments }
}

/// Shorthand for `format_response(text).to_html()`.
pub fn format_response_html(text: &str) -> String {
    format_response(text).to_html()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_escaped_without_code_blocks() {
        let formatted = format_response("Hello <script>");
        assert!(!formatted.has_code());
        assert_eq!(formatted.to_html(), "Hello &lt;script&gt;");
    }

    #[test]
    fn text_without_fences_equals_escaped_input() {
        let input = "a & b < c > d \"e\" 'f'";
        assert_eq!(format_response_html(input), escape_html(input));
        assert_eq!(
            escape_html(input),
            "a &amp; b &lt; c &gt; d &quot;e&quot; &#39;f&#39;"
        );
    }

    #[test]
    fn tagged_block_is_labeled_and_trimmed() {
        let formatted = format_response("```js\nconsole.log(1)\n```");
        let blocks: Vec<_> = formatted.code_blocks().collect();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].language, "js");
        assert_eq!(blocks[0].code, "console.log(1)");
        assert_eq!(formatted.segments.len(), 1);
    }

    #[test]
    fn untagged_block_defaults_to_plaintext() {
        let formatted = format_response("before\n```\nfoo bar\n```\nafter");
        assert_eq!(
            formatted.segments,
            vec![
                Segment::Text("before\n".into()),
                Segment::Code(CodeBlock {
                    language: DEFAULT_LANGUAGE.into(),
                    code: "foo bar".into(),
                }),
                Segment::Text("\nafter".into()),
            ]
        );
    }

    #[test]
    fn language_tag_is_ascii_only() {
        let formatted = format_response("```été\nx\n```");
        let block = formatted.code_blocks().next().expect("code block");
        assert_eq!(block.language, DEFAULT_LANGUAGE);
        assert_eq!(block.code, "été\nx");

        let formatted = format_response("```caté\nx\n```");
        let block = formatted.code_blocks().next().expect("code block");
        assert_eq!(block.language, "cat");
        assert_eq!(block.code, "é\nx");
    }

    #[test]
    fn code_body_round_trips_markup_characters() {
        let body = "if a < b && c > \"d\" { println!('x'); }";
        let formatted = format_response(&format!("```rust\n{body}\n```"));
        let block = formatted.code_blocks().next().expect("code block");
        assert_eq!(block.code, body);

        let html = formatted.to_html();
        assert!(html.contains("<span class=\"language-name\">rust</span>"));
        assert!(html.contains("<code class=\"language-rust\">"));
        // Escaped once, not twice.
        assert!(html.contains("a &lt; b &amp;&amp; c &gt; \"d\""));
        assert!(!html.contains("&amp;lt;"));
    }

    #[test]
    fn unterminated_fence_stays_plain_text() {
        let input = "look:\n```python\nprint(1)\n";
        let formatted = format_response(input);
        assert!(!formatted.has_code());
        assert_eq!(formatted.to_html(), escape_html(input));
    }

    #[test]
    fn empty_fence_pair_is_not_a_block() {
        let formatted = format_response("``````");
        assert!(!formatted.has_code());
    }

    #[test]
    fn multiple_blocks_are_matched_non_greedily() {
        let input = "```a\none\n```\nmid <b>\n```b\ntwo\n```";
        let formatted = format_response(input);
        let blocks: Vec<_> = formatted.code_blocks().collect();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].language, "a");
        assert_eq!(blocks[0].code, "one");
        assert_eq!(blocks[1].language, "b");
        assert_eq!(blocks[1].code, "two");
        assert!(formatted
            .segments
            .contains(&Segment::Text("\nmid &lt;b&gt;\n".into())));
    }

    #[test]
    fn html_outside_blocks_is_never_raw() {
        let html = format_response_html("<img src=x onerror=alert(1)>\n```\n<b>ok</b>\n```");
        assert!(html.starts_with("&lt;img src=x onerror=alert(1)&gt;"));
        assert!(html.contains("&lt;b&gt;ok&lt;/b&gt;"));
    }

    #[test]
    fn literal_entities_in_code_survive() {
        let formatted = format_response("```html\n&lt;p&gt; &amp;amp;\n```");
        let block = formatted.code_blocks().next().expect("code block");
        assert_eq!(block.code, "&lt;p&gt; &amp;amp;");
    }

    #[test]
    fn unescape_reverses_escape() {
        let input = "<a href=\"x\">'&'</a>";
        assert_eq!(unescape_html(&escape_html(input)), input);
    }
}
