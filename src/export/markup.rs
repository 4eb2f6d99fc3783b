//! Inline markup handling for document text.
//!
//! Header and footer lines use a tiny whitelisted markup: `<b>..</b>` for
//! bold and `<br/>` for a line break. Row text never carries markup into
//! the document; console color tags and any other tags are stripped.

use lazy_static::lazy_static;
use regex::Regex;

/// One word of a console style: an attribute, a color or a hex color,
/// optionally negated (`not bold`) or used as a background (`on red`).
const STYLE_WORD: &str = concat!(
    r"(?:not\s+)?(?:bold|dim|italic|underline|strike|blink|reverse|b|i|u|s)",
    r"|(?:on\s+)?(?:bright_)?(?:black|red|green|yellow|blue|magenta|cyan|white)",
    r"|(?:on\s+)?(?:grey|gray|orange|purple|default|#[0-9a-f]{6})",
);

lazy_static! {
    /// Console style tags such as `[bold red]`, `[/]`, `[#ff8800]`. Brackets
    /// holding anything but style words are prose and stay.
    static ref CONSOLE_TAG: Regex = Regex::new(&format!(
        r"(?i)\[(?:/|/?(?:{STYLE_WORD})(?:\s+(?:{STYLE_WORD}))*)\]"
    ))
    .unwrap();
    /// Any angle-bracket tag.
    static ref ANGLE_TAG: Regex = Regex::new(r"</?[a-zA-Z][^<>]*>").unwrap();
    /// Whitelisted inline tags.
    static ref INLINE_TAG: Regex = Regex::new(r"(?i)<(/?)(b|br)\s*/?>").unwrap();
}

/// A run of text with uniform weight, or a forced line break.
#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Text { text: String, bold: bool },
    LineBreak,
}

impl Inline {
    pub fn text(text: impl Into<String>) -> Self {
        Inline::Text {
            text: text.into(),
            bold: false,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Inline::Text {
            text: text.into(),
            bold: true,
        }
    }
}

/// Remove every markup tag, console or angle-bracket, from `text`.
pub fn strip_markup(text: &str) -> String {
    let without_console = CONSOLE_TAG.replace_all(text, "");
    ANGLE_TAG
        .replace_all(&without_console, "")
        .replace("&nbsp;", " ")
}

/// Split a delimited finding field into clean, non-empty items.
pub fn split_to_items(field: &str) -> Vec<String> {
    field
        .split(['\n', ','])
        .map(|item| strip_markup(item).trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

/// Parse whitelisted inline markup; unknown tags are dropped.
pub fn parse_inline(markup: &str) -> Vec<Inline> {
    let mut spans = Vec::new();
    let mut bold = false;
    let mut last = 0;

    for caps in INLINE_TAG.captures_iter(markup) {
        let Some(whole) = caps.get(0) else { continue };
        push_text(&mut spans, &markup[last..whole.start()], bold);
        last = whole.end();

        match caps[2].to_ascii_lowercase().as_str() {
            "br" => spans.push(Inline::LineBreak),
            _ => bold = caps[1].is_empty(),
        }
    }
    push_text(&mut spans, &markup[last..], bold);

    spans
}

fn push_text(spans: &mut Vec<Inline>, raw: &str, bold: bool) {
    let text = strip_markup(raw);
    if !text.is_empty() {
        spans.push(Inline::Text { text, bold });
    }
}
