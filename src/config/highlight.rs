use syntect::easy::HighlightLines;
use syntect::highlighting::Style;
use syntect::util::{LinesWithEndings, as_24_bit_terminal_escaped};
use two_face::theme::EmbeddedThemeName;
use two_face::{syntax, theme};

/// Highlight JSON text for a terminal.
///
/// Returns the text unchanged when stdout is not a terminal or the
/// highlighter fails on a line.
pub fn highlight_json(text: &str) -> String {
    if !atty::is(atty::Stream::Stdout) {
        return text.to_string();
    }
    highlight(text, "json").unwrap_or_else(|| text.to_string())
}

fn highlight(text: &str, extension: &str) -> Option<String> {
    let ps = syntax::extra_newlines();
    let ts = theme::extra();

    let syntax = ps
        .find_syntax_by_extension(extension)
        .unwrap_or_else(|| ps.find_syntax_plain_text());
    let mut h = HighlightLines::new(syntax, ts.get(EmbeddedThemeName::Base16OceanDark));

    let mut highlighted = String::new();
    for line in LinesWithEndings::from(text) {
        let ranges: Vec<(Style, &str)> = h.highlight_line(line, &ps).ok()?;
        highlighted.push_str(&as_24_bit_terminal_escaped(&ranges[..], false));
    }
    // Reset so the terminal colour doesn't leak past the output.
    highlighted.push_str("\x1b[0m");
    Some(highlighted)
}
