//! Incremental markdown formatting for streamed chat replies.
//!
//! [`render`] converts accumulated plain text into safely-escaped HTML-like
//! markup. It is called afresh on the full accumulated text every time a
//! fragment arrives; the output is re-derived from scratch so that partial
//! input always yields consistent markup.
//!
//! The implementation is a small left-to-right scanner rather than a chain
//! of substitutions, so no rule can corrupt the output of an earlier rule.
//! Malformed markers (an unpaired fence, an unmatched `**`, a lone backtick)
//! are emitted as literal text, never "repaired".
//!
//! Recognized idioms: fenced code blocks, inline code, bold, italics, and
//! flat bullet lists. Tables, nested lists, and links are out of scope.

/// Convert plain text to escaped HTML-like markup.
///
/// Escaping of `&`, `<`, and `>` happens first, over the entire input, so
/// neither user nor model content can inject structural markup. Fenced code
/// blocks pass their content through verbatim (post-escaping); inline rules
/// apply only outside fences. The same input always yields byte-identical
/// output. The function is not idempotent under reapplication to its own
/// output, and reapplication is never done.
pub fn render(text: &str) -> String {
    let escaped = escape(text);
    let segments = split_fences(&escaped);

    let mut out = String::with_capacity(escaped.len());
    for (idx, segment) in segments.iter().enumerate() {
        match segment {
            Segment::Code(code) => {
                out.push_str("<pre><code>");
                out.push_str(code);
                out.push_str("</code></pre>");
            }
            Segment::Text(text) => {
                let mut text: &str = text;
                // A lone newline hugging a code fence would render as a
                // stray <br /> next to the <pre> block.
                if idx > 0 && matches!(segments[idx - 1], Segment::Code(_)) {
                    text = text.strip_prefix('\n').unwrap_or(text);
                }
                if idx + 1 < segments.len() && matches!(segments[idx + 1], Segment::Code(_)) {
                    text = text.strip_suffix('\n').unwrap_or(text);
                }
                render_text(text, &mut out);
            }
        }
    }
    out
}

/// Escape the three markup-sensitive characters.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

enum Segment<'a> {
    Text(&'a str),
    Code(&'a str),
}

const FENCE: &str = "```";

/// Split on paired triple-backtick fences. An opening fence with no closing
/// partner is left in the text verbatim.
fn split_fences(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut rest = text;
    loop {
        let Some(open) = rest.find(FENCE) else {
            segments.push(Segment::Text(rest));
            break;
        };
        let after_open = &rest[open + FENCE.len()..];
        let Some(close) = after_open.find(FENCE) else {
            // Unpaired fence: everything from here on is literal text.
            segments.push(Segment::Text(rest));
            break;
        };
        segments.push(Segment::Text(&rest[..open]));
        segments.push(Segment::Code(&after_open[..close]));
        rest = &after_open[close + FENCE.len()..];
    }
    segments
}

/// Render one non-code segment: bullet lists line by line, inline rules
/// within each line, remaining newlines as <br />.
fn render_text(segment: &str, out: &mut String) {
    if segment.is_empty() {
        return;
    }
    let mut in_list = false;
    let mut prev_plain = false;
    for line in segment.split('\n') {
        match bullet_content(line) {
            Some(item) => {
                if !in_list {
                    out.push_str("<ul>");
                    in_list = true;
                }
                out.push_str("<li>");
                render_inline(item, out);
                out.push_str("</li>");
                prev_plain = false;
            }
            None => {
                if in_list {
                    out.push_str("</ul>");
                    in_list = false;
                }
                if prev_plain {
                    out.push_str("<br />");
                }
                render_inline(line, out);
                prev_plain = true;
            }
        }
    }
    if in_list {
        out.push_str("</ul>");
    }
}

/// A line is a bullet item when, after leading whitespace, it starts with
/// `-` or `*` followed by whitespace.
fn bullet_content(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    let rest = trimmed
        .strip_prefix('-')
        .or_else(|| trimmed.strip_prefix('*'))?;
    if rest.starts_with(' ') || rest.starts_with('\t') {
        Some(&rest[1..])
    } else {
        None
    }
}

/// Scan one line for inline code, bold, and italic spans. Unmatched
/// delimiters are literal.
fn render_inline(line: &str, out: &mut String) {
    let mut rest = line;
    while !rest.is_empty() {
        let Some(marker) = rest.find(['`', '*']) else {
            out.push_str(rest);
            break;
        };
        out.push_str(&rest[..marker]);
        rest = &rest[marker..];

        if let Some(after) = rest.strip_prefix('`') {
            match after.find('`') {
                Some(close) if close > 0 => {
                    out.push_str("<code>");
                    out.push_str(&after[..close]);
                    out.push_str("</code>");
                    rest = &after[close + 1..];
                }
                _ => {
                    out.push('`');
                    rest = after;
                }
            }
        } else if let Some(after) = rest.strip_prefix("**") {
            match after.find("**") {
                Some(close) => {
                    out.push_str("<strong>");
                    render_inline(&after[..close], out);
                    out.push_str("</strong>");
                    rest = &after[close + 2..];
                }
                None => {
                    out.push_str("**");
                    rest = after;
                }
            }
        } else if let Some(after) = rest.strip_prefix('*') {
            match after.find('*') {
                Some(close) => {
                    out.push_str("<em>");
                    render_inline(&after[..close], out);
                    out.push_str("</em>");
                    rest = &after[close + 1..];
                }
                None => {
                    out.push('*');
                    rest = after;
                }
            }
        }
    }
}
