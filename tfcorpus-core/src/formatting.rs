//! Whitespace canonicalization for cleaned files, plus the line splitter the
//! other line-based passes share.

/// Width a tab character expands to.
const TAB_WIDTH: usize = 2;

/// Characters that end a line. `\r\n` counts as one break.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Splits `content` into lines on every line break, including lone `\r`
/// (classic Mac endings) and the Unicode separators.
///
/// Like [`str::lines`], line breaks are not part of the yielded lines and a
/// trailing break does not produce a final empty line.
pub fn split_lines(content: &str) -> impl Iterator<Item = &str> {
    let mut rest = content;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        match rest.char_indices().find(|&(_, c)| is_line_break(c)) {
            Some((i, c)) => {
                let line = &rest[..i];
                let mut next = i + c.len_utf8();
                if c == '\r' && rest[next..].starts_with('\n') {
                    next += 1;
                }
                rest = &rest[next..];
                Some(line)
            }
            None => {
                let line = rest;
                rest = "";
                Some(line)
            }
        }
    })
}

/// Canonicalizes layout: tabs become two spaces, trailing whitespace is
/// removed, runs of blank lines collapse to one and the document neither
/// starts nor ends with a blank line.
pub fn normalize_formatting(content: &str) -> String {
    let indent = " ".repeat(TAB_WIDTH);
    let expanded = content.replace('\t', &indent);

    let mut lines: Vec<&str> = Vec::new();
    let mut prev_blank = false;
    for line in split_lines(&expanded).map(str::trim_end) {
        let blank = line.is_empty();
        if blank && prev_blank {
            continue;
        }
        lines.push(line);
        prev_blank = blank;
    }

    let start = lines.iter().position(|l| !l.is_empty()).unwrap_or(lines.len());
    let end = lines.iter().rposition(|l| !l.is_empty()).map_or(start, |i| i + 1);
    lines[start..end].join("\n")
}
