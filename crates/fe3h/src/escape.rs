//! One string per line: control characters that would break a line are escaped

use miette::{miette, Result};

/// Escape line breaks, tabs and backslashes so `value` fits on a single line
pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            '\\' => escaped.push_str("\\\\"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Reverse [`escape`]. Escape letters may be upper case, unknown escapes are an error.
pub fn unescape(line: &str) -> Result<String> {
    let mut value = String::with_capacity(line.len());
    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            value.push(c);
            continue;
        }

        match chars.next().map(|c| c.to_ascii_lowercase()) {
            Some('n') => value.push('\n'),
            Some('r') => value.push('\r'),
            Some('t') => value.push('\t'),
            Some('\\') => value.push('\\'),
            Some(other) => return Err(miette!("unknown escape \\{other} in {line:?}")),
            None => return Err(miette!("dangling backslash at the end of {line:?}")),
        }
    }
    Ok(value)
}

/// Escape every string and join them into the contents of a text file
pub fn to_text(lines: &[String]) -> String {
    lines.iter().map(|l| escape(l) + "\n").collect()
}

/// Split the contents of a text file into unescaped strings
pub fn from_text(text: &str) -> Result<Vec<String>> {
    text.lines().map(unescape).collect()
}
