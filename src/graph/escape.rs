//! Quoting for the two levels of `ffmpeg` filter-graph parsing, plus POSIX shell quoting for
//! the human-readable command line.

/// Escape a filter option value (first level): `\`, `'` and `:` get a backslash.
pub fn escape_option(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '\'' | ':') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Quote a string for the graph level so `,` `;` `[` `]` and spaces survive.
pub fn quote_graph(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}

/// Both levels at once, for free-form user text such as `drawtext` content.
pub fn quote_text(value: &str) -> String {
    quote_graph(&escape_option(value))
}

/// Quote `arg` for a POSIX shell when it contains anything outside a conservative safe set.
pub fn shell_quote(arg: &str) -> String {
    let safe = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=+,@%".contains(c));
    if safe {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', "'\\''"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graph/escape.rs"]
mod tests;
