//! Text normaliser: turns an uploaded payload into clean, line-oriented text.
//!
//! Removes comment lines, `banner` blocks and blank lines while keeping the
//! original line order, the `# FILE:` boundary markers between bundled uploads,
//! and bare `!` section delimiters (the extractor uses those to close
//! interface blocks).

use tracing::debug;

/// Literal prefix of the line that separates bundled upload files.
pub const FILE_MARKER: &str = "# FILE:";

/// Concatenate named uploads into one payload, each preceded by a `# FILE: <name>` line.
pub fn bundle<N, C>(files: impl IntoIterator<Item = (N, C)>) -> Vec<u8>
where
    N: AsRef<str>,
    C: AsRef<[u8]>,
{
    let mut out = Vec::new();
    for (name, content) in files {
        if !out.is_empty() && !out.ends_with(b"\n") {
            out.push(b'\n');
        }
        out.extend_from_slice(format!("{FILE_MARKER} {}\n", name.as_ref()).as_bytes());
        out.extend_from_slice(content.as_ref());
    }
    out
}

/// Normalise a raw payload. Never fails: invalid UTF-8 is replaced, not rejected.
pub fn normalize(raw: &[u8]) -> String {
    let text = String::from_utf8_lossy(raw);
    let mut kept: Vec<&str> = Vec::new();
    let mut banner_delim: Option<String> = None;
    let mut dropped = 0usize;

    for line in text.split(['\n', '\r']) {
        let line = line.trim_end();

        if let Some(delim) = &banner_delim {
            if line.contains(delim.as_str()) {
                banner_delim = None;
            }
            dropped += 1;
            continue;
        }

        if line.is_empty() {
            continue;
        }

        if let Some(delim) = banner_open(line) {
            banner_delim = delim;
            dropped += 1;
            continue;
        }

        if is_comment(line) {
            dropped += 1;
            continue;
        }

        kept.push(line);
    }

    debug!(kept = kept.len(), dropped, "Normalised input text");
    kept.join("\n")
}

fn is_comment(line: &str) -> bool {
    let trimmed = line.trim_start();
    if trimmed.starts_with(FILE_MARKER) {
        return false;
    }
    match trimmed.strip_prefix('!') {
        Some(rest) => !rest.trim().is_empty(),
        None => trimmed.starts_with('#'),
    }
}

/// Recognise `banner <kind> <delim>...`.
///
/// Returns `None` when the line is not a banner opener, `Some(None)` for a
/// banner that closes on the same line, and `Some(Some(delim))` while the
/// closing delimiter is still outstanding.
fn banner_open(line: &str) -> Option<Option<String>> {
    let mut parts = line.trim_start().splitn(3, char::is_whitespace);
    if !parts.next()?.eq_ignore_ascii_case("banner") {
        return None;
    }
    let _kind = parts.next()?;
    let body = parts.next()?.trim_start();
    let delim = banner_delimiter(body)?;
    let after = &body[delim.len()..];
    if after.contains(delim.as_str()) {
        Some(None)
    } else {
        Some(Some(delim))
    }
}

fn banner_delimiter(body: &str) -> Option<String> {
    // IOS shows Ctrl-C as the two characters `^C`.
    if body.starts_with("^C") {
        return Some("^C".to_string());
    }
    body.chars().next().map(String::from)
}
