//! Line segmentation for fixed-width output.
//!
//! Segments are slices of the input: joining them gives back the original
//! line exactly. Breaks fall after the last whitespace that fits, and long
//! tokens are hard-split on character boundaries.

/// Split `line` into segments of at most `width` characters.
pub fn wrap_line(line: &str, width: usize) -> Vec<&str> {
    let width = width.max(1);
    let mut segments = Vec::new();
    let mut rest = line;

    while rest.chars().count() > width {
        let hard_end = rest
            .char_indices()
            .nth(width)
            .map(|(idx, _)| idx)
            .unwrap_or(rest.len());
        let window = &rest[..hard_end];
        let split = match window.rfind(char::is_whitespace) {
            Some(idx) if idx > 0 => {
                let ws_len = window[idx..].chars().next().map(char::len_utf8).unwrap_or(1);
                idx + ws_len
            }
            _ => hard_end,
        };
        segments.push(&rest[..split]);
        rest = &rest[split..];
    }

    if !rest.is_empty() || segments.is_empty() {
        segments.push(rest);
    }
    segments
}
