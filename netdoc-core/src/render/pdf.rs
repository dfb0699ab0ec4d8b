//! Paginated A4 output with the PDF builtin fonts.
//!
//! Builtin fonts only cover the WinAnsi character set, so every character is
//! checked up front and anything outside it is reported as
//! [`RenderError::Unencodable`] rather than dropped. The one exception is
//! U+FFFD, which only stands for undecodable input bytes; it is printed as
//! `?` and counted in a warning.
//!
//! printpdf stamps a random `/ID` pair into the trailer on every save. Both
//! entries are overwritten with a SHA-256 of the rest of the file, so equal
//! documents give equal bytes.

use printpdf::{BuiltinFont, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, Point, Pt, TextItem};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use super::document::{Block, Document};
use super::wrap::wrap_line;
use super::{Format, RenderError};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN_LEFT: f32 = 20.0;
const TOP: f32 = 277.0;
const BOTTOM: f32 = 22.0;
const FOOTER_Y: f32 = 12.0;

/// Courier at 9pt is 5.4pt per glyph; 170mm of usable width fits 89.
const BODY_CHARS: usize = 88;
/// Conservative width for proportional Helvetica headings.
const HEADING_CHARS: usize = 60;
const TAB: &str = "    ";
/// Length of each trailer `/ID` string as printpdf writes it.
const ID_LEN: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Style {
    Title,
    Heading,
    Subheading,
    Body,
    Gap,
}

impl Style {
    fn font(&self) -> BuiltinFont {
        match self {
            Style::Title | Style::Heading => BuiltinFont::HelveticaBold,
            Style::Subheading => BuiltinFont::HelveticaBoldOblique,
            Style::Body | Style::Gap => BuiltinFont::Courier,
        }
    }

    fn size(&self) -> f32 {
        match self {
            Style::Title => 16.0,
            Style::Heading => 13.0,
            Style::Subheading => 10.5,
            Style::Body | Style::Gap => 9.0,
        }
    }

    /// Vertical advance in millimetres.
    fn advance(&self) -> f32 {
        match self {
            Style::Title => 9.0,
            Style::Heading => 7.5,
            Style::Subheading => 5.5,
            Style::Body => 4.2,
            Style::Gap => 2.5,
        }
    }

    fn width(&self) -> usize {
        match self {
            Style::Body | Style::Gap => BODY_CHARS,
            _ => HEADING_CHARS,
        }
    }
}

/// WinAnsi code points 0x80-0x9F that map outside Latin-1.
const WINANSI_EXTRA: [char; 27] = [
    '€', '‚', 'ƒ', '„', '…', '†', '‡', 'ˆ', '‰', 'Š', '‹', 'Œ', 'Ž', '‘', '’', '“', '”', '•', '–',
    '—', '˜', '™', 'š', '›', 'œ', 'ž', 'Ÿ',
];

/// True for characters the builtin fonts can show (WinAnsiEncoding).
fn winansi_encodable(c: char) -> bool {
    matches!(c as u32, 0x20..=0x7E | 0xA0..=0xFF) || WINANSI_EXTRA.contains(&c)
}

struct Layout {
    lines: Vec<(Style, String)>,
    /// U+FFFD characters printed as `?`.
    undecodable: usize,
}

impl Layout {
    fn push(&mut self, style: Style, text: &str) -> Result<(), RenderError> {
        for raw_line in text.split('\n') {
            let mut expanded = raw_line.replace('\t', TAB);
            let undecodable = expanded.matches(char::REPLACEMENT_CHARACTER).count();
            if undecodable > 0 {
                self.undecodable += undecodable;
                expanded = expanded.replace(char::REPLACEMENT_CHARACTER, "?");
            }
            if let Some(bad) = expanded.chars().find(|c| !winansi_encodable(*c)) {
                return Err(RenderError::Unencodable {
                    format: Format::Pdf,
                    character: bad,
                    context: raw_line.to_string(),
                });
            }
            for segment in wrap_line(&expanded, style.width()) {
                self.lines.push((style, segment.to_string()));
            }
        }
        Ok(())
    }

    fn gap(&mut self) {
        self.lines.push((Style::Gap, String::new()));
    }

    fn table(&mut self, headers: &[String], rows: &[Vec<String>]) -> Result<(), RenderError> {
        let header = headers.join(" | ");
        let rule_width = BODY_CHARS.min(header.chars().count().max(3));
        self.push(Style::Body, &header)?;
        self.push(Style::Body, &"-".repeat(rule_width))?;
        for row in rows {
            self.push(Style::Body, &row.join(" | "))?;
        }
        Ok(())
    }
}

fn flatten(doc: &Document) -> Result<Vec<(Style, String)>, RenderError> {
    let mut layout = Layout {
        lines: Vec::new(),
        undecodable: 0,
    };
    layout.push(Style::Title, &doc.title)?;
    for (label, value) in &doc.header {
        layout.push(Style::Body, &format!("{label}: {value}"))?;
    }

    for section in &doc.sections {
        layout.gap();
        layout.push(Style::Heading, &section.title)?;
        for block in &section.blocks {
            match block {
                Block::Subheading(text) => {
                    layout.gap();
                    layout.push(Style::Subheading, text)?;
                }
                Block::Paragraph(text) => layout.push(Style::Body, text)?,
                Block::Fields(fields) => {
                    for (label, value) in fields {
                        layout.push(Style::Body, &format!("{label}: {value}"))?;
                    }
                }
                Block::Table { headers, rows } => layout.table(headers, rows)?,
                Block::Bullets(items) => {
                    for item in items {
                        layout.push(Style::Body, &format!("* {item}"))?;
                    }
                }
                Block::Code { text, .. } => layout.push(Style::Body, text.trim_end_matches('\n'))?,
            }
        }
    }
    if layout.undecodable > 0 {
        warn!(
            count = layout.undecodable,
            "Undecodable input bytes printed as '?' in PDF"
        );
    }
    Ok(layout.lines)
}

fn paginate(lines: Vec<(Style, String)>) -> Vec<Vec<(Style, String, f32)>> {
    let mut pages = Vec::new();
    let mut page = Vec::new();
    let mut y = TOP;
    for (style, text) in lines {
        if y - style.advance() < BOTTOM {
            pages.push(std::mem::take(&mut page));
            y = TOP;
            if style == Style::Gap {
                continue;
            }
        }
        y -= style.advance();
        page.push((style, text, y));
    }
    if !page.is_empty() || pages.is_empty() {
        pages.push(page);
    }
    pages
}

fn write_text(ops: &mut Vec<Op>, text: &str, font: BuiltinFont, size: f32, x: f32, y: f32) {
    ops.push(Op::StartTextSection);
    ops.push(Op::SetTextCursor {
        pos: Point::new(Mm(x), Mm(y)),
    });
    ops.push(Op::SetFontSizeBuiltinFont {
        size: Pt(size),
        font: font.clone(),
    });
    ops.push(Op::WriteTextBuiltinFont {
        items: vec![TextItem::Text(text.to_string())],
        font,
    });
    ops.push(Op::EndTextSection);
}

pub(super) fn render(doc: &Document) -> Result<Vec<u8>, RenderError> {
    let lines = flatten(doc)?;
    let pages = paginate(lines);
    let total = pages.len();

    let pdf_pages: Vec<PdfPage> = pages
        .into_iter()
        .enumerate()
        .map(|(idx, page)| {
            let mut ops = Vec::new();
            for (style, text, y) in page {
                if style == Style::Gap || text.is_empty() {
                    continue;
                }
                write_text(&mut ops, &text, style.font(), style.size(), MARGIN_LEFT, y);
            }
            let footer = format!("{} - page {} of {}", doc.title, idx + 1, total);
            write_text(&mut ops, &footer, BuiltinFont::Helvetica, 8.0, MARGIN_LEFT, FOOTER_Y);
            PdfPage::new(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), ops)
        })
        .collect();

    let mut warnings = Vec::new();
    let mut bytes = PdfDocument::new(&doc.title)
        .with_pages(pdf_pages)
        .save(&PdfSaveOptions::default(), &mut warnings);
    if !warnings.is_empty() {
        warn!(count = warnings.len(), "PDF writer reported warnings");
    }
    if !stamp_document_id(&mut bytes) {
        warn!("PDF trailer /ID not found; output will differ between runs");
    }
    debug!(pages = total, bytes = bytes.len(), "Rendered PDF");
    Ok(bytes)
}

/// Position of the literal string `(...)` that starts at or after `from`,
/// skipping only whitespace and `[`. Returns the content range.
fn literal_after(bytes: &[u8], from: usize) -> Option<(usize, usize)> {
    let skip = bytes
        .get(from..)?
        .iter()
        .position(|b| !(b.is_ascii_whitespace() || *b == b'['))?;
    let open = from + skip;
    if bytes[open] != b'(' {
        return None;
    }
    let start = open + 1;
    let len = bytes[start..].iter().position(|b| *b == b')')?;
    Some((start, start + len))
}

/// Overwrite both trailer `/ID` strings with a digest of everything else.
/// Returns false when no well-formed `/ID` entry is present.
fn stamp_document_id(bytes: &mut [u8]) -> bool {
    const KEY: &[u8] = b"/ID";
    let candidates: Vec<usize> = bytes
        .windows(KEY.len())
        .enumerate()
        .filter(|(_, w)| *w == KEY)
        .map(|(i, _)| i)
        .collect();

    for at in candidates.into_iter().rev() {
        let Some(first) = literal_after(bytes, at + KEY.len()) else {
            continue;
        };
        let Some(second) = literal_after(bytes, first.1 + 1) else {
            continue;
        };
        let is_id = |(s, e): (usize, usize)| {
            e - s == ID_LEN && bytes[s..e].iter().all(u8::is_ascii_alphanumeric)
        };
        if !is_id(first) || !is_id(second) {
            continue;
        }

        let digest = {
            let mut hasher = Sha256::new();
            hasher.update(&bytes[..first.0]);
            hasher.update(&bytes[first.1..second.0]);
            hasher.update(&bytes[second.1..]);
            format!("{:x}", hasher.finalize())
        };
        let id = &digest.as_bytes()[..ID_LEN];
        bytes[first.0..first.1].copy_from_slice(id);
        bytes[second.0..second.1].copy_from_slice(id);
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn winansi_covers_latin1_and_rejects_others() {
        assert!(winansi_encodable('a'));
        assert!(winansi_encodable('é'));
        assert!(winansi_encodable('€'));
        assert!(!winansi_encodable('↔'));
        assert!(!winansi_encodable('\u{fffd}'));
        assert!(!winansi_encodable('\u{7}'));
    }

    #[test]
    fn pagination_starts_new_page_when_full() {
        let lines: Vec<(Style, String)> = (0..200)
            .map(|i| (Style::Body, format!("line {i}")))
            .collect();
        let pages = paginate(lines);
        assert!(pages.len() > 1);
        assert_eq!(pages.iter().map(Vec::len).sum::<usize>(), 200);
        for page in &pages {
            assert!(page.iter().all(|(_, _, y)| *y >= BOTTOM));
        }
    }

    #[test]
    fn trailer_id_is_replaced_by_content_digest() {
        let a = format!(
            "%PDF-1.3\n1 0 obj\n(body)\nendobj\n<</Root 1 0 R/ID[({})({})]>>\n%%EOF",
            "HGJBDAIGCHFGIHDGCIGHCIGJEBHIGBEF", "ABCDEFGHIJABCDEFGHIJABCDEFGHIJAB"
        );
        let b = format!(
            "%PDF-1.3\n1 0 obj\n(body)\nendobj\n<</Root 1 0 R/ID[({})({})]>>\n%%EOF",
            "HCJEJEGHBAFICDFFBJIDBAIBJGDADAGJ", "JIHGFEDCBAJIHGFEDCBAJIHGFEDCBAJI"
        );
        let (mut a, mut b) = (a.into_bytes(), b.into_bytes());
        let len = a.len();
        assert!(stamp_document_id(&mut a));
        assert!(stamp_document_id(&mut b));
        assert_eq!(a, b);
        assert_eq!(a.len(), len);

        let stamped = String::from_utf8(a).unwrap();
        assert!(!stamped.contains("HGJBDAIGCHFGIHDGCIGHCIGJEBHIGBEF"));
        let mut changed = stamped.replace("(body)", "(else)").into_bytes();
        assert!(stamp_document_id(&mut changed));
        assert_ne!(changed[changed.len() - 40..], stamped.as_bytes()[stamped.len() - 40..]);
    }

    #[test]
    fn missing_trailer_id_is_reported() {
        let mut bytes = b"%PDF-1.3\n(text mentions /ID but no trailer)\n".to_vec();
        assert!(!stamp_document_id(&mut bytes));
    }

    #[test]
    fn replacement_character_prints_as_question_mark() {
        let mut layout = Layout {
            lines: Vec::new(),
            undecodable: 0,
        };
        layout.push(Style::Body, "host\u{fffd}name").unwrap();
        assert_eq!(layout.lines[0].1, "host?name");
        assert_eq!(layout.undecodable, 1);
        assert!(layout.push(Style::Body, "arrow \u{2194}").is_err());
    }
}
