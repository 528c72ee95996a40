//! # Minimal PDF Writer
//!
//! Produces single-column text documents (PDF 1.4) using the standard
//! Helvetica fonts, so no font files are embedded.
//!
//! ## File Layout
//! ```text
//! %PDF-1.4
//! 1 0 obj  Catalog ──► 2 0 obj Pages ──► [page objects]
//! 3 0 obj  Font /Helvetica        (F1)
//! 4 0 obj  Font /Helvetica-Bold   (F2)
//! 5 0 obj  Page 1 ──► 6 0 obj content stream
//! 7 0 obj  Page 2 ──► 8 0 obj content stream
//! ...
//! xref      byte offset of every object
//! trailer   /Root 1 0 R
//! %%EOF
//! ```
//!
//! Text is encoded as WinAnsi; characters outside Latin-1 become `?`.
//! Lines longer than the printable width are word-wrapped, keeping their
//! leading indentation on every continuation line.

use std::fmt::Write as _;

const PAGE_WIDTH: u32 = 595;
const PAGE_HEIGHT: u32 = 842;
const MARGIN: i32 = 50;
const TOP: i32 = PAGE_HEIGHT as i32 - MARGIN;
const TEXT_WIDTH: i32 = PAGE_WIDTH as i32 - 2 * MARGIN;

/// Characters that fit on one line at `size` points.
///
/// Helvetica glyphs average about half an em; 0.55 em leaves room for the
/// wider bold face.
fn chars_per_line(size: i32) -> usize {
    usize::try_from(TEXT_WIDTH * 20 / (size.max(1) * 11)).unwrap_or(1).max(1)
}

/// Which of the two built-in fonts a line uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource(&self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }
}

#[derive(Debug, Clone)]
struct PlacedText {
    y: i32,
    size: i32,
    font: Font,
    text: String,
}

/// A text document laid out top to bottom, paginating automatically.
///
/// ## Example
/// ```rust
/// use stockroom_core::report::pdf::PdfDocument;
///
/// let mut doc = PdfDocument::new();
/// doc.heading("Sales Report");
/// doc.line("Period: 2024-01-01 to 2024-01-31");
/// let bytes = doc.render();
/// assert!(bytes.starts_with(b"%PDF-1.4"));
/// ```
#[derive(Debug, Clone)]
pub struct PdfDocument {
    pages: Vec<Vec<PlacedText>>,
    cursor: i32,
}

impl Default for PdfDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfDocument {
    pub fn new() -> Self {
        PdfDocument {
            pages: vec![Vec::new()],
            cursor: TOP,
        }
    }

    /// Large bold title line.
    pub fn heading(&mut self, text: &str) {
        self.push(text, 16, Font::Bold);
        self.cursor -= 8;
    }

    /// Regular body line.
    pub fn line(&mut self, text: &str) {
        self.push(text, 10, Font::Regular);
    }

    /// Bold body line.
    pub fn bold_line(&mut self, text: &str) {
        self.push(text, 10, Font::Bold);
    }

    /// Vertical gap of one body line.
    pub fn blank(&mut self) {
        self.cursor -= 14;
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn push(&mut self, text: &str, size: i32, font: Font) {
        let leading = size + 4;
        for text in wrap(text, chars_per_line(size)) {
            if self.cursor - leading < MARGIN {
                self.pages.push(Vec::new());
                self.cursor = TOP;
            }
            self.cursor -= leading;

            if let Some(page) = self.pages.last_mut() {
                page.push(PlacedText {
                    y: self.cursor,
                    size,
                    font,
                    text,
                });
            }
        }
    }

    /// Serializes the document.
    pub fn render(&self) -> Vec<u8> {
        let mut out: Vec<u8> = Vec::new();
        let mut offsets: Vec<usize> = Vec::new();

        out.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

        let page_ids: Vec<usize> = (0..self.pages.len()).map(|i| 5 + i * 2).collect();
        let kids = page_ids
            .iter()
            .map(|id| format!("{id} 0 R"))
            .collect::<Vec<_>>()
            .join(" ");

        write_object(&mut out, &mut offsets, b"<< /Type /Catalog /Pages 2 0 R >>");
        write_object(
            &mut out,
            &mut offsets,
            format!(
                "<< /Type /Pages /Kids [{kids}] /Count {} >>",
                self.pages.len()
            )
            .as_bytes(),
        );
        write_object(
            &mut out,
            &mut offsets,
            b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>",
        );
        write_object(
            &mut out,
            &mut offsets,
            b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>",
        );

        for (page, page_id) in self.pages.iter().zip(&page_ids) {
            let content_id = page_id + 1;
            let page_dict = format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
                 /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {content_id} 0 R >>"
            );
            write_object(&mut out, &mut offsets, page_dict.as_bytes());

            let stream = content_stream(page);
            let mut body = format!("<< /Length {} >>\nstream\n", stream.len()).into_bytes();
            body.extend_from_slice(&stream);
            body.extend_from_slice(b"\nendstream");
            write_object(&mut out, &mut offsets, &body);
        }

        let xref_offset = out.len();
        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", offsets.len() + 1);
        for offset in &offsets {
            let _ = writeln!(xref, "{offset:010} 00000 n ");
        }
        let _ = write!(
            xref,
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
            offsets.len() + 1
        );
        out.extend_from_slice(xref.as_bytes());

        out
    }
}

/// Greedy word wrap at `max_chars`. Words longer than a whole line are split.
fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    if text.chars().count() <= max_chars {
        return vec![text.to_string()];
    }

    let mut indent: String = text.chars().take_while(|c| *c == ' ').collect();
    if indent.len() >= max_chars {
        indent.clear();
    }

    let mut lines = Vec::new();
    let mut current = indent.clone();
    let mut used = indent.len();

    for word in text.split_whitespace() {
        let mut chars: Vec<char> = word.chars().collect();
        loop {
            let sep = usize::from(used > indent.len());
            if used + sep + chars.len() <= max_chars {
                if sep == 1 {
                    current.push(' ');
                }
                used += sep + chars.len();
                current.extend(chars);
                break;
            }

            if used == indent.len() {
                let room = max_chars - used;
                current.extend(chars.drain(..room));
            }
            lines.push(std::mem::replace(&mut current, indent.clone()));
            used = indent.len();
        }
    }

    if used > indent.len() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn write_object(out: &mut Vec<u8>, offsets: &mut Vec<usize>, body: &[u8]) {
    offsets.push(out.len());
    let id = offsets.len();
    out.extend_from_slice(format!("{id} 0 obj\n").as_bytes());
    out.extend_from_slice(body);
    out.extend_from_slice(b"\nendobj\n");
}

fn content_stream(page: &[PlacedText]) -> Vec<u8> {
    let mut stream = Vec::new();
    for placed in page {
        stream.extend_from_slice(
            format!(
                "BT /{} {} Tf {} {} Td (",
                placed.font.resource(),
                placed.size,
                MARGIN,
                placed.y
            )
            .as_bytes(),
        );
        stream.extend_from_slice(&encode_text(&placed.text));
        stream.extend_from_slice(b") Tj ET\n");
    }
    stream
}

/// Escapes a string for a PDF literal and maps it to WinAnsi bytes.
fn encode_text(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '(' | ')' => {
                bytes.push(b'\\');
                bytes.push(c as u8);
            }
            '\n' | '\r' | '\t' => bytes.push(b' '),
            c if (c as u32) < 0x20 => {}
            c if (c as u32) <= 0xFF => bytes.push(c as u32 as u8),
            _ => bytes.push(b'?'),
        }
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn test_document_structure() {
        let mut doc = PdfDocument::new();
        doc.heading("Sales Report");
        doc.line("Total: $10.00");
        let bytes = doc.render();

        assert!(bytes.starts_with(b"%PDF-1.4"));
        assert!(bytes.ends_with(b"%%EOF\n"));
        assert!(contains(&bytes, b"(Sales Report) Tj"));
        assert!(contains(&bytes, b"/Count 1"));
        assert!(contains(&bytes, b"/BaseFont /Helvetica-Bold"));
    }

    #[test]
    fn test_xref_offsets_point_at_objects() {
        let mut doc = PdfDocument::new();
        doc.line("hello");
        let bytes = doc.render();
        let text = String::from_utf8_lossy(&bytes);

        let xref_start = text.find("xref\n").unwrap();
        let entries: Vec<usize> = text[xref_start..]
            .lines()
            .skip(3)
            .take_while(|l| l.ends_with(" n "))
            .map(|l| l[..10].parse().unwrap())
            .collect();

        assert_eq!(entries.len(), 6);
        for (i, offset) in entries.iter().enumerate() {
            let expected = format!("{} 0 obj", i + 1);
            assert!(bytes[*offset..].starts_with(expected.as_bytes()));
        }
    }

    #[test]
    fn test_paginates_long_documents() {
        let mut doc = PdfDocument::new();
        for i in 0..200 {
            doc.line(&format!("line {i}"));
        }
        assert!(doc.page_count() > 1);

        let bytes = doc.render();
        let pages = String::from_utf8_lossy(&bytes)
            .matches("/Type /Page /Parent")
            .count();
        assert_eq!(pages, doc.page_count());
    }

    #[test]
    fn test_long_lines_wrap_within_the_margins() {
        let budget = chars_per_line(10);
        assert_eq!(budget, 90);

        let product = "Ergonomic wireless keyboard ".repeat(12);
        let text = format!("  - {} (2 x $10.00) = $20.00", product.trim_end());
        let lines = wrap(&text, budget);

        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.chars().count() <= budget, "too wide: {line:?}");
            assert!(line.starts_with("  "));
        }
        assert_eq!(
            lines.join(" ").split_whitespace().collect::<Vec<_>>(),
            text.split_whitespace().collect::<Vec<_>>()
        );

        let mut doc = PdfDocument::new();
        doc.line(&text);
        assert_eq!(doc.pages[0].len(), lines.len());
    }

    #[test]
    fn test_wrap_splits_unbroken_words() {
        let word = "x".repeat(25);
        let lines = wrap(&word, 10);
        assert_eq!(lines, vec!["x".repeat(10), "x".repeat(10), "x".repeat(5)]);

        assert_eq!(wrap("short", 10), vec!["short".to_string()]);
    }

    #[test]
    fn test_encode_text_escapes_and_maps() {
        assert_eq!(encode_text("a(b)c\\"), b"a\\(b\\)c\\\\".to_vec());
        assert_eq!(encode_text("Café"), vec![b'C', b'a', b'f', 0xE9]);
        assert_eq!(encode_text("→"), b"?".to_vec());
    }
}
