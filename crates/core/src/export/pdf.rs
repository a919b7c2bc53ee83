//! Minimal PDF 1.4 text report writer.
//!
//! Produces A4 pages of Helvetica text. The writer keeps a vertical cursor;
//! when the next line would cross the bottom margin a new page is started.
//! Long lines are wrapped on word boundaries using an average glyph width,
//! which is close enough for Helvetica at report sizes.

use std::io::Write as _;

use super::{check_shape, ExportError, Tabular};

/// A4 width in points.
pub const PAGE_WIDTH: f32 = 595.0;
/// A4 height in points.
pub const PAGE_HEIGHT: f32 = 842.0;

const MARGIN: f32 = 50.0;
const FOOTER_HEIGHT: f32 = 20.0;
const BODY_SIZE: f32 = 9.0;
const HEADING_SIZE: f32 = 16.0;
/// Average Helvetica glyph width as a fraction of the font size.
const AVG_GLYPH_WIDTH: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource(self) -> &'static str {
        match self {
            Font::Regular => "/F1",
            Font::Bold => "/F2",
        }
    }
}

#[derive(Debug, Clone)]
struct Line {
    x: f32,
    y: f32,
    size: f32,
    font: Font,
    text: String,
}

/// Paginating text writer.
#[derive(Debug)]
pub struct PdfWriter {
    pages: Vec<Vec<Line>>,
    cursor: f32,
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfWriter {
    pub fn new() -> Self {
        Self {
            pages: vec![Vec::new()],
            cursor: PAGE_HEIGHT - MARGIN,
        }
    }

    /// Number of pages written so far.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Write a large bold heading.
    pub fn heading(&mut self, text: &str) {
        self.write(text, HEADING_SIZE, Font::Bold);
        self.skip(HEADING_SIZE * 0.5);
    }

    /// Write a bold line at body size.
    pub fn bold(&mut self, text: &str) {
        self.write(text, BODY_SIZE, Font::Bold);
    }

    /// Write regular body text, wrapping as needed.
    pub fn text(&mut self, text: &str) {
        self.write(text, BODY_SIZE, Font::Regular);
    }

    /// Add vertical space.
    pub fn skip(&mut self, points: f32) {
        self.cursor -= points;
    }

    fn write(&mut self, text: &str, size: f32, font: Font) {
        let leading = size * 1.4;
        for line in wrap(text, max_chars(size)) {
            if self.cursor - leading < MARGIN + FOOTER_HEIGHT {
                self.pages.push(Vec::new());
                self.cursor = PAGE_HEIGHT - MARGIN;
            }
            self.cursor -= leading;
            let y = self.cursor;
            if let Some(page) = self.pages.last_mut() {
                page.push(Line {
                    x: MARGIN,
                    y,
                    size,
                    font,
                    text: line,
                });
            }
        }
    }

    /// Serialize the document, adding "Page i / n" footers.
    pub fn finish(self) -> Result<Vec<u8>, ExportError> {
        let page_total = self.pages.len();
        // Object layout: 1 catalog, 2 page tree, 3-4 fonts, then a
        // (page, content) pair per page.
        let page_obj = |i: usize| 5 + i * 2;

        let mut objects: Vec<Vec<u8>> = Vec::with_capacity(4 + page_total * 2);
        objects.push(b"<< /Type /Catalog /Pages 2 0 R >>".to_vec());

        let kids = (0..page_total)
            .map(|i| format!("{} 0 R", page_obj(i)))
            .collect::<Vec<_>>()
            .join(" ");
        objects.push(format!("<< /Type /Pages /Kids [{kids}] /Count {page_total} >>").into_bytes());
        objects.push(
            b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>".to_vec(),
        );
        objects.push(
            b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>"
                .to_vec(),
        );

        for (i, lines) in self.pages.iter().enumerate() {
            let mut content = Vec::new();
            for line in lines {
                write_text(&mut content, line)?;
            }
            let footer = Line {
                x: PAGE_WIDTH - MARGIN - 60.0,
                y: MARGIN,
                size: 8.0,
                font: Font::Regular,
                text: format!("Page {} / {}", i + 1, page_total),
            };
            write_text(&mut content, &footer)?;

            objects.push(
                format!(
                    "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
                     /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {} 0 R >>",
                    page_obj(i) + 1
                )
                .into_bytes(),
            );

            let mut stream = format!("<< /Length {} >>\nstream\n", content.len()).into_bytes();
            stream.extend_from_slice(&content);
            stream.extend_from_slice(b"\nendstream");
            objects.push(stream);
        }

        let mut out = Vec::new();
        out.write_all(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n")?;

        let mut offsets = Vec::with_capacity(objects.len());
        for (i, body) in objects.iter().enumerate() {
            offsets.push(out.len());
            write!(out, "{} 0 obj\n", i + 1)?;
            out.write_all(body)?;
            out.write_all(b"\nendobj\n")?;
        }

        let xref_at = out.len();
        write!(out, "xref\n0 {}\n", objects.len() + 1)?;
        out.write_all(b"0000000000 65535 f \n")?;
        for offset in offsets {
            write!(out, "{offset:010} 00000 n \n")?;
        }
        write!(
            out,
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
            objects.len() + 1
        )?;

        Ok(out)
    }
}

fn write_text(content: &mut Vec<u8>, line: &Line) -> Result<(), ExportError> {
    write!(
        content,
        "BT {} {} Tf {:.2} {:.2} Td (",
        line.font.resource(),
        line.size,
        line.x,
        line.y
    )?;
    content.extend_from_slice(&escape_text(&line.text));
    content.write_all(b") Tj ET\n")?;
    Ok(())
}

fn max_chars(size: f32) -> usize {
    let usable = PAGE_WIDTH - 2.0 * MARGIN;
    ((usable / (size * AVG_GLYPH_WIDTH)) as usize).max(1)
}

/// Split `text` into lines of at most `width` characters.
///
/// Breaks on whitespace when possible; words longer than `width` are cut.
/// Explicit newlines are kept.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_len = 0usize;

        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > width {
                if current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                let rest = word.split_off(width);
                lines.push(word.into_iter().collect());
                word = rest;
            }

            let extra = if current_len == 0 { word.len() } else { word.len() + 1 };
            if current_len + extra > width {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.extend(word.iter());
            current_len += word.len();
        }

        lines.push(current);
    }
    lines
}

/// Encode text as a PDF literal string body in WinAnsi.
///
/// Characters outside WinAnsi are replaced by `?`.
pub fn escape_text(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' | '(' | ')' => {
                out.push(b'\\');
                out.push(ch as u8);
            }
            ' '..='~' => out.push(ch as u8),
            _ => match win_ansi(ch) {
                Some(byte) => out.extend_from_slice(format!("\\{byte:03o}").as_bytes()),
                None => out.push(b'?'),
            },
        }
    }
    out
}

fn win_ansi(ch: char) -> Option<u8> {
    let code = ch as u32;
    if (0xA0..=0xFF).contains(&code) {
        return Some(code as u8);
    }
    let byte = match ch {
        '€' => 0x80,
        '‚' => 0x82,
        '„' => 0x84,
        '…' => 0x85,
        'Œ' => 0x8C,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        'œ' => 0x9C,
        'Ÿ' => 0x9F,
        _ => return None,
    };
    Some(byte)
}

/// Render a titled table report: heading, generation date, header line, then
/// one line per row with cells separated by ` | `.
pub fn write_table<T: Tabular>(title: &str, date_tag: &str, rows: &[T]) -> Result<Vec<u8>, ExportError> {
    let mut pdf = PdfWriter::new();
    pdf.heading(title);
    pdf.text(&format!("Généré le {date_tag} - {} ligne(s)", rows.len()));
    pdf.skip(BODY_SIZE);
    pdf.bold(&T::headers().join(" | "));

    for row in rows {
        let cells = row.cells();
        check_shape::<T>(&cells)?;
        pdf.text(&cells.join(" | "));
    }

    pdf.finish()
}
