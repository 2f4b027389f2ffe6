//! genpdf-backed canvas that draws a [`DocumentPlan`] and writes the PDF.

use std::fs;
use std::path::Path;

use genpdf::elements::{Break, PageBreak, Paragraph};
use genpdf::style::Style;
use genpdf::{render, Alignment, Context, Document, Element, Margins, Mm, Size};
use tracing::{debug, info};

use crate::config::{PageMargins, Settings};
use crate::error::{PdfPipeError, Result};
use crate::fonts::FontRegistry;
use crate::layout::{Block, DocumentPlan};

/// Millimeters per PDF point
const PT_TO_MM: f64 = 0.352_778;

/// Typical (ascent - descent + gap) / em of the supported families
const TYPICAL_LINE_RATIO: f64 = 1.15;

/// Distance from the bottom page edge to the top of the footer line
const FOOTER_OFFSET_MM: f64 = 15.0;

const FOOTER_FONT_SIZE: u8 = 8;

const TAB_WIDTH: usize = 4;

/// Characters outside ASCII and Latin-1 that Windows-1252 can encode
const WIN1252_EXTRAS: &[char] = &[
    '€', '‚', 'ƒ', '„', '…', '†', '‡', 'ˆ', '‰', 'Š', '‹', 'Œ', 'Ž', '‘', '’', '“', '”', '•', '–',
    '—', '˜', '™', 'š', '›', 'œ', 'ž', 'Ÿ',
];

/// Split `line` into paragraph segments that genpdf can always place.
///
/// genpdf only wraps at spaces and silently drops a word wider than the line,
/// so any word that would not fit (with its trailing space) is cut into
/// pieces, each pushed as its own segment.
pub fn fit_segments<F>(line: &str, max_width: Mm, width_of: F) -> Vec<String>
where
    F: Fn(&str) -> Mm,
{
    let budget = max_width - width_of(" ");
    let mut segments = Vec::new();
    let mut current = String::new();

    for (i, word) in line.split(' ').enumerate() {
        if i > 0 {
            current.push(' ');
        }
        if width_of(word) <= budget {
            current.push_str(word);
            continue;
        }

        if !current.is_empty() {
            segments.push(std::mem::take(&mut current));
        }
        let mut piece = String::new();
        for c in word.chars() {
            piece.push(c);
            if piece.chars().count() > 1 && width_of(&piece) > budget {
                piece.pop();
                segments.push(std::mem::take(&mut piece));
                piece.push(c);
            }
        }
        current = piece;
    }

    if !current.is_empty() || segments.is_empty() {
        segments.push(current);
    }
    segments
}

/// Round a font size to the whole points genpdf works with
pub fn points(size: f64) -> u8 {
    size.round().clamp(1.0, 255.0) as u8
}

fn is_win1252(c: char) -> bool {
    matches!(c, ' '..='~' | '\u{a0}'..='\u{ff}') || WIN1252_EXTRAS.contains(&c)
}

/// Make text printable with the selected font.
///
/// Tabs expand to spaces and other control characters are dropped. Built-in
/// fonts only encode Windows-1252, so anything else becomes `?`.
pub fn prepare_text(text: &str, builtin: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\n' => out.push('\n'),
            '\t' => out.extend(std::iter::repeat(' ').take(TAB_WIDTH)),
            c if c.is_control() => {}
            c if builtin && !is_win1252(c) => out.push('?'),
            c => out.push(c),
        }
    }
    out
}

/// Applies page margins and draws the optional page-number footer
struct FooterDecorator {
    page: usize,
    margins: PageMargins,
    footer: Option<Style>,
}

impl genpdf::PageDecorator for FooterDecorator {
    fn decorate_page<'a>(
        &mut self,
        context: &Context,
        mut area: render::Area<'a>,
        style: Style,
    ) -> std::result::Result<render::Area<'a>, genpdf::error::Error> {
        self.page += 1;

        if let Some(footer_style) = &self.footer {
            let mut footer_area = area.clone();
            footer_area.add_margins(Margins::trbl(
                area.size().height - Mm::from(FOOTER_OFFSET_MM),
                Mm::from(self.margins.right),
                Mm::from(0.0),
                Mm::from(self.margins.left),
            ));

            let mut footer = Paragraph::new(format!("Page {}", self.page))
                .aligned(Alignment::Right)
                .styled(footer_style.clone());
            footer.render(context, footer_area, style)?;
        }

        area.add_margins(Margins::trbl(
            self.margins.top,
            self.margins.right,
            self.margins.bottom,
            self.margins.left,
        ));
        Ok(area)
    }
}

/// In-progress PDF document.
///
/// Construction selects the fonts, [`PdfCanvas::write_pages`] lays out the
/// plan and [`PdfCanvas::finalize`] consumes the canvas to write the file.
pub struct PdfCanvas {
    doc: Document,
    builtin_text: bool,
    line_height_mm: f64,
    body_style: Style,
    /// Printable width between the left and right margins
    text_width: Mm,
}

impl PdfCanvas {
    /// Create the document and configure page size, margins and fonts
    pub fn new(
        plan: &DocumentPlan,
        settings: &Settings,
        registry: &mut FontRegistry,
    ) -> Result<Self> {
        let body = registry.load(&plan.font_family)?;
        let mut doc = Document::new(body.family);

        let footer = if plan.page_numbers {
            let footer_font = registry.load(&settings.footer_font)?;
            let family = doc.add_font_family(footer_font.family);
            Some(
                Style::new()
                    .with_font_family(family)
                    .italic()
                    .with_font_size(FOOTER_FONT_SIZE),
            )
        } else {
            None
        };

        let (width, height) = plan.page_size_mm;
        let title = if plan.title.is_empty() {
            "pdfpipe"
        } else {
            plan.title.as_str()
        };

        doc.set_title(title);
        doc.set_minimal_conformance();
        doc.set_paper_size(Size::new(width, height));
        doc.set_font_size(points(plan.font_size));
        doc.set_line_spacing(
            plan.line_height_mm / (plan.font_size * PT_TO_MM * TYPICAL_LINE_RATIO),
        );
        doc.set_page_decorator(FooterDecorator {
            page: 0,
            margins: settings.margins,
            footer,
        });

        debug!(
            "Canvas created: {}x{} mm, font '{}' at {} pt",
            width, height, plan.font_family, plan.font_size
        );

        Ok(Self {
            doc,
            builtin_text: body.builtin,
            line_height_mm: plan.line_height_mm,
            body_style: Style::new().with_font_size(points(plan.font_size)),
            text_width: Mm::from(width - settings.margins.left - settings.margins.right),
        })
    }

    /// Push every block of the plan onto the document
    pub fn write_pages(&mut self, plan: &DocumentPlan) {
        for block in &plan.blocks {
            match block {
                Block::Title { text, font_size } => {
                    let style = Style::new().with_font_size(points(*font_size));
                    let title = self.paragraph(&prepare_text(text, self.builtin_text), style);
                    self.doc.push(title.aligned(Alignment::Center).styled(style));
                }
                Block::Body { text, source } => {
                    debug!("Writing {} bytes from {}", text.len(), source);
                    self.push_body(text);
                }
                Block::Spacing { mm } => {
                    self.doc.push(Break::new(mm / self.line_height_mm));
                }
                Block::PageBreak => {
                    self.doc.push(PageBreak::new());
                }
            }
        }
    }

    fn push_body(&mut self, text: &str) {
        let text = prepare_text(text, self.builtin_text);
        for line in text.lines() {
            if line.trim().is_empty() {
                self.doc.push(Break::new(1));
            } else {
                let paragraph = self.paragraph(line, self.body_style);
                self.doc.push(paragraph);
            }
        }
    }

    /// Paragraph for one source line, measured with `style`
    fn paragraph(&self, line: &str, style: Style) -> Paragraph {
        let cache = self.doc.font_cache();
        let mut paragraph = Paragraph::default();
        for segment in fit_segments(line, self.text_width, |s| style.str_width(cache, s)) {
            paragraph.push(segment);
        }
        paragraph
    }

    /// Serialize the document into PDF bytes
    pub fn render_to_bytes(self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.doc.render(&mut buffer)?;
        Ok(buffer)
    }

    /// Serialize the document and write it to `path`, returning the byte count
    pub fn finalize<P: AsRef<Path>>(self, path: P) -> Result<usize> {
        let path = path.as_ref();
        let bytes = self.render_to_bytes()?;

        fs::write(path, &bytes).map_err(|source| PdfPipeError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        info!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(bytes.len())
    }
}
