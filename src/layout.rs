//! Document plan: the ordered blocks the canvas draws for one run.

use crate::config::Config;
use crate::input::{ContentSource, ContentUnit};

/// Title size relative to the body font size
pub const TITLE_SCALE: f64 = 1.5;

/// Body line height in millimeters per point of font size
pub const LINE_HEIGHT_FACTOR: f64 = 0.45;

/// Blank lines inserted between units when page breaks are off
pub const UNIT_GAP_LINES: f64 = 2.0;

/// A single layout step
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Centered title line
    Title { text: String, font_size: f64 },
    /// Wrapped body text for one content unit
    Body { text: String, source: ContentSource },
    /// Vertical advance in millimeters
    Spacing { mm: f64 },
    /// Start a new page
    PageBreak,
}

/// Everything the canvas needs to draw a document
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentPlan {
    pub title: String,
    /// Page width and height in millimeters
    pub page_size_mm: (f64, f64),
    pub font_family: String,
    pub font_size: f64,
    pub line_height_mm: f64,
    pub page_numbers: bool,
    pub blocks: Vec<Block>,
}

impl DocumentPlan {
    /// Lay out the title and content units according to the configuration
    pub fn new(config: &Config, units: &[ContentUnit]) -> Self {
        let line_height_mm = config.font_size * LINE_HEIGHT_FACTOR;
        let mut blocks = Vec::with_capacity(units.len() * 2 + 2);

        if !config.title.is_empty() {
            blocks.push(Block::Title {
                text: config.title.clone(),
                font_size: config.font_size * TITLE_SCALE,
            });
            blocks.push(Block::Spacing {
                mm: config.font_size,
            });
        }

        for (i, unit) in units.iter().enumerate() {
            blocks.push(Block::Body {
                text: unit.text.clone(),
                source: unit.source.clone(),
            });

            if i + 1 < units.len() {
                if config.page_breaks {
                    blocks.push(Block::PageBreak);
                } else {
                    blocks.push(Block::Spacing {
                        mm: line_height_mm * UNIT_GAP_LINES,
                    });
                }
            }
        }

        Self {
            title: config.title.clone(),
            page_size_mm: config.page_size_mm(),
            font_family: config.font_family.clone(),
            font_size: config.font_size,
            line_height_mm,
            page_numbers: config.page_numbers,
            blocks,
        }
    }

    /// Number of body blocks, one per content unit
    pub fn body_count(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| matches!(b, Block::Body { .. }))
            .count()
    }

    /// Fewest pages the rendered document can have
    pub fn min_pages(&self) -> usize {
        1 + self
            .blocks
            .iter()
            .filter(|b| matches!(b, Block::PageBreak))
            .count()
    }
}
