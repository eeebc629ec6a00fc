use super::word::Word;
use crate::{units::Pt, TypesetError};

/// Horizontal alignment of the lines of a paragraph
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Right,
    Center,
    /// Justified: lines are stretched to the full width of the region, except
    /// for the last line of a paragraph which is set ragged like [Align::Left]
    Block,
}

/// Paragraph-level layout settings
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ParagraphStyle {
    pub align: Align,
    /// Space above the paragraph. Skipped at the top of a region.
    pub margin_top: Pt,
    /// Space below the paragraph. Dropped if it does not fit in the region.
    pub margin_bottom: Pt,
    /// The fewest lines of this paragraph allowed to be stranded on their own
    /// at the bottom (orphans) or top (widows) of a region
    pub dangle_threshold: usize,
}

impl Default for ParagraphStyle {
    fn default() -> Self {
        ParagraphStyle {
            align: Align::Left,
            margin_top: Pt::ZERO,
            margin_bottom: Pt::ZERO,
            dangle_threshold: 2,
        }
    }
}

impl ParagraphStyle {
    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn margins(mut self, top: impl Into<Pt>, bottom: impl Into<Pt>) -> Self {
        self.margin_top = top.into();
        self.margin_bottom = bottom.into();
        self
    }

    pub fn dangle_threshold(mut self, lines: usize) -> Self {
        self.dangle_threshold = lines;
        self
    }
}

/// A run of words between explicit line breaks. Soft paragraphs always start
/// on a new line but share their hard paragraph's margins.
#[derive(Debug)]
pub struct SoftParagraph {
    words: Vec<Word>,
    align: Align,
}

impl SoftParagraph {
    pub fn new(words: Vec<Word>, align: Align) -> Result<SoftParagraph, TypesetError> {
        if words.is_empty() {
            return Err(TypesetError::Validation(
                "a soft paragraph needs at least one word".to_string(),
            ));
        }
        Ok(SoftParagraph { words, align })
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn align(&self) -> Align {
        self.align
    }
}

/// A run of soft paragraphs between blank lines, carrying the margins and
/// orphan/widow settings of its [ParagraphStyle]
#[derive(Debug)]
pub struct HardParagraph {
    soft_paragraphs: Vec<SoftParagraph>,
    style: ParagraphStyle,
}

impl HardParagraph {
    pub fn new(
        soft_paragraphs: Vec<SoftParagraph>,
        style: ParagraphStyle,
    ) -> Result<HardParagraph, TypesetError> {
        if soft_paragraphs.is_empty() {
            return Err(TypesetError::Validation(
                "a hard paragraph needs at least one soft paragraph".to_string(),
            ));
        }
        Ok(HardParagraph {
            soft_paragraphs,
            style,
        })
    }

    pub fn soft_paragraphs(&self) -> &[SoftParagraph] {
        &self.soft_paragraphs
    }

    pub fn style(&self) -> &ParagraphStyle {
        &self.style
    }

    pub fn align(&self) -> Align {
        self.style.align
    }
}
