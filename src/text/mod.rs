//! The text model that gets typeset.
//!
//! Text is a strict hierarchy: a [Text] holds [HardParagraph]s (separated by
//! blank lines in the source), each of which holds [SoftParagraph]s (separated by
//! single newlines), each of which holds [Word]s. Words split into [Syllable]s
//! only when a line needs them to.
//!
//! Nothing in the tree points back at its parent; layout walks it with a
//! [crate::layout::Cursor], which only holds indices.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use ps_gen::{FixedPitchFont, ParagraphStyle, Pt, Text};
//!
//! let font = Rc::new(FixedPitchFont::courier(Pt(10.0)));
//! let text = Text::from_source(
//!     "First paragraph,\nsecond line.\n\nSecond paragraph.",
//!     font,
//!     None,
//!     ParagraphStyle::default(),
//! )
//! .expect("valid text");
//!
//! assert_eq!(text.paragraphs().len(), 2);
//! assert_eq!(text.paragraphs()[0].soft_paragraphs().len(), 2);
//! ```

mod paragraph;
mod syllable;
mod word;

pub use paragraph::*;
pub use syllable::*;
pub use word::*;

use crate::font::FontInstance;
use crate::layout::Typesetter;
use crate::region::Region;
use crate::TypesetError;
use std::rc::Rc;

/// The root of the text hierarchy
#[derive(Debug, Default)]
pub struct Text {
    paragraphs: Vec<HardParagraph>,
}

impl Text {
    pub fn new(paragraphs: Vec<HardParagraph>) -> Text {
        Text { paragraphs }
    }

    /// Build text from plain source. Blank lines separate hard paragraphs, single
    /// newlines separate soft paragraphs, and breaking whitespace separates words.
    /// Non-breaking spaces stay inside their words.
    ///
    /// Every word is set in `font`, and every paragraph gets `style`.
    pub fn from_source(
        source: &str,
        font: Rc<dyn FontInstance>,
        hyphenator: Option<Hyphenator>,
        style: ParagraphStyle,
    ) -> Result<Text, TypesetError> {
        // normalize newlines
        let source = source.replace("\r\n", "\n").replace('\r', "\n");

        let mut paragraphs: Vec<HardParagraph> = Vec::new();
        let mut soft_paragraphs: Vec<SoftParagraph> = Vec::new();
        for line in source.split('\n') {
            let words = tokenize(line)
                .into_iter()
                .map(|(token, space)| Word::new(token, space, font.clone(), hyphenator.clone()))
                .collect::<Result<Vec<Word>, TypesetError>>()?;

            if words.is_empty() {
                if !soft_paragraphs.is_empty() {
                    paragraphs.push(HardParagraph::new(
                        std::mem::take(&mut soft_paragraphs),
                        style,
                    )?);
                }
            } else {
                soft_paragraphs.push(SoftParagraph::new(words, style.align)?);
            }
        }
        if !soft_paragraphs.is_empty() {
            paragraphs.push(HardParagraph::new(soft_paragraphs, style)?);
        }

        Ok(Text { paragraphs })
    }

    pub fn paragraphs(&self) -> &[HardParagraph] {
        &self.paragraphs
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    /// Lay the text out into `regions`, in order, returning the regions that were
    /// used. Fails with [TypesetError::RegionsExhausted] if the regions run out
    /// before all of the text is placed.
    pub fn typeset<R, I>(&self, regions: I) -> Result<Vec<R>, TypesetError>
    where
        R: Region,
        I: IntoIterator<Item = R>,
    {
        let mut typesetter = Typesetter::new(self, regions);
        typesetter.typeset()?;
        Ok(typesetter.into_regions())
    }
}

/// Whitespace that lines may break at. Non-breaking spaces (U+00A0, U+2007,
/// U+202F) are deliberately absent.
pub fn is_breaking_space(ch: char) -> bool {
    matches!(
        ch,
        ' ' | '\t'
            | '\u{1680}'
            | '\u{2000}'..='\u{2006}'
            | '\u{2008}'..='\u{200B}'
            | '\u{205F}'
            | '\u{3000}'
    )
}

/// Split a line into words, pairing each with the whitespace that followed it.
/// Runs of whitespace collapse into their first character.
fn tokenize(line: &str) -> Vec<(String, Option<char>)> {
    let mut tokens: Vec<(String, Option<char>)> = Vec::new();
    let mut current = String::new();
    for ch in line.chars() {
        if is_breaking_space(ch) {
            if has_content(&current) {
                tokens.push((std::mem::take(&mut current), Some(ch)));
            } else {
                current.clear();
            }
        } else {
            current.push(ch);
        }
    }
    if has_content(&current) {
        tokens.push((current, None));
    }
    tokens
}

fn has_content(token: &str) -> bool {
    token.chars().any(|ch| ch != SOFT_HYPHEN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FixedPitchFont;
    use crate::units::Pt;

    fn mono() -> Rc<dyn FontInstance> {
        Rc::new(FixedPitchFont::new("Mono", Pt(10.0)).with_advance(0.5))
    }

    fn sources(paragraph: &SoftParagraph) -> Vec<&str> {
        paragraph.words().iter().map(Word::source).collect()
    }

    #[test]
    fn blank_lines_separate_hard_paragraphs() {
        let text = Text::from_source(
            "one two\nthree\n\n  \t\nfour\r\nfive\r\rsix",
            mono(),
            None,
            ParagraphStyle::default(),
        )
        .expect("valid text");

        let shape: Vec<Vec<Vec<&str>>> = text
            .paragraphs()
            .iter()
            .map(|hard| hard.soft_paragraphs().iter().map(sources).collect())
            .collect();
        assert_eq!(
            shape,
            vec![
                vec![vec!["one", "two"], vec!["three"]],
                vec![vec!["four"], vec!["five"]],
                vec![vec!["six"]],
            ]
        );
    }

    #[test]
    fn words_remember_the_space_that_followed() {
        let tokens = tokenize("a\u{2003}b  c\u{a0}d\te");
        assert_eq!(
            tokens,
            vec![
                ("a".to_string(), Some('\u{2003}')),
                ("b".to_string(), Some(' ')),
                ("c\u{a0}d".to_string(), Some('\t')),
                ("e".to_string(), None),
            ]
        );
    }

    #[test]
    fn lone_soft_hyphens_are_not_words() {
        assert_eq!(tokenize("\u{ad} x \u{ad}"), vec![("x".to_string(), Some(' '))]);
    }

    #[test]
    fn empty_source_is_empty_text() {
        let text = Text::from_source("\n\n \n", mono(), None, ParagraphStyle::default())
            .expect("valid text");
        assert!(text.is_empty());
    }

    #[test]
    fn styles_apply_to_every_paragraph() {
        let style = ParagraphStyle::default()
            .align(Align::Block)
            .margins(Pt(6.0), Pt(3.0))
            .dangle_threshold(3);
        let text = Text::from_source("a\nb\n\nc", mono(), None, style).expect("valid text");
        for hard in text.paragraphs() {
            assert_eq!(hard.style(), &style);
            for soft in hard.soft_paragraphs() {
                assert_eq!(soft.align(), Align::Block);
            }
        }
    }
}
