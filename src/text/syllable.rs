use crate::{font::FontInstance, units::Pt, TypesetError};
use std::rc::Rc;

/// The character appended to a syllable when a line breaks inside its word
pub const HYPHEN: char = '-';

/// The smallest unbreakable run of text, set in a single font.
///
/// A syllable that is not `final` sits in the middle of a word: if a line breaks
/// after it, it has to be shown with a trailing hyphen. A `final` syllable ends
/// its word and is followed by the width of whatever whitespace followed the word
/// in the source.
///
/// Syllables never change once built, so their widths are measured up front.
#[derive(Debug, Clone)]
pub struct Syllable {
    text: String,
    font: Rc<dyn FontInstance>,
    is_final: bool,
    space_width: Pt,
    width: Pt,
    hyphened_width: Pt,
}

impl Syllable {
    /// Create a syllable, failing if `text` is empty
    pub fn new<S: Into<String>>(
        text: S,
        font: Rc<dyn FontInstance>,
        is_final: bool,
        space_width: Pt,
    ) -> Result<Syllable, TypesetError> {
        let text = text.into();
        if text.is_empty() {
            return Err(TypesetError::Validation(
                "a syllable needs at least one character".to_string(),
            ));
        }

        let width = font.chars_width(&text);
        let hyphened_width = if is_final {
            width
        } else {
            font.chars_width(&format!("{text}{HYPHEN}"))
        };

        Ok(Syllable {
            text,
            font,
            is_final,
            space_width: if is_final { space_width } else { Pt::ZERO },
            width,
            hyphened_width,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn font(&self) -> &Rc<dyn FontInstance> {
        &self.font
    }

    /// Whether this syllable ends its word
    pub fn is_final(&self) -> bool {
        self.is_final
    }

    /// Width of the whitespace following this syllable; zero unless it is final
    pub fn space_width(&self) -> Pt {
        self.space_width
    }

    pub fn width(&self) -> Pt {
        self.width
    }

    /// Width of the syllable as it would be shown at the end of a line
    pub fn hyphened_width(&self) -> Pt {
        self.hyphened_width
    }

    /// The height of a line containing this syllable
    pub fn height(&self) -> Pt {
        self.font.line_height()
    }

    /// The syllable as it is shown when a line breaks after it. Final syllables
    /// are returned as-is.
    pub fn with_hyphen(&self) -> Syllable {
        if self.is_final {
            return self.clone();
        }

        let text = format!("{}{HYPHEN}", self.text);
        Syllable {
            text,
            font: self.font.clone(),
            is_final: true,
            space_width: Pt::ZERO,
            width: self.hyphened_width,
            hyphened_width: self.hyphened_width,
        }
    }
}
