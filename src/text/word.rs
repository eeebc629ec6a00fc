use super::syllable::Syllable;
use crate::{font::FontInstance, units::Pt, TypesetError};
use std::cell::{Cell, OnceCell};
use std::fmt;
use std::rc::Rc;

/// Discretionary hyphen. Words containing it are only ever split where it occurs.
pub const SOFT_HYPHEN: char = '\u{00AD}';

/// Splits a word into syllables, e.g. `"typesetting"` into
/// `["type", "set", "ting"]`. Returning [None] or a single syllable means the
/// word cannot usefully be hyphenated.
pub type Hyphenator = Rc<dyn Fn(&str) -> Option<Vec<String>>>;

/// A run of non-whitespace text from the source.
///
/// Until it is hyphenated a word is laid out as one unbreakable unit. Hyphenation
/// happens on demand, when the word does not fit at the end of a line: the result
/// is cached, and once a word has been split it stays split.
pub struct Word {
    source: String,
    space: Option<char>,
    whole: Syllable,
    hyphenator: Option<Hyphenator>,
    syllables: OnceCell<Vec<Syllable>>,
    split: Cell<bool>,
}

impl fmt::Debug for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Word")
            .field("source", &self.source)
            .field("space", &self.space)
            .field("split", &self.split.get())
            .finish()
    }
}

impl Word {
    /// Create a word from its source text and the whitespace character that
    /// followed it, if any. Soft hyphens in `source` are not shown.
    pub fn new<S: Into<String>>(
        source: S,
        space: Option<char>,
        font: Rc<dyn FontInstance>,
        hyphenator: Option<Hyphenator>,
    ) -> Result<Word, TypesetError> {
        let source = source.into();
        let visible: String = source.chars().filter(|&ch| ch != SOFT_HYPHEN).collect();
        let space_width = space.map(|ch| font.char_width(ch)).unwrap_or_default();
        let whole = Syllable::new(visible, font, true, space_width)?;

        Ok(Word {
            source,
            space,
            whole,
            hyphenator,
            syllables: OnceCell::new(),
            split: Cell::new(false),
        })
    }

    /// The word as it appeared in the source, soft hyphens included
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The whitespace character that followed the word in the source
    pub fn space(&self) -> Option<char> {
        self.space
    }

    /// The word laid out as a single unit
    pub fn whole(&self) -> &Syllable {
        &self.whole
    }

    pub fn width(&self) -> Pt {
        self.whole.width()
    }

    pub fn font(&self) -> &Rc<dyn FontInstance> {
        self.whole.font()
    }

    /// The syllables this word hyphenates into, computed on first use. Does not
    /// change how the word is laid out; see [Word::hyphenate].
    pub fn syllables(&self) -> &[Syllable] {
        self.syllables.get_or_init(|| self.decompose())
    }

    /// Whether hyphenation leaves the word in one piece
    pub fn is_monosyllabic(&self) -> bool {
        self.syllables().len() == 1
    }

    /// Hyphenate the word and lay it out syllable by syllable from now on
    pub fn hyphenate(&self) -> &[Syllable] {
        self.split.set(true);
        self.syllables()
    }

    /// Whether the word is laid out syllable by syllable
    pub fn is_split(&self) -> bool {
        self.split.get()
    }

    /// The units the word is currently laid out as: the whole word, or its
    /// syllables once it has been hyphenated
    pub fn units(&self) -> &[Syllable] {
        if self.split.get() {
            self.syllables()
        } else {
            std::slice::from_ref(&self.whole)
        }
    }

    fn decompose(&self) -> Vec<Syllable> {
        let pieces = self.pieces();
        if pieces.len() < 2 {
            return vec![self.whole.clone()];
        }

        let font = self.whole.font();
        let last = pieces.len() - 1;
        pieces
            .into_iter()
            .enumerate()
            .map(|(i, piece)| {
                Syllable::new(piece, font.clone(), i == last, self.whole.space_width())
            })
            .collect::<Result<Vec<Syllable>, TypesetError>>()
            .unwrap_or_else(|_| vec![self.whole.clone()])
    }

    fn pieces(&self) -> Vec<String> {
        if self.source.contains(SOFT_HYPHEN) {
            return self
                .source
                .split(SOFT_HYPHEN)
                .filter(|piece| !piece.trim().is_empty())
                .map(String::from)
                .collect();
        }

        let Some(hyphenator) = &self.hyphenator else {
            return Vec::new();
        };
        let Some((stem, tail)) = partition(&self.source) else {
            return Vec::new();
        };

        let mut pieces: Vec<String> = hyphenator(stem)
            .unwrap_or_default()
            .into_iter()
            .filter(|piece| !piece.is_empty())
            .collect();
        if pieces.concat() != stem {
            if !pieces.is_empty() {
                log::warn!("hyphenation of {stem:?} changed its text: {pieces:?}");
            }
            return Vec::new();
        }
        if let Some(last) = pieces.last_mut() {
            last.push_str(tail);
        }
        pieces
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Split a word into its leading word characters and trailing punctuation, e.g.
/// `"ending."` into `("ending", ".")`. Words that don't have that shape aren't
/// handed to the hyphenator.
fn partition(word: &str) -> Option<(&str, &str)> {
    let end = word
        .find(|ch: char| !is_word_char(ch))
        .unwrap_or(word.len());
    let (stem, tail) = word.split_at(end);
    if stem.is_empty() || tail.chars().any(is_word_char) {
        return None;
    }
    Some((stem, tail))
}
