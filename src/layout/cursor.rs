use crate::text::{HardParagraph, SoftParagraph, Syllable, Text, Word};
use crate::TypesetError;
use std::fmt;

/// The levels of the text hierarchy, outermost first
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    HardParagraph,
    SoftParagraph,
    Word,
    Syllable,
}

impl Level {
    pub const ALL: [Level; 4] = [
        Level::HardParagraph,
        Level::SoftParagraph,
        Level::Word,
        Level::Syllable,
    ];

    /// The level containing this one
    pub fn superior(self) -> Option<Level> {
        match self {
            Level::HardParagraph => None,
            Level::SoftParagraph => Some(Level::HardParagraph),
            Level::Word => Some(Level::SoftParagraph),
            Level::Syllable => Some(Level::Word),
        }
    }

    /// Every level nested inside this one, outermost first
    pub fn inferiors(self) -> impl Iterator<Item = Level> {
        Level::ALL.into_iter().filter(move |level| *level > self)
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
struct Position {
    index: usize,
    /// Set when the last advance moved past the final element at this level
    rolled_over: bool,
}

/// A position in a [Text], tracked as one index per [Level].
///
/// The cursor walks the text syllable by syllable. Moving past the last element
/// at one level moves the level above it on, and every level below that starts
/// again from its first element. A cursor never owns any of the text; it is cheap
/// to copy, which is how the typesetter remembers where lines started.
///
/// Immutable cursors (see [Cursor::clone_immutably]) answer every query but refuse
/// to move, failing with [TypesetError::CursorImmutable].
#[derive(Clone)]
pub struct Cursor<'t> {
    text: &'t Text,
    hard_paragraph: Position,
    soft_paragraph: Position,
    word: Position,
    syllable: Position,
    exhausted: bool,
    immutable: bool,
}

impl fmt::Debug for Cursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("hard_paragraph", &self.hard_paragraph.index)
            .field("soft_paragraph", &self.soft_paragraph.index)
            .field("word", &self.word.index)
            .field("syllable", &self.syllable.index)
            .field("exhausted", &self.exhausted)
            .field("immutable", &self.immutable)
            .finish()
    }
}

impl<'t> Cursor<'t> {
    /// A cursor at the very start of `text`
    pub fn new(text: &'t Text) -> Cursor<'t> {
        Cursor {
            text,
            hard_paragraph: Position::default(),
            soft_paragraph: Position::default(),
            word: Position::default(),
            syllable: Position::default(),
            exhausted: text.is_empty(),
            immutable: false,
        }
    }

    pub fn text(&self) -> &'t Text {
        self.text
    }

    fn position(&self, level: Level) -> &Position {
        match level {
            Level::HardParagraph => &self.hard_paragraph,
            Level::SoftParagraph => &self.soft_paragraph,
            Level::Word => &self.word,
            Level::Syllable => &self.syllable,
        }
    }

    fn position_mut(&mut self, level: Level) -> &mut Position {
        match level {
            Level::HardParagraph => &mut self.hard_paragraph,
            Level::SoftParagraph => &mut self.soft_paragraph,
            Level::Word => &mut self.word,
            Level::Syllable => &mut self.syllable,
        }
    }

    /// The index of the current element within its parent's collection
    pub fn index(&self, level: Level) -> usize {
        self.position(level).index
    }

    /// Whether every element of the text has been walked past
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn is_immutable(&self) -> bool {
        self.immutable
    }

    pub fn hard_paragraph(&self) -> Option<&'t HardParagraph> {
        if self.exhausted {
            return None;
        }
        self.text.paragraphs().get(self.hard_paragraph.index)
    }

    pub fn soft_paragraph(&self) -> Option<&'t SoftParagraph> {
        self.hard_paragraph()?
            .soft_paragraphs()
            .get(self.soft_paragraph.index)
    }

    pub fn word(&self) -> Option<&'t Word> {
        self.soft_paragraph()?.words().get(self.word.index)
    }

    /// The unit the cursor points at: a whole word, or one of its syllables once
    /// the word has been hyphenated. [None] once the cursor is exhausted.
    pub fn current(&self) -> Option<&'t Syllable> {
        self.word()?.units().get(self.syllable.index)
    }

    /// How many elements share the current element's parent at `level`
    fn len(&self, level: Level) -> usize {
        let Some(hard) = self.text.paragraphs().get(self.hard_paragraph.index) else {
            return 0;
        };
        if level == Level::HardParagraph {
            return self.text.paragraphs().len();
        }
        let Some(soft) = hard.soft_paragraphs().get(self.soft_paragraph.index) else {
            return 0;
        };
        if level == Level::SoftParagraph {
            return hard.soft_paragraphs().len();
        }
        let Some(word) = soft.words().get(self.word.index) else {
            return 0;
        };
        match level {
            Level::Word => soft.words().len(),
            _ => word.units().len(),
        }
    }

    /// Whether the current element is the first of its parent at `level`
    pub fn is_first_of(&self, level: Level) -> bool {
        self.index(level) == 0
    }

    /// Whether the current element is the last of its parent at `level`
    pub fn is_last_of(&self, level: Level) -> bool {
        self.index(level) + 1 >= self.len(level)
    }

    /// Whether the cursor sits at the very start of the current element at
    /// `level`, i.e. every level inside it is at its first element
    pub fn at_beginning_of(&self, level: Level) -> bool {
        level.inferiors().all(|inferior| self.is_first_of(inferior))
    }

    /// Whether the cursor sits at the very end of the current element at
    /// `level`, i.e. every level inside it is at its last element
    pub fn at_end_of(&self, level: Level) -> bool {
        level.inferiors().all(|inferior| self.is_last_of(inferior))
    }

    /// Whether the most recent [Cursor::advance] moved past the last element at
    /// `level`. For example, `was_last_of(Level::Word)` means the advance crossed
    /// into a new soft paragraph.
    pub fn was_last_of(&self, level: Level) -> bool {
        self.position(level).rolled_over
    }

    fn check_mutable(&self) -> Result<(), TypesetError> {
        if self.immutable {
            Err(TypesetError::CursorImmutable)
        } else {
            Ok(())
        }
    }

    fn clear_rollovers(&mut self) {
        for level in Level::ALL {
            self.position_mut(level).rolled_over = false;
        }
    }

    /// Move to the next unit. Returns `false` once the whole text has been
    /// walked, leaving the cursor exhausted.
    pub fn advance(&mut self) -> Result<bool, TypesetError> {
        self.check_mutable()?;
        if self.exhausted {
            return Ok(false);
        }
        self.clear_rollovers();
        Ok(self.advance_level(Level::Syllable))
    }

    fn advance_level(&mut self, level: Level) -> bool {
        if !self.is_last_of(level) {
            self.position_mut(level).index += 1;
            for inferior in level.inferiors() {
                self.position_mut(inferior).index = 0;
            }
            return true;
        }

        self.position_mut(level).rolled_over = true;
        match level.superior() {
            Some(superior) => self.advance_level(superior),
            None => {
                self.exhausted = true;
                false
            }
        }
    }

    /// Move to the previous unit. An exhausted cursor rewinds onto the last
    /// unit. Returns `false` at the very start of the text.
    pub fn rewind(&mut self) -> Result<bool, TypesetError> {
        self.check_mutable()?;
        self.clear_rollovers();
        if self.exhausted {
            self.exhausted = false;
            return Ok(true);
        }
        Ok(self.rewind_level(Level::Syllable))
    }

    fn rewind_level(&mut self, level: Level) -> bool {
        if !self.is_first_of(level) {
            self.position_mut(level).index -= 1;
            // outermost first, so each level's length is known when it's reached
            for inferior in level.inferiors() {
                let last = self.len(inferior).saturating_sub(1);
                self.position_mut(inferior).index = last;
            }
            return true;
        }

        match level.superior() {
            Some(superior) => self.rewind_level(superior),
            None => false,
        }
    }

    /// Hyphenate the current word so that it is walked syllable by syllable,
    /// moving to its first syllable. Words that are already split are left
    /// alone. Returns whether the word now has more than one unit.
    pub fn hyphenate_current(&mut self) -> Result<bool, TypesetError> {
        self.check_mutable()?;
        let Some(word) = self.word() else {
            return Ok(false);
        };
        if !word.is_split() {
            word.hyphenate();
            self.syllable.index = 0;
        }
        Ok(word.units().len() > 1)
    }

    /// Whether the current unit cannot be broken any further: it is either a
    /// syllable of an already hyphenated word, or a word that hyphenates into a
    /// single syllable
    pub fn is_monosyllabic(&self) -> bool {
        match self.word() {
            Some(word) => word.is_split() || word.is_monosyllabic(),
            None => true,
        }
    }

    /// A copy of this cursor at the same position that can be moved
    pub fn clone_mutably(&self) -> Cursor<'t> {
        Cursor {
            immutable: false,
            ..self.clone()
        }
    }

    /// A copy of this cursor at the same position that refuses to move
    pub fn clone_immutably(&self) -> Cursor<'t> {
        Cursor {
            immutable: true,
            ..self.clone()
        }
    }
}
