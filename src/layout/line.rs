use super::cursor::{Cursor, Level};
use crate::region::Region;
use crate::text::{Align, SoftParagraph, Syllable};
use crate::{units::Pt, TypesetError};

/// One laid out line of text: the units that fell between two cursor positions,
/// and where it sits in its region.
///
/// Lines are built greedily by [Line::build] and don't know their final
/// horizontal positions until they are asked for [Line::placements].
#[derive(Debug, Clone)]
pub struct Line<'t> {
    start: Cursor<'t>,
    units: Vec<Syllable>,
    top: Pt,
    height: Pt,
    available: Pt,
    align: Align,
    hard_paragraph: usize,
    first_of_hard_paragraph: bool,
    last_of_hard_paragraph: bool,
    ends_soft_paragraph: bool,
    forced: bool,
}

/// What came of trying to build a line
#[derive(Debug)]
pub enum LineOutcome<'t> {
    Fits(Line<'t>),
    /// The first unit is wider than the region and can't be split, so it was
    /// set alone on a line that overflows the region's edge
    Overflow(Line<'t>),
    /// The region has no room left below `top` for a line this tall
    NeedsNewRegion,
}

/// A unit of a line and its offset from the left edge of the line
#[derive(Debug, Copy, Clone)]
pub struct Placement<'a> {
    pub x: Pt,
    pub syllable: &'a Syllable,
}

impl<'t> Line<'t> {
    /// Build a line starting at `top` in `region`, taking units from `cursor`
    /// until the next one doesn't fit or the soft paragraph ends.
    ///
    /// A word that doesn't fit is hyphenated and its syllables tried in turn. On
    /// [LineOutcome::Fits] and [LineOutcome::Overflow] the cursor has moved past
    /// the units on the line; on [LineOutcome::NeedsNewRegion] it has not moved,
    /// although the unit it points at may have been hyphenated.
    pub fn build<R: Region + ?Sized>(
        region: &R,
        top: Pt,
        cursor: &mut Cursor<'t>,
    ) -> Result<LineOutcome<'t>, TypesetError> {
        let start = cursor.clone_immutably();
        let mut units: Vec<Syllable> = Vec::new();
        let mut height = Pt::ZERO;
        let mut available = Pt::ZERO;
        let mut word_space = Pt::ZERO;
        let mut ends_soft_paragraph = false;

        while let Some(unit) = cursor.current() {
            let candidate_height = height.max(unit.height());
            let Some(width) = region.line_width_at(top, candidate_height) else {
                if units.is_empty() {
                    return Ok(LineOutcome::NeedsNewRegion);
                }
                break;
            };

            let gap = units.last().map(Syllable::space_width).unwrap_or_default();
            if word_space + gap + unit.hyphened_width() > width {
                if cursor.is_monosyllabic() {
                    if units.is_empty() {
                        return Ok(LineOutcome::Overflow(Line::forced(top, width, cursor)?));
                    }
                    break;
                }
                cursor.hyphenate_current()?;
                continue;
            }

            height = candidate_height;
            available = width;
            word_space += gap + unit.width();
            units.push(unit.clone());

            if !cursor.advance()? || cursor.was_last_of(Level::Word) {
                ends_soft_paragraph = true;
                break;
            }
        }

        if units.is_empty() {
            return Err(TypesetError::Validation(
                "no text left to build a line from".to_string(),
            ));
        }
        Ok(LineOutcome::Fits(Line::close(
            start,
            units,
            top,
            height,
            available,
            ends_soft_paragraph,
            cursor,
        )))
    }

    /// Build a line holding just the unit under `cursor`, whether or not it fits
    /// in `available`, and move the cursor past it
    pub fn forced(
        top: Pt,
        available: Pt,
        cursor: &mut Cursor<'t>,
    ) -> Result<Line<'t>, TypesetError> {
        let start = cursor.clone_immutably();
        let unit = cursor.current().ok_or_else(|| {
            TypesetError::Validation("no text left to build a line from".to_string())
        })?;
        let ends_soft_paragraph = !cursor.advance()? || cursor.was_last_of(Level::Word);

        let mut line = Line::close(
            start,
            vec![unit.clone()],
            top,
            unit.height(),
            available,
            ends_soft_paragraph,
            cursor,
        );
        line.forced = true;
        Ok(line)
    }

    fn close(
        start: Cursor<'t>,
        mut units: Vec<Syllable>,
        top: Pt,
        height: Pt,
        available: Pt,
        ends_soft_paragraph: bool,
        cursor: &Cursor<'t>,
    ) -> Line<'t> {
        // a line that breaks inside a word shows a hyphen
        if let Some(last) = units.last_mut() {
            if !last.is_final() {
                *last = last.with_hyphen();
            }
        }

        Line {
            align: start
                .soft_paragraph()
                .map(SoftParagraph::align)
                .unwrap_or_default(),
            hard_paragraph: start.index(Level::HardParagraph),
            first_of_hard_paragraph: start.at_beginning_of(Level::HardParagraph),
            last_of_hard_paragraph: ends_soft_paragraph
                && cursor.was_last_of(Level::SoftParagraph),
            ends_soft_paragraph,
            start,
            units,
            top,
            height,
            available,
            forced: false,
        }
    }

    /// Where the line started; immutable so it can only be used to go back to
    pub fn start(&self) -> &Cursor<'t> {
        &self.start
    }

    pub fn units(&self) -> &[Syllable] {
        &self.units
    }

    /// The line's text, as it would be shown
    pub fn text(&self) -> String {
        let mut text = String::new();
        let last = self.units.len().saturating_sub(1);
        for (i, unit) in self.units.iter().enumerate() {
            text.push_str(unit.text());
            if i < last && unit.space_width() > Pt::ZERO {
                text.push(' ');
            }
        }
        text
    }

    /// Distance from the top of the region to the top of the line
    pub fn top(&self) -> Pt {
        self.top
    }

    pub fn height(&self) -> Pt {
        self.height
    }

    /// The width the region offered the line
    pub fn available(&self) -> Pt {
        self.available
    }

    /// Width of the units themselves
    pub fn ink_width(&self) -> Pt {
        self.units.iter().map(Syllable::width).sum()
    }

    /// Natural width of the whitespace between the units. The space after the
    /// last unit hangs past the end of the line and isn't counted.
    pub fn space_width(&self) -> Pt {
        let last = self.units.len().saturating_sub(1);
        self.units
            .iter()
            .take(last)
            .map(Syllable::space_width)
            .sum()
    }

    /// Natural width of the line
    pub fn width(&self) -> Pt {
        self.ink_width() + self.space_width()
    }

    pub fn align(&self) -> Align {
        self.align
    }

    /// The alignment the line is actually set with. The last line of a justified
    /// paragraph is set ragged, as are lines forced into a region too small for
    /// them.
    pub fn effective_align(&self) -> Align {
        if self.forced || (self.align == Align::Block && self.ends_soft_paragraph) {
            Align::Left
        } else {
            self.align
        }
    }

    /// Index of the hard paragraph the line belongs to
    pub fn hard_paragraph(&self) -> usize {
        self.hard_paragraph
    }

    pub fn is_first_of_hard_paragraph(&self) -> bool {
        self.first_of_hard_paragraph
    }

    pub fn is_last_of_hard_paragraph(&self) -> bool {
        self.last_of_hard_paragraph
    }

    pub fn ends_soft_paragraph(&self) -> bool {
        self.ends_soft_paragraph
    }

    /// Whether the line was forced into a region it doesn't fit in
    pub fn is_forced(&self) -> bool {
        self.forced
    }

    /// Horizontal offset of each unit from the left edge of the line
    pub fn placements(&self) -> Vec<Placement<'_>> {
        let slack = self.available - self.width();
        let (mut x, stretch) = match self.effective_align() {
            Align::Left => (Pt::ZERO, Pt::ZERO),
            Align::Right => (slack, Pt::ZERO),
            Align::Center => (slack / 2.0, Pt::ZERO),
            Align::Block => {
                let gaps = self.stretchable_gaps();
                if gaps == 0 {
                    (Pt::ZERO, Pt::ZERO)
                } else {
                    (Pt::ZERO, slack.max(Pt::ZERO) / gaps.max(2) as f32)
                }
            }
        };

        let last = self.units.len().saturating_sub(1);
        let mut placements = Vec::with_capacity(self.units.len());
        for (i, unit) in self.units.iter().enumerate() {
            placements.push(Placement { x, syllable: unit });
            x += unit.width();
            if i < last && unit.space_width() > Pt::ZERO {
                x += unit.space_width() + stretch;
            }
        }
        placements
    }

    /// Gaps between words; syllables of one word are never pulled apart
    fn stretchable_gaps(&self) -> usize {
        let last = self.units.len().saturating_sub(1);
        self.units
            .iter()
            .take(last)
            .filter(|unit| unit.space_width() > Pt::ZERO)
            .count()
    }
}
