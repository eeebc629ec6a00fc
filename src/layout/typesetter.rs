use super::cursor::{Cursor, Level};
use super::line::{Line, LineOutcome};
use crate::region::Region;
use crate::text::{ParagraphStyle, Text};
use crate::{units::Pt, TypesetError};

/// A region and the lines placed in it so far
struct Slot<'t, R> {
    region: R,
    lines: Vec<Line<'t>>,
}

impl<'t, R> Slot<'t, R> {
    fn new(region: R) -> Slot<'t, R> {
        Slot {
            region,
            lines: Vec::new(),
        }
    }
}

/// Flows a [Text] through a sequence of regions.
///
/// Regions are pulled from the iterator one at a time, as the text needs them,
/// so the sequence may be endless. Only the current region and the one before it
/// are ever revisited; the one before is kept so that a widowed line can be
/// balanced by pulling a line back from it.
///
/// ```
/// use std::rc::Rc;
/// use ps_gen::{FixedPitchFont, ParagraphStyle, Pt, Rect, Text, TextBox};
/// use ps_gen::layout::Typesetter;
///
/// let font = Rc::new(FixedPitchFont::courier(Pt(10.0)));
/// let text = Text::from_source("Hello, world!", font, None, ParagraphStyle::default())
///     .expect("valid text");
/// let boxes = std::iter::repeat_with(|| {
///     TextBox::new(Rect::new(Pt(72.0), Pt(72.0), Pt(200.0), Pt(100.0)))
/// });
///
/// let mut typesetter = Typesetter::new(&text, boxes);
/// typesetter.typeset().expect("enough boxes");
/// let boxes = typesetter.into_regions();
/// assert_eq!(boxes.len(), 1);
/// assert_eq!(boxes[0].texts(), vec!["Hello, world!".to_string()]);
/// ```
pub struct Typesetter<'t, R, I> {
    text: &'t Text,
    regions: I,
    cursor: Cursor<'t>,
    current: Option<Slot<'t, R>>,
    previous: Option<Slot<'t, R>>,
    done: Vec<R>,
    forced: usize,
}

impl<'t, R, I> Typesetter<'t, R, I>
where
    R: Region,
    I: Iterator<Item = R>,
{
    pub fn new<T>(text: &'t Text, regions: T) -> Typesetter<'t, R, I>
    where
        T: IntoIterator<Item = R, IntoIter = I>,
    {
        Typesetter {
            text,
            regions: regions.into_iter(),
            cursor: Cursor::new(text),
            current: None,
            previous: None,
            done: Vec::new(),
            forced: 0,
        }
    }

    pub fn text(&self) -> &'t Text {
        self.text
    }

    /// How many units had to be forced into regions too small for them
    pub fn forced_placements(&self) -> usize {
        self.forced
    }

    /// Every region that was pulled from the iterator, in order
    pub fn into_regions(self) -> Vec<R> {
        let mut regions = self.done;
        regions.extend(self.previous.map(|slot| slot.region));
        regions.extend(self.current.map(|slot| slot.region));
        regions
    }

    /// Lay out the rest of the text. Fails with [TypesetError::RegionsExhausted]
    /// if the regions run out first.
    pub fn typeset(&mut self) -> Result<(), TypesetError> {
        while !self.cursor.is_exhausted() {
            if self.current.is_none() {
                self.switch_region()?;
            }
            self.typeset_hard_paragraph()?;
        }
        Ok(())
    }

    fn slot(&mut self) -> Result<&mut Slot<'t, R>, TypesetError> {
        self.current.as_mut().ok_or(TypesetError::RegionsExhausted)
    }

    fn switch_region(&mut self) -> Result<(), TypesetError> {
        let region = self.regions.next().ok_or(TypesetError::RegionsExhausted)?;
        if let Some(previous) = self.previous.take() {
            self.done.push(previous.region);
        }
        self.previous = self.current.take();
        self.current = Some(Slot::new(region));
        log::debug!(
            "moving to region {}",
            self.done.len() + usize::from(self.previous.is_some())
        );
        Ok(())
    }

    fn typeset_hard_paragraph(&mut self) -> Result<(), TypesetError> {
        let Some(paragraph) = self.cursor.hard_paragraph() else {
            return Ok(());
        };
        let style = *paragraph.style();
        let hard_paragraph = self.cursor.index(Level::HardParagraph);
        self.apply_top_margin(style.margin_top)?;

        loop {
            let (lines, region_full) = self.prepare_lines()?;
            let region_empty = self.slot()?.region.is_empty();

            if region_full && self.move_orphans(hard_paragraph, &lines, &style)? {
                continue;
            }

            let Some(last) = lines.last() else {
                if region_empty {
                    if self.force_oversized()? {
                        return self.apply_bottom_margin(style.margin_bottom);
                    }
                } else {
                    self.switch_region()?;
                }
                continue;
            };

            if last.is_last_of_hard_paragraph()
                && region_empty
                && lines.len() <= style.dangle_threshold
                && self.pull_back(last.hard_paragraph(), &style)
            {
                continue;
            }

            let ends_paragraph = last.is_last_of_hard_paragraph();
            let slot = self.slot()?;
            for line in lines {
                slot.region.append(&line);
                slot.lines.push(line);
            }

            if ends_paragraph {
                return self.apply_bottom_margin(style.margin_bottom);
            }
            if region_full {
                self.switch_region()?;
            }
        }
    }

    /// Build lines into the current region until the soft paragraph ends or the
    /// region fills up. Returns the lines and whether the region filled up.
    fn prepare_lines(&mut self) -> Result<(Vec<Line<'t>>, bool), TypesetError> {
        let slot = self.current.as_ref().ok_or(TypesetError::RegionsExhausted)?;
        let mut top = slot.region.cursor();
        let mut lines: Vec<Line<'t>> = Vec::new();
        loop {
            let line = match Line::build(&slot.region, top, &mut self.cursor)? {
                LineOutcome::Fits(line) => line,
                LineOutcome::Overflow(line) => {
                    log::warn!(
                        "{:?} is wider than its region ({} wide at {}), setting it alone",
                        line.text(),
                        line.available(),
                        line.top()
                    );
                    self.forced += 1;
                    line
                }
                LineOutcome::NeedsNewRegion => return Ok((lines, true)),
            };

            top = line.top() + line.height();
            let ends_soft_paragraph = line.ends_soft_paragraph();
            lines.push(line);
            if ends_soft_paragraph {
                return Ok((lines, false));
            }
        }
    }

    /// Move the opening lines of a paragraph on to the next region if too few of
    /// them would be left at the bottom of this one. Those lines are the ones
    /// already placed here plus the freshly prepared `lines`. Nothing moves if
    /// that would leave the region empty.
    ///
    /// Returns whether the lines were moved.
    fn move_orphans(
        &mut self,
        hard_paragraph: usize,
        lines: &[Line<'t>],
        style: &ParagraphStyle,
    ) -> Result<bool, TypesetError> {
        let slot = self.current.as_mut().ok_or(TypesetError::RegionsExhausted)?;
        let placed = slot
            .lines
            .iter()
            .rev()
            .take_while(|line| line.hard_paragraph() == hard_paragraph)
            .count();
        let kept = slot.lines.len() - placed;
        let Some(opening) = slot.lines[kept..].iter().chain(lines).next() else {
            return Ok(false);
        };
        if kept == 0
            || !opening.is_first_of_hard_paragraph()
            || placed + lines.len() > style.dangle_threshold
        {
            return Ok(false);
        }

        let restart = opening.start().clone_mutably();
        for _ in 0..placed {
            slot.lines.pop();
            slot.region.pop_line();
        }
        log::debug!(
            "moving {} orphaned line(s) of paragraph {hard_paragraph} to the next region",
            placed + lines.len()
        );
        self.cursor = restart;
        self.switch_region()?;
        Ok(true)
    }

    /// Give a widowed paragraph ending company by taking the last line of the
    /// previous region back, if that region can spare it. Returns whether a line
    /// was taken.
    fn pull_back(&mut self, hard_paragraph: usize, style: &ParagraphStyle) -> bool {
        let Some(previous) = self.previous.as_mut() else {
            return false;
        };
        let trailing = previous
            .lines
            .iter()
            .rev()
            .take_while(|line| line.hard_paragraph() == hard_paragraph)
            .count();
        if previous.lines.len() <= 1 || trailing <= style.dangle_threshold {
            return false;
        }

        let Some(line) = previous.lines.pop() else {
            return false;
        };
        previous.region.pop_line();
        log::debug!(
            "pulling a line of paragraph {hard_paragraph} back from the previous region"
        );
        self.cursor = line.start().clone_mutably();
        true
    }

    /// Place the unit under the cursor into the current, empty region even
    /// though it doesn't fit. Words that can be hyphenated are hyphenated instead,
    /// to be tried again syllable by syllable.
    ///
    /// Returns whether the placed unit ended its hard paragraph.
    fn force_oversized(&mut self) -> Result<bool, TypesetError> {
        if !self.cursor.is_monosyllabic() && self.cursor.hyphenate_current()? {
            return Ok(false);
        }

        let Some(unit) = self.cursor.current() else {
            return Ok(true);
        };
        let slot = self.current.as_mut().ok_or(TypesetError::RegionsExhausted)?;
        let top = slot.region.cursor();
        let width = slot
            .region
            .line_width_at(top, unit.height())
            .or_else(|| slot.region.line_width_at(top, Pt::ZERO))
            .unwrap_or_default();

        log::warn!(
            "{:?} does not fit in an empty region ({} wide at {}), placing it anyway",
            unit.text(),
            width,
            top
        );
        let line = Line::forced(top, width, &mut self.cursor)?;
        self.forced += 1;

        let ends_paragraph = line.is_last_of_hard_paragraph();
        slot.region.append(&line);
        slot.lines.push(line);
        Ok(ends_paragraph)
    }

    fn apply_top_margin(&mut self, margin: Pt) -> Result<(), TypesetError> {
        let slot = self.slot()?;
        if margin <= Pt::ZERO || slot.region.is_empty() {
            return Ok(());
        }
        match slot.region.advance_cursor(margin) {
            Err(TypesetError::RegionTooSmall { .. }) => self.switch_region(),
            result => result,
        }
    }

    fn apply_bottom_margin(&mut self, margin: Pt) -> Result<(), TypesetError> {
        if margin <= Pt::ZERO {
            return Ok(());
        }
        let exhausted = self.cursor.is_exhausted();
        match self.slot()?.region.advance_cursor(margin) {
            // no need for a new region if there's nothing left to put in it
            Err(TypesetError::RegionTooSmall { .. }) if exhausted => Ok(()),
            Err(TypesetError::RegionTooSmall { .. }) => self.switch_region(),
            result => result,
        }
    }
}
