use crate::font::FontInstance;
use crate::layout::{Line, Margins};
use crate::rect::Rect;
use crate::units::Pt;
use crate::TypesetError;
use std::fmt;
use std::io::Write;
use std::rc::Rc;

/// Somewhere lines of text can be laid out, such as a column on a page.
///
/// A region is filled from the top down. It keeps a vertical cursor measuring how
/// far down it has been filled, and decides how wide a line can be at any given
/// depth, which lets regions have ragged or shaped edges.
pub trait Region {
    /// How far below the top of the region the next line would start
    fn cursor(&self) -> Pt;

    /// The width available to a line `height` tall whose top is `y` below the top
    /// of the region, or [None] if such a line doesn't fit at all
    fn line_width_at(&self, y: Pt, height: Pt) -> Option<Pt>;

    /// Move the cursor down by `delta`, failing with
    /// [TypesetError::RegionTooSmall] if that would run past the bottom
    fn advance_cursor(&mut self, delta: Pt) -> Result<(), TypesetError>;

    /// Place a finished line, moving the cursor to its bottom
    fn append(&mut self, line: &Line<'_>);

    /// Whether no lines have been placed yet
    fn is_empty(&self) -> bool;

    /// Remove the last line placed, moving the cursor back to its top. Returns
    /// whether there was a line to remove.
    fn pop_line(&mut self) -> bool;
}

impl<R: Region + ?Sized> Region for &mut R {
    fn cursor(&self) -> Pt {
        (**self).cursor()
    }

    fn line_width_at(&self, y: Pt, height: Pt) -> Option<Pt> {
        (**self).line_width_at(y, height)
    }

    fn advance_cursor(&mut self, delta: Pt) -> Result<(), TypesetError> {
        (**self).advance_cursor(delta)
    }

    fn append(&mut self, line: &Line<'_>) {
        (**self).append(line)
    }

    fn is_empty(&self) -> bool {
        (**self).is_empty()
    }

    fn pop_line(&mut self) -> bool {
        (**self).pop_line()
    }
}

/// A run of text placed in a [TextBox], set in one font
#[derive(Clone, Debug)]
pub struct SpanLayout {
    pub text: String,
    pub font: Rc<dyn FontInstance>,
    /// Page coordinates of the start of the span's baseline
    pub coords: (Pt, Pt),
}

/// A line placed in a [TextBox]
#[derive(Clone, Debug)]
pub struct LineLayout {
    /// Distance from the top of the box
    pub top: Pt,
    pub height: Pt,
    pub spans: Vec<SpanLayout>,
}

/// Given the distance of a line from the top of a box and the line's height,
/// returns how far in from the left edge of the box the line starts and how wide
/// it may be, or [None] if no line fits there.
pub type Shape = Box<dyn Fn(Pt, Pt) -> Option<(Pt, Pt)>>;

// rounding slack when comparing against the box's edges
const EPSILON: f32 = 1e-3;

/// A rectangular [Region] on a page, optionally with shaped edges
pub struct TextBox {
    rect: Rect,
    shape: Option<Shape>,
    cursor: Pt,
    lines: Vec<LineLayout>,
}

impl fmt::Debug for TextBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextBox")
            .field("rect", &self.rect)
            .field("shaped", &self.shape.is_some())
            .field("cursor", &self.cursor)
            .field("lines", &self.lines)
            .finish()
    }
}

impl TextBox {
    pub fn new(rect: Rect) -> TextBox {
        TextBox {
            rect,
            shape: None,
            cursor: Pt::ZERO,
            lines: Vec::new(),
        }
    }

    /// A box filling `rect` less its `margins`, e.g. the content area of a page
    pub fn with_margins(rect: Rect, margins: &Margins) -> TextBox {
        TextBox::new(rect.inset(margins))
    }

    /// Give the box shaped edges. `shape` is clipped to the box's rectangle.
    pub fn with_shape<F>(mut self, shape: F) -> Self
    where
        F: Fn(Pt, Pt) -> Option<(Pt, Pt)> + 'static,
    {
        self.shape = Some(Box::new(shape));
        self
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn lines(&self) -> &[LineLayout] {
        &self.lines
    }

    /// Every span placed in the box, in order
    pub fn spans(&self) -> impl Iterator<Item = &SpanLayout> {
        self.lines.iter().flat_map(|line| line.spans.iter())
    }

    /// The text of each placed line, units joined by single spaces
    pub fn texts(&self) -> Vec<String> {
        self.lines
            .iter()
            .map(|line| {
                line.spans
                    .iter()
                    .map(|span| span.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect()
    }

    /// Left inset and width of a line at `y`
    fn extent(&self, y: Pt, height: Pt) -> Option<(Pt, Pt)> {
        if y + height > self.rect.height() + Pt(EPSILON) {
            return None;
        }
        let (inset, width) = match &self.shape {
            Some(shape) => {
                let (inset, width) = shape(y, height)?;
                let inset = inset.max(Pt::ZERO);
                (inset, width.min(self.rect.width() - inset))
            }
            None => (Pt::ZERO, self.rect.width()),
        };
        if width <= Pt::ZERO {
            return None;
        }
        Some((inset, width))
    }

    /// Render the box's lines to a PostScript fragment, clipped to the box
    #[allow(clippy::write_with_newline)]
    pub fn render(&self) -> Result<Vec<u8>, std::io::Error> {
        if self.lines.is_empty() {
            return Ok(Vec::default());
        }

        let mut content: Vec<u8> = Vec::default();
        let Rect { x1, y1, x2, y2 } = self.rect;

        write!(&mut content, "gsave\n")?;
        write!(
            &mut content,
            "newpath {x1} {y1} moveto {x2} {y1} lineto {x2} {y2} lineto {x1} {y2} lineto closepath clip newpath\n"
        )?;

        let mut current_font: Option<(String, Pt)> = None;
        for span in self.spans() {
            let font = (span.font.postscript_name(), span.font.size());
            if current_font.as_ref() != Some(&font) {
                span.font.write_select(&mut content)?;
                current_font = Some(font);
            }

            write!(&mut content, "{} {} moveto\n", span.coords.0, span.coords.1)?;
            span.font.write_show(&span.text, &mut content)?;
        }

        write!(&mut content, "grestore\n")?;
        Ok(content)
    }
}

impl Region for TextBox {
    fn cursor(&self) -> Pt {
        self.cursor
    }

    fn line_width_at(&self, y: Pt, height: Pt) -> Option<Pt> {
        self.extent(y, height).map(|(_, width)| width)
    }

    fn advance_cursor(&mut self, delta: Pt) -> Result<(), TypesetError> {
        let available = self.rect.height() - self.cursor;
        if delta > available + Pt(EPSILON) {
            return Err(TypesetError::RegionTooSmall {
                requested: delta,
                available,
            });
        }
        self.cursor += delta;
        Ok(())
    }

    fn append(&mut self, line: &Line<'_>) {
        let inset = self
            .extent(line.top(), line.height())
            .map(|(inset, _)| inset)
            .unwrap_or_default();
        let ascent = line
            .units()
            .iter()
            .map(|unit| unit.font().ascent())
            .fold(Pt::ZERO, Pt::max);
        let baseline = self.rect.y2 - line.top() - ascent;

        let spans = line
            .placements()
            .into_iter()
            .map(|placement| SpanLayout {
                text: placement.syllable.text().to_string(),
                font: placement.syllable.font().clone(),
                coords: (self.rect.x1 + inset + placement.x, baseline),
            })
            .collect();

        self.lines.push(LineLayout {
            top: line.top(),
            height: line.height(),
            spans,
        });
        self.cursor = line.top() + line.height();
    }

    fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn pop_line(&mut self) -> bool {
        match self.lines.pop() {
            Some(line) => {
                self.cursor = line.top;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FixedPitchFont;
    use crate::layout::{Cursor, LineOutcome};
    use crate::text::{ParagraphStyle, Text};

    fn mono() -> Rc<dyn FontInstance> {
        Rc::new(
            FixedPitchFont::new("Mono", Pt(10.0))
                .with_advance(0.5)
                .with_line_height(Pt(12.0)),
        )
    }

    fn place(region: &mut TextBox, text: &Text) {
        let mut cursor = Cursor::new(text);
        let top = region.cursor();
        match Line::build(&*region, top, &mut cursor).expect("line") {
            LineOutcome::Fits(line) => region.append(&line),
            other => panic!("expected the line to fit, got {other:?}"),
        }
    }

    #[test]
    fn widths_stop_at_the_bottom() {
        let region = TextBox::new(Rect::new(Pt(0.0), Pt(0.0), Pt(100.0), Pt(24.0)));
        assert_eq!(region.line_width_at(Pt(0.0), Pt(12.0)), Some(Pt(100.0)));
        assert_eq!(region.line_width_at(Pt(12.0), Pt(12.0)), Some(Pt(100.0)));
        assert_eq!(region.line_width_at(Pt(12.0), Pt(13.0)), None);
    }

    #[test]
    fn shapes_narrow_lines() {
        let region = TextBox::new(Rect::new(Pt(0.0), Pt(0.0), Pt(100.0), Pt(100.0)))
            .with_shape(|y, _| if y < Pt(50.0) { Some((Pt(10.0), Pt(60.0))) } else { None });
        assert_eq!(region.line_width_at(Pt(0.0), Pt(12.0)), Some(Pt(60.0)));
        assert_eq!(region.line_width_at(Pt(60.0), Pt(12.0)), None);
    }

    #[test]
    fn advancing_past_the_bottom_fails() {
        let mut region = TextBox::new(Rect::new(Pt(0.0), Pt(0.0), Pt(100.0), Pt(20.0)));
        region.advance_cursor(Pt(15.0)).expect("fits");
        let result = region.advance_cursor(Pt(10.0));
        assert!(matches!(
            result,
            Err(TypesetError::RegionTooSmall { requested, available })
                if requested == Pt(10.0) && available == Pt(5.0)
        ));
        assert_eq!(region.cursor(), Pt(15.0));
    }

    #[test]
    fn appending_places_spans_on_baselines() {
        let text = Text::from_source("ab cd", mono(), None, ParagraphStyle::default())
            .expect("valid text");
        let mut region = TextBox::with_margins(
            Rect::new(Pt(0.0), Pt(0.0), Pt(200.0), Pt(100.0)),
            &Margins::all(Pt(10.0)),
        );
        place(&mut region, &text);

        assert!(!region.is_empty());
        assert_eq!(region.cursor(), Pt(12.0));
        assert_eq!(region.texts(), vec!["ab cd".to_string()]);
        let coords: Vec<(Pt, Pt)> = region.spans().map(|span| span.coords).collect();
        // baseline sits one ascent (0.8 of the line height) below the top
        let baseline = Pt(90.0) - Pt(12.0) * 0.8;
        assert_eq!(coords, vec![(Pt(10.0), baseline), (Pt(25.0), baseline)]);

        assert!(region.pop_line());
        assert!(region.is_empty());
        assert_eq!(region.cursor(), Pt::ZERO);
        assert!(!region.pop_line());
    }

    #[test]
    fn renders_clipped_postscript() {
        let text = Text::from_source("(hi) there", mono(), None, ParagraphStyle::default())
            .expect("valid text");
        let mut region = TextBox::new(Rect::new(Pt(0.0), Pt(0.0), Pt(100.0), Pt(20.0)));
        place(&mut region, &text);

        let rendered = String::from_utf8(region.render().expect("renders")).expect("ascii");
        assert!(rendered.starts_with("gsave\n"));
        assert!(rendered.contains("clip newpath\n"));
        assert_eq!(rendered.matches("selectfont").count(), 1);
        assert!(rendered.contains("/Mono 10 selectfont\n"));
        assert!(rendered.contains("(\\(hi\\)) show\n"));
        assert!(rendered.contains("(there) show\n"));
        assert!(rendered.ends_with("grestore\n"));
    }

    #[test]
    fn empty_boxes_render_nothing() {
        let region = TextBox::new(Rect::new(Pt(0.0), Pt(0.0), Pt(100.0), Pt(20.0)));
        assert!(region.render().expect("renders").is_empty());
    }
}
