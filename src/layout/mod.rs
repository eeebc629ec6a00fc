//! Breaking text into lines and flowing those lines through regions.
//!
//! Layout works in three layers:
//!
//! - a [Cursor] walks the [Text](crate::Text) hierarchy unit by unit, and can be
//!   snapshotted so layout can go back to where a line started
//! - [Line::build] greedily fills one line of a [Region](crate::Region) from the
//!   cursor, hyphenating words that don't fit
//! - the [Typesetter] asks for lines region by region, applying paragraph
//!   margins and moving lines between regions to avoid orphans and widows
//!
//! Most callers only need [Text::typeset](crate::Text::typeset).
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use ps_gen::{FixedPitchFont, ParagraphStyle, Pt, Rect, Text, TextBox};
//! use ps_gen::layout::Margins;
//!
//! let font = Rc::new(FixedPitchFont::courier(Pt(12.0)));
//! let text = Text::from_source(
//!     "Call me Ishmael. Some years ago, never mind how long precisely, having \
//!      little or no money in my purse, and nothing particular to interest me on \
//!      shore, I thought I would sail about a little and see the watery part of \
//!      the world.",
//!     font,
//!     None,
//!     ParagraphStyle::default(),
//! )
//! .expect("valid text");
//!
//! let page = Rect::from((Pt(612.0), Pt(792.0)));
//! let pages = std::iter::repeat_with(|| TextBox::with_margins(page, &Margins::all(Pt(72.0))));
//! let boxes = text.typeset(pages).expect("enough pages");
//!
//! let postscript = boxes[0].render().expect("can render");
//! assert!(!postscript.is_empty());
//! ```

mod cursor;
mod line;
mod margins;
mod typesetter;

pub use cursor::*;
pub use line::*;
pub use margins::*;
pub use typesetter::*;
