use crate::layout::Margins;
use crate::units::*;

/// A rectangle, specified by two opposite corners. Coordinates follow PostScript's
/// default user space, where y grows upwards from the bottom of the page.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rect {
    /// The x-coordinate of the first (typically, lower-left) corner.
    pub x1: Pt,
    /// The y-coordinate of the first (typically, lower-left) corner.
    pub y1: Pt,
    /// The x-coordinate of the second (typically, upper-right) corner.
    pub x2: Pt,
    /// The y-coordinate of the second (typically, upper-right) corner.
    pub y2: Pt,
}

impl Rect {
    /// Create a rectangle from its lower-left corner and its size
    pub fn new(x: Pt, y: Pt, width: Pt, height: Pt) -> Rect {
        Rect {
            x1: x,
            y1: y,
            x2: x + width,
            y2: y + height,
        }
    }

    pub fn width(&self) -> Pt {
        self.x2 - self.x1
    }

    pub fn height(&self) -> Pt {
        self.y2 - self.y1
    }

    /// Shrink the rectangle by the given margins on each side
    pub fn inset(&self, margins: &Margins) -> Rect {
        Rect {
            x1: self.x1 + margins.left,
            y1: self.y1 + margins.bottom,
            x2: self.x2 - margins.right,
            y2: self.y2 - margins.top,
        }
    }
}

impl From<(Pt, Pt)> for Rect {
    /// A page-sized rectangle anchored at the origin
    fn from(size: (Pt, Pt)) -> Self {
        Rect {
            x1: Pt(0.0),
            y1: Pt(0.0),
            x2: size.0,
            y2: size.1,
        }
    }
}
