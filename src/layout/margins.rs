use crate::units::Pt;

/// Margins carve a text box out of a larger rectangle, usually a page. Nothing
/// stops rendered content from spilling past them; a [crate::TextBox] clips to
/// whatever rectangle is left once the margins are applied.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Margins {
    pub top: Pt,
    pub right: Pt,
    pub bottom: Pt,
    pub left: Pt,
}

impl Margins {
    /// Create margins by specifying individual components in a clockwise fashion
    /// starting at the top (in the same order as CSS margins)
    pub fn trbl(
        top: impl Into<Pt>,
        right: impl Into<Pt>,
        bottom: impl Into<Pt>,
        left: impl Into<Pt>,
    ) -> Margins {
        Margins {
            top: top.into(),
            right: right.into(),
            bottom: bottom.into(),
            left: left.into(),
        }
    }

    /// Create margins where all values are equal
    pub fn all(value: impl Into<Pt>) -> Margins {
        let value = value.into();
        Margins::trbl(value, value, value, value)
    }

    /// Create margins with one value for top and bottom and another for left and right
    pub fn symmetric(vertical: impl Into<Pt>, horizontal: impl Into<Pt>) -> Margins {
        let vertical = vertical.into();
        let horizontal = horizontal.into();
        Margins::trbl(vertical, horizontal, vertical, horizontal)
    }

    /// Create margins where all values are 0.0
    pub fn empty() -> Margins {
        Margins::default()
    }
}
