mod error;
pub use error::*;

mod font;
pub use font::*;

/// Line breaking and flowing text through regions
pub mod layout;

mod rect;
pub use rect::*;

mod region;
pub use region::*;

mod text;
pub use text::*;

mod units;
pub use units::*;
