use crate::units::Pt;
use thiserror::Error;

/// All errors that the crate can generate
#[derive(Error, Debug)]
pub enum TypesetError {
    #[error("invalid input: {0}")]
    /// Malformed construction input, such as an empty syllable or paragraph
    Validation(String),

    #[error("attempted to move an immutable cursor")]
    /// An immutable cursor snapshot was asked to change position
    CursorImmutable,

    #[error("region too small: needed {requested}pt, only {available}pt left")]
    /// A region cannot accommodate the requested vertical advance
    RegionTooSmall { requested: Pt, available: Pt },

    #[error("ran out of regions before all text was placed")]
    /// The region supply was drained while text remained
    RegionsExhausted,

    #[error(transparent)]
    /// An I/O error occurred
    Io(#[from] std::io::Error),

    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse the font
    FaceParsing(#[from] owned_ttf_parser::FaceParsingError),
}
