use crate::{units::Pt, TypesetError};
use owned_ttf_parser::{AsFaceRef, GlyphId, OwnedFace};
use std::fmt::Debug;
use std::io::Write;
use std::rc::Rc;

/// A font at a specific size, as far as layout is concerned: it can measure text,
/// report how tall a line set in it is, and write the PostScript needed to show a
/// run of text in it.
///
/// Widths are in points at the instance's size.
pub trait FontInstance: Debug {
    /// The name the font is known by to the PostScript interpreter (i.e. `findfont`)
    fn postscript_name(&self) -> String;

    /// The size the font is set at
    fn size(&self) -> Pt;

    /// The advance width of a single character
    fn char_width(&self, ch: char) -> Pt;

    /// Adjustment applied between a pair of characters, usually negative
    fn kerning(&self, _left: char, _right: char) -> Pt {
        Pt::ZERO
    }

    /// Extra space added after every character
    fn char_spacing(&self) -> Pt {
        Pt::ZERO
    }

    /// Distance from one baseline to the next
    fn line_height(&self) -> Pt;

    /// Distance from the top of a line to its baseline
    fn ascent(&self) -> Pt {
        self.line_height() * 0.8
    }

    /// The width of a run of text, including kerning and character spacing
    fn chars_width(&self, text: &str) -> Pt {
        let mut width = Pt::ZERO;
        let mut previous: Option<char> = None;
        for ch in text.chars() {
            width += self.char_width(ch) + self.char_spacing();
            if let Some(previous) = previous {
                width += self.kerning(previous, ch);
            }
            previous = Some(ch);
        }
        width
    }

    /// Write the operators that make this font the current font
    fn write_select(&self, out: &mut dyn Write) -> Result<(), std::io::Error> {
        writeln!(out, "/{} {} selectfont", self.postscript_name(), self.size())
    }

    /// Write the operators that show `text` at the current point. Kerned pairs are
    /// split into separate shows with a relative move between them.
    fn write_show(&self, text: &str, out: &mut dyn Write) -> Result<(), std::io::Error> {
        let spacing = self.char_spacing();
        let mut run = String::new();
        let mut previous: Option<char> = None;
        for ch in text.chars() {
            if let Some(previous) = previous {
                let kern = self.kerning(previous, ch);
                if kern != Pt::ZERO {
                    write_run(out, &run, spacing)?;
                    writeln!(out, "{kern} 0 rmoveto")?;
                    run.clear();
                }
            }
            run.push(ch);
            previous = Some(ch);
        }
        write_run(out, &run, spacing)
    }
}

fn write_run(out: &mut dyn Write, run: &str, spacing: Pt) -> Result<(), std::io::Error> {
    if run.is_empty() {
        return Ok(());
    }
    if spacing == Pt::ZERO {
        writeln!(out, "({}) show", escape_string(run))
    } else {
        writeln!(out, "{spacing} 0 ({}) ashow", escape_string(run))
    }
}

/// Escape text for use inside a PostScript string literal. Characters outside of
/// Latin-1 cannot be shown with a standard encoding and are replaced with `?`.
pub fn escape_string(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '(' | ')' | '\\' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            ' '..='~' => escaped.push(ch),
            '\u{80}'..='\u{ff}' => escaped.push_str(&format!("\\{:03o}", ch as u32)),
            _ => {
                log::warn!("no Latin-1 encoding for {ch:?}, showing '?' instead");
                escaped.push('?');
            }
        }
    }
    escaped
}

/// Metrics for a font where every character has the same advance, such as the
/// standard PostScript `Courier` family. No font file is needed; the interpreter
/// supplies the outlines.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedPitchFont {
    pub name: String,
    pub size: Pt,
    /// Advance of every character, as a fraction of the size
    pub advance: f32,
    pub line_height: Pt,
    pub char_spacing: Pt,
}

impl FixedPitchFont {
    /// A fixed pitch font with Courier's proportions: 0.6em advance, 1.2em lines
    pub fn new<S: ToString>(name: S, size: impl Into<Pt>) -> FixedPitchFont {
        let size = size.into();
        FixedPitchFont {
            name: name.to_string(),
            size,
            advance: 0.6,
            line_height: size * 1.2,
            char_spacing: Pt::ZERO,
        }
    }

    /// The standard `Courier` font at the given size
    pub fn courier(size: impl Into<Pt>) -> FixedPitchFont {
        FixedPitchFont::new("Courier", size)
    }

    pub fn with_advance(mut self, advance: f32) -> Self {
        self.advance = advance;
        self
    }

    pub fn with_line_height(mut self, line_height: impl Into<Pt>) -> Self {
        self.line_height = line_height.into();
        self
    }

    pub fn with_char_spacing(mut self, char_spacing: impl Into<Pt>) -> Self {
        self.char_spacing = char_spacing.into();
        self
    }
}

impl FontInstance for FixedPitchFont {
    fn postscript_name(&self) -> String {
        self.name.clone()
    }

    fn size(&self) -> Pt {
        self.size
    }

    fn char_width(&self, ch: char) -> Pt {
        match ch {
            '\u{200b}' | '\u{ad}' => Pt::ZERO,
            _ => self.size * self.advance,
        }
    }

    fn char_spacing(&self) -> Pt {
        self.char_spacing
    }

    fn line_height(&self) -> Pt {
        self.line_height
    }
}

/// A parsed TrueType or OpenType font, used for its metrics. Fonts are shared
/// between [SizedFont] instances set at different sizes.
pub struct Font {
    pub face: OwnedFace,
}

impl Debug for Font {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Font")
            .field("name", &self.postscript_name())
            .finish()
    }
}

impl Font {
    /// Load a font from raw bytes, parsing the font and returning an error if the font
    /// could not be parsed
    pub fn load(bytes: Vec<u8>) -> Result<Font, TypesetError> {
        let face = OwnedFace::from_vec(bytes, 0)?;

        Ok(Font { face })
    }

    fn find_name(&self, name_id: u16) -> Option<String> {
        self.face
            .as_face_ref()
            .names()
            .into_iter()
            .find(|name| name.name_id == name_id && name.is_unicode())
            .and_then(|name| name.to_string())
    }

    /// Obtain the full name of the font, if it has one
    pub fn name(&self) -> Option<String> {
        self.find_name(owned_ttf_parser::name_id::FULL_NAME)
    }

    /// Obtain the family name of the font, if it has one
    pub fn family(&self) -> Option<String> {
        self.find_name(owned_ttf_parser::name_id::FAMILY)
    }

    /// Obtain the PostScript name of the font, if it has one
    pub fn postscript_name(&self) -> Option<String> {
        self.find_name(owned_ttf_parser::name_id::POST_SCRIPT_NAME)
    }

    fn scaling(&self, size: Pt) -> Pt {
        size / self.face.as_face_ref().units_per_em() as f32
    }

    /// Calculate the ascent (distance from the baseline to the top of the font) for the given font size
    pub fn ascent(&self, size: Pt) -> Pt {
        self.scaling(size) * self.face.as_face_ref().ascender() as f32
    }

    /// Calculate the descent (distance from the baseline to the bottom of the font) for the given font size.
    /// Note: this is usually negative
    pub fn descent(&self, size: Pt) -> Pt {
        self.scaling(size) * self.face.as_face_ref().descender() as f32
    }

    /// Calculate the leading (extra space between lines) for the given font size
    pub fn leading(&self, size: Pt) -> Pt {
        self.scaling(size) * self.face.as_face_ref().line_gap() as f32
    }

    /// Calculate the default line height of the font for the given size. The returned value is
    /// how much to vertically offset a second row of text below a first row of text.
    pub fn line_height(&self, size: Pt) -> Pt {
        self.leading(size) + self.ascent(size) - self.descent(size)
    }

    pub fn glyph_id(&self, ch: char) -> Option<u16> {
        self.face.as_face_ref().glyph_index(ch).map(|i| i.0)
    }

    pub fn replacement_glyph_id(&self) -> Option<u16> {
        self.glyph_id('\u{FFFD}').or_else(|| self.glyph_id('?'))
    }

    /// Horizontal advance of a character at the given size. Characters missing from
    /// the font are measured as the replacement glyph.
    pub fn advance(&self, ch: char, size: Pt) -> Pt {
        let gid = match self.glyph_id(ch) {
            Some(gid) => gid,
            None => {
                log::warn!("font has no glyph for {ch:?}, measuring the replacement glyph");
                match self.replacement_glyph_id() {
                    Some(gid) => gid,
                    None => return Pt::ZERO,
                }
            }
        };
        self.scaling(size)
            * self
                .face
                .as_face_ref()
                .glyph_hor_advance(GlyphId(gid))
                .unwrap_or_default() as f32
    }

    /// Pair kerning from the font's `kern` table, at the given size
    pub fn kerning(&self, left: char, right: char, size: Pt) -> Pt {
        let (Some(left), Some(right)) = (self.glyph_id(left), self.glyph_id(right)) else {
            return Pt::ZERO;
        };
        let Some(kern) = self.face.as_face_ref().tables().kern else {
            return Pt::ZERO;
        };
        kern.subtables
            .into_iter()
            .filter(|subtable| subtable.horizontal && !subtable.variable)
            .find_map(|subtable| subtable.glyphs_kerning(GlyphId(left), GlyphId(right)))
            .map(|units| self.scaling(size) * units as f32)
            .unwrap_or_default()
    }
}

/// A [Font] set at a specific size
#[derive(Debug, Clone)]
pub struct SizedFont {
    pub font: Rc<Font>,
    pub size: Pt,
    pub char_spacing: Pt,
}

impl SizedFont {
    pub fn new(font: Rc<Font>, size: impl Into<Pt>) -> SizedFont {
        SizedFont {
            font,
            size: size.into(),
            char_spacing: Pt::ZERO,
        }
    }

    pub fn with_char_spacing(mut self, char_spacing: impl Into<Pt>) -> Self {
        self.char_spacing = char_spacing.into();
        self
    }
}

impl FontInstance for SizedFont {
    fn postscript_name(&self) -> String {
        self.font
            .postscript_name()
            .unwrap_or_else(|| "Helvetica".to_string())
    }

    fn size(&self) -> Pt {
        self.size
    }

    fn char_width(&self, ch: char) -> Pt {
        self.font.advance(ch, self.size)
    }

    fn kerning(&self, left: char, right: char) -> Pt {
        self.font.kerning(left, right, self.size)
    }

    fn char_spacing(&self) -> Pt {
        self.char_spacing
    }

    fn line_height(&self) -> Pt {
        self.font.line_height(self.size)
    }

    fn ascent(&self) -> Pt {
        self.font.leading(self.size) + self.font.ascent(self.size)
    }
}
