//! Core value types and resource tables.
//!
//! RTF refers to fonts and colours by index into tables emitted at the top
//! of the document, so both tables here are ordered, deduplicated registries:
//! registering a value that is already present is a no-op, and the index
//! assigned on first insertion is stable for the life of the document.

use crate::render::push_int;
use serde::{Deserialize, Serialize};

/// RTF colour representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Color {
    /// Red component (0-255)
    pub red: u8,
    /// Green component (0-255)
    pub green: u8,
    /// Blue component (0-255)
    pub blue: u8,
}

impl Color {
    /// Create a new colour.
    #[inline]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Black colour.
    #[inline]
    pub const fn black() -> Self {
        Self::new(0, 0, 0)
    }

    /// White colour.
    #[inline]
    pub const fn white() -> Self {
        Self::new(255, 255, 255)
    }

    /// Render this colour as a colour table entry.
    pub(crate) fn to_rtf(self, out: &mut String) {
        out.push_str("\\red");
        push_int(out, self.red as i64);
        out.push_str("\\green");
        push_int(out, self.green as i64);
        out.push_str("\\blue");
        push_int(out, self.blue as i64);
        out.push(';');
    }
}

/// Colour table containing the document colours.
///
/// Indices are 1-based: the table renders an implicit default entry first,
/// so `\cf1` refers to the first registered colour.
#[derive(Debug, Clone, Default)]
pub struct ColorTable {
    colors: Vec<Color>,
}

impl ColorTable {
    /// Create a new, empty colour table.
    #[inline]
    pub fn new() -> Self {
        Self { colors: Vec::new() }
    }

    /// Register a colour, returning its 1-based index.
    ///
    /// Equal colours collapse to the same entry; re-registering an existing
    /// colour returns the index assigned on first insertion.
    pub fn add(&mut self, color: Color) -> usize {
        match self.index(color) {
            Some(index) => index,
            None => {
                self.colors.push(color);
                self.colors.len()
            },
        }
    }

    /// Look up the 1-based index of a registered colour.
    #[inline]
    pub fn index(&self, color: Color) -> Option<usize> {
        self.colors.iter().position(|c| *c == color).map(|i| i + 1)
    }

    /// Get all colours in insertion order.
    #[inline]
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Number of distinct colours registered.
    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether the table holds no colours.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Render the colour table group.
    pub(crate) fn to_rtf(&self, indent: usize) -> String {
        let prefix = " ".repeat(indent);
        let mut text = String::new();

        text.push_str(&prefix);
        text.push_str("{\\colortbl");
        // Implicit default entry; registered colours start at index 1.
        text.push('\n');
        text.push_str(&prefix);
        text.push(';');
        for color in &self.colors {
            text.push('\n');
            text.push_str(&prefix);
            color.to_rtf(&mut text);
        }
        text.push('\n');
        text.push_str(&prefix);
        text.push('}');
        text
    }
}

/// Font family categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FontFamily {
    /// Nil (unknown or default)
    #[default]
    Nil,
    /// Roman (serif) fonts
    Roman,
    /// Swiss (sans-serif) fonts
    Swiss,
    /// Modern (monospace) fonts
    Modern,
    /// Script fonts
    Script,
    /// Decorative fonts
    Decor,
    /// Technical, symbol, and mathematical fonts
    Tech,
}

impl FontFamily {
    /// The control word for this font family.
    #[inline]
    pub(crate) fn control_word(self) -> &'static str {
        match self {
            FontFamily::Nil => "\\fnil",
            FontFamily::Roman => "\\froman",
            FontFamily::Swiss => "\\fswiss",
            FontFamily::Modern => "\\fmodern",
            FontFamily::Script => "\\fscript",
            FontFamily::Decor => "\\fdecor",
            FontFamily::Tech => "\\ftech",
        }
    }
}

/// Font definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Font {
    /// Font family category
    pub family: FontFamily,
    /// Font name
    pub name: String,
}

impl Font {
    /// Create a new font.
    #[inline]
    pub fn new(family: FontFamily, name: impl Into<String>) -> Self {
        Self {
            family,
            name: name.into(),
        }
    }
}

/// Font table containing the document fonts.
///
/// Indices are 1-based and assigned in insertion order.
#[derive(Debug, Clone, Default)]
pub struct FontTable {
    fonts: Vec<Font>,
}

impl FontTable {
    /// Create a new, empty font table.
    #[inline]
    pub fn new() -> Self {
        Self { fonts: Vec::new() }
    }

    /// Register a font, returning its 1-based index.
    ///
    /// Equal fonts collapse to the same entry; re-registering an existing
    /// font returns the index assigned on first insertion.
    pub fn add(&mut self, font: Font) -> usize {
        match self.index(&font) {
            Some(index) => index,
            None => {
                self.fonts.push(font);
                self.fonts.len()
            },
        }
    }

    /// Look up the 1-based index of a registered font.
    #[inline]
    pub fn index(&self, font: &Font) -> Option<usize> {
        self.fonts.iter().position(|f| f == font).map(|i| i + 1)
    }

    /// Get all fonts in insertion order.
    #[inline]
    pub fn fonts(&self) -> &[Font] {
        &self.fonts
    }

    /// Number of distinct fonts registered.
    #[inline]
    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    /// Whether the table holds no fonts.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Render the font table group.
    pub(crate) fn to_rtf(&self, indent: usize) -> String {
        let prefix = " ".repeat(indent);
        let mut text = String::new();

        text.push_str(&prefix);
        text.push_str("{\\fonttbl");
        for (i, font) in self.fonts.iter().enumerate() {
            text.push('\n');
            text.push_str(&prefix);
            text.push_str("{\\f");
            push_int(&mut text, (i + 1) as i64);
            text.push_str(font.family.control_word());
            text.push(' ');
            text.push_str(&font.name);
            text.push_str(";}");
        }
        text.push('\n');
        text.push_str(&prefix);
        text.push('}');
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_table_assigns_one_based_indices() {
        let mut table = ColorTable::new();
        assert_eq!(table.add(Color::new(255, 0, 0)), 1);
        assert_eq!(table.add(Color::new(0, 255, 0)), 2);
        assert_eq!(table.add(Color::new(0, 0, 255)), 3);
    }

    #[test]
    fn test_color_table_deduplicates() {
        let mut table = ColorTable::new();
        table.add(Color::new(255, 0, 0));
        table.add(Color::new(0, 255, 0));
        // Re-registering is a no-op: same index, same size.
        assert_eq!(table.add(Color::new(255, 0, 0)), 1);
        assert_eq!(table.len(), 2);
        assert_eq!(table.index(Color::new(0, 255, 0)), Some(2));
        assert_eq!(table.index(Color::new(1, 2, 3)), None);
    }

    #[test]
    fn test_color_table_rtf_has_default_entry() {
        let mut table = ColorTable::new();
        table.add(Color::new(255, 0, 0));
        let rtf = table.to_rtf(0);
        assert_eq!(rtf, "{\\colortbl\n;\n\\red255\\green0\\blue0;\n}");
    }

    #[test]
    fn test_font_table_deduplicates() {
        let mut table = FontTable::new();
        let arial = Font::new(FontFamily::Swiss, "Arial");
        let times = Font::new(FontFamily::Roman, "Times New Roman");
        assert_eq!(table.add(arial.clone()), 1);
        assert_eq!(table.add(times.clone()), 2);
        assert_eq!(table.add(arial.clone()), 1);
        assert_eq!(table.len(), 2);
        assert_eq!(table.index(&times), Some(2));
    }

    #[test]
    fn test_font_table_rtf() {
        let mut table = FontTable::new();
        table.add(Font::new(FontFamily::Swiss, "Arial"));
        let rtf = table.to_rtf(3);
        assert_eq!(rtf, "   {\\fonttbl\n   {\\f1\\fswiss Arial;}\n   }");
    }
}
