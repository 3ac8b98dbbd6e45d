//! Character, paragraph, and document styling.
//!
//! Styles are plain value objects that render themselves into a control-word
//! prefix fragment. Character styles refer to fonts and colours by *index*,
//! so rendering takes the document's resource tables; registration of the
//! referenced values happens in the builder before a style is ever rendered.

use crate::render::push_int;
use crate::types::{Color, ColorTable, Font, FontTable};
use serde::{Deserialize, Serialize};

/// Paragraph justification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Justification {
    /// Left-aligned
    #[default]
    Left,
    /// Right-aligned
    Right,
    /// Centered
    Center,
    /// Fully justified
    Full,
}

impl Justification {
    #[inline]
    fn control_word(self) -> &'static str {
        match self {
            Justification::Left => "\\ql",
            Justification::Right => "\\qr",
            Justification::Center => "\\qc",
            Justification::Full => "\\qj",
        }
    }
}

/// Page orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    /// Portrait (default)
    #[default]
    Portrait,
    /// Landscape (paper dimensions are swapped)
    Landscape,
}

/// Paper dimensions, in twips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paper {
    /// Paper width in twips
    pub width: u32,
    /// Paper height in twips
    pub height: u32,
}

impl Paper {
    /// A4 paper (210 x 297 mm).
    pub const A4: Paper = Paper::new(11906, 16838);
    /// A5 paper (148 x 210 mm).
    pub const A5: Paper = Paper::new(8391, 11906);
    /// B5 paper (176 x 250 mm).
    pub const B5: Paper = Paper::new(7175, 10075);
    /// US Letter paper (8.5 x 11 in).
    pub const LETTER: Paper = Paper::new(12240, 15840);
    /// US Legal paper (8.5 x 14 in).
    pub const LEGAL: Paper = Paper::new(12240, 20163);
    /// US Executive paper.
    pub const EXECUTIVE: Paper = Paper::new(10440, 14220);
    /// COM10 envelope.
    pub const COM10: Paper = Paper::new(5220, 11880);
    /// Monarch envelope.
    pub const MONARCH: Paper = Paper::new(5220, 9840);

    /// Create a paper size from explicit twip dimensions.
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for Paper {
    #[inline]
    fn default() -> Self {
        Paper::A4
    }
}

/// Character-level formatting.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CharacterStyle {
    /// Bold text
    pub bold: bool,
    /// Italic text
    pub italic: bool,
    /// Underlined text
    pub underline: bool,
    /// Subscript text
    pub subscript: bool,
    /// Superscript text
    pub superscript: bool,
    /// Struck-through text
    pub strike: bool,
    /// Hidden text
    pub hidden: bool,
    /// Font applied to the text
    pub font: Option<Font>,
    /// Font size in half-points
    pub font_size: Option<u32>,
    /// Foreground colour
    pub foreground: Option<Color>,
    /// Background colour
    pub background: Option<Color>,
}

impl CharacterStyle {
    /// Create an empty character style.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Render the style's control-word prefix.
    ///
    /// Font and colour references render as indices into the given tables;
    /// unregistered values are skipped (the builder registers every value it
    /// touches before rendering).
    pub fn prefix(&self, fonts: &FontTable, colors: &ColorTable) -> String {
        let mut text = String::new();
        if self.bold {
            text.push_str("\\b");
        }
        if self.italic {
            text.push_str("\\i");
        }
        if self.underline {
            text.push_str("\\ul");
        }
        if self.subscript {
            text.push_str("\\sub");
        }
        if self.superscript {
            text.push_str("\\super");
        }
        if self.strike {
            text.push_str("\\strike");
        }
        if self.hidden {
            text.push_str("\\v");
        }
        if let Some(size) = self.font_size {
            text.push_str("\\fs");
            push_int(&mut text, size as i64);
        }
        if let Some(font) = &self.font
            && let Some(index) = fonts.index(font)
        {
            text.push_str("\\f");
            push_int(&mut text, index as i64);
        }
        if let Some(color) = self.foreground
            && let Some(index) = colors.index(color)
        {
            text.push_str("\\cf");
            push_int(&mut text, index as i64);
        }
        if let Some(color) = self.background
            && let Some(index) = colors.index(color)
        {
            text.push_str("\\cb");
            push_int(&mut text, index as i64);
        }
        text
    }
}

/// Paragraph-level formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParagraphStyle {
    /// Justification
    pub justification: Justification,
    /// Left indent in twips
    pub left_indent: Option<i32>,
    /// Right indent in twips
    pub right_indent: Option<i32>,
    /// First-line indent in twips
    pub first_line_indent: Option<i32>,
    /// Space before the paragraph in twips
    pub space_before: Option<i32>,
    /// Space after the paragraph in twips
    pub space_after: Option<i32>,
    /// Line spacing in twips
    pub line_spacing: Option<i32>,
}

impl ParagraphStyle {
    /// Create a default (left-justified) paragraph style.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Render the style's control-word prefix.
    pub fn prefix(&self) -> String {
        let mut text = String::new();
        text.push_str(self.justification.control_word());
        if let Some(indent) = self.left_indent {
            text.push_str("\\li");
            push_int(&mut text, indent as i64);
        }
        if let Some(indent) = self.right_indent {
            text.push_str("\\ri");
            push_int(&mut text, indent as i64);
        }
        if let Some(indent) = self.first_line_indent {
            text.push_str("\\fi");
            push_int(&mut text, indent as i64);
        }
        if let Some(space) = self.space_before {
            text.push_str("\\sb");
            push_int(&mut text, space as i64);
        }
        if let Some(space) = self.space_after {
            text.push_str("\\sa");
            push_int(&mut text, space as i64);
        }
        if let Some(spacing) = self.line_spacing {
            text.push_str("\\sl");
            push_int(&mut text, spacing as i64);
        }
        text
    }
}

/// Document-wide style defaults: paper size, margins, and orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStyle {
    /// Paper dimensions
    pub paper: Paper,
    /// Left margin in twips
    pub left_margin: u32,
    /// Right margin in twips
    pub right_margin: u32,
    /// Top margin in twips
    pub top_margin: u32,
    /// Bottom margin in twips
    pub bottom_margin: u32,
    /// Binding gutter in twips
    pub gutter: Option<u32>,
    /// Page orientation
    pub orientation: Orientation,
}

impl Default for DocumentStyle {
    fn default() -> Self {
        Self {
            paper: Paper::A4,
            left_margin: 1800,
            right_margin: 1800,
            top_margin: 1440,
            bottom_margin: 1440,
            gutter: None,
            orientation: Orientation::Portrait,
        }
    }
}

impl DocumentStyle {
    /// Create the default document style (A4 portrait).
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Usable page width: paper width minus the horizontal margins,
    /// accounting for orientation.
    pub fn body_width(&self) -> i64 {
        let width = match self.orientation {
            Orientation::Portrait => self.paper.width,
            Orientation::Landscape => self.paper.height,
        };
        width as i64 - self.left_margin as i64 - self.right_margin as i64
    }

    /// Usable page height: paper height minus the vertical margins,
    /// accounting for orientation.
    pub fn body_height(&self) -> i64 {
        let height = match self.orientation {
            Orientation::Portrait => self.paper.height,
            Orientation::Landscape => self.paper.width,
        };
        height as i64 - self.top_margin as i64 - self.bottom_margin as i64
    }

    /// Render the document style's control-word prefix.
    pub fn prefix(&self) -> String {
        let (width, height) = match self.orientation {
            Orientation::Portrait => (self.paper.width, self.paper.height),
            Orientation::Landscape => (self.paper.height, self.paper.width),
        };
        let mut text = String::new();
        text.push_str("\\paperw");
        push_int(&mut text, width as i64);
        text.push_str("\\paperh");
        push_int(&mut text, height as i64);
        text.push_str("\\margl");
        push_int(&mut text, self.left_margin as i64);
        text.push_str("\\margr");
        push_int(&mut text, self.right_margin as i64);
        text.push_str("\\margt");
        push_int(&mut text, self.top_margin as i64);
        text.push_str("\\margb");
        push_int(&mut text, self.bottom_margin as i64);
        if let Some(gutter) = self.gutter {
            text.push_str("\\gutter");
            push_int(&mut text, gutter as i64);
        }
        if self.orientation == Orientation::Landscape {
            text.push_str("\\sectd\\lndscpsxn");
        }
        text
    }
}

/// A style of any kind, for entry points that accept styling dynamically
/// and must reject the wrong kind at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Style {
    /// Character-level formatting
    Character(CharacterStyle),
    /// Paragraph-level formatting
    Paragraph(ParagraphStyle),
    /// Document-wide defaults
    Document(DocumentStyle),
}

impl Style {
    /// Whether this is a character style.
    #[inline]
    pub fn is_character_style(&self) -> bool {
        matches!(self, Style::Character(_))
    }

    /// Whether this is a paragraph style.
    #[inline]
    pub fn is_paragraph_style(&self) -> bool {
        matches!(self, Style::Paragraph(_))
    }

    /// The name of this style's kind, for error messages.
    #[inline]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Style::Character(_) => "character",
            Style::Paragraph(_) => "paragraph",
            Style::Document(_) => "document",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FontFamily;

    #[test]
    fn test_character_style_prefix_flags() {
        let mut style = CharacterStyle::new();
        style.bold = true;
        style.italic = true;
        style.underline = true;
        let prefix = style.prefix(&FontTable::new(), &ColorTable::new());
        assert_eq!(prefix, "\\b\\i\\ul");
    }

    #[test]
    fn test_character_style_renders_indices_not_values() {
        let mut fonts = FontTable::new();
        let mut colors = ColorTable::new();
        fonts.add(Font::new(FontFamily::Swiss, "Arial"));
        fonts.add(Font::new(FontFamily::Roman, "Times New Roman"));
        colors.add(Color::new(255, 0, 0));

        let mut style = CharacterStyle::new();
        style.font = Some(Font::new(FontFamily::Roman, "Times New Roman"));
        style.font_size = Some(24);
        style.foreground = Some(Color::new(255, 0, 0));
        assert_eq!(style.prefix(&fonts, &colors), "\\fs24\\f2\\cf1");
    }

    #[test]
    fn test_paragraph_style_prefix() {
        let mut style = ParagraphStyle::new();
        style.justification = Justification::Center;
        style.space_after = Some(120);
        assert_eq!(style.prefix(), "\\qc\\sa120");
    }

    #[test]
    fn test_document_style_landscape_swaps_paper() {
        let mut style = DocumentStyle::new();
        style.orientation = Orientation::Landscape;
        let prefix = style.prefix();
        assert!(prefix.starts_with("\\paperw16838\\paperh11906"));
        assert!(prefix.ends_with("\\sectd\\lndscpsxn"));
    }

    #[test]
    fn test_style_kind_queries() {
        assert!(Style::Character(CharacterStyle::new()).is_character_style());
        assert!(Style::Paragraph(ParagraphStyle::new()).is_paragraph_style());
        assert!(!Style::Document(DocumentStyle::new()).is_character_style());
    }
}
