//! The document root.
//!
//! One [`Document`] exists per generation session. It owns the node arena,
//! the font/colour/list resource tables, the metadata block, and the
//! document-wide style defaults, and it orchestrates final serialization.
//! All resource registration funnels through the document, so the table
//! sections always precede body markup that references an index.

use crate::builder::NodeCursor;
use crate::error::Result;
use crate::info::Information;
use crate::list::ListTable;
use crate::node::{CommandData, CommandRole, NodeData, NodeId, NodeKind};
use crate::style::DocumentStyle;
use crate::types::{ColorTable, Font, FontFamily, FontTable};

/// Which pages a header or footer applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderFooterPosition {
    /// Every page
    Universal,
    /// Left-hand pages only
    LeftPage,
    /// Right-hand pages only
    RightPage,
    /// The first page only
    FirstPage,
}

impl HeaderFooterPosition {
    fn header_word(self) -> &'static str {
        match self {
            HeaderFooterPosition::Universal => "\\header",
            HeaderFooterPosition::LeftPage => "\\headerl",
            HeaderFooterPosition::RightPage => "\\headerr",
            HeaderFooterPosition::FirstPage => "\\headerf",
        }
    }

    fn footer_word(self) -> &'static str {
        match self {
            HeaderFooterPosition::Universal => "\\footer",
            HeaderFooterPosition::LeftPage => "\\footerl",
            HeaderFooterPosition::RightPage => "\\footerr",
            HeaderFooterPosition::FirstPage => "\\footerf",
        }
    }
}

/// An RTF document under construction.
pub struct Document {
    pub(crate) nodes: Vec<NodeData>,
    root: NodeId,
    pub(crate) fonts: FontTable,
    pub(crate) colors: ColorTable,
    pub(crate) lists: ListTable,
    pub(crate) info: Information,
    pub(crate) style: DocumentStyle,
    next_image_id: u32,
}

impl Document {
    /// Create a document with the default Swiss "Arial" font.
    pub fn new() -> Self {
        Self::with_font(Font::new(FontFamily::Swiss, "Arial"))
    }

    /// Create a document seeded with `font` as its default font.
    pub fn with_font(font: Font) -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            root: NodeId::new(0),
            fonts: FontTable::new(),
            colors: ColorTable::new(),
            lists: ListTable::new(),
            info: Information::new(),
            style: DocumentStyle::new(),
            next_image_id: 0,
        };
        let kind = NodeKind::Command(CommandData::new(
            "\\rtf1\\ansi\\deff1",
            None,
            true,
            true,
            CommandRole::Root,
        ));
        doc.root = doc.alloc(None, kind);
        doc.fonts.add(font);
        doc
    }

    /// The root node.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// A builder cursor over the document body.
    #[inline]
    pub fn body(&mut self) -> NodeCursor<'_> {
        let id = self.root;
        NodeCursor { doc: self, id }
    }

    /// The font table.
    #[inline]
    pub fn fonts(&self) -> &FontTable {
        &self.fonts
    }

    /// The colour table.
    #[inline]
    pub fn colors(&self) -> &ColorTable {
        &self.colors
    }

    /// The list templates created so far.
    #[inline]
    pub fn lists(&self) -> &ListTable {
        &self.lists
    }

    /// The document metadata.
    #[inline]
    pub fn information(&self) -> &Information {
        &self.info
    }

    /// Replace the document metadata.
    #[inline]
    pub fn set_information(&mut self, info: Information) {
        self.info = info;
    }

    /// The document-wide style defaults.
    #[inline]
    pub fn style(&self) -> &DocumentStyle {
        &self.style
    }

    /// Replace the document-wide style defaults.
    #[inline]
    pub fn set_style(&mut self, style: DocumentStyle) {
        self.style = style;
    }

    pub(crate) fn next_image_id(&mut self) -> u32 {
        self.next_image_id += 1;
        self.next_image_id
    }

    /// Add a page header and build its content.
    pub fn header(
        &mut self,
        position: HeaderFooterPosition,
        f: impl FnOnce(&mut NodeCursor) -> Result<()>,
    ) -> Result<()> {
        self.page_decoration(position.header_word(), CommandRole::Header, f)
    }

    /// Add a page footer and build its content.
    pub fn footer(
        &mut self,
        position: HeaderFooterPosition,
        f: impl FnOnce(&mut NodeCursor) -> Result<()>,
    ) -> Result<()> {
        self.page_decoration(position.footer_word(), CommandRole::Footer, f)
    }

    fn page_decoration(
        &mut self,
        word: &'static str,
        role: CommandRole,
        f: impl FnOnce(&mut NodeCursor) -> Result<()>,
    ) -> Result<()> {
        let kind = NodeKind::Command(CommandData::new(word, None, false, true, role));
        let root = self.root;
        let id = self.alloc(Some(root), kind);
        self.store(root, id)?;
        f(&mut NodeCursor { doc: self, id })
    }

    /// Serialize the whole document.
    ///
    /// Emission order is fixed: envelope header, font table, colour table,
    /// information block, list and list-override tables, document style
    /// prefix, then each top-level child on its own line, then the closing
    /// delimiter. Readers require the resource sections to precede any body
    /// markup referencing an index.
    pub fn to_rtf(&self) -> String {
        let mut text = String::from("{");
        if let NodeKind::Command(data) = self.kind(self.root) {
            text.push_str(&data.prefix);
        }
        text.push('\n');
        text.push_str(&self.fonts.to_rtf(3));
        text.push('\n');
        text.push_str(&self.colors.to_rtf(3));
        text.push('\n');
        text.push_str(&self.info.to_rtf(3));
        text.push('\n');
        text.push_str(&self.lists.to_rtf(3));
        text.push('\n');
        text.push_str(&self.style.prefix());
        text.push('\n');
        for &child in self.children(self.root) {
            text.push_str(&self.render_node(child));
            text.push('\n');
        }
        text.push('}');
        text
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::ListKind;
    use crate::types::Color;

    #[test]
    fn test_envelope_header_and_default_font() {
        let doc = Document::new();
        let rtf = doc.to_rtf();
        assert!(rtf.starts_with("{\\rtf1\\ansi\\deff1\n"));
        assert!(rtf.ends_with('}'));
        assert!(rtf.contains("{\\f1\\fswiss Arial;}"));
    }

    #[test]
    fn test_with_font_overrides_default() {
        let doc = Document::with_font(Font::new(FontFamily::Roman, "Times New Roman"));
        assert!(doc.to_rtf().contains("{\\f1\\froman Times New Roman;}"));
    }

    #[test]
    fn test_body_text_is_escaped_and_ordered() {
        let mut doc = Document::new();
        {
            let mut body = doc.body();
            body.paragraph(None, |paragraph| paragraph.write("Hello {World}"))
                .unwrap();
        }
        let rtf = doc.to_rtf();
        let fonts = rtf.find("\\fonttbl").unwrap();
        let body = rtf.find("Hello \\{World\\}").unwrap();
        assert!(fonts < body);
        assert!(body < rtf.len() - 1);
    }

    #[test]
    fn test_resource_sections_precede_body() {
        let mut doc = Document::new();
        doc.set_information(Information::new().with_title("Order"));
        {
            let mut body = doc.body();
            body.list(ListKind::Bullets, |level| level.item(|item| item.write("x")))
                .unwrap();
            body.paragraph(None, |paragraph| {
                paragraph.foreground(Color::new(255, 0, 0), |text| text.write("red"))
            })
            .unwrap();
        }
        let rtf = doc.to_rtf();
        let fonts = rtf.find("\\fonttbl").unwrap();
        let colors = rtf.find("\\colortbl").unwrap();
        let info = rtf.find("{\\info").unwrap();
        let lists = rtf.find("{\\*\\listtable").unwrap();
        let overrides = rtf.find("{\\*\\listoverridetable").unwrap();
        let body = rtf.find("\\ls1\\ilvl0").unwrap();
        assert!(fonts < colors);
        assert!(colors < info);
        assert!(info < lists);
        assert!(lists < overrides);
        assert!(overrides < body);
    }

    #[test]
    fn test_two_by_two_table_border_directives() {
        let render = |border: u32| {
            let mut doc = Document::new();
            {
                let mut body = doc.body();
                body.table(2, 2, &[500, 500], |table| {
                    table.set_border_width(border);
                    Ok(())
                })
                .unwrap();
            }
            doc.to_rtf()
        };
        let with_border = render(10);
        assert_eq!(with_border.matches("\\brdrw10").count(), 16);
        assert_eq!(with_border.matches("\\lastrow").count(), 1);
        assert!(!with_border.contains("\\clcbpat"));

        let without = render(0);
        assert!(!without.contains("\\clbrdr"));
    }

    #[test]
    fn test_headers_and_footers_render() {
        let mut doc = Document::new();
        doc.header(HeaderFooterPosition::Universal, |header| {
            header.write("top")
        })
        .unwrap();
        doc.footer(HeaderFooterPosition::FirstPage, |footer| {
            footer.write("bottom")
        })
        .unwrap();
        let rtf = doc.to_rtf();
        assert!(rtf.contains("{\\headertop}"));
        assert!(rtf.contains("{\\footerfbottom}"));
    }

    #[test]
    fn test_image_ids_increment() {
        let mut doc = Document::new();
        let png = {
            let mut data = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
            data.extend_from_slice(&13u32.to_be_bytes());
            data.extend_from_slice(b"IHDR");
            data.extend_from_slice(&1u32.to_be_bytes());
            data.extend_from_slice(&1u32.to_be_bytes());
            data.extend_from_slice(&[8, 6, 0, 0, 0]);
            data
        };
        {
            let mut body = doc.body();
            body.image(png.clone()).unwrap();
            body.image(png).unwrap();
        }
        let rtf = doc.to_rtf();
        assert!(rtf.contains("\\bliptag1"));
        assert!(rtf.contains("\\bliptag2"));
    }
}
