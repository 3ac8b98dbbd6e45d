//! Closure-based builder API for assembling the document tree.
//!
//! Each cursor borrows the document mutably and points at one node; the
//! shortcut methods create a child node, register any fonts or colours it
//! references into the root tables, then hand a cursor for the new node to
//! the supplied closure. Construction is declarative: callers compose
//! structure by nesting builder calls, and every structural violation
//! surfaces as an [`Error`](crate::Error) from the call that caused it.

use crate::document::Document;
use crate::error::{Error, Result};
use crate::image::ImageData;
use crate::list::{ListKind, RESET_TABS};
use crate::node::{
    CellData, CommandData, CommandRole, DEFAULT_CELL_WIDTH, NodeId, NodeKind, RowData, TableData,
};
use crate::render::push_int;
use crate::style::{CharacterStyle, ParagraphStyle, Style};
use crate::types::{Color, Font};

/// A mutable cursor over one content node.
pub struct NodeCursor<'d> {
    pub(crate) doc: &'d mut Document,
    pub(crate) id: NodeId,
}

impl<'d> NodeCursor<'d> {
    /// The node this cursor points at.
    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    fn role(&self) -> Option<CommandRole> {
        match self.doc.kind(self.id) {
            NodeKind::Command(data) => Some(data.role),
            _ => None,
        }
    }

    fn command(
        &mut self,
        prefix: impl Into<String>,
        suffix: Option<String>,
        split: bool,
        wrap: bool,
        role: CommandRole,
    ) -> Result<NodeId> {
        let kind = NodeKind::Command(CommandData::new(prefix, suffix, split, wrap, role));
        let id = self.doc.alloc(Some(self.id), kind);
        self.doc.store(self.id, id)
    }

    /// Write text at the current position. Appends to the last child if it
    /// is a text node, otherwise creates a new one.
    pub fn write(&mut self, text: &str) -> Result<()> {
        if let Some(last) = self.doc.last_child(self.id)
            && self.doc.kind(last).is_text()
        {
            return self.doc.text_append(last, text);
        }
        self.doc.create_text(Some(self.id), text)?;
        Ok(())
    }

    /// Apply a style, wrapping subsequent content in a command node carrying
    /// the style's rendered prefix. Only character styles are accepted.
    pub fn apply(
        &mut self,
        style: &Style,
        f: impl FnOnce(&mut NodeCursor) -> Result<()>,
    ) -> Result<()> {
        match style {
            Style::Character(style) => self.apply_character(style, f),
            other => Err(Error::InvalidStyleKind {
                expected: "character",
                got: other.kind_name(),
            }),
        }
    }

    fn apply_character(
        &mut self,
        style: &CharacterStyle,
        f: impl FnOnce(&mut NodeCursor) -> Result<()>,
    ) -> Result<()> {
        // Register referenced resources before rendering the prefix, so the
        // style can resolve them to indices.
        if let Some(color) = style.foreground {
            self.doc.colors.add(color);
        }
        if let Some(color) = style.background {
            self.doc.colors.add(color);
        }
        if let Some(font) = &style.font {
            self.doc.fonts.add(font.clone());
        }
        let prefix = style.prefix(&self.doc.fonts, &self.doc.colors);
        let id = self.command(prefix, None, true, true, CommandRole::Generic)?;
        f(&mut NodeCursor {
            doc: &mut *self.doc,
            id,
        })
    }

    /// Bold text.
    pub fn bold(&mut self, f: impl FnOnce(&mut NodeCursor) -> Result<()>) -> Result<()> {
        let style = CharacterStyle {
            bold: true,
            ..CharacterStyle::new()
        };
        self.apply_character(&style, f)
    }

    /// Italic text.
    pub fn italic(&mut self, f: impl FnOnce(&mut NodeCursor) -> Result<()>) -> Result<()> {
        let style = CharacterStyle {
            italic: true,
            ..CharacterStyle::new()
        };
        self.apply_character(&style, f)
    }

    /// Underlined text.
    pub fn underline(&mut self, f: impl FnOnce(&mut NodeCursor) -> Result<()>) -> Result<()> {
        let style = CharacterStyle {
            underline: true,
            ..CharacterStyle::new()
        };
        self.apply_character(&style, f)
    }

    /// Subscript text.
    pub fn subscript(&mut self, f: impl FnOnce(&mut NodeCursor) -> Result<()>) -> Result<()> {
        let style = CharacterStyle {
            subscript: true,
            ..CharacterStyle::new()
        };
        self.apply_character(&style, f)
    }

    /// Superscript text.
    pub fn superscript(&mut self, f: impl FnOnce(&mut NodeCursor) -> Result<()>) -> Result<()> {
        let style = CharacterStyle {
            superscript: true,
            ..CharacterStyle::new()
        };
        self.apply_character(&style, f)
    }

    /// Struck-through text.
    pub fn strike(&mut self, f: impl FnOnce(&mut NodeCursor) -> Result<()>) -> Result<()> {
        let style = CharacterStyle {
            strike: true,
            ..CharacterStyle::new()
        };
        self.apply_character(&style, f)
    }

    /// Text in the given font, optionally at a size in half-points.
    pub fn font(
        &mut self,
        font: Font,
        size: Option<u32>,
        f: impl FnOnce(&mut NodeCursor) -> Result<()>,
    ) -> Result<()> {
        let style = CharacterStyle {
            font: Some(font),
            font_size: size,
            ..CharacterStyle::new()
        };
        self.apply_character(&style, f)
    }

    /// Text in the given foreground colour.
    pub fn foreground(
        &mut self,
        color: Color,
        f: impl FnOnce(&mut NodeCursor) -> Result<()>,
    ) -> Result<()> {
        let style = CharacterStyle {
            foreground: Some(color),
            ..CharacterStyle::new()
        };
        self.apply_character(&style, f)
    }

    /// Text on the given background colour.
    pub fn background(
        &mut self,
        color: Color,
        f: impl FnOnce(&mut NodeCursor) -> Result<()>,
    ) -> Result<()> {
        let style = CharacterStyle {
            background: Some(color),
            ..CharacterStyle::new()
        };
        self.apply_character(&style, f)
    }

    /// Text with both foreground and background colours.
    pub fn color(
        &mut self,
        foreground: Color,
        background: Color,
        f: impl FnOnce(&mut NodeCursor) -> Result<()>,
    ) -> Result<()> {
        let style = CharacterStyle {
            foreground: Some(foreground),
            background: Some(background),
            ..CharacterStyle::new()
        };
        self.apply_character(&style, f)
    }

    /// A paragraph, optionally styled. Rejected inside table cells.
    pub fn paragraph(
        &mut self,
        style: Option<&ParagraphStyle>,
        f: impl FnOnce(&mut NodeCursor) -> Result<()>,
    ) -> Result<()> {
        if matches!(self.doc.kind(self.id), NodeKind::Cell(_)) {
            return Err(Error::UnsupportedMutation(
                "table cells cannot contain paragraphs",
            ));
        }
        let mut prefix = String::from("\\pard");
        if let Some(style) = style {
            prefix.push_str(&style.prefix());
        }
        let id = self.command(
            prefix,
            Some(String::from("\\par")),
            true,
            true,
            CommandRole::Paragraph,
        )?;
        f(&mut NodeCursor {
            doc: &mut *self.doc,
            id,
        })
    }

    /// A standalone line break; carries no content.
    pub fn line_break(&mut self) -> Result<()> {
        self.command("\\line", None, false, true, CommandRole::Generic)?;
        Ok(())
    }

    /// A footnote: an inline reference mark plus the footnote body holding
    /// `text`. Rejected inside page headers and footers; empty text is a
    /// no-op.
    pub fn footnote(&mut self, text: &str) -> Result<()> {
        if matches!(
            self.role(),
            Some(CommandRole::Header) | Some(CommandRole::Footer)
        ) {
            return Err(Error::UnsupportedMutation(
                "footnotes are not permitted in page headers or footers",
            ));
        }
        if text.is_empty() {
            return Ok(());
        }
        self.command("\\fs16\\up6\\chftn", None, false, true, CommandRole::Generic)?;
        let note = self.command(
            "\\footnote {\\fs16\\up6\\chftn}",
            None,
            false,
            true,
            CommandRole::Generic,
        )?;
        let mut cursor = NodeCursor {
            doc: &mut *self.doc,
            id: note,
        };
        cursor.paragraph(None, |paragraph| paragraph.write(text))
    }

    /// An embedded image. The format is sniffed from the bytes and the node
    /// is assigned a document-unique numeric id.
    pub fn image(&mut self, data: Vec<u8>) -> Result<NodeId> {
        let image = ImageData::new(self.doc.next_image_id(), data)?;
        let id = self.doc.alloc(Some(self.id), NodeKind::Image(image));
        self.doc.store(self.id, id)
    }

    /// A hyperlink field wrapping its content.
    pub fn link(
        &mut self,
        url: &str,
        text: Option<&str>,
        f: impl FnOnce(&mut NodeCursor) -> Result<()>,
    ) -> Result<()> {
        let prefix = format!("\\field{{\\*\\fldinst HYPERLINK \"{url}\"}}{{\\fldrslt ");
        let id = self.command(
            prefix,
            Some(String::from("}")),
            false,
            true,
            CommandRole::Link,
        )?;
        let mut cursor = NodeCursor {
            doc: &mut *self.doc,
            id,
        };
        if let Some(text) = text {
            cursor.write(text)?;
        }
        f(&mut cursor)
    }

    /// A new ordered or unordered list. Allocates a fresh list template and
    /// yields the first-depth level to the closure.
    pub fn list(
        &mut self,
        kind: ListKind,
        f: impl FnOnce(&mut ListLevelCursor) -> Result<()>,
    ) -> Result<()> {
        let template = self.doc.lists.new_template();
        let mut suffix = String::from("\\pard");
        for tab in RESET_TABS {
            suffix.push_str("\\tx");
            push_int(&mut suffix, tab as i64);
        }
        suffix.push_str("\\ql\\qlnatural\\pardirnatural\\cf0 \\");
        let list = self.command(
            "\\",
            Some(suffix),
            true,
            false,
            CommandRole::List { template },
        )?;
        let level = make_level_node(self.doc, list, template, kind, 1)?;
        f(&mut ListLevelCursor {
            doc: &mut *self.doc,
            id: level,
        })
    }

    /// A fixed-size table. The grid is built immediately and cannot be
    /// resized afterwards; `widths` assigns per-column widths in twips,
    /// missing columns fall back to [`DEFAULT_CELL_WIDTH`]. Rejected inside
    /// table cells.
    pub fn table(
        &mut self,
        rows: usize,
        columns: usize,
        widths: &[u32],
        f: impl FnOnce(&mut TableCursor) -> Result<()>,
    ) -> Result<NodeId> {
        if matches!(self.doc.kind(self.id), NodeKind::Cell(_)) {
            return Err(Error::UnsupportedMutation(
                "tables cannot be nested inside table cells",
            ));
        }
        let table = self.doc.alloc(
            Some(self.id),
            NodeKind::Table(TableData {
                cell_margin: 100,
                rows: Vec::new(),
            }),
        );
        for _ in 0..rows {
            let row = self
                .doc
                .alloc(Some(table), NodeKind::Row(RowData { cells: Vec::new() }));
            for column in 0..columns {
                let width = widths.get(column).copied().unwrap_or(DEFAULT_CELL_WIDTH);
                let cell = self
                    .doc
                    .alloc(Some(row), NodeKind::Cell(CellData::new(width)));
                if let NodeKind::Row(data) = &mut self.doc.node_mut(row).kind {
                    data.cells.push(cell);
                }
            }
            if let NodeKind::Table(data) = &mut self.doc.node_mut(table).kind {
                data.rows.push(row);
            }
        }
        self.doc.store(self.id, table)?;
        f(&mut TableCursor {
            doc: &mut *self.doc,
            id: table,
        })?;
        Ok(table)
    }
}

pub(crate) fn make_level_node(
    doc: &mut Document,
    parent: NodeId,
    template_id: u32,
    kind: ListKind,
    depth: u8,
) -> Result<NodeId> {
    let template = doc
        .lists
        .template_mut(template_id)
        .ok_or(Error::UnsupportedMutation(
            "list template does not belong to this document",
        ))?;
    let level = template.level_for(depth, kind)?;
    let marker = *level.marker();
    let indent = level.indent();
    let tabs: Vec<u32> = level.tabs().to_vec();

    let mut prefix = String::from("\\pard");
    for tab in tabs {
        prefix.push_str("\\tx");
        push_int(&mut prefix, tab as i64);
    }
    prefix.push_str("\\li");
    push_int(&mut prefix, indent as i64);
    prefix.push_str("\\fi-");
    push_int(&mut prefix, indent as i64);
    prefix.push_str("\\ql\\qlnatural\\pardirnatural\n");
    prefix.push_str("\\ls");
    push_int(&mut prefix, template_id as i64);
    prefix.push_str("\\ilvl");
    push_int(&mut prefix, depth as i64 - 1);
    prefix.push_str("\\cf0");

    let node = NodeKind::Command(CommandData::new(
        prefix,
        None,
        true,
        false,
        CommandRole::ListLevel {
            template: template_id,
            depth,
            kind,
            marker,
        },
    ));
    let id = doc.alloc(Some(parent), node);
    doc.store(parent, id)
}

/// A cursor over one list level, offering item creation and nesting.
pub struct ListLevelCursor<'d> {
    pub(crate) doc: &'d mut Document,
    pub(crate) id: NodeId,
}

impl<'d> ListLevelCursor<'d> {
    /// The level node this cursor points at.
    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    fn parts(&self) -> Result<(u32, u8, ListKind)> {
        match self.doc.kind(self.id) {
            NodeKind::Command(CommandData {
                role:
                    CommandRole::ListLevel {
                        template,
                        depth,
                        kind,
                        ..
                    },
                ..
            }) => Ok((*template, *depth, *kind)),
            _ => Err(Error::UnsupportedMutation("not a list level node")),
        }
    }

    /// The nesting depth of this level, 1-9.
    pub fn depth(&self) -> u8 {
        self.parts().map(|(_, depth, _)| depth).unwrap_or(1)
    }

    /// The kind of this level.
    pub fn kind(&self) -> Result<ListKind> {
        self.parts().map(|(_, _, kind)| kind)
    }

    fn make_item(&mut self, position: Option<usize>) -> Result<NodeId> {
        // The leading marker is computed during rendering from the item's
        // position among its siblings, so numbering stays correct when
        // earlier items are inserted or removed.
        let kind = NodeKind::Command(CommandData::new(
            "",
            Some(String::from("\\")),
            false,
            false,
            CommandRole::ListText,
        ));
        let id = self.doc.alloc(Some(self.id), kind);
        match position {
            Some(position) => self.doc.insert_child(self.id, position, id),
            None => self.doc.store(self.id, id),
        }
    }

    /// Append a list item and build its content.
    pub fn item(&mut self, f: impl FnOnce(&mut NodeCursor) -> Result<()>) -> Result<()> {
        let id = self.make_item(None)?;
        f(&mut NodeCursor {
            doc: &mut *self.doc,
            id,
        })
    }

    /// Insert a list item at `position` (clamped to the item count) and
    /// build its content. Later decimal items renumber automatically.
    pub fn insert_item(
        &mut self,
        position: usize,
        f: impl FnOnce(&mut NodeCursor) -> Result<()>,
    ) -> Result<()> {
        let id = self.make_item(Some(position))?;
        f(&mut NodeCursor {
            doc: &mut *self.doc,
            id,
        })
    }

    /// A nested list at depth + 1, sharing this level's template. Depths
    /// beyond 9 fail with [`Error::InvalidListLevel`].
    pub fn list(
        &mut self,
        kind: ListKind,
        f: impl FnOnce(&mut ListLevelCursor) -> Result<()>,
    ) -> Result<()> {
        let (template, depth, _) = self.parts()?;
        let id = make_level_node(self.doc, self.id, template, kind, depth.saturating_add(1))?;
        f(&mut ListLevelCursor {
            doc: &mut *self.doc,
            id,
        })
    }
}

/// A cursor over a table node.
pub struct TableCursor<'d> {
    pub(crate) doc: &'d mut Document,
    pub(crate) id: NodeId,
}

impl<'d> TableCursor<'d> {
    /// The table node this cursor points at.
    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Number of rows in the grid.
    pub fn rows(&self) -> usize {
        self.doc.child_count(self.id)
    }

    /// Number of columns in the grid.
    pub fn columns(&self) -> usize {
        self.doc
            .first_child(self.id)
            .map(|row| self.doc.child_count(row))
            .unwrap_or(0)
    }

    /// Set the margin applied to every cell, in twips.
    pub fn set_cell_margin(&mut self, margin: u32) {
        if let NodeKind::Table(data) = &mut self.doc.node_mut(self.id).kind {
            data.cell_margin = margin;
        }
    }

    fn cell_ids(&self) -> Vec<NodeId> {
        self.doc
            .children(self.id)
            .iter()
            .flat_map(|&row| self.doc.children(row))
            .copied()
            .collect()
    }

    /// Set the border width on every side of every cell; zero switches the
    /// borders off.
    pub fn set_border_width(&mut self, width: u32) {
        for cell in self.cell_ids() {
            with_cell(self.doc, cell, |data| set_all_borders(data, width));
        }
    }

    /// Shade every cell of a row; out-of-range rows are ignored.
    pub fn set_row_shading_color(&mut self, row: usize, color: Color) {
        let Some(row) = self.doc.child_at(self.id, row) else {
            return;
        };
        self.doc.colors.add(color);
        for cell in self.doc.children(row).to_vec() {
            with_cell(self.doc, cell, |data| data.shading = Some(color));
        }
    }

    /// Shade every cell of a column; out-of-range columns are ignored.
    pub fn set_column_shading_color(&mut self, column: usize, color: Color) {
        self.doc.colors.add(color);
        for row in self.doc.children(self.id).to_vec() {
            if let Some(cell) = self.doc.child_at(row, column) {
                with_cell(self.doc, cell, |data| data.shading = Some(color));
            }
        }
    }

    /// Access the cell at (`row`, `column`).
    pub fn cell(
        &mut self,
        row: usize,
        column: usize,
        f: impl FnOnce(&mut CellCursor) -> Result<()>,
    ) -> Result<()> {
        let id = self
            .doc
            .child_at(self.id, row)
            .and_then(|row| self.doc.child_at(row, column))
            .ok_or(Error::UnsupportedMutation("cell position out of range"))?;
        f(&mut CellCursor {
            doc: &mut *self.doc,
            id,
        })
    }
}

fn with_cell(doc: &mut Document, id: NodeId, f: impl FnOnce(&mut CellData)) {
    if let NodeKind::Cell(data) = &mut doc.node_mut(id).kind {
        f(data);
    }
}

fn set_all_borders(data: &mut CellData, width: u32) {
    data.borders = [width; 4];
}

/// A cursor over a single table cell.
pub struct CellCursor<'d> {
    pub(crate) doc: &'d mut Document,
    pub(crate) id: NodeId,
}

impl<'d> CellCursor<'d> {
    /// The cell node this cursor points at.
    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Set the cell width in twips; zero falls back to the default width.
    pub fn set_width(&mut self, width: u32) {
        with_cell(self.doc, self.id, |data| {
            data.width = if width > 0 { width } else { DEFAULT_CELL_WIDTH };
        });
    }

    /// Set the border width on all four sides; zero switches the borders
    /// off.
    pub fn set_border_width(&mut self, width: u32) {
        with_cell(self.doc, self.id, |data| set_all_borders(data, width));
    }

    /// Set the top border width; zero switches the border off.
    pub fn set_top_border_width(&mut self, width: u32) {
        with_cell(self.doc, self.id, |data| data.borders[0] = width);
    }

    /// Set the right border width; zero switches the border off.
    pub fn set_right_border_width(&mut self, width: u32) {
        with_cell(self.doc, self.id, |data| data.borders[1] = width);
    }

    /// Set the bottom border width; zero switches the border off.
    pub fn set_bottom_border_width(&mut self, width: u32) {
        with_cell(self.doc, self.id, |data| data.borders[2] = width);
    }

    /// Set the left border width; zero switches the border off.
    pub fn set_left_border_width(&mut self, width: u32) {
        with_cell(self.doc, self.id, |data| data.borders[3] = width);
    }

    /// Border widths in top/right/bottom/left order.
    pub fn border_widths(&self) -> [u32; 4] {
        match self.doc.kind(self.id) {
            NodeKind::Cell(data) => data.borders,
            _ => [0; 4],
        }
    }

    /// Shade the cell; the colour is registered into the document's colour
    /// table immediately.
    pub fn set_shading_color(&mut self, color: Color) {
        self.doc.colors.add(color);
        with_cell(self.doc, self.id, |data| data.shading = Some(color));
    }

    /// Remove the cell's shading.
    pub fn clear_shading(&mut self) {
        with_cell(self.doc, self.id, |data| data.shading = None);
    }

    /// Apply a paragraph-level style to the cell content.
    pub fn set_style(&mut self, style: &Style) -> Result<()> {
        match style {
            Style::Paragraph(style) => {
                let style = *style;
                with_cell(self.doc, self.id, |data| data.style = Some(style));
                Ok(())
            },
            other => Err(Error::InvalidStyleKind {
                expected: "paragraph",
                got: other.kind_name(),
            }),
        }
    }

    /// Write text into the cell.
    pub fn write(&mut self, text: &str) -> Result<()> {
        self.content(|content| content.write(text))
    }

    /// Build styled content inside the cell. Paragraphs and nested tables
    /// remain rejected.
    pub fn content(&mut self, f: impl FnOnce(&mut NodeCursor) -> Result<()>) -> Result<()> {
        f(&mut NodeCursor {
            doc: &mut *self.doc,
            id: self.id,
        })
    }
}
