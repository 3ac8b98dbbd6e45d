//! Serialization of the document tree into RTF markup.
//!
//! Each node kind renders its own fragment and delegates to its children;
//! resource tables are rendered separately by the document envelope before
//! any body fragment that references an index.

use crate::document::Document;
use crate::image::ImageData;
use crate::list::{ListKind, ListMarker};
use crate::node::{BOTTOM, CellData, CommandData, CommandRole, LEFT, NodeId, NodeKind, RIGHT, TOP};
use memchr::memmem;

/// Append a decimal integer without intermediate allocation.
#[inline]
pub(crate) fn push_int(text: &mut String, value: i64) {
    let mut buffer = itoa::Buffer::new();
    text.push_str(buffer.format(value));
}

/// Escape literal text for RTF output.
///
/// Group delimiters and the backslash are backslash-escaped; other
/// characters below codepoint 128 pass through literally; everything else
/// is emitted as `\uN` over its UTF-16 code units, each followed by the
/// one-byte `\'3f` fallback for readers without Unicode support. Surrogate
/// pairs therefore produce two escape directives.
pub(crate) fn escape_text(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '{' => out.push_str("\\{"),
            '}' => out.push_str("\\}"),
            '\\' => out.push_str("\\\\"),
            ch if (ch as u32) < 128 => out.push(ch),
            ch => {
                let mut units = [0u16; 2];
                for unit in ch.encode_utf16(&mut units) {
                    out.push_str("\\u");
                    push_int(out, *unit as i64);
                    out.push_str("\\'3f");
                }
            },
        }
    }
}

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Bytes of hex data per line in a `\pict` group.
const PICT_LINE_BYTES: usize = 40;

impl Document {
    /// Render one node's subtree fragment.
    pub(crate) fn render_node(&self, id: NodeId) -> String {
        match self.kind(id) {
            NodeKind::Text(text) => {
                let mut out = String::new();
                escape_text(&mut out, text);
                out
            },
            NodeKind::Command(data) => self.render_command(id, data),
            NodeKind::Table(data) => self.render_table(data),
            NodeKind::Row(_) => {
                let margin = self
                    .parent(id)
                    .and_then(|parent| match self.kind(parent) {
                        NodeKind::Table(table) => Some(table.cell_margin),
                        _ => None,
                    })
                    .unwrap_or(100);
                self.render_row(id, margin)
            },
            NodeKind::Cell(data) => self.render_cell(data),
            NodeKind::Image(image) => render_image(image),
        }
    }

    fn render_command(&self, id: NodeId, data: &CommandData) -> String {
        let mut text = String::new();
        if data.wrap {
            text.push('{');
        }
        match data.role {
            CommandRole::ListText => text.push_str(&self.list_text_prefix(id)),
            _ => text.push_str(&data.prefix),
        }
        for &child in &data.children {
            if data.split {
                text.push('\n');
            }
            text.push_str(&self.render_node(child));
        }
        if data.split {
            text.push('\n');
        }
        if let Some(suffix) = &data.suffix {
            text.push_str(suffix);
        }
        if data.wrap {
            text.push('}');
        }
        text
    }

    /// Build a list item's leading marker group. Decimal ordinals are
    /// computed here from the item's position among its level siblings, so
    /// numbering reflects the tree as it stands at serialization time.
    fn list_text_prefix(&self, id: NodeId) -> String {
        let mut marker = ListMarker::DISC;
        let mut number = None;
        if let Some(parent) = self.parent(id)
            && let NodeKind::Command(CommandData {
                role:
                    CommandRole::ListLevel {
                        kind,
                        marker: level_marker,
                        ..
                    },
                children,
                ..
            }) = self.kind(parent)
        {
            marker = *level_marker;
            if *kind == ListKind::Decimal {
                let mut count = 0usize;
                for &sibling in children {
                    if sibling == id {
                        break;
                    }
                    if let NodeKind::Command(data) = self.kind(sibling)
                        && data.role == CommandRole::ListText
                    {
                        count += 1;
                    }
                }
                number = Some(count + 1);
            }
        }
        let mut text = String::from("{\\listtext");
        text.push_str(&marker.text_format(number));
        text.push('}');
        text
    }

    fn render_table(&self, data: &crate::node::TableData) -> String {
        let mut text = String::new();
        for (index, &row) in data.rows.iter().enumerate() {
            if index > 0 {
                text.push('\n');
            }
            text.push_str(&self.render_row(row, data.cell_margin));
        }
        mark_last_row(text)
    }

    /// Render one row: the `\trowd` header with per-cell border, shading,
    /// and boundary directives, then every cell's content, then `\row`.
    fn render_row(&self, row: NodeId, cell_margin: u32) -> String {
        let mut text = String::from("\\trowd\\tgraph");
        push_int(&mut text, cell_margin as i64);
        let mut bodies = String::new();
        let mut offset = 0u32;
        for &cell in self.children(row) {
            let NodeKind::Cell(data) = self.kind(cell) else {
                continue;
            };
            text.push('\n');
            for (side, word) in [
                (TOP, "\\clbrdrt"),
                (RIGHT, "\\clbrdrr"),
                (BOTTOM, "\\clbrdrb"),
                (LEFT, "\\clbrdrl"),
            ] {
                let width = data.borders[side];
                if width != 0 {
                    text.push_str(word);
                    text.push_str("\\brdrw");
                    push_int(&mut text, width as i64);
                    text.push_str("\\brdrs");
                }
            }
            if let Some(color) = data.shading
                && let Some(index) = self.colors.index(color)
            {
                text.push_str("\\clcbpat");
                push_int(&mut text, index as i64);
            }
            text.push_str("\\cellx");
            push_int(&mut text, (data.width + offset) as i64);
            bodies.push('\n');
            bodies.push_str(&self.render_cell(data));
            offset += data.width;
        }
        text.push_str(&bodies);
        text.push_str("\n\\row");
        text
    }

    fn render_cell(&self, data: &CellData) -> String {
        let mut text = String::from("\\pard\\intbl");
        if let Some(style) = &data.style {
            text.push_str(&style.prefix());
        }
        text.push('\n');
        for (index, &child) in data.children.iter().enumerate() {
            if index > 0 {
                text.push('\n');
            }
            text.push_str(&self.render_node(child));
        }
        text.push_str("\n\\cell");
        text
    }
}

/// Tag the final row of a table's rendering. The last `\row` terminator is
/// located by reverse search over the serialized text and `\lastrow` is
/// inserted on the line before it.
fn mark_last_row(mut text: String) -> String {
    if let Some(position) = memmem::rfind(text.as_bytes(), b"\\row") {
        text.insert_str(position, "\\lastrow\n");
    }
    text
}

fn render_image(image: &ImageData) -> String {
    let mut text = String::from("{\\pict");
    text.push_str(image.kind.control_word());
    text.push_str("\\picw");
    push_int(&mut text, image.width as i64);
    text.push_str("\\pich");
    push_int(&mut text, image.height as i64);
    // Display size in twips, assuming 96 DPI source pixels.
    text.push_str("\\picwgoal");
    push_int(&mut text, image.width as i64 * 15);
    text.push_str("\\pichgoal");
    push_int(&mut text, image.height as i64 * 15);
    text.push_str("\\bliptag");
    push_int(&mut text, image.id as i64);
    text.push('\n');
    for (index, byte) in image.data.iter().enumerate() {
        if index > 0 && index % PICT_LINE_BYTES == 0 {
            text.push('\n');
        }
        text.push(HEX_DIGITS[(byte >> 4) as usize] as char);
        text.push(HEX_DIGITS[(byte & 0x0F) as usize] as char);
    }
    text.push_str("\n}");
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::list::ListKind;
    use proptest::prelude::*;

    fn escaped(text: &str) -> String {
        let mut out = String::new();
        escape_text(&mut out, text);
        out
    }

    #[test]
    fn test_escape_delimiters_and_backslash() {
        assert_eq!(escaped("Hello {World}"), "Hello \\{World\\}");
        assert_eq!(escaped("a\\b"), "a\\\\b");
    }

    #[test]
    fn test_escape_high_codepoints() {
        assert_eq!(escaped("\u{2022}"), "\\u8226\\'3f");
        // Characters outside the BMP escape each surrogate separately.
        assert_eq!(escaped("\u{1F600}"), "\\u55357\\'3f\\u56832\\'3f");
    }

    #[test]
    fn test_command_render_split_and_wrap() {
        let mut doc = Document::new();
        let body = doc.root();
        {
            let mut cursor = doc.body();
            cursor
                .paragraph(None, |paragraph| paragraph.write("hi"))
                .unwrap();
        }
        let paragraph = doc.first_child(body).unwrap();
        assert_eq!(doc.render_node(paragraph), "{\\pard\nhi\n\\par}");
    }

    #[test]
    fn test_list_items_number_from_position() {
        let mut doc = Document::new();
        {
            let mut body = doc.body();
            body.list(ListKind::Decimal, |level| {
                level.item(|item| item.write("first"))?;
                level.item(|item| item.write("second"))?;
                level.insert_item(1, |item| item.write("between"))
            })
            .unwrap();
        }
        let root = doc.root();
        let list = doc.first_child(root).unwrap();
        let rtf = doc.render_node(list);
        assert!(rtf.contains("{\\listtext\t1.\t}"));
        assert!(rtf.contains("{\\listtext\t2.\t}"));
        assert!(rtf.contains("{\\listtext\t3.\t}"));
        // The inserted item took over the number 2 and pushed "second" to 3.
        let two = rtf.find("\t2.\t").unwrap();
        assert_eq!(&rtf[two + 4..two + 12], "}between");
    }

    #[test]
    fn test_table_marks_exactly_one_last_row() {
        let mut doc = Document::new();
        let table = {
            let mut body = doc.body();
            body.table(3, 1, &[500], |_| Ok(())).unwrap()
        };
        let rtf = doc.render_node(table);
        assert_eq!(rtf.matches("\\lastrow").count(), 1);
        assert_eq!(rtf.matches("\\trowd").count(), 3);
        assert!(rtf.ends_with("\\lastrow\n\\row"));
    }

    #[test]
    fn test_row_borders_and_boundaries() {
        let mut doc = Document::new();
        let table = {
            let mut body = doc.body();
            body.table(1, 2, &[400, 600], |table| {
                table.set_border_width(10);
                table.cell(0, 0, |cell| cell.write("a"))?;
                table.cell(0, 1, |cell| cell.write("b"))
            })
            .unwrap()
        };
        let rtf = doc.render_node(table);
        assert!(rtf.contains("\\trowd\\tgraph100"));
        assert!(rtf.contains("\\clbrdrt\\brdrw10\\brdrs"));
        assert_eq!(rtf.matches("\\brdrw10").count(), 8);
        // Boundaries accumulate across the row.
        assert!(rtf.contains("\\cellx400"));
        assert!(rtf.contains("\\cellx1000"));
        assert!(!rtf.contains("\\clcbpat"));
    }

    #[test]
    fn test_cell_shading_references_colour_index() {
        let mut doc = Document::new();
        let green = crate::types::Color::new(0, 255, 0);
        let table = {
            let mut body = doc.body();
            body.table(1, 1, &[500], |table| {
                table.cell(0, 0, |cell| {
                    cell.set_shading_color(green);
                    Ok(())
                })
            })
            .unwrap()
        };
        let rtf = doc.render_node(table);
        assert!(rtf.contains("\\clcbpat1"));
    }

    #[test]
    fn test_image_renders_hex_pict_group() {
        let mut doc = Document::new();
        let png = {
            let mut data = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
            data.extend_from_slice(&13u32.to_be_bytes());
            data.extend_from_slice(b"IHDR");
            data.extend_from_slice(&2u32.to_be_bytes());
            data.extend_from_slice(&3u32.to_be_bytes());
            data.extend_from_slice(&[8, 6, 0, 0, 0]);
            data
        };
        let image = {
            let mut body = doc.body();
            body.image(png).unwrap()
        };
        let rtf = doc.render_node(image);
        assert!(rtf.starts_with(
            "{\\pict\\pngblip\\picw2\\pich3\\picwgoal30\\pichgoal45\\bliptag1\n"
        ));
        assert!(rtf.contains("89504e47"));
        assert!(rtf.ends_with("\n}"));
    }

    proptest! {
        #[test]
        fn escaped_text_is_ascii_and_deterministic(text in "\\PC*") {
            let first = escaped(&text);
            prop_assert!(first.chars().all(|ch| (ch as u32) < 128));
            prop_assert_eq!(first, escaped(&text));
        }
    }
}
