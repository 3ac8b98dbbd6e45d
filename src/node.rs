//! The document tree.
//!
//! Nodes live in an arena owned by the [`Document`](crate::Document); the
//! parent link is a non-owning index, so upward traversal never creates an
//! ownership cycle while children stay exclusively owned top-down. The node
//! kinds form a closed variant set with explicit capability queries
//! (`accepts_children`, `is_reparentable`) instead of overridable mutation
//! methods.

use crate::document::Document;
use crate::error::{Error, Result};
use crate::image::ImageData;
use crate::list::{ListKind, ListMarker};
use crate::style::ParagraphStyle;
use crate::types::Color;

/// Index of a node within its document's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Border sides of a table cell, in directive emission order.
pub(crate) const TOP: usize = 0;
pub(crate) const RIGHT: usize = 1;
pub(crate) const BOTTOM: usize = 2;
pub(crate) const LEFT: usize = 3;

/// Default cell width in twips.
pub const DEFAULT_CELL_WIDTH: u32 = 300;

/// What a command node is, beyond its prefix/suffix markup. The role drives
/// capability checks and the few render paths that need structural context.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CommandRole {
    /// The document root
    Root,
    /// A plain command group (style wrapper, line break, footnote parts)
    Generic,
    /// A paragraph
    Paragraph,
    /// The outer node of a list, owning one template
    List {
        /// Template id in the document's list table
        template: u32,
    },
    /// One nesting depth of a list
    ListLevel {
        /// Template id in the document's list table
        template: u32,
        /// Nesting depth, 1-9
        depth: u8,
        /// Kind requested when the node was created
        kind: ListKind,
        /// Marker of the cached level backing this node
        marker: ListMarker,
    },
    /// A single list item; its leading marker is computed at render time
    ListText,
    /// A hyperlink field
    Link,
    /// A page header
    Header,
    /// A page footer
    Footer,
}

/// Payload of a command node: a markup prefix, an optional suffix, and the
/// two rendering flags.
#[derive(Debug, Clone)]
pub struct CommandData {
    /// Markup emitted after the opening delimiter
    pub prefix: String,
    /// Markup emitted before the closing delimiter
    pub suffix: Option<String>,
    /// Emit each child on its own line
    pub split: bool,
    /// Surround the node with group delimiters
    pub wrap: bool,
    /// Structural role
    pub role: CommandRole,
    pub(crate) children: Vec<NodeId>,
}

impl CommandData {
    pub(crate) fn new(
        prefix: impl Into<String>,
        suffix: Option<String>,
        split: bool,
        wrap: bool,
        role: CommandRole,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            suffix,
            split,
            wrap,
            role,
            children: Vec::new(),
        }
    }
}

/// Payload of a table node. The grid is fixed at construction.
#[derive(Debug, Clone)]
pub struct TableData {
    /// Margin applied to every cell, in twips
    pub cell_margin: u32,
    pub(crate) rows: Vec<NodeId>,
}

/// Payload of a table row: a fixed array of cells.
#[derive(Debug, Clone)]
pub struct RowData {
    pub(crate) cells: Vec<NodeId>,
}

/// Payload of a table cell.
#[derive(Debug, Clone)]
pub struct CellData {
    /// Cell width in twips
    pub width: u32,
    /// Border widths in top/right/bottom/left order; 0 means no border
    pub borders: [u32; 4],
    /// Shading colour, if any
    pub shading: Option<Color>,
    /// Paragraph-level style applied to the cell content
    pub style: Option<ParagraphStyle>,
    pub(crate) children: Vec<NodeId>,
}

impl CellData {
    pub(crate) fn new(width: u32) -> Self {
        Self {
            width: if width > 0 { width } else { DEFAULT_CELL_WIDTH },
            borders: [0; 4],
            shading: None,
            style: None,
            children: Vec::new(),
        }
    }
}

/// The closed set of node kinds.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Leaf text, escaped on output
    Text(String),
    /// A command group
    Command(CommandData),
    /// A fixed-size table grid
    Table(TableData),
    /// One table row
    Row(RowData),
    /// One table cell
    Cell(CellData),
    /// An embedded image
    Image(ImageData),
}

impl NodeKind {
    /// Whether nodes may be appended beneath this node.
    ///
    /// Tables and rows are closed: their grid is fixed at construction.
    #[inline]
    pub fn accepts_children(&self) -> bool {
        match self {
            NodeKind::Command(_) | NodeKind::Cell(_) => true,
            NodeKind::Text(_) | NodeKind::Table(_) | NodeKind::Row(_) | NodeKind::Image(_) => false,
        }
    }

    /// Whether this node's parent link may be reassigned after construction.
    #[inline]
    pub fn is_reparentable(&self) -> bool {
        !matches!(self, NodeKind::Row(_) | NodeKind::Cell(_))
    }

    /// Whether this node holds appendable text.
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self, NodeKind::Text(_))
    }

    /// Child sequence of this node, empty for leaves.
    #[inline]
    pub fn children(&self) -> &[NodeId] {
        match self {
            NodeKind::Command(data) => &data.children,
            NodeKind::Cell(data) => &data.children,
            NodeKind::Table(data) => &data.rows,
            NodeKind::Row(data) => &data.cells,
            NodeKind::Text(_) | NodeKind::Image(_) => &[],
        }
    }

    #[inline]
    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<NodeId>> {
        match self {
            NodeKind::Command(data) => Some(&mut data.children),
            NodeKind::Cell(data) => Some(&mut data.children),
            NodeKind::Text(_) | NodeKind::Table(_) | NodeKind::Row(_) | NodeKind::Image(_) => None,
        }
    }
}

/// One arena slot: the node payload plus its non-owning parent link.
#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub(crate) parent: Option<NodeId>,
    pub(crate) kind: NodeKind,
}

impl Document {
    pub(crate) fn alloc(&mut self, parent: Option<NodeId>, kind: NodeKind) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(NodeData { parent, kind });
        id
    }

    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.index()]
    }

    /// The kind of a node.
    #[inline]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    /// The parent of a node, `None` for the root.
    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// The ordered child sequence of a node.
    #[inline]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).kind.children()
    }

    /// The first child of a node.
    #[inline]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    /// The last child of a node.
    #[inline]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).last().copied()
    }

    /// The child at `index`, if any.
    #[inline]
    pub fn child_at(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.children(id).get(index).copied()
    }

    /// Number of children of a node.
    #[inline]
    pub fn child_count(&self, id: NodeId) -> usize {
        self.children(id).len()
    }

    /// The sibling preceding a node in its parent's child sequence, found by
    /// identity search. `None` for the first child or the root.
    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let siblings = self.children(parent);
        let index = siblings.iter().position(|&child| child == id)?;
        if index > 0 { Some(siblings[index - 1]) } else { None }
    }

    /// The sibling following a node in its parent's child sequence. `None`
    /// for the last child or the root.
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let siblings = self.children(parent);
        let index = siblings.iter().position(|&child| child == id)?;
        siblings.get(index + 1).copied()
    }

    /// Walk parent links up to the node with no parent.
    pub fn root_of(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    /// Append `child` to `parent`'s child sequence, reparenting it if it is
    /// owned elsewhere.
    ///
    /// There is no duplicate protection: storing an id already present in
    /// the sequence yields a second entry. Fails when `parent` cannot accept
    /// children (table grids are fixed at construction) or when `child` is
    /// structurally frozen (table rows and cells).
    pub fn store(&mut self, parent: NodeId, child: NodeId) -> Result<NodeId> {
        self.attach(parent, child, None)
    }

    /// Insert `child` into `parent`'s child sequence at `index` (clamped to
    /// the sequence length). Same rules as [`store`](Self::store).
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) -> Result<NodeId> {
        self.attach(parent, child, Some(index))
    }

    fn attach(&mut self, parent: NodeId, child: NodeId, index: Option<usize>) -> Result<NodeId> {
        if !self.node(parent).kind.accepts_children() {
            return Err(Error::UnsupportedMutation(
                "this node cannot have children added to it",
            ));
        }
        if self.node(child).parent != Some(parent) {
            if !self.node(child).kind.is_reparentable() {
                return Err(Error::UnsupportedMutation(
                    "table rows and cells cannot have their parent changed",
                ));
            }
            self.node_mut(child).parent = Some(parent);
        }
        let children = match self.node_mut(parent).kind.children_mut() {
            Some(children) => children,
            None => {
                return Err(Error::UnsupportedMutation(
                    "this node cannot have children added to it",
                ));
            },
        };
        match index {
            Some(index) => {
                let index = index.min(children.len());
                children.insert(index, child);
            },
            None => children.push(child),
        }
        Ok(child)
    }

    /// Create a text node beneath `parent`. A text node must have an owner;
    /// passing `None` fails with [`Error::InvalidParent`].
    pub fn create_text(&mut self, parent: Option<NodeId>, text: impl Into<String>) -> Result<NodeId> {
        let parent = parent.ok_or(Error::InvalidParent)?;
        let id = self.alloc(Some(parent), NodeKind::Text(text.into()));
        self.store(parent, id)
    }

    /// Append to the buffer of a text node.
    pub fn text_append(&mut self, id: NodeId, text: &str) -> Result<()> {
        match &mut self.node_mut(id).kind {
            NodeKind::Text(buffer) => {
                buffer.push_str(text);
                Ok(())
            },
            _ => Err(Error::UnsupportedMutation("not a text node")),
        }
    }

    /// Insert into the buffer of a text node at a character offset; offsets
    /// past the end append.
    pub fn text_insert(&mut self, id: NodeId, text: &str, offset: usize) -> Result<()> {
        match &mut self.node_mut(id).kind {
            NodeKind::Text(buffer) => {
                let byte = buffer
                    .char_indices()
                    .nth(offset)
                    .map(|(byte, _)| byte)
                    .unwrap_or(buffer.len());
                buffer.insert_str(byte, text);
                Ok(())
            },
            _ => Err(Error::UnsupportedMutation("not a text node")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    fn command(doc: &mut Document, parent: NodeId) -> NodeId {
        let kind = NodeKind::Command(CommandData::new("\\b", None, true, true, CommandRole::Generic));
        let id = doc.alloc(Some(parent), kind);
        doc.store(parent, id).unwrap()
    }

    #[test]
    fn test_sibling_navigation() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = command(&mut doc, root);
        let b = command(&mut doc, root);
        let c = command(&mut doc, root);

        assert_eq!(doc.previous_sibling(a), None);
        assert_eq!(doc.previous_sibling(b), Some(a));
        assert_eq!(doc.next_sibling(b), Some(c));
        assert_eq!(doc.next_sibling(c), None);
    }

    #[test]
    fn test_root_walk() {
        let mut doc = Document::new();
        let root = doc.root();
        let outer = command(&mut doc, root);
        let inner = command(&mut doc, outer);
        assert_eq!(doc.root_of(inner), root);
        assert_eq!(doc.root_of(root), root);
    }

    #[test]
    fn test_text_requires_parent() {
        let mut doc = Document::new();
        assert!(matches!(
            doc.create_text(None, "orphan"),
            Err(Error::InvalidParent)
        ));
    }

    #[test]
    fn test_text_append_and_insert() {
        let mut doc = Document::new();
        let root = doc.root();
        let text = doc.create_text(Some(root), "Hello").unwrap();
        doc.text_append(text, " World").unwrap();
        doc.text_insert(text, ",", 5).unwrap();
        // Offsets past the end append.
        doc.text_insert(text, "!", 99).unwrap();
        match doc.kind(text) {
            NodeKind::Text(buffer) => assert_eq!(buffer, "Hello, World!"),
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn test_store_does_not_prevent_duplicates() {
        // store performs no containment check, so appending the same id
        // twice yields two entries.
        let mut doc = Document::new();
        let root = doc.root();
        let child = command(&mut doc, root);
        doc.store(root, child).unwrap();
        assert_eq!(doc.children(root), &[child, child]);
    }

    #[test]
    fn test_store_reparents() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = command(&mut doc, root);
        let b = command(&mut doc, root);
        let moved = command(&mut doc, a);
        doc.store(b, moved).unwrap();
        assert_eq!(doc.parent(moved), Some(b));
    }
}
