//! # Rambutan
//!
//! A generator for Rich Text Format documents. A document is built as an
//! in-memory tree of formatted content (text, paragraphs, lists, tables,
//! headers and footers, hyperlinks, images, character styling) and then
//! serialized into RTF markup in a single pass.
//!
//! Construction is declarative: callers compose structure by nesting
//! closure-based builder calls, and every font or colour a style references
//! is registered into the document's deduplicated resource tables at that
//! moment, so the table sections of the output always precede the body
//! markup that refers to them by index.
//!
//! ```
//! use rambutan::{Document, ListKind};
//!
//! let mut doc = Document::new();
//! {
//!     let mut body = doc.body();
//!     body.paragraph(None, |p| {
//!         p.write("Hello ")?;
//!         p.bold(|b| b.write("world"))
//!     })?;
//!     body.list(ListKind::Decimal, |level| {
//!         level.item(|item| item.write("first"))?;
//!         level.item(|item| item.write("second"))
//!     })?;
//! }
//! let rtf = doc.to_rtf();
//! assert!(rtf.starts_with("{\\rtf1\\ansi"));
//! # Ok::<(), rambutan::Error>(())
//! ```

pub mod builder;
pub mod document;
pub mod error;
pub mod image;
pub mod info;
pub mod list;
pub mod node;
pub(crate) mod render;
pub mod style;
pub mod types;

pub use builder::{CellCursor, ListLevelCursor, NodeCursor, TableCursor};
pub use document::{Document, HeaderFooterPosition};
pub use error::{Error, Result};
pub use image::{ImageData, ImageType};
pub use info::Information;
pub use list::{ListKind, ListMarker, ListTable};
pub use node::{NodeId, NodeKind};
pub use style::{
    CharacterStyle, DocumentStyle, Justification, Orientation, Paper, ParagraphStyle, Style,
};
pub use types::{Color, ColorTable, Font, FontFamily, FontTable};
