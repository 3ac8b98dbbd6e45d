//! RTF list and numbering support.
//!
//! RTF lists use a two-table system: a list table defining per-level tab
//! stops, indents, and markers, and a parallel override table mapping each
//! template to itself (no override sharing is needed here, so the mapping is
//! a fixed 1:1). Templates get sequential 1-based ids in creation order and
//! own up to nine lazily-created levels, one per nesting depth.

use crate::error::{Error, Result};
use crate::render::push_int;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Base tab-stop table for depth-1 levels, in twips.
pub const LEVEL_TABS: [u32; 13] = [
    220, 720, 1133, 1700, 2267, 2834, 3401, 3968, 4535, 5102, 5669, 6236, 6803,
];

/// Tab stops restored after a list ends.
pub const RESET_TABS: [u32; 12] = [
    560, 1133, 1700, 2267, 2834, 3401, 3968, 4535, 5102, 5669, 6236, 6803,
];

/// The kind of a list level: bulleted or numbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListKind {
    /// Bulleted items
    Bullets,
    /// Decimal-numbered items
    Decimal,
}

/// The leading marker rendered in front of each list item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListMarker {
    name: &'static str,
    codepoint: Option<u32>,
}

impl ListMarker {
    /// Disc bullet (U+2022).
    pub const DISC: ListMarker = ListMarker::new("disc", Some(0x2022));
    /// Hyphen bullet (U+2043).
    pub const HYPHEN: ListMarker = ListMarker::new("hyphen", Some(0x2043));
    /// Decimal numbering.
    pub const DECIMAL: ListMarker = ListMarker::new("decimal", None);

    /// Create a marker; a codepoint makes it a bullet, `None` makes it
    /// decimal numbering.
    #[inline]
    pub const fn new(name: &'static str, codepoint: Option<u32>) -> Self {
        Self { name, codepoint }
    }

    /// Whether this marker renders a bullet glyph.
    #[inline]
    pub fn is_bullet(&self) -> bool {
        self.codepoint.is_some()
    }

    /// The number-format code: 23 for bullets, 0 for arabic numbering.
    #[inline]
    fn number_type(&self) -> i64 {
        if self.is_bullet() { 23 } else { 0 }
    }

    /// The marker's display name as it appears in the level definition.
    fn name(&self) -> String {
        let mut name = format!("\\{{{}\\}}", self.name);
        if !self.is_bullet() {
            name.push('.');
        }
        name
    }

    /// The level-text template fragment for this marker.
    fn template_format(&self) -> String {
        match self.codepoint {
            Some(cp) => {
                let mut text = String::from("\\'01\\uc0\\u");
                push_int(&mut text, cp as i64);
                text
            },
            None => String::from("\\'02\\'00. "),
        }
    }

    /// The per-item marker text: the bullet codepoint escape, or the given
    /// ordinal followed by a period.
    pub(crate) fn text_format(&self, number: Option<usize>) -> String {
        let mut text = String::from("\t");
        match self.codepoint {
            Some(cp) => {
                text.push_str("\\uc0\\u");
                push_int(&mut text, cp as i64);
            },
            None => {
                push_int(&mut text, number.unwrap_or(1) as i64);
                text.push('.');
            },
        }
        text.push('\t');
        text
    }
}

impl ListKind {
    /// The built-in marker for this kind.
    #[inline]
    fn marker(self) -> ListMarker {
        match self {
            ListKind::Bullets => ListMarker::DISC,
            ListKind::Decimal => ListMarker::DECIMAL,
        }
    }
}

/// One nesting depth (1-9) within a list template.
///
/// Tab stops and indent derive purely from the depth: depth-1 levels use the
/// base tab table, and each further depth collapses the first three stops
/// into two wider stops, cascading the indent outward.
#[derive(Debug, Clone)]
pub struct ListLevel {
    level: u8,
    marker: ListMarker,
    tabs: SmallVec<[u32; 16]>,
    id: u32,
}

impl ListLevel {
    fn new(template_id: u32, marker: ListMarker, level: u8) -> Result<Self> {
        if !(1..=9).contains(&level) {
            return Err(Error::InvalidListLevel(level));
        }
        Ok(Self {
            level,
            marker,
            tabs: Self::tabs_for(level),
            id: template_id * 10 + level as u32,
        })
    }

    fn tabs_for(level: u8) -> SmallVec<[u32; 16]> {
        let mut tabs: SmallVec<[u32; 16]> = SmallVec::from_slice(&LEVEL_TABS);
        for _ in 1..level {
            let first = tabs[0];
            tabs.drain(0..3);
            let (a, b) = (first + 720, first + 1220);
            while tabs.first().is_some_and(|&t| t < b) {
                tabs.remove(0);
            }
            tabs.insert(0, b);
            tabs.insert(0, a);
        }
        tabs
    }

    /// The nesting depth of this level, 1-9.
    #[inline]
    pub fn level(&self) -> u8 {
        self.level
    }

    /// The marker rendered in front of items at this level.
    #[inline]
    pub fn marker(&self) -> &ListMarker {
        &self.marker
    }

    /// Tab stops for this level, in twips.
    #[inline]
    pub fn tabs(&self) -> &[u32] {
        &self.tabs
    }

    /// Hanging indent for this level, in twips.
    #[inline]
    pub fn indent(&self) -> u32 {
        self.level as u32 * 720
    }

    /// Render the level definition block.
    fn to_rtf(&self, indent: usize) -> String {
        let prefix = " ".repeat(indent);
        let nfc = self.marker.number_type();
        let mut text = String::new();

        text.push_str(&prefix);
        text.push_str("{\\listlevel\\levelstartat1");
        text.push_str("\\levelnfc");
        push_int(&mut text, nfc);
        text.push_str("\\levelnfcn");
        push_int(&mut text, nfc);
        text.push_str("\\leveljc0\\leveljcn0");
        text.push_str("\\levelfollow0");
        text.push_str("\\levelindent0\\levelspace360");
        text.push_str("{\\*\\levelmarker ");
        text.push_str(&self.marker.name());
        text.push('}');
        text.push_str("{\\leveltext\\leveltemplateid");
        push_int(&mut text, self.id as i64);
        text.push_str(&self.marker.template_format());
        text.push_str(";}");
        text.push_str("{\\levelnumbers;}");
        text.push_str("\\fi-360\\li");
        push_int(&mut text, indent as i64);
        text.push_str("\\lin");
        push_int(&mut text, indent as i64);
        text.push_str("}\n");
        text
    }
}

/// A reusable numbering/bullet definition shared by every item that renders
/// through one of its levels.
#[derive(Debug, Clone)]
pub struct ListTemplate {
    id: u32,
    levels: [Option<ListLevel>; 9],
}

impl ListTemplate {
    fn new(id: u32) -> Self {
        Self {
            id,
            levels: Default::default(),
        }
    }

    /// The template's 1-based id, immutable once assigned.
    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Fetch the level for a nesting depth, creating and caching it on
    /// first reference. The kind only matters on that first reference.
    pub fn level_for(&mut self, level: u8, kind: ListKind) -> Result<&ListLevel> {
        if !(1..=9).contains(&level) {
            return Err(Error::InvalidListLevel(level));
        }
        let slot = &mut self.levels[level as usize - 1];
        if slot.is_none() {
            *slot = Some(ListLevel::new(self.id, kind.marker(), level)?);
        }
        match slot.as_ref() {
            Some(cached) => Ok(cached),
            None => Err(Error::InvalidListLevel(level)),
        }
    }

    /// Render the list definition block.
    fn to_rtf(&self) -> String {
        let mut text = String::from("{\\list\\listtemplate");
        push_int(&mut text, self.id as i64);
        text.push_str("\\listhybrid");
        for level in self.levels.iter().flatten() {
            text.push_str(&level.to_rtf(0));
        }
        text.push_str("{\\listname;}\\listid");
        push_int(&mut text, self.id as i64);
        text.push_str("}\n");
        text
    }
}

/// The document's list templates, in creation order.
#[derive(Debug, Clone, Default)]
pub struct ListTable {
    templates: Vec<ListTemplate>,
}

impl ListTable {
    /// Create a new, empty list table.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new template with the next sequential id, returning the id.
    pub fn new_template(&mut self) -> u32 {
        let id = self.templates.len() as u32 + 1;
        self.templates.push(ListTemplate::new(id));
        id
    }

    /// Look up a template by id.
    #[inline]
    pub fn template(&self, id: u32) -> Option<&ListTemplate> {
        (id as usize)
            .checked_sub(1)
            .and_then(|index| self.templates.get(index))
    }

    /// Look up a template by id, mutably.
    #[inline]
    pub fn template_mut(&mut self, id: u32) -> Option<&mut ListTemplate> {
        (id as usize)
            .checked_sub(1)
            .and_then(|index| self.templates.get_mut(index))
    }

    /// Number of templates created.
    #[inline]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether no templates have been created.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Render the list table and its parallel override table.
    pub(crate) fn to_rtf(&self, indent: usize) -> String {
        if self.templates.is_empty() {
            return String::new();
        }
        let prefix = " ".repeat(indent);
        let mut text = String::new();

        text.push_str(&prefix);
        text.push_str("{\\*\\listtable");
        for template in &self.templates {
            text.push_str(&template.to_rtf());
        }
        text.push('}');

        text.push_str(&prefix);
        text.push_str("{\\*\\listoverridetable");
        for template in &self.templates {
            text.push_str("{\\listoverride\\listid");
            push_int(&mut text, template.id as i64);
            text.push_str("\\listoverridecount0\\ls");
            push_int(&mut text, template.id as i64);
            text.push('}');
        }
        text.push_str("}\n");
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_ids_are_sequential() {
        let mut table = ListTable::new();
        assert_eq!(table.new_template(), 1);
        assert_eq!(table.new_template(), 2);
        assert_eq!(table.new_template(), 3);
        assert_eq!(table.template(2).map(|t| t.id()), Some(2));
    }

    #[test]
    fn test_unassigned_template_ids_return_none() {
        let mut table = ListTable::new();
        // Ids are 1-based, so 0 is never assigned.
        assert!(table.template(0).is_none());
        assert!(table.template_mut(0).is_none());
        assert!(table.template(1).is_none());
        table.new_template();
        assert!(table.template(1).is_some());
        assert!(table.template(2).is_none());
    }

    #[test]
    fn test_level_bounds() {
        let mut table = ListTable::new();
        let id = table.new_template();
        let template = table.template_mut(id).unwrap();
        assert!(template.level_for(0, ListKind::Bullets).is_err());
        assert!(template.level_for(10, ListKind::Bullets).is_err());
        // Depth 9 is the last valid depth.
        assert!(template.level_for(9, ListKind::Bullets).is_ok());
        assert!(template.level_for(1, ListKind::Decimal).is_ok());
    }

    #[test]
    fn test_levels_cached_per_depth() {
        let mut table = ListTable::new();
        let id = table.new_template();
        let template = table.template_mut(id).unwrap();
        let first = template.level_for(2, ListKind::Bullets).unwrap().marker().is_bullet();
        // Second reference at the same depth reuses the cached level, kind
        // included.
        let second = template.level_for(2, ListKind::Decimal).unwrap().marker().is_bullet();
        assert!(first);
        assert!(second);
    }

    #[test]
    fn test_depth_one_uses_base_tabs() {
        let mut table = ListTable::new();
        let id = table.new_template();
        let template = table.template_mut(id).unwrap();
        let level = template.level_for(1, ListKind::Bullets).unwrap();
        assert_eq!(level.tabs(), &LEVEL_TABS[..]);
        assert_eq!(level.indent(), 720);
    }

    #[test]
    fn test_deeper_levels_cascade_tabs() {
        let mut table = ListTable::new();
        let id = table.new_template();
        let template = table.template_mut(id).unwrap();
        let level = template.level_for(2, ListKind::Bullets).unwrap();
        // 220 + 720 and 220 + 1220, then the surviving base stops.
        assert_eq!(&level.tabs()[..2], &[940, 1440]);
        assert_eq!(level.tabs()[2], 1700);
        assert_eq!(level.indent(), 1440);
    }

    #[test]
    fn test_marker_formats() {
        assert_eq!(ListMarker::DISC.text_format(None), "\t\\uc0\\u8226\t");
        assert_eq!(ListMarker::DECIMAL.text_format(Some(3)), "\t3.\t");
        assert_eq!(ListMarker::DECIMAL.name(), "\\{decimal\\}.");
        assert_eq!(ListMarker::DISC.template_format(), "\\'01\\uc0\\u8226");
        assert_eq!(ListMarker::DECIMAL.template_format(), "\\'02\\'00. ");
    }

    #[test]
    fn test_empty_table_renders_nothing() {
        assert_eq!(ListTable::new().to_rtf(3), "");
    }

    #[test]
    fn test_override_table_maps_one_to_one() {
        let mut table = ListTable::new();
        table.new_template();
        table.new_template();
        let rtf = table.to_rtf(0);
        assert!(rtf.contains("{\\*\\listtable"));
        assert!(rtf.contains("{\\*\\listoverridetable"));
        assert!(rtf.contains("{\\listoverride\\listid1\\listoverridecount0\\ls1}"));
        assert!(rtf.contains("{\\listoverride\\listid2\\listoverridecount0\\ls2}"));
    }
}
