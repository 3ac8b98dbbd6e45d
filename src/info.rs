//! Document information and metadata.
//!
//! Renders the `{\info ...}` group that follows the resource tables in the
//! document envelope.

use crate::render::{escape_text, push_int};
use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Document metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Information {
    /// Document title
    pub title: Option<String>,
    /// Document author
    pub author: Option<String>,
    /// Company name
    pub company: Option<String>,
    /// Comments
    pub comments: Option<String>,
    /// Creation time
    pub created: Option<NaiveDateTime>,
}

impl Information {
    /// Create empty document information.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title.
    #[inline]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the author.
    #[inline]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Set the company.
    #[inline]
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    /// Set the comments.
    #[inline]
    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = Some(comments.into());
        self
    }

    /// Set the creation time.
    #[inline]
    pub fn with_created(mut self, created: NaiveDateTime) -> Self {
        self.created = Some(created);
        self
    }

    /// Render the information group.
    pub(crate) fn to_rtf(&self, indent: usize) -> String {
        let prefix = " ".repeat(indent);
        let mut text = String::new();

        text.push_str(&prefix);
        text.push_str("{\\info");
        if let Some(title) = &self.title {
            text.push('\n');
            text.push_str(&prefix);
            text.push_str("{\\title ");
            escape_text(&mut text, title);
            text.push('}');
        }
        if let Some(author) = &self.author {
            text.push('\n');
            text.push_str(&prefix);
            text.push_str("{\\author ");
            escape_text(&mut text, author);
            text.push('}');
        }
        if let Some(company) = &self.company {
            text.push('\n');
            text.push_str(&prefix);
            text.push_str("{\\company ");
            escape_text(&mut text, company);
            text.push('}');
        }
        if let Some(comments) = &self.comments {
            text.push('\n');
            text.push_str(&prefix);
            text.push_str("{\\doccomm ");
            escape_text(&mut text, comments);
            text.push('}');
        }
        if let Some(created) = self.created {
            text.push('\n');
            text.push_str(&prefix);
            text.push_str("{\\creatim\\yr");
            push_int(&mut text, created.year() as i64);
            text.push_str("\\mo");
            push_int(&mut text, created.month() as i64);
            text.push_str("\\dy");
            push_int(&mut text, created.day() as i64);
            text.push_str("\\hr");
            push_int(&mut text, created.hour() as i64);
            text.push_str("\\min");
            push_int(&mut text, created.minute() as i64);
            text.push('}');
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
    use chrono::{NaiveDate, NaiveTime};

    #[test]
    fn test_empty_information() {
        let info = Information::new();
        assert_eq!(info.to_rtf(0), "{\\info\n}");
    }

    #[test]
    fn test_information_fields() {
        let created = NaiveDateTime::new(
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
        );
        let info = Information::new()
            .with_title("Report")
            .with_author("J. Doe")
            .with_created(created);
        let rtf = info.to_rtf(0);
        assert!(rtf.contains("{\\title Report}"));
        assert!(rtf.contains("{\\author J. Doe}"));
        assert!(rtf.contains("{\\creatim\\yr2024\\mo3\\dy5\\hr9\\min30}"));
    }

    #[test]
    fn test_information_escapes_braces() {
        let info = Information::new().with_title("a {b}");
        assert!(info.to_rtf(0).contains("{\\title a \\{b\\}}"));
    }
}
