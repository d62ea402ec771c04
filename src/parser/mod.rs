pub mod clean;
pub mod html;
pub mod markdown;
pub mod sections;

use serde::{Deserialize, Serialize};

use crate::slug::{self, SlugSet};

/// Section tag assigned by which part of the document a row was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "software")]
    Software,
    #[serde(rename = "data-science")]
    DataScience,
    #[serde(rename = "quant")]
    Quant,
    #[serde(rename = "hardware")]
    Hardware,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Software => "software",
            Category::DataScience => "data-science",
            Category::Quant => "quant",
            Category::Hardware => "hardware",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One listing row parsed from the source document. Lives for the duration
/// of a single pipeline run.
#[derive(Debug, Clone)]
pub struct ListingRecord {
    pub slug: String,
    pub company: String,
    pub role: String,
    pub location: String,
    pub apply_link: String,
    pub date_posted: String,
    pub category: Category,
}

/// A row as extracted by one of the table syntaxes, cells cleaned but not
/// yet validated.
#[derive(Debug, Clone)]
pub(crate) struct RawRow {
    pub company: String,
    pub role: String,
    pub location: String,
    pub apply_link: Option<String>,
    pub date_posted: String,
    pub locked: bool,
}

/// The two physical table syntaxes the source document has used over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableSyntax {
    Html,
    Markdown,
}

impl TableSyntax {
    /// Sniff which syntax a section body uses.
    pub fn detect(section: &str) -> TableSyntax {
        if section.contains("<tr") {
            TableSyntax::Html
        } else {
            TableSyntax::Markdown
        }
    }
}

/// Parse every category section of the document into listing records.
///
/// Malformed rows are skipped, never errors; a document yielding no records
/// is an empty Vec and the caller decides whether that aborts the run.
/// The slug seen-set is threaded through explicitly so disambiguation is
/// scoped to exactly one parse pass.
pub fn parse_document(doc: &str, slugs: &mut SlugSet) -> Vec<ListingRecord> {
    let mut records = Vec::new();

    for span in sections::split(doc) {
        let raw = match TableSyntax::detect(span.body) {
            TableSyntax::Html => html::rows(span.body),
            TableSyntax::Markdown => markdown::rows(span.body),
        };

        for row in raw {
            if row.locked || row.company.is_empty() || row.role.is_empty() {
                continue;
            }
            let Some(apply_link) = row.apply_link else {
                continue;
            };

            let slug = slugs.claim(slug::generate(&row.company, &row.role, &row.location));
            records.push(ListingRecord {
                slug,
                company: row.company,
                role: row.role,
                location: row.location,
                apply_link,
                date_posted: row.date_posted,
                category: span.category,
            });
        }
    }

    records
}
