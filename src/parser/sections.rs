use std::sync::LazyLock;

use regex::Regex;

use super::Category;

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^##\s+(.+)$").unwrap());

/// Section-boundary markers: the heading text that opens each category's
/// table in the source document. Matched by substring so the decorative
/// glyphs the source puts in headings never matter.
const SECTION_MARKERS: &[(&str, Category)] = &[
    ("Software Engineering Internship Roles", Category::Software),
    ("Data Science, AI & Machine Learning Internship Roles", Category::DataScience),
    ("Quantitative Finance Internship Roles", Category::Quant),
    ("Hardware Engineering Internship Roles", Category::Hardware),
];

/// Start of the archived sub-section within a category. Rows past this
/// marker are never parsed.
const ARCHIVE_MARKER: &str = "Inactive roles";

#[derive(Debug, Clone, Copy)]
pub struct SectionSpan<'a> {
    pub category: Category,
    pub body: &'a str,
}

/// Split the document into category-tagged section bodies. A section runs
/// from its marker heading to the next `##` heading or end of document.
/// If no marker matches anywhere, the whole document becomes one implicit
/// section of the default category.
pub fn split(doc: &str) -> Vec<SectionSpan<'_>> {
    let headings: Vec<(usize, usize, &str)> = HEADING_RE
        .captures_iter(doc)
        .map(|c| {
            let whole = c.get(0).unwrap();
            (whole.start(), whole.end(), c.get(1).unwrap().as_str())
        })
        .collect();

    let mut spans = Vec::new();
    for (i, (_, end, text)) in headings.iter().enumerate() {
        let Some(category) = category_for(text) else {
            continue;
        };
        let body_end = headings.get(i + 1).map(|h| h.0).unwrap_or(doc.len());
        spans.push(SectionSpan {
            category,
            body: truncate_archived(&doc[*end..body_end]),
        });
    }

    if spans.is_empty() {
        spans.push(SectionSpan {
            category: Category::Software,
            body: truncate_archived(doc),
        });
    }

    spans
}

fn category_for(heading: &str) -> Option<Category> {
    SECTION_MARKERS
        .iter()
        .find(|(marker, _)| heading.contains(marker))
        .map(|(_, category)| *category)
}

fn truncate_archived(body: &str) -> &str {
    match body.find(ARCHIVE_MARKER) {
        Some(idx) => &body[..idx],
        None => body,
    }
}
