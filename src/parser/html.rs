use std::sync::LazyLock;

use regex::Regex;

use super::clean;
use super::RawRow;

static TR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<tr[^>]*>(.*?)</tr>").unwrap());
static TD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<td[^>]*>(.*?)</td>").unwrap());
static APPLY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?is)href="([^"]*)"[^>]*>\s*<img[^>]*alt="Apply""#).unwrap());

/// Extract raw rows from an HTML-table section.
///
/// Header rows (a `<th>` cell or the literal column-name text) and
/// continuation rows (company cell starting with the continuation glyph)
/// are rejected here; field validation happens in the caller.
pub(super) fn rows(section: &str) -> Vec<RawRow> {
    let mut out = Vec::new();

    for tr in TR_RE.captures_iter(section) {
        let row = tr.get(1).map(|m| m.as_str()).unwrap_or_default();
        if row.contains("<th>") || row.contains("Company") {
            continue;
        }

        let cells: Vec<&str> = TD_RE
            .captures_iter(row)
            .map(|c| c.get(1).map(|m| m.as_str()).unwrap_or_default())
            .collect();
        if cells.len() < 4 {
            continue;
        }

        let company = clean::clean_cell(cells[0]);
        if company.starts_with('\u{21B3}') {
            continue;
        }

        out.push(RawRow {
            company,
            role: clean::clean_cell(cells[1]),
            location: clean::join_fragments(cells[2]),
            apply_link: apply_link(cells[3]),
            date_posted: cells.get(4).map(|c| clean::clean_cell(c)).unwrap_or_default(),
            locked: clean::is_locked(cells[1]) || clean::is_locked(cells[3]),
        });
    }

    out
}

/// The href of an anchor wrapping an `<img alt="Apply">` badge.
fn apply_link(links_cell: &str) -> Option<String> {
    APPLY_RE
        .captures(links_cell)
        .map(|c| c[1].to_string())
        .filter(|url| !url.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROW: &str = r#"<tr><td><strong><a href="https://acme.example">Acme Corp</a></strong></td><td>Software Engineer Intern</td><td>New York, NY</td><td><a href="https://acme.example/apply"><img src="apply.png" alt="Apply"></a></td><td>5d</td></tr>"#;

    #[test]
    fn parses_valid_row() {
        let rows = rows(ROW);
        assert_eq!(rows.len(), 1);
        let r = &rows[0];
        assert_eq!(r.company, "Acme Corp");
        assert_eq!(r.role, "Software Engineer Intern");
        assert_eq!(r.location, "New York, NY");
        assert_eq!(r.apply_link.as_deref(), Some("https://acme.example/apply"));
        assert_eq!(r.date_posted, "5d");
        assert!(!r.locked);
    }

    #[test]
    fn skips_header_row() {
        let md = "<tr><th>Company</th><th>Role</th><th>Location</th><th>Application</th></tr>";
        assert!(rows(md).is_empty());
    }

    #[test]
    fn skips_continuation_row() {
        let md = format!(
            r#"<tr><td>{arrow}</td><td>Mobile Intern</td><td>NYC</td><td><a href="https://a.example/apply"><img alt="Apply"></a></td><td>3d</td></tr>"#,
            arrow = '\u{21B3}'
        );
        assert!(rows(&md).is_empty());
    }

    #[test]
    fn skips_short_row() {
        let md = "<tr><td>Acme</td><td>Intern</td><td>NYC</td></tr>";
        assert!(rows(md).is_empty());
    }

    #[test]
    fn apply_link_requires_apply_badge() {
        let cell =
            r#"<a href="https://simplify.example/p/1"><img src="s.png" alt="Simplify"></a>"#;
        assert_eq!(apply_link(cell), None);

        let cell = r#"<a href="https://acme.example/apply"><img alt="Apply" src="a.png"></a>"#;
        assert_eq!(apply_link(cell).as_deref(), Some("https://acme.example/apply"));
    }

    #[test]
    fn apply_badge_is_case_insensitive() {
        let cell = r#"<a href="https://acme.example/jobs"><img alt="APPLY"></a>"#;
        assert_eq!(apply_link(cell).as_deref(), Some("https://acme.example/jobs"));
    }

    #[test]
    fn locked_links_cell_flagged() {
        let md = format!(
            r#"<tr><td>Initech</td><td>Platform Intern</td><td>Dallas, TX</td><td>{lock} <a href="https://initech.example/apply"><img alt="Apply"></a></td><td>8d</td></tr>"#,
            lock = '\u{1F512}'
        );
        let rows = rows(&md);
        assert_eq!(rows.len(), 1);
        assert!(rows[0].locked);
    }

    #[test]
    fn multiline_rows_supported() {
        let md = "<tr>\n<td>Vandelay</td>\n<td>ML Intern</td>\n<td>Remote</td>\n<td><a href=\"https://vandelay.example/apply\"><img alt=\"Apply\"></a></td>\n<td>9d</td>\n</tr>";
        let rows = rows(md);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].company, "Vandelay");
    }
}
