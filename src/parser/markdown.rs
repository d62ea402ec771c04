use std::sync::LazyLock;

use regex::Regex;

use super::clean;
use super::RawRow;

static BOLD_LINK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*\[([^\]]+)\]").unwrap());
static MD_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\([^)]*\)").unwrap());
static APPLY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[Apply\]\(([^)]*)\)").unwrap());

/// Extract raw rows from a pipe-delimited Markdown table section.
///
/// Rows before the header line are ignored; the header itself (the
/// `| Company` line or a `|---` separator) flips the in-table flag and is
/// consumed. Continuation rows are rejected here.
pub(super) fn rows(section: &str) -> Vec<RawRow> {
    let mut out = Vec::new();
    let mut in_table = false;

    for line in section.lines() {
        if line.contains("|---") || (line.contains("| Company") && line.contains('|')) {
            in_table = true;
            continue;
        }
        if !in_table || !line.trim_start().starts_with('|') {
            continue;
        }

        let cells: Vec<&str> = line
            .split('|')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .collect();
        if cells.len() < 4 {
            continue;
        }

        if cells[0].starts_with('\u{21B3}') {
            continue;
        }

        out.push(RawRow {
            company: clean::clean_cell(&company_text(cells[0])),
            role: clean::clean_cell(&cells[1].replace("**", "")),
            location: clean::clean_cell(cells[2]),
            apply_link: apply_link(cells[3]),
            date_posted: cells.get(4).map(|c| clean::clean_cell(c)).unwrap_or_default(),
            locked: clean::is_locked(cells[1]) || clean::is_locked(cells[3]),
        });
    }

    out
}

/// Unwrap the company cell's markdown: `**[Name](url)**` keeps the bold-link
/// text, otherwise bold markers are dropped and inline links reduced to
/// their visible text.
fn company_text(cell: &str) -> String {
    if let Some(caps) = BOLD_LINK_RE.captures(cell) {
        return caps[1].to_string();
    }
    MD_LINK_RE.replace_all(&cell.replace("**", ""), "$1").into_owned()
}

/// The target of a `[Apply](url)` link, case-insensitive on the label.
fn apply_link(links_cell: &str) -> Option<String> {
    APPLY_RE
        .captures(links_cell)
        .map(|c| c[1].to_string())
        .filter(|url| !url.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "\
| Company | Role | Location | Application/Link | Date Posted |\n\
| **[Acme Corp](https://acme.example)** | Software Engineer Intern | New York, NY | **[Apply](https://acme.example/apply)** | Jun 10 |\n\
| **Globex** | Backend Intern | Austin, TX | [Apply](https://globex.example/careers) | Jun 08 |\n";

    #[test]
    fn parses_rows_after_header() {
        let rows = rows(TABLE);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].company, "Acme Corp");
        assert_eq!(rows[0].apply_link.as_deref(), Some("https://acme.example/apply"));
        assert_eq!(rows[1].company, "Globex");
        assert_eq!(rows[1].date_posted, "Jun 08");
    }

    #[test]
    fn nothing_before_header() {
        let md = "| **Acme** | Intern | NYC | [Apply](https://a.example) | Jun 01 |\n";
        assert!(rows(md).is_empty());
    }

    #[test]
    fn separator_line_starts_table() {
        let md = "|---|---|---|---|---|\n| **Acme** | Intern | NYC | [Apply](https://a.example) | Jun 01 |\n";
        assert_eq!(rows(md).len(), 1);
    }

    #[test]
    fn skips_continuation_row() {
        let md = format!(
            "| Company | Role | Location | Link | Date |\n| {arrow} | Mobile Intern | NYC | [Apply](https://a.example) | Jun 02 |\n",
            arrow = '\u{21B3}'
        );
        assert!(rows(&md).is_empty());
    }

    #[test]
    fn lock_on_role_or_links_flagged() {
        let md = format!(
            "| Company | Role | Location | Link | Date |\n\
             | **Initech** | Systems Intern {lock} | Dallas, TX | [Apply](https://i.example) | Jun 03 |\n\
             | **Umbrella** | QA Intern | Raleigh, NC | {lock} | Jun 04 |\n",
            lock = '\u{1F512}'
        );
        let rows = rows(&md);
        assert_eq!(rows.len(), 2);
        assert!(rows[0].locked);
        assert!(rows[1].locked);
        assert_eq!(rows[1].apply_link, None);
    }

    #[test]
    fn plain_link_company_unwrapped() {
        let md = "| Company | Role | Location | Link | Date |\n| [Hooli](https://hooli.example) | Data Intern | Palo Alto, CA | [apply](https://hooli.example/jobs) | Jun 05 |\n";
        let rows = rows(md);
        assert_eq!(rows[0].company, "Hooli");
        // Apply label match is case-insensitive
        assert_eq!(rows[0].apply_link.as_deref(), Some("https://hooli.example/jobs"));
    }
}
