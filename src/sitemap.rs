use anyhow::Result;
use chrono::NaiveDate;

/// Append `<url>` entries for new slugs to a sitemap document.
///
/// This is a textual splice, not a parse-rewrite: every byte before the
/// insertion point is left untouched so re-runs never produce incidental
/// diffs in existing entries. With no prior document, a fresh one is
/// synthesized with a root entry and an index-page entry first.
pub fn append_entries(
    existing: Option<&str>,
    slugs: &[String],
    base_url: &str,
    date: NaiveDate,
) -> String {
    match existing {
        Some(xml) => {
            if slugs.is_empty() {
                return xml.to_string();
            }
            let entries = slug_entries(slugs, base_url, date);
            xml.replacen("</urlset>", &format!("{}\n</urlset>", entries), 1)
        }
        None => {
            let mut doc = format!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
                 <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n\
                 {root}\n{index}\n",
                root = url_entry(base_url, date, "daily", "1.0"),
                index = url_entry(&format!("{}/opportunities", base_url), date, "daily", "0.9"),
            );
            if !slugs.is_empty() {
                doc.push_str(&slug_entries(slugs, base_url, date));
                doc.push('\n');
            }
            doc.push_str("</urlset>");
            doc
        }
    }
}

fn slug_entries(slugs: &[String], base_url: &str, date: NaiveDate) -> String {
    slugs
        .iter()
        .map(|slug| {
            url_entry(&format!("{}/opportunities/{}", base_url, slug), date, "weekly", "0.7")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn url_entry(loc: &str, date: NaiveDate, changefreq: &str, priority: &str) -> String {
    format!(
        "  <url>\n    <loc>{loc}</loc>\n    <lastmod>{date}</lastmod>\n    <changefreq>{changefreq}</changefreq>\n    <priority>{priority}</priority>\n  </url>"
    )
}

/// Read back all `<loc>` values from a urlset document.
pub fn parse_urlset(xml: &str) -> Result<Vec<String>> {
    let mut reader = quick_xml::Reader::from_str(xml);
    let mut urls = Vec::new();
    let mut in_url = false;
    let mut in_loc = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(quick_xml::events::Event::Start(e)) => match e.name().as_ref() {
                b"url" => in_url = true,
                b"loc" if in_url => in_loc = true,
                _ => {}
            },
            Ok(quick_xml::events::Event::Text(e)) if in_loc => {
                urls.push(e.unescape()?.to_string());
            }
            Ok(quick_xml::events::Event::End(e)) => match e.name().as_ref() {
                b"loc" => in_loc = false,
                b"url" => in_url = false,
                _ => {}
            },
            Ok(quick_xml::events::Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
        buf.clear();
    }
    Ok(urls)
}
