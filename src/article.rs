use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::parser::{Category, ListingRecord};

/// The materialized, servable unit derived 1:1 from a listing. Field names
/// follow the JSON schema the serving layer reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleDocument {
    pub slug: String,
    pub title: String,
    #[serde(rename = "metaDescription")]
    pub meta_description: String,
    pub keywords: Vec<String>,
    pub content: String,
    #[serde(rename = "structuredData")]
    pub structured_data: StructuredData,
    #[serde(rename = "openGraph")]
    pub open_graph: OpenGraph,
    #[serde(rename = "lastUpdated")]
    pub last_updated: DateTime<Utc>,
    #[serde(rename = "sourceListing")]
    pub source_listing: SourceListing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredData {
    #[serde(rename = "@context")]
    pub context: String,
    #[serde(rename = "@type")]
    pub kind: String,
    pub headline: String,
    pub description: String,
    pub author: Organization,
    pub publisher: Organization,
    #[serde(rename = "datePublished")]
    pub date_published: DateTime<Utc>,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    #[serde(rename = "@type")]
    pub kind: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenGraph {
    pub title: String,
    pub description: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub site_name: String,
}

/// Raw listing fields carried alongside the rendered article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceListing {
    pub company: String,
    pub role: String,
    pub locations: Vec<String>,
    #[serde(rename = "applicationUrl")]
    pub application_url: String,
    pub category: Category,
    #[serde(rename = "capturedAt")]
    pub captured_at: i64,
}

/// Deterministic string composition: same record and `now` produce a
/// byte-identical document; a different `now` moves only the
/// timestamp-derived fields.
pub fn materialize(
    record: &ListingRecord,
    now: DateTime<Utc>,
    base_url: &str,
    site_name: &str,
) -> ArticleDocument {
    let title = format!("{} {} Interview Questions", record.company, record.role);
    let description = format!(
        "Ace your {} {} interview with AI-powered practice questions and feedback. \
         Get ready for your {} internship.",
        record.company, record.role, record.location
    );
    let canonical_url = format!("{}/opportunities/{}", base_url, record.slug);

    let keywords = vec![
        format!("{} interview", record.company),
        format!("{} {} interview questions", record.company, record.role),
        format!("{} internship", record.company),
        "interview practice".to_string(),
        "AI interview prep".to_string(),
        record.role.clone(),
        format!("{} interview questions", record.category),
    ];

    let content = format!(
        "**Company:** {}\n**Role:** {}\n**Location:** {}\n**Status:** Open\n**Posted:** {}\n\n[Apply here]({})",
        record.company, record.role, record.location, record.date_posted, record.apply_link
    );

    let organization = Organization {
        kind: "Organization".to_string(),
        name: site_name.to_string(),
    };

    ArticleDocument {
        slug: record.slug.clone(),
        title: title.clone(),
        meta_description: description.clone(),
        keywords,
        content,
        structured_data: StructuredData {
            context: "https://schema.org/".to_string(),
            kind: "Article".to_string(),
            headline: title.clone(),
            description: description.clone(),
            author: organization.clone(),
            publisher: organization,
            date_published: now,
            url: canonical_url.clone(),
        },
        open_graph: OpenGraph {
            title,
            description,
            url: canonical_url,
            kind: "article".to_string(),
            site_name: site_name.to_string(),
        },
        last_updated: now,
        source_listing: SourceListing {
            company: record.company.clone(),
            role: record.role.clone(),
            locations: record
                .location
                .split(',')
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty())
                .collect(),
            application_url: record.apply_link.clone(),
            category: record.category,
            captured_at: now.timestamp(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record() -> ListingRecord {
        ListingRecord {
            slug: "acme-corp-software-engineer-intern-new-york".to_string(),
            company: "Acme Corp".to_string(),
            role: "Software Engineer Intern".to_string(),
            location: "New York, NY".to_string(),
            apply_link: "https://acme.example/apply".to_string(),
            date_posted: "5d".to_string(),
            category: Category::Software,
        }
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn composed_fields() {
        let doc = materialize(&record(), at(1_700_000_000), "https://www.internprep.dev", "InternPrep");
        assert_eq!(doc.title, "Acme Corp Software Engineer Intern Interview Questions");
        assert_eq!(
            doc.structured_data.url,
            "https://www.internprep.dev/opportunities/acme-corp-software-engineer-intern-new-york"
        );
        assert_eq!(doc.open_graph.url, doc.structured_data.url);
        assert_eq!(doc.keywords.len(), 7);
        assert_eq!(doc.keywords[6], "software interview questions");
        assert!(doc.content.contains("**Status:** Open"));
        assert!(doc.content.contains("[Apply here](https://acme.example/apply)"));
        assert_eq!(doc.source_listing.locations, vec!["New York", "NY"]);
    }

    #[test]
    fn same_instant_is_byte_identical() {
        let a = materialize(&record(), at(1_700_000_000), "https://www.internprep.dev", "InternPrep");
        let b = materialize(&record(), at(1_700_000_000), "https://www.internprep.dev", "InternPrep");
        assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
    }

    #[test]
    fn different_instant_moves_only_timestamps() {
        let a = materialize(&record(), at(1_700_000_000), "https://www.internprep.dev", "InternPrep");
        let b = materialize(&record(), at(1_700_086_400), "https://www.internprep.dev", "InternPrep");

        assert_ne!(a.last_updated, b.last_updated);
        assert_ne!(a.structured_data.date_published, b.structured_data.date_published);
        assert_ne!(a.source_listing.captured_at, b.source_listing.captured_at);

        assert_eq!(a.title, b.title);
        assert_eq!(a.meta_description, b.meta_description);
        assert_eq!(a.keywords, b.keywords);
        assert_eq!(a.content, b.content);
        assert_eq!(a.open_graph, b.open_graph);
        assert_eq!(a.structured_data.headline, b.structured_data.headline);
        assert_eq!(a.structured_data.url, b.structured_data.url);
        assert_eq!(a.source_listing.application_url, b.source_listing.application_url);
    }

    #[test]
    fn json_round_trip() {
        let doc = materialize(&record(), at(1_700_000_000), "https://www.internprep.dev", "InternPrep");
        let json = serde_json::to_string_pretty(&doc).unwrap();
        assert!(json.contains("\"metaDescription\""));
        assert!(json.contains("\"@type\": \"Article\""));
        assert!(json.contains("\"category\": \"software\""));
        let back: ArticleDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }
}
