use std::collections::HashSet;

const MAX_LEN: usize = 100;

/// Derive a URL-safe slug from company, role, and the first comma-delimited
/// fragment of the location. Lowercase, runs of anything outside `[a-z0-9]`
/// collapse to a single hyphen, no leading/trailing hyphen, at most 100
/// characters.
pub fn generate(company: &str, role: &str, location: &str) -> String {
    let head = location.split(',').next().unwrap_or("").trim();
    let raw = format!("{} {} {}", company, role, head).to_lowercase();

    let mut slug = String::with_capacity(raw.len());
    let mut pending_hyphen = false;
    for c in raw.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    // The slug alphabet is pure ASCII, so byte truncation is safe. Truncation
    // can re-expose a trailing hyphen; the contract wins over the cut point.
    slug.truncate(MAX_LEN);
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Slugs already emitted during the current run. Threaded explicitly through
/// the parse so disambiguation never leaks across runs.
#[derive(Debug, Default)]
pub struct SlugSet {
    seen: HashSet<String>,
}

impl SlugSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a slug, suffixing with the seen-count on collision. The suffix
    /// depends on insertion order within the run, so reordering input rows
    /// reshuffles disambiguators.
    pub fn claim(&mut self, slug: String) -> String {
        let slug = if self.seen.contains(&slug) {
            format!("{}-{}", slug, self.len())
        } else {
            slug
        };
        self.seen.insert(slug.clone());
        slug
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
