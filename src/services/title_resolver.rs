use crate::models::{Catalog, TitleCandidate, TitleMatch};

/// Default minimum ratio for a title to be considered a match
pub const DEFAULT_MATCH_THRESHOLD: u8 = 60;

/// Case-insensitive similarity of two strings on a 0-100 scale
///
/// Indel-based ratio: `100 * (|a| + |b| - d) / (|a| + |b|)` where `d` is the
/// edit distance allowing only insertions and deletions, rounded to the
/// nearest integer. Lengths are counted in chars.
pub fn fuzzy_ratio(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 100;
    }

    let common = longest_common_subsequence(&a, &b);
    let ratio = 200.0 * common as f64 / total as f64;
    ratio.round() as u8
}

fn longest_common_subsequence(a: &[char], b: &[char]) -> usize {
    let (outer, inner) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    let mut previous = vec![0usize; inner.len() + 1];
    let mut current = vec![0usize; inner.len() + 1];

    for oc in outer {
        for (j, ic) in inner.iter().enumerate() {
            current[j + 1] = if oc == ic {
                previous[j] + 1
            } else {
                previous[j + 1].max(current[j])
            };
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[inner.len()]
}

/// Resolves free-text movie titles against the catalog
pub struct TitleResolver<'a> {
    catalog: &'a Catalog,
    threshold: u8,
}

impl<'a> TitleResolver<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self::with_threshold(catalog, DEFAULT_MATCH_THRESHOLD)
    }

    pub fn with_threshold(catalog: &'a Catalog, threshold: u8) -> Self {
        Self { catalog, threshold }
    }

    /// Every title scoring at or above the threshold, best first
    ///
    /// Ties on ratio are ordered by title, then by item id.
    pub fn candidates(&self, query: &str) -> Vec<TitleCandidate> {
        let mut matches: Vec<TitleCandidate> = self
            .catalog
            .titles()
            .filter_map(|(title, item_id)| {
                let ratio = fuzzy_ratio(title, query);
                (ratio >= self.threshold).then(|| TitleCandidate {
                    item_id,
                    title: title.to_string(),
                    ratio,
                })
            })
            .collect();

        matches.sort_by(|a, b| {
            b.ratio
                .cmp(&a.ratio)
                .then_with(|| a.title.cmp(&b.title))
                .then_with(|| a.item_id.cmp(&b.item_id))
        });
        matches
    }

    /// Best matching title, or `None` when nothing clears the threshold
    pub fn resolve(&self, query: &str) -> Option<TitleMatch> {
        let candidates = self.candidates(query);
        let Some(best) = candidates.first().cloned() else {
            tracing::debug!(query, "No title match found");
            return None;
        };

        tracing::debug!(
            query,
            item_id = best.item_id,
            ratio = best.ratio,
            candidates = candidates.len(),
            "Resolved title"
        );

        Some(TitleMatch {
            item_id: best.item_id,
            title: best.title,
            ratio: best.ratio,
            candidates,
        })
    }
}
