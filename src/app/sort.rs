use std::cmp::Ordering;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use super::Entry;
use crate::paths::normalize;

static NUMERIC_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^(\s*[+-]?[0-9]+\.?[0-9]*\s*)(.*)$")
        .expect("numeric prefix pattern is valid")
});

/// Sort key for one path segment: numeric prefix first, then the folded
/// remainder, then the remainder as written.
#[derive(Debug, Clone)]
struct SegmentKey {
    number: f64,
    folded: String,
    raw: String,
}

impl SegmentKey {
    fn new(segment: &str) -> Self {
        let (number, rest) = match NUMERIC_PREFIX.captures(segment) {
            Some(caps) => (
                caps[1].trim().parse::<f64>().unwrap_or(0.0),
                caps.get(2).map_or("", |m| m.as_str()),
            ),
            None => (0.0, segment),
        };
        Self {
            number,
            folded: fold_text(rest),
            raw: rest.to_string(),
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        self.number
            .total_cmp(&other.number)
            .then_with(|| self.folded.cmp(&other.folded))
            .then_with(|| self.raw.cmp(&other.raw))
    }
}

/// Case and accent insensitive form used for the primary text comparison.
fn fold_text(text: &str) -> String {
    text.nfd()
        .filter(|ch| !is_combining_mark(*ch))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Numeric-aware key over all segments of a path, compared segment by
/// segment so `2/20 e` sorts before `10/5 e`.
#[derive(Debug, Clone)]
pub(crate) struct PathSortKey(Vec<SegmentKey>);

impl PathSortKey {
    pub(crate) fn new(path: &Path) -> Self {
        let segments = normalize(path)
            .components()
            .map(|component| SegmentKey::new(&component.as_os_str().to_string_lossy()))
            .collect();
        Self(segments)
    }
}

impl Ord for PathSortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        for (left, right) in self.0.iter().zip(&other.0) {
            let ordering = left.compare(right);
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        self.0.len().cmp(&other.0.len())
    }
}

impl PartialOrd for PathSortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for PathSortKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PathSortKey {}

/// Sorts entries by [`PathSortKey`], falling back to byte order for entries
/// whose keys compare equal (`1` and `1.0`).
pub(crate) fn sort_entries(entries: &mut [Entry]) {
    entries.sort_by_cached_key(|entry| (PathSortKey::new(entry.as_path()), entry.clone()));
}

pub(crate) fn sorted_entries<'a, I>(entries: I) -> Vec<Entry>
where
    I: IntoIterator<Item = &'a Entry>,
{
    let mut sorted = entries.into_iter().cloned().collect::<Vec<_>>();
    sort_entries(&mut sorted);
    sorted
}
