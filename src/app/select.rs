use std::collections::HashSet;
use std::path::Path;

use rand::Rng;
use rand::seq::IndexedRandom;

use super::Entry;
use super::sort::sorted_entries;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SelectionMode {
    Sequential,
    Random,
    RepeatLast,
    Explicit(Entry),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Pick {
    pub(crate) entry: Entry,
    /// Every candidate had been played; the caller truncates the log.
    pub(crate) wrapped: bool,
}

/// Picks the next entry from `candidates` given the `played` history.
pub(crate) fn select_next<R>(
    root: &Path,
    candidates: &HashSet<Entry>,
    played: &[Entry],
    mode: &SelectionMode,
    rng: &mut R,
) -> Result<Pick>
where
    R: Rng + ?Sized,
{
    let played_set = played.iter().collect::<HashSet<_>>();
    let mut remaining = candidates
        .iter()
        .filter(|entry| !played_set.contains(entry))
        .collect::<HashSet<_>>();

    let wrapped = remaining.is_empty();
    if wrapped {
        remaining = candidates.iter().collect();
    }

    log::debug!("files available: {}", candidates.len());
    log::debug!("files in logfile: {}", played.len());
    log::debug!("files remaining for selection: {}", remaining.len());

    if remaining.is_empty() {
        return Err(Error::NoCandidates {
            root: root.to_path_buf(),
        });
    }

    let entry = match mode {
        SelectionMode::Explicit(entry) => entry.clone(),
        SelectionMode::RepeatLast if !played.is_empty() => played[played.len() - 1].clone(),
        SelectionMode::Random => {
            let pool = sorted_entries(remaining.iter().copied());
            pool.choose(rng)
                .cloned()
                .ok_or_else(|| Error::NoCandidates {
                    root: root.to_path_buf(),
                })?
        }
        SelectionMode::Sequential | SelectionMode::RepeatLast => {
            next_in_cycle(root, candidates, played, &remaining)?
        }
    };

    Ok(Pick { entry, wrapped })
}

/// Walks the sorted candidates starting right after the last played entry,
/// wrapping around once, and returns the first one still remaining.
fn next_in_cycle(
    root: &Path,
    candidates: &HashSet<Entry>,
    played: &[Entry],
    remaining: &HashSet<&Entry>,
) -> Result<Entry> {
    let sorted = sorted_entries(candidates);
    for entry in &sorted {
        log::trace!("{entry}");
    }

    let start = match played.last() {
        Some(last) => {
            log::debug!("last selected file: {last}");
            sorted
                .iter()
                .position(|entry| entry == last)
                .map_or(0, |index| index + 1)
        }
        None => 0,
    };

    let len = sorted.len();
    (0..len)
        .map(|offset| &sorted[(start + offset) % len])
        .find(|entry| remaining.contains(entry))
        .cloned()
        .ok_or_else(|| Error::NoCandidates {
            root: root.to_path_buf(),
        })
}
