//! Deduplicator: the same match shows up in more than one provider list
//! category, and occasionally under two different provider ids entirely.
//! Batches are collapsed before merging so a single sync cycle never
//! upserts the same match twice.

use std::collections::HashSet;

use tracing::debug;

use crate::provider::shapes::ProviderMatch;

/// Collapse duplicate entries in a single response batch. First occurrence
/// wins in both passes:
///
/// 1. Primary key - provider-assigned match id.
/// 2. Secondary heuristic over the survivors - identical title plus
///    identical (order-sensitive) team-name pair marks two differently-id'd
///    entries as the same match. Entries without two well-formed team names
///    fall back to title-only matching.
pub fn dedupe(batch: Vec<ProviderMatch>) -> Vec<ProviderMatch> {
    let input_len = batch.len();

    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut by_id: Vec<ProviderMatch> = Vec::with_capacity(batch.len());
    for entry in batch {
        if seen_ids.insert(entry.match_id.clone()) {
            by_id.push(entry);
        }
    }

    let mut seen_identities: HashSet<String> = HashSet::new();
    let mut out: Vec<ProviderMatch> = Vec::with_capacity(by_id.len());
    for entry in by_id {
        match identity_key(&entry) {
            Some(key) => {
                if seen_identities.insert(key) {
                    out.push(entry);
                }
            }
            // No usable identity: keep the entry rather than risk
            // collapsing distinct matches.
            None => out.push(entry),
        }
    }

    if out.len() < input_len {
        debug!("dedupe dropped {} of {} entries", input_len - out.len(), input_len);
    }

    out
}

/// Identity for the secondary pass. Well-formed entries key on
/// title + both team names; entries with missing team data key on title
/// alone; entries without even a title have no identity.
fn identity_key(entry: &ProviderMatch) -> Option<String> {
    let title = entry.title.trim().to_lowercase();
    if title.is_empty() {
        return None;
    }

    match (&entry.team1, &entry.team2) {
        (Some((_, name1, _)), Some((_, name2, _)))
            if !name1.trim().is_empty() && !name2.trim().is_empty() =>
        {
            Some(format!(
                "{}|{}|{}",
                title,
                name1.trim().to_lowercase(),
                name2.trim().to_lowercase()
            ))
        }
        _ => Some(title),
    }
}
