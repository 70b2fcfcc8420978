//! Ordering files before a batch is processed.

use crate::matcher::FileEntry;
use crate::rule::{SortKey, SortOrder, SortSpec};
use std::cmp::Ordering;

/// Sorts entries in place. Ties keep their incoming order in both directions.
///
/// Without a spec, entries are sorted alphabetically ascending. Missing
/// timestamps sort before present ones.
pub fn sort_entries(entries: &mut [FileEntry], spec: Option<&SortSpec>) {
    let spec = spec.copied().unwrap_or_default();
    entries.sort_by(|a, b| {
        let ordering = compare(a, b, spec.key);
        match spec.order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    });
}

fn compare(a: &FileEntry, b: &FileEntry, key: SortKey) -> Ordering {
    match key {
        SortKey::Alphabetical => {
            let a_name = a.file_name().unwrap_or_default();
            let b_name = b.file_name().unwrap_or_default();
            a_name
                .to_lowercase()
                .cmp(&b_name.to_lowercase())
                .then_with(|| a_name.cmp(b_name))
        }
        SortKey::FileSize => a.size.cmp(&b.size),
        SortKey::AccessDate => a.accessed.cmp(&b.accessed),
        SortKey::ModifyDate => a.modified.cmp(&b.modified),
        SortKey::CreationDate => a.created.cmp(&b.created),
    }
}
