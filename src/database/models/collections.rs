//! Set semantics for embedded reference arrays (`members`, `likes`).

use crate::types::RecordId;

/// Append `id` unless already present. Returns true when the set changed.
pub fn insert_unique(set: &mut Vec<RecordId>, id: RecordId) -> bool {
    if set.contains(&id) {
        return false;
    }
    set.push(id);
    true
}

/// Drop every occurrence of `id`. Returns true when the set changed.
pub fn remove_all(set: &mut Vec<RecordId>, id: RecordId) -> bool {
    let before = set.len();
    set.retain(|member| *member != id);
    set.len() != before
}

/// Remove `id` if present, otherwise append it. Returns true when `id` is now present.
pub fn toggle(set: &mut Vec<RecordId>, id: RecordId) -> bool {
    if remove_all(set, id) {
        false
    } else {
        set.push(id);
        true
    }
}
