//! Local patches applied after a successful mutation.

use super::Entity;
use crate::models::EntityId;

pub fn append<E: Entity>(items: &mut Vec<E>, row: E) {
    items.push(row);
}

/// Replace the row with the same id. Returns false if none matched.
pub fn replace_by_id<E: Entity>(items: &mut [E], row: E) -> bool {
    match items.iter_mut().find(|item| item.id() == row.id()) {
        Some(slot) => {
            *slot = row;
            true
        }
        None => false,
    }
}

/// Drop every row with `id`. Returns false if none matched.
pub fn remove_by_id<E: Entity>(items: &mut Vec<E>, id: EntityId) -> bool {
    let before = items.len();
    items.retain(|item| item.id() != id);
    items.len() != before
}
