//! Optimistic Mutation Controller
//!
//! Applies a change to the list immediately and records a `MutationIntent`.
//! Settling the intent either keeps the change (committed) or reverts it
//! (rolled back). Only one intent per `(target, field)` may be pending in a
//! given list generation; further triggers are ignored until it settles.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::error::ApiError;
use crate::pagination::Pager;

/// Items with a stable identifier
pub trait Keyed {
    type Key: Clone + Eq + Hash + Debug;

    fn key(&self) -> Self::Key;
}

pub type KeyOf<T> = <T as Keyed>::Key;

/// A patchable field of `T`
pub trait Field<T>: Copy + Eq + Hash + Debug {
    type Value: Clone + PartialEq + Debug;

    fn read(&self, item: &T) -> Self::Value;
    fn write(&self, item: &mut T, value: Self::Value);
}

#[derive(Debug, Clone, PartialEq)]
pub enum Change<T, F: Field<T>> {
    Set {
        field: F,
        previous: F::Value,
        optimistic: F::Value,
    },
    /// Item was taken out of the list at `index`
    Remove { index: usize, item: T },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationStatus {
    Pending,
    Committed,
    RolledBack,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MutationIntent<T: Keyed, F: Field<T>> {
    pub target_id: KeyOf<T>,
    pub change: Change<T, F>,
    pub status: MutationStatus,
    generation: u64,
}

impl<T: Keyed, F: Field<T>> MutationIntent<T, F> {
    /// List generation the change was applied to
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn slot(&self) -> (KeyOf<T>, Slot<F>) {
        let slot = match &self.change {
            Change::Set { field, .. } => Slot::Field(*field),
            Change::Remove { .. } => Slot::Removal,
        };
        (self.target_id.clone(), slot)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Slot<F> {
    Field(F),
    Removal,
}

#[derive(Debug, Clone)]
pub struct Mutations<T: Keyed, F: Field<T>> {
    /// slot -> generation of the pending intent
    pending: HashMap<(KeyOf<T>, Slot<F>), u64>,
}

impl<T: Keyed, F: Field<T>> Default for Mutations<T, F> {
    fn default() -> Self {
        Self {
            pending: HashMap::new(),
        }
    }
}

impl<T: Keyed, F: Field<T>> Mutations<T, F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self, pager: &Pager<T>, target: &KeyOf<T>, field: F) -> bool {
        self.pending.get(&(target.clone(), Slot::Field(field))) == Some(&pager.generation())
    }

    /// Write `value` into `field` of the item keyed `target`.
    ///
    /// Returns `None` when the item is not in the list or an intent for the
    /// same field is still pending.
    pub fn begin_set(
        &mut self,
        pager: &mut Pager<T>,
        target: KeyOf<T>,
        field: F,
        value: F::Value,
    ) -> Option<MutationIntent<T, F>> {
        let generation = pager.generation();
        let slot = (target.clone(), Slot::Field(field));
        if self.pending.get(&slot) == Some(&generation) {
            log::debug!("[Mutations] {:?}.{:?} already pending, ignored", target, field);
            return None;
        }
        let item = pager.items_mut().iter_mut().find(|item| item.key() == target)?;
        let previous = field.read(item);
        field.write(item, value.clone());
        self.pending.insert(slot, generation);
        Some(MutationIntent {
            target_id: target,
            change: Change::Set {
                field,
                previous,
                optimistic: value,
            },
            status: MutationStatus::Pending,
            generation,
        })
    }

    /// Take the item keyed `target` out of the list.
    pub fn begin_remove(&mut self, pager: &mut Pager<T>, target: KeyOf<T>) -> Option<MutationIntent<T, F>> {
        let generation = pager.generation();
        let slot = (target.clone(), Slot::Removal);
        if self.pending.get(&slot) == Some(&generation) {
            return None;
        }
        let index = pager.items().iter().position(|item| item.key() == target)?;
        let item = pager.items_mut().remove(index);
        self.pending.insert(slot, generation);
        Some(MutationIntent {
            target_id: target,
            change: Change::Remove { index, item },
            status: MutationStatus::Pending,
            generation,
        })
    }
}

impl<T: Keyed + Clone, F: Field<T>> Mutations<T, F> {
    /// Resolve an intent with the server's answer.
    ///
    /// A failure reverts the change unless the list was replaced since the
    /// intent was created, in which case there is nothing left to revert.
    pub fn settle(
        &mut self,
        pager: &mut Pager<T>,
        mut intent: MutationIntent<T, F>,
        result: Result<(), ApiError>,
    ) -> MutationIntent<T, F> {
        let slot = intent.slot();
        if self.pending.get(&slot) == Some(&intent.generation) {
            self.pending.remove(&slot);
        }
        intent.status = match result {
            Ok(()) => MutationStatus::Committed,
            Err(error) => {
                if intent.generation == pager.generation() {
                    log::warn!("[Mutations] rolling back {:?}: {}", intent.target_id, error);
                    rollback(pager, &intent);
                } else {
                    log::debug!("[Mutations] {:?} failed on a replaced list, nothing to revert", intent.target_id);
                }
                MutationStatus::RolledBack
            }
        };
        intent
    }
}

fn rollback<T: Keyed + Clone, F: Field<T>>(pager: &mut Pager<T>, intent: &MutationIntent<T, F>) {
    let items = pager.items_mut();
    match &intent.change {
        Change::Set { field, previous, .. } => {
            if let Some(item) = items.iter_mut().find(|item| item.key() == intent.target_id) {
                field.write(item, previous.clone());
            }
        }
        Change::Remove { index, item } => {
            if !items.iter().any(|existing| existing.key() == intent.target_id) {
                let index = (*index).min(items.len());
                items.insert(index, item.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::Page;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: u32,
        favorite: bool,
        private: bool,
    }

    impl Keyed for Row {
        type Key = u32;

        fn key(&self) -> u32 {
            self.id
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum RowField {
        Favorite,
        Private,
    }

    impl Field<Row> for RowField {
        type Value = bool;

        fn read(&self, item: &Row) -> bool {
            match self {
                RowField::Favorite => item.favorite,
                RowField::Private => item.private,
            }
        }

        fn write(&self, item: &mut Row, value: bool) {
            match self {
                RowField::Favorite => item.favorite = value,
                RowField::Private => item.private = value,
            }
        }
    }

    fn row(id: u32) -> Row {
        Row { id, favorite: false, private: false }
    }

    fn loaded(rows: Vec<Row>) -> Pager<Row> {
        let mut pager = Pager::new(21);
        let ticket = pager.begin_reset("");
        pager.complete(ticket, Ok(Page { items: rows, current_page: 1, last_page: 1 }));
        pager
    }

    fn rejected() -> Result<(), ApiError> {
        Err(ApiError::Validation("already a favourite".to_string()))
    }

    #[test]
    fn test_rollback_restores_only_target() {
        let mut pager = loaded(vec![row(1), row(2)]);
        let mut mutations = Mutations::<Row, RowField>::new();

        let intent = mutations.begin_set(&mut pager, 1, RowField::Favorite, true).unwrap();
        assert!(pager.items()[0].favorite);
        assert_eq!(intent.status, MutationStatus::Pending);

        let intent = mutations.settle(&mut pager, intent, rejected());
        assert_eq!(intent.status, MutationStatus::RolledBack);
        assert_eq!(pager.items(), &[row(1), row(2)]);
    }

    #[test]
    fn test_commit_keeps_optimistic_value() {
        let mut pager = loaded(vec![row(1)]);
        let mut mutations = Mutations::<Row, RowField>::new();

        let intent = mutations.begin_set(&mut pager, 1, RowField::Private, true).unwrap();
        let intent = mutations.settle(&mut pager, intent, Ok(()));

        assert_eq!(intent.status, MutationStatus::Committed);
        assert!(pager.items()[0].private);
        assert!(!mutations.is_pending(&pager, &1, RowField::Private));
    }

    #[test]
    fn test_second_trigger_while_pending_is_ignored() {
        let mut pager = loaded(vec![row(1)]);
        let mut mutations = Mutations::<Row, RowField>::new();

        let first = mutations.begin_set(&mut pager, 1, RowField::Favorite, true).unwrap();
        assert!(mutations.begin_set(&mut pager, 1, RowField::Favorite, false).is_none());
        assert!(pager.items()[0].favorite);

        // a different field on the same item is independent
        assert!(mutations.begin_set(&mut pager, 1, RowField::Private, true).is_some());

        mutations.settle(&mut pager, first, Ok(()));
        assert!(mutations.begin_set(&mut pager, 1, RowField::Favorite, false).is_some());
    }

    #[test]
    fn test_unknown_target_is_ignored() {
        let mut pager = loaded(vec![row(1)]);
        let mut mutations = Mutations::<Row, RowField>::new();
        assert!(mutations.begin_set(&mut pager, 9, RowField::Favorite, true).is_none());
        assert!(mutations.begin_remove(&mut pager, 9).is_none());
    }

    #[test]
    fn test_failed_remove_reinserts_at_index() {
        let mut pager = loaded(vec![row(1), row(2), row(3)]);
        let mut mutations = Mutations::<Row, RowField>::new();

        let intent = mutations.begin_remove(&mut pager, 2).unwrap();
        assert_eq!(pager.items(), &[row(1), row(3)]);

        let intent = mutations.settle(&mut pager, intent, rejected());
        assert_eq!(intent.status, MutationStatus::RolledBack);
        assert_eq!(pager.items(), &[row(1), row(2), row(3)]);
    }

    #[test]
    fn test_reset_drops_rollback() {
        let mut pager = loaded(vec![row(1)]);
        let mut mutations = Mutations::<Row, RowField>::new();
        let intent = mutations.begin_set(&mut pager, 1, RowField::Favorite, true).unwrap();

        let ticket = pager.begin_reset("");
        let mut fresh = row(1);
        fresh.favorite = true;
        pager.complete(ticket, Ok(Page { items: vec![fresh.clone()], current_page: 1, last_page: 1 }));

        // the new list accepts a mutation on the same slot right away
        assert!(!mutations.is_pending(&pager, &1, RowField::Favorite));

        let intent = mutations.settle(&mut pager, intent, rejected());
        assert_eq!(intent.status, MutationStatus::RolledBack);
        assert_eq!(pager.items(), &[fresh]);
    }
}
