use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::{IdIndex, Identified, IndexError};
use crate::model::EntityId;

/// Live subset of watched entities for which `extract` yields a value.
///
/// Membership is recomputed only for the entity passed to `refresh`; callers
/// that mutate a watched entity's relevant fields must refresh it.
pub struct FilteredView<T, R> {
    extract: fn(&T) -> Option<R>,
    watched: BTreeSet<EntityId>,
    members: BTreeMap<EntityId, R>,
}

impl<T, R: fmt::Debug> fmt::Debug for FilteredView<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilteredView")
            .field("watched", &self.watched)
            .field("members", &self.members)
            .finish()
    }
}

impl<T: Identified, R> FilteredView<T, R> {
    pub fn new(extract: fn(&T) -> Option<R>) -> Self {
        Self {
            extract,
            watched: BTreeSet::new(),
            members: BTreeMap::new(),
        }
    }

    pub fn watch(&mut self, item: &T) -> Result<(), IndexError> {
        let id = item.id();
        if !self.watched.insert(id) {
            return Err(IndexError::AlreadyWatched(id));
        }
        self.recompute(id, item);
        Ok(())
    }

    pub fn watch_all<'a>(&mut self, items: impl IntoIterator<Item = &'a T>) -> Result<(), IndexError>
    where
        T: 'a,
    {
        for item in items {
            self.watch(item)?;
        }
        Ok(())
    }

    /// Re-evaluates one watched entity. Returns whether it is a member now.
    pub fn refresh(&mut self, item: &T) -> Result<bool, IndexError> {
        let id = item.id();
        if !self.watched.contains(&id) {
            return Err(IndexError::NotWatched(id));
        }
        Ok(self.recompute(id, item))
    }

    /// Drops the subscription for an entity leaving its arena.
    pub fn unwatch(&mut self, id: EntityId) -> Result<(), IndexError> {
        if !self.watched.remove(&id) {
            return Err(IndexError::NotWatched(id));
        }
        self.members.remove(&id);
        Ok(())
    }

    fn recompute(&mut self, id: EntityId, item: &T) -> bool {
        match (self.extract)(item) {
            Some(value) => {
                self.members.insert(id, value);
                true
            }
            None => {
                self.members.remove(&id);
                false
            }
        }
    }

    pub fn is_watching(&self, id: EntityId) -> bool {
        self.watched.contains(&id)
    }

    pub fn watcher_count(&self) -> usize {
        self.watched.len()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.members.contains_key(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<&R> {
        self.members.get(&id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members in id order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &R)> + '_ {
        self.members.iter().map(|(id, value)| (*id, value))
    }

    /// Members paired with their entities from `index`.
    pub fn entries<'a>(&'a self, index: &'a IdIndex<T>) -> Result<Vec<(&'a T, &'a R)>, IndexError> {
        self.members
            .iter()
            .map(|(id, value)| index.get(*id).map(|item| (item, value)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    struct Lamp {
        id: EntityId,
        lit: bool,
        watts: u32,
    }

    impl Identified for Lamp {
        fn id(&self) -> EntityId {
            self.id
        }
    }

    fn lit_watts(lamp: &Lamp) -> Option<u32> {
        lamp.lit.then_some(lamp.watts)
    }

    fn lamp(id: u64, lit: bool) -> Lamp {
        Lamp {
            id: EntityId(id),
            lit,
            watts: id as u32 * 10,
        }
    }

    #[test]
    fn watch_all_seeds_membership() {
        let lamps = [lamp(1, true), lamp(2, false), lamp(3, true)];
        let mut view = FilteredView::new(lit_watts);
        view.watch_all(lamps.iter()).expect("watch");
        assert_eq!(view.watcher_count(), 3);
        assert_eq!(
            view.iter().map(|(id, watts)| (id.0, *watts)).collect::<Vec<_>>(),
            vec![(1, 10), (3, 30)]
        );
    }

    #[test]
    fn refresh_only_touches_the_given_entity() {
        let mut lamps = vec![lamp(1, true), lamp(2, false)];
        let mut view = FilteredView::new(lit_watts);
        view.watch_all(lamps.iter()).expect("watch");

        lamps[1].lit = true;
        lamps[0].lit = false;
        assert!(view.refresh(&lamps[1]).expect("refresh"));
        assert!(view.contains(EntityId(1)), "unrefreshed entity keeps stale membership");
        assert!(view.contains(EntityId(2)));

        assert!(!view.refresh(&lamps[0]).expect("refresh"));
        assert!(!view.contains(EntityId(1)));
    }

    #[test]
    fn double_watch_is_rejected() {
        let first = lamp(4, true);
        let mut view = FilteredView::new(lit_watts);
        view.watch(&first).expect("watch");
        assert_eq!(
            view.watch(&first).expect_err("second watch"),
            IndexError::AlreadyWatched(EntityId(4))
        );
    }

    #[test]
    fn unwatch_releases_subscription_and_membership() {
        let item = lamp(5, true);
        let mut view = FilteredView::new(lit_watts);
        view.watch(&item).expect("watch");
        view.unwatch(EntityId(5)).expect("unwatch");
        assert_eq!(view.watcher_count(), 0);
        assert!(view.is_empty());
        assert_eq!(
            view.refresh(&item).expect_err("not watched"),
            IndexError::NotWatched(EntityId(5))
        );
    }

    #[test]
    fn entries_resolve_through_the_index() {
        let index = IdIndex::from_items([lamp(1, true), lamp(2, true)]);
        let mut view = FilteredView::new(lit_watts);
        view.watch_all(index.iter()).expect("watch");
        let entries = view.entries(&index).expect("entries");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].0.id, EntityId(2));
        assert_eq!(*entries[1].1, 20);
    }
}
