use std::collections::HashMap;

use super::IndexError;
use crate::model::EntityId;

pub trait Identified {
    fn id(&self) -> EntityId;
}

/// Arena of entities keyed by stable id. Iteration follows insertion order.
#[derive(Debug, Clone)]
pub struct IdIndex<T> {
    items: Vec<T>,
    slots: HashMap<EntityId, usize>,
}

impl<T> Default for IdIndex<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            slots: HashMap::new(),
        }
    }
}

impl<T: Identified> IdIndex<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bulk-loads an existing collection. Later duplicates of an id are
    /// dropped, matching `insert`.
    pub fn from_items(items: impl IntoIterator<Item = T>) -> Self {
        let mut index = Self::new();
        for item in items {
            index.insert(item);
        }
        index
    }

    /// Returns `false` and leaves the index untouched when the id is
    /// already present.
    pub fn insert(&mut self, item: T) -> bool {
        let id = item.id();
        if self.slots.contains_key(&id) {
            return false;
        }
        self.slots.insert(id, self.items.len());
        self.items.push(item);
        true
    }

    pub fn remove(&mut self, id: EntityId) -> Result<T, IndexError> {
        let slot = self.slots.remove(&id).ok_or(IndexError::NotFound(id))?;
        let item = self.items.remove(slot);
        for later in &self.items[slot..] {
            if let Some(entry) = self.slots.get_mut(&later.id()) {
                *entry -= 1;
            }
        }
        Ok(item)
    }

    pub fn get(&self, id: EntityId) -> Result<&T, IndexError> {
        self.slots
            .get(&id)
            .map(|slot| &self.items[*slot])
            .ok_or(IndexError::NotFound(id))
    }

    pub fn get_mut(&mut self, id: EntityId) -> Result<&mut T, IndexError> {
        match self.slots.get(&id) {
            Some(slot) => Ok(&mut self.items[*slot]),
            None => Err(IndexError::NotFound(id)),
        }
    }

    pub fn has(&self, id: EntityId) -> bool {
        self.slots.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.items.iter().map(Identified::id)
    }
}
