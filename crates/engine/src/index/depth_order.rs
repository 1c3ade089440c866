use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::ops::Range;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::IndexError;
use crate::model::EntityId;

#[derive(Debug, Clone, Copy)]
struct DepthKey {
    depth: f32,
    seq: u64,
}

impl PartialEq for DepthKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for DepthKey {}

impl PartialOrd for DepthKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DepthKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.depth
            .total_cmp(&other.depth)
            .then(self.seq.cmp(&other.seq))
    }
}

/// Total order of entity ids by depth. Smaller depth is nearer the camera.
///
/// Ids inserted without an explicit depth get a uniform random one from
/// `range`, so the default order is stable but not insertion order. Equal
/// depths fall back to insertion order.
#[derive(Debug, Clone)]
pub struct DepthOrder {
    order: BTreeSet<(DepthKey, EntityId)>,
    keys: HashMap<EntityId, DepthKey>,
    next_seq: u64,
    range: Range<f32>,
    rng: StdRng,
}

impl DepthOrder {
    pub fn new(range: Range<f32>, seed: u64) -> Self {
        Self::with_rng(range, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(range: Range<f32>, rng: StdRng) -> Self {
        Self {
            order: BTreeSet::new(),
            keys: HashMap::new(),
            next_seq: 0,
            range,
            rng,
        }
    }

    fn fresh_depth(&mut self) -> f32 {
        if self.range.is_empty() {
            return self.range.start;
        }
        self.rng.gen_range(self.range.clone())
    }

    /// Returns `false` without changing anything when the id is present.
    pub fn insert(&mut self, id: EntityId, depth: Option<f32>) -> bool {
        if self.keys.contains_key(&id) {
            return false;
        }
        let depth = match depth {
            Some(depth) => depth,
            None => self.fresh_depth(),
        };
        let key = DepthKey {
            depth,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.keys.insert(id, key);
        self.order.insert((key, id));
        true
    }

    /// Moves an id to `depth`, or to a fresh random depth when `None`.
    pub fn update(&mut self, id: EntityId, depth: Option<f32>) -> Result<f32, IndexError> {
        self.remove(id)?;
        self.insert(id, depth);
        self.depth_of(id)
    }

    pub fn remove(&mut self, id: EntityId) -> Result<f32, IndexError> {
        let key = self.keys.remove(&id).ok_or(IndexError::NotFound(id))?;
        self.order.remove(&(key, id));
        Ok(key.depth)
    }

    pub fn depth_of(&self, id: EntityId) -> Result<f32, IndexError> {
        self.keys
            .get(&id)
            .map(|key| key.depth)
            .ok_or(IndexError::NotFound(id))
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.keys.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Nearest first.
    pub fn iter_ascending(&self) -> impl DoubleEndedIterator<Item = EntityId> + '_ {
        self.order.iter().map(|(_, id)| *id)
    }

    /// Farthest first; the paint order.
    pub fn iter_descending(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.iter_ascending().rev()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[u64]) -> Vec<EntityId> {
        values.iter().copied().map(EntityId).collect()
    }

    fn assert_consistent(order: &DepthOrder) {
        let ascending: Vec<_> = order.iter_ascending().collect();
        let mut descending: Vec<_> = order.iter_descending().collect();
        descending.reverse();
        assert_eq!(ascending, descending);
        assert_eq!(ascending.len(), order.len());
        let depths: Vec<f32> = ascending
            .iter()
            .map(|id| order.depth_of(*id).expect("depth"))
            .collect();
        assert!(
            depths.windows(2).all(|pair| pair[0] <= pair[1]),
            "depths out of order: {depths:?}"
        );
        let mut unique = ascending.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), ascending.len(), "id listed twice");
    }

    #[test]
    fn explicit_depths_sort_ascending() {
        let mut order = DepthOrder::new(0.0..1.0, 1);
        order.insert(EntityId(1), Some(0.5));
        order.insert(EntityId(2), Some(0.1));
        order.insert(EntityId(3), Some(0.9));
        assert_eq!(order.iter_ascending().collect::<Vec<_>>(), ids(&[2, 1, 3]));
        assert_eq!(order.iter_descending().collect::<Vec<_>>(), ids(&[3, 1, 2]));
    }

    #[test]
    fn ties_break_by_insertion_order() {
        let mut order = DepthOrder::new(0.0..1.0, 1);
        order.insert(EntityId(8), Some(0.2));
        order.insert(EntityId(4), Some(0.2));
        assert_eq!(order.iter_ascending().collect::<Vec<_>>(), ids(&[8, 4]));
    }

    #[test]
    fn duplicate_insert_keeps_original_depth() {
        let mut order = DepthOrder::new(0.0..1.0, 1);
        assert!(order.insert(EntityId(1), Some(0.3)));
        assert!(!order.insert(EntityId(1), Some(0.7)));
        assert_eq!(order.depth_of(EntityId(1)).expect("depth"), 0.3);
        assert_eq!(order.len(), 1);
    }

    #[test]
    fn default_depths_fall_in_range() {
        let mut order = DepthOrder::new(0.0..0.25, 42);
        for raw in 0..32 {
            order.insert(EntityId(raw), None);
        }
        for raw in 0..32 {
            let depth = order.depth_of(EntityId(raw)).expect("depth");
            assert!((0.0..0.25).contains(&depth), "depth {depth}");
        }
        assert_consistent(&order);
    }

    #[test]
    fn update_moves_and_remove_forgets() {
        let mut order = DepthOrder::new(0.0..1.0, 3);
        order.insert(EntityId(1), Some(0.1));
        order.insert(EntityId(2), Some(0.2));
        let moved = order.update(EntityId(1), Some(0.3)).expect("update");
        assert_eq!(moved, 0.3);
        assert_eq!(order.iter_ascending().collect::<Vec<_>>(), ids(&[2, 1]));

        assert_eq!(order.remove(EntityId(2)).expect("remove"), 0.2);
        assert_eq!(
            order.depth_of(EntityId(2)).expect_err("removed"),
            IndexError::NotFound(EntityId(2))
        );
        assert_eq!(
            order.update(EntityId(2), None).expect_err("removed"),
            IndexError::NotFound(EntityId(2))
        );
    }

    #[test]
    fn random_operation_sequence_stays_a_total_order() {
        let mut order = DepthOrder::new(0.0..1.0, 99);
        let mut rng = StdRng::seed_from_u64(7);
        for step in 0..400u64 {
            let id = EntityId(rng.gen_range(0..24));
            match rng.gen_range(0..4) {
                0 => {
                    order.insert(id, None);
                }
                1 => {
                    order.insert(id, Some(rng.gen_range(-1.0..1.0)));
                }
                2 => {
                    let _ = order.update(id, (step % 2 == 0).then_some(0.5));
                }
                _ => {
                    let _ = order.remove(id);
                }
            }
            assert_consistent(&order);
        }
    }
}
