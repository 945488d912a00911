//! Priority-bucketed multimap.

use std::collections::BTreeMap;

/// Iteration direction over priority keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Lowest priority value first.
    #[default]
    Ascending,
    /// Highest priority value first.
    Descending,
}

/// Maps an integer priority to an insertion-ordered bucket of values.
///
/// The direction is fixed at construction.
#[derive(Debug, Clone)]
pub struct PriorityOrderedMultiMap<V> {
    buckets: BTreeMap<i32, Vec<V>>,
    direction: Direction,
    len: usize,
}

impl<V> Default for PriorityOrderedMultiMap<V> {
    fn default() -> Self {
        Self::new(Direction::Ascending)
    }
}

impl<V> PriorityOrderedMultiMap<V> {
    pub fn new(direction: Direction) -> Self {
        Self {
            buckets: BTreeMap::new(),
            direction,
            len: 0,
        }
    }

    pub fn ascending() -> Self {
        Self::new(Direction::Ascending)
    }

    pub fn descending() -> Self {
        Self::new(Direction::Descending)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Appends `value` to the bucket for `priority`.
    pub fn add(&mut self, priority: i32, value: V) {
        self.buckets.entry(priority).or_default().push(value);
        self.len += 1;
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total number of values across buckets.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Values in the bucket for `priority`, empty when absent.
    pub fn bucket(&self, priority: i32) -> &[V] {
        self.buckets.get(&priority).map_or(&[], Vec::as_slice)
    }

    /// Iterates `(priority, value)` pairs in map direction.
    pub fn iter(&self) -> Box<dyn Iterator<Item = (i32, &V)> + '_> {
        match self.direction {
            Direction::Ascending => Box::new(
                self.buckets
                    .iter()
                    .flat_map(|(priority, values)| values.iter().map(move |value| (*priority, value))),
            ),
            Direction::Descending => Box::new(
                self.buckets
                    .iter()
                    .rev()
                    .flat_map(|(priority, values)| values.iter().map(move |value| (*priority, value))),
            ),
        }
    }
}

impl<V: Clone> PriorityOrderedMultiMap<V> {
    /// All values ordered by priority in map direction, stable within a bucket.
    pub fn flatten(&self) -> Vec<V> {
        let mut result = Vec::with_capacity(self.len);
        result.extend(self.iter().map(|(_, value)| value.clone()));
        result
    }
}

#[cfg(test)]
mod tests {
    use super::{Direction, PriorityOrderedMultiMap};

    #[test]
    fn ascending_map_flattens_low_to_high() {
        let mut map = PriorityOrderedMultiMap::ascending();
        map.add(300, "c");
        map.add(100, "a");
        map.add(200, "b");
        assert_eq!(map.flatten(), vec!["a", "b", "c"]);
        assert_eq!(map.bucket_count(), 3);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn descending_map_flattens_high_to_low() {
        let mut map = PriorityOrderedMultiMap::descending();
        map.add(100, "a");
        map.add(300, "c");
        map.add(200, "b");
        assert_eq!(map.direction(), Direction::Descending);
        assert_eq!(map.flatten(), vec!["c", "b", "a"]);
    }

    #[test]
    fn bucket_keeps_insertion_order_in_both_directions() {
        let mut asc = PriorityOrderedMultiMap::ascending();
        let mut desc = PriorityOrderedMultiMap::descending();
        for value in ["first", "second", "third"] {
            asc.add(5, value);
            desc.add(5, value);
        }
        asc.add(1, "early");
        desc.add(1, "early");
        assert_eq!(asc.flatten(), vec!["early", "first", "second", "third"]);
        assert_eq!(desc.flatten(), vec!["first", "second", "third", "early"]);
        assert_eq!(asc.bucket(5).len(), 3);
        assert!(asc.bucket(42).is_empty());
    }

    #[test]
    fn empty_map_flattens_to_empty_sequence() {
        let map: PriorityOrderedMultiMap<u8> = PriorityOrderedMultiMap::default();
        assert!(map.is_empty());
        assert_eq!(map.bucket_count(), 0);
        assert!(map.flatten().is_empty());
    }

    #[test]
    fn negative_priorities_sort_first() {
        let mut map = PriorityOrderedMultiMap::ascending();
        map.add(0, 0);
        map.add(-10, -10);
        map.add(i32::MAX, 1);
        map.add(i32::MIN, -2);
        assert_eq!(map.flatten(), vec![-2, -10, 0, 1]);
    }

    #[test]
    fn clones_are_independent() {
        let mut original = PriorityOrderedMultiMap::ascending();
        original.add(1, "a");
        let mut copy = original.clone();
        copy.add(0, "z");
        assert_eq!(original.flatten(), vec!["a"]);
        assert_eq!(copy.flatten(), vec!["z", "a"]);
    }
}
