use std::collections::VecDeque;

use super::geometry::Vec3;

pub const TRAIL_CAPACITY: usize = 250;

/// Most recent instrument positions, oldest first. Display only.
#[derive(Debug, Clone, PartialEq)]
pub struct Trail {
    points: VecDeque<Vec3>,
    capacity: usize,
}

impl Default for Trail {
    fn default() -> Self {
        Self::with_capacity(TRAIL_CAPACITY)
    }
}

impl Trail {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, point: Vec3) {
        self.points.push_back(point);
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn first(&self) -> Option<Vec3> {
        self.points.front().copied()
    }

    pub fn last(&self) -> Option<Vec3> {
        self.points.back().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.points.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<Vec3> {
        self.iter().collect()
    }
}
