// MIT License
//
// Copyright (c) 2024 Erik Holum
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

//! Capacity-bounded arena tree for storing search vertices.
//! Values must implement a distance trait to enable determination of nearest neighbors.
use crate::error::{PlanningError, Result};
use linked_hash_set::LinkedHashSet;
use ordered_float::OrderedFloat;

/// Basic node element for the tree.
///
/// Parents are referenced by index in the [Tree]'s node vector, so a node is only
/// meaningful alongside the tree that holds it.
#[derive(Debug, Clone, PartialEq)]
pub struct Node<T> {
    // The value of this node.
    value: T,

    // Location of the nodes parent, if available
    parent: Option<usize>,
}

impl<T> Node<T> {
    fn new(value: T, parent: Option<usize>) -> Self {
        Node { value, parent }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    /// Index of the parent node, `None` for the root.
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }
}

/// Define a distance trait for tree node values.
pub trait Distance {
    fn distance(&self, other: &Self) -> f64;
}

/// Append-only tree for use in search algorithms.
///
/// The root is always index 0. Every other node is added as the child of a node
/// that is already present, so parent indices always point backwards and the
/// parent graph cannot contain a cycle.
#[derive(Debug, Clone)]
pub struct Tree<T>
where
    T: Distance,
{
    nodes: Vec<Node<T>>,

    // Maximum number of nodes, root included.
    capacity: usize,
}

impl<T: Distance> Tree<T> {
    /// Construct a new tree with the specified value as the root node.
    ///
    /// `capacity` counts the root and is raised to 1 if smaller.
    pub fn new(root: T, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut nodes = Vec::with_capacity(capacity);
        nodes.push(Node::new(root, None));
        Tree { nodes, capacity }
    }

    /// Adds the value to the specified node's children, returning the new node's index.
    ///
    /// # Errors
    ///
    /// If the tree is full.
    /// If the parent is not found in the tree.
    pub fn add_child(&mut self, parent: usize, child: T) -> Result<usize> {
        if self.nodes.len() >= self.capacity {
            return Err(PlanningError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        if parent >= self.nodes.len() {
            return Err(PlanningError::UnknownParent {
                parent,
                size: self.nodes.len(),
            });
        }

        let child_idx = self.nodes.len();
        self.nodes.push(Node::new(child, Some(parent)));
        Ok(child_idx)
    }

    // Return the size of the tree
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.nodes.len() >= self.capacity
    }

    pub fn root(&self) -> &T {
        &self.nodes[0].value
    }

    pub fn get(&self, index: usize) -> Option<&Node<T>> {
        self.nodes.get(index)
    }

    pub fn value(&self, index: usize) -> Option<&T> {
        self.nodes.get(index).map(Node::value)
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> &[Node<T>] {
        &self.nodes
    }

    /// Returns the index of the closest element to the specified value.
    ///
    /// Scans in insertion order, so ties go to the lowest index.
    pub fn nearest_neighbor(&self, val: &T) -> usize {
        self.nodes
            .iter()
            .enumerate()
            .min_by_key(|(_, node)| OrderedFloat(val.distance(&node.value)))
            .map_or(0, |(i, _)| i)
    }

    /// Like [`Tree::nearest_neighbor`], but only considers nodes strictly closer than `bound`.
    ///
    /// Returns None if no node qualifies.
    pub fn nearest_within(&self, val: &T, bound: f64) -> Option<usize> {
        let mut min_distance = bound;
        let mut nearest = None;
        for (i, check) in self.nodes.iter().enumerate() {
            let distance = val.distance(&check.value);
            if distance < min_distance {
                min_distance = distance;
                nearest = Some(i);
            }
        }
        nearest
    }

    /// Returns the indices from the specified node back to the root, inclusive.
    ///
    /// # Errors
    ///
    /// If the end node is not in the tree, or the parent chain revisits a node or
    /// points outside the tree.
    pub fn path(&self, end: usize) -> Result<Vec<usize>> {
        if end >= self.nodes.len() {
            return Err(PlanningError::BrokenChain { index: end });
        }

        let mut visited = LinkedHashSet::new();
        let mut cur_idx = Some(end);
        while let Some(idx) = cur_idx {
            let node = self
                .nodes
                .get(idx)
                .ok_or(PlanningError::BrokenChain { index: idx })?;
            if !visited.insert(idx) {
                return Err(PlanningError::BrokenChain { index: idx });
            }
            cur_idx = node.parent;
        }

        Ok(visited.into_iter().collect())
    }

    /// Checks that every non-root parent index points at an earlier node.
    pub fn is_forest(&self) -> bool {
        self.nodes.iter().enumerate().all(|(i, node)| match node.parent {
            None => i == 0,
            Some(parent) => parent < i,
        })
    }
}

// Needed for distancing points on a line
impl Distance for i32 {
    fn distance(&self, other: &Self) -> f64 {
        (self - other).abs().into()
    }
}

//
// Unit tests
//
