// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The active edge set of the rotational sweep.
//!
//! An AVL tree stored in a slot map arena. Edges are ordered by where they
//! cross the current sweep ray: nearer crossings sort first, and edges
//! crossing at the same point (a shared vertex) are ordered by the angle
//! they make with the ray there. The ray is passed to every operation since
//! it rotates between calls; edges in the set never cross each other, so
//! the relative order of stored edges stays valid as it turns.

use slotmap::{new_key_type, SlotMap};
use visgraph_geometry::{
    angle_between, distance_to_intersection, segments_cross, Edge, Point, Tolerance,
};

new_key_type! {
    /// Key for a node of the active edge tree.
    pub struct NodeKey;
}

#[derive(Debug, Clone)]
struct Node {
    edge: Edge,
    left: Option<NodeKey>,
    right: Option<NodeKey>,
    height: u32,
}

/// Ordered set of obstacle edges currently crossed by the sweep ray.
#[derive(Debug, Clone)]
pub struct OpenEdges {
    nodes: SlotMap<NodeKey, Node>,
    root: Option<NodeKey>,
    tolerance: Tolerance,
}

/// The sweep ray from `source` through `target`.
#[derive(Debug, Clone, Copy)]
struct Ray {
    source: Point,
    target: Point,
    tolerance: Tolerance,
}

impl Ray {
    /// True if `e1` crosses the ray before `e2`.
    ///
    /// An `e2` that misses the ray sorts after everything.
    fn less_than(&self, e1: &Edge, e2: &Edge) -> bool {
        if e1 == e2 {
            return false;
        }
        if !segments_cross(self.source, self.target, e2.p1, e2.p2, self.tolerance) {
            return true;
        }
        let d1 = distance_to_intersection(self.source, self.target, e1);
        let d2 = distance_to_intersection(self.source, self.target, e2);
        if d1 != d2 {
            return d1 < d2;
        }
        // Same crossing point: compare the angle each edge makes at the target
        let Some(shared) = e1.shared_point(e2) else {
            return false;
        };
        let a1 = angle_between(self.source, self.target, e1.adjacent(shared), self.tolerance);
        let a2 = angle_between(self.source, self.target, e2.adjacent(shared), self.tolerance);
        a1 < a2
    }
}

impl OpenEdges {
    pub fn new(tolerance: Tolerance) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root: None,
            tolerance,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Inserts `edge` in ray order for the ray `source` → `target`.
    pub fn insert(&mut self, source: Point, target: Point, edge: Edge) {
        let ray = self.ray(source, target);
        let root = self.root;
        self.root = Some(self.insert_at(root, &ray, edge));
    }

    /// Removes `edge`, located by ray order for the ray `source` → `target`.
    ///
    /// Returns `false` if the edge is not in the set.
    pub fn delete(&mut self, source: Point, target: Point, edge: &Edge) -> bool {
        let ray = self.ray(source, target);
        let mut found = false;
        let root = self.root;
        self.root = self.delete_at(root, &ray, edge, &mut found);
        if !found && self.nodes.values().any(|n| n.edge == *edge) {
            // Rounding put the stored edge off the search path; rebuild without it
            let remaining: Vec<Edge> = self.iter().filter(|e| e != edge).collect();
            self.rebuild(&remaining);
            found = true;
        }
        found
    }

    /// The edge nearest to the ray source, if any.
    pub fn smallest(&self) -> Option<Edge> {
        let mut key = self.root?;
        while let Some(left) = self.nodes[key].left {
            key = left;
        }
        Some(self.nodes[key].edge)
    }

    /// Edges in ray order, nearest first.
    pub fn iter(&self) -> impl Iterator<Item = Edge> + '_ {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = Vec::new();
        let mut current = self.root;
        while current.is_some() || !stack.is_empty() {
            while let Some(key) = current {
                stack.push(key);
                current = self.nodes[key].left;
            }
            if let Some(key) = stack.pop() {
                out.push(self.nodes[key].edge);
                current = self.nodes[key].right;
            }
        }
        out.into_iter()
    }

    // =========================================================================
    // Tree maintenance
    // =========================================================================

    fn ray(&self, source: Point, target: Point) -> Ray {
        Ray {
            source,
            target,
            tolerance: self.tolerance,
        }
    }

    fn insert_at(&mut self, node: Option<NodeKey>, ray: &Ray, edge: Edge) -> NodeKey {
        let Some(key) = node else {
            return self.nodes.insert(Node {
                edge,
                left: None,
                right: None,
                height: 1,
            });
        };
        if ray.less_than(&edge, &self.nodes[key].edge) {
            let left = self.nodes[key].left;
            let child = self.insert_at(left, ray, edge);
            self.nodes[key].left = Some(child);
        } else {
            let right = self.nodes[key].right;
            let child = self.insert_at(right, ray, edge);
            self.nodes[key].right = Some(child);
        }
        self.rebalance(key)
    }

    fn delete_at(
        &mut self,
        node: Option<NodeKey>,
        ray: &Ray,
        edge: &Edge,
        found: &mut bool,
    ) -> Option<NodeKey> {
        let key = node?;
        if self.nodes[key].edge == *edge {
            *found = true;
            let (left, right) = (self.nodes[key].left, self.nodes[key].right);
            return match (left, right) {
                (None, child) | (child, None) => {
                    self.nodes.remove(key);
                    child
                }
                (Some(_), Some(right)) => {
                    let (new_right, successor) = self.delete_min(right);
                    self.nodes[key].edge = successor;
                    self.nodes[key].right = new_right;
                    Some(self.rebalance(key))
                }
            };
        }
        if ray.less_than(edge, &self.nodes[key].edge) {
            let left = self.nodes[key].left;
            let child = self.delete_at(left, ray, edge, found);
            self.nodes[key].left = child;
        } else {
            let right = self.nodes[key].right;
            let child = self.delete_at(right, ray, edge, found);
            self.nodes[key].right = child;
        }
        Some(self.rebalance(key))
    }

    /// Removes the leftmost node under `key`, returning the new subtree root
    /// and the removed edge.
    fn delete_min(&mut self, key: NodeKey) -> (Option<NodeKey>, Edge) {
        match self.nodes[key].left {
            None => {
                let right = self.nodes[key].right;
                let edge = self.nodes[key].edge;
                self.nodes.remove(key);
                (right, edge)
            }
            Some(left) => {
                let (new_left, edge) = self.delete_min(left);
                self.nodes[key].left = new_left;
                (Some(self.rebalance(key)), edge)
            }
        }
    }

    /// Rebuilds a perfectly balanced tree from edges already in order.
    fn rebuild(&mut self, ordered: &[Edge]) {
        self.nodes.clear();
        self.root = self.build_balanced(ordered);
    }

    fn build_balanced(&mut self, ordered: &[Edge]) -> Option<NodeKey> {
        if ordered.is_empty() {
            return None;
        }
        let mid = ordered.len() / 2;
        let left = self.build_balanced(&ordered[..mid]);
        let right = self.build_balanced(&ordered[mid + 1..]);
        let key = self.nodes.insert(Node {
            edge: ordered[mid],
            left,
            right,
            height: 1,
        });
        self.update_height(key);
        Some(key)
    }

    fn height(&self, node: Option<NodeKey>) -> u32 {
        node.map_or(0, |k| self.nodes[k].height)
    }

    fn update_height(&mut self, key: NodeKey) {
        let h = 1 + self
            .height(self.nodes[key].left)
            .max(self.height(self.nodes[key].right));
        self.nodes[key].height = h;
    }

    fn balance_factor(&self, key: NodeKey) -> i64 {
        self.height(self.nodes[key].left) as i64 - self.height(self.nodes[key].right) as i64
    }

    fn rotate_right(&mut self, key: NodeKey) -> NodeKey {
        let Some(pivot) = self.nodes[key].left else {
            return key;
        };
        self.nodes[key].left = self.nodes[pivot].right;
        self.nodes[pivot].right = Some(key);
        self.update_height(key);
        self.update_height(pivot);
        pivot
    }

    fn rotate_left(&mut self, key: NodeKey) -> NodeKey {
        let Some(pivot) = self.nodes[key].right else {
            return key;
        };
        self.nodes[key].right = self.nodes[pivot].left;
        self.nodes[pivot].left = Some(key);
        self.update_height(key);
        self.update_height(pivot);
        pivot
    }

    /// Restores the AVL invariant at `key` and returns the subtree root.
    fn rebalance(&mut self, key: NodeKey) -> NodeKey {
        self.update_height(key);
        let balance = self.balance_factor(key);
        if balance > 1 {
            if let Some(left) = self.nodes[key].left {
                if self.balance_factor(left) < 0 {
                    let new_left = self.rotate_left(left);
                    self.nodes[key].left = Some(new_left);
                }
            }
            return self.rotate_right(key);
        }
        if balance < -1 {
            if let Some(right) = self.nodes[key].right {
                if self.balance_factor(right) > 0 {
                    let new_right = self.rotate_right(right);
                    self.nodes[key].right = Some(new_right);
                }
            }
            return self.rotate_left(key);
        }
        key
    }
}
