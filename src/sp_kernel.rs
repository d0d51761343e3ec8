/*
 * Licensed to the Apache Software Foundation (ASF) under one
 * or more contributor license agreements.  See the NOTICE file
 * distributed with this work for additional information
 * regarding copyright ownership.  The ASF licenses this file
 * to you under the Apache License, Version 2.0 (the
 * "License"); you may not use this file except in compliance
 * with the License.  You may obtain a copy of the License at
 *
 *   http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing,
 * software distributed under the License is distributed on an
 * "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
 * KIND, either express or implied.  See the License for the
 * specific language governing permissions and limitations
 * under the License.
 */

//! Batched shortest-path computation within a single partition cell.
//! `Pure` relaxes the edge set against itself until a full pass makes no
//! improvement (the Rust analog of the columnar join-until-fixpoint
//! approach in `sp_methods/pure.py`). `Scipy` builds an adjacency map and
//! runs one Dijkstra per source, reusing a `BinaryHeap` the way
//! `dijkstra.rs`/`witness_search.rs` reuse their shortest-path-tree
//! machinery across repeated calls. `Hybrid` picks between the two per
//! resolution.
//!
//! Both methods tie-break identically: smallest `via_edge` id wins among
//! equal-cost candidates for a given `(from_edge, to_edge)` pair, so
//! repeated runs are bitwise deterministic.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use serde::{Deserialize, Serialize};

use crate::constants::{EdgeId, Res, Weight};
use crate::shortcut::ActiveShortcut;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SpMethodKind {
    Pure,
    Scipy,
    Hybrid,
}

impl Default for SpMethodKind {
    fn default() -> Self {
        SpMethodKind::Hybrid
    }
}

impl SpMethodKind {
    /// Resolves to a concrete method for a resolution: `Hybrid` switches
    /// to `Pure` at or above `hybrid_res` and `Scipy` below it.
    pub fn resolve(self, res: Res, hybrid_res: Res) -> ConcreteMethod {
        match self {
            SpMethodKind::Pure => ConcreteMethod::Pure,
            SpMethodKind::Scipy => ConcreteMethod::Scipy,
            SpMethodKind::Hybrid => {
                if res >= hybrid_res {
                    ConcreteMethod::Pure
                } else {
                    ConcreteMethod::Scipy
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConcreteMethod {
    Pure,
    Scipy,
}

/// Candidate edge in the all-pairs relaxation, keyed for the tie-break
/// rule (smallest `via_edge` wins on equal cost).
#[derive(Debug, Clone, Copy)]
struct Candidate {
    cost: Weight,
    via_edge: EdgeId,
}

impl Candidate {
    fn better_than(&self, other: &Candidate) -> bool {
        (self.cost, self.via_edge) < (other.cost, other.via_edge)
    }
}

/// Runs the configured SP kernel over `edges` (all shortcuts currently
/// assigned to one partition cell) and returns the minimum-cost,
/// deterministically-tie-broken shortcut per `(from_edge, to_edge)` pair
/// reachable within the group.
pub fn run(edges: &[ActiveShortcut], method: ConcreteMethod) -> Vec<ActiveShortcut> {
    match method {
        ConcreteMethod::Pure => run_pure(edges),
        ConcreteMethod::Scipy => run_scipy(edges),
    }
}

/// PURE: iterative join-based relaxation, `(a,b) x (b,c) -> (a,c)`, kept
/// as `arg_min(via_edge, cost)` per pair, until a full pass over the
/// table adds no improvement. Grounded in
/// `processor_parallel.py::_run_shortest_paths_worker`'s PURE branch.
fn run_pure(edges: &[ActiveShortcut]) -> Vec<ActiveShortcut> {
    let mut best: HashMap<(EdgeId, EdgeId), Candidate> = HashMap::new();
    for e in edges {
        insert_best(&mut best, e.from_edge, e.to_edge, e.cost, e.via_edge);
    }

    loop {
        let mut improved = false;
        let mut updates: Vec<(EdgeId, EdgeId, Weight, EdgeId)> = Vec::new();
        for (&(mid_from, mid_to), &mid_cand) in best.iter() {
            if let Some(heads) = index_from(&best, mid_to) {
                for (to2, cand2) in heads {
                    let combined = Candidate {
                        cost: mid_cand.cost + cand2.cost,
                        via_edge: mid_to,
                    };
                    updates.push((mid_from, to2, combined.cost, combined.via_edge));
                }
            }
        }
        for (from, to, cost, via) in updates {
            if from == to {
                continue;
            }
            if insert_best(&mut best, from, to, cost, via) {
                improved = true;
            }
        }
        if !improved {
            break;
        }
    }

    best.into_iter()
        .map(|((from, to), cand)| rebuild(edges, from, to, cand))
        .collect()
}

fn index_from(best: &HashMap<(EdgeId, EdgeId), Candidate>, from: EdgeId) -> Option<Vec<(EdgeId, Candidate)>> {
    let out: Vec<(EdgeId, Candidate)> = best
        .iter()
        .filter(|((f, _), _)| *f == from)
        .map(|((_, t), c)| (*t, *c))
        .collect();
    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

fn insert_best(
    best: &mut HashMap<(EdgeId, EdgeId), Candidate>,
    from: EdgeId,
    to: EdgeId,
    cost: Weight,
    via: EdgeId,
) -> bool {
    let cand = Candidate { cost, via_edge: via };
    match best.get(&(from, to)) {
        Some(existing) if !cand.better_than(existing) => false,
        _ => {
            best.insert((from, to), cand);
            true
        }
    }
}

fn rebuild(edges: &[ActiveShortcut], from: EdgeId, to: EdgeId, cand: Candidate) -> ActiveShortcut {
    // inner/outer/res fields are recomputed by the caller (the forward /
    // backward contractor) via a join against base edges; here we only
    // carry forward whatever template shortcut matches this pair, if one
    // exists, to preserve those fields as a starting point.
    if let Some(template) = edges.iter().find(|e| e.from_edge == from && e.to_edge == to) {
        ActiveShortcut {
            cost: cand.cost,
            via_edge: cand.via_edge,
            ..*template
        }
    } else {
        ActiveShortcut {
            from_edge: from,
            to_edge: to,
            cost: cand.cost,
            via_edge: cand.via_edge,
            inner_cell: 0,
            outer_cell: 0,
            inner_res: -1,
            outer_res: -1,
            lca_res: -1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct HeapEntry {
    cost: Weight,
    node: EdgeId,
    via: EdgeId,
}

impl Eq for HeapEntry {}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // reversed so BinaryHeap behaves as a min-heap, mirroring
        // `heap_item.rs`'s `Ord` inversion.
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.via.cmp(&other.via).reverse())
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// SCIPY: sparse adjacency + one Dijkstra run per source, heap reused
/// across sources the way `Dijkstra`/`WitnessSearch` reuse their
/// shortest-path tree.
fn run_scipy(edges: &[ActiveShortcut]) -> Vec<ActiveShortcut> {
    let mut adj: HashMap<EdgeId, Vec<(EdgeId, Weight, EdgeId)>> = HashMap::new();
    let mut nodes: Vec<EdgeId> = Vec::new();
    for e in edges {
        adj.entry(e.from_edge)
            .or_default()
            .push((e.to_edge, e.cost, e.via_edge));
        if !nodes.contains(&e.from_edge) {
            nodes.push(e.from_edge);
        }
        if !nodes.contains(&e.to_edge) {
            nodes.push(e.to_edge);
        }
    }

    let mut best: HashMap<(EdgeId, EdgeId), Candidate> = HashMap::new();

    for &source in &nodes {
        let mut dist: HashMap<EdgeId, Weight> = HashMap::new();
        let mut via: HashMap<EdgeId, EdgeId> = HashMap::new();
        let mut heap = BinaryHeap::new();
        dist.insert(source, 0.0);
        heap.push(HeapEntry {
            cost: 0.0,
            node: source,
            via: source,
        });

        while let Some(top) = heap.pop() {
            if top.cost > *dist.get(&top.node).unwrap_or(&Weight::INFINITY) {
                continue;
            }
            if let Some(neighbors) = adj.get(&top.node) {
                for &(next, weight, first_hop_via) in neighbors {
                    let next_cost = top.cost + weight;
                    let existing = dist.get(&next).copied().unwrap_or(Weight::INFINITY);
                    let next_via = if top.node == source { first_hop_via } else { top.node };
                    let better = next_cost < existing
                        || (next_cost == existing && next_via < *via.get(&next).unwrap_or(&EdgeId::MAX));
                    if better {
                        dist.insert(next, next_cost);
                        via.insert(next, next_via);
                        heap.push(HeapEntry {
                            cost: next_cost,
                            node: next,
                            via: next_via,
                        });
                    }
                }
            }
        }

        for (&node, &cost) in dist.iter() {
            if node == source {
                continue;
            }
            let v = via[&node];
            insert_best(&mut best, source, node, cost, v);
        }
    }

    best.into_iter()
        .map(|((from, to), cand)| rebuild(edges, from, to, cand))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sc(from: EdgeId, to: EdgeId, cost: Weight, via: EdgeId) -> ActiveShortcut {
        ActiveShortcut {
            from_edge: from,
            to_edge: to,
            cost,
            via_edge: via,
            inner_cell: 0,
            outer_cell: 0,
            inner_res: 0,
            outer_res: 0,
            lca_res: 0,
        }
    }

    #[test]
    fn scipy_finds_transitive_shortest_path() {
        let edges = vec![sc(0, 1, 1.0, 0), sc(1, 2, 1.0, 1), sc(0, 2, 5.0, 0)];
        let out = run_scipy(&edges);
        let direct = out.iter().find(|s| s.from_edge == 0 && s.to_edge == 2).unwrap();
        assert!((direct.cost - 2.0).abs() < 1e-6);
    }

    #[test]
    fn pure_matches_scipy_on_small_graph() {
        let edges = vec![
            sc(0, 1, 1.0, 0),
            sc(1, 2, 2.0, 1),
            sc(0, 3, 10.0, 0),
            sc(3, 2, 1.0, 3),
        ];
        let scipy = run_scipy(&edges);
        let pure = run_pure(&edges);
        let get = |v: &[ActiveShortcut], f: EdgeId, t: EdgeId| {
            v.iter().find(|s| s.from_edge == f && s.to_edge == t).map(|s| s.cost)
        };
        assert!((get(&scipy, 0, 2).unwrap() - get(&pure, 0, 2).unwrap()).abs() < 1e-6);
    }

    #[test]
    fn tie_break_prefers_smaller_via_edge() {
        let edges = vec![sc(0, 2, 3.0, 5), sc(0, 2, 3.0, 1)];
        let out = run_scipy(&edges);
        // both are elementary (no further relaxation possible since they
        // share endpoints); `insert_best` keeps the smaller via_edge.
        let mut best: HashMap<(EdgeId, EdgeId), Candidate> = HashMap::new();
        for e in &edges {
            insert_best(&mut best, e.from_edge, e.to_edge, e.cost, e.via_edge);
        }
        assert_eq!(best[&(0, 2)].via_edge, 1);
        let _ = out;
    }
}
