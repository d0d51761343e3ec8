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

//! `uni_lca`, `bi_lca`, `bi_lca_res`: searches phased or pruned by the LCA
//! of source and target. The phase machine encodes
//! "ascending / peak / descending" as a monotone `u8` attached to each
//! label, since the same edge can be reached in different phases with
//! different costs — the standard way to fold a path-history constraint
//! into a shortest-path label.

use std::collections::{BinaryHeap, HashMap};

use crate::constants::{Res, EdgeId};
use crate::error::Result;
use crate::graph_store::{query_lca, AdjRow, GraphStore};

use super::{assemble, not_reachable, walk_to_root, QueryResult};

/// Phase-aware heap entry: ordered by cost only, broken by node/phase for
/// determinism.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PhaseEntry {
    cost: f32,
    node: EdgeId,
    phase: u8,
}

impl Eq for PhaseEntry {}

impl Ord for PhaseEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| other.node.cmp(&self.node).reverse())
            .then_with(|| other.phase.cmp(&self.phase).reverse())
    }
}

impl PartialOrd for PhaseEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Bucket an edge into its phase: 1 = ascending (`inside == 1` and still
/// below the peak), 2 = lateral/peak, 3 = descending (`inside == -1`).
/// Phases only increase along a path.
fn bucket(row: &AdjRow, lca_res: Res, ascend_inside: i8, descend_inside: i8) -> u8 {
    if row.inside == ascend_inside && (row.cell_res as i16) > (lca_res as i16) {
        1
    } else if row.inside == descend_inside {
        3
    } else {
        2
    }
}

pub fn uni_lca(store: &GraphStore, source: EdgeId, target: EdgeId) -> Result<QueryResult> {
    let (_, lca_res) = query_lca(store, source, target);

    let mut dist: HashMap<(EdgeId, u8), f32> = HashMap::new();
    let mut parent: HashMap<(EdgeId, u8), (EdgeId, u8)> = HashMap::new();
    let start = (source, 0u8);
    dist.insert(start, 0.0);
    parent.insert(start, start);

    let mut heap = BinaryHeap::new();
    heap.push(PhaseEntry { cost: 0.0, node: source, phase: 0 });

    let mut reached: Option<(EdgeId, u8)> = None;

    while let Some(top) = heap.pop() {
        let label = (top.node, top.phase);
        if top.cost > *dist.get(&label).unwrap_or(&f32::INFINITY) {
            continue;
        }
        if top.node == target {
            reached = Some(label);
            break;
        }
        for row in store.fwd(top.node) {
            let edge_bucket = bucket(row, lca_res, 1, -1);
            if edge_bucket < top.phase {
                continue;
            }
            let next_label = (row.neighbor, edge_bucket);
            let next_cost = top.cost + row.cost;
            if next_cost < *dist.get(&next_label).unwrap_or(&f32::INFINITY) {
                dist.insert(next_label, next_cost);
                parent.insert(next_label, label);
                heap.push(PhaseEntry { cost: next_cost, node: row.neighbor, phase: edge_bucket });
            }
        }
    }

    let label = reached.ok_or_else(|| not_reachable(source, target))?;
    let total = dist[&label] + store.edge(target)?.cost;
    let labeled_path = walk_to_root(&parent, label);
    let path: Vec<EdgeId> = labeled_path.into_iter().map(|(n, _)| n).collect();
    Ok(assemble(store, path, Vec::new(), total))
}

/// `uni_lca` with hops overlapping `penalty_set` scaled by `factor`, shared
/// by the `alternative` algorithm. A hop `(u, v)` is
/// penalized when that exact directed pair was traversed by the primary
/// path — checking the pair, not either endpoint alone, since the source
/// and target edges are shared by every path and would otherwise penalize
/// both the primary route and its detours equally.
pub(crate) fn uni_lca_penalized(
    store: &GraphStore,
    source: EdgeId,
    target: EdgeId,
    penalty_set: &std::collections::HashSet<(EdgeId, EdgeId)>,
    factor: f32,
) -> Result<QueryResult> {
    let (_, lca_res) = query_lca(store, source, target);

    let mut dist: HashMap<(EdgeId, u8), f32> = HashMap::new();
    // True (unpenalized) cost to each label, kept alongside the penalized
    // `dist` used for ordering — the penalty only steers the search, the
    // cost reported back is the real cost of the path it finds.
    let mut true_dist: HashMap<(EdgeId, u8), f32> = HashMap::new();
    let mut parent: HashMap<(EdgeId, u8), (EdgeId, u8)> = HashMap::new();
    let start = (source, 0u8);
    dist.insert(start, 0.0);
    true_dist.insert(start, 0.0);
    parent.insert(start, start);

    let mut heap = BinaryHeap::new();
    heap.push(PhaseEntry { cost: 0.0, node: source, phase: 0 });

    let mut reached: Option<(EdgeId, u8)> = None;

    while let Some(top) = heap.pop() {
        let label = (top.node, top.phase);
        if top.cost > *dist.get(&label).unwrap_or(&f32::INFINITY) {
            continue;
        }
        if top.node == target {
            reached = Some(label);
            break;
        }
        for row in store.fwd(top.node) {
            let edge_bucket = bucket(row, lca_res, 1, -1);
            if edge_bucket < top.phase {
                continue;
            }
            let penalized = penalty_set.contains(&(top.node, row.neighbor));
            let hop_cost = if penalized { row.cost * factor } else { row.cost };
            let next_label = (row.neighbor, edge_bucket);
            let next_cost = top.cost + hop_cost;
            if next_cost < *dist.get(&next_label).unwrap_or(&f32::INFINITY) {
                dist.insert(next_label, next_cost);
                true_dist.insert(next_label, true_dist[&label] + row.cost);
                parent.insert(next_label, label);
                heap.push(PhaseEntry { cost: next_cost, node: row.neighbor, phase: edge_bucket });
            }
        }
    }

    let label = reached.ok_or_else(|| not_reachable(source, target))?;
    let total = true_dist[&label] + store.edge(target)?.cost;
    let labeled_path = walk_to_root(&parent, label);
    let path: Vec<EdgeId> = labeled_path.into_iter().map(|(n, _)| n).collect();
    Ok(assemble(store, path, Vec::new(), total))
}

/// Phased bidirectional search: the backward side runs the same phase
/// machine with `inside == 1`/`inside == -1` swapped, since "ascending
/// toward the peak" from the target's perspective means
/// following `inside == -1` edges backward.
pub fn bi_lca(store: &GraphStore, source: EdgeId, target: EdgeId) -> Result<QueryResult> {
    let (_, lca_res) = query_lca(store, source, target);
    let target_cost = store.edge(target)?.cost;

    let mut dist_f: HashMap<(EdgeId, u8), f32> = HashMap::new();
    let mut parent_f: HashMap<(EdgeId, u8), (EdgeId, u8)> = HashMap::new();
    let start_f = (source, 0u8);
    dist_f.insert(start_f, 0.0);
    parent_f.insert(start_f, start_f);
    let mut heap_f = BinaryHeap::new();
    heap_f.push(PhaseEntry { cost: 0.0, node: source, phase: 0 });

    let mut dist_b: HashMap<(EdgeId, u8), f32> = HashMap::new();
    let mut parent_b: HashMap<(EdgeId, u8), (EdgeId, u8)> = HashMap::new();
    let start_b = (target, 0u8);
    dist_b.insert(start_b, target_cost);
    parent_b.insert(start_b, start_b);
    let mut heap_b = BinaryHeap::new();
    heap_b.push(PhaseEntry { cost: target_cost, node: target, phase: 0 });

    let mut best = f32::INFINITY;
    let mut meeting: Option<(EdgeId, u8, EdgeId, u8)> = None;

    loop {
        let top_f = heap_f.peek().map(|e| e.cost).unwrap_or(f32::INFINITY);
        let top_b = heap_b.peek().map(|e| e.cost).unwrap_or(f32::INFINITY);
        if top_f == f32::INFINITY && top_b == f32::INFINITY {
            break;
        }
        if top_f >= best && top_b >= best {
            break;
        }

        if top_f <= top_b {
            if let Some(top) = heap_f.pop() {
                let label = (top.node, top.phase);
                if top.cost > *dist_f.get(&label).unwrap_or(&f32::INFINITY) {
                    continue;
                }
                for phase_b in 0..=3u8 {
                    if let Some(&db) = dist_b.get(&(top.node, phase_b)) {
                        let total = top.cost + db;
                        if total < best {
                            best = total;
                            meeting = Some((top.node, top.phase, top.node, phase_b));
                        }
                    }
                }
                for row in store.fwd(top.node) {
                    let edge_bucket = bucket(row, lca_res, 1, -1);
                    if edge_bucket < top.phase {
                        continue;
                    }
                    let next_label = (row.neighbor, edge_bucket);
                    let next_cost = top.cost + row.cost;
                    if next_cost < *dist_f.get(&next_label).unwrap_or(&f32::INFINITY) {
                        dist_f.insert(next_label, next_cost);
                        parent_f.insert(next_label, label);
                        heap_f.push(PhaseEntry { cost: next_cost, node: row.neighbor, phase: edge_bucket });
                    }
                    for phase_b in 0..=3u8 {
                        if let Some(&db) = dist_b.get(&(row.neighbor, phase_b)) {
                            let total = next_cost.min(*dist_f.get(&next_label).unwrap()) + db;
                            if total < best {
                                best = total;
                                meeting = Some((row.neighbor, edge_bucket, row.neighbor, phase_b));
                            }
                        }
                    }
                }
            }
        } else if let Some(top) = heap_b.pop() {
            let label = (top.node, top.phase);
            if top.cost > *dist_b.get(&label).unwrap_or(&f32::INFINITY) {
                continue;
            }
            for phase_f in 0..=3u8 {
                if let Some(&df) = dist_f.get(&(top.node, phase_f)) {
                    let total = df + top.cost;
                    if total < best {
                        best = total;
                        meeting = Some((top.node, phase_f, top.node, top.phase));
                    }
                }
            }
            for row in store.bwd(top.node) {
                // backward mirror: ascend on inside == -1, descend on inside == 1.
                let edge_bucket = bucket(row, lca_res, -1, 1);
                if edge_bucket < top.phase {
                    continue;
                }
                let next_label = (row.neighbor, edge_bucket);
                let next_cost = top.cost + row.cost;
                if next_cost < *dist_b.get(&next_label).unwrap_or(&f32::INFINITY) {
                    dist_b.insert(next_label, next_cost);
                    parent_b.insert(next_label, label);
                    heap_b.push(PhaseEntry { cost: next_cost, node: row.neighbor, phase: edge_bucket });
                }
                for phase_f in 0..=3u8 {
                    if let Some(&df) = dist_f.get(&(row.neighbor, phase_f)) {
                        let total = df + next_cost.min(*dist_b.get(&next_label).unwrap());
                        if total < best {
                            best = total;
                            meeting = Some((row.neighbor, phase_f, row.neighbor, edge_bucket));
                        }
                    }
                }
            }
        }
    }

    let (fn_, fp, bn, bp) = meeting.ok_or_else(|| not_reachable(source, target))?;
    let fwd_path: Vec<EdgeId> = walk_to_root(&parent_f, (fn_, fp)).into_iter().map(|(n, _)| n).collect();
    let mut bwd_path: Vec<EdgeId> = walk_to_root(&parent_b, (bn, bp)).into_iter().map(|(n, _)| n).collect();
    bwd_path.reverse();
    bwd_path.remove(0);
    Ok(assemble(store, fwd_path, bwd_path, best))
}

/// Resolution-pruned bidirectional search. Pruning is keyed on each
/// popped node's *arrival resolution* — the `cell_res` of the shortcut
/// that led to it, seeded from the node's own `lca_res` at the source/
/// target — not the candidate edge's own resolution: a node reached at a
/// coarse resolution must stop expanding even if a later candidate edge
/// happens to sit at a fine one. The forward side only ever follows
/// `inside == 1` edges; the backward side's allowed `inside` set depends
/// on how `arrival_res` compares to `lca_res` (`query_pruned_fast.py`):
/// above it only `-1`, at it `{-1, 0}`, below it `{0, -2}`.
pub fn bi_lca_res(store: &GraphStore, source: EdgeId, target: EdgeId) -> Result<QueryResult> {
    let (_, lca_res) = query_lca(store, source, target);
    let target_cost = store.edge(target)?.cost;
    let source_res = store.edge(source)?.lca_res;
    let target_res = store.edge(target)?.lca_res;

    let mut dist_f: HashMap<EdgeId, f32> = HashMap::new();
    let mut parent_f: HashMap<EdgeId, EdgeId> = HashMap::new();
    let mut arrival_f: HashMap<EdgeId, Res> = HashMap::new();
    dist_f.insert(source, 0.0);
    parent_f.insert(source, source);
    arrival_f.insert(source, source_res);
    let mut heap_f = BinaryHeap::new();
    heap_f.push(super::HeapEntry { cost: 0.0, node: source });

    let mut dist_b: HashMap<EdgeId, f32> = HashMap::new();
    let mut parent_b: HashMap<EdgeId, EdgeId> = HashMap::new();
    let mut arrival_b: HashMap<EdgeId, Res> = HashMap::new();
    dist_b.insert(target, target_cost);
    parent_b.insert(target, target);
    arrival_b.insert(target, target_res);
    let mut heap_b = BinaryHeap::new();
    heap_b.push(super::HeapEntry { cost: target_cost, node: target });

    // min_arrival tracks the cheapest label ever popped on each side, used
    // alongside the heap top for the tighter early-termination bound.
    let mut min_arrival_f = 0.0f32;
    let mut min_arrival_b = target_cost;
    let mut best = f32::INFINITY;
    let mut meeting: Option<EdgeId> = None;

    loop {
        let top_f = heap_f.peek().map(|e| e.cost).unwrap_or(f32::INFINITY);
        let top_b = heap_b.peek().map(|e| e.cost).unwrap_or(f32::INFINITY);
        if top_f == f32::INFINITY && top_b == f32::INFINITY {
            break;
        }
        if min_arrival_f + min_arrival_b >= best && top_f + top_b >= best {
            break;
        }

        if top_f <= top_b {
            if let Some(top) = heap_f.pop() {
                if top.cost > *dist_f.get(&top.node).unwrap_or(&f32::INFINITY) {
                    continue;
                }
                min_arrival_f = min_arrival_f.max(top.cost);
                if let Some(&db) = dist_b.get(&top.node) {
                    let total = top.cost + db;
                    if total < best {
                        best = total;
                        meeting = Some(top.node);
                    }
                }

                if arrival_f[&top.node] < lca_res {
                    continue;
                }

                for row in store.fwd(top.node).iter().filter(|r| r.inside == 1) {
                    let next_cost = top.cost + row.cost;
                    if next_cost < *dist_f.get(&row.neighbor).unwrap_or(&f32::INFINITY) {
                        dist_f.insert(row.neighbor, next_cost);
                        parent_f.insert(row.neighbor, top.node);
                        arrival_f.insert(row.neighbor, row.cell_res);
                        heap_f.push(super::HeapEntry { cost: next_cost, node: row.neighbor });
                    }
                    if let Some(&db) = dist_b.get(&row.neighbor) {
                        let total = dist_f[&row.neighbor].min(next_cost) + db;
                        if total < best {
                            best = total;
                            meeting = Some(row.neighbor);
                        }
                    }
                }
            }
        } else if let Some(top) = heap_b.pop() {
            if top.cost > *dist_b.get(&top.node).unwrap_or(&f32::INFINITY) {
                continue;
            }
            min_arrival_b = min_arrival_b.max(top.cost);
            if let Some(&df) = dist_f.get(&top.node) {
                let total = df + top.cost;
                if total < best {
                    best = total;
                    meeting = Some(top.node);
                }
            }

            let node_res = arrival_b[&top.node];
            let above_lca = node_res >= lca_res;

            for row in store.bwd(top.node).iter().filter(|r| match r.inside {
                -1 => above_lca,
                0 => node_res <= lca_res,
                -2 => !above_lca,
                _ => false,
            }) {
                let next_cost = top.cost + row.cost;
                if next_cost < *dist_b.get(&row.neighbor).unwrap_or(&f32::INFINITY) {
                    dist_b.insert(row.neighbor, next_cost);
                    parent_b.insert(row.neighbor, top.node);
                    arrival_b.insert(row.neighbor, row.cell_res);
                    heap_b.push(super::HeapEntry { cost: next_cost, node: row.neighbor });
                }
                if let Some(&df) = dist_f.get(&row.neighbor) {
                    let total = df + dist_b[&row.neighbor].min(next_cost);
                    if total < best {
                        best = total;
                        meeting = Some(row.neighbor);
                    }
                }
            }
        }
    }

    let m = meeting.ok_or_else(|| not_reachable(source, target))?;
    let fwd_path = walk_to_root(&parent_f, m);
    let mut bwd_path = walk_to_root(&parent_b, m);
    bwd_path.reverse();
    bwd_path.remove(0);
    Ok(assemble(store, fwd_path, bwd_path, best))
}
