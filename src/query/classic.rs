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

//! `classic`: bidirectional search filtered by a shortcut's `inside` flag —
//! forward only follows upward (`inside == 1`) edges, backward only follows
//! downward-or-lateral (`inside in {-1, 0}`) edges. The same filtered
//! search, seeded from multiple sources and targets at once, backs `m2m`
//! (`query/m2m.rs`).

use std::collections::{BinaryHeap, HashMap};

use crate::constants::EdgeId;
use crate::error::Result;
use crate::graph_store::{AdjRow, GraphStore};

use super::{assemble, not_reachable, walk_to_root, HeapEntry, QueryResult};

pub(super) fn forward_allowed(row: &AdjRow) -> bool {
    row.inside == 1
}

pub(super) fn backward_allowed(row: &AdjRow) -> bool {
    row.inside == -1 || row.inside == 0
}

pub fn classic(store: &GraphStore, source: EdgeId, target: EdgeId) -> Result<QueryResult> {
    let target_cost = store.edge(target)?.cost;
    bidirectional(store, &[(source, 0.0)], &[(target, target_cost)])
        .ok_or_else(|| not_reachable(source, target))
}

/// Shared `inside`-filtered bidirectional search, seeded from possibly
/// multiple sources/targets. Terminates when both heap tops are `>= best`.
pub(super) fn bidirectional(store: &GraphStore, sources: &[(EdgeId, f32)], targets: &[(EdgeId, f32)]) -> Option<QueryResult> {
    let mut dist_f: HashMap<EdgeId, f32> = HashMap::new();
    let mut parent_f: HashMap<EdgeId, EdgeId> = HashMap::new();
    let mut heap_f = BinaryHeap::new();
    for &(s, cost) in sources {
        dist_f.insert(s, cost);
        parent_f.insert(s, s);
        heap_f.push(HeapEntry { cost, node: s });
    }

    let mut dist_b: HashMap<EdgeId, f32> = HashMap::new();
    let mut parent_b: HashMap<EdgeId, EdgeId> = HashMap::new();
    let mut heap_b = BinaryHeap::new();
    for &(t, cost) in targets {
        dist_b.insert(t, cost);
        parent_b.insert(t, t);
        heap_b.push(HeapEntry { cost, node: t });
    }

    let mut best = f32::INFINITY;
    let mut meeting: Option<EdgeId> = None;

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
                if top.cost > *dist_f.get(&top.node).unwrap_or(&f32::INFINITY) {
                    continue;
                }
                if let Some(&db) = dist_b.get(&top.node) {
                    let total = top.cost + db;
                    if total < best {
                        best = total;
                        meeting = Some(top.node);
                    }
                }
                for row in store.fwd(top.node).iter().filter(|r| forward_allowed(r)) {
                    let next_cost = top.cost + row.cost;
                    if next_cost < *dist_f.get(&row.neighbor).unwrap_or(&f32::INFINITY) {
                        dist_f.insert(row.neighbor, next_cost);
                        parent_f.insert(row.neighbor, top.node);
                        heap_f.push(HeapEntry { cost: next_cost, node: row.neighbor });
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
            if let Some(&df) = dist_f.get(&top.node) {
                let total = df + top.cost;
                if total < best {
                    best = total;
                    meeting = Some(top.node);
                }
            }
            for row in store.bwd(top.node).iter().filter(|r| backward_allowed(r)) {
                let next_cost = top.cost + row.cost;
                if next_cost < *dist_b.get(&row.neighbor).unwrap_or(&f32::INFINITY) {
                    dist_b.insert(row.neighbor, next_cost);
                    parent_b.insert(row.neighbor, top.node);
                    heap_b.push(HeapEntry { cost: next_cost, node: row.neighbor });
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

    let m = meeting?;
    let fwd_path = walk_to_root(&parent_f, m);
    let mut bwd_path = walk_to_root(&parent_b, m);
    bwd_path.reverse();
    bwd_path.remove(0);
    Some(assemble(store, fwd_path, bwd_path, best))
}
