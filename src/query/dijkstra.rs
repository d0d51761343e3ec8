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

//! `uni_dijkstra` and `bi_dijkstra`: the unfiltered baselines every other
//! algorithm is checked against. Heap mechanics mirror `sp_kernel.rs`'s
//! reversed-`Ord` `BinaryHeap` trick.

use std::collections::{BinaryHeap, HashMap};

use crate::constants::EdgeId;
use crate::error::Result;
use crate::graph_store::GraphStore;

use super::{assemble, not_reachable, walk_to_root, HeapEntry, QueryResult};

pub fn uni_dijkstra(store: &GraphStore, source: EdgeId, target: EdgeId) -> Result<QueryResult> {
    let mut dist: HashMap<EdgeId, f32> = HashMap::new();
    let mut parent: HashMap<EdgeId, EdgeId> = HashMap::new();
    dist.insert(source, 0.0);
    parent.insert(source, source);

    let mut heap = BinaryHeap::new();
    heap.push(HeapEntry { cost: 0.0, node: source });

    while let Some(top) = heap.pop() {
        if top.cost > *dist.get(&top.node).unwrap_or(&f32::INFINITY) {
            continue;
        }
        if top.node == target {
            break;
        }
        for row in store.fwd(top.node) {
            let next_cost = top.cost + row.cost;
            if next_cost < *dist.get(&row.neighbor).unwrap_or(&f32::INFINITY) {
                dist.insert(row.neighbor, next_cost);
                parent.insert(row.neighbor, top.node);
                heap.push(HeapEntry { cost: next_cost, node: row.neighbor });
            }
        }
    }

    let shortcut_cost = *dist.get(&target).ok_or_else(|| not_reachable(source, target))?;
    let total = shortcut_cost + store.edge(target)?.cost;
    let path = walk_to_root(&parent, target);
    Ok(assemble(store, path, Vec::new(), total))
}

pub fn bi_dijkstra(store: &GraphStore, source: EdgeId, target: EdgeId) -> Result<QueryResult> {
    let target_cost = store.edge(target)?.cost;

    let mut dist_f: HashMap<EdgeId, f32> = HashMap::new();
    let mut parent_f: HashMap<EdgeId, EdgeId> = HashMap::new();
    dist_f.insert(source, 0.0);
    parent_f.insert(source, source);
    let mut heap_f = BinaryHeap::new();
    heap_f.push(HeapEntry { cost: 0.0, node: source });

    // target cost convention: dist_bwd[target] = cost(target).
    let mut dist_b: HashMap<EdgeId, f32> = HashMap::new();
    let mut parent_b: HashMap<EdgeId, EdgeId> = HashMap::new();
    dist_b.insert(target, target_cost);
    parent_b.insert(target, target);
    let mut heap_b = BinaryHeap::new();
    heap_b.push(HeapEntry { cost: target_cost, node: target });

    let mut best = f32::INFINITY;
    let mut meeting: Option<EdgeId> = None;

    loop {
        let top_f = heap_f.peek().map(|e| e.cost).unwrap_or(f32::INFINITY);
        let top_b = heap_b.peek().map(|e| e.cost).unwrap_or(f32::INFINITY);
        if top_f == f32::INFINITY && top_b == f32::INFINITY {
            break;
        }
        if top_f + top_b >= best {
            break;
        }

        // Alternate sides by smaller top-of-heap.
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
                for row in store.fwd(top.node) {
                    let next_cost = top.cost + row.cost;
                    if next_cost < *dist_f.get(&row.neighbor).unwrap_or(&f32::INFINITY) {
                        dist_f.insert(row.neighbor, next_cost);
                        parent_f.insert(row.neighbor, top.node);
                        heap_f.push(HeapEntry { cost: next_cost, node: row.neighbor });
                    }
                    if let Some(&db) = dist_b.get(&row.neighbor) {
                        let total = next_cost.min(*dist_f.get(&row.neighbor).unwrap()) + db;
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
            for row in store.bwd(top.node) {
                let next_cost = top.cost + row.cost;
                if next_cost < *dist_b.get(&row.neighbor).unwrap_or(&f32::INFINITY) {
                    dist_b.insert(row.neighbor, next_cost);
                    parent_b.insert(row.neighbor, top.node);
                    heap_b.push(HeapEntry { cost: next_cost, node: row.neighbor });
                }
                if let Some(&df) = dist_f.get(&row.neighbor) {
                    let total = df + next_cost.min(*dist_b.get(&row.neighbor).unwrap());
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
