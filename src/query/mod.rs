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

//! Query engine entry point: seven algorithms behind a single dispatch
//! site — a tagged enum plus one `match`, not a trait object per
//! algorithm. Path reconstruction and `via_lookup` expansion are shared
//! here since every algorithm produces the same two path representations.

mod alternative;
mod classic;
mod dijkstra;
mod lca;
mod m2m;

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::constants::EdgeId;
use crate::error::{Error, Result};
use crate::graph_store::GraphStore;

/// Selects which of the seven single-pair algorithms a query runs. The
/// single dispatch site lives in `run` below; `m2m` takes multiple
/// sources/targets and so is reached through `run_m2m`/`route_m2m`
/// instead of this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryAlgorithm {
    UniDijkstra,
    BiDijkstra,
    Classic,
    UniLca,
    BiLca,
    BiLcaRes,
    Alternative,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    /// The sequence of base-edge ids a shortcut-level search visited.
    pub shortcut_path: Vec<EdgeId>,
    /// `shortcut_path` expanded through `via_lookup` down to base edges.
    pub base_path: Vec<EdgeId>,
    pub cost: f32,
}

/// Result shape for the string-dispatched, outward-facing entry points
/// (`route_by_edge`/`route_m2m`): the primary route plus, when asked for,
/// an alternative computed in the same call.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteResult {
    pub cost: f32,
    pub shortcut_path: Vec<EdgeId>,
    pub expanded_path: Vec<EdgeId>,
    pub alternative: Option<QueryResult>,
}

/// Maps an external algorithm name to the enum `run` dispatches on.
/// `dijkstra`/`unidirectional` both mean the unidirectional baseline;
/// `m2m` is accepted here for callers that route a single pair through the
/// `m2m` name, and degenerates to `classic` (the same inside-filtered
/// search with one source and one target). Unknown names default to
/// `classic`, matching the preprocessor CLI's own unknown-flag handling.
pub fn parse_algorithm_name(name: &str) -> QueryAlgorithm {
    match name {
        "dijkstra" | "unidirectional" => QueryAlgorithm::UniDijkstra,
        "bidijkstra" => QueryAlgorithm::BiDijkstra,
        "uni_lca" => QueryAlgorithm::UniLca,
        "bi_lca" => QueryAlgorithm::BiLca,
        "pruned" => QueryAlgorithm::BiLcaRes,
        _ => QueryAlgorithm::Classic,
    }
}

/// String-dispatched single-pair query: parses `algorithm_name` (defaulting
/// unknown names to `classic`), runs it, and optionally computes an
/// alternative in the same call by penalizing the primary path's hops and
/// re-routing with `uni_lca_penalized`.
pub fn route_by_edge(
    store: &GraphStore,
    source: EdgeId,
    target: EdgeId,
    algorithm_name: &str,
    include_alternative: bool,
    penalty_factor: f32,
) -> Result<RouteResult> {
    let primary = run(store, parse_algorithm_name(algorithm_name), source, target)?;

    let alternative = if include_alternative {
        let penalty_set: HashSet<(EdgeId, EdgeId)> =
            primary.shortcut_path.windows(2).map(|w| (w[0], w[1])).collect();
        Some(lca::uni_lca_penalized(store, source, target, &penalty_set, penalty_factor)?)
    } else {
        None
    };

    Ok(RouteResult {
        cost: primary.cost,
        shortcut_path: primary.shortcut_path,
        expanded_path: primary.base_path,
        alternative,
    })
}

/// Runs `algorithm` for a single `(source_edge, target_edge)` pair. This is
/// the crate's only match over `QueryAlgorithm`.
pub fn run(store: &GraphStore, algorithm: QueryAlgorithm, source: EdgeId, target: EdgeId) -> Result<QueryResult> {
    store.edge(source)?;
    store.edge(target)?;

    match algorithm {
        QueryAlgorithm::UniDijkstra => dijkstra::uni_dijkstra(store, source, target),
        QueryAlgorithm::BiDijkstra => dijkstra::bi_dijkstra(store, source, target),
        QueryAlgorithm::Classic => classic::classic(store, source, target),
        QueryAlgorithm::UniLca => lca::uni_lca(store, source, target),
        QueryAlgorithm::BiLca => lca::bi_lca(store, source, target),
        QueryAlgorithm::BiLcaRes => lca::bi_lca_res(store, source, target),
        QueryAlgorithm::Alternative => alternative::alternative(store, source, target, 2.0),
    }
}

/// Many-to-many variant of `classic`: multiple sources (each starting at
/// cost 0) and multiple targets (each starting at its own base edge cost,
/// per the bidirectional target-cost convention), used by the
/// nearest-k-edges coordinate query.
pub fn run_m2m(store: &GraphStore, sources: &[EdgeId], targets: &[EdgeId]) -> Result<QueryResult> {
    for &e in sources.iter().chain(targets.iter()) {
        store.edge(e)?;
    }
    m2m::m2m(store, sources, targets)
}

/// String-dispatched many-to-many query: same seeding as `run_m2m`, with
/// the same optional same-call alternative `route_by_edge` offers for a
/// single pair.
pub fn route_m2m(
    store: &GraphStore,
    sources: &[EdgeId],
    targets: &[EdgeId],
    include_alternative: bool,
    penalty_factor: f32,
) -> Result<RouteResult> {
    for &e in sources.iter().chain(targets.iter()) {
        store.edge(e)?;
    }
    m2m::m2m_by_edge(store, sources, targets, include_alternative, penalty_factor)
}

/// Min-heap entry over `(cost, node)`, ties broken by smaller node id so
/// repeated runs are deterministic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct HeapEntry {
    pub cost: f32,
    pub node: EdgeId,
}

impl Eq for HeapEntry {}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.node.cmp(&self.node).reverse())
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Walks `parent` from `start` toward its root (stopping when a node is
/// its own parent), returning the walked nodes in root-to-`start` order.
pub(crate) fn walk_to_root<K: Copy + Eq + std::hash::Hash>(
    parent: &std::collections::HashMap<K, K>,
    start: K,
) -> Vec<K> {
    let mut path = vec![start];
    let mut cur = start;
    loop {
        let p = parent[&cur];
        if p == cur {
            break;
        }
        path.push(p);
        cur = p;
    }
    path.reverse();
    path
}

/// Builds the full result from a meeting-point split: `fwd_path` runs
/// source -> meeting (inclusive), `bwd_path` runs meeting -> target
/// (exclusive of meeting, since `fwd_path` already has it).
pub(crate) fn assemble(store: &GraphStore, fwd_path: Vec<EdgeId>, bwd_path: Vec<EdgeId>, cost: f32) -> QueryResult {
    let mut shortcut_path = fwd_path;
    shortcut_path.extend(bwd_path);

    let mut base_path = Vec::new();
    for window in shortcut_path.windows(2) {
        let (u, v) = (window[0], window[1]);
        let mut visited = HashSet::new();
        let expanded = expand(store, u, v, &mut visited);
        if base_path.last() == expanded.first() {
            base_path.extend(expanded.into_iter().skip(1));
        } else {
            base_path.extend(expanded);
        }
    }
    if base_path.is_empty() {
        base_path = shortcut_path.clone();
    }

    QueryResult { shortcut_path, base_path, cost }
}

/// Expands one shortcut hop `(u, v)` down to base edges via `via_lookup`:
/// `[u, v]` directly if there's no recorded via edge, or if it is
/// absent/zero/equal to `u`/`v` (all sentinel for "base pair"); otherwise
/// recurses through `via`. `visited` guards against cycles in the
/// expansion table.
pub(crate) fn expand(store: &GraphStore, u: EdgeId, v: EdgeId, visited: &mut HashSet<(EdgeId, EdgeId)>) -> Vec<EdgeId> {
    if !visited.insert((u, v)) {
        return vec![u, v];
    }
    match store.via_lookup(u, v) {
        Some(via) if via != 0 && via != u && via != v => {
            let mut head = expand(store, u, via, visited);
            let tail = expand(store, via, v, visited);
            head.extend(tail.into_iter().skip(1));
            head
        }
        _ => vec![u, v],
    }
}

pub(crate) fn not_reachable(source: EdgeId, target: EdgeId) -> Error {
    Error::QueryNotReachable { source_edge: source, target_edge: target }
}
