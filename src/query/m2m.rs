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

//! `m2m`: `classic`'s `inside`-filtered bidirectional search, seeded from
//! multiple sources (each starting at cost 0) and multiple targets (each
//! starting at its own base edge cost), used by the nearest-k-edges
//! coordinate query to find the cheapest pair among many candidates in one
//! search instead of running `classic` once per pair.

use std::collections::HashSet;

use crate::constants::EdgeId;
use crate::error::Result;
use crate::graph_store::GraphStore;

use super::classic::bidirectional;
use super::{lca, not_reachable, QueryResult, RouteResult};

pub fn m2m(store: &GraphStore, sources: &[EdgeId], targets: &[EdgeId]) -> Result<QueryResult> {
    let src_seeds: Vec<(EdgeId, f32)> = sources.iter().map(|&s| (s, 0.0)).collect();
    let mut tgt_seeds = Vec::with_capacity(targets.len());
    for &t in targets {
        tgt_seeds.push((t, store.edge(t)?.cost));
    }
    bidirectional(store, &src_seeds, &tgt_seeds).ok_or_else(|| {
        not_reachable(sources.first().copied().unwrap_or(0), targets.first().copied().unwrap_or(0))
    })
}

/// `m2m` plus, optionally, an alternative: the primary result's actual
/// endpoints (first/last edge of the winning pair, not the full source/
/// target sets) are penalized and re-routed with `uni_lca_penalized`, the
/// same detour technique `alternative` uses for a single pair.
pub fn m2m_by_edge(
    store: &GraphStore,
    sources: &[EdgeId],
    targets: &[EdgeId],
    include_alternative: bool,
    penalty_factor: f32,
) -> Result<RouteResult> {
    let primary = m2m(store, sources, targets)?;
    let alternative = if include_alternative {
        let winning_source = *primary.shortcut_path.first().unwrap();
        let winning_target = *primary.shortcut_path.last().unwrap();
        let penalty_set: HashSet<(EdgeId, EdgeId)> =
            primary.shortcut_path.windows(2).map(|w| (w[0], w[1])).collect();
        Some(lca::uni_lca_penalized(store, winning_source, winning_target, &penalty_set, penalty_factor)?)
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
