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

//! Four-phase contraction pipeline, built around one shared primitive:
//! "assign shortcuts to cells at a resolution, then run the SP kernel
//! within each cell". Grounded in
//! `processor_parallel.py::_assign_cell_to_shortcuts_worker` +
//! `_run_shortest_paths_worker` (the assign+SP cycle every phase repeats)
//! and `fast_graph_builder.rs`'s two-pass (forward then backward)
//! orchestration shape.
//!
//! `partition::assign` regroups by cell purely from a shortcut's own
//! `inner_cell`/`outer_cell`/`lca_res` fields, so folding children into a
//! coarser cell (concatenating children's shard tables) and re-assigning
//! at the coarser resolution are the same operation: running
//! `run_sp_cycle` again at the coarser `r` naturally merges whatever was
//! split across sibling cells at the finer `r`. Phase 1/2 and Phase 3/4
//! are therefore each a single loop over resolutions, differing only in
//! which thread pool backs a given `r` and, for the backward half, an
//! extra pre-filter that drops shortcuts no refinement can ever reach.

pub mod backward;
pub mod forward;

use rayon::prelude::*;

use crate::base_graph::BaseGraph;
use crate::constants::{Cell, Res};
use crate::partition;
use crate::shortcut::ActiveShortcut;
use crate::sp_kernel::{self, SpMethodKind};
use crate::enrich;

pub(crate) fn build_pool(workers: usize) -> rayon::ThreadPool {
    rayon::ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .build()
        .expect("building contraction worker pool")
}

/// One "assign, run SP kernel per cell, re-enrich, dedup" pass at a single
/// resolution. Returns `(active, deactivated)`: `active` carries on to the
/// next resolution, `deactivated` is final output for this pass.
pub(crate) fn run_sp_cycle(
    shortcuts: &[ActiveShortcut],
    r: Res,
    sp_method: SpMethodKind,
    hybrid_res: Res,
    base: &BaseGraph,
    pool: &rayon::ThreadPool,
) -> (Vec<ActiveShortcut>, Vec<ActiveShortcut>) {
    let assignment = partition::assign(shortcuts, r);
    let method = sp_method.resolve(r, hybrid_res);
    let groups: Vec<(Cell, Vec<ActiveShortcut>)> = assignment.groups.into_iter().collect();

    let active: Vec<ActiveShortcut> = pool.install(|| {
        groups
            .into_par_iter()
            .flat_map_iter(|(_cell, group)| {
                sp_kernel::run(&group, method).into_iter().map(|sc| {
                    match (base.edge(sc.from_edge), base.edge(sc.to_edge)) {
                        (Some(from_edge), Some(to_edge)) => enrich::recompute(&sc, from_edge, to_edge),
                        _ => sc,
                    }
                })
            })
            .collect()
    });

    let deduped = partition::dedup_min_cost(active);
    (deduped, assignment.deactivated)
}

/// A shortcut whose `max(inner_res, outer_res)` is below `r` can never be
/// assigned to any cell at a resolution finer than `r` again, so the
/// backward phases drop it outright instead of running it through another
/// assign+SP cycle.
pub(crate) fn unrefinable_at(sc: &ActiveShortcut, r: Res) -> bool {
    sc.inner_res.max(sc.outer_res) < r
}
