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

//! Forward contraction: Phase 1 (parallel, fine-to-`partition_res`) then
//! Phase 2 (sequential, `partition_res - 1` down to the root). Starts
//! from the elementary shortcuts built off the base graph's dual
//! adjacency and walks resolutions from 15 down to -1, handing `r >=
//! partition_res` to the `workers_phase1`-sized pool and everything
//! coarser to the general worker pool.

use crate::base_graph::BaseGraph;
use crate::config::{AlgorithmConfig, ParallelConfig};
use crate::contractor::{build_pool, run_sp_cycle};
use crate::graph_store;
use crate::shortcut::ActiveShortcut;

/// Runs the forward pass to completion and returns every shortcut that was
/// deactivated along the way, plus whatever survives at the root (r = -1),
/// which by construction is itself a terminal shard.
pub fn run(base: &BaseGraph, algorithm: &AlgorithmConfig, parallel: &ParallelConfig) -> Vec<ActiveShortcut> {
    let phase1_pool = build_pool(parallel.phase1_workers());
    let phase2_pool = build_pool(parallel.workers);

    let mut shortcuts = graph_store::elementary_shortcuts(base);
    let mut forward_deactivated = Vec::new();
    log::info!("forward contraction: {} elementary shortcuts", shortcuts.len());

    for r in (-1..=15i8).rev() {
        let pool = if r >= algorithm.partition_res { &phase1_pool } else { &phase2_pool };
        let (active, deactivated) =
            run_sp_cycle(&shortcuts, r, algorithm.sp_method, algorithm.hybrid_res, base, pool);
        log::debug!(
            "forward r={} active={} deactivated_this_round={}",
            r,
            active.len(),
            deactivated.len()
        );
        forward_deactivated.extend(deactivated);
        shortcuts = active;
    }

    // Whatever is still active after r = -1 belongs to the universal root
    // cell and has nowhere further to go; it feeds the backward pass the
    // same as any other deactivated shortcut.
    forward_deactivated.extend(shortcuts);
    log::info!("forward contraction done: {} shortcuts total", forward_deactivated.len());
    forward_deactivated
}
