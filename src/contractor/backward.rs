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

//! Backward contraction: Phase 3 (sequential, root down to `partition_res
//! - 1`) then Phase 4 (parallel, `partition_res` up to 15). Takes the
//! forward pass's output as input and refines it the other way, dropping
//! shortcuts that have run out of resolutions to be refined into along
//! the way.

use crate::base_graph::BaseGraph;
use crate::config::{AlgorithmConfig, ParallelConfig};
use crate::contractor::{build_pool, run_sp_cycle, unrefinable_at};
use crate::shortcut::ActiveShortcut;

/// Runs the backward pass over `forward_deactivated` and returns the final
/// backward-deactivated set: every shortcut either hit its resolution
/// ceiling and was dropped, or survived to r = 15 and is appended whole.
pub fn run(
    forward_deactivated: Vec<ActiveShortcut>,
    base: &BaseGraph,
    algorithm: &AlgorithmConfig,
    parallel: &ParallelConfig,
) -> Vec<ActiveShortcut> {
    let phase3_pool = build_pool(parallel.workers);
    let phase4_pool = build_pool(parallel.phase4_workers());

    let mut shortcuts = forward_deactivated;
    let mut backward_deactivated = Vec::new();
    log::info!("backward contraction: {} shortcuts to refine", shortcuts.len());

    for r in 0..=15i8 {
        let (keep, drop): (Vec<ActiveShortcut>, Vec<ActiveShortcut>) =
            shortcuts.into_iter().partition(|sc| !unrefinable_at(sc, r));
        backward_deactivated.extend(drop);

        if keep.is_empty() {
            shortcuts = keep;
            continue;
        }

        let pool = if r < algorithm.partition_res { &phase3_pool } else { &phase4_pool };
        let (active, deactivated) =
            run_sp_cycle(&keep, r, algorithm.sp_method, algorithm.hybrid_res, base, pool);
        log::debug!(
            "backward r={} active={} deactivated_this_round={}",
            r,
            active.len(),
            deactivated.len()
        );
        backward_deactivated.extend(deactivated);
        shortcuts = active;
    }

    backward_deactivated.extend(shortcuts);
    log::info!("backward contraction done: {} shortcuts total", backward_deactivated.len());
    backward_deactivated
}
