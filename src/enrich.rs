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

//! Recomputes `inner_cell`/`outer_cell`/`inner_res`/`outer_res`/`lca_res`
//! for a shortcut after the SP kernel refreshes its `cost`/`via_edge`.
//! Grounded in `_run_shortest_paths_worker`'s "Re-enrich" join against
//! `edges` (`processor_parallel.py:558-571`).

use crate::base_graph::BaseEdge;
use crate::hierarchy;
use crate::shortcut::ActiveShortcut;

pub fn recompute(sc: &ActiveShortcut, from_edge: &BaseEdge, to_edge: &BaseEdge) -> ActiveShortcut {
    let inner = hierarchy::lca(from_edge.to_cell, to_edge.from_cell);
    let outer = hierarchy::lca(from_edge.from_cell, to_edge.to_cell);
    ActiveShortcut {
        inner_cell: inner.0,
        outer_cell: outer.0,
        inner_res: inner.1,
        outer_res: outer.1,
        lca_res: from_edge.lca_res.max(to_edge.lca_res),
        ..*sc
    }
}
