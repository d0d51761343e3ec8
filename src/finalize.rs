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

//! Shortcut finalizer: dedups the backward-deactivated set, computes
//! `inside`/`cell`/`cell_res` by joining against base edges, and discards
//! shortcuts the query engine could never reach. Grounded in the
//! dedup/join mechanics already shared with `partition.rs`, plus the
//! `inside == -2` rule resolved from `query_pruned_fast.py:111` (see
//! `DESIGN.md`).

use crate::base_graph::BaseGraph;
use crate::constants::Res;
use crate::hierarchy;
use crate::partition;
use crate::shortcut::{ActiveShortcut, Shortcut};

/// Runs the finalizer over the backward pass's output and returns the
/// persisted shortcut table.
pub fn finalize(backward_deactivated: Vec<ActiveShortcut>, base: &BaseGraph) -> Vec<Shortcut> {
    let deduped = partition::dedup_min_cost(backward_deactivated);
    let mut out = Vec::with_capacity(deduped.len());

    for sc in deduped {
        let (Some(from_edge), Some(to_edge)) = (base.edge(sc.from_edge), base.edge(sc.to_edge)) else {
            continue;
        };

        if sc.lca_res > sc.inner_res && sc.lca_res > sc.outer_res {
            continue;
        }

        let lca_in = from_edge.lca_res;
        let lca_out = to_edge.lca_res;

        let inside = finalize_inside(&sc, lca_in, lca_out);
        let cell_res = lca_in.min(lca_out);
        let cell = hierarchy::parent(sc.outer_cell, cell_res);

        out.push(Shortcut {
            from_edge: sc.from_edge,
            to_edge: sc.to_edge,
            cost: sc.cost,
            via_edge: sc.via_edge,
            inside,
            cell,
            cell_res,
        });
    }

    out
}

fn finalize_inside(sc: &ActiveShortcut, lca_in: Res, lca_out: Res) -> i8 {
    if sc.lca_res > sc.inner_res {
        -2
    } else if lca_in == lca_out {
        0
    } else if lca_in < lca_out {
        -1
    } else {
        1
    }
}

/// Bookkeeping persisted alongside the shortcut table.
pub struct DatasetInfo {
    pub name: String,
    pub edge_count: usize,
    pub shortcut_count: usize,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub boundary_geojson: Option<String>,
}

pub fn dataset_info(name: &str, base: &BaseGraph, shortcuts: &[Shortcut], boundary_geojson: Option<String>) -> DatasetInfo {
    DatasetInfo {
        name: name.to_string(),
        edge_count: base.num_edges(),
        shortcut_count: shortcuts.len(),
        created_at: chrono::Utc::now(),
        boundary_geojson,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shortcut::ActiveShortcut;

    fn sc(lca_res: Res, inner_res: Res, outer_res: Res) -> ActiveShortcut {
        ActiveShortcut {
            from_edge: 0,
            to_edge: 1,
            cost: 1.0,
            via_edge: 0,
            inner_cell: 7,
            outer_cell: 9,
            inner_res,
            outer_res,
            lca_res,
        }
    }

    #[test]
    fn inside_is_minus_two_when_lca_res_exceeds_inner_res() {
        let s = sc(5, 3, 6);
        assert_eq!(finalize_inside(&s, 2, 2), -2);
    }

    #[test]
    fn inside_is_lateral_when_lca_in_equals_lca_out() {
        let s = sc(0, 5, 5);
        assert_eq!(finalize_inside(&s, 3, 3), 0);
    }

    #[test]
    fn inside_is_downward_when_lca_in_less_than_lca_out() {
        let s = sc(0, 5, 5);
        assert_eq!(finalize_inside(&s, 2, 4), -1);
    }

    #[test]
    fn inside_is_upward_otherwise() {
        let s = sc(0, 5, 5);
        assert_eq!(finalize_inside(&s, 4, 2), 1);
    }
}
