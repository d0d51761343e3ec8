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

//! Deterministic shortcut-to-cell membership. Grounded in
//! `processor_parallel.py::_assign_cell_to_shortcuts_worker` /
//! `_process_cell_forward_worker`'s expand-via-UNION SQL, translated to
//! plain grouping over `Vec<ActiveShortcut>` — no SQL engine in this
//! crate, so the grouping happens in memory.

use std::collections::HashMap;

use crate::constants::{Cell, Res};
use crate::hierarchy;
use crate::shortcut::ActiveShortcut;

/// The cell(s) a shortcut belongs to at `target_res`. A shortcut may
/// belong to zero, one, or two cells.
pub fn cells_at(shortcut: &ActiveShortcut, target_res: Res) -> Vec<Cell> {
    if target_res < 0 {
        return vec![crate::constants::ROOT_CELL];
    }
    if shortcut.lca_res > target_res {
        return Vec::new();
    }
    let mut out = Vec::new();
    if shortcut.inner_res >= target_res {
        out.push(hierarchy::parent(shortcut.inner_cell, target_res));
    }
    if shortcut.outer_res >= target_res {
        let c = hierarchy::parent(shortcut.outer_cell, target_res);
        if !out.contains(&c) {
            out.push(c);
        }
    }
    out
}

/// Groups shortcuts into per-cell buckets at `target_res`. Shortcuts with
/// no assignment are returned separately as "deactivated" — they've
/// climbed past their relevant resolution and drop out of further
/// contraction.
pub struct Assignment {
    pub groups: HashMap<Cell, Vec<ActiveShortcut>>,
    pub deactivated: Vec<ActiveShortcut>,
}

pub fn assign(shortcuts: &[ActiveShortcut], target_res: Res) -> Assignment {
    let mut groups: HashMap<Cell, Vec<ActiveShortcut>> = HashMap::new();
    let mut deactivated = Vec::new();

    for sc in shortcuts {
        let cells = cells_at(sc, target_res);
        if cells.is_empty() {
            deactivated.push(*sc);
            continue;
        }
        for c in cells {
            groups.entry(c).or_default().push(*sc);
        }
    }

    Assignment { groups, deactivated }
}

/// Dedups a list of shortcuts by `(from_edge, to_edge)`, keeping the
/// minimum cost and, on ties, the smallest `via_edge`, matching
/// `processor_parallel.py`'s `MIN(cost), arg_min(via_edge, cost)` merge.
pub fn dedup_min_cost(shortcuts: impl IntoIterator<Item = ActiveShortcut>) -> Vec<ActiveShortcut> {
    let mut best: HashMap<(u32, u32), ActiveShortcut> = HashMap::new();
    for sc in shortcuts {
        let key = sc.key();
        match best.get(&key) {
            Some(existing) if (existing.cost, existing.via_edge) <= (sc.cost, sc.via_edge) => {}
            _ => {
                best.insert(key, sc);
            }
        }
    }
    best.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::from_digits;

    fn sc_at(inner: u64, outer: u64, inner_res: Res, outer_res: Res, lca_res: Res) -> ActiveShortcut {
        ActiveShortcut {
            from_edge: 0,
            to_edge: 1,
            cost: 1.0,
            via_edge: 0,
            inner_cell: inner,
            outer_cell: outer,
            inner_res,
            outer_res,
            lca_res,
        }
    }

    #[test]
    fn root_level_assigns_everything_to_cell_zero() {
        let sc = sc_at(1, 1, 5, 5, 0);
        assert_eq!(cells_at(&sc, -1), vec![crate::constants::ROOT_CELL]);
    }

    #[test]
    fn below_lca_res_is_inactive() {
        let sc = sc_at(1, 1, 5, 5, 6);
        assert!(cells_at(&sc, 5).is_empty());
    }

    #[test]
    fn belongs_to_both_inner_and_outer_when_both_qualify() {
        let inner = from_digits(1, &[1, 2, 3]);
        let outer = from_digits(1, &[4, 5, 6]);
        let sc = sc_at(inner, outer, 3, 3, 0);
        let cells = cells_at(&sc, 3);
        assert_eq!(cells.len(), 2);
    }

    #[test]
    fn dedup_keeps_min_cost_then_min_via() {
        let a = ActiveShortcut { from_edge: 0, to_edge: 1, cost: 2.0, via_edge: 9, ..sc_at(1, 1, 0, 0, 0) };
        let b = ActiveShortcut { from_edge: 0, to_edge: 1, cost: 1.0, via_edge: 3, ..sc_at(1, 1, 0, 0, 0) };
        let c = ActiveShortcut { from_edge: 0, to_edge: 1, cost: 1.0, via_edge: 1, ..sc_at(1, 1, 0, 0, 0) };
        let out = dedup_min_cost(vec![a, b, c]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].via_edge, 1);
    }
}
