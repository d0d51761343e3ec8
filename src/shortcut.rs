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

use serde::{Deserialize, Serialize};

use crate::constants::{Cell, EdgeId, Res, Weight};

/// A shortest path in the dual (edge-based) graph, as it flows through the
/// contraction pipeline. Before finalization, `cell`/`inside` are unset;
/// `ActiveShortcut` below carries them through the working tables and
/// `Shortcut` is the finalized, persisted form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveShortcut {
    pub from_edge: EdgeId,
    pub to_edge: EdgeId,
    pub cost: Weight,
    pub via_edge: EdgeId,
    pub inner_cell: Cell,
    pub outer_cell: Cell,
    pub inner_res: Res,
    pub outer_res: Res,
    pub lca_res: Res,
}

impl ActiveShortcut {
    /// Cell assignment key used by `current_cell = parent(inner_or_outer, r)`.
    /// Tie-break `via_edge` is used by the SP kernel.
    pub fn key(&self) -> (EdgeId, EdgeId) {
        (self.from_edge, self.to_edge)
    }
}

/// The finalized, persisted shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shortcut {
    pub from_edge: EdgeId,
    pub to_edge: EdgeId,
    pub cost: Weight,
    pub via_edge: EdgeId,
    pub inside: i8,
    pub cell: Cell,
    pub cell_res: Res,
}
