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

//! `alternative`: reruns `uni_lca` with edges overlapping the primary path
//! penalized, so the result diverges from the shortest route instead of
//! reproducing it.

use std::collections::HashSet;

use crate::constants::EdgeId;
use crate::error::Result;
use crate::graph_store::GraphStore;

use super::{lca, QueryResult};

pub fn alternative(store: &GraphStore, source: EdgeId, target: EdgeId, penalty_factor: f32) -> Result<QueryResult> {
    let primary = lca::uni_lca(store, source, target)?;
    let penalty_set: HashSet<(EdgeId, EdgeId)> =
        primary.shortcut_path.windows(2).map(|w| (w[0], w[1])).collect();
    lca::uni_lca_penalized(store, source, target, &penalty_set, penalty_factor)
}
