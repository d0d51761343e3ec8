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

//! Hierarchical routing preprocessor and query engine over a hexagonal
//! spatial tessellation. The preprocessor (`bin/shortcut_gen.rs`) builds a
//! persisted shortcut dataset from a base road network; the library facade
//! here (`Router`) loads that dataset and answers point-to-point and
//! many-to-many queries against it.

pub mod base_graph;
pub mod config;
pub mod constants;
pub mod contractor;
pub mod dataset;
pub mod enrich;
pub mod error;
pub mod finalize;
pub mod graph_store;
pub mod hierarchy;
pub mod partition;
pub mod query;
pub mod shortcut;
pub mod sp_kernel;

use std::path::Path;

pub use constants::{Cell, EdgeId, Res, Weight};
pub use error::{Error, Result};
pub use query::{QueryAlgorithm, QueryResult, RouteResult};

use dataset::Registry;

/// Public facade over a process-wide dataset registry.
/// Load/unload are serialized against queries internally; queries borrow
/// an `Arc`-shared immutable snapshot so an unload never invalidates a
/// query already in flight.
#[derive(Default)]
pub struct Router {
    registry: Registry,
}

impl Router {
    pub fn new() -> Self {
        Router { registry: Registry::new() }
    }

    pub fn load_dataset(&self, name: &str, path: &Path) -> Result<()> {
        self.registry.load(name, path)
    }

    pub fn unload_dataset(&self, name: &str) -> Result<()> {
        self.registry.unload(name)
    }

    /// Answers a single `(source_edge, target_edge)` query against
    /// `dataset` using `algorithm`.
    pub fn route(
        &self,
        dataset: &str,
        algorithm: QueryAlgorithm,
        source_edge: EdgeId,
        target_edge: EdgeId,
    ) -> Result<QueryResult> {
        let store = self.registry.get(dataset)?;
        query::run(&store, algorithm, source_edge, target_edge)
    }

    /// Many-to-many query: multiple sources and targets, used by the
    /// nearest-k-edges coordinate query.
    pub fn route_m2m(&self, dataset: &str, sources: &[EdgeId], targets: &[EdgeId]) -> Result<QueryResult> {
        let store = self.registry.get(dataset)?;
        query::run_m2m(&store, sources, targets)
    }

    /// String-dispatched single-pair query (`dijkstra`, `bidijkstra`,
    /// `classic`, `unidirectional`, `uni_lca`, `bi_lca`, `pruned`, `m2m`;
    /// unknown names default to `classic`), with an alternative optionally
    /// computed in the same call.
    pub fn route_by_edge(
        &self,
        dataset: &str,
        source_edge: EdgeId,
        target_edge: EdgeId,
        algorithm: &str,
        include_alternative: bool,
        penalty_factor: f32,
    ) -> Result<RouteResult> {
        let store = self.registry.get(dataset)?;
        query::route_by_edge(&store, source_edge, target_edge, algorithm, include_alternative, penalty_factor)
    }

    /// String-dispatched many-to-many query, mirroring `route_by_edge`'s
    /// optional same-call alternative.
    pub fn route_m2m_by_edge(
        &self,
        dataset: &str,
        sources: &[EdgeId],
        targets: &[EdgeId],
        include_alternative: bool,
        penalty_factor: f32,
    ) -> Result<RouteResult> {
        let store = self.registry.get(dataset)?;
        query::route_m2m(&store, sources, targets, include_alternative, penalty_factor)
    }
}

/// Runs the full four-phase contraction pipeline over `base` and returns
/// the finalized shortcut table. This is what `bin/shortcut_gen.rs`
/// drives to build a dataset from scratch.
pub fn build_shortcuts(
    base: &base_graph::BaseGraph,
    algorithm: &config::AlgorithmConfig,
    parallel: &config::ParallelConfig,
) -> Vec<shortcut::Shortcut> {
    let forward_deactivated = contractor::forward::run(base, algorithm, parallel);
    let backward_deactivated = contractor::backward::run(forward_deactivated, base, algorithm, parallel);
    finalize::finalize(backward_deactivated, base)
}
