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

//! Running the full contraction pipeline twice over the same base graph
//! must produce the same finalized shortcut table.

use h3route_core::base_graph::{BaseEdge, BaseGraph};
use h3route_core::config::{AlgorithmConfig, ParallelConfig};
use h3route_core::graph_store::{GraphStore, PersistedDataset};
use h3route_core::hierarchy::from_digits;
use h3route_core::query::{self, QueryAlgorithm};
use h3route_core::shortcut::Shortcut;
use h3route_core::sp_kernel::SpMethodKind;

fn small_chain() -> BaseGraph {
    let trunk = [1u8, 2, 3];
    let cell_for = |leaf: u8| {
        let mut digits = trunk.to_vec();
        digits.push(leaf);
        from_digits(1, &digits)
    };

    let edges = vec![
        BaseEdge { id: 0, from_cell: cell_for(1), to_cell: cell_for(2), lca_res: 3, length: 10.0, cost: 1.0, geometry: String::new() },
        BaseEdge { id: 1, from_cell: cell_for(2), to_cell: cell_for(3), lca_res: 3, length: 10.0, cost: 1.0, geometry: String::new() },
        BaseEdge { id: 2, from_cell: cell_for(3), to_cell: cell_for(4), lca_res: 3, length: 10.0, cost: 1.0, geometry: String::new() },
    ];
    let adjacency = vec![(0, 1), (1, 2)];
    BaseGraph::new(edges, adjacency)
}

fn sorted(mut shortcuts: Vec<Shortcut>) -> Vec<Shortcut> {
    shortcuts.sort_by_key(|s| (s.from_edge, s.to_edge, s.via_edge));
    shortcuts
}

#[test]
fn rebuilding_the_same_base_graph_yields_the_same_shortcuts() {
    let base = small_chain();
    let algorithm = AlgorithmConfig::default();
    let parallel = ParallelConfig { workers: 1, workers_phase1: Some(1), workers_phase4: Some(1) };

    let first = sorted(h3route_core::build_shortcuts(&base, &algorithm, &parallel));
    let second = sorted(h3route_core::build_shortcuts(&base, &algorithm, &parallel));

    assert_eq!(first, second);
    assert!(!first.is_empty());
}

#[test]
fn random_graphs_contract_deterministically_across_seeds() {
    let algorithm = AlgorithmConfig::default();
    let parallel = ParallelConfig { workers: 1, workers_phase1: Some(1), workers_phase4: Some(1) };

    for seed in [1u64, 2, 3] {
        let base = BaseGraph::random(seed, 20);
        let first = sorted(h3route_core::build_shortcuts(&base, &algorithm, &parallel));
        let second = sorted(h3route_core::build_shortcuts(&base, &algorithm, &parallel));
        assert_eq!(first, second, "seed {seed} produced non-deterministic shortcuts");
    }
}

/// Forcing the scipy-backed SP kernel through the real three-hop chain
/// must still produce a shortcut table whose `via_edge` chain expands
/// back down to every intermediate base edge, not just the endpoints.
#[test]
fn scipy_backed_contraction_expands_through_every_intermediate_hop() {
    let base = small_chain();
    let algorithm = AlgorithmConfig { sp_method: SpMethodKind::Scipy, ..AlgorithmConfig::default() };
    let parallel = ParallelConfig { workers: 1, workers_phase1: Some(1), workers_phase4: Some(1) };

    let shortcuts = h3route_core::build_shortcuts(&base, &algorithm, &parallel);
    assert!(!shortcuts.is_empty());

    let dataset = PersistedDataset {
        name: "scipy-roundtrip".into(),
        created_at: chrono::Utc::now(),
        edges: base.edges().to_vec(),
        shortcuts,
        boundary_geojson: None,
    };
    let store = GraphStore::from_persisted(dataset);

    let result = query::run(&store, QueryAlgorithm::Classic, 0, 2).unwrap();
    assert_eq!(result.base_path, vec![0, 1, 2]);
    assert!((result.cost - 2.0).abs() < 1e-6);
}
