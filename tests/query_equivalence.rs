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

//! All six non-penalized query algorithms must agree on cost for every
//! reachable pair, and agree on unreachability otherwise. `alternative`
//! is excluded by design — it deliberately detours off the cheapest
//! route.

use h3route_core::base_graph::BaseEdge;
use h3route_core::graph_store::{GraphStore, PersistedDataset};
use h3route_core::hierarchy::from_digits;
use h3route_core::query::{self, QueryAlgorithm};
use h3route_core::shortcut::Shortcut;

const ALGORITHMS: &[QueryAlgorithm] = &[
    QueryAlgorithm::UniDijkstra,
    QueryAlgorithm::BiDijkstra,
    QueryAlgorithm::Classic,
    QueryAlgorithm::UniLca,
    QueryAlgorithm::BiLca,
    QueryAlgorithm::BiLcaRes,
];

fn build_store() -> GraphStore {
    let cell = from_digits(1, &[1, 1]);
    let edges: Vec<BaseEdge> = (0..5)
        .map(|id| BaseEdge { id, from_cell: cell, to_cell: cell, lca_res: 2, length: 1.0, cost: 1.0, geometry: String::new() })
        .collect();

    let shortcuts = vec![
        Shortcut { from_edge: 0, to_edge: 1, cost: 1.0, via_edge: 0, inside: 1, cell: 0, cell_res: 5 },
        Shortcut { from_edge: 1, to_edge: 3, cost: 1.0, via_edge: 1, inside: 1, cell: 0, cell_res: 5 },
        Shortcut { from_edge: 0, to_edge: 4, cost: 1.0, via_edge: 0, inside: 1, cell: 0, cell_res: 5 },
        Shortcut { from_edge: 4, to_edge: 3, cost: 1.0, via_edge: 4, inside: 1, cell: 0, cell_res: 5 },
    ];

    let dataset = PersistedDataset {
        name: "equivalence".into(),
        created_at: chrono::Utc::now(),
        edges,
        shortcuts,
        boundary_geojson: None,
    };
    GraphStore::from_persisted(dataset)
}

#[test]
fn every_algorithm_agrees_on_cost_for_every_reachable_pair() {
    let store = build_store();
    let edges = [0u32, 1, 2, 3, 4];

    for &source in &edges {
        for &target in &edges {
            let mut costs = Vec::new();
            let mut unreachable = Vec::new();
            for &algorithm in ALGORITHMS {
                match query::run(&store, algorithm, source, target) {
                    Ok(result) => costs.push((algorithm, result.cost)),
                    Err(_) => unreachable.push(algorithm),
                }
            }

            assert!(
                costs.is_empty() || unreachable.is_empty(),
                "source={source} target={target}: some algorithms reached ({costs:?}) \
                 while others did not ({unreachable:?})"
            );

            if let Some(&(_, first_cost)) = costs.first() {
                for &(algorithm, cost) in &costs {
                    assert!(
                        (cost - first_cost).abs() < 1e-2,
                        "source={source} target={target}: {algorithm:?} cost {cost} \
                         disagrees with {first_cost}"
                    );
                }
            }
        }
    }
}
