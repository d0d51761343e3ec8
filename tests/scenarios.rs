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

//! Hand-built, small-graph regression tests for each query algorithm's
//! documented behavior: identity queries, the literal two-hop cost
//! example, resolution-pruned search, many-to-many seeding, alternative
//! routing, and unknown-edge errors.

use h3route_core::base_graph::BaseEdge;
use h3route_core::error::Error;
use h3route_core::graph_store::{GraphStore, PersistedDataset};
use h3route_core::hierarchy::from_digits;
use h3route_core::query::{self, QueryAlgorithm};
use h3route_core::shortcut::Shortcut;

fn edge(id: u32, cost: f32) -> BaseEdge {
    let cell = from_digits(1, &[1, 1]);
    BaseEdge { id, from_cell: cell, to_cell: cell, lca_res: 2, length: cost, cost, geometry: String::new() }
}

fn store_of(num_edges: u32, shortcuts: Vec<Shortcut>) -> GraphStore {
    let edges: Vec<BaseEdge> = (0..num_edges).map(|id| edge(id, 1.0)).collect();
    let dataset = PersistedDataset {
        name: "scenario".into(),
        created_at: chrono::Utc::now(),
        edges,
        shortcuts,
        boundary_geojson: None,
    };
    GraphStore::from_persisted(dataset)
}

#[test]
fn classic_identity_query_costs_the_edge_itself() {
    let store = store_of(1, Vec::new());
    let result = query::run(&store, QueryAlgorithm::Classic, 0, 0).unwrap();
    assert_eq!(result.shortcut_path, vec![0]);
    assert!((result.cost - 1.0).abs() < 1e-6);
}

#[test]
fn classic_two_hop_matches_literal_example() {
    let sc = Shortcut { from_edge: 0, to_edge: 2, cost: 1.5, via_edge: 0, inside: 1, cell: 0, cell_res: 0 };
    let store = store_of(3, vec![sc]);
    let result = query::run(&store, QueryAlgorithm::Classic, 0, 2).unwrap();
    assert_eq!(result.shortcut_path, vec![0, 2]);
    assert!((result.cost - 2.5).abs() < 1e-6);
}

#[test]
fn bi_lca_res_ascends_then_descends_through_the_peak() {
    // 0 ascends (inside=1) into 1; 1 descends (inside=-1) into the target
    // 2. Forward can only ever follow `inside == 1`, so it dead-ends at 1;
    // the descent is only reachable by expanding backward from the target.
    let rise = Shortcut { from_edge: 0, to_edge: 1, cost: 1.0, via_edge: 0, inside: 1, cell: 0, cell_res: 5 };
    let fall = Shortcut { from_edge: 1, to_edge: 2, cost: 1.0, via_edge: 1, inside: -1, cell: 0, cell_res: 5 };
    let store = store_of(3, vec![rise, fall]);
    let result = query::run(&store, QueryAlgorithm::BiLcaRes, 0, 2).unwrap();
    assert_eq!(result.shortcut_path, vec![0, 1, 2]);
    assert!((result.cost - 3.0).abs() < 1e-6);
}

#[test]
fn bi_lca_res_rejects_a_route_that_only_a_stale_own_resolution_check_would_admit() {
    // The target's own lca_res (2) sits at the query's LCA threshold, so
    // bwd(target) admits the lateral `fall_near` hop (inside=0) and the
    // node it leads to, 2, inherits `fall_near`'s low cell_res (1) as its
    // *arrival* resolution. That arrival resolution, not `fall_far`'s own
    // cell_res (5), must gate whether `fall_far` (inside=-1) is legal from
    // node 2: arrival_res(2)=1 < lca_res=2, so `fall_far` is below the peak
    // and inside=-1 (an upward-only move) is not admitted there — checking
    // `fall_far.cell_res` instead of the tracked arrival would wrongly let
    // it through. On the forward side, the cheap `decoy`/`decoy2` pair
    // only has a legal first hop if `inside` is ignored entirely (`decoy`
    // is inside=-1). With both checks done correctly there is no route
    // from 0 to 3 at all.
    let rise = Shortcut { from_edge: 0, to_edge: 1, cost: 1.0, via_edge: 0, inside: 1, cell: 0, cell_res: 5 };
    let fall_far = Shortcut { from_edge: 1, to_edge: 2, cost: 1.0, via_edge: 1, inside: -1, cell: 0, cell_res: 5 };
    let fall_near = Shortcut { from_edge: 2, to_edge: 3, cost: 1.0, via_edge: 2, inside: 0, cell: 0, cell_res: 1 };
    let decoy = Shortcut { from_edge: 0, to_edge: 4, cost: 0.1, via_edge: 0, inside: -1, cell: 0, cell_res: 5 };
    let decoy2 = Shortcut { from_edge: 4, to_edge: 3, cost: 0.1, via_edge: 4, inside: 1, cell: 0, cell_res: 5 };
    let store = store_of(5, vec![rise, fall_far, fall_near, decoy, decoy2]);

    let err = query::run(&store, QueryAlgorithm::BiLcaRes, 0, 3).unwrap_err();
    assert!(matches!(err, Error::QueryNotReachable { source_edge: 0, target_edge: 3 }));
}

#[test]
fn alternative_detours_around_the_primary_path_at_unchanged_cost() {
    let via_one = Shortcut { from_edge: 0, to_edge: 1, cost: 1.0, via_edge: 0, inside: 1, cell: 0, cell_res: 5 };
    let one_to_target = Shortcut { from_edge: 1, to_edge: 3, cost: 1.0, via_edge: 1, inside: 1, cell: 0, cell_res: 5 };
    let via_four = Shortcut { from_edge: 0, to_edge: 4, cost: 1.0, via_edge: 0, inside: 1, cell: 0, cell_res: 5 };
    let four_to_target = Shortcut { from_edge: 4, to_edge: 3, cost: 1.0, via_edge: 4, inside: 1, cell: 0, cell_res: 5 };
    let store = store_of(5, vec![via_one, one_to_target, via_four, four_to_target]);

    let primary = query::run(&store, QueryAlgorithm::UniLca, 0, 3).unwrap();
    assert_eq!(primary.shortcut_path, vec![0, 1, 3]);
    assert!((primary.cost - 3.0).abs() < 1e-6);

    let alternative = query::run(&store, QueryAlgorithm::Alternative, 0, 3).unwrap();
    assert_eq!(alternative.shortcut_path, vec![0, 4, 3]);
    assert!((alternative.cost - primary.cost).abs() < 1e-6);
}

#[test]
fn m2m_returns_the_minimum_over_all_source_target_pairs() {
    let cheap_leg = Shortcut { from_edge: 0, to_edge: 2, cost: 1.5, via_edge: 0, inside: 1, cell: 0, cell_res: 0 };
    let via_source_one = Shortcut { from_edge: 1, to_edge: 3, cost: 1.0, via_edge: 1, inside: 1, cell: 0, cell_res: 0 };
    let store = store_of(4, vec![cheap_leg, via_source_one]);

    let result = query::run_m2m(&store, &[0, 1], &[2, 3]).unwrap();
    assert!((result.cost - 2.0).abs() < 1e-6);
    assert_eq!(result.shortcut_path.first().copied(), Some(1));
    assert_eq!(result.shortcut_path.last().copied(), Some(3));
}

#[test]
fn unknown_edge_is_reported_before_any_search_runs() {
    let store = store_of(1, Vec::new());
    let err = query::run(&store, QueryAlgorithm::Classic, 0, 7).unwrap_err();
    assert!(matches!(err, Error::UnknownEdge(7)));
}

#[test]
fn route_by_edge_dispatches_by_name_and_bundles_the_alternative() {
    let via_one = Shortcut { from_edge: 0, to_edge: 1, cost: 1.0, via_edge: 0, inside: 1, cell: 0, cell_res: 5 };
    let one_to_target = Shortcut { from_edge: 1, to_edge: 3, cost: 1.0, via_edge: 1, inside: 1, cell: 0, cell_res: 5 };
    let via_four = Shortcut { from_edge: 0, to_edge: 4, cost: 1.0, via_edge: 0, inside: 1, cell: 0, cell_res: 5 };
    let four_to_target = Shortcut { from_edge: 4, to_edge: 3, cost: 1.0, via_edge: 4, inside: 1, cell: 0, cell_res: 5 };
    let store = store_of(5, vec![via_one, one_to_target, via_four, four_to_target]);

    let result = query::route_by_edge(&store, 0, 3, "classic", true, 2.0).unwrap();
    assert_eq!(result.shortcut_path, vec![0, 1, 3]);
    assert!((result.cost - 3.0).abs() < 1e-6);
    let alternative = result.alternative.expect("include_alternative requested one");
    assert_eq!(alternative.shortcut_path, vec![0, 4, 3]);
    assert!((alternative.cost - result.cost).abs() < 1e-6);

    let without_alternative = query::route_by_edge(&store, 0, 3, "classic", false, 2.0).unwrap();
    assert!(without_alternative.alternative.is_none());

    // An unrecognized name falls back to `classic` rather than erroring.
    let default_routed = query::route_by_edge(&store, 0, 3, "made-up-name", false, 2.0).unwrap();
    assert_eq!(default_routed.shortcut_path, result.shortcut_path);
}

#[test]
fn route_m2m_by_edge_reports_the_winning_pair_and_its_alternative() {
    let cheap_leg = Shortcut { from_edge: 0, to_edge: 2, cost: 1.5, via_edge: 0, inside: 1, cell: 0, cell_res: 0 };
    let via_source_one = Shortcut { from_edge: 1, to_edge: 3, cost: 1.0, via_edge: 1, inside: 1, cell: 0, cell_res: 0 };
    let store = store_of(4, vec![cheap_leg, via_source_one]);

    let without_alternative = query::route_m2m(&store, &[0, 1], &[2, 3], false, 2.0).unwrap();
    assert!((without_alternative.cost - 2.0).abs() < 1e-6);
    assert_eq!(without_alternative.shortcut_path.first().copied(), Some(1));
    assert_eq!(without_alternative.shortcut_path.last().copied(), Some(3));
    assert!(without_alternative.alternative.is_none());

    // `1 -> 3` is the only edge between the winning pair, so penalizing it
    // still finds the same single hop back — no detour exists, but the
    // re-route must succeed rather than error.
    let with_alternative = query::route_m2m(&store, &[0, 1], &[2, 3], true, 2.0).unwrap();
    let alternative = with_alternative.alternative.expect("include_alternative requested one");
    assert_eq!(alternative.shortcut_path, vec![1, 3]);
}
