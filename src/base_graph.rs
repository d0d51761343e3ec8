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

//! Base edges and dual adjacency, read from the preprocessor's CSV input.
//! Analogous in spirit to `InputGraph`: immutable after load, rejects
//! self-loops, logs rejected rows.

use std::path::Path;

use log::warn;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::constants::{Cell, EdgeId, Res, Weight};
use crate::error::{Error, Result};
use crate::hierarchy;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseEdge {
    pub id: EdgeId,
    pub from_cell: Cell,
    pub to_cell: Cell,
    pub lca_res: Res,
    pub length: f32,
    pub cost: Weight,
    pub geometry: String,
}

#[derive(Debug, Deserialize)]
struct EdgeRecord {
    id: EdgeId,
    from_cell: u64,
    to_cell: u64,
    lca_res: i8,
    length: f32,
    cost: f32,
    geometry: String,
}

#[derive(Debug, Deserialize)]
struct AdjacencyRecord {
    from_edge: EdgeId,
    to_edge: EdgeId,
}

/// The immutable base graph: edges indexed by id, plus the dual adjacency
/// ("turn table") used to generate elementary shortcuts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseGraph {
    edges: Vec<BaseEdge>,
    adjacency: Vec<(EdgeId, EdgeId)>,
}

impl BaseGraph {
    /// Builds a base graph directly from in-memory parts, bypassing CSV
    /// ingestion. Used by tests and by embedders that already hold edges
    /// and adjacency in memory.
    pub fn new(edges: Vec<BaseEdge>, adjacency: Vec<(EdgeId, EdgeId)>) -> Self {
        BaseGraph { edges, adjacency }
    }

    /// Builds a random base graph, mostly used for fuzz-style contraction
    /// tests. Each edge gets a random cell pair at a fixed resolution and
    /// the adjacency forms a random forest of turns (edge `i` always turns
    /// off some earlier edge `j < i`, which keeps the turn table free of
    /// dangling references without a separate validation pass).
    pub fn random(seed: u64, num_edges: u32) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);

        let random_cell = |rng: &mut StdRng| -> Cell {
            let digits: Vec<u8> = (0..4).map(|_| rng.gen_range(1..=6)).collect();
            hierarchy::from_digits(1, &digits)
        };

        let edges: Vec<BaseEdge> = (0..num_edges)
            .map(|id| {
                let from_cell = random_cell(&mut rng);
                let mut to_cell = random_cell(&mut rng);
                while to_cell == from_cell {
                    to_cell = random_cell(&mut rng);
                }
                BaseEdge {
                    id,
                    from_cell,
                    to_cell,
                    lca_res: 4,
                    length: rng.gen_range(1.0..50.0),
                    cost: rng.gen_range(1.0..50.0),
                    geometry: String::new(),
                }
            })
            .collect();

        let adjacency = (1..num_edges)
            .map(|to_edge| (rng.gen_range(0..to_edge), to_edge))
            .collect();

        BaseGraph { edges, adjacency }
    }

    pub fn edges(&self) -> &[BaseEdge] {
        &self.edges
    }

    pub fn adjacency(&self) -> &[(EdgeId, EdgeId)] {
        &self.adjacency
    }

    pub fn edge(&self, id: EdgeId) -> Option<&BaseEdge> {
        self.edges.get(id as usize)
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Reads the edges CSV and the adjacency CSV, building a dense,
    /// id-indexed edge table. Rejects self-loops with a warning; a
    /// dangling adjacency reference is a `GraphError`.
    pub fn load(edges_path: &Path, adjacency_path: &Path) -> Result<Self> {
        let edges = read_edges(edges_path)?;
        let max_id = edges.iter().map(|e| e.id).max().unwrap_or(0);
        let mut dense: Vec<Option<BaseEdge>> = vec![None; max_id as usize + 1];
        for e in edges {
            if e.from_cell == e.to_cell {
                warn!("rejecting self-loop edge {}", e.id);
                continue;
            }
            let idx = e.id as usize;
            dense[idx] = Some(e);
        }
        let dense: Result<Vec<BaseEdge>> = dense
            .into_iter()
            .enumerate()
            .map(|(i, e)| {
                e.ok_or_else(|| Error::Schema {
                    context: "edges".into(),
                    message: format!("missing edge id {}", i),
                })
            })
            .collect();
        let edges = dense?;

        let adjacency = read_adjacency(adjacency_path)?;
        for &(from, to) in &adjacency {
            if from as usize >= edges.len() || to as usize >= edges.len() {
                return Err(Error::Graph(format!(
                    "dangling adjacency reference ({}, {})",
                    from, to
                )));
            }
        }

        Ok(BaseGraph { edges, adjacency })
    }
}

fn read_edges(path: &Path) -> Result<Vec<BaseEdge>> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| Error::Io {
        path: path.display().to_string(),
        source: std::io::Error::new(std::io::ErrorKind::Other, e.to_string()),
    })?;
    let mut out = Vec::new();
    for result in reader.deserialize() {
        let rec: EdgeRecord = result.map_err(|e| Error::Schema {
            context: "edges".into(),
            message: e.to_string(),
        })?;
        out.push(BaseEdge {
            id: rec.id,
            from_cell: rec.from_cell,
            to_cell: rec.to_cell,
            lca_res: rec.lca_res,
            length: rec.length,
            cost: rec.cost,
            geometry: rec.geometry,
        });
    }
    Ok(out)
}

fn read_adjacency(path: &Path) -> Result<Vec<(EdgeId, EdgeId)>> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| Error::Io {
        path: path.display().to_string(),
        source: std::io::Error::new(std::io::ErrorKind::Other, e.to_string()),
    })?;
    let mut out = Vec::new();
    for result in reader.deserialize() {
        let rec: AdjacencyRecord = result.map_err(|e| Error::Schema {
            context: "adjacency".into(),
            message: e.to_string(),
        })?;
        out.push((rec.from_edge, rec.to_edge));
    }
    Ok(out)
}
