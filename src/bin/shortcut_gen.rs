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

//! Preprocessor CLI: loads a profile config, runs the four-phase
//! contraction pipeline, and persists the resulting dataset. Exit codes
//! follow `Error::exit_code()`: 1 config, 2 input, 3 phase failure.

use std::path::PathBuf;

use clap::Parser;

use h3route_core::base_graph::BaseGraph;
use h3route_core::config::Config;
use h3route_core::graph_store::PersistedDataset;
use h3route_core::{build_shortcuts, Error};

#[derive(Parser, Debug)]
#[command(name = "shortcut_gen", about = "Builds a hierarchical shortcut dataset from a base road network")]
struct Args {
    /// Directory containing default.yaml and <profile>.yaml.
    #[arg(long, default_value = "config")]
    config_dir: PathBuf,

    /// Profile name (matches config/<profile>.yaml).
    #[arg(long, default_value = "default")]
    profile: String,

    /// Ignore any prior output at the configured shortcuts path.
    #[arg(long)]
    fresh_start: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(err) = run(&args) {
        log::error!("{}", err);
        std::process::exit(err.exit_code());
    }
}

fn run(args: &Args) -> Result<(), Error> {
    let mut config = Config::load(&args.config_dir, &args.profile)?;
    if args.fresh_start {
        config.store.fresh_start = true;
    }

    log::info!("loading base graph for district {}", config.input.district);
    let base = BaseGraph::load(
        &PathBuf::from(&config.input.edges_file),
        &PathBuf::from(&config.input.graph_file),
    )?;
    log::info!("{} base edges loaded", base.num_edges());

    let started = std::time::Instant::now();
    let shortcuts = build_shortcuts(&base, &config.algorithm, &config.parallel);
    log::info!("contraction produced {} shortcuts in {:?}", shortcuts.len(), started.elapsed());

    let dataset = PersistedDataset {
        name: config.input.district.clone(),
        created_at: chrono::Utc::now(),
        edges: base.edges().to_vec(),
        shortcuts,
        boundary_geojson: None,
    };

    let output_path = config.shortcuts_output_path();
    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::Io { path: parent.display().to_string(), source: e })?;
    }
    dataset.save(&output_path)?;
    log::info!("dataset written to {}", output_path.display());

    Ok(())
}
