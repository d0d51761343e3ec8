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

//! Layered YAML configuration: `config/default.yaml` merged with
//! `config/<profile>.yaml`. Mirrors the `config_loader.py` original
//! (`Config` dataclass tree + `deep_merge`), but leans on serde defaults
//! plus `Option`-wrapped profile overrides instead of a dynamic dict
//! merge, since Rust's struct shape is fixed at compile time.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{Res, DEFAULT_HYBRID_RES, DEFAULT_PARTITION_RES};
use crate::error::{Error, Result};
use crate::sp_kernel::SpMethodKind;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct InputConfig {
    pub edges_file: String,
    pub graph_file: String,
    pub district: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlgorithmConfig {
    pub sp_method: SpMethodKind,
    pub hybrid_res: Res,
    pub partition_res: Res,
}

impl Default for AlgorithmConfig {
    fn default() -> Self {
        AlgorithmConfig {
            sp_method: SpMethodKind::Hybrid,
            hybrid_res: DEFAULT_HYBRID_RES,
            partition_res: DEFAULT_PARTITION_RES,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ParallelConfig {
    pub workers: usize,
    pub workers_phase1: Option<usize>,
    pub workers_phase4: Option<usize>,
}

impl ParallelConfig {
    pub fn phase1_workers(&self) -> usize {
        self.workers_phase1.unwrap_or(self.workers).max(1)
    }

    pub fn phase4_workers(&self) -> usize {
        self.workers_phase4.unwrap_or(self.workers).max(1)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StoreConfig {
    pub memory_limit: String,
    pub fresh_start: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub verbose: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "INFO".to_string(),
            verbose: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: String,
    pub shortcuts_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub algorithm: AlgorithmConfig,
    pub parallel: ParallelConfig,
    #[serde(rename = "duckdb")]
    pub store: StoreConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Loads `config/default.yaml` merged with `config/<profile>.yaml`
    /// under `config_dir`. Both files are optional; a missing profile
    /// file is a `ConfigError` only if `profile != "default"` and the
    /// profile file is absent.
    pub fn load(config_dir: &Path, profile: &str) -> Result<Config> {
        let default_path = config_dir.join("default.yaml");
        let mut cfg: Config = load_yaml(&default_path)?.unwrap_or_default();

        if profile != "default" {
            let profile_path = config_dir.join(format!("{}.yaml", profile));
            let overrides: serde_yaml::Value = load_yaml_value(&profile_path)?.ok_or_else(|| {
                Error::Config(format!("missing profile config: {}", profile_path.display()))
            })?;
            merge_into(&mut cfg, overrides)?;
        }

        Ok(cfg)
    }

    pub fn shortcuts_output_path(&self) -> PathBuf {
        let name = if self.output.shortcuts_file.is_empty() {
            format!("{}_shortcuts.bin", self.input.district)
        } else {
            self.output.shortcuts_file.clone()
        };
        Path::new(&self.output.directory).join(name)
    }
}

fn load_yaml<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let text = std::fs::read_to_string(path).map_err(|e| Error::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let value = serde_yaml::from_str(&text)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
    Ok(Some(value))
}

fn load_yaml_value(path: &Path) -> Result<Option<serde_yaml::Value>> {
    load_yaml(path)
}

/// Re-serializes the base config, merges the override YAML value on top,
/// then deserializes back into `Config`. This achieves the same
/// deep-merge-then-reparse effect as `config_loader.py::deep_merge`
/// without hand-rolling a generic struct merge.
fn merge_into(cfg: &mut Config, overrides: serde_yaml::Value) -> Result<()> {
    let base = serde_yaml::to_value(&*cfg)
        .map_err(|e| Error::Config(format!("re-serializing config: {}", e)))?;
    let merged = deep_merge(base, overrides);
    *cfg = serde_yaml::from_value(merged)
        .map_err(|e| Error::Config(format!("merged config invalid: {}", e)))?;
    Ok(())
}

fn deep_merge(base: serde_yaml::Value, over: serde_yaml::Value) -> serde_yaml::Value {
    use serde_yaml::Value;
    match (base, over) {
        (Value::Mapping(mut base_map), Value::Mapping(over_map)) => {
            for (k, v) in over_map {
                let merged = match base_map.remove(&k) {
                    Some(existing) => deep_merge(existing, v),
                    None => v,
                };
                base_map.insert(k, merged);
            }
            Value::Mapping(base_map)
        }
        (_, over) => over,
    }
}
