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

//! Process-wide dataset registry. Empty on startup; mutated only via
//! `load`/`unload`, which take the write guard just long enough to swap
//! an `Arc`, so in-flight queries keep their own snapshot alive after an
//! `unload`.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock};

use crate::error::{Error, Result};
use crate::graph_store::{GraphStore, PersistedDataset};

pub struct Registry {
    datasets: RwLock<HashMap<String, Arc<GraphStore>>>,
}

impl Default for Registry {
    fn default() -> Self {
        Registry {
            datasets: RwLock::new(HashMap::new()),
        }
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&self, name: &str, path: &Path) -> Result<()> {
        let persisted = PersistedDataset::load(path)?;
        let store = Arc::new(GraphStore::from_persisted(persisted));
        let mut guard = self.datasets.write().expect("dataset registry lock poisoned");
        guard.insert(name.to_string(), store);
        Ok(())
    }

    pub fn unload(&self, name: &str) -> Result<()> {
        let mut guard = self.datasets.write().expect("dataset registry lock poisoned");
        guard
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| Error::UnknownDataset(name.to_string()))
    }

    pub fn get(&self, name: &str) -> Result<Arc<GraphStore>> {
        let guard = self.datasets.read().expect("dataset registry lock poisoned");
        guard
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownDataset(name.to_string()))
    }
}
