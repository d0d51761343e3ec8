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

use crate::constants::EdgeId;
use thiserror::Error;

/// The error kinds surfaced by both the preprocessor and the query engine.
///
/// Inside a preprocessing phase any kind other than `QueryNotReachable` is
/// fatal to the job. The query engine instead surfaces `QueryNotReachable`
/// as a successful response with `success: false`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("schema error in {context}: {message}")]
    Schema { context: String, message: String },

    #[error("config error: {0}")]
    Config(String),

    #[error("graph error: {0}")]
    Graph(String),

    #[error("out of memory: {0}")]
    OutOfMemory(String),

    #[error("no route between {source_edge} and {target_edge}")]
    QueryNotReachable {
        source_edge: EdgeId,
        target_edge: EdgeId,
    },

    #[error("unknown dataset {0}")]
    UnknownDataset(String),

    #[error("unknown edge {0}")]
    UnknownEdge(EdgeId),
}

impl Error {
    /// Maps an error to the preprocessor CLI exit code scheme:
    /// 1 = bad config, 2 = input read failure, 3 = phase failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_) => 1,
            Error::Io { .. } | Error::Schema { .. } => 2,
            Error::Graph(_) | Error::OutOfMemory(_) => 3,
            Error::QueryNotReachable { .. } | Error::UnknownDataset(_) | Error::UnknownEdge(_) => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
