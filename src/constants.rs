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

//! Shared type aliases and sentinels used across the crate.

/// Id of a base edge (as read from the edges CSV).
pub type EdgeId = u32;

/// An opaque cell identifier at some resolution in [0, 15]. Cell 0 is the
/// synthetic universal root at resolution -1.
pub type Cell = u64;

/// A resolution level. -1 denotes the synthetic root, 0..=15 are real levels.
pub type Res = i8;

/// Traversal / shortcut cost. Nonnegative.
pub type Weight = f32;

pub const INVALID_EDGE: EdgeId = EdgeId::MAX;
pub const ROOT_CELL: Cell = 0;
pub const ROOT_RES: Res = -1;
pub const MAX_RES: Res = 15;
pub const WEIGHT_MAX: Weight = f32::INFINITY;
pub const WEIGHT_ZERO: Weight = 0.0;

/// Default resolution threshold below which the SCIPY SP method is used in
/// `Hybrid` mode (edges at or above this resolution use PURE).
pub const DEFAULT_HYBRID_RES: Res = 10;

/// Default fan-out resolution between the parallel and sequential halves of
/// each contraction pass.
pub const DEFAULT_PARTITION_RES: Res = 7;
