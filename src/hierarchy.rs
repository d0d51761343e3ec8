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

//! Pure functions over `Cell`: resolution, parent, lowest common ancestor.
//!
//! The bit layout is self-contained (no libh3 binding): bits 52..=55 store
//! the resolution, and each resolution level 1..=15 owns a 3-bit digit
//! field below that, mirroring the nesting scheme of a hexagonal
//! tessellation where each cell has up to 7 children. Cell 0 is reserved
//! as the synthetic root at resolution -1 and carries no digits.

use crate::constants::{Cell, Res, MAX_RES, ROOT_CELL, ROOT_RES};

const RES_SHIFT: u32 = 52;
const RES_MASK: u64 = 0xF << RES_SHIFT;
const DIGIT_BITS: u32 = 3;
const DIGIT_MASK: u64 = 0x7;

/// Returns the resolution encoded in `cell`. The root cell (0) has
/// resolution -1.
pub fn resolution(cell: Cell) -> Res {
    if cell == ROOT_CELL {
        return ROOT_RES;
    }
    (((cell & RES_MASK) >> RES_SHIFT) as i8) - 1
}

fn digit_shift(level: u32) -> u32 {
    // level 1 occupies the lowest digit field, level 15 the highest.
    (level - 1) * DIGIT_BITS
}

/// Builds a cell at `res` given its base (non-hierarchical) component and
/// the digit at every level from 1 to `res`. Exposed for tests and for
/// base-edge ingestion that needs to synthesize cells deterministically.
pub fn from_digits(base: u64, digits: &[u8]) -> Cell {
    assert!(digits.len() <= MAX_RES as usize);
    let mut cell = (base & 0xFFFF) << 56;
    for (i, &d) in digits.iter().enumerate() {
        cell |= ((d as u64) & DIGIT_MASK) << digit_shift((i + 1) as u32);
    }
    let res = digits.len() as u64;
    cell | (res.wrapping_add(1) << RES_SHIFT)
}

/// Returns the ancestor of `cell` at resolution `target_res`. If
/// `target_res >= resolution(cell)` the cell is returned unchanged
/// (idempotent upward clamp). If `target_res < 0` the root cell (0) is
/// returned.
pub fn parent(cell: Cell, target_res: Res) -> Cell {
    if cell == ROOT_CELL {
        return ROOT_CELL;
    }
    let res = resolution(cell);
    if target_res >= res {
        return cell;
    }
    if target_res < 0 {
        return ROOT_CELL;
    }
    let mut masked = cell & !RES_MASK;
    // zero out every digit field finer than target_res
    for level in (target_res as u32 + 1)..=(res as u32) {
        masked &= !(DIGIT_MASK << digit_shift(level));
    }
    masked | (((target_res + 1) as u64) << RES_SHIFT)
}

fn base_component(cell: Cell) -> u64 {
    (cell >> 56) & 0xFFFF
}

/// Returns the finest cell that is an ancestor of both `c1` and `c2`,
/// together with its resolution. Returns `(0, -1)` if the two cells do
/// not share a common ancestor (distinct base/root components).
pub fn lca(c1: Cell, c2: Cell) -> (Cell, Res) {
    if c1 == ROOT_CELL || c2 == ROOT_CELL {
        return (ROOT_CELL, ROOT_RES);
    }
    if base_component(c1) != base_component(c2) {
        return (ROOT_CELL, ROOT_RES);
    }
    let r1 = resolution(c1);
    let r2 = resolution(c2);
    let common_res = r1.min(r2);
    let mut a = parent(c1, common_res);
    let mut b = parent(c2, common_res);
    let mut res = common_res;
    while a != b {
        if res < 0 {
            return (ROOT_CELL, ROOT_RES);
        }
        res -= 1;
        a = parent(a, res);
        b = parent(b, res);
    }
    (a, res)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell_at(base: u64, res: i8) -> Cell {
        let digits: Vec<u8> = (0..res).map(|i| ((i as u8) % 7) + 1).collect();
        from_digits(base, &digits)
    }

    #[test]
    fn resolution_of_root_is_minus_one() {
        assert_eq!(resolution(ROOT_CELL), ROOT_RES);
    }

    #[test]
    fn resolution_round_trips() {
        let c = cell_at(1, 9);
        assert_eq!(resolution(c), 9);
    }

    #[test]
    fn parent_is_idempotent_upward_clamp() {
        let c = cell_at(1, 5);
        assert_eq!(parent(c, 10), c);
        assert_eq!(parent(c, 5), c);
    }

    #[test]
    fn parent_below_zero_is_root() {
        let c = cell_at(1, 5);
        assert_eq!(parent(c, -1), ROOT_CELL);
    }

    #[test]
    fn lca_of_siblings_is_their_shared_prefix() {
        let base = 3;
        let digits_common = vec![1u8, 2, 3];
        let mut d1 = digits_common.clone();
        d1.push(4);
        let mut d2 = digits_common.clone();
        d2.push(5);
        let c1 = from_digits(base, &d1);
        let c2 = from_digits(base, &d2);
        let (cell, res) = lca(c1, c2);
        assert_eq!(res, 3);
        assert_eq!(cell, from_digits(base, &digits_common));
    }

    #[test]
    fn lca_without_common_ancestor_is_root() {
        let c1 = cell_at(1, 5);
        let c2 = cell_at(2, 5);
        assert_eq!(lca(c1, c2), (ROOT_CELL, ROOT_RES));
    }

    #[test]
    fn lca_with_root_is_root() {
        let c1 = cell_at(1, 5);
        assert_eq!(lca(c1, ROOT_CELL), (ROOT_CELL, ROOT_RES));
    }
}
