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

use h3route_core::hierarchy::{from_digits, lca, parent, resolution};

fn leaf(base: u64, digits: &[u8]) -> u64 {
    from_digits(base, digits)
}

#[test]
fn three_way_branch_shares_the_right_ancestor() {
    let trunk = vec![2u8, 4, 6];
    let mut a = trunk.clone();
    a.extend([1, 1]);
    let mut b = trunk.clone();
    b.extend([2, 2]);
    let mut c = trunk.clone();
    c.extend([3, 3]);

    let ca = leaf(9, &a);
    let cb = leaf(9, &b);
    let cc = leaf(9, &c);

    let (ab_cell, ab_res) = lca(ca, cb);
    assert_eq!(ab_res, 3);
    assert_eq!(ab_cell, leaf(9, &trunk));

    let (abc_cell, abc_res) = lca(ab_cell, cc);
    assert_eq!(abc_res, 3);
    assert_eq!(abc_cell, leaf(9, &trunk));
}

#[test]
fn different_base_components_never_meet() {
    let c1 = leaf(1, &[1, 2, 3, 4, 5]);
    let c2 = leaf(2, &[1, 2, 3, 4, 5]);
    assert_eq!(lca(c1, c2), (0, -1));
}

#[test]
fn coarsening_to_finer_resolution_is_a_no_op() {
    let c = leaf(5, &[1, 2, 3]);
    assert_eq!(parent(c, 15), c);
    assert_eq!(resolution(parent(c, 15)), 3);
}

#[test]
fn coarsening_below_root_saturates_at_root() {
    let c = leaf(5, &[1, 2, 3]);
    assert_eq!(parent(c, -5), 0);
}
