// SPDX-License-Identifier: MIT
//
// Copyright (c) 2025 Alexandre Severino
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

use crate::{
    geometry::{
        aabb::{Bound, Extent},
        vector::Vector3,
    },
    numeric::Scalar,
};

/// Half line `origin + t * direction`, `t >= 0`, in mesh local space.
#[derive(Clone, Copy, Debug)]
pub struct Ray<T> {
    pub origin: Vector3<T>,
    pub direction: Vector3<T>,
    inv_direction: Vector3<T>,
}

impl<T: Scalar> Ray<T> {
    pub fn new(origin: Vector3<T>, direction: Vector3<T>) -> Self {
        let inv = |d: T| if d == T::zero() { T::infinity() } else { T::one() / d };
        Self {
            origin,
            direction,
            inv_direction: Vector3::new(inv(direction.x), inv(direction.y), inv(direction.z)),
        }
    }

    /// Ray from `origin` through `target`.
    pub fn through(origin: Vector3<T>, target: Vector3<T>) -> Self {
        Self::new(origin, (target - origin).normalized())
    }

    #[inline]
    pub fn at(&self, t: T) -> Vector3<T> {
        self.origin + self.direction * t
    }

    /// Slab test against an axis aligned box.
    pub fn intersect_extent(&self, extent: &Extent<T>) -> bool {
        let mut t_min = T::zero();
        let mut t_max = T::infinity();
        for axis in 0..3 {
            let o = self.origin[axis];
            if self.direction[axis] == T::zero() {
                if o < extent.min[axis] || o > extent.max[axis] {
                    return false;
                }
                continue;
            }
            let inv = self.inv_direction[axis];
            let t1 = (extent.min[axis] - o) * inv;
            let t2 = (extent.max[axis] - o) * inv;
            t_min = t_min.max(t1.min(t2));
            t_max = t_max.min(t1.max(t2));
            if t_min > t_max {
                return false;
            }
        }
        true
    }

    pub fn intersect_bound(&self, bound: &Bound<T>) -> bool {
        self.intersect_extent(&bound.extent())
    }

    /// Whether the ray passes within `sqrt(radius2)` of `center`.
    pub fn intersect_sphere(&self, center: &Vector3<T>, radius2: T) -> bool {
        let oc = *center - self.origin;
        let dd = self.direction.norm2();
        let t = if dd > T::zero() { oc.dot(&self.direction) / dd } else { T::zero() };
        let closest = if t > T::zero() { self.at(t) } else { self.origin };
        closest.distance2(center) <= radius2
    }

    /// Möller-Trumbore, both windings. Returns the ray parameter of the hit.
    pub fn intersect_triangle(&self, a: &Vector3<T>, b: &Vector3<T>, c: &Vector3<T>) -> Option<T> {
        let e1 = *b - *a;
        let e2 = *c - *a;
        let p = self.direction.cross(&e2);
        let det = e1.dot(&p);
        if det.abs() <= T::tolerance() {
            return None;
        }
        let inv_det = T::one() / det;
        let s = self.origin - *a;
        let u = s.dot(&p) * inv_det;
        if u < T::zero() || u > T::one() {
            return None;
        }
        let q = s.cross(&e1);
        let v = self.direction.dot(&q) * inv_det;
        if v < T::zero() || u + v > T::one() {
            return None;
        }
        let t = e2.dot(&q) * inv_det;
        (t >= T::zero()).then_some(t)
    }
}
