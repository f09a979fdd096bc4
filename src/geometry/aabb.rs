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

use crate::{geometry::vector::Vector3, numeric::Scalar};

/// Scale applied to a node's tight bound to get the bound queries are pruned against.
pub const LOOSENESS: f64 = 1.5;

/// Axis aligned box stored as center and per-axis half size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bound<T> {
    pub center: Vector3<T>,
    pub half_size: Vector3<T>,
}

/// Axis aligned box stored as its two corners.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extent<T> {
    pub min: Vector3<T>,
    pub max: Vector3<T>,
}

impl<T: Scalar> Bound<T> {
    pub fn new(center: Vector3<T>, half_size: Vector3<T>) -> Self {
        Self { center, half_size }
    }

    pub fn extent(&self) -> Extent<T> {
        Extent::new(self.center - self.half_size, self.center + self.half_size)
    }

    /// The bound grown by [`LOOSENESS`] around the same center.
    pub fn loose(&self) -> Self {
        Self::new(self.center, self.half_size * T::lit(LOOSENESS))
    }

    pub fn loose_extent(&self) -> Extent<T> {
        self.loose().extent()
    }

    /// Octant a sphere descends into, along with that child's tight bound.
    ///
    /// Bit 0/1/2 is set when the center lies on the negative side of the x/y/z
    /// split plane. Returns `None` when the sphere is too large to stay inside
    /// the child's loose bound.
    pub fn octant(&self, center: &Vector3<T>, radius: T) -> Option<(usize, Self)> {
        let slack = T::lit(LOOSENESS - 1.0);
        let mut index = 0;
        let mut child = *self;
        let mut half = [T::zero(); 3];
        let mut cntr = [T::zero(); 3];
        for axis in 0..3 {
            let h = self.half_size[axis] * T::half();
            if radius > h * slack {
                return None;
            }
            if center[axis] < self.center[axis] {
                index |= 1 << axis;
                cntr[axis] = self.center[axis] - h;
            } else {
                cntr[axis] = self.center[axis] + h;
            }
            half[axis] = h;
        }
        child.center = Vector3::from_array(cntr);
        child.half_size = Vector3::from_array(half);
        Some((index, child))
    }

    /// Whether a sphere belongs to a node with this tight bound: its center lies
    /// inside the tight box and the whole sphere lies inside the loose box.
    pub fn holds_sphere(&self, center: &Vector3<T>, radius: T) -> bool {
        let loose = T::lit(LOOSENESS);
        (0..3).all(|axis| {
            let h = self.half_size[axis];
            let d = (center[axis] - self.center[axis]).abs();
            d <= h && d + radius <= h * loose
        })
    }
}

impl<T: Scalar> Extent<T> {
    pub fn new(min: Vector3<T>, max: Vector3<T>) -> Self {
        Self { min, max }
    }

    /// Inverted box that any expansion overwrites.
    pub fn empty() -> Self {
        Self::new(
            Vector3::splat(T::infinity()),
            Vector3::splat(T::neg_infinity()),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn expand_point(&mut self, p: &Vector3<T>) {
        self.min = self.min.component_min(p);
        self.max = self.max.component_max(p);
    }

    pub fn expand_sphere(&mut self, center: &Vector3<T>, radius: T) {
        let r = Vector3::splat(radius);
        self.min = self.min.component_min(&(*center - r));
        self.max = self.max.component_max(&(*center + r));
    }

    pub fn intersects(&self, other: &Self) -> bool {
        (0..3).all(|axis| self.min[axis] <= other.max[axis] && other.min[axis] <= self.max[axis])
    }

    pub fn contains_point(&self, p: &Vector3<T>) -> bool {
        (0..3).all(|axis| self.min[axis] <= p[axis] && p[axis] <= self.max[axis])
    }

    /// Squared distance from a point to the box, zero inside.
    pub fn distance2_to(&self, p: &Vector3<T>) -> T {
        let mut d2 = T::zero();
        for axis in 0..3 {
            let v = p[axis];
            if v < self.min[axis] {
                let d = self.min[axis] - v;
                d2 = d2 + d * d;
            } else if v > self.max[axis] {
                let d = v - self.max[axis];
                d2 = d2 + d * d;
            }
        }
        d2
    }

    pub fn to_bound(&self) -> Bound<T> {
        let center = (self.min + self.max) * T::half();
        Bound::new(center, (self.max - self.min) * T::half())
    }
}
