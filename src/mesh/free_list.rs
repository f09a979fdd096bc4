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

/// Recycled arena slots, kept sorted in descending order.
///
/// `pop` hands out the lowest freed index first so live indices stay packed
/// toward the front of the arena.
#[derive(Clone, Debug, Default)]
pub struct FreeList {
    slots: Vec<u32>,
}

impl FreeList {
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn insert(&mut self, index: u32) {
        match self.slots.binary_search_by(|slot| index.cmp(slot)) {
            Ok(_) => panic!("slot {index} freed twice"),
            Err(at) => self.slots.insert(at, index),
        }
    }

    pub fn pop(&mut self) -> Option<u32> {
        self.slots.pop()
    }

    /// Takes a specific slot back out of the list. Returns false if it was not free.
    pub fn reclaim(&mut self, index: u32) -> bool {
        match self.slots.binary_search_by(|slot| index.cmp(slot)) {
            Ok(at) => {
                self.slots.remove(at);
                true
            }
            Err(_) => false,
        }
    }

    pub fn contains(&self, index: u32) -> bool {
        self.slots.binary_search_by(|slot| index.cmp(slot)).is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.slots.iter().copied()
    }
}
