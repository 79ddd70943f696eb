// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Prediction filter coefficient tables
//!
//! The hardware stores the coefficients as 6-bit fixed point values
//! (`K * 64`). They are kept here as exact binary fractions.

/// Fixed table of (K0, K1) prediction coefficient pairs
///
/// # Filter Modes
///
/// - Filter 0: No prediction
/// - Filter 1: First-order prediction (60/64)
/// - Filter 2: Second-order prediction (115/64, -52/64)
/// - Filter 3: Second-order prediction (98/64, -55/64)
/// - Filter 4: Second-order prediction (122/64, -60/64), SPU only
#[derive(Debug)]
pub struct PredictionFilterTable {
    k0: &'static [f64],
    k1: &'static [f64],
}

/// SPU-ADPCM filters 0-4
pub static SPU_FILTERS: PredictionFilterTable = PredictionFilterTable {
    k0: &[0.0, 60.0 / 64.0, 115.0 / 64.0, 98.0 / 64.0, 122.0 / 64.0],
    k1: &[0.0, 0.0, -52.0 / 64.0, -55.0 / 64.0, -60.0 / 64.0],
};

/// CD-XA ADPCM filters 0-3
pub static XA_FILTERS: PredictionFilterTable = PredictionFilterTable {
    k0: &[0.0, 60.0 / 64.0, 115.0 / 64.0, 98.0 / 64.0],
    k1: &[0.0, 0.0, -52.0 / 64.0, -55.0 / 64.0],
};

impl PredictionFilterTable {
    /// Number of filters in the table
    #[inline(always)]
    pub fn count(&self) -> usize {
        self.k0.len()
    }

    /// Coefficient applied to the most recent sample
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.count()`.
    #[inline(always)]
    pub fn k0(&self, index: usize) -> f64 {
        self.k0[index]
    }

    /// Coefficient applied to the second most recent sample
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.count()`.
    #[inline(always)]
    pub fn k1(&self, index: usize) -> f64 {
        self.k1[index]
    }

    /// Prediction for the next sample given the two previous ones
    #[inline(always)]
    pub fn predict(&self, index: usize, prev1: f64, prev2: f64) -> f64 {
        self.k0[index] * prev1 + self.k1[index] * prev2
    }
}
