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

//! Per-channel decode state

/// Decode state of one audio channel
///
/// Holds the two most recently reconstructed samples at full precision so
/// rounding error does not accumulate across Sound Units, and the volume
/// applied when producing output PCM.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeContext {
    /// Most recent reconstructed sample (unscaled)
    prev1: f64,

    /// Second most recent reconstructed sample (unscaled)
    prev2: f64,

    /// Multiplier applied when rounding to output PCM
    volume_scale: f64,
}

impl DecodeContext {
    /// Create a new context with silent history
    ///
    /// # Arguments
    ///
    /// * `volume_scale` - Output multiplier (1.0 = unchanged)
    pub fn new(volume_scale: f64) -> Self {
        Self {
            prev1: 0.0,
            prev2: 0.0,
            volume_scale,
        }
    }

    /// Clear the sample history, keeping the volume
    ///
    /// Called when the stream position jumps.
    pub fn reset(&mut self) {
        self.prev1 = 0.0;
        self.prev2 = 0.0;
    }

    /// Push a newly reconstructed (unscaled) sample into the history
    #[inline(always)]
    pub fn update(&mut self, sample: f64) {
        self.prev2 = self.prev1;
        self.prev1 = sample;
    }

    /// Most recent reconstructed sample
    #[inline(always)]
    pub fn prev1(&self) -> f64 {
        self.prev1
    }

    /// Second most recent reconstructed sample
    #[inline(always)]
    pub fn prev2(&self) -> f64 {
        self.prev2
    }

    pub fn volume_scale(&self) -> f64 {
        self.volume_scale
    }

    pub fn set_volume_scale(&mut self, volume_scale: f64) {
        self.volume_scale = volume_scale;
    }

    /// Scale, round half up and clamp a reconstructed sample to 16-bit PCM
    #[inline(always)]
    pub fn to_pcm(&self, sample: f64) -> i16 {
        let rounded = (sample * self.volume_scale + 0.5).floor();
        rounded.clamp(i16::MIN as f64, i16::MAX as f64) as i16
    }
}

impl Default for DecodeContext {
    fn default() -> Self {
        Self::new(1.0)
    }
}
