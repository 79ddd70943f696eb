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

//! Sound Unit coding tests
//!
//! Tests are split by component: filter tables and decode context, Sound
//! Unit decoding, Sound Unit encoding, and property tests tying the two
//! together.

mod encoder;

use super::SAMPLES_PER_SOUND_UNIT;

/// One Sound Unit of a sine wave, scaled to `amplitude`
pub(super) fn sine_unit(amplitude: f64, phase: usize) -> [i16; SAMPLES_PER_SOUND_UNIT] {
    let mut pcm = [0i16; SAMPLES_PER_SOUND_UNIT];
    for (i, sample) in pcm.iter_mut().enumerate() {
        let t = (phase + i) as f64 / 20.0;
        *sample = (amplitude * (t * std::f64::consts::TAU).sin()).round() as i16;
    }
    pcm
}
