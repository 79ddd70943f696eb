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

//! Diagnostic telemetry for Sound Unit coding
//!
//! Telemetry is only collected when a listener is passed to one of the
//! `*_observed` calls. It never changes what is decoded or encoded.

use super::SAMPLES_PER_SOUND_UNIT;
use serde::Serialize;

/// Whether the telemetry came from decoding or encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum UnitDirection {
    #[default]
    Decode,
    Encode,
}

/// Intermediate values of one coded Sound Unit
#[derive(Debug, Clone, Default, Serialize)]
pub struct SoundUnitTelemetry {
    pub direction: UnitDirection,
    pub filter_index: u8,
    pub range: u8,

    /// Raw encoded sample (sign-extended nibble or byte)
    pub encoded: [i32; SAMPLES_PER_SOUND_UNIT],

    /// Encoded sample after expansion and the range shift
    pub unranged: [i32; SAMPLES_PER_SOUND_UNIT],

    /// History before each sample was reconstructed
    pub prev1: [f64; SAMPLES_PER_SOUND_UNIT],
    pub prev2: [f64; SAMPLES_PER_SOUND_UNIT],

    /// Reconstructed sample before volume and rounding
    pub reconstructed: [f64; SAMPLES_PER_SOUND_UNIT],

    /// Output PCM when decoding, target PCM when encoding
    pub pcm: [i16; SAMPLES_PER_SOUND_UNIT],
}

impl SoundUnitTelemetry {
    pub(crate) fn new(direction: UnitDirection, filter_index: u8, range: u8) -> Self {
        Self {
            direction,
            filter_index,
            range,
            ..Default::default()
        }
    }
}

/// Receiver of Sound Unit telemetry
pub trait TelemetryListener {
    fn sound_unit(&mut self, telemetry: &SoundUnitTelemetry);
}

impl<F> TelemetryListener for F
where
    F: FnMut(&SoundUnitTelemetry),
{
    fn sound_unit(&mut self, telemetry: &SoundUnitTelemetry) {
        self(telemetry)
    }
}
