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

//! Sound Unit decoder

use super::context::DecodeContext;
use super::filter::PredictionFilterTable;
use super::telemetry::{SoundUnitTelemetry, TelemetryListener, UnitDirection};
use super::{BitsPerSample, SAMPLES_PER_SOUND_UNIT};

/// Decoder for a single Sound Unit
///
/// Stateless apart from its configuration: all history lives in the
/// [`DecodeContext`] passed to each call, so one decoder can serve any
/// number of channels.
#[derive(Debug, Clone, Copy)]
pub struct SoundUnitDecoder {
    filters: &'static PredictionFilterTable,
    bits: BitsPerSample,
}

impl SoundUnitDecoder {
    /// Create a decoder for the given filter table and sample width
    pub fn new(filters: &'static PredictionFilterTable, bits: BitsPerSample) -> Self {
        Self { filters, bits }
    }

    pub fn filters(&self) -> &'static PredictionFilterTable {
        self.filters
    }

    pub fn bits_per_sample(&self) -> BitsPerSample {
        self.bits
    }

    /// Decode 28 encoded samples into 16-bit PCM
    ///
    /// # Arguments
    ///
    /// * `context` - Channel history, updated once per sample
    /// * `filter_index` - Prediction filter (must be valid for the table)
    /// * `range` - Right shift applied after sample expansion (0-15)
    /// * `encoded` - Sign-extended 4-bit or 8-bit samples
    ///
    /// # Returns
    ///
    /// 28 PCM samples, volume-scaled, rounded and clamped by the context
    ///
    /// # Panics
    ///
    /// Panics if `filter_index` is outside the filter table. Stream decoders
    /// recover corrupted filter indices before calling this.
    pub fn decode(
        &self,
        context: &mut DecodeContext,
        filter_index: u8,
        range: u8,
        encoded: &[i8; SAMPLES_PER_SOUND_UNIT],
    ) -> [i16; SAMPLES_PER_SOUND_UNIT] {
        self.decode_inner(context, filter_index, range, encoded, None)
    }

    /// Same as [`decode`](Self::decode), reporting intermediate values
    pub fn decode_observed(
        &self,
        context: &mut DecodeContext,
        filter_index: u8,
        range: u8,
        encoded: &[i8; SAMPLES_PER_SOUND_UNIT],
        listener: &mut dyn TelemetryListener,
    ) -> [i16; SAMPLES_PER_SOUND_UNIT] {
        let mut telemetry = SoundUnitTelemetry::new(UnitDirection::Decode, filter_index, range);
        let pcm = self.decode_inner(context, filter_index, range, encoded, Some(&mut telemetry));
        listener.sound_unit(&telemetry);
        pcm
    }

    fn decode_inner(
        &self,
        context: &mut DecodeContext,
        filter_index: u8,
        range: u8,
        encoded: &[i8; SAMPLES_PER_SOUND_UNIT],
        mut telemetry: Option<&mut SoundUnitTelemetry>,
    ) -> [i16; SAMPLES_PER_SOUND_UNIT] {
        let filter = filter_index as usize;
        let mut pcm = [0i16; SAMPLES_PER_SOUND_UNIT];

        for (i, &sample) in encoded.iter().enumerate() {
            let unranged = self.unranged(sample, range);
            let prev1 = context.prev1();
            let prev2 = context.prev2();
            let decoded = unranged as f64 + self.filters.predict(filter, prev1, prev2);

            pcm[i] = context.to_pcm(decoded);
            context.update(decoded);

            if let Some(t) = telemetry.as_deref_mut() {
                t.encoded[i] = sample as i32;
                t.unranged[i] = unranged;
                t.prev1[i] = prev1;
                t.prev2[i] = prev2;
                t.reconstructed[i] = decoded;
                t.pcm[i] = pcm[i];
            }
        }

        pcm
    }

    /// Expand an encoded sample so its sign bit is bit 15, then shift it
    /// right (arithmetic) by `range`
    #[inline(always)]
    pub(crate) fn unranged(&self, sample: i8, range: u8) -> i32 {
        let expanded = (sample as i16) << self.bits.sample_shift();
        (expanded as i32) >> (range & 0xF)
    }
}
