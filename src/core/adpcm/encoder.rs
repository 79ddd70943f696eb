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

//! Sound Unit encoder
//!
//! Encoding one Sound Unit means picking a (filter, range) pair and
//! quantizing the prediction residual of every sample. Each quantized
//! sample is immediately decoded again with the decoder's arithmetic, and
//! that reconstruction (not the source sample) feeds the prediction of the
//! next sample, so the encoder tracks exactly what a real decoder will see.
//!
//! [`SoundUnitEncoder::search`] tries every pair and keeps the one with the
//! smallest maximum reconstruction error. Only when no pair can represent
//! the samples exactly within the quantizer's limits does it fall back to
//! saturating out-of-range residuals, which full-scale input can require.

use super::context::DecodeContext;
use super::filter::PredictionFilterTable;
use super::telemetry::{SoundUnitTelemetry, TelemetryListener, UnitDirection};
use super::{sound_parameter, BitsPerSample, SAMPLES_PER_SOUND_UNIT};
use crate::core::error::{AdpcmError, Result};

/// Result of encoding one Sound Unit with one (filter, range) pair
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedUnit {
    sound_parameter: u8,
    encoded_samples: [i8; SAMPLES_PER_SOUND_UNIT],
    max_absolute_delta: u32,
    context: DecodeContext,
}

impl EncodedUnit {
    /// Filter index in the high nibble, range in the low nibble
    pub fn sound_parameter(&self) -> u8 {
        self.sound_parameter
    }

    pub fn filter_index(&self) -> u8 {
        self.sound_parameter >> 4
    }

    pub fn range(&self) -> u8 {
        self.sound_parameter & 0xF
    }

    /// Quantized samples within the bit depth's encodable range
    pub fn encoded_samples(&self) -> &[i8; SAMPLES_PER_SOUND_UNIT] {
        &self.encoded_samples
    }

    /// Largest difference between a decoder's output and the source sample
    pub fn max_absolute_delta(&self) -> u32 {
        self.max_absolute_delta
    }

    /// Decode state a decoder would have after this unit
    pub fn context(&self) -> &DecodeContext {
        &self.context
    }

    pub fn into_context(self) -> DecodeContext {
        self.context
    }

    /// True if this candidate reconstructs the source more faithfully
    #[inline(always)]
    pub fn is_better_than(&self, other: &EncodedUnit) -> bool {
        self.max_absolute_delta < other.max_absolute_delta
    }
}

/// Handling of residuals outside the encodable range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quantize {
    /// Reject the candidate
    Strict,
    /// Clamp to the nearest encodable value
    Saturate,
}

/// Encoder for a single Sound Unit
#[derive(Debug, Clone, Copy)]
pub struct SoundUnitEncoder {
    filters: &'static PredictionFilterTable,
    bits: BitsPerSample,
}

impl SoundUnitEncoder {
    /// Create an encoder for the given filter table and sample width
    pub fn new(filters: &'static PredictionFilterTable, bits: BitsPerSample) -> Self {
        Self { filters, bits }
    }

    pub fn filters(&self) -> &'static PredictionFilterTable {
        self.filters
    }

    pub fn bits_per_sample(&self) -> BitsPerSample {
        self.bits
    }

    /// Split a caller-supplied sound parameter
    ///
    /// # Errors
    ///
    /// `InvalidSoundParameter` if the filter is not in the table or the
    /// range is above the bit depth's maximum.
    pub fn parse_parameter(&self, parameter: u8) -> Result<(u8, u8)> {
        let filter_index = parameter >> 4;
        let range = parameter & 0xF;
        if filter_index as usize >= self.filters.count() || range > self.bits.max_range() {
            return Err(AdpcmError::InvalidSoundParameter {
                parameter,
                bits_per_sample: self.bits.bits(),
            });
        }
        Ok((filter_index, range))
    }

    /// Encode 28 PCM samples with a fixed (filter, range) pair
    ///
    /// # Arguments
    ///
    /// * `context` - Channel history before this unit (not modified)
    /// * `filter_index` - Prediction filter
    /// * `range` - Range (0-15)
    /// * `pcm` - Source samples
    ///
    /// # Returns
    ///
    /// `None` if the filter does not exist or any residual falls outside the
    /// encodable range after rounding. Out-of-range residuals are rejected
    /// rather than clamped so error never grows unnoticed.
    pub fn encode(
        &self,
        context: &DecodeContext,
        filter_index: u8,
        range: u8,
        pcm: &[i16; SAMPLES_PER_SOUND_UNIT],
    ) -> Option<EncodedUnit> {
        self.encode_inner(context, filter_index, range, pcm, Quantize::Strict, None)
    }

    /// Same as [`encode`](Self::encode), reporting intermediate values of a
    /// successful encode
    pub fn encode_observed(
        &self,
        context: &DecodeContext,
        filter_index: u8,
        range: u8,
        pcm: &[i16; SAMPLES_PER_SOUND_UNIT],
        listener: &mut dyn TelemetryListener,
    ) -> Option<EncodedUnit> {
        let mut telemetry = SoundUnitTelemetry::new(UnitDirection::Encode, filter_index, range);
        let unit = self.encode_inner(
            context,
            filter_index,
            range,
            pcm,
            Quantize::Strict,
            Some(&mut telemetry),
        )?;
        listener.sound_unit(&telemetry);
        Some(unit)
    }

    /// Find the (filter, range) pair with the lowest maximum error
    ///
    /// Ranges are tried from the largest down to 0 and filters in ascending
    /// order. A later candidate only replaces the current best if it is
    /// strictly better, so the output is deterministic.
    ///
    /// If every pair rejects the samples (a near full-scale step the
    /// predictor cannot follow), the same order is searched again with
    /// residuals saturated to the encodable range. The saturation error is
    /// included in the candidate's `max_absolute_delta`.
    ///
    /// # Returns
    ///
    /// `None` only if the filter table is empty.
    pub fn search(
        &self,
        context: &DecodeContext,
        pcm: &[i16; SAMPLES_PER_SOUND_UNIT],
    ) -> Option<EncodedUnit> {
        self.search_with(context, pcm, Quantize::Strict)
            .or_else(|| self.search_with(context, pcm, Quantize::Saturate))
    }

    fn search_with(
        &self,
        context: &DecodeContext,
        pcm: &[i16; SAMPLES_PER_SOUND_UNIT],
        quantize: Quantize,
    ) -> Option<EncodedUnit> {
        let mut best: Option<EncodedUnit> = None;

        for range in (0..=self.bits.max_range()).rev() {
            for filter_index in 0..self.filters.count() as u8 {
                let Some(candidate) =
                    self.encode_inner(context, filter_index, range, pcm, quantize, None)
                else {
                    continue;
                };

                let replace = match &best {
                    Some(current) => candidate.is_better_than(current),
                    None => true,
                };
                if replace {
                    if candidate.max_absolute_delta == 0 {
                        return Some(candidate);
                    }
                    best = Some(candidate);
                }
            }
        }

        best
    }

    fn encode_inner(
        &self,
        context: &DecodeContext,
        filter_index: u8,
        range: u8,
        pcm: &[i16; SAMPLES_PER_SOUND_UNIT],
        quantize: Quantize,
        mut telemetry: Option<&mut SoundUnitTelemetry>,
    ) -> Option<EncodedUnit> {
        let filter = filter_index as usize;
        if filter >= self.filters.count() {
            return None;
        }
        let range = range & 0xF;

        let bits_to_shift = range as i32 - self.bits.sample_shift() as i32;
        let encode_min = self.bits.encode_min() as f64;
        let encode_max = self.bits.encode_max() as f64;

        let mut context = context.clone();
        let mut encoded_samples = [0i8; SAMPLES_PER_SOUND_UNIT];
        let mut max_absolute_delta = 0u32;

        for (i, &target) in pcm.iter().enumerate() {
            let prev1 = context.prev1();
            let prev2 = context.prev2();
            let prediction = self.filters.predict(filter, prev1, prev2);
            let filtered = target as f64 - prediction;

            let ranged = match bits_to_shift {
                0 => filtered,
                shift if shift > 0 => filtered * (1u32 << shift) as f64,
                shift => filtered / (1u32 << -shift) as f64,
            };

            let mut quantized = (ranged + 0.5).floor();
            if quantized < encode_min || quantized > encode_max {
                match quantize {
                    Quantize::Strict => return None,
                    Quantize::Saturate => quantized = quantized.clamp(encode_min, encode_max),
                }
            }
            let encoded = quantized as i8;
            encoded_samples[i] = encoded;

            // Reconstruct exactly as the decoder will
            let expanded = (encoded as i16) << self.bits.sample_shift();
            let unranged = (expanded as i32) >> range;
            let decoded = unranged as f64 + prediction;
            let output = context.to_pcm(decoded);
            context.update(decoded);

            let delta = (output as i32 - target as i32).unsigned_abs();
            max_absolute_delta = max_absolute_delta.max(delta);

            if let Some(t) = telemetry.as_deref_mut() {
                t.encoded[i] = encoded as i32;
                t.unranged[i] = unranged;
                t.prev1[i] = prev1;
                t.prev2[i] = prev2;
                t.reconstructed[i] = decoded;
                t.pcm[i] = target;
            }
        }

        Some(EncodedUnit {
            sound_parameter: sound_parameter(filter_index, range),
            encoded_samples,
            max_absolute_delta,
            context,
        })
    }
}
