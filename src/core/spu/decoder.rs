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

//! SPU-ADPCM stream decoder
//!
//! Reads 16-byte Sound Units from one input stream per channel and writes
//! interleaved little-endian 16-bit PCM. Stereo reads one Sound Unit from
//! each channel's stream per iteration; the channels only share the
//! [`DecodeReport`].

use super::sound_unit::{SpuSoundUnit, MAX_EXPECTED_RANGE, SPU_SOUND_UNIT_SIZE};
use crate::core::adpcm::{
    BitsPerSample, DecodeContext, DecodeReport, SoundUnitDecoder, TelemetryListener,
    SAMPLES_PER_SOUND_UNIT, SPU_FILTERS,
};
use crate::core::error::{AdpcmError, Result};
use crate::core::pcm::ChannelLayout;
use std::io::{ErrorKind, Read, Write};

/// SPU-ADPCM decoder for a mono or stereo stream
pub struct SpuAdpcmDecoder {
    layout: ChannelLayout,
    decoder: SoundUnitDecoder,
    contexts: Vec<DecodeContext>,
    report: DecodeReport,
}

impl SpuAdpcmDecoder {
    /// Create a decoder
    ///
    /// # Arguments
    ///
    /// * `layout` - Mono (one input stream) or stereo (two)
    /// * `volume` - Output multiplier applied to every channel
    pub fn new(layout: ChannelLayout, volume: f64) -> Self {
        Self {
            layout,
            decoder: SoundUnitDecoder::new(&SPU_FILTERS, BitsPerSample::Four),
            contexts: vec![DecodeContext::new(volume); layout.channels()],
            report: DecodeReport::default(),
        }
    }

    pub fn layout(&self) -> ChannelLayout {
        self.layout
    }

    /// Position and corruption state
    pub fn report(&self) -> &DecodeReport {
        &self.report
    }

    pub fn had_corruption(&self) -> bool {
        self.report.had_corruption
    }

    pub fn context(&self, channel: usize) -> &DecodeContext {
        &self.contexts[channel]
    }

    pub fn set_volume(&mut self, volume: f64) {
        for context in &mut self.contexts {
            context.set_volume_scale(volume);
        }
    }

    /// Clear every channel's sample history (e.g. after a seek)
    ///
    /// Position and corruption reporting is kept.
    pub fn reset_context(&mut self) {
        for context in &mut self.contexts {
            context.reset();
        }
        log::debug!(
            "SPU ADPCM: context reset after {} sound units",
            self.report.sound_units_read
        );
    }

    /// Number of PCM bytes produced for `sample_frames` frames
    pub fn pcm_bytes_for_frames(&self, sample_frames: usize) -> usize {
        sample_frames * self.layout.channels() * 2
    }

    /// Decode `sample_frames` frames of audio
    ///
    /// # Arguments
    ///
    /// * `inputs` - One Sound Unit stream per channel
    /// * `sample_frames` - Frames to produce, a multiple of 28
    /// * `output` - Receives interleaved little-endian PCM
    ///
    /// # Errors
    ///
    /// - `StreamCountMismatch` if `inputs` does not match the layout
    /// - `UnalignedFrameCount` if `sample_frames` is not a multiple of 28
    /// - `EndOfStream` if an input runs out first
    pub fn decode<R: Read, W: Write>(
        &mut self,
        inputs: &mut [R],
        sample_frames: usize,
        output: &mut W,
    ) -> Result<()> {
        self.decode_inner(inputs, sample_frames, output, None)
    }

    /// Same as [`decode`](Self::decode), reporting every decoded Sound Unit
    pub fn decode_observed<R: Read, W: Write>(
        &mut self,
        inputs: &mut [R],
        sample_frames: usize,
        output: &mut W,
        listener: &mut dyn TelemetryListener,
    ) -> Result<()> {
        self.decode_inner(inputs, sample_frames, output, Some(listener))
    }

    fn decode_inner<R: Read, W: Write>(
        &mut self,
        inputs: &mut [R],
        sample_frames: usize,
        output: &mut W,
        mut listener: Option<&mut dyn TelemetryListener>,
    ) -> Result<()> {
        let channels = self.layout.channels();
        if inputs.len() != channels {
            return Err(AdpcmError::StreamCountMismatch {
                expected: channels,
                got: inputs.len(),
            });
        }
        if sample_frames % SAMPLES_PER_SOUND_UNIT != 0 {
            return Err(AdpcmError::UnalignedFrameCount(sample_frames));
        }

        let mut pcm = vec![[0i16; SAMPLES_PER_SOUND_UNIT]; channels];
        let mut bytes = Vec::with_capacity(SAMPLES_PER_SOUND_UNIT * channels * 2);

        for _ in 0..sample_frames / SAMPLES_PER_SOUND_UNIT {
            for (channel, input) in inputs.iter_mut().enumerate() {
                self.report.current_channel = channel;
                let unit = self.read_sound_unit(input, channel)?;

                let parameter = unit.sound_parameter();
                self.check_corruption(&unit);

                let context = &mut self.contexts[channel];
                pcm[channel] = match listener.as_deref_mut() {
                    Some(listener) => self.decoder.decode_observed(
                        context,
                        parameter.filter_index,
                        parameter.range,
                        unit.samples(),
                        listener,
                    ),
                    None => self.decoder.decode(
                        context,
                        parameter.filter_index,
                        parameter.range,
                        unit.samples(),
                    ),
                };
            }

            bytes.clear();
            for i in 0..SAMPLES_PER_SOUND_UNIT {
                for samples in &pcm {
                    bytes.extend_from_slice(&samples[i].to_le_bytes());
                }
            }
            output.write_all(&bytes)?;

            self.report.sound_units_read += 1;
            self.report.sample_frames_written += SAMPLES_PER_SOUND_UNIT as u64;
        }

        Ok(())
    }

    fn read_sound_unit<R: Read>(&self, input: &mut R, channel: usize) -> Result<SpuSoundUnit> {
        let mut bytes = [0u8; SPU_SOUND_UNIT_SIZE];
        input.read_exact(&mut bytes).map_err(|e| {
            if e.kind() == ErrorKind::UnexpectedEof {
                AdpcmError::EndOfStream {
                    channel,
                    sound_unit: self.report.sound_units_read,
                }
            } else {
                AdpcmError::Io(e)
            }
        })?;
        Ok(SpuSoundUnit::parse(&bytes))
    }

    /// Log and flag header corruption; decoding continues either way
    fn check_corruption(&mut self, unit: &SpuSoundUnit) {
        let parameter = unit.sound_parameter();

        if parameter.is_corrupted() {
            self.report.had_corruption = true;
            log::warn!(
                "SPU ADPCM corruption: channel {} sound unit {} (frames written {}): \
                 filter index {} replaced with {}",
                self.report.current_channel,
                self.report.sound_units_read,
                self.report.sample_frames_written,
                parameter.raw_filter_index,
                parameter.filter_index
            );
        }

        if unit.has_flag_corruption() {
            self.report.had_corruption = true;
            log::warn!(
                "SPU ADPCM corruption: channel {} sound unit {} (frames written {}): \
                 unexpected flag bits 0x{:02X}",
                self.report.current_channel,
                self.report.sound_units_read,
                self.report.sample_frames_written,
                unit.flag_byte()
            );
        }

        if parameter.range > MAX_EXPECTED_RANGE {
            log::debug!(
                "SPU ADPCM: channel {} sound unit {} has suspicious range {}",
                self.report.current_channel,
                self.report.sound_units_read,
                parameter.range
            );
        }
    }
}
