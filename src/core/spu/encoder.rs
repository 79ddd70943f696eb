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

//! SPU-ADPCM stream encoder
//!
//! Every channel is encoded on its own, one Sound Unit at a time, and
//! written to its own output stream as 16-byte SPU Sound Units.

use super::sound_unit::{SpuFlags, SpuSoundUnit};
use crate::core::adpcm::{
    BitsPerSample, DecodeContext, EncodedUnit, SoundUnitEncoder, SAMPLES_PER_SOUND_UNIT,
    SPU_FILTERS,
};
use crate::core::error::{AdpcmError, Result};
use crate::core::pcm::AudioShortReader;
use std::io::{Read, Write};

/// SPU-ADPCM encoder reading 16-bit PCM
pub struct SpuAdpcmEncoder<R> {
    reader: AudioShortReader<R>,
    encoder: SoundUnitEncoder,
    contexts: Vec<DecodeContext>,
    pcm: Vec<[i16; SAMPLES_PER_SOUND_UNIT]>,
    sound_units_encoded: u64,
}

impl<R: Read> SpuAdpcmEncoder<R> {
    /// Create an encoder for the reader's channels
    pub fn new(reader: AudioShortReader<R>) -> Self {
        let channels = reader.format().channels();
        Self {
            reader,
            encoder: SoundUnitEncoder::new(&SPU_FILTERS, BitsPerSample::Four),
            contexts: vec![DecodeContext::new(1.0); channels],
            pcm: vec![[0; SAMPLES_PER_SOUND_UNIT]; channels],
            sound_units_encoded: 0,
        }
    }

    pub fn channels(&self) -> usize {
        self.contexts.len()
    }

    /// True once the PCM source is exhausted
    pub fn is_eof(&self) -> bool {
        self.reader.is_eof()
    }

    pub fn sample_frames_read(&self) -> u64 {
        self.reader.sample_frames_read()
    }

    /// Sound Units written per channel so far
    pub fn sound_units_encoded(&self) -> u64 {
        self.sound_units_encoded
    }

    pub fn context(&self, channel: usize) -> &DecodeContext {
        &self.contexts[channel]
    }

    /// Clear every channel's sample history
    pub fn reset_context(&mut self) {
        for context in &mut self.contexts {
            context.reset();
        }
    }

    /// Encode the next 28 sample frames, searching the best parameters
    ///
    /// # Arguments
    ///
    /// * `outputs` - One Sound Unit stream per channel
    /// * `flags` - Loop flags written to every channel's Sound Unit
    ///
    /// # Errors
    ///
    /// - `StreamCountMismatch` if `outputs` does not match the channels
    pub fn encode_sound_unit<W: Write>(
        &mut self,
        outputs: &mut [W],
        flags: SpuFlags,
    ) -> Result<()> {
        self.encode_inner(outputs, None, flags)
    }

    /// Encode the next 28 sample frames with fixed sound parameters
    ///
    /// Skips the search; meant for development and testing.
    ///
    /// # Arguments
    ///
    /// * `parameters` - One sound parameter byte per channel
    ///
    /// # Errors
    ///
    /// - `InvalidSoundParameter` if a parameter names no valid pair
    /// - `UnencodableSoundUnit` if a channel's samples do not fit its pair.
    ///   Nothing is written and no context changes, but the 28 frames read
    ///   for this call are consumed and not read again.
    pub fn encode_sound_unit_with_parameters<W: Write>(
        &mut self,
        outputs: &mut [W],
        parameters: &[u8],
        flags: SpuFlags,
    ) -> Result<()> {
        if parameters.len() != self.channels() {
            return Err(AdpcmError::StreamCountMismatch {
                expected: self.channels(),
                got: parameters.len(),
            });
        }
        self.encode_inner(outputs, Some(parameters), flags)
    }

    fn encode_inner<W: Write>(
        &mut self,
        outputs: &mut [W],
        parameters: Option<&[u8]>,
        flags: SpuFlags,
    ) -> Result<()> {
        if outputs.len() != self.channels() {
            return Err(AdpcmError::StreamCountMismatch {
                expected: self.channels(),
                got: outputs.len(),
            });
        }

        self.reader.read_into(&mut self.pcm)?;

        let units = (0..self.channels())
            .map(|channel| self.encode_channel(channel, parameters.map(|p| p[channel])))
            .collect::<Result<Vec<_>>>()?;

        for (channel, unit) in units.into_iter().enumerate() {
            log::trace!(
                "SPU ADPCM: channel {} sound unit {} -> parameter 0x{:02X}, max delta {}",
                channel,
                self.sound_units_encoded,
                unit.sound_parameter(),
                unit.max_absolute_delta()
            );

            let bytes = SpuSoundUnit::from_encoded(&unit, flags).to_bytes();
            outputs[channel].write_all(&bytes)?;
            self.contexts[channel] = unit.into_context();
        }

        self.sound_units_encoded += 1;
        Ok(())
    }

    fn encode_channel(&self, channel: usize, parameter: Option<u8>) -> Result<EncodedUnit> {
        let context = &self.contexts[channel];
        let pcm = &self.pcm[channel];

        let unit = match parameter {
            Some(parameter) => {
                let (filter_index, range) = self.encoder.parse_parameter(parameter)?;
                self.encoder.encode(context, filter_index, range, pcm)
            }
            None => self.encoder.search(context, pcm),
        };

        unit.ok_or(AdpcmError::UnencodableSoundUnit {
            channel,
            sound_unit: self.sound_units_encoded,
        })
    }
}
