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

//! CD-XA ADPCM sector encoder
//!
//! One call encodes one sector: 18 Sound Groups built from consecutive
//! Sound Units, followed by zero padding. Stereo input alternates left and
//! right units inside every group (even units left, odd units right).

use super::sound_group::{units_per_group, SoundGroup, XA_SOUND_GROUP_SIZE};
use super::{XA_SECTOR_DATA_SIZE, XA_SOUND_GROUPS_PER_SECTOR};
use crate::core::adpcm::{
    BitsPerSample, DecodeContext, EncodedUnit, SoundUnitEncoder, SAMPLES_PER_SOUND_UNIT,
    XA_FILTERS,
};
use crate::core::error::{AdpcmError, Result};
use crate::core::pcm::{AudioShortReader, ChannelLayout};
use std::io::{Read, Write};

/// Sample rate of a full-rate XA stream (Hz)
pub const XA_SAMPLE_RATE_FULL: u32 = 37800;

/// Sample rate of a half-rate XA stream (Hz)
pub const XA_SAMPLE_RATE_HALF: u32 = 18900;

/// Coding info byte of a CD-XA audio sector subheader
///
/// ```text
/// Bit 0:    stereo
/// Bit 2:    18900 Hz (37800 Hz when clear)
/// Bit 4:    8 bits per sample (4 when clear)
/// Bit 6:    emphasis
/// Others:   reserved, zero
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XaCodingInfo {
    pub layout: ChannelLayout,
    pub half_rate: bool,
    pub bits: BitsPerSample,
    pub emphasis: bool,
}

impl XaCodingInfo {
    const STEREO: u8 = 1 << 0;
    const HALF_RATE: u8 = 1 << 2;
    const EIGHT_BIT: u8 = 1 << 4;
    const EMPHASIS: u8 = 1 << 6;
    const RESERVED: u8 = !(Self::STEREO | Self::HALF_RATE | Self::EIGHT_BIT | Self::EMPHASIS);

    pub fn sample_rate(&self) -> u32 {
        if self.half_rate {
            XA_SAMPLE_RATE_HALF
        } else {
            XA_SAMPLE_RATE_FULL
        }
    }

    pub fn to_byte(&self) -> u8 {
        let mut byte = 0;
        if self.layout == ChannelLayout::Stereo {
            byte |= Self::STEREO;
        }
        if self.half_rate {
            byte |= Self::HALF_RATE;
        }
        if self.bits == BitsPerSample::Eight {
            byte |= Self::EIGHT_BIT;
        }
        if self.emphasis {
            byte |= Self::EMPHASIS;
        }
        byte
    }

    /// Parse a coding info byte
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if any reserved bit is set.
    pub fn from_byte(byte: u8) -> Result<Self> {
        if byte & Self::RESERVED != 0 {
            return Err(AdpcmError::InvalidConfig(format!(
                "XA coding info 0x{:02X} has reserved bits set",
                byte
            )));
        }

        Ok(Self {
            layout: if byte & Self::STEREO != 0 {
                ChannelLayout::Stereo
            } else {
                ChannelLayout::Mono
            },
            half_rate: byte & Self::HALF_RATE != 0,
            bits: if byte & Self::EIGHT_BIT != 0 {
                BitsPerSample::Eight
            } else {
                BitsPerSample::Four
            },
            emphasis: byte & Self::EMPHASIS != 0,
        })
    }
}

/// CD-XA ADPCM encoder reading 16-bit PCM
pub struct XaAdpcmEncoder<R> {
    reader: AudioShortReader<R>,
    encoder: SoundUnitEncoder,
    contexts: Vec<DecodeContext>,
    pcm: Vec<[i16; SAMPLES_PER_SOUND_UNIT]>,
    half_rate: bool,
    emphasis: bool,
    sound_units_encoded: u64,
    sectors_encoded: u64,
}

impl<R: Read> XaAdpcmEncoder<R> {
    /// Create an encoder for the reader's channels
    ///
    /// # Arguments
    ///
    /// * `reader` - Mono or stereo PCM source
    /// * `bits` - 4-bit (8 units per group) or 8-bit (4 units per group)
    pub fn new(reader: AudioShortReader<R>, bits: BitsPerSample) -> Self {
        let channels = reader.format().channels();
        Self {
            reader,
            encoder: SoundUnitEncoder::new(&XA_FILTERS, bits),
            contexts: vec![DecodeContext::new(1.0); channels],
            pcm: vec![[0; SAMPLES_PER_SOUND_UNIT]; channels],
            half_rate: false,
            emphasis: false,
            sound_units_encoded: 0,
            sectors_encoded: 0,
        }
    }

    pub fn bits_per_sample(&self) -> BitsPerSample {
        self.encoder.bits_per_sample()
    }

    /// Select the sample rate advertised in the coding info
    ///
    /// # Errors
    ///
    /// `InvalidConfig` unless `rate` is 37800 or 18900.
    pub fn set_sample_rate(&mut self, rate: u32) -> Result<()> {
        self.half_rate = match rate {
            XA_SAMPLE_RATE_FULL => false,
            XA_SAMPLE_RATE_HALF => true,
            _ => {
                return Err(AdpcmError::InvalidConfig(format!(
                    "XA sample rate must be {} or {}, got {}",
                    XA_SAMPLE_RATE_FULL, XA_SAMPLE_RATE_HALF, rate
                )))
            }
        };
        Ok(())
    }

    pub fn set_emphasis(&mut self, emphasis: bool) {
        self.emphasis = emphasis;
    }

    /// Subheader coding info describing the encoded stream
    pub fn coding_info(&self) -> XaCodingInfo {
        XaCodingInfo {
            layout: self.reader.format().layout(),
            half_rate: self.half_rate,
            bits: self.bits_per_sample(),
            emphasis: self.emphasis,
        }
    }

    /// True once the PCM source is exhausted
    pub fn is_eof(&self) -> bool {
        self.reader.is_eof()
    }

    pub fn sample_frames_read(&self) -> u64 {
        self.reader.sample_frames_read()
    }

    pub fn sectors_encoded(&self) -> u64 {
        self.sectors_encoded
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

    /// Encode one sector, searching the best parameters per Sound Unit
    ///
    /// Writes 2324 bytes: 18 Sound Groups and 20 bytes of zero padding.
    ///
    /// # Errors
    ///
    /// `Io` if reading the PCM or writing the sector fails
    pub fn encode_sector<W: Write>(&mut self, output: &mut W) -> Result<()> {
        self.encode_inner(output, None)
    }

    /// Encode one sector with one fixed sound parameter for every unit
    ///
    /// Skips the search; meant for development and testing.
    ///
    /// # Errors
    ///
    /// - `InvalidSoundParameter` if `parameter` names no valid pair
    /// - `UnencodableSoundUnit` if any unit's samples do not fit the pair.
    ///   Nothing is written and no context changes, but the PCM read for
    ///   the sector so far is consumed and not read again.
    pub fn encode_sector_with_parameters<W: Write>(
        &mut self,
        output: &mut W,
        parameter: u8,
    ) -> Result<()> {
        let parameter = self.encoder.parse_parameter(parameter)?;
        self.encode_inner(output, Some(parameter))
    }

    fn encode_inner<W: Write>(
        &mut self,
        output: &mut W,
        parameter: Option<(u8, u8)>,
    ) -> Result<()> {
        // Committed only once the whole sector is written
        let mut contexts = self.contexts.clone();
        let mut sound_units = self.sound_units_encoded;
        let mut sector = Vec::with_capacity(XA_SECTOR_DATA_SIZE);

        for _ in 0..XA_SOUND_GROUPS_PER_SECTOR {
            let group = self.encode_sound_group(parameter, &mut contexts, &mut sound_units)?;
            sector.extend_from_slice(&group.to_bytes());
        }
        debug_assert_eq!(sector.len(), XA_SOUND_GROUPS_PER_SECTOR * XA_SOUND_GROUP_SIZE);
        sector.resize(XA_SECTOR_DATA_SIZE, 0);

        output.write_all(&sector)?;
        self.contexts = contexts;
        self.sound_units_encoded = sound_units;
        self.sectors_encoded += 1;
        Ok(())
    }

    fn encode_sound_group(
        &mut self,
        parameter: Option<(u8, u8)>,
        contexts: &mut [DecodeContext],
        sound_units: &mut u64,
    ) -> Result<SoundGroup> {
        let bits = self.bits_per_sample();
        let channels = contexts.len();
        let mut group = SoundGroup::new(bits);

        for first_unit in (0..units_per_group(bits)).step_by(channels) {
            self.reader.read_into(&mut self.pcm)?;

            for channel in 0..channels {
                let unit =
                    self.encode_channel(&contexts[channel], channel, *sound_units, parameter)?;
                log::trace!(
                    "XA ADPCM: sector {} channel {} sound unit {} -> parameter 0x{:02X}, \
                     max delta {}",
                    self.sectors_encoded,
                    channel,
                    sound_units,
                    unit.sound_parameter(),
                    unit.max_absolute_delta()
                );

                group.set_unit(
                    first_unit + channel,
                    unit.sound_parameter(),
                    unit.encoded_samples(),
                );
                contexts[channel] = unit.into_context();
            }

            *sound_units += 1;
        }

        Ok(group)
    }

    fn encode_channel(
        &self,
        context: &DecodeContext,
        channel: usize,
        sound_unit: u64,
        parameter: Option<(u8, u8)>,
    ) -> Result<EncodedUnit> {
        let pcm = &self.pcm[channel];

        let unit = match parameter {
            Some((filter_index, range)) => self.encoder.encode(context, filter_index, range, pcm),
            None => self.encoder.search(context, pcm),
        };

        unit.ok_or(AdpcmError::UnencodableSoundUnit {
            channel,
            sound_unit,
        })
    }
}
