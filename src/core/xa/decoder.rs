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

//! CD-XA ADPCM sector decoder
//!
//! Decodes the 2304-byte audio payload of one sector at a time. Header
//! damage is recovered instead of rejected: redundant parameter copies are
//! voted on and out-of-table filters are masked to two bits.

use super::encoder::XaCodingInfo;
use super::sound_group::{SoundGroup, XA_SOUND_GROUP_SIZE};
use super::{samples_per_sector, XA_SECTOR_AUDIO_SIZE};
use crate::core::adpcm::{
    BitsPerSample, DecodeContext, DecodeReport, SoundUnitDecoder, TelemetryListener,
    SAMPLES_PER_SOUND_UNIT, XA_FILTERS,
};
use crate::core::error::{AdpcmError, Result};
use crate::core::pcm::ChannelLayout;
use std::io::Write;

/// CD-XA ADPCM decoder for a mono or stereo stream
pub struct XaAdpcmDecoder {
    layout: ChannelLayout,
    decoder: SoundUnitDecoder,
    contexts: Vec<DecodeContext>,
    report: DecodeReport,
}

impl XaAdpcmDecoder {
    /// Create a decoder
    ///
    /// # Arguments
    ///
    /// * `layout` - Mono, or stereo with alternating left/right units
    /// * `bits` - Sample width of the stream
    /// * `volume` - Output multiplier applied to every channel
    pub fn new(layout: ChannelLayout, bits: BitsPerSample, volume: f64) -> Self {
        Self {
            layout,
            decoder: SoundUnitDecoder::new(&XA_FILTERS, bits),
            contexts: vec![DecodeContext::new(volume); layout.channels()],
            report: DecodeReport::default(),
        }
    }

    /// Create a decoder matching a sector's coding info
    pub fn from_coding_info(info: XaCodingInfo, volume: f64) -> Self {
        Self::new(info.layout, info.bits, volume)
    }

    pub fn layout(&self) -> ChannelLayout {
        self.layout
    }

    pub fn bits_per_sample(&self) -> BitsPerSample {
        self.decoder.bits_per_sample()
    }

    pub fn report(&self) -> &DecodeReport {
        &self.report
    }

    pub fn had_corruption(&self) -> bool {
        self.report.had_corruption
    }

    pub fn context(&self, channel: usize) -> &DecodeContext {
        &self.contexts[channel]
    }

    /// Clear every channel's sample history
    pub fn reset_context(&mut self) {
        for context in &mut self.contexts {
            context.reset();
        }
        log::debug!(
            "XA ADPCM: context reset after {} sound units",
            self.report.sound_units_read
        );
    }

    /// Sample frames produced by every call to [`decode_sector`](Self::decode_sector)
    pub fn sample_frames_per_sector(&self) -> usize {
        samples_per_sector(self.bits_per_sample(), self.layout)
    }

    /// Decode the audio payload of one sector
    ///
    /// # Arguments
    ///
    /// * `audio` - Sector user data; only the first 2304 bytes are used
    /// * `output` - Receives interleaved little-endian PCM
    ///
    /// # Errors
    ///
    /// - `EndOfStream` if `audio` is shorter than 2304 bytes
    /// - `Io` if writing fails
    pub fn decode_sector<W: Write>(&mut self, audio: &[u8], output: &mut W) -> Result<()> {
        self.decode_inner(audio, output, None)
    }

    /// Same as [`decode_sector`](Self::decode_sector), reporting every
    /// decoded Sound Unit
    pub fn decode_sector_observed<W: Write>(
        &mut self,
        audio: &[u8],
        output: &mut W,
        listener: &mut dyn TelemetryListener,
    ) -> Result<()> {
        self.decode_inner(audio, output, Some(listener))
    }

    fn decode_inner<W: Write>(
        &mut self,
        audio: &[u8],
        output: &mut W,
        mut listener: Option<&mut dyn TelemetryListener>,
    ) -> Result<()> {
        if audio.len() < XA_SECTOR_AUDIO_SIZE {
            return Err(AdpcmError::EndOfStream {
                channel: 0,
                sound_unit: self.report.sound_units_read,
            });
        }

        let channels = self.layout.channels();
        let bits = self.bits_per_sample();
        let mut bytes = Vec::with_capacity(self.sample_frames_per_sector() * channels * 2);
        let mut pcm = vec![[0i16; SAMPLES_PER_SOUND_UNIT]; channels];
        let mut group_bytes = [0u8; XA_SOUND_GROUP_SIZE];

        for chunk in audio[..XA_SECTOR_AUDIO_SIZE].chunks_exact(XA_SOUND_GROUP_SIZE) {
            group_bytes.copy_from_slice(chunk);
            let group = SoundGroup::parse(&group_bytes, bits);

            for unit in 0..group.unit_count() {
                let channel = unit % channels;
                self.report.current_channel = channel;

                let (filter_index, range) = self.check_corruption(&group, unit);
                let context = &mut self.contexts[channel];
                pcm[channel] = match listener.as_deref_mut() {
                    Some(listener) => self.decoder.decode_observed(
                        context,
                        filter_index,
                        range,
                        group.samples(unit),
                        listener,
                    ),
                    None => self.decoder.decode(context, filter_index, range, group.samples(unit)),
                };

                if channel + 1 == channels {
                    for i in 0..SAMPLES_PER_SOUND_UNIT {
                        for samples in &pcm {
                            bytes.extend_from_slice(&samples[i].to_le_bytes());
                        }
                    }
                    self.report.sound_units_read += 1;
                    self.report.sample_frames_written += SAMPLES_PER_SOUND_UNIT as u64;
                }
            }
        }

        output.write_all(&bytes)?;
        Ok(())
    }

    /// Recover the parameter of one unit, logging and flagging damage
    fn check_corruption(&mut self, group: &SoundGroup, unit: usize) -> (u8, u8) {
        let parameter = group.parameter(unit);
        let raw_filter_index = parameter >> 4;
        let filter_index = raw_filter_index & 0x3;
        let range = parameter & 0xF;

        if group.inconsistent_units() & (1 << unit) != 0 {
            self.report.had_corruption = true;
            log::warn!(
                "XA ADPCM corruption: channel {} sound unit {} (frames written {}): \
                 parameter copies disagree, using 0x{:02X}",
                self.report.current_channel,
                self.report.sound_units_read,
                self.report.sample_frames_written,
                parameter
            );
        }

        if raw_filter_index != filter_index {
            self.report.had_corruption = true;
            log::warn!(
                "XA ADPCM corruption: channel {} sound unit {} (frames written {}): \
                 filter index {} replaced with {}",
                self.report.current_channel,
                self.report.sound_units_read,
                self.report.sample_frames_written,
                raw_filter_index,
                filter_index
            );
        }

        if range > self.bits_per_sample().max_range() {
            log::debug!(
                "XA ADPCM: channel {} sound unit {} has suspicious range {}",
                self.report.current_channel,
                self.report.sound_units_read,
                range
            );
        }

        (filter_index, range)
    }
}
