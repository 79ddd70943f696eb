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

//! Test fixtures for common test scenarios

use psx_adpcm::core::adpcm::PredictionFilterTable;
use psx_adpcm::core::spu::SpuFlags;
use psx_adpcm::core::{
    AudioShortReader, BitsPerSample, ChannelLayout, DecodeContext, PcmFormat, SoundUnitEncoder,
    SpuAdpcmEncoder, SAMPLES_PER_SOUND_UNIT,
};
use std::io::Cursor;

/// Sine tone of `frames` samples
#[allow(dead_code)]
pub fn tone(frames: usize, amplitude: f64, period: f64) -> Vec<i16> {
    (0..frames)
        .map(|i| (amplitude * (i as f64 / period * std::f64::consts::TAU).sin()).round() as i16)
        .collect()
}

/// Interleave two channels
#[allow(dead_code)]
pub fn interleave(left: &[i16], right: &[i16]) -> Vec<i16> {
    left.iter().zip(right).flat_map(|(&l, &r)| [l, r]).collect()
}

#[allow(dead_code)]
pub fn le_bytes(samples: &[i16]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}

#[allow(dead_code)]
pub fn be_bytes(samples: &[i16]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_be_bytes()).collect()
}

#[allow(dead_code)]
pub fn pcm_samples(bytes: &[u8]) -> Vec<i16> {
    bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect()
}

/// Reader over interleaved little-endian PCM
#[allow(dead_code)]
pub fn pcm_reader(samples: &[i16], layout: ChannelLayout) -> AudioShortReader<Cursor<Vec<u8>>> {
    AudioShortReader::new(Cursor::new(le_bytes(samples)), PcmFormat::little_endian(layout))
}

/// Encode interleaved PCM to one SPU-ADPCM stream per channel
#[allow(dead_code)]
pub fn encode_spu(samples: &[i16], layout: ChannelLayout) -> Vec<Vec<u8>> {
    let frames = samples.len() / layout.channels();
    let mut encoder = SpuAdpcmEncoder::new(pcm_reader(samples, layout));
    let mut outputs = vec![Vec::new(); layout.channels()];

    for _ in 0..frames.div_ceil(SAMPLES_PER_SOUND_UNIT) {
        encoder
            .encode_sound_unit(&mut outputs, SpuFlags::empty())
            .expect("Failed to encode sound unit");
    }
    outputs
}

/// Largest error the encoder's own search reports for one channel
///
/// Runs the unit search chain directly; a decoder fed the encoder's output
/// must stay within this bound.
#[allow(dead_code)]
pub fn search_bound(
    channel: &[i16],
    filters: &'static PredictionFilterTable,
    bits: BitsPerSample,
) -> u32 {
    let encoder = SoundUnitEncoder::new(filters, bits);
    let mut context = DecodeContext::new(1.0);
    let mut bound = 0;

    for chunk in channel.chunks(SAMPLES_PER_SOUND_UNIT) {
        let mut block = [0i16; SAMPLES_PER_SOUND_UNIT];
        block[..chunk.len()].copy_from_slice(chunk);
        let unit = encoder.search(&context, &block).expect("No encodable parameters");
        bound = bound.max(unit.max_absolute_delta());
        context = unit.into_context();
    }
    bound
}
