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

//! CD-XA ADPCM tests
//!
//! Sound Group byte layout, sector encoding and sector decoding.


use super::{SoundGroup, XA_SECTOR_DATA_SIZE, XA_SOUND_GROUPS_PER_SECTOR};

/// Build the user data of a sector repeating one Sound Group
pub(super) fn sector_of(group: &SoundGroup) -> Vec<u8> {
    let mut sector = Vec::with_capacity(XA_SECTOR_DATA_SIZE);
    for _ in 0..XA_SOUND_GROUPS_PER_SECTOR {
        sector.extend_from_slice(&group.to_bytes());
    }
    sector.resize(XA_SECTOR_DATA_SIZE, 0);
    sector
}

pub(super) fn le_bytes(samples: &[i16]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}

pub(super) fn pcm_samples(bytes: &[u8]) -> Vec<i16> {
    bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect()
}

pub(super) fn tone(frames: usize, amplitude: f64, period: f64) -> Vec<i16> {
    (0..frames)
        .map(|i| (amplitude * (i as f64 / period * std::f64::consts::TAU).sin()).round() as i16)
        .collect()
}
