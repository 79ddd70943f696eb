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

//! SPU-ADPCM tests
//!
//! Sound Unit layout and corruption recovery, stream decoding, and stream
//! encoding.


use super::SPU_SOUND_UNIT_SIZE;

/// Build a Sound Unit with the same nibble in every sample
pub(super) fn unit_bytes(parameter: u8, flags: u8, nibble: u8) -> [u8; SPU_SOUND_UNIT_SIZE] {
    let mut bytes = [(nibble & 0xF) | (nibble << 4); SPU_SOUND_UNIT_SIZE];
    bytes[0] = parameter;
    bytes[1] = flags;
    bytes
}

/// Decode little-endian PCM bytes
pub(super) fn pcm_samples(bytes: &[u8]) -> Vec<i16> {
    bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect()
}
