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

//! SPU-ADPCM Sound Unit layout
//!
//! ```text
//! Byte 0: Range (bits 0-3) | Filter (bits 4-7)
//! Byte 1: Flags (loop end, loop repeat, loop start)
//! Bytes 2-15: 14 bytes of nibble pairs (28 samples total), low nibble first
//! ```
//!
//! Disc images of scratched or badly ripped discs contain Sound Units whose
//! header bytes have flipped bits. Filter indices 5-15 cannot occur on real
//! data, so they are mapped back to the filter a single flipped bit most
//! likely came from.

use crate::core::adpcm::{sound_parameter, EncodedUnit, SAMPLES_PER_SOUND_UNIT};
use bitflags::bitflags;

/// Size of one encoded SPU Sound Unit in bytes
pub const SPU_SOUND_UNIT_SIZE: usize = 16;

/// Highest range that occurs in well-formed 4-bit data
pub const MAX_EXPECTED_RANGE: u8 = 12;

/// Filter index for every 3-bit value, assuming one flipped bit above 4
const FILTER_INDEX_RECOVERY: [u8; 8] = [0, 1, 2, 3, 4, 1, 2, 3];

bitflags! {
    /// SPU Sound Unit loop control flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct SpuFlags: u8 {
        /// Jump to the repeat address after this unit
        const LOOP_END = 0x01;
        /// Keep playing at the repeat address (otherwise release)
        const LOOP_REPEAT = 0x02;
        /// Set the repeat address to this unit
        const LOOP_START = 0x04;
    }
}

/// Filter index and range read from an SPU sound parameter byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoundParameter {
    /// Filter index as stored in the byte
    pub raw_filter_index: u8,
    /// Filter index to decode with (0-4)
    pub filter_index: u8,
    pub range: u8,
}

impl SoundParameter {
    /// Split a parameter byte, recovering corrupted filter indices
    pub fn from_byte(parameter: u8) -> Self {
        let raw_filter_index = parameter >> 4;
        Self {
            raw_filter_index,
            filter_index: FILTER_INDEX_RECOVERY[(raw_filter_index & 0x7) as usize],
            range: parameter & 0xF,
        }
    }

    /// True if the stored filter index was not a valid SPU filter
    pub fn is_corrupted(&self) -> bool {
        self.raw_filter_index != self.filter_index
    }

    /// Parameter byte with the recovered filter index
    pub fn to_byte(&self) -> u8 {
        sound_parameter(self.filter_index, self.range)
    }
}

/// One SPU-ADPCM Sound Unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpuSoundUnit {
    parameter: u8,
    flags: u8,
    samples: [i8; SAMPLES_PER_SOUND_UNIT],
}

impl SpuSoundUnit {
    pub fn new(parameter: u8, flags: SpuFlags, samples: [i8; SAMPLES_PER_SOUND_UNIT]) -> Self {
        Self {
            parameter,
            flags: flags.bits(),
            samples,
        }
    }

    /// Build a Sound Unit from an encoder result
    pub fn from_encoded(unit: &EncodedUnit, flags: SpuFlags) -> Self {
        Self::new(unit.sound_parameter(), flags, *unit.encoded_samples())
    }

    /// Parse 16 bytes, sign-extending every nibble
    pub fn parse(bytes: &[u8; SPU_SOUND_UNIT_SIZE]) -> Self {
        let mut samples = [0i8; SAMPLES_PER_SOUND_UNIT];
        for (pair, &byte) in samples.chunks_exact_mut(2).zip(bytes[2..].iter()) {
            pair[0] = ((byte << 4) as i8) >> 4;
            pair[1] = (byte as i8) >> 4;
        }

        Self {
            parameter: bytes[0],
            flags: bytes[1],
            samples,
        }
    }

    /// Serialize to 16 bytes
    pub fn to_bytes(&self) -> [u8; SPU_SOUND_UNIT_SIZE] {
        let mut bytes = [0u8; SPU_SOUND_UNIT_SIZE];
        bytes[0] = self.parameter;
        bytes[1] = self.flags;
        for (byte, pair) in bytes[2..].iter_mut().zip(self.samples.chunks_exact(2)) {
            *byte = (pair[0] as u8 & 0xF) | ((pair[1] as u8 & 0xF) << 4);
        }
        bytes
    }

    /// Raw parameter byte
    pub fn parameter(&self) -> u8 {
        self.parameter
    }

    pub fn sound_parameter(&self) -> SoundParameter {
        SoundParameter::from_byte(self.parameter)
    }

    /// Raw flag byte
    pub fn flag_byte(&self) -> u8 {
        self.flags
    }

    /// Loop flags, ignoring undefined bits
    pub fn flags(&self) -> SpuFlags {
        SpuFlags::from_bits_truncate(self.flags)
    }

    /// True if any of the undefined flag bits (7-3) is set
    pub fn has_flag_corruption(&self) -> bool {
        self.flags & !SpuFlags::all().bits() != 0
    }

    pub fn samples(&self) -> &[i8; SAMPLES_PER_SOUND_UNIT] {
        &self.samples
    }
}
