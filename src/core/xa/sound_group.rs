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

//! CD-XA Sound Group layout
//!
//! A Sound Group is 128 bytes: a 16-byte header of sound parameters
//! followed by 112 bytes of interleaved samples.
//!
//! ```text
//! 4-bit (8 Sound Units):
//!   Header:  p0 p1 p2 p3 p0 p1 p2 p3 p4 p5 p6 p7 p4 p5 p6 p7
//!   Sample n of every unit, for n = 0..28:
//!            [u1:u0] [u3:u2] [u5:u4] [u7:u6]   (high nibble : low nibble)
//!
//! 8-bit (4 Sound Units):
//!   Header:  p0 p1 p2 p3 p0 p1 p2 p3 p0 p1 p2 p3 p0 p1 p2 p3
//!   Sample n of every unit, for n = 0..28:
//!            u0 u1 u2 u3
//! ```
//!
//! The layout is fixed by the CD-ROM controller's decoder and must be
//! reproduced byte for byte.

use crate::core::adpcm::{BitsPerSample, SAMPLES_PER_SOUND_UNIT};

/// Size of one Sound Group in bytes
pub const XA_SOUND_GROUP_SIZE: usize = 128;

/// Size of the sound parameter header of a Sound Group
pub const XA_SOUND_GROUP_HEADER_SIZE: usize = 16;

const MAX_SOUND_UNITS: usize = 8;

/// Header positions holding each unit's sound parameter
const HEADER_POSITIONS_4BIT: [[usize; 2]; 8] = [
    [0, 4],
    [1, 5],
    [2, 6],
    [3, 7],
    [8, 12],
    [9, 13],
    [10, 14],
    [11, 15],
];
const HEADER_POSITIONS_8BIT: [[usize; 4]; 4] = [
    [0, 4, 8, 12],
    [1, 5, 9, 13],
    [2, 6, 10, 14],
    [3, 7, 11, 15],
];

/// Number of Sound Units in a Sound Group
pub const fn units_per_group(bits: BitsPerSample) -> usize {
    match bits {
        BitsPerSample::Four => 8,
        BitsPerSample::Eight => 4,
    }
}

fn header_positions(bits: BitsPerSample, unit: usize) -> &'static [usize] {
    match bits {
        BitsPerSample::Four => &HEADER_POSITIONS_4BIT[unit],
        BitsPerSample::Eight => &HEADER_POSITIONS_8BIT[unit],
    }
}

/// One CD-XA Sound Group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundGroup {
    bits: BitsPerSample,
    parameters: [u8; MAX_SOUND_UNITS],
    samples: [[i8; SAMPLES_PER_SOUND_UNIT]; MAX_SOUND_UNITS],

    /// Bit n set if unit n's header copies disagreed when parsed
    inconsistent_units: u8,
}

impl SoundGroup {
    /// Create a silent Sound Group
    pub fn new(bits: BitsPerSample) -> Self {
        Self {
            bits,
            parameters: [0; MAX_SOUND_UNITS],
            samples: [[0; SAMPLES_PER_SOUND_UNIT]; MAX_SOUND_UNITS],
            inconsistent_units: 0,
        }
    }

    pub fn bits_per_sample(&self) -> BitsPerSample {
        self.bits
    }

    pub fn unit_count(&self) -> usize {
        units_per_group(self.bits)
    }

    /// Store one Sound Unit
    ///
    /// # Panics
    ///
    /// Panics if `unit >= self.unit_count()`.
    pub fn set_unit(&mut self, unit: usize, parameter: u8, samples: &[i8; SAMPLES_PER_SOUND_UNIT]) {
        assert!(unit < self.unit_count(), "sound unit {unit} out of range");
        self.parameters[unit] = parameter;
        self.samples[unit] = *samples;
    }

    pub fn parameter(&self, unit: usize) -> u8 {
        self.parameters[unit]
    }

    pub fn samples(&self, unit: usize) -> &[i8; SAMPLES_PER_SOUND_UNIT] {
        &self.samples[unit]
    }

    /// Bit mask of units whose redundant parameter copies disagreed
    pub fn inconsistent_units(&self) -> u8 {
        self.inconsistent_units
    }

    /// Serialize to the 128-byte sector layout
    pub fn to_bytes(&self) -> [u8; XA_SOUND_GROUP_SIZE] {
        let mut bytes = [0u8; XA_SOUND_GROUP_SIZE];

        for unit in 0..self.unit_count() {
            for &position in header_positions(self.bits, unit) {
                bytes[position] = self.parameters[unit];
            }
        }

        let data = &mut bytes[XA_SOUND_GROUP_HEADER_SIZE..];
        for (sample, row) in data.chunks_exact_mut(4).enumerate() {
            for (column, byte) in row.iter_mut().enumerate() {
                *byte = match self.bits {
                    BitsPerSample::Four => {
                        let low = self.samples[2 * column][sample] as u8 & 0xF;
                        let high = self.samples[2 * column + 1][sample] as u8 & 0xF;
                        (high << 4) | low
                    }
                    BitsPerSample::Eight => self.samples[column][sample] as u8,
                };
            }
        }

        bytes
    }

    /// Parse the 128-byte sector layout
    ///
    /// When the redundant copies of a parameter disagree, the most common
    /// value wins (the earliest copy on a tie) and the unit is marked in
    /// [`inconsistent_units`](Self::inconsistent_units).
    pub fn parse(bytes: &[u8; XA_SOUND_GROUP_SIZE], bits: BitsPerSample) -> Self {
        let mut group = Self::new(bits);

        for unit in 0..group.unit_count() {
            let positions = header_positions(bits, unit);
            let mut best = bytes[positions[0]];
            let mut best_count = 0;
            for &position in positions {
                let value = bytes[position];
                let count = positions.iter().filter(|&&p| bytes[p] == value).count();
                if count > best_count {
                    best = value;
                    best_count = count;
                }
            }

            group.parameters[unit] = best;
            if best_count != positions.len() {
                group.inconsistent_units |= 1 << unit;
            }
        }

        let data = &bytes[XA_SOUND_GROUP_HEADER_SIZE..];
        for (sample, row) in data.chunks_exact(4).enumerate() {
            for (column, &byte) in row.iter().enumerate() {
                match bits {
                    BitsPerSample::Four => {
                        group.samples[2 * column][sample] = ((byte << 4) as i8) >> 4;
                        group.samples[2 * column + 1][sample] = (byte as i8) >> 4;
                    }
                    BitsPerSample::Eight => group.samples[column][sample] = byte as i8,
                }
            }
        }

        group
    }
}
