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

//! Sound Unit coding shared by SPU-ADPCM and CD-XA ADPCM
//!
//! Both formats store audio as Sound Units of 28 samples. Each sample is a
//! small signed integer that is expanded to 16 bits, shifted right by the
//! unit's range, and added to a prediction built from the two previously
//! reconstructed samples:
//!
//! ```text
//! decoded = (sample << (16 - bits)) >> range + K0 * prev1 + K1 * prev2
//! ```
//!
//! The formats only differ in how many filters they allow, in the sample
//! width (XA also supports 8-bit samples) and in how Sound Units are laid
//! out in the byte stream.

mod context;
mod decoder;
mod encoder;
mod filter;
mod report;
mod telemetry;

#[cfg(test)]
mod tests;

pub use context::DecodeContext;
pub use decoder::SoundUnitDecoder;
pub use encoder::{EncodedUnit, SoundUnitEncoder};
pub use filter::{PredictionFilterTable, SPU_FILTERS, XA_FILTERS};
pub use report::DecodeReport;
pub use telemetry::{SoundUnitTelemetry, TelemetryListener, UnitDirection};

use crate::core::error::{AdpcmError, Result};
use serde::{Deserialize, Serialize};

/// Number of PCM samples represented by one Sound Unit
pub const SAMPLES_PER_SOUND_UNIT: usize = 28;

/// Width of the encoded samples in a Sound Unit
///
/// SPU-ADPCM is always 4-bit. CD-XA ADPCM can be 4-bit or 8-bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BitsPerSample {
    /// 4-bit samples, range 0-12 meaningful
    Four,
    /// 8-bit samples (XA only), range 0-8 meaningful
    Eight,
}

impl BitsPerSample {
    /// Convert a bit count (4 or 8)
    pub fn from_bits(bits: u32) -> Result<Self> {
        match bits {
            4 => Ok(Self::Four),
            8 => Ok(Self::Eight),
            _ => Err(AdpcmError::InvalidBitsPerSample(bits)),
        }
    }

    /// Bit count
    pub const fn bits(self) -> u32 {
        match self {
            Self::Four => 4,
            Self::Eight => 8,
        }
    }

    /// Smallest encodable sample value
    pub const fn encode_min(self) -> i32 {
        -(1 << (self.bits() - 1))
    }

    /// Largest encodable sample value
    pub const fn encode_max(self) -> i32 {
        (1 << (self.bits() - 1)) - 1
    }

    /// Largest range the encoder searches
    ///
    /// Beyond this the shift throws away more than the sample expansion
    /// added, so the quantizer can no longer gain precision.
    pub const fn max_range(self) -> u8 {
        (16 - self.bits()) as u8
    }

    /// Left shift that moves a sample's sign bit to bit 15
    #[inline(always)]
    pub(crate) const fn sample_shift(self) -> u32 {
        16 - self.bits()
    }
}

/// Pack a filter index and range into a sound parameter byte
#[inline(always)]
pub const fn sound_parameter(filter_index: u8, range: u8) -> u8 {
    ((filter_index & 0xF) << 4) | (range & 0xF)
}
