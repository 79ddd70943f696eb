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

//! SPU-ADPCM stream framing
//!
//! SPU-ADPCM is the format the Sound Processing Unit plays from its RAM:
//! a sequence of independent 16-byte Sound Units per channel, each holding
//! a sound parameter byte, a loop flag byte and 28 4-bit samples.

mod decoder;
mod encoder;
mod sound_unit;

#[cfg(test)]
mod tests;

pub use decoder::SpuAdpcmDecoder;
pub use encoder::SpuAdpcmEncoder;
pub use sound_unit::{
    SoundParameter, SpuFlags, SpuSoundUnit, MAX_EXPECTED_RANGE, SPU_SOUND_UNIT_SIZE,
};
