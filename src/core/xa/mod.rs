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

//! CD-XA ADPCM sector framing
//!
//! XA-ADPCM is the streamed audio format of CD-ROM XA Form 2 sectors. The
//! 2324-byte user data of an audio sector holds 18 Sound Groups of 128
//! bytes followed by 20 unused bytes.

mod decoder;
mod encoder;
mod sound_group;

#[cfg(test)]
mod tests;

pub use decoder::XaAdpcmDecoder;
pub use encoder::{XaAdpcmEncoder, XaCodingInfo, XA_SAMPLE_RATE_FULL, XA_SAMPLE_RATE_HALF};
pub use sound_group::{units_per_group, SoundGroup, XA_SOUND_GROUP_HEADER_SIZE, XA_SOUND_GROUP_SIZE};

use crate::core::adpcm::{BitsPerSample, SAMPLES_PER_SOUND_UNIT};
use crate::core::pcm::ChannelLayout;

/// Sound Groups in one sector
pub const XA_SOUND_GROUPS_PER_SECTOR: usize = 18;

/// Audio bytes in one sector
pub const XA_SECTOR_AUDIO_SIZE: usize = XA_SOUND_GROUPS_PER_SECTOR * XA_SOUND_GROUP_SIZE;

/// Zero bytes following the Sound Groups
pub const XA_SECTOR_PADDING_SIZE: usize = 20;

/// User data bytes of an XA Form 2 sector
pub const XA_SECTOR_DATA_SIZE: usize = XA_SECTOR_AUDIO_SIZE + XA_SECTOR_PADDING_SIZE;

/// Sample frames carried by one sector
///
/// # Example
///
/// ```
/// use psx_adpcm::core::xa::samples_per_sector;
/// use psx_adpcm::core::{BitsPerSample, ChannelLayout};
///
/// assert_eq!(samples_per_sector(BitsPerSample::Four, ChannelLayout::Mono), 4032);
/// assert_eq!(samples_per_sector(BitsPerSample::Eight, ChannelLayout::Stereo), 1008);
/// ```
pub const fn samples_per_sector(bits: BitsPerSample, layout: ChannelLayout) -> usize {
    XA_SOUND_GROUPS_PER_SECTOR * units_per_group(bits) * SAMPLES_PER_SOUND_UNIT / layout.channels()
}
