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

/// Codec error types
use thiserror::Error;

/// Result type for codec operations
pub type Result<T> = std::result::Result<T, AdpcmError>;

/// Main error type for the codec
///
/// Sound parameter corruption is not represented here: it is corrected,
/// logged and surfaced through the decoder's report instead.
#[derive(Error, Debug)]
pub enum AdpcmError {
    #[error("End of stream on channel {channel} while reading sound unit {sound_unit}")]
    EndOfStream { channel: usize, sound_unit: u64 },

    #[error("Fixed filter/range cannot encode sound unit {sound_unit} on channel {channel}")]
    UnencodableSoundUnit { channel: usize, sound_unit: u64 },

    #[error("Invalid sound parameter 0x{parameter:02X} for {bits_per_sample}-bit encoding")]
    InvalidSoundParameter { parameter: u8, bits_per_sample: u32 },

    #[error("Invalid channel count: {0} (expected 1 or 2)")]
    InvalidChannelCount(usize),

    #[error("Invalid bits per sample: {0} (expected 4 or 8)")]
    InvalidBitsPerSample(u32),

    #[error("Unsupported PCM sample size: {0} bits (expected 16)")]
    UnsupportedSampleSize(u16),

    #[error("Sample frame count {0} is not a multiple of 28")]
    UnalignedFrameCount(usize),

    #[error("Stream count mismatch: expected {expected}, got {got}")]
    StreamCountMismatch { expected: usize, got: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
