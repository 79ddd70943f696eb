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

//! Core codec components
//!
//! This module contains all codec components:
//! - Prediction filters, decode context and Sound Unit coding (shared)
//! - PCM input adaptation
//! - SPU-ADPCM stream framing
//! - CD-XA ADPCM sector framing
//! - Configuration and error types

pub mod adpcm;
pub mod config;
pub mod error;
pub mod pcm;
pub mod spu;
pub mod xa;

// Re-export commonly used types
pub use adpcm::{
    BitsPerSample, DecodeContext, EncodedUnit, PredictionFilterTable, SoundUnitDecoder,
    SoundUnitEncoder, SAMPLES_PER_SOUND_UNIT,
};
pub use config::CodecConfig;
pub use error::{AdpcmError, Result};
pub use pcm::{AudioShortReader, ChannelLayout, PcmFormat};
pub use spu::{SpuAdpcmDecoder, SpuAdpcmEncoder};
pub use xa::{XaAdpcmDecoder, XaAdpcmEncoder};
