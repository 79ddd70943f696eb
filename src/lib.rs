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

//! PlayStation 1 ADPCM codec library
//!
//! This library decodes and encodes the two ADPCM flavours used by the
//! PlayStation: SPU-ADPCM (sound effects and music held in SPU RAM) and
//! CD-XA ADPCM (audio streamed from disc sectors).
//!
//! # Example
//!
//! ```
//! use psx_adpcm::core::adpcm::{BitsPerSample, DecodeContext, SoundUnitDecoder, SPU_FILTERS};
//!
//! let decoder = SoundUnitDecoder::new(&SPU_FILTERS, BitsPerSample::Four);
//! let mut context = DecodeContext::new(1.0);
//!
//! // Filter 0, range 12, nibble 1 everywhere
//! let pcm = decoder.decode(&mut context, 0, 12, &[1; 28]);
//! assert_eq!(pcm[0], 1);
//! ```

pub mod core;
