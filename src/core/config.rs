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

//! Codec configuration
//!
//! Settings shared by the encoders and decoders, loadable from TOML. Every
//! field has a default, so a config file only needs the values it changes:
//!
//! ```toml
//! channels = 1
//! bits_per_sample = 8
//! sample_rate = 18900
//! ```

use super::adpcm::BitsPerSample;
use super::error::{AdpcmError, Result};
use super::pcm::{ChannelLayout, PcmFormat};
use super::xa::{XA_SAMPLE_RATE_FULL, XA_SAMPLE_RATE_HALF};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Codec settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// 1 (mono) or 2 (stereo)
    pub channels: usize,

    /// 4 or 8; SPU-ADPCM only supports 4
    pub bits_per_sample: u32,

    /// Output multiplier applied when decoding
    pub volume: f64,

    /// Byte order of raw PCM input
    pub big_endian: bool,

    /// Sample rate in Hz; XA streams accept 37800 or 18900
    pub sample_rate: u32,

    /// XA emphasis flag
    pub emphasis: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            channels: 2,
            bits_per_sample: 4,
            volume: 1.0,
            big_endian: false,
            sample_rate: XA_SAMPLE_RATE_FULL,
            emphasis: false,
        }
    }
}

impl CodecConfig {
    /// Parse and validate a TOML document
    ///
    /// # Errors
    ///
    /// - `ConfigParse` if the document is not valid TOML for this struct
    /// - Any error from [`validate`](Self::validate)
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use psx_adpcm::core::CodecConfig;
    /// let config = CodecConfig::load_from_file("xa.toml").unwrap();
    /// println!("{} channel(s)", config.channels);
    /// ```
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Write the config as TOML
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let text = toml::to_string(self).map_err(|e| AdpcmError::InvalidConfig(e.to_string()))?;
        fs::write(path, text)?;
        Ok(())
    }

    /// Check every field
    ///
    /// # Errors
    ///
    /// - `InvalidChannelCount` unless `channels` is 1 or 2
    /// - `InvalidBitsPerSample` unless `bits_per_sample` is 4 or 8
    /// - `InvalidConfig` for a non-finite or negative volume, or a zero
    ///   sample rate
    pub fn validate(&self) -> Result<()> {
        ChannelLayout::from_channels(self.channels)?;
        BitsPerSample::from_bits(self.bits_per_sample)?;

        if !self.volume.is_finite() || self.volume < 0.0 {
            return Err(AdpcmError::InvalidConfig(format!(
                "volume must be a finite, non-negative number, got {}",
                self.volume
            )));
        }
        if self.sample_rate == 0 {
            return Err(AdpcmError::InvalidConfig("sample rate must not be zero".to_string()));
        }
        Ok(())
    }

    /// Check the settings an XA stream additionally requires
    pub fn validate_xa(&self) -> Result<()> {
        self.validate()?;
        if self.sample_rate != XA_SAMPLE_RATE_FULL && self.sample_rate != XA_SAMPLE_RATE_HALF {
            return Err(AdpcmError::InvalidConfig(format!(
                "XA sample rate must be {} or {}, got {}",
                XA_SAMPLE_RATE_FULL, XA_SAMPLE_RATE_HALF, self.sample_rate
            )));
        }
        Ok(())
    }

    pub fn layout(&self) -> Result<ChannelLayout> {
        ChannelLayout::from_channels(self.channels)
    }

    pub fn bits(&self) -> Result<BitsPerSample> {
        BitsPerSample::from_bits(self.bits_per_sample)
    }

    /// PCM input format described by this config
    pub fn pcm_format(&self) -> Result<PcmFormat> {
        PcmFormat::new(self.channels, 16, self.big_endian)
    }
}
