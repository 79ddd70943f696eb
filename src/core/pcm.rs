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

//! 16-bit PCM input adaptation
//!
//! Encoders work on fixed blocks of samples per channel, while PCM sources
//! are byte streams of interleaved sample frames. [`AudioShortReader`]
//! bridges the two.

use crate::core::error::{AdpcmError, Result};
use std::io::{ErrorKind, Read};

/// Channel topology of a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelLayout {
    Mono,
    Stereo,
}

impl ChannelLayout {
    /// Convert a channel count (1 or 2)
    pub fn from_channels(channels: usize) -> Result<Self> {
        match channels {
            1 => Ok(Self::Mono),
            2 => Ok(Self::Stereo),
            _ => Err(AdpcmError::InvalidChannelCount(channels)),
        }
    }

    pub const fn channels(self) -> usize {
        match self {
            Self::Mono => 1,
            Self::Stereo => 2,
        }
    }
}

/// Layout of a signed 16-bit PCM source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcmFormat {
    layout: ChannelLayout,
    big_endian: bool,
}

impl PcmFormat {
    /// Validate a PCM source description
    ///
    /// # Errors
    ///
    /// - `InvalidChannelCount` unless `channels` is 1 or 2
    /// - `UnsupportedSampleSize` unless `bits_per_sample` is 16
    pub fn new(channels: usize, bits_per_sample: u16, big_endian: bool) -> Result<Self> {
        let layout = ChannelLayout::from_channels(channels)?;
        if bits_per_sample != 16 {
            return Err(AdpcmError::UnsupportedSampleSize(bits_per_sample));
        }
        Ok(Self { layout, big_endian })
    }

    /// Little-endian 16-bit PCM with the given layout
    pub fn little_endian(layout: ChannelLayout) -> Self {
        Self {
            layout,
            big_endian: false,
        }
    }

    pub fn layout(&self) -> ChannelLayout {
        self.layout
    }

    pub fn channels(&self) -> usize {
        self.layout.channels()
    }

    pub fn is_big_endian(&self) -> bool {
        self.big_endian
    }

    /// Bytes in one interleaved sample frame
    pub fn bytes_per_frame(&self) -> usize {
        self.channels() * 2
    }
}

/// Reader of fixed-size per-channel sample blocks from a PCM byte stream
///
/// # Example
///
/// ```
/// use psx_adpcm::core::pcm::{AudioShortReader, ChannelLayout, PcmFormat};
///
/// let bytes: Vec<u8> = [1i16, -1, 2, -2].iter().flat_map(|s| s.to_le_bytes()).collect();
/// let format = PcmFormat::little_endian(ChannelLayout::Stereo);
/// let mut reader = AudioShortReader::new(bytes.as_slice(), format);
///
/// let mut block = [[0i16; 3]; 2];
/// assert_eq!(reader.read_into(&mut block).unwrap(), 2);
/// assert_eq!(block, [[1, 2, 0], [-1, -2, 0]]);
/// assert!(reader.is_eof());
/// ```
pub struct AudioShortReader<R> {
    source: R,
    format: PcmFormat,
    buffer: Vec<u8>,
    eof: bool,
    sample_frames_read: u64,
}

impl<R: Read> AudioShortReader<R> {
    pub fn new(source: R, format: PcmFormat) -> Self {
        Self {
            source,
            format,
            buffer: Vec::new(),
            eof: false,
            sample_frames_read: 0,
        }
    }

    pub fn format(&self) -> PcmFormat {
        self.format
    }

    /// True once the source has been exhausted (permanent)
    pub fn is_eof(&self) -> bool {
        self.eof
    }

    pub fn sample_frames_read(&self) -> u64 {
        self.sample_frames_read
    }

    /// Read `N` sample frames, de-interleaved into one array per channel
    ///
    /// Frames missing at the end of the source are zero-filled. A trailing
    /// partial frame is dropped.
    ///
    /// # Returns
    ///
    /// Number of complete frames read from the source (0..=N)
    ///
    /// # Errors
    ///
    /// - `StreamCountMismatch` if `output` does not hold one array per channel
    /// - `Io` for read failures other than interruption
    pub fn read_into<const N: usize>(&mut self, output: &mut [[i16; N]]) -> Result<usize> {
        let channels = self.format.channels();
        if output.len() != channels {
            return Err(AdpcmError::StreamCountMismatch {
                expected: channels,
                got: output.len(),
            });
        }

        let bytes_per_frame = self.format.bytes_per_frame();
        let wanted = N * bytes_per_frame;
        self.buffer.resize(wanted, 0);

        let mut filled = 0;
        while filled < wanted && !self.eof {
            match self.source.read(&mut self.buffer[filled..wanted]) {
                Ok(0) => self.eof = true,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        let frames = filled / bytes_per_frame;
        for (frame, bytes) in self.buffer[..frames * bytes_per_frame]
            .chunks_exact(bytes_per_frame)
            .enumerate()
        {
            for (channel, sample) in bytes.chunks_exact(2).enumerate() {
                let pair = [sample[0], sample[1]];
                output[channel][frame] = if self.format.big_endian {
                    i16::from_be_bytes(pair)
                } else {
                    i16::from_le_bytes(pair)
                };
            }
        }
        for samples in output.iter_mut() {
            samples[frames..].fill(0);
        }

        self.sample_frames_read += frames as u64;
        Ok(frames)
    }
}
