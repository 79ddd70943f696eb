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

/// Position and corruption state of a stream decoder
///
/// Shared by all channels of a stream. Resetting the decode contexts on a
/// seek leaves it untouched so corruption stays reportable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeReport {
    pub(crate) current_channel: usize,
    pub(crate) sound_units_read: u64,
    pub(crate) sample_frames_written: u64,
    pub(crate) had_corruption: bool,
}

impl DecodeReport {
    /// Channel of the Sound Unit being (or last) decoded
    pub fn current_channel(&self) -> usize {
        self.current_channel
    }

    /// Sound Units read per channel so far
    pub fn sound_units_read(&self) -> u64 {
        self.sound_units_read
    }

    pub fn sample_frames_written(&self) -> u64 {
        self.sample_frames_written
    }

    /// True once any corrupted sound parameter has been seen (sticky)
    pub fn had_corruption(&self) -> bool {
        self.had_corruption
    }
}
