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

//! Custom assertions for codec testing

/// Assert every decoded sample is within `bound` of the source
#[allow(dead_code)]
pub fn assert_pcm_within(decoded: &[i16], source: &[i16], bound: u32) {
    assert_eq!(
        decoded.len(),
        source.len(),
        "PCM length mismatch: expected {}, got {}",
        source.len(),
        decoded.len()
    );
    for (i, (&d, &s)) in decoded.iter().zip(source).enumerate() {
        let delta = (d as i32 - s as i32).unsigned_abs();
        assert!(
            delta <= bound,
            "Sample {} off by {}: expected {} (+/- {}), got {}",
            i,
            delta,
            s,
            bound,
            d
        );
    }
}

/// Assert a Sound Unit stream holds a whole number of 16-byte units
#[allow(dead_code)]
pub fn assert_sound_units(stream: &[u8], expected_units: usize) {
    assert_eq!(
        stream.len(),
        expected_units * 16,
        "Stream length mismatch: expected {} sound units, got {} bytes",
        expected_units,
        stream.len()
    );
}
