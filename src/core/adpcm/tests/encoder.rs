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

//! Sound Unit encoding tests

use super::sine_unit;
use crate::core::adpcm::{
    sound_parameter, BitsPerSample, DecodeContext, SoundUnitDecoder, SoundUnitEncoder,
    SoundUnitTelemetry, UnitDirection, SAMPLES_PER_SOUND_UNIT, SPU_FILTERS, XA_FILTERS,
};

fn spu_encoder() -> SoundUnitEncoder {
    SoundUnitEncoder::new(&SPU_FILTERS, BitsPerSample::Four)
}

#[test]
fn test_encode_silence_at_range_0() {
    let encoder = spu_encoder();
    let context = DecodeContext::new(1.0);
    let silence = [0i16; SAMPLES_PER_SOUND_UNIT];

    for filter_index in 0..SPU_FILTERS.count() as u8 {
        let unit = encoder
            .encode(&context, filter_index, 0, &silence)
            .expect("silence is always encodable");
        assert_eq!(unit.encoded_samples(), &[0i8; SAMPLES_PER_SOUND_UNIT]);
        assert_eq!(unit.max_absolute_delta(), 0);
        assert_eq!(unit.sound_parameter(), sound_parameter(filter_index, 0));

        let decoder = SoundUnitDecoder::new(&SPU_FILTERS, BitsPerSample::Four);
        let mut decode_context = DecodeContext::new(1.0);
        let pcm = decoder.decode(&mut decode_context, filter_index, 0, unit.encoded_samples());
        assert_eq!(pcm, silence);
    }
}

#[test]
fn test_search_silence() {
    let encoder = spu_encoder();
    let unit = encoder
        .search(&DecodeContext::new(1.0), &[0; SAMPLES_PER_SOUND_UNIT])
        .unwrap();

    // First candidate tried is the largest range with filter 0
    assert_eq!(unit.filter_index(), 0);
    assert_eq!(unit.range(), 12);
    assert_eq!(unit.max_absolute_delta(), 0);
}

#[test]
fn test_encode_exact_small_values() {
    let encoder = spu_encoder();
    let mut pcm = [0i16; SAMPLES_PER_SOUND_UNIT];
    for (i, sample) in pcm.iter_mut().enumerate() {
        *sample = (i as i16 % 16) - 8;
    }

    // Range 12 with filter 0 stores each sample as-is
    let unit = encoder.encode(&DecodeContext::new(1.0), 0, 12, &pcm).unwrap();
    assert_eq!(unit.max_absolute_delta(), 0);
    for (encoded, &source) in unit.encoded_samples().iter().zip(pcm.iter()) {
        assert_eq!(*encoded as i16, source);
    }
}

#[test]
fn test_encode_rejects_out_of_range_residual() {
    let encoder = spu_encoder();
    let loud = [30000i16; SAMPLES_PER_SOUND_UNIT];

    // 30000 cannot be stored in a nibble without shifting
    assert!(encoder.encode(&DecodeContext::new(1.0), 0, 12, &loud).is_none());
    // 30000 / 4096 rounds to 7
    assert!(encoder.encode(&DecodeContext::new(1.0), 0, 0, &loud).is_some());
}

#[test]
fn test_encode_rejects_unknown_filter() {
    let silence = [0i16; SAMPLES_PER_SOUND_UNIT];
    let context = DecodeContext::new(1.0);

    assert!(spu_encoder().encode(&context, 5, 0, &silence).is_none());

    let xa = SoundUnitEncoder::new(&XA_FILTERS, BitsPerSample::Four);
    assert!(xa.encode(&context, 4, 0, &silence).is_none());
    assert!(xa.encode(&context, 3, 0, &silence).is_some());
}

#[test]
fn test_parse_parameter() {
    assert_eq!(spu_encoder().parse_parameter(0x4C).unwrap(), (4, 12));
    assert!(spu_encoder().parse_parameter(0x0D).is_err());

    let xa = SoundUnitEncoder::new(&XA_FILTERS, BitsPerSample::Eight);
    assert!(xa.parse_parameter(0x4C).is_err());
    assert_eq!(xa.parse_parameter(0x38).unwrap(), (3, 8));
    assert!(xa.parse_parameter(0x39).is_err());
}

#[test]
fn test_encode_leaves_input_context_untouched() {
    let encoder = spu_encoder();
    let context = DecodeContext::new(1.0);
    let pcm = sine_unit(8000.0, 0);

    let unit = encoder.search(&context, &pcm).unwrap();
    assert_eq!(context, DecodeContext::new(1.0));
    assert_ne!(unit.context(), &context);
}

#[test]
fn test_encoded_context_tracks_decoder() {
    let encoder = spu_encoder();
    let decoder = SoundUnitDecoder::new(&SPU_FILTERS, BitsPerSample::Four);

    let mut encode_context = DecodeContext::new(1.0);
    let mut decode_context = DecodeContext::new(1.0);

    for phase in (0..10).map(|n| n * SAMPLES_PER_SOUND_UNIT) {
        let pcm = sine_unit(12000.0, phase);
        let unit = encoder.search(&encode_context, &pcm).unwrap();

        let decoded = decoder.decode(
            &mut decode_context,
            unit.filter_index(),
            unit.range(),
            unit.encoded_samples(),
        );
        for (out, source) in decoded.iter().zip(pcm.iter()) {
            let delta = (*out as i32 - *source as i32).unsigned_abs();
            assert!(delta <= unit.max_absolute_delta());
        }

        encode_context = unit.into_context();
        assert_eq!(encode_context, decode_context);
    }
}

#[test]
fn test_search_prefers_lower_delta() {
    let encoder = spu_encoder();
    let context = DecodeContext::new(1.0);
    let pcm = sine_unit(5000.0, 3);

    let best = encoder.search(&context, &pcm).unwrap();
    for range in 0..=BitsPerSample::Four.max_range() {
        for filter_index in 0..SPU_FILTERS.count() as u8 {
            if let Some(candidate) = encoder.encode(&context, filter_index, range, &pcm) {
                assert!(!candidate.is_better_than(&best));
            }
        }
    }
}

#[test]
fn test_8bit_is_at_least_as_precise_on_smooth_input() {
    let context = DecodeContext::new(1.0);
    let pcm = sine_unit(20000.0, 0);

    let four = SoundUnitEncoder::new(&XA_FILTERS, BitsPerSample::Four)
        .search(&context, &pcm)
        .unwrap();
    let eight = SoundUnitEncoder::new(&XA_FILTERS, BitsPerSample::Eight)
        .search(&context, &pcm)
        .unwrap();

    assert!(eight.range() <= BitsPerSample::Eight.max_range());
    assert!(eight
        .encoded_samples()
        .iter()
        .any(|&s| !(-8..=7).contains(&s)));
    assert!(eight.max_absolute_delta() <= four.max_absolute_delta());
}

#[test]
fn test_encode_observed_reports_targets() {
    let encoder = spu_encoder();
    let context = DecodeContext::new(1.0);
    let pcm = sine_unit(1000.0, 7);
    let best = encoder.search(&context, &pcm).unwrap();

    let mut seen: Vec<SoundUnitTelemetry> = Vec::new();
    let unit = encoder
        .encode_observed(
            &context,
            best.filter_index(),
            best.range(),
            &pcm,
            &mut |t: &SoundUnitTelemetry| seen.push(t.clone()),
        )
        .unwrap();

    assert_eq!(unit, best);
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].direction, UnitDirection::Encode);
    assert_eq!(seen[0].pcm, pcm);
    assert_eq!(seen[0].encoded[5], unit.encoded_samples()[5] as i32);
}

/// Encode `pcm` from silence and check it decodes within the reported delta
fn assert_full_scale_encodes(
    encoder: &SoundUnitEncoder,
    decoder: &SoundUnitDecoder,
    pcm: &[i16; SAMPLES_PER_SOUND_UNIT],
    expected_delta: u32,
) {
    let context = DecodeContext::new(1.0);
    let unit = encoder
        .search(&context, pcm)
        .expect("full-scale input still encodes");
    assert_eq!(unit.max_absolute_delta(), expected_delta);
    assert_eq!(unit.range(), 0);

    let (min, max) = match encoder.bits_per_sample() {
        BitsPerSample::Four => (-8, 7),
        BitsPerSample::Eight => (i8::MIN, i8::MAX),
    };
    assert!(unit.encoded_samples().iter().all(|s| (min..=max).contains(s)));

    let mut decode_context = context.clone();
    let decoded = decoder.decode(
        &mut decode_context,
        unit.filter_index(),
        unit.range(),
        unit.encoded_samples(),
    );
    for (out, source) in decoded.iter().zip(pcm.iter()) {
        assert!((*out as i32 - *source as i32).unsigned_abs() <= unit.max_absolute_delta());
    }
    assert_eq!(&decode_context, unit.context());
}

#[test]
fn test_search_saturates_full_scale_input() {
    let spu = spu_encoder();
    let loud = [i16::MAX; SAMPLES_PER_SOUND_UNIT];

    // No strict pair reaches 32767 from silence: the first residual rounds
    // to 8 at range 0
    for range in 0..=BitsPerSample::Four.max_range() {
        for filter_index in 0..SPU_FILTERS.count() as u8 {
            assert!(spu.encode(&DecodeContext::new(1.0), filter_index, range, &loud).is_none());
        }
    }

    // 7 << 12 = 28672 is the loudest first sample
    let decoder = SoundUnitDecoder::new(&SPU_FILTERS, BitsPerSample::Four);
    assert_full_scale_encodes(&spu, &decoder, &loud, 4095);

    let xa = SoundUnitEncoder::new(&XA_FILTERS, BitsPerSample::Four);
    let decoder = SoundUnitDecoder::new(&XA_FILTERS, BitsPerSample::Four);
    assert_full_scale_encodes(&xa, &decoder, &loud, 4095);

    // 127 << 8 = 32512
    let xa = SoundUnitEncoder::new(&XA_FILTERS, BitsPerSample::Eight);
    let decoder = SoundUnitDecoder::new(&XA_FILTERS, BitsPerSample::Eight);
    assert_full_scale_encodes(&xa, &decoder, &loud, 255);
}

#[test]
fn test_search_saturates_loud_first_sample() {
    let mut pcm = [0i16; SAMPLES_PER_SOUND_UNIT];
    pcm[0] = 31000;

    let decoder = SoundUnitDecoder::new(&SPU_FILTERS, BitsPerSample::Four);
    assert_full_scale_encodes(&spu_encoder(), &decoder, &pcm, 31000 - 28672);

    let mut negative = pcm;
    negative[0] = i16::MIN;
    // -8 << 12 is exact
    let unit = spu_encoder()
        .search(&DecodeContext::new(1.0), &negative)
        .unwrap();
    assert_eq!(unit.max_absolute_delta(), 0);
}

#[test]
fn test_fixed_encode_stays_strict() {
    let mut pcm = [0i16; SAMPLES_PER_SOUND_UNIT];
    pcm[0] = 31000;
    assert!(spu_encoder().encode(&DecodeContext::new(1.0), 0, 0, &pcm).is_none());
}
