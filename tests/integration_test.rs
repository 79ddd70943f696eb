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

//! End-to-end codec tests through the public API

mod common;

use common::assertions::{assert_pcm_within, assert_sound_units};
use common::fixtures::{
    be_bytes, encode_spu, interleave, pcm_reader, pcm_samples, search_bound, tone,
};
use psx_adpcm::core::adpcm::{SPU_FILTERS, XA_FILTERS};
use psx_adpcm::core::spu::SpuFlags;
use psx_adpcm::core::xa::{samples_per_sector, XA_SECTOR_DATA_SIZE};
use psx_adpcm::core::{
    AdpcmError, AudioShortReader, BitsPerSample, ChannelLayout, CodecConfig, PcmFormat,
    SpuAdpcmDecoder, SpuAdpcmEncoder, XaAdpcmDecoder, XaAdpcmEncoder,
};
use std::io::{Cursor, Write};

#[test]
fn test_spu_mono_round_trip() {
    let source = tone(28 * 40, 10000.0, 50.0);
    let streams = encode_spu(&source, ChannelLayout::Mono);
    assert_sound_units(&streams[0], 40);

    let mut decoder = SpuAdpcmDecoder::new(ChannelLayout::Mono, 1.0);
    let mut inputs = [streams[0].as_slice()];
    let mut output = Vec::new();
    decoder.decode(&mut inputs, source.len(), &mut output).unwrap();

    let bound = search_bound(&source, &SPU_FILTERS, BitsPerSample::Four);
    assert_pcm_within(&pcm_samples(&output), &source, bound);
    assert!(!decoder.had_corruption());
}

#[test]
fn test_spu_stereo_round_trip() {
    let left = tone(28 * 20, 12000.0, 70.0);
    let right = tone(28 * 20, 3000.0, 12.0);
    let streams = encode_spu(&interleave(&left, &right), ChannelLayout::Stereo);
    assert_sound_units(&streams[0], 20);
    assert_sound_units(&streams[1], 20);

    let mut decoder = SpuAdpcmDecoder::new(ChannelLayout::Stereo, 1.0);
    let mut inputs = [streams[0].as_slice(), streams[1].as_slice()];
    let mut output = Vec::new();
    decoder.decode(&mut inputs, left.len(), &mut output).unwrap();

    let decoded = pcm_samples(&output);
    let decoded_left: Vec<i16> = decoded.iter().step_by(2).copied().collect();
    let decoded_right: Vec<i16> = decoded.iter().skip(1).step_by(2).copied().collect();

    assert_pcm_within(
        &decoded_left,
        &left,
        search_bound(&left, &SPU_FILTERS, BitsPerSample::Four),
    );
    assert_pcm_within(
        &decoded_right,
        &right,
        search_bound(&right, &SPU_FILTERS, BitsPerSample::Four),
    );
}

#[test]
fn test_spu_encoding_is_deterministic() {
    let source = tone(28 * 10, 15000.0, 33.0);
    assert_eq!(
        encode_spu(&source, ChannelLayout::Mono),
        encode_spu(&source, ChannelLayout::Mono)
    );
}

#[test]
fn test_big_endian_input_matches_little_endian() {
    let source = tone(28 * 5, 7000.0, 40.0);
    let expected = encode_spu(&source, ChannelLayout::Mono);

    let format = PcmFormat::new(1, 16, true).unwrap();
    let reader = AudioShortReader::new(Cursor::new(be_bytes(&source)), format);
    let mut encoder = SpuAdpcmEncoder::new(reader);
    let mut outputs = vec![Vec::new()];
    for _ in 0..5 {
        encoder.encode_sound_unit(&mut outputs, SpuFlags::empty()).unwrap();
    }

    assert_eq!(outputs, expected);
}

#[test]
fn test_spu_corrupted_stream_keeps_decoding() {
    let mut stream = encode_spu(&tone(28 * 4, 6000.0, 28.0), ChannelLayout::Mono).remove(0);
    let mut clean = stream.clone();
    // Filter nibble 6 in unit 2 recovers to filter 2
    clean[32] = 0x20 | (clean[32] & 0x0F);
    stream[32] = 0x60 | (stream[32] & 0x0F);

    let mut expected = Vec::new();
    let mut reference = SpuAdpcmDecoder::new(ChannelLayout::Mono, 1.0);
    reference.decode(&mut [clean.as_slice()], 28 * 4, &mut expected).unwrap();

    let mut output = Vec::new();
    let mut decoder = SpuAdpcmDecoder::new(ChannelLayout::Mono, 1.0);
    decoder.decode(&mut [stream.as_slice()], 28 * 4, &mut output).unwrap();

    assert_eq!(output, expected);
    assert!(decoder.had_corruption());
    assert!(!reference.had_corruption());
}

#[test]
fn test_spu_decode_past_end() {
    let stream = encode_spu(&[0; 28], ChannelLayout::Mono).remove(0);
    let mut decoder = SpuAdpcmDecoder::new(ChannelLayout::Mono, 1.0);
    let mut output = Vec::new();
    let result = decoder.decode(&mut [stream.as_slice()], 56, &mut output);

    assert!(matches!(
        result,
        Err(AdpcmError::EndOfStream { channel: 0, sound_unit: 1 })
    ));
    assert_eq!(decoder.report().sample_frames_written(), 28);
}

#[test]
fn test_xa_mono_round_trip() {
    let frames = samples_per_sector(BitsPerSample::Four, ChannelLayout::Mono) * 2;
    let source = tone(frames, 11000.0, 90.0);

    let mut encoder =
        XaAdpcmEncoder::new(pcm_reader(&source, ChannelLayout::Mono), BitsPerSample::Four);
    let mut sectors = Vec::new();
    encoder.encode_sector(&mut sectors).unwrap();
    encoder.encode_sector(&mut sectors).unwrap();
    assert_eq!(sectors.len(), 2 * XA_SECTOR_DATA_SIZE);

    let mut decoder = XaAdpcmDecoder::from_coding_info(encoder.coding_info(), 1.0);
    let mut output = Vec::new();
    for sector in sectors.chunks(XA_SECTOR_DATA_SIZE) {
        decoder.decode_sector(sector, &mut output).unwrap();
    }

    let bound = search_bound(&source, &XA_FILTERS, BitsPerSample::Four);
    assert_pcm_within(&pcm_samples(&output), &source, bound);
}

#[test]
fn test_xa_stream_from_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "channels = 2").unwrap();
    writeln!(file, "bits_per_sample = 8").unwrap();
    writeln!(file, "sample_rate = 18900").unwrap();
    let config = CodecConfig::load_from_file(file.path()).unwrap();
    config.validate_xa().unwrap();

    let layout = config.layout().unwrap();
    let bits = config.bits().unwrap();
    let frames = samples_per_sector(bits, layout);
    let left = tone(frames, 9000.0, 64.0);
    let right = tone(frames, 4000.0, 21.0);

    let reader = AudioShortReader::new(
        Cursor::new(common::fixtures::le_bytes(&interleave(&left, &right))),
        config.pcm_format().unwrap(),
    );
    let mut encoder = XaAdpcmEncoder::new(reader, bits);
    encoder.set_sample_rate(config.sample_rate).unwrap();
    let mut sector = Vec::new();
    encoder.encode_sector(&mut sector).unwrap();
    assert_eq!(encoder.coding_info().to_byte(), 0x15);

    let mut decoder = XaAdpcmDecoder::from_coding_info(encoder.coding_info(), config.volume);
    let mut output = Vec::new();
    decoder.decode_sector(&sector, &mut output).unwrap();

    let decoded = pcm_samples(&output);
    let decoded_left: Vec<i16> = decoded.iter().step_by(2).copied().collect();
    let decoded_right: Vec<i16> = decoded.iter().skip(1).step_by(2).copied().collect();
    assert_pcm_within(&decoded_left, &left, search_bound(&left, &XA_FILTERS, bits));
    assert_pcm_within(&decoded_right, &right, search_bound(&right, &XA_FILTERS, bits));
}
