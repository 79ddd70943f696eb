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

//! Command line front end
//!
//! Converts between 16-bit WAV files and raw SPU-ADPCM / CD-XA ADPCM
//! streams.

use clap::{Parser, Subcommand};
use log::{error, info, warn};
use psx_adpcm::core::adpcm::SoundUnitTelemetry;
use psx_adpcm::core::spu::{SpuFlags, SPU_SOUND_UNIT_SIZE};
use psx_adpcm::core::xa::{samples_per_sector, XA_SECTOR_AUDIO_SIZE, XA_SECTOR_DATA_SIZE};
use psx_adpcm::core::{
    AdpcmError, AudioShortReader, ChannelLayout, CodecConfig, PcmFormat, SpuAdpcmDecoder,
    SpuAdpcmEncoder, XaAdpcmDecoder, XaAdpcmEncoder, SAMPLES_PER_SOUND_UNIT,
};
use std::fs::{self, File};
use std::io::{BufWriter, Cursor, Write};
use std::path::{Path, PathBuf};

type CliResult<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// PlayStation ADPCM converter
#[derive(Parser)]
#[command(name = "psx-adpcm")]
#[command(about = "PlayStation SPU-ADPCM and CD-XA ADPCM converter", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode SPU-ADPCM Sound Units to a WAV file
    SpuDecode {
        /// Sound Unit stream (left channel when stereo)
        input: PathBuf,

        /// Sound Unit stream of the right channel
        #[arg(short = 'r', long)]
        right: Option<PathBuf>,

        /// Output WAV file
        #[arg(short = 'o', long)]
        output: PathBuf,

        /// Sample rate written to the WAV header
        #[arg(long, default_value = "44100")]
        rate: u32,

        /// Output volume multiplier
        #[arg(long, default_value = "1.0")]
        volume: f64,

        /// Write per Sound Unit telemetry as JSON lines
        #[arg(long)]
        telemetry: Option<PathBuf>,
    },

    /// Encode a 16-bit WAV file to SPU-ADPCM Sound Units
    SpuEncode {
        /// Input WAV file (mono or stereo, 16-bit)
        input: PathBuf,

        /// Sound Unit stream (left channel when stereo)
        #[arg(short = 'o', long)]
        output: PathBuf,

        /// Sound Unit stream of the right channel
        #[arg(long)]
        right_output: Option<PathBuf>,

        /// Fixed sound parameter byte (e.g. 0x1C) instead of searching
        #[arg(long, value_parser = parse_parameter)]
        parameter: Option<u8>,

        /// Mark the stream as looping from its first Sound Unit
        #[arg(long = "loop")]
        looping: bool,
    },

    /// Encode a 16-bit WAV file to CD-XA ADPCM sectors
    XaEncode {
        /// Input WAV file (mono or stereo, 16-bit)
        input: PathBuf,

        /// Output file of 2324-byte sector payloads
        #[arg(short = 'o', long)]
        output: PathBuf,

        /// Codec config (bits per sample, sample rate, emphasis)
        #[arg(short = 'c', long)]
        config: Option<PathBuf>,
    },

    /// Decode CD-XA ADPCM sectors to a WAV file
    XaDecode {
        /// File of 2324-byte sector payloads
        input: PathBuf,

        /// Output WAV file
        #[arg(short = 'o', long)]
        output: PathBuf,

        /// Codec config (channels, bits per sample, sample rate, volume)
        #[arg(short = 'c', long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    // Optional; a missing .env file is not an error
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    info!("psx-adpcm v{}", env!("CARGO_PKG_VERSION"));

    let result = match args.command {
        Command::SpuDecode {
            input,
            right,
            output,
            rate,
            volume,
            telemetry,
        } => spu_decode(&input, right.as_deref(), &output, rate, volume, telemetry.as_deref()),
        Command::SpuEncode {
            input,
            output,
            right_output,
            parameter,
            looping,
        } => spu_encode(&input, &output, right_output.as_deref(), parameter, looping),
        Command::XaEncode {
            input,
            output,
            config,
        } => xa_encode(&input, &output, config.as_deref()),
        Command::XaDecode {
            input,
            output,
            config,
        } => xa_decode(&input, &output, config.as_deref()),
    };

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn parse_parameter(text: &str) -> std::result::Result<u8, String> {
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => text.parse(),
    };
    parsed.map_err(|e| format!("invalid sound parameter '{}': {}", text, e))
}

fn load_config(path: Option<&Path>) -> CliResult<CodecConfig> {
    match path {
        Some(path) => {
            info!("Loading config from: {}", path.display());
            Ok(CodecConfig::load_from_file(path)?)
        }
        None => Ok(CodecConfig::default()),
    }
}

/// Read a 16-bit integer WAV file as interleaved little-endian bytes
fn read_wav(path: &Path) -> CliResult<(hound::WavSpec, Vec<u8>)> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    if spec.bits_per_sample != 16 || spec.sample_format != hound::SampleFormat::Int {
        return Err(AdpcmError::UnsupportedSampleSize(spec.bits_per_sample).into());
    }

    let mut bytes = Vec::with_capacity(reader.len() as usize * 2);
    for sample in reader.samples::<i16>() {
        bytes.extend_from_slice(&sample?.to_le_bytes());
    }

    info!(
        "Read {}: {} channel(s), {} Hz, {} frames",
        path.display(),
        spec.channels,
        spec.sample_rate,
        reader.duration()
    );
    Ok((spec, bytes))
}

fn write_wav(path: &Path, channels: usize, sample_rate: u32, pcm: &[u8]) -> CliResult<()> {
    let spec = hound::WavSpec {
        channels: channels as u16,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    for pair in pcm.chunks_exact(2) {
        writer.write_sample(i16::from_le_bytes([pair[0], pair[1]]))?;
    }
    writer.finalize()?;

    info!(
        "Wrote {}: {} frames",
        path.display(),
        pcm.len() / (2 * channels)
    );
    Ok(())
}

fn spu_decode(
    left: &Path,
    right: Option<&Path>,
    output: &Path,
    rate: u32,
    volume: f64,
    telemetry: Option<&Path>,
) -> CliResult<()> {
    let mut inputs = vec![fs::read(left)?];
    if let Some(right) = right {
        inputs.push(fs::read(right)?);
    }
    let layout = ChannelLayout::from_channels(inputs.len())?;

    let sound_units = inputs
        .iter()
        .map(|i| i.len() / SPU_SOUND_UNIT_SIZE)
        .min()
        .unwrap_or(0);
    if inputs.iter().any(|i| i.len() % SPU_SOUND_UNIT_SIZE != 0) {
        warn!(
            "Input length is not a multiple of {} bytes, trailing bytes ignored",
            SPU_SOUND_UNIT_SIZE
        );
    }
    let sample_frames = sound_units * SAMPLES_PER_SOUND_UNIT;

    let mut decoder = SpuAdpcmDecoder::new(layout, volume);
    let mut readers: Vec<Cursor<Vec<u8>>> = inputs.into_iter().map(Cursor::new).collect();
    let mut pcm = Vec::with_capacity(decoder.pcm_bytes_for_frames(sample_frames));

    match telemetry {
        Some(path) => {
            let mut units: Vec<SoundUnitTelemetry> = Vec::new();
            decoder.decode_observed(
                &mut readers,
                sample_frames,
                &mut pcm,
                &mut |t: &SoundUnitTelemetry| units.push(t.clone()),
            )?;
            write_telemetry(path, &units)?;
        }
        None => decoder.decode(&mut readers, sample_frames, &mut pcm)?,
    }

    if decoder.had_corruption() {
        warn!("Input contained corrupted sound parameters; recovered values were used");
    }
    info!("Decoded {} sound units per channel", decoder.report().sound_units_read());

    write_wav(output, layout.channels(), rate, &pcm)
}

fn write_telemetry(path: &Path, units: &[SoundUnitTelemetry]) -> CliResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for unit in units {
        serde_json::to_writer(&mut writer, unit)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    info!("Wrote telemetry for {} sound units to {}", units.len(), path.display());
    Ok(())
}

fn spu_encode(
    input: &Path,
    output: &Path,
    right_output: Option<&Path>,
    parameter: Option<u8>,
    looping: bool,
) -> CliResult<()> {
    let (spec, bytes) = read_wav(input)?;
    let format = PcmFormat::new(spec.channels as usize, spec.bits_per_sample, false)?;

    let mut paths = vec![output];
    match (format.layout(), right_output) {
        (ChannelLayout::Stereo, Some(right)) => paths.push(right),
        (ChannelLayout::Stereo, None) => {
            return Err(AdpcmError::InvalidConfig(
                "stereo input needs --right-output".to_string(),
            )
            .into())
        }
        (ChannelLayout::Mono, Some(_)) => warn!("Mono input, --right-output ignored"),
        (ChannelLayout::Mono, None) => {}
    }

    let frames = bytes.len() / format.bytes_per_frame();
    let sound_units = frames.div_ceil(SAMPLES_PER_SOUND_UNIT).max(1);
    let parameters = parameter.map(|p| vec![p; format.channels()]);

    let mut encoder = SpuAdpcmEncoder::new(AudioShortReader::new(Cursor::new(bytes), format));
    let mut outputs = paths
        .iter()
        .map(|path| File::create(path).map(BufWriter::new))
        .collect::<std::io::Result<Vec<_>>>()?;

    for unit in 0..sound_units {
        let mut flags = SpuFlags::empty();
        if looping && unit == 0 {
            flags |= SpuFlags::LOOP_START;
        }
        if unit + 1 == sound_units {
            flags |= SpuFlags::LOOP_END;
            if looping {
                flags |= SpuFlags::LOOP_REPEAT;
            }
        }

        match &parameters {
            Some(parameters) => {
                encoder.encode_sound_unit_with_parameters(&mut outputs, parameters, flags)?
            }
            None => encoder.encode_sound_unit(&mut outputs, flags)?,
        }
    }

    for output in &mut outputs {
        output.flush()?;
    }
    info!(
        "Encoded {} frames into {} sound units per channel",
        encoder.sample_frames_read(),
        encoder.sound_units_encoded()
    );
    Ok(())
}

fn xa_encode(input: &Path, output: &Path, config: Option<&Path>) -> CliResult<()> {
    let config = load_config(config)?;
    config.validate_xa()?;

    let (spec, bytes) = read_wav(input)?;
    let format = PcmFormat::new(spec.channels as usize, spec.bits_per_sample, false)?;
    if spec.sample_rate != config.sample_rate {
        warn!(
            "WAV sample rate {} Hz differs from XA sample rate {} Hz; no resampling is done",
            spec.sample_rate, config.sample_rate
        );
    }

    let bits = config.bits()?;
    let frames = bytes.len() / format.bytes_per_frame();
    let sectors = frames.div_ceil(samples_per_sector(bits, format.layout())).max(1);

    let mut encoder = XaAdpcmEncoder::new(AudioShortReader::new(Cursor::new(bytes), format), bits);
    encoder.set_sample_rate(config.sample_rate)?;
    encoder.set_emphasis(config.emphasis);

    let mut writer = BufWriter::new(File::create(output)?);
    for _ in 0..sectors {
        encoder.encode_sector(&mut writer)?;
    }
    writer.flush()?;

    info!(
        "Encoded {} frames into {} sectors, coding info 0x{:02X}",
        encoder.sample_frames_read(),
        encoder.sectors_encoded(),
        encoder.coding_info().to_byte()
    );
    Ok(())
}

fn xa_decode(input: &Path, output: &Path, config: Option<&Path>) -> CliResult<()> {
    let config = load_config(config)?;
    config.validate_xa()?;

    let data = fs::read(input)?;
    let mut decoder = XaAdpcmDecoder::new(config.layout()?, config.bits()?, config.volume);
    let mut pcm = Vec::new();

    for (index, sector) in data.chunks(XA_SECTOR_DATA_SIZE).enumerate() {
        if sector.len() < XA_SECTOR_AUDIO_SIZE {
            warn!("Sector {} is truncated ({} bytes), skipped", index, sector.len());
            break;
        }
        decoder.decode_sector(sector, &mut pcm)?;
    }

    if decoder.had_corruption() {
        warn!("Input contained corrupted sound parameters; recovered values were used");
    }

    write_wav(output, config.channels, config.sample_rate, &pcm)
}
