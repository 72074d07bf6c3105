//! Eager audio file decoding via symphonia.
//!
//! Files are decoded to interleaved f32 PCM in one pass at load time;
//! nothing is streamed during playback. Only WAV, MP3 and FLAC are
//! accepted — other recognized formats exist in [`AudioFormat`] for
//! detection but have no decoder wired up.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use log::warn;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::format::AudioFormat;

/// A fully decoded audio file.
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    pub sample_rate: u32,
    /// Channel count, at least 1 for any successful decode.
    pub channels: usize,
    /// Interleaved samples, `channels` per frame.
    pub samples: Vec<f32>,
}

impl DecodedAudio {
    /// Number of per-channel sample frames.
    pub fn frame_count(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.samples.len() / self.channels
        }
    }
}

/// Decode an entire file into memory.
///
/// A file that ends early still decodes successfully with whatever
/// frames were read (a truncation warning is logged); a file yielding
/// no frames at all is an error.
pub fn decode_file(path: &Path) -> Result<DecodedAudio> {
    let kind = AudioFormat::from_path(path);
    if !kind.is_decodable() {
        bail!("unsupported audio format {kind:?}: {}", path.display());
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open audio file {}", path.display()))?;
    let source = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            source,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .with_context(|| format!("Failed to probe audio file {}", path.display()))?;
    let mut reader = probed.format;

    let track = reader
        .default_track()
        .ok_or_else(|| anyhow!("no default track in {}", path.display()))?;
    let track_id = track.id;
    let expected_frames = track.codec_params.n_frames;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .with_context(|| format!("Failed to create decoder for {}", path.display()))?;

    let mut sample_rate = track.codec_params.sample_rate.unwrap_or(0);
    let mut channels = track.codec_params.channels.map_or(0, |c| c.count());
    let mut samples: Vec<f32> = Vec::new();

    loop {
        let packet = match reader.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break; // End of stream
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => {
                // Keep what was decoded so far rather than dropping the
                // whole file over a bad tail.
                warn!("stopping decode of {} early: {e}", path.display());
                break;
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                sample_rate = spec.rate;
                channels = spec.channels.count();
                let mut buf = SampleBuffer::<f32>::new(decoded.frames() as u64, spec);
                buf.copy_interleaved_ref(decoded);
                samples.extend_from_slice(buf.samples());
            }
            Err(SymphoniaError::DecodeError(e)) => {
                warn!("skipping malformed packet in {}: {e}", path.display());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to decode {}", path.display()));
            }
        }
    }

    if channels == 0 || samples.is_empty() {
        bail!("no audio frames decoded from {}", path.display());
    }

    let decoded = DecodedAudio {
        sample_rate,
        channels,
        samples,
    };
    if let Some(expected) = expected_frames {
        let actual = decoded.frame_count() as u64;
        if actual < expected {
            warn!(
                "{} may be truncated: expected {expected} frames, decoded {actual}",
                path.display()
            );
        }
    }
    Ok(decoded)
}
