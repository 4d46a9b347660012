//! Planar WAV reading and writing.

use crate::{Error, Result};
use hound::{SampleFormat, WavReader, WavWriter};
use std::path::Path;
use tracing::debug;

/// Full-scale divisor for 16-bit PCM on the mono read path.
const I16_SCALE: f32 = 32768.0;

/// Deinterleaved sample data in its source format.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelData {
    /// 32-bit float channels.
    F32(Vec<Vec<f32>>),
    /// 16-bit signed PCM channels.
    I16(Vec<Vec<i16>>),
}

impl ChannelData {
    /// Number of channels.
    pub fn channels(&self) -> usize {
        match self {
            ChannelData::F32(data) => data.len(),
            ChannelData::I16(data) => data.len(),
        }
    }

    /// Frames per channel.
    pub fn frames(&self) -> usize {
        match self {
            ChannelData::F32(data) => data.first().map_or(0, Vec::len),
            ChannelData::I16(data) => data.first().map_or(0, Vec::len),
        }
    }
}

/// A decoded WAV file: planar channels plus the sample rate.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanarAudio {
    /// Per-channel sample buffers.
    pub data: ChannelData,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl PlanarAudio {
    /// Number of channels.
    pub fn channels(&self) -> usize {
        self.data.channels()
    }

    /// Frames per channel.
    pub fn frames(&self) -> usize {
        self.data.frames()
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.frames() as f64 / f64::from(self.sample_rate)
    }

    /// Average all channels into a normalized mono f32 buffer.
    pub fn mono(&self) -> Vec<f32> {
        let channels = self.channels() as f32;
        let frames = self.frames();
        let mut mono = vec![0.0f32; frames];
        match &self.data {
            ChannelData::F32(data) => {
                for channel in data {
                    for (acc, &s) in mono.iter_mut().zip(channel) {
                        *acc += s;
                    }
                }
            }
            ChannelData::I16(data) => {
                for channel in data {
                    for (acc, &s) in mono.iter_mut().zip(channel) {
                        *acc += f32::from(s) / I16_SCALE;
                    }
                }
            }
        }
        for s in &mut mono {
            *s /= channels;
        }
        mono
    }
}

/// Read a WAV file into planar channels, preserving the source format.
///
/// Accepts 16-bit PCM and 32-bit float; anything else is an
/// [`Error::UnsupportedFormat`] since the gate only speaks those two at
/// its sample boundary.
pub fn read_planar<P: AsRef<Path>>(path: P) -> Result<PlanarAudio> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let channels = spec.channels as usize;

    let data = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Float, 32) => {
            let samples: Vec<f32> = reader
                .into_samples::<f32>()
                .collect::<std::result::Result<_, _>>()?;
            ChannelData::F32(deinterleave(&samples, channels))
        }
        (SampleFormat::Int, 16) => {
            let samples: Vec<i16> = reader
                .into_samples::<i16>()
                .collect::<std::result::Result<_, _>>()?;
            ChannelData::I16(deinterleave(&samples, channels))
        }
        (format, bits) => {
            return Err(Error::UnsupportedFormat(format!("{bits}-bit {format:?}")));
        }
    };

    if data.frames() == 0 {
        return Err(Error::Empty);
    }

    debug!(
        channels,
        sample_rate = spec.sample_rate,
        frames = data.frames(),
        "read wav"
    );

    Ok(PlanarAudio {
        data,
        sample_rate: spec.sample_rate,
    })
}

/// Write planar audio back to disk in its own format.
pub fn write_planar<P: AsRef<Path>>(path: P, audio: &PlanarAudio) -> Result<()> {
    let (bits_per_sample, sample_format) = match &audio.data {
        ChannelData::F32(_) => (32, SampleFormat::Float),
        ChannelData::I16(_) => (16, SampleFormat::Int),
    };
    let spec = hound::WavSpec {
        channels: audio.channels() as u16,
        sample_rate: audio.sample_rate,
        bits_per_sample,
        sample_format,
    };
    let mut writer = WavWriter::create(path, spec)?;

    match &audio.data {
        ChannelData::F32(data) => {
            for frame in 0..audio.frames() {
                for channel in data {
                    writer.write_sample(channel[frame])?;
                }
            }
        }
        ChannelData::I16(data) => {
            for frame in 0..audio.frames() {
                for channel in data {
                    writer.write_sample(channel[frame])?;
                }
            }
        }
    }

    writer.finalize()?;
    Ok(())
}

/// Read a WAV file as a normalized mono f32 buffer (channels averaged),
/// for the offline analysis path.
pub fn read_mono<P: AsRef<Path>>(path: P) -> Result<(Vec<f32>, u32)> {
    let audio = read_planar(path)?;
    Ok((audio.mono(), audio.sample_rate))
}

fn deinterleave<S: Copy>(samples: &[S], channels: usize) -> Vec<Vec<S>> {
    let frames = samples.len() / channels.max(1);
    let mut planar: Vec<Vec<S>> = (0..channels)
        .map(|_| Vec::with_capacity(frames))
        .collect();
    for frame in samples.chunks_exact(channels) {
        for (channel, &sample) in planar.iter_mut().zip(frame) {
            channel.push(sample);
        }
    }
    planar
}
