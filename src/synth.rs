use crate::error::{MorseError, MorseResult};
use crate::timing::{self, Element};
use serde::Serialize;
use std::f64::consts::PI;
use std::fmt;

/// Peak sample value of the tone.
pub const AMPLITUDE: f64 = 32000.0;
pub const MIN_TONE_HZ: f64 = 37.0;
pub const MAX_TONE_HZ: f64 = 8000.0;
/// Seconds per element at one word per minute (60 s / 50 elements per word).
pub const ELEMENT_SECONDS_AT_1_WPM: f64 = 1.2;
/// Largest distance from a whole number before a rate ratio is reported.
pub const RATIO_TOLERANCE: f64 = 1e-4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ChannelMode {
    Mono,
    Stereo,
}

impl ChannelMode {
    pub fn channels(self) -> u16 {
        match self {
            ChannelMode::Mono => 1,
            ChannelMode::Stereo => 2,
        }
    }
}

/// Keep a tone frequency inside the audible range the synthesizer expects.
pub fn clamp_tone(tone_hz: f64) -> f64 {
    tone_hz.clamp(MIN_TONE_HZ, MAX_TONE_HZ)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToneSettings {
    pub tone_hz: f64,
    pub wpm: f64,
    pub sample_rate: u32,
    pub channels: ChannelMode,
}

impl ToneSettings {
    pub fn new(
        tone_hz: f64,
        wpm: f64,
        sample_rate: u32,
        channels: ChannelMode,
    ) -> MorseResult<ToneSettings> {
        if sample_rate == 0 {
            return Err(MorseError::InvalidSampleRate { rate: sample_rate });
        }
        Ok(ToneSettings {
            tone_hz,
            wpm,
            sample_rate,
            channels,
        })
    }

    pub fn elements_per_second(&self) -> f64 {
        self.wpm / ELEMENT_SECONDS_AT_1_WPM
    }

    pub fn element_seconds(&self) -> f64 {
        ELEMENT_SECONDS_AT_1_WPM / self.wpm
    }

    /// Samples in one element, truncated. Zero when the speed is not positive.
    pub fn samples_per_element(&self) -> usize {
        if !(self.wpm > 0.0) || !self.wpm.is_finite() {
            return 0;
        }
        (self.element_seconds() * self.sample_rate as f64).floor() as usize
    }

    /// Rate combinations that don't divide evenly and will click at element edges.
    pub fn check_ratios(&self) -> Vec<RatioWarning> {
        let sample_rate = self.sample_rate as f64;
        let eps = self.elements_per_second();
        [
            ("sample rate", sample_rate, "tone", self.tone_hz),
            ("sample rate", sample_rate, "element rate", eps),
            ("tone", self.tone_hz, "element rate", eps),
        ]
        .into_iter()
        .filter(|&(_, a, _, b)| ratio_poor(a, b))
        .map(|(numerator, a, denominator, b)| RatioWarning {
            numerator,
            a,
            denominator,
            b,
        })
        .collect()
    }
}

/// True when `a / b` is not within [`RATIO_TOLERANCE`] of a whole number.
pub fn ratio_poor(a: f64, b: f64) -> bool {
    let ratio = a / b;
    (ratio - ratio.round()).abs() > RATIO_TOLERANCE
}

#[derive(Clone, Debug, PartialEq)]
pub struct RatioWarning {
    pub numerator: &'static str,
    pub a: f64,
    pub denominator: &'static str,
    pub b: f64,
}

impl RatioWarning {
    pub fn ratio(&self) -> f64 {
        self.a / self.b
    }
}

impl fmt::Display for RatioWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sub-optimal sound ratio {}({}) / {}({}) = {:.6}",
            self.numerator,
            self.a,
            self.denominator,
            self.b,
            self.ratio()
        )
    }
}

/// Interleaved 16-bit PCM frames.
///
/// Capacity grows one second of frames at a time. Stereo frames hold the same
/// value on both channels.
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    samples: Vec<i16>,
    channels: ChannelMode,
    sample_rate: u32,
}

impl SampleBuffer {
    pub fn new(channels: ChannelMode, sample_rate: u32) -> SampleBuffer {
        SampleBuffer {
            samples: Vec::new(),
            channels,
            sample_rate,
        }
    }

    pub fn push_frame(&mut self, value: i16) -> MorseResult<()> {
        let width = self.channels.channels() as usize;
        if self.samples.capacity() - self.samples.len() < width {
            self.grow()?;
        }
        match self.channels {
            ChannelMode::Mono => self.samples.push(value),
            ChannelMode::Stereo => {
                self.samples.push(value);
                self.samples.push(value);
            }
        }
        Ok(())
    }

    pub fn extend_frames(&mut self, values: &[i16]) -> MorseResult<()> {
        for &value in values {
            self.push_frame(value)?;
        }
        Ok(())
    }

    fn grow(&mut self) -> MorseResult<()> {
        let second = self.sample_rate as usize;
        let width = self.channels.channels() as usize;
        self.samples
            .try_reserve_exact(second * width)
            .map_err(|source| MorseError::Allocation {
                frames: self.frame_capacity() + second,
                source,
            })
    }

    /// Make room for `frames` more frames, rounded up to whole seconds.
    pub fn reserve_frames(&mut self, frames: usize) -> MorseResult<()> {
        let second = self.sample_rate as usize;
        let width = self.channels.channels() as usize;
        let free = (self.samples.capacity() - self.samples.len()) / width;
        if frames <= free {
            return Ok(());
        }
        let missing = frames - free;
        let seconds = missing / second + usize::from(missing % second != 0);
        let samples = seconds.saturating_mul(second).saturating_mul(width);
        self.samples
            .try_reserve_exact(samples)
            .map_err(|source| MorseError::Allocation {
                frames: self.frames().saturating_add(frames),
                source,
            })
    }

    /// Number of frames written (`pcm_count`).
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels.channels() as usize
    }

    pub fn frame_capacity(&self) -> usize {
        self.samples.capacity() / self.channels.channels() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    /// Samples of one channel, `0` being left.
    pub fn channel(&self, index: usize) -> impl Iterator<Item = i16> + '_ {
        let width = self.channels.channels() as usize;
        self.samples.iter().skip(index).step_by(width).copied()
    }

    pub fn channel_mode(&self) -> ChannelMode {
        self.channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn duration_seconds(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }
}

/// Render a timing sequence to PCM.
///
/// Every element of tone restarts the sine at phase zero. A non-positive
/// speed or an empty sequence gives an empty buffer without allocating.
pub fn synthesize(elements: &[Element], settings: &ToneSettings) -> MorseResult<SampleBuffer> {
    let mut buffer = SampleBuffer::new(settings.channels, settings.sample_rate);
    if elements.is_empty() {
        return Ok(buffer);
    }
    for warning in settings.check_ratios() {
        log::warn!("{warning}");
    }
    let n = settings.samples_per_element();
    if n == 0 {
        log::debug!("zero samples per element (wpm {}), nothing to render", settings.wpm);
        return Ok(buffer);
    }
    buffer.reserve_frames(timing::total_units(elements).saturating_mul(n))?;
    let w = 2. * PI * settings.tone_hz;
    let sample_rate = settings.sample_rate as f64;
    for key_down in timing::keying(elements) {
        for i in 0..n {
            let value = if key_down {
                let t = i as f64 / sample_rate;
                (AMPLITUDE * (w * t).sin()).round() as i16
            } else {
                0
            };
            buffer.push_frame(value)?;
        }
    }
    log::debug!(
        "rendered {} elements into {} frames",
        elements.len(),
        buffer.frames()
    );
    Ok(buffer)
}
