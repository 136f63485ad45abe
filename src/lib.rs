pub mod analysis;
pub mod beep;
pub mod code;
pub mod error;
pub mod synth;
pub mod timing;
pub mod wav;

pub use error::{MorseError, MorseResult};
pub use synth::{ChannelMode, SampleBuffer, ToneSettings};
pub use timing::Element;

use serde::Serialize;
use std::path::{Path, PathBuf};

pub struct RenderConfig {
    pub settings: ToneSettings,
    pub output: PathBuf,
    pub print_progress: bool,
    pub analyze: bool,
}

impl RenderConfig {
    pub fn new(settings: ToneSettings, output: &Path, print_progress: bool) -> RenderConfig {
        RenderConfig {
            settings,
            output: output.to_owned(),
            print_progress,
            analyze: false,
        }
    }
}

/// What was written by [`render_wav`].
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RenderSummary {
    pub path: PathBuf,
    pub channels: u16,
    pub sample_rate: u32,
    pub pcm_count: usize,
    pub duration_seconds: f64,
    pub size_bytes: u64,
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub measured_tone_hz: Option<f32>,
}

/// Default output file, named after the current unix time.
pub fn default_output_path() -> PathBuf {
    PathBuf::from(format!("morse{}.wav", chrono::Utc::now().timestamp()))
}

/// Render dot/dash morse into a wav file.
///
/// The file at `config.output` is only replaced once the whole file is written.
pub fn render_wav(morse: &str, config: &RenderConfig) -> MorseResult<RenderSummary> {
    let settings = &config.settings;
    if config.print_progress {
        println!("Synthesizing...");
    }
    let elements = timing::parse(morse);
    let buffer = synth::synthesize(&elements, settings)?;
    let measured_tone_hz = if config.analyze {
        if config.print_progress {
            println!("Analysing...");
        }
        analysis::measure_tone(&buffer)
    } else {
        None
    };
    if config.print_progress {
        println!("Writing wav to file...");
    }
    let size_bytes = wav::write_wav_file(&config.output, &buffer)?;
    log::info!(
        "{} frames written to {}",
        buffer.frames(),
        config.output.display()
    );
    Ok(RenderSummary {
        path: config.output.clone(),
        channels: settings.channels.channels(),
        sample_rate: settings.sample_rate,
        pcm_count: buffer.frames(),
        duration_seconds: buffer.duration_seconds(),
        size_bytes,
        warnings: settings
            .check_ratios()
            .iter()
            .map(|w| w.to_string())
            .collect(),
        measured_tone_hz,
    })
}
