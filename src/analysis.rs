use crate::synth::SampleBuffer;
use num_complex::Complex32;
use rustfft::{Fft, FftPlanner};

/// Most frames looked at when measuring a rendered tone.
pub const MAX_WINDOW: usize = 1 << 16;

pub fn convert_sample(sample: &[f32]) -> Vec<Complex32> {
    sample.iter().map(|&x| Complex32::from(x)).collect()
}

pub fn fft(samples: &[Complex32]) -> Vec<Complex32> {
    let mut result = samples.to_vec();
    let fft = FftPlanner::new().plan_fft_forward(result.len());
    fft.process(&mut result);
    result
}

/// Magnitudes of the bins below the Nyquist frequency.
pub fn frequency_bins(sample: &[Complex32]) -> Vec<f32> {
    let sample_size = sample.len() as f32;
    let alias_index = sample.len() / 2;
    sample[0..alias_index]
        .iter()
        .map(|x| x.norm() * 2. / sample_size)
        .collect()
}

/// Frequency of the strongest bin, `None` for silence or too few samples.
pub fn dominant_frequency(samples: &[f32], sample_rate: u32) -> Option<f32> {
    if samples.len() < 2 {
        return None;
    }
    let bins = frequency_bins(&fft(&convert_sample(samples)));
    let (index, peak) = bins
        .iter()
        .enumerate()
        .skip(1)
        .max_by(|(_, a), (_, b)| a.total_cmp(b))?;
    if *peak <= 0. {
        return None;
    }
    let freq_resolution = sample_rate as f32 / samples.len() as f32;
    Some(index as f32 * freq_resolution)
}

/// Tone heard in the opening frames of the first channel.
pub fn measure_tone(buffer: &SampleBuffer) -> Option<f32> {
    let window: Vec<f32> = buffer
        .channel(0)
        .take(MAX_WINDOW)
        .map(|s| s as f32)
        .collect();
    dominant_frequency(&window, buffer.sample_rate())
}
