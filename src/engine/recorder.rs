//! WAV file recorder
//!
//! Records cue audio rendered through the offline graph to WAV files.

use anyhow::{anyhow, bail, Context, Result};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use super::{OfflineHost, PlayOutcome, ToneSynthesizer};
use crate::config::{AudioConfig, CueConfig};
use crate::synth::Cue;

/// WAV file recorder
pub struct Recorder {
    writer: WavWriter<BufWriter<File>>,
    sample_rate: u32,
    samples_written: u64,
}

impl Recorder {
    /// Create a new recorder
    ///
    /// # Arguments
    /// * `path` - Output file path
    /// * `sample_rate` - Sample rate in Hz
    pub fn new(path: &Path, sample_rate: u32) -> Result<Self> {
        let spec = WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };

        let writer = WavWriter::create(path, spec)
            .with_context(|| format!("failed to create WAV file: {:?}", path))?;

        Ok(Self {
            writer,
            sample_rate,
            samples_written: 0,
        })
    }

    /// Get the number of samples written
    pub fn samples_written(&self) -> u64 {
        self.samples_written
    }

    /// Get the duration recorded in seconds
    pub fn duration_secs(&self) -> f64 {
        self.samples_written as f64 / self.sample_rate as f64
    }

    /// Write a buffer of samples
    pub fn write_buffer(&mut self, buffer: &[f32]) -> Result<()> {
        for &sample in buffer {
            self.writer
                .write_sample(sample)
                .context("failed to write sample")?;
        }
        self.samples_written += buffer.len() as u64;
        Ok(())
    }

    /// Finalize the WAV file
    ///
    /// This must be called to properly close the file and write the header.
    pub fn finalize(self) -> Result<()> {
        self.writer.finalize().context("failed to finalize WAV file")
    }
}

/// What [`render_cue`] wrote
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSummary {
    pub cue: Cue,
    pub samples: u64,
    pub duration_secs: f64,
    pub peak: f32,
}

/// Play `cue` through an offline graph and record the mix to `path`
pub fn render_cue(
    cue: Cue,
    audio: &AudioConfig,
    cues: &CueConfig,
    path: &Path,
) -> Result<RenderSummary> {
    let host = OfflineHost::new(audio.sample_rate as f64, audio.volume);
    let mixer = host.mixer();
    let mut synth = ToneSynthesizer::new(host, cues.clone());

    if let PlayOutcome::Degraded(err) = synth.play(cue) {
        bail!("failed to schedule {} cue: {}", cue, err);
    }

    let mut recorder = Recorder::new(path, audio.sample_rate)?;
    let mut buffer = vec![0.0f32; audio.buffer_size];
    let mut peak = 0.0f32;

    loop {
        {
            let mut mix = mixer.lock().map_err(|_| anyhow!("mixer lock poisoned"))?;
            if mix.is_idle() {
                break;
            }
            mix.fill_buffer(&mut buffer);
        }
        peak = buffer.iter().fold(peak, |p, s| p.max(s.abs()));
        recorder.write_buffer(&buffer)?;
    }
    synth.destroy();

    let summary = RenderSummary {
        cue,
        samples: recorder.samples_written(),
        duration_secs: recorder.duration_secs(),
        peak,
    };
    recorder.finalize()?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_recorder_write_buffer() {
        let file = NamedTempFile::new().unwrap();
        let mut recorder = Recorder::new(file.path(), 44100).unwrap();

        let buffer = vec![0.1, 0.2, 0.3, 0.4, 0.5];
        recorder.write_buffer(&buffer).unwrap();

        assert_eq!(recorder.samples_written(), 5);
    }

    #[test]
    fn test_recorder_duration() {
        let file = NamedTempFile::new().unwrap();
        let mut recorder = Recorder::new(file.path(), 44100).unwrap();
        recorder.write_buffer(&vec![0.0; 44100]).unwrap();

        assert!((recorder.duration_secs() - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_render_click_produces_valid_wav() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_path_buf();

        let audio = AudioConfig::default();
        let summary = render_cue(Cue::Click, &audio, &CueConfig::default(), &path).unwrap();

        // 0.1 s at 44.1 kHz, padded to whole buffers
        assert!(summary.samples >= 4410);
        assert!(summary.samples < 4410 + audio.buffer_size as u64);
        assert!(summary.peak > 0.09 && summary.peak <= 0.1 + 1e-6);

        let reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 44100);
        assert_eq!(spec.sample_format, SampleFormat::Float);
        assert_eq!(reader.len() as u64, summary.samples);
    }

    #[test]
    fn test_render_notification_covers_both_tones() {
        let file = NamedTempFile::new().unwrap();
        let audio = AudioConfig::default();
        let summary =
            render_cue(Cue::Notification, &audio, &CueConfig::default(), file.path()).unwrap();

        // Second tone starts at 0.1 s and lasts 0.15 s
        assert!(summary.duration_secs >= 0.25);
        assert!(summary.duration_secs < 0.25 + 0.02);
    }
}
