//! Real-time audio output using cpal

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, Stream, StreamConfig};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

use super::{AudioContext, AudioError, AudioHost, ContextState, Mixer, VoiceOwner};
use crate::config::AudioConfig;
use crate::synth::Tone;

/// Opens contexts on the system's output device
#[derive(Debug, Clone, Default)]
pub struct CpalHost {
    device: Option<String>,
    master_volume: f32,
}

impl CpalHost {
    /// Host for the named device, or the default output when `None`
    pub fn new(device: Option<String>, master_volume: f32) -> Self {
        Self {
            device,
            master_volume,
        }
    }

    pub fn from_config(config: &AudioConfig) -> Self {
        Self::new(config.device.clone(), config.volume)
    }

    fn find_device(&self, host: &cpal::Host) -> Option<Device> {
        if let Some(wanted) = &self.device {
            let found = host.output_devices().ok().and_then(|mut devices| {
                devices.find(|d| d.name().map(|n| &n == wanted).unwrap_or(false))
            });
            if found.is_some() {
                return found;
            }
            warn!("Output device '{}' not found, using default", wanted);
        }
        host.default_output_device()
    }
}

impl AudioHost for CpalHost {
    type Context = CpalContext;

    fn create_context(&self) -> Result<CpalContext, AudioError> {
        let host = cpal::default_host();
        let device = self.find_device(&host).ok_or(AudioError::Unsupported)?;

        let config = device
            .default_output_config()
            .map_err(|e| AudioError::Construction(e.to_string()))?;
        let sample_format = config.sample_format();
        let stream_config: StreamConfig = config.into();

        let mixer = Arc::new(Mutex::new(Mixer::new(
            stream_config.sample_rate.0 as f64,
            self.master_volume,
        )));

        let stream = match sample_format {
            SampleFormat::F32 => build_stream::<f32>(&device, &stream_config, Arc::clone(&mixer))?,
            SampleFormat::I16 => build_stream::<i16>(&device, &stream_config, Arc::clone(&mixer))?,
            SampleFormat::U16 => build_stream::<u16>(&device, &stream_config, Arc::clone(&mixer))?,
            other => {
                return Err(AudioError::Construction(format!(
                    "unsupported sample format {:?}",
                    other
                )))
            }
        };

        // Some backends start streams on creation; contexts begin suspended
        if let Err(e) = stream.pause() {
            debug!("Could not pause new stream: {}", e);
        }

        info!(
            "Opened audio output {} ({} Hz, {} ch)",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            stream_config.sample_rate.0,
            stream_config.channels
        );

        Ok(CpalContext {
            stream: Some(stream),
            mixer,
            state: ContextState::Suspended,
        })
    }
}

/// Sole owner of a stream's mixer
const STREAM_OWNER: VoiceOwner = 0;

/// A live output stream fed by its own mixer
pub struct CpalContext {
    stream: Option<Stream>,
    mixer: Arc<Mutex<Mixer>>,
    state: ContextState,
}

impl AudioContext for CpalContext {
    fn state(&self) -> ContextState {
        self.state
    }

    fn resume(&mut self) -> Result<(), AudioError> {
        let stream = self.stream.as_ref().ok_or(AudioError::Closed)?;
        stream.play().map_err(|e| AudioError::Resume(e.to_string()))?;
        self.state = ContextState::Running;
        Ok(())
    }

    fn current_time(&self) -> f64 {
        self.mixer.lock().map(|m| m.current_time()).unwrap_or(0.0)
    }

    fn time_remaining(&self) -> f64 {
        self.mixer
            .lock()
            .map(|m| m.time_remaining(STREAM_OWNER))
            .unwrap_or(0.0)
    }

    fn schedule(&mut self, tone: &Tone, at: f64) -> Result<(), AudioError> {
        if self.stream.is_none() {
            return Err(AudioError::Closed);
        }
        let mut mixer = self
            .mixer
            .lock()
            .map_err(|_| AudioError::Node("mixer lock poisoned".to_string()))?;
        mixer.schedule_tone(STREAM_OWNER, tone, at);
        Ok(())
    }

    fn close(&mut self) -> Result<(), AudioError> {
        // Dropping the stream stops the callback
        if self.stream.take().is_some() {
            if let Ok(mut mixer) = self.mixer.lock() {
                mixer.silence(STREAM_OWNER);
            }
        }
        self.state = ContextState::Closed;
        Ok(())
    }
}

fn build_stream<T: cpal::Sample + cpal::SizedSample + cpal::FromSample<f32>>(
    device: &Device,
    config: &StreamConfig,
    mixer: Arc<Mutex<Mixer>>,
) -> Result<Stream, AudioError> {
    let channels = config.channels as usize;

    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                if let Ok(mut mix) = mixer.try_lock() {
                    for frame in data.chunks_mut(channels) {
                        let sample = mix.process() as f32;
                        for channel_sample in frame.iter_mut() {
                            *channel_sample = T::from_sample(sample);
                        }
                    }
                } else {
                    // Mutex locked, fill with silence
                    for sample in data.iter_mut() {
                        *sample = T::from_sample(0.0f32);
                    }
                }
            },
            |err| {
                warn!("Audio stream error: {}", err);
            },
            None,
        )
        .map_err(|e| AudioError::Construction(e.to_string()))
}

/// Get the default output device name
pub fn default_device_name() -> Option<String> {
    let host = cpal::default_host();
    host.default_output_device().and_then(|d| d.name().ok())
}

/// List all available output devices
pub fn list_output_devices() -> Vec<(String, StreamConfig)> {
    let host = cpal::default_host();
    let mut devices = Vec::new();

    if let Ok(output_devices) = host.output_devices() {
        for device in output_devices {
            if let (Ok(name), Ok(config)) = (device.name(), device.default_output_config()) {
                devices.push((name, config.into()));
            }
        }
    }

    devices
}
