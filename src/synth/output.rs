//! Audio device output — a cpal stream fed through a lock-free sample queue.
//!
//! The callback on the audio thread pops whatever samples are queued and
//! zero-fills the rest, so an underrun plays silence instead of stale data.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use ringbuf::{
    traits::{Consumer, Producer, Split},
    HeapRb,
};

use crate::playback::PlaybackError;

/// Seconds of interleaved audio the queue can hold.
const QUEUE_SECONDS: usize = 4;

/// An open output stream on the default audio device.
pub struct AudioOutput {
    _stream: cpal::Stream,
    producer: ringbuf::HeapProd<f32>,
    sample_rate: u32,
    channels: u16,
}

impl AudioOutput {
    /// Open the default output device at its native configuration and start
    /// the stream.
    pub fn new() -> Result<Self, PlaybackError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(PlaybackError::NoOutputDevice)?;

        let config = device
            .default_output_config()
            .map_err(|e| PlaybackError::DeviceConfig(e.to_string()))?;
        let sample_rate = config.sample_rate().0;
        let channels = config.channels();

        let capacity = sample_rate as usize * channels as usize * QUEUE_SECONDS;
        let rb = HeapRb::<f32>::new(capacity);
        let (producer, mut consumer) = rb.split();

        let stream_config = cpal::StreamConfig {
            channels,
            sample_rate: cpal::SampleRate(sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let err_fn = |err: cpal::StreamError| {
            log::warn!("audio stream error: {err}");
        };

        let stream = device
            .build_output_stream(
                &stream_config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let filled = consumer.pop_slice(data);
                    for sample in &mut data[filled..] {
                        *sample = 0.0;
                    }
                },
                err_fn,
                None,
            )
            .map_err(|e| PlaybackError::StreamBuild(e.to_string()))?;

        stream
            .play()
            .map_err(|e| PlaybackError::StreamPlay(e.to_string()))?;

        Ok(Self {
            _stream: stream,
            producer,
            sample_rate,
            channels,
        })
    }

    /// Queue as many samples as currently fit; returns how many were taken.
    pub fn write(&mut self, samples: &[f32]) -> usize {
        self.producer.push_slice(samples)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }
}
