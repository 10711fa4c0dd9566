//! Audio output: one Glicol engine per ambient track plus the click chime.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use glicol::Engine;
use std::sync::{Arc, Mutex};

use super::mixer::{Track, TrackMix};
use super::synthesis::{composition, Chime};
use crate::error::{Error, Result};
use crate::params::{
    audio_constants::{BLOCK_SIZE, OUTPUT_CLIP},
    AudioConfig,
};

/// State shared between the host thread and the audio callback
struct SharedMix {
    mix: TrackMix,
    chime: Chime,
}

/// Audio system playing the ambient tracks selected by a [`TrackMix`]
pub struct AudioSystem {
    shared: Arc<Mutex<SharedMix>>,

    click_sfx: bool,

    /// Audio output stream (kept alive)
    _stream: cpal::Stream,
}

impl AudioSystem {
    /// Open the default output device and start every engine paused
    pub fn new(config: &AudioConfig) -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| Error::Audio("No audio output device found".to_string()))?;

        let stream_config = device
            .default_output_config()
            .map_err(|e| Error::Audio(format!("Failed to get audio config: {}", e)))?;

        let sample_rate = stream_config.sample_rate().0;
        let channels = stream_config.channels() as usize;

        log::info!(
            "Audio: {} @ {}Hz, {} channels",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            sample_rate,
            channels
        );

        let mut engines = Vec::with_capacity(Track::ALL.len());
        for track in Track::ALL {
            let mut engine = Engine::<BLOCK_SIZE>::new();
            engine.set_sr(sample_rate as usize);
            engine.update_with_code(composition(track));
            engine
                .update()
                .map_err(|e| Error::Audio(format!("Glicol engine init failed for {:?}: {:?}", track, e)))?;
            engines.push((track, engine));
        }

        let shared = Arc::new(Mutex::new(SharedMix {
            mix: TrackMix::silent(),
            chime: Chime::new(config.sfx_duration_s, sample_rate),
        }));
        let shared_callback = Arc::clone(&shared);
        let gain = config.master_gain.clamp(0.0, 1.0);

        // Mixed stereo block and read position; starts exhausted
        let mut block = [[0.0f32; BLOCK_SIZE]; 2];
        let mut cursor = BLOCK_SIZE;

        let stream = device
            .build_output_stream(
                &stream_config.into(),
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let Ok(mut shared) = shared_callback.lock() else {
                        data.fill(0.0);
                        return;
                    };

                    for frame in data.chunks_mut(channels.max(1)) {
                        if cursor == BLOCK_SIZE {
                            block = [[0.0; BLOCK_SIZE]; 2];
                            for (track, engine) in engines.iter_mut() {
                                // Inactive engines stay paused
                                if !shared.mix.is_active(*track) {
                                    continue;
                                }
                                let (buffers, _) = engine.next_block(vec![]);
                                for i in 0..BLOCK_SIZE {
                                    block[0][i] += buffers[0][i];
                                    block[1][i] += buffers[1][i];
                                }
                            }
                            cursor = 0;
                        }

                        let chime = shared.chime.next_sample();
                        let left = block[0][cursor] * gain + chime;
                        let right = block[1][cursor] * gain + chime;
                        write_frame(frame, left, right);
                        cursor += 1;
                    }
                },
                |err| log::error!("Audio stream error: {}", err),
                None,
            )
            .map_err(|e| Error::Audio(format!("Failed to build audio stream: {}", e)))?;

        stream
            .play()
            .map_err(|e| Error::Audio(format!("Failed to start audio stream: {}", e)))?;

        Ok(Self {
            shared,
            click_sfx: config.click_sfx,
            _stream: stream,
        })
    }

    /// Start/stop tracks; each flag takes effect on the next audio block
    pub fn set_mix(&self, mix: TrackMix) {
        match self.shared.lock() {
            Ok(mut shared) => {
                if shared.mix != mix {
                    log::debug!("Track mix: {:?}", mix);
                }
                shared.mix = mix;
            }
            Err(_) => log::warn!("Audio state poisoned, mix change dropped"),
        }
    }

    /// Fire the one-shot chime (no-op when disabled in config)
    pub fn play_sfx(&self) {
        if !self.click_sfx {
            return;
        }
        if let Ok(mut shared) = self.shared.lock() {
            shared.chime.trigger();
        }
    }
}

/// Write a clipped stereo pair into one interleaved frame
///
/// Mono devices get the average; extra channels are silent.
fn write_frame(frame: &mut [f32], left: f32, right: f32) {
    // Safety limiter: hard clip to prevent ear damage
    let left = left.clamp(-OUTPUT_CLIP, OUTPUT_CLIP);
    let right = right.clamp(-OUTPUT_CLIP, OUTPUT_CLIP);
    match frame {
        [] => {}
        [mono] => *mono = (left + right) * 0.5,
        [l, r, rest @ ..] => {
            *l = left;
            *r = right;
            rest.fill(0.0);
        }
    }
}
