//! Audio thread backed by Raylib.
//!
//! [`audio_thread`] runs on its own OS thread, owns the Raylib audio device
//! and every loaded [`Sound`], and processes
//! [`AudioCmd`](crate::events::audio::AudioCmd) messages, answering with
//! [`AudioMessage`](crate::events::audio::AudioMessage)s. The game loop never
//! touches the audio device directly.
//!
//! Notes
//! - Create the thread once via [`crate::resources::audio::AudioBridge::spawn`]
//!   and stop it with [`crate::resources::audio::AudioBridge::shutdown`].
//! - Concurrent cues are tracked in [`FxChannels`]; a cue arriving while every
//!   channel is busy is dropped.
//! - Replaying a cue that is still sounding restarts it on the same channel.

use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use log::{debug, info, warn};
use raylib::core::audio::{RaylibAudio, Sound};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::constants::MAX_SOUND_CHANNELS;
use crate::events::audio::{AudioCmd, AudioMessage};

/// Bookkeeping of which cues are currently sounding.
#[derive(Debug)]
pub struct FxChannels {
    capacity: usize,
    playing: FxHashSet<String>,
}

impl FxChannels {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            playing: FxHashSet::default(),
        }
    }

    /// Claim a channel for `id`. A cue already playing keeps its channel.
    /// Returns false when all channels are busy.
    pub fn try_start(&mut self, id: &str) -> bool {
        if self.playing.contains(id) {
            return true;
        }
        if self.playing.len() >= self.capacity {
            return false;
        }
        self.playing.insert(id.to_string());
        true
    }

    /// Release channels whose cue `is_playing` reports silent, returning
    /// their ids.
    pub fn reap(&mut self, is_playing: impl Fn(&str) -> bool) -> Vec<String> {
        let ended: Vec<String> = self
            .playing
            .iter()
            .filter(|id| !is_playing(id.as_str()))
            .cloned()
            .collect();
        for id in &ended {
            self.playing.remove(id);
        }
        ended
    }

    pub fn active(&self) -> usize {
        self.playing.len()
    }

    pub fn clear(&mut self) {
        self.playing.clear();
    }
}

/// Entry point of the dedicated audio thread.
///
/// Blocks until [`AudioCmd::Shutdown`] arrives or the command channel is
/// closed. If the audio device cannot be opened the thread drains commands,
/// reporting every load as failed, so the game still runs silently.
pub fn audio_thread(rx_cmd: Receiver<AudioCmd>, tx_msg: Sender<AudioMessage>) {
    let audio = match RaylibAudio::init_audio_device() {
        Ok(device) => device,
        Err(e) => {
            warn!("[audio] device unavailable, running silent: {}", e);
            run_silent(rx_cmd, tx_msg);
            return;
        }
    };

    debug!("[audio] thread starting (id={:?})", thread::current().id());

    let mut sounds: FxHashMap<String, Sound> = FxHashMap::default();
    let mut channels = FxChannels::new(MAX_SOUND_CHANNELS);

    'run: loop {
        loop {
            let cmd = match rx_cmd.try_recv() {
                Ok(cmd) => cmd,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => break 'run,
            };
            match cmd {
                AudioCmd::LoadFx { id, path } => match audio.new_sound(&path) {
                    Ok(sound) => {
                        debug!("[audio] fx loaded id='{}' path='{}'", id, path);
                        sounds.insert(id.clone(), sound);
                        let _ = tx_msg.send(AudioMessage::FxLoaded { id });
                    }
                    Err(e) => {
                        warn!("[audio] fx load failed id='{}' path='{}': {}", id, path, e);
                        let _ = tx_msg.send(AudioMessage::FxLoadFailed {
                            id,
                            error: e.to_string(),
                        });
                    }
                },
                AudioCmd::PlayFx { id } => {
                    let Some(sound) = sounds.get(&id) else {
                        warn!("[audio] fx play dropped id='{}': not loaded", id);
                        let _ = tx_msg.send(AudioMessage::FxDropped {
                            id,
                            reason: "not loaded".into(),
                        });
                        continue;
                    };
                    if channels.try_start(&id) {
                        debug!("[audio] fx play id='{}'", id);
                        sound.play();
                    } else {
                        warn!(
                            "[audio] fx play dropped id='{}': {} channels busy",
                            id,
                            channels.active()
                        );
                        let _ = tx_msg.send(AudioMessage::FxDropped {
                            id,
                            reason: "no free channel".into(),
                        });
                    }
                }
                AudioCmd::Volume { vol } => {
                    audio.set_master_volume(vol.clamp(0.0, 1.0));
                }
                AudioCmd::Shutdown => {
                    debug!("[audio] shutdown requested");
                    break 'run;
                }
            }
        }

        for id in channels.reap(|id| sounds.get(id).is_some_and(|s| s.is_playing())) {
            debug!("[audio] fx finished id='{}'", id);
            let _ = tx_msg.send(AudioMessage::FxFinished { id });
        }
        thread::sleep(Duration::from_millis(10));
    }

    channels.clear();
    sounds.clear();
    info!("[audio] thread exiting");
    // sounds drop before `audio`
}

fn run_silent(rx_cmd: Receiver<AudioCmd>, tx_msg: Sender<AudioMessage>) {
    for cmd in rx_cmd.iter() {
        match cmd {
            AudioCmd::LoadFx { id, .. } => {
                let _ = tx_msg.send(AudioMessage::FxLoadFailed {
                    id,
                    error: "no audio device".into(),
                });
            }
            AudioCmd::PlayFx { .. } | AudioCmd::Volume { .. } => {}
            AudioCmd::Shutdown => break,
        }
    }
}
