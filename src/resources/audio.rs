//! Bridge between the game loop and the background audio thread.
//!
//! Use [`AudioBridge::spawn`] once during initialization to start the audio
//! thread, then [`AudioBridge::load_dir`] to queue every sound cue. Call
//! [`AudioBridge::shutdown`] during teardown to stop the thread and free
//! audio resources.

use std::fs;
use std::path::Path;
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender, unbounded};
use log::{debug, info, warn};

use crate::events::audio::{AudioCmd, AudioMessage};
use crate::systems::audio::audio_thread;

/// Sound file extensions picked up by [`AudioBridge::load_dir`].
pub const SOUND_EXTENSIONS: &[&str] = &["ogg", "wav"];

/// Channels plus join handle of the audio thread.
pub struct AudioBridge {
    /// Sender for [`AudioCmd`] messages (game loop -> audio thread).
    pub tx_cmd: Sender<AudioCmd>,
    /// Receiver for [`AudioMessage`] messages (audio thread -> game loop).
    pub rx_msg: Receiver<AudioMessage>,
    handle: Option<JoinHandle<()>>,
}

impl AudioBridge {
    /// Spawn the audio thread.
    pub fn spawn() -> Self {
        let (tx_cmd, rx_cmd) = unbounded::<AudioCmd>();
        let (tx_msg, rx_msg) = unbounded::<AudioMessage>();
        let handle = std::thread::spawn(move || audio_thread(rx_cmd, tx_msg));
        Self {
            tx_cmd,
            rx_msg,
            handle: Some(handle),
        }
    }

    /// A bridge with no thread behind it; commands go nowhere. Used when
    /// audio is disabled and in tests.
    pub fn detached() -> (Self, Receiver<AudioCmd>, Sender<AudioMessage>) {
        let (tx_cmd, rx_cmd) = unbounded::<AudioCmd>();
        let (tx_msg, rx_msg) = unbounded::<AudioMessage>();
        (
            Self {
                tx_cmd,
                rx_msg,
                handle: None,
            },
            rx_cmd,
            tx_msg,
        )
    }

    pub fn send(&self, cmd: AudioCmd) {
        // A dead audio thread only costs us sound.
        if self.tx_cmd.send(cmd).is_err() {
            debug!("audio thread gone, command discarded");
        }
    }

    pub fn play(&self, id: &str) {
        self.send(AudioCmd::PlayFx { id: id.to_string() });
    }

    /// Queue every sound file in `dir` for loading, keyed by file stem.
    /// Returns how many were queued.
    pub fn load_dir(&self, dir: &Path) -> usize {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Sound directory {} unreadable: {}", dir.display(), e);
                return 0;
            }
        };
        let mut paths: Vec<_> = entries
            .filter_map(Result::ok)
            .map(|e| e.path())
            .filter(|p| {
                p.extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| SOUND_EXTENSIONS.iter().any(|s| s.eq_ignore_ascii_case(ext)))
            })
            .collect();
        paths.sort();
        for path in &paths {
            let Some(id) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
                continue;
            };
            self.send(AudioCmd::LoadFx {
                id,
                path: path.to_string_lossy().into_owned(),
            });
        }
        info!("Queued {} sound cues from {}", paths.len(), dir.display());
        paths.len()
    }

    /// Drain messages from the audio thread and log them.
    pub fn poll(&self) -> Vec<AudioMessage> {
        let msgs: Vec<AudioMessage> = self.rx_msg.try_iter().collect();
        for msg in &msgs {
            match msg {
                AudioMessage::FxLoadFailed { id, error } => {
                    warn!("Sound '{}' failed to load: {}", id, error)
                }
                AudioMessage::FxDropped { id, reason } => {
                    debug!("Sound '{}' dropped: {}", id, reason)
                }
                _ => {}
            }
        }
        msgs
    }

    /// Request shutdown and join the thread.
    pub fn shutdown(mut self) {
        let _ = self.tx_cmd.send(AudioCmd::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_dir_queues_sound_files_by_stem() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["win.ogg", "lose.WAV", "scream.ogg", "notes.txt"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        let (bridge, rx_cmd, _tx_msg) = AudioBridge::detached();
        assert_eq!(bridge.load_dir(dir.path()), 3);
        let ids: Vec<String> = rx_cmd
            .try_iter()
            .filter_map(|cmd| match cmd {
                AudioCmd::LoadFx { id, .. } => Some(id),
                _ => None,
            })
            .collect();
        assert_eq!(ids, vec!["lose", "scream", "win"]);
    }

    #[test]
    fn test_missing_dir_queues_nothing() {
        let (bridge, rx_cmd, _tx_msg) = AudioBridge::detached();
        assert_eq!(bridge.load_dir(Path::new("/definitely/not/here")), 0);
        assert!(rx_cmd.try_recv().is_err());
    }

    #[test]
    fn test_poll_drains_messages() {
        let (bridge, _rx_cmd, tx_msg) = AudioBridge::detached();
        tx_msg
            .send(AudioMessage::FxLoaded { id: "win".into() })
            .unwrap();
        assert_eq!(bridge.poll().len(), 1);
        assert!(bridge.poll().is_empty());
    }
}
