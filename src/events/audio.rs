//! Messages exchanged with the audio thread.

/// Commands sent *to* the audio thread.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioCmd {
    LoadFx { id: String, path: String },
    PlayFx { id: String },
    /// Master volume in `0.0..=1.0`.
    Volume { vol: f32 },
    Shutdown,
}

/// Messages sent *back* from the audio thread.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioMessage {
    FxLoaded { id: String },
    FxLoadFailed { id: String, error: String },
    FxFinished { id: String },
    /// Play request refused: unknown id or every channel busy.
    FxDropped { id: String, reason: String },
}
