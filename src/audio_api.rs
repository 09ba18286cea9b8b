/// Control messages into the audio callback. Sent over a bounded channel
/// and drained with try_recv at the top of every block, so the UI thread
/// can never stall the callback.
#[derive(Clone, Copy, Debug)]
pub enum AudioCommand {
    SetMasterVolume(f32),
    SetResonance(f32),
    SetPlaying(bool),
}
