//! Ambient soundtrack: Glicol tracks switched by theme and mute state.
//!
//! Track selection is pure ([`TrackMix`]); [`AudioSystem`] only renders it.

mod mixer;
mod synthesis;
mod system;

pub use mixer::{Track, TrackMix};
pub use synthesis::{composition, Chime};
pub use system::AudioSystem;
