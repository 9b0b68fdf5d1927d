//! Interfaces of the RTC library and UI services consumed by this crate.

mod highlight;
mod media_stream;
mod media_stream_track;
mod sound_meter;

pub use self::{
    highlight::{EmbedHighlighter, HighlightedEmbed},
    media_stream::{MediaStream, MediaStreamHandle},
    media_stream_track::{MediaTrack, TrackHandle, TrackKind, VideoType},
    sound_meter::{MeterError, SoundMeter, SoundMeterFactory},
};
