//! Reactive view state of the audio, video and screen sharing tracks of call
//! participants.
//!
//! All the reactive state is single-threaded, so every type of this crate must
//! be used from inside a [`tokio::task::LocalSet`].

pub mod component;
pub mod config;
pub mod proto;
pub mod sys;
pub mod utils;

pub use self::{
    component::{
        Room, RoomError, SlotPurpose, TrackSlot, TrackWrapper,
        TrackWrapperError, VolumeReading, VolumeStore, VolumeSubscription,
    },
    config::{Config, Context},
    proto::{Event, ParticipantId, SpaceUser},
};
