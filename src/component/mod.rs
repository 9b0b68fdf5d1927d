mod room;
mod slot;
mod track_wrapper;
mod volume;

pub use self::{
    room::{Room, RoomError},
    slot::{SlotPurpose, TrackSlot},
    track_wrapper::{TrackWrapper, TrackWrapperError},
    volume::{AudioSource, VolumeReading, VolumeStore, VolumeSubscription},
};
