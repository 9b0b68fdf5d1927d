use std::fmt;

use crate::sys::TrackHandle;

/// Identifier of a call participant.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct ParticipantId(pub String);

impl From<&str> for ParticipantId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Higher-level user a participant is bound to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpaceUser {
    pub id: String,
    pub name: String,
}

/// Track callbacks of the RTC library.
#[derive(Debug)]
pub enum Event {
    TrackAdded {
        participant_id: ParticipantId,
        track: TrackHandle,
    },

    TrackMuteChanged {
        participant_id: ParticipantId,
        track: TrackHandle,
        muted: bool,
    },

    TrackRemoved {
        participant_id: ParticipantId,
        track: TrackHandle,
    },

    ParticipantLeft {
        participant_id: ParticipantId,
    },
}
