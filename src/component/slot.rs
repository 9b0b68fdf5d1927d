use std::{fmt, rc::Rc};

use futures::stream::LocalBoxStream;
use medea_reactive::ObservableCell;

use crate::{proto::ParticipantId, sys::TrackHandle};

/// What a [`TrackSlot`] is used for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotPurpose {
    /// Camera video and microphone audio.
    Camera,

    /// Screen sharing.
    ScreenSharing,
}

impl fmt::Display for SlotPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Camera => write!(f, "camera"),
            Self::ScreenSharing => write!(f, "screen sharing"),
        }
    }
}

/// Holder of at most one audio and one video track of a participant.
pub struct TrackSlot {
    participant_id: ParticipantId,
    purpose: SlotPurpose,
    audio: ObservableCell<Option<TrackHandle>>,
    video: ObservableCell<Option<TrackHandle>>,
}

impl TrackSlot {
    pub fn new(
        participant_id: ParticipantId,
        purpose: SlotPurpose,
    ) -> Rc<Self> {
        Rc::new(Self {
            participant_id,
            purpose,
            audio: ObservableCell::new(None),
            video: ObservableCell::new(None),
        })
    }

    pub fn participant_id(&self) -> &ParticipantId {
        &self.participant_id
    }

    pub fn purpose(&self) -> SlotPurpose {
        self.purpose
    }

    pub fn audio_track(&self) -> Option<TrackHandle> {
        self.audio.get()
    }

    pub fn video_track(&self) -> Option<TrackHandle> {
        self.video.get()
    }

    pub fn set_audio_track(&self, track: Option<TrackHandle>) {
        log::debug!(
            "[{}] {} audio track set to {:?}",
            self.participant_id,
            self.purpose,
            track,
        );
        self.audio.set(track);
    }

    pub fn set_video_track(&self, track: Option<TrackHandle>) {
        log::debug!(
            "[{}] {} video track set to {:?}",
            self.participant_id,
            self.purpose,
            track,
        );
        self.video.set(track);
    }

    /// Indicates whether the provided track is held by this [`TrackSlot`].
    pub fn contains(&self, track: &TrackHandle) -> bool {
        self.audio.borrow().as_ref() == Some(track)
            || self.video.borrow().as_ref() == Some(track)
    }

    pub fn is_empty(&self) -> bool {
        self.audio.borrow().is_none() && self.video.borrow().is_none()
    }

    /// Returns [`Stream`] of audio track changes, starting with the current
    /// one.
    ///
    /// [`Stream`]: futures::Stream
    pub fn on_audio_track_change(
        &self,
    ) -> LocalBoxStream<'static, Option<TrackHandle>> {
        self.audio.subscribe()
    }

    /// Returns [`Stream`] of video track changes, starting with the current
    /// one.
    ///
    /// [`Stream`]: futures::Stream
    pub fn on_video_track_change(
        &self,
    ) -> LocalBoxStream<'static, Option<TrackHandle>> {
        self.video.subscribe()
    }
}

impl fmt::Debug for TrackSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackSlot")
            .field("participant_id", &self.participant_id)
            .field("purpose", &self.purpose)
            .field("audio", &*self.audio.borrow())
            .field("video", &*self.video.borrow())
            .finish()
    }
}
