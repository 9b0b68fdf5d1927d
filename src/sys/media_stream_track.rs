//! Track objects of the underlying RTC library.

use std::{fmt, ops::Deref, rc::Rc};

use super::MediaStreamHandle;

/// Media kind of a [`MediaTrack`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackKind {
    Audio,
    Video,
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Audio => write!(f, "audio"),
            Self::Video => write!(f, "video"),
        }
    }
}

/// Video type reported by the RTC library for a video [`MediaTrack`].
///
/// Comes from signaling, so it may first be reported as [`VideoType::Camera`]
/// and switch to [`VideoType::Desktop`] a few moments later.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VideoType {
    /// Regular camera capture.
    Camera,

    /// Screen sharing.
    Desktop,
}

/// Track object of the RTC library, consumed as is.
pub trait MediaTrack {
    /// Returns library-assigned ID of this track.
    fn id(&self) -> String;

    /// Returns [`TrackKind`] of this track, or [`None`] if it is neither audio
    /// nor video.
    fn kind(&self) -> Option<TrackKind>;

    /// Returns current [`VideoType`] of this track.
    ///
    /// [`None`] for audio tracks.
    fn video_type(&self) -> Option<VideoType>;

    /// Returns the stream this track was received in.
    fn original_stream(&self) -> MediaStreamHandle;

    /// Releases all resources of this track.
    fn dispose(&self);
}

/// Shared handle to a [`MediaTrack`].
///
/// Two handles are equal only if they point to the same track object.
#[derive(Clone)]
pub struct TrackHandle(Rc<dyn MediaTrack>);

impl TrackHandle {
    pub fn new<T: MediaTrack + 'static>(track: T) -> Self {
        Self(Rc::new(track))
    }

    pub fn is_video_type(&self, video_type: VideoType) -> bool {
        self.0.video_type() == Some(video_type)
    }
}

impl From<Rc<dyn MediaTrack>> for TrackHandle {
    fn from(track: Rc<dyn MediaTrack>) -> Self {
        Self(track)
    }
}

impl Deref for TrackHandle {
    type Target = dyn MediaTrack;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

impl PartialEq for TrackHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::as_ptr(&self.0) as *const () == Rc::as_ptr(&other.0) as *const ()
    }
}

impl Eq for TrackHandle {}

impl fmt::Debug for TrackHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackHandle")
            .field("id", &self.0.id())
            .field("kind", &self.0.kind())
            .finish()
    }
}
