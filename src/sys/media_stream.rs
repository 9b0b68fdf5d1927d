use std::{fmt, ops::Deref, rc::Rc};

/// Media stream of the RTC library a [`MediaTrack`] belongs to.
///
/// [`MediaTrack`]: super::MediaTrack
pub trait MediaStream {
    fn id(&self) -> String;

    /// Returns number of audio tracks in this stream.
    fn audio_track_count(&self) -> usize;
}

/// Shared handle to a [`MediaStream`], compared by identity.
#[derive(Clone)]
pub struct MediaStreamHandle(Rc<dyn MediaStream>);

impl MediaStreamHandle {
    pub fn new<S: MediaStream + 'static>(stream: S) -> Self {
        Self(Rc::new(stream))
    }

    pub fn has_audio(&self) -> bool {
        self.0.audio_track_count() > 0
    }
}

impl From<Rc<dyn MediaStream>> for MediaStreamHandle {
    fn from(stream: Rc<dyn MediaStream>) -> Self {
        Self(stream)
    }
}

impl Deref for MediaStreamHandle {
    type Target = dyn MediaStream;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

impl PartialEq for MediaStreamHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::as_ptr(&self.0) as *const () == Rc::as_ptr(&other.0) as *const ()
    }
}

impl Eq for MediaStreamHandle {}

impl fmt::Debug for MediaStreamHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MediaStreamHandle").field(&self.0.id()).finish()
    }
}
