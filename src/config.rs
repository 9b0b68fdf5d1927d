use std::{rc::Rc, time::Duration};

use crate::sys::{EmbedHighlighter, SoundMeterFactory};

/// Timings of a [`TrackWrapper`].
///
/// [`TrackWrapper`]: crate::component::TrackWrapper
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Delay after which the video type of a freshly installed camera track
    /// is checked again.
    pub recheck_delay: Duration,

    /// Period of the volume polling.
    pub volume_poll_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            recheck_delay: Duration::from_secs(5),
            volume_poll_interval: Duration::from_millis(100),
        }
    }
}

/// Services shared by all the [`TrackWrapper`]s of a room.
///
/// [`TrackWrapper`]: crate::component::TrackWrapper
#[derive(Clone)]
pub struct Context {
    pub meter_factory: Rc<dyn SoundMeterFactory>,
    pub highlighter: Rc<dyn EmbedHighlighter>,
}

impl Context {
    pub fn new(
        meter_factory: Rc<dyn SoundMeterFactory>,
        highlighter: Rc<dyn EmbedHighlighter>,
    ) -> Self {
        Self {
            meter_factory,
            highlighter,
        }
    }
}
