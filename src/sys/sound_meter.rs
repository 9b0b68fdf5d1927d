use std::rc::Rc;

use thiserror::Error;

use super::MediaStreamHandle;

/// Failure of a single [`SoundMeter::volume`] measurement.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("sound meter failed: {0}")]
pub struct MeterError(pub String);

/// Audio level meter attached to a single [`MediaStreamHandle`].
pub trait SoundMeter {
    /// Measures current volume of every audio channel.
    fn volume(&self) -> Result<Vec<f32>, MeterError>;

    /// Detaches this meter from its stream.
    fn stop(&self);
}

/// Creates [`SoundMeter`]s for media streams.
pub trait SoundMeterFactory {
    fn create(&self, stream: &MediaStreamHandle) -> Rc<dyn SoundMeter>;
}
