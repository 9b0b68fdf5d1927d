//! Volume metering of the published audio stream.

use std::{
    cell::{Cell, RefCell},
    pin::Pin,
    rc::{Rc, Weak},
    task::{Context, Poll},
    time::Duration,
};

use futures::{stream::LocalBoxStream, Stream, StreamExt as _};
use futures_signals::signal::{Mutable, SignalExt as _};
use medea_reactive::ObservableCell;
use tokio::time::{interval_at, Instant};

use crate::{
    sys::{MediaStreamHandle, SoundMeter, SoundMeterFactory, TrackHandle},
    utils::{spawn_abortable, TaskHandle},
};

/// Volume of every audio channel, or [`None`] if nothing is metered.
pub type VolumeReading = Option<Vec<f32>>;

/// Published audio stream along with the track it comes from.
///
/// Two sources differ whenever their tracks differ, so replacing a track
/// restarts metering even if the new one shares the stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AudioSource {
    pub track: TrackHandle,
    pub stream: MediaStreamHandle,
}

/// Readable volume signal derived from an audio stream.
///
/// Metering runs only while there is at least one live
/// [`VolumeSubscription`].
pub struct VolumeStore(Rc<Inner>);

struct Inner {
    reading: Mutable<VolumeReading>,
    audio_source: Rc<ObservableCell<Option<AudioSource>>>,
    meter_factory: Rc<dyn SoundMeterFactory>,
    poll_interval: Duration,
    subscribers: Cell<usize>,
    pipeline: RefCell<Option<TaskHandle>>,
    metering: RefCell<Option<Metering>>,
}

/// Meter attached to the current audio stream along with its polling task.
struct Metering {
    meter: Rc<dyn SoundMeter>,
    _poll: TaskHandle,
}

impl Drop for Metering {
    fn drop(&mut self) {
        self.meter.stop();
    }
}

impl VolumeStore {
    pub fn new(
        audio_source: Rc<ObservableCell<Option<AudioSource>>>,
        meter_factory: Rc<dyn SoundMeterFactory>,
        poll_interval: Duration,
    ) -> Self {
        Self(Rc::new(Inner {
            reading: Mutable::new(None),
            audio_source,
            meter_factory,
            poll_interval,
            subscribers: Cell::new(0),
            pipeline: RefCell::new(None),
            metering: RefCell::new(None),
        }))
    }

    /// Returns the last published [`VolumeReading`].
    pub fn get(&self) -> VolumeReading {
        self.0.reading.get_cloned()
    }

    /// Subscribes to the [`VolumeReading`] updates.
    ///
    /// The first subscription starts metering of the audio stream.
    pub fn subscribe(&self) -> VolumeSubscription {
        let stream = Box::pin(self.0.reading.signal_cloned().to_stream());
        let subscribers = self.0.subscribers.get();
        self.0.subscribers.set(subscribers + 1);
        if subscribers == 0 {
            Inner::start(&self.0);
        }

        VolumeSubscription {
            stream,
            store: Rc::downgrade(&self.0),
        }
    }

    pub fn subscribers_count(&self) -> usize {
        self.0.subscribers.get()
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.reading.set(None);
    }
}

impl Inner {
    /// Spawns the task restarting metering on every audio stream change.
    fn start(this: &Rc<Self>) {
        log::debug!("Volume metering started");
        let mut on_audio_source = this.audio_source.subscribe();
        let weak_this = Rc::downgrade(this);
        let pipeline = spawn_abortable(async move {
            while let Some(source) = on_audio_source.next().await {
                match weak_this.upgrade() {
                    Some(this) => {
                        this.restart_metering(source.map(|s| s.stream))
                    }
                    None => break,
                }
            }
        });
        *this.pipeline.borrow_mut() = Some(pipeline);
    }

    fn restart_metering(&self, stream: Option<MediaStreamHandle>) {
        let previous = self.metering.borrow_mut().take();
        drop(previous);

        match stream.filter(MediaStreamHandle::has_audio) {
            None => self.reading.set(None),
            Some(stream) => {
                log::debug!("Metering audio stream {}", stream.id());
                let meter = self.meter_factory.create(&stream);
                let poll = spawn_abortable(poll_volume(
                    Rc::clone(&meter),
                    self.poll_interval,
                    self.reading.clone(),
                ));
                *self.metering.borrow_mut() = Some(Metering {
                    meter,
                    _poll: poll,
                });
            }
        }
    }

    fn stop(&self) {
        let pipeline = self.pipeline.borrow_mut().take();
        let metering = self.metering.borrow_mut().take();
        drop(pipeline);
        drop(metering);
        self.reading.set(None);
        log::debug!("Volume metering stopped");
    }
}

/// Publishes volume of the provided [`SoundMeter`] every `period`.
///
/// Measurement errors never stop the polling, only the first one is logged.
async fn poll_volume(
    meter: Rc<dyn SoundMeter>,
    period: Duration,
    reading: Mutable<VolumeReading>,
) {
    let mut ticker = interval_at(Instant::now() + period, period);
    let mut failed = false;
    loop {
        ticker.tick().await;
        match meter.volume() {
            Ok(volume) => reading.set(Some(volume)),
            Err(e) => {
                if !failed {
                    log::error!("Failed to measure volume: {}", e);
                    failed = true;
                }
            }
        }
    }
}

/// Live subscription to a [`VolumeStore`].
///
/// Yields the current [`VolumeReading`] first and then every update. Dropping
/// the last subscription stops metering and resets the reading to [`None`].
pub struct VolumeSubscription {
    stream: LocalBoxStream<'static, VolumeReading>,
    store: Weak<Inner>,
}

impl Stream for VolumeSubscription {
    type Item = VolumeReading;

    fn poll_next(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Self::Item>> {
        self.stream.as_mut().poll_next(cx)
    }
}

impl Drop for VolumeSubscription {
    fn drop(&mut self) {
        if let Some(store) = self.store.upgrade() {
            let subscribers = store.subscribers.get().saturating_sub(1);
            store.subscribers.set(subscribers);
            if subscribers == 0 {
                store.stop();
            }
        }
    }
}
