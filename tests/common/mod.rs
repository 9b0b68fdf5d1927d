#![allow(dead_code)]

use std::{
    cell::{Cell, RefCell},
    future::Future,
    rc::Rc,
    time::Duration,
};

use futures::StreamExt as _;
use tokio::{task::LocalSet, time::timeout};
use track_wrapper::{
    sys::{
        EmbedHighlighter, HighlightedEmbed, MediaStream, MediaStreamHandle,
        MediaTrack, MeterError, SoundMeter, SoundMeterFactory, TrackHandle,
        TrackKind, VideoType,
    },
    Context, VolumeReading, VolumeSubscription,
};

/// Runs the provided future on a fresh [`LocalSet`].
pub async fn local<F: Future>(fut: F) -> F::Output {
    LocalSet::new().run_until(fut).await
}

pub struct FakeStream {
    id: String,
    audio_tracks: usize,
}

impl FakeStream {
    pub fn with_audio(id: &str) -> MediaStreamHandle {
        MediaStreamHandle::new(Self {
            id: id.to_owned(),
            audio_tracks: 1,
        })
    }

    pub fn without_audio(id: &str) -> MediaStreamHandle {
        MediaStreamHandle::new(Self {
            id: id.to_owned(),
            audio_tracks: 0,
        })
    }
}

impl MediaStream for FakeStream {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn audio_track_count(&self) -> usize {
        self.audio_tracks
    }
}

pub struct FakeTrack {
    id: String,
    kind: Option<TrackKind>,
    video_type: Cell<Option<VideoType>>,
    stream: MediaStreamHandle,
    disposed: Cell<usize>,
}

impl FakeTrack {
    pub fn audio(id: &str) -> Rc<Self> {
        Self::new(
            id,
            Some(TrackKind::Audio),
            None,
            FakeStream::with_audio(&format!("{}-stream", id)),
        )
    }

    pub fn audio_in(id: &str, stream: MediaStreamHandle) -> Rc<Self> {
        Self::new(id, Some(TrackKind::Audio), None, stream)
    }

    pub fn camera(id: &str) -> Rc<Self> {
        Self::video(id, VideoType::Camera)
    }

    pub fn desktop(id: &str) -> Rc<Self> {
        Self::video(id, VideoType::Desktop)
    }

    pub fn unknown(id: &str) -> Rc<Self> {
        Self::new(id, None, None, FakeStream::without_audio(id))
    }

    fn video(id: &str, video_type: VideoType) -> Rc<Self> {
        Self::new(
            id,
            Some(TrackKind::Video),
            Some(video_type),
            FakeStream::without_audio(&format!("{}-stream", id)),
        )
    }

    fn new(
        id: &str,
        kind: Option<TrackKind>,
        video_type: Option<VideoType>,
        stream: MediaStreamHandle,
    ) -> Rc<Self> {
        Rc::new(Self {
            id: id.to_owned(),
            kind,
            video_type: Cell::new(video_type),
            stream,
            disposed: Cell::new(0),
        })
    }

    pub fn handle(self: &Rc<Self>) -> TrackHandle {
        TrackHandle::from(Rc::clone(self) as Rc<dyn MediaTrack>)
    }

    pub fn set_video_type(&self, video_type: VideoType) {
        self.video_type.set(Some(video_type));
    }

    pub fn disposed(&self) -> usize {
        self.disposed.get()
    }
}

impl MediaTrack for FakeTrack {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn kind(&self) -> Option<TrackKind> {
        self.kind
    }

    fn video_type(&self) -> Option<VideoType> {
        self.video_type.get()
    }

    fn original_stream(&self) -> MediaStreamHandle {
        self.stream.clone()
    }

    fn dispose(&self) {
        self.disposed.set(self.disposed.get() + 1);
    }
}

pub struct FakeMeter {
    volume: Rc<RefCell<Result<Vec<f32>, MeterError>>>,
    polls: Cell<usize>,
    stopped: Cell<bool>,
}

impl FakeMeter {
    pub fn polls(&self) -> usize {
        self.polls.get()
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.get()
    }
}

impl SoundMeter for FakeMeter {
    fn volume(&self) -> Result<Vec<f32>, MeterError> {
        self.polls.set(self.polls.get() + 1);
        self.volume.borrow().clone()
    }

    fn stop(&self) {
        self.stopped.set(true);
    }
}

/// [`SoundMeterFactory`] whose meters all report the same scripted volume.
pub struct FakeMeterFactory {
    volume: Rc<RefCell<Result<Vec<f32>, MeterError>>>,
    created: RefCell<Vec<Rc<FakeMeter>>>,
}

impl FakeMeterFactory {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            volume: Rc::new(RefCell::new(Ok(vec![0.5]))),
            created: RefCell::new(Vec::new()),
        })
    }

    pub fn set_volume(&self, volume: Result<Vec<f32>, MeterError>) {
        *self.volume.borrow_mut() = volume;
    }

    pub fn meters(&self) -> Vec<Rc<FakeMeter>> {
        self.created.borrow().clone()
    }
}

impl SoundMeterFactory for FakeMeterFactory {
    fn create(&self, _: &MediaStreamHandle) -> Rc<dyn SoundMeter> {
        let meter = Rc::new(FakeMeter {
            volume: Rc::clone(&self.volume),
            polls: Cell::new(0),
            stopped: Cell::new(false),
        });
        self.created.borrow_mut().push(Rc::clone(&meter));
        meter
    }
}

#[derive(Default)]
pub struct RecordingHighlighter {
    embeds: RefCell<Vec<HighlightedEmbed>>,
}

impl RecordingHighlighter {
    pub fn embeds(&self) -> Vec<HighlightedEmbed> {
        self.embeds.borrow().clone()
    }
}

impl EmbedHighlighter for RecordingHighlighter {
    fn highlight(&self, embed: HighlightedEmbed) {
        self.embeds.borrow_mut().push(embed);
    }
}

pub struct Services {
    pub ctx: Context,
    pub meters: Rc<FakeMeterFactory>,
    pub highlighter: Rc<RecordingHighlighter>,
}

pub fn services() -> Services {
    let meters = FakeMeterFactory::new();
    let highlighter = Rc::new(RecordingHighlighter::default());
    Services {
        ctx: Context::new(
            Rc::clone(&meters) as Rc<dyn SoundMeterFactory>,
            Rc::clone(&highlighter) as Rc<dyn EmbedHighlighter>,
        ),
        meters,
        highlighter,
    }
}

/// Waits for a [`VolumeReading`] satisfying the provided predicate.
pub async fn wait_for_reading<F>(
    subscription: &mut VolumeSubscription,
    pred: F,
) -> VolumeReading
where
    F: Fn(&VolumeReading) -> bool,
{
    for _ in 0..100 {
        let reading = timeout(Duration::from_secs(2), subscription.next())
            .await
            .expect("no matching volume reading in time")
            .expect("volume subscription ended");
        if pred(&reading) {
            return reading;
        }
    }
    panic!("volume reading never matched");
}
