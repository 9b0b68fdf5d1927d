use std::{
    cell::Cell,
    rc::Rc,
    time::{Duration, Instant},
};

use futures::{channel::mpsc, StreamExt as _};
use tokio::{task, task::spawn_local, time::sleep};
use track_wrapper::{
    proto::{Event, ParticipantId},
    sys::{
        EmbedHighlighter, HighlightedEmbed, MediaStream, MediaStreamHandle,
        MediaTrack, MeterError, SoundMeter, SoundMeterFactory, TrackHandle,
        TrackKind, VideoType,
    },
    Config, Context, Room,
};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("debug"),
    )
    .init();

    task::LocalSet::new()
        .run_until(async {
            let ctx = Context::new(
                Rc::new(SineMeterFactory),
                Rc::new(LogHighlighter),
            );
            let room = Room::new(Config::default(), ctx);
            let (events_tx, events_rx) = mpsc::unbounded();
            Rc::clone(&room).spawn_event_loop(events_rx);

            let participant = ParticipantId::from("p1");
            let stream = MediaStreamHandle::new(DemoStream {
                id: "p1-stream".to_string(),
                audio_tracks: 1,
            });
            let mic = DemoTrack::audio("p1-audio", stream.clone());
            let camera = DemoTrack::video(
                "p1-camera",
                VideoType::Camera,
                stream.clone(),
            );
            // announced as a camera, revised to desktop two seconds later
            let screen =
                DemoTrack::video("p1-screen", VideoType::Camera, stream);

            for track in [&mic, &camera] {
                events_tx
                    .unbounded_send(Event::TrackAdded {
                        participant_id: participant.clone(),
                        track: track.handle(),
                    })
                    .unwrap();
            }
            sleep(Duration::from_millis(10)).await;

            let wrapper = room.participant(&participant).unwrap();
            let mut volume = wrapper.volume().subscribe();
            spawn_local(async move {
                while let Some(reading) = volume.next().await {
                    println!("Volume: {:?}", reading);
                }
            });

            sleep(Duration::from_secs(6)).await;
            events_tx
                .unbounded_send(Event::TrackAdded {
                    participant_id: participant.clone(),
                    track: screen.handle(),
                })
                .unwrap();
            spawn_local({
                let screen = Rc::clone(&screen);
                async move {
                    sleep(Duration::from_secs(2)).await;
                    screen.video_type.set(Some(VideoType::Desktop));
                }
            });

            sleep(Duration::from_secs(6)).await;
            println!(
                "Camera: {:?}, screen sharing: {:?}",
                wrapper.camera().video_track(),
                wrapper.screen_sharing().video_track(),
            );

            events_tx
                .unbounded_send(Event::TrackMuteChanged {
                    participant_id: participant.clone(),
                    track: mic.handle(),
                    muted: true,
                })
                .unwrap();
            sleep(Duration::from_millis(500)).await;

            events_tx
                .unbounded_send(Event::ParticipantLeft {
                    participant_id: participant,
                })
                .unwrap();
            sleep(Duration::from_millis(10)).await;
            println!(
                "Participants left in the room: {}",
                room.participants_count(),
            );
        })
        .await;
}

struct DemoStream {
    id: String,
    audio_tracks: usize,
}

impl MediaStream for DemoStream {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn audio_track_count(&self) -> usize {
        self.audio_tracks
    }
}

struct DemoTrack {
    id: String,
    kind: TrackKind,
    video_type: Cell<Option<VideoType>>,
    stream: MediaStreamHandle,
}

impl DemoTrack {
    fn audio(id: &str, stream: MediaStreamHandle) -> Rc<Self> {
        Self::new(id, TrackKind::Audio, None, stream)
    }

    fn video(
        id: &str,
        video_type: VideoType,
        stream: MediaStreamHandle,
    ) -> Rc<Self> {
        Self::new(id, TrackKind::Video, Some(video_type), stream)
    }

    fn new(
        id: &str,
        kind: TrackKind,
        video_type: Option<VideoType>,
        stream: MediaStreamHandle,
    ) -> Rc<Self> {
        Rc::new(Self {
            id: id.to_string(),
            kind,
            video_type: Cell::new(video_type),
            stream,
        })
    }

    fn handle(self: &Rc<Self>) -> TrackHandle {
        TrackHandle::from(Rc::clone(self) as Rc<dyn MediaTrack>)
    }
}

impl MediaTrack for DemoTrack {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn kind(&self) -> Option<TrackKind> {
        Some(self.kind)
    }

    fn video_type(&self) -> Option<VideoType> {
        self.video_type.get()
    }

    fn original_stream(&self) -> MediaStreamHandle {
        self.stream.clone()
    }

    fn dispose(&self) {
        println!("Track {} disposed", self.id);
    }
}

struct SineMeterFactory;

impl SoundMeterFactory for SineMeterFactory {
    fn create(&self, stream: &MediaStreamHandle) -> Rc<dyn SoundMeter> {
        println!("Sound meter created for {}", stream.id());
        Rc::new(SineMeter {
            started: Instant::now(),
            channels: stream.audio_track_count(),
        })
    }
}

struct SineMeter {
    started: Instant,
    channels: usize,
}

impl SoundMeter for SineMeter {
    fn volume(&self) -> Result<Vec<f32>, MeterError> {
        let level = self.started.elapsed().as_secs_f32().sin().abs() * 100.0;
        Ok(vec![level; self.channels])
    }

    fn stop(&self) {
        println!("Sound meter stopped");
    }
}

struct LogHighlighter;

impl EmbedHighlighter for LogHighlighter {
    fn highlight(&self, embed: HighlightedEmbed) {
        match embed {
            HighlightedEmbed::Streamable(slot) => {
                println!(
                    "Highlighting {} of {}",
                    slot.purpose(),
                    slot.participant_id(),
                );
            }
        }
    }
}
