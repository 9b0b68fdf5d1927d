//! Per-participant facade over the camera and screen sharing tracks.

use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use futures::{stream::LocalBoxStream, StreamExt as _};
use medea_reactive::ObservableCell;
use thiserror::Error;
use tokio::time::sleep;

use crate::{
    component::{AudioSource, SlotPurpose, TrackSlot, VolumeStore},
    config::{Config, Context},
    proto::{ParticipantId, SpaceUser},
    sys::{
        HighlightedEmbed, MediaStreamHandle, TrackHandle, TrackKind, VideoType,
    },
    utils::{spawn_abortable, TaskHandle},
};

/// Errors of installing a track into a [`TrackWrapper`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TrackWrapperError {
    /// Target slot is occupied and overriding it is not allowed.
    #[error("{slot} {kind} track is already defined")]
    SlotOccupied { slot: SlotPurpose, kind: TrackKind },

    #[error("track {0} is neither audio nor video")]
    Unclassifiable(String),
}

/// Pending video type re-check of a camera track.
struct Recheck {
    track: TrackHandle,
    _task: TaskHandle,
}

/// Tracks of a single call participant.
pub struct TrackWrapper {
    participant_id: ParticipantId,
    camera: Rc<TrackSlot>,
    screen_sharing: Rc<TrackSlot>,
    audio_source: Rc<ObservableCell<Option<AudioSource>>>,
    volume: VolumeStore,
    space_user: RefCell<Option<SpaceUser>>,
    recheck: RefCell<Option<Recheck>>,
    config: Config,
    ctx: Context,
}

impl TrackWrapper {
    /// Creates a new [`TrackWrapper`] holding the provided first track.
    pub fn new(
        participant_id: ParticipantId,
        track: TrackHandle,
        config: Config,
        ctx: Context,
    ) -> Result<Rc<Self>, TrackWrapperError> {
        let audio_source = Rc::new(ObservableCell::new(None));
        let volume = VolumeStore::new(
            Rc::clone(&audio_source),
            Rc::clone(&ctx.meter_factory),
            config.volume_poll_interval,
        );
        let this = Rc::new(Self {
            camera: TrackSlot::new(participant_id.clone(), SlotPurpose::Camera),
            screen_sharing: TrackSlot::new(
                participant_id.clone(),
                SlotPurpose::ScreenSharing,
            ),
            participant_id,
            audio_source,
            volume,
            space_user: RefCell::new(None),
            recheck: RefCell::new(None),
            config,
            ctx,
        });
        this.set_track(track, false)?;

        Ok(this)
    }

    pub fn participant_id(&self) -> &ParticipantId {
        &self.participant_id
    }

    /// Returns ID identifying this [`TrackWrapper`] among the streamables.
    pub fn unique_id(&self) -> &str {
        &self.participant_id.0
    }

    pub fn camera(&self) -> &Rc<TrackSlot> {
        &self.camera
    }

    pub fn screen_sharing(&self) -> &Rc<TrackSlot> {
        &self.screen_sharing
    }

    pub fn volume(&self) -> &VolumeStore {
        &self.volume
    }

    /// Returns the currently published audio stream.
    pub fn audio_stream(&self) -> Option<MediaStreamHandle> {
        self.audio_source.borrow().as_ref().map(|s| s.stream.clone())
    }

    pub fn on_audio_stream_change(
        &self,
    ) -> LocalBoxStream<'static, Option<MediaStreamHandle>> {
        self.audio_source
            .subscribe()
            .map(|source| source.map(|s| s.stream))
            .boxed_local()
    }

    pub fn space_user(&self) -> Option<SpaceUser> {
        self.space_user.borrow().clone()
    }

    pub fn set_space_user(&self, user: Option<SpaceUser>) {
        *self.space_user.borrow_mut() = user;
    }

    /// Indicates whether the camera video track still waits for its video
    /// type to be re-checked.
    pub fn has_pending_recheck(&self) -> bool {
        self.recheck.borrow().as_ref().map_or(false, |recheck| {
            self.camera.video_track().as_ref() == Some(&recheck.track)
        })
    }

    /// Installs the provided track into the slot it belongs to.
    ///
    /// Tracks already held by this [`TrackWrapper`] are ignored, since the
    /// RTC library may announce the same track several times.
    ///
    /// # Errors
    ///
    /// With [`TrackWrapperError::SlotOccupied`] if the target slot already
    /// holds a track and `allow_override` is `false`.
    ///
    /// With [`TrackWrapperError::Unclassifiable`] if the track is neither
    /// audio nor video.
    pub fn set_track(
        self: &Rc<Self>,
        track: TrackHandle,
        allow_override: bool,
    ) -> Result<(), TrackWrapperError> {
        if self.camera.contains(&track) || self.screen_sharing.contains(&track)
        {
            log::debug!(
                "[{}] Track {} is already set",
                self.participant_id,
                track.id(),
            );
            return Ok(());
        }

        match track.kind() {
            Some(TrackKind::Audio) => {
                self.set_audio_track(track, allow_override)
            }
            Some(TrackKind::Video) => {
                self.set_video_track(track, allow_override)
            }
            None => Err(TrackWrapperError::Unclassifiable(track.id())),
        }
    }

    fn set_audio_track(
        &self,
        track: TrackHandle,
        allow_override: bool,
    ) -> Result<(), TrackWrapperError> {
        if let Some(old) = self.camera.audio_track() {
            if !allow_override {
                return Err(TrackWrapperError::SlotOccupied {
                    slot: SlotPurpose::Camera,
                    kind: TrackKind::Audio,
                });
            }
            old.dispose();
        }
        let stream = track.original_stream();
        self.camera.set_audio_track(Some(track.clone()));
        self.audio_source.set(Some(AudioSource { track, stream }));

        Ok(())
    }

    fn set_video_track(
        self: &Rc<Self>,
        track: TrackHandle,
        allow_override: bool,
    ) -> Result<(), TrackWrapperError> {
        if track.is_video_type(VideoType::Desktop) {
            self.take_screen_sharing_video(allow_override)?;
            self.screen_sharing.set_video_track(Some(track));
            self.highlight_screen_sharing();
            return Ok(());
        }

        if let Some(old) = self.camera.video_track() {
            if !allow_override {
                // The video type comes from signaling and may still read
                // "camera" for a screen share, so a second video track is
                // treated as one.
                if self.screen_sharing.video_track().is_some() {
                    return Err(TrackWrapperError::SlotOccupied {
                        slot: SlotPurpose::Camera,
                        kind: TrackKind::Video,
                    });
                }
                self.screen_sharing.set_video_track(Some(track));
                self.highlight_screen_sharing();
                return Ok(());
            }
            old.dispose();
        }
        self.camera.set_video_track(Some(track.clone()));
        self.schedule_recheck(track, allow_override);

        Ok(())
    }

    /// Makes room in the screen sharing video slot, disposing its occupant if
    /// `allow_override` is set.
    fn take_screen_sharing_video(
        &self,
        allow_override: bool,
    ) -> Result<(), TrackWrapperError> {
        if let Some(old) = self.screen_sharing.video_track() {
            if !allow_override {
                return Err(TrackWrapperError::SlotOccupied {
                    slot: SlotPurpose::ScreenSharing,
                    kind: TrackKind::Video,
                });
            }
            old.dispose();
        }
        Ok(())
    }

    /// Schedules the check moving the provided camera track to the screen
    /// sharing slot if its video type turns into [`VideoType::Desktop`].
    ///
    /// Replaces any previously scheduled check.
    fn schedule_recheck(
        self: &Rc<Self>,
        track: TrackHandle,
        allow_override: bool,
    ) {
        let weak_this = Rc::downgrade(self);
        let delay = self.config.recheck_delay;
        let task = spawn_abortable({
            let track = track.clone();
            async move {
                sleep(delay).await;
                Self::recheck_video_type(&weak_this, &track, allow_override);
            }
        });
        *self.recheck.borrow_mut() = Some(Recheck { track, _task: task });
    }

    fn recheck_video_type(
        this: &Weak<Self>,
        track: &TrackHandle,
        allow_override: bool,
    ) {
        let this = match this.upgrade() {
            Some(this) => this,
            None => return,
        };
        this.recheck.borrow_mut().take();

        if this.camera.video_track().as_ref() != Some(track)
            || !track.is_video_type(VideoType::Desktop)
        {
            return;
        }
        if let Err(e) = this.take_screen_sharing_video(allow_override) {
            log::error!(
                "[{}] Cannot move track {} to screen sharing: {}",
                this.participant_id,
                track.id(),
                e,
            );
            return;
        }

        log::info!(
            "[{}] Switching camera track {} to screen sharing",
            this.participant_id,
            track.id(),
        );
        this.screen_sharing.set_video_track(Some(track.clone()));
        this.camera.set_video_track(None);
        this.highlight_screen_sharing();
    }

    fn highlight_screen_sharing(&self) {
        self.ctx.highlighter.highlight(HighlightedEmbed::Streamable(
            Rc::clone(&self.screen_sharing),
        ));
    }

    pub fn mute_audio(&self) {
        self.camera.set_audio_track(None);
        self.audio_source.set(None);
    }

    pub fn mute_video(&self) {
        self.recheck.borrow_mut().take();
        self.camera.set_video_track(None);
    }

    pub fn mute_screen_sharing(&self) {
        self.screen_sharing.set_video_track(None);
    }

    /// Clears all the tracks of this [`TrackWrapper`] and detaches it from its
    /// [`SpaceUser`].
    pub fn unsubscribe(&self) {
        self.recheck.borrow_mut().take();
        self.camera.set_video_track(None);
        self.camera.set_audio_track(None);
        self.screen_sharing.set_video_track(None);
        self.screen_sharing.set_audio_track(None);
        self.audio_source.set(None);
        self.space_user.borrow_mut().take();
    }

    pub fn is_empty(&self) -> bool {
        self.camera.is_empty() && self.screen_sharing.is_empty()
    }
}
