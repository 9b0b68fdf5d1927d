use std::{cell::RefCell, rc::Rc};

use futures::{stream::LocalBoxStream, Stream, StreamExt as _};
use medea_reactive::ObservableHashMap;
use thiserror::Error;
use tokio::task::spawn_local;

use crate::{
    component::{TrackWrapper, TrackWrapperError},
    config::{Config, Context},
    proto::{Event, ParticipantId},
    sys::TrackHandle,
};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RoomError {
    #[error("participant {0} is unknown")]
    UnknownParticipant(ParticipantId),

    #[error(transparent)]
    Track(#[from] TrackWrapperError),
}

/// [`TrackWrapper`]s of all the participants of a call.
pub struct Room {
    participants:
        RefCell<ObservableHashMap<ParticipantId, Rc<TrackWrapper>>>,
    config: Config,
    ctx: Context,
}

impl Room {
    pub fn new(config: Config, ctx: Context) -> Rc<Self> {
        Rc::new(Self {
            participants: RefCell::new(ObservableHashMap::new()),
            config,
            ctx,
        })
    }

    pub fn participant(&self, id: &ParticipantId) -> Option<Rc<TrackWrapper>> {
        self.participants.borrow().get(id).cloned()
    }

    pub fn participants_count(&self) -> usize {
        self.participants.borrow().iter().count()
    }

    /// Returns [`Stream`] of the [`TrackWrapper`]s created for newly seen
    /// participants.
    pub fn on_participant_added(
        &self,
    ) -> LocalBoxStream<'static, (ParticipantId, Rc<TrackWrapper>)> {
        self.participants.borrow().on_insert()
    }

    /// Returns [`Stream`] of the [`TrackWrapper`]s torn down after their
    /// participants left.
    pub fn on_participant_removed(
        &self,
    ) -> LocalBoxStream<'static, (ParticipantId, Rc<TrackWrapper>)> {
        self.participants.borrow().on_remove()
    }

    /// Applies the provided [`Event`] to the tracks of its participant.
    pub fn handle_event(&self, event: Event) -> Result<(), RoomError> {
        match event {
            Event::TrackAdded {
                participant_id,
                track,
            } => self.on_track_added(participant_id, track),
            Event::TrackMuteChanged {
                participant_id,
                track,
                muted,
            } => {
                let wrapper = self.existing(&participant_id)?;
                if muted {
                    Self::clear_track(&wrapper, &track);
                } else {
                    wrapper.set_track(track, false)?;
                }
                Ok(())
            }
            Event::TrackRemoved {
                participant_id,
                track,
            } => {
                let wrapper = self.existing(&participant_id)?;
                Self::clear_track(&wrapper, &track);
                Ok(())
            }
            Event::ParticipantLeft { participant_id } => {
                let wrapper = self
                    .participants
                    .borrow_mut()
                    .remove(&participant_id)
                    .ok_or(RoomError::UnknownParticipant(participant_id))?;
                wrapper.unsubscribe();
                log::info!("[{}] Participant left", wrapper.participant_id());
                Ok(())
            }
        }
    }

    /// Spawns the task applying every [`Event`] of the provided [`Stream`].
    pub fn spawn_event_loop<S>(self: Rc<Self>, events: S)
    where
        S: Stream<Item = Event> + 'static,
    {
        spawn_local(async move {
            let mut events = Box::pin(events);
            while let Some(event) = events.next().await {
                if let Err(e) = self.handle_event(event) {
                    log::warn!("Dropped track event: {}", e);
                }
            }
        });
    }

    fn existing(
        &self,
        id: &ParticipantId,
    ) -> Result<Rc<TrackWrapper>, RoomError> {
        self.participant(id)
            .ok_or_else(|| RoomError::UnknownParticipant(id.clone()))
    }

    fn on_track_added(
        &self,
        id: ParticipantId,
        track: TrackHandle,
    ) -> Result<(), RoomError> {
        if let Some(wrapper) = self.participant(&id) {
            wrapper.set_track(track, false)?;
            return Ok(());
        }

        let wrapper = TrackWrapper::new(
            id.clone(),
            track,
            self.config,
            self.ctx.clone(),
        )?;
        log::info!("[{}] Participant joined", id);
        self.participants.borrow_mut().insert(id, wrapper);
        Ok(())
    }

    /// Clears the slot holding the provided track.
    fn clear_track(wrapper: &TrackWrapper, track: &TrackHandle) {
        let camera = wrapper.camera();
        let screen_sharing = wrapper.screen_sharing();
        if camera.audio_track().as_ref() == Some(track) {
            wrapper.mute_audio();
        } else if camera.video_track().as_ref() == Some(track) {
            wrapper.mute_video();
        } else if screen_sharing.video_track().as_ref() == Some(track) {
            wrapper.mute_screen_sharing();
        } else {
            log::warn!(
                "[{}] Track {} is not held",
                wrapper.participant_id(),
                track.id(),
            );
        }
    }
}
