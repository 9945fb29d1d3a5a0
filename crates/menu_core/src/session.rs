//! Lifecycle of one open video menu.
//!
//! A session is driven from a single owner (UI loop or task). Remote calls run
//! on the tokio runtime and their results come back through a channel that
//! only the owner drains, via [`MenuSession::pump`],
//! [`MenuSession::process_next`] or [`MenuSession::run_until_idle`]. Session
//! state is therefore never touched from two places at once.

use std::sync::Arc;

use anyhow::anyhow;
use shared::domain::{ChannelId, FeatureFlags, PlaylistMembership, Subject, VideoId};
use tokio::{
    runtime::Handle,
    sync::mpsc::{self, UnboundedReceiver},
};
use tracing::{debug, info, warn};

use crate::{
    auth_gate::{AuthGate, AuthOutcome},
    config::MenuSettings,
    error::MenuError,
    gateway::RemoteStateGateway,
    options::{MenuAction, MenuEntry, MenuOptionBuilder},
    renderer::{Notice, Renderer},
    slots::{ActionSlotRegistry, Completed, SlotName},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    AuthPending,
    Fetching,
    Built,
    Closed,
}

enum SlotOutput {
    Auth(AuthOutcome),
    Playlists(anyhow::Result<Vec<PlaylistMembership>>),
    Mutation(anyhow::Result<()>),
}

struct Tagged {
    generation: u64,
    output: SlotOutput,
}

/// Report for one completion handed back to the owner.
#[derive(Debug)]
pub struct Settled {
    pub slot: SlotName,
    pub generation: u64,
    /// `Err(MenuError::Cancelled)` when the completion was stale and dropped.
    pub result: Result<(), MenuError>,
}

impl Settled {
    pub fn was_discarded(&self) -> bool {
        matches!(&self.result, Err(err) if err.is_cancellation())
    }
}

pub struct MenuSession {
    gateway: Arc<dyn RemoteStateGateway>,
    renderer: Arc<dyn Renderer>,
    settings: MenuSettings,
    auth_gate: AuthGate,
    slots: ActionSlotRegistry<Tagged>,
    completions: UnboundedReceiver<Completed<Tagged>>,
    generation: u64,
    state: SessionState,
    subject: Option<Subject>,
    flags: FeatureFlags,
    entries: Vec<MenuEntry>,
    deferred_subscribe_notice: Option<Notice>,
}

impl MenuSession {
    pub fn new(
        runtime: Handle,
        gateway: Arc<dyn RemoteStateGateway>,
        renderer: Arc<dyn Renderer>,
        settings: MenuSettings,
    ) -> Self {
        let (tx, completions) = mpsc::unbounded_channel();
        Self {
            auth_gate: AuthGate::new(Arc::clone(&gateway)),
            gateway,
            renderer,
            settings,
            slots: ActionSlotRegistry::new(runtime, tx),
            completions,
            generation: 0,
            state: SessionState::Idle,
            subject: None,
            flags: FeatureFlags::default(),
            entries: Vec::new(),
            deferred_subscribe_notice: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn subject(&self) -> Option<&Subject> {
        self.subject.as_ref()
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    pub fn live_operations(&self) -> usize {
        self.slots.live_count()
    }

    pub fn is_slot_live(&self, slot: SlotName) -> bool {
        self.slots.is_live(slot)
    }

    pub fn is_open(&self) -> bool {
        matches!(
            self.state,
            SessionState::AuthPending | SessionState::Fetching | SessionState::Built
        )
    }

    /// Opens the full menu with every optional button enabled.
    pub fn show_menu(&mut self, subject: Option<Subject>) -> bool {
        self.open(subject, FeatureFlags::all())
    }

    /// Opens the playlist checklist without optional buttons.
    pub fn show_short_menu(&mut self, subject: Option<Subject>) -> bool {
        self.open(subject, FeatureFlags::short())
    }

    /// Starts a new menu, closing any menu this session still has open.
    ///
    /// Subjects that are missing, not playable or without a video id leave the
    /// session closed without any remote call. Returns whether a menu started.
    pub fn open(&mut self, subject: Option<Subject>, flags: FeatureFlags) -> bool {
        self.teardown(true);

        let Some(subject) = subject.filter(|s| s.is_playable && s.id.is_some()) else {
            debug!(generation = self.generation, "menu: nothing to open");
            self.state = SessionState::Closed;
            return false;
        };

        info!(
            generation = self.generation,
            subject = ?subject.id,
            "menu: opening"
        );
        self.subject = Some(subject);
        self.flags = flags;
        self.state = SessionState::AuthPending;

        let generation = self.generation;
        self.auth_gate.check(&mut self.slots, move |outcome| Tagged {
            generation,
            output: SlotOutput::Auth(outcome),
        });
        true
    }

    /// Closes the menu after the user dismissed it. Cancels every slot.
    pub fn close(&mut self) -> bool {
        self.teardown(false)
    }

    /// Sets the checked state of a checklist entry and issues the matching
    /// playlist edit. Any edit still in flight is superseded, including one for
    /// a different playlist.
    pub fn toggle(&mut self, index: usize, checked: bool) -> Result<(), MenuError> {
        self.ensure_built()?;
        let video_id = self.subject_video_id()?;

        let entry = self
            .entries
            .get_mut(index)
            .ok_or(MenuError::NoSuchEntry(index))?;
        let MenuEntry::Checklist {
            checked: shown,
            playlist_id,
            ..
        } = entry
        else {
            return Err(MenuError::WrongEntryKind {
                index,
                expected: "checklist",
            });
        };
        *shown = checked;
        let playlist_id = playlist_id.clone();

        debug!(
            generation = self.generation,
            playlist = %playlist_id,
            checked,
            "menu: playlist toggled"
        );

        let gateway = Arc::clone(&self.gateway);
        let generation = self.generation;
        self.slots.claim(SlotName::PlaylistEdit, async move {
            let result = if checked {
                gateway.add_to_playlist(&playlist_id, &video_id).await
            } else {
                gateway.remove_from_playlist(&playlist_id, &video_id).await
            };
            Tagged {
                generation,
                output: SlotOutput::Mutation(result),
            }
        });
        Ok(())
    }

    /// Runs the action behind a button entry.
    pub fn activate(&mut self, index: usize) -> Result<(), MenuError> {
        self.ensure_built()?;

        let action = match self.entries.get(index) {
            Some(MenuEntry::Button { action, .. }) => action.clone(),
            Some(MenuEntry::Checklist { .. }) => {
                return Err(MenuError::WrongEntryKind {
                    index,
                    expected: "button",
                })
            }
            None => return Err(MenuError::NoSuchEntry(index)),
        };

        match action {
            MenuAction::OpenChannel { channel_id } => self.renderer.open_channel(&channel_id),
            MenuAction::Subscribe {
                channel_id,
                subscribed,
            } => self.toggle_subscription(channel_id, subscribed),
            MenuAction::NotInterested => self.mark_not_interested(),
            MenuAction::Share { video_id } => self.renderer.share_video(&video_id),
        }
        Ok(())
    }

    /// Applies every completion that has already arrived.
    pub fn pump(&mut self) -> Vec<Settled> {
        let mut settled = Vec::new();
        while let Ok(completed) = self.completions.try_recv() {
            settled.push(self.apply(completed));
        }
        settled
    }

    /// Waits for and applies the next completion. Returns `None` once nothing
    /// is in flight and nothing is queued.
    pub async fn process_next(&mut self) -> Option<Settled> {
        if let Ok(completed) = self.completions.try_recv() {
            return Some(self.apply(completed));
        }
        if self.slots.live_count() == 0 {
            return None;
        }
        let completed = self.completions.recv().await?;
        Some(self.apply(completed))
    }

    pub async fn run_until_idle(&mut self) -> Vec<Settled> {
        let mut settled = Vec::new();
        while let Some(next) = self.process_next().await {
            settled.push(next);
        }
        settled
    }

    fn ensure_built(&self) -> Result<(), MenuError> {
        if self.state == SessionState::Built {
            Ok(())
        } else {
            Err(MenuError::NotBuilt(self.state))
        }
    }

    fn subject_video_id(&self) -> Result<VideoId, MenuError> {
        self.subject
            .as_ref()
            .and_then(|subject| subject.id.clone())
            .ok_or(MenuError::NotBuilt(self.state))
    }

    fn toggle_subscription(&mut self, channel_id: ChannelId, subscribed: bool) {
        let notice = if subscribed {
            Notice::UnsubscribedFromChannel
        } else {
            Notice::SubscribedToChannel
        };

        let gateway = Arc::clone(&self.gateway);
        let generation = self.generation;
        debug!(generation, channel = %channel_id, subscribed, "menu: subscription requested");
        self.slots.claim(SlotName::Subscribe, async move {
            let result = if subscribed {
                gateway.unsubscribe(&channel_id).await
            } else {
                gateway.subscribe(&channel_id).await
            };
            Tagged {
                generation,
                output: SlotOutput::Mutation(result),
            }
        });

        if self.settings.optimistic_subscribe_notice {
            self.renderer.notify(notice);
        } else {
            self.deferred_subscribe_notice = Some(notice);
        }
    }

    fn mark_not_interested(&mut self) {
        let Some(subject) = self.subject.clone() else {
            return;
        };
        if subject.feedback_token.is_none() {
            return;
        }

        let gateway = Arc::clone(&self.gateway);
        let generation = self.generation;
        self.slots.claim(SlotName::NotInterested, async move {
            Tagged {
                generation,
                output: SlotOutput::Mutation(gateway.mark_not_interested(&subject).await),
            }
        });
    }

    fn start_fetch(&mut self) {
        let Some(video_id) = self.subject.as_ref().and_then(|s| s.id.clone()) else {
            return;
        };
        self.state = SessionState::Fetching;

        let gateway = Arc::clone(&self.gateway);
        let generation = self.generation;
        self.slots.claim(SlotName::PlaylistFetch, async move {
            Tagged {
                generation,
                output: SlotOutput::Playlists(gateway.fetch_playlist_info(&video_id).await),
            }
        });
    }

    fn apply(&mut self, completed: Completed<Tagged>) -> Settled {
        let slot = completed.ticket.slot;
        // A panicked occupant carries no tag; its ticket alone decides.
        let generation = match &completed.output {
            Ok(tagged) => tagged.generation,
            Err(_) => self.generation,
        };

        if generation != self.generation {
            debug!(
                slot = %slot,
                generation,
                current = self.generation,
                "menu: dropping completion from closed menu"
            );
            return Settled {
                slot,
                generation,
                result: Err(MenuError::Cancelled(slot)),
            };
        }

        let Some(output) = self.slots.settle(completed) else {
            debug!(slot = %slot, generation, "menu: dropping superseded completion");
            return Settled {
                slot,
                generation,
                result: Err(MenuError::Cancelled(slot)),
            };
        };

        let output = match output {
            Ok(tagged) => tagged.output,
            Err(message) => {
                warn!(slot = %slot, generation, "menu: operation panicked: {message}");
                Self::failed_output(slot, message)
            }
        };
        let result = match output {
            SlotOutput::Auth(outcome) => self.on_auth(outcome),
            SlotOutput::Playlists(result) => self.on_playlists(result),
            SlotOutput::Mutation(result) => self.on_mutation(slot, result),
        };
        Settled {
            slot,
            generation,
            result,
        }
    }

    fn failed_output(slot: SlotName, message: String) -> SlotOutput {
        match slot {
            SlotName::AuthCheck => SlotOutput::Auth(AuthOutcome::Unauthorized),
            SlotName::PlaylistFetch => SlotOutput::Playlists(Err(anyhow!(message))),
            SlotName::PlaylistEdit | SlotName::NotInterested | SlotName::Subscribe => {
                SlotOutput::Mutation(Err(anyhow!(message)))
            }
        }
    }

    fn on_auth(&mut self, outcome: AuthOutcome) -> Result<(), MenuError> {
        match outcome {
            AuthOutcome::Authorized => {
                self.start_fetch();
                Ok(())
            }
            AuthOutcome::Unauthorized => {
                info!(generation = self.generation, "menu: signed-in users only");
                self.renderer.notify(Notice::SignedUsersOnly);
                self.teardown(false);
                Err(MenuError::AuthorizationDenied)
            }
        }
    }

    fn on_playlists(
        &mut self,
        result: anyhow::Result<Vec<PlaylistMembership>>,
    ) -> Result<(), MenuError> {
        let playlists = match result {
            Ok(playlists) => playlists,
            Err(err) => {
                warn!(generation = self.generation, "menu: playlist fetch failed: {err:#}");
                if self.settings.notify_on_fetch_failure {
                    self.renderer.notify(Notice::PlaylistsUnavailable);
                }
                self.teardown(false);
                return Err(MenuError::FetchFailed(err));
            }
        };

        let Some(subject) = self.subject.as_ref() else {
            return Err(MenuError::NotBuilt(self.state));
        };
        self.entries = MenuOptionBuilder::new(&self.settings.labels).build(
            subject,
            &playlists,
            &self.flags,
        );
        self.state = SessionState::Built;
        info!(
            generation = self.generation,
            entries = self.entries.len(),
            "menu: built"
        );
        self.renderer.render(
            &subject.title,
            &self.settings.labels.add_to_playlist,
            &self.entries,
        );
        Ok(())
    }

    fn on_mutation(&mut self, slot: SlotName, result: anyhow::Result<()>) -> Result<(), MenuError> {
        match result {
            Ok(()) => {
                debug!(slot = %slot, "menu: mutation finished");
                match slot {
                    SlotName::NotInterested => self.renderer.notify(Notice::WontSeeThisVideo),
                    SlotName::Subscribe => {
                        if let Some(notice) = self.deferred_subscribe_notice.take() {
                            self.renderer.notify(notice);
                        }
                    }
                    _ => {}
                }
                Ok(())
            }
            Err(err) => {
                // Mutation failures stay invisible to the user.
                debug!(slot = %slot, "menu: mutation failed: {err:#}");
                if slot == SlotName::Subscribe {
                    self.deferred_subscribe_notice = None;
                }
                Err(MenuError::MutationFailed { slot, source: err })
            }
        }
    }

    /// The only place slots are cancelled.
    fn teardown(&mut self, dismiss_view: bool) -> bool {
        if !self.is_open() {
            return false;
        }

        let was_built = self.state == SessionState::Built;
        let cancelled = self.slots.cancel_all();
        info!(generation = self.generation, cancelled, "menu: closed");

        self.generation += 1;
        self.state = SessionState::Closed;
        self.subject = None;
        self.entries.clear();
        self.deferred_subscribe_notice = None;

        if dismiss_view && was_built {
            self.renderer.dismiss();
        }
        true
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
