//! Named single-occupancy slots for cancelable async operations.
//!
//! Each slot holds at most one spawned task. Claiming an occupied slot aborts
//! the previous occupant before the new task is spawned. Finished tasks post a
//! [`Completed`] message to the owner, who hands it back to
//! [`ActionSlotRegistry::settle`]; only the current occupant's output is
//! released, so an aborted task that managed to finish anyway is dropped.
//! An occupant that panics still reports back, with the panic message as its
//! output error.

use std::{any::Any, collections::HashMap, fmt, future::Future, panic::AssertUnwindSafe};

use futures::FutureExt;
use tokio::{runtime::Handle, sync::mpsc::UnboundedSender, task::JoinHandle};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SlotName {
    PlaylistFetch,
    PlaylistEdit,
    AuthCheck,
    NotInterested,
    Subscribe,
}

impl SlotName {
    pub const ALL: [SlotName; 5] = [
        SlotName::PlaylistFetch,
        SlotName::PlaylistEdit,
        SlotName::AuthCheck,
        SlotName::NotInterested,
        SlotName::Subscribe,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SlotName::PlaylistFetch => "playlist_fetch",
            SlotName::PlaylistEdit => "playlist_edit",
            SlotName::AuthCheck => "auth_check",
            SlotName::NotInterested => "not_interested",
            SlotName::Subscribe => "subscribe",
        }
    }
}

impl fmt::Display for SlotName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies one claim of one slot. Callers may ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    pub slot: SlotName,
    seq: u64,
}

#[derive(Debug)]
pub struct Completed<T> {
    pub ticket: Ticket,
    /// `Err` carries the panic message of an occupant that did not finish.
    pub output: Result<T, String>,
}

struct Occupant {
    seq: u64,
    task: JoinHandle<()>,
}

pub struct ActionSlotRegistry<T> {
    runtime: Handle,
    completions: UnboundedSender<Completed<T>>,
    occupants: HashMap<SlotName, Occupant>,
    next_seq: u64,
}

impl<T: Send + 'static> ActionSlotRegistry<T> {
    pub fn new(runtime: Handle, completions: UnboundedSender<Completed<T>>) -> Self {
        Self {
            runtime,
            completions,
            occupants: HashMap::new(),
            next_seq: 0,
        }
    }

    /// Installs `operation` in `slot`, aborting whatever the slot held.
    pub fn claim<F>(&mut self, slot: SlotName, operation: F) -> Ticket
    where
        F: Future<Output = T> + Send + 'static,
    {
        if self.cancel(slot) {
            debug!(slot = %slot, "superseded previous occupant");
        }

        self.next_seq += 1;
        let ticket = Ticket {
            slot,
            seq: self.next_seq,
        };

        let completions = self.completions.clone();
        let task = self.runtime.spawn(async move {
            let output = AssertUnwindSafe(operation)
                .catch_unwind()
                .await
                .map_err(panic_message);
            // The owner may already be gone; nothing left to notify then.
            let _ = completions.send(Completed { ticket, output });
        });

        self.occupants.insert(
            slot,
            Occupant {
                seq: ticket.seq,
                task,
            },
        );
        ticket
    }

    /// Releases the output of a finished operation if it still owns its slot,
    /// clearing the slot. Returns `None` for superseded or cancelled claims.
    pub fn settle(&mut self, completed: Completed<T>) -> Option<Result<T, String>> {
        let Completed { ticket, output } = completed;
        match self.occupants.get(&ticket.slot) {
            Some(occupant) if occupant.seq == ticket.seq => {
                self.occupants.remove(&ticket.slot);
                Some(output)
            }
            _ => None,
        }
    }

    pub fn cancel(&mut self, slot: SlotName) -> bool {
        match self.occupants.remove(&slot) {
            Some(occupant) => {
                occupant.task.abort();
                true
            }
            None => false,
        }
    }

    /// Aborts every live occupant. Safe to call repeatedly.
    pub fn cancel_all(&mut self) -> usize {
        let cancelled = self.occupants.len();
        for (slot, occupant) in self.occupants.drain() {
            occupant.task.abort();
            debug!(slot = %slot, "cancelled");
        }
        cancelled
    }

    pub fn is_live(&self, slot: SlotName) -> bool {
        self.occupants.contains_key(&slot)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.occupants
            .get(&ticket.slot)
            .is_some_and(|occupant| occupant.seq == ticket.seq)
    }

    pub fn live_count(&self) -> usize {
        self.occupants.len()
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    match payload.downcast::<String>() {
        Ok(message) => *message,
        Err(payload) => payload
            .downcast_ref::<&str>()
            .map(|message| message.to_string())
            .unwrap_or_else(|| "operation panicked".to_string()),
    }
}

impl<T> Drop for ActionSlotRegistry<T> {
    fn drop(&mut self) {
        for (_, occupant) in self.occupants.drain() {
            occupant.task.abort();
        }
    }
}
