use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    gateway::RemoteStateGateway,
    slots::{ActionSlotRegistry, SlotName, Ticket},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    Authorized,
    Unauthorized,
}

impl AuthOutcome {
    /// A failed sign-in lookup counts as signed out.
    pub fn from_check(result: anyhow::Result<bool>) -> Self {
        match result {
            Ok(true) => AuthOutcome::Authorized,
            Ok(false) => AuthOutcome::Unauthorized,
            Err(err) => {
                warn!("auth: sign-in check failed, treating as signed out: {err:#}");
                AuthOutcome::Unauthorized
            }
        }
    }
}

pub struct AuthGate {
    gateway: Arc<dyn RemoteStateGateway>,
}

impl AuthGate {
    pub fn new(gateway: Arc<dyn RemoteStateGateway>) -> Self {
        Self { gateway }
    }

    /// Starts a sign-in check in the `auth_check` slot. A check still in flight
    /// is superseded and its outcome never delivered.
    pub fn check<T, F>(&self, slots: &mut ActionSlotRegistry<T>, wrap: F) -> Ticket
    where
        T: Send + 'static,
        F: FnOnce(AuthOutcome) -> T + Send + 'static,
    {
        let gateway = Arc::clone(&self.gateway);
        debug!("auth: checking sign-in state");
        slots.claim(SlotName::AuthCheck, async move {
            wrap(AuthOutcome::from_check(gateway.is_signed_in().await))
        })
    }
}
