//! Async orchestration core for a video context menu: sign-in gating, remote
//! state fetch, entry building and single-flight cancelable mutations.

pub mod auth_gate;
pub mod config;
pub mod error;
pub mod gateway;
pub mod options;
pub mod renderer;
pub mod session;
pub mod slots;

pub use auth_gate::{AuthGate, AuthOutcome};
pub use config::{MenuLabels, MenuSettings};
pub use error::MenuError;
pub use gateway::{MissingRemoteStateGateway, RemoteStateGateway};
pub use options::{MenuAction, MenuEntry, MenuOptionBuilder};
pub use renderer::{Notice, Renderer};
pub use session::{MenuSession, SessionState, Settled};
pub use slots::{ActionSlotRegistry, SlotName, Ticket};
