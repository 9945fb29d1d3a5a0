use shared::domain::{ChannelId, VideoId};

use crate::options::MenuEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notice {
    SignedUsersOnly,
    SubscribedToChannel,
    UnsubscribedFromChannel,
    WontSeeThisVideo,
    PlaylistsUnavailable,
}

/// View side of the menu. Called on the session owner's thread only.
pub trait Renderer {
    /// Checklist entries lead `entries` and are grouped under `playlist_heading`.
    fn render(&self, title: &str, playlist_heading: &str, entries: &[MenuEntry]);
    fn notify(&self, notice: Notice);
    /// The session closed for a reason other than the user dismissing the view.
    fn dismiss(&self);
    fn open_channel(&self, channel_id: &ChannelId);
    fn share_video(&self, video_id: &VideoId);
}
