use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::domain::{ChannelId, PlaylistId, PlaylistMembership, Subject, VideoId};

/// Remote media service operations the menu reads and mutates.
///
/// Implementations own transport, timeouts and persistence.
#[async_trait]
pub trait RemoteStateGateway: Send + Sync {
    async fn fetch_playlist_info(&self, video_id: &VideoId) -> Result<Vec<PlaylistMembership>>;
    async fn is_signed_in(&self) -> Result<bool>;
    async fn add_to_playlist(&self, playlist_id: &PlaylistId, video_id: &VideoId) -> Result<()>;
    async fn remove_from_playlist(
        &self,
        playlist_id: &PlaylistId,
        video_id: &VideoId,
    ) -> Result<()>;
    async fn subscribe(&self, channel_id: &ChannelId) -> Result<()>;
    async fn unsubscribe(&self, channel_id: &ChannelId) -> Result<()>;
    /// Callers must only pass subjects that carry a feedback token.
    async fn mark_not_interested(&self, subject: &Subject) -> Result<()>;
}

/// Gateway for hosts without a media service; every call fails, so menus
/// close at the sign-in check.
pub struct MissingRemoteStateGateway;

#[async_trait]
impl RemoteStateGateway for MissingRemoteStateGateway {
    async fn fetch_playlist_info(&self, video_id: &VideoId) -> Result<Vec<PlaylistMembership>> {
        Err(anyhow!("media service unavailable for video {video_id}"))
    }

    async fn is_signed_in(&self) -> Result<bool> {
        Err(anyhow!("media service unavailable"))
    }

    async fn add_to_playlist(&self, playlist_id: &PlaylistId, _video_id: &VideoId) -> Result<()> {
        Err(anyhow!("media service unavailable for playlist {playlist_id}"))
    }

    async fn remove_from_playlist(
        &self,
        playlist_id: &PlaylistId,
        _video_id: &VideoId,
    ) -> Result<()> {
        Err(anyhow!("media service unavailable for playlist {playlist_id}"))
    }

    async fn subscribe(&self, channel_id: &ChannelId) -> Result<()> {
        Err(anyhow!("media service unavailable for channel {channel_id}"))
    }

    async fn unsubscribe(&self, channel_id: &ChannelId) -> Result<()> {
        Err(anyhow!("media service unavailable for channel {channel_id}"))
    }

    async fn mark_not_interested(&self, _subject: &Subject) -> Result<()> {
        Err(anyhow!("media service unavailable"))
    }
}
