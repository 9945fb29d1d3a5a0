//! In-process media service used as the demo's remote state gateway.

use std::{collections::BTreeSet, time::Duration};

use anyhow::Result;
use async_trait::async_trait;
use menu_core::RemoteStateGateway;
use serde::Serialize;
use shared::{
    domain::{ChannelId, PlaylistId, PlaylistMembership, Subject, VideoId},
    error::{ApiException, ErrorCode},
};
use tokio::sync::RwLock;
use tracing::info;

use crate::config::ServiceSettings;

#[derive(Debug, Clone, Serialize)]
pub struct PlaylistState {
    pub id: String,
    pub title: String,
    pub videos: BTreeSet<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ServiceSnapshot {
    pub playlists: Vec<PlaylistState>,
    pub subscriptions: BTreeSet<String>,
    pub not_interested: BTreeSet<String>,
}

pub struct SimulatedMediaService {
    latency: Duration,
    signed_in: bool,
    fail_fetch: bool,
    fail_mutations: bool,
    state: RwLock<ServiceSnapshot>,
}

impl SimulatedMediaService {
    pub fn new(settings: &ServiceSettings) -> Self {
        let playlists = settings
            .playlists
            .iter()
            .map(|seed| PlaylistState {
                id: seed.id.clone(),
                title: seed.title.clone(),
                videos: seed.videos.iter().cloned().collect(),
            })
            .collect();

        Self {
            latency: Duration::from_millis(settings.latency_ms),
            signed_in: settings.signed_in,
            fail_fetch: settings.fail_fetch,
            fail_mutations: settings.fail_mutations,
            state: RwLock::new(ServiceSnapshot {
                playlists,
                ..ServiceSnapshot::default()
            }),
        }
    }

    pub fn with_subscription(mut self, channel_id: &ChannelId) -> Self {
        self.state
            .get_mut()
            .subscriptions
            .insert(channel_id.to_string());
        self
    }

    pub async fn snapshot(&self) -> ServiceSnapshot {
        self.state.read().await.clone()
    }

    async fn round_trip(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn check_mutation(&self) -> Result<()> {
        if self.fail_mutations {
            return Err(ApiException::new(ErrorCode::Unavailable, "mutations disabled").into());
        }
        Ok(())
    }

    async fn edit_playlist(
        &self,
        playlist_id: &PlaylistId,
        video_id: &VideoId,
        add: bool,
    ) -> Result<()> {
        self.round_trip().await;
        self.check_mutation()?;

        let mut state = self.state.write().await;
        let playlist = state
            .playlists
            .iter_mut()
            .find(|playlist| playlist.id == playlist_id.as_str())
            .ok_or_else(|| {
                ApiException::new(ErrorCode::NotFound, format!("playlist {playlist_id}"))
            })?;

        if add {
            playlist.videos.insert(video_id.to_string());
        } else {
            playlist.videos.remove(video_id.as_str());
        }
        info!(playlist = %playlist_id, video = %video_id, add, "service: playlist edited");
        Ok(())
    }
}

#[async_trait]
impl RemoteStateGateway for SimulatedMediaService {
    async fn fetch_playlist_info(&self, video_id: &VideoId) -> Result<Vec<PlaylistMembership>> {
        self.round_trip().await;
        if self.fail_fetch {
            return Err(ApiException::new(ErrorCode::Unavailable, "playlist service down").into());
        }

        let state = self.state.read().await;
        Ok(state
            .playlists
            .iter()
            .map(|playlist| {
                PlaylistMembership::new(
                    playlist.id.clone(),
                    playlist.title.clone(),
                    playlist.videos.contains(video_id.as_str()),
                )
            })
            .collect())
    }

    async fn is_signed_in(&self) -> Result<bool> {
        self.round_trip().await;
        Ok(self.signed_in)
    }

    async fn add_to_playlist(&self, playlist_id: &PlaylistId, video_id: &VideoId) -> Result<()> {
        self.edit_playlist(playlist_id, video_id, true).await
    }

    async fn remove_from_playlist(
        &self,
        playlist_id: &PlaylistId,
        video_id: &VideoId,
    ) -> Result<()> {
        self.edit_playlist(playlist_id, video_id, false).await
    }

    async fn subscribe(&self, channel_id: &ChannelId) -> Result<()> {
        self.round_trip().await;
        self.check_mutation()?;
        self.state
            .write()
            .await
            .subscriptions
            .insert(channel_id.to_string());
        info!(channel = %channel_id, "service: subscribed");
        Ok(())
    }

    async fn unsubscribe(&self, channel_id: &ChannelId) -> Result<()> {
        self.round_trip().await;
        self.check_mutation()?;
        self.state
            .write()
            .await
            .subscriptions
            .remove(channel_id.as_str());
        info!(channel = %channel_id, "service: unsubscribed");
        Ok(())
    }

    async fn mark_not_interested(&self, subject: &Subject) -> Result<()> {
        self.round_trip().await;
        self.check_mutation()?;
        let Some(token) = &subject.feedback_token else {
            return Err(ApiException::new(ErrorCode::Validation, "missing feedback token").into());
        };
        self.state
            .write()
            .await
            .not_interested
            .insert(token.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlaylistSeed;

    fn service() -> SimulatedMediaService {
        SimulatedMediaService::new(&ServiceSettings {
            latency_ms: 0,
            playlists: vec![PlaylistSeed {
                id: "WL".into(),
                title: "Watch Later".into(),
                videos: vec!["v1".into()],
            }],
            ..ServiceSettings::default()
        })
    }

    #[tokio::test]
    async fn membership_reflects_playlist_edits() {
        let service = service();
        let video = VideoId::new("v2");

        let before = service.fetch_playlist_info(&video).await.expect("fetch");
        assert!(!before[0].is_member);

        service
            .add_to_playlist(&PlaylistId::new("WL"), &video)
            .await
            .expect("add");
        let after = service.fetch_playlist_info(&video).await.expect("fetch");
        assert!(after[0].is_member);

        service
            .remove_from_playlist(&PlaylistId::new("WL"), &VideoId::new("v1"))
            .await
            .expect("remove");
        let snapshot = service.snapshot().await;
        assert_eq!(
            snapshot.playlists[0].videos.iter().cloned().collect::<Vec<_>>(),
            vec!["v2".to_string()]
        );
    }

    #[tokio::test]
    async fn unknown_playlist_is_not_found() {
        let err = service()
            .add_to_playlist(&PlaylistId::new("nope"), &VideoId::new("v1"))
            .await
            .expect_err("must fail");
        let api = err.downcast::<ApiException>().expect("api exception");
        assert_eq!(api.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn not_interested_requires_feedback_token() {
        let service = service();
        assert!(service
            .mark_not_interested(&Subject::video("v1", "Clip"))
            .await
            .is_err());

        service
            .mark_not_interested(&Subject::video("v1", "Clip").with_feedback_token("t1"))
            .await
            .expect("mark");
        assert!(service.snapshot().await.not_interested.contains("t1"));
    }

    #[tokio::test]
    async fn failing_mutations_leave_state_untouched() {
        let service = SimulatedMediaService::new(&ServiceSettings {
            latency_ms: 0,
            fail_mutations: true,
            ..ServiceSettings::default()
        });

        assert!(service.subscribe(&ChannelId::new("c1")).await.is_err());
        assert!(service.snapshot().await.subscriptions.is_empty());
    }

    #[tokio::test]
    async fn seeded_subscription_can_be_removed() {
        let service = service().with_subscription(&ChannelId::new("c1"));
        assert!(service.snapshot().await.subscriptions.contains("c1"));

        service
            .unsubscribe(&ChannelId::new("c1"))
            .await
            .expect("unsubscribe");
        assert!(service.snapshot().await.subscriptions.is_empty());
    }
}
