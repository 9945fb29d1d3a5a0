use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

id_newtype!(VideoId);
id_newtype!(ChannelId);
id_newtype!(PlaylistId);
id_newtype!(FeedbackToken);

/// Snapshot of the media item a menu is opened for.
///
/// Remote state that is re-fetched per menu (playlist membership) is not part
/// of the subject; it travels next to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: Option<VideoId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<ChannelId>,
    pub title: String,
    pub is_playable: bool,
    #[serde(default)]
    pub subscribed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback_token: Option<FeedbackToken>,
}

impl Subject {
    pub fn video(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: Some(VideoId::new(id)),
            channel_id: None,
            title: title.into(),
            is_playable: true,
            subscribed: false,
            feedback_token: None,
        }
    }

    pub fn with_channel(mut self, channel_id: impl Into<String>, subscribed: bool) -> Self {
        self.channel_id = Some(ChannelId::new(channel_id));
        self.subscribed = subscribed;
        self
    }

    pub fn with_feedback_token(mut self, token: impl Into<String>) -> Self {
        self.feedback_token = Some(FeedbackToken::new(token));
        self
    }
}

/// Which optional buttons a menu shows. Supplied by the caller, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureFlags {
    pub open_channel: bool,
    pub open_channel_uploads: bool,
    pub not_interested: bool,
    pub subscribe: bool,
    pub share: bool,
}

impl FeatureFlags {
    pub fn all() -> Self {
        Self {
            open_channel: true,
            open_channel_uploads: true,
            not_interested: true,
            subscribe: true,
            share: true,
        }
    }

    /// Playlist checklist only.
    pub fn short() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistMembership {
    pub playlist_id: PlaylistId,
    pub title: String,
    pub is_member: bool,
}

impl PlaylistMembership {
    pub fn new(playlist_id: impl Into<String>, title: impl Into<String>, is_member: bool) -> Self {
        Self {
            playlist_id: PlaylistId::new(playlist_id),
            title: title.into(),
            is_member,
        }
    }
}
