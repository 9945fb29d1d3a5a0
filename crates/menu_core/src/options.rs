//! Builds the ordered entry list for an open menu.

use shared::domain::{ChannelId, FeatureFlags, PlaylistId, PlaylistMembership, Subject, VideoId};

use crate::config::MenuLabels;

/// What a button entry does when activated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    OpenChannel { channel_id: ChannelId },
    Subscribe { channel_id: ChannelId, subscribed: bool },
    NotInterested,
    Share { video_id: VideoId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    Checklist {
        label: String,
        checked: bool,
        playlist_id: PlaylistId,
    },
    Button {
        label: String,
        action: MenuAction,
    },
}

impl MenuEntry {
    pub fn label(&self) -> &str {
        match self {
            MenuEntry::Checklist { label, .. } | MenuEntry::Button { label, .. } => label,
        }
    }

    pub fn is_checked(&self) -> Option<bool> {
        match self {
            MenuEntry::Checklist { checked, .. } => Some(*checked),
            MenuEntry::Button { .. } => None,
        }
    }
}

pub struct MenuOptionBuilder<'a> {
    labels: &'a MenuLabels,
}

impl<'a> MenuOptionBuilder<'a> {
    pub fn new(labels: &'a MenuLabels) -> Self {
        Self { labels }
    }

    /// Entry order is display order: playlists as fetched, then open channel,
    /// subscribe, not interested and share. Buttons whose preconditions fail are
    /// left out rather than disabled.
    pub fn build(
        &self,
        subject: &Subject,
        playlists: &[PlaylistMembership],
        flags: &FeatureFlags,
    ) -> Vec<MenuEntry> {
        let mut entries: Vec<MenuEntry> = playlists
            .iter()
            .map(|playlist| MenuEntry::Checklist {
                label: playlist.title.clone(),
                checked: playlist.is_member,
                playlist_id: playlist.playlist_id.clone(),
            })
            .collect();

        if let (true, Some(channel_id)) = (flags.open_channel, &subject.channel_id) {
            entries.push(self.button(
                &self.labels.open_channel,
                MenuAction::OpenChannel {
                    channel_id: channel_id.clone(),
                },
            ));
        }

        if let (true, Some(channel_id)) = (flags.subscribe, &subject.channel_id) {
            let label = if subject.subscribed {
                &self.labels.unsubscribe
            } else {
                &self.labels.subscribe
            };
            entries.push(self.button(
                label,
                MenuAction::Subscribe {
                    channel_id: channel_id.clone(),
                    subscribed: subject.subscribed,
                },
            ));
        }

        if flags.not_interested && subject.feedback_token.is_some() {
            entries.push(self.button(&self.labels.not_interested, MenuAction::NotInterested));
        }

        if let (true, Some(video_id)) = (flags.share, &subject.id) {
            entries.push(self.button(
                &self.labels.share,
                MenuAction::Share {
                    video_id: video_id.clone(),
                },
            ));
        }

        entries
    }

    fn button(&self, label: &str, action: MenuAction) -> MenuEntry {
        MenuEntry::Button {
            label: label.to_string(),
            action,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject() -> Subject {
        Subject::video("v1", "Clip")
            .with_channel("c1", false)
            .with_feedback_token("t1")
    }

    fn labels_of(entries: &[MenuEntry]) -> Vec<&str> {
        entries.iter().map(MenuEntry::label).collect()
    }

    #[test]
    fn full_menu_orders_playlists_then_buttons() {
        let labels = MenuLabels::default();
        let entries = MenuOptionBuilder::new(&labels).build(
            &subject(),
            &[PlaylistMembership::new("p1", "Watch Later", false)],
            &FeatureFlags::all(),
        );

        assert_eq!(
            entries,
            vec![
                MenuEntry::Checklist {
                    label: "Watch Later".into(),
                    checked: false,
                    playlist_id: PlaylistId::new("p1"),
                },
                MenuEntry::Button {
                    label: "Open channel".into(),
                    action: MenuAction::OpenChannel {
                        channel_id: ChannelId::new("c1"),
                    },
                },
                MenuEntry::Button {
                    label: "Subscribe".into(),
                    action: MenuAction::Subscribe {
                        channel_id: ChannelId::new("c1"),
                        subscribed: false,
                    },
                },
                MenuEntry::Button {
                    label: "Not interested".into(),
                    action: MenuAction::NotInterested,
                },
                MenuEntry::Button {
                    label: "Share".into(),
                    action: MenuAction::Share {
                        video_id: VideoId::new("v1"),
                    },
                },
            ]
        );
    }

    #[test]
    fn missing_feedback_token_omits_not_interested_only() {
        let labels = MenuLabels::default();
        let mut subject = subject();
        subject.feedback_token = None;

        let entries = MenuOptionBuilder::new(&labels).build(
            &subject,
            &[PlaylistMembership::new("p1", "Watch Later", false)],
            &FeatureFlags::all(),
        );

        assert_eq!(
            labels_of(&entries),
            vec!["Watch Later", "Open channel", "Subscribe", "Share"]
        );
    }

    #[test]
    fn playlist_order_follows_fetch_order() {
        let labels = MenuLabels::default();
        let entries = MenuOptionBuilder::new(&labels).build(
            &subject(),
            &[
                PlaylistMembership::new("p3", "Zeta", true),
                PlaylistMembership::new("p1", "Alpha", false),
                PlaylistMembership::new("p2", "Mid", true),
            ],
            &FeatureFlags::short(),
        );

        assert_eq!(labels_of(&entries), vec!["Zeta", "Alpha", "Mid"]);
        assert!(matches!(entries[0], MenuEntry::Checklist { checked: true, .. }));
        assert!(matches!(entries[1], MenuEntry::Checklist { checked: false, .. }));
    }

    #[test]
    fn subscribed_subject_gets_unsubscribe_button() {
        let labels = MenuLabels::default();
        let subject = Subject::video("v1", "Clip").with_channel("c1", true);
        let flags = FeatureFlags {
            subscribe: true,
            ..FeatureFlags::default()
        };

        let entries = MenuOptionBuilder::new(&labels).build(&subject, &[], &flags);

        assert_eq!(
            entries,
            vec![MenuEntry::Button {
                label: "Unsubscribe".into(),
                action: MenuAction::Subscribe {
                    channel_id: ChannelId::new("c1"),
                    subscribed: true,
                },
            }]
        );
    }

    #[test]
    fn channel_buttons_need_a_channel_id() {
        let labels = MenuLabels::default();
        let subject = Subject::video("v1", "Clip");

        let entries = MenuOptionBuilder::new(&labels).build(&subject, &[], &FeatureFlags::all());

        assert_eq!(labels_of(&entries), vec!["Share"]);
    }

    #[test]
    fn share_needs_a_video_id() {
        let labels = MenuLabels::default();
        let mut subject = subject();
        subject.id = None;
        let flags = FeatureFlags {
            share: true,
            ..FeatureFlags::default()
        };

        assert!(MenuOptionBuilder::new(&labels)
            .build(&subject, &[], &flags)
            .is_empty());
    }

    #[test]
    fn uploads_flag_alone_adds_no_entry() {
        let labels = MenuLabels::default();
        let flags = FeatureFlags {
            open_channel_uploads: true,
            ..FeatureFlags::default()
        };

        assert!(MenuOptionBuilder::new(&labels)
            .build(&subject(), &[], &flags)
            .is_empty());
    }

    #[test]
    fn custom_labels_are_used() {
        let labels = MenuLabels {
            share: "Send to".into(),
            ..MenuLabels::default()
        };
        let flags = FeatureFlags {
            share: true,
            ..FeatureFlags::default()
        };

        let entries = MenuOptionBuilder::new(&labels).build(&subject(), &[], &flags);
        assert_eq!(labels_of(&entries), vec!["Send to"]);
    }
}
