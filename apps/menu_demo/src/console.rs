use menu_core::{MenuEntry, Notice, Renderer};
use shared::domain::{ChannelId, VideoId};

pub struct ConsoleRenderer;

pub fn notice_text(notice: Notice) -> &'static str {
    match notice {
        Notice::SignedUsersOnly => "Only signed-in users can do this",
        Notice::SubscribedToChannel => "Subscribed to channel",
        Notice::UnsubscribedFromChannel => "Unsubscribed from channel",
        Notice::WontSeeThisVideo => "You won't see this video anymore",
        Notice::PlaylistsUnavailable => "Playlists are unavailable right now",
    }
}

pub fn entry_line(index: usize, entry: &MenuEntry) -> String {
    match entry {
        MenuEntry::Checklist { label, checked, .. } => {
            let mark = if *checked { "x" } else { " " };
            format!("  {index}: [{mark}] {label}")
        }
        MenuEntry::Button { label, .. } => format!("  {index}: ( {label} )"),
    }
}

impl Renderer for ConsoleRenderer {
    fn render(&self, title: &str, playlist_heading: &str, entries: &[MenuEntry]) {
        println!("== {title}");
        if entries.iter().any(|entry| entry.is_checked().is_some()) {
            println!("  {playlist_heading}:");
        }
        for (index, entry) in entries.iter().enumerate() {
            println!("{}", entry_line(index, entry));
        }
    }

    fn notify(&self, notice: Notice) {
        println!("-- {}", notice_text(notice));
    }

    fn dismiss(&self) {
        println!("== (menu dismissed)");
    }

    fn open_channel(&self, channel_id: &ChannelId) {
        println!(">> opening channel {channel_id}");
    }

    fn share_video(&self, video_id: &VideoId) {
        println!(">> sharing https://youtu.be/{video_id}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::PlaylistId;

    #[test]
    fn checklist_lines_show_checked_state() {
        let entry = MenuEntry::Checklist {
            label: "Watch Later".into(),
            checked: true,
            playlist_id: PlaylistId::new("WL"),
        };
        assert_eq!(entry_line(0, &entry), "  0: [x] Watch Later");
    }
}
