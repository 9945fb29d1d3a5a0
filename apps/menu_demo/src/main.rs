mod config;
mod console;
mod script;
mod simulated;

use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::Parser;
use menu_core::MenuSession;
use shared::domain::{ChannelId, Subject};
use tokio::runtime::Handle;
use tracing::{info, warn};

use crate::{
    config::load_settings,
    console::ConsoleRenderer,
    script::{parse_script, Step},
    simulated::SimulatedMediaService,
};

#[derive(Parser, Debug)]
struct Args {
    #[arg(long, default_value = "menu.toml")]
    config: PathBuf,
    #[arg(long, default_value = "v1")]
    video_id: String,
    #[arg(long, default_value = "Untitled video")]
    title: String,
    #[arg(long)]
    channel_id: Option<String>,
    #[arg(long)]
    subscribed: bool,
    #[arg(long)]
    feedback_token: Option<String>,
    #[arg(long)]
    not_playable: bool,
    /// Open the reduced menu used for short-form videos.
    #[arg(long)]
    short: bool,
    /// Comma separated steps: `toggle:<index>:<on|off>`, `activate:<index>`, `wait`, `close`.
    #[arg(long, default_value = "wait")]
    script: String,
}

impl Args {
    fn subject(&self) -> Subject {
        let mut subject = Subject::video(self.video_id.clone(), self.title.clone());
        if let Some(channel_id) = &self.channel_id {
            subject = subject.with_channel(channel_id.clone(), self.subscribed);
        }
        if let Some(token) = &self.feedback_token {
            subject = subject.with_feedback_token(token.clone());
        }
        subject.is_playable = !self.not_playable;
        subject
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let args = Args::parse();
    let steps = parse_script(&args.script)?;
    let settings = load_settings(&args.config)?;

    let mut service = SimulatedMediaService::new(&settings.service);
    if let (true, Some(channel_id)) = (args.subscribed, &args.channel_id) {
        service = service.with_subscription(&ChannelId::new(channel_id.clone()));
    }
    let service = Arc::new(service);

    let mut session = MenuSession::new(
        Handle::current(),
        service.clone(),
        Arc::new(ConsoleRenderer),
        settings.menu,
    );

    let subject = Some(args.subject());
    let opened = if args.short {
        session.show_short_menu(subject)
    } else {
        session.show_menu(subject)
    };
    if !opened {
        warn!(video = %args.video_id, "demo: subject cannot show a menu");
        return Ok(());
    }
    session.run_until_idle().await;

    for step in steps {
        info!(?step, state = ?session.state(), "demo: running step");
        let outcome = match step {
            Step::Toggle { index, checked } => session.toggle(index, checked),
            Step::Activate { index } => session.activate(index),
            Step::Wait => {
                for settled in session.run_until_idle().await {
                    if let Err(err) = settled.result {
                        info!(
                            slot = %settled.slot,
                            "demo: operation ended without effect: {:#}",
                            anyhow::Error::from(err)
                        );
                    }
                }
                Ok(())
            }
            Step::Close => {
                session.close();
                Ok(())
            }
        };
        if let Err(err) = outcome {
            warn!(?step, %err, "demo: step rejected");
        }
    }

    session.run_until_idle().await;
    session.close();

    println!("{}", serde_json::to_string_pretty(&service.snapshot().await)?);
    Ok(())
}
