// SPDX-License-Identifier: MPL-2.0

use clap::{Parser, Subcommand};
use mastofeed::api::{FeedSource, MastodonClient};
use mastofeed::cache::{CachedItem, IdentityCache};
use mastofeed::config::DEFAULT_INSTANCE;
use mastofeed::feed::{FeedContext, FeedKind, FeedLoader, ItemIdentifier};
use mastofeed::filter::FilterService;
use mastofeed::logging;
use mastofeed::state::{AuthenticationBox, CurrentSession, EngineSettings};
use std::sync::Arc;
use tracing::warn;
use url::Url;

/// Page through a Mastodon timeline with the viewer's filters applied
#[derive(Parser, Debug)]
#[command(name = "mastofeed", version, about)]
struct Cli {
    /// Server to talk to
    #[arg(long, default_value = DEFAULT_INSTANCE)]
    instance: Url,

    /// OAuth access token
    #[arg(long, env = "MASTODON_TOKEN", hide_env_values = true)]
    token: String,

    /// ID of the signed-in account
    #[arg(long)]
    account_id: String,

    /// Fetch server-grouped notifications
    #[arg(long)]
    grouped: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Notifications for the signed-in account
    Notifications {
        /// Only mentions
        #[arg(long, conflicts_with = "from")]
        mentions: bool,
        /// Only notifications caused by this account ID
        #[arg(long)]
        from: Option<String>,
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// The home timeline
    Home {
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
}

impl Command {
    fn kind(&self) -> FeedKind {
        match self {
            Command::Home { .. } => FeedKind::Home,
            Command::Notifications { from: Some(id), .. } => {
                FeedKind::NotificationsWithAccount(id.clone())
            }
            Command::Notifications { mentions: true, .. } => FeedKind::NotificationsMentionsOnly,
            Command::Notifications { .. } => FeedKind::NotificationsAll,
        }
    }

    fn pages(&self) -> u32 {
        match self {
            Command::Home { pages } | Command::Notifications { pages, .. } => (*pages).max(1),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = logging::init() {
        eprintln!("{e}");
    }

    let cli = Cli::parse();
    let mut settings = EngineSettings::load();
    if cli.grouped {
        settings.use_grouped_notifications = true;
    }

    let auth = AuthenticationBox::new(cli.instance.clone(), &cli.account_id, &cli.token);
    let session = Arc::new(CurrentSession::signed_in(auth));
    let source: Arc<dyn FeedSource> = Arc::new(MastodonClient::new()?);
    let cache = IdentityCache::shared();

    let filters = FilterService::new(
        Arc::clone(&source),
        Arc::clone(&session),
        settings.filter_refresh_interval(),
    );
    if let Err(e) = filters.refresh().await {
        warn!("continuing without filters: {e}");
    }

    let kind = cli.command.kind();
    let loader = FeedLoader::new(
        FeedContext {
            source,
            cache: Arc::clone(&cache),
            session,
            filters: filters.subscribe(),
            settings,
        },
        kind.clone(),
    );

    loader.load_initial(&kind).await?;
    for _ in 1..cli.command.pages() {
        loader.load_next(&kind).await?;
    }

    for row in loader.records() {
        println!("{}", describe(&loader, &row));
    }

    Ok(())
}

fn describe(loader: &FeedLoader, row: &ItemIdentifier) -> String {
    let Some(item) = loader.resolve(row) else {
        return format!("{:>20}  (unavailable)", row.row_id());
    };

    match item {
        CachedItem::Status(status) => {
            let shown = status.content_status();
            format!(
                "{:>20}  @{}: {}",
                status.id,
                shown.account.acct,
                one_line(&shown.plain_text())
            )
        }
        CachedItem::Notification(notification) => {
            let text = notification
                .status
                .as_ref()
                .map(|status| one_line(&status.plain_text()))
                .unwrap_or_default();
            format!(
                "{:>20}  {:?} from @{} {}",
                notification.id, notification.kind, notification.account.acct, text
            )
        }
        CachedItem::NotificationGroup(group) => format!(
            "{:>20}  {:?} x{} ({} accounts)",
            group.id,
            group.kind,
            group.notifications_count,
            group.sample_account_ids.len()
        ),
    }
}

fn one_line(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    match flat.char_indices().nth(100) {
        Some((cut, _)) => format!("{}…", &flat[..cut]),
        None => flat,
    }
}
