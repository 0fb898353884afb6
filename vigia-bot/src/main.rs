mod audit;
mod config;
mod events;
mod surface;

use std::sync::Arc;

use poise::serenity_prelude as serenity;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::Layer;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use rustls::crypto::ring::default_provider;

use vigia_core::{AuditLog, CooldownTracker, Data, Error};
use vigia_database::{ConfigBackend, ConfigStore};

use crate::audit::ChannelAuditLog;
use crate::config::BotConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(filter_fn(|metadata| {
        let target = metadata.target();

        let within_info_level = *metadata.level() <= tracing::Level::INFO;
        if !within_info_level {
            return false;
        }

        !(target.starts_with("serenity::gateway::bridge::shard_manager")
            || target.starts_with("serenity::gateway::bridge::shard_runner"))
    }));

    tracing_subscriber::registry().with(fmt_layer).init();

    default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls ring provider"))?;

    dotenvy::dotenv().ok();

    let config = BotConfig::from_env()?;

    let backend = select_backend(&config);
    if let Err(err) = backend.ping().await {
        warn!(?err, backend = %backend.describe(), "Config backend health check failed; writes may fail.");
    }
    let store = ConfigStore::open(backend).await?;
    info!(
        backend = %store.backend().describe(),
        guilds = store.guild_count().await,
        "Guild configuration loaded."
    );

    let registry = vigia_commands::registry()?;
    info!(commands = registry.len(), "Commands registered.");

    let http = Arc::new(serenity::Http::new(&config.token));
    let audit: Arc<dyn AuditLog> = Arc::new(ChannelAuditLog::new(
        http,
        store.clone(),
        config.settings.log_channel_id,
    ));

    let data = Data::new(store, registry, audit.clone(), config.settings.clone());
    spawn_cooldown_sweep(data.cooldowns.clone(), config.cooldown_sweep);

    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT
        | serenity::GatewayIntents::GUILD_MEMBERS
        | serenity::GatewayIntents::GUILD_VOICE_STATES;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            event_handler: |ctx, event, framework, data| {
                Box::pin(events::handle_event(ctx, event, framework, data))
            },
            on_error: |error| Box::pin(on_error(error)),
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: None,
                mention_as_prefix: false,
                ..Default::default()
            },
            ..Default::default()
        })
        .setup(move |_ctx, _ready, _framework| Box::pin(async move { Ok(data) }))
        .build();

    info!("Vigia is connecting...");

    let mut client = serenity::ClientBuilder::new(&config.token, intents)
        .framework(framework)
        .await?;

    if let Err(err) = client.start().await {
        let err = Error::from(err);
        if let Err(source) = audit.log_critical_error(&err, "gateway client").await {
            warn!(?source, "failed to deliver critical error record");
        }
        return Err(err);
    }

    Ok(())
}

fn select_backend(config: &BotConfig) -> ConfigBackend {
    let json = || ConfigBackend::json_file(&config.config_path);

    if !config.redis_enabled {
        info!("Redis persistence disabled (set REDIS_ENABLED=true to enable).");
        return json();
    }

    let Some(redis_url) = config.redis_url.as_deref() else {
        warn!(key_prefix = %config.redis_key_prefix, "REDIS_ENABLED=true but REDIS_URL is missing; using the JSON file.");
        return json();
    };

    match ConfigBackend::redis(redis_url, config.redis_key_prefix.clone()) {
        Ok(backend) => {
            info!(key_prefix = %config.redis_key_prefix, "Redis persistence enabled.");
            backend
        }
        Err(err) => {
            warn!(?err, key_prefix = %config.redis_key_prefix, "Failed to initialize Redis; using the JSON file.");
            json()
        }
    }
}

fn spawn_cooldown_sweep(cooldowns: CooldownTracker, every: std::time::Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            let removed = cooldowns.sweep(Instant::now());
            if removed > 0 {
                debug!(removed, "expired cooldowns swept");
            }
        }
    });
}

async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::EventHandler { error, event, .. } => {
            error!(?error, event = event.snake_case_name(), "event handler failed");
        }
        poise::FrameworkError::Setup { error, .. } => {
            error!(?error, "framework setup failed");
        }
        other => {
            error!(?other, "framework error");
        }
    }
}
