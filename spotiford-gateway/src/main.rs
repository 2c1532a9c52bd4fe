use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use spotiford_gateway::discord::start_discord_bot;
use spotiford_gateway::spotify::{OAuthConfig, SpotifyClient};
use spotiford_gateway::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration first so the configured log level can seed the filter
    let config = spotiford_core::Config::load()?;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.log_level().into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Configuration loaded (prefix: '{}', search limit: {})",
        config.command_prefix(),
        config.settings.spotify.effective_search_limit()
    );

    let tokens = spotiford_db::TokenDbPool::open(config.database_path()).await?;

    let oauth = OAuthConfig {
        client_id: config.secrets.spotify_client_id.clone(),
        client_secret: config.secrets.spotify_client_secret.clone(),
        redirect_uri: config.settings.spotify.redirect_uri.clone(),
        scopes: config.settings.spotify.scopes.clone(),
    };
    let spotify = SpotifyClient::new(oauth, tokens.clone())?;

    let state = Arc::new(AppState::new(
        Arc::new(spotify),
        config.command_prefix(),
        config.settings.spotify.effective_search_limit(),
    ));

    let token = config.discord_bot_token().map(str::to_string);
    let Some(mut client) = start_discord_bot(token, state).await? else {
        error!("spotiford needs DISCORD_BOT_TOKEN to run");
        tokens.close().await;
        return Ok(());
    };

    info!("Discord bot started");
    let shard_manager = client.shard_manager.clone();
    let mut discord_task = tokio::spawn(async move { client.start().await });

    tokio::select! {
        joined = &mut discord_task => match joined {
            Ok(Err(e)) => error!("Discord client error: {}", e),
            Err(e) => error!("Discord task failed: {}", e),
            Ok(Ok(())) => info!("Discord client stopped"),
        },
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down...");
            shard_manager.shutdown_all().await;
            discord_task.abort();
        }
    }

    tokens.close().await;
    Ok(())
}
