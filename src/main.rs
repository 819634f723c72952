use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use roomkeeper::{
    AppState, Reaper, RoomStore, Rooms, SqliteRoomStore, config::Config, db, logging,
};
use tracing::{error, info, info_span};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("failed to read configuration")?;
    logging::init(config.log_level)?;

    let db_pool = db::connect(&config.database_url)
        .await
        .context("failed to connect to database")?;
    db::migrate(&db_pool)
        .await
        .context("failed to apply migrations")?;
    info!("migrations applied successfully!");

    let store: Arc<dyn RoomStore> = Arc::new(SqliteRoomStore::new(db_pool));
    let reaper = Reaper::new(store.clone(), info_span!("reaper"));
    let rooms = Rooms::new(store, reaper, config.room_ttl);

    let bootstrap = rooms.clone();
    tokio::spawn(async move {
        if let Err(err) = bootstrap.bootstrap().await {
            error!(error = %err, "failed to fetch rooms for bootstrap");
        }
    });

    let app = roomkeeper::app(AppState::new(rooms, &config.service_name));
    let listener = tokio::net::TcpListener::bind(config.address())
        .await
        .with_context(|| format!("failed to listen on {}", config.address()))?;
    info!(address = %config.address(), ttl = ?config.room_ttl, "server is up! ⚡️");

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("server is shutting down...");
}
