use std::{
    future::IntoFuture,
    io::{self, Write},
    process,
    sync::Arc,
};

use country_outline::{
    application::{error::AppError, outline::OutlineService},
    config::{self, Command, PrintArgs},
    infra::{
        error::InfraError,
        http::{self, HttpState},
        telemetry,
        wikipedia::WikipediaClient,
    },
};
use tokio::{net::TcpListener, sync::Notify};
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt()
        .with_max_level(Level::ERROR)
        .with_writer(io::stderr)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()?;

    let command = cli_args
        .command
        .unwrap_or(Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging)?;

    let client = WikipediaClient::new(&settings.upstream)?;
    let outlines = OutlineService::new(Arc::new(client));

    match command {
        Command::Serve(_) => run_serve(&settings, outlines).await,
        Command::Print(args) => run_print(outlines, args).await,
    }
}

async fn run_serve(settings: &config::Settings, outlines: OutlineService) -> Result<(), AppError> {
    let router = http::build_router(HttpState::new(outlines));

    let listener = TcpListener::bind(settings.server.addr)
        .await
        .map_err(InfraError::from)?;
    info!(addr = %settings.server.addr, "outline service listening");

    let shutdown = Arc::new(Notify::new());
    let server = axum::serve(listener, router).with_graceful_shutdown({
        let shutdown = Arc::clone(&shutdown);
        async move { shutdown.notified().await }
    });
    let mut server = tokio::spawn(server.into_future());

    tokio::select! {
        joined = &mut server => return flatten_server_result(joined),
        () = shutdown_signal() => {}
    }

    info!("shutdown signal received, draining connections");
    shutdown.notify_one();

    match tokio::time::timeout(settings.server.graceful_shutdown, server).await {
        Ok(joined) => flatten_server_result(joined),
        Err(_) => {
            warn!(
                timeout_secs = settings.server.graceful_shutdown.as_secs(),
                "graceful shutdown timed out"
            );
            Ok(())
        }
    }
}

fn flatten_server_result(
    joined: Result<io::Result<()>, tokio::task::JoinError>,
) -> Result<(), AppError> {
    joined
        .map_err(|err| AppError::unexpected(format!("server task failed: {err}")))?
        .map_err(|err| AppError::from(InfraError::from(err)))
}

async fn run_print(outlines: OutlineService, args: PrintArgs) -> Result<(), AppError> {
    let outline = outlines.outline(Some(&args.country)).await?;

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(outline.to_markdown().as_bytes())
        .and_then(|()| stdout.flush())
        .map_err(InfraError::from)?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
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
        () = ctrl_c => {}
        () = terminate => {}
    }
}
