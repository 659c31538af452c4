use std::{net::SocketAddr, process, sync::Arc};

use folio::{
    application::{
        error::AppError,
        health::HealthService,
        posts::PostService,
        seed::{SeedPlan, Seeder},
        users::UserService,
    },
    client::{self, TerminalSurface},
    config,
    infra::{
        db::SqliteRepositories,
        error::InfraError,
        http::{self, ApiRateLimiter, ApiState},
        telemetry,
    },
};
use rand::{SeedableRng, rngs::StdRng};
use tokio::time::timeout;
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

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Seed(_) => run_seed(settings).await,
        config::Command::Browse(_) => run_browse(settings).await,
    }
}

async fn init_repositories(
    settings: &config::Settings,
) -> Result<Arc<SqliteRepositories>, AppError> {
    let pool = SqliteRepositories::connect(
        &settings.database.url,
        settings.database.max_connections.get(),
    )
    .await
    .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    SqliteRepositories::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    Ok(Arc::new(SqliteRepositories::new(pool)))
}

fn build_api_state(repositories: Arc<SqliteRepositories>, settings: &config::Settings) -> ApiState {
    let rate_limiter = settings.environment.is_production().then(|| {
        Arc::new(ApiRateLimiter::new(
            std::time::Duration::from_secs(u64::from(settings.rate_limit.window_seconds.get())),
            settings.rate_limit.max_requests.get(),
        ))
    });

    ApiState {
        users: Arc::new(UserService::new(repositories.clone())),
        posts: Arc::new(PostService::new(repositories.clone())),
        health: Arc::new(HealthService::new(repositories, settings.environment)),
        rate_limiter,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;
    let api_state = build_api_state(repositories, &settings);
    let router = http::build_router(api_state);

    let addr = settings.server.addr;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| AppError::from(InfraError::bind(addr, err)))?;

    info!(
        target = "folio::serve",
        %addr,
        environment = %settings.environment,
        rate_limited = settings.environment.is_production(),
        "server listening"
    );

    let grace = settings.server.graceful_shutdown;
    let (drain_tx, drain_rx) = tokio::sync::oneshot::channel::<()>();
    let server = axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        shutdown_signal().await;
        let _ = drain_tx.send(());
    });

    let server = tokio::spawn(async move { server.await });
    tokio::pin!(server);

    tokio::select! {
        joined = &mut server => {
            joined
                .map_err(|err| AppError::unexpected(format!("server task failed: {err}")))?
                .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;
        }
        _ = drain_rx => {
            info!(target = "folio::serve", grace_seconds = grace.as_secs(), "draining connections");
            match timeout(grace, &mut server).await {
                Ok(joined) => {
                    joined
                        .map_err(|err| AppError::unexpected(format!("server task failed: {err}")))?
                        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;
                }
                Err(_) => {
                    warn!(target = "folio::serve", "graceful shutdown timed out");
                    server.abort();
                }
            }
        }
    }

    info!(target = "folio::serve", "server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(target = "folio::serve", error = %err, "failed to listen for ctrl-c");
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
                warn!(target = "folio::serve", error = %err, "failed to listen for SIGTERM");
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
}

async fn run_seed(settings: config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;
    let plan = SeedPlan {
        users: settings.seed.users.get(),
        posts_per_user: settings.seed.posts_per_user.get(),
    };

    info!(
        target = "folio::seed",
        users = plan.users,
        posts_per_user = plan.posts_per_user,
        "seeding database"
    );

    let mut rng = StdRng::from_entropy();
    let summary = Seeder::new(repositories).run(plan, &mut rng).await?;

    info!(
        target = "folio::seed",
        users = summary.users,
        posts = summary.posts,
        "seeding completed"
    );
    Ok(())
}

async fn run_browse(settings: config::Settings) -> Result<(), AppError> {
    client::browse::run(&settings.client, TerminalSurface)
        .await
        .map_err(|err| match err {
            client::BrowseError::Input(err) => AppError::from(InfraError::Io(err)),
            client::BrowseError::Http(err) => {
                AppError::from(InfraError::configuration(err.to_string()))
            }
        })
}
