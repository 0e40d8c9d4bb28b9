use std::{process, sync::Arc};

use lectern::{
    application::{
        admin::AdminPostService,
        blog::BlogService,
        error::AppError,
        repos::{PostsRepo, PostsWriteRepo, TagsRepo, TagsWriteRepo, UsersRepo},
        view_factory::{SiteContext, ViewFactory},
    },
    config,
    infra::{
        db::PostgresRepositories,
        error::InfraError,
        http::{self, BlogState},
        telemetry,
    },
    presentation::renderer::{AskamaViewRenderer, ViewRenderer},
};
use tokio::sync::oneshot;
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
    let (cli_args, settings) = config::load_with_cli()?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Migrate(_) => run_migrate(settings).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;
    let state = build_state(repositories, &settings);
    serve_http(&settings, state).await
}

async fn run_migrate(settings: config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;
    info!(
        target = "lectern::migrate",
        "database schema is up to date"
    );
    repositories.pool().close().await;
    Ok(())
}

async fn init_repositories(
    settings: &config::Settings,
) -> Result<Arc<PostgresRepositories>, AppError> {
    let database_url = settings
        .database
        .url
        .as_ref()
        .ok_or(InfraError::Configuration {
            key: "database.url",
        })?;

    let pool = PostgresRepositories::connect(database_url, settings.database.max_connections.get())
        .await
        .map_err(InfraError::from)?;

    PostgresRepositories::run_migrations(&pool).await?;

    Ok(Arc::new(PostgresRepositories::new(pool)))
}

fn build_state(repositories: Arc<PostgresRepositories>, settings: &config::Settings) -> BlogState {
    let posts_repo: Arc<dyn PostsRepo> = repositories.clone();
    let posts_write_repo: Arc<dyn PostsWriteRepo> = repositories.clone();
    let users_repo: Arc<dyn UsersRepo> = repositories.clone();
    let tags_repo: Arc<dyn TagsRepo> = repositories.clone();
    let tags_write_repo: Arc<dyn TagsWriteRepo> = repositories;

    let blog = BlogService::new(
        posts_repo.clone(),
        users_repo,
        tags_repo.clone(),
        settings.blog.posts_per_page.get(),
    );
    let admin = AdminPostService::new(posts_repo, posts_write_repo, tags_repo, tags_write_repo);

    let renderer: Arc<dyn ViewRenderer> = Arc::new(AskamaViewRenderer);
    let views = ViewFactory::new(
        renderer,
        SiteContext {
            disqus_name: settings.blog.disqus_name.clone(),
            site_twitter_handle: settings.blog.site_twitter_handle.clone(),
            blog_root: settings.blog.path.clone(),
        },
    );

    BlogState {
        blog: Arc::new(blog),
        admin: Arc::new(admin),
        views: Arc::new(views),
        public_site_url: settings.blog.public_site_url.clone(),
    }
}

async fn serve_http(settings: &config::Settings, state: BlogState) -> Result<(), AppError> {
    let router = http::build_router(state);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(InfraError::from)?;

    info!(
        target = "lectern::http",
        addr = %settings.server.addr,
        blog_path = %settings.blog.path,
        "listening"
    );

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let server = tokio::spawn(async move {
        axum::serve(listener, router.into_make_service())
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
    });

    tokio::signal::ctrl_c().await.map_err(InfraError::from)?;
    info!(target = "lectern::http", "shutdown requested");
    let _ = shutdown_tx.send(());

    match tokio::time::timeout(settings.server.graceful_shutdown, server).await {
        Ok(joined) => Ok(joined?.map_err(InfraError::from)?),
        Err(_) => {
            warn!(
                target = "lectern::http",
                timeout_secs = settings.server.graceful_shutdown.as_secs(),
                "graceful shutdown timed out; dropping open connections"
            );
            Ok(())
        }
    }
}
