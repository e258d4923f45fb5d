use std::{process, sync::Arc};

use bytebrief::{
    application::{
        admin::{
            categories::AdminCategoryService,
            posts::{AdminPostService, ListingCache},
            tags::AdminTagService,
        },
        auth::SessionService,
        error::AppError,
        feed::FeedService,
        repos::{
            CategoriesRepo, CategoriesWriteRepo, PostsRepo, PostsWriteRepo, TagsRepo,
            TagsWriteRepo, UsersRepo,
        },
    },
    config,
    infra::{
        db::PostgresRepositories,
        error::InfraError,
        http::{self, AdminState, HttpState},
        telemetry,
        uploads::UploadStorage,
    },
};
use tokio::try_join;
use tracing::{Dispatch, Level, dispatcher, error, info};
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
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;
    let app = build_application_context(repositories, &settings)?;
    serve_http(&settings, app.http_state, app.admin_state).await
}

struct ApplicationContext {
    http_state: HttpState,
    admin_state: AdminState,
}

async fn init_repositories(
    settings: &config::Settings,
) -> Result<Arc<PostgresRepositories>, AppError> {
    let database_url = settings
        .database
        .url
        .as_ref()
        .ok_or_else(|| InfraError::configuration("database url is not configured"))
        .map_err(AppError::from)?;

    let pool = PostgresRepositories::connect(database_url, settings.database.max_connections.get())
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    Ok(Arc::new(PostgresRepositories::new(pool)))
}

fn build_application_context(
    repositories: Arc<PostgresRepositories>,
    settings: &config::Settings,
) -> Result<ApplicationContext, AppError> {
    let posts_repo: Arc<dyn PostsRepo> = repositories.clone();
    let posts_write_repo: Arc<dyn PostsWriteRepo> = repositories.clone();
    let categories_repo: Arc<dyn CategoriesRepo> = repositories.clone();
    let categories_write_repo: Arc<dyn CategoriesWriteRepo> = repositories.clone();
    let tags_repo: Arc<dyn TagsRepo> = repositories.clone();
    let tags_write_repo: Arc<dyn TagsWriteRepo> = repositories.clone();
    let users_repo: Arc<dyn UsersRepo> = repositories.clone();

    let upload_storage = Arc::new(
        UploadStorage::new(
            settings.uploads.directory.clone(),
            settings.uploads.max_bytes.get(),
        )
        .map_err(|err| AppError::from(InfraError::Io(err)))?,
    );

    let listing_cache = Arc::new(ListingCache::new(
        settings.listing_cache.ttl,
        settings.listing_cache.page_size.get(),
    ));

    let feed_service = Arc::new(FeedService::new(
        posts_repo.clone(),
        posts_write_repo.clone(),
        categories_repo.clone(),
        tags_repo.clone(),
        users_repo.clone(),
    ));

    let admin_post_service = Arc::new(AdminPostService::new(
        posts_repo.clone(),
        posts_write_repo.clone(),
        categories_repo.clone(),
        tags_repo.clone(),
        listing_cache,
    ));
    let admin_category_service = Arc::new(AdminCategoryService::new(
        categories_repo.clone(),
        categories_write_repo.clone(),
    ));
    let admin_tag_service = Arc::new(AdminTagService::new(
        tags_repo.clone(),
        tags_write_repo.clone(),
    ));
    let session_service = Arc::new(SessionService::new(users_repo.clone()));

    let http_state = HttpState {
        feed: feed_service,
        db: repositories.clone(),
        upload_storage: upload_storage.clone(),
    };

    let admin_state = AdminState {
        posts: admin_post_service,
        categories: admin_category_service,
        tags: admin_tag_service,
        sessions: session_service,
        upload_storage,
        db: repositories,
        session_cookie: settings.auth.session_cookie.clone(),
    };

    Ok(ApplicationContext {
        http_state,
        admin_state,
    })
}

async fn serve_http(
    settings: &config::Settings,
    http_state: HttpState,
    admin_state: AdminState,
) -> Result<(), AppError> {
    let public_router = http::build_router(http_state);
    let upload_body_limit = settings.uploads.max_bytes.get() as usize;
    let admin_router = http::build_admin_router(admin_state, upload_body_limit);

    let public_listener = tokio::net::TcpListener::bind(settings.server.public_addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;
    let admin_listener = tokio::net::TcpListener::bind(settings.server.admin_addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "bytebrief::serve",
        public = %settings.server.public_addr,
        admin = %settings.server.admin_addr,
        "listening"
    );

    let public_server = axum::serve(public_listener, public_router.into_make_service());
    let admin_server = axum::serve(admin_listener, admin_router.into_make_service());

    try_join!(public_server, admin_server)
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    Ok(())
}
