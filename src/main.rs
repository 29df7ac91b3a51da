use std::io::Error;
use std::sync::Arc;

use poem::{Route, Server, listener::TcpListener};
use poem_openapi::OpenApiService;
use tokio::main;
use tracing_subscriber::EnvFilter;

use bulk_messaging::{
    application::{
        services::{jwt::JwtServiceConfig, recipient_resolver::RecipientResolver},
        usecases::{
            dispatch_message::DispatchMessageUseCase, get_message::GetMessageUseCase,
            list_messages::ListMessagesUseCase, message_stats::MessageStatsUseCase,
        },
    },
    config::Config,
    domain::repositories::{ContactRepository, MessageRepository},
    infrastructure::{
        delivery::maddy::MaddyCmsClient,
        repositories::{
            in_memory::{InMemoryContactRepository, InMemoryMessageRepository},
            postgres::{PostgresContactRepository, PostgresMessageRepository},
        },
    },
    presentation::http::endpoints::{
        health::HealthEndpoints, messages::MessagesEndpoints, root::ApiState,
    },
};

#[main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::try_parse().map_err(Error::other)?;
    let state = build_state(&config).await.map_err(Error::other)?;

    let server_url = format!("{}://{}:{}", config.scheme, config.host, config.port);

    tracing::info!("starting server at {}", server_url);

    let api_service = OpenApiService::new(
        (HealthEndpoints, MessagesEndpoints::new(state)),
        "Bulk Messaging API",
        "0.1.0",
    )
    .server(format!("{}/api", server_url));
    let ui = api_service.swagger_ui();
    let app = Route::new().nest("/api", api_service).nest("/", ui);

    Server::new(TcpListener::bind(format!("localhost:{}", config.port)))
        .run(app)
        .await
}

async fn build_state(config: &Config) -> anyhow::Result<Arc<ApiState>> {
    let (message_repo, contact_repo): (Arc<dyn MessageRepository>, Arc<dyn ContactRepository>) =
        match &config.database_url {
            Some(database_url) => {
                let pool = sqlx::postgres::PgPoolOptions::new()
                    .max_connections(5)
                    .connect(database_url)
                    .await?;
                sqlx::migrate!("./migrations").run(&pool).await?;
                tracing::info!("connected to postgres store");
                (
                    PostgresMessageRepository::new(pool.clone()),
                    PostgresContactRepository::new(pool),
                )
            }
            None => {
                tracing::warn!("DATABASE_URL not set, using in-memory store");
                (
                    Arc::new(InMemoryMessageRepository::new()),
                    Arc::new(InMemoryContactRepository::new()),
                )
            }
        };

    let gateway = MaddyCmsClient::new(&config.provider);
    let resolver = RecipientResolver::new(contact_repo);

    Ok(Arc::new(ApiState {
        dispatch_message_usecase: Arc::new(DispatchMessageUseCase::new(
            message_repo.clone(),
            resolver,
            gateway,
            config.provider.sms_sender_id.clone(),
        )),
        list_messages_usecase: Arc::new(ListMessagesUseCase::new(message_repo.clone())),
        get_message_usecase: Arc::new(GetMessageUseCase::new(message_repo.clone())),
        message_stats_usecase: Arc::new(MessageStatsUseCase::new(message_repo)),
        jwt_config: JwtServiceConfig {
            secret: config.jwt_secret.clone(),
        },
    }))
}
