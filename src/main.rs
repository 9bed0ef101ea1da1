use std::sync::Arc;

use poem::{Route, Server, listener::TcpListener};
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use voyage_notifier::{
    application::{
        handlers::notification_dispatcher::NotificationDispatcher,
        services::channel::ChannelGateway,
    },
    config::Config,
    domain::repositories::NotificationQueue,
    infrastructure::{
        messaging::{
            automation_webhook::AutomationWebhookClient, build_http_client,
            chat_webhook::ChatWebhookClient, dispatch_worker::DispatchWorker,
        },
        repositories::in_memory::InMemoryNotificationQueue,
    },
    presentation::http::endpoints::root::{ApiState, api_service},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("voyage_notifier=info,poem=info")),
        )
        .json()
        .init();

    let config = Config::try_parse()?;
    let server_url = config.server_url();

    let http = build_http_client(config.http_timeout)?;
    let gateway = ChannelGateway::new(vec![
        ChatWebhookClient::new(http.clone(), config.chat_webhook.clone()),
        AutomationWebhookClient::new(http, config.automation_webhook.clone()),
    ]);
    let queue: Arc<dyn NotificationQueue> =
        Arc::new(InMemoryNotificationQueue::new(config.retry_policy));

    let dispatcher = Arc::new(NotificationDispatcher::new(
        queue.clone(),
        gateway.clone(),
        config.dispatch,
    ));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let worker = DispatchWorker::new(dispatcher, config.dispatch_interval).spawn(shutdown_rx);

    let state = Arc::new(ApiState::new(queue, gateway));
    let api_service = api_service(state).server(format!("{}/api", server_url));
    let ui = api_service.swagger_ui();
    let app = Route::new().nest("/api", api_service).nest("/", ui);

    tracing::info!(url = %server_url, "Starting server");

    let server = Server::new(TcpListener::bind(format!("{}:{}", config.host, config.port)));
    tokio::select! {
        result = server.run(app) => {
            if let Err(err) = result {
                tracing::error!(error = %err, "Server exited with error");
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received shutdown signal, stopping gracefully...");
        }
    }

    let _ = shutdown_tx.send(true);
    if let Err(err) = worker.await {
        tracing::error!(error = %err, "Dispatch worker panicked");
    }

    tracing::info!("Voyage notifier stopped");
    Ok(())
}
