use crate::{config::Config, routes::api_routes, telemetry::Metrics};
use axum::{extract::DefaultBodyLimit, Router};
use axum_otel_metrics::HttpMetricsLayerBuilder;
use inference_client::{Detector, ModelId};
use std::{path::PathBuf, sync::Arc};
use tokio::{net::TcpListener, sync::broadcast::Receiver, task::JoinHandle};

#[derive(Clone)]
pub struct SharedState {
    pub detector: Arc<dyn Detector>,
    pub model_id: ModelId,
    pub upload_dir: PathBuf,
    pub metrics: Arc<Metrics>,
}

impl SharedState {
    pub fn new(detector: Arc<dyn Detector>, config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            detector,
            model_id: config.inference.model_id.clone(),
            upload_dir: config.upload.dir.clone(),
            metrics: Arc::new(Metrics::new()?),
        })
    }
}

pub fn build_router(state: SharedState, max_upload_bytes: usize) -> Router {
    let metrics_layer = HttpMetricsLayerBuilder::new().build();

    Router::new()
        .merge(api_routes())
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
        .layer(metrics_layer)
}

pub struct HttpServer {
    router: Router,
    listener: TcpListener,
}

impl HttpServer {
    pub async fn new(detector: Arc<dyn Detector>, config: &Config) -> anyhow::Result<Self> {
        let addr = config.server.get_address();

        let state = SharedState::new(detector, config)?;
        let router = build_router(state, config.upload.max_bytes);

        let listener = TcpListener::bind(addr).await?;

        Ok(Self { router, listener })
    }

    pub async fn run(
        self,
        mut shutdown_rx: Receiver<()>,
    ) -> anyhow::Result<JoinHandle<anyhow::Result<()>>> {
        tracing::info!("Starting app on {}", self.listener.local_addr()?);

        let listener = self.listener;
        let router = self.router;
        let server_handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    shutdown_rx.recv().await.ok();
                })
                .await?;
            Ok(())
        });

        Ok(server_handle)
    }
}
