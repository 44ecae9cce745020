use std::sync::Arc;

use kube::Client;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod constants;
mod context_data;
mod controller_stitch;
mod events;
mod model;
mod operator_config;
mod stitch;
mod stitch_route;

use crate::context_data::ContextData;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let version: &str = env!("CARGO_PKG_VERSION");
    info!("Starting stitch-operator {}", version);

    let client: Client = Client::try_default().await.expect("Failed to create kube Client");
    let context_data: Arc<ContextData> = Arc::new(ContextData::new(client.clone()));

    controller_stitch::run(client, context_data).await;
}
