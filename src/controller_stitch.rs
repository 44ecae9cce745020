use chrono::Utc;
use futures::StreamExt;
use kube::{
    api::{Api, Patch, PatchParams},
    client::Client,
    runtime::{
        controller::{Action, Controller},
        watcher,
    },
    Resource, ResourceExt,
};
use serde_json::json;
use std::{collections::HashMap, sync::Arc};
use tokio::time::Duration;
use tracing::{error, info};

use crate::{
    constants,
    context_data::ContextData,
    events::{ResourceEvent, StitchEventEnum},
    model::Error,
    operator_config,
    stitch::{Stitch, StitchPhaseEnum, StitchStatus},
};

/// Action to be taken upon a `Stitch` resource during reconciliation
enum StitchAction {
    /// Resolve the installation configuration for the current desired state
    Sync,
    /// The resource is going away, nothing to resolve anymore
    Delete,
}

/// Resources arrives into reconciliation queue in a certain state. This function looks at
/// the state of given `Stitch` resource and decides which actions needs to be performed.
///
/// # Arguments
/// - `stitch`: A reference to `Stitch` being reconciled to decide next action upon.
fn determine_action(stitch: &Stitch) -> StitchAction {
    if stitch.meta().deletion_timestamp.is_some() {
        StitchAction::Delete
    } else {
        StitchAction::Sync
    }
}

async fn reconciler(stitch: Arc<Stitch>, context: Arc<ContextData>) -> Result<Action, Error> {
    match determine_action(&stitch) {
        StitchAction::Sync => sync_installation(stitch, context).await,
        StitchAction::Delete => {
            info!("Installation {} is being deleted", stitch.name_any());
            Ok(Action::await_change())
        }
    }
}

/// Runs the configuration resolution pipeline for one installation and
/// reflects the outcome on the resource status. A missing route is the
/// expected state early in an installation lifecycle and only shortens the
/// requeue interval; a decode failure marks the installation as failed until
/// the admin fixes the input.
async fn sync_installation(stitch: Arc<Stitch>, context: Arc<ContextData>) -> Result<Action, Error> {
    let client = context.client.clone();
    let name = stitch.name_any();
    if stitch.status.is_none() {
        publish_event(&context, &stitch, StitchEventEnum::Installing, None).await;
    }
    let env: HashMap<String, String> = std::env::vars().collect();

    match operator_config::resolve_configuration(&context.template_path, &env, &stitch, &client).await {
        Ok(config) => {
            info!(
                "Installation {name} resolved, route hostname is {}",
                config.route_hostname
            );
            publish_event(&context, &stitch, StitchEventEnum::Ready, None).await;
            update_status(
                client,
                &stitch,
                StitchPhaseEnum::Ready,
                Some(config.route_hostname.to_owned()),
                None,
            )
            .await?;
            Ok(Action::requeue(Duration::from_secs(constants::RECONCILE_FREQUENCY)))
        }
        Err(Error::RouteNotFound(route)) => {
            info!("Installation {name} is waiting for route {route}");
            publish_event(&context, &stitch, StitchEventEnum::RouteMissing, Some(route.to_owned())).await;
            update_status(
                client,
                &stitch,
                StitchPhaseEnum::Pending,
                None,
                Some(format!("Route {route} does not exist yet")),
            )
            .await?;
            Ok(Action::requeue(Duration::from_secs(
                constants::RECONCILE_FREQUENCY_ROUTE_MISSING,
            )))
        }
        Err(Error::Decode(reason)) => {
            error!("Installation {name} configuration could not be decoded: {reason}");
            publish_event(&context, &stitch, StitchEventEnum::Failed, Some(reason.to_owned())).await;
            update_status(client, &stitch, StitchPhaseEnum::Failed, None, Some(reason)).await?;
            Ok(Action::requeue(Duration::from_secs(constants::RECONCILE_FREQUENCY)))
        }
        Err(error) => Err(error),
    }
}

async fn update_status(
    client: Client,
    stitch: &Stitch,
    phase: StitchPhaseEnum,
    route_hostname: Option<String>,
    reason: Option<String>,
) -> Result<(), Error> {
    let namespace = stitch.metadata.namespace.clone().unwrap_or_default();
    let api: Api<Stitch> = Api::namespaced(client, &namespace);
    let status = StitchStatus {
        phase,
        route_hostname,
        last_update: Some(Utc::now().to_rfc3339()),
        reason,
    };
    let patch = Patch::Merge(json!({ "status": status }));
    api.patch_status(&stitch.name_any(), &PatchParams::default(), &patch).await?;
    Ok(())
}

async fn publish_event(
    context: &Arc<ContextData>,
    stitch: &Stitch,
    event: StitchEventEnum,
    attribute: Option<String>,
) {
    let recorder = context
        .state
        .read()
        .await
        .generate_stitch_event(context.client.clone(), stitch);
    if let Err(error) = recorder.publish(event.to_event(attribute)).await {
        error!("Could not publish event: {error}");
    }
}

/// Actions to be taken when a reconciliation fails - for whatever reason.
/// Prints out the error to `stderr` and requeues the resource for another reconciliation.
///
/// # Arguments
/// - `stitch`: The erroneous resource.
/// - `error`: A reference to the `Error` that occurred during reconciliation.
/// - `_context`: Unused argument. Context Data "injected" automatically by kube-rs.
pub fn on_error(stitch: Arc<Stitch>, error: &Error, _context: Arc<ContextData>) -> Action {
    error!("[Stitch] Reconciliation error:\n{:?}.\n{:?}", error, stitch);
    Action::requeue(Duration::from_secs(constants::RECONCILE_FREQUENCY))
}

/// Initialize the controller
pub async fn run(client: Client, context_data: Arc<ContextData>) {
    let owned_api: Api<Stitch> = Api::<Stitch>::all(client.clone());

    Controller::new(owned_api, watcher::Config::default())
        .shutdown_on_signal()
        .run(reconciler, on_error, context_data)
        .for_each(|reconciliation_result| async move {
            match reconciliation_result {
                Ok(_stitch_resource) => {}
                Err(reconciliation_err) => {
                    let err_string = reconciliation_err.to_string();
                    if !err_string.contains("that was not found in local store") {
                        // https://github.com/kube-rs/kube/issues/712
                        error!("[Stitch] Reconciliation error: {:?}", reconciliation_err)
                    }
                }
            }
        })
        .await;
}
