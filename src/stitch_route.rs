use k8s_openapi::api::networking::v1::Ingress;
use kube::{Api, Client};
use tracing::{debug, info};

use crate::constants;
use crate::model::Error;
use crate::operator_config::Config;
use crate::stitch::Stitch;

/// Capability to look up the externally reachable host of an installation.
/// Expressed as a trait so the resolver can be exercised against a fake
/// without a live cluster.
#[allow(async_fn_in_trait)]
pub trait RouteLocator {
    async fn route_host(&self, namespace: &str, name: &str) -> Result<Option<String>, Error>;
}

/// The production locator reads the public ingress of the installation and
/// adopts the host advertised by its first rule.
impl RouteLocator for Client {
    async fn route_host(&self, namespace: &str, name: &str) -> Result<Option<String>, Error> {
        let api: Api<Ingress> = Api::namespaced(self.clone(), namespace);
        match api.get_opt(name).await? {
            Some(ingress) => Ok(ingress
                .spec
                .and_then(|spec| spec.rules)
                .and_then(|rules| rules.into_iter().find_map(|rule| rule.host))),
            None => {
                debug!("Ingress {name} not found in namespace {namespace}");
                Ok(None)
            }
        }
    }
}

/// Sets the route hostname of the installation. A hostname already resolved
/// by an earlier stage takes priority and short circuits the cluster lookup;
/// otherwise the host is adopted from the cluster route. A route that does
/// not exist yet is an expected transient state, surfaced as
/// `Error::RouteNotFound` so the reconciler can retry on a later pass.
pub async fn set_route(
    config: &mut Config,
    locator: &impl RouteLocator,
    stitch: &Stitch,
) -> Result<(), Error> {
    if !config.route_hostname.is_empty() {
        info!("Using route hostname {}", config.route_hostname);
        return Ok(());
    }

    let namespace = stitch.metadata.namespace.clone().unwrap_or_default();
    match locator.route_host(&namespace, constants::ROUTE_NAME).await? {
        Some(host) => {
            info!("Adopted route hostname {host} from the cluster");
            config.route_hostname = host;
            Ok(())
        }
        None => Err(Error::RouteNotFound(format!(
            "{namespace}/{}",
            constants::ROUTE_NAME
        ))),
    }
}
