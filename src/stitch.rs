use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Desired state of a Stitch installation as authored by the administrator.
///
/// The spec is a sparse subset of the full runtime configuration: every field
/// is optional and an absent field keeps the value resolved from the template
/// and the environment. Image references and most resource sizing are not
/// exposed here on purpose.
#[derive(CustomResource, Serialize, Deserialize, Debug, PartialEq, Default, Clone, JsonSchema)]
#[serde(rename_all = "camelCase")]
#[kube(
    group = "stitch.io",
    version = "v1alpha1",
    kind = "Stitch",
    plural = "stitches",
    namespaced,
    status = "StitchStatus"
)]
pub struct StitchSpec {
    pub route_hostname: Option<String>,
    pub console_url: Option<String>,
    pub image_stream_namespace: Option<String>,
    /// Client secret used by the oauth proxy against the cluster oauth server.
    /// Supplied back by the secret store on later passes, generated otherwise.
    pub oauth_client_secret: Option<String>,
    pub demo_data: Option<bool>,
    pub dev_support: Option<bool>,
    pub test_support: Option<bool>,
    pub deploy_integrations: Option<bool>,
    pub integration: Option<IntegrationSpec>,
    /// Replaces the whole mirror list when present and non empty
    pub maven_repositories: Option<HashMap<String, String>>,
    pub addons: Option<StitchAddons>,
    pub components: Option<StitchComponents>,
}

/// Integration workload limits of the backend server
#[derive(Serialize, Deserialize, Debug, PartialEq, Default, Clone, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationSpec {
    pub limit: Option<i32>,
    pub state_check_interval: Option<i32>,
}

/// Optional add-ons. Each block is overlaid independently, so enabling one
/// add-on never touches the fields of a sibling.
#[derive(Serialize, Deserialize, Debug, PartialEq, Default, Clone, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StitchAddons {
    pub tracing: Option<TracingSpec>,
    pub ops: Option<AddonToggle>,
    pub todo: Option<AddonToggle>,
    pub datavirt: Option<DatavirtSpec>,
    pub camel: Option<CamelSpec>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Default, Clone, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TracingSpec {
    pub enabled: Option<bool>,
    pub sampler_type: Option<String>,
    pub sampler_param: Option<String>,
}

/// Add-ons with no configuration beyond being switched on or off
#[derive(Serialize, Deserialize, Debug, PartialEq, Default, Clone, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddonToggle {
    pub enabled: Option<bool>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Default, Clone, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DatavirtSpec {
    pub enabled: Option<bool>,
    pub resources: Option<ResourcesSpec>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Default, Clone, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CamelSpec {
    pub enabled: Option<bool>,
    pub camel_version: Option<String>,
    pub runtime_version: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Default, Clone, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StitchComponents {
    pub oauth: Option<OauthSpec>,
    pub database: Option<DatabaseSpec>,
    pub server: Option<ServerSpec>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Default, Clone, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OauthSpec {
    pub cookie_secret: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Default, Clone, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseSpec {
    pub user: Option<String>,
    pub name: Option<String>,
    pub url: Option<String>,
    pub image_stream_namespace: Option<String>,
    pub password: Option<String>,
    pub sampledb_password: Option<String>,
    pub resources: Option<ResourcesSpec>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Default, Clone, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServerSpec {
    pub encrypt_key: Option<String>,
    pub client_state_authentication_key: Option<String>,
    pub client_state_encryption_key: Option<String>,
    pub resources: Option<ResourcesSpec>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Default, Clone, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResourcesSpec {
    pub memory: Option<String>,
    pub volume_capacity: Option<String>,
}

/// Last observed state of the installation, written by the reconciler
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StitchStatus {
    pub phase: StitchPhaseEnum,
    pub route_hostname: Option<String>,
    pub last_update: Option<String>,
    pub reason: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Copy, JsonSchema)]
pub enum StitchPhaseEnum {
    /// The installation is being resolved for the first time
    Installing,
    /// Resolution could not complete yet, typically the route is not there
    Pending,
    /// The installation configuration is fully resolved
    Ready,
    /// The installation input is structurally broken and needs admin action
    Failed,
}
