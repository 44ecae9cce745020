use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::constants;
use crate::model::Error;
use crate::stitch::{ResourcesSpec, Stitch};
use crate::stitch_route::{self, RouteLocator};

/// Fully resolved runtime configuration of one Stitch installation.
///
/// A fresh value is built on every reconciliation pass by layering, in order:
/// the template document, the recognized environment variables, the custom
/// resource, the generated secrets and finally the cluster derived route.
/// Later layers only override what they explicitly carry.
#[derive(Serialize, Deserialize, Debug, PartialEq, Default, Clone)]
#[serde(default)]
pub struct Config {
    pub product_name: String,
    pub allow_localhost: bool,
    pub productized: bool,
    pub dev_support: bool,
    pub scheduled: bool,
    pub namespace: String,
    pub image_stream_namespace: String,
    /// Generated on first resolution when the secret store supplies nothing
    pub oauth_client_secret: String,
    pub route_hostname: String,
    pub console_url: String,
    pub platform: PlatformConfig,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Default, Clone)]
#[serde(default)]
pub struct PlatformConfig {
    pub addons: AddonsSpec,
    pub components: ComponentsSpec,
}

/// One entry per optional add-on. The blocks are disjoint: overlaying one
/// add-on never writes into a sibling.
#[derive(Serialize, Deserialize, Debug, PartialEq, Default, Clone)]
#[serde(default)]
pub struct AddonsSpec {
    pub tracing: TracingConfiguration,
    pub ops: AddonConfiguration,
    pub todo: AddonConfiguration,
    pub datavirt: DatavirtConfiguration,
    pub camel: CamelConfiguration,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Default, Clone)]
#[serde(default)]
pub struct TracingConfiguration {
    pub enabled: bool,
    pub sampler_type: String,
    pub sampler_param: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Default, Clone)]
#[serde(default)]
pub struct AddonConfiguration {
    pub enabled: bool,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Default, Clone)]
#[serde(default)]
pub struct DatavirtConfiguration {
    pub enabled: bool,
    pub image: String,
    pub resources: Resources,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Default, Clone)]
#[serde(default)]
pub struct CamelConfiguration {
    pub enabled: bool,
    pub image: String,
    pub camel_version: String,
    pub runtime_version: String,
}

/// One entry per deployable workload of the installation
#[derive(Serialize, Deserialize, Debug, PartialEq, Default, Clone)]
#[serde(default)]
pub struct ComponentsSpec {
    pub oauth: OauthConfiguration,
    pub ui: UiConfiguration,
    pub builder: BuilderConfiguration,
    pub server: ServerConfiguration,
    pub meta: MetaConfiguration,
    pub database: DatabaseConfiguration,
    pub metrics: MetricsConfiguration,
    pub upgrade: UpgradeConfiguration,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Default, Clone)]
#[serde(default)]
pub struct OauthConfiguration {
    pub image: String,
    pub cookie_secret: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Default, Clone)]
#[serde(default)]
pub struct UiConfiguration {
    pub image: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Default, Clone)]
#[serde(default)]
pub struct BuilderConfiguration {
    pub image: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Default, Clone)]
#[serde(default)]
pub struct ServerConfiguration {
    pub image: String,
    pub resources: Resources,
    pub encrypt_key: String,
    pub client_state_authentication_key: String,
    pub client_state_encryption_key: String,
    pub features: ServerFeatures,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Default, Clone)]
#[serde(default)]
pub struct ServerFeatures {
    /// 0 means no limit on concurrently deployed integrations
    pub integration_limit: i32,
    pub integration_state_check_interval: i32,
    pub demo_data: bool,
    pub deploy_integrations: bool,
    pub test_support: bool,
    pub master_url: String,
    pub maven_repositories: HashMap<String, String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Default, Clone)]
#[serde(default)]
pub struct MetaConfiguration {
    pub image: String,
    pub resources: ResourcesWithVolume,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Default, Clone)]
#[serde(default)]
pub struct DatabaseConfiguration {
    pub image: String,
    pub image_stream_namespace: String,
    pub user: String,
    pub name: String,
    pub url: String,
    pub password: String,
    pub sampledb_password: String,
    pub exporter: ExporterConfiguration,
    pub resources: ResourcesWithVolume,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Default, Clone)]
#[serde(default)]
pub struct ExporterConfiguration {
    pub image: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Default, Clone)]
#[serde(default)]
pub struct MetricsConfiguration {
    pub image: String,
    pub resources: ResourcesWithVolume,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Default, Clone)]
#[serde(default)]
pub struct UpgradeConfiguration {
    pub image: String,
    pub resources: VolumeOnlyResources,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Default, Clone)]
#[serde(default)]
pub struct Resources {
    pub memory: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Default, Clone)]
#[serde(default)]
pub struct ResourcesWithVolume {
    pub memory: String,
    pub volume_capacity: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Default, Clone)]
#[serde(default)]
pub struct VolumeOnlyResources {
    pub volume_capacity: String,
}

impl Config {
    /// Parses the base configuration document into a `Config` value. The
    /// template establishes the floor value of every field, later stages only
    /// override what they explicitly carry.
    pub fn load_template(path: &str) -> Result<Config, Error> {
        let file = std::fs::File::open(path)?;
        let config: Config = serde_yaml::from_reader(file)?;
        debug!("Loaded configuration template from {path}");
        Ok(config)
    }

    /// Overlays the recognized environment variables onto the configuration.
    ///
    /// The variables are read from the injected snapshot, never from the
    /// process environment. Unset variables leave their field untouched and
    /// unrecognized variables are ignored. The overlay mutates a working copy
    /// and commits it only when every assignment succeeded, so a failed pass
    /// leaves `self` unchanged.
    pub fn apply_environment(&mut self, env: &HashMap<String, String>) -> Result<(), Error> {
        let mut next = self.clone();

        string_from_env(env, constants::OAUTH_IMAGE, &mut next.platform.components.oauth.image);
        string_from_env(env, constants::UI_IMAGE, &mut next.platform.components.ui.image);
        string_from_env(env, constants::BUILDER_IMAGE, &mut next.platform.components.builder.image);
        string_from_env(env, constants::SERVER_IMAGE, &mut next.platform.components.server.image);
        string_from_env(env, constants::META_IMAGE, &mut next.platform.components.meta.image);
        string_from_env(env, constants::DATABASE_IMAGE, &mut next.platform.components.database.image);
        string_from_env(env, constants::DATABASE_NAMESPACE, &mut next.platform.components.database.image_stream_namespace);
        string_from_env(env, constants::DB_EXPORTER_IMAGE, &mut next.platform.components.database.exporter.image);
        string_from_env(env, constants::METRICS_IMAGE, &mut next.platform.components.metrics.image);
        string_from_env(env, constants::UPGRADE_IMAGE, &mut next.platform.components.upgrade.image);
        string_from_env(env, constants::DATAVIRT_IMAGE, &mut next.platform.addons.datavirt.image);
        string_from_env(env, constants::CAMEL_IMAGE, &mut next.platform.addons.camel.image);
        string_from_env(env, constants::CAMEL_VERSION, &mut next.platform.addons.camel.camel_version);
        string_from_env(env, constants::CAMEL_RUNTIME_VERSION, &mut next.platform.addons.camel.runtime_version);
        string_from_env(env, constants::ROUTE_HOSTNAME, &mut next.route_hostname);

        next.dev_support = bool_from_env(env, constants::DEV_SUPPORT, next.dev_support);
        next.platform.components.server.features.test_support =
            bool_from_env(env, constants::TEST_SUPPORT, next.platform.components.server.features.test_support);

        *self = next;
        Ok(())
    }

    /// Merges the sparse custom resource document onto the configuration.
    ///
    /// Absent fields are the normal case and retain the current value; a
    /// present field wins. Add-on blocks are overlaid independently per
    /// add-on and the repository mirror map is replaced wholesale when the
    /// document carries a non empty one.
    pub fn apply_custom_resource(&mut self, stitch: &Stitch) -> Result<(), Error> {
        if let Some(namespace) = stitch.metadata.namespace.as_ref() {
            if !namespace.is_empty() {
                self.namespace = namespace.to_owned();
            }
        }

        let spec = &stitch.spec;
        overlay_string(&mut self.route_hostname, &spec.route_hostname);
        overlay_string(&mut self.console_url, &spec.console_url);
        overlay_string(&mut self.image_stream_namespace, &spec.image_stream_namespace);
        overlay_string(&mut self.oauth_client_secret, &spec.oauth_client_secret);
        overlay_bool(&mut self.dev_support, &spec.dev_support);

        let features = &mut self.platform.components.server.features;
        overlay_bool(&mut features.demo_data, &spec.demo_data);
        overlay_bool(&mut features.test_support, &spec.test_support);
        overlay_bool(&mut features.deploy_integrations, &spec.deploy_integrations);
        if let Some(integration) = spec.integration.as_ref() {
            overlay_i32(&mut features.integration_limit, &integration.limit);
            overlay_i32(&mut features.integration_state_check_interval, &integration.state_check_interval);
        }
        overlay_map(&mut features.maven_repositories, &spec.maven_repositories);

        if let Some(addons) = spec.addons.as_ref() {
            if let Some(tracing) = addons.tracing.as_ref() {
                let target = &mut self.platform.addons.tracing;
                overlay_bool(&mut target.enabled, &tracing.enabled);
                overlay_string(&mut target.sampler_type, &tracing.sampler_type);
                overlay_string(&mut target.sampler_param, &tracing.sampler_param);
            }
            if let Some(ops) = addons.ops.as_ref() {
                overlay_bool(&mut self.platform.addons.ops.enabled, &ops.enabled);
            }
            if let Some(todo) = addons.todo.as_ref() {
                overlay_bool(&mut self.platform.addons.todo.enabled, &todo.enabled);
            }
            if let Some(datavirt) = addons.datavirt.as_ref() {
                let target = &mut self.platform.addons.datavirt;
                overlay_bool(&mut target.enabled, &datavirt.enabled);
                if let Some(resources) = datavirt.resources.as_ref() {
                    overlay_string(&mut target.resources.memory, &resources.memory);
                }
            }
            if let Some(camel) = addons.camel.as_ref() {
                let target = &mut self.platform.addons.camel;
                overlay_bool(&mut target.enabled, &camel.enabled);
                overlay_string(&mut target.camel_version, &camel.camel_version);
                overlay_string(&mut target.runtime_version, &camel.runtime_version);
            }
        }

        if let Some(components) = spec.components.as_ref() {
            if let Some(oauth) = components.oauth.as_ref() {
                overlay_string(&mut self.platform.components.oauth.cookie_secret, &oauth.cookie_secret);
            }
            if let Some(database) = components.database.as_ref() {
                let target = &mut self.platform.components.database;
                overlay_string(&mut target.user, &database.user);
                overlay_string(&mut target.name, &database.name);
                overlay_string(&mut target.url, &database.url);
                overlay_string(&mut target.image_stream_namespace, &database.image_stream_namespace);
                overlay_string(&mut target.password, &database.password);
                overlay_string(&mut target.sampledb_password, &database.sampledb_password);
                overlay_volume_resources(&mut target.resources, &database.resources);
            }
            if let Some(server) = components.server.as_ref() {
                let target = &mut self.platform.components.server;
                overlay_string(&mut target.encrypt_key, &server.encrypt_key);
                overlay_string(&mut target.client_state_authentication_key, &server.client_state_authentication_key);
                overlay_string(&mut target.client_state_encryption_key, &server.client_state_encryption_key);
                if let Some(resources) = server.resources.as_ref() {
                    overlay_string(&mut target.resources.memory, &resources.memory);
                }
            }
        }

        Ok(())
    }

    /// Fills every credential field that is still empty with a freshly
    /// generated alphanumeric value of its designated length. Fields already
    /// populated, by the secret store or by an admin override, are never
    /// touched, which keeps resolution idempotent across passes.
    pub fn generate_secrets<R: Rng>(&mut self, rng: &mut R) {
        fill_secret(rng, &mut self.oauth_client_secret, constants::OAUTH_CLIENT_SECRET_LENGTH);
        let components = &mut self.platform.components;
        fill_secret(rng, &mut components.database.password, constants::DATABASE_PASSWORD_LENGTH);
        fill_secret(rng, &mut components.database.sampledb_password, constants::SAMPLEDB_PASSWORD_LENGTH);
        fill_secret(rng, &mut components.oauth.cookie_secret, constants::OAUTH_COOKIE_SECRET_LENGTH);
        fill_secret(rng, &mut components.server.encrypt_key, constants::SERVER_ENCRYPT_KEY_LENGTH);
        fill_secret(rng, &mut components.server.client_state_authentication_key, constants::CLIENT_STATE_AUTHENTICATION_KEY_LENGTH);
        fill_secret(rng, &mut components.server.client_state_encryption_key, constants::CLIENT_STATE_ENCRYPTION_KEY_LENGTH);
    }
}

/// Runs the whole resolution pipeline for one reconciliation pass: template,
/// environment overlay, custom resource overlay, secret generation and route
/// lookup, in that order. Every stage consumes the previous stage output and
/// a failing stage never hands a partial configuration downstream.
pub async fn resolve_configuration<L: RouteLocator>(
    template_path: &str,
    env: &HashMap<String, String>,
    stitch: &Stitch,
    locator: &L,
) -> Result<Config, Error> {
    let mut config = Config::load_template(template_path)?;
    config.apply_environment(env)?;
    config.apply_custom_resource(stitch)?;
    config.generate_secrets(&mut rand::thread_rng());
    stitch_route::set_route(&mut config, locator, stitch).await?;
    Ok(config)
}

fn string_from_env(env: &HashMap<String, String>, var: &str, field: &mut String) {
    if let Some(value) = env.get(var) {
        if !value.is_empty() {
            *field = value.to_owned();
        }
    }
}

/// Tri-state boolean read: absent leaves the current value, the literal
/// "true" sets true, any other present value sets false.
fn bool_from_env(env: &HashMap<String, String>, var: &str, current: bool) -> bool {
    match env.get(var) {
        Some(value) => value == "true",
        None => current,
    }
}

fn overlay_string(field: &mut String, value: &Option<String>) {
    if let Some(value) = value {
        if !value.is_empty() {
            *field = value.to_owned();
        }
    }
}

fn overlay_bool(field: &mut bool, value: &Option<bool>) {
    if let Some(value) = value {
        *field = *value;
    }
}

fn overlay_i32(field: &mut i32, value: &Option<i32>) {
    if let Some(value) = value {
        *field = *value;
    }
}

fn overlay_map(field: &mut HashMap<String, String>, value: &Option<HashMap<String, String>>) {
    if let Some(value) = value {
        if !value.is_empty() {
            *field = value.clone();
        }
    }
}

fn overlay_volume_resources(target: &mut ResourcesWithVolume, value: &Option<ResourcesSpec>) {
    if let Some(resources) = value {
        overlay_string(&mut target.memory, &resources.memory);
        overlay_string(&mut target.volume_capacity, &resources.volume_capacity);
    }
}

fn fill_secret<R: Rng>(rng: &mut R, field: &mut String, length: usize) {
    if field.is_empty() {
        *field = random_alphanumeric(rng, length);
    }
}

fn random_alphanumeric<R: Rng>(rng: &mut R, length: usize) -> String {
    rng.sample_iter(&Alphanumeric).take(length).map(char::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stitch::{
        AddonToggle, CamelSpec, DatabaseSpec, DatavirtSpec, IntegrationSpec, StitchAddons,
        StitchComponents, StitchSpec, TracingSpec,
    };
    use rand::{rngs::StdRng, SeedableRng};

    fn template_path() -> String {
        format!("{}/conf/template.yaml", env!("CARGO_MANIFEST_DIR"))
    }

    // The template document as a literal, built without the loader
    fn config_literal() -> Config {
        Config {
            product_name: "stitch".to_owned(),
            allow_localhost: false,
            productized: false,
            dev_support: false,
            scheduled: true,
            namespace: "".to_owned(),
            image_stream_namespace: "".to_owned(),
            oauth_client_secret: "".to_owned(),
            route_hostname: "".to_owned(),
            console_url: "".to_owned(),
            platform: PlatformConfig {
                addons: AddonsSpec {
                    tracing: TracingConfiguration {
                        enabled: false,
                        sampler_type: "const".to_owned(),
                        sampler_param: "0".to_owned(),
                    },
                    ops: AddonConfiguration { enabled: false },
                    todo: AddonConfiguration { enabled: false },
                    datavirt: DatavirtConfiguration {
                        enabled: false,
                        image: "docker.io/stitchio/stitch-datavirt:latest".to_owned(),
                        resources: Resources { memory: "1024Mi".to_owned() },
                    },
                    camel: CamelConfiguration {
                        enabled: false,
                        image: "fabric8/s2i-java:3.0-java8".to_owned(),
                        camel_version: "2.21.0".to_owned(),
                        runtime_version: "0.3.4".to_owned(),
                    },
                },
                components: ComponentsSpec {
                    oauth: OauthConfiguration {
                        image: "quay.io/openshift/origin-oauth-proxy:v4.0.0".to_owned(),
                        cookie_secret: "".to_owned(),
                    },
                    ui: UiConfiguration {
                        image: "docker.io/stitchio/stitch-ui:latest".to_owned(),
                    },
                    builder: BuilderConfiguration {
                        image: "docker.io/stitchio/stitch-builder:latest".to_owned(),
                    },
                    server: ServerConfiguration {
                        image: "docker.io/stitchio/stitch-server:latest".to_owned(),
                        resources: Resources { memory: "800Mi".to_owned() },
                        encrypt_key: "".to_owned(),
                        client_state_authentication_key: "".to_owned(),
                        client_state_encryption_key: "".to_owned(),
                        features: ServerFeatures {
                            integration_limit: 0,
                            integration_state_check_interval: 60,
                            demo_data: false,
                            deploy_integrations: true,
                            test_support: false,
                            master_url: "https://localhost:8443".to_owned(),
                            maven_repositories: HashMap::from([
                                (
                                    "central".to_owned(),
                                    "https://repo.maven.apache.org/maven2/".to_owned(),
                                ),
                                (
                                    "ea".to_owned(),
                                    "https://repository.jboss.org/nexus/content/groups/ea/".to_owned(),
                                ),
                            ]),
                        },
                    },
                    meta: MetaConfiguration {
                        image: "docker.io/stitchio/stitch-meta:latest".to_owned(),
                        resources: ResourcesWithVolume {
                            memory: "512Mi".to_owned(),
                            volume_capacity: "1Gi".to_owned(),
                        },
                    },
                    database: DatabaseConfiguration {
                        image: "postgresql:9.6".to_owned(),
                        image_stream_namespace: "openshift".to_owned(),
                        user: "stitch".to_owned(),
                        name: "stitch".to_owned(),
                        url: "postgresql://stitch-db:5432/stitch?sslmode=disable".to_owned(),
                        password: "".to_owned(),
                        sampledb_password: "".to_owned(),
                        exporter: ExporterConfiguration {
                            image: "docker.io/wrouesnel/postgres_exporter:v0.4.7".to_owned(),
                        },
                        resources: ResourcesWithVolume {
                            memory: "255Mi".to_owned(),
                            volume_capacity: "1Gi".to_owned(),
                        },
                    },
                    metrics: MetricsConfiguration {
                        image: "docker.io/prom/prometheus:v2.1.0".to_owned(),
                        resources: ResourcesWithVolume {
                            memory: "512Mi".to_owned(),
                            volume_capacity: "1Gi".to_owned(),
                        },
                    },
                    upgrade: UpgradeConfiguration {
                        image: "docker.io/stitchio/stitch-upgrade:latest".to_owned(),
                        resources: VolumeOnlyResources {
                            volume_capacity: "1Gi".to_owned(),
                        },
                    },
                },
            },
        }
    }

    #[test]
    fn load_template_returns_the_document_values() {
        let config = Config::load_template(&template_path()).unwrap();
        assert_eq!(config, config_literal());
    }

    #[test]
    fn load_template_fails_on_missing_document() {
        let result = Config::load_template("conf/does-not-exist.yaml");
        assert!(matches!(result, Err(Error::Decode(_))));
    }

    #[test]
    fn apply_environment_overrides_every_recognized_variable() {
        // Every variable carries its own name as value, like an admin would
        // override images one by one
        let vars = [
            constants::OAUTH_IMAGE,
            constants::UI_IMAGE,
            constants::BUILDER_IMAGE,
            constants::SERVER_IMAGE,
            constants::META_IMAGE,
            constants::DATABASE_IMAGE,
            constants::DATABASE_NAMESPACE,
            constants::DB_EXPORTER_IMAGE,
            constants::METRICS_IMAGE,
            constants::UPGRADE_IMAGE,
            constants::DATAVIRT_IMAGE,
            constants::CAMEL_IMAGE,
            constants::DEV_SUPPORT,
            constants::TEST_SUPPORT,
            constants::ROUTE_HOSTNAME,
        ];
        let env: HashMap<String, String> =
            vars.iter().map(|var| (var.to_string(), var.to_string())).collect();

        let mut config = config_literal();
        config.dev_support = true;
        config.apply_environment(&env).unwrap();

        let mut want = config_literal();
        want.platform.components.oauth.image = "OAUTH_IMAGE".to_owned();
        want.platform.components.ui.image = "UI_IMAGE".to_owned();
        want.platform.components.builder.image = "BUILDER_IMAGE".to_owned();
        want.platform.components.server.image = "SERVER_IMAGE".to_owned();
        want.platform.components.meta.image = "META_IMAGE".to_owned();
        want.platform.components.database.image = "DATABASE_IMAGE".to_owned();
        want.platform.components.database.image_stream_namespace = "DATABASE_NAMESPACE".to_owned();
        want.platform.components.database.exporter.image = "DB_EXPORTER_IMAGE".to_owned();
        want.platform.components.metrics.image = "METRICS_IMAGE".to_owned();
        want.platform.components.upgrade.image = "UPGRADE_IMAGE".to_owned();
        want.platform.addons.datavirt.image = "DATAVIRT_IMAGE".to_owned();
        want.platform.addons.camel.image = "CAMEL_IMAGE".to_owned();
        want.route_hostname = "ROUTE_HOSTNAME".to_owned();
        // Present but not the literal "true", so both flags read false
        want.dev_support = false;
        want.platform.components.server.features.test_support = false;

        assert_eq!(config, want);
    }

    #[test]
    fn apply_environment_without_variables_is_the_identity() {
        let mut config = config_literal();
        config.apply_environment(&HashMap::new()).unwrap();
        assert_eq!(config, config_literal());
    }

    #[test]
    fn bool_from_env_is_tri_state() {
        let empty: HashMap<String, String> = HashMap::new();
        let set_true = HashMap::from([("EXISTING_ENV".to_owned(), "true".to_owned())]);
        let set_false = HashMap::from([("EXISTING_ENV".to_owned(), "false".to_owned())]);

        assert!(!bool_from_env(&empty, "NOT_EXISTING_ENV", false));
        assert!(bool_from_env(&empty, "NOT_EXISTING_ENV", true));
        assert!(bool_from_env(&set_true, "EXISTING_ENV", true));
        assert!(bool_from_env(&set_true, "EXISTING_ENV", false));
        assert!(!bool_from_env(&set_false, "EXISTING_ENV", true));
        assert!(!bool_from_env(&set_false, "EXISTING_ENV", false));
    }

    #[test]
    fn apply_custom_resource_with_empty_spec_is_the_identity() {
        let stitch = Stitch::new("app", StitchSpec::default());
        let mut config = config_literal();
        config.apply_custom_resource(&stitch).unwrap();
        assert_eq!(config, config_literal());
    }

    #[test]
    fn apply_custom_resource_overrides_present_fields() {
        let stitch = Stitch::new(
            "app",
            StitchSpec {
                image_stream_namespace: Some("overridden".to_owned()),
                demo_data: Some(true),
                integration: Some(IntegrationSpec {
                    limit: Some(5),
                    state_check_interval: Some(120),
                }),
                addons: Some(StitchAddons {
                    tracing: Some(TracingSpec {
                        enabled: Some(true),
                        sampler_type: Some("probabilistic".to_owned()),
                        sampler_param: Some("0.5".to_owned()),
                    }),
                    todo: Some(AddonToggle { enabled: Some(true) }),
                    camel: Some(CamelSpec {
                        enabled: Some(true),
                        camel_version: None,
                        runtime_version: None,
                    }),
                    ..StitchAddons::default()
                }),
                components: Some(StitchComponents {
                    database: Some(DatabaseSpec {
                        user: Some("admin".to_owned()),
                        ..DatabaseSpec::default()
                    }),
                    ..StitchComponents::default()
                }),
                ..StitchSpec::default()
            },
        );

        let mut config = config_literal();
        config.apply_custom_resource(&stitch).unwrap();

        assert_eq!(config.image_stream_namespace, "overridden");
        assert!(config.platform.components.server.features.demo_data);
        assert_eq!(config.platform.components.server.features.integration_limit, 5);
        assert_eq!(config.platform.components.server.features.integration_state_check_interval, 120);
        assert!(config.platform.addons.tracing.enabled);
        assert_eq!(config.platform.addons.tracing.sampler_type, "probabilistic");
        assert_eq!(config.platform.addons.tracing.sampler_param, "0.5");
        assert!(config.platform.addons.todo.enabled);
        assert!(config.platform.addons.camel.enabled);
        assert_eq!(config.platform.components.database.user, "admin");
        // Fields the document does not carry keep their template values
        assert_eq!(config.platform.addons.camel.camel_version, "2.21.0");
        assert_eq!(config.platform.components.database.name, "stitch");
        assert_eq!(config.platform.components.server.image, "docker.io/stitchio/stitch-server:latest");
    }

    #[test]
    fn enabling_one_addon_does_not_perturb_its_siblings() {
        let stitch = Stitch::new(
            "app",
            StitchSpec {
                addons: Some(StitchAddons {
                    datavirt: Some(DatavirtSpec {
                        enabled: Some(true),
                        resources: None,
                    }),
                    ..StitchAddons::default()
                }),
                ..StitchSpec::default()
            },
        );

        let mut config = config_literal();
        config.apply_custom_resource(&stitch).unwrap();

        let mut want = config_literal();
        want.platform.addons.datavirt.enabled = true;
        assert_eq!(config, want);
    }

    #[test]
    fn maven_repositories_are_replaced_wholesale() {
        let mirrors = HashMap::from([("internal".to_owned(), "https://nexus.corp/maven2/".to_owned())]);
        let stitch = Stitch::new(
            "app",
            StitchSpec {
                maven_repositories: Some(mirrors.clone()),
                ..StitchSpec::default()
            },
        );

        let mut config = config_literal();
        config.apply_custom_resource(&stitch).unwrap();
        assert_eq!(config.platform.components.server.features.maven_repositories, mirrors);
    }

    #[test]
    fn generate_secrets_fills_empty_fields_with_designated_lengths() {
        let mut config = Config::default();
        config.generate_secrets(&mut StdRng::seed_from_u64(7));

        assert_eq!(config.oauth_client_secret.len(), 64);
        assert_eq!(config.platform.components.database.password.len(), 16);
        assert_eq!(config.platform.components.database.sampledb_password.len(), 16);
        assert_eq!(config.platform.components.oauth.cookie_secret.len(), 32);
        assert_eq!(config.platform.components.server.encrypt_key.len(), 64);
        assert_eq!(config.platform.components.server.client_state_authentication_key.len(), 32);
        assert_eq!(config.platform.components.server.client_state_encryption_key.len(), 32);
        assert!(config
            .oauth_client_secret
            .chars()
            .all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn generate_secrets_never_touches_populated_fields() {
        let mut config = Config::default();
        config.oauth_client_secret = "swer".to_owned();
        config.platform.components.oauth.cookie_secret = "qwerqwer".to_owned();
        config.platform.components.database.password = "1234qwer".to_owned();
        config.platform.components.database.sampledb_password = "12ed".to_owned();
        config.platform.components.server.encrypt_key = "poyotu".to_owned();
        config.platform.components.server.client_state_authentication_key = "pogkth".to_owned();
        config.platform.components.server.client_state_encryption_key = "12".to_owned();

        config.generate_secrets(&mut StdRng::seed_from_u64(7));

        assert_eq!(config.oauth_client_secret, "swer");
        assert_eq!(config.platform.components.oauth.cookie_secret, "qwerqwer");
        assert_eq!(config.platform.components.database.password, "1234qwer");
        assert_eq!(config.platform.components.database.sampledb_password, "12ed");
        assert_eq!(config.platform.components.server.encrypt_key, "poyotu");
        assert_eq!(config.platform.components.server.client_state_authentication_key, "pogkth");
        assert_eq!(config.platform.components.server.client_state_encryption_key, "12");
    }

    #[test]
    fn generate_secrets_is_idempotent() {
        let mut config = Config::default();
        config.generate_secrets(&mut StdRng::seed_from_u64(7));
        let first = config.clone();
        // A different RNG stream must not matter, nothing is empty anymore
        config.generate_secrets(&mut StdRng::seed_from_u64(13));
        assert_eq!(config, first);
    }

    #[tokio::test]
    async fn resolved_secrets_survive_a_second_pipeline_pass() {
        struct StaticHost;
        impl RouteLocator for StaticHost {
            async fn route_host(&self, _namespace: &str, _name: &str) -> Result<Option<String>, Error> {
                Ok(Some("stitch.apps.example.com".to_owned()))
            }
        }

        let first = resolve_configuration(
            &template_path(),
            &HashMap::new(),
            &Stitch::new("app", StitchSpec::default()),
            &StaticHost,
        )
        .await
        .unwrap();
        assert_eq!(first.platform.components.database.password.len(), 16);

        // The caller persisted the generated secrets and supplies them back
        // through the custom resource on the next pass
        let replayed = Stitch::new(
            "app",
            StitchSpec {
                oauth_client_secret: Some(first.oauth_client_secret.clone()),
                components: Some(StitchComponents {
                    oauth: Some(crate::stitch::OauthSpec {
                        cookie_secret: Some(first.platform.components.oauth.cookie_secret.clone()),
                    }),
                    database: Some(DatabaseSpec {
                        password: Some(first.platform.components.database.password.clone()),
                        sampledb_password: Some(first.platform.components.database.sampledb_password.clone()),
                        ..DatabaseSpec::default()
                    }),
                    server: Some(crate::stitch::ServerSpec {
                        encrypt_key: Some(first.platform.components.server.encrypt_key.clone()),
                        client_state_authentication_key: Some(
                            first.platform.components.server.client_state_authentication_key.clone(),
                        ),
                        client_state_encryption_key: Some(
                            first.platform.components.server.client_state_encryption_key.clone(),
                        ),
                        resources: None,
                    }),
                }),
                ..StitchSpec::default()
            },
        );

        let second =
            resolve_configuration(&template_path(), &HashMap::new(), &replayed, &StaticHost)
                .await
                .unwrap();

        assert_eq!(second.oauth_client_secret, first.oauth_client_secret);
        assert_eq!(second.platform.components.database.password, first.platform.components.database.password);
        assert_eq!(
            second.platform.components.database.sampledb_password,
            first.platform.components.database.sampledb_password
        );
        assert_eq!(
            second.platform.components.oauth.cookie_secret,
            first.platform.components.oauth.cookie_secret
        );
        assert_eq!(second.platform.components.server.encrypt_key, first.platform.components.server.encrypt_key);
        assert_eq!(
            second.platform.components.server.client_state_authentication_key,
            first.platform.components.server.client_state_authentication_key
        );
        assert_eq!(
            second.platform.components.server.client_state_encryption_key,
            first.platform.components.server.client_state_encryption_key
        );
    }

    #[tokio::test]
    async fn custom_resource_wins_over_template_and_environment() {
        struct StaticHost;
        impl RouteLocator for StaticHost {
            async fn route_host(&self, _namespace: &str, _name: &str) -> Result<Option<String>, Error> {
                Ok(Some("unused.example.com".to_owned()))
            }
        }

        let env = HashMap::from([(
            constants::ROUTE_HOSTNAME.to_owned(),
            "env.example.com".to_owned(),
        )]);
        let stitch = Stitch::new(
            "app",
            StitchSpec {
                route_hostname: Some("admin.example.com".to_owned()),
                ..StitchSpec::default()
            },
        );

        let config = resolve_configuration(&template_path(), &env, &stitch, &StaticHost)
            .await
            .unwrap();
        assert_eq!(config.route_hostname, "admin.example.com");
    }
}
