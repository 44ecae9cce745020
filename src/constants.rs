// Operator Constants
pub const RECONCILE_FREQUENCY: u64 = 60;
pub const RECONCILE_FREQUENCY_ROUTE_MISSING: u64 = 15;
pub const OPERATOR_ENVIRONMENT: &str = "OPERATOR_ENVIRONMENT";

// Configuration template document
pub const TEMPLATE_PATH_PRODUCTION: &str = "/app/conf/template.yaml";
pub const TEMPLATE_PATH_DEVELOPMENT: &str = "conf/template.yaml";

// Name of the public facing service and of its route
pub const ROUTE_NAME: &str = "stitch";

// Image overrides
pub const OAUTH_IMAGE: &str = "OAUTH_IMAGE";
pub const UI_IMAGE: &str = "UI_IMAGE";
pub const BUILDER_IMAGE: &str = "BUILDER_IMAGE";
pub const SERVER_IMAGE: &str = "SERVER_IMAGE";
pub const META_IMAGE: &str = "META_IMAGE";
pub const DATABASE_IMAGE: &str = "DATABASE_IMAGE";
pub const DATABASE_NAMESPACE: &str = "DATABASE_NAMESPACE";
pub const DB_EXPORTER_IMAGE: &str = "DB_EXPORTER_IMAGE";
pub const METRICS_IMAGE: &str = "METRICS_IMAGE";
pub const UPGRADE_IMAGE: &str = "UPGRADE_IMAGE";
pub const DATAVIRT_IMAGE: &str = "DATAVIRT_IMAGE";
pub const CAMEL_IMAGE: &str = "CAMEL_IMAGE";

// Addon runtime overrides
pub const CAMEL_VERSION: &str = "CAMEL_VERSION";
pub const CAMEL_RUNTIME_VERSION: &str = "CAMEL_RUNTIME_VERSION";

// Feature flags
pub const DEV_SUPPORT: &str = "DEV_SUPPORT";
pub const TEST_SUPPORT: &str = "TEST_SUPPORT";

// Cluster placement
pub const ROUTE_HOSTNAME: &str = "ROUTE_HOSTNAME";

// Generated secret lengths
pub const OAUTH_CLIENT_SECRET_LENGTH: usize = 64;
pub const DATABASE_PASSWORD_LENGTH: usize = 16;
pub const SAMPLEDB_PASSWORD_LENGTH: usize = 16;
pub const OAUTH_COOKIE_SECRET_LENGTH: usize = 32;
pub const SERVER_ENCRYPT_KEY_LENGTH: usize = 64;
pub const CLIENT_STATE_AUTHENTICATION_KEY_LENGTH: usize = 32;
pub const CLIENT_STATE_ENCRYPTION_KEY_LENGTH: usize = 32;
