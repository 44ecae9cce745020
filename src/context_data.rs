use std::{env, sync::Arc};
use tokio::sync::RwLock;

use kube::{
    runtime::events::{Recorder, Reporter},
    Client, Resource,
};

use crate::{constants, stitch::Stitch};

#[derive(Clone)]
pub struct ContextData {
    /// Kubernetes client to make Kubernetes API requests with. Required for K8S resource management.
    pub client: Client,
    /// In memory state
    pub state: Arc<RwLock<State>>,
    /// Path of the base configuration document, resolved once at startup
    pub template_path: String,
}

impl ContextData {
    // Create a Controller Context that can update State
    pub fn new(client: Client) -> Self {
        let operator_environment = env::var(constants::OPERATOR_ENVIRONMENT)
            .unwrap_or_else(|_| "production".to_owned());
        let template_path = if operator_environment.eq("production") {
            constants::TEMPLATE_PATH_PRODUCTION.to_owned()
        } else {
            let current_dir = env::current_dir().expect("Could not determine working directory.");
            format!("{}/{}", current_dir.display(), constants::TEMPLATE_PATH_DEVELOPMENT)
        };

        ContextData {
            client,
            state: Arc::new(RwLock::new(State::default())),
            template_path,
        }
    }
}

/// State wrapper around the controller outputs
pub struct State {
    pub reporter: Reporter,
}

impl Default for State {
    fn default() -> Self {
        Self {
            reporter: Reporter::from("stitch-operator-controller"),
        }
    }
}

impl State {
    pub fn generate_stitch_event(&self, client: Client, stitch: &Stitch) -> Recorder {
        Recorder::new(client, self.reporter.clone(), stitch.object_ref(&()))
    }
}
