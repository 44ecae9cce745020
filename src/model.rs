/// All errors possible to occur during reconciliation
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Any error originating from the `kube-rs` crate
    #[error("Kubernetes reported error: {source}")]
    KubeError {
        #[from]
        source: kube::Error,
    },

    /// The configuration template or the custom resource carries a value of
    /// the wrong structural shape, or the template document cannot be read.
    /// Unrecoverable for the current pass.
    #[error("Could not decode configuration: {0}")]
    Decode(String),

    /// The installation route does not exist in the cluster yet. Expected
    /// early in an installation lifecycle, the reconciler retries later.
    #[error("No route found for installation: {0}")]
    RouteNotFound(String),
}

impl From<serde_yaml::Error> for Error {
    fn from(error: serde_yaml::Error) -> Self {
        Error::Decode(error.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::Decode(error.to_string())
    }
}
