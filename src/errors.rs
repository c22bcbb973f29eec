use lb_api::ApiError;
use thiserror::Error;

/// Boxed error from a [`lb_api::LoadBalancerApi`] implementation
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Error connecting to OpenStack: {0}")]
    Connection(#[source] ApiError),

    #[error("Failed to list load balancers: {0}")]
    ListLoadBalancers(#[source] BoxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn is_connection(&self) -> bool {
        matches!(self, CliError::Connection(_))
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
