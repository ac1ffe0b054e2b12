use crate::registry::SystemKey;

/// Errors that can occur while managing systems.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EcsError {
    #[error("no system registered for key '{0}'")]
    UnknownSystem(SystemKey),
}
