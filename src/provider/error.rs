//! Error taxonomy shared by every cloud provider backend.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Optional provider operations that a backend may decline to implement.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Capability {
    /// Node and pod pricing.
    Pricing,
    /// Enumeration of machine types that can back a new node group.
    MachineTypes,
    /// Creation of node groups that do not yet exist on the backend.
    NewNodeGroup,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pricing => "pricing",
            Self::MachineTypes => "machine type listing",
            Self::NewNodeGroup => "node group creation",
        };
        f.write_str(label)
    }
}

/// Coarse classification used by callers to decide how to react to an error.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorKind {
    /// Provider could not be built; start-up must abort.
    Construction,
    /// The backend does not offer the requested optional operation.
    CapabilityUnsupported,
    /// A cache entry violates an invariant.
    DataIntegrity,
    /// The backend could not be reached or refreshed; retry next tick.
    Refresh,
    /// A handle refers to a node group that is no longer cached.
    NotFound,
    /// Releasing backend resources failed.
    Cleanup,
}

/// Errors surfaced by cloud providers, node groups, and managers.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ProviderError {
    /// Raised while building a provider; never returned afterwards.
    #[error("failed to build cloud provider: {reason}")]
    Construction {
        /// Description of what made construction fail.
        reason: String,
    },
    /// Raised by optional operations the backend does not implement.
    #[error("{capability} is not implemented by this cloud provider")]
    Unsupported {
        /// Operation that was requested.
        capability: Capability,
    },
    /// Raised when a cached node has no pool assignment.
    #[error("missing node pool name for node {node_name} ({node_id})")]
    DataIntegrity {
        /// Kubernetes node name.
        node_name: String,
        /// Backend node identifier.
        node_id: String,
    },
    /// Raised when pulling fresh state from the backend fails.
    #[error("failed to refresh backend state: {message}")]
    Refresh {
        /// Message reported by the backend client.
        message: String,
    },
    /// Raised when a backend operation exceeds its time budget.
    #[error("timed out after {after:?} waiting for {operation}")]
    Timeout {
        /// Operation that was cut short.
        operation: Operation,
        /// Budget that was exceeded.
        after: Duration,
    },
    /// Raised when a node group handle outlives its cached pool.
    #[error("node group {id} is not present in the cache")]
    UnknownNodeGroup {
        /// Identifier carried by the stale handle.
        id: String,
    },
    /// Raised when releasing backend resources fails.
    #[error("failed to clean up cloud provider: {message}")]
    Cleanup {
        /// Message reported by the backend client.
        message: String,
    },
}

/// Backend operations that run under a timeout.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Operation {
    /// Pulling pools and nodes from the backend.
    Refresh,
    /// Releasing backend connections.
    Cleanup,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Refresh => "refresh",
            Self::Cleanup => "cleanup",
        })
    }
}

impl ProviderError {
    /// Builds the shared signal for an unimplemented optional operation.
    #[must_use]
    pub const fn unsupported(capability: Capability) -> Self {
        Self::Unsupported { capability }
    }

    /// Builds a construction error from any displayable cause.
    #[must_use]
    pub fn construction(reason: impl fmt::Display) -> Self {
        Self::Construction {
            reason: reason.to_string(),
        }
    }

    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Construction { .. } => ErrorKind::Construction,
            Self::Unsupported { .. } => ErrorKind::CapabilityUnsupported,
            Self::DataIntegrity { .. } => ErrorKind::DataIntegrity,
            Self::Refresh { .. }
            | Self::Timeout {
                operation: Operation::Refresh,
                ..
            } => ErrorKind::Refresh,
            Self::UnknownNodeGroup { .. } => ErrorKind::NotFound,
            Self::Cleanup { .. }
            | Self::Timeout {
                operation: Operation::Cleanup,
                ..
            } => ErrorKind::Cleanup,
        }
    }

    /// Reports whether this is the unsupported-capability signal.
    #[must_use]
    pub const fn is_unsupported(&self) -> bool {
        matches!(self.kind(), ErrorKind::CapabilityUnsupported)
    }
}
