//! Tagged results for mutations.

/// What to do when the remote leg of a mutation fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// Apply the change to the in-memory store anyway so the session keeps
    /// it (not persisted; lost on restart).
    #[default]
    ApplyLocally,
    /// Leave the store untouched and report the remote error.
    Skip,
}

/// Result of a single remote write attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteWrite<T> {
    Ok(T),
    RemoteError(String),
}

/// How a mutation ended. Mutations never return `Err`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome<T> {
    /// Applied directly to the store (local-only mode, or a change with no
    /// remote counterpart).
    Applied(T),
    /// Accepted by the remote backend and reconciled by a refresh. The
    /// value is the backend's representation.
    Synced(T),
    /// The remote write failed and the change was applied locally instead.
    FallbackApplied { value: T, reason: String },
    /// The remote write failed and, per [`FallbackPolicy::Skip`], nothing
    /// was applied.
    RemoteError { reason: String },
    /// Refused before anything changed (unknown target, broken invariant).
    Rejected { reason: String },
}

impl<T> MutationOutcome<T> {
    /// The resulting value, if the change took effect anywhere.
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Applied(v) | Self::Synced(v) | Self::FallbackApplied { value: v, .. } => Some(v),
            Self::RemoteError { .. } | Self::Rejected { .. } => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Applied(v) | Self::Synced(v) | Self::FallbackApplied { value: v, .. } => Some(v),
            Self::RemoteError { .. } | Self::Rejected { .. } => None,
        }
    }

    /// True if the change is visible in the store.
    pub fn is_applied(&self) -> bool {
        self.value().is_some()
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::FallbackApplied { .. })
    }

    /// The failure or rejection reason, if any.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::FallbackApplied { reason, .. }
            | Self::RemoteError { reason }
            | Self::Rejected { reason } => Some(reason),
            Self::Applied(_) | Self::Synced(_) => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> MutationOutcome<U> {
        match self {
            Self::Applied(v) => MutationOutcome::Applied(f(v)),
            Self::Synced(v) => MutationOutcome::Synced(f(v)),
            Self::FallbackApplied { value, reason } => MutationOutcome::FallbackApplied {
                value: f(value),
                reason,
            },
            Self::RemoteError { reason } => MutationOutcome::RemoteError { reason },
            Self::Rejected { reason } => MutationOutcome::Rejected { reason },
        }
    }
}
