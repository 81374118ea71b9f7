use serde::{Deserialize, Serialize};
use std::fmt;

/// The entity collections owned by the data layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectionKind {
    Students,
    Payments,
    HostelRooms,
    Exams,
}

impl CollectionKind {
    pub const ALL: [CollectionKind; 4] = [
        Self::Students,
        Self::Payments,
        Self::HostelRooms,
        Self::Exams,
    ];

    /// Key under which the collection snapshot is stored locally.
    #[must_use]
    pub const fn storage_key(self) -> &'static str {
        match self {
            Self::Students => "students",
            Self::Payments => "payments",
            Self::HostelRooms => "hostelRooms",
            Self::Exams => "exams",
        }
    }

    /// Whether the collection is fetched from and written to the remote
    /// backend in remote-backed mode. Exams are locally-only: they are
    /// never fetched remotely, even when a backend is configured.
    #[must_use]
    pub const fn is_remote_backed(self) -> bool {
        !matches!(self, Self::Exams)
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.storage_key())
    }
}
