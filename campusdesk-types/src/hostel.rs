use crate::StudentId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Occupancy status of a hostel room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomStatus {
    Available,
    Occupied,
    Full,
    Maintenance,
}

impl RoomStatus {
    /// The status implied by occupancy alone.
    #[must_use]
    pub fn derive(occupants: usize, capacity: u32) -> Self {
        if occupants == 0 {
            Self::Available
        } else if occupants >= capacity as usize {
            Self::Full
        } else {
            Self::Occupied
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Occupied => "Occupied",
            Self::Full => "Full",
            Self::Maintenance => "Maintenance",
        }
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoomStatus {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "available" => Ok(Self::Available),
            "occupied" => Ok(Self::Occupied),
            "full" => Ok(Self::Full),
            "maintenance" => Ok(Self::Maintenance),
            _ => Err(crate::Error::UnknownVariant {
                kind: "room status",
                value: s.to_string(),
            }),
        }
    }
}

/// A hostel room.
///
/// `status` is stored, not computed. It is re-derived from occupancy only
/// when an update touches occupants or capacity without naming a status
/// (see [`HostelRoomUpdate::apply_to`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostelRoom {
    pub id: String,
    pub building: String,
    pub floor: i32,
    pub room_number: String,
    pub capacity: u32,
    #[serde(default)]
    pub occupants: Vec<StudentId>,
    pub status: RoomStatus,
}

impl HostelRoom {
    /// Free beds left.
    #[must_use]
    pub fn vacancies(&self) -> usize {
        (self.capacity as usize).saturating_sub(self.occupants.len())
    }

    #[must_use]
    pub fn is_at_capacity(&self) -> bool {
        self.occupants.len() >= self.capacity as usize
    }

    #[must_use]
    pub fn has_occupant(&self, student_id: &StudentId) -> bool {
        self.occupants.contains(student_id)
    }
}

/// A partial update to a hostel room.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostelRoomUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub building: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floor: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupants: Option<Vec<StudentId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RoomStatus>,
}

impl HostelRoomUpdate {
    /// Update that only sets the status.
    #[must_use]
    pub fn status(status: RoomStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Update that only replaces the occupant list.
    #[must_use]
    pub fn occupants(occupants: Vec<StudentId>) -> Self {
        Self {
            occupants: Some(occupants),
            ..Default::default()
        }
    }

    /// Merges this update into `room`.
    ///
    /// An explicit status always wins. Otherwise, if occupants or capacity
    /// change, the status is re-derived from occupancy unless the room is
    /// under maintenance. Returns an error message, leaving `room`
    /// untouched, if the result would hold more occupants than beds.
    pub fn apply_to(&self, room: &mut HostelRoom) -> Result<(), String> {
        let capacity = self.capacity.unwrap_or(room.capacity);
        let occupant_count = self
            .occupants
            .as_ref()
            .map_or(room.occupants.len(), Vec::len);
        if capacity == 0 {
            return Err(format!("room {} capacity must be positive", room.id));
        }
        if occupant_count > capacity as usize {
            return Err(format!(
                "room {} would hold {occupant_count} occupants but has {capacity} beds",
                room.id
            ));
        }

        if let Some(v) = &self.building {
            room.building.clone_from(v);
        }
        if let Some(v) = self.floor {
            room.floor = v;
        }
        if let Some(v) = &self.room_number {
            room.room_number.clone_from(v);
        }
        room.capacity = capacity;
        if let Some(v) = &self.occupants {
            room.occupants.clone_from(v);
        }

        if let Some(status) = self.status {
            room.status = status;
        } else if (self.occupants.is_some() || self.capacity.is_some())
            && room.status != RoomStatus::Maintenance
        {
            room.status = RoomStatus::derive(room.occupants.len(), room.capacity);
        }
        Ok(())
    }
}
