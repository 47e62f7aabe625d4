//! Tourist destination entity
//!
//! Read-only from the reservation engine's perspective; managed by catalog
//! administration.

#[derive(Debug, Clone)]
pub struct Destination {
    pub id: i64,
    pub name: String,
    pub region: String,
    /// Maximum concurrent bookings, None = unlimited
    pub max_capacity: Option<i32>,
}

impl Destination {
    pub fn new(id: i64, name: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            region: region.into(),
            max_capacity: None,
        }
    }
}
