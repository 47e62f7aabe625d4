//! Sports equipment catalog entities

use rust_decimal::Decimal;

/// Equipment category (surfboard, kayak, mountain bike, ...)
#[derive(Debug, Clone)]
pub struct EquipmentType {
    pub id: i64,
    pub name: String,
}

/// A physical rental item stationed at a destination
#[derive(Debug, Clone)]
pub struct Equipment {
    pub id: i64,
    pub name: String,
    pub type_id: i64,
    /// Destination the item belongs to
    pub destination_id: i64,
    /// Flat per-booking rental price, frozen into lines at booking time
    pub rental_price: Decimal,
    /// General availability flag; false takes the item out of circulation
    /// regardless of bookings
    pub available: bool,
    /// How many reservations have included this item
    pub usage_count: i64,
}

impl Equipment {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        type_id: i64,
        destination_id: i64,
        rental_price: Decimal,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            type_id,
            destination_id,
            rental_price,
            available: true,
            usage_count: 0,
        }
    }
}
