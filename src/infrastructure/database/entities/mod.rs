pub mod client;
pub mod destination;
pub mod equipment;
pub mod equipment_type;
pub mod pricing_policy;
pub mod reservation;
pub mod reservation_history;
pub mod reservation_line;
