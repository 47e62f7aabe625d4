//! Reservation domain entity and lifecycle state machine

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::domain::{DomainError, DomainResult};

/// Reservation lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReservationState {
    /// Created, awaiting confirmation
    Pending,
    /// Confirmed by the operator
    Confirmed,
    /// Rental period underway
    InProgress,
    /// Rental period over; terminal
    Finished,
    /// Called off; terminal
    Cancelled,
}

impl ReservationState {
    /// States that still block equipment availability
    pub const ACTIVE: [ReservationState; 3] = [Self::Pending, Self::Confirmed, Self::InProgress];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::InProgress => "IN_PROGRESS",
            Self::Finished => "FINISHED",
            Self::Cancelled => "CANCELLED",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "PENDING" => Self::Pending,
            "CONFIRMED" => Self::Confirmed,
            "IN_PROGRESS" => Self::InProgress,
            "FINISHED" => Self::Finished,
            _ => Self::Cancelled,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Cancelled)
    }

    pub fn blocks_availability(&self) -> bool {
        Self::ACTIVE.contains(self)
    }
}

impl std::fmt::Display for ReservationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Inclusive interval-intersection test used by every overlap check.
pub fn dates_overlap(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> bool {
    a_start <= b_end && a_end >= b_start
}

/// One equipment item inside a reservation.
///
/// The unit price is frozen at booking time; later catalog price changes do
/// not touch existing bookings.
#[derive(Debug, Clone)]
pub struct ReservationLine {
    pub id: i64,
    pub reservation_id: i64,
    pub equipment_id: i64,
    pub unit_price: Decimal,
}

/// Priced totals for a reservation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceBreakdown {
    pub subtotal: Decimal,
    pub discounts: Decimal,
    pub surcharges: Decimal,
    pub taxes: Decimal,
    pub total: Decimal,
}

impl PriceBreakdown {
    pub fn zero() -> Self {
        Self {
            subtotal: Decimal::ZERO,
            discounts: Decimal::ZERO,
            surcharges: Decimal::ZERO,
            taxes: Decimal::ZERO,
            total: Decimal::ZERO,
        }
    }
}

/// Equipment rental booking
#[derive(Debug, Clone)]
pub struct Reservation {
    pub id: i64,
    pub client_id: i64,
    pub destination_id: i64,
    /// Rental period, end date inclusive
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub state: ReservationState,
    pub created_at: DateTime<Utc>,
    pub subtotal: Decimal,
    pub discounts: Decimal,
    pub surcharges: Decimal,
    pub taxes: Decimal,
    pub total: Decimal,
    pub lines: Vec<ReservationLine>,
}

impl Reservation {
    pub fn new(
        id: i64,
        client_id: i64,
        destination_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            client_id,
            destination_id,
            start_date,
            end_date,
            state: ReservationState::Pending,
            created_at,
            subtotal: Decimal::ZERO,
            discounts: Decimal::ZERO,
            surcharges: Decimal::ZERO,
            taxes: Decimal::ZERO,
            total: Decimal::ZERO,
            lines: Vec::new(),
        }
    }

    /// Inclusive rental length in days: (end - start) + 1
    pub fn rental_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// Sum of line unit prices; flat per-booking, no day proration
    pub fn subtotal_of_lines(&self) -> Decimal {
        self.lines.iter().map(|line| line.unit_price).sum()
    }

    pub fn apply_pricing(&mut self, breakdown: &PriceBreakdown) {
        self.subtotal = breakdown.subtotal;
        self.discounts = breakdown.discounts;
        self.surcharges = breakdown.surcharges;
        self.taxes = breakdown.taxes;
        self.total = breakdown.total;
    }

    /// Confirm; only legal from Pending
    pub fn confirm(&mut self) -> DomainResult<()> {
        if self.state != ReservationState::Pending {
            return Err(DomainError::IllegalTransition {
                from: self.state,
                action: "confirm",
            });
        }
        self.state = ReservationState::Confirmed;
        Ok(())
    }

    /// Cancel; illegal once Finished or already Cancelled
    pub fn cancel(&mut self) -> DomainResult<()> {
        if self.state.is_terminal() {
            return Err(DomainError::IllegalTransition {
                from: self.state,
                action: "cancel",
            });
        }
        self.state = ReservationState::Cancelled;
        Ok(())
    }

    /// Gate for Modify: terminal reservations are immutable
    pub fn ensure_modifiable(&self) -> DomainResult<()> {
        if self.state.is_terminal() {
            return Err(DomainError::IllegalTransition {
                from: self.state,
                action: "modify",
            });
        }
        Ok(())
    }

    /// Sweep target for a given day, if any.
    ///
    /// Confirmed moves to InProgress while today is inside [start, end);
    /// Confirmed or InProgress moves to Finished once today reaches the end
    /// date. Returns None when the current state already matches, which is
    /// what makes the sweep idempotent.
    pub fn sweep_target(&self, today: NaiveDate) -> Option<ReservationState> {
        if !matches!(
            self.state,
            ReservationState::Confirmed | ReservationState::InProgress
        ) {
            return None;
        }
        if today >= self.end_date {
            return Some(ReservationState::Finished);
        }
        if today >= self.start_date && self.state == ReservationState::Confirmed {
            return Some(ReservationState::InProgress);
        }
        None
    }
}

/// Audit trail entry for a lifecycle transition. Append-only.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub id: i64,
    pub reservation_id: i64,
    /// None for the creation entry
    pub previous: Option<ReservationState>,
    pub new_state: ReservationState,
    pub actor: String,
    pub note: String,
    pub changed_at: DateTime<Utc>,
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_reservation() -> Reservation {
        Reservation::new(1, 1, 1, date(2026, 9, 1), date(2026, 9, 7), Utc::now())
    }

    #[test]
    fn new_reservation_is_pending() {
        let r = sample_reservation();
        assert_eq!(r.state, ReservationState::Pending);
        assert!(r.state.blocks_availability());
    }

    #[test]
    fn rental_days_is_inclusive() {
        let r = sample_reservation();
        assert_eq!(r.rental_days(), 7);

        let one_day = Reservation::new(2, 1, 1, date(2026, 9, 1), date(2026, 9, 1), Utc::now());
        assert_eq!(one_day.rental_days(), 1);
    }

    #[test]
    fn confirm_only_from_pending() {
        let mut r = sample_reservation();
        r.confirm().unwrap();
        assert_eq!(r.state, ReservationState::Confirmed);

        let err = r.confirm().unwrap_err();
        assert!(matches!(
            err,
            DomainError::IllegalTransition {
                from: ReservationState::Confirmed,
                action: "confirm",
            }
        ));
    }

    #[test]
    fn cancel_from_any_active_state() {
        for state in ReservationState::ACTIVE {
            let mut r = sample_reservation();
            r.state = state;
            r.cancel().unwrap();
            assert_eq!(r.state, ReservationState::Cancelled);
        }
    }

    #[test]
    fn cancel_from_terminal_is_illegal() {
        for state in [ReservationState::Finished, ReservationState::Cancelled] {
            let mut r = sample_reservation();
            r.state = state;
            assert!(matches!(
                r.cancel().unwrap_err(),
                DomainError::IllegalTransition { .. }
            ));
        }
    }

    #[test]
    fn modify_gate_rejects_terminal() {
        let mut r = sample_reservation();
        r.ensure_modifiable().unwrap();
        r.state = ReservationState::Finished;
        assert!(r.ensure_modifiable().is_err());
    }

    #[test]
    fn overlap_test_matches_interval_intersection() {
        let (s, e) = (date(2026, 9, 5), date(2026, 9, 10));
        assert!(dates_overlap(s, e, date(2026, 9, 10), date(2026, 9, 12)));
        assert!(dates_overlap(s, e, date(2026, 9, 1), date(2026, 9, 5)));
        assert!(dates_overlap(s, e, date(2026, 9, 6), date(2026, 9, 8)));
        assert!(dates_overlap(s, e, date(2026, 9, 1), date(2026, 9, 30)));
        assert!(!dates_overlap(s, e, date(2026, 9, 11), date(2026, 9, 12)));
        assert!(!dates_overlap(s, e, date(2026, 9, 1), date(2026, 9, 4)));
    }

    #[test]
    fn sweep_target_progression() {
        let mut r = sample_reservation();
        r.state = ReservationState::Confirmed;

        // before the start date nothing happens
        assert_eq!(r.sweep_target(date(2026, 8, 31)), None);
        // inside [start, end) a confirmed booking starts
        assert_eq!(
            r.sweep_target(date(2026, 9, 1)),
            Some(ReservationState::InProgress)
        );
        // at the end date it finishes, from either state
        assert_eq!(
            r.sweep_target(date(2026, 9, 7)),
            Some(ReservationState::Finished)
        );
        r.state = ReservationState::InProgress;
        assert_eq!(
            r.sweep_target(date(2026, 9, 9)),
            Some(ReservationState::Finished)
        );
    }

    #[test]
    fn sweep_target_ignores_pending_and_terminal() {
        for state in [
            ReservationState::Pending,
            ReservationState::Finished,
            ReservationState::Cancelled,
        ] {
            let mut r = sample_reservation();
            r.state = state;
            assert_eq!(r.sweep_target(date(2026, 9, 9)), None);
        }
    }

    #[test]
    fn sweep_target_is_idempotent() {
        let mut r = sample_reservation();
        r.state = ReservationState::InProgress;
        // already in progress mid-rental: nothing to do
        assert_eq!(r.sweep_target(date(2026, 9, 3)), None);
    }

    #[test]
    fn apply_pricing_copies_breakdown() {
        let mut r = sample_reservation();
        let quote = PriceBreakdown {
            subtotal: "1000".parse().unwrap(),
            discounts: "100".parse().unwrap(),
            surcharges: "50".parse().unwrap(),
            taxes: "80".parse().unwrap(),
            total: "1030".parse().unwrap(),
        };
        r.apply_pricing(&quote);
        assert_eq!(r.total, quote.total);
        assert_eq!(r.subtotal - r.discounts + r.surcharges + r.taxes, r.total);
    }
}
