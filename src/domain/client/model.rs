//! Client domain entity

/// Loyalty tier derived from the client's booking record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LoyaltyTier {
    Bronze,
    Silver,
    Gold,
}

impl LoyaltyTier {
    /// Tier for a given count of non-cancelled reservations.
    ///
    /// Bronze below 5, Silver from 5, Gold from 10.
    pub fn for_count(count: i64) -> Self {
        if count >= 10 {
            Self::Gold
        } else if count >= 5 {
            Self::Silver
        } else {
            Self::Bronze
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bronze => "BRONZE",
            Self::Silver => "SILVER",
            Self::Gold => "GOLD",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "GOLD" => Self::Gold,
            "SILVER" => Self::Silver,
            _ => Self::Bronze,
        }
    }
}

impl std::fmt::Display for LoyaltyTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Rental client
#[derive(Debug, Clone)]
pub struct Client {
    pub id: i64,
    pub name: String,
    /// Identity document number, unique per client
    pub document: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Count of non-cancelled reservations, kept in sync with the store
    pub reservation_count: i64,
    pub tier: LoyaltyTier,
}

impl Client {
    pub fn new(id: i64, name: impl Into<String>, document: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            document: document.into(),
            email: None,
            phone: None,
            reservation_count: 0,
            tier: LoyaltyTier::Bronze,
        }
    }

    /// Set the reservation count and re-derive the tier from it.
    ///
    /// The tier is never written independently of the count.
    pub fn set_reservation_count(&mut self, count: i64) {
        self.reservation_count = count;
        self.tier = LoyaltyTier::for_count(count);
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_boundaries() {
        assert_eq!(LoyaltyTier::for_count(0), LoyaltyTier::Bronze);
        assert_eq!(LoyaltyTier::for_count(4), LoyaltyTier::Bronze);
        assert_eq!(LoyaltyTier::for_count(5), LoyaltyTier::Silver);
        assert_eq!(LoyaltyTier::for_count(9), LoyaltyTier::Silver);
        assert_eq!(LoyaltyTier::for_count(10), LoyaltyTier::Gold);
        assert_eq!(LoyaltyTier::for_count(1000), LoyaltyTier::Gold);
    }

    #[test]
    fn tier_is_monotonic() {
        let mut previous = LoyaltyTier::for_count(0);
        for count in 1..30 {
            let tier = LoyaltyTier::for_count(count);
            assert!(tier >= previous, "tier dropped at count {}", count);
            previous = tier;
        }
    }

    #[test]
    fn tier_display_roundtrip() {
        for tier in &[LoyaltyTier::Bronze, LoyaltyTier::Silver, LoyaltyTier::Gold] {
            assert_eq!(&LoyaltyTier::from_str(tier.as_str()), tier);
        }
    }

    #[test]
    fn unknown_tier_defaults_to_bronze() {
        assert_eq!(LoyaltyTier::from_str("PLATINUM"), LoyaltyTier::Bronze);
    }

    #[test]
    fn set_count_rederives_tier() {
        let mut client = Client::new(1, "Ana Rojas", "CC-1001");
        client.set_reservation_count(7);
        assert_eq!(client.tier, LoyaltyTier::Silver);
        client.set_reservation_count(2);
        assert_eq!(client.tier, LoyaltyTier::Bronze);
    }
}
