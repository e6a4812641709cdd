//! Duration tokens offered at license creation.

const DAY_SECS: i64 = 24 * 60 * 60;

/// Fixed duration choices for `create-license`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationToken {
    Days1,
    Days3,
    Days7,
    Days15,
    Days30,
    Days365,
    Lifetime,
}

impl DurationToken {
    pub const ALL: [Self; 7] = [
        Self::Days1,
        Self::Days3,
        Self::Days7,
        Self::Days15,
        Self::Days30,
        Self::Days365,
        Self::Lifetime,
    ];

    /// Wire token as submitted by the command option.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Days1 => "1d",
            Self::Days3 => "3d",
            Self::Days7 => "7d",
            Self::Days15 => "15d",
            Self::Days30 => "30d",
            Self::Days365 => "365d",
            Self::Lifetime => "lifetime",
        }
    }

    /// Human-readable choice label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Days1 => "1 Day",
            Self::Days3 => "3 Days",
            Self::Days7 => "7 Days",
            Self::Days15 => "15 Days",
            Self::Days30 => "30 Days",
            Self::Days365 => "1 Year",
            Self::Lifetime => "Lifetime",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.token() == s)
    }

    /// Expiry timestamp for a license created at `now`; `None` means
    /// non-expiring, which is distinct from expired.
    pub const fn expires_from(self, now: i64) -> Option<i64> {
        let days = match self {
            Self::Days1 => 1,
            Self::Days3 => 3,
            Self::Days7 => 7,
            Self::Days15 => 15,
            Self::Days30 => 30,
            Self::Days365 => 365,
            Self::Lifetime => return None,
        };
        Some(now + days * DAY_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_parse_back() {
        for t in DurationToken::ALL {
            assert_eq!(DurationToken::parse(t.token()), Some(t));
        }
        assert_eq!(DurationToken::parse("90d"), None);
    }

    #[test]
    fn lifetime_has_no_expiry() {
        assert_eq!(DurationToken::Lifetime.expires_from(1_000), None);
    }

    #[test]
    fn finite_durations_add_days() {
        let now = 1_700_000_000;
        assert_eq!(DurationToken::Days1.expires_from(now), Some(now + DAY_SECS));
        assert_eq!(
            DurationToken::Days365.expires_from(now),
            Some(now + 365 * DAY_SECS)
        );
    }
}
