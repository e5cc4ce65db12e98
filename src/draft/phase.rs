use serde::Deserialize;
use serde::Serialize;

/// the five stages of a ten-ban ten-pick draft,
/// derived purely from how many actions have occurred.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    #[serde(rename = "BAN_PHASE_1")]
    BanOne,
    #[serde(rename = "PICK_PHASE_1")]
    PickOne,
    #[serde(rename = "BAN_PHASE_2")]
    BanTwo,
    #[serde(rename = "PICK_PHASE_2")]
    PickTwo,
    #[serde(rename = "COMPLETE")]
    Complete,
}

impl Phase {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BanOne => "BAN_PHASE_1",
            Self::PickOne => "PICK_PHASE_1",
            Self::BanTwo => "BAN_PHASE_2",
            Self::PickTwo => "PICK_PHASE_2",
            Self::Complete => "COMPLETE",
        }
    }
    pub const fn is_first(&self) -> bool {
        matches!(self, Self::BanOne | Self::PickOne)
    }
    pub const fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }
}

impl From<usize> for Phase {
    fn from(actions: usize) -> Self {
        match actions {
            0..=5 => Self::BanOne,
            6..=11 => Self::PickOne,
            12..=15 => Self::BanTwo,
            16..=19 => Self::PickTwo,
            _ => Self::Complete,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds() {
        assert!(Phase::from(0) == Phase::BanOne);
        assert!(Phase::from(5) == Phase::BanOne);
        assert!(Phase::from(6) == Phase::PickOne);
        assert!(Phase::from(11) == Phase::PickOne);
        assert!(Phase::from(12) == Phase::BanTwo);
        assert!(Phase::from(15) == Phase::BanTwo);
        assert!(Phase::from(16) == Phase::PickTwo);
        assert!(Phase::from(19) == Phase::PickTwo);
        assert!(Phase::from(20) == Phase::Complete);
        assert!(Phase::from(25) == Phase::Complete);
    }

    #[test]
    fn complete_only_at_twenty() {
        for n in 0..20 {
            assert!(Phase::from(n) != Phase::Complete);
        }
    }
}
