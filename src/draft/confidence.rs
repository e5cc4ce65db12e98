use serde::Deserialize;
use serde::Serialize;

/// sample-size confidence attached to player-champion statistics.
/// thresholds are raw game counts: 8 / 4 / 1.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    #[serde(rename = "HIGH")]
    High,
    #[serde(rename = "MEDIUM")]
    Medium,
    #[serde(rename = "LOW")]
    Low,
    #[serde(rename = "NO_DATA")]
    NoData,
}

impl Confidence {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
            Self::NoData => "NO_DATA",
        }
    }
    /// numeric weight used by the pick engine's confidence blend
    pub const fn value(&self) -> crate::Score {
        match self {
            Self::High => 1.0,
            Self::Medium => 0.8,
            Self::Low => 0.5,
            Self::NoData => 0.3,
        }
    }
    pub const fn is_trusted(&self) -> bool {
        matches!(self, Self::High | Self::Medium)
    }
}

impl From<usize> for Confidence {
    fn from(games: usize) -> Self {
        match games {
            n if n >= 8 => Self::High,
            n if n >= 4 => Self::Medium,
            n if n >= 1 => Self::Low,
            _ => Self::NoData,
        }
    }
}

impl TryFrom<&str> for Confidence {
    type Error = anyhow::Error;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.trim().to_uppercase().as_str() {
            "HIGH" => Ok(Self::High),
            "MEDIUM" => Ok(Self::Medium),
            "LOW" => Ok(Self::Low),
            "NO_DATA" => Ok(Self::NoData),
            other => Err(anyhow::anyhow!("unknown confidence: {}", other)),
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_thresholds() {
        assert!(Confidence::from(0) == Confidence::NoData);
        assert!(Confidence::from(1) == Confidence::Low);
        assert!(Confidence::from(4) == Confidence::Medium);
        assert!(Confidence::from(8) == Confidence::High);
        assert!(Confidence::from(40) == Confidence::High);
    }
}
