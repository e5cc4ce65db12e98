use serde::Deserialize;
use serde::Serialize;

/// the five canonical positions. every role string that enters the system
/// passes through TryFrom, which folds the zoo of data-file spellings
/// (ADC, JNG, SUPPORT, bot laner, ...) into these variants. unknown
/// strings are rejected rather than passed through.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Top = 0isize,
    Jungle = 1isize,
    Mid = 2isize,
    Bot = 3isize,
    Support = 4isize,
}

impl Role {
    pub const fn all() -> &'static [Self] {
        &[Self::Top, Self::Jungle, Self::Mid, Self::Bot, Self::Support]
    }
    /// fallback order for champions nothing else knows about
    pub const fn default_order() -> &'static [Self] {
        &[Self::Mid, Self::Bot, Self::Top, Self::Jungle, Self::Support]
    }
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Jungle => "jungle",
            Self::Mid => "mid",
            Self::Bot => "bot",
            Self::Support => "support",
        }
    }
    pub const fn sort_key(&self) -> usize {
        *self as usize
    }
}

impl TryFrom<&str> for Role {
    type Error = anyhow::Error;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.trim().to_lowercase().as_str() {
            "top" | "top laner" | "toplane" | "topside" => Ok(Self::Top),
            "jungle" | "jungler" | "jng" | "jg" => Ok(Self::Jungle),
            "mid" | "middle" | "mid laner" | "midlane" => Ok(Self::Mid),
            "bot" | "adc" | "bottom" | "bot laner" | "ad carry" | "marksman" | "carry" => {
                Ok(Self::Bot)
            }
            "support" | "sup" | "supp" => Ok(Self::Support),
            other => Err(anyhow::anyhow!("unknown role: {}", other)),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// lenient normalization. None means the string maps to no canonical role.
pub fn normalize(role: &str) -> Option<Role> {
    Role::try_from(role).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_normalize() {
        assert!(normalize("JNG") == Some(Role::Jungle));
        assert!(normalize("ADC") == Some(Role::Bot));
        assert!(normalize("SUPPORT") == Some(Role::Support));
        assert!(normalize("MIDDLE") == Some(Role::Mid));
        assert!(normalize("marksman") == Some(Role::Bot));
        assert!(normalize(" top ") == Some(Role::Top));
    }

    #[test]
    fn unknown_rejected() {
        assert!(normalize("coach") == None);
        assert!(normalize("") == None);
    }

    #[test]
    fn normalization_idempotent() {
        for role in Role::all() {
            assert!(normalize(role.as_str()) == Some(*role));
        }
    }

    #[test]
    fn canonical_order() {
        let keys = Role::all().iter().map(Role::sort_key).collect::<Vec<_>>();
        assert!(keys == vec![0, 1, 2, 3, 4]);
    }
}
