use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of broadcast area, as declared by the dataset it was loaded from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AreaKind {
    Country,
    /// County or unitary authority at the top of the local government hierarchy
    UpperTierAuthority,
    /// District or borough nested within an upper-tier authority
    LowerTierAuthority,
    ElectoralWard,
    /// User drawn or otherwise ad-hoc shape with no place in the hierarchy
    Custom,
}

impl AreaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AreaKind::Country => "country",
            AreaKind::UpperTierAuthority => "upper-tier-authority",
            AreaKind::LowerTierAuthority => "lower-tier-authority",
            AreaKind::ElectoralWard => "electoral-ward",
            AreaKind::Custom => "custom",
        }
    }
}

impl fmt::Display for AreaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
