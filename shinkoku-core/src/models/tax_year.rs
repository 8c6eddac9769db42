use serde::{Deserialize, Serialize};

/// Filing year. Each variant selects a basic-deduction policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum TaxYear {
    #[default]
    #[serde(rename = "2024")]
    Y2024,
    #[serde(rename = "2025")]
    Y2025,
}

impl TaxYear {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Y2024 => "2024",
            Self::Y2025 => "2025",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "2024" => Some(Self::Y2024),
            "2025" => Some(Self::Y2025),
            _ => None,
        }
    }
}
