use serde::{Deserialize, Serialize};

/// Whether the filer reports salary income or sole-proprietor business income.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilingMode {
    #[default]
    Employee,
    Business,
}

impl FilingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Business => "business",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "employee" => Some(Self::Employee),
            "business" => Some(Self::Business),
            _ => None,
        }
    }

    /// Label shown in the report header.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Employee => "会社員",
            Self::Business => "個人事業主",
        }
    }

    pub fn is_business(&self) -> bool {
        matches!(self, Self::Business)
    }
}
