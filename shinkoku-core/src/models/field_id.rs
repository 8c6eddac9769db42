use std::fmt;

use serde::{Deserialize, Serialize};

/// Which part of the worksheet a field belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldGroup {
    Income,
    Expense,
    Deduction,
    Tax,
}

/// Identifier of a figure the filer enters by hand.
///
/// The derived `inc-expenses` total is deliberately absent: it is computed by
/// the expense aggregation and never accepted as raw input. See
/// [`DERIVED_EXPENSES_KEY`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum FieldId {
    IncSalary,
    IncSales,
    IncBlueDeduction,
    IncMisc,
    IncDividend,
    ExpSupplies,
    ExpTravel,
    ExpComm,
    ExpRent,
    ExpOther,
    ExpEntert,
    ExpStockStart,
    ExpPurchase,
    ExpStockEnd,
    DedSocial,
    DedLife,
    DedIdeco,
    DedEarthquake,
    DedFurusato,
    DedMedical,
    DedFamily,
    TaxPaid,
    TaxHomeLoan,
}

/// Persisted key of the derived expense total. Never parsed into a [`FieldId`].
pub const DERIVED_EXPENSES_KEY: &str = "inc-expenses";

impl FieldId {
    pub const COUNT: usize = 23;

    /// Every entered field, in worksheet order.
    pub const ALL: [FieldId; Self::COUNT] = [
        Self::IncSalary,
        Self::IncSales,
        Self::IncBlueDeduction,
        Self::IncMisc,
        Self::IncDividend,
        Self::ExpSupplies,
        Self::ExpTravel,
        Self::ExpComm,
        Self::ExpRent,
        Self::ExpOther,
        Self::ExpEntert,
        Self::ExpStockStart,
        Self::ExpPurchase,
        Self::ExpStockEnd,
        Self::DedSocial,
        Self::DedLife,
        Self::DedIdeco,
        Self::DedEarthquake,
        Self::DedFurusato,
        Self::DedMedical,
        Self::DedFamily,
        Self::TaxPaid,
        Self::TaxHomeLoan,
    ];

    /// General (non-inventory) expense categories, in report order.
    pub const GENERAL_EXPENSES: [FieldId; 6] = [
        Self::ExpSupplies,
        Self::ExpTravel,
        Self::ExpComm,
        Self::ExpRent,
        Self::ExpOther,
        Self::ExpEntert,
    ];

    /// Inventory fields feeding cost of goods sold.
    pub const COGS: [FieldId; 3] = [Self::ExpStockStart, Self::ExpPurchase, Self::ExpStockEnd];

    /// Itemized deductions, in report order.
    pub const ITEMIZED_DEDUCTIONS: [FieldId; 7] = [
        Self::DedSocial,
        Self::DedLife,
        Self::DedIdeco,
        Self::DedEarthquake,
        Self::DedFurusato,
        Self::DedMedical,
        Self::DedFamily,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IncSalary => "inc-salary",
            Self::IncSales => "inc-sales",
            Self::IncBlueDeduction => "inc-blue-deduction",
            Self::IncMisc => "inc-misc",
            Self::IncDividend => "inc-dividend",
            Self::ExpSupplies => "exp-supplies",
            Self::ExpTravel => "exp-travel",
            Self::ExpComm => "exp-comm",
            Self::ExpRent => "exp-rent",
            Self::ExpOther => "exp-other",
            Self::ExpEntert => "exp-entert",
            Self::ExpStockStart => "exp-stock-start",
            Self::ExpPurchase => "exp-purchase",
            Self::ExpStockEnd => "exp-stock-end",
            Self::DedSocial => "ded-social",
            Self::DedLife => "ded-life",
            Self::DedIdeco => "ded-ideco",
            Self::DedEarthquake => "ded-earthquake",
            Self::DedFurusato => "ded-furusato",
            Self::DedMedical => "ded-medical",
            Self::DedFamily => "ded-family",
            Self::TaxPaid => "tax-paid",
            Self::TaxHomeLoan => "tax-home-loan",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|field| field.as_str() == s)
    }

    pub fn group(&self) -> FieldGroup {
        match self {
            Self::IncSalary
            | Self::IncSales
            | Self::IncBlueDeduction
            | Self::IncMisc
            | Self::IncDividend => FieldGroup::Income,
            Self::ExpSupplies
            | Self::ExpTravel
            | Self::ExpComm
            | Self::ExpRent
            | Self::ExpOther
            | Self::ExpEntert
            | Self::ExpStockStart
            | Self::ExpPurchase
            | Self::ExpStockEnd => FieldGroup::Expense,
            Self::DedSocial
            | Self::DedLife
            | Self::DedIdeco
            | Self::DedEarthquake
            | Self::DedFurusato
            | Self::DedMedical
            | Self::DedFamily => FieldGroup::Deduction,
            Self::TaxPaid | Self::TaxHomeLoan => FieldGroup::Tax,
        }
    }

    /// Label used in the itemized expense breakdown and deduction list.
    ///
    /// Only expense categories and deductions carry a report label; the other
    /// fields are rendered through fixed template lines.
    pub fn report_label(&self) -> Option<&'static str> {
        match self {
            Self::ExpSupplies => Some("消耗品費"),
            Self::ExpTravel => Some("旅費交通費"),
            Self::ExpComm => Some("通信費"),
            Self::ExpRent => Some("地代家賃等"),
            Self::ExpOther => Some("接待交際・他"),
            Self::ExpEntert => Some("接待交際費"),
            Self::DedSocial => Some("社会保険料"),
            Self::DedLife => Some("生命保険料"),
            Self::DedIdeco => Some("iDeCo/小規模企業共済"),
            Self::DedEarthquake => Some("地震保険料"),
            Self::DedFurusato => Some("寄附金(ふるさと納税)"),
            Self::DedMedical => Some("医療費"),
            Self::DedFamily => Some("配偶者・扶養"),
            _ => None,
        }
    }

    pub(crate) fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for FieldId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<FieldId> for String {
    fn from(field: FieldId) -> Self {
        field.as_str().to_string()
    }
}

impl TryFrom<String> for FieldId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("unknown field id '{value}'"))
    }
}
