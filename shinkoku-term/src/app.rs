//! Glue between the command line, the store and the worksheet engine.

use chrono::NaiveDate;
use shinkoku_core::calculations::common::format_amount;
use shinkoku_core::db::{SessionStore, StoreError, StoreRegistry};
use shinkoku_core::visual::BalanceScale;
use shinkoku_core::{
    ComputationResult, DERIVED_EXPENSES_KEY, FieldId, FilingMode, Session, TaxYear,
    to_report_text, to_visual_params,
};
use shinkoku_db_sqlite::SqliteStoreFactory;
use thiserror::Error;
use tracing::{debug, info};

pub const MONTHS_PER_YEAR: usize = 12;

const PROGRESS_BAR_WIDTH: usize = 20;

/// Rejected command-line values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgError {
    #[error("expected FIELD=VALUE, got '{0}'")]
    MissingEquals(String),

    #[error("'{0}' is computed from the expense fields and cannot be set")]
    DerivedField(String),

    #[error("unknown field '{0}'")]
    UnknownField(String),

    #[error("unknown mode '{0}' (expected employee or business)")]
    UnknownMode(String),

    #[error("unsupported tax year '{0}' (expected 2024 or 2025)")]
    UnknownYear(String),

    #[error("at most {MONTHS_PER_YEAR} monthly figures are accepted, got {0}")]
    TooManyMonths(usize),
}

/// Parses `inc-sales=1200000` style assignments. The value is kept verbatim.
pub fn parse_assignment(text: &str) -> Result<(FieldId, String), ArgError> {
    let (key, value) = text
        .split_once('=')
        .ok_or_else(|| ArgError::MissingEquals(text.to_string()))?;
    let key = key.trim();
    if key == DERIVED_EXPENSES_KEY {
        return Err(ArgError::DerivedField(key.to_string()));
    }
    let field = FieldId::parse(key).ok_or_else(|| ArgError::UnknownField(key.to_string()))?;
    Ok((field, value.to_string()))
}

pub fn parse_mode(text: &str) -> Result<FilingMode, ArgError> {
    FilingMode::parse(text).ok_or_else(|| ArgError::UnknownMode(text.to_string()))
}

pub fn parse_year(text: &str) -> Result<TaxYear, ArgError> {
    TaxYear::parse(text).ok_or_else(|| ArgError::UnknownYear(text.to_string()))
}

/// Edits requested for one run, applied in field order: reset, mode, year,
/// monthly sales, then individual assignments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    pub reset: bool,
    pub mode: Option<FilingMode>,
    pub year: Option<TaxYear>,
    pub monthly_sales: Option<Vec<String>>,
    pub assignments: Vec<(FieldId, String)>,
}

impl Request {
    pub fn has_edits(&self) -> bool {
        self.mode.is_some()
            || self.year.is_some()
            || self.monthly_sales.is_some()
            || !self.assignments.is_empty()
    }

    pub fn validate(&self) -> Result<(), ArgError> {
        match &self.monthly_sales {
            Some(months) if months.len() > MONTHS_PER_YEAR => {
                Err(ArgError::TooManyMonths(months.len()))
            }
            _ => Ok(()),
        }
    }
}

/// Every store backend this binary knows about.
pub fn build_registry() -> StoreRegistry {
    let mut registry = StoreRegistry::new();
    registry.register(Box::new(SqliteStoreFactory));
    registry
}

/// Loads the session, applies `request`, persists and returns the session.
pub async fn apply_request(
    request: &Request,
    store: &dyn SessionStore,
) -> Result<Session, StoreError> {
    let mut session = Session::load(store).await?;

    if request.reset {
        session.reset_store(store).await?;
    }
    if let Some(mode) = request.mode {
        session.set_mode(mode);
    }
    if let Some(year) = request.year {
        session.set_year(year);
    }
    if let Some(months) = &request.monthly_sales {
        let total = session.apply_monthly_sales(months.as_slice());
        info!(total, "monthly sales applied");
    }
    for (field, value) in &request.assignments {
        session.set_field(*field, value.clone());
    }

    if request.has_edits() {
        session.save(store).await?;
    } else {
        debug!("no edits; store left untouched");
    }
    Ok(session)
}

/// `進捗 [#####---------------]  25%`
pub fn render_progress(ratio: f64) -> String {
    let ratio = ratio.clamp(0.0, 1.0);
    let filled = (ratio * PROGRESS_BAR_WIDTH as f64).round() as usize;
    format!(
        "進捗 [{}{}] {:>3}%",
        "#".repeat(filled),
        "-".repeat(PROGRESS_BAR_WIDTH - filled),
        (ratio * 100.0).round() as u32
    )
}

pub fn render_balance(scale: &BalanceScale) -> String {
    let tilt = if scale.angle_deg < 0.0 {
        "売上側"
    } else if scale.angle_deg > 0.0 {
        "経費側"
    } else {
        "水平"
    };
    [
        format!(
            "売上 {:<10} {} 円",
            "■".repeat(scale.income_stack.count()),
            format_amount(scale.income_stack.amount)
        ),
        format!(
            "経費 {:<10} {} 円",
            "■".repeat(scale.expense_stack.count()),
            format_amount(scale.expense_stack.amount)
        ),
        format!(
            "  (売上原価 {} 円 / その他経費 {} 円)",
            format_amount(scale.cogs_summary),
            format_amount(scale.other_expense_summary)
        ),
        format!(
            "傾き {:.1}° ({tilt}) | 差引 {} 円",
            scale.angle_deg.abs(),
            format_amount(scale.gross_profit)
        ),
    ]
    .join("\n")
}

/// Memo, then progress, then the balance for business filers.
pub fn render(
    session: &Session,
    today: NaiveDate,
) -> String {
    let context = session.context();
    let result: ComputationResult = session.recompute();
    let visuals = to_visual_params(&result, &context);

    let mut sections = vec![
        to_report_text(&result, &context, today),
        String::new(),
        render_progress(result.progress_ratio()),
        format!(
            "所得 {} 円 → 控除 {} 円 → 課税標準 {} 円",
            format_amount(visuals.flow.total_income),
            format_amount(visuals.flow.total_deductions),
            format_amount(visuals.flow.taxable_base)
        ),
    ];
    if let Some(balance) = &visuals.balance {
        sections.push(render_balance(balance));
    }
    sections.join("\n")
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use shinkoku_core::{DataSnapshot, SettingsSnapshot};

    use super::*;

    #[derive(Default)]
    struct MemoryStore {
        data: Mutex<Option<DataSnapshot>>,
        settings: Mutex<Option<SettingsSnapshot>>,
        writes: Mutex<HashMap<&'static str, usize>>,
    }

    impl MemoryStore {
        fn writes(
            &self,
            record: &str,
        ) -> usize {
            self.writes.lock().unwrap().get(record).copied().unwrap_or(0)
        }

        fn count(
            &self,
            record: &'static str,
        ) {
            *self.writes.lock().unwrap().entry(record).or_default() += 1;
        }
    }

    #[async_trait]
    impl SessionStore for MemoryStore {
        async fn load_data(&self) -> Result<Option<DataSnapshot>, StoreError> {
            Ok(self.data.lock().unwrap().clone())
        }
        async fn load_settings(&self) -> Result<Option<SettingsSnapshot>, StoreError> {
            Ok(self.settings.lock().unwrap().clone())
        }
        async fn save_data(
            &self,
            data: &DataSnapshot,
        ) -> Result<(), StoreError> {
            self.count("data");
            *self.data.lock().unwrap() = Some(data.clone());
            Ok(())
        }
        async fn save_settings(
            &self,
            settings: &SettingsSnapshot,
        ) -> Result<(), StoreError> {
            self.count("settings");
            *self.settings.lock().unwrap() = Some(settings.clone());
            Ok(())
        }
        async fn clear(&self) -> Result<(), StoreError> {
            *self.data.lock().unwrap() = None;
            *self.settings.lock().unwrap() = None;
            Ok(())
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    // =========================================================================
    // argument parsing
    // =========================================================================

    #[test]
    fn assignment_keeps_value_verbatim() {
        assert_eq!(
            parse_assignment("inc-sales= 1,200,000"),
            Ok((FieldId::IncSales, " 1,200,000".to_string()))
        );
        assert_eq!(
            parse_assignment("tax-paid="),
            Ok((FieldId::TaxPaid, String::new()))
        );
    }

    #[test]
    fn assignment_rejects_bad_keys() {
        assert_eq!(
            parse_assignment("inc-sales"),
            Err(ArgError::MissingEquals("inc-sales".to_string()))
        );
        assert_eq!(
            parse_assignment("inc-expenses=5"),
            Err(ArgError::DerivedField("inc-expenses".to_string()))
        );
        assert_eq!(
            parse_assignment("inc-bonus=5"),
            Err(ArgError::UnknownField("inc-bonus".to_string()))
        );
    }

    #[test]
    fn mode_and_year_parsers() {
        assert_eq!(parse_mode("business"), Ok(FilingMode::Business));
        assert_eq!(parse_year("2025"), Ok(TaxYear::Y2025));
        assert!(parse_mode("corporate").is_err());
        assert!(parse_year("2023").is_err());
    }

    #[test]
    fn mode_and_year_parsers_accept_padded_values() {
        assert_eq!(parse_mode(" business"), Ok(FilingMode::Business));
        assert_eq!(parse_year(" 2025"), Ok(TaxYear::Y2025));
    }

    #[test]
    fn thirteen_months_are_rejected() {
        let request = Request {
            monthly_sales: Some(vec!["1".to_string(); 13]),
            ..Request::default()
        };

        assert_eq!(request.validate(), Err(ArgError::TooManyMonths(13)));
    }

    // =========================================================================
    // rendering
    // =========================================================================

    #[test]
    fn progress_bar_rounds_to_width() {
        assert_eq!(render_progress(0.0), "進捗 [--------------------]   0%");
        assert_eq!(render_progress(0.5), "進捗 [##########----------]  50%");
        assert_eq!(render_progress(1.0), "進捗 [####################] 100%");
    }

    #[test]
    fn employee_output_has_no_balance() {
        let mut session = Session::new();
        session.set_field(FieldId::IncSalary, "3000000");

        let text = render(&session, today());

        assert!(text.contains("- 給与の収入金額: 3,000,000 円"));
        assert!(text.contains("課税標準 2,520,000 円"));
        assert!(!text.contains("売上 "));
    }

    #[test]
    fn business_output_ends_with_balance() {
        let mut session = Session::new();
        session.set_mode(FilingMode::Business);
        session.set_field(FieldId::IncSales, "2000000");
        session.set_field(FieldId::ExpRent, "400000");

        let text = render(&session, today());

        assert!(text.contains("売上 ■■■■■■■■■■ 2,000,000 円"));
        assert!(text.contains("経費 ■■         400,000 円"));
        assert!(text.ends_with("傾き 12.0° (売上側) | 差引 1,600,000 円"));
    }

    // =========================================================================
    // request handling
    // =========================================================================

    #[tokio::test]
    async fn edits_are_applied_and_saved() {
        let store = MemoryStore::default();
        let request = Request {
            mode: Some(FilingMode::Business),
            monthly_sales: Some(vec!["100000".to_string(); 12]),
            assignments: vec![(FieldId::ExpComm, "12000".to_string())],
            ..Request::default()
        };

        let session = apply_request(&request, &store).await.unwrap();

        assert_eq!(session.raw().get(FieldId::IncSales), Some("1200000"));
        assert_eq!(session.recompute().expenses.total, 12_000);
        assert_eq!(store.writes("data"), 1);
        assert_eq!(store.writes("settings"), 1);
    }

    #[tokio::test]
    async fn assignments_override_monthly_sales() {
        let store = MemoryStore::default();
        let request = Request {
            monthly_sales: Some(vec!["5".to_string()]),
            assignments: vec![(FieldId::IncSales, "7".to_string())],
            ..Request::default()
        };

        let session = apply_request(&request, &store).await.unwrap();

        assert_eq!(session.raw().get(FieldId::IncSales), Some("7"));
    }

    #[tokio::test]
    async fn read_only_run_does_not_write() {
        let store = MemoryStore::default();

        apply_request(&Request::default(), &store).await.unwrap();

        assert_eq!(store.writes("data"), 0);
        assert_eq!(store.writes("settings"), 0);
    }

    #[tokio::test]
    async fn reset_then_edit_starts_from_defaults() {
        let store = MemoryStore::default();
        let seed = Request {
            mode: Some(FilingMode::Business),
            assignments: vec![(FieldId::IncSales, "900".to_string())],
            ..Request::default()
        };
        apply_request(&seed, &store).await.unwrap();
        let request = Request {
            reset: true,
            assignments: vec![(FieldId::IncSalary, "1".to_string())],
            ..Request::default()
        };

        let session = apply_request(&request, &store).await.unwrap();

        assert_eq!(session.context().mode, FilingMode::Employee);
        assert_eq!(session.raw().get(FieldId::IncSales), None);
        assert_eq!(session.raw().get(FieldId::IncSalary), Some("1"));
    }
}
