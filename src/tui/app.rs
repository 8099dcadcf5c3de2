//! Application state for the TUI
//!
//! The dashboard renders from a [`Snapshot`] of storage taken at startup and
//! on every reload; nothing is read from disk while drawing.

use chrono::NaiveDate;

use crate::config::settings::Settings;
use crate::display::NameLookup;
use crate::error::FintrackResult;
use crate::models::{BudgetPeriod, Debt, Goal, Plan, Transaction};
use crate::reports::{
    collect_alerts, Alert, AlertSettings, BudgetStatusReport, CashFlowReport, DashboardSummary,
};
use crate::services::{
    DebtService, GoalService, InvestmentService, PortfolioSummary, TransactionFilter,
    TransactionService,
};
use crate::storage::Storage;

/// Months shown in the cash-flow chart
const CASH_FLOW_MONTHS: usize = 6;

/// Ticks (250ms each) a status message stays visible
const STATUS_TICKS: u8 = 12;

/// Dashboard tabs, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Overview,
    Transactions,
    Budgets,
    GoalsDebts,
    Investments,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Overview,
        Tab::Transactions,
        Tab::Budgets,
        Tab::GoalsDebts,
        Tab::Investments,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Transactions => "Transactions",
            Tab::Budgets => "Budgets",
            Tab::GoalsDebts => "Goals & Debts",
            Tab::Investments => "Investments",
        }
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    /// Tab for a 1-based number key
    pub fn from_number(n: u32) -> Option<Self> {
        (n as usize)
            .checked_sub(1)
            .and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Everything the views draw
pub struct Snapshot {
    pub today: NaiveDate,
    pub summary: DashboardSummary,
    pub cash_flow: CashFlowReport,
    pub alerts: Vec<Alert>,
    /// Newest first
    pub transactions: Vec<Transaction>,
    pub names: NameLookup,
    pub budgets: BudgetStatusReport,
    pub goals: Vec<Goal>,
    pub debts: Vec<Debt>,
    pub portfolio: PortfolioSummary,
    pub plan: Plan,
}

impl Snapshot {
    pub fn load(storage: &Storage, settings: &Settings, today: NaiveDate) -> FintrackResult<Self> {
        Ok(Self {
            today,
            summary: DashboardSummary::generate(storage, today)?,
            cash_flow: CashFlowReport::generate(storage, today, CASH_FLOW_MONTHS)?,
            alerts: collect_alerts(storage, today, AlertSettings::from(settings))?,
            transactions: TransactionService::new(storage).list(TransactionFilter::new())?,
            names: NameLookup::from_storage(storage)?,
            budgets: BudgetStatusReport::generate(
                storage,
                BudgetPeriod::month_of(today),
                settings.budget_warning_percent,
            )?,
            goals: GoalService::new(storage).list(true)?,
            debts: DebtService::new(storage).list(false)?,
            portfolio: InvestmentService::new(storage).portfolio()?,
            plan: storage.plan.get()?,
        })
    }

    /// Number of selectable rows on a tab
    pub fn row_count(&self, tab: Tab) -> usize {
        match tab {
            Tab::Overview => self.alerts.len(),
            Tab::Transactions => self.transactions.len(),
            Tab::Budgets => self.budgets.rows.len(),
            Tab::GoalsDebts => self.goals.len() + self.debts.len(),
            Tab::Investments => self.portfolio.holdings.len(),
        }
    }
}

/// Main application state
pub struct App<'a> {
    pub storage: &'a mut Storage,
    pub settings: &'a Settings,
    pub snapshot: Snapshot,
    pub active_tab: Tab,
    /// Selected row per tab
    selected: [usize; Tab::ALL.len()],
    pub should_quit: bool,
    pub status_message: Option<String>,
    status_ticks: u8,
}

impl<'a> App<'a> {
    pub fn new(storage: &'a mut Storage, settings: &'a Settings, today: NaiveDate) -> FintrackResult<Self> {
        let snapshot = Snapshot::load(storage, settings, today)?;
        Ok(Self {
            storage,
            settings,
            snapshot,
            active_tab: Tab::default(),
            selected: [0; Tab::ALL.len()],
            should_quit: false,
            status_message: None,
            status_ticks: 0,
        })
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
    }

    pub fn selected(&self) -> usize {
        self.selected[self.active_tab.index()]
    }

    pub fn move_down(&mut self) {
        let count = self.snapshot.row_count(self.active_tab);
        let slot = &mut self.selected[self.active_tab.index()];
        if *slot + 1 < count {
            *slot += 1;
        }
    }

    pub fn move_up(&mut self) {
        let slot = &mut self.selected[self.active_tab.index()];
        *slot = slot.saturating_sub(1);
    }

    pub fn move_to_top(&mut self) {
        self.selected[self.active_tab.index()] = 0;
    }

    pub fn move_to_bottom(&mut self) {
        let count = self.snapshot.row_count(self.active_tab);
        self.selected[self.active_tab.index()] = count.saturating_sub(1);
    }

    /// Re-read every table from disk and rebuild the snapshot
    pub fn reload(&mut self, today: NaiveDate) -> FintrackResult<()> {
        self.storage.load_all()?;
        self.snapshot = Snapshot::load(self.storage, self.settings, today)?;

        for tab in Tab::ALL {
            let max = self.snapshot.row_count(tab).saturating_sub(1);
            let slot = &mut self.selected[tab.index()];
            *slot = (*slot).min(max);
        }

        tracing::debug!(
            transactions = self.snapshot.transactions.len(),
            "dashboard reloaded"
        );
        Ok(())
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_ticks = STATUS_TICKS;
    }

    /// Age the status message
    pub fn tick(&mut self) {
        if self.status_ticks > 0 {
            self.status_ticks -= 1;
            if self.status_ticks == 0 {
                self.status_message = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::FintrackPaths;
    use crate::models::{AccountType, Money};
    use crate::services::{AccountService, CreateTransactionInput};
    use crate::storage::initialize_storage;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = FintrackPaths::with_base_dir(temp_dir.path().to_path_buf());
        initialize_storage(&paths).unwrap();
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn add_transactions(storage: &Storage, count: i64) {
        let account = AccountService::new(storage)
            .create("Checking", AccountType::Checking, Money::from_cents(100_000))
            .unwrap();
        let service = TransactionService::new(storage);
        for i in 0..count {
            let mut input = CreateTransactionInput::new(
                account.id,
                date("2025-03-10"),
                Money::from_cents(-(100 + i)),
            );
            input.description = format!("Purchase {}", i);
            service.create(input).unwrap();
        }
    }

    #[test]
    fn test_tab_cycling() {
        assert_eq!(Tab::Overview.next(), Tab::Transactions);
        assert_eq!(Tab::Investments.next(), Tab::Overview);
        assert_eq!(Tab::Overview.prev(), Tab::Investments);
        assert_eq!(Tab::from_number(4), Some(Tab::GoalsDebts));
        assert_eq!(Tab::from_number(0), None);
        assert_eq!(Tab::from_number(6), None);
    }

    #[test]
    fn test_selection_is_bounded() {
        let (_temp_dir, mut storage) = create_test_storage();
        add_transactions(&storage, 3);
        let settings = Settings::default();
        let mut app = App::new(&mut storage, &settings, date("2025-03-15")).unwrap();

        app.select_tab(Tab::Transactions);
        for _ in 0..10 {
            app.move_down();
        }
        assert_eq!(app.selected(), 2);

        app.move_to_top();
        app.move_up();
        assert_eq!(app.selected(), 0);

        // Other tabs keep their own position
        app.select_tab(Tab::Budgets);
        app.move_down();
        assert_eq!(app.selected(), 0);
    }

    #[test]
    fn test_reload_picks_up_new_data() {
        let (temp_dir, mut storage) = create_test_storage();
        let settings = Settings::default();
        let today = date("2025-03-15");

        let mut app = App::new(&mut storage, &settings, today).unwrap();
        assert!(app.snapshot.transactions.is_empty());

        // Another process writes while the dashboard is open
        {
            let paths = FintrackPaths::with_base_dir(temp_dir.path().to_path_buf());
            let mut other = Storage::new(paths).unwrap();
            other.load_all().unwrap();
            add_transactions(&other, 2);
        }
        assert!(app.snapshot.transactions.is_empty());

        app.select_tab(Tab::Transactions);
        app.move_to_bottom();
        app.reload(today).unwrap();
        assert_eq!(app.snapshot.transactions.len(), 2);
        assert_eq!(app.snapshot.names.account(&app.snapshot.transactions[0].account_id), "Checking");

        app.move_to_bottom();
        assert_eq!(app.selected(), 1);
    }

    #[test]
    fn test_status_message_expires() {
        let (_temp_dir, mut storage) = create_test_storage();
        let settings = Settings::default();
        let mut app = App::new(&mut storage, &settings, date("2025-03-15")).unwrap();

        app.set_status("Reloaded");
        for _ in 0..STATUS_TICKS - 1 {
            app.tick();
        }
        assert!(app.status_message.is_some());
        app.tick();
        assert!(app.status_message.is_none());
    }
}
