use anyhow::Result;
use clap::{Parser, Subcommand};

use fintrack::cli::{
    handle_account_command, handle_alerts_command, handle_ask_command, handle_audit_command,
    handle_billing_command, handle_budget_command, handle_category_command,
    handle_config_command, handle_debt_command, handle_export_command, handle_goal_command,
    handle_import_command, handle_investment_command, handle_report_command,
    handle_subscription_command, handle_transaction_command, today,
};
use fintrack::config::{paths::FintrackPaths, settings::Settings};
use fintrack::logging::{self, LogTarget};
use fintrack::services::SubscriptionService;
use fintrack::storage::Storage;

#[derive(Parser)]
#[command(
    name = "fintrack",
    version,
    about = "Personal finance dashboard for the terminal",
    long_about = "fintrack tracks accounts, transactions, budgets, goals, debts, \
                  investments and subscriptions in local JSON files, with reports, \
                  statement import, an AI assistant and a premium plan relay."
)]
struct Cli {
    /// Do not create due subscription charges at startup
    #[arg(long, global = true)]
    no_recurring: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory and default categories
    Init,

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        command: Option<fintrack::cli::ConfigCommands>,
    },

    /// Launch the interactive dashboard
    #[command(alias = "ui")]
    Tui,

    /// Account management
    #[command(subcommand)]
    Account(fintrack::cli::AccountCommands),

    /// Category management
    #[command(subcommand)]
    Category(fintrack::cli::CategoryCommands),

    /// Income and expense transactions
    #[command(subcommand, alias = "txn")]
    Transaction(fintrack::cli::TransactionCommands),

    /// Monthly and weekly category budgets
    #[command(subcommand)]
    Budget(fintrack::cli::BudgetCommands),

    /// Savings goals
    #[command(subcommand)]
    Goal(fintrack::cli::GoalCommands),

    /// Debts and payoff plans
    #[command(subcommand)]
    Debt(fintrack::cli::DebtCommands),

    /// Investment holdings
    #[command(subcommand, alias = "inv")]
    Investment(fintrack::cli::InvestmentCommands),

    /// Recurring subscriptions
    #[command(subcommand, alias = "sub")]
    Subscription(fintrack::cli::SubscriptionCommands),

    /// Import a bank statement
    Import(fintrack::cli::ImportArgs),

    /// Export data as CSV, JSON or YAML
    Export(fintrack::cli::ExportArgs),

    /// Spending, cash flow, budget and net worth reports
    #[command(subcommand)]
    Report(fintrack::cli::ReportCommands),

    /// Budget, renewal, goal and debt alerts
    Alerts,

    /// Ask the AI assistant
    Ask(fintrack::cli::AskArgs),

    /// Premium plan checkout and webhooks
    #[command(subcommand)]
    Billing(fintrack::cli::BillingCommands),

    /// Show the change history
    Audit(fintrack::cli::AuditArgs),
}

impl Commands {
    /// Commands that should not create subscription charges first
    fn skips_recurring(&self) -> bool {
        matches!(
            self,
            Commands::Init
                | Commands::Config { .. }
                | Commands::Export(_)
                | Commands::Audit(_)
                | Commands::Billing(_)
                | Commands::Subscription(fintrack::cli::SubscriptionCommands::Materialize { .. })
        )
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = FintrackPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    let log_path = paths.diagnostic_log();
    let target = match cli.command {
        Some(Commands::Tui) => {
            paths.ensure_directories()?;
            LogTarget::File(&log_path)
        }
        _ => LogTarget::Stderr,
    };
    logging::init(&settings.log_level, target)?;

    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    let materialize = !cli.no_recurring
        && storage.is_initialized()
        && cli.command.as_ref().map_or(false, |c| !c.skips_recurring());
    if materialize {
        let report = SubscriptionService::new(&storage).materialize_due(today())?;
        if !report.created.is_empty() {
            eprintln!(
                "Recorded {} due subscription charge(s) totalling {}",
                report.created.len(),
                report.total_charged()
            );
        }
    }

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing fintrack at: {}", paths.base_dir().display());
            fintrack::storage::initialize_storage(&paths)?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Default income and expense categories have been created.");
            println!("Next: 'fintrack account create \"Checking\" --balance 1000'");
        }
        Some(Commands::Config { command }) => {
            handle_config_command(&paths, &mut settings, command)?;
        }
        Some(Commands::Tui) => {
            fintrack::tui::run_tui(&mut storage, &settings)?;
        }
        Some(Commands::Account(cmd)) => handle_account_command(&storage, cmd)?,
        Some(Commands::Category(cmd)) => handle_category_command(&storage, cmd)?,
        Some(Commands::Transaction(cmd)) => handle_transaction_command(&storage, cmd)?,
        Some(Commands::Budget(cmd)) => handle_budget_command(&storage, cmd)?,
        Some(Commands::Goal(cmd)) => handle_goal_command(&storage, cmd)?,
        Some(Commands::Debt(cmd)) => handle_debt_command(&storage, cmd)?,
        Some(Commands::Investment(cmd)) => handle_investment_command(&storage, cmd)?,
        Some(Commands::Subscription(cmd)) => handle_subscription_command(&storage, cmd)?,
        Some(Commands::Import(args)) => handle_import_command(&storage, args)?,
        Some(Commands::Export(args)) => handle_export_command(&storage, args)?,
        Some(Commands::Report(cmd)) => handle_report_command(&storage, &settings, cmd)?,
        Some(Commands::Alerts) => handle_alerts_command(&storage, &settings)?,
        Some(Commands::Ask(args)) => handle_ask_command(&storage, &settings, args)?,
        Some(Commands::Billing(cmd)) => handle_billing_command(&storage, &settings, cmd)?,
        Some(Commands::Audit(args)) => handle_audit_command(&storage, args)?,
        None => {
            println!("fintrack - personal finance dashboard");
            println!();
            println!("Run 'fintrack --help' for usage information.");
            println!("Run 'fintrack tui' to launch the interactive dashboard.");
        }
    }

    Ok(())
}
