//! Tables for budgets, goals, debts, investments and subscriptions

use chrono::NaiveDate;
use tabled::Tabled;

use super::report::{format_bar, format_percentage, render_table};
use crate::models::{Goal, Subscription};
use crate::services::{BudgetOverview, PayoffPlanEntry, PortfolioSummary};

#[derive(Tabled)]
struct BudgetRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Limit")]
    limit: String,
    #[tabled(rename = "Carryover")]
    carryover: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Remaining")]
    remaining: String,
    #[tabled(rename = "Used")]
    used: String,
}

pub fn format_budget_overview(overview: &BudgetOverview) -> String {
    let rows = overview
        .statuses
        .iter()
        .map(|s| BudgetRow {
            category: s.category_name.clone(),
            limit: s.limit.to_string(),
            carryover: s.carryover.to_string(),
            spent: s.spent.to_string(),
            remaining: s.remaining().to_string(),
            used: format!(
                "{} {}{}",
                format_bar(s.percent_used().min(100.0), 100.0, 10),
                format_percentage(s.percent_used()),
                if s.is_over() { " OVER" } else { "" }
            ),
        })
        .collect();

    format!(
        "Budgets for {}\n{}\nLimit {}  Spent {}  Remaining {}\n",
        overview.period,
        render_table(rows, "No budgets set for this month."),
        overview.total_limit,
        overview.total_spent,
        overview.total_remaining()
    )
}

#[derive(Tabled)]
struct GoalRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Goal")]
    name: String,
    #[tabled(rename = "Saved")]
    saved: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Progress")]
    progress: String,
    #[tabled(rename = "Deadline")]
    deadline: String,
    #[tabled(rename = "Per Month")]
    per_month: String,
}

pub fn format_goal_list(goals: &[Goal], today: NaiveDate) -> String {
    let rows = goals
        .iter()
        .map(|g| GoalRow {
            id: g.id.to_string(),
            name: g.name.clone(),
            saved: g.saved_amount.to_string(),
            target: g.target_amount.to_string(),
            progress: if g.is_completed() {
                "done".to_string()
            } else {
                format!(
                    "{} {}",
                    format_bar(g.progress_percent(), 100.0, 10),
                    format_percentage(g.progress_percent())
                )
            },
            deadline: match g.deadline {
                Some(d) if g.is_overdue(today) => format!("{} (overdue)", d),
                Some(d) => d.to_string(),
                None => String::new(),
            },
            per_month: g
                .required_monthly(today)
                .map(|m| m.to_string())
                .unwrap_or_default(),
        })
        .collect();

    render_table(rows, "No goals yet.")
}

#[derive(Tabled)]
struct DebtRow {
    #[tabled(rename = "#")]
    order: usize,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Debt")]
    name: String,
    #[tabled(rename = "Balance")]
    balance: String,
    #[tabled(rename = "APR")]
    rate: String,
    #[tabled(rename = "Minimum")]
    minimum: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Payoff")]
    payoff: String,
}

/// Debts in payoff order with their minimum-payment projection
pub fn format_debt_plan(plan: &[PayoffPlanEntry], today: NaiveDate) -> String {
    let rows = plan
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let debt = &entry.debt;
            DebtRow {
                order: i + 1,
                id: debt.id.to_string(),
                name: debt.name.clone(),
                balance: debt.balance.to_string(),
                rate: format!("{:.2}%", debt.interest_rate_bps as f64 / 100.0),
                minimum: debt.minimum_payment.to_string(),
                due: debt
                    .next_due_date(today)
                    .map(|d| d.to_string())
                    .unwrap_or_default(),
                payoff: match &entry.projection {
                    _ if debt.is_paid_off() => "paid off".to_string(),
                    Some(p) => format!("{} mo, {} interest", p.months, p.total_interest),
                    None => "never at minimum".to_string(),
                },
            }
        })
        .collect();

    render_table(rows, "No debts tracked.")
}

#[derive(Tabled)]
struct HoldingRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Holding")]
    name: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Qty")]
    quantity: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Gain")]
    gain: String,
}

pub fn format_portfolio(portfolio: &PortfolioSummary) -> String {
    if portfolio.holdings.is_empty() {
        return "No investments tracked.".to_string();
    }

    let rows = portfolio
        .holdings
        .iter()
        .map(|h| HoldingRow {
            id: h.id.to_string(),
            name: match &h.symbol {
                Some(symbol) => format!("{} ({})", h.name, symbol),
                None => h.name.clone(),
            },
            kind: h.kind.to_string(),
            quantity: format!("{:.4}", h.quantity)
                .trim_end_matches('0')
                .trim_end_matches('.')
                .to_string(),
            price: h.current_price.to_string(),
            value: h.market_value().to_string(),
            gain: format!("{} ({:+.1}%)", h.gain(), h.return_percent()),
        })
        .collect();

    let mut output = render_table(rows, "");
    output.push_str(&format!(
        "\nValue {}  Cost {}  Gain {} ({:+.1}%)\n",
        portfolio.total_value,
        portfolio.total_cost,
        portfolio.gain(),
        portfolio.return_percent()
    ));
    for slice in &portfolio.allocation {
        output.push_str(&format!(
            "  {:<12} {} {:>6}  {}\n",
            slice.kind.to_string(),
            format_bar(slice.percent, 100.0, 20),
            format_percentage(slice.percent),
            slice.value
        ));
    }
    output
}

#[derive(Tabled)]
struct SubscriptionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Every")]
    frequency: String,
    #[tabled(rename = "Next")]
    next: String,
    #[tabled(rename = "Monthly")]
    monthly: String,
    #[tabled(rename = "Status")]
    status: &'static str,
}

pub fn format_subscription_list(subscriptions: &[Subscription]) -> String {
    let rows = subscriptions
        .iter()
        .map(|s| SubscriptionRow {
            id: s.id.to_string(),
            name: s.name.clone(),
            amount: s.amount.to_string(),
            frequency: s.frequency.to_string(),
            next: s.next_billing_date.to_string(),
            monthly: s.monthly_cost().to_string(),
            status: if s.active { "active" } else { "paused" },
        })
        .collect();

    render_table(rows, "No subscriptions.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountId, Frequency, Money};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 10).unwrap()
    }

    #[test]
    fn test_goal_list_marks_overdue() {
        let mut goal = Goal::new("Laptop", Money::from_cents(200_000));
        goal.deadline = NaiveDate::from_ymd_opt(2025, 4, 1);
        let output = format_goal_list(&[goal], today());
        assert!(output.contains("Laptop"));
        assert!(output.contains("(overdue)"));
    }

    #[test]
    fn test_subscription_list() {
        let mut sub = Subscription::new(
            "Streaming",
            Money::from_cents(1_599),
            Frequency::Monthly,
            AccountId::new(),
            today(),
        );
        sub.pause();
        let output = format_subscription_list(&[sub]);
        assert!(output.contains("Streaming"));
        assert!(output.contains("$15.99"));
        assert!(output.contains("paused"));
    }

    #[test]
    fn test_empty_tables() {
        assert_eq!(format_goal_list(&[], today()), "No goals yet.");
        assert_eq!(format_subscription_list(&[]), "No subscriptions.");
        assert_eq!(format_debt_plan(&[], today()), "No debts tracked.");
    }
}
