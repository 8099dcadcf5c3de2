//! Overview tab: headline figures, alerts and a cash flow chart

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::{highlight_style, money_color, panel};
use crate::models::Money;
use crate::reports::Severity;
use crate::tui::app::App;
use crate::tui::layout::OverviewLayout;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let layout = OverviewLayout::new(area);
    render_summary(frame, app, layout.summary);
    render_alerts(frame, app, layout.alerts);
    render_cash_flow(frame, app, layout.chart);
}

fn figure(label: &str, amount: Money) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<18}", label), Style::default().fg(Color::White)),
        Span::styled(amount.to_string(), Style::default().fg(money_color(amount))),
    ])
}

fn render_summary(frame: &mut Frame, app: &App, area: Rect) {
    let s = &app.snapshot.summary;

    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                format!("{:<18}", "Net worth"),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                s.net_worth.to_string(),
                Style::default()
                    .fg(money_color(s.net_worth))
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        figure("Assets", s.total_assets),
        figure("Investments", s.investments),
        figure("Liabilities", -s.total_liabilities),
        figure("Debts", -s.debts),
        Line::from(""),
        figure(&format!("Income {}", s.month), s.month_income),
        figure("Spent", -s.month_expense),
        figure("Net", s.month_net()),
    ];
    if let Some(rate) = s.savings_rate() {
        lines.push(Line::from(format!("{:<18}{:.1}%", "Savings rate", rate)));
    }

    frame.render_widget(Paragraph::new(lines).block(panel("Summary")), area);
}

fn render_alerts(frame: &mut Frame, app: &App, area: Rect) {
    let alerts = &app.snapshot.alerts;

    if alerts.is_empty() {
        let text = Paragraph::new("No alerts.")
            .style(Style::default().fg(Color::Green))
            .block(panel("Alerts"));
        frame.render_widget(text, area);
        return;
    }

    let items: Vec<ListItem> = alerts
        .iter()
        .map(|alert| {
            let color = match alert.severity {
                Severity::Critical => Color::Red,
                Severity::Warning => Color::Yellow,
                Severity::Info => Color::Cyan,
            };
            ListItem::new(Line::from(vec![
                Span::styled(alert.severity.to_string(), Style::default().fg(color)),
                Span::raw(" "),
                Span::raw(alert.message.clone()),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(panel(&format!("Alerts ({})", alerts.len())))
        .highlight_style(highlight_style());

    let mut state = ListState::default();
    state.select(Some(app.selected()));
    frame.render_stateful_widget(list, area, &mut state);
}

/// Whole currency units; bars cannot be negative
fn bar_value(amount: Money) -> u64 {
    (amount.cents().max(0) / 100) as u64
}

fn render_cash_flow(frame: &mut Frame, app: &App, area: Rect) {
    let mut chart = BarChart::default()
        .block(panel("Cash flow (income / spent)"))
        .bar_width(6)
        .bar_gap(1)
        .group_gap(3);

    for month in &app.snapshot.cash_flow.months {
        let bars = [
            Bar::default()
                .value(bar_value(month.income))
                .text_value(month.income.to_string())
                .style(Style::default().fg(Color::Green)),
            Bar::default()
                .value(bar_value(month.expense))
                .text_value(month.expense.to_string())
                .style(Style::default().fg(Color::Red)),
        ];
        chart = chart.data(
            BarGroup::default()
                .label(Line::from(month.period.to_string()))
                .bars(&bars),
        );
    }

    frame.render_widget(chart, area);
}
