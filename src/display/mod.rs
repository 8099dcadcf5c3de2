//! Display formatting for terminal output
//!
//! Tables are rendered with `tabled`; reports format themselves and only
//! borrow the helpers in [`report`].

pub mod account;
pub mod category;
pub mod planning;
pub mod report;
pub mod transaction;

pub use account::{format_account_details, format_account_list};
pub use category::format_category_list;
pub use planning::{
    format_budget_overview, format_debt_plan, format_goal_list, format_portfolio,
    format_subscription_list,
};
pub use report::{format_bar, format_percentage, render_table, separator, truncate};
pub use transaction::{format_transaction_details, format_transaction_register, NameLookup};
