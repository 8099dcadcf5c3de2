//! Storage initialization
//!
//! Handles first-run setup and default data creation

use crate::config::paths::FintrackPaths;
use crate::error::FintrackError;
use crate::models::category::{DEFAULT_EXPENSE_CATEGORIES, DEFAULT_INCOME_CATEGORIES};
use crate::models::{Category, CategoryKind};

use super::categories::CategoryData;
use super::file_io::write_json_atomic;

/// Initialize storage for a fresh installation
///
/// Creates the data directory and the default categories. Existing
/// category files are left alone.
pub fn initialize_storage(paths: &FintrackPaths) -> Result<(), FintrackError> {
    paths.ensure_directories()?;

    if needs_initialization(paths) {
        create_default_categories(paths)?;
    }

    Ok(())
}

fn create_default_categories(paths: &FintrackPaths) -> Result<(), FintrackError> {
    let income = DEFAULT_INCOME_CATEGORIES
        .iter()
        .map(|name| Category::new(*name, CategoryKind::Income));
    let expense = DEFAULT_EXPENSE_CATEGORIES
        .iter()
        .map(|name| Category::new(*name, CategoryKind::Expense));

    let data = CategoryData {
        categories: income.chain(expense).collect(),
    };
    write_json_atomic(paths.categories_file(), &data)?;

    tracing::info!(count = data.categories.len(), "created default categories");
    Ok(())
}

pub fn needs_initialization(paths: &FintrackPaths) -> bool {
    !paths.categories_file().exists()
}
