//! Category display formatting

use tabled::Tabled;

use super::report::render_table;
use crate::models::{Category, CategoryKind};

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Color")]
    color: String,
}

/// Format categories as a table, income categories first
pub fn format_category_list(categories: &[Category]) -> String {
    let mut sorted: Vec<&Category> = categories.iter().filter(|c| !c.archived).collect();
    sorted.sort_by(|a, b| {
        (a.kind != CategoryKind::Income, a.name.to_lowercase())
            .cmp(&(b.kind != CategoryKind::Income, b.name.to_lowercase()))
    });

    let rows = sorted
        .into_iter()
        .map(|c| CategoryRow {
            id: c.id.to_string(),
            name: c.name.clone(),
            kind: c.kind.to_string(),
            color: c.color.clone().unwrap_or_default(),
        })
        .collect();

    render_table(
        rows,
        "No categories found.\n\nRun 'fintrack init' to create default categories.",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_income_listed_first() {
        let categories = vec![
            Category::new("Groceries", CategoryKind::Expense),
            Category::new("Salary", CategoryKind::Income),
        ];
        let output = format_category_list(&categories);
        let salary = output.find("Salary").unwrap();
        let groceries = output.find("Groceries").unwrap();
        assert!(salary < groceries);
    }

    #[test]
    fn test_empty_and_archived() {
        let mut archived = Category::new("Old", CategoryKind::Expense);
        archived.archived = true;
        assert!(format_category_list(&[archived]).contains("No categories found"));
    }
}
