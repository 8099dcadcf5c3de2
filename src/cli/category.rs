//! Category CLI commands

use clap::Subcommand;

use crate::display::format_category_list;
use crate::error::{FintrackError, FintrackResult};
use crate::models::CategoryKind;
use crate::services::CategoryService;
use crate::storage::Storage;

#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List categories
    List,
    /// Create a category
    Create {
        name: String,
        /// income or expense
        #[arg(short, long, default_value = "expense")]
        kind: String,
        /// Hex color such as "#22aa66"
        #[arg(short, long)]
        color: Option<String>,
    },
    /// Rename or recolor a category
    Edit {
        /// Category name or ID
        category: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        color: Option<String>,
        /// Remove the color
        #[arg(long, conflicts_with = "color")]
        no_color: bool,
    },
    /// Delete an unused category
    Delete { category: String },
}

pub fn handle_category_command(storage: &Storage, cmd: CategoryCommands) -> FintrackResult<()> {
    let service = CategoryService::new(storage);

    match cmd {
        CategoryCommands::List => {
            println!("{}", format_category_list(&service.list()?));
        }

        CategoryCommands::Create { name, kind, color } => {
            let kind = CategoryKind::parse(&kind).ok_or_else(|| {
                FintrackError::Validation(format!(
                    "Invalid category kind '{}'. Use income or expense.",
                    kind
                ))
            })?;
            let category = service.create(&name, kind, color)?;
            println!("Created {} category: {}", category.kind, category.name);
            println!("  ID: {}", category.id);
        }

        CategoryCommands::Edit {
            category,
            name,
            color,
            no_color,
        } => {
            let found = service.resolve(&category)?;
            let color = if no_color { Some(None) } else { color.map(Some) };
            if name.is_none() && color.is_none() {
                println!("No changes specified. Use --name, --color or --no-color.");
                return Ok(());
            }
            let updated = service.update(found.id, name.as_deref(), color)?;
            println!("Updated category: {}", updated.name);
        }

        CategoryCommands::Delete { category } => {
            let found = service.resolve(&category)?;
            let deleted = service.delete(found.id)?;
            println!("Deleted category: {}", deleted.name);
        }
    }

    Ok(())
}
