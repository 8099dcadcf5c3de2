//! YAML export of the whole store

use std::io::Write;

use crate::error::{FintrackError, FintrackResult};
use crate::export::json::FullExport;
use crate::storage::Storage;

pub fn export_full_yaml<W: Write>(storage: &Storage, writer: &mut W) -> FintrackResult<()> {
    let export = FullExport::from_storage(storage)?;
    let io_err = |e: std::io::Error| FintrackError::Export(e.to_string());

    writeln!(writer, "# fintrack export").map_err(io_err)?;
    writeln!(writer, "# Generated: {}", export.exported_at).map_err(io_err)?;
    writeln!(writer, "# App Version: {}", export.app_version).map_err(io_err)?;
    writeln!(writer).map_err(io_err)?;

    serde_yaml::to_writer(writer, &export).map_err(|e| FintrackError::Export(e.to_string()))?;

    tracing::info!(transactions = export.metadata.transaction_count, "exported YAML");
    Ok(())
}

pub fn import_from_yaml(yaml_str: &str) -> FintrackResult<FullExport> {
    let export: FullExport =
        serde_yaml::from_str(yaml_str).map_err(|e| FintrackError::Import(e.to_string()))?;
    export.validate().map_err(FintrackError::Import)?;
    Ok(export)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::FintrackPaths;
    use crate::models::{Account, AccountType, Frequency, Money, Subscription};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = FintrackPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_yaml_roundtrip() {
        let (_temp_dir, storage) = create_test_storage();
        let account = Account::new("Checking", AccountType::Checking);
        storage.accounts.upsert(account.clone()).unwrap();
        storage
            .subscriptions
            .upsert(Subscription::new(
                "Gym",
                Money::from_cents(4_500),
                Frequency::Monthly,
                account.id,
                NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            ))
            .unwrap();

        let mut output = Vec::new();
        export_full_yaml(&storage, &mut output).unwrap();
        let yaml = String::from_utf8(output).unwrap();
        assert!(yaml.starts_with("# fintrack export"));
        assert!(yaml.contains("Gym"));

        // Comment lines are valid YAML
        let imported = import_from_yaml(&yaml).unwrap();
        assert_eq!(imported.subscriptions.len(), 1);
        assert_eq!(imported.accounts[0].name, "Checking");
    }
}
