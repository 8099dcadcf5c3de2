//! Key handling for the dashboard

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::app::{App, Tab};
use super::event::Event;
use crate::cli::today;

pub fn handle_event(app: &mut App, event: Event) {
    match event {
        Event::Key(key) => handle_key_event(app, key),
        Event::Tick => app.tick(),
        Event::Resize(_, _) => {}
    }
}

pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // Windows reports releases too
    if key.kind != KeyEventKind::Press {
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        KeyCode::Char(c @ '1'..='5') => {
            if let Some(tab) = c.to_digit(10).and_then(Tab::from_number) {
                app.select_tab(tab);
            }
        }
        KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => app.select_tab(app.active_tab.next()),
        KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => {
            app.select_tab(app.active_tab.prev())
        }

        KeyCode::Char('j') | KeyCode::Down => app.move_down(),
        KeyCode::Char('k') | KeyCode::Up => app.move_up(),
        KeyCode::Char('g') | KeyCode::Home => app.move_to_top(),
        KeyCode::Char('G') | KeyCode::End => app.move_to_bottom(),

        KeyCode::Char('r') => match app.reload(today()) {
            Ok(()) => app.set_status("Reloaded"),
            Err(e) => {
                tracing::warn!(error = %e, "dashboard reload failed");
                app.set_status(format!("Reload failed: {}", e));
            }
        },

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::FintrackPaths;
    use crate::config::settings::Settings;
    use crate::storage::{initialize_storage, Storage};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = FintrackPaths::with_base_dir(temp_dir.path().to_path_buf());
        initialize_storage(&paths).unwrap();
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_tab_keys() {
        let (_temp_dir, mut storage) = create_test_storage();
        let settings = Settings::default();
        let today = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        let mut app = App::new(&mut storage, &settings, today).unwrap();

        handle_event(&mut app, press(KeyCode::Char('3')));
        assert_eq!(app.active_tab, Tab::Budgets);

        handle_event(&mut app, press(KeyCode::Tab));
        assert_eq!(app.active_tab, Tab::GoalsDebts);

        handle_event(&mut app, press(KeyCode::BackTab));
        handle_event(&mut app, press(KeyCode::BackTab));
        assert_eq!(app.active_tab, Tab::Transactions);

        handle_event(&mut app, press(KeyCode::Char('9')));
        assert_eq!(app.active_tab, Tab::Transactions);
    }

    #[test]
    fn test_reload_and_quit() {
        let (_temp_dir, mut storage) = create_test_storage();
        let settings = Settings::default();
        let today = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        let mut app = App::new(&mut storage, &settings, today).unwrap();

        handle_event(&mut app, press(KeyCode::Char('r')));
        assert_eq!(app.status_message.as_deref(), Some("Reloaded"));
        assert!(!app.should_quit);

        handle_event(&mut app, press(KeyCode::Char('q')));
        assert!(app.should_quit);
    }
}
