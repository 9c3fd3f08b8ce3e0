use crate::application::{App, AppMode, MenuAction};
use crate::infrastructure::{CsvExporter, FileRepository};
use crossterm::event::{KeyCode, KeyModifiers};

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        match app.mode {
            AppMode::Menu => Self::handle_menu_mode(app, key, modifiers),
            AppMode::Prompt => Self::handle_prompt_mode(app, key),
            AppMode::Help => Self::handle_help_mode(app, key),
            AppMode::SaveAs | AppMode::LoadFile | AppMode::ExportCsv => {
                Self::handle_filename_input_mode(app, key)
            }
        }
    }

    fn handle_menu_mode(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            match key {
                KeyCode::Char('s') => app.start_save_as(),
                KeyCode::Char('o') => app.start_load_file(),
                KeyCode::Char('e') => app.start_csv_export(),
                _ => {}
            }
            return;
        }

        match key {
            KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => app.select_next(),
            KeyCode::Enter => app.activate_selected(),
            KeyCode::Char(c) if c.is_ascii_digit() => {
                if let Some(action) = MenuAction::from_digit(c) {
                    app.select(action);
                }
            }
            KeyCode::F(1) | KeyCode::Char('?') => {
                app.mode = AppMode::Help;
                app.help_scroll = 0;
            }
            KeyCode::Char('q') => app.select(MenuAction::Exit),
            KeyCode::Esc => app.status_message = None,
            _ => {}
        }
    }

    fn handle_prompt_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter => app.submit_input(),
            KeyCode::Esc => app.cancel_prompt(),
            _ => edit_buffer(&mut app.input, &mut app.cursor_position, key),
        }
    }

    fn handle_help_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q') => {
                app.mode = AppMode::Menu;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                app.help_scroll = app.help_scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.help_scroll += 1;
            }
            KeyCode::PageUp => {
                app.help_scroll = app.help_scroll.saturating_sub(5);
            }
            KeyCode::PageDown => {
                app.help_scroll += 5;
            }
            KeyCode::Home => {
                app.help_scroll = 0;
            }
            _ => {}
        }
    }

    fn handle_filename_input_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter => {
                let path = app.filename();
                match app.mode {
                    AppMode::SaveAs => {
                        let result = FileRepository::save_registry(&app.registry, &path);
                        app.set_save_result(result);
                    }
                    AppMode::LoadFile => {
                        let result = FileRepository::load_registry(&path);
                        app.set_load_result(path, result);
                    }
                    AppMode::ExportCsv => {
                        let result = CsvExporter::export_roads(&app.registry, &path);
                        app.set_csv_export_result(path, result);
                    }
                    _ => {}
                }
            }
            KeyCode::Esc => app.cancel_filename_input(),
            _ => edit_buffer(&mut app.filename_input, &mut app.cursor_position, key),
        }
    }
}

/// Line editing shared by every text field. `cursor` counts characters.
fn edit_buffer(buffer: &mut String, cursor: &mut usize, key: KeyCode) {
    let len = buffer.chars().count();
    match key {
        KeyCode::Backspace => {
            if *cursor > 0 {
                *cursor -= 1;
                let at = byte_offset(buffer, *cursor);
                buffer.remove(at);
            }
        }
        KeyCode::Delete => {
            if *cursor < len {
                let at = byte_offset(buffer, *cursor);
                buffer.remove(at);
            }
        }
        KeyCode::Left => *cursor = cursor.saturating_sub(1),
        KeyCode::Right => *cursor = (*cursor + 1).min(len),
        KeyCode::Home => *cursor = 0,
        KeyCode::End => *cursor = len,
        KeyCode::Char(c) => {
            let at = byte_offset(buffer, *cursor);
            buffer.insert(at, c);
            *cursor += 1;
        }
        _ => {}
    }
}

fn byte_offset(s: &str, char_pos: usize) -> usize {
    s.char_indices().nth(char_pos).map_or(s.len(), |(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Registry;
    use crate::infrastructure::Config;
    use tempfile::{tempdir, TempDir};

    fn test_app() -> (App, TempDir) {
        let dir = tempdir().unwrap();
        let config = Config {
            data_dir: dir.path().to_path_buf(),
            ..Config::default()
        };
        (App::new(Registry::new(), &config), dir)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            InputHandler::handle_key_event(app, KeyCode::Char(c), KeyModifiers::NONE);
        }
    }

    fn press(app: &mut App, key: KeyCode) {
        InputHandler::handle_key_event(app, key, KeyModifiers::NONE);
    }

    #[test]
    fn test_digit_opens_prompt() {
        let (mut app, _dir) = test_app();
        press(&mut app, KeyCode::Char('2'));

        assert_eq!(app.mode, AppMode::Prompt);
        assert_eq!(app.prompt.as_ref().unwrap().action, MenuAction::AddRoad);
    }

    #[test]
    fn test_arrow_navigation_and_enter() {
        let (mut app, _dir) = test_app();
        for _ in 0..5 {
            press(&mut app, KeyCode::Down);
        }
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, AppMode::Menu);
        assert_eq!(app.view, crate::application::View::Cities);
    }

    #[test]
    fn test_q_quits_from_menu_only() {
        let (mut app, _dir) = test_app();
        press(&mut app, KeyCode::Char('4'));
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);
        assert_eq!(app.input, "q");

        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_typing_a_city_through_keys() {
        let (mut app, _dir) = test_app();
        press(&mut app, KeyCode::Char('1'));
        type_text(&mut app, "1");
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "Kigalx");
        press(&mut app, KeyCode::Backspace);
        type_text(&mut app, "i");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, AppMode::Menu);
        assert_eq!(app.registry.resolve_city_by_name("Kigali"), Some(1));
    }

    #[test]
    fn test_edit_buffer_handles_multibyte_names() {
        let mut buffer = String::new();
        let mut cursor = 0;
        for c in "Gisénï".chars() {
            edit_buffer(&mut buffer, &mut cursor, KeyCode::Char(c));
        }
        edit_buffer(&mut buffer, &mut cursor, KeyCode::Left);
        edit_buffer(&mut buffer, &mut cursor, KeyCode::Backspace);
        assert_eq!(buffer, "Giséï");
        assert_eq!(cursor, 4);

        edit_buffer(&mut buffer, &mut cursor, KeyCode::Home);
        edit_buffer(&mut buffer, &mut cursor, KeyCode::Delete);
        assert_eq!(buffer, "iséï");
        edit_buffer(&mut buffer, &mut cursor, KeyCode::End);
        assert_eq!(cursor, 4);
    }

    #[test]
    fn test_help_toggle() {
        let (mut app, _dir) = test_app();
        press(&mut app, KeyCode::F(1));
        assert_eq!(app.mode, AppMode::Help);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::PageUp);
        assert_eq!(app.help_scroll, 0);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, AppMode::Menu);
    }

    #[test]
    fn test_save_and_load_through_keys() {
        let (mut app, dir) = test_app();
        app.registry.add_city("Musanze").unwrap();

        InputHandler::handle_key_event(&mut app, KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert_eq!(app.mode, AppMode::SaveAs);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, AppMode::Menu);
        assert!(dir.path().join("registry.json").exists());

        app.registry = Registry::new();
        InputHandler::handle_key_event(&mut app, KeyCode::Char('o'), KeyModifiers::CONTROL);
        assert_eq!(app.mode, AppMode::LoadFile);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.registry.resolve_city_by_name("Musanze"), Some(1));
    }

    #[test]
    fn test_csv_export_through_keys() {
        let (mut app, dir) = test_app();
        InputHandler::handle_key_event(&mut app, KeyCode::Char('e'), KeyModifiers::CONTROL);
        assert_eq!(app.mode, AppMode::ExportCsv);

        press(&mut app, KeyCode::Enter);
        assert!(dir.path().join("roads.csv").exists());
        assert_eq!(
            app.status_message.as_deref(),
            Some(format!("Exported 0 roads to {}", dir.path().join("roads.csv").display()).as_str())
        );
    }

    #[test]
    fn test_filename_dialog_escape() {
        let (mut app, _dir) = test_app();
        InputHandler::handle_key_event(&mut app, KeyCode::Char('s'), KeyModifiers::CONTROL);
        press(&mut app, KeyCode::Char('x'));
        assert!(app.filename_input.ends_with("registry.jsonx"));

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, AppMode::Menu);
        assert!(app.filename_input.is_empty());
    }
}
