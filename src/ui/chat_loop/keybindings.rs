//! Translate terminal events into [`AppAction`]s. Nothing here mutates the
//! app; the event loop dispatches whatever comes back.

use ratatui::crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tui_textarea::{Input as TAInput, Key as TAKey};

use crate::core::app::{App, AppAction};
use crate::core::mode::Mode;

const PAGE_LINES: u16 = 10;

pub fn action_for_event(event: Event, app: &App) -> Option<AppAction> {
    match event {
        Event::Key(key) => action_for_key(key, app),
        Event::Paste(text) => {
            if app.help_visible {
                return None;
            }
            // Terminals send CR for newlines inside bracketed paste
            let text = text.replace("\r\n", "\n").replace('\r', "\n");
            Some(AppAction::InsertIntoInput { text })
        }
        _ => None,
    }
}

pub fn action_for_key(key: KeyEvent, app: &App) -> Option<AppAction> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    if ctrl && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C')) {
        return Some(AppAction::Quit);
    }

    if app.help_visible {
        return match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => Some(AppAction::HideHelp),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Esc => Some(AppAction::CancelRequest),
        KeyCode::Enter if alt || key.modifiers.contains(KeyModifiers::SHIFT) => {
            Some(AppAction::EditInput {
                input: TAInput {
                    key: TAKey::Enter,
                    ..Default::default()
                },
            })
        }
        KeyCode::Enter => Some(AppAction::Submit),
        KeyCode::F(2) => Some(AppAction::SwitchMode { mode: Mode::Chat }),
        KeyCode::F(3) => Some(AppAction::SwitchMode {
            mode: Mode::ImageGeneration,
        }),
        KeyCode::Char('y') | KeyCode::Char('Y') if ctrl => {
            Some(AppAction::CopyCodeBlock { index: None })
        }
        KeyCode::PageUp => Some(AppAction::ScrollUp { lines: PAGE_LINES }),
        KeyCode::PageDown => Some(AppAction::ScrollDown { lines: PAGE_LINES }),
        KeyCode::End if ctrl => Some(AppAction::ScrollToBottom),
        // Up/Down scroll the transcript unless the prompt has several lines
        KeyCode::Up if app.input.line_count() <= 1 => Some(AppAction::ScrollUp { lines: 1 }),
        KeyCode::Down if app.input.line_count() <= 1 => {
            Some(AppAction::ScrollDown { lines: 1 })
        }
        _ => Some(AppAction::EditInput {
            input: TAInput::from(key),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::app::apply_action;
    use crate::utils::test_utils::create_test_app;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn enter_submits_and_alt_enter_inserts_newline() {
        let mut app = create_test_app();
        assert!(matches!(
            action_for_key(key(KeyCode::Enter, KeyModifiers::NONE), &app),
            Some(AppAction::Submit)
        ));

        for ch in "ab".chars() {
            let action = action_for_key(key(KeyCode::Char(ch), KeyModifiers::NONE), &app)
                .expect("typing maps to an edit");
            apply_action(&mut app, action);
        }
        let action =
            action_for_key(key(KeyCode::Enter, KeyModifiers::ALT), &app).expect("newline");
        apply_action(&mut app, action);
        assert_eq!(app.input.text(), "ab\n");
        assert_eq!(app.input.line_count(), 2);
    }

    #[test]
    fn function_keys_switch_modes() {
        let app = create_test_app();
        assert!(matches!(
            action_for_key(key(KeyCode::F(3), KeyModifiers::NONE), &app),
            Some(AppAction::SwitchMode {
                mode: Mode::ImageGeneration
            })
        ));
        assert!(matches!(
            action_for_key(key(KeyCode::F(2), KeyModifiers::NONE), &app),
            Some(AppAction::SwitchMode { mode: Mode::Chat })
        ));
    }

    #[test]
    fn control_shortcuts() {
        let app = create_test_app();
        assert!(matches!(
            action_for_key(key(KeyCode::Char('c'), KeyModifiers::CONTROL), &app),
            Some(AppAction::Quit)
        ));
        assert!(matches!(
            action_for_key(key(KeyCode::Char('y'), KeyModifiers::CONTROL), &app),
            Some(AppAction::CopyCodeBlock { index: None })
        ));
        assert!(matches!(
            action_for_key(key(KeyCode::Esc, KeyModifiers::NONE), &app),
            Some(AppAction::CancelRequest)
        ));
    }

    #[test]
    fn help_overlay_swallows_keys() {
        let mut app = create_test_app();
        app.help_visible = true;
        assert!(action_for_key(key(KeyCode::Char('x'), KeyModifiers::NONE), &app).is_none());
        assert!(matches!(
            action_for_key(key(KeyCode::Esc, KeyModifiers::NONE), &app),
            Some(AppAction::HideHelp)
        ));
        assert!(action_for_event(Event::Paste("text".into()), &app).is_none());
    }

    #[test]
    fn arrows_scroll_only_for_single_line_prompts() {
        let mut app = create_test_app();
        assert!(matches!(
            action_for_key(key(KeyCode::Up, KeyModifiers::NONE), &app),
            Some(AppAction::ScrollUp { lines: 1 })
        ));
        app.input.insert_str("one");
        app.input.textarea.insert_newline();
        assert!(matches!(
            action_for_key(key(KeyCode::Up, KeyModifiers::NONE), &app),
            Some(AppAction::EditInput { .. })
        ));
    }

    #[test]
    fn paste_normalizes_carriage_returns() {
        let app = create_test_app();
        match action_for_event(Event::Paste("a\r\nb\rc".into()), &app) {
            Some(AppAction::InsertIntoInput { text }) => assert_eq!(text, "a\nb\nc"),
            other => panic!("unexpected action: {other:?}"),
        }
    }
}
