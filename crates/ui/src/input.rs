use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use keydrill_core::model::KeyChord;

/// Maps a terminal key event to a key chord.
///
/// Only press events map. A bare modifier press (or a key the game has no
/// name for) yields a chord without a primary key, which the session
/// silently ignores.
#[must_use]
pub fn chord_from_key_event(event: &KeyEvent) -> Option<KeyChord> {
    if event.kind != KeyEventKind::Press {
        return None;
    }
    Some(KeyChord {
        ctrl: event.modifiers.contains(KeyModifiers::CONTROL),
        alt: event.modifiers.contains(KeyModifiers::ALT),
        meta: event.modifiers.contains(KeyModifiers::SUPER)
            || event.modifiers.contains(KeyModifiers::META),
        shift: event.modifiers.contains(KeyModifiers::SHIFT),
        key: key_name(event.code),
    })
}

fn key_name(code: KeyCode) -> Option<String> {
    let name = match code {
        KeyCode::Char(c) => return Some(c.to_lowercase().collect()),
        KeyCode::Enter => "enter",
        KeyCode::Backspace => "backspace",
        KeyCode::Tab => "tab",
        KeyCode::Esc => "escape",
        KeyCode::Left => "arrowleft",
        KeyCode::Right => "arrowright",
        KeyCode::Up => "arrowup",
        KeyCode::Down => "arrowdown",
        KeyCode::Home => "home",
        KeyCode::End => "end",
        KeyCode::PageUp => "pageup",
        KeyCode::PageDown => "pagedown",
        KeyCode::Delete => "delete",
        KeyCode::Insert => "insert",
        KeyCode::F(n) => return Some(format!("f{n}")),
        // Bare modifiers and anything else the game has no name for.
        _ => return None,
    };
    Some(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn ctrl_arrow_maps_to_expected_combo() {
        let event = press(KeyCode::Right, KeyModifiers::CONTROL);
        let chord = chord_from_key_event(&event).unwrap();
        assert_eq!(chord.normalize().unwrap().as_str(), "ctrl+arrowright");
    }

    #[test]
    fn shifted_letter_is_lowercased() {
        let event = press(KeyCode::Char('F'), KeyModifiers::SHIFT);
        let chord = chord_from_key_event(&event).unwrap();
        assert_eq!(chord.normalize().unwrap().as_str(), "shift+f");
    }

    #[test]
    fn super_and_meta_both_map_to_meta() {
        for modifier in [KeyModifiers::SUPER, KeyModifiers::META] {
            let event = press(KeyCode::Char('k'), modifier);
            let chord = chord_from_key_event(&event).unwrap();
            assert_eq!(chord.normalize().unwrap().as_str(), "meta+k");
        }
    }

    #[test]
    fn bare_modifier_press_yields_no_primary_key() {
        let event = press(KeyCode::Modifier(crossterm::event::ModifierKeyCode::LeftShift), KeyModifiers::SHIFT);
        let chord = chord_from_key_event(&event).unwrap();
        assert!(chord.is_modifier_only());
    }

    #[test]
    fn release_events_do_not_map() {
        let mut event = press(KeyCode::Char('f'), KeyModifiers::CONTROL);
        event.kind = KeyEventKind::Release;
        assert_eq!(chord_from_key_event(&event), None);
    }
}
