//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Which screen is showing
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum View {
    #[default]
    List,
    Detail,
    Form,
}

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // Package list
    SelectNext,
    SelectPrev,
    OpenDetail,
    StartSearch,
    StopSearch,
    SearchChar(char),
    SearchBackspace,
    CycleStatusFilter,

    // Detail view
    Back,
    ScrollUp,
    ScrollDown,
    ReloadPackage,

    // Update form
    OpenCreateForm,
    OpenUpdateForm,
    FormNextField,
    FormPrevField,
    FormChar(char),
    FormBackspace,
    FormNextStatus,
    FormPrevStatus,
    SubmitForm,
    CloseForm,

    // Data sync
    ForceRefresh,
    WindowFocused,

    // Popups
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// UI context needed to interpret a key press
#[derive(Clone, Copy, Debug, Default)]
pub struct KeyContext {
    pub view: View,
    pub search_active: bool,
    pub status_field_active: bool,
    pub show_help: bool,
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(key: KeyEvent, ctx: KeyContext) -> Option<UiEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => return Some(UiEvent::Quit),
            KeyCode::Char('r') => return Some(UiEvent::ForceRefresh),
            _ => {}
        }
    }

    if ctx.show_help {
        return Some(UiEvent::CloseHelp);
    }

    match ctx.view {
        View::List if ctx.search_active => handle_search_keys(key),
        View::List => handle_list_keys(key),
        View::Detail => handle_detail_keys(key),
        View::Form => handle_form_keys(key, ctx.status_field_active),
    }
}

fn handle_list_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Char('q') => Some(UiEvent::Quit),
        KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
        KeyCode::Char('r') => Some(UiEvent::ForceRefresh),
        KeyCode::Char('n') => Some(UiEvent::OpenCreateForm),
        KeyCode::Char('/') => Some(UiEvent::StartSearch),
        KeyCode::Char('f') => Some(UiEvent::CycleStatusFilter),
        KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::SelectPrev),
        KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::SelectNext),
        KeyCode::Enter => Some(UiEvent::OpenDetail),
        _ => None,
    }
}

fn handle_search_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Esc | KeyCode::Enter => Some(UiEvent::StopSearch),
        KeyCode::Backspace => Some(UiEvent::SearchBackspace),
        KeyCode::Char(c) => Some(UiEvent::SearchChar(c)),
        _ => None,
    }
}

fn handle_detail_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Char('q') => Some(UiEvent::Quit),
        KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
        KeyCode::Esc | KeyCode::Char('b') | KeyCode::Backspace => Some(UiEvent::Back),
        KeyCode::Char('u') => Some(UiEvent::OpenUpdateForm),
        KeyCode::Char('r') => Some(UiEvent::ReloadPackage),
        KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::ScrollUp),
        KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::ScrollDown),
        _ => None,
    }
}

/// The form is always in editing mode; printable keys go to the active field
fn handle_form_keys(key: KeyEvent, status_field_active: bool) -> Option<UiEvent> {
    match key.code {
        KeyCode::Esc => Some(UiEvent::CloseForm),
        KeyCode::Enter => Some(UiEvent::SubmitForm),
        KeyCode::Tab | KeyCode::Down => Some(UiEvent::FormNextField),
        KeyCode::BackTab | KeyCode::Up => Some(UiEvent::FormPrevField),
        KeyCode::Right | KeyCode::Char(' ') if status_field_active => Some(UiEvent::FormNextStatus),
        KeyCode::Left if status_field_active => Some(UiEvent::FormPrevStatus),
        KeyCode::Backspace => Some(UiEvent::FormBackspace),
        KeyCode::Char(c) => Some(UiEvent::FormChar(c)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctx(view: View) -> KeyContext {
        KeyContext {
            view,
            ..KeyContext::default()
        }
    }

    #[test]
    fn test_list_keys() {
        assert_eq!(key_to_ui_event(press(KeyCode::Char('r')), ctx(View::List)), Some(UiEvent::ForceRefresh));
        assert_eq!(key_to_ui_event(press(KeyCode::Enter), ctx(View::List)), Some(UiEvent::OpenDetail));
        assert_eq!(key_to_ui_event(press(KeyCode::Char('n')), ctx(View::List)), Some(UiEvent::OpenCreateForm));
    }

    #[test]
    fn test_search_captures_letters() {
        let searching = KeyContext {
            search_active: true,
            ..ctx(View::List)
        };
        assert_eq!(key_to_ui_event(press(KeyCode::Char('q')), searching), Some(UiEvent::SearchChar('q')));
        assert_eq!(key_to_ui_event(press(KeyCode::Esc), searching), Some(UiEvent::StopSearch));
    }

    #[test]
    fn test_form_status_field_cycles() {
        let on_status = KeyContext {
            status_field_active: true,
            ..ctx(View::Form)
        };
        assert_eq!(key_to_ui_event(press(KeyCode::Right), on_status), Some(UiEvent::FormNextStatus));
        assert_eq!(key_to_ui_event(press(KeyCode::Right), ctx(View::Form)), None);
        assert_eq!(key_to_ui_event(press(KeyCode::Char('q')), ctx(View::Form)), Some(UiEvent::FormChar('q')));
    }

    #[test]
    fn test_help_swallows_next_key() {
        let help = KeyContext {
            show_help: true,
            ..ctx(View::Detail)
        };
        assert_eq!(key_to_ui_event(press(KeyCode::Char('u')), help), Some(UiEvent::CloseHelp));
    }

    #[test]
    fn test_ctrl_c_always_quits() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(key_to_ui_event(key, ctx(View::Form)), Some(UiEvent::Quit));
    }
}
