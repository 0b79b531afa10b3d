//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Events generated from user input in the UI layer
#[derive(Debug, Clone)]
pub enum UiEvent {
    // Panel navigation
    NextPanel,
    PrevPanel,
    ScrollUp,
    ScrollDown,

    // Input editing
    StartEditing,
    StopEditing,
    CharInput(char),
    Backspace,
    CursorLeft,
    CursorRight,
    /// Move to the next editable field of the current panel (row column or
    /// auth field)
    NextField,

    // Request actions
    SendRequest,
    CycleMethod,

    // Params / Headers row editors
    NextRow,
    PrevRow,
    ToggleRow,
    AddRow,
    DeleteRow,

    // Auth
    CycleAuth,

    // Response
    ClearResponse,

    // Popups
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// Active panel in the UI (needed for context-aware event mapping)
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum Panel {
    #[default]
    Url,
    Params,
    Auth,
    Headers,
    Body,
    Response,
}

impl Panel {
    pub fn next(&self) -> Panel {
        match self {
            Panel::Url => Panel::Params,
            Panel::Params => Panel::Auth,
            Panel::Auth => Panel::Headers,
            Panel::Headers => Panel::Body,
            Panel::Body => Panel::Response,
            Panel::Response => Panel::Url,
        }
    }

    pub fn prev(&self) -> Panel {
        match self {
            Panel::Url => Panel::Response,
            Panel::Params => Panel::Url,
            Panel::Auth => Panel::Params,
            Panel::Headers => Panel::Auth,
            Panel::Body => Panel::Headers,
            Panel::Response => Panel::Body,
        }
    }

    /// Panels backed by a list of key/value rows
    pub fn is_row_editor(&self) -> bool {
        matches!(self, Panel::Params | Panel::Headers)
    }
}

/// Input mode
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Editing,
}

/// Column being edited in a params/headers row
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum EditColumn {
    #[default]
    Key,
    Value,
    Description,
}

impl EditColumn {
    pub fn next(&self) -> EditColumn {
        match self {
            EditColumn::Key => EditColumn::Value,
            EditColumn::Value => EditColumn::Description,
            EditColumn::Description => EditColumn::Key,
        }
    }
}

/// Auth editing field
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum AuthField {
    #[default]
    Token,
    Username,
    Password,
    ApiKeyName,
    ApiKeyValue,
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(
    key: KeyEvent,
    active_panel: Panel,
    input_mode: InputMode,
    show_help: bool,
) -> Option<UiEvent> {
    use crossterm::event::KeyEventKind;

    if key.kind != KeyEventKind::Press {
        return None;
    }

    // Global Ctrl shortcuts
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if let KeyCode::Char('c') = key.code {
            return Some(UiEvent::Quit);
        }
    }

    // Any key closes the help popup
    if show_help {
        return Some(UiEvent::CloseHelp);
    }

    match input_mode {
        InputMode::Normal => normal_mode_event(key, active_panel),
        InputMode::Editing => editing_mode_event(key, active_panel),
    }
}

fn normal_mode_event(key: KeyEvent, active_panel: Panel) -> Option<UiEvent> {
    match key.code {
        KeyCode::Char('q') => Some(UiEvent::Quit),
        KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
        KeyCode::Tab => Some(UiEvent::NextPanel),
        KeyCode::BackTab => Some(UiEvent::PrevPanel),
        KeyCode::Char('m') => Some(UiEvent::CycleMethod),
        KeyCode::Char('s') => Some(UiEvent::SendRequest),
        KeyCode::Char('x') => Some(UiEvent::ClearResponse),
        KeyCode::Char('e') => match active_panel {
            Panel::Url | Panel::Body | Panel::Auth | Panel::Params | Panel::Headers => {
                Some(UiEvent::StartEditing)
            }
            Panel::Response => None,
        },
        KeyCode::Enter | KeyCode::Char(' ') if active_panel.is_row_editor() => {
            Some(UiEvent::ToggleRow)
        }
        KeyCode::Enter => match active_panel {
            Panel::Url | Panel::Body | Panel::Auth => Some(UiEvent::StartEditing),
            _ => None,
        },
        KeyCode::Up => match active_panel {
            Panel::Params | Panel::Headers => Some(UiEvent::PrevRow),
            Panel::Response => Some(UiEvent::ScrollUp),
            _ => None,
        },
        KeyCode::Down => match active_panel {
            Panel::Params | Panel::Headers => Some(UiEvent::NextRow),
            Panel::Response => Some(UiEvent::ScrollDown),
            _ => None,
        },
        KeyCode::Char('a') if active_panel.is_row_editor() => Some(UiEvent::AddRow),
        KeyCode::Char('d') if active_panel.is_row_editor() => Some(UiEvent::DeleteRow),
        KeyCode::Char('t') if active_panel == Panel::Auth => Some(UiEvent::CycleAuth),
        _ => None,
    }
}

fn editing_mode_event(key: KeyEvent, active_panel: Panel) -> Option<UiEvent> {
    match key.code {
        KeyCode::Esc => Some(UiEvent::StopEditing),
        KeyCode::Left => Some(UiEvent::CursorLeft),
        KeyCode::Right => Some(UiEvent::CursorRight),
        KeyCode::Backspace => Some(UiEvent::Backspace),
        KeyCode::Tab => match active_panel {
            Panel::Params | Panel::Headers | Panel::Auth => Some(UiEvent::NextField),
            _ => None,
        },
        KeyCode::Enter => {
            if active_panel == Panel::Url {
                Some(UiEvent::SendRequest)
            } else {
                Some(UiEvent::StopEditing)
            }
        }
        KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
        _ => None,
    }
}
