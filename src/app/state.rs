//! App state - pure data structure with no I/O logic

use crate::messages::ui_events::{AuthField, EditColumn, InputMode, Panel};
use crate::messages::RenderState;
use crate::models::{AuthKind, Request, ResponseOutcome};

/// Main application state - pure data, no I/O
pub struct AppState {
    // Request data
    pub request: Request,
    pub cursor_position: usize,

    // UI state
    pub active_panel: Panel,
    pub input_mode: InputMode,
    pub response_scroll: u16,

    // Row editors
    pub selected_param: usize,
    pub selected_header: usize,
    pub edit_column: EditColumn,

    // Auth panel
    pub auth_field: AuthField,

    // Response
    pub outcome: Option<ResponseOutcome>,
    pub is_loading: bool,
    pub next_request_id: u64,
    pub pending_request_id: Option<u64>,

    // Popups
    pub show_help: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        let request = Request::default();
        AppState {
            cursor_position: request.url.len(),
            request,
            active_panel: Panel::Url,
            input_mode: InputMode::Normal,
            response_scroll: 0,
            selected_param: 0,
            selected_header: 0,
            edit_column: EditColumn::Key,
            auth_field: AuthField::Token,
            outcome: None,
            is_loading: false,
            next_request_id: 1,
            pending_request_id: None,
            show_help: false,
        }
    }

    /// Generate a unique request ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    /// Get the current input field content
    pub fn current_input(&self) -> &str {
        self.current_input_ref().map(String::as_str).unwrap_or("")
    }

    fn current_input_ref(&self) -> Option<&String> {
        match self.active_panel {
            Panel::Url => Some(&self.request.url),
            Panel::Body => Some(&self.request.body),
            Panel::Params => self
                .request
                .params
                .get(self.selected_param)
                .map(|row| row_column(row, self.edit_column)),
            Panel::Headers => self
                .request
                .headers
                .get(self.selected_header)
                .map(|row| row_column(row, self.edit_column)),
            Panel::Auth => self.auth_input(),
            Panel::Response => None,
        }
    }

    /// Mutable reference to the current input field, if the panel has one
    pub fn current_input_mut(&mut self) -> Option<&mut String> {
        match self.active_panel {
            Panel::Url => Some(&mut self.request.url),
            Panel::Body => Some(&mut self.request.body),
            Panel::Params => {
                let column = self.edit_column;
                self.request
                    .params
                    .get_mut(self.selected_param)
                    .map(|row| row_column_mut(row, column))
            }
            Panel::Headers => {
                let column = self.edit_column;
                self.request
                    .headers
                    .get_mut(self.selected_header)
                    .map(|row| row_column_mut(row, column))
            }
            Panel::Auth => self.auth_input_mut(),
            Panel::Response => None,
        }
    }

    fn auth_input(&self) -> Option<&String> {
        let auth = &self.request.auth;
        match (auth.kind, self.auth_field) {
            (AuthKind::Bearer, AuthField::Token) => Some(&auth.token),
            (AuthKind::Basic, AuthField::Username) => Some(&auth.username),
            (AuthKind::Basic, AuthField::Password) => Some(&auth.password),
            (AuthKind::ApiKey, AuthField::ApiKeyName) => Some(&auth.api_key_name),
            (AuthKind::ApiKey, AuthField::ApiKeyValue) => Some(&auth.api_key_value),
            _ => None,
        }
    }

    fn auth_input_mut(&mut self) -> Option<&mut String> {
        let auth = &mut self.request.auth;
        match (auth.kind, self.auth_field) {
            (AuthKind::Bearer, AuthField::Token) => Some(&mut auth.token),
            (AuthKind::Basic, AuthField::Username) => Some(&mut auth.username),
            (AuthKind::Basic, AuthField::Password) => Some(&mut auth.password),
            (AuthKind::ApiKey, AuthField::ApiKeyName) => Some(&mut auth.api_key_name),
            (AuthKind::ApiKey, AuthField::ApiKeyValue) => Some(&mut auth.api_key_value),
            _ => None,
        }
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        RenderState {
            method: self.request.method,
            url: self.request.url.clone(),
            params: self.request.params.clone(),
            headers: self.request.headers.clone(),
            body: self.request.body.clone(),
            auth: self.request.auth.clone(),
            active_panel: self.active_panel,
            input_mode: self.input_mode,
            cursor_position: self.cursor_position,
            selected_param: self.selected_param,
            selected_header: self.selected_header,
            edit_column: self.edit_column,
            auth_field: self.auth_field,
            outcome: self.outcome.clone(),
            response_scroll: self.response_scroll,
            is_loading: self.is_loading,
            show_help: self.show_help,
        }
    }
}

fn row_column(row: &crate::models::KeyValuePair, column: EditColumn) -> &String {
    match column {
        EditColumn::Key => &row.key,
        EditColumn::Value => &row.value,
        EditColumn::Description => &row.description,
    }
}

fn row_column_mut(row: &mut crate::models::KeyValuePair, column: EditColumn) -> &mut String {
    match column {
        EditColumn::Key => &mut row.key,
        EditColumn::Value => &mut row.value,
        EditColumn::Description => &mut row.description,
    }
}
