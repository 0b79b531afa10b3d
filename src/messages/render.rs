//! Render state - data structure sent from App layer to UI for rendering

use crate::messages::ui_events::{AuthField, EditColumn, InputMode, Panel};
use crate::models::{AuthState, HttpMethod, KeyValuePair, ResponseOutcome};

/// Complete state needed by the UI to render
#[derive(Debug, Clone)]
pub struct RenderState {
    // Request data
    pub method: HttpMethod,
    pub url: String,
    pub params: Vec<KeyValuePair>,
    pub headers: Vec<KeyValuePair>,
    pub body: String,
    pub auth: AuthState,

    // UI state
    pub active_panel: Panel,
    pub input_mode: InputMode,
    pub cursor_position: usize,
    pub selected_param: usize,
    pub selected_header: usize,
    pub edit_column: EditColumn,
    pub auth_field: AuthField,

    // Response
    pub outcome: Option<ResponseOutcome>,
    pub response_scroll: u16,
    pub is_loading: bool,

    // Popups
    pub show_help: bool,
}

impl Default for RenderState {
    fn default() -> Self {
        let request = crate::models::Request::default();
        RenderState {
            cursor_position: request.url.len(),
            method: request.method,
            url: request.url,
            params: request.params,
            headers: request.headers,
            body: request.body,
            auth: request.auth,
            active_panel: Panel::Url,
            input_mode: InputMode::Normal,
            selected_param: 0,
            selected_header: 0,
            edit_column: EditColumn::Key,
            auth_field: AuthField::Token,
            outcome: None,
            response_scroll: 0,
            is_loading: false,
            show_help: false,
        }
    }
}
