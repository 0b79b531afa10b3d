//! Command handlers - business logic for processing UI events
//!
//! Every mutation that can change the URL or the param list goes through the
//! `query` module's pure functions so the two sides never drift apart.

use crate::app::AppState;
use crate::assembler;
use crate::messages::ui_events::{AuthField, EditColumn, InputMode, Panel};
use crate::messages::{NetworkCommand, NetworkResponse};
use crate::models::{AuthKind, KeyValuePair, ResponseOutcome};
use crate::query;

impl AppState {
    // ========================
    // Navigation
    // ========================

    pub fn next_panel(&mut self) {
        self.active_panel = self.active_panel.next();
    }

    pub fn prev_panel(&mut self) {
        self.active_panel = self.active_panel.prev();
    }

    // ========================
    // Input editing
    // ========================

    pub fn start_editing(&mut self) {
        match self.active_panel {
            Panel::Response => {}
            Panel::Params if self.request.params.is_empty() => self.add_row(),
            Panel::Headers if self.request.headers.is_empty() => self.add_row(),
            _ => {}
        }
        if self.active_panel.is_row_editor() {
            self.edit_column = EditColumn::Key;
        }
        if self.active_panel == Panel::Auth && self.auth_field_invalid() {
            self.reset_auth_field();
        }
        if self.active_panel != Panel::Response {
            self.input_mode = InputMode::Editing;
            self.cursor_position = self.current_input().len();
        }
    }

    pub fn stop_editing(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn move_cursor_left(&mut self) {
        let input = self.current_input();
        if self.cursor_position > 0 {
            let new_pos = input[..self.cursor_position]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.cursor_position = new_pos;
        }
    }

    pub fn move_cursor_right(&mut self) {
        let input = self.current_input();
        if self.cursor_position < input.len() {
            let new_pos = input[self.cursor_position..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor_position + i)
                .unwrap_or(input.len());
            self.cursor_position = new_pos;
        }
    }

    pub fn enter_char(&mut self, c: char) {
        let cursor_pos = self.cursor_position;
        if let Some(input) = self.current_input_mut() {
            if cursor_pos <= input.len() {
                input.insert(cursor_pos, c);
                self.cursor_position = cursor_pos + c.len_utf8();
                self.sync_after_edit();
            }
        }
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position == 0 {
            return;
        }
        let cursor_pos = self.cursor_position;
        if let Some(input) = self.current_input_mut() {
            let prev_pos = input[..cursor_pos]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            input.remove(prev_pos);
            self.cursor_position = prev_pos;
            self.sync_after_edit();
        }
    }

    /// Resynchronize URL and params after a character-level edit.
    ///
    /// URL edits reparse the param list (keeping orphaned disabled params);
    /// param key/value edits rebuild the URL. Description edits and all other
    /// fields leave the URL alone.
    fn sync_after_edit(&mut self) {
        match self.active_panel {
            Panel::Url => {
                self.request.params =
                    query::merge_url_edit(&self.request.url, &self.request.params);
                // Merge can shrink the list out from under the row selection
                self.clamp_selections();
            }
            Panel::Params if self.edit_column != EditColumn::Description => {
                self.resync_url();
            }
            _ => {}
        }
    }

    fn resync_url(&mut self) {
        let base = query::base_url(&self.request.url).to_string();
        self.request.url = query::rebuild_url(&base, &self.request.params);
    }

    /// Move to the next editable field of the current panel
    pub fn next_field(&mut self) {
        match self.active_panel {
            Panel::Params | Panel::Headers => {
                self.edit_column = self.edit_column.next();
            }
            Panel::Auth => self.cycle_auth_field(),
            _ => return,
        }
        self.cursor_position = self.current_input().len();
    }

    // ========================
    // HTTP Method
    // ========================

    pub fn cycle_method(&mut self) {
        if !self.is_loading {
            self.request.method = self.request.method.next();
        }
    }

    // ========================
    // Response scrolling
    // ========================

    pub fn scroll_up(&mut self) {
        self.response_scroll = self.response_scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.response_scroll = self.response_scroll.saturating_add(1);
    }

    pub fn clear_response(&mut self) {
        self.outcome = None;
        self.response_scroll = 0;
    }

    // ========================
    // Params / Headers rows
    // ========================

    pub fn next_row(&mut self) {
        let (rows_len, selected) = self.active_rows();
        if rows_len > 0 {
            *selected = (*selected + 1) % rows_len;
        }
    }

    pub fn prev_row(&mut self) {
        let (rows_len, selected) = self.active_rows();
        if rows_len > 0 {
            *selected = selected.checked_sub(1).unwrap_or(rows_len - 1);
        }
    }

    pub fn toggle_row(&mut self) {
        match self.active_panel {
            Panel::Params => {
                if let Some(row) = self.request.params.get_mut(self.selected_param) {
                    row.enabled = !row.enabled;
                    self.resync_url();
                }
            }
            Panel::Headers => {
                if let Some(row) = self.request.headers.get_mut(self.selected_header) {
                    row.enabled = !row.enabled;
                }
            }
            _ => {}
        }
    }

    pub fn add_row(&mut self) {
        match self.active_panel {
            Panel::Params => {
                // An empty key serializes to nothing, so no URL rebuild yet
                self.request.params.push(KeyValuePair::blank());
                self.selected_param = self.request.params.len() - 1;
            }
            Panel::Headers => {
                self.request.headers.push(KeyValuePair::blank());
                self.selected_header = self.request.headers.len() - 1;
            }
            _ => {}
        }
    }

    pub fn delete_row(&mut self) {
        match self.active_panel {
            Panel::Params => {
                if self.selected_param < self.request.params.len() {
                    self.request.params.remove(self.selected_param);
                    if self.selected_param > 0 {
                        self.selected_param -= 1;
                    }
                    self.resync_url();
                }
            }
            Panel::Headers => {
                if self.selected_header < self.request.headers.len() {
                    self.request.headers.remove(self.selected_header);
                    if self.selected_header > 0 {
                        self.selected_header -= 1;
                    }
                }
            }
            _ => {}
        }
    }

    /// Pull row selections back in bounds after the backing list shrank
    fn clamp_selections(&mut self) {
        self.selected_param = self
            .selected_param
            .min(self.request.params.len().saturating_sub(1));
        self.selected_header = self
            .selected_header
            .min(self.request.headers.len().saturating_sub(1));
    }

    fn active_rows(&mut self) -> (usize, &mut usize) {
        match self.active_panel {
            Panel::Headers => (self.request.headers.len(), &mut self.selected_header),
            _ => (self.request.params.len(), &mut self.selected_param),
        }
    }

    // ========================
    // Auth
    // ========================

    /// Switch to the next auth kind. Fields typed under other kinds stay in
    /// memory and come back when their kind becomes active again.
    pub fn cycle_auth(&mut self) {
        self.request.auth.kind = self.request.auth.kind.next();
        self.reset_auth_field();
    }

    fn cycle_auth_field(&mut self) {
        self.auth_field = match (self.request.auth.kind, self.auth_field) {
            (AuthKind::Basic, AuthField::Username) => AuthField::Password,
            (AuthKind::Basic, _) => AuthField::Username,
            (AuthKind::ApiKey, AuthField::ApiKeyName) => AuthField::ApiKeyValue,
            (AuthKind::ApiKey, _) => AuthField::ApiKeyName,
            _ => AuthField::Token,
        };
    }

    pub(crate) fn reset_auth_field(&mut self) {
        self.auth_field = match self.request.auth.kind {
            AuthKind::Basic => AuthField::Username,
            AuthKind::ApiKey => AuthField::ApiKeyName,
            _ => AuthField::Token,
        };
    }

    pub(crate) fn auth_field_invalid(&self) -> bool {
        let valid = matches!(
            (self.request.auth.kind, self.auth_field),
            (AuthKind::Bearer, AuthField::Token)
                | (AuthKind::Basic, AuthField::Username)
                | (AuthKind::Basic, AuthField::Password)
                | (AuthKind::ApiKey, AuthField::ApiKeyName)
                | (AuthKind::ApiKey, AuthField::ApiKeyValue)
        );
        !valid
    }

    // ========================
    // Request sending
    // ========================

    /// Assemble the current request and prepare a network command.
    ///
    /// Validation failures are surfaced inline as a failure outcome and no
    /// command is produced. A send while one is in flight supersedes it:
    /// the new generation id makes the old response stale.
    pub fn prepare_request(&mut self) -> Option<NetworkCommand> {
        let descriptor = match assembler::assemble(&self.request) {
            Ok(descriptor) => descriptor,
            Err(e) => {
                self.outcome = Some(ResponseOutcome::Failure {
                    message: e.to_string(),
                    status: None,
                    status_text: None,
                    body: None,
                    elapsed_ms: 0,
                });
                return None;
            }
        };

        self.is_loading = true;
        self.outcome = None;
        self.response_scroll = 0;

        let id = self.next_id();
        self.pending_request_id = Some(id);

        Some(NetworkCommand::Execute { id, descriptor })
    }

    // ========================
    // Response handling
    // ========================

    pub fn handle_response(&mut self, response: NetworkResponse) {
        let NetworkResponse::Completed { id, outcome } = response;

        // Stale generation: a newer send superseded this one
        if self.pending_request_id != Some(id) {
            return;
        }

        self.outcome = Some(outcome);
        self.is_loading = false;
        self.pending_request_id = None;
        self.response_scroll = 0;
    }

    // ========================
    // Help popup
    // ========================

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn state_with_url(url: &str) -> AppState {
        let mut state = AppState::new();
        state.request.url = url.to_string();
        state.request.params = query::parse_params(url);
        state.cursor_position = url.len();
        state
    }

    fn type_string(state: &mut AppState, text: &str) {
        for c in text.chars() {
            state.enter_char(c);
        }
    }

    #[test]
    fn typing_in_url_reparses_params() {
        let mut state = state_with_url("https://x.com/a");
        state.active_panel = Panel::Url;
        state.start_editing();
        type_string(&mut state, "?foo=1");

        assert_eq!(state.request.params, vec![KeyValuePair::new("foo", "1")]);
    }

    #[test]
    fn editing_param_value_rebuilds_url() {
        let mut state = state_with_url("https://x.com/a?foo=1");
        state.active_panel = Panel::Params;
        state.start_editing();
        state.next_field(); // Key -> Value
        type_string(&mut state, "2");

        assert_eq!(state.request.url, "https://x.com/a?foo=12");
    }

    #[test]
    fn editing_description_leaves_url_alone() {
        let mut state = state_with_url("https://x.com/a?foo=1");
        state.active_panel = Panel::Params;
        state.start_editing();
        state.next_field();
        state.next_field(); // Key -> Value -> Description
        type_string(&mut state, "page number");

        assert_eq!(state.request.url, "https://x.com/a?foo=1");
        assert_eq!(state.request.params[0].description, "page number");
    }

    #[test]
    fn toggling_param_removes_it_from_url_but_not_list() {
        let mut state = state_with_url("https://x.com/a?foo=1&bar=2");
        state.active_panel = Panel::Params;
        state.toggle_row();

        assert_eq!(state.request.url, "https://x.com/a?bar=2");
        assert_eq!(state.request.params.len(), 2);
        assert!(!state.request.params[0].enabled);
    }

    #[test]
    fn disabled_param_survives_manual_url_edit() {
        let mut state = state_with_url("https://x.com/a?foo=1&bar=2");
        state.active_panel = Panel::Params;
        state.toggle_row(); // disable foo, URL becomes ?bar=2

        state.active_panel = Panel::Url;
        state.start_editing();
        type_string(&mut state, "&baz=3");

        let foo = state
            .request
            .params
            .iter()
            .find(|p| p.key == "foo")
            .expect("disabled param should be retained");
        assert!(!foo.enabled);
        assert!(state.request.params.iter().any(|p| p.key == "baz"));
    }

    #[test]
    fn deleting_param_rebuilds_url() {
        let mut state = state_with_url("https://x.com/a?foo=1&bar=2");
        state.active_panel = Panel::Params;
        state.delete_row();

        assert_eq!(state.request.url, "https://x.com/a?bar=2");
        assert_eq!(state.request.params.len(), 1);
    }

    #[test]
    fn empty_url_send_fails_inline_without_command() {
        let mut state = state_with_url("");
        let command = state.prepare_request();

        assert!(command.is_none());
        assert!(!state.is_loading);
        assert!(matches!(
            state.outcome,
            Some(ResponseOutcome::Failure { .. })
        ));
    }

    #[test]
    fn send_allocates_fresh_generation_id() {
        let mut state = state_with_url("https://x.com/a");
        let first = state.prepare_request();
        assert!(matches!(first, Some(NetworkCommand::Execute { id: 1, .. })));

        let second = state.prepare_request();
        assert!(matches!(second, Some(NetworkCommand::Execute { id: 2, .. })));
        assert_eq!(state.pending_request_id, Some(2));
    }

    #[test]
    fn stale_response_is_ignored() {
        let mut state = state_with_url("https://x.com/a");
        let _ = state.prepare_request(); // id 1
        let _ = state.prepare_request(); // id 2 supersedes

        state.handle_response(NetworkResponse::Completed {
            id: 1,
            outcome: ResponseOutcome::Failure {
                message: "stale".to_string(),
                status: None,
                status_text: None,
                body: None,
                elapsed_ms: 10,
            },
        });

        // Still waiting on generation 2
        assert!(state.is_loading);
        assert_eq!(state.outcome, None);

        state.handle_response(NetworkResponse::Completed {
            id: 2,
            outcome: ResponseOutcome::Success {
                status: 200,
                status_text: "OK".to_string(),
                headers: vec![],
                body: "{}".to_string(),
                elapsed_ms: 42,
                size_bytes: 2,
            },
        });
        assert!(!state.is_loading);
        assert_eq!(state.outcome.as_ref().and_then(|o| o.status()), Some(200));
    }

    #[test]
    fn cycle_auth_walks_all_kinds() {
        let mut state = AppState::new();
        assert_eq!(state.request.auth.kind, AuthKind::None);
        state.cycle_auth();
        assert_eq!(state.request.auth.kind, AuthKind::Bearer);
        state.cycle_auth();
        assert_eq!(state.request.auth.kind, AuthKind::Basic);
        assert_eq!(state.auth_field, AuthField::Username);
        state.cycle_auth();
        assert_eq!(state.request.auth.kind, AuthKind::ApiKey);
        assert_eq!(state.auth_field, AuthField::ApiKeyName);
        state.cycle_auth();
        assert_eq!(state.request.auth.kind, AuthKind::None);
    }

    #[test]
    fn cycling_auth_preserves_inactive_fields() {
        let mut state = AppState::new();
        state.active_panel = Panel::Auth;
        state.cycle_auth(); // Bearer
        state.start_editing();
        type_string(&mut state, "my-token");
        state.stop_editing();

        state.cycle_auth(); // Basic
        state.start_editing();
        type_string(&mut state, "alice");
        state.stop_editing();

        // Full cycle back around to Bearer: the token is still there
        state.cycle_auth(); // ApiKey
        state.cycle_auth(); // None
        state.cycle_auth(); // Bearer
        assert_eq!(state.request.auth.token, "my-token");
        assert_eq!(state.request.auth.username, "alice");
    }

    #[test]
    fn delete_row_after_url_edit_shrank_params_stays_in_bounds() {
        let mut state = state_with_url("https://x.com/a?one=1&two=2&three=3");
        state.active_panel = Panel::Params;
        state.next_row();
        state.next_row();
        assert_eq!(state.selected_param, 2);

        // Manual URL edit that drops the whole query string
        state.active_panel = Panel::Url;
        state.start_editing();
        state.request.url = "https://x.com/a?one=1".to_string();
        state.cursor_position = state.request.url.len();
        state.enter_char('x'); // triggers the merge resync

        assert_eq!(state.request.params.len(), 1);
        assert_eq!(state.selected_param, 0);

        state.stop_editing();
        state.active_panel = Panel::Params;
        state.delete_row();
        assert!(state.request.params.is_empty());

        // Deleting again with nothing selected is a no-op
        state.delete_row();
    }

    #[test]
    fn add_row_on_params_panel_appends_blank_enabled_row() {
        let mut state = state_with_url("https://x.com/a");
        state.active_panel = Panel::Params;
        state.add_row();

        assert_eq!(state.request.params, vec![KeyValuePair::blank()]);
        // Blank key: URL must not grow a stray `?`
        assert_eq!(state.request.url, "https://x.com/a");
    }
}
