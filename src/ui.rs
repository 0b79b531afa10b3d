use ratatui::{prelude::*, widgets::*};

/// Renders the request editor tab row
pub fn render_tabs(titles: Vec<String>, selected: usize) -> Tabs<'static> {
    let titles: Vec<Line> = titles.into_iter().map(Line::from).collect();

    Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Yellow).bold())
        .divider("|")
}

/// Simple JSON syntax highlighting
pub fn highlight_json(text: &str) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for line in text.lines() {
        let mut spans = Vec::new();
        let mut current = String::new();
        let mut in_string = false;
        let mut is_key = false;

        for c in line.chars() {
            match c {
                '"' => {
                    if !current.is_empty() && !in_string {
                        spans.push(Span::raw(current.clone()));
                        current.clear();
                    }

                    if in_string {
                        // End of string
                        current.push(c);
                        let color = if is_key { Color::Cyan } else { Color::Green };
                        spans.push(Span::styled(current.clone(), Style::default().fg(color)));
                        current.clear();
                        in_string = false;
                        is_key = false;
                    } else {
                        // Start of string
                        in_string = true;
                        current.push(c);
                        // Check if this is a key (followed by :)
                        is_key = line[line.find('"').unwrap_or(0)..].contains("\":");
                    }
                }
                ':' if !in_string => {
                    if !current.is_empty() {
                        spans.push(Span::raw(current.clone()));
                        current.clear();
                    }
                    spans.push(Span::styled(":", Style::default().fg(Color::White)));
                }
                '{' | '}' | '[' | ']' if !in_string => {
                    if !current.is_empty() {
                        spans.push(Span::raw(current.clone()));
                        current.clear();
                    }
                    spans.push(Span::styled(
                        c.to_string(),
                        Style::default().fg(Color::Yellow),
                    ));
                }
                _ => {
                    current.push(c);
                }
            }
        }

        if !current.is_empty() {
            // Color numbers
            if current
                .trim()
                .chars()
                .all(|c| c.is_ascii_digit() || c == '-' || c == '.' || c == ',')
            {
                spans.push(Span::styled(current, Style::default().fg(Color::Yellow)));
            } else {
                spans.push(Span::raw(current));
            }
        }

        lines.push(Line::from(spans));
    }

    lines
}

/// Terminal column for a byte offset into an input string.
///
/// Cursor positions are tracked as byte offsets for editing, but the
/// terminal counts characters; multibyte input would misplace the drawn
/// cursor otherwise.
pub fn cursor_column(text: &str, byte_offset: usize) -> u16 {
    let end = byte_offset.min(text.len());
    text.char_indices().take_while(|(i, _)| *i < end).count() as u16
}

/// Status code color
pub fn status_color(code: u16) -> Color {
    match code {
        200..=299 => Color::Green,
        300..=399 => Color::Cyan,
        400..=499 => Color::Red,
        500..=599 => Color::Magenta,
        _ => Color::Yellow,
    }
}

/// Method color
pub fn method_color(method: &str) -> Color {
    match method {
        "GET" => Color::Green,
        "POST" => Color::Yellow,
        "PUT" => Color::Blue,
        "PATCH" => Color::Cyan,
        "DELETE" => Color::Red,
        "HEAD" => Color::Magenta,
        "OPTIONS" => Color::LightBlue,
        _ => Color::White,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_column_is_byte_offset_for_ascii() {
        assert_eq!(cursor_column("hello", 3), 3);
        assert_eq!(cursor_column("hello", 5), 5);
    }

    #[test]
    fn cursor_column_counts_multibyte_chars_once() {
        // "héllo": 'é' is two bytes, so byte offset 3 is after two chars
        let text = "h\u{e9}llo";
        assert_eq!(cursor_column(text, 3), 2);
        assert_eq!(cursor_column(text, text.len()), 5);
    }

    #[test]
    fn cursor_column_clamps_past_the_end() {
        assert_eq!(cursor_column("ab", 99), 2);
        assert_eq!(cursor_column("", 4), 0);
    }
}
