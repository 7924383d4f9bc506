use crossterm::event::KeyCode;

const MASK_CHAR: char = '•';

/// Manages text input cursor and scrolling state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInputState {
    cursor_pos: usize,      // Character index (0 = before first char)
    scroll_offset: usize,   // For horizontal scrolling when text > width
}

impl TextInputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State with the cursor placed after the last character of `text`
    pub fn at_end_of(text: &str) -> Self {
        let mut state = Self::new();
        state.set_cursor_to_end(text);
        state
    }

    /// Cursor position as a character index
    pub fn cursor_pos(&self) -> usize {
        self.cursor_pos
    }

    /// First visible character index
    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn set_cursor_to_end(&mut self, text: &str) {
        self.cursor_pos = text.chars().count();
    }

    /// Handle a key press and update text value
    /// Returns Some(new_value) if text changed, None if only cursor moved
    pub fn handle_key(
        &mut self,
        key: KeyCode,
        current_value: &str,
        max_length: Option<usize>,
    ) -> Option<String> {
        let char_count = current_value.chars().count();
        // Value may have been replaced underneath us
        self.cursor_pos = self.cursor_pos.min(char_count);

        match key {
            KeyCode::Char(c) => {
                // Insert at cursor unless the value is full
                if let Some(max) = max_length {
                    if char_count >= max {
                        return None;
                    }
                }

                let mut chars: Vec<char> = current_value.chars().collect();
                chars.insert(self.cursor_pos, c);
                self.cursor_pos += 1;

                Some(chars.into_iter().collect())
            }
            KeyCode::Backspace => {
                // Remove the character before the cursor
                if self.cursor_pos > 0 {
                    let mut chars: Vec<char> = current_value.chars().collect();
                    chars.remove(self.cursor_pos - 1);
                    self.cursor_pos -= 1;
                    Some(chars.into_iter().collect())
                } else {
                    None
                }
            }
            KeyCode::Delete => {
                // Remove the character under the cursor
                if self.cursor_pos < char_count {
                    let mut chars: Vec<char> = current_value.chars().collect();
                    chars.remove(self.cursor_pos);
                    Some(chars.into_iter().collect())
                } else {
                    None
                }
            }
            KeyCode::Left => {
                self.cursor_pos = self.cursor_pos.saturating_sub(1);
                None
            }
            KeyCode::Right => {
                if self.cursor_pos < char_count {
                    self.cursor_pos += 1;
                }
                None
            }
            KeyCode::Home => {
                // Start of value
                self.cursor_pos = 0;
                None
            }
            KeyCode::End => {
                // End of value
                self.cursor_pos = char_count;
                None
            }
            _ => None,
        }
    }

    /// Update scroll offset to keep cursor visible
    /// Called during rendering
    pub fn update_scroll(&mut self, visible_width: usize, text: &str) {
        if visible_width == 0 {
            return;
        }
        let char_count = text.chars().count();

        // Cursor must stay inside the visible window
        if self.cursor_pos < self.scroll_offset {
            self.scroll_offset = self.cursor_pos;
        } else if self.cursor_pos >= self.scroll_offset + visible_width {
            self.scroll_offset = self.cursor_pos.saturating_sub(visible_width - 1);
        }

        // No blank tail once the text fits
        let max_offset = char_count.saturating_sub(visible_width);
        self.scroll_offset = self.scroll_offset.min(max_offset);
    }

    /// The slice of `text` that fits in `visible_width`, masked for secrets
    pub fn visible_text(&self, text: &str, visible_width: usize, secret: bool) -> String {
        text.chars()
            .skip(self.scroll_offset)
            .take(visible_width)
            .map(|c| if secret { MASK_CHAR } else { c })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_str(state: &mut TextInputState, value: &mut String, text: &str) {
        for c in text.chars() {
            if let Some(new_value) = state.handle_key(KeyCode::Char(c), value, None) {
                *value = new_value;
            }
        }
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut state = TextInputState::new();
        let mut value = String::new();
        type_str(&mut state, &mut value, "admn");

        state.handle_key(KeyCode::Left, &value, None);
        value = state.handle_key(KeyCode::Char('i'), &value, None).unwrap();
        assert_eq!(value, "admin");
        assert_eq!(state.cursor_pos(), 4);

        value = state.handle_key(KeyCode::Backspace, &value, None).unwrap();
        assert_eq!(value, "admn");
        assert_eq!(state.handle_key(KeyCode::Home, &value, None), None);
        assert_eq!(state.handle_key(KeyCode::Backspace, &value, None), None);
    }

    #[test]
    fn test_max_length_blocks_insert() {
        let mut state = TextInputState::at_end_of("abc");
        assert_eq!(state.handle_key(KeyCode::Char('d'), "abc", Some(3)), None);
    }

    #[test]
    fn test_cursor_clamped_after_external_replace() {
        let mut state = TextInputState::at_end_of("a long value");
        let value = state.handle_key(KeyCode::Char('x'), "ab", None).unwrap();
        assert_eq!(value, "abx");
    }

    #[test]
    fn test_scroll_and_mask() {
        let mut state = TextInputState::at_end_of("/home/user/.ssh/id_rsa");
        state.update_scroll(5, "/home/user/.ssh/id_rsa");
        assert_eq!(state.visible_text("/home/user/.ssh/id_rsa", 5, false), "d_rsa");
        assert_eq!(state.visible_text("secret", 10, true), "••••••");
    }
}
