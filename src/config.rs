use std::rc::Rc;

/// Layout constants and default labels shared by every entry of a dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct DialogConfig {
    pub spacing: f32,
    pub line_height: f32,
    pub error_height: f32,
    pub button_height: f32,
    /// Lines reserved by the default catch-all error display.
    pub error_lines: usize,
    pub accept_label: String,
    pub open_secret_label: String,
    pub mask_pattern: String,
    pub unknown_enum_label: String,
    pub previous_label: String,
    pub next_label: String,
    pub max_descriptor_depth: usize,
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            spacing: 8.0,
            line_height: 24.0,
            error_height: 12.0,
            button_height: 24.0,
            error_lines: 2,
            accept_label: "OK".to_string(),
            open_secret_label: "Edit".to_string(),
            mask_pattern: "*".to_string(),
            unknown_enum_label: "???".to_string(),
            previous_label: "<<".to_string(),
            next_label: ">>".to_string(),
            max_descriptor_depth: 16,
        }
    }
}

impl DialogConfig {
    pub fn with_spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn with_line_height(mut self, height: f32) -> Self {
        self.line_height = height;
        self
    }

    pub fn with_error_height(mut self, height: f32) -> Self {
        self.error_height = height;
        self
    }

    pub fn with_button_height(mut self, height: f32) -> Self {
        self.button_height = height;
        self
    }

    pub fn with_error_lines(mut self, lines: usize) -> Self {
        self.error_lines = lines;
        self
    }

    pub fn with_accept_label(mut self, label: impl Into<String>) -> Self {
        self.accept_label = label.into();
        self
    }

    pub fn with_open_secret_label(mut self, label: impl Into<String>) -> Self {
        self.open_secret_label = label.into();
        self
    }

    pub fn with_mask_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.mask_pattern = pattern.into();
        self
    }

    pub fn with_unknown_enum_label(mut self, label: impl Into<String>) -> Self {
        self.unknown_enum_label = label.into();
        self
    }

    pub fn with_max_descriptor_depth(mut self, depth: usize) -> Self {
        self.max_descriptor_depth = depth;
        self
    }

    pub fn into_shared(self) -> Rc<Self> {
        Rc::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_layout() {
        let config = DialogConfig::default();
        assert_eq!(config.spacing, 8.0);
        assert_eq!(config.line_height, 24.0);
        assert_eq!(config.error_height, 12.0);
        assert_eq!(config.open_secret_label, "Edit");
        assert_eq!(config.accept_label, "OK");
        assert_eq!(config.mask_pattern, "*");
    }
}
