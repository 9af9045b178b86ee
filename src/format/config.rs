//! Printer configuration.

/// Printer configuration
#[derive(Debug, Clone, PartialEq)]
pub struct FormatConfig {
    /// Number of spaces per indentation level
    pub indent_width: usize,
    /// Print trailing blocks on one line: `{ add(1); add(2) }`
    pub inline_blocks: bool,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            indent_width: 4,
            inline_blocks: true,
        }
    }
}

impl FormatConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the indentation width
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    /// Print blocks on one line, or one statement per line
    pub fn with_inline_blocks(mut self, inline: bool) -> Self {
        self.inline_blocks = inline;
        self
    }
}
