//! Output writer with indentation tracking

use super::config::FormatConfig;

/// Writer that tracks indentation and builds the printed output
pub struct FormatWriter {
    output: String,
    indent_level: usize,
    indent_width: usize,
    /// Whether we're at the start of a line
    at_line_start: bool,
}

impl FormatWriter {
    pub fn new(config: &FormatConfig) -> Self {
        Self {
            output: String::new(),
            indent_level: 0,
            indent_width: config.indent_width,
            at_line_start: true,
        }
    }

    pub fn finish(self) -> String {
        self.output
    }

    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn dedent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    fn write_indent(&mut self) {
        if self.at_line_start {
            let width = self.indent_level * self.indent_width;
            self.output.extend(std::iter::repeat_n(' ', width));
            self.at_line_start = false;
        }
    }

    /// Write a string (with auto-indent)
    pub fn write(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        self.write_indent();
        self.output.push_str(s);
    }

    pub fn writeln(&mut self, s: &str) {
        self.write(s);
        self.newline();
    }

    pub fn newline(&mut self) {
        self.output.push('\n');
        self.at_line_start = true;
    }

    /// Write `items` separated by `sep`, printing each with `each`.
    pub fn separated<T>(&mut self, items: &[T], sep: &str, mut each: impl FnMut(&mut Self, &T)) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.write(sep);
            }
            each(self, item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn writer(width: usize) -> FormatWriter {
        FormatWriter::new(&FormatConfig::new().with_indent_width(width))
    }

    #[test]
    fn test_write_and_newline() {
        let mut w = writer(4);
        w.write("hello");
        w.write("");
        w.writeln(" world");
        w.newline();
        assert_eq!(w.finish(), "hello world\n\n");
    }

    #[test]
    fn test_indent_applies_at_line_start_only() {
        let mut w = writer(2);
        w.writeln("a {");
        w.indent();
        w.write("b");
        w.write("c");
        w.newline();
        w.dedent();
        w.dedent();
        w.writeln("}");
        assert_eq!(w.finish(), "a {\n  bc\n}\n");
    }

    #[test]
    fn test_separated() {
        let mut w = writer(4);
        w.separated(&[1, 2, 3], ", ", |w, n| w.write(&n.to_string()));
        assert_eq!(w.finish(), "1, 2, 3");
    }
}
