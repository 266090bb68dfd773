//! Indenting text sink with nested capture buffers

const INDENTATION: &str = "    ";

/// Text output with an indentation level and a stack of buffers. Text goes
/// to the innermost buffer; `push`/`pop` capture a fragment so the caller can
/// decide whether and where to emit it.
#[derive(Debug)]
pub(crate) struct Writer {
    buffers: Vec<String>,
    indentation: usize,
}

impl Writer {
    pub fn new() -> Self {
        Writer {
            buffers: vec![String::new()],
            indentation: 0,
        }
    }

    fn current(&mut self) -> &mut String {
        if self.buffers.is_empty() {
            self.buffers.push(String::new());
        }
        let last = self.buffers.len() - 1;
        &mut self.buffers[last]
    }

    pub fn print(&mut self, text: &str) {
        self.current().push_str(text);
    }

    /// Print `text` after the current indentation prefix
    pub fn print_indented(&mut self, text: &str) {
        let prefix = INDENTATION.repeat(self.indentation);
        let buffer = self.current();
        buffer.push_str(&prefix);
        buffer.push_str(text);
    }

    pub fn println(&mut self, text: &str) {
        self.print(text);
        self.newline();
    }

    pub fn println_indented(&mut self, text: &str) {
        self.print_indented(text);
        self.newline();
    }

    pub fn newline(&mut self) {
        self.current().push('\n');
    }

    pub fn indent(&mut self) {
        self.indentation += 1;
    }

    pub fn outdent(&mut self) {
        self.indentation = self.indentation.saturating_sub(1);
    }

    /// Start capturing into a fresh buffer
    pub fn push(&mut self) {
        self.buffers.push(String::new());
    }

    /// Stop capturing and return what was captured
    pub fn pop(&mut self) -> String {
        if self.buffers.len() > 1 {
            self.buffers.pop().unwrap_or_default()
        } else {
            std::mem::take(self.current())
        }
    }

    pub fn finish(mut self) -> String {
        let mut output = String::new();
        for buffer in self.buffers.drain(..) {
            output.push_str(&buffer);
        }
        output
    }
}
