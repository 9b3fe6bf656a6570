//! Output emitter.
//!
//! Generated declarations are written through a [`Printer`], which tracks
//! block structure and indents with tabs, onto an [`Emitter`].


/// Trait for emitting generated source text.
pub trait Emitter {
    /// Emit a text fragment.
    fn emit(&mut self, text: &str);

    /// Emit a newline (Unix-style `\n`).
    fn emit_newline(&mut self);

    /// Emit indentation (one tab per level).
    fn emit_indent(&mut self, level: usize);
}

/// String-based emitter for in-memory output.
#[derive(Default)]
pub struct StringEmitter {
    buffer: String,
}

impl StringEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output(self) -> String {
        self.buffer
    }
}

impl Emitter for StringEmitter {
    fn emit(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn emit_newline(&mut self) {
        self.buffer.push('\n');
    }

    fn emit_indent(&mut self, level: usize) {
        for _ in 0..level {
            self.buffer.push('\t');
        }
    }
}

/// Line-oriented writer with structural indentation.
///
/// `open` writes a line and indents what follows; `close` dedents and
/// writes the closing line.
pub struct Printer<E: Emitter = StringEmitter> {
    emitter: E,
    level: usize,
}

impl Default for Printer<StringEmitter> {
    fn default() -> Self {
        Printer::new(StringEmitter::new())
    }
}

impl<E: Emitter> Printer<E> {
    pub fn new(emitter: E) -> Self {
        Printer { emitter, level: 0 }
    }

    /// Write one line at the current indentation. Empty text writes a bare
    /// newline.
    pub fn line(&mut self, text: &str) {
        if !text.is_empty() {
            self.emitter.emit_indent(self.level);
            self.emitter.emit(text);
        }
        self.emitter.emit_newline();
    }

    /// Write a block-opening line and indent.
    pub fn open(&mut self, text: &str) {
        self.line(text);
        self.level += 1;
    }

    /// Dedent and write a block-closing line.
    pub fn close(&mut self, text: &str) {
        self.level = self.level.saturating_sub(1);
        self.line(text);
    }

    pub fn blank(&mut self) {
        self.emitter.emit_newline();
    }
}

impl Printer<StringEmitter> {
    /// Consume the printer and return the text written.
    pub fn finish(self) -> String {
        self.emitter.output()
    }
}
