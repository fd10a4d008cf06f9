use std::fmt::Write as _;

const INDENT: &str = "\t";

/// Line-oriented text buffer with brace/indent helpers.
#[derive(Debug, Default)]
pub struct SourceBuilder {
    out: String,
    indent: String,
}

impl SourceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty text writes a bare newline, never trailing whitespace.
    pub fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if !text.is_empty() {
            self.out.push_str(&self.indent);
            self.out.push_str(text);
        }
        self.out.push('\n');
    }

    pub fn blank(&mut self) {
        self.out.push('\n');
    }

    pub fn indented(&mut self, inner: impl FnOnce(&mut Self)) {
        self.indent.push_str(INDENT);
        inner(self);
        self.indent.truncate(self.indent.len() - INDENT.len());
    }

    pub fn block(&mut self, inner: impl FnOnce(&mut Self)) {
        self.line("{");
        self.indented(inner);
        self.line("}");
    }

    /// Wraps `inner` in a namespace block when `ns` is non-empty.
    pub fn namespace_block(&mut self, ns: Option<&str>, inner: impl FnOnce(&mut Self)) {
        match ns.filter(|n| !n.is_empty()) {
            Some(ns) => {
                self.line(format!("namespace {ns}"));
                self.block(inner);
            }
            None => inner(self),
        }
    }

    /// Appends a fragment at the current indentation.
    pub fn fragment(&mut self, fragment: &Fragment) {
        for l in &fragment.lines {
            self.line(l);
        }
    }

    pub fn finish(self) -> String {
        self.out
    }
}

/// Code rendered at zero indentation, re-indented wherever it is placed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    lines: Vec<String>,
}

impl Fragment {
    pub fn build(write: impl FnOnce(&mut SourceBuilder)) -> Self {
        let mut b = SourceBuilder::new();
        write(&mut b);
        Self {
            lines: b.finish().lines().map(str::to_string).collect(),
        }
    }
}

/// Regular (non-verbatim) C# string literal, quotes included.
pub fn string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\0' => out.push_str("\\0"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
