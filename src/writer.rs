//! Writes translation trees to text, and measures them before they are written.
//!
//! Every translation sizes itself by replaying its own write routine against
//! a measuring writer. The measuring writer adds the already-computed sizes of
//! child translations instead of descending into them, so a parent's size is
//! always the sum of its children's sizes plus its own literal text.

use getset::CopyGetters;

use crate::formatting::{TokenKind, TranslationFormatter};
use crate::translations::Translation;

/// Byte counts for one translation.
#[derive(Clone, Copy, Constructor, CopyGetters, Debug, Default, PartialEq, Eq)]
#[get_copy = "pub"]
pub struct TranslationSizes {
    /// Plain text, excluding indentation.
    translation_size: usize,

    /// Extra bytes the formatter adds.
    formatting_size: usize,

    /// Indentation written before lines started inside the translation,
    /// relative to the depth the translation is written at.
    indent_size: usize,

    /// Lines with content started inside the translation.
    new_line_count: usize,
}

impl TranslationSizes {
    /// The exact length of the written translation.
    pub fn total(&self) -> usize {
        self.translation_size + self.formatting_size + self.indent_size
    }

    /// True if writing the translation produces no text.
    pub fn is_empty(&self) -> bool {
        self.translation_size == 0
    }
}

enum Output {
    Measure(TranslationSizes),
    Content(String),
}

pub struct TranslationWriter<'a> {
    formatter: &'a dyn TranslationFormatter,
    indent: &'a str,
    depth: usize,
    line_pending: bool,
    output: Output,
}

impl<'a> TranslationWriter<'a> {
    fn new(formatter: &'a dyn TranslationFormatter, indent: &'a str, output: Output) -> TranslationWriter<'a> {
        TranslationWriter {
            formatter,
            indent,
            depth: 0,
            line_pending: false,
            output,
        }
    }

    /// Sizes whatever `write` writes.
    pub fn measure<F>(formatter: &'a dyn TranslationFormatter, indent: &'a str, write: F) -> TranslationSizes
        where F: FnOnce(&mut TranslationWriter<'a>)
    {
        let mut writer = TranslationWriter::new(formatter, indent, Output::Measure(TranslationSizes::default()));
        write(&mut writer);
        match writer.output {
            Output::Measure(sizes) => sizes,
            Output::Content(_) => unreachable!("a measuring writer never holds content"),
        }
    }

    /// Writes `root` into a buffer pre-sized from its measured sizes.
    pub fn write(formatter: &'a dyn TranslationFormatter, indent: &'a str, root: &dyn Translation) -> String {
        let capacity = root.sizes().total();
        let mut writer = TranslationWriter::new(formatter, indent, Output::Content(String::with_capacity(capacity)));

        root.write_to(&mut writer);

        match writer.output {
            Output::Content(content) => {
                debug_assert_eq!(capacity, content.len(), "translation was mis-sized");
                content
            }
            Output::Measure(_) => unreachable!("a content writer never measures"),
        }
    }

    fn start_line_content(&mut self) {
        if !self.line_pending {
            return;
        }
        self.line_pending = false;

        let indent_size = self.depth * self.indent.len();
        match &mut self.output {
            Output::Measure(sizes) => {
                sizes.new_line_count += 1;
                sizes.indent_size += indent_size;
            }
            Output::Content(content) => {
                for _ in 0..self.depth {
                    content.push_str(self.indent);
                }
            }
        }
    }

    pub fn write_token(&mut self, value: &str, kind: TokenKind) {
        if value.is_empty() {
            return;
        }
        self.start_line_content();

        let formatter = self.formatter;
        match &mut self.output {
            Output::Measure(sizes) => {
                sizes.translation_size += value.len();
                sizes.formatting_size += formatter.formatting_size(value, kind);
            }
            Output::Content(content) => formatter.write_formatted(value, kind, content),
        }
    }

    pub fn write_translation(&mut self, translation: &dyn Translation) {
        let child = translation.sizes();
        if !child.is_empty() {
            self.start_line_content();
        }

        let child_base_indent = child.new_line_count * self.depth * self.indent.len();
        if let Output::Measure(sizes) = &mut self.output {
            sizes.translation_size += child.translation_size;
            sizes.formatting_size += child.formatting_size;
            sizes.indent_size += child.indent_size + child_base_indent;
            sizes.new_line_count += child.new_line_count;
            return;
        }
        translation.write_to(self);
    }

    pub fn write_new_line(&mut self) {
        match &mut self.output {
            Output::Measure(sizes) => sizes.translation_size += 1,
            Output::Content(content) => content.push('\n'),
        }
        self.line_pending = true;
    }

    pub fn write_blank_line(&mut self) {
        self.write_new_line();
        self.write_new_line();
    }

    pub fn indent(&mut self) {
        self.depth += 1;
    }

    pub fn unindent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn write_default(&mut self, value: &str) {
        self.write_token(value, TokenKind::Default);
    }

    pub fn write_keyword(&mut self, value: &str) {
        self.write_token(value, TokenKind::Keyword);
    }

    pub fn write_control_statement(&mut self, value: &str) {
        self.write_token(value, TokenKind::ControlStatement);
    }

    pub fn write_variable(&mut self, value: &str) {
        self.write_token(value, TokenKind::Variable);
    }

    pub fn write_method_name(&mut self, value: &str) {
        self.write_token(value, TokenKind::MethodName);
    }

    pub fn write_text(&mut self, value: &str) {
        self.write_token(value, TokenKind::Text);
    }

    pub fn write_numeric(&mut self, value: &str) {
        self.write_token(value, TokenKind::Numeric);
    }

    pub fn write_comment(&mut self, value: &str) {
        self.write_token(value, TokenKind::Comment);
    }

    pub fn write_space(&mut self) {
        self.write_default(" ");
    }

    pub fn write_dot(&mut self) {
        self.write_default(".");
    }

    pub fn write_semicolon(&mut self) {
        self.write_default(";");
    }

    /// Writes `{` on a new line and indents what follows.
    pub fn write_opening_brace(&mut self) {
        self.write_new_line();
        self.write_default("{");
        self.indent();
    }

    /// Unindents and writes `}` on a new line.
    pub fn write_closing_brace(&mut self) {
        self.unindent();
        self.write_new_line();
        self.write_default("}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatting::{HtmlTranslationFormatter, NullTranslationFormatter};
    use expression::{ExpressionType, Type};

    struct Variable {
        sizes: TranslationSizes,
    }

    impl Translation for Variable {
        fn node_type(&self) -> ExpressionType { ExpressionType::Parameter }
        fn result_type(&self) -> Type { Type::int() }
        fn sizes(&self) -> TranslationSizes { self.sizes }
        fn write_to(&self, writer: &mut TranslationWriter) { writer.write_variable("x"); }
    }

    fn write_braced(writer: &mut TranslationWriter) {
        writer.write_control_statement("if");
        writer.write_default(" (x)");
        writer.write_opening_brace();
        writer.write_new_line();
        writer.write_variable("y");
        writer.write_default(" = 1;");
        writer.write_closing_brace();
    }

    #[test]
    fn test_measured_size_matches_written_text() {
        let sizes = TranslationWriter::measure(&NullTranslationFormatter, "    ", write_braced);
        assert_eq!(3, sizes.new_line_count());
        assert_eq!(4, sizes.indent_size());
        assert_eq!("if (x)\n{\n    y = 1;\n}".len(), sizes.total());
    }

    #[test]
    fn test_child_lines_are_indented_at_parent_depth() {
        let formatter = NullTranslationFormatter;
        let child_sizes = TranslationWriter::measure(&formatter, "\t", |writer| writer.write_variable("x"));
        let child = Variable { sizes: child_sizes };

        let write_parent = |writer: &mut TranslationWriter| {
            writer.write_default("{");
            writer.indent();
            writer.write_new_line();
            writer.write_translation(&child);
            writer.unindent();
            writer.write_new_line();
            writer.write_default("}");
        };
        let sizes = TranslationWriter::measure(&formatter, "\t", write_parent);
        assert_eq!("{\n\tx\n}".len(), sizes.total());
        assert_eq!(2, sizes.new_line_count());
        assert_eq!("x", TranslationWriter::write(&formatter, "\t", &child));
    }

    #[test]
    fn test_html_formatting_size() {
        let sizes = TranslationWriter::measure(&HtmlTranslationFormatter, "    ", |writer| writer.write_keyword("var"));
        assert_eq!(3, sizes.translation_size());
        assert_eq!("<span class=\"kw\"></span>".len(), sizes.formatting_size());
    }
}
