use expression::{ExpressionType, Type};

use crate::context::TranslationContext;
use crate::translations::Translation;
use crate::writer::{TranslationSizes, TranslationWriter};

fn comment_lines(text: &str) -> Vec<String> {
    text.lines().map(|line| String::from(line.trim())).collect()
}

/// `// text`, one comment line per line of text.
pub struct CommentTranslation {
    lines: Vec<String>,
    sizes: TranslationSizes,
}

impl CommentTranslation {
    pub fn new(text: &str, context: &TranslationContext) -> CommentTranslation {
        let mut translation = CommentTranslation { lines: comment_lines(text), sizes: TranslationSizes::default() };
        translation.sizes = context.measure(&translation);
        translation
    }
}

impl Translation for CommentTranslation {
    fn node_type(&self) -> ExpressionType {
        ExpressionType::Comment
    }

    fn result_type(&self) -> Type {
        Type::void()
    }

    fn sizes(&self) -> TranslationSizes {
        self.sizes
    }

    fn write_to(&self, writer: &mut TranslationWriter) {
        for (index, line) in self.lines.iter().enumerate() {
            if index > 0 {
                writer.write_new_line();
            }
            if line.is_empty() {
                writer.write_comment("//");
            } else {
                writer.write_comment(&format!("// {}", line));
            }
        }
    }

    fn is_terminated(&self) -> bool {
        true
    }
}

/// An XML documentation summary.
pub struct SummaryTranslation {
    lines: Vec<String>,
    sizes: TranslationSizes,
}

impl SummaryTranslation {
    pub fn new(text: &str, context: &TranslationContext) -> SummaryTranslation {
        let mut translation = SummaryTranslation { lines: comment_lines(text), sizes: TranslationSizes::default() };
        translation.sizes = context.measure(&translation);
        translation
    }
}

impl Translation for SummaryTranslation {
    fn node_type(&self) -> ExpressionType {
        ExpressionType::Comment
    }

    fn result_type(&self) -> Type {
        Type::void()
    }

    fn sizes(&self) -> TranslationSizes {
        self.sizes
    }

    fn write_to(&self, writer: &mut TranslationWriter) {
        writer.write_comment("/// <summary>");
        for line in &self.lines {
            writer.write_new_line();
            if line.is_empty() {
                writer.write_comment("///");
            } else {
                writer.write_comment(&format!("/// {}", line));
            }
        }
        writer.write_new_line();
        writer.write_comment("/// </summary>");
    }

    fn is_terminated(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::TranslationSettings;
    use crate::translations::test_support::translate;
    use expression::Expression;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_comment_lines() {
        assert_eq!("// Hello", translate(&Expression::comment("Hello")));
        assert_eq!(indoc!("
            // First
            //
            // Third"), translate(&Expression::comment("First\n\n  Third")));
    }

    #[test]
    fn test_comments_are_not_statements() {
        let block = Expression::block(vec!(), vec!(Expression::comment("Start"), Expression::int(1)));
        assert_eq!(indoc!("
            // Start
            1;"), translate(&block));
    }

    #[test]
    fn test_summaries() {
        let settings = TranslationSettings::default();
        let context = TranslationContext::empty(&settings);
        let summary = SummaryTranslation::new("Adds two numbers.", &context);

        let written = TranslationWriter::write(settings.formatter().as_ref(), settings.indent(), &summary);
        assert_eq!(indoc!("
            /// <summary>
            /// Adds two numbers.
            /// </summary>"), written);
    }
}
