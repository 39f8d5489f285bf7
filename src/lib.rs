//! Renders expression trees as readable source code.
//!
//! ```ignore
//! use expression::*;
//! use readable_expressions::ToReadableString;
//!
//! let x = Expression::parameter(Type::int(), "x");
//! let doubled = Expression::lambda(vec!(x.clone()), Expression::multiply(Expression::from(&x), Expression::int(2)));
//! assert_eq!("x => x * 2", doubled.to_readable_string().unwrap());
//! ```

#[macro_use] extern crate derive_more;
extern crate getset;

pub mod analysis;
pub mod context;
pub mod error;
pub mod formatting;
pub mod reflection;
pub mod settings;
pub mod source;
pub mod translations;
pub mod writer;

use tracing::debug;

use expression::Expression;

pub use crate::context::TranslationContext;
pub use crate::error::{CompilationError, CompilationFailure, CompileError, TranslationError};
pub use crate::formatting::{HtmlTranslationFormatter, NullTranslationFormatter, TokenKind, TranslationFormatter};
pub use crate::settings::{TranslationSettings, TranslationSettingsBuilder};
pub use crate::source::{ClassBuilder, MethodBuilder, SourceCodeBuilder, SourceCodeExpression, SourceCompiler};
pub use crate::translations::type_names::friendly_name;

/// Translates `expression` to source code. A block translates to its
/// statements; anything else to a single expression.
pub fn translate(expression: &Expression, settings: &TranslationSettings) -> Result<String, TranslationError> {
    let context = TranslationContext::for_expression(expression, settings);
    let translation = context.get_root_translation(expression)?;
    debug!(node_type = ?expression.node_type(), size = translation.sizes().total(), "Writing translation");

    Ok(writer::TranslationWriter::write(settings.formatter().as_ref(), settings.indent(), translation.as_ref()))
}

/// Translates `source` to a complete source file.
pub fn translate_source_code(source: &SourceCodeExpression, settings: &TranslationSettings) -> Result<String, TranslationError> {
    let translation = source::SourceCodeTranslation::new(source, settings)?;
    Ok(writer::TranslationWriter::write(settings.formatter().as_ref(), settings.indent(), &translation))
}

pub trait ToReadableString {
    fn to_readable_string(&self) -> Result<String, TranslationError> {
        self.to_readable_string_with(&TranslationSettings::default())
    }

    fn to_readable_string_with(&self, settings: &TranslationSettings) -> Result<String, TranslationError>;
}

impl ToReadableString for Expression {
    fn to_readable_string_with(&self, settings: &TranslationSettings) -> Result<String, TranslationError> {
        translate(self, settings)
    }
}

impl ToReadableString for SourceCodeExpression {
    fn to_readable_string_with(&self, settings: &TranslationSettings) -> Result<String, TranslationError> {
        translate_source_code(self, settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use expression::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_to_readable_string() {
        let x = Expression::parameter(Type::int(), "x");
        let doubled = Expression::lambda(vec!(x.clone()), Expression::multiply(Expression::from(&x), Expression::int(2)));

        assert_eq!("x => x * 2", doubled.to_readable_string().unwrap());
    }

    #[test]
    fn test_settings_change_the_output() {
        let x = Expression::parameter(Type::int(), "x");
        let doubled = Expression::lambda(vec!(x.clone()), Expression::multiply(Expression::from(&x), Expression::int(2)));

        let settings = TranslationSettings::builder().show_lambda_parameter_type_names().build();
        assert_eq!("(int x) => x * 2", doubled.to_readable_string_with(&settings).unwrap());
    }

    #[test]
    fn test_output_length_matches_measured_size() {
        let count = Expression::parameter(Type::int(), "count");
        let block = Expression::block(vec!(count.clone()), vec!(
            Expression::assign(Expression::from(&count), Expression::int(0)),
            Expression::condition(
                Expression::greater_than(Expression::from(&count), Expression::int(1)),
                Expression::assign(Expression::from(&count), Expression::int(2)),
                Expression::default(Type::void()),
                Type::void())));

        for settings in &[TranslationSettings::default(), TranslationSettings::default().with_formatter(HtmlTranslationFormatter)] {
            let context = TranslationContext::for_expression(&block, settings);
            let translation = context.get_root_translation(&block).unwrap();
            let written = translate(&block, settings).unwrap();
            assert_eq!(translation.sizes().total(), written.len());
        }
    }

    #[test]
    fn test_source_code_to_readable_string() {
        let settings = TranslationSettings::builder().with_namespace("Demo").build();
        let source = SourceCodeExpression::from_expression(&Expression::lambda(vec!(), Expression::default(Type::void())), &settings).unwrap();

        assert_eq!(indoc!("
            namespace Demo
            {
                public class GeneratedExpressionClass
                {
                    public void DoAction()
                    {
                    }
                }
            }"), source.to_readable_string_with(&settings).unwrap());
    }

    #[test]
    fn test_friendly_names() {
        let settings = TranslationSettings::default();
        assert_eq!("int?", friendly_name(&Type::nullable(Type::int()), &settings));
    }
}
