//! Node translators.
//!
//! Each translator is built bottom-up from an expression node and a
//! `TranslationContext`, measures itself once its children exist, and is
//! written exactly once afterwards.

use expression::{ExpressionType, Type};

use crate::context::TranslationContext;
use crate::formatting::TokenKind;
use crate::writer::{TranslationSizes, TranslationWriter};

pub mod arguments;
pub mod blocks;
pub mod calls;
pub mod comments;
pub mod conditionals;
pub mod constants;
pub mod control_flow;
pub mod initialisation;
pub mod lambdas;
pub mod members;
pub mod operators;
pub mod try_catch;
pub mod type_names;
pub mod unary;

pub use arguments::ArgumentListTranslation;
pub use blocks::{BlockTranslation, CodeBlockTranslation};
pub use type_names::TypeNameTranslation;

pub trait Translation {
    fn node_type(&self) -> ExpressionType;

    fn result_type(&self) -> Type;

    fn sizes(&self) -> TranslationSizes;

    fn write_to(&self, writer: &mut TranslationWriter);

    /// True if the translation ends with its own closing brace or needs no
    /// trailing semicolon when written as a statement.
    fn is_terminated(&self) -> bool {
        false
    }

    /// True if the translation spans more than one statement.
    fn is_multi_statement(&self) -> bool {
        false
    }
}

pub type BoxedTranslation = Box<dyn Translation>;

/// One token, or nothing at all.
pub struct FixedTranslation {
    node_type: ExpressionType,
    result_type: Type,
    text: String,
    kind: TokenKind,
    sizes: TranslationSizes,
}

impl FixedTranslation {
    pub fn of(node_type: ExpressionType, result_type: Type, text: &str, kind: TokenKind, context: &TranslationContext) -> FixedTranslation {
        let mut translation = FixedTranslation {
            node_type,
            result_type,
            text: String::from(text),
            kind,
            sizes: TranslationSizes::default(),
        };
        translation.sizes = context.measure(&translation);
        translation
    }

    pub fn keyword(node_type: ExpressionType, result_type: Type, keyword: &str, context: &TranslationContext) -> FixedTranslation {
        FixedTranslation::of(node_type, result_type, keyword, TokenKind::Keyword, context)
    }

    pub fn variable(result_type: Type, name: &str, context: &TranslationContext) -> FixedTranslation {
        FixedTranslation::of(ExpressionType::Parameter, result_type, name, TokenKind::Variable, context)
    }

    /// Writes nothing; statement lists skip it.
    pub fn empty(node_type: ExpressionType) -> FixedTranslation {
        FixedTranslation {
            node_type,
            result_type: Type::void(),
            text: String::new(),
            kind: TokenKind::Default,
            sizes: TranslationSizes::default(),
        }
    }
}

impl Translation for FixedTranslation {
    fn node_type(&self) -> ExpressionType {
        self.node_type
    }

    fn result_type(&self) -> Type {
        self.result_type.clone()
    }

    fn sizes(&self) -> TranslationSizes {
        self.sizes
    }

    fn write_to(&self, writer: &mut TranslationWriter) {
        writer.write_token(&self.text, self.kind);
    }
}

/// Wraps an operand in parentheses.
pub struct ParenthesizedTranslation {
    inner: BoxedTranslation,
    sizes: TranslationSizes,
}

impl ParenthesizedTranslation {
    pub fn new(inner: BoxedTranslation, context: &TranslationContext) -> ParenthesizedTranslation {
        let mut translation = ParenthesizedTranslation { inner, sizes: TranslationSizes::default() };
        translation.sizes = context.measure(&translation);
        translation
    }
}

impl Translation for ParenthesizedTranslation {
    fn node_type(&self) -> ExpressionType {
        self.inner.node_type()
    }

    fn result_type(&self) -> Type {
        self.inner.result_type()
    }

    fn sizes(&self) -> TranslationSizes {
        self.sizes
    }

    fn write_to(&self, writer: &mut TranslationWriter) {
        writer.write_default("(");
        writer.write_translation(self.inner.as_ref());
        writer.write_default(")");
    }

    fn is_multi_statement(&self) -> bool {
        self.inner.is_multi_statement()
    }
}

/// Wraps a translation in `checked(...)`.
pub struct CheckedTranslation {
    inner: BoxedTranslation,
    sizes: TranslationSizes,
}

impl CheckedTranslation {
    pub fn new(inner: BoxedTranslation, context: &TranslationContext) -> CheckedTranslation {
        let mut translation = CheckedTranslation { inner, sizes: TranslationSizes::default() };
        translation.sizes = context.measure(&translation);
        translation
    }
}

impl Translation for CheckedTranslation {
    fn node_type(&self) -> ExpressionType {
        self.inner.node_type()
    }

    fn result_type(&self) -> Type {
        self.inner.result_type()
    }

    fn sizes(&self) -> TranslationSizes {
        self.sizes
    }

    fn write_to(&self, writer: &mut TranslationWriter) {
        writer.write_keyword("checked");
        writer.write_default("(");
        writer.write_translation(self.inner.as_ref());
        writer.write_default(")");
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::TranslationSettings;

    #[test]
    fn test_empty_translation_has_no_size() {
        let translation = FixedTranslation::empty(ExpressionType::Default);
        assert!(translation.sizes().is_empty());
        assert_eq!(0, translation.sizes().total());
    }

    #[test]
    fn test_parentheses_are_measured() {
        let settings = TranslationSettings::default();
        let context = TranslationContext::empty(&settings);
        let inner = FixedTranslation::variable(Type::int(), "x", &context);
        let parenthesized = ParenthesizedTranslation::new(Box::new(inner), &context);
        assert_eq!(3, parenthesized.sizes().total());
        assert_eq!("(x)", TranslationWriter::write(settings.formatter().as_ref(), settings.indent(), &parenthesized));
    }
}
