use expression::*;

use crate::context::TranslationContext;
use crate::error::TranslationError;
use crate::translations::{BoxedTranslation, Translation, TypeNameTranslation};
use crate::writer::{TranslationSizes, TranslationWriter};

const SPLIT_ARGUMENTS_SIZE: usize = 100;

/// The declaration written ahead of an inline-declared output variable.
enum InlineDeclaration {
    None,
    Var,
    Typed(TypeNameTranslation),
}

/// `out x`, `ref x`, `out var x` or `out T x`.
struct OutputArgumentTranslation {
    modifier: &'static str,
    declaration: InlineDeclaration,
    variable: BoxedTranslation,
    sizes: TranslationSizes,
}

impl OutputArgumentTranslation {
    fn new(argument: &Expression, modifier: &'static str, context: &TranslationContext) -> Result<OutputArgumentTranslation, TranslationError> {
        let declaration = if !context.analysis().is_inline_output_argument(argument) {
            InlineDeclaration::None
        } else if context.settings().use_explicit_type_names() {
            InlineDeclaration::Typed(context.type_name(&argument.result_type()))
        } else {
            InlineDeclaration::Var
        };

        let mut translation = OutputArgumentTranslation {
            modifier,
            declaration,
            variable: context.get_translation_for(argument)?,
            sizes: TranslationSizes::default(),
        };
        translation.sizes = context.measure(&translation);
        Ok(translation)
    }
}

impl Translation for OutputArgumentTranslation {
    fn node_type(&self) -> ExpressionType {
        ExpressionType::Parameter
    }

    fn result_type(&self) -> Type {
        self.variable.result_type()
    }

    fn sizes(&self) -> TranslationSizes {
        self.sizes
    }

    fn write_to(&self, writer: &mut TranslationWriter) {
        writer.write_keyword(self.modifier);
        writer.write_space();
        match &self.declaration {
            InlineDeclaration::None => {}
            InlineDeclaration::Var => {
                writer.write_keyword("var");
                writer.write_space();
            }
            InlineDeclaration::Typed(type_name) => {
                writer.write_translation(type_name);
                writer.write_space();
            }
        }
        writer.write_translation(self.variable.as_ref());
    }
}

/// A parenthesised argument list, split one argument per line when long.
pub struct ArgumentListTranslation {
    arguments: Vec<BoxedTranslation>,
    split: bool,
    sizes: TranslationSizes,
}

impl ArgumentListTranslation {
    /// Translates `arguments` against the `parameters` they are passed to;
    /// `parameters` may be empty when nothing is known about them.
    pub fn new(parameters: &[ParameterInfo], arguments: &[Expression], context: &TranslationContext) -> Result<ArgumentListTranslation, TranslationError> {
        let mut translations: Vec<BoxedTranslation> = vec!();

        for (index, argument) in arguments.iter().enumerate() {
            let modifier = parameters
                .get(index)
                .map_or(ParameterModifier::None, ParameterInfo::modifier);

            match (modifier, argument) {
                (ParameterModifier::Out, _) => {
                    translations.push(Box::new(OutputArgumentTranslation::new(argument, "out", context)?));
                }
                (ParameterModifier::Ref, _) => {
                    translations.push(Box::new(OutputArgumentTranslation::new(argument, "ref", context)?));
                }
                (ParameterModifier::Params, Expression::NewArray(array))
                    if array.node_type() == ExpressionType::NewArrayInit && index + 1 == arguments.len() => {
                    for element in array.expressions() {
                        translations.push(context.get_translation_for(element)?);
                    }
                }
                _ => translations.push(context.get_translation_for(argument)?),
            }
        }

        let total_size: usize = translations.iter().map(|t| t.sizes().translation_size()).sum();
        let split = translations.len() > 1 &&
            (total_size > SPLIT_ARGUMENTS_SIZE || translations.iter().any(|t| t.is_multi_statement()));

        let mut translation = ArgumentListTranslation { arguments: translations, split, sizes: TranslationSizes::default() };
        translation.sizes = context.measure(&translation);
        Ok(translation)
    }

    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }
}

impl Translation for ArgumentListTranslation {
    fn node_type(&self) -> ExpressionType {
        ExpressionType::Call
    }

    fn result_type(&self) -> Type {
        Type::void()
    }

    fn sizes(&self) -> TranslationSizes {
        self.sizes
    }

    fn write_to(&self, writer: &mut TranslationWriter) {
        writer.write_default("(");
        if self.split {
            writer.indent();
        }
        for (index, argument) in self.arguments.iter().enumerate() {
            if index > 0 {
                writer.write_default(",");
                if !self.split {
                    writer.write_space();
                }
            }
            if self.split {
                writer.write_new_line();
            }
            writer.write_translation(argument.as_ref());
        }
        if self.split {
            writer.unindent();
        }
        writer.write_default(")");
    }

    fn is_multi_statement(&self) -> bool {
        self.split
    }
}
