use expression::*;

use crate::context::TranslationContext;
use crate::error::TranslationError;
use crate::translations::operators::{enclose_operand, operand_translation, Precedence};
use crate::translations::{BoxedTranslation, CodeBlockTranslation, Translation};
use crate::writer::{TranslationSizes, TranslationWriter};

enum ElseBranch {
    None,
    ElseIf(Box<ConditionalTranslation>),
    Else(CodeBlockTranslation),
}

enum ConditionalForm {
    Ternary {
        if_true: BoxedTranslation,
        if_false: BoxedTranslation,
    },
    If {
        if_true: CodeBlockTranslation,
        otherwise: ElseBranch,
    },
}

/// `test ? a : b` for values, `if`/`else if`/`else` for statements and
/// for values with a statement branch.
pub struct ConditionalTranslation {
    result_type: Type,
    test: BoxedTranslation,
    form: ConditionalForm,
    sizes: TranslationSizes,
}

impl ConditionalTranslation {
    pub fn new(conditional: &ConditionalExpression, context: &TranslationContext) -> Result<ConditionalTranslation, TranslationError> {
        ConditionalTranslation::create(conditional, false, context)
    }

    /// A conditional ending a value-returning body; statement branches return their last value.
    pub fn returning(conditional: &ConditionalExpression, context: &TranslationContext) -> Result<ConditionalTranslation, TranslationError> {
        ConditionalTranslation::create(conditional, true, context)
    }

    fn create(conditional: &ConditionalExpression, in_return_position: bool, context: &TranslationContext) -> Result<ConditionalTranslation, TranslationError> {
        let result_type = conditional.result_type().clone();

        let (test, form) = if result_type.is_void() {
            let form = ConditionalTranslation::if_form(conditional, false, context)?;
            (context.get_translation_for(conditional.test())?, form)
        } else {
            let if_true = context.get_translation_for(conditional.if_true())?;
            let if_false = context.get_translation_for(conditional.if_false())?;

            if if_true.is_terminated() || if_false.is_terminated() {
                let form = ConditionalTranslation::if_form(conditional, in_return_position, context)?;
                (context.get_translation_for(conditional.test())?, form)
            } else {
                let form = ConditionalForm::Ternary {
                    if_true: enclose_operand(if_true, conditional.if_true(), Precedence::Coalesce, context),
                    if_false: enclose_operand(if_false, conditional.if_false(), Precedence::Conditional, context),
                };
                (operand_translation(conditional.test(), Precedence::Coalesce, context)?, form)
            }
        };

        let mut translation = ConditionalTranslation { result_type, test, form, sizes: TranslationSizes::default() };
        translation.sizes = context.measure(&translation);
        Ok(translation)
    }

    fn if_form(conditional: &ConditionalExpression, in_return_position: bool, context: &TranslationContext) -> Result<ConditionalForm, TranslationError> {
        let otherwise = match conditional.if_false().as_ref() {
            branch if branch.is_empty() => ElseBranch::None,
            Expression::Conditional(nested) => {
                let nested_translation = ConditionalTranslation::create(nested, in_return_position, context)?;
                if nested_translation.is_statement() {
                    ElseBranch::ElseIf(Box::new(nested_translation))
                } else {
                    ElseBranch::Else(context.get_code_block_for(conditional.if_false(), in_return_position)?)
                }
            }
            branch => ElseBranch::Else(context.get_code_block_for(branch, in_return_position)?),
        };

        Ok(ConditionalForm::If {
            if_true: context.get_code_block_for(conditional.if_true(), in_return_position)?,
            otherwise,
        })
    }

    fn is_statement(&self) -> bool {
        matches!(self.form, ConditionalForm::If { .. })
    }
}

impl Translation for ConditionalTranslation {
    fn node_type(&self) -> ExpressionType {
        ExpressionType::Conditional
    }

    fn result_type(&self) -> Type {
        self.result_type.clone()
    }

    fn sizes(&self) -> TranslationSizes {
        self.sizes
    }

    fn write_to(&self, writer: &mut TranslationWriter) {
        match &self.form {
            ConditionalForm::Ternary { if_true, if_false } => {
                writer.write_translation(self.test.as_ref());
                writer.write_default(" ? ");
                writer.write_translation(if_true.as_ref());
                writer.write_default(" : ");
                writer.write_translation(if_false.as_ref());
            }
            ConditionalForm::If { if_true, otherwise } => {
                writer.write_control_statement("if");
                writer.write_default(" (");
                writer.write_translation(self.test.as_ref());
                writer.write_default(")");
                writer.write_translation(if_true);

                match otherwise {
                    ElseBranch::None => {}
                    ElseBranch::ElseIf(nested) => {
                        writer.write_new_line();
                        writer.write_control_statement("else");
                        writer.write_space();
                        writer.write_translation(nested.as_ref());
                    }
                    ElseBranch::Else(block) => {
                        writer.write_new_line();
                        writer.write_control_statement("else");
                        writer.write_translation(block);
                    }
                }
            }
        }
    }

    fn is_terminated(&self) -> bool {
        self.is_statement()
    }

    fn is_multi_statement(&self) -> bool {
        match &self.form {
            ConditionalForm::Ternary { if_true, if_false } => if_true.is_multi_statement() || if_false.is_multi_statement(),
            ConditionalForm::If { .. } => true,
        }
    }
}
