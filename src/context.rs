//! The translation context: settings, analysis, and the single dispatch point.

use tracing::debug;

use expression::*;

use crate::analysis::ExpressionAnalysis;
use crate::error::TranslationError;
use crate::settings::TranslationSettings;
use crate::translations::blocks::{BlockTranslation, CodeBlockTranslation};
use crate::translations::calls::{CallTranslation, InvocationTranslation};
use crate::translations::comments::CommentTranslation;
use crate::translations::conditionals::ConditionalTranslation;
use crate::translations::constants::{ConstantTranslation, DefaultTranslation};
use crate::translations::control_flow::{GotoTranslation, LabelTranslation, LoopTranslation, SwitchTranslation, ThrowTranslation};
use crate::translations::initialisation::{ListInitTranslation, MemberInitTranslation, NewArrayTranslation, NewTranslation};
use crate::translations::lambdas::LambdaTranslation;
use crate::translations::members::{IndexTranslation, MemberTranslation};
use crate::translations::operators::BinaryTranslation;
use crate::translations::try_catch::TryTranslation;
use crate::translations::type_names::TypeNameTranslation;
use crate::translations::unary::{TypeBinaryTranslation, UnaryTranslation};
use crate::translations::{BoxedTranslation, FixedTranslation, Translation};
use crate::writer::{TranslationSizes, TranslationWriter};

pub struct TranslationContext<'a> {
    settings: &'a TranslationSettings,
    analysis: ExpressionAnalysis,
}

impl<'a> TranslationContext<'a> {
    /// Analyses `expression`; translations built from this context must come from the same tree.
    pub fn for_expression(expression: &Expression, settings: &'a TranslationSettings) -> TranslationContext<'a> {
        TranslationContext { settings, analysis: ExpressionAnalysis::analyse(expression, settings) }
    }

    pub fn for_lambda(lambda: &LambdaExpression, settings: &'a TranslationSettings) -> TranslationContext<'a> {
        TranslationContext { settings, analysis: ExpressionAnalysis::analyse_lambda(lambda, settings) }
    }

    /// A context with nothing analysed, for translating type names and fixed text.
    pub fn empty(settings: &'a TranslationSettings) -> TranslationContext<'a> {
        TranslationContext { settings, analysis: ExpressionAnalysis::default() }
    }

    pub fn settings(&self) -> &TranslationSettings {
        self.settings
    }

    pub fn analysis(&self) -> &ExpressionAnalysis {
        &self.analysis
    }

    pub fn measure(&self, translation: &dyn Translation) -> TranslationSizes {
        TranslationWriter::measure(
            self.settings.formatter().as_ref(),
            self.settings.indent(),
            |writer| translation.write_to(writer))
    }

    pub fn type_name(&self, type_name: &Type) -> TypeNameTranslation {
        TypeNameTranslation::new(type_name, self)
    }

    pub fn variable_name(&self, variable: &ParameterExpression) -> String {
        self.analysis.variable_name(variable)
    }

    /// The translation of a whole tree: a block becomes a statement list, anything else an expression.
    pub fn get_root_translation(&self, expression: &Expression) -> Result<BoxedTranslation, TranslationError> {
        if let Expression::Block(_) = expression {
            return Ok(Box::new(self.get_statements_for(expression, false)?));
        }
        self.get_translation_for(expression)
    }

    pub fn get_translation_for(&self, expression: &Expression) -> Result<BoxedTranslation, TranslationError> {
        let translation: BoxedTranslation = match expression {
            Expression::Binary(binary) => BinaryTranslation::for_binary(expression, binary, self)?,
            Expression::Unary(unary) => UnaryTranslation::for_unary(unary, self)?,
            Expression::Constant(constant) => Box::new(ConstantTranslation::new(constant, self)),
            Expression::Parameter(variable) => {
                let name = self.variable_name(variable);
                Box::new(FixedTranslation::variable(variable.parameter_type().clone(), &name, self))
            }
            Expression::Member(member) => Box::new(MemberTranslation::new(member, self)?),
            Expression::Call(call) => Box::new(CallTranslation::new(expression, call, self)?),
            Expression::Invocation(invocation) => Box::new(InvocationTranslation::new(invocation, self)?),
            Expression::Conditional(conditional) => Box::new(ConditionalTranslation::new(conditional, self)?),
            Expression::Block(block) => match block.expressions().as_slice() {
                [single] if block.variables().is_empty() => self.get_translation_for(single)?,
                _ => Box::new(self.get_statements_for(expression, false)?),
            },
            Expression::Lambda(lambda) => Box::new(LambdaTranslation::new(lambda, self)?),
            Expression::New(new) => Box::new(NewTranslation::new(new, self)?),
            Expression::NewArray(array) => Box::new(NewArrayTranslation::new(array, self)?),
            Expression::MemberInit(init) => Box::new(MemberInitTranslation::new(init, self)?),
            Expression::ListInit(init) => Box::new(ListInitTranslation::new(init, self)?),
            Expression::Index(index) => Box::new(IndexTranslation::for_index(index, self)?),
            Expression::Loop(looped) => Box::new(LoopTranslation::new(looped, self)?),
            Expression::Goto(goto) => Box::new(GotoTranslation::new(goto, self)?),
            Expression::Label(label) => LabelTranslation::for_label(label, self)?,
            Expression::Switch(switch) => Box::new(SwitchTranslation::new(switch, self)?),
            Expression::Try(tried) => Box::new(TryTranslation::new(tried, self)?),
            Expression::TypeBinary(type_binary) => Box::new(TypeBinaryTranslation::new(type_binary, self)?),
            Expression::Throw(throw) => Box::new(ThrowTranslation::new(throw, self)?),
            Expression::Default(type_name) => Box::new(DefaultTranslation::new(type_name, self)),
            Expression::Comment(comment) => Box::new(CommentTranslation::new(comment.text(), self)),
            Expression::Extension(extension) => {
                debug!(name = extension.name().as_str(), "No translation for extension expression");
                return Err(TranslationError::UnsupportedExpression {
                    node_type: ExpressionType::Extension,
                    description: extension.name().clone(),
                });
            }
        };
        Ok(translation)
    }

    /// The translation of the final statement of a value-returning body.
    /// Value-typed conditionals, switches and trys return from each of
    /// their branches; anything else translates as usual.
    pub fn get_returned_translation_for(&self, expression: &Expression) -> Result<BoxedTranslation, TranslationError> {
        if expression.result_type().is_void() {
            return self.get_translation_for(expression);
        }
        let translation: BoxedTranslation = match expression {
            Expression::Conditional(conditional) => Box::new(ConditionalTranslation::returning(conditional, self)?),
            Expression::Switch(switch) => Box::new(SwitchTranslation::returning(switch, self)?),
            Expression::Try(tried) => Box::new(TryTranslation::returning(tried, self)?),
            _ => self.get_translation_for(expression)?,
        };
        Ok(translation)
    }

    /// The statements of `expression`, unbraced.
    pub fn get_statements_for(&self, expression: &Expression, in_return_position: bool) -> Result<BlockTranslation, TranslationError> {
        BlockTranslation::new(expression, in_return_position, self)
    }

    /// The statements of `expression` in braces.
    pub fn get_code_block_for(&self, expression: &Expression, in_return_position: bool) -> Result<CodeBlockTranslation, TranslationError> {
        let statements = self.get_statements_for(expression, in_return_position)?;
        Ok(CodeBlockTranslation::new(statements, self))
    }
}
