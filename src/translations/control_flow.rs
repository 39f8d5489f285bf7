//! Loops, jumps, labels, switches and throws.

use expression::*;

use crate::context::TranslationContext;
use crate::error::TranslationError;
use crate::formatting::TokenKind;
use crate::translations::{BlockTranslation, BoxedTranslation, CodeBlockTranslation, FixedTranslation, Translation};
use crate::writer::{TranslationSizes, TranslationWriter};

/// `while (true)` around the loop body.
pub struct LoopTranslation {
    result_type: Type,
    body: CodeBlockTranslation,
    sizes: TranslationSizes,
}

impl LoopTranslation {
    pub fn new(looped: &LoopExpression, context: &TranslationContext) -> Result<LoopTranslation, TranslationError> {
        let result_type = looped.break_label()
            .as_ref()
            .map_or_else(Type::void, |label| label.label_type().clone());

        let mut translation = LoopTranslation {
            result_type,
            body: context.get_code_block_for(looped.body(), false)?,
            sizes: TranslationSizes::default(),
        };
        translation.sizes = context.measure(&translation);
        Ok(translation)
    }
}

impl Translation for LoopTranslation {
    fn node_type(&self) -> ExpressionType {
        ExpressionType::Loop
    }

    fn result_type(&self) -> Type {
        self.result_type.clone()
    }

    fn sizes(&self) -> TranslationSizes {
        self.sizes
    }

    fn write_to(&self, writer: &mut TranslationWriter) {
        writer.write_control_statement("while");
        writer.write_default(" (");
        writer.write_keyword("true");
        writer.write_default(")");
        writer.write_translation(&self.body);
    }

    fn is_terminated(&self) -> bool {
        true
    }

    fn is_multi_statement(&self) -> bool {
        true
    }
}

enum Jump {
    Break,
    Continue,
    Goto(String),
    Return(Option<BoxedTranslation>),
}

/// `break`, `continue`, `goto label` or `return value`.
pub struct GotoTranslation {
    jump: Jump,
    sizes: TranslationSizes,
}

impl GotoTranslation {
    pub fn new(goto: &GotoExpression, context: &TranslationContext) -> Result<GotoTranslation, TranslationError> {
        let jump = match goto.kind() {
            GotoKind::Break => Jump::Break,
            GotoKind::Continue => Jump::Continue,
            GotoKind::Return => match goto.value() {
                Some(value) => Jump::Return(Some(context.get_translation_for(value)?)),
                None => Jump::Return(None),
            },
            GotoKind::Goto => match context.analysis().loop_label_kind(goto.target()) {
                Some(GotoKind::Break) => Jump::Break,
                Some(GotoKind::Continue) => Jump::Continue,
                _ => Jump::Goto(context.analysis().label_name(goto.target())),
            },
        };

        let mut translation = GotoTranslation { jump, sizes: TranslationSizes::default() };
        translation.sizes = context.measure(&translation);
        Ok(translation)
    }
}

impl Translation for GotoTranslation {
    fn node_type(&self) -> ExpressionType {
        ExpressionType::Goto
    }

    fn result_type(&self) -> Type {
        Type::void()
    }

    fn sizes(&self) -> TranslationSizes {
        self.sizes
    }

    fn write_to(&self, writer: &mut TranslationWriter) {
        match &self.jump {
            Jump::Break => writer.write_control_statement("break"),
            Jump::Continue => writer.write_control_statement("continue"),
            Jump::Goto(label) => {
                writer.write_control_statement("goto");
                writer.write_space();
                writer.write_default(label);
            }
            Jump::Return(value) => {
                writer.write_control_statement("return");
                if let Some(value) = value {
                    writer.write_space();
                    writer.write_translation(value.as_ref());
                }
            }
        }
    }
}

/// `name:`, followed by the label's default value if it has one.
pub struct LabelTranslation {
    result_type: Type,
    name: String,
    value: Option<BoxedTranslation>,
    sizes: TranslationSizes,
}

impl LabelTranslation {
    /// Labels nothing jumps to are dropped, leaving only their default value.
    pub fn for_label(label: &LabelExpression, context: &TranslationContext) -> Result<BoxedTranslation, TranslationError> {
        let value = match label.default_value() {
            Some(value) if !value.is_empty() => Some(context.get_translation_for(value)?),
            _ => None,
        };

        if !context.analysis().is_goto_target(label.target()) {
            return Ok(match value {
                Some(value) => value,
                None => Box::new(FixedTranslation::empty(ExpressionType::Label)),
            });
        }

        let mut translation = LabelTranslation {
            result_type: label.target().label_type().clone(),
            name: context.analysis().label_name(label.target()),
            value,
            sizes: TranslationSizes::default(),
        };
        translation.sizes = context.measure(&translation);
        Ok(Box::new(translation))
    }
}

impl Translation for LabelTranslation {
    fn node_type(&self) -> ExpressionType {
        ExpressionType::Label
    }

    fn result_type(&self) -> Type {
        self.result_type.clone()
    }

    fn sizes(&self) -> TranslationSizes {
        self.sizes
    }

    fn write_to(&self, writer: &mut TranslationWriter) {
        writer.write_default(&self.name);
        writer.write_default(":");
        if let Some(value) = &self.value {
            writer.write_new_line();
            writer.write_translation(value.as_ref());
        }
    }

    fn is_terminated(&self) -> bool {
        self.value.is_none()
    }
}

struct SwitchSection {
    labels: Vec<BoxedTranslation>,
    body: BlockTranslation,
}

impl SwitchSection {
    fn new(labels: Vec<BoxedTranslation>, body: &Expression, in_return_position: bool, context: &TranslationContext) -> Result<SwitchSection, TranslationError> {
        let mut body = context.get_statements_for(body, in_return_position)?;
        if !body.ends_with_exit() {
            let jump = FixedTranslation::of(ExpressionType::Goto, Type::void(), "break", TokenKind::ControlStatement, context);
            body = body.with_statement(Box::new(jump), context);
        }
        Ok(SwitchSection { labels, body })
    }
}

/// A `switch` statement; each section ends with `break;` unless it already
/// returns, throws or jumps.
pub struct SwitchTranslation {
    result_type: Type,
    value: BoxedTranslation,
    sections: Vec<SwitchSection>,
    sizes: TranslationSizes,
}

impl SwitchTranslation {
    pub fn new(switch: &SwitchExpression, context: &TranslationContext) -> Result<SwitchTranslation, TranslationError> {
        SwitchTranslation::create(switch, false, context)
    }

    /// A switch ending a value-returning body; each section returns its value.
    pub fn returning(switch: &SwitchExpression, context: &TranslationContext) -> Result<SwitchTranslation, TranslationError> {
        SwitchTranslation::create(switch, true, context)
    }

    fn create(switch: &SwitchExpression, in_return_position: bool, context: &TranslationContext) -> Result<SwitchTranslation, TranslationError> {
        let mut sections = vec!();
        for case in switch.cases() {
            let labels = case.test_values()
                .iter()
                .map(|value| context.get_translation_for(value))
                .collect::<Result<Vec<_>, _>>()?;
            sections.push(SwitchSection::new(labels, case.body(), in_return_position, context)?);
        }
        if let Some(default_body) = switch.default_body() {
            sections.push(SwitchSection::new(vec!(), default_body, in_return_position, context)?);
        }

        let mut translation = SwitchTranslation {
            result_type: switch.result_type().clone(),
            value: context.get_translation_for(switch.value())?,
            sections,
            sizes: TranslationSizes::default(),
        };
        translation.sizes = context.measure(&translation);
        Ok(translation)
    }
}

impl Translation for SwitchTranslation {
    fn node_type(&self) -> ExpressionType {
        ExpressionType::Switch
    }

    fn result_type(&self) -> Type {
        self.result_type.clone()
    }

    fn sizes(&self) -> TranslationSizes {
        self.sizes
    }

    fn write_to(&self, writer: &mut TranslationWriter) {
        writer.write_control_statement("switch");
        writer.write_default(" (");
        writer.write_translation(self.value.as_ref());
        writer.write_default(")");
        writer.write_opening_brace();

        for (index, section) in self.sections.iter().enumerate() {
            if index > 0 {
                writer.write_new_line();
            }
            if section.labels.is_empty() {
                writer.write_new_line();
                writer.write_control_statement("default");
                writer.write_default(":");
            }
            for label in &section.labels {
                writer.write_new_line();
                writer.write_control_statement("case");
                writer.write_space();
                writer.write_translation(label.as_ref());
                writer.write_default(":");
            }
            writer.indent();
            writer.write_new_line();
            writer.write_translation(&section.body);
            writer.unindent();
        }

        writer.write_closing_brace();
    }

    fn is_terminated(&self) -> bool {
        true
    }

    fn is_multi_statement(&self) -> bool {
        true
    }
}

/// `throw value`, or a bare `throw` to rethrow.
pub struct ThrowTranslation {
    result_type: Type,
    value: Option<BoxedTranslation>,
    sizes: TranslationSizes,
}

impl ThrowTranslation {
    pub fn new(throw: &ThrowExpression, context: &TranslationContext) -> Result<ThrowTranslation, TranslationError> {
        let value = match throw.value() {
            Some(value) => Some(context.get_translation_for(value)?),
            None => None,
        };
        let mut translation = ThrowTranslation {
            result_type: throw.result_type().clone(),
            value,
            sizes: TranslationSizes::default(),
        };
        translation.sizes = context.measure(&translation);
        Ok(translation)
    }

    pub fn rethrow(context: &TranslationContext) -> ThrowTranslation {
        let mut translation = ThrowTranslation { result_type: Type::void(), value: None, sizes: TranslationSizes::default() };
        translation.sizes = context.measure(&translation);
        translation
    }
}

impl Translation for ThrowTranslation {
    fn node_type(&self) -> ExpressionType {
        ExpressionType::Throw
    }

    fn result_type(&self) -> Type {
        self.result_type.clone()
    }

    fn sizes(&self) -> TranslationSizes {
        self.sizes
    }

    fn write_to(&self, writer: &mut TranslationWriter) {
        writer.write_control_statement("throw");
        if let Some(value) = &self.value {
            writer.write_space();
            writer.write_translation(value.as_ref());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translations::test_support::translate;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn write_line(value: Expression) -> Expression {
        let method = MethodInfo::static_method(
            Type::class("System", "Console"),
            "WriteLine",
            vec!(ParameterInfo::of("value", Type::object())),
            Type::void());
        Expression::static_call(method, vec!(value))
    }

    #[test]
    fn test_loops_break_to_their_labels() {
        let i = Expression::parameter(Type::int(), "i");
        let end = Expression::label_target(Type::void(), Some("end"));
        let body = Expression::block(vec!(), vec!(
            Expression::if_then(
                Expression::greater_than(Expression::from(&i), Expression::int(10)),
                Expression::goto(end.clone())),
            write_line(Expression::from(&i)),
            Expression::unary(ExpressionType::PreIncrementAssign, Expression::from(&i))));
        let looped = Expression::make_loop(body, Some(end.clone()), None);
        let block = Expression::block(vec!(i.clone()), vec!(
            Expression::assign(Expression::from(&i), Expression::int(0)),
            looped,
            Expression::label(end, None)));

        assert_eq!(indoc!("
            var i = 0;
            while (true)
            {
                if (i > 10)
                {
                    break;
                }

                Console.WriteLine(i);
                ++i;
            }"), translate(&block));
    }

    #[test]
    fn test_explicit_gotos_keep_their_labels() {
        let skip = Expression::label_target(Type::void(), None);
        let flag = Expression::parameter(Type::boolean(), "flag");
        let block = Expression::block(vec!(), vec!(
            Expression::if_then(Expression::from(&flag), Expression::goto(skip.clone())),
            write_line(Expression::string("not skipped")),
            Expression::label(skip, None)));

        assert_eq!(indoc!("
            if (flag)
            {
                goto label;
            }

            Console.WriteLine(\"not skipped\");
            label: ;"), translate(&block));
    }

    #[test]
    fn test_switch_sections() {
        let day = Expression::parameter(Type::int(), "day");
        let switch = Expression::switch(
            Expression::from(&day),
            vec!(
                SwitchCase::new(vec!(Expression::int(0), Expression::int(6)), write_line(Expression::string("weekend"))),
                SwitchCase::new(
                    vec!(Expression::int(7)),
                    Expression::throw(Expression::new_object(ConstructorInfo::default_for(Type::exception()), vec!())))),
            Some(write_line(Expression::string("weekday"))));

        assert_eq!(indoc!("
            switch (day)
            {
                case 0:
                case 6:
                    Console.WriteLine(\"weekend\");
                    break;

                case 7:
                    throw new Exception();

                default:
                    Console.WriteLine(\"weekday\");
                    break;
            }"), translate(&switch));
    }

    #[test]
    fn test_value_returning_switches_return_from_each_section() {
        let day = Expression::parameter(Type::int(), "day");
        let switch = Expression::Switch(SwitchExpression::new(
            Box::new(Expression::from(&day)),
            vec!(
                SwitchCase::new(vec!(Expression::int(0)), Expression::string("a")),
                SwitchCase::new(vec!(Expression::int(1)), Expression::string("b"))),
            Some(Box::new(Expression::string("c"))),
            Type::string()));
        let lambda = Expression::typed_lambda(vec!(day.clone()), switch, Type::string());

        assert_eq!(indoc!("
            day =>
            {
                switch (day)
                {
                    case 0:
                        return \"a\";

                    case 1:
                        return \"b\";

                    default:
                        return \"c\";
                }
            }"), translate(&lambda));
    }

    #[test]
    fn test_labels_ending_a_block_get_an_empty_statement() {
        let done = Expression::label_target(Type::void(), Some("done"));
        let flag = Expression::parameter(Type::boolean(), "flag");
        let body = Expression::void_block(vec!(), vec!(
            Expression::if_then(Expression::from(&flag), Expression::goto(done.clone())),
            write_line(Expression::string("working")),
            Expression::label(done, None)));
        let lambda = Expression::lambda(vec!(flag.clone()), body);

        assert_eq!(indoc!("
            flag =>
            {
                if (flag)
                {
                    goto done;
                }

                Console.WriteLine(\"working\");
                done: ;
            }"), translate(&lambda));
    }

    #[test]
    fn test_rethrow() {
        assert_eq!("throw", translate(&Expression::rethrow()));
    }
}
