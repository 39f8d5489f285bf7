//! Binary operators, and the precedence rules every operand position uses.

use expression::*;

use crate::context::TranslationContext;
use crate::error::TranslationError;
use crate::translations::{BoxedTranslation, CheckedTranslation, ParenthesizedTranslation, Translation, TypeNameTranslation};
use crate::writer::{TranslationSizes, TranslationWriter};

/// Operator precedence, loosest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lambda,
    Assignment,
    Conditional,
    Coalesce,
    OrElse,
    AndAlso,
    Or,
    ExclusiveOr,
    And,
    Equality,
    Relational,
    Shift,
    Additive,
    Multiplicative,
    Unary,
    Primary,
}

fn binary_precedence(node_type: ExpressionType) -> Precedence {
    use ExpressionType::*;
    match node_type {
        Multiply | MultiplyChecked | Divide | Modulo => Precedence::Multiplicative,
        Add | AddChecked | Subtract | SubtractChecked => Precedence::Additive,
        LeftShift | RightShift => Precedence::Shift,
        LessThan | LessThanOrEqual | GreaterThan | GreaterThanOrEqual => Precedence::Relational,
        Equal | NotEqual => Precedence::Equality,
        And => Precedence::And,
        ExclusiveOr => Precedence::ExclusiveOr,
        Or => Precedence::Or,
        AndAlso => Precedence::AndAlso,
        OrElse => Precedence::OrElse,
        Coalesce => Precedence::Coalesce,
        _ if node_type.is_assignment() => Precedence::Assignment,
        _ => Precedence::Primary,
    }
}

/// The precedence `expression` is written with.
pub fn precedence_of(expression: &Expression) -> Precedence {
    use ExpressionType::*;
    match expression {
        Expression::Binary(binary) if binary.node_type().is_checked() && !binary.node_type().is_assignment() => Precedence::Primary,
        Expression::Binary(binary) => binary_precedence(binary.node_type()),
        Expression::Unary(unary) => match unary.node_type() {
            PostIncrementAssign | PostDecrementAssign | ArrayLength | ConvertChecked | NegateChecked => Precedence::Primary,
            TypeAs => Precedence::Relational,
            Quote => precedence_of(unary.operand()),
            _ => Precedence::Unary,
        },
        Expression::TypeBinary(type_binary) => match type_binary.node_type() {
            TypeEqual => Precedence::Equality,
            _ => Precedence::Relational,
        },
        Expression::Constant(constant) => match constant.value() {
            ConstantValue::Short(v) if *v < 0 => Precedence::Unary,
            ConstantValue::Int(v) if *v < 0 => Precedence::Unary,
            ConstantValue::Long(v) if *v < 0 => Precedence::Unary,
            ConstantValue::Float(v) if v.is_sign_negative() => Precedence::Unary,
            ConstantValue::Double(v) if v.is_sign_negative() => Precedence::Unary,
            ConstantValue::Decimal(v) if v.starts_with('-') => Precedence::Unary,
            _ => Precedence::Primary,
        },
        Expression::Conditional(conditional) if !conditional.result_type().is_void() => Precedence::Conditional,
        Expression::Lambda(_) => Precedence::Lambda,
        Expression::Block(block) if block.variables().is_empty() && block.expressions().len() == 1 => {
            precedence_of(&block.expressions()[0])
        }
        _ => Precedence::Primary,
    }
}

/// Translates `operand`, parenthesised if it binds more loosely than `minimum`.
pub fn operand_translation(operand: &Expression, minimum: Precedence, context: &TranslationContext) -> Result<BoxedTranslation, TranslationError> {
    let translation = context.get_translation_for(operand)?;
    Ok(enclose_operand(translation, operand, minimum, context))
}

/// Parenthesises the already-built `translation` of `operand` if it binds more loosely than `minimum`.
pub fn enclose_operand(translation: BoxedTranslation, operand: &Expression, minimum: Precedence, context: &TranslationContext) -> BoxedTranslation {
    if precedence_of(operand) < minimum {
        return Box::new(ParenthesizedTranslation::new(translation, context));
    }
    translation
}

fn is_right_associative(node_type: ExpressionType) -> bool {
    node_type.is_assignment() || node_type == ExpressionType::Coalesce
}

/// True if `(a op b) op c == a op (b op c)`, so a right operand of the same operator needs no parentheses.
fn is_associative(parent: &BinaryExpression, child: &Expression) -> bool {
    use ExpressionType::*;
    let child = match child {
        Expression::Binary(child) if child.node_type() == parent.node_type() => child,
        _ => return false,
    };
    match parent.node_type() {
        AndAlso | OrElse | And | Or | ExclusiveOr => true,
        Add | Multiply => parent.result_type().is_integral() && parent.result_type() == child.result_type(),
        _ => false,
    }
}

fn operator_symbol(node_type: ExpressionType) -> &'static str {
    use ExpressionType::*;
    match node_type {
        Add | AddChecked => "+",
        Subtract | SubtractChecked => "-",
        Multiply | MultiplyChecked => "*",
        Divide => "/",
        Modulo => "%",
        And => "&",
        Or => "|",
        ExclusiveOr => "^",
        LeftShift => "<<",
        RightShift => ">>",
        AndAlso => "&&",
        OrElse => "||",
        Equal => "==",
        NotEqual => "!=",
        LessThan => "<",
        LessThanOrEqual => "<=",
        GreaterThan => ">",
        GreaterThanOrEqual => ">=",
        Coalesce => "??",
        Assign | PowerAssign => "=",
        AddAssign | AddAssignChecked => "+=",
        SubtractAssign | SubtractAssignChecked => "-=",
        MultiplyAssign | MultiplyAssignChecked => "*=",
        DivideAssign => "/=",
        ModuloAssign => "%=",
        AndAssign => "&=",
        OrAssign => "|=",
        ExclusiveOrAssign => "^=",
        LeftShiftAssign => "<<=",
        RightShiftAssign => ">>=",
        _ => "?",
    }
}

enum BinaryForm {
    Operator(&'static str),
    ArrayIndex,
    Power { assigns: bool },
}

/// Which way an assignment declares its target: `var x` or `T x`.
enum Declaration {
    Inferred,
    Explicit(TypeNameTranslation),
}

pub struct BinaryTranslation {
    node_type: ExpressionType,
    result_type: Type,
    form: BinaryForm,
    declaration: Option<Declaration>,
    left: BoxedTranslation,
    right: BoxedTranslation,
    sizes: TranslationSizes,
}

impl BinaryTranslation {
    /// Checked arithmetic comes back wrapped in `checked(...)`.
    pub fn for_binary(expression: &Expression, binary: &BinaryExpression, context: &TranslationContext) -> Result<BoxedTranslation, TranslationError> {
        let node_type = binary.node_type();
        let checked = node_type.is_checked() && !node_type.is_assignment();

        let form = match node_type {
            ExpressionType::ArrayIndex => BinaryForm::ArrayIndex,
            ExpressionType::Power => BinaryForm::Power { assigns: false },
            ExpressionType::PowerAssign => BinaryForm::Power { assigns: true },
            _ => BinaryForm::Operator(operator_symbol(node_type)),
        };

        let (left, right) = match form {
            BinaryForm::ArrayIndex => (
                operand_translation(binary.left(), Precedence::Primary, context)?,
                context.get_translation_for(binary.right())?,
            ),
            BinaryForm::Power { .. } => (
                context.get_translation_for(binary.left())?,
                context.get_translation_for(binary.right())?,
            ),
            BinaryForm::Operator(_) => BinaryTranslation::operands(binary, context)?,
        };

        let declaration = if node_type == ExpressionType::Assign && context.analysis().is_joined_assignment(expression) {
            Some(BinaryTranslation::declaration_for(binary, context))
        } else {
            None
        };

        let mut translation = BinaryTranslation {
            node_type,
            result_type: binary.result_type().clone(),
            form,
            declaration,
            left,
            right,
            sizes: TranslationSizes::default(),
        };
        translation.sizes = context.measure(&translation);

        if checked {
            return Ok(Box::new(CheckedTranslation::new(Box::new(translation), context)));
        }
        Ok(Box::new(translation))
    }

    fn operands(binary: &BinaryExpression, context: &TranslationContext) -> Result<(BoxedTranslation, BoxedTranslation), TranslationError> {
        let node_type = binary.node_type();
        let precedence = binary_precedence(node_type);
        let right_associative = is_right_associative(node_type);

        let left_precedence = precedence_of(binary.left());
        let left = context.get_translation_for(binary.left())?;
        let left = if left_precedence < precedence || (left_precedence == precedence && right_associative) {
            Box::new(ParenthesizedTranslation::new(left, context)) as BoxedTranslation
        } else {
            left
        };

        let right_precedence = precedence_of(binary.right());
        let right = context.get_translation_for(binary.right())?;
        let needs_parentheses = right_precedence < precedence ||
            (right_precedence == precedence && !right_associative && !is_associative(binary, binary.right()));
        let right = if needs_parentheses {
            Box::new(ParenthesizedTranslation::new(right, context)) as BoxedTranslation
        } else {
            right
        };

        Ok((left, right))
    }

    fn declaration_for(binary: &BinaryExpression, context: &TranslationContext) -> Declaration {
        let variable_type = binary.left().result_type();
        let value = binary.right().as_ref();
        let cannot_infer = match value {
            Expression::Constant(constant) => constant.value() == &ConstantValue::Null,
            Expression::Lambda(_) => true,
            Expression::Default(t) => !t.is_value_type(),
            _ => false,
        };
        if context.settings().use_explicit_type_names() || cannot_infer {
            return Declaration::Explicit(context.type_name(&variable_type));
        }
        Declaration::Inferred
    }
}

impl Translation for BinaryTranslation {
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
        match &self.form {
            BinaryForm::Operator(symbol) => {
                match &self.declaration {
                    Some(Declaration::Inferred) => {
                        writer.write_keyword("var");
                        writer.write_space();
                    }
                    Some(Declaration::Explicit(type_name)) => {
                        writer.write_translation(type_name);
                        writer.write_space();
                    }
                    None => {}
                }
                writer.write_translation(self.left.as_ref());
                writer.write_space();
                writer.write_default(symbol);
                writer.write_space();
                writer.write_translation(self.right.as_ref());
            }
            BinaryForm::ArrayIndex => {
                writer.write_translation(self.left.as_ref());
                writer.write_default("[");
                writer.write_translation(self.right.as_ref());
                writer.write_default("]");
            }
            BinaryForm::Power { assigns } => {
                if *assigns {
                    writer.write_translation(self.left.as_ref());
                    writer.write_default(" = ");
                }
                writer.write_token("Math", crate::formatting::TokenKind::TypeName);
                writer.write_dot();
                writer.write_method_name("Pow");
                writer.write_default("(");
                writer.write_translation(self.left.as_ref());
                writer.write_default(", ");
                writer.write_translation(self.right.as_ref());
                writer.write_default(")");
            }
        }
    }

    fn is_multi_statement(&self) -> bool {
        self.right.is_multi_statement()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translations::test_support::translate;

    #[test]
    fn test_parentheses_follow_precedence() {
        let grouped = Expression::multiply(Expression::add(Expression::int(2), Expression::int(3)), Expression::int(4));
        assert_eq!("(2 + 3) * 4", translate(&grouped));

        let ungrouped = Expression::add(Expression::int(2), Expression::multiply(Expression::int(3), Expression::int(4)));
        assert_eq!("2 + 3 * 4", translate(&ungrouped));
    }

    #[test]
    fn test_non_associative_right_operands_keep_parentheses() {
        let a = Expression::parameter(Type::int(), "a");
        let b = Expression::parameter(Type::int(), "b");
        let c = Expression::parameter(Type::int(), "c");

        let subtraction = Expression::subtract(Expression::from(&a), Expression::subtract(Expression::from(&b), Expression::from(&c)));
        assert_eq!("a - (b - c)", translate(&subtraction));

        let left_grouped = Expression::subtract(Expression::subtract(Expression::from(&a), Expression::from(&b)), Expression::from(&c));
        assert_eq!("a - b - c", translate(&left_grouped));

        let addition = Expression::add(Expression::from(&a), Expression::add(Expression::from(&b), Expression::from(&c)));
        assert_eq!("a + b + c", translate(&addition));
    }

    #[test]
    fn test_string_concatenation_is_not_reassociated() {
        let a = Expression::parameter(Type::string(), "a");
        let b = Expression::parameter(Type::string(), "b");
        let concatenation = Expression::add(Expression::from(&a), Expression::add(Expression::from(&b), Expression::string("!")));
        assert_eq!("a + (b + \"!\")", translate(&concatenation));
    }

    #[test]
    fn test_logical_operators() {
        let x = Expression::parameter(Type::boolean(), "x");
        let y = Expression::parameter(Type::boolean(), "y");
        let z = Expression::parameter(Type::boolean(), "z");
        let expression = Expression::and_also(
            Expression::or_else(Expression::from(&x), Expression::from(&y)),
            Expression::and_also(Expression::from(&y), Expression::from(&z)));
        assert_eq!("(x || y) && y && z", translate(&expression));
    }

    #[test]
    fn test_checked_and_power() {
        let a = Expression::parameter(Type::double(), "a");
        let b = Expression::parameter(Type::double(), "b");
        let power = Expression::arithmetic(ExpressionType::Power, Expression::from(&a), Expression::from(&b));
        assert_eq!("Math.Pow(a, b)", translate(&power));

        let i = Expression::parameter(Type::int(), "i");
        let checked = Expression::arithmetic(ExpressionType::AddChecked, Expression::from(&i), Expression::int(1));
        assert_eq!("checked(i + 1)", translate(&checked));
    }

    #[test]
    fn test_checked_operands_follow_unchecked_precedence() {
        let a = Expression::parameter(Type::int(), "a");
        let b = Expression::parameter(Type::int(), "b");
        let c = Expression::parameter(Type::int(), "c");

        let product_plus = Expression::arithmetic(
            ExpressionType::AddChecked,
            Expression::multiply(Expression::from(&a), Expression::from(&b)),
            Expression::from(&c));
        assert_eq!("checked(a * b + c)", translate(&product_plus));

        let scaled_difference = Expression::arithmetic(
            ExpressionType::MultiplyChecked,
            Expression::subtract(Expression::from(&a), Expression::from(&b)),
            Expression::from(&c));
        assert_eq!("checked((a - b) * c)", translate(&scaled_difference));
    }

    #[test]
    fn test_assignment_is_right_associative() {
        let a = Expression::parameter(Type::int(), "a");
        let b = Expression::parameter(Type::int(), "b");
        let chained = Expression::assign(Expression::from(&a), Expression::assign(Expression::from(&b), Expression::int(0)));
        assert_eq!("a = b = 0", translate(&chained));
    }

    #[test]
    fn test_array_index_and_coalesce() {
        let names = Expression::parameter(Type::array(Type::string()), "names");
        let index = Expression::array_index(Expression::from(&names), Expression::int(0));
        let coalesced = Expression::coalesce(index, Expression::string("none"));
        assert_eq!("names[0] ?? \"none\"", translate(&coalesced));
    }

    #[test]
    fn test_negative_constants_need_no_parentheses() {
        let x = Expression::parameter(Type::int(), "x");
        let expression = Expression::subtract(Expression::from(&x), Expression::int(-5));
        assert_eq!("x - -5", translate(&expression));
    }
}
