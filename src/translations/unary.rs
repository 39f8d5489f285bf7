use expression::*;

use crate::context::TranslationContext;
use crate::error::TranslationError;
use crate::translations::comments::CommentTranslation;
use crate::translations::operators::{operand_translation, Precedence};
use crate::translations::{BoxedTranslation, CheckedTranslation, ParenthesizedTranslation, Translation, TypeNameTranslation};
use crate::writer::{TranslationSizes, TranslationWriter};

const QUOTED_LAMBDA_COMMENT: &str = "Quoted to induce a closure:";

enum UnaryForm {
    Prefix(&'static str),
    Postfix(&'static str),
    Cast(TypeNameTranslation),
    As(TypeNameTranslation),
    Length,
}

pub struct UnaryTranslation {
    node_type: ExpressionType,
    result_type: Type,
    form: UnaryForm,
    operand: BoxedTranslation,
    sizes: TranslationSizes,
}

impl UnaryTranslation {
    pub fn for_unary(unary: &UnaryExpression, context: &TranslationContext) -> Result<BoxedTranslation, TranslationError> {
        use ExpressionType::*;

        let node_type = unary.node_type();
        if node_type == Quote {
            return UnaryTranslation::quoted(unary, context);
        }

        let form = match node_type {
            Negate | NegateChecked => UnaryForm::Prefix("-"),
            UnaryPlus => UnaryForm::Prefix("+"),
            Not if unary.operand().result_type().is_boolean() => UnaryForm::Prefix("!"),
            Not | OnesComplement => UnaryForm::Prefix("~"),
            Increment | PreIncrementAssign => UnaryForm::Prefix("++"),
            Decrement | PreDecrementAssign => UnaryForm::Prefix("--"),
            PostIncrementAssign => UnaryForm::Postfix("++"),
            PostDecrementAssign => UnaryForm::Postfix("--"),
            Convert | ConvertChecked | Unbox => UnaryForm::Cast(context.type_name(unary.result_type())),
            TypeAs => UnaryForm::As(context.type_name(unary.result_type())),
            ArrayLength => UnaryForm::Length,
            _ => {
                return Err(TranslationError::UnsupportedExpression {
                    node_type,
                    description: format!("{:?} of {:?}", node_type, unary.operand().result_type()),
                });
            }
        };

        let minimum = match form {
            UnaryForm::Postfix(_) | UnaryForm::Length => Precedence::Primary,
            UnaryForm::As(_) => Precedence::Shift,
            _ => Precedence::Unary,
        };
        let mut operand = operand_translation(unary.operand(), minimum, context)?;
        if let UnaryForm::Prefix(symbol) = &form {
            if leading_sign(unary.operand()).map_or(false, |sign| symbol.ends_with(sign)) {
                operand = Box::new(ParenthesizedTranslation::new(operand, context));
            }
        }

        let mut translation = UnaryTranslation {
            node_type,
            result_type: unary.result_type().clone(),
            form,
            operand,
            sizes: TranslationSizes::default(),
        };
        translation.sizes = context.measure(&translation);

        if node_type.is_checked() {
            return Ok(Box::new(CheckedTranslation::new(Box::new(translation), context)));
        }
        Ok(Box::new(translation))
    }

    fn quoted(unary: &UnaryExpression, context: &TranslationContext) -> Result<BoxedTranslation, TranslationError> {
        let quoted = context.get_translation_for(unary.operand())?;
        if !context.settings().show_quoted_lambda_comments() {
            return Ok(quoted);
        }

        let comment = CommentTranslation::new(QUOTED_LAMBDA_COMMENT, context);
        let mut translation = QuotedTranslation { comment, quoted, sizes: TranslationSizes::default() };
        translation.sizes = context.measure(&translation);
        Ok(Box::new(translation))
    }
}

/// The `-` or `+` an unparenthesised `expression` is written starting with.
fn leading_sign(expression: &Expression) -> Option<char> {
    use ExpressionType::*;
    match expression {
        Expression::Unary(unary) => match unary.node_type() {
            Negate | Decrement | PreDecrementAssign => Some('-'),
            UnaryPlus | Increment | PreIncrementAssign => Some('+'),
            Quote => leading_sign(unary.operand()),
            _ => None,
        },
        Expression::Constant(constant) => {
            let negative = match constant.value() {
                ConstantValue::Short(v) => *v < 0,
                ConstantValue::Int(v) => *v < 0,
                ConstantValue::Long(v) => *v < 0,
                ConstantValue::Float(v) => v.is_sign_negative(),
                ConstantValue::Double(v) => v.is_sign_negative(),
                ConstantValue::Decimal(v) => v.starts_with('-'),
                _ => false,
            };
            if negative { Some('-') } else { None }
        }
        Expression::Block(block) if block.variables().is_empty() && block.expressions().len() == 1 => {
            leading_sign(&block.expressions()[0])
        }
        _ => None,
    }
}

impl Translation for UnaryTranslation {
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
            UnaryForm::Prefix(symbol) => {
                writer.write_default(symbol);
                writer.write_translation(self.operand.as_ref());
            }
            UnaryForm::Postfix(symbol) => {
                writer.write_translation(self.operand.as_ref());
                writer.write_default(symbol);
            }
            UnaryForm::Cast(type_name) => {
                writer.write_default("(");
                writer.write_translation(type_name);
                writer.write_default(")");
                writer.write_translation(self.operand.as_ref());
            }
            UnaryForm::As(type_name) => {
                writer.write_translation(self.operand.as_ref());
                writer.write_space();
                writer.write_keyword("as");
                writer.write_space();
                writer.write_translation(type_name);
            }
            UnaryForm::Length => {
                writer.write_translation(self.operand.as_ref());
                writer.write_dot();
                writer.write_default("Length");
            }
        }
    }
}

/// A quoted lambda preceded by a comment explaining the quote.
pub struct QuotedTranslation {
    comment: CommentTranslation,
    quoted: BoxedTranslation,
    sizes: TranslationSizes,
}

impl Translation for QuotedTranslation {
    fn node_type(&self) -> ExpressionType {
        ExpressionType::Quote
    }

    fn result_type(&self) -> Type {
        self.quoted.result_type()
    }

    fn sizes(&self) -> TranslationSizes {
        self.sizes
    }

    fn write_to(&self, writer: &mut TranslationWriter) {
        writer.write_translation(&self.comment);
        writer.write_new_line();
        writer.write_translation(self.quoted.as_ref());
    }

    fn is_multi_statement(&self) -> bool {
        true
    }
}

/// `x is T` and `x.GetType() == typeof(T)`.
pub struct TypeBinaryTranslation {
    node_type: ExpressionType,
    operand: BoxedTranslation,
    type_name: TypeNameTranslation,
    sizes: TranslationSizes,
}

impl TypeBinaryTranslation {
    pub fn new(type_binary: &TypeBinaryExpression, context: &TranslationContext) -> Result<TypeBinaryTranslation, TranslationError> {
        let minimum = match type_binary.node_type() {
            ExpressionType::TypeEqual => Precedence::Primary,
            _ => Precedence::Shift,
        };
        let mut translation = TypeBinaryTranslation {
            node_type: type_binary.node_type(),
            operand: operand_translation(type_binary.operand(), minimum, context)?,
            type_name: context.type_name(type_binary.type_operand()),
            sizes: TranslationSizes::default(),
        };
        translation.sizes = context.measure(&translation);
        Ok(translation)
    }
}

impl Translation for TypeBinaryTranslation {
    fn node_type(&self) -> ExpressionType {
        self.node_type
    }

    fn result_type(&self) -> Type {
        Type::boolean()
    }

    fn sizes(&self) -> TranslationSizes {
        self.sizes
    }

    fn write_to(&self, writer: &mut TranslationWriter) {
        writer.write_translation(self.operand.as_ref());
        if self.node_type == ExpressionType::TypeEqual {
            writer.write_dot();
            writer.write_method_name("GetType");
            writer.write_default("() == ");
            writer.write_keyword("typeof");
            writer.write_default("(");
            writer.write_translation(&self.type_name);
            writer.write_default(")");
            return;
        }
        writer.write_space();
        writer.write_keyword("is");
        writer.write_space();
        writer.write_translation(&self.type_name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::TranslationSettings;
    use crate::translations::test_support::{translate, translate_with};
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_casts_and_type_tests() {
        let value = Expression::parameter(Type::object(), "value");
        assert_eq!("(int)value", translate(&Expression::convert(Expression::from(&value), Type::int())));
        assert_eq!("value as string", translate(&Expression::type_as(Expression::from(&value), Type::string())));
        assert_eq!("value is string", translate(&Expression::type_is(Expression::from(&value), Type::string())));

        let type_equal = Expression::TypeBinary(TypeBinaryExpression::new(
            ExpressionType::TypeEqual, Box::new(Expression::from(&value)), Type::string()));
        assert_eq!("value.GetType() == typeof(string)", translate(&type_equal));
    }

    #[test]
    fn test_cast_operands_are_parenthesised() {
        let a = Expression::parameter(Type::long(), "a");
        let sum = Expression::add(Expression::from(&a), Expression::long(1));
        assert_eq!("(int)(a + 1L)", translate(&Expression::convert(sum, Type::int())));
    }

    #[test]
    fn test_not_and_increments() {
        let flag = Expression::parameter(Type::boolean(), "flag");
        let bits = Expression::parameter(Type::int(), "bits");
        assert_eq!("!flag", translate(&Expression::not(Expression::from(&flag))));
        assert_eq!("~bits", translate(&Expression::not(Expression::from(&bits))));
        assert_eq!("bits++", translate(&Expression::unary(ExpressionType::PostIncrementAssign, Expression::from(&bits))));
        assert_eq!("--bits", translate(&Expression::unary(ExpressionType::PreDecrementAssign, Expression::from(&bits))));
        assert_eq!("checked(-bits)", translate(&Expression::unary(ExpressionType::NegateChecked, Expression::from(&bits))));
    }

    #[test]
    fn test_repeated_signs_are_kept_apart() {
        let x = Expression::parameter(Type::int(), "x");

        let negated_twice = Expression::negate(Expression::negate(Expression::from(&x)));
        assert_eq!("-(-x)", translate(&negated_twice));
        assert_eq!("-(-5)", translate(&Expression::negate(Expression::int(-5))));

        let decremented = Expression::unary(ExpressionType::PreDecrementAssign, Expression::from(&x));
        assert_eq!("-(--x)", translate(&Expression::negate(decremented)));

        let plus_plus = Expression::unary(ExpressionType::UnaryPlus, Expression::unary(ExpressionType::UnaryPlus, Expression::from(&x)));
        assert_eq!("+(+x)", translate(&plus_plus));
    }

    #[test]
    fn test_different_signs_are_not_parenthesised() {
        let x = Expression::parameter(Type::int(), "x");
        assert_eq!("-+x", translate(&Expression::negate(Expression::unary(ExpressionType::UnaryPlus, Expression::from(&x)))));
        assert_eq!("-~x", translate(&Expression::negate(Expression::not(Expression::from(&x)))));
        assert_eq!("-5", translate(&Expression::int(-5)));
    }

    #[test]
    fn test_array_length() {
        let items = Expression::parameter(Type::array(Type::int()), "items");
        assert_eq!("items.Length", translate(&Expression::array_length(Expression::from(&items))));
    }

    #[test]
    fn test_quoted_lambda_comment() {
        let x = Expression::parameter(Type::int(), "x");
        let quoted = Expression::quote(Expression::lambda(vec!(x.clone()), Expression::from(&x)));

        assert_eq!("x => x", translate(&quoted));

        let settings = TranslationSettings::builder().show_quoted_lambda_comments().build();
        assert_eq!(indoc!("
            // Quoted to induce a closure:
            x => x"), translate_with(&quoted, &settings));
    }
}
