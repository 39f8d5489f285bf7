use expression::*;

use crate::context::TranslationContext;
use crate::formatting::TokenKind;
use crate::translations::{Translation, TypeNameTranslation};
use crate::writer::{TranslationSizes, TranslationWriter};

enum ConstantForm {
    Token(String, TokenKind),
    Member(TypeNameTranslation, String),
    TypeOf(TypeNameTranslation),
}

pub struct ConstantTranslation {
    result_type: Type,
    form: ConstantForm,
    sizes: TranslationSizes,
}

impl ConstantTranslation {
    pub fn new(constant: &ConstantExpression, context: &TranslationContext) -> ConstantTranslation {
        let form = match constant.value() {
            ConstantValue::Null => ConstantForm::Token(String::from("null"), TokenKind::Keyword),
            ConstantValue::Boolean(value) => ConstantForm::Token(value.to_string(), TokenKind::Keyword),
            ConstantValue::Byte(value) => numeric(value.to_string()),
            ConstantValue::Short(value) => numeric(value.to_string()),
            ConstantValue::Int(value) => numeric(value.to_string()),
            ConstantValue::UInt(value) => numeric(format!("{}U", value)),
            ConstantValue::Long(value) => numeric(format!("{}L", value)),
            ConstantValue::ULong(value) => numeric(format!("{}UL", value)),
            ConstantValue::Float(value) => floating(value.to_string(), f64::from(*value), Type::float(), "f", context),
            ConstantValue::Double(value) => floating(value.to_string(), *value, Type::double(), "d", context),
            ConstantValue::Decimal(value) => numeric(format!("{}m", value)),
            ConstantValue::Char(value) => ConstantForm::Token(format!("'{}'", escape(&value.to_string(), '\'')), TokenKind::Text),
            ConstantValue::String(value) => ConstantForm::Token(format!("\"{}\"", escape(value, '"')), TokenKind::Text),
            ConstantValue::Enum(member) => ConstantForm::Member(context.type_name(constant.result_type()), member.clone()),
            ConstantValue::Type(type_name) => ConstantForm::TypeOf(context.type_name(type_name)),
        };

        let mut translation = ConstantTranslation {
            result_type: constant.result_type().clone(),
            form,
            sizes: TranslationSizes::default(),
        };
        translation.sizes = context.measure(&translation);
        translation
    }
}

fn numeric(value: String) -> ConstantForm {
    ConstantForm::Token(value, TokenKind::Numeric)
}

fn floating(text: String, value: f64, floating_type: Type, suffix: &str, context: &TranslationContext) -> ConstantForm {
    let member = if value.is_nan() {
        "NaN"
    } else if value == f64::INFINITY {
        "PositiveInfinity"
    } else if value == f64::NEG_INFINITY {
        "NegativeInfinity"
    } else {
        return numeric(format!("{}{}", text, suffix));
    };
    ConstantForm::Member(context.type_name(&floating_type), String::from(member))
}

/// Escapes `value` for a C# literal delimited by `quote`.
fn escape(value: &str, quote: char) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            '\0' => escaped.push_str("\\0"),
            _ if c == quote => {
                escaped.push('\\');
                escaped.push(c);
            }
            _ => escaped.push(c),
        }
    }
    escaped
}

impl Translation for ConstantTranslation {
    fn node_type(&self) -> ExpressionType {
        ExpressionType::Constant
    }

    fn result_type(&self) -> Type {
        self.result_type.clone()
    }

    fn sizes(&self) -> TranslationSizes {
        self.sizes
    }

    fn write_to(&self, writer: &mut TranslationWriter) {
        match &self.form {
            ConstantForm::Token(value, kind) => writer.write_token(value, *kind),
            ConstantForm::Member(type_name, member) => {
                writer.write_translation(type_name);
                writer.write_dot();
                writer.write_default(member);
            }
            ConstantForm::TypeOf(type_name) => {
                writer.write_keyword("typeof");
                writer.write_default("(");
                writer.write_translation(type_name);
                writer.write_default(")");
            }
        }
    }
}

/// `default(T)`, `null`, or nothing for `void`.
pub struct DefaultTranslation {
    result_type: Type,
    type_name: Option<TypeNameTranslation>,
    sizes: TranslationSizes,
}

impl DefaultTranslation {
    pub fn new(default_type: &Type, context: &TranslationContext) -> DefaultTranslation {
        let type_name = if default_type.is_value_type() {
            Some(context.type_name(default_type))
        } else {
            None
        };
        let mut translation = DefaultTranslation {
            result_type: default_type.clone(),
            type_name,
            sizes: TranslationSizes::default(),
        };
        translation.sizes = context.measure(&translation);
        translation
    }
}

impl Translation for DefaultTranslation {
    fn node_type(&self) -> ExpressionType {
        ExpressionType::Default
    }

    fn result_type(&self) -> Type {
        self.result_type.clone()
    }

    fn sizes(&self) -> TranslationSizes {
        self.sizes
    }

    fn write_to(&self, writer: &mut TranslationWriter) {
        if self.result_type.is_void() {
            return;
        }
        match &self.type_name {
            Some(type_name) => {
                writer.write_keyword("default");
                writer.write_default("(");
                writer.write_translation(type_name);
                writer.write_default(")");
            }
            None => writer.write_keyword("null"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translations::test_support::translate;
    use pretty_assertions::assert_eq;

    fn constant(value: ConstantValue, constant_type: Type) -> String {
        translate(&Expression::constant(value, constant_type))
    }

    #[test]
    fn test_numeric_suffixes() {
        assert_eq!("42", constant(ConstantValue::Int(42), Type::int()));
        assert_eq!("42U", constant(ConstantValue::UInt(42), Type::uint()));
        assert_eq!("42L", constant(ConstantValue::Long(42), Type::long()));
        assert_eq!("42UL", constant(ConstantValue::ULong(42), Type::ulong()));
        assert_eq!("1.5f", constant(ConstantValue::Float(1.5), Type::float()));
        assert_eq!("2.25d", constant(ConstantValue::Double(2.25), Type::double()));
        assert_eq!("10.00m", constant(ConstantValue::Decimal(String::from("10.00")), Type::decimal()));
        assert_eq!("double.NaN", constant(ConstantValue::Double(f64::NAN), Type::double()));
    }

    #[test]
    fn test_text_is_escaped() {
        assert_eq!("\"say \\\"hi\\\"\\n\"", translate(&Expression::string("say \"hi\"\n")));
        assert_eq!("'\\''", translate(&Expression::char('\'')));
        assert_eq!("'\"'", translate(&Expression::char('"')));
        assert_eq!("\"C:\\\\temp\"", translate(&Expression::string("C:\\temp")));
    }

    #[test]
    fn test_keywords_members_and_types() {
        assert_eq!("null", translate(&Expression::null(Type::string())));
        assert_eq!("true", translate(&Expression::boolean(true)));

        let day = Type::enumeration("System", "DayOfWeek");
        assert_eq!("DayOfWeek.Monday", translate(&Expression::enum_member(day, "Monday")));
        assert_eq!("typeof(List<string>)", translate(&Expression::type_of(Type::list_of(Type::string()))));
    }

    #[test]
    fn test_defaults() {
        assert_eq!("default(int)", translate(&Expression::default(Type::int())));
        assert_eq!("null", translate(&Expression::default(Type::string())));
        assert_eq!("", translate(&Expression::empty()));
    }
}
