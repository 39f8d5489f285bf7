use expression::*;

use crate::context::TranslationContext;
use crate::error::TranslationError;
use crate::translations::{BoxedTranslation, CodeBlockTranslation, Translation, TypeNameTranslation};
use crate::writer::{TranslationSizes, TranslationWriter};

struct LambdaParameter {
    type_name: Option<TypeNameTranslation>,
    name: String,
}

enum LambdaBody {
    Expression(BoxedTranslation),
    Block(CodeBlockTranslation),
}

/// `x => body`, `(a, b) => body` or `(int a) => { ... }`.
pub struct LambdaTranslation {
    result_type: Type,
    parameters: Vec<LambdaParameter>,
    body: LambdaBody,
    sizes: TranslationSizes,
}

impl LambdaTranslation {
    pub fn new(lambda: &LambdaExpression, context: &TranslationContext) -> Result<LambdaTranslation, TranslationError> {
        let typed = context.settings().show_lambda_parameter_type_names();
        let parameters = lambda.parameters()
            .iter()
            .map(|parameter| LambdaParameter {
                type_name: if typed { Some(context.type_name(parameter.parameter_type())) } else { None },
                name: context.variable_name(parameter),
            })
            .collect();

        let statements = context.get_statements_for(lambda.body(), !lambda.return_type().is_void())?;
        let body = match statements.into_expression() {
            Ok(expression) => LambdaBody::Expression(expression),
            Err(statements) => LambdaBody::Block(CodeBlockTranslation::new(statements, context)),
        };

        let mut translation = LambdaTranslation {
            result_type: lambda.delegate_type(),
            parameters,
            body,
            sizes: TranslationSizes::default(),
        };
        translation.sizes = context.measure(&translation);
        Ok(translation)
    }

    fn write_parameters(&self, writer: &mut TranslationWriter) {
        let parenthesised = self.parameters.len() != 1 || self.parameters[0].type_name.is_some();
        if parenthesised {
            writer.write_default("(");
        }
        for (index, parameter) in self.parameters.iter().enumerate() {
            if index > 0 {
                writer.write_default(", ");
            }
            if let Some(type_name) = &parameter.type_name {
                writer.write_translation(type_name);
                writer.write_space();
            }
            writer.write_variable(&parameter.name);
        }
        if parenthesised {
            writer.write_default(")");
        }
    }
}

impl Translation for LambdaTranslation {
    fn node_type(&self) -> ExpressionType {
        ExpressionType::Lambda
    }

    fn result_type(&self) -> Type {
        self.result_type.clone()
    }

    fn sizes(&self) -> TranslationSizes {
        self.sizes
    }

    fn write_to(&self, writer: &mut TranslationWriter) {
        self.write_parameters(writer);
        writer.write_default(" =>");
        match &self.body {
            LambdaBody::Expression(expression) => {
                writer.write_space();
                writer.write_translation(expression.as_ref());
            }
            LambdaBody::Block(block) => writer.write_translation(block),
        }
    }

    fn is_multi_statement(&self) -> bool {
        match &self.body {
            LambdaBody::Expression(expression) => expression.is_multi_statement(),
            LambdaBody::Block(_) => true,
        }
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
    fn test_parameter_lists() {
        let x = Expression::parameter(Type::int(), "x");
        let a = Expression::parameter(Type::int(), "a");
        let b = Expression::parameter(Type::int(), "b");

        assert_eq!("() => 1", translate(&Expression::lambda(vec!(), Expression::int(1))));
        assert_eq!("x => x * 2", translate(&Expression::lambda(
            vec!(x.clone()),
            Expression::multiply(Expression::from(&x), Expression::int(2)))));

        let sum = Expression::lambda(vec!(a.clone(), b.clone()), Expression::add(Expression::from(&a), Expression::from(&b)));
        assert_eq!("(a, b) => a + b", translate(&sum));

        let settings = TranslationSettings::builder().show_lambda_parameter_type_names().build();
        assert_eq!("(int a, int b) => a + b", translate_with(&sum, &settings));
    }

    #[test]
    fn test_multi_statement_bodies_are_braced() {
        let x = Expression::parameter(Type::int(), "x");
        let doubled = Expression::parameter(Type::int(), "doubled");
        let lambda = Expression::lambda(
            vec!(x.clone()),
            Expression::block(vec!(doubled.clone()), vec!(
                Expression::assign(Expression::from(&doubled), Expression::multiply(Expression::from(&x), Expression::int(2))),
                Expression::add(Expression::from(&doubled), Expression::int(1)))));

        assert_eq!(indoc!("
            x =>
            {
                var doubled = x * 2;
                return doubled + 1;
            }"), translate(&lambda));
    }

    #[test]
    fn test_nested_lambdas_indent_with_their_parent() {
        let x = Expression::parameter(Type::int(), "x");
        let y = Expression::parameter(Type::int(), "y");
        let total = Expression::parameter(Type::int(), "total");
        let inner = Expression::lambda(
            vec!(y.clone()),
            Expression::block(vec!(total.clone()), vec!(
                Expression::assign(Expression::from(&total), Expression::add(Expression::from(&x), Expression::from(&y))),
                Expression::from(&total))));
        let outer = Expression::lambda(vec!(x.clone()), inner);

        assert_eq!(indoc!("
            x => y =>
            {
                var total = x + y;
                return total;
            }"), translate(&outer));
    }
}
