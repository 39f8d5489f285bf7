use expression::*;

use crate::context::TranslationContext;
use crate::error::TranslationError;
use crate::translations::operators::{operand_translation, Precedence};
use crate::translations::{ArgumentListTranslation, BoxedTranslation, Translation, TypeNameTranslation};
use crate::writer::{TranslationSizes, TranslationWriter};

/// What a call is made on.
enum CallSubject {
    Type(TypeNameTranslation),
    Instance(BoxedTranslation),
}

pub struct CallTranslation {
    result_type: Type,
    subject: CallSubject,
    method_name: String,
    generic_arguments: Vec<TypeNameTranslation>,
    arguments: ArgumentListTranslation,
    is_chained: bool,
    sizes: TranslationSizes,
}

impl CallTranslation {
    pub fn new(expression: &Expression, call: &MethodCallExpression, context: &TranslationContext) -> Result<CallTranslation, TranslationError> {
        let method = call.method();

        let (subject, parameters, arguments) = match (call.subject(), call.arguments().split_first()) {
            (_, Some((receiver, rest))) if method.is_extension() => (
                CallSubject::Instance(operand_translation(receiver, Precedence::Primary, context)?),
                method.parameters().get(1..).unwrap_or(&[]),
                rest,
            ),
            (Some(subject), _) => (
                CallSubject::Instance(operand_translation(subject, Precedence::Primary, context)?),
                method.parameters().as_slice(),
                call.arguments().as_slice(),
            ),
            (None, _) => (
                CallSubject::Type(context.type_name(method.declaring_type())),
                method.parameters().as_slice(),
                call.arguments().as_slice(),
            ),
        };

        let generic_arguments = if CallTranslation::shows_generic_arguments(method, context) {
            method.generic_arguments().iter().map(|t| context.type_name(t)).collect()
        } else {
            vec!()
        };

        let mut translation = CallTranslation {
            result_type: method.return_type().clone(),
            subject,
            method_name: method.name().clone(),
            generic_arguments,
            arguments: ArgumentListTranslation::new(parameters, arguments, context)?,
            is_chained: context.analysis().is_chained_call(expression),
            sizes: TranslationSizes::default(),
        };
        translation.sizes = context.measure(&translation);
        Ok(translation)
    }

    /// Generic arguments are shown when asked for, or when the parameters can't imply them.
    fn shows_generic_arguments(method: &MethodInfo, context: &TranslationContext) -> bool {
        if !method.is_generic() {
            return false;
        }
        if context.settings().use_explicit_generic_parameters() {
            return true;
        }
        method.generic_arguments().iter().any(|argument| {
            !method.parameters().iter().any(|p| p.parameter_type().contains(argument))
        })
    }
}

pub(crate) fn write_generic_arguments(writer: &mut TranslationWriter, generic_arguments: &[TypeNameTranslation]) {
    if generic_arguments.is_empty() {
        return;
    }
    writer.write_default("<");
    for (index, argument) in generic_arguments.iter().enumerate() {
        if index > 0 {
            writer.write_default(", ");
        }
        writer.write_translation(argument);
    }
    writer.write_default(">");
}

impl Translation for CallTranslation {
    fn node_type(&self) -> ExpressionType {
        ExpressionType::Call
    }

    fn result_type(&self) -> Type {
        self.result_type.clone()
    }

    fn sizes(&self) -> TranslationSizes {
        self.sizes
    }

    fn write_to(&self, writer: &mut TranslationWriter) {
        match &self.subject {
            CallSubject::Type(type_name) => writer.write_translation(type_name),
            CallSubject::Instance(instance) => writer.write_translation(instance.as_ref()),
        }
        if self.is_chained {
            writer.indent();
            writer.write_new_line();
        }
        writer.write_dot();
        writer.write_method_name(&self.method_name);
        write_generic_arguments(writer, &self.generic_arguments);
        writer.write_translation(&self.arguments);
        if self.is_chained {
            writer.unindent();
        }
    }

    fn is_multi_statement(&self) -> bool {
        self.arguments.is_multi_statement()
    }
}

/// A delegate invocation, `subject.Invoke(args)`.
pub struct InvocationTranslation {
    result_type: Type,
    subject: BoxedTranslation,
    arguments: ArgumentListTranslation,
    sizes: TranslationSizes,
}

impl InvocationTranslation {
    pub fn new(invocation: &InvocationExpression, context: &TranslationContext) -> Result<InvocationTranslation, TranslationError> {
        let mut translation = InvocationTranslation {
            result_type: invocation.result_type().clone(),
            subject: operand_translation(invocation.subject(), Precedence::Primary, context)?,
            arguments: ArgumentListTranslation::new(&[], invocation.arguments(), context)?,
            sizes: TranslationSizes::default(),
        };
        translation.sizes = context.measure(&translation);
        Ok(translation)
    }
}

impl Translation for InvocationTranslation {
    fn node_type(&self) -> ExpressionType {
        ExpressionType::Invoke
    }

    fn result_type(&self) -> Type {
        self.result_type.clone()
    }

    fn sizes(&self) -> TranslationSizes {
        self.sizes
    }

    fn write_to(&self, writer: &mut TranslationWriter) {
        writer.write_translation(self.subject.as_ref());
        writer.write_dot();
        writer.write_method_name("Invoke");
        writer.write_translation(&self.arguments);
    }

    fn is_multi_statement(&self) -> bool {
        self.arguments.is_multi_statement()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::TranslationSettings;
    use crate::translations::test_support::{translate, translate_with};
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn enumerable() -> Type {
        Type::class("System.Linq", "Enumerable")
    }

    fn linq(name: &str, return_type: Type) -> MethodInfo {
        MethodInfo::extension(
            enumerable(),
            name,
            vec!(ParameterInfo::of("source", Type::enumerable_of(Type::int()))),
            return_type)
    }

    #[test]
    fn test_instance_and_static_calls() {
        let name = Expression::parameter(Type::string(), "name");
        let trim = MethodInfo::instance(Type::string(), "Trim", vec!(), Type::string());
        let write_line = MethodInfo::static_method(
            Type::class("System", "Console"),
            "WriteLine",
            vec!(ParameterInfo::of("value", Type::string())),
            Type::void());

        let call = Expression::static_call(write_line, vec!(Expression::call(Expression::from(&name), trim, vec!())));
        assert_eq!("Console.WriteLine(name.Trim())", translate(&call));
    }

    #[test]
    fn test_single_extension_call_stays_inline() {
        let items = Expression::parameter(Type::enumerable_of(Type::int()), "items");
        let any = Expression::static_call(linq("Any", Type::boolean()), vec!(Expression::from(&items)));
        assert_eq!("items.Any()", translate(&any));
    }

    #[test]
    fn test_call_chains_put_one_call_per_line() {
        let items = Expression::parameter(Type::enumerable_of(Type::int()), "items");
        let reversed = Expression::static_call(linq("Reverse", Type::enumerable_of(Type::int())), vec!(Expression::from(&items)));
        let distinct = Expression::static_call(linq("Distinct", Type::enumerable_of(Type::int())), vec!(reversed));
        let list = Expression::static_call(linq("ToList", Type::list_of(Type::int())), vec!(distinct));

        assert_eq!(indoc!("
            items
                .Reverse()
                .Distinct()
                .ToList()"), translate(&list));
    }

    #[test]
    fn test_chains_indent_with_their_statement() {
        let items = Expression::parameter(Type::enumerable_of(Type::int()), "items");
        let result = Expression::parameter(Type::list_of(Type::int()), "result");
        let distinct = Expression::static_call(linq("Distinct", Type::enumerable_of(Type::int())), vec!(Expression::from(&items)));
        let list = Expression::static_call(linq("ToList", Type::list_of(Type::int())), vec!(distinct));
        let lambda = Expression::lambda(
            vec!(items.clone()),
            Expression::block(vec!(result.clone()), vec!(
                Expression::assign(Expression::from(&result), list),
                Expression::from(&result))));

        assert_eq!(indoc!("
            items =>
            {
                var result = items
                    .Distinct()
                    .ToList();
                return result;
            }"), translate(&lambda));
    }

    #[test]
    fn test_uninferrable_generic_arguments_are_shown() {
        let customer = Type::class("MyApp", "Customer");
        let create = MethodInfo::static_method(Type::class("System", "Activator"), "CreateInstance", vec!(), customer.clone())
            .with_generic_arguments(vec!(customer.clone()));
        let call = Expression::static_call(create, vec!());
        assert_eq!("Activator.CreateInstance<Customer>()", translate(&call));

        let items = Expression::parameter(Type::list_of(Type::int()), "items");
        let first = MethodInfo::extension(
            enumerable(),
            "First",
            vec!(ParameterInfo::of("source", Type::enumerable_of(Type::int()))),
            Type::int())
            .with_generic_arguments(vec!(Type::int()));
        let call = Expression::static_call(first, vec!(Expression::from(&items)));
        assert_eq!("items.First()", translate(&call));

        let settings = TranslationSettings::builder().use_explicit_generic_parameters().build();
        assert_eq!("items.First<int>()", translate_with(&call, &settings));
    }

    #[test]
    fn test_delegate_invocation() {
        let action = Expression::parameter(Type::action(vec!(Type::int())), "action");
        let invoke = Expression::invoke(Expression::from(&action), vec!(Expression::int(1)), Type::void());
        assert_eq!("action.Invoke(1)", translate(&invoke));
    }
}
