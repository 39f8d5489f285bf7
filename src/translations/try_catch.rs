use expression::*;

use crate::context::TranslationContext;
use crate::error::TranslationError;
use crate::translations::control_flow::ThrowTranslation;
use crate::translations::{BoxedTranslation, CodeBlockTranslation, Translation, TypeNameTranslation};
use crate::writer::{TranslationSizes, TranslationWriter};

struct CatchTranslation {
    exception_type: Option<TypeNameTranslation>,
    variable: Option<String>,
    filter: Option<BoxedTranslation>,
    body: CodeBlockTranslation,
}

impl CatchTranslation {
    fn new(handler: &CatchBlock, in_return_position: bool, context: &TranslationContext) -> Result<CatchTranslation, TranslationError> {
        let variable = handler.variable().as_ref().map(|variable| context.variable_name(variable));
        let catches_everything = handler.exception_type() == &Type::exception() && variable.is_none();
        let exception_type = if catches_everything {
            None
        } else {
            Some(context.type_name(handler.exception_type()))
        };

        let filter = match handler.filter() {
            Some(filter) => Some(context.get_translation_for(filter)?),
            None => None,
        };

        Ok(CatchTranslation {
            exception_type,
            variable,
            filter,
            body: context.get_code_block_for(handler.body(), in_return_position)?,
        })
    }

    fn write_to(&self, writer: &mut TranslationWriter) {
        writer.write_control_statement("catch");
        if let Some(exception_type) = &self.exception_type {
            writer.write_default(" (");
            writer.write_translation(exception_type);
            if let Some(variable) = &self.variable {
                writer.write_space();
                writer.write_variable(variable);
            }
            writer.write_default(")");
        }
        if let Some(filter) = &self.filter {
            writer.write_space();
            writer.write_control_statement("when");
            writer.write_default(" (");
            writer.write_translation(filter.as_ref());
            writer.write_default(")");
        }
        writer.write_translation(&self.body);
    }
}

/// `try`, its `catch` clauses, and `finally`; a fault block becomes a rethrowing `catch`.
pub struct TryTranslation {
    result_type: Type,
    body: CodeBlockTranslation,
    handlers: Vec<CatchTranslation>,
    fault: Option<CodeBlockTranslation>,
    finally: Option<CodeBlockTranslation>,
    sizes: TranslationSizes,
}

impl TryTranslation {
    pub fn new(tried: &TryExpression, context: &TranslationContext) -> Result<TryTranslation, TranslationError> {
        TryTranslation::create(tried, false, context)
    }

    /// A try ending a value-returning body; the try and catch blocks return their values.
    pub fn returning(tried: &TryExpression, context: &TranslationContext) -> Result<TryTranslation, TranslationError> {
        TryTranslation::create(tried, true, context)
    }

    fn create(tried: &TryExpression, in_return_position: bool, context: &TranslationContext) -> Result<TryTranslation, TranslationError> {
        let handlers = tried.handlers()
            .iter()
            .map(|handler| CatchTranslation::new(handler, in_return_position, context))
            .collect::<Result<Vec<_>, _>>()?;

        let fault = match tried.fault() {
            Some(fault) => {
                let statements = context.get_statements_for(fault, false)?
                    .with_statement(Box::new(ThrowTranslation::rethrow(context)), context);
                Some(CodeBlockTranslation::new(statements, context))
            }
            None => None,
        };

        let finally = match tried.finally() {
            Some(finally) => Some(context.get_code_block_for(finally, false)?),
            None => None,
        };

        let mut translation = TryTranslation {
            result_type: tried.result_type().clone(),
            body: context.get_code_block_for(tried.body(), in_return_position)?,
            handlers,
            fault,
            finally,
            sizes: TranslationSizes::default(),
        };
        translation.sizes = context.measure(&translation);
        Ok(translation)
    }
}

impl Translation for TryTranslation {
    fn node_type(&self) -> ExpressionType {
        ExpressionType::Try
    }

    fn result_type(&self) -> Type {
        self.result_type.clone()
    }

    fn sizes(&self) -> TranslationSizes {
        self.sizes
    }

    fn write_to(&self, writer: &mut TranslationWriter) {
        writer.write_control_statement("try");
        writer.write_translation(&self.body);

        for handler in &self.handlers {
            writer.write_new_line();
            handler.write_to(writer);
        }
        if let Some(fault) = &self.fault {
            writer.write_new_line();
            writer.write_control_statement("catch");
            writer.write_translation(fault);
        }
        if let Some(finally) = &self.finally {
            writer.write_new_line();
            writer.write_control_statement("finally");
            writer.write_translation(finally);
        }
    }

    fn is_terminated(&self) -> bool {
        true
    }

    fn is_multi_statement(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translations::test_support::translate;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn write_line(value: &str) -> Expression {
        let method = MethodInfo::static_method(
            Type::class("System", "Console"),
            "WriteLine",
            vec!(ParameterInfo::of("value", Type::string())),
            Type::void());
        Expression::static_call(method, vec!(Expression::string(value)))
    }

    #[test]
    fn test_typed_and_filtered_catches() {
        let format_exception = Type::class("System", "FormatException");
        let ex = Expression::parameter(format_exception.clone(), "ex");
        let message = MemberInfo::property(format_exception.clone(), "Message", Type::string());
        let filter = Expression::not_equal(Expression::property(Expression::from(&ex), message), Expression::null(Type::string()));

        let tried = Expression::try_catch_finally(
            write_line("parsing"),
            vec!(
                CatchBlock::new(format_exception, Some(ex.clone()), Some(filter), write_line("bad format")),
                CatchBlock::new(Type::exception(), None, None, write_line("failed"))),
            write_line("done"));

        assert_eq!(indoc!("
            try
            {
                Console.WriteLine(\"parsing\");
            }
            catch (FormatException ex) when (ex.Message != null)
            {
                Console.WriteLine(\"bad format\");
            }
            catch
            {
                Console.WriteLine(\"failed\");
            }
            finally
            {
                Console.WriteLine(\"done\");
            }"), translate(&tried));
    }

    #[test]
    fn test_value_returning_trys_return_from_each_block() {
        let parse = MethodInfo::static_method(Type::int(), "Parse", vec!(ParameterInfo::of("s", Type::string())), Type::int());
        let ex = Expression::parameter(Type::exception(), "ex");
        let tried = Expression::try_catch(
            Expression::static_call(parse, vec!(Expression::string("1"))),
            vec!(CatchBlock::new(Type::exception(), Some(ex), None, Expression::int(-1))));
        let lambda = Expression::lambda(vec!(), tried);

        assert_eq!(indoc!("
            () =>
            {
                try
                {
                    return int.Parse(\"1\");
                }
                catch (Exception ex)
                {
                    return -1;
                }
            }"), translate(&lambda));
    }

    #[test]
    fn test_void_trys_do_not_return() {
        let tried = Expression::try_catch(
            write_line("working"),
            vec!(CatchBlock::new(Type::exception(), None, None, write_line("failed"))));
        let lambda = Expression::lambda(vec!(), tried);

        assert_eq!(indoc!("
            () =>
            {
                try
                {
                    Console.WriteLine(\"working\");
                }
                catch
                {
                    Console.WriteLine(\"failed\");
                }
            }"), translate(&lambda));
    }

    #[test]
    fn test_fault_blocks_rethrow() {
        let tried = Expression::try_fault(write_line("working"), write_line("cleaning up"));

        assert_eq!(indoc!("
            try
            {
                Console.WriteLine(\"working\");
            }
            catch
            {
                Console.WriteLine(\"cleaning up\");
                throw;
            }"), translate(&tried));
    }
}
