use expression::{Expression, ExpressionType, Type};

use crate::analysis::flatten_statements;
use crate::context::TranslationContext;
use crate::error::TranslationError;
use crate::translations::{BoxedTranslation, Translation, TypeNameTranslation};
use crate::writer::{TranslationSizes, TranslationWriter};

/// `T name;` for a variable declared at the top of a block.
struct VariableDeclaration {
    type_name: TypeNameTranslation,
    name: String,
}

struct Statement {
    translation: BoxedTranslation,
    is_return: bool,
}

impl Statement {
    fn needs_semicolon(&self) -> bool {
        !self.translation.is_terminated()
    }

    /// Braced statements are followed by a blank line unless they come last.
    fn is_braced(&self) -> bool {
        self.translation.is_terminated() &&
            self.translation.node_type() != ExpressionType::Comment &&
            self.translation.sizes().new_line_count() > 0
    }
}

/// A statement list: declarations, then one statement per line.
pub struct BlockTranslation {
    result_type: Type,
    declarations: Vec<VariableDeclaration>,
    statements: Vec<Statement>,
    sizes: TranslationSizes,
}

impl BlockTranslation {
    pub fn new(expression: &Expression, in_return_position: bool, context: &TranslationContext) -> Result<BlockTranslation, TranslationError> {
        let (expressions, declared) = match expression {
            Expression::Block(block) => (flatten_statements(block), context.analysis().variables_declared_by(expression)),
            _ if expression.is_empty() => (vec!(), &[][..]),
            _ => (vec!(expression), &[][..]),
        };

        let declarations = declared
            .iter()
            .map(|variable| VariableDeclaration {
                type_name: context.type_name(variable.parameter_type()),
                name: context.variable_name(variable),
            })
            .collect();

        let last_index = expressions.len().saturating_sub(1);
        let mut translations = vec!();
        for (index, statement) in expressions.into_iter().enumerate() {
            let translation = if in_return_position && index == last_index {
                context.get_returned_translation_for(statement)?
            } else {
                context.get_translation_for(statement)?
            };
            if !translation.sizes().is_empty() {
                translations.push(translation);
            }
        }

        let statement_count = translations.len();
        let statements = translations
            .into_iter()
            .enumerate()
            .map(|(index, translation)| {
                let is_return = in_return_position &&
                    index + 1 == statement_count &&
                    BlockTranslation::can_be_returned(translation.as_ref());
                Statement { translation, is_return }
            })
            .collect();

        let mut translation = BlockTranslation {
            result_type: expression.result_type(),
            declarations,
            statements,
            sizes: TranslationSizes::default(),
        };
        translation.sizes = context.measure(&translation);
        Ok(translation)
    }

    /// Statements that carry their own returns, such as an `if` with
    /// returning branches, are terminated and so are never returned here.
    fn can_be_returned(translation: &dyn Translation) -> bool {
        !translation.result_type().is_void() &&
            !translation.is_terminated() &&
            !matches!(translation.node_type(), ExpressionType::Throw | ExpressionType::Goto)
    }

    /// Appends a statement, e.g. the `throw;` closing a fault block.
    pub fn with_statement(mut self, translation: BoxedTranslation, context: &TranslationContext) -> BlockTranslation {
        self.statements.push(Statement { translation, is_return: false });
        self.sizes = context.measure(&self);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty() && self.statements.is_empty()
    }

    /// True if the last statement leaves the enclosing block: a `return`, `throw` or jump.
    pub fn ends_with_exit(&self) -> bool {
        match self.statements.last() {
            Some(statement) => statement.is_return || matches!(statement.translation.node_type(), ExpressionType::Goto | ExpressionType::Throw),
            None => false,
        }
    }

    /// The lone statement of a single-statement list that can be written as an
    /// expression, or the list itself.
    pub fn into_expression(mut self) -> Result<BoxedTranslation, BlockTranslation> {
        let is_expression = self.declarations.is_empty() &&
            self.statements.len() == 1 &&
            !self.statements[0].translation.is_terminated();

        match self.statements.pop() {
            Some(statement) if is_expression => Ok(statement.translation),
            Some(statement) => {
                self.statements.push(statement);
                Err(self)
            }
            None => Err(self),
        }
    }
}

impl Translation for BlockTranslation {
    fn node_type(&self) -> ExpressionType {
        ExpressionType::Block
    }

    fn result_type(&self) -> Type {
        self.result_type.clone()
    }

    fn sizes(&self) -> TranslationSizes {
        self.sizes
    }

    fn write_to(&self, writer: &mut TranslationWriter) {
        for (index, declaration) in self.declarations.iter().enumerate() {
            if index > 0 {
                writer.write_new_line();
            }
            writer.write_translation(&declaration.type_name);
            writer.write_space();
            writer.write_variable(&declaration.name);
            writer.write_semicolon();
        }
        if !self.declarations.is_empty() && !self.statements.is_empty() {
            writer.write_blank_line();
        }

        for (index, statement) in self.statements.iter().enumerate() {
            if index > 0 {
                writer.write_new_line();
                if self.statements[index - 1].is_braced() {
                    writer.write_new_line();
                }
            }
            if statement.is_return {
                writer.write_control_statement("return");
                writer.write_space();
            }
            writer.write_translation(statement.translation.as_ref());
            if statement.needs_semicolon() {
                writer.write_semicolon();
            } else if index + 1 == self.statements.len() && statement.translation.node_type() == ExpressionType::Label {
                writer.write_default(" ;");
            }
        }
    }

    fn is_terminated(&self) -> bool {
        true
    }

    fn is_multi_statement(&self) -> bool {
        self.statements.len() > 1 || !self.declarations.is_empty()
    }
}

/// A statement list in braces, starting on a new line.
pub struct CodeBlockTranslation {
    statements: BlockTranslation,
    sizes: TranslationSizes,
}

impl CodeBlockTranslation {
    pub fn new(statements: BlockTranslation, context: &TranslationContext) -> CodeBlockTranslation {
        let mut translation = CodeBlockTranslation { statements, sizes: TranslationSizes::default() };
        translation.sizes = context.measure(&translation);
        translation
    }
}

impl Translation for CodeBlockTranslation {
    fn node_type(&self) -> ExpressionType {
        ExpressionType::Block
    }

    fn result_type(&self) -> Type {
        self.statements.result_type()
    }

    fn sizes(&self) -> TranslationSizes {
        self.sizes
    }

    fn write_to(&self, writer: &mut TranslationWriter) {
        writer.write_opening_brace();
        if !self.statements.is_empty() {
            writer.write_new_line();
            writer.write_translation(&self.statements);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translations::test_support::{translate, translate_with};
    use crate::settings::TranslationSettings;
    use expression::{MethodInfo, ParameterInfo};
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn write_line() -> MethodInfo {
        MethodInfo::static_method(Type::class("System", "Console"), "WriteLine", vec!(ParameterInfo::of("value", Type::object())), Type::void())
    }

    #[test]
    fn test_joined_declarations() {
        let x = Expression::parameter(Type::int(), "x");
        let y = Expression::parameter(Type::int(), "y");
        let block = Expression::block(
            vec!(x.clone(), y.clone()),
            vec!(
                Expression::assign(Expression::from(&x), Expression::int(1)),
                Expression::assign(Expression::from(&y), Expression::add(Expression::from(&x), Expression::int(2))),
                Expression::assign(Expression::from(&x), Expression::from(&y))));

        assert_eq!(indoc!("
            var x = 1;
            var y = x + 2;
            x = y;"), translate(&block));
    }

    #[test]
    fn test_first_assignments_join_after_unrelated_statements() {
        let count = Expression::parameter(Type::int(), "count");
        let block = Expression::block(
            vec!(count.clone()),
            vec!(
                Expression::static_call(write_line(), vec!(Expression::string("start"))),
                Expression::assign(Expression::from(&count), Expression::int(0))));

        assert_eq!(indoc!("
            Console.WriteLine(\"start\");
            var count = 0;"), translate(&block));
    }

    #[test]
    fn test_variables_first_used_in_nested_statements_are_declared_first() {
        let flag = Expression::parameter(Type::boolean(), "flag");
        let count = Expression::parameter(Type::int(), "count");
        let block = Expression::block(
            vec!(count.clone()),
            vec!(
                Expression::if_then(Expression::from(&flag), Expression::assign(Expression::from(&count), Expression::int(1))),
                Expression::static_call(write_line(), vec!(Expression::from(&count)))));

        assert_eq!(indoc!("
            int count;

            if (flag)
            {
                count = 1;
            }

            Console.WriteLine(count);"), translate(&block));
    }

    #[test]
    fn test_explicit_type_names_in_joined_declarations() {
        let name = Expression::parameter(Type::string(), "name");
        let block = Expression::block(
            vec!(name.clone()),
            vec!(
                Expression::assign(Expression::from(&name), Expression::string("x")),
                Expression::static_call(write_line(), vec!(Expression::from(&name)))));

        let settings = TranslationSettings::builder().use_explicit_type_names().build();
        assert_eq!(indoc!("
            string name = \"x\";
            Console.WriteLine(name);"), translate_with(&block, &settings));
    }

    #[test]
    fn test_nested_blocks_are_flattened_and_empties_skipped() {
        let inner = Expression::block(vec!(), vec!(
            Expression::static_call(write_line(), vec!(Expression::int(1))),
            Expression::empty()));
        let outer = Expression::block(vec!(), vec!(
            inner,
            Expression::static_call(write_line(), vec!(Expression::int(2)))));

        assert_eq!(indoc!("
            Console.WriteLine(1);
            Console.WriteLine(2);"), translate(&outer));
    }
}
