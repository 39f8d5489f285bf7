//! Convenience constructors for building expression trees.

use crate::ast::*;
use crate::reflection::{ConstructorInfo, MemberInfo, MethodInfo};
use crate::types::Type;

fn boxed(expression: Expression) -> Box<Expression> {
    Box::new(expression)
}

impl Expression {
    pub fn make_binary(node_type: ExpressionType, left: Expression, right: Expression, result_type: Type) -> Expression {
        Expression::Binary(BinaryExpression::new(node_type, boxed(left), boxed(right), result_type))
    }

    /// A binary operation whose result type is the left operand's type.
    pub fn arithmetic(node_type: ExpressionType, left: Expression, right: Expression) -> Expression {
        let result_type = left.result_type();
        Expression::make_binary(node_type, left, right, result_type)
    }

    /// A binary operation with a boolean result.
    pub fn comparison(node_type: ExpressionType, left: Expression, right: Expression) -> Expression {
        Expression::make_binary(node_type, left, right, Type::boolean())
    }

    pub fn add(left: Expression, right: Expression) -> Expression {
        Expression::arithmetic(ExpressionType::Add, left, right)
    }

    pub fn subtract(left: Expression, right: Expression) -> Expression {
        Expression::arithmetic(ExpressionType::Subtract, left, right)
    }

    pub fn multiply(left: Expression, right: Expression) -> Expression {
        Expression::arithmetic(ExpressionType::Multiply, left, right)
    }

    pub fn divide(left: Expression, right: Expression) -> Expression {
        Expression::arithmetic(ExpressionType::Divide, left, right)
    }

    pub fn equal(left: Expression, right: Expression) -> Expression {
        Expression::comparison(ExpressionType::Equal, left, right)
    }

    pub fn not_equal(left: Expression, right: Expression) -> Expression {
        Expression::comparison(ExpressionType::NotEqual, left, right)
    }

    pub fn greater_than(left: Expression, right: Expression) -> Expression {
        Expression::comparison(ExpressionType::GreaterThan, left, right)
    }

    pub fn less_than(left: Expression, right: Expression) -> Expression {
        Expression::comparison(ExpressionType::LessThan, left, right)
    }

    pub fn and_also(left: Expression, right: Expression) -> Expression {
        Expression::comparison(ExpressionType::AndAlso, left, right)
    }

    pub fn or_else(left: Expression, right: Expression) -> Expression {
        Expression::comparison(ExpressionType::OrElse, left, right)
    }

    pub fn coalesce(left: Expression, right: Expression) -> Expression {
        let result_type = right.result_type();
        Expression::make_binary(ExpressionType::Coalesce, left, right, result_type)
    }

    pub fn assign(target: Expression, value: Expression) -> Expression {
        Expression::arithmetic(ExpressionType::Assign, target, value)
    }

    pub fn array_index(array: Expression, index: Expression) -> Expression {
        let element_type = array.result_type().element_type().cloned().unwrap_or_else(Type::object);
        Expression::make_binary(ExpressionType::ArrayIndex, array, index, element_type)
    }

    pub fn make_unary(node_type: ExpressionType, operand: Expression, result_type: Type) -> Expression {
        Expression::Unary(UnaryExpression::new(node_type, boxed(operand), result_type))
    }

    pub fn unary(node_type: ExpressionType, operand: Expression) -> Expression {
        let result_type = operand.result_type();
        Expression::make_unary(node_type, operand, result_type)
    }

    pub fn negate(operand: Expression) -> Expression {
        Expression::unary(ExpressionType::Negate, operand)
    }

    pub fn not(operand: Expression) -> Expression {
        Expression::unary(ExpressionType::Not, operand)
    }

    pub fn convert(operand: Expression, target: Type) -> Expression {
        Expression::make_unary(ExpressionType::Convert, operand, target)
    }

    pub fn type_as(operand: Expression, target: Type) -> Expression {
        Expression::make_unary(ExpressionType::TypeAs, operand, target)
    }

    pub fn array_length(array: Expression) -> Expression {
        Expression::make_unary(ExpressionType::ArrayLength, array, Type::int())
    }

    pub fn quote(lambda: Expression) -> Expression {
        Expression::unary(ExpressionType::Quote, lambda)
    }

    pub fn type_is(operand: Expression, type_operand: Type) -> Expression {
        Expression::TypeBinary(TypeBinaryExpression::new(ExpressionType::TypeIs, boxed(operand), type_operand))
    }

    pub fn throw(value: Expression) -> Expression {
        Expression::Throw(ThrowExpression::new(Some(boxed(value)), Type::void()))
    }

    pub fn rethrow() -> Expression {
        Expression::Throw(ThrowExpression::new(None, Type::void()))
    }

    pub fn constant(value: ConstantValue, constant_type: Type) -> Expression {
        Expression::Constant(ConstantExpression::new(value, constant_type))
    }

    pub fn null(constant_type: Type) -> Expression {
        Expression::constant(ConstantValue::Null, constant_type)
    }

    pub fn int(value: i32) -> Expression {
        Expression::constant(ConstantValue::Int(value), Type::int())
    }

    pub fn long(value: i64) -> Expression {
        Expression::constant(ConstantValue::Long(value), Type::long())
    }

    pub fn double(value: f64) -> Expression {
        Expression::constant(ConstantValue::Double(value), Type::double())
    }

    pub fn boolean(value: bool) -> Expression {
        Expression::constant(ConstantValue::Boolean(value), Type::boolean())
    }

    pub fn string(value: &str) -> Expression {
        Expression::constant(ConstantValue::String(String::from(value)), Type::string())
    }

    pub fn char(value: char) -> Expression {
        Expression::constant(ConstantValue::Char(value), Type::char())
    }

    pub fn enum_member(enum_type: Type, member: &str) -> Expression {
        Expression::constant(ConstantValue::Enum(String::from(member)), enum_type)
    }

    pub fn type_of(value: Type) -> Expression {
        Expression::constant(ConstantValue::Type(value), Type::class("System", "Type"))
    }

    pub fn default(default_type: Type) -> Expression {
        Expression::Default(default_type)
    }

    /// `default(void)`, the expression that does nothing.
    pub fn empty() -> Expression {
        Expression::Default(Type::void())
    }

    pub fn parameter(parameter_type: Type, name: &str) -> ParameterExpression {
        ParameterExpression::new(parameter_type, Some(name))
    }

    pub fn unnamed_variable(parameter_type: Type) -> ParameterExpression {
        ParameterExpression::new(parameter_type, None)
    }

    pub fn property(subject: Expression, member: MemberInfo) -> Expression {
        Expression::Member(MemberExpression::new(Some(boxed(subject)), member))
    }

    pub fn static_member(member: MemberInfo) -> Expression {
        Expression::Member(MemberExpression::new(None, member))
    }

    pub fn call(subject: Expression, method: MethodInfo, arguments: Vec<Expression>) -> Expression {
        Expression::Call(MethodCallExpression::new(Some(boxed(subject)), method, arguments))
    }

    pub fn static_call(method: MethodInfo, arguments: Vec<Expression>) -> Expression {
        Expression::Call(MethodCallExpression::new(None, method, arguments))
    }

    pub fn invoke(subject: Expression, arguments: Vec<Expression>, result_type: Type) -> Expression {
        Expression::Invocation(InvocationExpression::new(boxed(subject), arguments, result_type))
    }

    pub fn condition(test: Expression, if_true: Expression, if_false: Expression, result_type: Type) -> Expression {
        Expression::Conditional(ConditionalExpression::new(boxed(test), boxed(if_true), boxed(if_false), result_type))
    }

    /// A conditional whose type is the true branch's type.
    pub fn ternary(test: Expression, if_true: Expression, if_false: Expression) -> Expression {
        let result_type = if_true.result_type();
        Expression::condition(test, if_true, if_false, result_type)
    }

    pub fn if_then(test: Expression, if_true: Expression) -> Expression {
        Expression::condition(test, if_true, Expression::empty(), Type::void())
    }

    pub fn if_then_else(test: Expression, if_true: Expression, if_false: Expression) -> Expression {
        Expression::condition(test, if_true, if_false, Type::void())
    }

    /// A block whose type is the type of its last expression.
    pub fn block(variables: Vec<ParameterExpression>, expressions: Vec<Expression>) -> Expression {
        let result_type = expressions.last().map(Expression::result_type).unwrap_or_else(Type::void);
        Expression::Block(BlockExpression::new(variables, expressions, result_type))
    }

    pub fn void_block(variables: Vec<ParameterExpression>, expressions: Vec<Expression>) -> Expression {
        Expression::Block(BlockExpression::new(variables, expressions, Type::void()))
    }

    /// A lambda whose return type is its body's type.
    pub fn lambda(parameters: Vec<ParameterExpression>, body: Expression) -> Expression {
        let return_type = body.result_type();
        Expression::Lambda(LambdaExpression::new(None, parameters, boxed(body), return_type))
    }

    pub fn typed_lambda(parameters: Vec<ParameterExpression>, body: Expression, return_type: Type) -> Expression {
        Expression::Lambda(LambdaExpression::new(None, parameters, boxed(body), return_type))
    }

    pub fn new_object(constructor: ConstructorInfo, arguments: Vec<Expression>) -> Expression {
        Expression::New(NewExpression::new(constructor, arguments))
    }

    pub fn new_array_init(element_type: Type, expressions: Vec<Expression>) -> Expression {
        Expression::NewArray(NewArrayExpression::new(ExpressionType::NewArrayInit, element_type, expressions))
    }

    pub fn new_array_bounds(element_type: Type, bounds: Vec<Expression>) -> Expression {
        Expression::NewArray(NewArrayExpression::new(ExpressionType::NewArrayBounds, element_type, bounds))
    }

    pub fn member_init(new_expression: NewExpression, bindings: Vec<MemberBinding>) -> Expression {
        Expression::MemberInit(MemberInitExpression::new(new_expression, bindings))
    }

    pub fn list_init(new_expression: NewExpression, initializers: Vec<ElementInit>) -> Expression {
        Expression::ListInit(ListInitExpression::new(new_expression, initializers))
    }

    pub fn index(subject: Expression, indexer: Option<MemberInfo>, arguments: Vec<Expression>, result_type: Type) -> Expression {
        Expression::Index(IndexExpression::new(boxed(subject), indexer, arguments, result_type))
    }

    pub fn make_loop(body: Expression, break_label: Option<LabelTarget>, continue_label: Option<LabelTarget>) -> Expression {
        Expression::Loop(LoopExpression::new(boxed(body), break_label, continue_label))
    }

    pub fn label_target(label_type: Type, name: Option<&str>) -> LabelTarget {
        LabelTarget::new(label_type, name)
    }

    pub fn make_goto(kind: GotoKind, target: LabelTarget, value: Option<Expression>) -> Expression {
        Expression::Goto(GotoExpression::new(kind, target, value.map(boxed)))
    }

    pub fn goto(target: LabelTarget) -> Expression {
        Expression::make_goto(GotoKind::Goto, target, None)
    }

    pub fn return_value(target: LabelTarget, value: Expression) -> Expression {
        Expression::make_goto(GotoKind::Return, target, Some(value))
    }

    pub fn break_to(target: LabelTarget) -> Expression {
        Expression::make_goto(GotoKind::Break, target, None)
    }

    pub fn continue_to(target: LabelTarget) -> Expression {
        Expression::make_goto(GotoKind::Continue, target, None)
    }

    pub fn label(target: LabelTarget, default_value: Option<Expression>) -> Expression {
        Expression::Label(LabelExpression::new(target, default_value.map(boxed)))
    }

    pub fn switch(value: Expression, cases: Vec<SwitchCase>, default_body: Option<Expression>) -> Expression {
        Expression::Switch(SwitchExpression::new(boxed(value), cases, default_body.map(boxed), Type::void()))
    }

    pub fn try_catch(body: Expression, handlers: Vec<CatchBlock>) -> Expression {
        let result_type = body.result_type();
        Expression::Try(TryExpression::new(boxed(body), handlers, None, None, result_type))
    }

    pub fn try_catch_finally(body: Expression, handlers: Vec<CatchBlock>, finally: Expression) -> Expression {
        let result_type = body.result_type();
        Expression::Try(TryExpression::new(boxed(body), handlers, Some(boxed(finally)), None, result_type))
    }

    pub fn try_fault(body: Expression, fault: Expression) -> Expression {
        let result_type = body.result_type();
        Expression::Try(TryExpression::new(boxed(body), vec!(), None, Some(boxed(fault)), result_type))
    }

    pub fn comment(text: &str) -> Expression {
        Expression::Comment(CommentExpression::new(String::from(text)))
    }
}

impl From<ParameterExpression> for Expression {
    fn from(parameter: ParameterExpression) -> Expression {
        Expression::Parameter(parameter)
    }
}

impl From<&ParameterExpression> for Expression {
    fn from(parameter: &ParameterExpression) -> Expression {
        Expression::Parameter(parameter.clone())
    }
}
