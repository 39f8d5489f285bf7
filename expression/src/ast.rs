use getset::{CopyGetters, Getters};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::reflection::{ConstructorInfo, MemberInfo, MethodInfo};
use crate::types::Type;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExpressionType {
    Add,
    AddAssign,
    AddAssignChecked,
    AddChecked,
    And,
    AndAlso,
    AndAssign,
    ArrayIndex,
    ArrayLength,
    Assign,
    Block,
    Call,
    Coalesce,
    Comment,
    Conditional,
    Constant,
    Convert,
    ConvertChecked,
    Decrement,
    Default,
    Divide,
    DivideAssign,
    Equal,
    ExclusiveOr,
    ExclusiveOrAssign,
    Extension,
    Goto,
    GreaterThan,
    GreaterThanOrEqual,
    Increment,
    Index,
    Invoke,
    Label,
    Lambda,
    LeftShift,
    LeftShiftAssign,
    LessThan,
    LessThanOrEqual,
    ListInit,
    Loop,
    MemberAccess,
    MemberInit,
    Modulo,
    ModuloAssign,
    Multiply,
    MultiplyAssign,
    MultiplyAssignChecked,
    MultiplyChecked,
    Negate,
    NegateChecked,
    New,
    NewArrayBounds,
    NewArrayInit,
    Not,
    NotEqual,
    OnesComplement,
    Or,
    OrAssign,
    OrElse,
    Parameter,
    PostDecrementAssign,
    PostIncrementAssign,
    Power,
    PowerAssign,
    PreDecrementAssign,
    PreIncrementAssign,
    Quote,
    RightShift,
    RightShiftAssign,
    Subtract,
    SubtractAssign,
    SubtractAssignChecked,
    SubtractChecked,
    Switch,
    Throw,
    Try,
    TypeAs,
    TypeEqual,
    TypeIs,
    UnaryPlus,
    Unbox,
}

impl ExpressionType {
    pub fn is_assignment(self) -> bool {
        use ExpressionType::*;
        matches!(
            self,
            Assign | AddAssign | AddAssignChecked | AndAssign | DivideAssign | ExclusiveOrAssign |
            LeftShiftAssign | ModuloAssign | MultiplyAssign | MultiplyAssignChecked | OrAssign |
            PowerAssign | RightShiftAssign | SubtractAssign | SubtractAssignChecked
        )
    }

    pub fn is_checked(self) -> bool {
        use ExpressionType::*;
        matches!(
            self,
            AddChecked | SubtractChecked | MultiplyChecked | NegateChecked | ConvertChecked |
            AddAssignChecked | SubtractAssignChecked | MultiplyAssignChecked
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ConstantValue {
    Null,
    Boolean(bool),
    Byte(u8),
    Short(i16),
    Int(i32),
    UInt(u32),
    Long(i64),
    ULong(u64),
    Float(f32),
    Double(f64),
    /// A decimal value in its invariant textual form.
    Decimal(String),
    Char(char),
    String(String),
    /// An enum member name; the enum is the constant's type.
    Enum(String),
    Type(Type),
}

#[derive(Debug)]
struct ParameterData {
    name: Option<String>,
    parameter_type: Type,
}

/// A parameter or variable. Clones refer to the same variable; equality is identity.
#[derive(Clone)]
pub struct ParameterExpression(Arc<ParameterData>);

impl ParameterExpression {
    pub fn new(parameter_type: Type, name: Option<&str>) -> ParameterExpression {
        ParameterExpression(Arc::new(ParameterData {
            name: name.map(String::from),
            parameter_type,
        }))
    }

    pub fn name(&self) -> Option<&str> {
        self.0.name.as_deref()
    }

    pub fn parameter_type(&self) -> &Type {
        &self.0.parameter_type
    }

    /// Stable identity for the lifetime of this variable.
    pub fn id(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }
}

impl PartialEq for ParameterExpression {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for ParameterExpression {}

impl Hash for ParameterExpression {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state)
    }
}

impl fmt::Debug for ParameterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {}", self.parameter_type(), self.name().unwrap_or("<unnamed>"))
    }
}

#[derive(Debug)]
struct LabelData {
    name: Option<String>,
    label_type: Type,
}

/// A jump target. Clones refer to the same label; equality is identity.
#[derive(Clone)]
pub struct LabelTarget(Arc<LabelData>);

impl LabelTarget {
    pub fn new(label_type: Type, name: Option<&str>) -> LabelTarget {
        LabelTarget(Arc::new(LabelData { name: name.map(String::from), label_type }))
    }

    pub fn name(&self) -> Option<&str> {
        self.0.name.as_deref()
    }

    pub fn label_type(&self) -> &Type {
        &self.0.label_type
    }

    pub fn id(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }
}

impl PartialEq for LabelTarget {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for LabelTarget {}

impl Hash for LabelTarget {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state)
    }
}

impl fmt::Debug for LabelTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "label {}", self.name().unwrap_or("<unnamed>"))
    }
}

#[derive(Clone, Constructor, Getters, CopyGetters, Debug, PartialEq)]
pub struct BinaryExpression {
    #[get_copy = "pub"]
    node_type: ExpressionType,

    #[get = "pub"]
    left: Box<Expression>,

    #[get = "pub"]
    right: Box<Expression>,

    #[get = "pub"]
    result_type: Type,
}

#[derive(Clone, Constructor, Getters, CopyGetters, Debug, PartialEq)]
pub struct UnaryExpression {
    #[get_copy = "pub"]
    node_type: ExpressionType,

    #[get = "pub"]
    operand: Box<Expression>,

    #[get = "pub"]
    result_type: Type,
}

#[derive(Clone, Constructor, Getters, Debug, PartialEq)]
#[get = "pub"]
pub struct ConstantExpression {
    value: ConstantValue,
    result_type: Type,
}

#[derive(Clone, Constructor, Getters, Debug, PartialEq)]
#[get = "pub"]
pub struct MemberExpression {
    subject: Option<Box<Expression>>,
    member: MemberInfo,
}

#[derive(Clone, Constructor, Getters, Debug, PartialEq)]
#[get = "pub"]
pub struct MethodCallExpression {
    subject: Option<Box<Expression>>,
    method: MethodInfo,
    arguments: Vec<Expression>,
}

#[derive(Clone, Constructor, Getters, Debug, PartialEq)]
#[get = "pub"]
pub struct InvocationExpression {
    subject: Box<Expression>,
    arguments: Vec<Expression>,
    result_type: Type,
}

#[derive(Clone, Constructor, Getters, Debug, PartialEq)]
#[get = "pub"]
pub struct ConditionalExpression {
    test: Box<Expression>,
    if_true: Box<Expression>,
    if_false: Box<Expression>,
    result_type: Type,
}

#[derive(Clone, Constructor, Getters, Debug, PartialEq)]
#[get = "pub"]
pub struct BlockExpression {
    variables: Vec<ParameterExpression>,
    expressions: Vec<Expression>,
    result_type: Type,
}

#[derive(Clone, Constructor, Getters, Debug, PartialEq)]
#[get = "pub"]
pub struct LambdaExpression {
    name: Option<String>,
    parameters: Vec<ParameterExpression>,
    body: Box<Expression>,
    return_type: Type,
}

impl LambdaExpression {
    /// The delegate type of this lambda: `Action<...>` for void lambdas, `Func<...>` otherwise.
    pub fn delegate_type(&self) -> Type {
        let parameter_types = self.parameters.iter().map(|p| p.parameter_type().clone()).collect();
        if self.return_type.is_void() {
            Type::action(parameter_types)
        } else {
            Type::func(parameter_types, self.return_type.clone())
        }
    }
}

#[derive(Clone, Constructor, Getters, Debug, PartialEq)]
#[get = "pub"]
pub struct NewExpression {
    constructor: ConstructorInfo,
    arguments: Vec<Expression>,
}

#[derive(Clone, Constructor, Getters, CopyGetters, Debug, PartialEq)]
pub struct NewArrayExpression {
    #[get_copy = "pub"]
    node_type: ExpressionType,

    #[get = "pub"]
    element_type: Type,

    #[get = "pub"]
    expressions: Vec<Expression>,
}

#[derive(Clone, Constructor, Getters, Debug, PartialEq)]
#[get = "pub"]
pub struct ElementInit {
    add_method: MethodInfo,
    arguments: Vec<Expression>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum MemberBinding {
    Assignment { member: MemberInfo, value: Expression },
    Member { member: MemberInfo, bindings: Vec<MemberBinding> },
    List { member: MemberInfo, initializers: Vec<ElementInit> },
}

impl MemberBinding {
    pub fn member(&self) -> &MemberInfo {
        match self {
            MemberBinding::Assignment { member, .. } => member,
            MemberBinding::Member { member, .. } => member,
            MemberBinding::List { member, .. } => member,
        }
    }
}

#[derive(Clone, Constructor, Getters, Debug, PartialEq)]
#[get = "pub"]
pub struct MemberInitExpression {
    new_expression: NewExpression,
    bindings: Vec<MemberBinding>,
}

#[derive(Clone, Constructor, Getters, Debug, PartialEq)]
#[get = "pub"]
pub struct ListInitExpression {
    new_expression: NewExpression,
    initializers: Vec<ElementInit>,
}

#[derive(Clone, Constructor, Getters, Debug, PartialEq)]
#[get = "pub"]
pub struct IndexExpression {
    subject: Box<Expression>,
    indexer: Option<MemberInfo>,
    arguments: Vec<Expression>,
    result_type: Type,
}

#[derive(Clone, Constructor, Getters, Debug, PartialEq)]
#[get = "pub"]
pub struct LoopExpression {
    body: Box<Expression>,
    break_label: Option<LabelTarget>,
    continue_label: Option<LabelTarget>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GotoKind {
    Goto,
    Return,
    Break,
    Continue,
}

#[derive(Clone, Constructor, Getters, CopyGetters, Debug, PartialEq)]
pub struct GotoExpression {
    #[get_copy = "pub"]
    kind: GotoKind,

    #[get = "pub"]
    target: LabelTarget,

    #[get = "pub"]
    value: Option<Box<Expression>>,
}

#[derive(Clone, Constructor, Getters, Debug, PartialEq)]
#[get = "pub"]
pub struct LabelExpression {
    target: LabelTarget,
    default_value: Option<Box<Expression>>,
}

#[derive(Clone, Constructor, Getters, Debug, PartialEq)]
#[get = "pub"]
pub struct SwitchCase {
    test_values: Vec<Expression>,
    body: Expression,
}

#[derive(Clone, Constructor, Getters, Debug, PartialEq)]
#[get = "pub"]
pub struct SwitchExpression {
    value: Box<Expression>,
    cases: Vec<SwitchCase>,
    default_body: Option<Box<Expression>>,
    result_type: Type,
}

#[derive(Clone, Constructor, Getters, Debug, PartialEq)]
#[get = "pub"]
pub struct CatchBlock {
    exception_type: Type,
    variable: Option<ParameterExpression>,
    filter: Option<Expression>,
    body: Expression,
}

#[derive(Clone, Constructor, Getters, Debug, PartialEq)]
#[get = "pub"]
pub struct TryExpression {
    body: Box<Expression>,
    handlers: Vec<CatchBlock>,
    finally: Option<Box<Expression>>,
    fault: Option<Box<Expression>>,
    result_type: Type,
}

#[derive(Clone, Constructor, Getters, CopyGetters, Debug, PartialEq)]
pub struct TypeBinaryExpression {
    #[get_copy = "pub"]
    node_type: ExpressionType,

    #[get = "pub"]
    operand: Box<Expression>,

    #[get = "pub"]
    type_operand: Type,
}

#[derive(Clone, Constructor, Getters, Debug, PartialEq)]
#[get = "pub"]
pub struct ThrowExpression {
    /// None for a rethrow.
    value: Option<Box<Expression>>,
    result_type: Type,
}

#[derive(Clone, Constructor, Getters, Debug, PartialEq)]
#[get = "pub"]
pub struct CommentExpression {
    text: String,
}

/// A host-specific node with no general textual form.
#[derive(Clone, Constructor, Getters, Debug, PartialEq)]
#[get = "pub"]
pub struct ExtensionExpression {
    name: String,
    result_type: Type,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    Binary(BinaryExpression),
    Unary(UnaryExpression),
    Constant(ConstantExpression),
    Parameter(ParameterExpression),
    Member(MemberExpression),
    Call(MethodCallExpression),
    Invocation(InvocationExpression),
    Conditional(ConditionalExpression),
    Block(BlockExpression),
    Lambda(LambdaExpression),
    New(NewExpression),
    NewArray(NewArrayExpression),
    MemberInit(MemberInitExpression),
    ListInit(ListInitExpression),
    Index(IndexExpression),
    Loop(LoopExpression),
    Goto(GotoExpression),
    Label(LabelExpression),
    Switch(SwitchExpression),
    Try(TryExpression),
    TypeBinary(TypeBinaryExpression),
    Throw(ThrowExpression),
    Default(Type),
    Comment(CommentExpression),
    Extension(ExtensionExpression),
}

impl Expression {
    pub fn node_type(&self) -> ExpressionType {
        match self {
            Expression::Binary(b) => b.node_type(),
            Expression::Unary(u) => u.node_type(),
            Expression::Constant(_) => ExpressionType::Constant,
            Expression::Parameter(_) => ExpressionType::Parameter,
            Expression::Member(_) => ExpressionType::MemberAccess,
            Expression::Call(_) => ExpressionType::Call,
            Expression::Invocation(_) => ExpressionType::Invoke,
            Expression::Conditional(_) => ExpressionType::Conditional,
            Expression::Block(_) => ExpressionType::Block,
            Expression::Lambda(_) => ExpressionType::Lambda,
            Expression::New(_) => ExpressionType::New,
            Expression::NewArray(a) => a.node_type(),
            Expression::MemberInit(_) => ExpressionType::MemberInit,
            Expression::ListInit(_) => ExpressionType::ListInit,
            Expression::Index(_) => ExpressionType::Index,
            Expression::Loop(_) => ExpressionType::Loop,
            Expression::Goto(_) => ExpressionType::Goto,
            Expression::Label(_) => ExpressionType::Label,
            Expression::Switch(_) => ExpressionType::Switch,
            Expression::Try(_) => ExpressionType::Try,
            Expression::TypeBinary(t) => t.node_type(),
            Expression::Throw(_) => ExpressionType::Throw,
            Expression::Default(_) => ExpressionType::Default,
            Expression::Comment(_) => ExpressionType::Comment,
            Expression::Extension(_) => ExpressionType::Extension,
        }
    }

    pub fn result_type(&self) -> Type {
        match self {
            Expression::Binary(b) => b.result_type().clone(),
            Expression::Unary(u) => u.result_type().clone(),
            Expression::Constant(c) => c.result_type().clone(),
            Expression::Parameter(p) => p.parameter_type().clone(),
            Expression::Member(m) => m.member().member_type().clone(),
            Expression::Call(c) => c.method().return_type().clone(),
            Expression::Invocation(i) => i.result_type().clone(),
            Expression::Conditional(c) => c.result_type().clone(),
            Expression::Block(b) => b.result_type().clone(),
            Expression::Lambda(l) => l.delegate_type(),
            Expression::New(n) => n.constructor().declaring_type().clone(),
            Expression::NewArray(a) => Type::array(a.element_type().clone()),
            Expression::MemberInit(m) => m.new_expression().constructor().declaring_type().clone(),
            Expression::ListInit(l) => l.new_expression().constructor().declaring_type().clone(),
            Expression::Index(i) => i.result_type().clone(),
            Expression::Loop(l) => l.break_label()
                .as_ref()
                .map(|label| label.label_type().clone())
                .unwrap_or_else(Type::void),
            Expression::Goto(_) => Type::void(),
            Expression::Label(l) => l.target().label_type().clone(),
            Expression::Switch(s) => s.result_type().clone(),
            Expression::Try(t) => t.result_type().clone(),
            Expression::TypeBinary(_) => Type::boolean(),
            Expression::Throw(t) => t.result_type().clone(),
            Expression::Default(t) => t.clone(),
            Expression::Comment(_) => Type::void(),
            Expression::Extension(e) => e.result_type().clone(),
        }
    }

    /// True for `default(void)`, the expression that does nothing.
    pub fn is_empty(&self) -> bool {
        matches!(self, Expression::Default(t) if t.is_void())
    }
}
