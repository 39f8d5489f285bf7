//! The pre-analysis pass.
//!
//! One ordered walk over the whole tree, run before any translation is built.
//! Node-level facts are keyed by node address, which is stable while the tree
//! is borrowed; variable and label facts are keyed by their identity.

use getset::Getters;
use multimap::MultiMap;
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::{debug, trace};

use expression::*;

use crate::settings::TranslationSettings;

pub mod naming;

/// Identifies a node within one borrowed tree.
pub fn node_key(expression: &Expression) -> usize {
    expression as *const Expression as usize
}

/// The statements of `block`, with nested blocks flattened in and empty
/// expressions removed.
pub fn flatten_statements(block: &BlockExpression) -> Vec<&Expression> {
    let mut statements = vec!();
    for expression in block.expressions() {
        match expression {
            Expression::Block(nested) => statements.extend(flatten_statements(nested)),
            _ if expression.is_empty() => {}
            _ => statements.push(expression),
        }
    }
    statements
}

/// The variables of `block` and of every block flattened into it, in declaration order.
pub fn flatten_variables(block: &BlockExpression) -> Vec<&ParameterExpression> {
    let mut variables: Vec<&ParameterExpression> = block.variables().iter().collect();
    for expression in block.expressions() {
        if let Expression::Block(nested) = expression {
            variables.extend(flatten_variables(nested));
        }
    }
    variables
}

/// The expression a call is made on: the subject of an instance call, or
/// the first argument of an extension method call.
pub fn receiver_of(call: &MethodCallExpression) -> Option<&Expression> {
    if call.method().is_extension() {
        return call.arguments().first();
    }
    call.subject().as_deref()
}

#[derive(Getters, Debug, Default)]
pub struct ExpressionAnalysis {
    /// Namespaces of the types the translation names, `System` first.
    #[get = "pub"]
    namespaces: Vec<String>,

    goto_targets: HashSet<usize>,
    loop_labels: HashMap<usize, GotoKind>,
    chained_calls: HashSet<usize>,
    inline_output_arguments: HashSet<usize>,
    joined_assignments: HashSet<usize>,
    block_variables: MultiMap<usize, ParameterExpression>,

    /// Variables used but declared by nothing in the tree, in first-use order.
    #[get = "pub"]
    unscoped_variables: Vec<ParameterExpression>,

    variable_names: HashMap<usize, String>,
    label_names: HashMap<usize, String>,
}

impl ExpressionAnalysis {
    pub fn analyse(expression: &Expression, settings: &TranslationSettings) -> ExpressionAnalysis {
        let mut analyser = Analyser::new(settings);
        analyser.visit(expression);
        analyser.finish()
    }

    /// Analyses a lambda as a method: its parameters are in scope but it is not
    /// itself translated, and every type in its signature is named.
    pub fn analyse_lambda(lambda: &LambdaExpression, settings: &TranslationSettings) -> ExpressionAnalysis {
        let mut analyser = Analyser::new(settings);
        analyser.add_type(lambda.return_type());
        for parameter in lambda.parameters() {
            analyser.add_type(parameter.parameter_type());
        }
        analyser.visit_lambda(lambda);

        let unscoped_types: Vec<Type> = analyser.variables
            .iter()
            .filter(|variable| !analyser.declared.contains(&variable.id()))
            .map(|variable| variable.parameter_type().clone())
            .collect();
        for unscoped_type in &unscoped_types {
            analyser.add_type(unscoped_type);
        }
        analyser.finish()
    }

    pub fn is_goto_target(&self, label: &LabelTarget) -> bool {
        self.goto_targets.contains(&label.id())
    }

    /// `Break` or `Continue` if `label` ends or repeats an enclosing loop.
    pub fn loop_label_kind(&self, label: &LabelTarget) -> Option<GotoKind> {
        self.loop_labels.get(&label.id()).copied()
    }

    pub fn is_chained_call(&self, call: &Expression) -> bool {
        self.chained_calls.contains(&node_key(call))
    }

    pub fn is_inline_output_argument(&self, argument: &Expression) -> bool {
        self.inline_output_arguments.contains(&node_key(argument))
    }

    pub fn is_joined_assignment(&self, assignment: &Expression) -> bool {
        self.joined_assignments.contains(&node_key(assignment))
    }

    /// The variables to declare at the top of `block`.
    pub fn variables_declared_by(&self, block: &Expression) -> &[ParameterExpression] {
        self.block_variables
            .get_vec(&node_key(block))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn variable_name(&self, variable: &ParameterExpression) -> String {
        match self.variable_names.get(&variable.id()) {
            Some(name) => name.clone(),
            None => naming::variable_base_name(variable.parameter_type()),
        }
    }

    pub fn label_name(&self, label: &LabelTarget) -> String {
        match self.label_names.get(&label.id()) {
            Some(name) => name.clone(),
            None => String::from("label"),
        }
    }
}

struct Analyser<'s> {
    settings: &'s TranslationSettings,
    namespaces: BTreeSet<String>,
    goto_targets: HashSet<usize>,
    loop_labels: HashMap<usize, GotoKind>,
    chained_calls: HashSet<usize>,
    inline_output_arguments: HashSet<usize>,
    inline_output_variables: HashSet<usize>,
    joined_assignments: HashSet<usize>,
    joined_variables: HashSet<usize>,
    block_variables: MultiMap<usize, ParameterExpression>,
    block_declared: HashSet<usize>,
    declared: HashSet<usize>,
    seen: HashSet<usize>,
    variables: Vec<ParameterExpression>,
    labels: Vec<LabelTarget>,
}

impl<'s> Analyser<'s> {
    fn new(settings: &'s TranslationSettings) -> Analyser<'s> {
        debug!("Starting expression analysis");
        Analyser {
            settings,
            namespaces: BTreeSet::new(),
            goto_targets: HashSet::new(),
            loop_labels: HashMap::new(),
            chained_calls: HashSet::new(),
            inline_output_arguments: HashSet::new(),
            inline_output_variables: HashSet::new(),
            joined_assignments: HashSet::new(),
            joined_variables: HashSet::new(),
            block_variables: MultiMap::new(),
            block_declared: HashSet::new(),
            declared: HashSet::new(),
            seen: HashSet::new(),
            variables: vec!(),
            labels: vec!(),
        }
    }

    fn add_type(&mut self, type_name: &Type) {
        if let TypeKind::Array { element, .. } = type_name.kind() {
            self.add_type(element);
            return;
        }
        for argument in type_name.generic_arguments() {
            self.add_type(argument);
        }
        if type_name.keyword().is_some() || type_name.is_nullable() {
            return;
        }
        let outermost = std::iter::successors(Some(type_name), |t| t.declaring_type()).last();
        if let Some(namespace) = outermost.and_then(Type::namespace) {
            self.namespaces.insert(String::from(namespace));
        }
    }

    fn encounter(&mut self, variable: &ParameterExpression) {
        if !self.variables.contains(variable) {
            self.variables.push(variable.clone());
        }
    }

    fn declare(&mut self, variable: &ParameterExpression) {
        self.declared.insert(variable.id());
        self.encounter(variable);
    }

    fn reference(&mut self, variable: &ParameterExpression) {
        self.seen.insert(variable.id());
        self.encounter(variable);
    }

    fn encounter_label(&mut self, label: &LabelTarget) {
        if !self.labels.contains(label) {
            self.labels.push(label.clone());
        }
    }

    fn visit_all<'e, I>(&mut self, expressions: I)
        where I: IntoIterator<Item = &'e Expression>
    {
        for expression in expressions {
            self.visit(expression);
        }
    }

    fn visit(&mut self, expression: &Expression) {
        match expression {
            Expression::Binary(binary) => {
                self.visit(binary.left());
                self.visit(binary.right());
            }
            Expression::Unary(unary) => {
                if matches!(unary.node_type(), ExpressionType::Convert | ExpressionType::ConvertChecked | ExpressionType::TypeAs | ExpressionType::Unbox) {
                    self.add_type(unary.result_type());
                }
                self.visit(unary.operand());
            }
            Expression::Constant(constant) => match constant.value() {
                ConstantValue::Enum(_) => self.add_type(constant.result_type()),
                ConstantValue::Type(type_name) => self.add_type(type_name),
                _ => {}
            },
            Expression::Parameter(variable) => self.reference(variable),
            Expression::Member(member) => match member.subject() {
                Some(subject) => self.visit(subject),
                None => self.add_type(member.member().declaring_type()),
            },
            Expression::Call(call) => self.visit_call(expression, call),
            Expression::Invocation(invocation) => {
                self.visit(invocation.subject());
                self.visit_all(invocation.arguments());
            }
            Expression::Conditional(conditional) => {
                self.visit(conditional.test());
                self.visit(conditional.if_true());
                self.visit(conditional.if_false());
            }
            Expression::Block(block) => self.visit_block(expression, block),
            Expression::Lambda(lambda) => self.visit_lambda(lambda),
            Expression::New(new) => self.visit_new(new),
            Expression::NewArray(array) => {
                self.add_type(array.element_type());
                self.visit_all(array.expressions());
            }
            Expression::MemberInit(init) => {
                self.visit_new(init.new_expression());
                self.visit_bindings(init.bindings());
            }
            Expression::ListInit(init) => {
                self.visit_new(init.new_expression());
                for initializer in init.initializers() {
                    self.visit_all(initializer.arguments());
                }
            }
            Expression::Index(index) => {
                self.visit(index.subject());
                self.visit_all(index.arguments());
            }
            Expression::Loop(looped) => {
                if let Some(label) = looped.break_label() {
                    self.loop_labels.insert(label.id(), GotoKind::Break);
                }
                if let Some(label) = looped.continue_label() {
                    self.loop_labels.insert(label.id(), GotoKind::Continue);
                }
                self.visit(looped.body());
            }
            Expression::Goto(goto) => {
                self.encounter_label(goto.target());
                if goto.kind() == GotoKind::Goto && !self.loop_labels.contains_key(&goto.target().id()) {
                    self.goto_targets.insert(goto.target().id());
                }
                if let Some(value) = goto.value() {
                    self.visit(value);
                }
            }
            Expression::Label(label) => {
                self.encounter_label(label.target());
                if let Some(value) = label.default_value() {
                    self.visit(value);
                }
            }
            Expression::Switch(switch) => {
                self.visit(switch.value());
                for case in switch.cases() {
                    self.visit_all(case.test_values());
                    self.visit(case.body());
                }
                if let Some(default_body) = switch.default_body() {
                    self.visit(default_body);
                }
            }
            Expression::Try(tried) => {
                self.visit(tried.body());
                for handler in tried.handlers() {
                    self.add_type(handler.exception_type());
                    if let Some(variable) = handler.variable() {
                        self.declare(variable);
                    }
                    if let Some(filter) = handler.filter() {
                        self.visit(filter);
                    }
                    self.visit(handler.body());
                }
                if let Some(finally) = tried.finally() {
                    self.visit(finally);
                }
                if let Some(fault) = tried.fault() {
                    self.visit(fault);
                }
            }
            Expression::TypeBinary(type_binary) => {
                self.add_type(type_binary.type_operand());
                self.visit(type_binary.operand());
            }
            Expression::Throw(throw) => {
                if let Some(value) = throw.value() {
                    self.visit(value);
                }
            }
            Expression::Default(type_name) => self.add_type(type_name),
            Expression::Comment(_) | Expression::Extension(_) => {}
        }
    }

    fn visit_call(&mut self, expression: &Expression, call: &MethodCallExpression) {
        if call.subject().is_none() && !call.method().is_extension() {
            self.add_type(call.method().declaring_type());
        }
        if call.method().is_extension() {
            self.add_type(call.method().declaring_type());
        }
        for generic_argument in call.method().generic_arguments() {
            self.add_type(generic_argument);
        }

        if let Some(receiver) = receiver_of(call) {
            if let Expression::Call(_) = receiver {
                trace!(method = call.method().name().as_str(), "Chained method call");
                self.chained_calls.insert(node_key(expression));
                self.chained_calls.insert(node_key(receiver));
            }
        }

        if let Some(subject) = call.subject() {
            self.visit(subject);
        }

        let parameters = call.method().parameters();
        for (index, argument) in call.arguments().iter().enumerate() {
            let is_output = parameters.get(index).map_or(false, |p| p.is_out());
            if is_output && self.settings.declare_output_parameters_inline() {
                if let Expression::Parameter(variable) = argument {
                    let id = variable.id();
                    if self.block_declared.contains(&id) && !self.seen.contains(&id) {
                        self.inline_output_arguments.insert(node_key(argument));
                        self.inline_output_variables.insert(id);
                    }
                }
            }
            self.visit(argument);
        }
    }

    fn visit_new(&mut self, new: &NewExpression) {
        self.add_type(new.constructor().declaring_type());
        self.visit_all(new.arguments());
    }

    fn visit_bindings(&mut self, bindings: &[MemberBinding]) {
        for binding in bindings {
            match binding {
                MemberBinding::Assignment { value, .. } => self.visit(value),
                MemberBinding::Member { bindings, .. } => self.visit_bindings(bindings),
                MemberBinding::List { initializers, .. } => {
                    for initializer in initializers {
                        self.visit_all(initializer.arguments());
                    }
                }
            }
        }
    }

    fn visit_lambda(&mut self, lambda: &LambdaExpression) {
        for parameter in lambda.parameters() {
            self.declare(parameter);
            if self.settings.show_lambda_parameter_type_names() {
                self.add_type(parameter.parameter_type());
            }
        }
        self.visit(lambda.body());
    }

    fn visit_block(&mut self, expression: &Expression, block: &BlockExpression) {
        let variables = flatten_variables(block);
        let candidates: HashSet<usize> = variables.iter().map(|v| v.id()).collect();
        for variable in &variables {
            self.declare(variable);
            self.block_declared.insert(variable.id());
            if self.settings.use_explicit_type_names() {
                self.add_type(variable.parameter_type());
            }
        }

        for statement in flatten_statements(block) {
            if !self.visit_joinable_assignment(statement, &candidates) {
                self.visit(statement);
            }
        }

        for variable in variables {
            let id = variable.id();
            if !self.joined_variables.contains(&id) && !self.inline_output_variables.contains(&id) {
                self.block_variables.insert(node_key(expression), variable.clone());
            }
        }
    }

    /// Visits `statement` if it assigns a variable declared by the current
    /// block that nothing has used yet, and records it as a joined declaration.
    fn visit_joinable_assignment(&mut self, statement: &Expression, candidates: &HashSet<usize>) -> bool {
        let binary = match statement {
            Expression::Binary(binary) if binary.node_type() == ExpressionType::Assign => binary,
            _ => return false,
        };
        let variable = match binary.left().as_ref() {
            Expression::Parameter(variable) => variable,
            _ => return false,
        };
        let id = variable.id();
        if !candidates.contains(&id) || self.seen.contains(&id) || self.joined_variables.contains(&id) {
            return false;
        }

        self.visit(binary.right());
        if !self.seen.contains(&id) {
            self.joined_assignments.insert(node_key(statement));
            self.joined_variables.insert(id);
        }
        self.reference(variable);
        true
    }

    fn finish(self) -> ExpressionAnalysis {
        let variable_names: HashMap<usize, String> = self.variables
            .iter()
            .map(ParameterExpression::id)
            .zip(display_names(&self.variables, ParameterExpression::name, |v| naming::variable_base_name(v.parameter_type())))
            .collect();

        let label_names: HashMap<usize, String> = self.labels
            .iter()
            .map(LabelTarget::id)
            .zip(display_names(&self.labels, LabelTarget::name, |_| String::from("label")))
            .collect();

        let unscoped_variables: Vec<ParameterExpression> = self.variables
            .iter()
            .filter(|variable| !self.declared.contains(&variable.id()))
            .cloned()
            .collect();

        let namespaces = sort_namespaces(self.namespaces);

        debug!(
            variables = variable_names.len(),
            unscoped = unscoped_variables.len(),
            chained_calls = self.chained_calls.len(),
            namespaces = namespaces.len(),
            "Finished expression analysis");

        ExpressionAnalysis {
            namespaces,
            goto_targets: self.goto_targets,
            loop_labels: self.loop_labels,
            chained_calls: self.chained_calls,
            inline_output_arguments: self.inline_output_arguments,
            joined_assignments: self.joined_assignments,
            block_variables: self.block_variables,
            unscoped_variables,
            variable_names,
            label_names,
        }
    }
}

/// `System` and its children first, then the rest, each alphabetically.
pub fn sort_namespaces<I>(namespaces: I) -> Vec<String>
    where I: IntoIterator<Item = String>
{
    let mut namespaces: Vec<String> = namespaces.into_iter().collect();
    namespaces.sort_by_key(|namespace| (namespace != "System" && !namespace.starts_with("System."), namespace.clone()));
    namespaces.dedup();
    namespaces
}

/// Source names where usable, otherwise numbered base names.
fn display_names<T>(items: &[T], source_name: fn(&T) -> Option<&str>, base_name: impl Fn(&T) -> String) -> Vec<String> {
    let base_names: Vec<Option<String>> = items
        .iter()
        .map(|item| match source_name(item) {
            Some(name) if !naming::is_generated_name(name) => None,
            _ => Some(base_name(item)),
        })
        .collect();
    let unnamed: Vec<String> = base_names.iter().flatten().cloned().collect();
    let mut numbered = naming::number_names(&unnamed).into_iter();

    items.iter()
        .zip(base_names.iter())
        .map(|(item, base)| match (base, source_name(item)) {
            (None, Some(name)) => String::from(name),
            _ => numbered.next().unwrap_or_default(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linq_method(name: &str, return_type: Type) -> MethodInfo {
        let ints = Type::enumerable_of(Type::int());
        MethodInfo::extension(Type::class("System.Linq", "Enumerable"), name, vec!(ParameterInfo::of("source", ints)), return_type)
    }

    #[test]
    fn test_unnamed_variables_are_numbered_by_type() {
        let first = Expression::unnamed_variable(Type::int());
        let second = Expression::unnamed_variable(Type::int());
        let customer = Expression::unnamed_variable(Type::class("MyApp", "Customer"));
        let block = Expression::block(
            vec!(first.clone(), second.clone(), customer.clone()),
            vec!(Expression::from(&first), Expression::from(&second), Expression::from(&customer)));

        let analysis = ExpressionAnalysis::analyse(&block, &TranslationSettings::default());
        assert_eq!("intValue1", analysis.variable_name(&first));
        assert_eq!("intValue2", analysis.variable_name(&second));
        assert_eq!("customer", analysis.variable_name(&customer));
    }

    #[test]
    fn test_generated_names_are_replaced() {
        let generated = ParameterExpression::new(Type::string(), Some("CS$<>8__locals0"));
        let named = Expression::parameter(Type::string(), "name");
        let block = Expression::block(vec!(), vec!(Expression::from(&generated), Expression::from(&named)));

        let analysis = ExpressionAnalysis::analyse(&block, &TranslationSettings::default());
        assert_eq!("stringValue", analysis.variable_name(&generated));
        assert_eq!("name", analysis.variable_name(&named));
    }

    #[test]
    fn test_chained_calls_are_detected() {
        let ints = Expression::parameter(Type::enumerable_of(Type::int()), "ints");
        let inner = Expression::static_call(linq_method("Distinct", Type::enumerable_of(Type::int())), vec!(Expression::from(&ints)));
        let outer = Expression::static_call(linq_method("Any", Type::boolean()), vec!(inner));

        let analysis = ExpressionAnalysis::analyse(&outer, &TranslationSettings::default());
        assert!(analysis.is_chained_call(&outer));
        if let Expression::Call(call) = &outer {
            assert!(analysis.is_chained_call(&call.arguments()[0]));
        }

        let single = Expression::static_call(linq_method("Any", Type::boolean()), vec!(Expression::from(&ints)));
        let analysis = ExpressionAnalysis::analyse(&single, &TranslationSettings::default());
        assert!(!analysis.is_chained_call(&single));
    }

    #[test]
    fn test_first_assignment_is_joined() {
        let x = Expression::parameter(Type::int(), "x");
        let block = Expression::block(
            vec!(x.clone()),
            vec!(
                Expression::assign(Expression::from(&x), Expression::int(1)),
                Expression::assign(Expression::from(&x), Expression::int(2))));

        let analysis = ExpressionAnalysis::analyse(&block, &TranslationSettings::default());
        if let Expression::Block(inner) = &block {
            assert!(analysis.is_joined_assignment(&inner.expressions()[0]));
            assert!(!analysis.is_joined_assignment(&inner.expressions()[1]));
        }
        assert!(analysis.variables_declared_by(&block).is_empty());
    }

    #[test]
    fn test_self_referencing_assignment_is_not_joined() {
        let x = Expression::parameter(Type::int(), "x");
        let block = Expression::block(
            vec!(x.clone()),
            vec!(Expression::assign(Expression::from(&x), Expression::add(Expression::from(&x), Expression::int(1)))));

        let analysis = ExpressionAnalysis::analyse(&block, &TranslationSettings::default());
        assert_eq!(&[x], analysis.variables_declared_by(&block));
    }

    #[test]
    fn test_only_explicit_gotos_mark_labels() {
        let used = Expression::label_target(Type::void(), Some("end"));
        let unused = Expression::label_target(Type::void(), None);
        let block = Expression::block(
            vec!(),
            vec!(
                Expression::goto(used.clone()),
                Expression::label(used.clone(), None),
                Expression::label(unused.clone(), None)));

        let analysis = ExpressionAnalysis::analyse(&block, &TranslationSettings::default());
        assert!(analysis.is_goto_target(&used));
        assert!(!analysis.is_goto_target(&unused));
        assert_eq!("end", analysis.label_name(&used));
        assert_eq!("label", analysis.label_name(&unused));
    }

    #[test]
    fn test_namespaces_put_system_first() {
        let customer = Type::class("MyApp.Models", "Customer");
        let new_customer = Expression::new_object(ConstructorInfo::default_for(customer), vec!());
        let now = Expression::static_member(MemberInfo::static_property(Type::date_time(), "Now", Type::date_time()));
        let list = Expression::new_object(ConstructorInfo::default_for(Type::list_of(Type::string())), vec!());
        let block = Expression::block(vec!(), vec!(new_customer, now, list));

        let analysis = ExpressionAnalysis::analyse(&block, &TranslationSettings::default());
        assert_eq!(&vec!("System", "System.Collections.Generic", "MyApp.Models"), analysis.namespaces());
    }

    #[test]
    fn test_unscoped_variables_are_collected() {
        let captured = Expression::parameter(Type::int(), "limit");
        let x = Expression::parameter(Type::int(), "x");
        let lambda = Expression::lambda(vec!(x.clone()), Expression::greater_than(Expression::from(&x), Expression::from(&captured)));

        let analysis = ExpressionAnalysis::analyse(&lambda, &TranslationSettings::default());
        assert_eq!(&vec!(captured), analysis.unscoped_variables());
    }
}
