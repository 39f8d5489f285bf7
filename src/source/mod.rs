//! Generated source code: a namespace of classes of methods, each method the
//! body of a lambda.

use getset::Getters;
use tracing::debug;

use expression::*;

use crate::analysis::naming::method_base_name;
use crate::error::{NameKind, TranslationError};
use crate::settings::TranslationSettings;

pub mod compiler;
pub mod naming;
pub mod translations;

pub use compiler::SourceCompiler;
pub use naming::{ClassNamingContext, MethodNamingContext};
pub use translations::SourceCodeTranslation;

#[derive(Clone, Getters, Debug, PartialEq)]
#[get = "pub"]
pub struct SourceCodeExpression {
    namespace: String,
    classes: Vec<ClassExpression>,
}

#[derive(Clone, Getters, Debug, PartialEq)]
#[get = "pub"]
pub struct ClassExpression {
    name: String,
    summary: Option<String>,
    methods: Vec<MethodExpression>,
}

#[derive(Clone, Getters, Debug, PartialEq)]
#[get = "pub"]
pub struct MethodExpression {
    name: String,
    summary: Option<String>,
    lambda: LambdaExpression,
}

impl SourceCodeExpression {
    pub fn builder() -> SourceCodeBuilder {
        SourceCodeBuilder::default()
    }

    /// Builds source code from an arbitrary tree.
    ///
    /// A lambda becomes one method. A block containing lambdas becomes one
    /// method per lambda, each optionally preceded by a comment that becomes
    /// its summary. Anything else becomes the body of a parameterless method.
    pub fn from_expression(expression: &Expression, settings: &TranslationSettings) -> Result<SourceCodeExpression, TranslationError> {
        let methods = method_builders_for(expression)?;
        let classes = if settings.create_single_class() {
            vec!(ClassBuilder::new().with_methods(methods))
        } else {
            methods.into_iter().map(|method| ClassBuilder::new().with_method(method)).collect()
        };
        SourceCodeBuilder { namespace: None, classes }.build(settings)
    }

    pub fn method_count(&self) -> usize {
        self.classes.iter().map(|class| class.methods.len()).sum()
    }
}

fn method_builders_for(expression: &Expression) -> Result<Vec<MethodBuilder>, TranslationError> {
    match expression {
        Expression::Lambda(lambda) => Ok(vec!(MethodBuilder::new(lambda.clone()))),
        Expression::Block(block) if block.expressions().iter().any(|e| matches!(e, Expression::Lambda(_))) => {
            method_builders_for_block(block)
        }
        _ => Ok(vec!(MethodBuilder::for_body(expression))),
    }
}

/// Pairs each lambda with the comment immediately before it, if there is one.
fn method_builders_for_block(block: &BlockExpression) -> Result<Vec<MethodBuilder>, TranslationError> {
    let mut methods = vec!();
    let mut summary: Option<&str> = None;

    for statement in block.expressions() {
        match statement {
            Expression::Comment(comment) => {
                if let Some(previous) = summary {
                    return Err(TranslationError::InvalidMethodSequence(format!(
                        "comment '{}' must be followed by a lambda, not another comment", previous)));
                }
                summary = Some(comment.text().as_str());
            }
            Expression::Lambda(lambda) => {
                let mut method = MethodBuilder::new(lambda.clone());
                if let Some(text) = summary.take() {
                    method = method.with_summary(text);
                }
                methods.push(method);
            }
            other => {
                return Err(TranslationError::InvalidMethodSequence(format!(
                    "expected a comment or a lambda, found a {:?} expression", other.node_type())));
            }
        }
    }

    if let Some(text) = summary {
        return Err(TranslationError::InvalidMethodSequence(format!("comment '{}' is not followed by a lambda", text)));
    }
    Ok(methods)
}

#[derive(Default)]
pub struct SourceCodeBuilder {
    namespace: Option<String>,
    classes: Vec<ClassBuilder>,
}

impl SourceCodeBuilder {
    /// Overrides the namespace from the settings.
    pub fn with_namespace(mut self, namespace: &str) -> Self {
        self.namespace = Some(String::from(namespace));
        self
    }

    pub fn with_class(mut self, class: ClassBuilder) -> Self {
        self.classes.push(class);
        self
    }

    /// Names every class and method, failing on the first invalid name.
    pub fn build(self, settings: &TranslationSettings) -> Result<SourceCodeExpression, TranslationError> {
        let explicit_names = self.classes.iter().map(|class| class.name.clone()).collect();
        let callback = settings.class_name_factory()
            .as_ref()
            .map(|factory| factory.as_ref() as &dyn Fn(&ClassNamingContext) -> Option<String>);
        let classes = &self.classes;
        let names = naming::resolve_names(
            NameKind::Class,
            explicit_names,
            callback,
            |index| ClassNamingContext::new(index, classes[index].first_return_type(), classes[index].methods.len()),
            |_| String::from(naming::DEFAULT_CLASS_NAME))?;

        let classes = self.classes
            .into_iter()
            .zip(names)
            .map(|(class, name)| class.build(name, settings))
            .collect::<Result<Vec<_>, _>>()?;

        let namespace = self.namespace.unwrap_or_else(|| settings.namespace().clone());
        debug!(namespace = namespace.as_str(), classes = classes.len(), "Built source code");
        Ok(SourceCodeExpression { namespace, classes })
    }
}

#[derive(Default)]
pub struct ClassBuilder {
    name: Option<String>,
    summary: Option<String>,
    methods: Vec<MethodBuilder>,
}

impl ClassBuilder {
    pub fn new() -> ClassBuilder {
        ClassBuilder::default()
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(String::from(name));
        self
    }

    pub fn with_summary(mut self, summary: &str) -> Self {
        self.summary = Some(String::from(summary));
        self
    }

    pub fn with_method(mut self, method: MethodBuilder) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_methods(mut self, methods: Vec<MethodBuilder>) -> Self {
        self.methods.extend(methods);
        self
    }

    fn first_return_type(&self) -> Type {
        match self.methods.first() {
            Some(method) => method.lambda.return_type().clone(),
            None => Type::void(),
        }
    }

    fn build(self, name: String, settings: &TranslationSettings) -> Result<ClassExpression, TranslationError> {
        let explicit_names = self.methods.iter().map(|method| method.name.clone()).collect();
        let callback = settings.method_name_factory()
            .as_ref()
            .map(|factory| factory.as_ref() as &dyn Fn(&MethodNamingContext) -> Option<String>);
        let methods = &self.methods;
        let method_names = naming::resolve_names(
            NameKind::Method,
            explicit_names,
            callback,
            |index| MethodNamingContext::new(index, methods[index].lambda.return_type().clone(), methods.len()),
            |index| method_base_name(methods[index].lambda.return_type()))?;

        let methods: Vec<MethodExpression> = self.methods
            .into_iter()
            .zip(method_names)
            .map(|(method, name)| MethodExpression { name, summary: method.summary, lambda: method.lambda })
            .collect();

        debug!(class = name.as_str(), methods = methods.len(), "Built class");
        Ok(ClassExpression { name, summary: self.summary, methods })
    }
}

pub struct MethodBuilder {
    name: Option<String>,
    summary: Option<String>,
    lambda: LambdaExpression,
}

impl MethodBuilder {
    /// A method with the lambda's parameters, return type and body. A named
    /// lambda names the method.
    pub fn new(lambda: LambdaExpression) -> MethodBuilder {
        MethodBuilder { name: lambda.name().clone(), summary: None, lambda }
    }

    /// A parameterless method returning `body`.
    pub fn for_body(body: &Expression) -> MethodBuilder {
        let lambda = LambdaExpression::new(None, vec!(), Box::new(body.clone()), body.result_type());
        MethodBuilder::new(lambda)
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(String::from(name));
        self
    }

    pub fn with_summary(mut self, summary: &str) -> Self {
        self.summary = Some(String::from(summary));
        self
    }
}
