//! A uniform view of method-like things: runtime methods, constructors,
//! lambdas written out as methods, and methods with extra parameters.

use expression::*;

pub trait MethodDescriptor {
    fn name(&self) -> String;

    fn declaring_type(&self) -> Option<Type>;

    fn accessibility(&self) -> Accessibility;

    fn is_static(&self) -> bool;

    fn is_extension_method(&self) -> bool;

    fn generic_arguments(&self) -> Vec<Type>;

    fn is_generic(&self) -> bool {
        !self.generic_arguments().is_empty()
    }

    fn parameters(&self) -> Vec<ParameterInfo>;

    fn return_type(&self) -> Type;
}

/// A runtime method.
pub struct RuntimeMethod<'a>(pub &'a MethodInfo);

impl<'a> MethodDescriptor for RuntimeMethod<'a> {
    fn name(&self) -> String {
        self.0.name().clone()
    }

    fn declaring_type(&self) -> Option<Type> {
        Some(self.0.declaring_type().clone())
    }

    fn accessibility(&self) -> Accessibility {
        self.0.accessibility()
    }

    fn is_static(&self) -> bool {
        self.0.is_static()
    }

    fn is_extension_method(&self) -> bool {
        self.0.is_extension()
    }

    fn generic_arguments(&self) -> Vec<Type> {
        self.0.generic_arguments().clone()
    }

    fn parameters(&self) -> Vec<ParameterInfo> {
        self.0.parameters().clone()
    }

    fn return_type(&self) -> Type {
        self.0.return_type().clone()
    }
}

/// A constructor, named after and returning its declaring type.
pub struct RuntimeConstructor<'a>(pub &'a ConstructorInfo);

impl<'a> MethodDescriptor for RuntimeConstructor<'a> {
    fn name(&self) -> String {
        String::from(self.0.declaring_type().name())
    }

    fn declaring_type(&self) -> Option<Type> {
        Some(self.0.declaring_type().clone())
    }

    fn accessibility(&self) -> Accessibility {
        self.0.accessibility()
    }

    fn is_static(&self) -> bool {
        false
    }

    fn is_extension_method(&self) -> bool {
        false
    }

    fn generic_arguments(&self) -> Vec<Type> {
        vec!()
    }

    fn parameters(&self) -> Vec<ParameterInfo> {
        self.0.parameters().clone()
    }

    fn return_type(&self) -> Type {
        self.0.declaring_type().clone()
    }
}

/// A lambda written out as a public instance method.
#[derive(Constructor)]
pub struct LambdaMethod<'a> {
    name: String,
    lambda: &'a LambdaExpression,
    parameter_names: Vec<String>,
}

impl<'a> MethodDescriptor for LambdaMethod<'a> {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn declaring_type(&self) -> Option<Type> {
        None
    }

    fn accessibility(&self) -> Accessibility {
        Accessibility::Public
    }

    fn is_static(&self) -> bool {
        false
    }

    fn is_extension_method(&self) -> bool {
        false
    }

    fn generic_arguments(&self) -> Vec<Type> {
        vec!()
    }

    fn parameters(&self) -> Vec<ParameterInfo> {
        self.lambda.parameters()
            .iter()
            .zip(self.parameter_names.iter())
            .map(|(parameter, name)| ParameterInfo::of(name, parameter.parameter_type().clone()))
            .collect()
    }

    fn return_type(&self) -> Type {
        self.lambda.return_type().clone()
    }
}

/// Another method with synthetic parameters appended to its own.
pub struct AugmentedMethod<M: MethodDescriptor> {
    inner: M,
    extra_parameters: Vec<ParameterInfo>,
}

impl<M: MethodDescriptor> AugmentedMethod<M> {
    pub fn new(inner: M, extra_parameters: Vec<ParameterInfo>) -> AugmentedMethod<M> {
        AugmentedMethod { inner, extra_parameters }
    }
}

impl<M: MethodDescriptor> MethodDescriptor for AugmentedMethod<M> {
    fn name(&self) -> String {
        self.inner.name()
    }

    fn declaring_type(&self) -> Option<Type> {
        self.inner.declaring_type()
    }

    fn accessibility(&self) -> Accessibility {
        self.inner.accessibility()
    }

    fn is_static(&self) -> bool {
        self.inner.is_static()
    }

    fn is_extension_method(&self) -> bool {
        self.inner.is_extension_method()
    }

    fn generic_arguments(&self) -> Vec<Type> {
        self.inner.generic_arguments()
    }

    fn parameters(&self) -> Vec<ParameterInfo> {
        let mut parameters = self.inner.parameters();
        parameters.extend(self.extra_parameters.iter().cloned());
        parameters
    }

    fn return_type(&self) -> Type {
        self.inner.return_type()
    }
}

/// The C# keyword for `accessibility`.
pub fn accessibility_keyword(accessibility: Accessibility) -> &'static str {
    match accessibility {
        Accessibility::Public => "public",
        Accessibility::Internal => "internal",
        Accessibility::Protected => "protected",
        Accessibility::ProtectedInternal => "protected internal",
        Accessibility::Private => "private",
    }
}

/// A parameter for each variable, named the way the variable is displayed.
pub fn parameters_for(variables: &[ParameterExpression], name_of: impl Fn(&ParameterExpression) -> String) -> Vec<ParameterInfo> {
    variables
        .iter()
        .map(|variable| ParameterInfo::of(&name_of(variable), variable.parameter_type().clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_constructors_are_named_after_their_type() {
        let customer = Type::class("MyApp", "Customer");
        let constructor = ConstructorInfo::of(customer.clone(), vec!(ParameterInfo::of("name", Type::string())));
        let method = RuntimeConstructor(&constructor);

        assert_eq!("Customer", method.name());
        assert_eq!(customer, method.return_type());
        assert_eq!(1, method.parameters().len());
        assert!(!method.is_generic());
    }

    #[test]
    fn test_augmented_methods_append_parameters() {
        let parse = MethodInfo::static_method(Type::int(), "Parse", vec!(ParameterInfo::of("s", Type::string())), Type::int())
            .with_generic_arguments(vec!(Type::string()));
        let augmented = AugmentedMethod::new(RuntimeMethod(&parse), vec!(ParameterInfo::of("provider", Type::object())));

        let names: Vec<String> = augmented.parameters().iter().map(|p| p.name().clone()).collect();
        assert_eq!(vec!("s", "provider"), names);
        assert_eq!("Parse", augmented.name());
        assert!(augmented.is_static());
        assert!(augmented.is_generic());
        assert_eq!(Type::int(), augmented.return_type());
    }

    #[test]
    fn test_lambda_methods_use_display_names() {
        let x = Expression::unnamed_variable(Type::int());
        let lambda = match Expression::lambda(vec!(x.clone()), Expression::from(&x)) {
            Expression::Lambda(lambda) => lambda,
            _ => unreachable!(),
        };
        let method = LambdaMethod::new(String::from("GetInt"), &lambda, vec!(String::from("intValue")));

        assert_eq!("intValue", method.parameters()[0].name());
        assert_eq!(Type::int(), method.return_type());
        assert_eq!(Accessibility::Public, method.accessibility());
    }

    #[test]
    fn test_accessibility_keywords() {
        assert_eq!("protected internal", accessibility_keyword(Accessibility::ProtectedInternal));
        assert_eq!("private", accessibility_keyword(Accessibility::Private));
    }
}
