//! Namespaces, classes and methods written out as source code.

use tracing::debug;

use expression::{ExpressionType, ParameterModifier, Type};

use crate::analysis::sort_namespaces;
use crate::context::TranslationContext;
use crate::error::TranslationError;
use crate::formatting::TokenKind;
use crate::reflection::{accessibility_keyword, parameters_for, AugmentedMethod, LambdaMethod, MethodDescriptor};
use crate::settings::TranslationSettings;
use crate::source::{ClassExpression, MethodExpression, SourceCodeExpression};
use crate::translations::calls::write_generic_arguments;
use crate::translations::comments::SummaryTranslation;
use crate::translations::{CodeBlockTranslation, Translation, TypeNameTranslation};
use crate::writer::{TranslationSizes, TranslationWriter};

struct ParameterTranslation {
    modifier: Option<&'static str>,
    type_name: TypeNameTranslation,
    name: String,
}

/// `public ReturnType Name<T>(T1 p1, ...)`.
pub struct MethodDefinitionTranslation {
    accessibility: &'static str,
    is_static: bool,
    is_extension: bool,
    return_type: TypeNameTranslation,
    name: String,
    generic_arguments: Vec<TypeNameTranslation>,
    parameters: Vec<ParameterTranslation>,
    sizes: TranslationSizes,
}

impl MethodDefinitionTranslation {
    pub fn new(method: &dyn MethodDescriptor, context: &TranslationContext) -> MethodDefinitionTranslation {
        let parameters = method.parameters()
            .iter()
            .map(|parameter| ParameterTranslation {
                modifier: match parameter.modifier() {
                    ParameterModifier::None => None,
                    ParameterModifier::Out => Some("out"),
                    ParameterModifier::Ref => Some("ref"),
                    ParameterModifier::Params => Some("params"),
                },
                type_name: context.type_name(parameter.parameter_type()),
                name: parameter.name().clone(),
            })
            .collect();

        let mut translation = MethodDefinitionTranslation {
            accessibility: accessibility_keyword(method.accessibility()),
            is_static: method.is_static(),
            is_extension: method.is_extension_method(),
            return_type: context.type_name(&method.return_type()),
            name: method.name(),
            generic_arguments: method.generic_arguments().iter().map(|t| context.type_name(t)).collect(),
            parameters,
            sizes: TranslationSizes::default(),
        };
        translation.sizes = context.measure(&translation);
        translation
    }
}

impl Translation for MethodDefinitionTranslation {
    fn node_type(&self) -> ExpressionType {
        ExpressionType::Lambda
    }

    fn result_type(&self) -> Type {
        self.return_type.result_type()
    }

    fn sizes(&self) -> TranslationSizes {
        self.sizes
    }

    fn write_to(&self, writer: &mut TranslationWriter) {
        writer.write_keyword(self.accessibility);
        writer.write_space();
        if self.is_static {
            writer.write_keyword("static");
            writer.write_space();
        }
        writer.write_translation(&self.return_type);
        writer.write_space();
        writer.write_method_name(&self.name);
        write_generic_arguments(writer, &self.generic_arguments);

        writer.write_default("(");
        for (index, parameter) in self.parameters.iter().enumerate() {
            if index > 0 {
                writer.write_default(", ");
            } else if self.is_extension {
                writer.write_keyword("this");
                writer.write_space();
            }
            if let Some(modifier) = parameter.modifier {
                writer.write_keyword(modifier);
                writer.write_space();
            }
            writer.write_translation(&parameter.type_name);
            writer.write_space();
            writer.write_variable(&parameter.name);
        }
        writer.write_default(")");
    }
}

/// A method: its summary, its definition and its braced body.
pub struct MethodTranslation {
    summary: Option<SummaryTranslation>,
    definition: MethodDefinitionTranslation,
    body: CodeBlockTranslation,
    namespaces: Vec<String>,
    sizes: TranslationSizes,
}

impl MethodTranslation {
    pub fn new(method: &MethodExpression, settings: &TranslationSettings) -> Result<MethodTranslation, TranslationError> {
        let lambda = method.lambda();
        let context = TranslationContext::for_lambda(lambda, settings);

        let parameter_names = lambda.parameters().iter().map(|p| context.variable_name(p)).collect();
        let unscoped_parameters = parameters_for(context.analysis().unscoped_variables(), |v| context.variable_name(v));
        debug!(
            method = method.name().as_str(),
            parameters = lambda.parameters().len(),
            unscoped = unscoped_parameters.len(),
            "Translating method");

        let definition = AugmentedMethod::new(
            LambdaMethod::new(method.name().clone(), lambda, parameter_names),
            unscoped_parameters);

        let mut translation = MethodTranslation {
            summary: method.summary().as_ref().map(|text| SummaryTranslation::new(text, &context)),
            definition: MethodDefinitionTranslation::new(&definition, &context),
            body: context.get_code_block_for(lambda.body(), !lambda.return_type().is_void())?,
            namespaces: context.analysis().namespaces().clone(),
            sizes: TranslationSizes::default(),
        };
        translation.sizes = context.measure(&translation);
        Ok(translation)
    }
}

impl Translation for MethodTranslation {
    fn node_type(&self) -> ExpressionType {
        ExpressionType::Lambda
    }

    fn result_type(&self) -> Type {
        self.definition.result_type()
    }

    fn sizes(&self) -> TranslationSizes {
        self.sizes
    }

    fn write_to(&self, writer: &mut TranslationWriter) {
        if let Some(summary) = &self.summary {
            writer.write_translation(summary);
            writer.write_new_line();
        }
        writer.write_translation(&self.definition);
        writer.write_translation(&self.body);
    }

    fn is_terminated(&self) -> bool {
        true
    }

    fn is_multi_statement(&self) -> bool {
        true
    }
}

/// `public class Name` and its methods, separated by blank lines.
pub struct ClassTranslation {
    summary: Option<SummaryTranslation>,
    name: String,
    methods: Vec<MethodTranslation>,
    sizes: TranslationSizes,
}

impl ClassTranslation {
    pub fn new(class: &ClassExpression, settings: &TranslationSettings) -> Result<ClassTranslation, TranslationError> {
        debug!(class = class.name().as_str(), methods = class.methods().len(), "Translating class");

        let context = TranslationContext::empty(settings);
        let methods = class.methods()
            .iter()
            .map(|method| MethodTranslation::new(method, settings))
            .collect::<Result<Vec<_>, _>>()?;

        let mut translation = ClassTranslation {
            summary: class.summary().as_ref().map(|text| SummaryTranslation::new(text, &context)),
            name: class.name().clone(),
            methods,
            sizes: TranslationSizes::default(),
        };
        translation.sizes = context.measure(&translation);
        Ok(translation)
    }

    fn namespaces(&self) -> impl Iterator<Item = &String> {
        self.methods.iter().flat_map(|method| method.namespaces.iter())
    }
}

impl Translation for ClassTranslation {
    fn node_type(&self) -> ExpressionType {
        ExpressionType::Block
    }

    fn result_type(&self) -> Type {
        Type::void()
    }

    fn sizes(&self) -> TranslationSizes {
        self.sizes
    }

    fn write_to(&self, writer: &mut TranslationWriter) {
        if let Some(summary) = &self.summary {
            writer.write_translation(summary);
            writer.write_new_line();
        }
        writer.write_keyword("public");
        writer.write_space();
        writer.write_keyword("class");
        writer.write_space();
        writer.write_token(&self.name, TokenKind::TypeName);

        writer.write_opening_brace();
        for (index, method) in self.methods.iter().enumerate() {
            if index > 0 {
                writer.write_new_line();
            }
            writer.write_new_line();
            writer.write_translation(method);
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

/// A whole source file: `using` lines, then the namespace and its classes.
pub struct SourceCodeTranslation {
    usings: Vec<String>,
    namespace: String,
    classes: Vec<ClassTranslation>,
    sizes: TranslationSizes,
}

impl SourceCodeTranslation {
    pub fn new(source: &SourceCodeExpression, settings: &TranslationSettings) -> Result<SourceCodeTranslation, TranslationError> {
        let classes = source.classes()
            .iter()
            .map(|class| ClassTranslation::new(class, settings))
            .collect::<Result<Vec<_>, _>>()?;

        let usings = if settings.use_fully_qualified_type_names() {
            vec!()
        } else {
            sort_namespaces(classes
                .iter()
                .flat_map(|class| class.namespaces())
                .filter(|namespace| *namespace != source.namespace())
                .cloned())
        };
        debug!(namespace = source.namespace().as_str(), usings = usings.len(), "Translated source code");

        let mut translation = SourceCodeTranslation {
            usings,
            namespace: source.namespace().clone(),
            classes,
            sizes: TranslationSizes::default(),
        };
        translation.sizes = TranslationContext::empty(settings).measure(&translation);
        Ok(translation)
    }
}

impl Translation for SourceCodeTranslation {
    fn node_type(&self) -> ExpressionType {
        ExpressionType::Block
    }

    fn result_type(&self) -> Type {
        Type::void()
    }

    fn sizes(&self) -> TranslationSizes {
        self.sizes
    }

    fn write_to(&self, writer: &mut TranslationWriter) {
        for using in &self.usings {
            writer.write_keyword("using");
            writer.write_space();
            writer.write_default(using);
            writer.write_semicolon();
            writer.write_new_line();
        }
        if !self.usings.is_empty() {
            writer.write_new_line();
        }

        writer.write_keyword("namespace");
        writer.write_space();
        writer.write_default(&self.namespace);
        writer.write_opening_brace();
        for (index, class) in self.classes.iter().enumerate() {
            if index > 0 {
                writer.write_new_line();
            }
            writer.write_new_line();
            writer.write_translation(class);
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
    use crate::formatting::HtmlTranslationFormatter;
    use crate::source::{ClassBuilder, MethodBuilder};
    use crate::translate_source_code;
    use expression::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn lambda(parameters: Vec<ParameterExpression>, body: Expression) -> LambdaExpression {
        match Expression::lambda(parameters, body) {
            Expression::Lambda(lambda) => lambda,
            _ => unreachable!(),
        }
    }

    fn translate(source: &SourceCodeExpression, settings: &TranslationSettings) -> String {
        let translated = translate_source_code(source, settings).expect("translation failed");

        let html_settings = settings.with_formatter(HtmlTranslationFormatter);
        let html = translate_source_code(source, &html_settings).expect("HTML translation failed");
        assert_eq!(translated, html_settings.formatter().get_raw(&html));

        translated
    }

    #[test]
    fn test_empty_void_method() {
        let settings = TranslationSettings::default();
        let source = SourceCodeExpression::builder()
            .with_class(ClassBuilder::new()
                .named("MyClass")
                .with_method(MethodBuilder::new(lambda(vec!(), Expression::default(Type::void()))).named("DoNothing")))
            .build(&settings)
            .unwrap();

        assert_eq!(indoc!("
            namespace GeneratedExpressionCode
            {
                public class MyClass
                {
                    public void DoNothing()
                    {
                    }
                }
            }"), translate(&source, &settings));
    }

    #[test]
    fn test_unscoped_variables_become_parameters() {
        let settings = TranslationSettings::default();
        let text = Expression::parameter(Type::string(), "text");
        let limit = Expression::parameter(Type::int(), "limit");
        let length = MemberInfo::property(Type::string(), "Length", Type::int());
        let body = Expression::greater_than(Expression::property(Expression::from(&text), length), Expression::from(&limit));

        let source = SourceCodeExpression::builder()
            .with_class(ClassBuilder::new()
                .named("Checks")
                .with_method(MethodBuilder::new(lambda(vec!(text), body)).named("IsLong")))
            .build(&settings)
            .unwrap();

        assert_eq!(indoc!("
            namespace GeneratedExpressionCode
            {
                public class Checks
                {
                    public bool IsLong(string text, int limit)
                    {
                        return text.Length > limit;
                    }
                }
            }"), translate(&source, &settings));
    }

    #[test]
    fn test_usings_and_summaries() {
        let settings = TranslationSettings::default();
        let when = Expression::parameter(Type::date_time(), "when");
        let new_list = Expression::new_object(ConstructorInfo::default_for(Type::list_of(Type::string())), vec!());

        let source = SourceCodeExpression::builder()
            .with_namespace("MyApp")
            .with_class(ClassBuilder::new()
                .named("Lists")
                .with_summary("Lists things")
                .with_method(MethodBuilder::new(lambda(vec!(when), new_list))
                    .named("CreateList")
                    .with_summary("Creates a list")))
            .build(&settings)
            .unwrap();

        assert_eq!(indoc!("
            using System;
            using System.Collections.Generic;

            namespace MyApp
            {
                /// <summary>
                /// Lists things
                /// </summary>
                public class Lists
                {
                    /// <summary>
                    /// Creates a list
                    /// </summary>
                    public List<string> CreateList(DateTime when)
                    {
                        return new List<string>();
                    }
                }
            }"), translate(&source, &settings));
    }

    #[test]
    fn test_fully_qualified_names_need_no_usings() {
        let settings = TranslationSettings::builder().use_fully_qualified_type_names().build();
        let when = Expression::parameter(Type::date_time(), "when");
        let source = SourceCodeExpression::from_expression(&Expression::lambda(vec!(when.clone()), Expression::from(&when)), &settings).unwrap();

        let translated = translate(&source, &settings);
        assert!(translated.starts_with("namespace GeneratedExpressionCode"));
        assert!(translated.contains("public System.DateTime GetDateTime(System.DateTime when)"));
    }

    #[test]
    fn test_methods_and_classes_are_separated_by_blank_lines() {
        let block = Expression::block(vec!(), vec!(
            Expression::lambda(vec!(), Expression::int(1)),
            Expression::lambda(vec!(), Expression::string("two"))));

        let single_class = TranslationSettings::builder().create_single_class().build();
        let source = SourceCodeExpression::from_expression(&block, &single_class).unwrap();
        assert_eq!(indoc!("
            namespace GeneratedExpressionCode
            {
                public class GeneratedExpressionClass
                {
                    public int GetInt()
                    {
                        return 1;
                    }

                    public string GetString()
                    {
                        return \"two\";
                    }
                }
            }"), translate(&source, &single_class));

        let settings = TranslationSettings::default();
        let source = SourceCodeExpression::from_expression(&block, &settings).unwrap();
        assert_eq!(indoc!("
            namespace GeneratedExpressionCode
            {
                public class GeneratedExpressionClass1
                {
                    public int GetInt()
                    {
                        return 1;
                    }
                }

                public class GeneratedExpressionClass2
                {
                    public string GetString()
                    {
                        return \"two\";
                    }
                }
            }"), translate(&source, &settings));
    }

    #[test]
    fn test_runtime_method_definitions() {
        let settings = TranslationSettings::default();
        let context = TranslationContext::empty(&settings);
        let parse = MethodInfo::static_method(
            Type::int(),
            "TryParse",
            vec!(ParameterInfo::of("s", Type::string()), ParameterInfo::out("result", Type::int())),
            Type::boolean());

        let definition = MethodDefinitionTranslation::new(&crate::reflection::RuntimeMethod(&parse), &context);
        let written = TranslationWriter::write(settings.formatter().as_ref(), settings.indent(), &definition);
        assert_eq!("public static bool TryParse(string s, out int result)", written);
    }
}
