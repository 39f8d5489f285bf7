use getset::{CopyGetters, Getters};
use std::fmt;
use std::sync::Arc;

use crate::formatting::{NullTranslationFormatter, TranslationFormatter};
use crate::source::{ClassNamingContext, MethodNamingContext};

pub const DEFAULT_INDENT: &str = "    ";
pub const DEFAULT_NAMESPACE: &str = "GeneratedExpressionCode";

pub type ClassNameFactory = Arc<dyn Fn(&ClassNamingContext) -> Option<String> + Send + Sync>;
pub type MethodNameFactory = Arc<dyn Fn(&MethodNamingContext) -> Option<String> + Send + Sync>;

/// Options for one translation. Immutable once built.
#[derive(Clone, CopyGetters, Getters)]
pub struct TranslationSettings {
    #[get_copy = "pub"]
    use_fully_qualified_type_names: bool,

    #[get_copy = "pub"]
    use_explicit_type_names: bool,

    #[get_copy = "pub"]
    use_explicit_generic_parameters: bool,

    #[get_copy = "pub"]
    declare_output_parameters_inline: bool,

    #[get_copy = "pub"]
    show_implicit_array_types: bool,

    #[get_copy = "pub"]
    show_lambda_parameter_type_names: bool,

    #[get_copy = "pub"]
    show_quoted_lambda_comments: bool,

    #[get = "pub"]
    indent: String,

    #[get = "pub"]
    formatter: Arc<dyn TranslationFormatter>,

    #[get = "pub"]
    namespace: String,

    #[get_copy = "pub"]
    create_single_class: bool,

    #[get = "pub"]
    class_name_factory: Option<ClassNameFactory>,

    #[get = "pub"]
    method_name_factory: Option<MethodNameFactory>,
}

impl TranslationSettings {
    pub fn builder() -> TranslationSettingsBuilder {
        TranslationSettingsBuilder { settings: TranslationSettings::default() }
    }

    /// Copies these settings with a different formatter.
    pub fn with_formatter<F>(&self, formatter: F) -> TranslationSettings
        where F: TranslationFormatter + 'static
    {
        let mut settings = self.clone();
        settings.formatter = Arc::new(formatter);
        settings
    }
}

impl Default for TranslationSettings {
    fn default() -> Self {
        TranslationSettings {
            use_fully_qualified_type_names: false,
            use_explicit_type_names: false,
            use_explicit_generic_parameters: false,
            declare_output_parameters_inline: false,
            show_implicit_array_types: false,
            show_lambda_parameter_type_names: false,
            show_quoted_lambda_comments: false,
            indent: String::from(DEFAULT_INDENT),
            formatter: Arc::new(NullTranslationFormatter),
            namespace: String::from(DEFAULT_NAMESPACE),
            create_single_class: false,
            class_name_factory: None,
            method_name_factory: None,
        }
    }
}

impl fmt::Debug for TranslationSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslationSettings")
            .field("use_fully_qualified_type_names", &self.use_fully_qualified_type_names)
            .field("use_explicit_type_names", &self.use_explicit_type_names)
            .field("use_explicit_generic_parameters", &self.use_explicit_generic_parameters)
            .field("declare_output_parameters_inline", &self.declare_output_parameters_inline)
            .field("show_implicit_array_types", &self.show_implicit_array_types)
            .field("show_lambda_parameter_type_names", &self.show_lambda_parameter_type_names)
            .field("show_quoted_lambda_comments", &self.show_quoted_lambda_comments)
            .field("indent", &self.indent)
            .field("namespace", &self.namespace)
            .field("create_single_class", &self.create_single_class)
            .field("class_name_factory", &self.class_name_factory.is_some())
            .field("method_name_factory", &self.method_name_factory.is_some())
            .finish()
    }
}

/// Fluent builder for `TranslationSettings`.
pub struct TranslationSettingsBuilder {
    settings: TranslationSettings,
}

impl TranslationSettingsBuilder {
    /// Writes namespace-qualified type names instead of emitting `using` lines.
    pub fn use_fully_qualified_type_names(mut self) -> Self {
        self.settings.use_fully_qualified_type_names = true;
        self
    }

    /// Declares variables with their type names instead of `var`.
    pub fn use_explicit_type_names(mut self) -> Self {
        self.settings.use_explicit_type_names = true;
        self
    }

    /// Writes generic method arguments even when they could be inferred.
    pub fn use_explicit_generic_parameters(mut self) -> Self {
        self.settings.use_explicit_generic_parameters = true;
        self
    }

    /// Declares output-parameter variables at their first use (`out var x`).
    pub fn declare_output_parameters_inline(mut self) -> Self {
        self.settings.declare_output_parameters_inline = true;
        self
    }

    /// Writes `new T[] { ... }` instead of `new[] { ... }`.
    pub fn show_implicit_array_types(mut self) -> Self {
        self.settings.show_implicit_array_types = true;
        self
    }

    pub fn show_lambda_parameter_type_names(mut self) -> Self {
        self.settings.show_lambda_parameter_type_names = true;
        self
    }

    pub fn show_quoted_lambda_comments(mut self) -> Self {
        self.settings.show_quoted_lambda_comments = true;
        self
    }

    pub fn indent_using(mut self, indent: &str) -> Self {
        self.settings.indent = String::from(indent);
        self
    }

    pub fn format_using<F>(mut self, formatter: F) -> Self
        where F: TranslationFormatter + 'static
    {
        self.settings.formatter = Arc::new(formatter);
        self
    }

    pub fn with_namespace(mut self, namespace: &str) -> Self {
        self.settings.namespace = String::from(namespace);
        self
    }

    /// Puts every generated method into one class.
    pub fn create_single_class(mut self) -> Self {
        self.settings.create_single_class = true;
        self
    }

    pub fn name_classes_using<F>(mut self, factory: F) -> Self
        where F: Fn(&ClassNamingContext) -> Option<String> + Send + Sync + 'static
    {
        self.settings.class_name_factory = Some(Arc::new(factory));
        self
    }

    pub fn name_methods_using<F>(mut self, factory: F) -> Self
        where F: Fn(&MethodNamingContext) -> Option<String> + Send + Sync + 'static
    {
        self.settings.method_name_factory = Some(Arc::new(factory));
        self
    }

    pub fn build(self) -> TranslationSettings {
        self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatting::HtmlTranslationFormatter;

    #[test]
    fn test_defaults() {
        let settings = TranslationSettings::default();
        assert_eq!("    ", settings.indent());
        assert_eq!("GeneratedExpressionCode", settings.namespace());
        assert!(!settings.use_explicit_type_names());
        assert!(!settings.declare_output_parameters_inline());
        assert!(settings.class_name_factory().is_none());
    }

    #[test]
    fn test_builder_sets_options() {
        let settings = TranslationSettings::builder()
            .use_fully_qualified_type_names()
            .use_explicit_type_names()
            .show_lambda_parameter_type_names()
            .indent_using("\t")
            .format_using(HtmlTranslationFormatter)
            .with_namespace("My.Generated")
            .name_classes_using(|_| Some(String::from("MyClass")))
            .build();

        assert!(settings.use_fully_qualified_type_names());
        assert!(settings.use_explicit_type_names());
        assert!(settings.show_lambda_parameter_type_names());
        assert_eq!("\t", settings.indent());
        assert_eq!("My.Generated", settings.namespace());
        assert!(settings.class_name_factory().is_some());
        assert!(settings.method_name_factory().is_none());
    }
}
