//! Object, array, member and collection initialisation.

use expression::*;

use crate::context::TranslationContext;
use crate::error::TranslationError;
use crate::translations::{ArgumentListTranslation, BoxedTranslation, Translation, TypeNameTranslation};
use crate::writer::{TranslationSizes, TranslationWriter};

const INLINE_INITIALISER_SIZE: usize = 100;

/// `new T(args)`; the parentheses are left off an empty argument list
/// when an initialiser follows.
pub struct NewTranslation {
    type_name: TypeNameTranslation,
    arguments: ArgumentListTranslation,
    omit_empty_arguments: bool,
    sizes: TranslationSizes,
}

impl NewTranslation {
    pub fn new(new: &NewExpression, context: &TranslationContext) -> Result<NewTranslation, TranslationError> {
        NewTranslation::create(new, false, context)
    }

    fn for_initialiser(new: &NewExpression, context: &TranslationContext) -> Result<NewTranslation, TranslationError> {
        NewTranslation::create(new, true, context)
    }

    fn create(new: &NewExpression, omit_empty_arguments: bool, context: &TranslationContext) -> Result<NewTranslation, TranslationError> {
        let mut translation = NewTranslation {
            type_name: context.type_name(new.constructor().declaring_type()),
            arguments: ArgumentListTranslation::new(new.constructor().parameters(), new.arguments(), context)?,
            omit_empty_arguments,
            sizes: TranslationSizes::default(),
        };
        translation.sizes = context.measure(&translation);
        Ok(translation)
    }
}

impl Translation for NewTranslation {
    fn node_type(&self) -> ExpressionType {
        ExpressionType::New
    }

    fn result_type(&self) -> Type {
        self.type_name.result_type()
    }

    fn sizes(&self) -> TranslationSizes {
        self.sizes
    }

    fn write_to(&self, writer: &mut TranslationWriter) {
        writer.write_keyword("new");
        writer.write_space();
        writer.write_translation(&self.type_name);
        if !(self.omit_empty_arguments && self.arguments.is_empty()) {
            writer.write_translation(&self.arguments);
        }
    }

    fn is_multi_statement(&self) -> bool {
        self.arguments.is_multi_statement()
    }
}

/// A braced, comma-separated list of entries: inline, or one entry per line.
pub struct InitialiserTranslation {
    entries: Vec<BoxedTranslation>,
    multiline: bool,
    sizes: TranslationSizes,
}

impl InitialiserTranslation {
    fn new(entries: Vec<BoxedTranslation>, multiline: bool, context: &TranslationContext) -> InitialiserTranslation {
        let mut translation = InitialiserTranslation { entries, multiline, sizes: TranslationSizes::default() };
        translation.sizes = context.measure(&translation);
        translation
    }

    /// Inline unless the entries are long or span lines.
    fn fitted(entries: Vec<BoxedTranslation>, context: &TranslationContext) -> InitialiserTranslation {
        let total_size: usize = entries.iter().map(|entry| entry.sizes().translation_size()).sum();
        let multiline = total_size > INLINE_INITIALISER_SIZE || entries.iter().any(|entry| entry.is_multi_statement());
        InitialiserTranslation::new(entries, multiline, context)
    }

    fn for_elements(initializers: &[ElementInit], context: &TranslationContext) -> Result<InitialiserTranslation, TranslationError> {
        let mut entries: Vec<BoxedTranslation> = vec!();
        for initializer in initializers {
            match initializer.arguments().as_slice() {
                [single] => entries.push(context.get_translation_for(single)?),
                arguments => {
                    let values = translate_all(arguments, context)?;
                    entries.push(Box::new(InitialiserTranslation::new(values, false, context)));
                }
            }
        }
        Ok(InitialiserTranslation::new(entries, true, context))
    }

    fn for_bindings(bindings: &[MemberBinding], context: &TranslationContext) -> Result<InitialiserTranslation, TranslationError> {
        let entries = bindings
            .iter()
            .map(|binding| BindingTranslation::new(binding, context).map(|b| Box::new(b) as BoxedTranslation))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(InitialiserTranslation::new(entries, true, context))
    }
}

fn translate_all(expressions: &[Expression], context: &TranslationContext) -> Result<Vec<BoxedTranslation>, TranslationError> {
    expressions.iter().map(|expression| context.get_translation_for(expression)).collect()
}

impl Translation for InitialiserTranslation {
    fn node_type(&self) -> ExpressionType {
        ExpressionType::ListInit
    }

    fn result_type(&self) -> Type {
        Type::void()
    }

    fn sizes(&self) -> TranslationSizes {
        self.sizes
    }

    fn write_to(&self, writer: &mut TranslationWriter) {
        if !self.multiline {
            writer.write_default("{ ");
            for (index, entry) in self.entries.iter().enumerate() {
                if index > 0 {
                    writer.write_default(", ");
                }
                writer.write_translation(entry.as_ref());
            }
            writer.write_default(if self.entries.is_empty() { "}" } else { " }" });
            return;
        }

        writer.write_opening_brace();
        for (index, entry) in self.entries.iter().enumerate() {
            if index > 0 {
                writer.write_default(",");
            }
            writer.write_new_line();
            writer.write_translation(entry.as_ref());
        }
        writer.write_closing_brace();
    }

    fn is_multi_statement(&self) -> bool {
        self.multiline
    }
}

enum BindingValue {
    Expression(BoxedTranslation),
    Initialiser(InitialiserTranslation),
}

/// `Member = value`, or `Member =` followed by a nested initialiser.
struct BindingTranslation {
    member: String,
    value: BindingValue,
    sizes: TranslationSizes,
}

impl BindingTranslation {
    fn new(binding: &MemberBinding, context: &TranslationContext) -> Result<BindingTranslation, TranslationError> {
        let value = match binding {
            MemberBinding::Assignment { value, .. } => BindingValue::Expression(context.get_translation_for(value)?),
            MemberBinding::Member { bindings, .. } => BindingValue::Initialiser(InitialiserTranslation::for_bindings(bindings, context)?),
            MemberBinding::List { initializers, .. } => BindingValue::Initialiser(InitialiserTranslation::for_elements(initializers, context)?),
        };

        let mut translation = BindingTranslation {
            member: binding.member().name().clone(),
            value,
            sizes: TranslationSizes::default(),
        };
        translation.sizes = context.measure(&translation);
        Ok(translation)
    }
}

impl Translation for BindingTranslation {
    fn node_type(&self) -> ExpressionType {
        ExpressionType::MemberInit
    }

    fn result_type(&self) -> Type {
        Type::void()
    }

    fn sizes(&self) -> TranslationSizes {
        self.sizes
    }

    fn write_to(&self, writer: &mut TranslationWriter) {
        writer.write_default(&self.member);
        writer.write_default(" =");
        match &self.value {
            BindingValue::Expression(value) => {
                writer.write_space();
                writer.write_translation(value.as_ref());
            }
            BindingValue::Initialiser(initialiser) => writer.write_translation(initialiser),
        }
    }
}

/// `new T { Member = value, ... }`.
pub struct MemberInitTranslation {
    new_translation: NewTranslation,
    initialiser: InitialiserTranslation,
    sizes: TranslationSizes,
}

impl MemberInitTranslation {
    pub fn new(init: &MemberInitExpression, context: &TranslationContext) -> Result<MemberInitTranslation, TranslationError> {
        let mut translation = MemberInitTranslation {
            new_translation: NewTranslation::for_initialiser(init.new_expression(), context)?,
            initialiser: InitialiserTranslation::for_bindings(init.bindings(), context)?,
            sizes: TranslationSizes::default(),
        };
        translation.sizes = context.measure(&translation);
        Ok(translation)
    }
}

impl Translation for MemberInitTranslation {
    fn node_type(&self) -> ExpressionType {
        ExpressionType::MemberInit
    }

    fn result_type(&self) -> Type {
        self.new_translation.result_type()
    }

    fn sizes(&self) -> TranslationSizes {
        self.sizes
    }

    fn write_to(&self, writer: &mut TranslationWriter) {
        writer.write_translation(&self.new_translation);
        writer.write_translation(&self.initialiser);
    }

    fn is_multi_statement(&self) -> bool {
        true
    }
}

/// `new T { a, { b, c } }`.
pub struct ListInitTranslation {
    new_translation: NewTranslation,
    initialiser: InitialiserTranslation,
    sizes: TranslationSizes,
}

impl ListInitTranslation {
    pub fn new(init: &ListInitExpression, context: &TranslationContext) -> Result<ListInitTranslation, TranslationError> {
        let mut translation = ListInitTranslation {
            new_translation: NewTranslation::for_initialiser(init.new_expression(), context)?,
            initialiser: InitialiserTranslation::for_elements(init.initializers(), context)?,
            sizes: TranslationSizes::default(),
        };
        translation.sizes = context.measure(&translation);
        Ok(translation)
    }
}

impl Translation for ListInitTranslation {
    fn node_type(&self) -> ExpressionType {
        ExpressionType::ListInit
    }

    fn result_type(&self) -> Type {
        self.new_translation.result_type()
    }

    fn sizes(&self) -> TranslationSizes {
        self.sizes
    }

    fn write_to(&self, writer: &mut TranslationWriter) {
        writer.write_translation(&self.new_translation);
        writer.write_translation(&self.initialiser);
    }

    fn is_multi_statement(&self) -> bool {
        true
    }
}

enum ArrayForm {
    /// `new[] { ... }`, or `new T[] { ... }` when the type is written.
    Init {
        type_name: Option<TypeNameTranslation>,
        elements: InitialiserTranslation,
    },
    /// `new T[n, m]`, with any further array ranks of `T` after the bounds.
    Bounds {
        innermost: TypeNameTranslation,
        bounds: Vec<BoxedTranslation>,
        ranks: Vec<usize>,
    },
}

pub struct NewArrayTranslation {
    result_type: Type,
    form: ArrayForm,
    sizes: TranslationSizes,
}

impl NewArrayTranslation {
    pub fn new(array: &NewArrayExpression, context: &TranslationContext) -> Result<NewArrayTranslation, TranslationError> {
        let element_type = array.element_type();

        let form = if array.node_type() == ExpressionType::NewArrayBounds || array.expressions().is_empty() {
            let mut ranks = vec!();
            let mut innermost = element_type;
            while let TypeKind::Array { element, rank } = innermost.kind() {
                ranks.push(*rank);
                innermost = element;
            }
            let bounds = if array.expressions().is_empty() {
                vec!(context.get_translation_for(&Expression::int(0))?)
            } else {
                translate_all(array.expressions(), context)?
            };
            ArrayForm::Bounds { innermost: context.type_name(innermost), bounds, ranks }
        } else {
            let implicit = !context.settings().show_implicit_array_types() &&
                array.expressions().iter().all(|element| &element.result_type() == element_type);
            ArrayForm::Init {
                type_name: if implicit { None } else { Some(context.type_name(element_type)) },
                elements: InitialiserTranslation::fitted(translate_all(array.expressions(), context)?, context),
            }
        };

        let mut translation = NewArrayTranslation {
            result_type: Type::array(element_type.clone()),
            form,
            sizes: TranslationSizes::default(),
        };
        translation.sizes = context.measure(&translation);
        Ok(translation)
    }
}

impl Translation for NewArrayTranslation {
    fn node_type(&self) -> ExpressionType {
        match self.form {
            ArrayForm::Init { .. } => ExpressionType::NewArrayInit,
            ArrayForm::Bounds { .. } => ExpressionType::NewArrayBounds,
        }
    }

    fn result_type(&self) -> Type {
        self.result_type.clone()
    }

    fn sizes(&self) -> TranslationSizes {
        self.sizes
    }

    fn write_to(&self, writer: &mut TranslationWriter) {
        writer.write_keyword("new");
        match &self.form {
            ArrayForm::Init { type_name, elements } => {
                if let Some(type_name) = type_name {
                    writer.write_space();
                    writer.write_translation(type_name);
                }
                writer.write_default("[]");
                if !elements.is_multi_statement() {
                    writer.write_space();
                }
                writer.write_translation(elements);
            }
            ArrayForm::Bounds { innermost, bounds, ranks } => {
                writer.write_space();
                writer.write_translation(innermost);
                writer.write_default("[");
                for (index, bound) in bounds.iter().enumerate() {
                    if index > 0 {
                        writer.write_default(", ");
                    }
                    writer.write_translation(bound.as_ref());
                }
                writer.write_default("]");
                for rank in ranks {
                    writer.write_default("[");
                    for _ in 1..*rank {
                        writer.write_default(",");
                    }
                    writer.write_default("]");
                }
            }
        }
    }

    fn is_multi_statement(&self) -> bool {
        match &self.form {
            ArrayForm::Init { elements, .. } => elements.is_multi_statement(),
            ArrayForm::Bounds { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::TranslationSettings;
    use crate::translations::test_support::{translate, translate_with};
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn customer() -> Type {
        Type::class("MyApp", "Customer")
    }

    fn address() -> Type {
        Type::class("MyApp", "Address")
    }

    #[test]
    fn test_object_creation() {
        let uri = Type::class("System", "Uri");
        let create = Expression::new_object(
            ConstructorInfo::of(uri, vec!(ParameterInfo::of("uriString", Type::string()))),
            vec!(Expression::string("https://example.com")));
        assert_eq!("new Uri(\"https://example.com\")", translate(&create));
        assert_eq!("new Customer()", translate(&Expression::new_object(ConstructorInfo::default_for(customer()), vec!())));
    }

    #[test]
    fn test_member_initialisers() {
        let new_customer = NewExpression::new(ConstructorInfo::default_for(customer()), vec!());
        let init = Expression::member_init(new_customer, vec!(
            MemberBinding::Assignment {
                member: MemberInfo::property(customer(), "Name", Type::string()),
                value: Expression::string("Alice"),
            },
            MemberBinding::Member {
                member: MemberInfo::property(customer(), "Address", address()),
                bindings: vec!(MemberBinding::Assignment {
                    member: MemberInfo::property(address(), "City", Type::string()),
                    value: Expression::string("Paris"),
                }),
            },
            MemberBinding::List {
                member: MemberInfo::property(customer(), "Tags", Type::list_of(Type::string())),
                initializers: vec!(ElementInit::new(
                    MethodInfo::instance(Type::list_of(Type::string()), "Add", vec!(ParameterInfo::of("item", Type::string())), Type::void()),
                    vec!(Expression::string("new")))),
            }));

        assert_eq!(indoc!("
            new Customer
            {
                Name = \"Alice\",
                Address =
                {
                    City = \"Paris\"
                },
                Tags =
                {
                    \"new\"
                }
            }"), translate(&init));
    }

    #[test]
    fn test_list_initialisers() {
        let dictionary = Type::dictionary_of(Type::string(), Type::int());
        let add = MethodInfo::instance(
            dictionary.clone(),
            "Add",
            vec!(ParameterInfo::of("key", Type::string()), ParameterInfo::of("value", Type::int())),
            Type::void());
        let init = Expression::list_init(
            NewExpression::new(ConstructorInfo::default_for(dictionary), vec!()),
            vec!(
                ElementInit::new(add.clone(), vec!(Expression::string("one"), Expression::int(1))),
                ElementInit::new(add, vec!(Expression::string("two"), Expression::int(2)))));

        assert_eq!(indoc!("
            new Dictionary<string, int>
            {
                { \"one\", 1 },
                { \"two\", 2 }
            }"), translate(&init));
    }

    #[test]
    fn test_arrays() {
        let numbers = Expression::new_array_init(Type::int(), vec!(Expression::int(1), Expression::int(2)));
        assert_eq!("new[] { 1, 2 }", translate(&numbers));

        let settings = TranslationSettings::builder().show_implicit_array_types().build();
        assert_eq!("new int[] { 1, 2 }", translate_with(&numbers, &settings));

        let mixed = Expression::new_array_init(Type::object(), vec!(Expression::int(1), Expression::string("a")));
        assert_eq!("new object[] { 1, \"a\" }", translate(&mixed));

        assert_eq!("new int[0]", translate(&Expression::new_array_init(Type::int(), vec!())));
        assert_eq!("new int[3, 4]", translate(&Expression::new_array_bounds(Type::int(), vec!(Expression::int(3), Expression::int(4)))));
        assert_eq!("new int[5][]", translate(&Expression::new_array_bounds(Type::array(Type::int()), vec!(Expression::int(5)))));
    }
}
