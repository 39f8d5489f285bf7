use std::fmt;
use std::sync::Arc;

const SYSTEM: &str = "System";
const COLLECTIONS: &str = "System.Collections.Generic";

/// Generic collection type names whose single generic argument is the element type.
const COLLECTION_TYPE_NAMES: &[&str] = &[
    "IEnumerable",
    "ICollection",
    "IList",
    "IReadOnlyCollection",
    "IReadOnlyList",
    "ISet",
    "List",
    "HashSet",
    "SortedSet",
    "LinkedList",
    "Queue",
    "Stack",
    "Collection",
    "ReadOnlyCollection",
    "IQueryable",
    "IOrderedEnumerable",
    "IOrderedQueryable",
];

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Void,
    Class,
    Struct,
    Interface,
    Enum,
    Delegate,
    Array { element: Type, rank: usize },
    GenericParameter,
}

#[derive(Debug, PartialEq, Eq, Hash)]
struct TypeData {
    name: String,
    namespace: Option<String>,
    kind: TypeKind,
    generic_arguments: Vec<Type>,
    declaring_type: Option<Type>,
}

/// A runtime type description. Clones share the same data; equality is structural.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Type(Arc<TypeData>);

impl Type {
    pub fn new(namespace: Option<&str>, name: &str, kind: TypeKind) -> Type {
        Type(Arc::new(TypeData {
            name: String::from(name),
            namespace: namespace.map(String::from),
            kind,
            generic_arguments: vec!(),
            declaring_type: None,
        }))
    }

    fn with_data(&self, update: impl FnOnce(&mut TypeData)) -> Type {
        let mut data = TypeData {
            name: self.0.name.clone(),
            namespace: self.0.namespace.clone(),
            kind: self.0.kind.clone(),
            generic_arguments: self.0.generic_arguments.clone(),
            declaring_type: self.0.declaring_type.clone(),
        };
        update(&mut data);
        Type(Arc::new(data))
    }

    pub fn with_generic_arguments(&self, arguments: Vec<Type>) -> Type {
        self.with_data(|data| data.generic_arguments = arguments)
    }

    /// Returns a copy of this type declared inside `outer`.
    pub fn nested_in(&self, outer: &Type) -> Type {
        let outer = outer.clone();
        self.with_data(|data| {
            data.namespace = outer.namespace().map(String::from);
            data.declaring_type = Some(outer);
        })
    }

    pub fn void() -> Type { Type::new(Some(SYSTEM), "Void", TypeKind::Void) }
    pub fn object() -> Type { Type::class(SYSTEM, "Object") }
    pub fn string() -> Type { Type::class(SYSTEM, "String") }
    pub fn boolean() -> Type { Type::structure(SYSTEM, "Boolean") }
    pub fn char() -> Type { Type::structure(SYSTEM, "Char") }
    pub fn byte() -> Type { Type::structure(SYSTEM, "Byte") }
    pub fn sbyte() -> Type { Type::structure(SYSTEM, "SByte") }
    pub fn short() -> Type { Type::structure(SYSTEM, "Int16") }
    pub fn ushort() -> Type { Type::structure(SYSTEM, "UInt16") }
    pub fn int() -> Type { Type::structure(SYSTEM, "Int32") }
    pub fn uint() -> Type { Type::structure(SYSTEM, "UInt32") }
    pub fn long() -> Type { Type::structure(SYSTEM, "Int64") }
    pub fn ulong() -> Type { Type::structure(SYSTEM, "UInt64") }
    pub fn float() -> Type { Type::structure(SYSTEM, "Single") }
    pub fn double() -> Type { Type::structure(SYSTEM, "Double") }
    pub fn decimal() -> Type { Type::structure(SYSTEM, "Decimal") }
    pub fn exception() -> Type { Type::class(SYSTEM, "Exception") }
    pub fn date_time() -> Type { Type::structure(SYSTEM, "DateTime") }
    pub fn math() -> Type { Type::class(SYSTEM, "Math") }

    pub fn class(namespace: &str, name: &str) -> Type {
        Type::new(Some(namespace), name, TypeKind::Class)
    }

    pub fn structure(namespace: &str, name: &str) -> Type {
        Type::new(Some(namespace), name, TypeKind::Struct)
    }

    pub fn interface(namespace: &str, name: &str) -> Type {
        Type::new(Some(namespace), name, TypeKind::Interface)
    }

    pub fn enumeration(namespace: &str, name: &str) -> Type {
        Type::new(Some(namespace), name, TypeKind::Enum)
    }

    pub fn generic_parameter(name: &str) -> Type {
        Type::new(None, name, TypeKind::GenericParameter)
    }

    pub fn generic_class(namespace: &str, name: &str, arguments: Vec<Type>) -> Type {
        Type::class(namespace, name).with_generic_arguments(arguments)
    }

    pub fn generic_interface(namespace: &str, name: &str, arguments: Vec<Type>) -> Type {
        Type::interface(namespace, name).with_generic_arguments(arguments)
    }

    pub fn array(element: Type) -> Type {
        Type::array_with_rank(element, 1)
    }

    pub fn array_with_rank(element: Type, rank: usize) -> Type {
        let namespace = element.namespace().map(String::from);
        Type::new(namespace.as_deref(), "Array", TypeKind::Array { element, rank })
    }

    pub fn nullable(underlying: Type) -> Type {
        Type::structure(SYSTEM, "Nullable").with_generic_arguments(vec!(underlying))
    }

    pub fn list_of(element: Type) -> Type {
        Type::generic_class(COLLECTIONS, "List", vec!(element))
    }

    pub fn enumerable_of(element: Type) -> Type {
        Type::generic_interface(COLLECTIONS, "IEnumerable", vec!(element))
    }

    pub fn dictionary_of(key: Type, value: Type) -> Type {
        Type::generic_class(COLLECTIONS, "Dictionary", vec!(key, value))
    }

    /// A `Func<...>` delegate type returning `result`.
    pub fn func(mut parameters: Vec<Type>, result: Type) -> Type {
        parameters.push(result);
        Type::new(Some(SYSTEM), "Func", TypeKind::Delegate).with_generic_arguments(parameters)
    }

    /// An `Action` or `Action<...>` delegate type.
    pub fn action(parameters: Vec<Type>) -> Type {
        Type::new(Some(SYSTEM), "Action", TypeKind::Delegate).with_generic_arguments(parameters)
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn namespace(&self) -> Option<&str> {
        self.0.namespace.as_deref()
    }

    pub fn kind(&self) -> &TypeKind {
        &self.0.kind
    }

    pub fn generic_arguments(&self) -> &[Type] {
        &self.0.generic_arguments
    }

    pub fn declaring_type(&self) -> Option<&Type> {
        self.0.declaring_type.as_ref()
    }

    pub fn is_generic(&self) -> bool {
        !self.0.generic_arguments.is_empty()
    }

    pub fn is_void(&self) -> bool {
        self.0.kind == TypeKind::Void
    }

    pub fn is_interface(&self) -> bool {
        self.0.kind == TypeKind::Interface
    }

    pub fn is_enum(&self) -> bool {
        self.0.kind == TypeKind::Enum
    }

    pub fn is_delegate(&self) -> bool {
        self.0.kind == TypeKind::Delegate
    }

    pub fn is_array(&self) -> bool {
        matches!(self.0.kind, TypeKind::Array { .. })
    }

    pub fn is_value_type(&self) -> bool {
        matches!(self.0.kind, TypeKind::Struct | TypeKind::Enum)
    }

    pub fn is_system_type(&self, name: &str) -> bool {
        self.namespace() == Some(SYSTEM) && self.name() == name && self.declaring_type().is_none()
    }

    pub fn is_nullable(&self) -> bool {
        self.is_system_type("Nullable") && self.generic_arguments().len() == 1
    }

    pub fn is_string(&self) -> bool {
        self.is_system_type("String")
    }

    pub fn is_boolean(&self) -> bool {
        self.is_system_type("Boolean")
    }

    pub fn is_integral(&self) -> bool {
        self.namespace() == Some(SYSTEM) && matches!(
            self.name(),
            "Byte" | "SByte" | "Int16" | "UInt16" | "Int32" | "UInt32" | "Int64" | "UInt64"
        )
    }

    /// The element type of an array or a known generic collection.
    pub fn element_type(&self) -> Option<&Type> {
        if let TypeKind::Array { element, .. } = &self.0.kind {
            return Some(element);
        }
        if self.generic_arguments().len() == 1 && COLLECTION_TYPE_NAMES.contains(&self.name()) {
            return self.generic_arguments().first();
        }
        None
    }

    /// The C# keyword alias for this type, if it has one.
    pub fn keyword(&self) -> Option<&'static str> {
        if self.namespace() != Some(SYSTEM) || self.is_generic() || self.declaring_type().is_some() {
            return None;
        }
        let keyword = match self.name() {
            "Boolean" => "bool",
            "Byte" => "byte",
            "SByte" => "sbyte",
            "Char" => "char",
            "Decimal" => "decimal",
            "Double" => "double",
            "Single" => "float",
            "Int16" => "short",
            "UInt16" => "ushort",
            "Int32" => "int",
            "UInt32" => "uint",
            "Int64" => "long",
            "UInt64" => "ulong",
            "Object" => "object",
            "String" => "string",
            "Void" => "void",
            _ => return None,
        };
        Some(keyword)
    }

    /// Returns true if `candidate` occurs anywhere in this type's structure.
    pub fn contains(&self, candidate: &Type) -> bool {
        if self == candidate {
            return true;
        }
        if let TypeKind::Array { element, .. } = self.kind() {
            if element.contains(candidate) {
                return true;
            }
        }
        self.generic_arguments().iter().any(|argument| argument.contains(candidate))
    }

    pub fn full_name(&self) -> String {
        let mut name = match self.declaring_type() {
            Some(outer) => format!("{}.{}", outer.full_name(), self.name()),
            None => match self.namespace() {
                Some(namespace) if !self.is_array() => format!("{}.{}", namespace, self.name()),
                _ => String::from(self.name()),
            },
        };
        if let TypeKind::Array { element, rank } = self.kind() {
            name = format!("{}[{}]", element.full_name(), ",".repeat(rank - 1));
        }
        if self.is_generic() {
            let arguments = self.generic_arguments()
                .iter()
                .map(Type::full_name)
                .collect::<Vec<String>>()
                .join(",");
            name = format!("{}`{}[{}]", name, self.generic_arguments().len(), arguments);
        }
        name
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords() {
        assert_eq!(Some("int"), Type::int().keyword());
        assert_eq!(Some("string"), Type::string().keyword());
        assert_eq!(None, Type::exception().keyword());
        assert_eq!(None, Type::nullable(Type::int()).keyword());
    }

    #[test]
    fn test_element_types() {
        assert_eq!(Some(&Type::int()), Type::array(Type::int()).element_type());
        assert_eq!(Some(&Type::string()), Type::list_of(Type::string()).element_type());
        assert_eq!(None, Type::dictionary_of(Type::string(), Type::int()).element_type());
    }

    #[test]
    fn test_structural_equality() {
        assert_eq!(Type::list_of(Type::int()), Type::list_of(Type::int()));
        assert_ne!(Type::list_of(Type::int()), Type::list_of(Type::long()));
        assert!(Type::func(vec!(Type::list_of(Type::int())), Type::boolean()).contains(&Type::int()));
    }

    #[test]
    fn test_full_name() {
        assert_eq!("System.Collections.Generic.List`1[System.Int32]", Type::list_of(Type::int()).full_name());
        assert_eq!("System.String[]", Type::array(Type::string()).full_name());
    }
}
