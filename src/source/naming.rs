//! Class and method names: explicit, from a naming callback, or defaulted.

use getset::{CopyGetters, Getters};

use expression::Type;

use crate::analysis::naming::{is_valid_identifier, number_names};
use crate::error::{InvalidNameReason, NameKind, TranslationError};

pub const DEFAULT_CLASS_NAME: &str = "GeneratedExpressionClass";

/// What a class naming callback knows about the class it is naming.
#[derive(Clone, Constructor, CopyGetters, Getters, Debug, PartialEq)]
pub struct ClassNamingContext {
    /// Position of the class in the generated source, from zero.
    #[get_copy = "pub"]
    index: usize,

    /// Return type of the class's first method, `void` for an empty class.
    #[get = "pub"]
    return_type: Type,

    #[get_copy = "pub"]
    method_count: usize,
}

/// What a method naming callback knows about the method it is naming.
#[derive(Clone, Constructor, CopyGetters, Getters, Debug, PartialEq)]
pub struct MethodNamingContext {
    /// Position of the method in its class, from zero.
    #[get_copy = "pub"]
    index: usize,

    #[get = "pub"]
    return_type: Type,

    /// Methods in the class.
    #[get_copy = "pub"]
    method_count: usize,
}

/// Rejects missing, blank and non-identifier names.
pub fn validate_name(kind: NameKind, name: Option<String>) -> Result<String, TranslationError> {
    let reason = match name {
        None => InvalidNameReason::Null,
        Some(name) if name.trim().is_empty() => InvalidNameReason::Blank,
        Some(name) if !is_valid_identifier(&name) => InvalidNameReason::InvalidIdentifier(name),
        Some(name) => return Ok(name),
    };
    Err(TranslationError::InvalidName { kind, reason })
}

/// Resolves one name per item. Explicit names win, then the callback; items
/// left over get their default base name, numbered when it repeats.
pub(crate) fn resolve_names<C>(
    kind: NameKind,
    explicit_names: Vec<Option<String>>,
    callback: Option<&dyn Fn(&C) -> Option<String>>,
    naming_context: impl Fn(usize) -> C,
    default_name: impl Fn(usize) -> String,
) -> Result<Vec<String>, TranslationError> {
    let mut names: Vec<Option<String>> = vec!();
    for (index, explicit_name) in explicit_names.into_iter().enumerate() {
        let name = match (explicit_name, callback) {
            (Some(name), _) => Some(validate_name(kind, Some(name))?),
            (None, Some(callback)) => Some(validate_name(kind, callback(&naming_context(index)))?),
            (None, None) => None,
        };
        names.push(name);
    }

    let defaulted: Vec<usize> = names.iter()
        .enumerate()
        .filter(|(_, name)| name.is_none())
        .map(|(index, _)| index)
        .collect();
    let base_names: Vec<String> = defaulted.iter().map(|index| default_name(*index)).collect();
    for (index, name) in defaulted.into_iter().zip(number_names(&base_names)) {
        names[index] = Some(name);
    }

    Ok(names.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn no_callback() -> Option<&'static dyn Fn(&usize) -> Option<String>> {
        None
    }

    #[test]
    fn test_validation() {
        assert_eq!(Ok(String::from("MyClass")), validate_name(NameKind::Class, Some(String::from("MyClass"))));

        let null = validate_name(NameKind::Class, None).unwrap_err();
        assert!(null.to_string().contains("cannot be null"));

        let blank = validate_name(NameKind::Method, Some(String::from("  "))).unwrap_err();
        assert!(blank.to_string().contains("cannot be blank"));

        let invalid = validate_name(NameKind::Class, Some(String::from("1Foo"))).unwrap_err();
        assert!(invalid.to_string().contains("invalid class name"));
    }

    #[test]
    fn test_defaults_are_numbered_only_when_repeated() {
        let names = resolve_names(
            NameKind::Class,
            vec!(None, Some(String::from("Orders")), None),
            no_callback(),
            |index| index,
            |_| String::from(DEFAULT_CLASS_NAME)).unwrap();
        assert_eq!(vec!("GeneratedExpressionClass1", "Orders", "GeneratedExpressionClass2"), names);

        let single = resolve_names(NameKind::Class, vec!(None), no_callback(), |index| index, |_| String::from(DEFAULT_CLASS_NAME)).unwrap();
        assert_eq!(vec!("GeneratedExpressionClass"), single);
    }

    #[test]
    fn test_callbacks_name_what_is_not_named() {
        let callback = |index: &usize| Some(format!("Method{}", index));
        let names = resolve_names(
            NameKind::Method,
            vec!(None, Some(String::from("Explicit"))),
            Some(&callback as &dyn Fn(&usize) -> Option<String>),
            |index| index,
            |_| String::from("DoAction")).unwrap();
        assert_eq!(vec!("Method0", "Explicit"), names);
    }
}
