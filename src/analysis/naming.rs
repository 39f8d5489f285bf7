//! Names derived from types, and the numbering policy for repeated names.

use std::collections::HashMap;

use expression::{Type, TypeKind};

/// C# keywords, which cannot be used as identifiers.
pub const KEYWORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed",
    "short", "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw",
    "true", "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using",
    "virtual", "void", "volatile", "while",
];

/// A name split into words at lower-to-upper case boundaries.
#[derive(Constructor, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Name {
    tokens: Vec<String>,
}

impl Name {
    pub fn from(name: &str) -> Name {
        let name = name.replace(|ch: char| !ch.is_alphanumeric(), "_");

        let mut tokens = vec!();
        let mut current_token = String::new();
        let mut last_char_was_lowercase = false;
        for ch in name.chars() {
            if ch == '_' || (last_char_was_lowercase && ch.is_uppercase()) {
                if !current_token.is_empty() {
                    tokens.push(current_token);
                }
                current_token = String::new();
            }
            if ch != '_' {
                current_token.push(ch);
            }
            last_char_was_lowercase = ch.is_lowercase() || ch.is_numeric();
        }
        if !current_token.is_empty() {
            tokens.push(current_token);
        }

        return Name { tokens };
    }

    fn capitalised(token: &str) -> String {
        let mut chars = token.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
            None => String::new(),
        }
    }

    pub fn to_upper_camel_case(&self) -> String {
        return self.tokens
            .iter()
            .map(|token| Name::capitalised(token))
            .collect::<Vec<String>>()
            .join("");
    }

    pub fn to_lower_camel_case(&self) -> String {
        let (head, tail) = match self.tokens.split_first() {
            Some(split) => split,
            None => return String::new(),
        };

        return head.to_lowercase() +
            tail.iter()
                .map(|token| Name::capitalised(token))
                .collect::<Vec<String>>()
                .join("")
                .as_str();
    }
}

pub fn is_keyword(name: &str) -> bool {
    KEYWORDS.contains(&name)
}

/// True if `name` can be written as a C# identifier.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let starts_well = match chars.next() {
        Some(first) => first == '_' || first.is_alphabetic(),
        None => false,
    };
    starts_well && chars.all(|ch| ch == '_' || ch.is_alphanumeric()) && !is_keyword(name)
}

/// True if a source variable name was generated by a compiler rather than written by a person.
pub fn is_generated_name(name: &str) -> bool {
    name.trim().is_empty() || name.starts_with('<') || name.starts_with("CS$")
}

pub fn pluralise(word: &str) -> String {
    if word.is_empty() {
        return String::from("items");
    }

    let lower = word.to_lowercase();
    if lower.ends_with('y') {
        let before_y = lower.chars().rev().nth(1);
        if !matches!(before_y, Some('a') | Some('e') | Some('i') | Some('o') | Some('u')) {
            return format!("{}ies", &word[..word.len() - 1]);
        }
    }
    if lower.ends_with('s') || lower.ends_with('x') || lower.ends_with('z') || lower.ends_with("ch") || lower.ends_with("sh") {
        return format!("{}es", word);
    }
    format!("{}s", word)
}

fn upper_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// The type's name with any interface `I` prefix removed, e.g. `Disposable` for `IDisposable`.
fn plain_type_name(type_name: &Type) -> &str {
    let name = type_name.name();
    if type_name.is_interface() {
        let mut chars = name.chars();
        if chars.next() == Some('I') && chars.next().map_or(false, char::is_uppercase) {
            return &name[1..];
        }
    }
    name
}

/// A lower camel case name describing `type_name`: `customer`, `ints`,
/// `stringIntDictionary`, `nullableInt`.
pub fn type_derived_name(type_name: &Type) -> String {
    if let Some(keyword) = type_name.keyword() {
        return String::from(keyword);
    }

    if type_name.is_nullable() {
        return format!("nullable{}", upper_first(&type_derived_name(&type_name.generic_arguments()[0])));
    }

    if let Some(element) = type_name.element_type() {
        return pluralise(&type_derived_name(element));
    }

    if let TypeKind::GenericParameter = type_name.kind() {
        return Name::from(type_name.name()).to_lower_camel_case();
    }

    let name = Name::from(plain_type_name(type_name));
    if !type_name.is_generic() {
        return name.to_lower_camel_case();
    }

    let mut derived = String::new();
    for argument in type_name.generic_arguments() {
        let argument_name = type_derived_name(argument);
        if derived.is_empty() {
            derived.push_str(&argument_name);
        } else {
            derived.push_str(&upper_first(&argument_name));
        }
    }
    derived + &name.to_upper_camel_case()
}

/// The base name for an unnamed variable of `type_name`. Keyword types get a
/// `Value` suffix so the name is never itself a keyword.
pub fn variable_base_name(type_name: &Type) -> String {
    let derived = type_derived_name(type_name);
    if type_name.keyword().is_some() || is_keyword(&derived) {
        return derived + "Value";
    }
    if derived.is_empty() {
        return String::from("value");
    }
    derived
}

/// The base name for a method returning `return_type`: `DoAction` for void,
/// otherwise `Get` followed by the type-derived name.
pub fn method_base_name(return_type: &Type) -> String {
    if return_type.is_void() {
        return String::from("DoAction");
    }
    format!("Get{}", upper_first(&type_derived_name(return_type)))
}

/// Applies the numbering policy: a base name used once stays as it is; a base
/// name used more than once is suffixed `1`, `2`, ... on every use, in order.
pub fn number_names(base_names: &[String]) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for base_name in base_names {
        *counts.entry(base_name.as_str()).or_insert(0) += 1;
    }

    let mut indexes: HashMap<&str, usize> = HashMap::new();
    base_names.iter()
        .map(|base_name| {
            if counts[base_name.as_str()] == 1 {
                return base_name.clone();
            }
            let index = indexes.entry(base_name.as_str()).or_insert(0);
            *index += 1;
            format!("{}{}", base_name, index)
        })
        .collect()
}
