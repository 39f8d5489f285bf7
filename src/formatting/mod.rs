//! The formatting port: decides how each written token is decorated.

mod html;

pub use html::HtmlTranslationFormatter;

/// Classifies a piece of emitted text for formatting purposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Default,
    Keyword,
    Variable,
    TypeName,
    InterfaceName,
    ControlStatement,
    Text,
    Numeric,
    MethodName,
    Comment,
}

impl TokenKind {
    pub const ALL: [TokenKind; 10] = [
        TokenKind::Default,
        TokenKind::Keyword,
        TokenKind::Variable,
        TokenKind::TypeName,
        TokenKind::InterfaceName,
        TokenKind::ControlStatement,
        TokenKind::Text,
        TokenKind::Numeric,
        TokenKind::MethodName,
        TokenKind::Comment,
    ];
}

/// Decorates tokens as they are written.
///
/// The extra bytes a decoration costs must depend only on the token's value
/// and kind, so translations can size their output before writing it, and
/// `get_raw` must undo `write_formatted` exactly.
pub trait TranslationFormatter: Send + Sync {
    fn write_formatted(&self, value: &str, kind: TokenKind, output: &mut String);

    fn formatting_size(&self, value: &str, kind: TokenKind) -> usize;

    fn get_raw(&self, formatted: &str) -> String;
}

/// Writes every token unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullTranslationFormatter;

impl TranslationFormatter for NullTranslationFormatter {
    fn write_formatted(&self, value: &str, _kind: TokenKind, output: &mut String) {
        output.push_str(value);
    }

    fn formatting_size(&self, _value: &str, _kind: TokenKind) -> usize {
        0
    }

    fn get_raw(&self, formatted: &str) -> String {
        String::from(formatted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_formatter_round_trip() {
        let formatter = NullTranslationFormatter;
        for kind in TokenKind::ALL.iter() {
            let mut output = String::new();
            formatter.write_formatted("List<int> & more", *kind, &mut output);
            assert_eq!("List<int> & more", output);
            assert_eq!(0, formatter.formatting_size("List<int> & more", *kind));
            assert_eq!("List<int> & more", formatter.get_raw(&output));
        }
    }
}
