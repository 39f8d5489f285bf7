use super::{TokenKind, TranslationFormatter};

const SPAN_CLOSE: &str = "</span>";

/// Wraps tokens in `<span class="..">` elements and HTML-encodes every value.
#[derive(Clone, Copy, Debug, Default)]
pub struct HtmlTranslationFormatter;

impl HtmlTranslationFormatter {
    fn class_name(kind: TokenKind) -> Option<&'static str> {
        match kind {
            TokenKind::Default => None,
            TokenKind::Keyword => Some("kw"),
            TokenKind::Variable => Some("vb"),
            TokenKind::TypeName => Some("tn"),
            TokenKind::InterfaceName => Some("in"),
            TokenKind::ControlStatement => Some("cs"),
            TokenKind::Text => Some("tx"),
            TokenKind::Numeric => Some("nm"),
            TokenKind::MethodName => Some("mn"),
            TokenKind::Comment => Some("cm"),
        }
    }

    fn span_open(class_name: &str) -> String {
        format!("<span class=\"{}\">", class_name)
    }

    fn encode_into(value: &str, output: &mut String) {
        for ch in value.chars() {
            match ch {
                '&' => output.push_str("&amp;"),
                '<' => output.push_str("&lt;"),
                '>' => output.push_str("&gt;"),
                _ => output.push(ch),
            }
        }
    }

    fn encoding_size(value: &str) -> usize {
        value.chars()
            .map(|ch| match ch {
                '&' => "&amp;".len() - 1,
                '<' => "&lt;".len() - 1,
                '>' => "&gt;".len() - 1,
                _ => 0,
            })
            .sum()
    }

    fn decode_entity(entity: &str) -> Option<char> {
        match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            _ => None,
        }
    }
}

impl TranslationFormatter for HtmlTranslationFormatter {
    fn write_formatted(&self, value: &str, kind: TokenKind, output: &mut String) {
        match HtmlTranslationFormatter::class_name(kind) {
            Some(class_name) => {
                output.push_str(&HtmlTranslationFormatter::span_open(class_name));
                HtmlTranslationFormatter::encode_into(value, output);
                output.push_str(SPAN_CLOSE);
            }
            None => HtmlTranslationFormatter::encode_into(value, output),
        }
    }

    fn formatting_size(&self, value: &str, kind: TokenKind) -> usize {
        let markup_size = match HtmlTranslationFormatter::class_name(kind) {
            Some(class_name) => HtmlTranslationFormatter::span_open(class_name).len() + SPAN_CLOSE.len(),
            None => 0,
        };
        markup_size + HtmlTranslationFormatter::encoding_size(value)
    }

    /// Strips every tag and decodes the entities `write_formatted` produces.
    fn get_raw(&self, formatted: &str) -> String {
        let mut raw = String::with_capacity(formatted.len());
        let mut chars = formatted.char_indices().peekable();

        while let Some((index, ch)) = chars.next() {
            match ch {
                '<' => {
                    while let Some((_, tag_ch)) = chars.next() {
                        if tag_ch == '>' {
                            break;
                        }
                    }
                }
                '&' => {
                    let rest = &formatted[index + 1..];
                    let decoded = rest.find(';')
                        .and_then(|end| HtmlTranslationFormatter::decode_entity(&rest[..end]).map(|c| (c, end)));

                    match decoded {
                        Some((decoded_ch, end)) => {
                            raw.push(decoded_ch);
                            for _ in 0..=end {
                                chars.next();
                            }
                        }
                        None => raw.push('&'),
                    }
                }
                _ => raw.push(ch),
            }
        }

        raw
    }
}
