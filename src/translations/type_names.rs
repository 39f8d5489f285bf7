use expression::{ExpressionType, Type, TypeKind};

use crate::context::TranslationContext;
use crate::formatting::{NullTranslationFormatter, TokenKind};
use crate::settings::TranslationSettings;
use crate::translations::Translation;
use crate::writer::{TranslationSizes, TranslationWriter};

/// A type name: keyword aliases, `T?`, `T[]`, `Outer.Inner` and `Name<Args>`.
pub struct TypeNameTranslation {
    type_name: Type,
    fully_qualified: bool,
    sizes: TranslationSizes,
}

impl TypeNameTranslation {
    pub fn new(type_name: &Type, context: &TranslationContext) -> TypeNameTranslation {
        let mut translation = TypeNameTranslation {
            type_name: type_name.clone(),
            fully_qualified: context.settings().use_fully_qualified_type_names(),
            sizes: TranslationSizes::default(),
        };
        translation.sizes = context.measure(&translation);
        translation
    }

    fn write_name(&self, type_name: &Type, writer: &mut TranslationWriter) {
        if let Some(keyword) = type_name.keyword() {
            writer.write_keyword(keyword);
            return;
        }

        if type_name.is_nullable() {
            self.write_name(&type_name.generic_arguments()[0], writer);
            writer.write_default("?");
            return;
        }

        if let TypeKind::Array { element, rank } = type_name.kind() {
            self.write_name(element, writer);
            writer.write_default("[");
            for _ in 1..*rank {
                writer.write_default(",");
            }
            writer.write_default("]");
            return;
        }

        match type_name.declaring_type() {
            Some(outer) => {
                self.write_name(outer, writer);
                writer.write_dot();
            }
            None => {
                if let Some(namespace) = type_name.namespace().filter(|_| self.fully_qualified) {
                    writer.write_default(namespace);
                    writer.write_dot();
                }
            }
        }

        let kind = if type_name.is_interface() { TokenKind::InterfaceName } else { TokenKind::TypeName };
        writer.write_token(type_name.name(), kind);

        if type_name.is_generic() {
            writer.write_default("<");
            for (index, argument) in type_name.generic_arguments().iter().enumerate() {
                if index > 0 {
                    writer.write_default(", ");
                }
                self.write_name(argument, writer);
            }
            writer.write_default(">");
        }
    }
}

impl Translation for TypeNameTranslation {
    fn node_type(&self) -> ExpressionType {
        ExpressionType::Constant
    }

    fn result_type(&self) -> Type {
        self.type_name.clone()
    }

    fn sizes(&self) -> TranslationSizes {
        self.sizes
    }

    fn write_to(&self, writer: &mut TranslationWriter) {
        self.write_name(&self.type_name, writer);
    }
}

/// The readable name of `type_name`, without formatting.
pub fn friendly_name(type_name: &Type, settings: &TranslationSettings) -> String {
    let context = TranslationContext::empty(settings);
    let translation = TypeNameTranslation::new(type_name, &context);
    TranslationWriter::write(&NullTranslationFormatter, settings.indent(), &translation)
}
