use expression::*;

use crate::context::TranslationContext;
use crate::error::TranslationError;
use crate::translations::operators::{operand_translation, Precedence};
use crate::translations::{BoxedTranslation, Translation, TypeNameTranslation};
use crate::writer::{TranslationSizes, TranslationWriter};

enum MemberSubject {
    Type(TypeNameTranslation),
    Instance(BoxedTranslation),
}

/// Field or property access, `subject.Member` or `Type.Member`.
pub struct MemberTranslation {
    result_type: Type,
    subject: MemberSubject,
    name: String,
    sizes: TranslationSizes,
}

impl MemberTranslation {
    pub fn new(member: &MemberExpression, context: &TranslationContext) -> Result<MemberTranslation, TranslationError> {
        let subject = match member.subject() {
            Some(subject) => MemberSubject::Instance(operand_translation(subject, Precedence::Primary, context)?),
            None => MemberSubject::Type(context.type_name(member.member().declaring_type())),
        };

        let mut translation = MemberTranslation {
            result_type: member.member().member_type().clone(),
            subject,
            name: member.member().name().clone(),
            sizes: TranslationSizes::default(),
        };
        translation.sizes = context.measure(&translation);
        Ok(translation)
    }
}

impl Translation for MemberTranslation {
    fn node_type(&self) -> ExpressionType {
        ExpressionType::MemberAccess
    }

    fn result_type(&self) -> Type {
        self.result_type.clone()
    }

    fn sizes(&self) -> TranslationSizes {
        self.sizes
    }

    fn write_to(&self, writer: &mut TranslationWriter) {
        match &self.subject {
            MemberSubject::Type(type_name) => writer.write_translation(type_name),
            MemberSubject::Instance(instance) => writer.write_translation(instance.as_ref()),
        }
        writer.write_dot();
        writer.write_default(&self.name);
    }
}

/// Indexer or multi-dimensional array access, `subject[a, b]`.
pub struct IndexTranslation {
    result_type: Type,
    subject: BoxedTranslation,
    arguments: Vec<BoxedTranslation>,
    sizes: TranslationSizes,
}

impl IndexTranslation {
    pub fn for_index(index: &IndexExpression, context: &TranslationContext) -> Result<IndexTranslation, TranslationError> {
        let arguments = index.arguments()
            .iter()
            .map(|argument| context.get_translation_for(argument))
            .collect::<Result<Vec<_>, _>>()?;

        let mut translation = IndexTranslation {
            result_type: index.result_type().clone(),
            subject: operand_translation(index.subject(), Precedence::Primary, context)?,
            arguments,
            sizes: TranslationSizes::default(),
        };
        translation.sizes = context.measure(&translation);
        Ok(translation)
    }
}

impl Translation for IndexTranslation {
    fn node_type(&self) -> ExpressionType {
        ExpressionType::Index
    }

    fn result_type(&self) -> Type {
        self.result_type.clone()
    }

    fn sizes(&self) -> TranslationSizes {
        self.sizes
    }

    fn write_to(&self, writer: &mut TranslationWriter) {
        writer.write_translation(self.subject.as_ref());
        writer.write_default("[");
        for (index, argument) in self.arguments.iter().enumerate() {
            if index > 0 {
                writer.write_default(", ");
            }
            writer.write_translation(argument.as_ref());
        }
        writer.write_default("]");
    }
}
