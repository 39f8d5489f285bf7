use getset::{CopyGetters, Getters};

use crate::types::Type;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Accessibility {
    Public,
    Internal,
    Protected,
    ProtectedInternal,
    Private,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParameterModifier {
    None,
    Out,
    Ref,
    Params,
}

#[derive(Clone, Constructor, Getters, CopyGetters, Debug, PartialEq)]
pub struct ParameterInfo {
    #[get = "pub"]
    name: String,

    #[get = "pub"]
    parameter_type: Type,

    #[get_copy = "pub"]
    modifier: ParameterModifier,
}

impl ParameterInfo {
    pub fn of(name: &str, parameter_type: Type) -> ParameterInfo {
        ParameterInfo::new(String::from(name), parameter_type, ParameterModifier::None)
    }

    pub fn out(name: &str, parameter_type: Type) -> ParameterInfo {
        ParameterInfo::new(String::from(name), parameter_type, ParameterModifier::Out)
    }

    pub fn by_ref(name: &str, parameter_type: Type) -> ParameterInfo {
        ParameterInfo::new(String::from(name), parameter_type, ParameterModifier::Ref)
    }

    pub fn is_out(&self) -> bool {
        self.modifier == ParameterModifier::Out
    }

    pub fn is_ref(&self) -> bool {
        self.modifier == ParameterModifier::Ref
    }
}

#[derive(Clone, Constructor, Getters, CopyGetters, Debug, PartialEq)]
pub struct MethodInfo {
    #[get = "pub"]
    name: String,

    #[get = "pub"]
    declaring_type: Type,

    #[get = "pub"]
    return_type: Type,

    #[get = "pub"]
    parameters: Vec<ParameterInfo>,

    #[get_copy = "pub"]
    is_static: bool,

    #[get_copy = "pub"]
    accessibility: Accessibility,

    #[get_copy = "pub"]
    is_extension: bool,

    #[get = "pub"]
    generic_arguments: Vec<Type>,
}

impl MethodInfo {
    pub fn instance(declaring_type: Type, name: &str, parameters: Vec<ParameterInfo>, return_type: Type) -> MethodInfo {
        MethodInfo::new(String::from(name), declaring_type, return_type, parameters, false, Accessibility::Public, false, vec!())
    }

    pub fn static_method(declaring_type: Type, name: &str, parameters: Vec<ParameterInfo>, return_type: Type) -> MethodInfo {
        MethodInfo::new(String::from(name), declaring_type, return_type, parameters, true, Accessibility::Public, false, vec!())
    }

    /// A static extension method; the first parameter is the extended instance.
    pub fn extension(declaring_type: Type, name: &str, parameters: Vec<ParameterInfo>, return_type: Type) -> MethodInfo {
        MethodInfo::new(String::from(name), declaring_type, return_type, parameters, true, Accessibility::Public, true, vec!())
    }

    pub fn with_generic_arguments(mut self, generic_arguments: Vec<Type>) -> MethodInfo {
        self.generic_arguments = generic_arguments;
        self
    }

    pub fn with_accessibility(mut self, accessibility: Accessibility) -> MethodInfo {
        self.accessibility = accessibility;
        self
    }

    pub fn is_generic(&self) -> bool {
        !self.generic_arguments.is_empty()
    }
}

#[derive(Clone, Constructor, Getters, CopyGetters, Debug, PartialEq)]
pub struct ConstructorInfo {
    #[get = "pub"]
    declaring_type: Type,

    #[get = "pub"]
    parameters: Vec<ParameterInfo>,

    #[get_copy = "pub"]
    accessibility: Accessibility,
}

impl ConstructorInfo {
    pub fn of(declaring_type: Type, parameters: Vec<ParameterInfo>) -> ConstructorInfo {
        ConstructorInfo::new(declaring_type, parameters, Accessibility::Public)
    }

    pub fn default_for(declaring_type: Type) -> ConstructorInfo {
        ConstructorInfo::of(declaring_type, vec!())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Field,
    Property,
}

#[derive(Clone, Constructor, Getters, CopyGetters, Debug, PartialEq)]
pub struct MemberInfo {
    #[get = "pub"]
    name: String,

    #[get = "pub"]
    declaring_type: Type,

    #[get = "pub"]
    member_type: Type,

    #[get_copy = "pub"]
    kind: MemberKind,

    #[get_copy = "pub"]
    is_static: bool,
}

impl MemberInfo {
    pub fn property(declaring_type: Type, name: &str, member_type: Type) -> MemberInfo {
        MemberInfo::new(String::from(name), declaring_type, member_type, MemberKind::Property, false)
    }

    pub fn field(declaring_type: Type, name: &str, member_type: Type) -> MemberInfo {
        MemberInfo::new(String::from(name), declaring_type, member_type, MemberKind::Field, false)
    }

    pub fn static_property(declaring_type: Type, name: &str, member_type: Type) -> MemberInfo {
        MemberInfo::new(String::from(name), declaring_type, member_type, MemberKind::Property, true)
    }
}
