use crate::model::{Location, MemberDecl, TypeRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Field,
    Property,
}

/// Uniform view of a field or property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDescriptor {
    pub ty: TypeRef,
    /// Exactly as declared in source.
    pub name: String,
    pub kind: MemberKind,
    pub implicit: bool,
    pub location: Location,
}

impl MemberDescriptor {
    pub fn field(decl: &MemberDecl) -> Self {
        Self::from_decl(decl, MemberKind::Field)
    }

    pub fn property(decl: &MemberDecl) -> Self {
        Self::from_decl(decl, MemberKind::Property)
    }

    fn from_decl(decl: &MemberDecl, kind: MemberKind) -> Self {
        Self {
            ty: decl.ty.clone(),
            name: decl.name.clone(),
            kind,
            implicit: decl.implicit,
            location: decl.location.clone(),
        }
    }

    /// Properties first, then fields, each in declaration order.
    pub fn all_of(properties: &[MemberDecl], fields: &[MemberDecl]) -> Vec<MemberDescriptor> {
        properties
            .iter()
            .map(Self::property)
            .chain(fields.iter().map(Self::field))
            .collect()
    }

    /// Base name for generated companion declarations: leading underscores
    /// dropped, first letter upper-cased (`_myTree` -> `MyTree`).
    pub fn config_name(&self) -> String {
        config_name(&self.name)
    }
}

pub fn config_name(name: &str) -> String {
    let trimmed = name.trim_start_matches('_');
    if trimmed.is_empty() {
        return name.to_string();
    }
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
