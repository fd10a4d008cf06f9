//! Input snapshot: the program structure handed over by the driver.
//!
//! Everything here is plain data. The engine never mutates a `Compilation`
//! once it is built; lookups go through [`Compilation::lookup`] and
//! [`Compilation::derives_from`].
use std::{
    collections::{BTreeMap, HashMap, HashSet},
    fmt,
};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::config::GenConfig;
use crate::error::{GenError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl Location {
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = if self.file.is_empty() {
            "<unknown>"
        } else {
            self.file.as_str()
        };
        write!(f, "{}:{}:{}", file, self.line, self.column)
    }
}

/// A type as written at a use site. A trailing `?` is a nullable annotation:
/// kept as a flag, never part of the resolved name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub struct TypeRef {
    name: String,
    nullable: bool,
}

impl TypeRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self::from(name.into())
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }
    /// Name with generic arguments and `global::` stripped, used for lookup.
    pub fn definition_name(&self) -> &str {
        definition_name(&self.name)
    }
}

impl From<String> for TypeRef {
    fn from(s: String) -> Self {
        let trimmed = s.trim();
        match trimmed.strip_suffix('?') {
            Some(inner) => TypeRef {
                name: inner.trim_end().to_string(),
                nullable: true,
            },
            None => TypeRef {
                name: trimmed.to_string(),
                nullable: false,
            },
        }
    }
}

impl From<&str> for TypeRef {
    fn from(s: &str) -> Self {
        TypeRef::from(s.to_string())
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

fn definition_name(name: &str) -> &str {
    let name = name.strip_prefix("global::").unwrap_or(name);
    match name.find('<') {
        Some(i) => name[..i].trim_end(),
        None => name,
    }
}

/// Number of top-level type arguments in `Name<A, B<C, D>>`, `None` when
/// the name carries no argument list.
fn generic_arity(name: &str) -> Option<usize> {
    let start = name.find('<')?;
    let mut depth = 0usize;
    let mut arity = 1;
    for c in name[start..].chars() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 1 => arity += 1,
            _ => {}
        }
    }
    Some(arity)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    #[default]
    Class,
    Interface,
    Struct,
    Enum,
}

/// One constant attribute argument.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ArgValue {
    Bool(bool),
    Int(i64),
    Str(String),
    Type {
        #[serde(rename = "type")]
        ty: String,
    },
    /// Anything else (floats, null, arrays). Only foreign attributes carry
    /// these; every accessor returns `None` for it.
    Other(serde_json::Value),
}

impl ArgValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::Str(s) => Some(s),
            _ => None,
        }
    }
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ArgValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ArgValue::Int(i) => Some(*i),
            _ => None,
        }
    }
    pub fn as_type(&self) -> Option<&str> {
        match self {
            ArgValue::Type { ty } => Some(ty),
            _ => None,
        }
    }
}

/// Raw attribute occurrence: name plus positional and named constant arguments.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AttributeData {
    pub name: String,
    #[serde(default)]
    pub args: Vec<ArgValue>,
    #[serde(default)]
    pub named: BTreeMap<String, ArgValue>,
    #[serde(default)]
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TypeParam {
    pub name: String,
    #[serde(default)]
    pub constraints: Vec<TypeRef>,
}

/// Field or property declaration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MemberDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default, rename = "static")]
    pub is_static: bool,
    #[serde(default, rename = "readonly")]
    pub is_readonly: bool,
    /// Compiler synthesised (backing fields and the like).
    #[serde(default)]
    pub implicit: bool,
    #[serde(default)]
    pub attributes: Vec<AttributeData>,
    #[serde(default)]
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ParamDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MethodDecl {
    pub name: String,
    #[serde(default)]
    pub params: Vec<ParamDecl>,
    #[serde(default, rename = "static")]
    pub is_static: bool,
    #[serde(default)]
    pub attributes: Vec<AttributeData>,
    #[serde(default)]
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TypeDecl {
    pub name: String,
    #[serde(default)]
    pub namespace: Option<String>,
    /// Dotted path of the enclosing type(s), without the namespace.
    #[serde(default)]
    pub nested_in: Option<String>,
    #[serde(default)]
    pub kind: TypeKind,
    #[serde(default)]
    pub base: Option<TypeRef>,
    #[serde(default)]
    pub interfaces: Vec<TypeRef>,
    #[serde(default)]
    pub type_params: Vec<TypeParam>,
    #[serde(default)]
    pub attributes: Vec<AttributeData>,
    #[serde(default)]
    pub fields: Vec<MemberDecl>,
    #[serde(default)]
    pub properties: Vec<MemberDecl>,
    #[serde(default)]
    pub methods: Vec<MethodDecl>,
    #[serde(default)]
    pub location: Location,
}

impl TypeDecl {
    pub fn full_name(&self) -> String {
        let mut out = String::new();
        for part in [self.namespace.as_deref(), self.nested_in.as_deref()]
            .into_iter()
            .flatten()
            .filter(|p| !p.is_empty())
        {
            out.push_str(part);
            out.push('.');
        }
        out.push_str(&self.name);
        out
    }

    /// Index key: full name, plus `` `N `` for a generic definition, so
    /// `Box` and `Box<T>` can share a namespace.
    pub fn metadata_name(&self) -> String {
        let full = self.full_name();
        match self.type_params.len() {
            0 => full,
            n => format!("{full}`{n}"),
        }
    }

    pub fn type_param(&self, name: &str) -> Option<&TypeParam> {
        self.type_params.iter().find(|p| p.name == name)
    }

    /// `Name` or `Name<T, U>`.
    pub fn declared_name(&self) -> String {
        if self.type_params.is_empty() {
            return self.name.clone();
        }
        let params: Vec<&str> = self.type_params.iter().map(|p| p.name.as_str()).collect();
        format!("{}<{}>", self.name, params.join(", "))
    }
}

/// Class declaration found by the syntax walk, by full name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClassSyntax {
    pub name: String,
    #[serde(default)]
    pub location: Location,
}

/// Index of a type inside its [`Compilation`]. Cheap lookup key shared by
/// every addition that targets the type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(pub usize);

#[derive(Debug)]
pub struct Compilation {
    types: Vec<TypeDecl>,
    classes: Vec<ClassSyntax>,
    /// Keyed by [`TypeDecl::metadata_name`].
    index: HashMap<String, ClassId>,
    /// Full name without arity to every definition carrying it.
    by_name: HashMap<String, SmallVec<[ClassId; 1]>>,
}

impl Compilation {
    pub fn new(types: Vec<TypeDecl>, classes: Vec<ClassSyntax>) -> Result<Self> {
        let mut index = HashMap::with_capacity(types.len());
        let mut by_name: HashMap<String, SmallVec<[ClassId; 1]>> = HashMap::new();
        for (i, t) in types.iter().enumerate() {
            let key = t.metadata_name();
            if index.insert(key.clone(), ClassId(i)).is_some() {
                return Err(GenError::DuplicateType(key));
            }
            by_name.entry(t.full_name()).or_default().push(ClassId(i));
        }
        Ok(Self {
            types,
            classes,
            index,
            by_name,
        })
    }

    pub fn types(&self) -> &[TypeDecl] {
        &self.types
    }

    pub fn classes(&self) -> &[ClassSyntax] {
        &self.classes
    }

    pub fn get(&self, id: ClassId) -> &TypeDecl {
        &self.types[id.0]
    }

    /// Accepts `Ns.Box`, `Ns.Box<int>`, ``Ns.Box`1`` and `global::` forms.
    /// A bare name prefers the non-generic definition and otherwise matches
    /// a generic one only when it is the sole definition with that name.
    pub fn lookup(&self, name: &str) -> Option<ClassId> {
        let name = name.strip_prefix("global::").unwrap_or(name);
        if let Some(id) = self.index.get(name) {
            return Some(*id);
        }
        let base = definition_name(name);
        match generic_arity(name) {
            Some(n) => self.index.get(&format!("{base}`{n}")).copied(),
            None => match self.by_name.get(base).map(|ids| ids.as_slice()) {
                Some([only]) => Some(*only),
                _ => None,
            },
        }
    }

    pub fn resolve(&self, ty: &TypeRef) -> Option<ClassId> {
        self.lookup(ty.name())
    }

    /// True when `ty` is `target` or reaches it through base classes or
    /// implemented interfaces.
    pub fn derives_from(&self, ty: ClassId, target: ClassId) -> bool {
        let mut seen: HashSet<ClassId> = HashSet::new();
        let mut pending: SmallVec<[ClassId; 8]> = SmallVec::new();
        pending.push(ty);
        while let Some(cur) = pending.pop() {
            if cur == target {
                return true;
            }
            if !seen.insert(cur) {
                continue;
            }
            let decl = self.get(cur);
            for parent in decl.base.iter().chain(decl.interfaces.iter()) {
                if let Some(id) = self.resolve(parent) {
                    pending.push(id);
                }
            }
        }
        false
    }

    /// Display form for generated code: `global::`-qualified for known
    /// types, verbatim otherwise (keywords, type parameters).
    pub fn display(&self, ty: &TypeRef) -> String {
        match self.resolve(ty) {
            Some(id) => {
                let args = &ty.name()[ty.name().find('<').unwrap_or(ty.name().len())..];
                format!("global::{}{}", self.get(id).full_name(), args)
            }
            None => ty.name().to_string(),
        }
    }
}

/// Snapshot file as written by the driver: the compilation plus optional
/// generator settings.
#[derive(Debug, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub types: Vec<TypeDecl>,
    #[serde(default)]
    pub classes: Vec<ClassSyntax>,
    #[serde(default)]
    pub config: GenConfig,
}

impl Snapshot {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn into_parts(self) -> Result<(Compilation, GenConfig)> {
        let compilation = Compilation::new(self.types, self.classes)?;
        Ok((compilation, self.config))
    }
}
