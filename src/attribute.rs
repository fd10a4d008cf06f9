//! Annotation surface: raw [`AttributeData`] parsed into a closed set of
//! kinds, each with its own argument payload.
use crate::member::MemberDescriptor;
use crate::model::{AttributeData, ClassId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationKind {
    OnReadyGet,
    OnReadyFind,
    InjectAncestorValue,
    OnReady,
    GenerateDataSelectorEnum,
}

/// Declaration kind an annotation may be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Member,
    Method,
    Class,
}

impl AnnotationKind {
    /// Accepts `OnReadyGet`, `OnReadyGetAttribute` and namespace-qualified forms.
    pub fn from_attribute_name(name: &str) -> Option<Self> {
        let last = name.rsplit('.').next().unwrap_or(name);
        let short = last.strip_suffix("Attribute").unwrap_or(last);
        match short {
            "OnReadyGet" => Some(AnnotationKind::OnReadyGet),
            "OnReadyFind" => Some(AnnotationKind::OnReadyFind),
            "InjectAncestorValue" => Some(AnnotationKind::InjectAncestorValue),
            "OnReady" => Some(AnnotationKind::OnReady),
            "GenerateDataSelectorEnum" => Some(AnnotationKind::GenerateDataSelectorEnum),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AnnotationKind::OnReadyGet => "OnReadyGet",
            AnnotationKind::OnReadyFind => "OnReadyFind",
            AnnotationKind::InjectAncestorValue => "InjectAncestorValue",
            AnnotationKind::OnReady => "OnReady",
            AnnotationKind::GenerateDataSelectorEnum => "GenerateDataSelectorEnum",
        }
    }

    pub fn target(&self) -> Target {
        match self {
            AnnotationKind::OnReadyGet
            | AnnotationKind::OnReadyFind
            | AnnotationKind::InjectAncestorValue => Target::Member,
            AnnotationKind::OnReady => Target::Method,
            AnnotationKind::GenerateDataSelectorEnum => Target::Class,
        }
    }
}

/// Arguments shared by every fetch-style annotation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchArgs {
    /// Default path, pattern or resource id. Empty strings count as unset.
    pub default: Option<String>,
    pub or_null: bool,
    /// Suppresses the editor export marker on the generated declaration.
    pub private: bool,
    /// Sub-property to read off the fetched node.
    pub property: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindArgs {
    pub fetch: FetchArgs,
    pub recursive: bool,
    pub owned: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    Get(FetchArgs),
    Find(FindArgs),
    InjectAncestor {
        ancestor_type: Option<String>,
        ancestor_name: Option<String>,
    },
    OnReady {
        order: i32,
    },
    DataSelectorEnum {
        name: Option<String>,
    },
}

impl Annotation {
    /// `None` for attributes this generator does not own. Arguments of the
    /// wrong value type are skipped and the slot keeps its default.
    pub fn parse(attr: &AttributeData) -> Option<Annotation> {
        let kind = AnnotationKind::from_attribute_name(&attr.name)?;
        let ann = match kind {
            AnnotationKind::OnReadyGet => Annotation::Get(parse_fetch(attr)),
            AnnotationKind::OnReadyFind => {
                let named_bool = |key: &str| attr.named.get(key).and_then(|v| v.as_bool());
                Annotation::Find(FindArgs {
                    fetch: parse_fetch(attr),
                    recursive: named_bool("Recursive").unwrap_or(true),
                    owned: named_bool("Owned").unwrap_or(true),
                })
            }
            AnnotationKind::InjectAncestorValue => Annotation::InjectAncestor {
                ancestor_type: attr
                    .args
                    .first()
                    .and_then(|v| v.as_type())
                    .map(str::to_string),
                ancestor_name: attr
                    .args
                    .get(1)
                    .and_then(|v| v.as_str())
                    .map(str::to_string),
            },
            AnnotationKind::OnReady => Annotation::OnReady {
                order: attr
                    .named
                    .get("Order")
                    .and_then(|v| v.as_int())
                    .and_then(|i| i32::try_from(i).ok())
                    .unwrap_or(0),
            },
            AnnotationKind::GenerateDataSelectorEnum => Annotation::DataSelectorEnum {
                name: attr
                    .args
                    .iter()
                    .filter_map(|v| v.as_str())
                    .last()
                    .filter(|s| !s.is_empty())
                    .map(str::to_string),
            },
        };
        Some(ann)
    }

    pub fn kind(&self) -> AnnotationKind {
        match self {
            Annotation::Get(_) => AnnotationKind::OnReadyGet,
            Annotation::Find(_) => AnnotationKind::OnReadyFind,
            Annotation::InjectAncestor { .. } => AnnotationKind::InjectAncestorValue,
            Annotation::OnReady { .. } => AnnotationKind::OnReady,
            Annotation::DataSelectorEnum { .. } => AnnotationKind::GenerateDataSelectorEnum,
        }
    }
}

fn parse_fetch(attr: &AttributeData) -> FetchArgs {
    let mut args = FetchArgs::default();
    // 位置参数：最后一个字符串即默认值
    if let Some(s) = attr.args.iter().filter_map(|v| v.as_str()).last() {
        args.default = non_empty(s);
    }
    for (key, value) in &attr.named {
        match key.as_str() {
            "Default" => {
                if let Some(s) = value.as_str() {
                    args.default = non_empty(s);
                }
            }
            "OrNull" => {
                if let Some(b) = value.as_bool() {
                    args.or_null = b;
                }
            }
            "Private" => {
                if let Some(b) = value.as_bool() {
                    args.private = b;
                }
            }
            "Property" => {
                if let Some(s) = value.as_str() {
                    args.property = non_empty(s);
                }
            }
            _ => {}
        }
    }
    args
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

/// One annotation occurrence and the class that owns it.
#[derive(Debug, Clone)]
pub struct AttributeSite<'a> {
    pub class: ClassId,
    pub attribute: &'a AttributeData,
    pub annotation: Annotation,
}

/// A field or property together with one of its annotations.
#[derive(Debug, Clone)]
pub struct MemberAttributeSite<'a> {
    pub member: MemberDescriptor,
    pub site: AttributeSite<'a>,
}
