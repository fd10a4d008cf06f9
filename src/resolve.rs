//! Strategy resolution: turns annotated members into [`Addition`]s.
//!
//! Scan order is class attributes, then properties, fields, and methods,
//! each in declaration order, then attributes in declaration order. The
//! resulting discovery index is the tie-break the emitter sorts by.
use std::collections::hash_map::{Entry, HashMap};

use smallvec::SmallVec;

use crate::additions::{
    Addition, FetchTarget, FindNode, GetNode, InjectAncestor, LoadResource, OnReadyCall,
    SelectorEnum, Strategy,
};
use crate::attribute::{
    Annotation, AttributeSite, FetchArgs, FindArgs, MemberAttributeSite, Target,
};
use crate::config::GenConfig;
use crate::diagnostics::{self, Diagnostic, Diagnostics};
use crate::error::{GenError, Result};
use crate::member::MemberDescriptor;
use crate::model::{ClassId, Compilation, MemberDecl, MethodDecl, TypeDecl, TypeRef};

/// Well-known host types, looked up once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostTypes {
    pub node: ClassId,
    pub resource: ClassId,
}

impl HostTypes {
    pub fn resolve(compilation: &Compilation, config: &GenConfig) -> Result<Self> {
        let find = |name: &str| {
            compilation
                .lookup(name)
                .ok_or_else(|| GenError::MissingWellKnownType(name.to_string()))
        };
        Ok(Self {
            node: find(&config.node_type)?,
            resource: find(&config.resource_type)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Fetched from the live object graph by path.
    PathAddressable,
    /// Loaded from the asset store by identifier.
    ResourceLoadable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Is(Capability),
    Unsupported,
    Ambiguous,
}

/// Output of resolving one class.
#[derive(Debug, Default)]
pub struct Resolution {
    pub additions: Vec<Addition>,
    pub diagnostics: Diagnostics,
    /// Companion member name -> annotated member that claimed it.
    companions: HashMap<String, String>,
}

impl Resolution {
    fn push(&mut self, class: ClassId, order: i32, strategy: Strategy) {
        let seq = self.additions.len();
        self.additions
            .push(Addition::new(class, seq, strategy).with_order(order));
    }

    /// Like `push`, but the first member to claim a companion name keeps
    /// it; later claimants are reported and dropped.
    fn push_member(&mut self, class: ClassId, member: &MemberDescriptor, strategy: Strategy) {
        if let Some(name) = strategy.companion_name() {
            match self.companions.entry(name) {
                Entry::Occupied(e) => {
                    self.diagnostics.push(Diagnostic::error(
                        diagnostics::COMPANION_NAME_CLASH,
                        format!(
                            "{} would generate '{}', which {} already generates. Rename one of the members.",
                            member.name,
                            e.key(),
                            e.get()
                        ),
                        &member.location,
                    ));
                    return;
                }
                Entry::Vacant(e) => {
                    e.insert(member.name.clone());
                }
            }
        }
        self.push(class, 0, strategy);
    }
}

pub struct Resolver<'a> {
    compilation: &'a Compilation,
    host: HostTypes,
    config: &'a GenConfig,
}

impl<'a> Resolver<'a> {
    pub fn new(compilation: &'a Compilation, host: HostTypes, config: &'a GenConfig) -> Self {
        Self {
            compilation,
            host,
            config,
        }
    }

    /// Classifies `ty` as used inside `class`. A type parameter of `class`
    /// is classified through its constraint types.
    pub fn classify(&self, class: &TypeDecl, ty: &TypeRef) -> Classification {
        let candidates: SmallVec<[ClassId; 4]> = match class.type_param(ty.definition_name()) {
            Some(param) => param
                .constraints
                .iter()
                .filter_map(|c| self.compilation.resolve(c))
                .collect(),
            None => self.compilation.resolve(ty).into_iter().collect(),
        };
        let is = |target: ClassId| {
            candidates
                .iter()
                .any(|&c| self.compilation.derives_from(c, target))
        };
        match (is(self.host.node), is(self.host.resource)) {
            (true, false) => Classification::Is(Capability::PathAddressable),
            (false, true) => Classification::Is(Capability::ResourceLoadable),
            (false, false) => Classification::Unsupported,
            (true, true) => Classification::Ambiguous,
        }
    }

    pub fn resolve_class(&self, id: ClassId) -> Resolution {
        let class = self.compilation.get(id);
        let mut out = Resolution::default();

        for attr in &class.attributes {
            let Some(annotation) = Annotation::parse(attr) else {
                continue;
            };
            let site = AttributeSite {
                class: id,
                attribute: attr,
                annotation,
            };
            if self.check_target(&site, Target::Class, &class.name, &mut out) {
                self.resolve_class_site(class, site, &mut out);
            }
        }

        let members = class
            .properties
            .iter()
            .map(|d| (d, MemberDescriptor::property(d)))
            .chain(class.fields.iter().map(|d| (d, MemberDescriptor::field(d))));
        for (decl, member) in members {
            self.resolve_member_decl(id, class, decl, member, &mut out);
        }

        for method in &class.methods {
            self.resolve_method(id, method, &mut out);
        }

        tracing::debug!(
            class = %class.full_name(),
            additions = out.additions.len(),
            diagnostics = out.diagnostics.len(),
            "resolved class"
        );
        out
    }

    fn check_target(
        &self,
        site: &AttributeSite<'_>,
        actual: Target,
        name: &str,
        out: &mut Resolution,
    ) -> bool {
        let kind = site.annotation.kind();
        if kind.target() == actual {
            return true;
        }
        let what = match actual {
            Target::Member => "field or property",
            Target::Method => "method",
            Target::Class => "class",
        };
        out.diagnostics.push(Diagnostic::warning(
            diagnostics::MISPLACED_ANNOTATION,
            format!("[{}] cannot be applied to {what} '{name}'; ignored.", kind.name()),
            &site.attribute.location,
        ));
        false
    }

    fn resolve_member_decl(
        &self,
        id: ClassId,
        class: &TypeDecl,
        decl: &MemberDecl,
        member: MemberDescriptor,
        out: &mut Resolution,
    ) {
        for attr in &decl.attributes {
            let Some(annotation) = Annotation::parse(attr) else {
                continue;
            };
            let site = MemberAttributeSite {
                member: member.clone(),
                site: AttributeSite {
                    class: id,
                    attribute: attr,
                    annotation,
                },
            };
            if !self.check_target(&site.site, Target::Member, &member.name, out) {
                continue;
            }
            match site.site.annotation.clone() {
                Annotation::Get(args) => self.resolve_get(class, &site, &args, out),
                Annotation::Find(args) => self.resolve_find(class, &site, &args, out),
                Annotation::InjectAncestor {
                    ancestor_type,
                    ancestor_name,
                } => self.resolve_ancestor(
                    &site,
                    ancestor_type.as_deref(),
                    ancestor_name.as_deref(),
                    out,
                ),
                // check_target 已过滤
                Annotation::OnReady { .. } | Annotation::DataSelectorEnum { .. } => {}
            }
        }
    }

    fn resolve_method(&self, id: ClassId, method: &MethodDecl, out: &mut Resolution) {
        for attr in &method.attributes {
            let Some(annotation) = Annotation::parse(attr) else {
                continue;
            };
            let site = AttributeSite {
                class: id,
                attribute: attr,
                annotation,
            };
            if !self.check_target(&site, Target::Method, &method.name, out) {
                continue;
            }
            let Annotation::OnReady { order } = site.annotation else {
                continue;
            };
            if !method.params.is_empty() {
                out.diagnostics.push(Diagnostic::error(
                    diagnostics::ON_READY_SIGNATURE,
                    format!(
                        "[OnReady] method '{}' takes {} parameter(s); expected none.",
                        method.name,
                        method.params.len()
                    ),
                    &method.location,
                ));
                continue;
            }
            out.push(
                id,
                order,
                Strategy::OnReady(OnReadyCall {
                    method: method.name.clone(),
                }),
            );
        }
    }

    fn resolve_class_site(&self, class: &TypeDecl, site: AttributeSite<'_>, out: &mut Resolution) {
        let Annotation::DataSelectorEnum { name } = &site.annotation else {
            return;
        };
        let Some(enum_name) = name else {
            out.diagnostics.push(Diagnostic::error(
                diagnostics::ENUM_NAME_MISSING,
                format!(
                    "[GenerateDataSelectorEnum] on '{}' needs a non-empty enum name.",
                    class.name
                ),
                &site.attribute.location,
            ));
            return;
        };
        if !class.type_params.is_empty() {
            out.diagnostics.push(Diagnostic::error(
                diagnostics::ENUM_ON_GENERIC_CLASS,
                format!(
                    "[GenerateDataSelectorEnum] is not supported on generic class '{}'.",
                    class.declared_name()
                ),
                &site.attribute.location,
            ));
            return;
        }
        let fields = class
            .fields
            .iter()
            .filter(|f| f.is_static && f.is_readonly && !f.implicit)
            .map(|f| f.name.clone())
            .collect();
        out.push(
            site.class,
            0,
            Strategy::SelectorEnum(SelectorEnum {
                class_name: class.declared_name(),
                enum_name: enum_name.clone(),
                fields,
            }),
        );
    }

    fn fetch_target(&self, member: &MemberDescriptor, args: &FetchArgs) -> FetchTarget {
        FetchTarget::new(member, self.compilation.display(&member.ty), args)
    }

    fn resolve_get(
        &self,
        class: &TypeDecl,
        site: &MemberAttributeSite<'_>,
        args: &FetchArgs,
        out: &mut Resolution,
    ) {
        let member = &site.member;
        let target = self.fetch_target(member, args);
        // Property 总是按节点路径取值，不看成员类型
        if let Some(property) = &args.property {
            out.push_member(
                site.site.class,
                member,
                Strategy::GetNode(GetNode::new(target, Some(property.clone()))),
            );
            return;
        }
        let strategy = match self.classify(class, &member.ty) {
            Classification::Is(Capability::PathAddressable) => {
                Strategy::GetNode(GetNode::new(target, None))
            }
            Classification::Is(Capability::ResourceLoadable) => {
                Strategy::LoadResource(LoadResource {
                    target,
                    editor_hint: self.config.editor_hint.clone(),
                })
            }
            Classification::Unsupported => {
                out.diagnostics.push(Diagnostic::error(
                    diagnostics::UNSUPPORTED_MEMBER_TYPE,
                    format!(
                        "{} is not a supported type: {}. Expected a {} or {} subclass.",
                        member.name, member.ty, self.config.node_type, self.config.resource_type
                    ),
                    &member.location,
                ));
                return;
            }
            Classification::Ambiguous => {
                out.diagnostics.push(Diagnostic::error(
                    diagnostics::AMBIGUOUS_MEMBER_TYPE,
                    format!(
                        "{} has type {} which is both a {} and a {}; can't pick a fetch strategy.",
                        member.name, member.ty, self.config.node_type, self.config.resource_type
                    ),
                    &member.location,
                ));
                return;
            }
        };
        out.push_member(site.site.class, member, strategy);
    }

    fn resolve_find(
        &self,
        class: &TypeDecl,
        site: &MemberAttributeSite<'_>,
        args: &FindArgs,
        out: &mut Resolution,
    ) {
        let member = &site.member;
        if args.fetch.property.is_none()
            && self.classify(class, &member.ty) != Classification::Is(Capability::PathAddressable)
        {
            out.diagnostics.push(Diagnostic::error(
                diagnostics::FIND_REQUIRES_NODE,
                format!(
                    "{} is not a supported type for [OnReadyFind]: {}. Expected a {} subclass, or set Property.",
                    member.name, member.ty, self.config.node_type
                ),
                &member.location,
            ));
            return;
        }
        out.push_member(
            site.site.class,
            member,
            Strategy::FindNode(FindNode {
                target: self.fetch_target(member, &args.fetch),
                property: args.fetch.property.clone(),
                recursive: args.recursive,
                owned: args.owned,
            }),
        );
    }

    fn resolve_ancestor(
        &self,
        site: &MemberAttributeSite<'_>,
        ancestor_type: Option<&str>,
        ancestor_name: Option<&str>,
        out: &mut Resolution,
    ) {
        let member = &site.member;
        let member_type = self.compilation.resolve(&member.ty);
        let ancestor = match ancestor_type {
            Some(name) => self.compilation.lookup(name),
            None => member_type,
        };
        let Some(ancestor) = ancestor else {
            out.diagnostics.push(Diagnostic::error(
                diagnostics::UNRESOLVED_ANCESTOR_TYPE,
                format!(
                    "Can't resolve ancestor type '{}' for injected member {}.",
                    ancestor_type.unwrap_or(member.ty.name()),
                    member.name
                ),
                &member.location,
            ));
            return;
        };
        let decl = self.compilation.get(ancestor);
        let ancestor_full = decl.full_name();

        let mut source_member = None;
        if member_type != Some(ancestor) {
            // 需要从祖先中取出唯一一个类型匹配的成员
            let matches: SmallVec<[MemberDescriptor; 2]> =
                MemberDescriptor::all_of(&decl.properties, &decl.fields)
                    .into_iter()
                    .filter(|m| !m.implicit && self.is_assignable(&m.ty, &member.ty))
                    .collect();
            match matches.len() {
                0 => {
                    out.diagnostics.push(Diagnostic::error(
                        diagnostics::ANCESTOR_NO_MATCH,
                        format!(
                            "No field or property of type \"{}\" found in injection source \"{}\" for {}. Expected exactly one.",
                            member.ty, ancestor_full, member.name
                        ),
                        &member.location,
                    ));
                    return;
                }
                1 => source_member = Some(matches[0].name.clone()),
                _ => {
                    let names: Vec<&str> = matches.iter().map(|m| m.name.as_str()).collect();
                    out.diagnostics.push(Diagnostic::error(
                        diagnostics::ANCESTOR_MULTIPLE_MATCHES,
                        format!(
                            "Multiple members of type \"{}\" found in injection source \"{}\" for {}, but expected exactly one. Found: {}",
                            member.ty,
                            ancestor_full,
                            member.name,
                            names.join(", ")
                        ),
                        &member.location,
                    ));
                    return;
                }
            }
        }

        out.push(
            site.site.class,
            0,
            Strategy::InjectAncestor(InjectAncestor {
                member_name: member.name.clone(),
                ancestor_name: ancestor_name.unwrap_or(decl.name.as_str()).to_string(),
                ancestor_type: format!("global::{ancestor_full}"),
                source_member,
            }),
        );
    }

    /// `from` can be assigned to `to`: subtype for known types, exact
    /// name match otherwise (`int`, `string`).
    fn is_assignable(&self, from: &TypeRef, to: &TypeRef) -> bool {
        match (self.compilation.resolve(from), self.compilation.resolve(to)) {
            (Some(f), Some(t)) => self.compilation.derives_from(f, t),
            (None, None) => from.definition_name() == to.definition_name(),
            _ => false,
        }
    }
}
