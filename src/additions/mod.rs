//! Codegen strategies. Each strategy contributes up to four fragments to
//! its target class; the emitter decides where they land.
mod find_node;
mod get_node;
mod inject_ancestor;
mod load_resource;
mod on_ready;
mod selector_enum;

pub use find_node::FindNode;
pub use get_node::GetNode;
pub use inject_ancestor::InjectAncestor;
pub use load_resource::LoadResource;
pub use on_ready::OnReadyCall;
pub use selector_enum::SelectorEnum;

use crate::attribute::FetchArgs;
use crate::member::MemberDescriptor;
use crate::model::ClassId;
use crate::source::{Fragment, SourceBuilder};

/// Code contribution hooks. Absent means "nothing for that section".
pub trait Contribution {
    fn declaration(&self) -> Option<Fragment> {
        None
    }
    fn constructor_statement(&self) -> Option<Fragment> {
        None
    }
    fn lifecycle_statement(&self) -> Option<Fragment> {
        None
    }
    fn outside_class_statement(&self) -> Option<Fragment> {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    GetNode(GetNode),
    LoadResource(LoadResource),
    FindNode(FindNode),
    InjectAncestor(InjectAncestor),
    OnReady(OnReadyCall),
    SelectorEnum(SelectorEnum),
}

impl Strategy {
    /// Generated editor-facing member (`XPath`, `XMask`, `XResource`).
    /// Two strategies of one class must never share it.
    pub fn companion_name(&self) -> Option<String> {
        match self {
            Strategy::GetNode(s) => Some(s.path_property_name()),
            Strategy::LoadResource(s) => Some(s.resource_property_name()),
            Strategy::FindNode(s) => Some(s.mask_property_name()),
            Strategy::InjectAncestor(_) | Strategy::OnReady(_) | Strategy::SelectorEnum(_) => None,
        }
    }

    fn contribution(&self) -> &dyn Contribution {
        match self {
            Strategy::GetNode(s) => s,
            Strategy::LoadResource(s) => s,
            Strategy::FindNode(s) => s,
            Strategy::InjectAncestor(s) => s,
            Strategy::OnReady(s) => s,
            Strategy::SelectorEnum(s) => s,
        }
    }
}

/// One self-contained contribution for a target class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Addition {
    /// Lookup key of the target class; many additions share it.
    pub class: ClassId,
    /// Primary sort key for constructor and lifecycle statements.
    pub order: i32,
    /// Discovery index, the tie-break after `order`.
    pub seq: usize,
    pub strategy: Strategy,
}

impl Addition {
    pub fn new(class: ClassId, seq: usize, strategy: Strategy) -> Self {
        Self {
            class,
            order: 0,
            seq,
            strategy,
        }
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    pub fn declaration(&self) -> Option<Fragment> {
        self.strategy.contribution().declaration()
    }
    pub fn constructor_statement(&self) -> Option<Fragment> {
        self.strategy.contribution().constructor_statement()
    }
    pub fn lifecycle_statement(&self) -> Option<Fragment> {
        self.strategy.contribution().lifecycle_statement()
    }
    pub fn outside_class_statement(&self) -> Option<Fragment> {
        self.strategy.contribution().outside_class_statement()
    }
}

/// Member-side settings shared by the fetch strategies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTarget {
    pub member_name: String,
    /// Member type as it must appear in generated code.
    pub member_type: String,
    /// Config name without the strategy suffix.
    pub config_name: String,
    pub default: Option<String>,
    pub or_null: bool,
    pub private: bool,
}

impl FetchTarget {
    pub fn new(member: &MemberDescriptor, member_type: String, args: &FetchArgs) -> Self {
        Self {
            member_name: member.name.clone(),
            member_type,
            config_name: member.config_name(),
            default: args.default.clone(),
            or_null: args.or_null,
            private: args.private,
        }
    }

    fn export_marker(&self) -> &'static str {
        if self.private {
            ""
        } else {
            "[Export] "
        }
    }
}

/// Runtime failure raised when a non-nullable member ends up null.
pub(crate) fn write_member_null_check(g: &mut SourceBuilder, member: &str, config_prop: &str) {
    g.line(format!("if ({member} == null)"));
    g.block(|g| {
        g.line(format!(
            "throw new NullReferenceException($\"Member '{member}' is null in '{{Name}}' '{{this}}'. \
             Ensure '{config_prop}' is set correctly, or set OrNull = true on the attribute to allow null.\");"
        ));
    });
}
