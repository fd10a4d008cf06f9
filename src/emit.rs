//! Aggregation and rendering: one partial-class unit per target class.
use std::collections::BTreeMap;

use serde::Serialize;

use crate::additions::Addition;
use crate::config::GenConfig;
use crate::model::{ClassId, Compilation, TypeDecl};
use crate::source::{Fragment, SourceBuilder};

/// All additions that target one class, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassGroup {
    pub class: ClassId,
    pub additions: Vec<Addition>,
}

impl ClassGroup {
    /// Statement order: `order` ascending, then discovery order.
    pub fn ordered(&self) -> Vec<&Addition> {
        let mut v: Vec<&Addition> = self.additions.iter().collect();
        v.sort_by_key(|a| (a.order, a.seq));
        v
    }
}

/// Groups by class. Output is independent of input order: groups follow
/// class index, members of a group follow discovery index.
pub fn group_by_class(additions: Vec<Addition>) -> Vec<ClassGroup> {
    let mut map: BTreeMap<ClassId, Vec<Addition>> = BTreeMap::new();
    for a in additions {
        map.entry(a.class).or_default().push(a);
    }
    map.into_iter()
        .map(|(class, mut additions)| {
            additions.sort_by_key(|a| a.seq);
            ClassGroup { class, additions }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedSource {
    /// Stable compilation-unit name derived from namespace and class name.
    pub hint_name: String,
    pub text: String,
}

/// `Partial_<ns with . as _>_<Name>`, with `` `N `` appended for a generic
/// class so `Box` and `Box<T>` never share a unit.
pub fn hint_name(class: &TypeDecl) -> String {
    let ns = class.namespace.as_deref().unwrap_or("").replace('.', "_");
    match class.type_params.len() {
        0 => format!("Partial_{}_{}", ns, class.name),
        n => format!("Partial_{}_{}`{}", ns, class.name, n),
    }
}

pub struct Emitter<'a> {
    compilation: &'a Compilation,
    config: &'a GenConfig,
}

impl<'a> Emitter<'a> {
    pub fn new(compilation: &'a Compilation, config: &'a GenConfig) -> Self {
        Self {
            compilation,
            config,
        }
    }

    pub fn emit(&self, group: &ClassGroup) -> GeneratedSource {
        let class = self.compilation.get(group.class);
        let mut g = SourceBuilder::new();
        if !self.config.header.is_empty() {
            g.line(&self.config.header);
        }
        for u in &self.config.usings {
            g.line(format!("using {u};"));
        }
        g.blank();

        let outside: Vec<Fragment> = group
            .additions
            .iter()
            .filter_map(Addition::outside_class_statement)
            .collect();

        g.namespace_block(class.namespace.as_deref(), |g| {
            g.line(format!("public partial class {}", class.declared_name()));
            g.block(|g| self.write_class_body(g, class, group));
            for frag in &outside {
                g.blank();
                g.fragment(frag);
            }
        });

        tracing::debug!(
            class = %class.full_name(),
            additions = group.additions.len(),
            "emitted partial class"
        );
        GeneratedSource {
            hint_name: hint_name(class),
            text: g.finish(),
        }
    }

    fn write_class_body(&self, g: &mut SourceBuilder, class: &TypeDecl, group: &ClassGroup) {
        let mut wrote_any = false;
        for frag in group.additions.iter().filter_map(Addition::declaration) {
            if wrote_any {
                g.blank();
            }
            g.fragment(&frag);
            wrote_any = true;
        }

        let ordered = group.ordered();
        let ctor: Vec<Fragment> = ordered
            .iter()
            .filter_map(|a| a.constructor_statement())
            .collect();
        if !ctor.is_empty() {
            if wrote_any {
                g.blank();
            }
            g.line(format!("public {}()", class.name));
            g.block(|g| {
                for frag in &ctor {
                    g.fragment(frag);
                }
                g.line("Constructor();");
            });
            g.blank();
            g.line("partial void Constructor();");
            wrote_any = true;
        }

        let lifecycle: Vec<Fragment> = ordered
            .iter()
            .filter_map(|a| a.lifecycle_statement())
            .collect();
        if !lifecycle.is_empty() {
            if wrote_any {
                g.blank();
            }
            let method = &self.config.lifecycle_method;
            g.line(format!("public override void {method}()"));
            g.block(|g| {
                g.line(format!("base.{method}();"));
                for frag in &lifecycle {
                    g.blank();
                    g.fragment(frag);
                }
            });
        }
    }
}
