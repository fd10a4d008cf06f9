use super::{write_member_null_check, Contribution, FetchTarget};
use crate::source::{string_literal, Fragment, SourceBuilder};

/// Load an asset by identifier, tracking whether the editor set it already.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadResource {
    pub target: FetchTarget,
    /// Expression that is true inside the design-time tool.
    pub editor_hint: String,
}

impl LoadResource {
    pub fn resource_property_name(&self) -> String {
        format!("{}Resource", self.target.config_name)
    }

    fn set_flag(&self) -> String {
        format!("_hasBeenSet{}", self.target.member_name)
    }

    fn write_assignment(&self, g: &mut SourceBuilder, default: &str) {
        let t = &self.target;
        g.line(format!(
            "{} = GD.Load<{}>({});",
            t.member_name,
            t.member_type,
            string_literal(default)
        ));
    }
}

impl Contribution for LoadResource {
    fn declaration(&self) -> Option<Fragment> {
        let t = &self.target;
        let flag = self.set_flag();
        Some(Fragment::build(|g| {
            g.line(format!(
                "{}public {} {}",
                t.export_marker(),
                t.member_type,
                self.resource_property_name()
            ));
            g.block(|g| {
                g.line(format!("get => {};", t.member_name));
                g.line(format!(
                    "set {{ {flag} = true; {} = value; }}",
                    t.member_name
                ));
            });
            g.line(format!("private bool {flag};"));
        }))
    }

    fn constructor_statement(&self) -> Option<Fragment> {
        let default = self.target.default.as_deref()?;
        Some(Fragment::build(|g| {
            g.line(format!("if ({})", self.editor_hint));
            g.block(|g| self.write_assignment(g, default));
        }))
    }

    fn lifecycle_statement(&self) -> Option<Fragment> {
        let t = &self.target;
        if t.default.is_none() && t.or_null {
            return None;
        }
        Some(Fragment::build(|g| {
            if let Some(default) = &t.default {
                g.line(format!("if (!{})", self.set_flag()));
                g.block(|g| self.write_assignment(g, default));
            }
            if !t.or_null {
                write_member_null_check(g, &t.member_name, &self.resource_property_name());
            }
        }))
    }
}
