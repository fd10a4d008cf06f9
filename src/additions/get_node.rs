use super::{write_member_null_check, Contribution, FetchTarget};
use crate::source::{string_literal, Fragment};

/// Fetch by node path, optionally reading a property off the fetched node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetNode {
    pub target: FetchTarget,
    pub property: Option<String>,
}

impl GetNode {
    pub fn new(target: FetchTarget, property: Option<String>) -> Self {
        Self { target, property }
    }

    pub fn path_property_name(&self) -> String {
        format!("{}Path", self.target.config_name)
    }
}

impl Contribution for GetNode {
    fn declaration(&self) -> Option<Fragment> {
        let t = &self.target;
        let prop = self.path_property_name();
        Some(Fragment::build(|g| {
            g.line(format!(
                "{}public NodePath {prop} {{ get; set; }}",
                t.export_marker()
            ));
            if let Some(default) = &t.default {
                g.indented(|g| g.line(format!("= {};", string_literal(default))));
            }
        }))
    }

    fn lifecycle_statement(&self) -> Option<Fragment> {
        let t = &self.target;
        let prop = self.path_property_name();
        Some(Fragment::build(|g| {
            g.line(format!("if ({prop} != null)"));
            g.block(|g| match &self.property {
                Some(p) => g.line(format!(
                    "{} = ({})GetNodeOrNull({prop})?.Get({});",
                    t.member_name,
                    t.member_type,
                    string_literal(p)
                )),
                None => g.line(format!(
                    "{} = GetNodeOrNull<{}>({prop});",
                    t.member_name, t.member_type
                )),
            });
            if !t.or_null {
                write_member_null_check(g, &t.member_name, &prop);
            }
        }))
    }
}
