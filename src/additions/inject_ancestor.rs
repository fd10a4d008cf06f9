use super::Contribution;
use crate::source::{string_literal, Fragment};

/// Assign the nearest ancestor with a given name, or one of its members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectAncestor {
    pub member_name: String,
    pub ancestor_name: String,
    /// Ancestor type as it appears in generated code.
    pub ancestor_type: String,
    /// Member of the ancestor to project; `None` assigns the ancestor itself.
    pub source_member: Option<String>,
}

impl Contribution for InjectAncestor {
    fn lifecycle_statement(&self) -> Option<Fragment> {
        let name = string_literal(&self.ancestor_name);
        let no_parent = string_literal(&format!(
            "FindParent(\"{}\") found no parent.",
            self.ancestor_name
        ));
        let wrong_type = string_literal(&format!(
            "FindParent(\"{}\") is not of type \"{}\".",
            self.ancestor_name, self.ancestor_type
        ));
        Some(Fragment::build(|g| {
            g.block(|g| {
                g.line(format!(
                    "var ancestor = (FindParent({name}) ?? throw new Exception({no_parent}))"
                ));
                g.indented(|g| {
                    g.line(format!(
                        "as {} ?? throw new Exception({wrong_type});",
                        self.ancestor_type
                    ))
                });
                match &self.source_member {
                    Some(src) => g.line(format!("{} = ancestor.{src};", self.member_name)),
                    None => g.line(format!("{} = ancestor;", self.member_name)),
                }
            });
        }))
    }
}
