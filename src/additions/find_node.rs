use super::{write_member_null_check, Contribution, FetchTarget};
use crate::source::{string_literal, Fragment};

/// Search descendants by name pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindNode {
    pub target: FetchTarget,
    pub property: Option<String>,
    pub recursive: bool,
    pub owned: bool,
}

impl FindNode {
    pub fn mask_property_name(&self) -> String {
        format!("{}Mask", self.target.config_name)
    }

    fn find_call(&self, mask: &str) -> String {
        let mut call = format!("FindNode({mask}");
        if !self.recursive {
            call.push_str(", recursive: false");
        }
        if !self.owned {
            call.push_str(", owned: false");
        }
        call.push(')');
        call
    }
}

impl Contribution for FindNode {
    fn declaration(&self) -> Option<Fragment> {
        let t = &self.target;
        let mask = self.mask_property_name();
        Some(Fragment::build(|g| {
            g.line(format!(
                "{}public string {mask} {{ get; set; }}",
                t.export_marker()
            ));
            // 未给默认值时初始化为空串，FindNode 照常执行
            let default = t.default.as_deref().unwrap_or("");
            g.indented(|g| g.line(format!("= {};", string_literal(default))));
        }))
    }

    fn lifecycle_statement(&self) -> Option<Fragment> {
        let t = &self.target;
        let mask = self.mask_property_name();
        let call = self.find_call(&mask);
        Some(Fragment::build(|g| {
            g.line(format!("if ({mask} != null)"));
            g.block(|g| match &self.property {
                // 属性值可能是值类型，只能强转
                Some(p) => g.line(format!(
                    "{} = ({}){call}?.Get({});",
                    t.member_name,
                    t.member_type,
                    string_literal(p)
                )),
                None => g.line(format!("{} = {call} as {};", t.member_name, t.member_type)),
            });
            if !t.or_null {
                write_member_null_check(g, &t.member_name, &mask);
            }
        }))
    }
}
