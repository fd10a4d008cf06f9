use super::Contribution;
use crate::source::Fragment;

/// Enum with one entry per static readonly field, plus a lookup back to
/// the field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorEnum {
    /// Declared class name, type parameters included.
    pub class_name: String,
    pub enum_name: String,
    /// Static readonly fields, declaration order.
    pub fields: Vec<String>,
}

impl Contribution for SelectorEnum {
    fn declaration(&self) -> Option<Fragment> {
        let e = &self.enum_name;
        Some(Fragment::build(|g| {
            g.line(format!("public static {} Get({e} key)", self.class_name));
            g.block(|g| {
                g.line("switch (key)");
                g.block(|g| {
                    for f in &self.fields {
                        g.line(format!("case {e}.{f}: return {f};"));
                    }
                });
                g.line("throw new ArgumentOutOfRangeException(\"key\");");
            });
        }))
    }

    fn outside_class_statement(&self) -> Option<Fragment> {
        let e = &self.enum_name;
        let class = &self.class_name;
        Some(Fragment::build(|g| {
            g.line(format!("public enum {e}"));
            g.block(|g| {
                for f in &self.fields {
                    g.line(format!("{f},"));
                }
            });
            g.blank();
            g.line(format!("public static class {e}Extensions"));
            g.block(|g| {
                g.line(format!(
                    "public static {class} GetData(this {e} v) => {class}.Get(v);"
                ));
            });
        }))
    }
}
