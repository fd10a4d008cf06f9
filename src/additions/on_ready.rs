use super::Contribution;
use crate::source::Fragment;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnReadyCall {
    pub method: String,
}

impl Contribution for OnReadyCall {
    fn lifecycle_statement(&self) -> Option<Fragment> {
        Some(Fragment::build(|g| g.line(format!("{}();", self.method))))
    }
}
