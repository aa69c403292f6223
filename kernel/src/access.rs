use std::collections::HashSet;

use error_stack::Report;

use crate::entity::OpenId;
use crate::KernelError;

/// Open ids allowed to review, lend and take back requests.
#[derive(Debug, Clone, Default)]
pub struct Administrators(HashSet<OpenId>);

impl Administrators {
    pub fn new(open_ids: impl IntoIterator<Item = OpenId>) -> Self {
        Self(open_ids.into_iter().collect())
    }

    pub fn contains(&self, open_id: &OpenId) -> bool {
        self.0.contains(open_id)
    }

    pub fn ensure(&self, actor: &OpenId) -> error_stack::Result<(), KernelError> {
        if self.contains(actor) {
            Ok(())
        } else {
            Err(Report::new(KernelError::Forbidden)
                .attach_printable(format!("{} is not an administrator", actor.as_ref())))
        }
    }
}

pub trait DependOnAdministrators: 'static + Sync + Send {
    fn administrators(&self) -> &Administrators;
}
