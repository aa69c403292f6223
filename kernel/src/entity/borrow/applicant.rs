use destructure::Destructure;
use serde::{Deserialize, Serialize};
use vodca::References;

/// Contact details filled in on the request form.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize, References, Destructure)]
pub struct Applicant {
    name: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    student_id: Option<String>,
    department: Option<String>,
    reason: Option<String>,
    remark: Option<String>,
}

impl Applicant {
    pub fn new(
        name: Option<String>,
        phone: Option<String>,
        email: Option<String>,
        student_id: Option<String>,
        department: Option<String>,
        reason: Option<String>,
        remark: Option<String>,
    ) -> Self {
        Self {
            name,
            phone,
            email,
            student_id,
            department,
            reason,
            remark,
        }
    }
}
