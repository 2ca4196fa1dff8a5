use serde::Deserialize;

use crate::features::grievances::models::GrievanceStatus;

/// The staff detail page posts one of two forms, told apart by which submit
/// button (`update_status` or `add_response`) is present
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StaffActionForm {
    pub update_status: Option<String>,
    pub add_response: Option<String>,
    pub status: Option<String>,
    pub response: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaffAction {
    /// Status update with the raw posted value, if it names a known status
    UpdateStatus(Option<GrievanceStatus>),
    AddResponse(String),
    /// Neither button present
    None,
}

impl StaffActionForm {
    pub fn action(&self) -> StaffAction {
        if self.update_status.is_some() {
            StaffAction::UpdateStatus(
                self.status
                    .as_deref()
                    .and_then(|s| s.trim().parse::<GrievanceStatus>().ok()),
            )
        } else if self.add_response.is_some() {
            StaffAction::AddResponse(self.response.clone().unwrap_or_default())
        } else {
            StaffAction::None
        }
    }
}
