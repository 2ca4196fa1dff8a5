//! Access checks over an explicit principal.
//!
//! Owners and staff may view and respond to a grievance; only staff may change
//! its status.

use crate::features::auth::model::AuthenticatedUser;
use crate::features::grievances::models::GrievanceView;

pub fn can_view(user: &AuthenticatedUser, grievance: &GrievanceView) -> bool {
    user.is_staff || user.user_id == grievance.user_id
}

pub fn can_respond(user: &AuthenticatedUser, grievance: &GrievanceView) -> bool {
    can_view(user, grievance)
}

pub fn can_set_status(user: &AuthenticatedUser) -> bool {
    user.is_staff
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{create_citizen_user, create_staff_user, grievance_view};

    #[test]
    fn test_owner_can_view_and_respond() {
        let owner = create_citizen_user();
        let grievance = grievance_view(owner.user_id);

        assert!(can_view(&owner, &grievance));
        assert!(can_respond(&owner, &grievance));
        assert!(!can_set_status(&owner));
    }

    #[test]
    fn test_staff_can_do_everything() {
        let staff = create_staff_user();
        let grievance = grievance_view(create_citizen_user().user_id);

        assert!(can_view(&staff, &grievance));
        assert!(can_respond(&staff, &grievance));
        assert!(can_set_status(&staff));
    }

    #[test]
    fn test_other_citizen_is_denied() {
        let grievance = grievance_view(create_citizen_user().user_id);
        let other = create_citizen_user();

        assert!(!can_view(&other, &grievance));
        assert!(!can_respond(&other, &grievance));
        assert!(!can_set_status(&other));
    }
}
