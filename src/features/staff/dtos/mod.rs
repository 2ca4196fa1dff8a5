mod staff_dto;

pub use staff_dto::{StaffAction, StaffActionForm};
