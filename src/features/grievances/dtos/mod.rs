mod grievance_dto;

pub use grievance_dto::{
    AttachmentUpload, GrievanceFilter, GrievanceListQuery, ResponseForm, StatusFilter,
    SubmitGrievanceForm,
};
