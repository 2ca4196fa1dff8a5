mod grievance;
mod grievance_response;
mod status;

pub use grievance::{Grievance, GrievanceView};
pub use grievance_response::{GrievanceResponse, ResponseView};
pub use status::{GrievanceStatus, StatusChoice};
