mod grievance_service;
mod response_service;

pub use grievance_service::{GrievanceService, NewGrievance, SearchScope};
pub use response_service::ResponseService;
