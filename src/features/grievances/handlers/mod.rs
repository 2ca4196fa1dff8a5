mod grievance_handler;
mod submit_handler;

pub use grievance_handler::*;
pub use submit_handler::*;

use std::sync::Arc;

use crate::features::grievances::services::{GrievanceService, ResponseService};
use crate::features::taxonomy::TaxonomyService;

/// State for the citizen grievance handlers
#[derive(Clone)]
pub struct GrievanceState {
    pub grievances: Arc<GrievanceService>,
    pub responses: Arc<ResponseService>,
    pub taxonomy: Arc<TaxonomyService>,
}
