use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
};
use minijinja::context;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppForm;
use crate::features::auth::guards::RequireStaff;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::grievances::access;
use crate::features::grievances::dtos::GrievanceListQuery;
use crate::features::grievances::models::{GrievanceStatus, GrievanceView};
use crate::features::grievances::{GrievanceService, ResponseService, SearchScope};
use crate::features::staff::dtos::{StaffAction, StaffActionForm};
use crate::features::staff::services::DashboardService;
use crate::features::users::UserService;
use crate::shared::flash::{redirect_with_flash, Flash, IncomingFlash};
use crate::shared::page::HtmlPage;
use crate::shared::validation::FormErrors;

const DETAIL_TEMPLATE: &str = "staff/grievance_detail.html";

/// State for staff handlers
#[derive(Clone)]
pub struct StaffState {
    pub dashboard: Arc<DashboardService>,
    pub grievances: Arc<GrievanceService>,
    pub responses: Arc<ResponseService>,
    pub users: Arc<UserService>,
}

/// Totals per status
pub async fn dashboard(
    RequireStaff(user): RequireStaff,
    State(state): State<StaffState>,
    flash: IncomingFlash,
) -> Result<Response> {
    let counts = state.dashboard.status_counts().await?;

    HtmlPage::new("staff/dashboard.html")
        .viewer(Some(&user))
        .flash(flash)
        .render(context! { counts => counts })
}

/// Every grievance, filterable by status and text
pub async fn grievance_list(
    RequireStaff(user): RequireStaff,
    State(state): State<StaffState>,
    flash: IncomingFlash,
    Query(query): Query<GrievanceListQuery>,
) -> Result<Response> {
    let filter = query.filter();
    let page = state
        .grievances
        .search(SearchScope::All, &filter, query.page())
        .await?;

    HtmlPage::new("staff/grievance_list.html")
        .viewer(Some(&user))
        .flash(flash)
        .render(context! {
            page => page,
            filter_query => filter.query_suffix(),
            search => filter.text.unwrap_or_default(),
            status => filter.status.as_param(),
            status_choices => GrievanceStatus::choices(),
        })
}

/// Triage page: status form, thread and reply form
pub async fn grievance_detail(
    RequireStaff(user): RequireStaff,
    State(state): State<StaffState>,
    flash: IncomingFlash,
    Path(reference_id): Path<String>,
) -> Result<Response> {
    let grievance = state.grievances.get_by_reference(&reference_id).await?;

    render_detail(
        &state,
        &user,
        grievance,
        flash,
        StatusCode::OK,
        "",
        &FormErrors::new(),
    )
    .await
}

/// Handle either the status form or the reply form
pub async fn grievance_action(
    RequireStaff(user): RequireStaff,
    State(state): State<StaffState>,
    Path(reference_id): Path<String>,
    AppForm(form): AppForm<StaffActionForm>,
) -> Result<Response> {
    let grievance = state.grievances.get_by_reference(&reference_id).await?;
    let detail_url = format!("/staff/grievances/{}", grievance.reference_id);

    match form.action() {
        StaffAction::UpdateStatus(Some(status)) => {
            if !access::can_set_status(&user) {
                return Err(AppError::permission_denied());
            }
            state
                .grievances
                .set_status(&grievance.reference_id, status, &user)
                .await?;
            Ok(redirect_with_flash(
                &detail_url,
                Flash::success("Status updated successfully."),
            ))
        }
        StaffAction::UpdateStatus(None) => {
            let mut errors = FormErrors::new();
            errors.add(
                "status",
                "Select a valid choice. That choice is not one of the available choices.",
            );
            render_detail(
                &state,
                &user,
                grievance,
                IncomingFlash::default(),
                StatusCode::UNPROCESSABLE_ENTITY,
                "",
                &errors,
            )
            .await
        }
        StaffAction::AddResponse(body) => {
            if !access::can_respond(&user, &grievance) {
                return Err(AppError::permission_denied());
            }
            match state
                .responses
                .add_response(&grievance.reference_id, &user, &body)
                .await
            {
                Ok(_) => Ok(redirect_with_flash(
                    &detail_url,
                    Flash::success("Response added successfully."),
                )),
                Err(AppError::Validation(msg)) => {
                    let mut errors = FormErrors::new();
                    errors.add("response", msg);
                    render_detail(
                        &state,
                        &user,
                        grievance,
                        IncomingFlash::default(),
                        StatusCode::UNPROCESSABLE_ENTITY,
                        &body,
                        &errors,
                    )
                    .await
                }
                Err(e) => Err(e),
            }
        }
        StaffAction::None => {
            render_detail(
                &state,
                &user,
                grievance,
                IncomingFlash::default(),
                StatusCode::OK,
                "",
                &FormErrors::new(),
            )
            .await
        }
    }
}

async fn render_detail(
    state: &StaffState,
    user: &AuthenticatedUser,
    grievance: GrievanceView,
    flash: IncomingFlash,
    status: StatusCode,
    response_draft: &str,
    errors: &FormErrors,
) -> Result<Response> {
    let responses = state
        .responses
        .list_responses(&grievance.reference_id)
        .await?;
    let profile = state.users.get_profile(grievance.user_id).await?;

    HtmlPage::new(DETAIL_TEMPLATE)
        .status(status)
        .viewer(Some(user))
        .flash(flash)
        .render(context! {
            grievance => grievance,
            submitter_phone => profile.as_ref().map(|p| p.phone.clone()),
            submitter_address => profile.map(|p| p.address),
            responses => responses,
            status_choices => GrievanceStatus::choices(),
            response_draft => response_draft,
            errors => errors,
        })
}
