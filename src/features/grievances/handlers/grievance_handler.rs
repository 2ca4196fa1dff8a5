use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use minijinja::context;

use super::GrievanceState;
use crate::core::error::{AppError, Result};
use crate::core::extractor::AppForm;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::grievances::access;
use crate::features::grievances::dtos::{GrievanceListQuery, ResponseForm};
use crate::features::grievances::models::{GrievanceStatus, GrievanceView};
use crate::features::grievances::services::SearchScope;
use crate::shared::flash::{redirect_with_flash, Flash, IncomingFlash};
use crate::shared::page::HtmlPage;
use crate::shared::validation::FormErrors;

const DETAIL_TEMPLATE: &str = "grievances/detail.html";

/// Redirect a user who may not see this grievance
fn deny(user: &AuthenticatedUser, reference_id: &str) -> Response {
    tracing::warn!(
        "User {} denied access to grievance {}",
        user.username,
        reference_id
    );
    redirect_with_flash(
        "/grievances/my",
        Flash::error("You don't have permission to view this grievance."),
    )
}

/// The signed-in user's own grievances
pub async fn my_grievances(
    user: AuthenticatedUser,
    State(state): State<GrievanceState>,
    flash: IncomingFlash,
    Query(query): Query<GrievanceListQuery>,
) -> Result<Response> {
    let filter = query.filter();
    let page = state
        .grievances
        .search(SearchScope::Mine(user.user_id), &filter, query.page())
        .await?;

    HtmlPage::new("grievances/my_grievances.html")
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

/// Detail page with the response thread
pub async fn grievance_detail(
    user: AuthenticatedUser,
    State(state): State<GrievanceState>,
    flash: IncomingFlash,
    Path(reference_id): Path<String>,
) -> Result<Response> {
    let grievance = state.grievances.get_by_reference(&reference_id).await?;
    if !access::can_view(&user, &grievance) {
        return Ok(deny(&user, &reference_id));
    }

    render_detail(
        &state,
        &user,
        grievance,
        flash,
        StatusCode::OK,
        &ResponseForm::default(),
        &FormErrors::new(),
    )
    .await
}

/// Append a response from the owner or staff
pub async fn add_response(
    user: AuthenticatedUser,
    State(state): State<GrievanceState>,
    Path(reference_id): Path<String>,
    AppForm(form): AppForm<ResponseForm>,
) -> Result<Response> {
    let grievance = state.grievances.get_by_reference(&reference_id).await?;
    if !access::can_respond(&user, &grievance) {
        return Ok(deny(&user, &reference_id));
    }

    match state
        .responses
        .add_response(&grievance.reference_id, &user, &form.response)
        .await
    {
        Ok(_) => Ok(redirect_with_flash(
            &format!("/grievances/{}", grievance.reference_id),
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
                &form,
                &errors,
            )
            .await
        }
        Err(e) => Err(e),
    }
}

/// Stream the attachment to the owner or staff
pub async fn download_attachment(
    user: AuthenticatedUser,
    State(state): State<GrievanceState>,
    Path(reference_id): Path<String>,
) -> Result<Response> {
    let grievance = state.grievances.get_by_reference(&reference_id).await?;
    if !access::can_view(&user, &grievance) {
        return Ok(deny(&user, &reference_id));
    }

    let (data, name, content_type) = state.grievances.attachment(&grievance).await?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        name.replace(['"', '\\', '\r', '\n'], "_")
    );

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        data,
    )
        .into_response())
}

async fn render_detail(
    state: &GrievanceState,
    user: &AuthenticatedUser,
    grievance: GrievanceView,
    flash: IncomingFlash,
    status: StatusCode,
    form: &ResponseForm,
    errors: &FormErrors,
) -> Result<Response> {
    let responses = state
        .responses
        .list_responses(&grievance.reference_id)
        .await?;

    HtmlPage::new(DETAIL_TEMPLATE)
        .status(status)
        .viewer(Some(user))
        .flash(flash)
        .render(context! {
            grievance => grievance,
            responses => responses,
            form => form,
            errors => errors,
        })
}
