use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::Response,
};
use minijinja::context;
use tracing::debug;

use super::GrievanceState;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::grievances::dtos::{AttachmentUpload, SubmitGrievanceForm};
use crate::features::grievances::services::NewGrievance;
use crate::shared::flash::{redirect_with_flash, Flash, IncomingFlash};
use crate::shared::page::HtmlPage;
use crate::shared::validation::{FormErrors, NON_FIELD_ERRORS};

const TEMPLATE: &str = "grievances/submit.html";

/// Show the submission form
pub async fn submit_page(
    user: AuthenticatedUser,
    State(state): State<GrievanceState>,
    flash: IncomingFlash,
) -> Result<Response> {
    let departments = state.taxonomy.grouped().await?;

    HtmlPage::new(TEMPLATE)
        .viewer(Some(&user))
        .flash(flash)
        .render(context! {
            departments => departments,
            form => SubmitGrievanceForm::default(),
            errors => FormErrors::new(),
        })
}

/// Accept a multipart submission with an optional `attachment` file
pub async fn submit(
    user: AuthenticatedUser,
    State(state): State<GrievanceState>,
    multipart: Multipart,
) -> Result<Response> {
    let (form, attachment) = read_submission(multipart).await?;
    let form = form.normalized();

    let mut errors = form.check();
    if let Some(Err(msg)) = attachment.as_ref().map(AttachmentUpload::check) {
        errors.add("attachment", msg);
    }

    let category_id = match form.category_id() {
        Some(id) if errors.is_empty() => id,
        _ => return render_invalid(&state, &user, &form, &errors).await,
    };

    let new = NewGrievance {
        title: form.title.clone(),
        description: form.description.clone(),
        category_id,
        attachment,
    };

    match state.grievances.submit(&user, new).await {
        Ok(grievance) => Ok(redirect_with_flash(
            "/grievances/my",
            Flash::success(format!(
                "Grievance submitted successfully. Your reference ID is {}",
                grievance.reference_id
            )),
        )),
        Err(AppError::Validation(msg)) => {
            let mut errors = FormErrors::new();
            errors.add(NON_FIELD_ERRORS, msg);
            render_invalid(&state, &user, &form, &errors).await
        }
        Err(e) => Err(e),
    }
}

async fn render_invalid(
    state: &GrievanceState,
    user: &AuthenticatedUser,
    form: &SubmitGrievanceForm,
    errors: &FormErrors,
) -> Result<Response> {
    let departments = state.taxonomy.grouped().await?;

    HtmlPage::new(TEMPLATE)
        .status(StatusCode::UNPROCESSABLE_ENTITY)
        .viewer(Some(user))
        .render(context! {
            departments => departments,
            form => form,
            errors => errors,
        })
}

/// Collect the text fields and the optional file from the multipart body
async fn read_submission(
    mut multipart: Multipart,
) -> Result<(SubmitGrievanceForm, Option<AttachmentUpload>)> {
    let mut form = SubmitGrievanceForm::default();
    let mut attachment = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "attachment" => {
                let file_name = field.file_name().unwrap_or("").to_string();
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());

                let data = field.bytes().await.map_err(|e| {
                    debug!("Failed to read file bytes: {}", e);
                    AppError::BadRequest(format!("Failed to read file data: {}", e))
                })?;

                // Browsers send an empty part when no file was chosen
                if !(file_name.is_empty() && data.is_empty()) {
                    attachment = Some(AttachmentUpload {
                        file_name: if file_name.is_empty() {
                            "attachment".to_string()
                        } else {
                            file_name
                        },
                        content_type,
                        data: data.to_vec(),
                    });
                }
            }
            "title" | "description" | "category" => {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read {} field: {}", field_name, e))
                })?;
                match field_name.as_str() {
                    "title" => form.title = text,
                    "description" => form.description = text,
                    _ => form.category = text,
                }
            }
            _ => {
                debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    Ok((form, attachment))
}
