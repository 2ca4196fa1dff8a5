use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use minijinja::context;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppForm;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::users::dtos::RegisterForm;
use crate::features::users::services::{UserService, USERNAME_TAKEN};
use crate::shared::flash::{redirect_with_flash, Flash, IncomingFlash};
use crate::shared::page::HtmlPage;
use crate::shared::validation::{FormErrors, NON_FIELD_ERRORS};

const TEMPLATE: &str = "registration/register.html";

/// Show the empty registration form
pub async fn register_page(
    viewer: Option<AuthenticatedUser>,
    flash: IncomingFlash,
) -> Result<Response> {
    HtmlPage::new(TEMPLATE)
        .viewer(viewer.as_ref())
        .flash(flash)
        .render(context! {
            form => RegisterForm::default(),
            errors => FormErrors::new(),
        })
}

/// Create the account, or re-render the form with inline errors
pub async fn register(
    State(service): State<Arc<UserService>>,
    viewer: Option<AuthenticatedUser>,
    AppForm(form): AppForm<RegisterForm>,
) -> Result<Response> {
    let form = form.normalized();
    let errors = form.check();

    if !errors.is_empty() {
        return render_invalid(viewer.as_ref(), &form, &errors);
    }

    match service.register(form.clone()).await {
        Ok(_) => Ok(redirect_with_flash(
            "/login",
            Flash::success("Account created successfully. You can now login."),
        )
        .into_response()),
        Err(AppError::Validation(msg)) => {
            let mut errors = FormErrors::new();
            let field = if msg == USERNAME_TAKEN {
                "username"
            } else {
                NON_FIELD_ERRORS
            };
            errors.add(field, msg);
            render_invalid(viewer.as_ref(), &form, &errors)
        }
        Err(e) => Err(e),
    }
}

fn render_invalid(
    viewer: Option<&AuthenticatedUser>,
    form: &RegisterForm,
    errors: &FormErrors,
) -> Result<Response> {
    HtmlPage::new(TEMPLATE)
        .status(StatusCode::UNPROCESSABLE_ENTITY)
        .viewer(viewer)
        .render(context! {
            form => form,
            errors => errors,
        })
}
