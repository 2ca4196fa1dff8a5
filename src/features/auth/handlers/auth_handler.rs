use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use minijinja::context;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppForm;
use crate::features::auth::dtos::{LoginForm, LoginQuery};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::services::AuthService;
use crate::shared::flash::{redirect_with_flash, Flash, IncomingFlash};
use crate::shared::page::HtmlPage;
use crate::shared::validation::{FormErrors, NON_FIELD_ERRORS};

const TEMPLATE: &str = "registration/login.html";
const DEFAULT_LOGIN_REDIRECT: &str = "/grievances/my";

/// Accept only same-site paths as a post-login destination
fn safe_next(next: Option<&str>) -> &str {
    match next.map(str::trim) {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path
        }
        _ => DEFAULT_LOGIN_REDIRECT,
    }
}

/// Show the login form
pub async fn login_page(
    viewer: Option<AuthenticatedUser>,
    flash: IncomingFlash,
    Query(query): Query<LoginQuery>,
) -> Result<Response> {
    let form = LoginForm {
        next: query.next,
        ..Default::default()
    };

    HtmlPage::new(TEMPLATE)
        .viewer(viewer.as_ref())
        .flash(flash)
        .render(context! {
            form => form,
            errors => FormErrors::new(),
        })
}

/// Verify credentials, set the session cookie and redirect
pub async fn login(
    State(service): State<Arc<AuthService>>,
    AppForm(form): AppForm<LoginForm>,
) -> Result<Response> {
    let mut errors = FormErrors::new();
    if form.username.trim().is_empty() {
        errors.add("username", "This field is required.");
    }
    if form.password.is_empty() {
        errors.add("password", "This field is required.");
    }

    if errors.is_empty() {
        match service.login(&form.username, &form.password).await {
            Ok((_, token)) => {
                let location = safe_next(form.next.as_deref()).to_string();
                let cookie = service.sessions().login_cookie(&token);

                return Ok((
                    StatusCode::SEE_OTHER,
                    [(header::LOCATION, location), (header::SET_COOKIE, cookie)],
                )
                    .into_response());
            }
            Err(AppError::Auth(msg)) => errors.add(NON_FIELD_ERRORS, msg),
            Err(e) => return Err(e),
        }
    }

    HtmlPage::new(TEMPLATE)
        .status(StatusCode::UNPROCESSABLE_ENTITY)
        .render(context! {
            form => form,
            errors => errors,
        })
}

/// End the session
pub async fn logout(State(service): State<Arc<AuthService>>) -> Response {
    let mut response = redirect_with_flash("/", Flash::success("You have been logged out."));
    if let Ok(value) = service.sessions().logout_cookie().parse() {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
    response
}
