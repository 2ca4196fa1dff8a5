use std::sync::Arc;

use axum::{extract::State, response::Response};
use minijinja::context;

use crate::core::error::Result;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::taxonomy::services::TaxonomyService;
use crate::shared::flash::IncomingFlash;
use crate::shared::page::HtmlPage;

/// Public landing page listing departments and their categories
pub async fn home(
    State(service): State<Arc<TaxonomyService>>,
    viewer: Option<AuthenticatedUser>,
    flash: IncomingFlash,
) -> Result<Response> {
    let departments = service.grouped().await?;

    HtmlPage::new("home.html")
        .viewer(viewer.as_ref())
        .flash(flash)
        .render(context! { departments => departments })
}
