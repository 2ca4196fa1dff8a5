//! Full-page HTML responses with the shared layout context.

use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use minijinja::{context, Value};

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::shared::constants::FLASH_COOKIE;
use crate::shared::cookies::expired_cookie;
use crate::shared::flash::IncomingFlash;
use crate::shared::templates;

/// Builder for a rendered page.
///
/// Adds `user` and `flash` to the template context, and clears the flash cookie
/// once its message has been shown.
pub struct HtmlPage<'a> {
    template: &'a str,
    status: StatusCode,
    viewer: Option<&'a AuthenticatedUser>,
    flash: IncomingFlash,
}

impl<'a> HtmlPage<'a> {
    pub fn new(template: &'a str) -> Self {
        Self {
            template,
            status: StatusCode::OK,
            viewer: None,
            flash: IncomingFlash::default(),
        }
    }

    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn viewer(mut self, viewer: Option<&'a AuthenticatedUser>) -> Self {
        self.viewer = viewer;
        self
    }

    pub fn flash(mut self, flash: IncomingFlash) -> Self {
        self.flash = flash;
        self
    }

    pub fn render(self, page_ctx: Value) -> Result<Response> {
        let has_flash = self.flash.0.is_some();
        let ctx = context! {
            user => self.viewer,
            flash => self.flash.0,
            ..page_ctx
        };

        let body = templates::render(self.template, ctx).map_err(|e| {
            tracing::error!("Failed to render {}: {}", self.template, e);
            AppError::Internal(e.to_string())
        })?;

        let mut response = (self.status, Html(body)).into_response();
        if has_flash {
            if let Ok(value) = expired_cookie(FLASH_COOKIE).parse() {
                response.headers_mut().insert(header::SET_COOKIE, value);
            }
        }

        Ok(response)
    }
}
