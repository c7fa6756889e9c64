//! HTML pages served by the redirect route.
//!
//! The redirect path never answers with JSON; failed resolutions render a
//! minimal page with the matching status code.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Renders `templates/redirect_error.html`.
#[derive(Template, WebTemplate)]
#[template(path = "redirect_error.html")]
pub struct RedirectErrorPage {
    pub status: u16,
    pub title: &'static str,
    pub message: &'static str,
    pub background: &'static str,
}

/// Outcomes of the redirect route that render an error page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectError {
    NotFound,
    Expired,
    Internal,
}

impl RedirectError {
    pub fn status(self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Expired => StatusCode::GONE,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn page(self) -> RedirectErrorPage {
        let (title, message, background) = match self {
            Self::NotFound => (
                "Link not found",
                "This short link does not exist or has been removed.",
                "linear-gradient(135deg, #667eea, #764ba2)",
            ),
            Self::Expired => (
                "Link expired",
                "This short link is no longer active.",
                "linear-gradient(135deg, #f093fb, #f5576c)",
            ),
            Self::Internal => (
                "Redirect error",
                "Something went wrong while following this link. Please try again later.",
                "linear-gradient(135deg, #4b5563, #1f2937)",
            ),
        };

        RedirectErrorPage {
            status: self.status().as_u16(),
            title,
            message,
            background,
        }
    }
}

impl IntoResponse for RedirectError {
    fn into_response(self) -> Response {
        (self.status(), self.page()).into_response()
    }
}
