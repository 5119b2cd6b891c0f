//! Dismissable success and error messages.
//!
//! Alerts are rendered into the `#alert-container` element of the page, either
//! as the target of a failed htmx request or as an out-of-band swap alongside a
//! successful one.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

/// The ID of the element that holds the current alert.
pub const ALERT_CONTAINER_ID: &str = "alert-container";

/// A message to show to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// An operation succeeded.
    SuccessSimple { message: String },
    /// An operation failed.
    Error { message: String, details: String },
}

impl Alert {
    fn parts(&self) -> (&str, &str, bool) {
        match self {
            Alert::SuccessSimple { message } => (message, "", true),
            Alert::Error { message, details } => (message, details, false),
        }
    }

    /// Render the alert on its own.
    pub fn into_html(self) -> Markup {
        let (message, details, is_success) = self.parts();
        let style = if is_success {
            "text-green-800 bg-green-50 border-green-300 dark:bg-gray-800 \
            dark:text-green-400 dark:border-green-800"
        } else {
            "text-red-800 bg-red-50 border-red-300 dark:bg-gray-800 \
            dark:text-red-400 dark:border-red-800"
        };

        html! {
            div
                role="alert"
                data-alert-kind=(if is_success { "success" } else { "error" })
                class={"flex items-start gap-3 p-4 mb-4 text-sm border rounded-lg shadow " (style)}
            {
                div class="flex-1"
                {
                    p class="font-medium" { (message) }

                    @if !details.is_empty() {
                        p class="mt-1" { (details) }
                    }
                }

                button
                    type="button"
                    aria-label="Dismiss"
                    class="font-bold leading-none cursor-pointer"
                    onclick="this.closest('[role=alert]').remove()"
                {
                    "×"
                }
            }
        }
    }

    /// Render the alert so that htmx swaps it into the alert container
    /// regardless of the request's target.
    pub fn into_oob_html(self) -> Markup {
        html! {
            div id=(ALERT_CONTAINER_ID) hx-swap-oob="true"
            {
                (self.into_html())
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_html().into_response()
    }
}
