//! Dismissable error alert component.

use dioxus::prelude::*;

/// Inline error for a form, with a close button.
#[component]
pub fn ErrorAlert(
    /// The error message to display
    message: String,
    /// Called when the dismiss button is clicked
    on_dismiss: EventHandler<()>,
) -> Element {
    rsx! {
        div { class: "alert alert-error", role: "alert",
            span { "{message}" }
            button {
                class: "btn-ghost",
                r#type: "button",
                "aria-label": "Dismiss",
                onclick: move |_| on_dismiss.call(()),
                "×"
            }
        }
    }
}
