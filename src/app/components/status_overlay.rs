//! Overlay rendering the app-wide operation status.

use dioxus::prelude::*;

use crate::app::notifier::use_notifier;
use crate::notifier::{OperationType, StatusKind};

#[component]
pub fn StatusOverlay() -> Element {
    let notifier = use_notifier();
    let status = notifier.status();

    if !status.is_visible() {
        return rsx! {};
    }

    let kind = status.kind.as_str();
    let animation = match (status.kind, status.operation) {
        (StatusKind::Loading, OperationType::Upload) => "spinner spinner-upload",
        (StatusKind::Loading, OperationType::Delete) => "spinner spinner-delete",
        (StatusKind::Loading, OperationType::Default) => "spinner",
        (StatusKind::Success, _) => "icon icon-success",
        _ => "icon icon-error",
    };
    let message = status.display_message().to_string();
    let busy = status.kind == StatusKind::Loading;

    rsx! {
        div {
            class: "status-overlay status-{kind}",
            role: "status",
            "aria-live": "polite",
            "aria-busy": if busy { "true" } else { "false" },
            div { class: "status-card",
                div { class: "{animation}" }
                p { "{message}" }
                if !busy {
                    button {
                        class: "btn-ghost",
                        onclick: move |_| notifier.hide(),
                        "Dismiss"
                    }
                }
            }
        }
    }
}
