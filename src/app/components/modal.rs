//! Modal dialog shell.

use dioxus::prelude::*;

/// Centered dialog over a dimmed backdrop. Clicking the backdrop closes it.
#[component]
pub fn Modal(
    title: String,
    on_close: EventHandler<()>,
    /// Extra class for the dialog box (e.g. "modal-wide")
    #[props(default)]
    class: String,
    children: Element,
) -> Element {
    rsx! {
        div {
            class: "modal-backdrop",
            onclick: move |_| on_close.call(()),
            div {
                class: "modal {class}",
                role: "dialog",
                "aria-modal": "true",
                onclick: move |e| e.stop_propagation(),
                header { class: "modal-header",
                    h2 { "{title}" }
                    button {
                        class: "btn-ghost",
                        r#type: "button",
                        "aria-label": "Close",
                        onclick: move |_| on_close.call(()),
                        "×"
                    }
                }
                {children}
            }
        }
    }
}
