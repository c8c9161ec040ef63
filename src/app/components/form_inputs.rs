//! Reusable form input components.

use dioxus::prelude::*;

use crate::schedule::PlayMode;

/// A labeled checkbox switch with description.
#[component]
pub fn ToggleInput(
    /// Input label
    label: &'static str,
    /// Description text shown below label
    description: &'static str,
    /// Current checked state
    checked: bool,
    /// Called when the toggle changes
    on_change: EventHandler<bool>,
) -> Element {
    rsx! {
        div { class: "field field-inline",
            div { class: "grow",
                label { class: "field-label", "{label}" }
                p { class: "text-muted text-small", "{description}" }
            }
            input {
                class: "toggle",
                r#type: "checkbox",
                checked: checked,
                onchange: move |e| on_change.call(e.checked()),
            }
        }
    }
}

/// `datetime-local` input; reports the raw value, blank when cleared.
#[component]
pub fn DateTimeInput(
    label: &'static str,
    /// Current value in `YYYY-MM-DDTHH:MM` form
    value: String,
    #[props(default = false)]
    required: bool,
    on_change: EventHandler<String>,
) -> Element {
    rsx! {
        div { class: "field",
            label { class: "field-label",
                "{label}"
                if required {
                    span { class: "required", " *" }
                }
            }
            input {
                r#type: "datetime-local",
                value: "{value}",
                required: required,
                oninput: move |e| on_change.call(e.value()),
            }
        }
    }
}

/// Loop / once selector
#[component]
pub fn PlayModeSelect(value: PlayMode, on_change: EventHandler<PlayMode>) -> Element {
    rsx! {
        div { class: "field",
            label { class: "field-label", "Play mode" }
            select {
                value: value.as_str(),
                onchange: move |e| on_change.call(PlayMode::from_form_value(&e.value())),
                option { value: "loop", selected: value == PlayMode::Loop, "Loop" }
                option { value: "once", selected: value == PlayMode::Once, "Play once" }
            }
        }
    }
}
