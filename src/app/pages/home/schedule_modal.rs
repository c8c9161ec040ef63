//! Schedule one video on one device.

use dioxus::prelude::*;

use crate::app::components::{DateTimeInput, ErrorAlert, Modal, PlayModeSelect, ToggleInput};
use crate::app::notifier::use_notifier;
use crate::app::session::use_session;
use crate::client::{Device, Video};
use crate::schedule::{parse_datetime_local, SingleScheduleDraft};

#[component]
pub fn ScheduleModal(
    video: Video,
    devices: Vec<Device>,
    on_close: EventHandler<()>,
    on_created: EventHandler<()>,
) -> Element {
    let session = use_session();
    let notifier = use_notifier();

    let mut draft = use_signal(SingleScheduleDraft::default);
    let mut start_input = use_signal(String::new);
    let mut end_input = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut loading = use_signal(|| false);

    let video_id = video.video_id;
    let submit = move |e: FormEvent| {
        e.prevent_default();
        if loading() {
            return;
        }
        let request = match draft.peek().to_request(video_id) {
            Ok(request) => request,
            Err(invalid) => {
                error.set(Some(invalid.to_string()));
                return;
            }
        };
        error.set(None);
        let client = session.client();

        spawn(async move {
            loading.set(true);
            let result = client.create_schedule(&request).await;
            loading.set(false);
            match result {
                Ok(()) => {
                    tracing::info!("Scheduled video {} on device {}", video_id, request.device_id);
                    notifier.success("Schedule created successfully!", None);
                    on_created.call(());
                    on_close.call(());
                }
                Err(e) => {
                    tracing::warn!("Failed to create schedule: {}", e);
                    error.set(Some(e.user_message("Failed to create schedule")));
                    session.expire_on(&e);
                }
            }
        });
    };

    let selected_device = draft
        .read()
        .device_id
        .map(|id| id.to_string())
        .unwrap_or_default();
    let busy = loading();

    rsx! {
        Modal { title: format!("Schedule \"{}\"", video.title), on_close: move |_| on_close.call(()),
            if let Some(message) = error() {
                ErrorAlert { message, on_dismiss: move |_| error.set(None) }
            }
            form { class: "stack", onsubmit: submit,
                div { class: "field",
                    label { class: "field-label", "Device" }
                    select {
                        value: "{selected_device}",
                        onchange: move |e| draft.write().device_id = e.value().parse().ok(),
                        option { value: "", "Select Device" }
                        for device in devices {
                            option {
                                key: "{device.device_id}",
                                value: "{device.device_id}",
                                selected: selected_device == device.device_id.to_string(),
                                "{device.device_code} ({device.status})"
                            }
                        }
                    }
                }
                DateTimeInput {
                    label: "Start time",
                    value: start_input(),
                    required: true,
                    on_change: move |raw: String| {
                        draft.write().start_time = parse_datetime_local(&raw);
                        start_input.set(raw);
                    },
                }
                DateTimeInput {
                    label: "End time",
                    value: end_input(),
                    on_change: move |raw: String| {
                        draft.write().end_time = parse_datetime_local(&raw);
                        end_input.set(raw);
                    },
                }
                ToggleInput {
                    label: "Repeat",
                    description: "Play again every day at the same time",
                    checked: draft.read().repeat,
                    on_change: move |checked| draft.write().repeat = checked,
                }
                PlayModeSelect {
                    value: draft.read().play_mode,
                    on_change: move |mode| draft.write().play_mode = mode,
                }
                footer { class: "modal-actions",
                    button { class: "btn", r#type: "button", onclick: move |_| on_close.call(()), "Cancel" }
                    button { class: "btn btn-primary", r#type: "submit", disabled: busy,
                        if busy { "Scheduling..." } else { "Schedule" }
                    }
                }
            }
        }
    }
}
