//! Batch scheduling dialog: N devices x M videos in one request.

use dioxus::prelude::*;
use std::time::Duration;

use crate::app::client_config::use_client_config;
use crate::app::components::{DateTimeInput, Modal, PlayModeSelect, ToggleInput};
use crate::app::notifier::use_notifier;
use crate::app::session::use_session;
use crate::client::{Device, Video};
use crate::schedule::{submit_schedules, FormPhase, FormSlot, ScheduleForm, SubmitOutcome};

/// Keeps "Loading data..." up briefly so it does not flash
const LOADED_HIDE_DELAY: Duration = Duration::from_millis(300);

impl FormSlot for Signal<ScheduleForm> {
    fn with_form<R>(&mut self, f: impl FnOnce(&mut ScheduleForm) -> R) -> R {
        f(&mut self.write())
    }
}

#[component]
pub fn MultiScheduleModal(on_close: EventHandler<()>, on_created: EventHandler<()>) -> Element {
    let session = use_session();
    let notifier = use_notifier();
    let client_config = use_client_config();

    let mut form = use_signal(|| ScheduleForm::with_timing(client_config.form_timing()));
    let mut devices = use_signal(Vec::<Device>::new);
    let mut videos = use_signal(Vec::<Video>::new);
    let mut start_input = use_signal(String::new);
    let mut end_input = use_signal(String::new);

    // Devices and videos load together; either may fail on its own
    use_future(move || async move {
        if !session.is_authenticated() {
            return;
        }
        let client = session.client();
        notifier.loading("Loading data...");
        let (device_result, video_result) =
            futures::join!(client.list_devices(), client.my_videos());

        match device_result {
            Ok(list) => devices.set(list),
            Err(e) => {
                tracing::warn!("Failed to load devices: {}", e);
                session.expire_on(&e);
            }
        }
        match video_result {
            Ok(list) => videos.set(list),
            Err(e) => {
                tracing::warn!("Failed to load videos: {}", e);
                session.expire_on(&e);
            }
        }
        notifier.hide_after(LOADED_HIDE_DELAY);
    });

    let submit = move |_: MouseEvent| {
        let client = session.client();
        let store = notifier.store();
        let mut slot = form;
        spawn(async move {
            let outcome =
                submit_schedules(&mut slot, &client, &store, |_| on_created.call(())).await;
            match outcome {
                SubmitOutcome::Created { .. } => on_close.call(()),
                SubmitOutcome::Failed {
                    sign_in_required: true,
                    ..
                } => session.sign_out(),
                _ => {}
            }
        });
    };

    let phase = form.read().phase();
    let selection = form.read().selection().clone();
    let device_count = selection.device_ids.len();
    let video_count = selection.video_ids.len();

    rsx! {
        Modal {
            title: "Schedule videos".to_string(),
            class: "modal-wide".to_string(),
            on_close: move |_| on_close.call(()),

            div { class: "columns",
                fieldset {
                    legend { "Devices ({device_count} selected)" }
                    if devices.read().is_empty() {
                        p { class: "text-muted", "No devices" }
                    }
                    for device in devices() {
                        label { key: "{device.device_id}", class: "check-row",
                            input {
                                r#type: "checkbox",
                                checked: selection.is_device_selected(device.device_id),
                                onchange: move |_| {
                                    form.write().toggle_device(device.device_id);
                                },
                            }
                            span { class: format!("dot dot-{}", device.connectivity().css_class()) }
                            " {device.device_code}"
                        }
                    }
                }
                fieldset {
                    legend { "Videos ({video_count} selected)" }
                    if videos.read().is_empty() {
                        p { class: "text-muted", "No videos" }
                    }
                    for video in videos() {
                        label { key: "{video.video_id}", class: "check-row",
                            input {
                                r#type: "checkbox",
                                checked: selection.is_video_selected(video.video_id),
                                onchange: move |_| {
                                    form.write().toggle_video(video.video_id);
                                },
                            }
                            " {video.title}"
                        }
                    }
                }
            }

            div { class: "columns",
                DateTimeInput {
                    label: "Start time",
                    value: start_input(),
                    required: true,
                    on_change: move |raw: String| {
                        form.write().selection_mut().set_start_input(&raw);
                        start_input.set(raw);
                    },
                }
                DateTimeInput {
                    label: "End time",
                    value: end_input(),
                    on_change: move |raw: String| {
                        form.write().selection_mut().set_end_input(&raw);
                        end_input.set(raw);
                    },
                }
            }
            ToggleInput {
                label: "Repeat",
                description: "Play again every day at the same time",
                checked: selection.repeat,
                on_change: move |checked| form.write().selection_mut().repeat = checked,
            }
            PlayModeSelect {
                value: selection.play_mode,
                on_change: move |mode| form.write().selection_mut().play_mode = mode,
            }

            footer { class: "modal-actions",
                button { class: "btn", onclick: move |_| on_close.call(()), "Cancel" }
                button {
                    class: "btn btn-primary",
                    disabled: phase != FormPhase::Editing,
                    onclick: submit,
                    if phase == FormPhase::Submitting { "Scheduling..." } else { "Schedule" }
                }
            }
        }
    }
}
