//! Video upload dialog with progress in the status overlay.

use dioxus::prelude::*;
use std::time::Duration;

use crate::app::browser::{delay, reset_file_input};
use crate::app::client_config::use_client_config;
use crate::app::components::{ErrorAlert, Modal, ToggleInput};
use crate::app::notifier::{use_notifier, Notifier};
use crate::app::session::use_session;
use crate::client::upload::progress_message;
use crate::client::{ApiClient, ApiError, VideoUploadMeta};
use crate::notifier::OperationType;

const FILE_INPUT_ID: &str = "video-upload-file";
const NOTICE: Duration = Duration::from_millis(2000);

/// Upload the file picked in the dialog, reporting progress through the notifier
#[cfg(target_arch = "wasm32")]
async fn upload_selected(
    client: &ApiClient,
    notifier: Notifier,
    mut meta: VideoUploadMeta,
) -> Result<(), ApiError> {
    let file = crate::app::browser::selected_file(FILE_INPUT_ID)
        .ok_or_else(|| ApiError::Decode("no file selected".into()))?;
    meta.duration_secs = crate::client::upload::read_video_duration(&file)
        .await
        .unwrap_or(0);

    client
        .upload_video_file(&file, &meta, move |pct| {
            notifier.loading_operation(OperationType::Upload, progress_message(pct));
        })
        .await
}

#[cfg(not(target_arch = "wasm32"))]
async fn upload_selected(
    _client: &ApiClient,
    _notifier: Notifier,
    meta: VideoUploadMeta,
) -> Result<(), ApiError> {
    tracing::warn!("Upload of {:?} requested outside the browser", meta.title);
    Err(ApiError::Network("uploads run in the browser".into()))
}

#[component]
pub fn UploadModal(on_close: EventHandler<()>, on_uploaded: EventHandler<()>) -> Element {
    let session = use_session();
    let notifier = use_notifier();
    let client_config = use_client_config();

    let mut title = use_signal(String::new);
    let mut description = use_signal(String::new);
    let mut is_default = use_signal(|| false);
    let mut has_file = use_signal(|| false);
    let mut uploading = use_signal(|| false);
    let mut error = use_signal(|| None::<String>);

    let submit = move |e: FormEvent| {
        e.prevent_default();
        if uploading() {
            return;
        }
        if !has_file() || title().trim().is_empty() {
            error.set(Some("Please choose a video and enter a title".to_string()));
            return;
        }
        error.set(None);

        let client = session.client();
        let meta = VideoUploadMeta {
            title: title().trim().to_string(),
            description: description().trim().to_string(),
            is_default: is_default(),
            duration_secs: 0,
        };
        let close_delay = client_config.close_delay();

        spawn(async move {
            uploading.set(true);
            notifier.loading_operation(OperationType::Upload, progress_message(0));
            let result = upload_selected(&client, notifier, meta).await;
            uploading.set(false);

            match result {
                Ok(()) => {
                    tracing::info!("Video uploaded");
                    notifier.success("Video uploaded successfully!", Some(NOTICE));
                    reset_file_input(FILE_INPUT_ID);
                    on_uploaded.call(());
                    delay(close_delay).await;
                    on_close.call(());
                }
                Err(e) => {
                    tracing::warn!("Upload failed: {}", e);
                    notifier.error("Upload failed. Please try again.", Some(NOTICE));
                    session.expire_on(&e);
                }
            }
        });
    };

    let busy = uploading();

    rsx! {
        Modal { title: "Upload video".to_string(), on_close: move |_| on_close.call(()),
            if let Some(message) = error() {
                ErrorAlert { message, on_dismiss: move |_| error.set(None) }
            }
            form { class: "stack", onsubmit: submit,
                div { class: "field",
                    label { class: "field-label", r#for: FILE_INPUT_ID, "Video file" }
                    input {
                        id: FILE_INPUT_ID,
                        r#type: "file",
                        accept: "video/*",
                        onchange: move |e| has_file.set(!e.value().is_empty()),
                    }
                }
                div { class: "field",
                    label { class: "field-label", "Title" }
                    input {
                        r#type: "text",
                        required: true,
                        value: "{title}",
                        oninput: move |e| title.set(e.value()),
                    }
                }
                div { class: "field",
                    label { class: "field-label", "Description" }
                    textarea {
                        rows: 3,
                        value: "{description}",
                        oninput: move |e| description.set(e.value()),
                    }
                }
                ToggleInput {
                    label: "Default video",
                    description: "Play when nothing else is scheduled",
                    checked: is_default(),
                    on_change: move |checked| is_default.set(checked),
                }
                footer { class: "modal-actions",
                    button { class: "btn", r#type: "button", onclick: move |_| on_close.call(()), "Cancel" }
                    button { class: "btn btn-primary", r#type: "submit", disabled: busy,
                        if busy { "Uploading..." } else { "Upload" }
                    }
                }
            }
        }
    }
}
