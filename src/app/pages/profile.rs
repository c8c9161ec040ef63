//! Profile page: account details, profile photo and device management.

use dioxus::prelude::*;
use std::time::Duration;

use crate::app::browser::{reset_file_input, save_file};
use crate::app::components::{ErrorAlert, Layout};
use crate::app::notifier::use_notifier;
use crate::app::session::use_require_session;
use crate::client::{ApiClient, ApiError, CreatedDevice, PhotoUploadResponse, RegisterDeviceRequest};

const PHOTO_INPUT_ID: &str = "profile-photo-file";
const NOTICE: Duration = Duration::from_millis(2000);

#[cfg(target_arch = "wasm32")]
async fn upload_selected_photo(client: &ApiClient) -> Result<PhotoUploadResponse, ApiError> {
    let file = crate::app::browser::selected_file(PHOTO_INPUT_ID)
        .ok_or_else(|| ApiError::Decode("no file selected".into()))?;
    client.upload_profile_photo_file(&file).await
}

#[cfg(not(target_arch = "wasm32"))]
async fn upload_selected_photo(_client: &ApiClient) -> Result<PhotoUploadResponse, ApiError> {
    Err(ApiError::Network("uploads run in the browser".into()))
}

#[component]
pub fn Profile() -> Element {
    let session = use_require_session();
    let notifier = use_notifier();

    let mut refresh = use_signal(|| 0u32);
    let mut device_name = use_signal(String::new);
    let mut created = use_signal(|| None::<CreatedDevice>);
    let mut error = use_signal(|| None::<String>);

    let profile = use_resource(move || async move {
        let _ = refresh();
        let user_id = session.user_id()?;
        let client = session.client();
        match client.user(user_id).await {
            Ok(profile) => Some(profile),
            Err(e) => {
                tracing::warn!("Failed to load profile {}: {}", user_id, e);
                session.expire_on(&e);
                None
            }
        }
    });

    let devices = use_resource(move || async move {
        let _ = refresh();
        if !session.is_authenticated() {
            return Vec::new();
        }
        let client = session.client();
        let result = notifier
            .store()
            .while_loading(Some("Loading devices...".to_string()), client.list_devices())
            .await;
        result.unwrap_or_else(|e| {
            tracing::warn!("Failed to fetch devices: {}", e);
            session.expire_on(&e);
            Vec::new()
        })
    });

    let upload_photo = move |_: FormEvent| {
        let client = session.client();
        spawn(async move {
            notifier.loading("Uploading photo...");
            match upload_selected_photo(&client).await {
                Ok(response) => {
                    tracing::info!("Profile photo updated: {:?}", response.photo_url);
                    notifier.success("Profile photo updated", Some(NOTICE));
                    reset_file_input(PHOTO_INPUT_ID);
                    refresh += 1;
                }
                Err(e) => {
                    tracing::warn!("Photo upload failed: {}", e);
                    notifier.error(e.user_message("Failed to upload photo"), Some(NOTICE));
                    session.expire_on(&e);
                }
            }
        });
    };

    let create_device = move |e: FormEvent| {
        e.prevent_default();
        let name = device_name().trim().to_string();
        if name.is_empty() {
            return;
        }
        let client = session.client();
        spawn(async move {
            notifier.loading("Creating device...");
            match client.create_device(&name).await {
                Ok(device) => {
                    tracing::info!("Created device {}", device.device_code);
                    created.set(Some(device));
                    device_name.set(String::new());
                    notifier.success("Device created", Some(NOTICE));
                    refresh += 1;
                }
                Err(e) => {
                    tracing::warn!("Failed to create device: {}", e);
                    notifier.error("Failed to create device", Some(NOTICE));
                    session.expire_on(&e);
                }
            }
        });
    };

    let register_created = move |_: MouseEvent| {
        let Some(device) = created() else {
            return;
        };
        let client = session.client();
        spawn(async move {
            let body = RegisterDeviceRequest {
                device_code: device.device_code.clone(),
                device_token: device.device_token.clone(),
            };
            match register(&client, &body).await {
                Ok(message) => {
                    notifier.success(format!("Device registered: {}", message), Some(NOTICE));
                    created.set(None);
                    refresh += 1;
                }
                Err(e) => {
                    tracing::warn!("Failed to register {}: {}", body.device_code, e);
                    error.set(Some(e.user_message("Failed to register device")));
                }
            }
        });
    };

    let download_config = move |device_id: i64, device_code: String| {
        let client = session.client();
        spawn(async move {
            match client.download_device_config(device_id).await {
                Ok(bytes) => save_file(&bytes, &format!("{}.zip", device_code)),
                Err(e) => {
                    tracing::warn!("Config download for {} failed: {}", device_code, e);
                    notifier.error("Failed to download config", Some(NOTICE));
                    session.expire_on(&e);
                }
            }
        });
    };

    let profile_data = profile.read().clone().flatten();
    let device_list = devices.read().clone();

    rsx! {
        Layout {
            title: "Profile".to_string(),
            nav_active: "profile".to_string(),

            if let Some(message) = error() {
                ErrorAlert { message, on_dismiss: move |_| error.set(None) }
            }

            section { class: "card profile",
                {match profile_data {
                    Some(user) => rsx! {
                        div { class: "profile-header",
                            if let Some(photo) = user.profile_photo_url.clone() {
                                img { class: "avatar", src: "{photo}", alt: "Profile photo" }
                            } else {
                                div { class: "avatar avatar-empty",
                                    {user.username.chars().next().map(|c| c.to_uppercase().to_string()).unwrap_or_default()}
                                }
                            }
                            div {
                                h1 { "{user.username}" }
                                p { class: "text-muted", "{user.email}" }
                                if let Some(since) = user.created_at.clone() {
                                    small { class: "text-muted", "Member since {since}" }
                                }
                            }
                        }
                    },
                    None => rsx! { h1 { "Profile" } },
                }}
                div { class: "field",
                    label { class: "field-label", r#for: PHOTO_INPUT_ID, "Change photo" }
                    input {
                        id: PHOTO_INPUT_ID,
                        r#type: "file",
                        accept: "image/*",
                        onchange: upload_photo,
                    }
                }
            }

            section { class: "card",
                h2 { "Add device" }
                form { class: "inline-form", onsubmit: create_device,
                    input {
                        r#type: "text",
                        placeholder: "Device name",
                        required: true,
                        value: "{device_name}",
                        oninput: move |e| device_name.set(e.value()),
                    }
                    button { class: "btn btn-primary", r#type: "submit", "Create" }
                }
                if let Some(device) = created() {
                    div { class: "created-device",
                        p { strong { "Device Code: " } code { "{device.device_code}" } }
                        p { strong { "Device Token: " } code { "{device.device_token}" } }
                        button { class: "btn", onclick: register_created, "Register device" }
                    }
                }
            }

            section {
                h2 { "My devices" }
                {match device_list {
                    None => rsx! { article { "aria-busy": "true", "Loading devices..." } },
                    Some(list) if list.is_empty() => rsx! { p { class: "text-muted", "No devices yet." } },
                    Some(list) => rsx! {
                        table {
                            thead {
                                tr {
                                    th { "Device" }
                                    th { "Status" }
                                    th { "Last seen" }
                                    th {}
                                }
                            }
                            tbody {
                                for device in list {
                                    tr { key: "{device.device_id}",
                                        td { "{device.device_code}" }
                                        td {
                                            span { class: format!("dot dot-{}", device.connectivity().css_class()) }
                                            " {device.status}"
                                        }
                                        td { {device.last_seen.clone().unwrap_or_else(|| "Never".to_string())} }
                                        td {
                                            button {
                                                class: "btn btn-small",
                                                onclick: {
                                                    let code = device.device_code.clone();
                                                    let id = device.device_id;
                                                    move |_| download_config(id, code.clone())
                                                },
                                                "Download config"
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    },
                }}
            }
        }
    }
}

/// Register a freshly created device with its own credentials
async fn register(client: &ApiClient, body: &RegisterDeviceRequest) -> Result<String, ApiError> {
    let response = client.register_device(body).await?;
    Ok(response.message.unwrap_or_else(|| "ok".to_string()))
}
