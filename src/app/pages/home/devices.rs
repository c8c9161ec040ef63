use dioxus::prelude::*;

use crate::app::Route;
use crate::client::Device;

/// Device cards with connectivity and what each one is playing
#[component]
pub fn DeviceList(devices: Vec<Device>) -> Element {
    if devices.is_empty() {
        return rsx! {
            p { class: "text-muted",
                "No devices yet. "
                Link { to: Route::Profile {}, "Add one from your profile." }
            }
        };
    }

    rsx! {
        div { class: "grid",
            for device in devices {
                DeviceCard { key: "{device.device_id}", device }
            }
        }
    }
}

#[component]
fn DeviceCard(device: Device) -> Element {
    let connectivity = device.connectivity();
    let dot = connectivity.css_class();
    let initial = device
        .device_code
        .chars()
        .next()
        .map(|c| c.to_ascii_uppercase())
        .unwrap_or('?');
    let status = if device.status.is_empty() {
        "unknown".to_string()
    } else {
        device.status.clone()
    };
    let last_seen = device.last_seen.clone().unwrap_or_else(|| "Never".to_string());

    rsx! {
        article { class: "card device-card",
            header { class: "device-header",
                span { class: "device-icon", "{initial}" }
                h3 { "{device.device_code}" }
                span { class: "badge badge-{dot}",
                    span { class: "dot dot-{dot}" }
                    "{status}"
                }
            }
            if let Some(video) = device.current_video.clone() {
                div { class: "device-video",
                    if let Some(link) = video.video_link.clone() {
                        video { src: "{link}", controls: true, muted: true }
                    }
                    p { "{video.title}" }
                }
            } else {
                p { class: "text-muted", "No video playing" }
            }
            dl { class: "device-info",
                dt { "Last seen" }
                dd { "{last_seen}" }
                if let Some(state) = device.playback_state.clone() {
                    dt { "Playback" }
                    dd { "{state}" }
                }
                if let Some(next) = device.next_fetch_time.clone() {
                    dt { "Next fetch" }
                    dd { "{next}" }
                }
            }
        }
    }
}
