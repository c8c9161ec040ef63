use dioxus::prelude::*;

use super::format_duration;
use crate::client::{next_upcoming, ScheduledVideo};

#[component]
pub fn UpcomingVideos(videos: Vec<ScheduledVideo>) -> Element {
    if videos.is_empty() {
        return rsx! {
            div { class: "empty",
                p { "No upcoming videos found" }
                small { class: "text-muted", "Once you schedule videos they'll appear here." }
            }
        };
    }

    let now = chrono::Local::now().naive_local();
    let next = next_upcoming(&videos, now).map(|v| (v.video_id, v.schedule_group_id));

    rsx! {
        div { class: "carousel",
            for (idx, video) in videos.into_iter().enumerate() {
                UpcomingCard {
                    key: "{idx}",
                    is_next: next == Some((video.video_id, video.schedule_group_id)),
                    video,
                }
            }
        }
    }
}

#[component]
fn UpcomingCard(video: ScheduledVideo, is_next: bool) -> Element {
    let device = video
        .device_name
        .clone()
        .unwrap_or_else(|| "Unnamed Device".to_string());
    let starts = video
        .starts_at()
        .map(|t| t.format("%b %e, %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string());
    let ends = video.end_time.clone().unwrap_or_else(|| "-".to_string());
    let duration = video.duration.map(format_duration);

    rsx! {
        article { class: if is_next { "card upcoming-card next" } else { "card upcoming-card" },
            header {
                h3 { "{video.title}" }
                if is_next {
                    span { class: "badge badge-online", "Up next" }
                }
            }
            if let Some(url) = video.video_url.clone() {
                video { src: "{url}", preload: "metadata", muted: true, r#loop: true, playsinline: true }
            }
            dl {
                dt { "Device" }
                dd {
                    "{device}"
                    if let Some(id) = video.device_id {
                        small { class: "text-muted", " (#{id})" }
                    }
                }
                dt { "Starts" }
                dd { "{starts}" }
                dt { "Ends" }
                dd { "{ends}" }
                if let Some(duration) = duration {
                    dt { "Length" }
                    dd { "{duration}" }
                }
            }
        }
    }
}
