//! The signed-in user's video library.

use dioxus::prelude::*;
use std::time::Duration;

use super::format_duration;
use crate::app::browser::confirm;
use crate::app::notifier::use_notifier;
use crate::app::session::use_session;
use crate::client::Video;
use crate::notifier::OperationType;

const NOTICE: Duration = Duration::from_millis(2000);

#[component]
pub fn VideoLibrary(
    videos: Vec<Video>,
    /// Called after a video was deleted
    on_changed: EventHandler<()>,
    /// Open the single-schedule dialog for a video
    on_schedule: EventHandler<Video>,
) -> Element {
    let session = use_session();
    let notifier = use_notifier();

    let delete = move |video_id: i64| {
        if !confirm("Are you sure you want to delete this video?") {
            return;
        }
        let client = session.client();
        spawn(async move {
            notifier.loading_operation(OperationType::Delete, "Deleting video...");
            match client.delete_video(video_id).await {
                Ok(()) => {
                    tracing::info!("Deleted video {}", video_id);
                    notifier.success("Video deleted successfully!", Some(NOTICE));
                    on_changed.call(());
                }
                Err(e) => {
                    tracing::warn!("Failed to delete video {}: {}", video_id, e);
                    notifier.error("Failed to delete video", Some(NOTICE));
                    session.expire_on(&e);
                }
            }
        });
    };

    if videos.is_empty() {
        return rsx! {
            p { class: "text-muted", "No videos uploaded yet." }
        };
    }

    rsx! {
        div { class: "grid",
            for video in videos {
                article { key: "{video.video_id}", class: "card video-card",
                    if let Some(url) = video.video_url.clone() {
                        video { src: "{url}", preload: "metadata", muted: true, controls: true }
                    }
                    h3 { "{video.title}" }
                    if let Some(description) = video.description.clone() {
                        p { class: "text-muted", "{description}" }
                    }
                    if let Some(duration) = video.duration {
                        small { {format_duration(duration)} }
                    }
                    footer { class: "card-actions",
                        button {
                            class: "btn",
                            onclick: {
                                let video = video.clone();
                                move |_| on_schedule.call(video.clone())
                            },
                            "Schedule"
                        }
                        if let Some(url) = video.video_url.clone() {
                            a { class: "btn", href: "{url}", download: "{video.title}", "Download" }
                        }
                        button {
                            class: "btn btn-danger",
                            onclick: {
                                let video_id = video.video_id;
                                move |_| delete(video_id)
                            },
                            "Delete"
                        }
                    }
                }
            }
        }
    }
}
