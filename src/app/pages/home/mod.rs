//! Home page: devices, the video library, upcoming schedules and the
//! upload / scheduling dialogs.

mod devices;
mod multi_schedule;
mod schedule_modal;
mod upcoming;
mod upload;
mod videos;

use dioxus::prelude::*;
use std::future::Future;

use crate::app::components::Layout;
use crate::app::notifier::{use_notifier, Notifier};
use crate::app::session::{use_require_session, SessionContext};
use crate::client::{ApiError, Video};

use devices::DeviceList;
use multi_schedule::MultiScheduleModal;
use schedule_modal::ScheduleModal;
use upcoming::UpcomingVideos;
use upload::UploadModal;
use videos::VideoLibrary;

/// `mm:ss` for a duration in seconds
pub(crate) fn format_duration(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Run a list request, behind a loading notice unless `notice` is `None`.
///
/// Reloads after a change pass `None` so the change's own success notice
/// stays up. A rejected session signs the user out.
pub(crate) async fn load_list<T, F>(
    session: SessionContext,
    notifier: Notifier,
    notice: Option<&str>,
    failure: &str,
    request: F,
) -> Result<Vec<T>, String>
where
    F: Future<Output = Result<Vec<T>, ApiError>>,
{
    let result = notifier
        .store()
        .while_loading(notice.map(str::to_string), request)
        .await;

    result.map_err(|e| {
        tracing::warn!("{}: {}", failure, e);
        session.expire_on(&e);
        e.user_message(failure)
    })
}

/// Which dialog is open
#[derive(Clone, Debug, PartialEq)]
enum Dialog {
    None,
    Upload,
    MultiSchedule,
    Schedule(Video),
}

#[component]
pub fn Home() -> Element {
    let session = use_require_session();
    let notifier = use_notifier();

    // Bumped after any change so the lists reload; only the first load is announced
    let mut refresh = use_signal(|| 0u32);
    let mut dialog = use_signal(|| Dialog::None);

    let devices = use_resource(move || async move {
        let notice = (refresh() == 0).then_some("Loading devices...");
        if !session.is_authenticated() {
            return Ok(Vec::new());
        }
        let client = session.client();
        load_list(
            session,
            notifier,
            notice,
            "Failed to fetch devices",
            client.list_devices(),
        )
        .await
    });

    let videos = use_resource(move || async move {
        let notice = (refresh() == 0).then_some("Loading videos...");
        if !session.is_authenticated() {
            return Ok(Vec::new());
        }
        let client = session.client();
        load_list(
            session,
            notifier,
            notice,
            "Failed to fetch videos",
            client.my_videos(),
        )
        .await
    });

    let upcoming = use_resource(move || async move {
        let _ = refresh();
        if !session.is_authenticated() {
            return Ok(Vec::new());
        }
        let client = session.client();
        let result = client.my_next_videos().await;
        result.map_err(|e| {
            tracing::warn!("Failed to fetch scheduled videos: {}", e);
            session.expire_on(&e);
            e.user_message("Failed to fetch scheduled videos")
        })
    });

    let reload = move |_: ()| refresh += 1;
    let close_dialog = move |_: ()| dialog.set(Dialog::None);

    let device_list = devices.read().clone();
    let video_list = videos.read().clone();
    let upcoming_list = upcoming.read().clone();
    let known_devices = device_list
        .clone()
        .and_then(Result::ok)
        .unwrap_or_default();

    rsx! {
        Layout {
            title: "Home".to_string(),
            nav_active: "home".to_string(),

            div { class: "toolbar",
                h1 { "Dashboard" }
                div { class: "toolbar-actions",
                    button {
                        class: "btn",
                        onclick: move |_| dialog.set(Dialog::MultiSchedule),
                        "Schedule videos"
                    }
                    button {
                        class: "btn btn-primary",
                        onclick: move |_| dialog.set(Dialog::Upload),
                        "Upload video"
                    }
                }
            }

            section {
                h2 { "Devices" }
                {match device_list {
                    None => rsx! { article { "aria-busy": "true", "Loading devices..." } },
                    Some(Err(message)) => rsx! { p { class: "text-error", "{message}" } },
                    Some(Ok(list)) => rsx! { DeviceList { devices: list } },
                }}
            }

            section {
                h2 { "My videos" }
                {match video_list {
                    None => rsx! { article { "aria-busy": "true", "Loading videos..." } },
                    Some(Err(message)) => rsx! { p { class: "text-error", "{message}" } },
                    Some(Ok(list)) => rsx! {
                        VideoLibrary {
                            videos: list,
                            on_changed: reload,
                            on_schedule: move |video: Video| dialog.set(Dialog::Schedule(video)),
                        }
                    },
                }}
            }

            section {
                h2 { "Upcoming videos" }
                {match upcoming_list {
                    None => rsx! { article { "aria-busy": "true", "Loading videos..." } },
                    Some(Err(message)) => rsx! { p { class: "text-error", "{message}" } },
                    Some(Ok(list)) => rsx! { UpcomingVideos { videos: list } },
                }}
            }

            {match dialog() {
                Dialog::None => rsx! {},
                Dialog::Upload => rsx! {
                    UploadModal { on_close: close_dialog, on_uploaded: reload }
                },
                Dialog::MultiSchedule => rsx! {
                    MultiScheduleModal { on_close: close_dialog, on_created: reload }
                },
                Dialog::Schedule(video) => rsx! {
                    ScheduleModal {
                        video,
                        devices: known_devices,
                        on_close: close_dialog,
                        on_created: reload,
                    }
                },
            }}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_render_as_minutes_and_seconds() {
        assert_eq!(format_duration(0.0), "00:00");
        assert_eq!(format_duration(59.9), "00:59");
        assert_eq!(format_duration(754.2), "12:34");
        assert_eq!(format_duration(f64::NAN), "00:00");
    }
}
