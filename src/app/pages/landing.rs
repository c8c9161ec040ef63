//! Public landing page.

use dioxus::prelude::*;

use crate::app::session::use_session;
use crate::app::Route;

#[component]
pub fn Landing() -> Element {
    let session = use_session();
    let (target, label) = if session.is_authenticated() {
        (Route::Home {}, "Open dashboard")
    } else {
        (Route::Login {}, "Sign in")
    };

    rsx! {
        document::Title { "Synetra" }
        main { class: "container landing",
            section { class: "hero",
                h1 { "Synetra" }
                p { class: "lead",
                    "Schedule videos across your screens from one place."
                }
                Link { class: "btn btn-primary", to: target, "{label}" }
            }
            section { class: "features",
                article {
                    h3 { "Devices" }
                    p { "Register players, see which are online and what they are showing." }
                }
                article {
                    h3 { "Videos" }
                    p { "Upload once and reuse the same video on any number of screens." }
                }
                article {
                    h3 { "Schedules" }
                    p { "Queue several videos on several devices in a single step." }
                }
            }
        }
    }
}
