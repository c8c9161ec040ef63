//! Navigation bar for the signed-in views.

use dioxus::prelude::*;

use crate::app::session::use_session;
use crate::app::Route;

#[derive(Props, Clone, PartialEq)]
pub struct NavProps {
    /// The currently active page ID ("home" or "profile")
    pub active: String,
}

#[component]
pub fn Nav(props: NavProps) -> Element {
    let session = use_session();
    let navigator = use_navigator();

    let sign_out = move |_: MouseEvent| {
        session.sign_out();
        navigator.push(Route::Login {});
    };

    rsx! {
        nav { class: "nav",
            ul {
                li {
                    strong { "Synetra" }
                }
            }
            ul {
                li {
                    if props.active == "home" {
                        Link { to: Route::Home {}, "aria-current": "page", strong { "Home" } }
                    } else {
                        Link { to: Route::Home {}, "Home" }
                    }
                }
                li {
                    if props.active == "profile" {
                        Link { to: Route::Profile {}, "aria-current": "page", strong { "Profile" } }
                    } else {
                        Link { to: Route::Profile {}, "Profile" }
                    }
                }
                li {
                    button { class: "btn-ghost", onclick: sign_out, "Sign out" }
                }
            }
        }
    }
}
