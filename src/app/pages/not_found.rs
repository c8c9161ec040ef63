use dioxus::prelude::*;

use crate::app::Route;

#[component]
pub fn NotFound(segments: Vec<String>) -> Element {
    let path = format!("/{}", segments.join("/"));

    rsx! {
        document::Title { "Not found - Synetra" }
        main { class: "container not-found",
            h1 { "404" }
            p { "Nothing lives at " code { "{path}" } "." }
            Link { class: "btn", to: Route::Landing {}, "Back to start" }
        }
    }
}
