//! Page frame shared by the signed-in views.

use dioxus::prelude::*;

use super::nav::Nav;

#[derive(Props, Clone, PartialEq)]
pub struct LayoutProps {
    /// Page title (shown in browser tab)
    pub title: String,
    /// Active navigation item ID
    pub nav_active: String,
    /// Page content
    pub children: Element,
}

/// Main layout component wrapping signed-in pages.
#[component]
pub fn Layout(props: LayoutProps) -> Element {
    let version = env!("CARGO_PKG_VERSION");
    let full_title = format!("{} - Synetra", props.title);

    rsx! {
        // Head elements - Dioxus hoists these to the real <head>
        document::Title { "{full_title}" }

        Nav { active: props.nav_active.clone() }
        main { class: "container",
            {props.children}
        }
        footer { class: "container footer",
            small { class: "text-muted", "Synetra Dashboard v{version}" }
        }
    }
}
