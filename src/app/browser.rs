//! Small wrappers over browser APIs.
//!
//! Each helper has a server-side fallback so components compile and render
//! during SSR, where there is no window.

use std::time::Duration;

use crate::notifier::timer;

/// Origin used for API calls when rendering on the server. The session is
/// always empty there, so no authenticated request leaves the server.
#[cfg(not(target_arch = "wasm32"))]
const SERVER_SIDE_ORIGIN: &str = "http://127.0.0.1:8080";

/// Scheme + host of the page, e.g. `https://app.synetra.example`
pub fn page_origin() -> String {
    #[cfg(target_arch = "wasm32")]
    {
        web_sys::window()
            .and_then(|w| w.location().origin().ok())
            .unwrap_or_default()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        SERVER_SIDE_ORIGIN.to_string()
    }
}

/// Wait without blocking the UI thread
pub async fn delay(duration: Duration) {
    let scheduler = timer::default_scheduler();
    timer::sleep(scheduler.as_ref(), duration).await;
}

/// Native `confirm()` dialog. Always false outside the browser.
pub fn confirm(message: &str) -> bool {
    #[cfg(target_arch = "wasm32")]
    {
        web_sys::window()
            .and_then(|w| w.confirm_with_message(message).ok())
            .unwrap_or(false)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        tracing::debug!("confirm() outside the browser: {}", message);
        false
    }
}

/// Offer `bytes` to the user as a file download
pub fn save_file(bytes: &[u8], file_name: &str) {
    #[cfg(target_arch = "wasm32")]
    {
        if let Err(e) = save_file_wasm(bytes, file_name) {
            tracing::warn!("Failed to save {}: {:?}", file_name, e);
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        tracing::warn!(
            "Cannot save {} ({} bytes) outside the browser",
            file_name,
            bytes.len()
        );
    }
}

#[cfg(target_arch = "wasm32")]
fn save_file_wasm(bytes: &[u8], file_name: &str) -> Result<(), wasm_bindgen::JsValue> {
    use wasm_bindgen::JsCast;
    use web_sys::{Blob, HtmlAnchorElement, Url};

    let data = js_sys::Uint8Array::from(bytes);
    let parts = js_sys::Array::of1(&data);
    let blob = Blob::new_with_u8_array_sequence(&parts)?;
    let url = Url::create_object_url_with_blob(&blob)?;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| wasm_bindgen::JsValue::from_str("no document"))?;
    let link: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    link.set_href(&url);
    link.set_download(file_name);
    link.click();

    Url::revoke_object_url(&url)
}

/// First file picked in the `<input type="file">` with the given id
#[cfg(target_arch = "wasm32")]
pub fn selected_file(input_id: &str) -> Option<web_sys::File> {
    use wasm_bindgen::JsCast;

    let input: web_sys::HtmlInputElement = web_sys::window()?
        .document()?
        .get_element_by_id(input_id)?
        .dyn_into()
        .ok()?;
    input.files()?.get(0)
}

/// Clear a file input so the same file can be picked again
pub fn reset_file_input(input_id: &str) {
    #[cfg(target_arch = "wasm32")]
    {
        use wasm_bindgen::JsCast;

        if let Some(input) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(input_id))
            .and_then(|el| el.dyn_into::<web_sys::HtmlInputElement>().ok())
        {
            input.set_value("");
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = input_id;
    }
}
