//! Multipart uploads with progress reporting.
//!
//! Native builds stream the body through reqwest and count the bytes handed
//! to the socket. In the browser `fetch` has no upload progress, so uploads go
//! through `XMLHttpRequest` and its `upload.onprogress` event.

use super::{ApiClient, ApiError, PhotoUploadResponse, VideoUploadMeta};

/// Whole-number percentage of `loaded` over `total`, clamped to 0..=100
pub fn percent(loaded: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = loaded.saturating_mul(100) / total;
    pct.min(100) as u8
}

/// Message shown by the overlay while an upload is running
pub fn progress_message(pct: u8) -> String {
    format!("Uploading video... {}%", pct)
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use super::*;
    use futures::{stream, StreamExt};
    use reqwest::multipart::{Form, Part};
    use reqwest::{Body, Method};

    const CHUNK: usize = 64 * 1024;

    fn progress_part<F>(file_name: String, bytes: Vec<u8>, mut on_progress: F) -> Part
    where
        F: FnMut(u8) + Send + Sync + 'static,
    {
        let total = bytes.len() as u64;
        let chunks: Vec<Vec<u8>> = bytes.chunks(CHUNK).map(<[u8]>::to_vec).collect();
        let mut sent = 0u64;
        let body = stream::iter(chunks).map(move |chunk| {
            sent += chunk.len() as u64;
            on_progress(percent(sent, total));
            Ok::<_, std::io::Error>(chunk)
        });
        Part::stream_with_length(Body::wrap_stream(body), total).file_name(file_name)
    }

    impl ApiClient {
        /// Upload a video with its metadata, reporting progress as a percentage
        pub async fn upload_video<F>(
            &self,
            file_name: impl Into<String>,
            bytes: Vec<u8>,
            meta: &VideoUploadMeta,
            on_progress: F,
        ) -> Result<(), ApiError>
        where
            F: FnMut(u8) + Send + Sync + 'static,
        {
            let request = self.authed(Method::POST, "/api/videos/upload")?;
            let form = Form::new()
                .part("file", progress_part(file_name.into(), bytes, on_progress))
                .text("title", meta.title.clone())
                .text("description", meta.description.clone())
                .text("is_default", meta.is_default.to_string())
                .text("duration", meta.duration_secs.to_string());
            self.send_empty(request.multipart(form)).await
        }

        /// Replace the signed-in user's profile photo
        pub async fn upload_profile_photo(
            &self,
            file_name: impl Into<String>,
            bytes: Vec<u8>,
        ) -> Result<PhotoUploadResponse, ApiError> {
            let request = self.authed(Method::POST, "/auth/upload-photo")?;
            let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name.into()));
            self.send(request.multipart(form)).await
        }
    }
}

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::*;
    use futures::channel::oneshot;
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::JsCast;
    use web_sys::{File, FormData, HtmlVideoElement, ProgressEvent, Url, XmlHttpRequest};

    fn js_err(e: wasm_bindgen::JsValue) -> ApiError {
        ApiError::Network(format!("{:?}", e))
    }

    /// POST `form` with XHR, calling `on_progress` as the body is sent
    async fn xhr_post(
        url: &str,
        token: &str,
        form: &FormData,
        mut on_progress: impl FnMut(u8) + 'static,
    ) -> Result<(u16, String), ApiError> {
        let xhr = XmlHttpRequest::new().map_err(js_err)?;
        xhr.open_with_async("POST", url, true).map_err(js_err)?;
        xhr.set_request_header("Authorization", &format!("Bearer {}", token))
            .map_err(js_err)?;

        let progress = Closure::<dyn FnMut(ProgressEvent)>::new(move |event: ProgressEvent| {
            if event.length_computable() {
                on_progress(percent(event.loaded() as u64, event.total() as u64));
            }
        });
        xhr.upload()
            .map_err(js_err)?
            .set_onprogress(Some(progress.as_ref().unchecked_ref()));

        let (tx, rx) = oneshot::channel::<Result<(), ApiError>>();
        let tx = Rc::new(RefCell::new(Some(tx)));

        let load_tx = tx.clone();
        let onload = Closure::<dyn FnMut()>::new(move || {
            if let Some(tx) = load_tx.borrow_mut().take() {
                let _ = tx.send(Ok(()));
            }
        });
        let error_tx = tx.clone();
        let onerror = Closure::<dyn FnMut()>::new(move || {
            if let Some(tx) = error_tx.borrow_mut().take() {
                let _ = tx.send(Err(ApiError::Network("upload interrupted".into())));
            }
        });
        xhr.set_onload(Some(onload.as_ref().unchecked_ref()));
        xhr.set_onerror(Some(onerror.as_ref().unchecked_ref()));

        xhr.send_with_opt_form_data(Some(form)).map_err(js_err)?;

        let outcome = rx
            .await
            .unwrap_or_else(|_| Err(ApiError::Network("upload abandoned".into())));
        drop((progress, onload, onerror));
        outcome?;

        let status = xhr.status().map_err(js_err)?;
        let body = xhr.response_text().ok().flatten().unwrap_or_default();
        Ok((status, body))
    }

    fn check(status: u16, body: &str) -> Result<(), ApiError> {
        if (200..300).contains(&status) {
            Ok(())
        } else {
            let err = ApiError::from_response(status, body);
            tracing::warn!("Upload rejected: {}", err);
            Err(err)
        }
    }

    impl ApiClient {
        /// Upload a video file picked in the browser
        pub async fn upload_video_file(
            &self,
            file: &File,
            meta: &VideoUploadMeta,
            on_progress: impl FnMut(u8) + 'static,
        ) -> Result<(), ApiError> {
            let token = self.token().ok_or(ApiError::MissingToken)?.to_string();

            let form = FormData::new().map_err(js_err)?;
            form.append_with_blob("file", file).map_err(js_err)?;
            form.append_with_str("title", &meta.title).map_err(js_err)?;
            form.append_with_str("description", &meta.description)
                .map_err(js_err)?;
            form.append_with_str("is_default", &meta.is_default.to_string())
                .map_err(js_err)?;
            form.append_with_str("duration", &meta.duration_secs.to_string())
                .map_err(js_err)?;

            let url = self.url("/api/videos/upload");
            let (status, body) = xhr_post(&url, &token, &form, on_progress).await?;
            check(status, &body)
        }

        /// Replace the signed-in user's profile photo
        pub async fn upload_profile_photo_file(
            &self,
            file: &File,
        ) -> Result<PhotoUploadResponse, ApiError> {
            let token = self.token().ok_or(ApiError::MissingToken)?.to_string();
            let form = FormData::new().map_err(js_err)?;
            form.append_with_blob("file", file).map_err(js_err)?;

            let url = self.url("/auth/upload-photo");
            let (status, body) = xhr_post(&url, &token, &form, |_| {}).await?;
            check(status, &body)?;
            serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
        }
    }

    /// Length of a local video file in whole seconds, read from its metadata
    pub async fn read_video_duration(file: &File) -> Option<u32> {
        let document = web_sys::window()?.document()?;
        let video: HtmlVideoElement = document.create_element("video").ok()?.dyn_into().ok()?;
        let object_url = Url::create_object_url_with_blob(file).ok()?;

        let (tx, rx) = oneshot::channel::<bool>();
        let tx = Rc::new(RefCell::new(Some(tx)));
        let ok_tx = tx.clone();
        let onloaded = Closure::<dyn FnMut()>::new(move || {
            if let Some(tx) = ok_tx.borrow_mut().take() {
                let _ = tx.send(true);
            }
        });
        let onerror = Closure::<dyn FnMut()>::new(move || {
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(false);
            }
        });
        video.set_preload("metadata");
        video.set_onloadedmetadata(Some(onloaded.as_ref().unchecked_ref()));
        video.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        video.set_src(&object_url);

        let loaded = rx.await.unwrap_or(false);
        let _ = Url::revoke_object_url(&object_url);
        drop((onloaded, onerror));

        let secs = video.duration();
        (loaded && secs.is_finite() && secs > 0.0).then(|| secs.floor() as u32)
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::read_video_duration;
