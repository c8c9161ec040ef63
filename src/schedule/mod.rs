//! Playback scheduling: the multi-device/multi-video batch form and the
//! single-video schedule draft.
//!
//! The batch form collects N devices x M videos plus one time window and
//! submits them as a single `create-multiple` call. Which schedules actually
//! get created is decided by the backend.
//!
//! ```text
//! Editing --invalid--> Editing
//! Editing --submit--> Submitting --ok--> Closed (after the close delay)
//!                                --err--> Editing (selection kept)
//! ```

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Duration;
use thiserror::Error;

use crate::client::ApiError;
use crate::notifier::{timer, StatusKind, StatusStore};

/// Format of `<input type="datetime-local">` values and of the wire timestamps
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Parse a `datetime-local` value. Blank input means "not set".
pub fn parse_datetime_local(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(input, DATETIME_FORMAT))
        .ok()
}

/// Render a timestamp back into a `datetime-local` value
pub fn format_datetime_local(value: &NaiveDateTime) -> String {
    value.format(DATETIME_FORMAT).to_string()
}

mod wire_time {
    use super::*;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format_datetime_local(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        parse_datetime_local(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw)))
    }

    pub mod option {
        use super::*;

        pub fn serialize<S: Serializer>(
            value: &Option<NaiveDateTime>,
            s: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(v) => s.serialize_some(&format_datetime_local(v)),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            d: D,
        ) -> Result<Option<NaiveDateTime>, D::Error> {
            let raw: Option<String> = Option::deserialize(d)?;
            Ok(raw.as_deref().and_then(parse_datetime_local))
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayMode {
    #[default]
    Loop,
    Once,
}

impl PlayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayMode::Loop => "loop",
            PlayMode::Once => "once",
        }
    }

    /// Parse a `<select>` value; anything unknown keeps the default
    pub fn from_form_value(value: &str) -> Self {
        match value {
            "once" => PlayMode::Once,
            _ => PlayMode::Loop,
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please select at least one device, one video, and a start time.")]
    IncompleteBatch,

    #[error("Please select a device and start time")]
    IncompleteSingle,
}

// =============================================================================
// Wire types
// =============================================================================

/// Body of `POST /api/schedules/create-multiple`
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateSchedulesRequest {
    pub device_ids: Vec<i64>,
    pub video_ids: Vec<i64>,
    #[serde(with = "wire_time")]
    pub start_time: NaiveDateTime,
    #[serde(
        default,
        with = "wire_time::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_time: Option<NaiveDateTime>,
    pub repeat: bool,
    pub play_mode: PlayMode,
}

/// Response of `create-multiple`
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ScheduleGroup {
    pub schedule_group_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
}

/// Body of `POST /api/schedules/create`
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SingleScheduleRequest {
    pub video_id: i64,
    pub device_id: i64,
    #[serde(with = "wire_time")]
    pub start_time: NaiveDateTime,
    /// Sent as `null` when open-ended
    #[serde(default, with = "wire_time::option")]
    pub end_time: Option<NaiveDateTime>,
    pub repeat: bool,
    pub play_mode: PlayMode,
}

/// The backend operations the batch form needs
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait ScheduleApi {
    /// Whether a session token is available. Unauthorized forms never send.
    fn is_authorized(&self) -> bool {
        true
    }

    async fn create_multiple_schedules(
        &self,
        request: &CreateSchedulesRequest,
    ) -> Result<ScheduleGroup, ApiError>;
}

// =============================================================================
// Selection
// =============================================================================

/// What the batch form has accumulated so far
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScheduleSelection {
    pub device_ids: BTreeSet<i64>,
    pub video_ids: BTreeSet<i64>,
    pub start_time: Option<NaiveDateTime>,
    pub end_time: Option<NaiveDateTime>,
    pub repeat: bool,
    pub play_mode: PlayMode,
}

fn toggle(set: &mut BTreeSet<i64>, id: i64) -> bool {
    if set.remove(&id) {
        false
    } else {
        set.insert(id);
        true
    }
}

impl ScheduleSelection {
    /// Flip membership of a device. Returns whether it is now selected.
    pub fn toggle_device(&mut self, id: i64) -> bool {
        toggle(&mut self.device_ids, id)
    }

    /// Flip membership of a video. Returns whether it is now selected.
    pub fn toggle_video(&mut self, id: i64) -> bool {
        toggle(&mut self.video_ids, id)
    }

    pub fn is_device_selected(&self, id: i64) -> bool {
        self.device_ids.contains(&id)
    }

    pub fn is_video_selected(&self, id: i64) -> bool {
        self.video_ids.contains(&id)
    }

    pub fn set_start_input(&mut self, input: &str) {
        self.start_time = parse_datetime_local(input);
    }

    pub fn set_end_input(&mut self, input: &str) {
        self.end_time = parse_datetime_local(input);
    }

    /// Build the request, or say why it cannot be submitted.
    ///
    /// `end_time` before `start_time` is left to the backend.
    pub fn validate(&self) -> Result<CreateSchedulesRequest, ValidationError> {
        let start_time = match self.start_time {
            Some(t) if !self.device_ids.is_empty() && !self.video_ids.is_empty() => t,
            _ => return Err(ValidationError::IncompleteBatch),
        };
        Ok(CreateSchedulesRequest {
            device_ids: self.device_ids.iter().copied().collect(),
            video_ids: self.video_ids.iter().copied().collect(),
            start_time,
            end_time: self.end_time,
            repeat: self.repeat,
            play_mode: self.play_mode,
        })
    }
}

// =============================================================================
// Batch form
// =============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormPhase {
    #[default]
    Editing,
    Submitting,
    Closed,
}

/// Notifier timings used by the form
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FormTiming {
    /// Delay between the success notice and the form closing
    pub close_delay: Duration,
    pub success_dismiss: Duration,
    pub error_dismiss: Duration,
    pub unauthorized_dismiss: Duration,
}

impl Default for FormTiming {
    fn default() -> Self {
        Self {
            close_delay: Duration::from_millis(1600),
            success_dismiss: Duration::from_millis(1600),
            error_dismiss: Duration::from_millis(2500),
            unauthorized_dismiss: Duration::from_millis(2000),
        }
    }
}

/// What a submit attempt ended in
#[derive(Clone, Debug, PartialEq)]
pub enum SubmitOutcome {
    /// Selection incomplete, nothing sent
    Invalid(ValidationError),
    /// No session, nothing sent
    Unauthorized,
    /// A submit is already in flight or the form is closed
    Ignored,
    Created { schedule_group_id: i64 },
    Failed { message: String, sign_in_required: bool },
}

impl SubmitOutcome {
    pub fn is_created(&self) -> bool {
        matches!(self, SubmitOutcome::Created { .. })
    }
}

#[derive(Clone, Debug, Default)]
pub struct ScheduleForm {
    selection: ScheduleSelection,
    phase: FormPhase,
    timing: FormTiming,
}

impl ScheduleForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timing(timing: FormTiming) -> Self {
        Self {
            timing,
            ..Self::default()
        }
    }

    pub fn selection(&self) -> &ScheduleSelection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut ScheduleSelection {
        &mut self.selection
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn timing(&self) -> FormTiming {
        self.timing
    }

    pub fn toggle_device(&mut self, id: i64) -> bool {
        self.selection.toggle_device(id)
    }

    pub fn toggle_video(&mut self, id: i64) -> bool {
        self.selection.toggle_video(id)
    }

    /// First half of a submit: validate, announce loading and enter `Submitting`.
    ///
    /// On `Err` nothing is to be sent and the outcome has already been announced.
    pub fn begin_submit(
        &mut self,
        notifier: &StatusStore,
        authorized: bool,
    ) -> Result<CreateSchedulesRequest, SubmitOutcome> {
        if self.phase != FormPhase::Editing {
            return Err(SubmitOutcome::Ignored);
        }

        let request = match self.selection.validate() {
            Ok(request) => request,
            Err(err) => {
                notifier.show(
                    StatusKind::Error,
                    Some(err.to_string()),
                    Some(self.timing.error_dismiss),
                );
                return Err(SubmitOutcome::Invalid(err));
            }
        };

        if !authorized {
            notifier.show(
                StatusKind::Error,
                Some("Unauthorized".into()),
                Some(self.timing.unauthorized_dismiss),
            );
            return Err(SubmitOutcome::Unauthorized);
        }

        notifier.show(StatusKind::Loading, Some("Creating schedules...".into()), None);
        self.phase = FormPhase::Submitting;
        Ok(request)
    }

    /// Second half of a submit: announce the backend's answer.
    ///
    /// Success keeps the form in `Submitting` until [`ScheduleForm::close`];
    /// failure returns to `Editing` with the selection untouched.
    pub fn finish_submit(
        &mut self,
        result: Result<ScheduleGroup, ApiError>,
        notifier: &StatusStore,
    ) -> SubmitOutcome {
        match result {
            Ok(group) => {
                tracing::info!("Created schedule group {}", group.schedule_group_id);
                notifier.show(
                    StatusKind::Success,
                    Some(format!("Group {}", group.schedule_group_id)),
                    Some(self.timing.success_dismiss),
                );
                SubmitOutcome::Created {
                    schedule_group_id: group.schedule_group_id,
                }
            }
            Err(err) => {
                tracing::warn!("Failed to create schedules: {}", err);
                let message = err.user_message("Failed to create schedules");
                let dismiss = if matches!(err, ApiError::MissingToken) {
                    self.timing.unauthorized_dismiss
                } else {
                    self.timing.error_dismiss
                };
                notifier.show(StatusKind::Error, Some(message.clone()), Some(dismiss));
                self.phase = FormPhase::Editing;
                SubmitOutcome::Failed {
                    message,
                    sign_in_required: err.requires_sign_in(),
                }
            }
        }
    }

    pub fn close(&mut self) {
        self.phase = FormPhase::Closed;
    }

    /// Full submit: validate, send one batch request, announce the result and
    /// close after the configured delay on success.
    pub async fn validate_and_submit<A>(
        &mut self,
        api: &A,
        notifier: &StatusStore,
    ) -> SubmitOutcome
    where
        A: ScheduleApi + ?Sized,
    {
        submit_schedules(self, api, notifier, |_| {}).await
    }
}

/// Somewhere a [`ScheduleForm`] lives. The form is only borrowed inside
/// `with_form`, never across an await.
pub trait FormSlot {
    fn with_form<R>(&mut self, f: impl FnOnce(&mut ScheduleForm) -> R) -> R;
}

impl FormSlot for ScheduleForm {
    fn with_form<R>(&mut self, f: impl FnOnce(&mut ScheduleForm) -> R) -> R {
        f(self)
    }
}

/// The submit flow shared by the dialog and [`ScheduleForm::validate_and_submit`].
///
/// `on_created` runs as soon as the group exists, before the close delay.
pub async fn submit_schedules<S, A>(
    slot: &mut S,
    api: &A,
    notifier: &StatusStore,
    on_created: impl FnOnce(i64),
) -> SubmitOutcome
where
    S: FormSlot + ?Sized,
    A: ScheduleApi + ?Sized,
{
    let begun = slot.with_form(|form| form.begin_submit(notifier, api.is_authorized()));
    let request = match begun {
        Ok(request) => request,
        Err(outcome) => return outcome,
    };

    let result = api.create_multiple_schedules(&request).await;
    let outcome = slot.with_form(|form| form.finish_submit(result, notifier));

    if let SubmitOutcome::Created { schedule_group_id } = outcome {
        on_created(schedule_group_id);
        let close_delay = slot.with_form(|form| form.timing().close_delay);
        timer::sleep(notifier.scheduler().as_ref(), close_delay).await;
        slot.with_form(ScheduleForm::close);
    }
    outcome
}

// =============================================================================
// Single schedule
// =============================================================================

/// One video on one device
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SingleScheduleDraft {
    pub device_id: Option<i64>,
    pub start_time: Option<NaiveDateTime>,
    pub end_time: Option<NaiveDateTime>,
    pub repeat: bool,
    pub play_mode: PlayMode,
}

impl SingleScheduleDraft {
    pub fn to_request(&self, video_id: i64) -> Result<SingleScheduleRequest, ValidationError> {
        match (self.device_id, self.start_time) {
            (Some(device_id), Some(start_time)) => Ok(SingleScheduleRequest {
                video_id,
                device_id,
                start_time,
                end_time: self.end_time,
                repeat: self.repeat,
                play_mode: self.play_mode,
            }),
            _ => Err(ValidationError::IncompleteSingle),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifier::timer::TokioScheduler;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn t(s: &str) -> NaiveDateTime {
        parse_datetime_local(s).unwrap()
    }

    fn complete_selection() -> ScheduleSelection {
        let mut selection = ScheduleSelection::default();
        selection.toggle_device(2);
        selection.toggle_device(1);
        selection.toggle_video(10);
        selection.set_start_input("2025-06-01T08:30");
        selection
    }

    struct FakeApi {
        calls: AtomicUsize,
        requests: Mutex<Vec<CreateSchedulesRequest>>,
        reply: fn() -> Result<ScheduleGroup, ApiError>,
        authorized: bool,
    }

    impl FakeApi {
        fn new(reply: fn() -> Result<ScheduleGroup, ApiError>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                requests: Mutex::new(Vec::new()),
                reply,
                authorized: true,
            }
        }
    }

    #[async_trait]
    impl ScheduleApi for FakeApi {
        fn is_authorized(&self) -> bool {
            self.authorized
        }

        async fn create_multiple_schedules(
            &self,
            request: &CreateSchedulesRequest,
        ) -> Result<ScheduleGroup, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().unwrap().push(request.clone());
            (self.reply)()
        }
    }

    fn store() -> StatusStore {
        StatusStore::new(Arc::new(TokioScheduler))
    }

    #[test]
    fn toggling_twice_restores_selection() {
        let mut selection = complete_selection();
        let before = selection.clone();
        assert!(selection.toggle_device(7));
        assert!(!selection.toggle_device(7));
        assert!(!selection.toggle_video(10));
        assert!(selection.toggle_video(10));
        assert_eq!(selection, before);
    }

    #[test]
    fn validation_requires_device_video_and_start() {
        let mut selection = complete_selection();
        assert!(selection.validate().is_ok());

        selection.start_time = None;
        assert_eq!(selection.validate(), Err(ValidationError::IncompleteBatch));

        let mut selection = complete_selection();
        selection.video_ids.clear();
        assert_eq!(selection.validate(), Err(ValidationError::IncompleteBatch));

        let mut selection = complete_selection();
        selection.device_ids.clear();
        assert_eq!(selection.validate(), Err(ValidationError::IncompleteBatch));
    }

    #[test]
    fn request_body_matches_backend_shape() {
        let mut selection = complete_selection();
        selection.play_mode = PlayMode::Once;
        let body = serde_json::to_value(selection.validate().unwrap()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "deviceIds": [1, 2],
                "videoIds": [10],
                "startTime": "2025-06-01T08:30",
                "repeat": false,
                "playMode": "once",
            })
        );
    }

    #[test]
    fn end_time_is_sent_when_set() {
        let mut selection = complete_selection();
        selection.set_end_input("2025-06-01T09:00");
        let body = serde_json::to_value(selection.validate().unwrap()).unwrap();
        assert_eq!(body["endTime"], "2025-06-01T09:00");
    }

    #[test]
    fn end_before_start_is_not_rejected() {
        let mut selection = complete_selection();
        selection.end_time = Some(t("2025-05-01T00:00"));
        assert!(selection.validate().is_ok());
    }

    #[test]
    fn datetime_inputs_accept_seconds_and_blank() {
        assert_eq!(t("2025-06-01T08:30:15").format("%S").to_string(), "15");
        assert!(parse_datetime_local("   ").is_none());
        assert!(parse_datetime_local("tomorrow").is_none());
    }

    #[test]
    fn single_schedule_sends_null_end_time() {
        let draft = SingleScheduleDraft {
            device_id: Some(4),
            start_time: Some(t("2025-06-01T08:30")),
            ..Default::default()
        };
        let body = serde_json::to_value(draft.to_request(9).unwrap()).unwrap();
        assert_eq!(body["end_time"], serde_json::Value::Null);
        assert_eq!(body["play_mode"], "loop");
        assert_eq!(body["video_id"], 9);
    }

    #[test]
    fn single_schedule_requires_device_and_start() {
        let draft = SingleScheduleDraft {
            start_time: Some(t("2025-06-01T08:30")),
            ..Default::default()
        };
        let err = draft.to_request(9).unwrap_err();
        assert_eq!(err.to_string(), "Please select a device and start time");
    }

    #[tokio::test(start_paused = true)]
    async fn empty_devices_never_call_backend() {
        let api = FakeApi::new(|| Ok(ScheduleGroup::default()));
        let notifier = store();
        let mut form = ScheduleForm::new();
        form.toggle_video(10);
        form.selection_mut().set_start_input("2025-06-01T08:30");

        let outcome = form.validate_and_submit(&api, &notifier).await;
        assert_eq!(outcome, SubmitOutcome::Invalid(ValidationError::IncompleteBatch));
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);

        let status = notifier.current();
        assert_eq!(status.kind, StatusKind::Error);
        assert_eq!(status.auto_close_after, Some(Duration::from_millis(2500)));
        assert_eq!(form.phase(), FormPhase::Editing);
    }

    #[tokio::test(start_paused = true)]
    async fn unauthorized_form_never_calls_backend() {
        let mut api = FakeApi::new(|| Ok(ScheduleGroup::default()));
        api.authorized = false;
        let notifier = store();
        let mut form = ScheduleForm::new();
        *form.selection_mut() = complete_selection();

        let outcome = form.validate_and_submit(&api, &notifier).await;
        assert_eq!(outcome, SubmitOutcome::Unauthorized);
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
        assert_eq!(notifier.current().message.as_deref(), Some("Unauthorized"));
    }

    #[tokio::test(start_paused = true)]
    async fn success_announces_group_and_closes() {
        let api = FakeApi::new(|| {
            Ok(ScheduleGroup {
                schedule_group_id: 42,
                msg: None,
            })
        });
        let notifier = store();
        let mut form = ScheduleForm::new();
        *form.selection_mut() = complete_selection();

        let outcome = form.validate_and_submit(&api, &notifier).await;
        assert_eq!(outcome, SubmitOutcome::Created { schedule_group_id: 42 });
        assert_eq!(form.phase(), FormPhase::Closed);

        let requests = api.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].device_ids, vec![1, 2]);
        assert_eq!(requests[0].video_ids, vec![10]);
    }

    #[tokio::test(start_paused = true)]
    async fn begin_submit_shows_loading_and_blocks_resubmit() {
        let notifier = store();
        let mut form = ScheduleForm::new();
        *form.selection_mut() = complete_selection();

        assert!(form.begin_submit(&notifier, true).is_ok());
        assert_eq!(form.phase(), FormPhase::Submitting);
        let status = notifier.current();
        assert_eq!(status.kind, StatusKind::Loading);
        assert_eq!(status.message.as_deref(), Some("Creating schedules..."));

        assert_eq!(form.begin_submit(&notifier, true), Err(SubmitOutcome::Ignored));
    }

    #[tokio::test(start_paused = true)]
    async fn finish_submit_success_message_contains_group() {
        let notifier = store();
        let mut form = ScheduleForm::new();
        *form.selection_mut() = complete_selection();
        form.begin_submit(&notifier, true).unwrap();

        form.finish_submit(
            Ok(ScheduleGroup {
                schedule_group_id: 42,
                msg: None,
            }),
            &notifier,
        );
        let status = notifier.current();
        assert_eq!(status.kind, StatusKind::Success);
        assert!(status.message.unwrap().contains("42"));
        assert_eq!(status.auto_close_after, Some(Duration::from_millis(1600)));
    }

    #[tokio::test(start_paused = true)]
    async fn server_error_keeps_form_open() {
        let api = FakeApi::new(|| {
            Err(ApiError::Remote {
                status: 500,
                message: Some("server error".into()),
            })
        });
        let notifier = store();
        let mut form = ScheduleForm::new();
        *form.selection_mut() = complete_selection();
        let before = form.selection().clone();

        let outcome = form.validate_and_submit(&api, &notifier).await;
        assert_eq!(
            outcome,
            SubmitOutcome::Failed {
                message: "server error".into(),
                sign_in_required: false,
            }
        );
        assert_eq!(form.phase(), FormPhase::Editing);
        assert_eq!(form.selection(), &before);

        let status = notifier.current();
        assert_eq!(status.kind, StatusKind::Error);
        assert_eq!(status.message.as_deref(), Some("server error"));
    }

    /// Form shared with the test body, the way a UI signal is
    struct SharedForm(Arc<Mutex<ScheduleForm>>);

    impl FormSlot for SharedForm {
        fn with_form<R>(&mut self, f: impl FnOnce(&mut ScheduleForm) -> R) -> R {
            f(&mut self.0.lock().unwrap())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn shared_form_is_free_during_close_delay() {
        let api = FakeApi::new(|| {
            Ok(ScheduleGroup {
                schedule_group_id: 7,
                msg: None,
            })
        });
        let notifier = store();
        let form = Arc::new(Mutex::new(ScheduleForm::new()));
        *form.lock().unwrap().selection_mut() = complete_selection();

        let created = Arc::new(Mutex::new(None));
        let task = {
            let mut slot = SharedForm(form.clone());
            let created = created.clone();
            let notifier = notifier.clone();
            tokio::spawn(async move {
                submit_schedules(&mut slot, &api, &notifier, |id| {
                    *created.lock().unwrap() = Some(id);
                })
                .await
            })
        };

        tokio::time::sleep(Duration::from_millis(800)).await;
        assert_eq!(*created.lock().unwrap(), Some(7));
        assert_eq!(form.try_lock().unwrap().phase(), FormPhase::Submitting);
        assert_eq!(notifier.current().message.as_deref(), Some("Group 7"));

        let outcome = task.await.unwrap();
        assert!(outcome.is_created());
        assert_eq!(form.lock().unwrap().phase(), FormPhase::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn failure_without_message_uses_fallback() {
        let api = FakeApi::new(|| Err(ApiError::Network("connection refused".into())));
        let notifier = store();
        let mut form = ScheduleForm::new();
        *form.selection_mut() = complete_selection();

        form.validate_and_submit(&api, &notifier).await;
        assert_eq!(
            notifier.current().message.as_deref(),
            Some("Failed to create schedules")
        );
    }
}
