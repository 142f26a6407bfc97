//! Turns a form's current values into one API submission and maps the
//! outcome back onto the form state and the affected collection.

use std::collections::HashMap;

use log::{debug, info, warn};
use uuid::Uuid;

use crate::api::collections::CollectionStore;
use crate::api::transport::{ApiOutcome, ApiRequest, FilePart, HttpMethod, Transport};

use super::config::FormConfig;
use super::field::{FieldValue, ImageSource, missing_required};
use super::store::{ActionState, FormStore, FormStoreError};

/// Shown when a submission failed without a usable server message.
pub const GENERIC_FAILURE_MESSAGE: &str = "There was a problem submitting the form";

/// Summary of one submit attempt, for the render surface. The authoritative
/// state (message, result record) lives in the form store.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Completed,
    Invalid { missing: Vec<String> },
    AlreadyInFlight,
    Rejected { message: String },
    /// The owning form state was discarded while the request was in flight;
    /// nothing was changed.
    Discarded,
}

/// Drives the submission flow against a [`Transport`] collaborator.
pub struct SubmissionController<T: Transport> {
    transport: T,
}

impl<T: Transport> SubmissionController<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Validates, sends, and applies the result.
    ///
    /// Required-field failures and an already-waiting form short-circuit
    /// before any network traffic. Returns `Err` only for form-store misuse
    /// (unknown id, illegal transition), which indicates a surface bug.
    pub async fn submit(
        &self,
        config: &FormConfig,
        forms: &mut FormStore,
        collections: &mut CollectionStore,
    ) -> Result<SubmitOutcome, FormStoreError> {
        let form_id = &config.form_id;
        let state = forms
            .get(form_id)
            .ok_or_else(|| FormStoreError::UnknownForm(form_id.clone()))?;

        if state.action_state == ActionState::Waiting {
            debug!("ignoring submit for {form_id}: already in flight");
            return Ok(SubmitOutcome::AlreadyInFlight);
        }

        let missing = missing_required(&config.fields, &state.values);
        if !missing.is_empty() {
            let message = format!("Missing required fields: {}", missing.join(", "));
            forms.fail_validation(form_id, message)?;
            return Ok(SubmitOutcome::Invalid { missing });
        }

        let request = build_request(config, &state.values);
        forms.begin_submission(form_id)?;

        let correlation = Uuid::new_v4();
        info!(
            "submitting {form_id} [{correlation}]: {} {}",
            request.method.as_str(),
            request.url
        );
        let outcome = self.transport.send(request).await;
        debug!("submission {correlation} resolved: {outcome:?}");

        apply_outcome(config, forms, collections, outcome)
    }
}

/// Applies a transport outcome to the stores.
///
/// Runs as the completion continuation of [`SubmissionController::submit`];
/// split out because the owning panel may have closed while the request was
/// in flight, in which case the whole completion is a no-op.
pub fn apply_outcome(
    config: &FormConfig,
    forms: &mut FormStore,
    collections: &mut CollectionStore,
    outcome: ApiOutcome,
) -> Result<SubmitOutcome, FormStoreError> {
    let form_id = &config.form_id;
    if forms.get(form_id).is_none() {
        warn!("submission for {form_id} finished after its panel closed; dropping result");
        return Ok(SubmitOutcome::Discarded);
    }

    match outcome {
        ApiOutcome::Success { status, record } => {
            debug!("{form_id} succeeded with status {status}");
            match config.api.method {
                HttpMethod::Post => collections.append(config.api.collection, record.clone()),
                HttpMethod::Put => collections.upsert(config.api.collection, record.clone()),
            }
            forms.complete_submission(form_id, config.api.success_message.clone(), record)?;
            Ok(SubmitOutcome::Completed)
        }
        ApiOutcome::Unparsable { status } => {
            warn!("{form_id}: status {status} counts as success but the body did not parse");
            forms.fail_submission(form_id, GENERIC_FAILURE_MESSAGE.to_string())?;
            Ok(SubmitOutcome::Rejected {
                message: GENERIC_FAILURE_MESSAGE.to_string(),
            })
        }
        ApiOutcome::Rejected { status, detail } => {
            let message = detail.unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string());
            warn!("{form_id} rejected with status {status}: {message}");
            forms.fail_submission(form_id, message.clone())?;
            Ok(SubmitOutcome::Rejected { message })
        }
        ApiOutcome::TransportFailed { detail } => {
            warn!("{form_id} transport failure: {detail}");
            forms.fail_submission(form_id, GENERIC_FAILURE_MESSAGE.to_string())?;
            Ok(SubmitOutcome::Rejected {
                message: GENERIC_FAILURE_MESSAGE.to_string(),
            })
        }
    }
}

/// Assembles the multipart request: text parts for plain fields, binary
/// parts for uploaded images, a text reference for URL-backed images, and
/// nothing for absent values.
fn build_request(config: &FormConfig, values: &HashMap<String, FieldValue>) -> ApiRequest {
    let mut fields = Vec::new();
    let mut files = Vec::new();
    for descriptor in &config.fields {
        let Some(value) = values.get(&descriptor.name) else {
            continue;
        };
        match value {
            FieldValue::Empty => {}
            FieldValue::Text(text) => fields.push((descriptor.name.clone(), text.clone())),
            FieldValue::Toggle(on) => fields.push((descriptor.name.clone(), on.to_string())),
            FieldValue::Image(ImageSource::Url(url)) => {
                fields.push((descriptor.name.clone(), url.clone()));
            }
            FieldValue::Image(ImageSource::File { file_name, bytes }) => {
                files.push(FilePart {
                    field: descriptor.name.clone(),
                    file_name: descriptor
                        .file_name
                        .clone()
                        .unwrap_or_else(|| file_name.clone()),
                    bytes: bytes.clone(),
                });
            }
        }
    }
    ApiRequest {
        method: config.api.method,
        url: config.api.action_url.clone(),
        fields,
        files,
        success_statuses: config.api.success_statuses.clone(),
    }
}
