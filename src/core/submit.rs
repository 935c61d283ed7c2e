use indexmap::IndexMap;

use super::{
    form::FormState,
    SubmitError,
    TransportError,
};
use crate::services::{
    RawResponse,
    SaveService,
};

pub const DEFAULT_SUCCESS_MESSAGE: &str = "Model card data submitted successfully!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub message: String,
}

/// Sends whatever the form currently shows. Knows nothing about imported records.
#[derive(Debug, Default)]
pub struct SubmitController {
    in_flight: bool,
}

impl SubmitController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    pub fn begin_submit(&mut self, form: &FormState) -> Result<IndexMap<String, String>, SubmitError> {
        if self.in_flight {
            return Err(SubmitError::Busy);
        }
        self.in_flight = true;

        let payload = form.serialize();
        tracing::info!(fields = payload.len(), "submitting form");
        Ok(payload)
    }

    /// Resets the form only on success; a rejected save leaves it populated.
    pub fn finish_submit(
        &mut self,
        form: &mut FormState,
        response: Result<RawResponse, TransportError>,
    ) -> Result<SubmitOutcome, SubmitError> {
        self.in_flight = false;

        let response = response.map_err(|e| SubmitError::NetworkError(e.0))?;
        let outcome = interpret_save_response(&response)?;
        form.reset();
        tracing::info!("form submitted");
        Ok(outcome)
    }

    pub async fn submit(
        &mut self,
        form: &mut FormState,
        saver: &dyn SaveService,
    ) -> Result<SubmitOutcome, SubmitError> {
        let payload = self.begin_submit(form)?;
        let response = saver.save(&payload).await;
        self.finish_submit(form, response)
    }
}

pub fn interpret_save_response(response: &RawResponse) -> Result<SubmitOutcome, SubmitError> {
    if !response.is_success() {
        let message = response
            .message_field(&["detail", "error", "message"])
            .unwrap_or_else(|| format!("HTTP error! Status: {}", response.status));
        return Err(SubmitError::SaveRejected(message));
    }

    let message = response
        .message_field(&["message"])
        .unwrap_or_else(|| DEFAULT_SUCCESS_MESSAGE.to_string());
    Ok(SubmitOutcome { message })
}
