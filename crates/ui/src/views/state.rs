use dioxus::prelude::*;
use services::{ExportError, SessionError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewError {
    Unknown,
    /// Misconfiguration only the operator can fix; nothing else is rendered.
    Operator(String),
}

impl ViewError {
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            ViewError::Unknown => "Something went wrong. Please try again.".to_string(),
            ViewError::Operator(detail) => detail.clone(),
        }
    }

    #[must_use]
    pub fn is_operator(&self) -> bool {
        matches!(self, ViewError::Operator(_))
    }
}

impl From<&SessionError> for ViewError {
    fn from(err: &SessionError) -> Self {
        if err.is_fatal_config() || matches!(err, SessionError::Empty(_)) {
            ViewError::Operator(err.to_string())
        } else {
            ViewError::Unknown
        }
    }
}

impl From<&ExportError> for ViewError {
    fn from(err: &ExportError) -> Self {
        match err {
            ExportError::Io { .. } => ViewError::Operator(err.to_string()),
            _ => ViewError::Unknown,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: &Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(err.clone()),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}
