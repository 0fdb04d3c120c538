mod client;
mod progress;
mod screen;
mod workflow;

pub use crate::error::SessionError;
pub use client::{ClientSession, Stage};
pub use progress::SessionProgress;
pub use screen::{AnsweringScreen, CompletionScreen, Screen, SessionRequest};
pub use workflow::SessionLoopService;
