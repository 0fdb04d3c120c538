pub mod app;
pub mod context;
pub mod i18n;
pub mod routes;
pub mod vm;
pub mod views;

pub use app::App;
pub use context::{AppContext, ClientState, UiApp, build_app_context};
