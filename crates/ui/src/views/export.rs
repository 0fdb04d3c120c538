use dioxus::prelude::*;
use services::{CsvExport, ExportError, ExportService};
use vote_core::model::{LanguageCode, Respondent};

use crate::context::AppContext;
use crate::i18n::UiLang;
use crate::views::ViewError;

/// Which CSV document a button produces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExportKind {
    Mine {
        respondent: Respondent,
        language: LanguageCode,
    },
    ItemStats(LanguageCode),
    RawVotes(LanguageCode),
    AllLanguages,
}

impl ExportKind {
    async fn build(&self, exports: &ExportService) -> Result<CsvExport, ExportError> {
        match self {
            ExportKind::Mine {
                respondent,
                language,
            } => exports.my_votes(respondent, language).await,
            ExportKind::ItemStats(language) => exports.item_stats(language).await,
            ExportKind::RawVotes(language) => exports.raw_votes(language).await,
            ExportKind::AllLanguages => exports.all_votes().await,
        }
    }
}

/// Saves one export into the configured export directory.
#[component]
pub fn ExportButton(label: String, kind: ExportKind, lang: UiLang) -> Element {
    let ctx = use_context::<AppContext>();
    let mut outcome = use_signal(|| None::<Result<String, ViewError>>);

    let on_click = {
        let ctx = ctx.clone();
        move |_: MouseEvent| {
            let exports = ctx.exports();
            let dir = ctx.export_dir().to_path_buf();
            let kind = kind.clone();
            spawn(async move {
                let result = match kind.build(&exports).await {
                    Ok(export) => export.write_to(&dir),
                    Err(err) => Err(err),
                };
                match result {
                    Ok(path) => outcome.set(Some(Ok(path.display().to_string()))),
                    Err(err) => {
                        tracing::warn!(error = %err, "export failed");
                        outcome.set(Some(Err(ViewError::from(&err))));
                    }
                }
            });
        }
    };

    let text = lang.text();
    rsx! {
        div { class: "export",
            button { class: "btn secondary", onclick: on_click, "{label}" }
            match outcome() {
                Some(Ok(path)) => rsx! {
                    span { class: "export-path", "{text.saved_to} {path}" }
                },
                Some(Err(err)) => rsx! {
                    span { class: "export-error", "{err.message()}" }
                },
                None => rsx! {},
            }
        }
    }
}
