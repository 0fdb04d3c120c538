use dioxus::prelude::*;
use services::{Screen, SessionRequest};
use vote_core::model::{LanguageCode, LanguageSpec, VoteLabel};

use crate::context::{AppContext, ClientState};
use crate::i18n::UiLang;
use crate::views::export::{ExportButton, ExportKind};
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{AnsweringVm, CompletionVm, ScreenVm, map_screen};

#[component]
pub fn AnnotateView() -> Element {
    let ctx = use_context::<AppContext>();
    let state = use_context::<ClientState>();
    let session_loop = ctx.session_loop();

    let initial = use_resource(move || {
        let session_loop = session_loop.clone();
        async move {
            let client = state.client.peek().clone();
            session_loop
                .render(&client)
                .await
                .map_err(|err| ViewError::from(&err))
        }
    });

    let current: ViewState<Screen> = match state.screen.read().clone() {
        Some(Ok(screen)) => ViewState::Ready(screen),
        Some(Err(err)) => ViewState::Error(err),
        None => view_state_from_resource(&initial),
    };
    let lang = UiLang::for_code(state.client.read().language());
    let retry = {
        let ctx = ctx.clone();
        move |_: MouseEvent| state.dispatch(&ctx, SessionRequest::Refresh)
    };

    rsx! {
        div { class: "page",
            match current {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "{lang.text().loading}" }
                },
                ViewState::Ready(screen) => {
                    let mine = match &screen {
                        Screen::Complete(done) => Some(ExportKind::Mine {
                            respondent: done.respondent.clone(),
                            language: done.language.code.clone(),
                        }),
                        _ => None,
                    };
                    match map_screen(&screen) {
                        ScreenVm::Login { rejected } => rsx! {
                            LoginPanel { rejected }
                        },
                        ScreenVm::LanguageSelect { languages } => rsx! {
                            LanguagePanel { languages }
                        },
                        ScreenVm::Answering(vm) => rsx! {
                            AnsweringPanel { vm, lang }
                        },
                        ScreenVm::Complete(vm) => rsx! {
                            CompletePanel { vm, lang, export: mine }
                        },
                    }
                }
                ViewState::Error(err) if err.is_operator() => rsx! {
                    div { class: "fatal",
                        h2 { "Configuration error" }
                        pre { "{err.message()}" }
                    }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                    button { class: "btn", onclick: retry, "Retry" }
                },
            }
        }
    }
}

#[component]
fn LoginPanel(rejected: bool) -> Element {
    let ctx = use_context::<AppContext>();
    let state = use_context::<ClientState>();
    let mut email = use_signal(String::new);
    let text = UiLang::Zh.text();

    rsx! {
        h2 { "{text.login_title}" }
        form {
            class: "login",
            onsubmit: move |evt: FormEvent| {
                evt.prevent_default();
                state.dispatch(&ctx, SessionRequest::SubmitEmail(email()));
            },
            label { r#for: "login-email", "{text.login_prompt}" }
            input {
                id: "login-email",
                r#type: "email",
                placeholder: "you@company.com",
                value: "{email}",
                oninput: move |evt| email.set(evt.value()),
            }
            button { class: "btn primary", r#type: "submit", "{text.login_submit}" }
        }
        if rejected {
            p { class: "warning", "{text.login_rejected}" }
        }
    }
}

#[component]
fn LanguagePanel(languages: Vec<LanguageSpec>) -> Element {
    let ctx = use_context::<AppContext>();
    let state = use_context::<ClientState>();
    let first = languages
        .first()
        .map(|spec| spec.code.to_string())
        .unwrap_or_default();
    let mut selected = use_signal(move || first);
    let text = UiLang::Zh.text();

    rsx! {
        h2 { "{text.choose_language_title}" }
        select {
            class: "language-select",
            value: "{selected}",
            onchange: move |evt| selected.set(evt.value()),
            for spec in languages {
                option { value: "{spec.code}", "{spec.label}" }
            }
        }
        button {
            class: "btn primary",
            onclick: move |_| {
                if let Ok(code) = LanguageCode::new(selected()) {
                    state.dispatch(&ctx, SessionRequest::SelectLanguage(code));
                }
            },
            "{text.confirm}"
        }
    }
}

#[component]
fn AnsweringPanel(vm: AnsweringVm, lang: UiLang) -> Element {
    let ctx = use_context::<AppContext>();
    let state = use_context::<ClientState>();
    let text = lang.text();
    let vote = {
        let item_id = vm.item_id.clone();
        move |label: VoteLabel| {
            state.dispatch(
                &ctx,
                SessionRequest::Vote {
                    item_id: item_id.clone(),
                    label,
                },
            );
        }
    };
    let vote_a = vote.clone();
    let vote_tie = vote.clone();
    let vote_b = vote;

    rsx! {
        h2 { "{vm.heading}" }
        div { class: "pair",
            div { class: "answer",
                h3 { "{text.version_a}" }
                div { class: "answer-text", dangerous_inner_html: "{vm.answer_a_html}" }
            }
            div { class: "answer",
                h3 { "{text.version_b}" }
                div { class: "answer-text", dangerous_inner_html: "{vm.answer_b_html}" }
            }
        }
        hr {}
        div { class: "vote-buttons",
            button {
                id: "vote-left",
                class: "btn",
                onclick: move |_| vote_a(VoteLabel::LeftBetter),
                "{text.vote_a}"
            }
            button {
                id: "vote-tie",
                class: "btn",
                onclick: move |_| vote_tie(VoteLabel::Tie),
                "{text.tie}"
            }
            button {
                id: "vote-right",
                class: "btn",
                onclick: move |_| vote_b(VoteLabel::RightBetter),
                "{text.vote_b}"
            }
        }
        div { class: "progress",
            div { class: "progress-fill", style: "width: {vm.progress_pct:.1}%;" }
            span { class: "progress-label", "{vm.progress_label}" }
        }
    }
}

#[component]
fn CompletePanel(vm: CompletionVm, lang: UiLang, export: Option<ExportKind>) -> Element {
    let text = lang.text();
    rsx! {
        div { class: "success", "{text.complete}" }
        p { class: "finish-time", "{vm.summary}" }
        {export.map(|kind| rsx! {
            ExportButton { label: text.download_mine.to_string(), kind, lang }
        })}
        table { class: "votes",
            thead {
                tr {
                    th { "pair_id" }
                    th { "label" }
                    th { "ts" }
                }
            }
            tbody {
                for row in vm.votes {
                    tr { key: "{row.item_id}",
                        td { "{row.item_id}" }
                        td { "{row.label}" }
                        td { "{row.voted_at}" }
                    }
                }
            }
        }
    }
}
