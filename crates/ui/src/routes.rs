use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable, use_navigator};
use services::SessionRequest;

use crate::context::{AppContext, ClientState};
use crate::i18n::UiLang;
use crate::vm::format_one_decimal;
use crate::views::{AnnotateView, LeaderboardView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", AnnotateView)] Annotate {},
        #[route("/leaderboard", LeaderboardView)] Leaderboard {},
}

#[component]
fn Layout() -> Element {
    let ctx = use_context::<AppContext>();
    use_context_provider(|| ClientState {
        client: Signal::new(ctx.initial_client()),
        screen: Signal::new(None),
    });

    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
struct SourceStats {
    rows: usize,
    avg_len_a: f64,
    avg_len_b: f64,
}

#[component]
fn Sidebar() -> Element {
    let ctx = use_context::<AppContext>();
    let state = use_context::<ClientState>();
    let navigator = use_navigator();
    let session_loop = ctx.session_loop();

    let client = state.client.read().clone();
    let lang = UiLang::for_code(client.language());
    let text = lang.text();

    let stats = use_resource(move || {
        let session_loop = session_loop.clone();
        let language = state.client.read().language().cloned();
        async move {
            let language = language?;
            let set = session_loop.pair_set(&language).ok()?;
            Some(SourceStats {
                rows: set.stats().rows_read,
                avg_len_a: set.stats().avg_len_a,
                avg_len_b: set.stats().avg_len_b,
            })
        }
    });
    let identity = client.respondent().map(ToString::to_string);
    let language_label = client.language().and_then(|code| {
        ctx.session_loop()
            .language(code)
            .ok()
            .map(|spec| spec.label.clone())
    });

    rsx! {
        nav { class: "sidebar",
            h1 { "AB Battle" }
            {identity.map(|email| rsx! {
                div { class: "identity",
                    p { "🆔 {email}" }
                    {language_label.map(|label| rsx! {
                        p { "🌐 {text.language_label}: {label}" }
                    })}
                }
            })}
            if client.language().is_some() {
                ul {
                    li { Link { to: Route::Annotate {}, "{text.tab_annotate}" } }
                    li { Link { to: Route::Leaderboard {}, "{text.tab_leaderboard}" } }
                }
                {stats.read().as_ref().cloned().flatten().map(|stats| rsx! {
                    div { class: "source-stats",
                        p { "{text.sample_count}: {stats.rows}" }
                        p { "{text.avg_len_a}: {format_one_decimal(stats.avg_len_a)} {text.length_unit}" }
                        p { "{text.avg_len_b}: {format_one_decimal(stats.avg_len_b)} {text.length_unit}" }
                    }
                })}
                button {
                    class: "btn secondary",
                    onclick: move |_| {
                        state.dispatch(&ctx, SessionRequest::SwitchLanguage);
                        navigator.push(Route::Annotate {});
                    },
                    "{text.switch_language}"
                }
            }
        }
    }
}
