use dioxus::prelude::*;
use vote_core::model::LanguageCode;

use crate::context::{AppContext, ClientState};
use crate::i18n::UiLang;
use crate::views::export::{ExportButton, ExportKind};
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{ItemStatsRowVm, LeaderboardRowVm, format_one_decimal, map_item_stats, map_leaderboard};

#[derive(Clone, Debug, PartialEq)]
struct BoardData {
    language: LanguageCode,
    rows: Vec<LeaderboardRowVm>,
    my_rank: Option<String>,
    stats: Vec<ItemStatsRowVm>,
}

#[component]
pub fn LeaderboardView() -> Element {
    let ctx = use_context::<AppContext>();
    let state = use_context::<ClientState>();
    let leaderboard = ctx.leaderboard();

    let resource = use_resource(move || {
        let leaderboard = leaderboard.clone();
        let client = state.client.read().clone();
        // Re-query after every vote.
        let _ = state.screen.read();
        async move {
            let Some(language) = client.language().cloned() else {
                return Ok::<_, ViewError>(None);
            };
            let text = UiLang::for_code(Some(&language)).text();
            let board = leaderboard
                .leaderboard(&language)
                .await
                .map_err(|_| ViewError::Unknown)?;
            let tallies = leaderboard
                .item_tallies(&language)
                .await
                .map_err(|_| ViewError::Unknown)?;
            let me = client.respondent();
            let my_rank = me.and_then(|me| board.my_rank(me)).map(|rank| {
                text.my_rank(
                    rank.rank,
                    rank.participants,
                    rank.completed,
                    &format_one_decimal(rank.avg_secs_per_item),
                )
            });
            Ok::<_, ViewError>(Some(BoardData {
                rows: map_leaderboard(&board, me.map(|me| me.email())),
                my_rank,
                stats: map_item_stats(&tallies),
                language,
            }))
        }
    });
    let state_view = view_state_from_resource(&resource);
    let lang = UiLang::for_code(state.client.read().language());
    let text = lang.text();

    rsx! {
        div { class: "page",
            h2 { "{text.leaderboard}" }
            match state_view {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "{text.loading}" }
                },
                ViewState::Ready(None) => rsx! {
                    p { class: "info", "{text.no_data}" }
                },
                ViewState::Ready(Some(data)) => rsx! {
                    BoardTables { data, lang }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                },
            }
        }
    }
}

#[component]
fn BoardTables(data: BoardData, lang: UiLang) -> Element {
    let text = lang.text();
    let BoardData {
        language,
        rows,
        my_rank,
        stats,
    } = data;
    let collected = text.collected_for(&language);
    rsx! {
        if rows.is_empty() {
            p { class: "info", "{text.no_data}" }
        } else {
            table { class: "leaderboard",
                thead {
                    tr {
                        th { "{text.col_rank}" }
                        th { "{text.col_email}" }
                        th { "{text.col_completed}" }
                        th { "{text.col_avg_time}" }
                    }
                }
                tbody {
                    for row in rows {
                        tr { key: "{row.email}", class: if row.is_me { "me" } else { "" },
                            td { "{row.rank}" }
                            td { "{row.email}" }
                            td { "{row.completed}" }
                            td { "{row.avg_secs}" }
                        }
                    }
                }
            }
        }
        {my_rank.map(|rank| rsx! {
            div { class: "success", "{rank}" }
        })}

        hr {}
        h3 { "{text.export}" }
        if !stats.is_empty() {
            p { "{collected}" }
            table { class: "item-stats",
                thead {
                    tr {
                        th { "pair_id" }
                        th { "{text.col_voters}" }
                        th { "{text.col_avg_score}" }
                        th { "{text.col_version_a}" }
                        th { "{text.col_tie}" }
                        th { "{text.col_version_b}" }
                    }
                }
                tbody {
                    for row in stats {
                        tr { key: "{row.item_id}",
                            td { "{row.item_id}" }
                            td { "{row.voters}" }
                            td { "{row.avg_score}" }
                            td { "{row.left_better}" }
                            td { "{row.tie}" }
                            td { "{row.right_better}" }
                        }
                    }
                }
            }
            ExportButton {
                label: text.download_stats.to_string(),
                kind: ExportKind::ItemStats(language.clone()),
                lang,
            }
            ExportButton {
                label: text.download_raw.to_string(),
                kind: ExportKind::RawVotes(language.clone()),
                lang,
            }
            details { class: "admin",
                summary { "{text.admin}" }
                ExportButton {
                    label: text.download_all.to_string(),
                    kind: ExportKind::AllLanguages,
                    lang,
                }
            }
        } else {
            p { class: "info", "{text.no_export}" }
        }
    }
}
