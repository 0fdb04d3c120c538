use services::{AnsweringScreen, CompletionScreen, Screen};
use vote_core::model::{ItemId, LanguageSpec};

use super::markdown_vm::markdown_to_html;
use super::time_fmt::{format_datetime, whole_secs};
use crate::i18n::UiLang;

/// Display data for one comparison.
#[derive(Clone, Debug, PartialEq)]
pub struct AnsweringVm {
    pub item_id: ItemId,
    pub heading: String,
    pub answer_a_html: String,
    pub answer_b_html: String,
    pub progress_label: String,
    /// Filled share of the progress bar, in percent.
    pub progress_pct: f64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoteRowVm {
    pub item_id: String,
    pub label: i64,
    pub voted_at: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CompletionVm {
    pub summary: String,
    pub votes: Vec<VoteRowVm>,
}

/// Everything the annotate page can show.
#[derive(Clone, Debug, PartialEq)]
pub enum ScreenVm {
    Login { rejected: bool },
    LanguageSelect { languages: Vec<LanguageSpec> },
    Answering(AnsweringVm),
    Complete(CompletionVm),
}

#[must_use]
pub fn map_screen(screen: &Screen) -> ScreenVm {
    match screen {
        Screen::Login { rejected } => ScreenVm::Login {
            rejected: rejected.is_some(),
        },
        Screen::LanguageSelect { languages, .. } => ScreenVm::LanguageSelect {
            languages: languages.clone(),
        },
        Screen::Answering(answering) => ScreenVm::Answering(map_answering(answering)),
        Screen::Complete(done) => ScreenVm::Complete(map_completion(done)),
    }
}

fn map_answering(screen: &AnsweringScreen) -> AnsweringVm {
    let text = UiLang::for_code(Some(&screen.language.code)).text();
    AnsweringVm {
        item_id: screen.item.id().clone(),
        heading: text.question_heading(screen.position, screen.total),
        answer_a_html: markdown_to_html(screen.item.answer_a()),
        answer_b_html: markdown_to_html(screen.item.answer_b()),
        progress_label: format!("{}/{}", screen.position, screen.total),
        progress_pct: screen.progress.fraction() * 100.0,
    }
}

fn map_completion(screen: &CompletionScreen) -> CompletionVm {
    let text = UiLang::for_code(Some(&screen.language.code)).text();
    CompletionVm {
        summary: text.finish_time(whole_secs(screen.elapsed_secs), screen.percentile),
        votes: screen
            .my_votes
            .iter()
            .map(|vote| VoteRowVm {
                item_id: vote.item_id.to_string(),
                label: vote.label.to_i64(),
                voted_at: format_datetime(vote.voted_at),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use services::SessionProgress;
    use vote_core::model::{ComparisonItem, LanguageCode, Respondent, Vote, VoteLabel};
    use vote_core::time::fixed_now;

    fn en() -> LanguageSpec {
        LanguageSpec::defaults()
            .into_iter()
            .find(|spec| spec.code.as_str() == "en")
            .unwrap()
    }

    fn alice() -> Respondent {
        Respondent::parse("alice@example.com").unwrap()
    }

    #[test]
    fn answering_screen_renders_markdown_and_progress() {
        let screen = Screen::Answering(AnsweringScreen {
            respondent: alice(),
            language: en(),
            item: ComparisonItem::new(ItemId::new("2"), "*left*", "right"),
            position: 1,
            total: 4,
            progress: SessionProgress::new(4, 0),
        });
        let ScreenVm::Answering(vm) = map_screen(&screen) else {
            panic!("expected answering vm");
        };
        assert_eq!(vm.heading, "Question 1/4");
        assert_eq!(vm.progress_label, "1/4");
        assert_eq!(vm.progress_pct, 25.0);
        assert!(vm.answer_a_html.contains("<em>left</em>"));
    }

    #[test]
    fn completion_truncates_seconds() {
        let screen = Screen::Complete(CompletionScreen {
            respondent: alice(),
            language: en(),
            elapsed_secs: 61.8,
            percentile: 0.0,
            my_votes: vec![Vote::new(
                alice(),
                LanguageCode::new("en").unwrap(),
                ItemId::new("1"),
                VoteLabel::RightBetter,
                fixed_now(),
            )],
        });
        let ScreenVm::Complete(vm) = map_screen(&screen) else {
            panic!("expected completion vm");
        };
        assert!(vm.summary.contains("61 seconds"));
        assert_eq!(vm.votes[0].label, -1);
        assert_eq!(vm.votes[0].voted_at, "2023-11-14 22:13:20");
    }
}
