use std::io::Write;
use std::sync::Arc;

use chrono::Duration;
use services::{
    ClientSession, Clock, ExportService, LeaderboardService, PairCache, Screen, SessionError,
    SessionLoopService, SessionRequest,
};
use storage::repository::Storage;
use tempfile::NamedTempFile;
use vote_core::model::{ItemId, LanguageCode, LanguageSpec, Respondent, VoteLabel};
use vote_core::time::fixed_now;

const THREE_OF_FOUR: &str = "\
normal_conversation_history_en,personalized_conversation_history_en
\"**bold** left one\",right one
left two,right two
left three,
left four,right four
";

fn source(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn en() -> LanguageCode {
    LanguageCode::new("en").unwrap()
}

fn loop_at(
    clock: Clock,
    storage: &Storage,
    pairs: &Arc<PairCache>,
    file: &NamedTempFile,
) -> SessionLoopService {
    SessionLoopService::new(
        clock,
        storage,
        Arc::clone(pairs),
        file.path(),
        LanguageSpec::defaults(),
    )
}

async fn sqlite_storage(name: &str) -> Storage {
    Storage::sqlite(&format!("sqlite:file:{name}?mode=memory&cache=shared"))
        .await
        .unwrap()
}

#[tokio::test]
async fn full_pass_over_sqlite_completes_once() {
    let file = source(THREE_OF_FOUR);
    let storage = sqlite_storage("smoke_full_pass").await;
    let pairs = Arc::new(PairCache::seeded(5));
    let start = fixed_now();

    let svc = loop_at(Clock::fixed(start), &storage, &pairs, &file);
    let mut client = ClientSession::new();
    svc.handle(&mut client, SessionRequest::SubmitEmail("ann@example.org".into()))
        .await
        .unwrap();
    let mut screen = svc
        .handle(&mut client, SessionRequest::SelectLanguage(en()))
        .await
        .unwrap();

    let Screen::Answering(first) = &screen else {
        panic!("expected answering screen, got {screen:?}");
    };
    assert_eq!((first.position, first.total), (1, 3));

    let mut seen = Vec::new();
    let mut tick = 0_i64;
    while let Screen::Answering(answering) = screen {
        tick += 20;
        seen.push(answering.item.id().clone());
        let svc = loop_at(Clock::fixed(start + Duration::seconds(tick)), &storage, &pairs, &file);
        screen = svc
            .handle(
                &mut client,
                SessionRequest::Vote {
                    item_id: answering.item.id().clone(),
                    label: VoteLabel::RightBetter,
                },
            )
            .await
            .unwrap();
    }
    seen.sort();
    assert_eq!(seen, vec![ItemId::new("1"), ItemId::new("2"), ItemId::new("3")]);

    let Screen::Complete(done) = screen else {
        panic!("expected completion");
    };
    assert_eq!(done.elapsed_secs, 60.0);
    assert_eq!(done.my_votes.len(), 3);

    let ann = Respondent::parse("ann@example.org").unwrap();
    let revisit = loop_at(Clock::fixed(start + Duration::days(1)), &storage, &pairs, &file);
    let again = revisit
        .handle(&mut client, SessionRequest::Refresh)
        .await
        .unwrap();
    assert!(again.is_complete());
    let session = storage
        .sessions
        .get_session(&ann, &en())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(session.finished_at(), Some(start + Duration::seconds(60)));
}

#[tokio::test]
async fn percentile_compares_against_other_finishers() {
    let file = source(THREE_OF_FOUR);
    let storage = Storage::in_memory();
    let pairs = Arc::new(PairCache::seeded(9));
    let start = fixed_now();

    // Two respondents: one takes 3s per item, the other 30s.
    for (email, step) in [("quick@example.org", 3_i64), ("slow@example.org", 30)] {
        let mut client = ClientSession::new();
        let svc = loop_at(Clock::fixed(start), &storage, &pairs, &file);
        svc.handle(&mut client, SessionRequest::SubmitEmail(email.into()))
            .await
            .unwrap();
        let mut screen = svc
            .handle(&mut client, SessionRequest::SelectLanguage(en()))
            .await
            .unwrap();
        let mut at = start;
        while let Screen::Answering(answering) = screen {
            at += Duration::seconds(step);
            screen = loop_at(Clock::fixed(at), &storage, &pairs, &file)
                .handle(
                    &mut client,
                    SessionRequest::Vote {
                        item_id: answering.item.id().clone(),
                        label: VoteLabel::Tie,
                    },
                )
                .await
                .unwrap();
        }
    }

    let mut quick = ClientSession::signed_in(Respondent::parse("quick@example.org").unwrap());
    let svc = loop_at(Clock::fixed(start), &storage, &pairs, &file);
    let Screen::Complete(done) = svc
        .handle(&mut quick, SessionRequest::SelectLanguage(en()))
        .await
        .unwrap()
    else {
        panic!("expected completion");
    };
    assert_eq!(done.elapsed_secs, 9.0);
    assert_eq!(done.percentile, 0.0);

    let mut slow = ClientSession::signed_in(Respondent::parse("slow@example.org").unwrap());
    let Screen::Complete(done) = svc
        .handle(&mut slow, SessionRequest::SelectLanguage(en()))
        .await
        .unwrap()
    else {
        panic!("expected completion");
    };
    assert_eq!(done.elapsed_secs, 90.0);
    assert_eq!(done.percentile, 50.0);

    let board = LeaderboardService::new(Arc::clone(&storage.votes))
        .leaderboard(&en())
        .await
        .unwrap();
    assert_eq!(board.entries[0].respondent.email(), "quick@example.org");
    assert_eq!(board.entries[1].avg_secs_per_item, 20.0);

    let stats = ExportService::new(Arc::clone(&storage.votes))
        .item_stats(&en())
        .await
        .unwrap();
    assert!(stats.contents.contains("\n1,2,0.0,0,2,0\n"));
}

#[tokio::test]
async fn missing_column_surfaces_as_fatal_config_error() {
    let file = source("normal_conversation_history_en,other\na,b\n");
    let svc = loop_at(
        Clock::fixed(fixed_now()),
        &Storage::in_memory(),
        &Arc::new(PairCache::seeded(1)),
        &file,
    );
    let mut client = ClientSession::new();
    svc.handle(&mut client, SessionRequest::SubmitEmail("ann@example.org".into()))
        .await
        .unwrap();
    let err = svc
        .handle(&mut client, SessionRequest::SelectLanguage(en()))
        .await
        .unwrap_err();
    assert!(err.is_fatal_config());
}

#[tokio::test]
async fn empty_item_set_is_reported() {
    let file = source("normal_conversation_history_en,personalized_conversation_history_en\n,x\n");
    let svc = loop_at(
        Clock::fixed(fixed_now()),
        &Storage::in_memory(),
        &Arc::new(PairCache::seeded(1)),
        &file,
    );
    let mut client = ClientSession::signed_in(Respondent::parse("ann@example.org").unwrap());
    let err = svc
        .handle(&mut client, SessionRequest::SelectLanguage(en()))
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::Empty(_)));
}
