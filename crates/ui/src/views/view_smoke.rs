use services::{ClientSession, Screen, SessionRequest};
use vote_core::model::{LanguageCode, Respondent, VoteLabel};

use super::test_harness::{HarnessServices, PAIRS_CSV, ViewKind, setup_view_harness};

fn en() -> LanguageCode {
    LanguageCode::new("en").unwrap()
}

async fn active_client(services: &HarnessServices, email: &str) -> ClientSession {
    let mut client = ClientSession::signed_in(Respondent::parse(email).unwrap());
    services
        .session_loop
        .handle(&mut client, SessionRequest::SelectLanguage(en()))
        .await
        .unwrap();
    client
}

#[tokio::test(flavor = "current_thread")]
async fn annotate_view_smoke_renders_login_form() {
    let services = HarnessServices::new(PAIRS_CSV);
    let mut harness = setup_view_harness(ViewKind::Annotate, services, ClientSession::new());
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("请输入邮箱开始"), "missing login prompt in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn annotate_view_smoke_renders_first_question() {
    let services = HarnessServices::new(PAIRS_CSV);
    let client = active_client(&services, "ann@example.org").await;
    let mut harness = setup_view_harness(ViewKind::Annotate, services, client);
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Question 1/3"), "missing heading in {html}");
    assert!(html.contains("Version A is better"), "missing vote button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn annotate_view_smoke_renders_completion() {
    let services = HarnessServices::new(PAIRS_CSV);
    let mut client = active_client(&services, "ann@example.org").await;
    loop {
        let screen = services
            .session_loop
            .render(&client)
            .await
            .unwrap();
        let Screen::Answering(answering) = screen else {
            break;
        };
        services
            .session_loop
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

    let mut harness = setup_view_harness(ViewKind::Annotate, services, client);
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("All completed for this language"), "missing completion in {html}");
    assert!(html.contains("Download My Annotations CSV"), "missing download in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn annotate_view_smoke_shows_operator_error_for_missing_column() {
    let services = HarnessServices::new("normal_conversation_history_en,unrelated\na,b\n");
    let mut client = ClientSession::signed_in(Respondent::parse("ann@example.org").unwrap());
    // Activate against a valid source; the view then renders against the broken one.
    let valid = HarnessServices::new(PAIRS_CSV);
    valid
        .session_loop
        .handle(&mut client, SessionRequest::SelectLanguage(en()))
        .await
        .unwrap();

    let mut harness = setup_view_harness(ViewKind::Annotate, services, client);
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Configuration error"), "missing operator error in {html}");
    assert!(
        html.contains("personalized_conversation_history_en"),
        "missing column name in {html}"
    );
    assert!(!html.contains("Version A"), "rendered item despite error: {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn leaderboard_view_smoke_renders_rank() {
    let services = HarnessServices::new(PAIRS_CSV);
    let mut client = active_client(&services, "ann@example.org").await;
    let Screen::Answering(answering) = services.session_loop.render(&client).await.unwrap() else {
        panic!("expected answering screen");
    };
    services
        .session_loop
        .handle(
            &mut client,
            SessionRequest::Vote {
                item_id: answering.item.id().clone(),
                label: VoteLabel::LeftBetter,
            },
        )
        .await
        .unwrap();

    let mut harness = setup_view_harness(ViewKind::Leaderboard, services, client);
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("ann@example.org"), "missing respondent row in {html}");
    assert!(html.contains("Your rank: 1 out of 1"), "missing rank line in {html}");
    assert!(html.contains("Download Question Stats CSV"), "missing export in {html}");
}
