//! Integration tests for the Planning Center API client and the
//! fetch-filter-join pipeline, backed by a mock HTTP server.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use chrono::NaiveDate;
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;

use planorder::config::Config;
use planorder::error::Error;
use planorder::planning_center::PlanningCenterClient;
use planorder::{render, schedule};

fn test_config() -> Config {
    Config {
        pco_app_id: "id".to_string(),
        pco_secret: "secret".to_string(),
    }
}

fn client_for(server: &ServerGuard) -> PlanningCenterClient {
    PlanningCenterClient::with_base_url(&test_config(), server.url())
}

fn after_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

#[tokio::test]
async fn finds_the_first_plan_after_a_date() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("per_page".into(), "1".into()),
            Matcher::UrlEncoded("filter".into(), "after".into()),
            Matcher::UrlEncoded("after".into(), "2024-01-01".into()),
        ]))
        // base64("id:secret")
        .match_header("authorization", "Basic aWQ6c2VjcmV0")
        .match_header("accept", "application/json")
        .with_body(json!({"data": [{"id": "p1", "attributes": {}}]}).to_string())
        .create_async()
        .await;

    let plan_id = client_for(&server)
        .find_first_plan_after(after_date())
        .await
        .unwrap();

    assert_eq!(plan_id, "p1");
    mock.assert_async().await;
}

#[tokio::test]
async fn missing_plan_is_a_lookup_failure() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/")
        .match_query(Matcher::Any)
        .with_body(json!({"data": []}).to_string())
        .create_async()
        .await;

    let err = client_for(&server)
        .find_first_plan_after(after_date())
        .await
        .unwrap_err();

    match err {
        Error::NoPlan(message) => assert!(message.contains("2024-01-01")),
        other => panic!("expected NoPlan, got {other:?}"),
    }
}

#[tokio::test]
async fn http_errors_carry_status_and_body() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/p1/plan_times")
        .with_status(503)
        .with_body("upstream exploded")
        .create_async()
        .await;

    let err = client_for(&server).fetch_plan_times("p1").await.unwrap_err();

    match err {
        Error::Api { message, status, .. } => {
            assert_eq!(status, Some(503));
            assert!(message.contains("503"));
            assert!(message.contains("upstream exploded"));
        }
        other => panic!("expected Api, got {other:?}"),
    }
}

#[tokio::test]
async fn invalid_json_is_a_decode_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/p1/plan_times")
        .with_body("<html>not json</html>")
        .create_async()
        .await;

    let err = client_for(&server).fetch_plan_times("p1").await.unwrap_err();

    match err {
        Error::Decode(message) => assert!(message.contains("was not valid JSON")),
        other => panic!("expected Decode, got {other:?}"),
    }
}

#[tokio::test]
async fn pipeline_joins_items_to_retained_service_slots() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/p1/plan_times")
        .with_body(
            json!({"data": [
                {"id": "t1", "attributes": {"time_type": "service", "starts_at": "2024-01-07T15:00:00Z"}},
                {"id": "t9", "attributes": {"time_type": "rehearsal", "starts_at": "2024-01-07T13:00:00Z"}},
            ]})
            .to_string(),
        )
        .create_async()
        .await;

    let related = format!("{}/item_times", server.url());
    server
        .mock("GET", "/p1/items")
        .match_query(Matcher::UrlEncoded("include".into(), "item_times".into()))
        .with_body(
            json!({"data": [
                {
                    "id": "i1",
                    "attributes": {"title": "Welcome", "sequence": "2", "length": 300},
                    "relationships": {"item_times": {
                        "data": [{"id": "it1"}],
                        "links": {"related": related},
                    }},
                },
                {
                    "id": "i2",
                    "attributes": {"title": "Opening Song", "sequence": 1, "length": null},
                    "relationships": {"item_times": {
                        "data": [{"id": "it2"}, {"id": "it3"}],
                        "links": {"related": related},
                    }},
                },
                // No item_times relationship: contributes nothing, no fetch
                {"id": "i3", "attributes": {"title": "Orphan"}},
            ]})
            .to_string(),
        )
        .create_async()
        .await;

    server
        .mock("GET", "/item_times/it1")
        .with_body(
            json!({"data": {"relationships": {"plan_time": {"data": {"id": "t1"}}}}}).to_string(),
        )
        .create_async()
        .await;
    server
        .mock("GET", "/item_times/it2")
        .with_body(
            json!({"data": {"relationships": {"plan_time": {"data": {"id": "t1"}}}}}).to_string(),
        )
        .create_async()
        .await;
    // Points at the rehearsal slot, which was filtered out
    server
        .mock("GET", "/item_times/it3")
        .with_body(
            json!({"data": {"relationships": {"plan_time": {"data": {"id": "t9"}}}}}).to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server);
    let plan_times = client.fetch_plan_times("p1").await.unwrap();
    let times = schedule::collect_service_times(&plan_times);
    assert_eq!(times.len(), 1);

    let plan_items = client.fetch_plan_items("p1").await.unwrap();
    let items_by_time = schedule::join_items_by_time(&client, &plan_items, &times)
        .await
        .unwrap();

    assert_eq!(items_by_time.len(), 1);
    assert_eq!(items_by_time["t1"].len(), 2);

    let slots = schedule::build_schedule(&times, items_by_time);
    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0].time, "9:00 AM");
    let titles: Vec<_> = slots[0]
        .items
        .iter()
        .map(|item| item.title.clone().unwrap())
        .collect();
    assert_eq!(titles, ["Opening Song", "Welcome"]);
    assert_eq!(
        slots[0].items.iter().map(|item| item.sequence).collect::<Vec<_>>(),
        [1, 2]
    );

    let rendered: serde_json::Value =
        serde_json::from_str(&render::render_json(&slots).unwrap()).unwrap();
    assert_eq!(rendered["plan"][0]["items"][0]["sequence"], json!(1));
    assert_eq!(rendered["plan"][0]["items"][0]["length"], json!(null));

    assert_eq!(
        render::render_text(&slots),
        "9:00 AM\n1: Opening Song - unknown length\n2: Welcome - 300 seconds"
    );
}

#[tokio::test]
async fn detail_fetch_failure_aborts_the_join() {
    let mut server = Server::new_async().await;

    let related = format!("{}/item_times", server.url());
    let plan_items = json!({"data": [
        {
            "id": "i1",
            "attributes": {"title": "Welcome", "sequence": 1},
            "relationships": {"item_times": {
                "data": [{"id": "it1"}],
                "links": {"related": related},
            }},
        },
    ]});
    server
        .mock("GET", "/item_times/it1")
        .with_status(404)
        .with_body("not found")
        .create_async()
        .await;

    let mut times = planorder::planning_center::ServiceTimes::default();
    times.insert("t1".to_string(), "2024-01-07T09:00:00-06:00".to_string());

    let err = schedule::join_items_by_time(&client_for(&server), &plan_items, &times)
        .await
        .unwrap_err();

    match err {
        Error::Api { status, .. } => assert_eq!(status, Some(404)),
        other => panic!("expected Api, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_retained_set_bypasses_the_slot_filter() {
    let mut server = Server::new_async().await;

    let related = format!("{}/item_times", server.url());
    let plan_items = json!({"data": [
        {
            "id": "i1",
            "attributes": {"title": "Welcome", "sequence": 1},
            "relationships": {"item_times": {
                "data": [{"id": "it1"}],
                "links": {"related": related},
            }},
        },
    ]});
    server
        .mock("GET", "/item_times/it1")
        .with_body(
            json!({"data": {"relationships": {"plan_time": {"data": {"id": "t42"}}}}}).to_string(),
        )
        .create_async()
        .await;

    let times = planorder::planning_center::ServiceTimes::default();
    let items_by_time = schedule::join_items_by_time(&client_for(&server), &plan_items, &times)
        .await
        .unwrap();

    // Any slot ID is accepted when nothing was retained, but assembly
    // iterates the retained set, so the schedule stays empty.
    assert_eq!(items_by_time["t42"].len(), 1);
    assert!(schedule::build_schedule(&times, items_by_time).is_empty());
}
