use std::time::Duration;

use httpmock::MockServer;
use reqwest::StatusCode;
use serde_json::json;
use url::Url;

use reybex::infra::http::{ClientError, ReybexClient};
use reybex_api_types::{EntityId, KanbanRequest, LoginRequest};

fn client(server: &MockServer) -> ReybexClient {
    let base = Url::parse(&server.url("/api/")).expect("base url");
    ReybexClient::new(base, Duration::from_secs(5)).expect("client")
}

fn authed(server: &MockServer) -> ReybexClient {
    client(server).with_token(Some("dG9rZW4=".to_string()))
}

#[tokio::test]
async fn login_posts_credentials_and_reads_flat_response() -> Result<(), ClientError> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("POST")
            .path("/api/login")
            .json_body(json!({ "username": "ada", "password": "secret" }));
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"token":"dG9rZW4=","userId":17,"expires":"soon"}"#);
    });

    let response = client(&server)
        .login(&LoginRequest {
            username: "ada".into(),
            password: "secret".into(),
        })
        .await?;

    mock.assert();
    assert_eq!(response.token.as_deref(), Some("dG9rZW4="));
    assert_eq!(response.user_id, Some(EntityId::from(17)));
    assert_eq!(response.extra.get("expires"), Some(&json!("soon")));
    Ok(())
}

#[tokio::test]
async fn token_is_sent_verbatim_as_basic_auth() -> Result<(), ClientError> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("GET")
            .path("/api/user/17")
            .header("authorization", "Basic dG9rZW4=");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"data":{"id":17,"username":"ada","firstname":"Ada"}}"#);
    });

    let profile = authed(&server).user(&EntityId::from(17)).await?;
    mock.assert();
    assert_eq!(profile.username.as_deref(), Some("ada"));
    assert_eq!(profile.firstname.as_deref(), Some("Ada"));
    Ok(())
}

#[tokio::test]
async fn unauthorized_carries_server_message() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("GET").path("/api/task/5");
        then.status(401)
            .header("content-type", "application/json")
            .body(r#"{"message":"token expired"}"#);
    });

    let err = authed(&server)
        .task(&EntityId::from(5))
        .await
        .expect_err("401 should fail");
    assert!(matches!(err, ClientError::Unauthorized { .. }));
    assert_eq!(err.server_message(), Some("token expired"));
}

#[tokio::test]
async fn server_errors_prefer_message_then_error_field() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("POST").path("/api/login");
        then.status(400)
            .header("content-type", "application/json")
            .body(r#"{"error":"wrong password"}"#);
    });

    let err = client(&server)
        .login(&LoginRequest {
            username: "ada".into(),
            password: "nope".into(),
        })
        .await
        .expect_err("400 should fail");
    match &err {
        ClientError::Server { status, .. } => assert_eq!(*status, StatusCode::BAD_REQUEST),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.server_message(), Some("wrong password"));
}

#[tokio::test]
async fn kanban_posts_board_query_and_unwraps_list() -> Result<(), ClientError> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("POST").path("/api/kanban").json_body(json!({
            "users": [{ "id": 17 }],
            "responsibleUsers": null,
            "department": null,
            "projectId": null,
            "customerId": null,
            "sprintId": 1759743240961002_u64,
            "tags": [],
            "showTickets": false,
            "groupByUsers": false,
            "groupByResponsibleUsers": false
        }));
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"data":[{"name":"Todo","groups":[{"totalTaskCount":2,"tasks":[{"id":1},{"id":2}]}]}]}"#);
    });

    let columns = authed(&server)
        .kanban(&KanbanRequest::for_user(
            EntityId::from(17),
            EntityId::from(1_759_743_240_961_002),
        ))
        .await?;

    mock.assert();
    assert_eq!(columns.len(), 1);
    assert_eq!(columns[0].name.as_deref(), Some("Todo"));
    Ok(())
}

#[tokio::test]
async fn history_is_queried_by_task_id() -> Result<(), ClientError> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("GET")
            .path("/api/taskHistory")
            .query_param("taskId", "5");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"data":[{"taskCost_cost":1.5},{"taskCost_timeTracked":0.5}]}"#);
    });

    let history = authed(&server).task_history(&EntityId::from(5)).await?;
    mock.assert();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].task_cost_cost, Some(1.5));
    assert_eq!(history[1].task_cost_time_tracked, Some(0.5));
    Ok(())
}

#[tokio::test]
async fn missing_list_data_is_empty() -> Result<(), ClientError> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("GET").path("/api/taskComment/5");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"data":null}"#);
    });

    let comments = authed(&server).task_comments(&EntityId::from(5)).await?;
    assert!(comments.is_empty());
    Ok(())
}

#[tokio::test]
async fn empty_booking_body_means_nothing_booked() -> Result<(), ClientError> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("GET").path("/api/taskHistory/bookingTime");
        then.status(200).body("");
    });

    let booking = authed(&server).booking_time().await?;
    assert!(booking.id.is_none());
    assert!(booking.booking_time.is_none());
    Ok(())
}

#[tokio::test]
async fn booking_reads_flat_payload() -> Result<(), ClientError> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("GET").path("/api/taskHistory/bookingTime");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"id":"5","bookingTime":61000,"showCurrentBooking":true}"#);
    });

    let booking = authed(&server).booking_time().await?;
    assert_eq!(booking.id, Some(EntityId::from(5)));
    assert_eq!(booking.booking_time, Some(61_000));
    assert_eq!(booking.show_current_booking, Some(true));
    Ok(())
}

#[tokio::test]
async fn tickets_filter_to_the_current_user() -> Result<(), ClientError> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("GET")
            .path("/api/ticket/listTickets")
            .query_param("taskStatus", "mine")
            .query_param("user_hid", "17")
            .query_param("isMyTickets", "1");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"data":[{"id":1,"title":"Printer"}]}"#);
    });

    let tickets = authed(&server).tickets(&EntityId::from(17)).await?;
    mock.assert();
    assert_eq!(tickets, vec![json!({ "id": 1, "title": "Printer" })]);
    Ok(())
}

#[tokio::test]
async fn export_table_requests_first_page_for_user() -> Result<(), ClientError> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("GET")
            .path("/api/dataExport/1766888745013001/showTable")
            .query_param("page", "1")
            .query_param("filter[filters][0][advancedFilter][field]", "userId")
            .query_param("filter[filters][0][advancedFilter][value]", "17")
            .query_param("skip", "0")
            .query_param("take", "25")
            .query_param("pageSize", "25");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"data":[{"comment":"hi"}]}"#);
    });

    let rows = authed(&server)
        .export_table(&EntityId::new("1766888745013001"), &EntityId::from(17))
        .await?;
    mock.assert();
    assert_eq!(rows.len(), 1);
    Ok(())
}

#[tokio::test]
async fn book_and_end_task_hit_their_endpoints() -> Result<(), ClientError> {
    let server = MockServer::start();
    let book = server.mock(|when, then| {
        when.method("GET").path("/api/taskHistory/bookTask/5");
        then.status(200).body("{}");
    });
    let end = server.mock(|when, then| {
        when.method("GET").path("/api/taskHistory/endTask");
        then.status(200).body("");
    });

    let client = authed(&server);
    client.book_task(&EntityId::from(5)).await?;
    client.end_task().await?;
    book.assert();
    end.assert();
    Ok(())
}

#[tokio::test]
async fn refused_connection_is_a_connection_error() {
    let base = Url::parse("http://127.0.0.1:9/api/").expect("url");
    let client = ReybexClient::new(base, Duration::from_secs(2)).expect("client");
    let err = client.logout().await.expect_err("nothing listens on port 9");
    assert!(err.is_connection());
}
