//! End-to-end pipeline tests against a mock Google Forms server.
//!
//! The mock serves a page embedding `FB_PUBLIC_LOAD_DATA_` and accepts
//! posts on the same `formResponse` path.

use formfill::{
    Answer, FieldDescriptor, Form, FormError, HttpClient, RuleBasedGenerator, ScriptedGenerator,
    EMAIL_FIELD_ID, OTHER_OPTION,
};
use serde_json::{json, Value};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FORM_PATH: &str = "/forms/d/e/abc123/formResponse";

// ─────────────────────── helpers ───────────────────────

fn load_data() -> Value {
    json!([
        null,
        [
            "A test form",
            [
                [1001, "Name", null, 0, [[111, null, 1]]],
                [1002, "Favourite colour", null, 2, [[222, [["Red"], ["Green"], ["Blue"]], 1]]],
                [1003, "Fruits", null, 4, [[333, [["Apples"], ["Pears"]], 0]]],
                [1004, "Next page", null, 8, null],
                [1005, "Café or tea?", null, 3, [[444, [["Café"], ["Tea"]], 1]]]
            ],
            null, null, null, null, null, null,
            "Test form",
            48,
            [null, null, null, null, null, null, 3]
        ],
        "/forms",
        "Test form"
    ])
}

fn form_page() -> String {
    format!(
        "<!DOCTYPE html><html><head><script type=\"text/javascript\" nonce=\"x\">\
         var FB_PUBLIC_LOAD_DATA_ = {};\n</script></head><body></body></html>",
        load_data()
    )
}

async fn mock_form(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(FORM_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(form_page()))
        .mount(server)
        .await;
}

fn view_url(server: &MockServer) -> String {
    format!("{}/forms/d/e/abc123/viewform", server.uri())
}

fn answer_set(value: Value) -> formfill::AnswerSet {
    value.as_object().cloned().unwrap()
}

fn field<'a>(fields: &'a [FieldDescriptor], id: &str) -> &'a FieldDescriptor {
    fields.iter().find(|f| f.id == id).expect("field present")
}

// ─────────────────────── tests ───────────────────────

#[tokio::test]
async fn fetch_parses_schema_with_pseudo_fields() {
    let server = MockServer::start().await;
    mock_form(&server).await;

    let form = Form::fetch(&HttpClient::new(), &view_url(&server), false)
        .await
        .unwrap();

    let ids: Vec<_> = form.fields.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, vec!["111", "222", "333", "444", "pageHistory", EMAIL_FIELD_ID]);
    assert_eq!(
        field(&form.fields, "pageHistory").default_value,
        Some(Answer::One("0,1".into()))
    );
}

#[tokio::test]
async fn fetch_only_required() {
    let server = MockServer::start().await;
    mock_form(&server).await;

    let form = Form::fetch(&HttpClient::new(), &view_url(&server), true)
        .await
        .unwrap();
    assert!(form.fields.iter().all(|f| f.id != "333"));
}

#[tokio::test]
async fn fetch_non_200_is_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(FORM_PATH))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = Form::fetch(&HttpClient::new(), &view_url(&server), false)
        .await
        .unwrap_err();
    assert!(matches!(err, FormError::FetchStatus { status: 404, .. }));
}

#[tokio::test]
async fn fetch_login_page_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(FORM_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>Sign in</html>"))
        .mount(&server)
        .await;

    let err = Form::fetch(&HttpClient::new(), &view_url(&server), false)
        .await
        .unwrap_err();
    assert!(matches!(err, FormError::Parse(_)));
}

#[tokio::test]
async fn scripted_fill_resolves_and_expands_other() {
    let server = MockServer::start().await;
    mock_form(&server).await;
    let form = Form::fetch(&HttpClient::new(), &view_url(&server), false)
        .await
        .unwrap();

    let set = answer_set(json!({
        "entry.111": "Ada",
        "entry.222": "purple",
        "entry.333": ["pears", "apples"],
        "entry.444": "cafe",
        "emailAddress": "ada@example.com"
    }));
    let mut gen = ScriptedGenerator::with_fallback(set, RuleBasedGenerator::with_seed(1));
    let filled = form.fill(&mut gen);

    assert_eq!(field(&filled, "111").default_value, Some(Answer::One("Ada".into())));
    assert_eq!(
        field(&filled, "222").default_value,
        Some(Answer::One(OTHER_OPTION.into()))
    );
    assert_eq!(
        field(&filled, "222.other_option_response").default_value,
        Some(Answer::One("purple".into()))
    );
    assert_eq!(
        field(&filled, "333").default_value,
        Some(Answer::Many(vec!["Pears".into(), "Apples".into()]))
    );
    assert_eq!(field(&filled, "444").default_value, Some(Answer::One("Café".into())));
    assert_eq!(filled.last().unwrap().id, "222.other_option_response");

    // the schema itself stays untouched
    assert!(form.fields.iter().all(|f| f.id == "pageHistory" || f.default_value.is_none()));
}

#[tokio::test]
async fn submit_posts_form_encoded_payload() {
    let server = MockServer::start().await;
    mock_form(&server).await;
    Mock::given(method("POST"))
        .and(path(FORM_PATH))
        .and(body_string_contains("entry.111=Ada"))
        .and(body_string_contains("entry.333=Pears"))
        .and(body_string_contains("entry.333=Apples"))
        .and(body_string_contains("emailAddress=ada%40example.com"))
        .and(body_string_contains("pageHistory=0%2C1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new();
    let form = Form::fetch(&client, &view_url(&server), false).await.unwrap();
    let set = answer_set(json!({
        "entry.111": "Ada",
        "entry.222": "Red",
        "entry.333": ["Pears", "Apples"],
        "entry.444": "Tea",
        "emailAddress": "ada@example.com"
    }));

    let report = form.submit_answer_sets(&client, &[set]).await;
    assert_eq!(report.submitted, 1);
    assert_eq!(report.failed, 0);
}

#[tokio::test]
async fn batch_continues_after_failed_submission() {
    let server = MockServer::start().await;
    mock_form(&server).await;
    Mock::given(method("POST"))
        .and(path(FORM_PATH))
        .and(body_string_contains("entry.111=Bad"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(FORM_PATH))
        .and(body_string_contains("entry.111=Good"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = HttpClient::new();
    let form = Form::fetch(&client, &view_url(&server), false).await.unwrap();
    let sets = vec![
        answer_set(json!({"entry.111": "Bad"})),
        answer_set(json!({"entry.111": "Good"})),
        answer_set(json!({"entry.111": "Good"})),
    ];

    let report = form.submit_answer_sets(&client, &sets).await;
    assert_eq!(report.submitted, 2);
    assert_eq!(report.failed, 1);
}

#[tokio::test]
async fn schema_request_body_is_json_without_comments() {
    let server = MockServer::start().await;
    mock_form(&server).await;
    let form = Form::fetch(&HttpClient::new(), &view_url(&server), false)
        .await
        .unwrap();

    let body = form.request_body(None, false);
    let parsed: Value = serde_json::from_str(&body).unwrap();
    let obj = parsed.as_object().unwrap();
    assert_eq!(obj.len(), form.fields.len());
    assert_eq!(obj["pageHistory"], "0,1");
    assert_eq!(obj["entry.222"], "");

    let annotated = form.request_body(None, true);
    assert!(annotated.contains("# Favourite colour (required)"));
    assert!(annotated.contains("#   Option: email address"));
}
