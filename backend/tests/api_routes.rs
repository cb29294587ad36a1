use actix_web::{http::StatusCode, test, web, App};
use async_trait::async_trait;
use career_guide::api::{configure, AppState};
use career_guide::llm::{AnswerProvider, LlmError, LlmConfig};
use career_guide::ServerConfig;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

// Arts <- questions 4,5; Commerce <- 8..11; Science <- 2,3; Vocational <- 0,1
const CLASSIFIER: &str = r#"{
    "kind": "linear",
    "coef": [
        [0, 0, 0, 0, 1, 1, 0, 0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1],
        [0, 0, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0],
        [1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]
    ],
    "intercept": [0, 0, 0, 0]
}"#;

const LABELS: &str = r#"{"classes": ["Arts", "Commerce", "Science", "Vocational"]}"#;

const SCIENCE_ANSWERS: [i64; 12] = [1, 1, 5, 5, 1, 1, 1, 1, 1, 1, 1, 1];

/// Records every question and replies with a canned answer
#[derive(Default)]
struct ScriptedMentor {
    seen: Mutex<Vec<Option<String>>>,
    fail: bool,
}

#[async_trait]
impl AnswerProvider for ScriptedMentor {
    async fn get_response(&self, question: Option<&str>) -> Result<String, LlmError> {
        self.seen.lock().unwrap().push(question.map(str::to_string));
        if self.fail {
            return Err(LlmError::Status {
                status: 503,
                body: "model warming up".to_string(),
            });
        }
        Ok(format!("mentor says: {}", question.unwrap_or("<nothing>")))
    }
}

struct Fixture {
    dir: TempDir,
    mentor: Arc<ScriptedMentor>,
}

impl Fixture {
    fn new() -> Self {
        Self::with_mentor(ScriptedMentor::default())
    }

    fn with_mentor(mentor: ScriptedMentor) -> Self {
        let dir = TempDir::new().unwrap();
        let templates = dir.path().join("templates");
        fs::create_dir_all(&templates).unwrap();
        for page in ["index", "mapping", "bot", "college_map", "mentor"] {
            fs::write(templates.join(format!("{page}.html")), format!("<h1>{page} page</h1>")).unwrap();
        }
        fs::write(
            templates.join("quiz.html"),
            "<script>window.QUESTIONS = {{ questions_json|tojson }};</script>",
        )
        .unwrap();

        let static_dir = dir.path().join("static");
        fs::create_dir_all(static_dir.join("css")).unwrap();
        fs::write(static_dir.join("css/site.css"), "body { margin: 0; }").unwrap();
        fs::write(dir.path().join("secret.txt"), "top secret").unwrap();

        Self {
            dir,
            mentor: Arc::new(mentor),
        }
    }

    fn with_artifacts(self, classifier: Option<&str>, labels: Option<&str>) -> Self {
        if let Some(body) = classifier {
            fs::write(self.path().join("svm_model.json"), body).unwrap();
        }
        if let Some(body) = labels {
            fs::write(self.path().join("label_encoder.json"), body).unwrap();
        }
        self
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn state(&self) -> Arc<AppState> {
        let root = self.path().to_path_buf();
        let config = ServerConfig {
            model_path: root.join("svm_model.json"),
            label_path: root.join("label_encoder.json"),
            template_dir: root.join("templates"),
            static_dir: root.join("static"),
            llm: LlmConfig::default(),
            ..ServerConfig::default()
        };
        Arc::new(AppState::new(&config, self.mentor.clone()))
    }
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .configure(configure),
        )
        .await
    };
}

/// POST a JSON body to /predict and return (status, json body)
macro_rules! post_predict {
    ($app:expr, $body:expr) => {{
        let req = test::TestRequest::post()
            .uri("/predict")
            .set_json($body)
            .to_request();
        let resp = test::call_service($app, req).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }};
}

fn ready_fixture() -> Fixture {
    Fixture::new().with_artifacts(Some(CLASSIFIER), Some(LABELS))
}

// ============================================================
// PAGES
// ============================================================

#[actix_rt::test]
async fn test_static_pages_render() {
    let fixture = Fixture::new();
    let app = app!(fixture.state());

    for (uri, marker) in [
        ("/", "index page"),
        ("/mapping", "mapping page"),
        ("/bot", "bot page"),
        ("/college_map", "college_map page"),
        ("/mentor", "mentor page"),
    ] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK, "GET {uri}");
        let body = test::read_body(resp).await;
        assert!(String::from_utf8_lossy(&body).contains(marker), "GET {uri}");
    }
}

#[actix_rt::test]
async fn test_quiz_page_embeds_questions() {
    let fixture = Fixture::new();
    let app = app!(fixture.state());

    let resp = test::call_service(&app, test::TestRequest::get().uri("/quiz").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("Do you enjoy managing data, handling budgets"));
}

#[actix_rt::test]
async fn test_missing_template_is_json_error() {
    let fixture = Fixture::new();
    fs::remove_file(fixture.path().join("templates/mentor.html")).unwrap();
    let app = app!(fixture.state());

    let resp = test::call_service(&app, test::TestRequest::get().uri("/mentor").to_request()).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Failed to render page");
}

#[actix_rt::test]
async fn test_static_assets() {
    let fixture = Fixture::new();
    let app = app!(fixture.state());

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/static/css/site.css").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get("content-type").unwrap(), "text/css");
    assert_eq!(test::read_body(resp).await, "body { margin: 0; }");

    for uri in ["/static/missing.js", "/static/../secret.txt", "/static/%2e%2e/secret.txt"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "GET {uri}");
    }
}

// ============================================================
// QUIZ DATA & HEALTH
// ============================================================

#[actix_rt::test]
async fn test_questions_endpoint() {
    let fixture = Fixture::new();
    let app = app!(fixture.state());

    let body: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/questions").to_request(),
    )
    .await;
    let questions = body.as_array().unwrap();
    assert_eq!(questions.len(), 12);
    assert_eq!(questions[0]["dimension"], "Realistic");
    assert_eq!(questions[11]["dimension"], "Conventional");
    assert_eq!(questions[11]["index"], 11);
}

#[actix_rt::test]
async fn test_health_does_not_load_models() {
    let fixture = ready_fixture();
    let state = fixture.state();
    let app = app!(state.clone());

    let body: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["models_loaded"], false);

    post_predict!(&app, json!({ "answers": SCIENCE_ANSWERS }));
    assert!(state.models.is_loaded());
}

// ============================================================
// PREDICT
// ============================================================

#[actix_rt::test]
async fn test_predict_success() {
    let fixture = ready_fixture();
    let app = app!(fixture.state());

    let (status, body) = post_predict!(&app, json!({ "answers": SCIENCE_ANSWERS }));
    assert_eq!(status, StatusCode::OK);

    let mut keys: Vec<&str> = body.as_object().unwrap().keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        ["careers", "degrees", "dimension_scores", "message", "recommendation"]
    );
    assert_eq!(body["recommendation"], "Science");
    assert_eq!(body["message"], "🔬 Explore, experiment, and innovate!");
    assert_eq!(body["careers"][0], json!(["Software Engineer", "💻"]));
    assert_eq!(body["degrees"][2], json!(["MBBS", "🩺"]));
    assert_eq!(
        body["dimension_scores"],
        json!({
            "Realistic": 2,
            "Investigative": 10,
            "Artistic": 2,
            "Social": 2,
            "Enterprising": 2,
            "Conventional": 2
        })
    );
}

#[actix_rt::test]
async fn test_predict_accepts_integer_like_answers() {
    let fixture = ready_fixture();
    let app = app!(fixture.state());

    let answers = json!(["1", 1.0, "5", 5, true, 1, 1, 1, "1", 1, 1, 1.9]);
    let (status, body) = post_predict!(&app, json!({ "answers": answers }));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["recommendation"], "Science");
    assert_eq!(body["dimension_scores"]["Conventional"], 2);
}

#[actix_rt::test]
async fn test_predict_accepts_out_of_range_integers() {
    let fixture = ready_fixture();
    let app = app!(fixture.state());

    let (status, body) = post_predict!(&app, json!({ "answers": [0, 99, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0] }));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["recommendation"], "Vocational");
    assert_eq!(body["dimension_scores"]["Realistic"], 99);
}

#[actix_rt::test]
async fn test_predict_dimension_pairs() {
    let fixture = ready_fixture();
    let app = app!(fixture.state());

    let answers: Vec<i64> = (1..=12).collect();
    let (status, body) = post_predict!(&app, json!({ "answers": answers }));
    assert_eq!(status, StatusCode::OK);

    let dimensions = ["Realistic", "Investigative", "Artistic", "Social", "Enterprising", "Conventional"];
    for (pair, dimension) in dimensions.iter().enumerate() {
        let expected = answers[pair * 2] + answers[pair * 2 + 1];
        assert_eq!(body["dimension_scores"][dimension], expected, "{dimension}");
    }
}

#[actix_rt::test]
async fn test_predict_wrong_length() {
    let fixture = ready_fixture();
    let app = app!(fixture.state());

    for answers in [json!([]), json!([1, 2, 3]), json!(vec![3; 13])] {
        let received = answers.as_array().unwrap().len();
        let (status, body) = post_predict!(&app, json!({ "answers": answers }));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            format!("Provide 12 answer values (1-5). Received {received}.")
        );
    }
}

#[actix_rt::test]
async fn test_predict_non_integer_element() {
    let fixture = ready_fixture();
    let app = app!(fixture.state());

    let mut answers = vec![json!(3); 12];
    answers[7] = json!("abc");
    let (status, body) = post_predict!(&app, json!({ "answers": answers }));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "All answers must be integer-like (1-5).");
}

#[actix_rt::test]
async fn test_predict_answers_not_a_list() {
    let fixture = ready_fixture();
    let app = app!(fixture.state());

    for body in [
        json!({ "answers": "1,2,3,4,5,1,2,3,4,5,1,2" }),
        json!({ "answers": { "0": 1 } }),
        json!({ "answers": null }),
        json!({}),
    ] {
        let (status, body) = post_predict!(&app, body);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "answers must be a list" }));
    }
}

#[actix_rt::test]
async fn test_predict_without_artifacts() {
    for (classifier, labels) in [(None, None), (Some(CLASSIFIER), None), (None, Some(LABELS))] {
        let fixture = Fixture::new().with_artifacts(classifier, labels);
        let app = app!(fixture.state());

        let (status, body) = post_predict!(&app, json!({ "answers": SCIENCE_ANSWERS }));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body["error"],
            "Model or label encoder not loaded on server. Check server logs."
        );
    }
}

#[actix_rt::test]
async fn test_predict_model_check_precedes_validation() {
    let fixture = Fixture::new();
    let app = app!(fixture.state());

    let (status, _) = post_predict!(&app, json!({ "answers": "nope" }));
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[actix_rt::test]
async fn test_predict_with_corrupt_artifact() {
    let fixture = Fixture::new().with_artifacts(Some("{\"kind\": \"linear\""), Some(LABELS));
    let app = app!(fixture.state());

    let (status, body) = post_predict!(&app, json!({ "answers": SCIENCE_ANSWERS }));
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["error"],
        "Model or label encoder not loaded on server. Check server logs."
    );
}

#[actix_rt::test]
async fn test_predict_artifacts_arriving_later_are_picked_up() {
    let fixture = Fixture::new().with_artifacts(None, Some(LABELS));
    let app = app!(fixture.state());

    let (status, _) = post_predict!(&app, json!({ "answers": SCIENCE_ANSWERS }));
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let fixture = fixture.with_artifacts(Some(CLASSIFIER), None);
    let (status, body) = post_predict!(&app, json!({ "answers": SCIENCE_ANSWERS }));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["recommendation"], "Science");
    drop(fixture);
}

#[actix_rt::test]
async fn test_predict_unknown_label_defaults() {
    let fixture = Fixture::new().with_artifacts(
        Some(CLASSIFIER),
        Some(r#"{"classes": ["Arts", "Commerce", "Law", "Vocational"]}"#),
    );
    let app = app!(fixture.state());

    let (status, body) = post_predict!(&app, json!({ "answers": SCIENCE_ANSWERS }));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["recommendation"], "Law");
    assert_eq!(body["message"], "");
    assert_eq!(body["careers"], json!([]));
    assert_eq!(body["degrees"], json!([]));
}

#[actix_rt::test]
async fn test_predict_is_idempotent() {
    let fixture = ready_fixture();
    let app = app!(fixture.state());

    let request = json!({ "answers": [2, 3, 4, 5, 1, 2, 3, 4, 5, 1, 2, 3] });
    let first = post_predict!(&app, request.clone());
    let second = post_predict!(&app, request);
    assert_eq!(first, second);
}

#[actix_rt::test]
async fn test_predict_unexpected_errors_include_details() {
    let fixture = ready_fixture();
    let app = app!(fixture.state());

    let req = test::TestRequest::post()
        .uri("/predict")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Internal server error");
    assert!(body["details"].as_str().unwrap().contains("Failed to decode JSON object"));

    let (status, body) = post_predict!(&app, json!([1, 2, 3]));
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal server error");
}

#[actix_rt::test]
async fn test_predict_feature_mismatch_is_internal_error() {
    let fixture = Fixture::new().with_artifacts(
        Some(r#"{"kind": "linear", "coef": [[1, 1, 1]], "intercept": [0]}"#),
        Some(LABELS),
    );
    let app = app!(fixture.state());

    let (status, body) = post_predict!(&app, json!({ "answers": SCIENCE_ANSWERS }));
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal server error");
    assert!(body["details"].as_str().unwrap().contains("12 features"));
}

// ============================================================
// GET ANSWER
// ============================================================

#[actix_rt::test]
async fn test_get_answer_returns_answer() {
    let fixture = Fixture::new();
    let app = app!(fixture.state());

    for question in ["What does a data scientist do?", ""] {
        let req = test::TestRequest::post()
            .uri("/get_answer")
            .set_json(json!({ "question": question }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "answer": format!("mentor says: {question}") }));
    }

    let seen = fixture.mentor.seen.lock().unwrap().clone();
    assert_eq!(
        seen,
        vec![Some("What does a data scientist do?".to_string()), Some(String::new())]
    );
}

#[actix_rt::test]
async fn test_get_answer_forwards_missing_question() {
    let fixture = Fixture::new();
    let app = app!(fixture.state());

    let req = test::TestRequest::post()
        .uri("/get_answer")
        .set_json(json!({}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["answer"], "mentor says: <nothing>");
    assert_eq!(fixture.mentor.seen.lock().unwrap().as_slice(), &[None]);
}

#[actix_rt::test]
async fn test_get_answer_model_failure() {
    let fixture = Fixture::with_mentor(ScriptedMentor {
        fail: true,
        ..ScriptedMentor::default()
    });
    let app = app!(fixture.state());

    let req = test::TestRequest::post()
        .uri("/get_answer")
        .set_json(json!({ "question": "hello" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Language model request failed");
    assert!(body["details"].as_str().unwrap().contains("503"));
}

#[actix_rt::test]
async fn test_get_answer_bad_json() {
    let fixture = Fixture::new();
    let app = app!(fixture.state());

    let req = test::TestRequest::post()
        .uri("/get_answer")
        .insert_header(("content-type", "application/json"))
        .set_payload("question?")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Bad request");
}
