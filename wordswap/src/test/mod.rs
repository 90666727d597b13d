//! End-to-end API tests exercising the full router over multipart uploads.

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use crate::{Application, Config};

async fn create_test_server() -> TestServer {
    create_test_server_with_config(Config::default()).await
}

async fn create_test_server_with_config(config: Config) -> TestServer {
    let app = Application::new(config).await.expect("Failed to create application");
    app.into_test_server()
}

/// Multipart form with all three fields populated.
fn replace_form(file_name: &str, mime: &str, bytes: Vec<u8>, find: &str, replace: &str) -> MultipartForm {
    MultipartForm::new()
        .add_part("file", Part::bytes(bytes).file_name(file_name).mime_type(mime))
        .add_text("findWord", find)
        .add_text("replaceWord", replace)
}

/// Build a one-page PDF containing the given text in a single `Tj` operand.
fn pdf_with_text(text: &str) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");

    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![100.into(), 700.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

#[test_log::test(tokio::test)]
async fn csv_replace_end_to_end() {
    let server = create_test_server().await;

    let form = replace_form("people.csv", "text/csv", b"name,role\nalice,admin\nbob,admin\n".to_vec(), "admin", "user");
    let response = server.post("/api/replace").multipart(form).await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.header("content-type"), "text/csv");
    assert_eq!(
        response.header("content-disposition"),
        "attachment; filename=\"modified_people.csv\""
    );
    assert_eq!(response.header("x-replacement-count"), "2");
    assert_eq!(response.as_bytes().as_ref(), &b"name,role\nalice,user\nbob,user\n"[..]);
}

#[test_log::test(tokio::test)]
async fn pdf_replace_end_to_end() {
    let server = create_test_server().await;

    let pdf = pdf_with_text("Hello World! Hello Universe!");
    let form = replace_form("greeting.pdf", "application/pdf", pdf, "Hello", "Goodbye");
    let response = server.post("/api/replace").multipart(form).await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.header("content-type"), "application/pdf");
    assert_eq!(
        response.header("content-disposition"),
        "attachment; filename=\"modified_greeting.pdf\""
    );
    assert_eq!(response.header("x-replacement-count"), "2");

    // The response must be a loadable PDF whose text carries the substitution
    let doc = Document::load_mem(response.as_bytes()).expect("response is not a valid PDF");
    let text = doc.extract_text(&[1]).unwrap();
    assert!(text.contains("Goodbye World! Goodbye Universe!"), "got: {text}");
}

#[test_log::test(tokio::test)]
async fn pdf_detected_by_sniffing_without_extension() {
    let server = create_test_server().await;

    let pdf = pdf_with_text("sniff me");
    let form = replace_form("upload", "application/octet-stream", pdf, "sniff", "found");
    let response = server.post("/api/replace").multipart(form).await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.header("x-replacement-count"), "1");
}

#[test_log::test(tokio::test)]
async fn missing_file_is_rejected() {
    let server = create_test_server().await;

    let form = MultipartForm::new().add_text("findWord", "a").add_text("replaceWord", "b");
    let response = server.post("/api/replace").multipart(form).await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["kind"], "bad_request");
}

#[test_log::test(tokio::test)]
async fn empty_file_is_rejected() {
    let server = create_test_server().await;

    let form = replace_form("empty.csv", "text/csv", Vec::new(), "a", "b");
    let response = server.post("/api/replace").multipart(form).await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["kind"], "bad_request");
}

#[test_log::test(tokio::test)]
async fn empty_find_word_is_rejected() {
    let server = create_test_server().await;

    let form = replace_form("a.csv", "text/csv", b"a,b\n".to_vec(), "", "b");
    let response = server.post("/api/replace").multipart(form).await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["kind"], "bad_request");
}

#[test_log::test(tokio::test)]
async fn absent_replace_word_deletes_occurrences() {
    let server = create_test_server().await;

    let form = MultipartForm::new()
        .add_part(
            "file",
            Part::bytes(b"foo,bar\n".to_vec()).file_name("d.csv").mime_type("text/csv"),
        )
        .add_text("findWord", "foo");
    let response = server.post("/api/replace").multipart(form).await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.as_bytes().as_ref(), &b",bar\n"[..]);
}

#[test_log::test(tokio::test)]
async fn unsupported_extension_is_rejected() {
    let server = create_test_server().await;

    let form = replace_form("doc.docx", "application/octet-stream", b"PK\x03\x04junk".to_vec(), "a", "b");
    let response = server.post("/api/replace").multipart(form).await;

    assert_eq!(response.status_code(), 415);
    let body: serde_json::Value = response.json();
    assert_eq!(body["kind"], "unsupported_format");
    assert!(body["message"].as_str().unwrap().contains("docx"));
}

#[test_log::test(tokio::test)]
async fn garbage_pdf_is_reported_as_corrupt() {
    let server = create_test_server().await;

    let form = replace_form("broken.pdf", "application/pdf", b"not a pdf at all".to_vec(), "a", "b");
    let response = server.post("/api/replace").multipart(form).await;

    assert_eq!(response.status_code(), 422);
    let body: serde_json::Value = response.json();
    assert_eq!(body["kind"], "corrupt_document");
}

#[test_log::test(tokio::test)]
async fn unrepresentable_replacement_is_classified() {
    let server = create_test_server().await;

    let pdf = pdf_with_text("price");
    let form = replace_form("price.pdf", "application/pdf", pdf, "price", "→");
    let response = server.post("/api/replace").multipart(form).await;

    assert_eq!(response.status_code(), 422);
    let body: serde_json::Value = response.json();
    assert_eq!(body["kind"], "replacement_unrepresentable");
}

#[test_log::test(tokio::test)]
async fn oversized_upload_is_rejected_while_streaming() {
    let mut config = Config::default();
    config.limits.max_file_size = 16;
    let server = create_test_server_with_config(config).await;

    let big = vec![b'x'; 1024];
    let form = replace_form("big.csv", "text/csv", big, "a", "b");
    let response = server.post("/api/replace").multipart(form).await;

    assert_eq!(response.status_code(), 413);
    let body: serde_json::Value = response.json();
    assert_eq!(body["kind"], "payload_too_large");
}

#[test_log::test(tokio::test)]
async fn formats_endpoint_lists_pdf_and_csv() {
    let server = create_test_server().await;

    let response = server.get("/api/formats").await;
    assert_eq!(response.status_code(), 200);

    let body: serde_json::Value = response.json();
    let extensions: Vec<&str> = body["formats"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["extension"].as_str().unwrap())
        .collect();
    assert_eq!(extensions, vec!["pdf", "csv"]);
}

#[test_log::test(tokio::test)]
async fn wildcard_cors_allows_any_origin() {
    let server = create_test_server().await;

    let response = server
        .get("/api/formats")
        .add_header("origin", "https://elsewhere.example")
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.header("access-control-allow-origin"), "*");
}

#[test_log::test(tokio::test)]
async fn health_endpoint_responds() {
    let server = create_test_server().await;

    let response = server.get("/health").await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.text(), "ok");
}

#[test_log::test(tokio::test)]
async fn root_serves_the_client_form() {
    let server = create_test_server().await;

    let response = server.get("/").await;
    assert_eq!(response.status_code(), 200);
    assert!(response.header("content-type").to_str().unwrap().starts_with("text/html"));
    assert!(response.text().contains("findWord"));
}
