//! Integration tests for the crawler
//!
//! These tests use wiremock to serve listing and detail pages and run the
//! full crawl cycle end-to-end against the HTTP fetcher and the JSON dataset.

use exam_harvest::config::{
    CatalogConfig, Config, CrawlerConfig, ExtractionConfig, OutputConfig, RetryConfig,
    TargetEntry, UserAgentConfig,
};
use exam_harvest::crawler::crawl;
use exam_harvest::output::{export_all, URL_INDEX_FILE};
use exam_harvest::storage::{load_dataset, DocumentStatus, ExamKey};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration without delays or backoff
fn create_test_config(base_url: &str, targets: &[(&str, &str)], dir: &Path) -> Config {
    Config {
        crawler: CrawlerConfig {
            inter_exam_delay_ms: 0,
            inter_target_delay_ms: 0,
            revisit_unreachable: false,
        },
        retry: RetryConfig {
            initial_timeout_ms: 5_000,
            retries: 2,
            timeout_increment_ms: 1_000,
            backoff_base_ms: 0,
            backoff_step_ms: 0,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        extraction: ExtractionConfig::default(),
        output: OutputConfig {
            dataset_path: dir.join("exams.json").display().to_string(),
            export_dir: dir.join("exports").display().to_string(),
            summary_path: dir.join("summary.md").display().to_string(),
        },
        catalog: CatalogConfig {
            base_url: format!("{}/provas/", base_url),
        },
        targets: targets
            .iter()
            .map(|(slug, name)| TargetEntry {
                slug: slug.to_string(),
                name: name.to_string(),
            })
            .collect(),
    }
}

const ENFERMEIRO_LISTING: &str = r#"<html><body>
<table>
  <tr><th>Prova</th><th>Ano</th><th>Órgão</th><th>Instituição</th><th>Nível</th></tr>
  <tr>
    <td><a href="/exam/1">Enfermeiro</a></td><td>2020</td>
    <td><a href="/orgao/x">Prefeitura X</a></td><td><a href="/banca/y">Banca Y</a></td>
    <td>Superior</td>
  </tr>
  <tr>
    <td><a href="/exam/2">Enfermeiro</a></td><td>2021</td>
    <td><a href="/orgao/z">Prefeitura Z</a></td><td><a href="/banca/y">Banca Y</a></td>
    <td>Superior</td>
  </tr>
</table>
</body></html>"#;

const DETAIL_WITH_PDF: &str = r#"<html><body>
<a href="/files/edital.pdf">Edital</a>
<a href="/files/a.pdf">Baixar prova</a>
<a href="/files/a.pdf">Baixar prova (espelho)</a>
</body></html>"#;

const DETAIL_WITHOUT_PDF: &str = "<html><body><p>Prova indisponível</p></body></html>";

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html; charset=utf-8")
}

async fn mount_page(server: &MockServer, route: &str, body: &str, expected: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .expect(expected)
        .mount(server)
        .await;
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn test_full_crawl_listing_to_dataset() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = TempDir::new().unwrap();

    mount_page(&server, "/provas/enfermeiro", ENFERMEIRO_LISTING, 1).await;
    mount_page(&server, "/exam/1", DETAIL_WITH_PDF, 1).await;
    mount_page(&server, "/exam/2", DETAIL_WITHOUT_PDF, 1).await;

    let config = create_test_config(&base, &[("enfermeiro", "Enfermeiro")], dir.path());
    let report = crawl(&config, false, &[]).await.unwrap();

    assert_eq!(report.targets_done, 1);
    assert_eq!(report.exams_discovered, 2);
    assert_eq!(report.exams_fetched, 2);
    assert_eq!(report.documents_found, 1);

    let dataset = load_dataset(Path::new(&config.output.dataset_path));
    assert_eq!(dataset.len(), 2);

    let first = &dataset.records()[0];
    assert_eq!(first.key(), ExamKey::new("Enfermeiro", "Prefeitura X", "2020"));
    assert_eq!(first.reference.organizer, "Banca Y");
    assert_eq!(first.reference.detail_url, format!("{}/exam/1", base));
    assert_eq!(
        first.documents,
        DocumentStatus::ResolvedWithDocuments(vec![format!("{}/files/a.pdf", base)])
    );
    assert_eq!(dataset.records()[1].documents, DocumentStatus::ResolvedEmpty);

    // On-disk layout
    let raw = read_json(Path::new(&config.output.dataset_path));
    assert_eq!(raw[0]["position"], "Enfermeiro");
    assert_eq!(raw[0]["url"], format!("{}/exam/1", base));
    assert_eq!(raw[0]["cargo_source"], "Enfermeiro");
    assert_eq!(raw[0]["PdfUrls"][0], format!("{}/files/a.pdf", base));
    assert_eq!(raw[1]["PdfUrls"], serde_json::json!([]));
}

#[tokio::test]
async fn test_second_run_makes_no_detail_requests() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = TempDir::new().unwrap();

    mount_page(&server, "/provas/enfermeiro", ENFERMEIRO_LISTING, 2).await;
    mount_page(&server, "/exam/1", DETAIL_WITH_PDF, 1).await;
    mount_page(&server, "/exam/2", DETAIL_WITHOUT_PDF, 1).await;

    let config = create_test_config(&base, &[("enfermeiro", "Enfermeiro")], dir.path());
    crawl(&config, false, &[]).await.unwrap();
    let after_first = fs::read_to_string(&config.output.dataset_path).unwrap();

    let report = crawl(&config, false, &[]).await.unwrap();
    let after_second = fs::read_to_string(&config.output.dataset_path).unwrap();

    assert_eq!(report.exams_skipped, 2);
    assert_eq!(report.exams_fetched, 0);
    assert_eq!(after_first, after_second);
}

#[tokio::test]
async fn test_listing_server_error_degrades_and_continues() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/provas/medico"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;
    mount_page(&server, "/provas/enfermeiro", ENFERMEIRO_LISTING, 1).await;
    mount_page(&server, "/exam/1", DETAIL_WITH_PDF, 1).await;
    mount_page(&server, "/exam/2", DETAIL_WITHOUT_PDF, 1).await;

    let config = create_test_config(
        &base,
        &[("medico", "Médico"), ("enfermeiro", "Enfermeiro")],
        dir.path(),
    );
    let report = crawl(&config, false, &[]).await.unwrap();

    assert_eq!(report.targets_failed, 1);
    assert_eq!(report.targets_done, 1);
    assert_eq!(load_dataset(Path::new(&config.output.dataset_path)).len(), 2);
}

#[tokio::test]
async fn test_unreachable_detail_page_resolves_empty() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = TempDir::new().unwrap();

    mount_page(&server, "/provas/enfermeiro", ENFERMEIRO_LISTING, 1).await;
    Mock::given(method("GET"))
        .and(path("/exam/1"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;
    mount_page(&server, "/exam/2", DETAIL_WITH_PDF, 1).await;

    let config = create_test_config(&base, &[("enfermeiro", "Enfermeiro")], dir.path());
    let report = crawl(&config, false, &[]).await.unwrap();

    assert_eq!(report.exams_unreachable, 1);
    let dataset = load_dataset(Path::new(&config.output.dataset_path));
    assert_eq!(dataset.records()[0].documents, DocumentStatus::ResolvedEmpty);
    assert_eq!(dataset.records()[1].documents.urls().len(), 1);
}

#[tokio::test]
async fn test_resume_from_existing_file() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = TempDir::new().unwrap();

    mount_page(&server, "/provas/enfermeiro", ENFERMEIRO_LISTING, 1).await;
    mount_page(&server, "/exam/1", DETAIL_WITH_PDF, 0).await;
    mount_page(&server, "/exam/2", DETAIL_WITH_PDF, 1).await;

    let config = create_test_config(&base, &[("enfermeiro", "Enfermeiro")], dir.path());

    // Exam 1 resolved, exam 2 seen on a listing page only
    let seeded = serde_json::json!([
        {
            "position": "Enfermeiro",
            "agency": "Prefeitura X",
            "year": "2020",
            "organizer": "Banca Y",
            "level": "Superior",
            "url": format!("{}/exam/1", base),
            "sourceCategory": "Enfermeiro",
            "PdfUrls": ["https://mirror.example/a.pdf"],
            "notes": "kept"
        },
        {
            "position": "Enfermeiro",
            "agency": "Prefeitura Z",
            "year": "2021",
            "url": format!("{}/exam/2", base),
            "cargo_source": "Enfermeiro"
        }
    ]);
    fs::write(
        &config.output.dataset_path,
        serde_json::to_string_pretty(&seeded).unwrap(),
    )
    .unwrap();

    let report = crawl(&config, false, &[]).await.unwrap();
    assert_eq!(report.exams_skipped, 1);
    assert_eq!(report.exams_fetched, 1);

    let raw = read_json(Path::new(&config.output.dataset_path));
    assert_eq!(raw.as_array().unwrap().len(), 2);
    assert_eq!(raw[0]["PdfUrls"][0], "https://mirror.example/a.pdf");
    assert_eq!(raw[0]["notes"], "kept");
    assert_eq!(raw[1]["PdfUrls"][0], format!("{}/files/a.pdf", base));
    assert_eq!(raw[1]["level"], "Superior");
}

#[tokio::test]
async fn test_fresh_crawl_refetches_everything() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = TempDir::new().unwrap();

    mount_page(&server, "/provas/enfermeiro", ENFERMEIRO_LISTING, 2).await;
    mount_page(&server, "/exam/1", DETAIL_WITH_PDF, 2).await;
    mount_page(&server, "/exam/2", DETAIL_WITHOUT_PDF, 2).await;

    let config = create_test_config(&base, &[("enfermeiro", "Enfermeiro")], dir.path());
    crawl(&config, false, &[]).await.unwrap();
    let report = crawl(&config, true, &[]).await.unwrap();

    assert_eq!(report.exams_fetched, 2);
    assert_eq!(load_dataset(Path::new(&config.output.dataset_path)).len(), 2);
}

#[tokio::test]
async fn test_only_filter_and_export() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/provas/vigia"))
        .respond_with(html(ENFERMEIRO_LISTING))
        .expect(0)
        .mount(&server)
        .await;
    mount_page(&server, "/provas/enfermeiro", ENFERMEIRO_LISTING, 1).await;
    mount_page(&server, "/exam/1", DETAIL_WITH_PDF, 1).await;
    mount_page(&server, "/exam/2", DETAIL_WITHOUT_PDF, 1).await;

    let config = create_test_config(
        &base,
        &[("vigia", "Vigia"), ("enfermeiro", "Enfermeiro")],
        dir.path(),
    );
    crawl(&config, false, &["enfermeiro".to_string()])
        .await
        .unwrap();

    let dataset = load_dataset(Path::new(&config.output.dataset_path));
    let written = export_all(&dataset, Path::new(&config.output.export_dir)).unwrap();
    assert_eq!(written.len(), 2);

    let category = read_json(&dir.path().join("exports").join("enfermeiro_exams.json"));
    assert_eq!(category.as_array().unwrap().len(), 1);

    let index = read_json(&dir.path().join("exports").join(URL_INDEX_FILE));
    assert_eq!(
        index["Enfermeiro - Prefeitura X - 2020"][0],
        format!("{}/files/a.pdf", base)
    );
}

#[tokio::test]
async fn test_unknown_only_slug_is_rejected() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(
        "http://127.0.0.1:1",
        &[("enfermeiro", "Enfermeiro")],
        dir.path(),
    );

    let result = crawl(&config, false, &["medico".to_string()]).await;
    assert!(result.is_err());
    assert!(!dir.path().join("exams.json").exists());
}
