//! Catalog-to-disk runs of the CLI download session.

use std::fs;
use std::path::Path;
use std::time::Duration;

use romdl_cli::handlers::get::{GetArgs, queue_matches};
use romdl_cli::presentation::ProgressBoard;
use romdl_cli::{CliConfig, CliContext, SessionSummary, bootstrap};
use romdl_core::DownloadStatus;
use romdl_core::ports::QueueStateStore;
use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LISTING: &str = r#"<table>
<tr><td class="link"><a href="Alpha%20(USA).zip">Alpha (USA).zip</a></td><td class="size">4 KiB</td></tr>
<tr><td class="link"><a href="Beta%20(USA).zip">Beta (USA).zip</a></td><td class="size">8 KiB</td></tr>
<tr><td class="link"><a href="Gamma%20(Japan).zip">Gamma (Japan).zip</a></td><td class="size">2 KiB</td></tr>
</table>"#;

async fn serve(server: &MockServer, listing: &str, file_delay: Duration) {
    Mock::given(method("GET"))
        .and(path("/snes/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing))
        .mount(server)
        .await;
    // Request paths arrive percent-encoded.
    let files = [
        ("Alpha%20(USA).zip", 4096),
        ("Beta%20(USA).zip", 8192),
        ("Gamma%20(Japan).zip", 2048),
    ];
    for (name, len) in files {
        Mock::given(method("GET"))
            .and(path(format!("/snes/{name}")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(vec![7_u8; len])
                    .set_delay(file_delay),
            )
            .mount(server)
            .await;
    }
}

fn context(root: &Path, server: &MockServer) -> CliContext {
    let config_path = root.join("application.json");
    let roms = root.join("roms").join("snes");
    fs::write(
        &config_path,
        format!(
            r#"{{ "platforms": [ {{ "name": "snes", "url": "{}/snes/", "ext": "zip", "directory": "{}" }} ] }}"#,
            server.uri(),
            roms.display()
        ),
    )
    .unwrap();

    bootstrap(CliConfig {
        config_path,
        queue_file: root.join("data").join("queue.json"),
        limit: Some(2),
    })
    .unwrap()
}

async fn get(ctx: &CliContext, filter: &str, interrupt_now: bool) -> SessionSummary {
    let session = ctx
        .start_downloads()
        .unwrap()
        .with_board(ProgressBoard::hidden());
    let args = GetArgs {
        platform: "snes",
        filter,
        first: false,
    };
    assert!(queue_matches(ctx, &session, &args).await.unwrap() > 0);

    if interrupt_now {
        session.run_until(async {}).await.unwrap()
    } else {
        session
            .run_until(std::future::pending::<()>())
            .await
            .unwrap()
    }
}

#[tokio::test]
async fn matching_entries_are_downloaded() {
    let server = MockServer::start().await;
    serve(&server, LISTING, Duration::ZERO).await;
    let temp = tempdir().unwrap();
    let ctx = context(temp.path(), &server);

    let summary = get(&ctx, "usa", false).await;
    assert_eq!(summary, SessionSummary {
        complete: 2,
        failed: 0,
        unfinished: 0,
        interrupted: false,
    });

    let dir = temp.path().join("roms").join("snes");
    assert_eq!(fs::metadata(dir.join("Alpha (USA).zip")).unwrap().len(), 4096);
    assert_eq!(fs::metadata(dir.join("Beta (USA).zip")).unwrap().len(), 8192);
    assert!(!dir.join("Gamma (Japan).zip").exists());
    assert!(!ctx.queue_store.path().exists());
}

#[tokio::test]
async fn entries_without_a_usable_file_name_are_skipped() {
    let listing = r#"<table>
<tr><td class="link"><a href="Alpha%20(USA).zip">Alpha (USA).zip</a></td><td class="size">4 KiB</td></tr>
<tr><td class="link"><a href="Bad%2FName%20(USA).zip">Bad/Name (USA).zip</a></td><td class="size">1 KiB</td></tr>
</table>"#;
    let server = MockServer::start().await;
    serve(&server, listing, Duration::ZERO).await;
    let temp = tempdir().unwrap();
    let ctx = context(temp.path(), &server);

    let summary = get(&ctx, "usa", false).await;
    assert_eq!(summary.complete, 1);
    assert_eq!(summary.failed, 0);

    let dir = temp.path().join("roms").join("snes");
    assert_eq!(fs::read_dir(&dir).unwrap().count(), 1);
    assert!(dir.join("Alpha (USA).zip").exists());
}

#[tokio::test]
async fn interrupted_session_is_saved_and_resumed() {
    let slow = MockServer::start().await;
    serve(&slow, LISTING, Duration::from_secs(30)).await;
    let temp = tempdir().unwrap();
    let ctx = context(temp.path(), &slow);

    let summary = get(&ctx, "alpha|gamma", true).await;
    assert!(summary.interrupted);
    assert_eq!(summary.unfinished, 2);

    let saved = ctx.queue_store.load().await.unwrap();
    assert_eq!(saved.len(), 2);
    assert!(saved.iter().all(|r| r.status == DownloadStatus::Pending));

    // Next run against a responsive server picks the saved items up.
    let fast = MockServer::start().await;
    serve(&fast, LISTING, Duration::ZERO).await;
    let records: Vec<_> = saved
        .into_iter()
        .map(|mut r| {
            r.url = r.url.replace(&slow.uri(), &fast.uri());
            r
        })
        .collect();
    ctx.queue_store.save(&records).await.unwrap();

    let session = ctx
        .start_downloads()
        .unwrap()
        .with_board(ProgressBoard::hidden());
    assert_eq!(session.restore().await.unwrap(), 2);
    let summary = session
        .run_until(std::future::pending::<()>())
        .await
        .unwrap();
    assert_eq!(summary.complete, 2);
    assert!(!ctx.queue_store.path().exists());
}
