//! End-to-end tests for the interactive shell
//!
//! The catalog is served by a mock listing endpoint and audio goes to a
//! scripted backend that records what the session asked of it.

use async_trait::async_trait;
use bucket_catalog::{CatalogClient, CatalogConfig, CatalogView, RefetchPolicy};
use bucket_player::shell::Shell;
use bucket_playback::{
    status_channel, LoadedMedia, MediaBackend, MediaHandle, MediaStatus, PlaybackError,
    PlaybackSession, SessionState, StatusPublisher,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncWriteExt, BufReader};
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// Helpers
// =============================================================================

#[derive(Default)]
struct BackendLog {
    loads: Vec<String>,
    commands: Vec<String>,
    unloads: usize,
    publishers: Vec<StatusPublisher>,
}

#[derive(Clone, Default)]
struct ScriptedBackend {
    log: Arc<Mutex<BackendLog>>,
    /// Every load after the first takes this long
    slow_reload: Option<Duration>,
    fail_seek: bool,
}

impl ScriptedBackend {
    fn loads(&self) -> Vec<String> {
        self.log.lock().unwrap().loads.clone()
    }

    fn commands(&self) -> Vec<String> {
        self.log.lock().unwrap().commands.clone()
    }

    fn finish_current(&self) {
        let log = self.log.lock().unwrap();
        let publisher = log.publishers.last().expect("nothing loaded");
        assert!(publisher.publish(MediaStatus {
            position: Duration::from_secs(3),
            duration: Duration::from_secs(3),
            is_playing: false,
            did_just_finish: true,
        }));
    }
}

#[async_trait]
impl MediaBackend for ScriptedBackend {
    async fn load(&self, uri: &str, _autoplay: bool) -> bucket_playback::Result<LoadedMedia> {
        let first = self.log.lock().unwrap().loads.is_empty();
        if let (false, Some(delay)) = (first, self.slow_reload) {
            tokio::time::sleep(delay).await;
        }

        let (publisher, status) = status_channel();
        let mut log = self.log.lock().unwrap();
        log.loads.push(uri.to_string());
        log.publishers.push(publisher);

        Ok(LoadedMedia {
            handle: Box::new(ScriptedHandle {
                log: Arc::clone(&self.log),
                fail_seek: self.fail_seek,
            }),
            status,
        })
    }
}

struct ScriptedHandle {
    log: Arc<Mutex<BackendLog>>,
    fail_seek: bool,
}

#[async_trait]
impl MediaHandle for ScriptedHandle {
    async fn play(&mut self) -> bucket_playback::Result<()> {
        self.log.lock().unwrap().commands.push("play".into());
        Ok(())
    }

    async fn pause(&mut self) -> bucket_playback::Result<()> {
        self.log.lock().unwrap().commands.push("pause".into());
        Ok(())
    }

    async fn seek(&mut self, position: Duration) -> bucket_playback::Result<()> {
        if self.fail_seek {
            return Err(PlaybackError::Media("stream is not seekable".into()));
        }
        self.log
            .lock()
            .unwrap()
            .commands
            .push(format!("seek {}", position.as_millis()));
        Ok(())
    }

    async fn unload(&mut self) -> bucket_playback::Result<()> {
        self.log.lock().unwrap().unloads += 1;
        Ok(())
    }

    fn status(&self) -> MediaStatus {
        MediaStatus {
            is_playing: true,
            ..MediaStatus::default()
        }
    }
}

fn listing(keys: &[&str]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<ListBucketResult xmlns="http://s3.amazonaws.com/doc/2006-03-01/"><Name>music</Name><IsTruncated>false</IsTruncated>"#,
    );
    for key in keys {
        xml.push_str(&format!(
            "<Contents><Key>{}</Key><LastModified>2024-05-01T10:00:00.000Z</LastModified><Size>2048</Size></Contents>",
            key
        ));
    }
    xml.push_str("</ListBucketResult>");
    xml
}

async fn mount_listing(server: &MockServer, keys: &[&str], expected_fetches: u64) {
    Mock::given(method("GET"))
        .and(query_param("list-type", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(listing(keys), "application/xml"))
        .expect(expected_fetches)
        .mount(server)
        .await;
}

async fn shell_for(
    server: &MockServer,
    backend: ScriptedBackend,
) -> Shell<CatalogClient, ScriptedBackend> {
    let client = CatalogClient::new(CatalogConfig::new(server.uri())).unwrap();
    let view = CatalogView::with_policy(client, RefetchPolicy::Always);
    let mut shell = Shell::new(view, PlaybackSession::new(backend));
    assert_eq!(shell.search("").await, None);
    shell
}

async fn run(shell: &mut Shell<CatalogClient, ScriptedBackend>, script: &str) -> String {
    let mut out = Vec::new();
    shell.run(script.as_bytes(), &mut out).await.unwrap();
    String::from_utf8(out).unwrap()
}

const KEYS: [&str; 4] = ["a/one.mp3", "a/two.mp3", "b/Blues Intro.mp3", "notes.txt"];

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_select_then_filter_list() {
    let server = MockServer::start().await;
    mount_listing(&server, &KEYS, 1).await;

    let backend = ScriptedBackend::default();
    let mut shell = shell_for(&server, backend.clone()).await;
    assert_eq!(shell.session().tracks().len(), 3);

    let output = run(&mut shell, "2\n/blues\nq\n").await;

    assert!(output.contains("Now playing: two.mp3"), "{}", output);
    assert!(output.contains("   1  Blues Intro.mp3  (2.0 KB)"), "{}", output);
    assert!(!output.contains("one.mp3"), "{}", output);
    assert_eq!(backend.loads(), vec![format!("{}/a%2Ftwo.mp3", server.uri())]);

    // Quitting releases the handle
    assert_eq!(shell.session().live_handles(), 0);
    assert_eq!(backend.log.lock().unwrap().unloads, 1);
}

#[tokio::test]
async fn test_finished_track_advances_before_input() {
    let server = MockServer::start().await;
    mount_listing(&server, &KEYS, 1).await;

    let backend = ScriptedBackend::default();
    let mut shell = shell_for(&server, backend.clone()).await;
    shell.start(0).await;
    backend.finish_current();

    let output = run(&mut shell, "i\nq\n").await;

    let finished = output.find("Finished: a/one.mp3").expect(&output);
    let advanced = output.find("Now playing: two.mp3").expect(&output);
    let status = output.find("[playing] two.mp3").expect(&output);
    assert!(finished < advanced && advanced < status, "{}", output);
    assert_eq!(backend.loads().len(), 2);
}

#[tokio::test]
async fn test_input_during_auto_advance_load_waits_for_it() {
    let server = MockServer::start().await;
    mount_listing(&server, &KEYS, 1).await;

    let backend = ScriptedBackend {
        slow_reload: Some(Duration::from_millis(300)),
        ..ScriptedBackend::default()
    };
    let mut shell = shell_for(&server, backend.clone()).await;
    shell.start(0).await;
    backend.finish_current();

    // Input arrives while the next track is still loading
    let (mut keyboard, input) = tokio::io::duplex(64);
    let typist = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        keyboard.write_all(b"i\n").await.unwrap();
        tokio::time::sleep(Duration::from_millis(450)).await;
        keyboard.write_all(b"i\nq\n").await.unwrap();
    });

    let mut out = Vec::new();
    shell.run(BufReader::new(input), &mut out).await.unwrap();
    typist.await.unwrap();
    let output = String::from_utf8(out).unwrap();

    assert_eq!(backend.loads().len(), 2);
    assert!(!output.contains("[loading]"), "{}", output);
    assert_eq!(output.matches("[playing] two.mp3").count(), 2, "{}", output);
    // Quit tore down the second handle; nothing left dangling
    assert_eq!(shell.session().state(), SessionState::Idle);
    assert_eq!(shell.session().live_handles(), 0);
    assert_eq!(backend.log.lock().unwrap().unloads, 2);
}

#[tokio::test]
async fn test_failed_seek_is_reported() {
    let server = MockServer::start().await;
    mount_listing(&server, &KEYS, 1).await;

    let backend = ScriptedBackend {
        fail_seek: true,
        ..ScriptedBackend::default()
    };
    let mut shell = shell_for(&server, backend.clone()).await;
    shell.start(0).await;

    let output = run(&mut shell, "seek 10\nq\n").await;

    assert!(
        output.contains("Playback error: Media error: stream is not seekable"),
        "{}",
        output
    );
    assert_eq!(shell.session().state(), SessionState::Idle);
}

#[tokio::test]
async fn test_transport_commands_reach_the_handle() {
    let server = MockServer::start().await;
    mount_listing(&server, &KEYS, 1).await;

    let backend = ScriptedBackend::default();
    let mut shell = shell_for(&server, backend.clone()).await;
    shell.start(0).await;

    let output = run(&mut shell, "p\ni\np\nseek 1:05\nn\nb\ns\nq\n").await;

    assert_eq!(backend.commands(), vec!["pause", "play", "seek 65000"]);
    assert!(output.contains("[paused] one.mp3  0:00 / 0:00"), "{}", output);
    assert!(output.contains("Shuffle on"), "{}", output);

    let uri = |key: &str| format!("{}/{}", server.uri(), key);
    assert_eq!(
        backend.loads(),
        vec![uri("a%2Fone.mp3"), uri("a%2Ftwo.mp3"), uri("a%2Fone.mp3")]
    );
}

#[tokio::test]
async fn test_bad_input_is_reported_and_ignored() {
    let server = MockServer::start().await;
    mount_listing(&server, &KEYS, 1).await;

    let backend = ScriptedBackend::default();
    let mut shell = shell_for(&server, backend.clone()).await;

    let output = run(&mut shell, "dance\n9\nseek soon\nb\n").await;

    assert!(output.contains("unknown command: dance"), "{}", output);
    assert!(output.contains("No track 9"), "{}", output);
    assert!(output.contains("invalid position"), "{}", output);
    // End of input behaves like quit
    assert!(backend.loads().is_empty());
}

#[tokio::test]
async fn test_clearing_filter_refetches() {
    let server = MockServer::start().await;
    mount_listing(&server, &KEYS, 2).await;

    let backend = ScriptedBackend::default();
    let mut shell = shell_for(&server, backend).await;

    let output = run(&mut shell, "/two\n/\nq\n").await;

    assert!(output.contains("   1  two.mp3"), "{}", output);
    assert!(output.contains("   3  Blues Intro.mp3"), "{}", output);
    assert_eq!(shell.view().files().len(), 3);
}

#[tokio::test]
async fn test_listing_failure_leaves_empty_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = CatalogClient::new(CatalogConfig::new(server.uri())).unwrap();
    let mut shell = Shell::new(
        CatalogView::new(client),
        PlaybackSession::new(ScriptedBackend::default()),
    );

    let message = shell.search("").await.expect("fetch should fail");
    assert!(message.contains("500"), "{}", message);

    let output = run(&mut shell, "l\n1\nq\n").await;
    assert!(output.contains("No tracks"), "{}", output);
    assert!(output.contains("No track 1"), "{}", output);
}
