//! End-to-end tests for the `pomscan` binary against mocked lookup services.

use mockito::{Matcher, Mock, Server, ServerGuard};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

// sha1("D1") and sha1("D2")
const D1: &str = "cc9a0d8481459987c9df62ca0f44e7fe1da6461d";
const D2: &str = "4a80baad4013c4d9e5410a8546a2db2ec9635bbd";

const EMPTY_CENTRAL: &str = r#"{"response":{"numFound":0,"start":0,"docs":[]}}"#;
const EMPTY_NEXUS: &str = r#"{"totalCount":0,"from":-1,"count":-1,"data":[]}"#;
const EMPTY_ARTIFACTORY: &str = r#"{"results":[],"message":"Search Results - 0 Items"}"#;

/// Test context with a scratch working directory and a mock server standing
/// in for all four lookup services.
struct TestContext {
    temp_dir: TempDir,
    server: ServerGuard,
    mocks: Vec<Mock>,
}

impl TestContext {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        std::fs::create_dir_all(temp_dir.path().join("libs")).expect("failed to create libs");
        Self {
            temp_dir,
            server: Server::new(),
            mocks: Vec::new(),
        }
    }

    fn libs(&self) -> PathBuf {
        self.temp_dir.path().join("libs")
    }

    fn add_jar(&self, relative: &str, content: &[u8]) {
        let path = self.libs().join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    /// Every service answers "no match" unless a more specific mock was
    /// registered first.
    fn all_services_empty(&mut self) {
        let mocks = vec![
            self.server
                .mock("GET", "/central")
                .match_query(Matcher::Any)
                .with_body(EMPTY_CENTRAL)
                .create(),
            self.server
                .mock("GET", "/jboss")
                .match_query(Matcher::Any)
                .with_body(EMPTY_NEXUS)
                .create(),
            self.server
                .mock("POST", "/spring")
                .with_body(EMPTY_ARTIFACTORY)
                .create(),
            self.server
                .mock("POST", "/jfrog")
                .with_body(EMPTY_ARTIFACTORY)
                .create(),
        ];
        self.mocks.extend(mocks);
    }

    fn jboss_knows(&mut self, sha1: &str, body: &str) {
        let mock = self
            .server
            .mock("GET", "/jboss")
            .match_query(Matcher::UrlEncoded("sha1".into(), sha1.into()))
            .with_body(body)
            .create();
        self.mocks.push(mock);
    }

    fn pomscan(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_pomscan"));
        let url = self.server.url();
        cmd.current_dir(self.temp_dir.path())
            .env_remove("RUST_LOG")
            .env_remove("POMSCAN_CONFIG")
            .env("POMSCAN_CENTRAL_URL", format!("{url}/central"))
            .env("POMSCAN_JBOSS_URL", format!("{url}/jboss"))
            .env("POMSCAN_SPRING_URL", format!("{url}/spring"))
            .env("POMSCAN_JFROG_URL", format!("{url}/jfrog"));
        cmd
    }

    fn run(&self, args: &[&str]) -> Output {
        self.pomscan()
            .args(args)
            .arg(self.libs())
            .output()
            .expect("failed to run pomscan")
    }

    fn path(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).expect("expected file to exist")
}

#[test]
fn test_help_command() {
    let ctx = TestContext::new();
    let output = ctx.pomscan().arg("--help").output().unwrap();
    assert!(output.status.success());
    let help = stdout(&output);
    assert!(help.contains("Usage:"));
    assert!(help.contains("--output"));
}

#[test]
fn test_no_directories_is_usage_error() {
    let ctx = TestContext::new();
    let output = ctx.pomscan().output().unwrap();
    assert!(!output.status.success());
}

#[test]
fn test_one_of_two_resolved() {
    let mut ctx = TestContext::new();
    ctx.add_jar("a.jar", b"D1");
    ctx.add_jar("b.jar", b"D2");
    ctx.jboss_knows(
        D1,
        r#"{"totalCount":1,"data":[{"groupId":"org.foo","artifactId":"bar","version":"1.0"}]}"#,
    );
    ctx.all_services_empty();

    let output = ctx.run(&[]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(stdout(&output).trim(), "1 dependencies out of 2 jars");

    let pom = read(&ctx.path("pom.xml"));
    assert_eq!(pom.matches("<dependency>").count(), 1);
    assert!(pom.contains("<groupId>org.foo</groupId>"));
    assert!(pom.contains("<artifactId>bar</artifactId>"));
    assert!(pom.contains("<version>1.0</version>"));
    assert!(!ctx.path("debug.json").exists());
}

#[test]
fn test_nothing_resolved_writes_no_pom() {
    let mut ctx = TestContext::new();
    ctx.add_jar("a.jar", b"D1");
    ctx.all_services_empty();

    let output = ctx.run(&[]);

    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "0 dependencies out of 1 jars");
    assert!(!ctx.path("pom.xml").exists());
}

#[test]
fn test_empty_directory_writes_no_pom() {
    let mut ctx = TestContext::new();
    ctx.all_services_empty();

    let output = ctx.run(&[]);

    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "0 dependencies out of 0 jars");
    assert!(!ctx.path("pom.xml").exists());
}

#[test]
fn test_failing_services_fall_through() {
    let mut ctx = TestContext::new();
    ctx.add_jar("lib/poi.jar", b"D2");
    let mocks = vec![
        ctx.server
            .mock("GET", "/central")
            .match_query(Matcher::Any)
            .with_status(500)
            .create(),
        ctx.server
            .mock("GET", "/jboss")
            .match_query(Matcher::Any)
            .with_body("<html>not json</html>")
            .create(),
        ctx.server
            .mock("POST", "/spring")
            .match_body(Matcher::PartialJson(serde_json::json!({"checksum": D2})))
            .with_body(
                r#"{"results":[{"name":"poi-ooxml-3.10.1.jar","relativeDirPath":"org/apache/poi/poi-ooxml/3.10.1"}]}"#,
            )
            .create(),
    ];
    ctx.mocks.extend(mocks);

    let output = ctx.run(&["--output", "custom.xml"]);

    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "1 dependencies out of 1 jars");
    let pom = read(&ctx.path("custom.xml"));
    assert!(pom.contains("<groupId>org.apache.poi</groupId>"));
    assert!(pom.contains("<artifactId>poi-ooxml</artifactId>"));
    assert!(!ctx.path("pom.xml").exists());
}

#[test]
fn test_verbose_writes_debug_dump() {
    let mut ctx = TestContext::new();
    ctx.add_jar("a.jar", b"D1");
    ctx.add_jar("b.jar", b"D2");
    ctx.jboss_knows(
        D1,
        r#"{"totalCount":1,"data":[{"groupId":"org.foo","artifactId":"bar","version":"1.0"}]}"#,
    );
    ctx.all_services_empty();

    let output = ctx.run(&["-d"]);
    assert!(output.status.success());

    let dump: serde_json::Value = serde_json::from_str(&read(&ctx.path("debug.json"))).unwrap();
    let results = dump["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["filename"], "a.jar");
    assert_eq!(results[0]["sha1"], D1);
    assert_eq!(results[0]["dependency"]["groupId"], "org.foo");
    assert_eq!(results[1]["sha1"], D2);
    assert!(results[1].get("dependency").is_none());
    assert_eq!(dump["basedirs"].as_array().unwrap().len(), 1);
}

#[test]
fn test_verbose_dump_written_even_without_pom() {
    let mut ctx = TestContext::new();
    ctx.add_jar("a.jar", b"D2");
    ctx.all_services_empty();

    let output = ctx.run(&["--verbose", "--debug-file", "scan.json"]);

    assert!(output.status.success());
    assert!(ctx.path("scan.json").exists());
    assert!(!ctx.path("pom.xml").exists());
}

#[test]
fn test_project_identity_from_flags_and_config() {
    let mut ctx = TestContext::new();
    ctx.add_jar("a.jar", b"D1");
    ctx.jboss_knows(
        D1,
        r#"{"totalCount":1,"data":[{"groupId":"org.foo","artifactId":"bar","version":"1.0"}]}"#,
    );
    ctx.all_services_empty();
    std::fs::write(
        ctx.path("pomscan.toml"),
        "[project]\ngroup_id = \"com.acme\"\nartifact_id = \"legacy\"\n",
    )
    .unwrap();

    let output = ctx.run(&["--config", "pomscan.toml", "--project-version", "7.0"]);

    assert!(output.status.success());
    let pom = read(&ctx.path("pom.xml"));
    assert!(pom.contains("  <groupId>com.acme</groupId>\n  <artifactId>legacy</artifactId>\n  <version>7.0</version>"));
}

#[test]
fn test_unwritable_output_fails() {
    let mut ctx = TestContext::new();
    ctx.add_jar("a.jar", b"D1");
    ctx.jboss_knows(
        D1,
        r#"{"totalCount":1,"data":[{"groupId":"org.foo","artifactId":"bar","version":"1.0"}]}"#,
    );
    ctx.all_services_empty();

    let output = ctx.run(&["-o", "missing-dir/pom.xml"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missing-dir"), "stderr was: {stderr}");
}

#[test]
fn test_missing_root_does_not_block_others() {
    let mut ctx = TestContext::new();
    ctx.add_jar("a.jar", b"D1");
    ctx.jboss_knows(
        D1,
        r#"{"totalCount":1,"data":[{"groupId":"org.foo","artifactId":"bar","version":"1.0"}]}"#,
    );
    ctx.all_services_empty();

    let output = ctx
        .pomscan()
        .arg(ctx.path("does-not-exist"))
        .arg(ctx.libs())
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "1 dependencies out of 1 jars");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("does-not-exist").count(), 1, "stderr was: {stderr}");
    assert!(ctx.path("pom.xml").exists());
}

#[test]
fn test_huge_jobs_rejected() {
    let mut ctx = TestContext::new();
    ctx.add_jar("a.jar", b"D1");
    ctx.all_services_empty();

    let output = ctx.run(&["--jobs", "3000000000000000000"]);

    assert!(!output.status.success());
    assert_ne!(output.status.code(), Some(101));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("jobs must be at most"), "stderr was: {stderr}");
}

#[test]
fn test_parallel_jobs_keep_order() {
    let mut ctx = TestContext::new();
    ctx.add_jar("a.jar", b"D1");
    ctx.add_jar("b.jar", b"D2");
    ctx.jboss_knows(
        D1,
        r#"{"totalCount":1,"data":[{"groupId":"org.first","artifactId":"a","version":"1"}]}"#,
    );
    ctx.jboss_knows(
        D2,
        r#"{"totalCount":1,"data":[{"groupId":"org.second","artifactId":"b","version":"2"}]}"#,
    );
    ctx.all_services_empty();

    let output = ctx.run(&["--jobs", "4"]);

    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "2 dependencies out of 2 jars");
    let pom = read(&ctx.path("pom.xml"));
    let first = pom.find("org.first").unwrap();
    let second = pom.find("org.second").unwrap();
    assert!(first < second);
}
