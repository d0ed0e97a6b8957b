//! Integration tests for the subcommands.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use boardkeep_cli::cli::{Cli, Command, DesignArgs, InspectArgs};
use boardkeep_cli::commands::{run_discard, run_identity, run_inspect, run_list, run_status};
use boardkeep_cli::settings::BoardkeepSettings;
use boardkeep_persistence::{ChecksumIdentity, SectionKind, SessionCodec};
use boardkeep_session::{RoutingBoard, Workspace};
use clap::Parser;
use tempfile::TempDir;

const DESIGN: &[u8] = b"(pcb cli-test)";

struct Fixture {
    dir: TempDir,
    settings: BoardkeepSettings,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let design = dir.path().join("board.dsn");
        fs::write(&design, DESIGN).unwrap();
        fs::File::options()
            .write(true)
            .open(&design)
            .unwrap()
            .set_modified(SystemTime::now() - Duration::from_secs(600))
            .unwrap();

        let mut settings = BoardkeepSettings::default();
        settings.checkpoint.scratch_dir = Some(dir.path().join("scratch"));
        Self { dir, settings }
    }

    fn design(&self) -> DesignArgs {
        DesignArgs {
            design: self.dir.path().join("board.dsn"),
        }
    }

    /// Write a checkpoint holding one snapshot.
    fn write_checkpoint(&self) -> PathBuf {
        let mut workspace = Workspace::new(RoutingBoard::new(
            b"board".to_vec(),
            vec!["F.Cu".to_string(), "B.Cu".to_string()],
        ));
        let mask = workspace.snapshots.mask;
        workspace
            .snapshots
            .registry
            .create("before-reroute", &workspace.live, &mask)
            .unwrap();

        let session = SessionCodec::capture(&workspace).unwrap();
        self.settings
            .store()
            .write(ChecksumIdentity::of_bytes(DESIGN), &session)
            .unwrap()
            .path
    }
}

#[test]
fn test_identity_names_checkpoint() {
    let fixture = Fixture::new();
    let report = run_identity(&fixture.design(), &fixture.settings).unwrap();

    let hex = ChecksumIdentity::of_bytes(DESIGN).to_hex();
    assert_eq!(report.identity.to_hex(), hex);
    assert!(
        report
            .checkpoint
            .ends_with(format!("recovery-{hex}.frb"))
    );
    assert!(!report.checkpoint_exists);
}

#[test]
fn test_identity_of_missing_design_fails() {
    let fixture = Fixture::new();
    let args = DesignArgs {
        design: fixture.dir.path().join("missing.dsn"),
    };
    let err = run_identity(&args, &fixture.settings).unwrap_err();
    assert!(format!("{err:#}").contains("missing.dsn"));
}

#[test]
fn test_status_offers_newer_checkpoint() {
    let fixture = Fixture::new();
    let before = run_status(&fixture.design(), &fixture.settings).unwrap();
    assert!(before.offer.is_none());
    assert!(before.checkpoint_modified.is_none());

    let path = fixture.write_checkpoint();
    let after = run_status(&fixture.design(), &fixture.settings).unwrap();
    assert_eq!(after.offer.unwrap().path, path);
}

#[test]
fn test_inspect_lists_sections_and_snapshots() {
    let fixture = Fixture::new();
    let path = fixture.write_checkpoint();

    let report = run_inspect(&InspectArgs {
        checkpoint: path,
        snapshots: true,
    })
    .unwrap();

    assert_eq!(report.sections[0].kind, SectionKind::Board);
    assert_eq!(report.sections[1].kind, SectionKind::View);
    assert!(report.sections.iter().any(|s| s.id == "snapshots"));

    let snapshots = report.snapshots.unwrap();
    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0].name, "before-reroute");
    assert_eq!(snapshots[0].categories, 15);
}

#[test]
fn test_inspect_rejects_garbage() {
    let fixture = Fixture::new();
    let path = fixture.dir.path().join("garbage.frb");
    fs::write(&path, b"not a checkpoint").unwrap();

    let result = run_inspect(&InspectArgs {
        checkpoint: path,
        snapshots: false,
    });
    assert!(result.is_err());
}

#[test]
fn test_list_and_discard() {
    let fixture = Fixture::new();
    assert!(run_list(&fixture.settings).unwrap().is_empty());

    let path = fixture.write_checkpoint();
    let listed = run_list(&fixture.settings).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].path, path);

    let report = run_discard(&fixture.design(), &fixture.settings).unwrap();
    assert!(report.deleted);
    assert!(!path.exists());

    let report = run_discard(&fixture.design(), &fixture.settings).unwrap();
    assert!(!report.deleted);
}

#[test]
fn test_cli_parses_global_flags() {
    let cli = Cli::try_parse_from([
        "boardkeep",
        "status",
        "board.dsn",
        "--config",
        "custom.toml",
        "--log-format",
        "json",
    ])
    .unwrap();

    assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
    match cli.command {
        Command::Status(args) => assert_eq!(args.design, PathBuf::from("board.dsn")),
        _ => panic!("expected status"),
    }
}
