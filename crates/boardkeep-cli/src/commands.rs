//! Subcommand implementations. Each returns a report; printing lives in
//! `summary`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use boardkeep_persistence::{
    ChecksumIdentity, RecoveryCheckpoint, RecoveryOffer, SectionInfo, SessionCodec,
};
use boardkeep_session::{MenuMode, RoutingBoard, Workspace};
use chrono::{DateTime, Utc};
use tracing::{info, info_span, warn};

use crate::cli::{DesignArgs, InspectArgs};
use crate::settings::BoardkeepSettings;

#[derive(Debug)]
pub struct IdentityReport {
    pub design: PathBuf,
    pub identity: ChecksumIdentity,
    pub checkpoint: PathBuf,
    pub checkpoint_exists: bool,
}

#[derive(Debug)]
pub struct SnapshotRow {
    pub id: u64,
    pub name: String,
    pub menu_mode: MenuMode,
    pub categories: usize,
}

#[derive(Debug)]
pub struct InspectReport {
    pub path: PathBuf,
    pub size: usize,
    pub sections: Vec<SectionInfo>,

    /// Present when requested and the stream could be applied.
    pub snapshots: Option<Vec<SnapshotRow>>,
}

#[derive(Debug)]
pub struct StatusReport {
    pub design: PathBuf,
    pub identity: ChecksumIdentity,
    pub checkpoint: PathBuf,
    pub design_modified: Option<DateTime<Utc>>,
    pub checkpoint_modified: Option<DateTime<Utc>>,
    pub offer: Option<RecoveryOffer>,
}

#[derive(Debug)]
pub struct DiscardReport {
    pub checkpoint: PathBuf,
    pub deleted: bool,
}

pub fn run_identity(args: &DesignArgs, settings: &BoardkeepSettings) -> Result<IdentityReport> {
    let identity = compute_identity(&args.design)?;
    let store = settings.store();
    Ok(IdentityReport {
        design: args.design.clone(),
        identity,
        checkpoint: store.path_for(identity),
        checkpoint_exists: store.exists(identity),
    })
}

pub fn run_inspect(args: &InspectArgs) -> Result<InspectReport> {
    let span = info_span!("inspect", path = %args.checkpoint.display());
    let _guard = span.enter();

    let bytes = fs::read(&args.checkpoint)
        .with_context(|| format!("read {}", args.checkpoint.display()))?;
    let sections = SessionCodec::sections(&bytes).context("decode checkpoint")?;
    info!("{} sections", sections.len());

    let snapshots = if args.snapshots {
        let session = SessionCodec::decode(&bytes).context("decode checkpoint")?;
        let mut workspace = Workspace::new(RoutingBoard::new(Vec::new(), Vec::new()));
        match SessionCodec::apply(&session, &mut workspace) {
            Ok(_) => Some(snapshot_rows(&workspace)),
            Err(e) => {
                warn!("Could not read snapshots: {}", e);
                None
            }
        }
    } else {
        None
    };

    Ok(InspectReport {
        path: args.checkpoint.clone(),
        size: bytes.len(),
        sections,
        snapshots,
    })
}

pub fn run_status(args: &DesignArgs, settings: &BoardkeepSettings) -> Result<StatusReport> {
    let identity = compute_identity(&args.design)?;
    let store = settings.store();
    let design_modified = modified_at(&args.design);

    Ok(StatusReport {
        design: args.design.clone(),
        identity,
        checkpoint: store.path_for(identity),
        design_modified,
        checkpoint_modified: store.modified_at(identity),
        offer: store.recovery_offer(identity, design_modified),
    })
}

pub fn run_list(settings: &BoardkeepSettings) -> Result<Vec<RecoveryCheckpoint>> {
    let store = settings.store();
    store
        .list()
        .with_context(|| format!("list {}", store.dir().display()))
}

pub fn run_discard(args: &DesignArgs, settings: &BoardkeepSettings) -> Result<DiscardReport> {
    let identity = compute_identity(&args.design)?;
    let store = settings.store();
    let deleted = store.delete(identity);
    Ok(DiscardReport {
        checkpoint: store.path_for(identity),
        deleted,
    })
}

fn compute_identity(design: &Path) -> Result<ChecksumIdentity> {
    ChecksumIdentity::compute(design).with_context(|| format!("identify {}", design.display()))
}

fn modified_at(path: &Path) -> Option<DateTime<Utc>> {
    fs::metadata(path)
        .and_then(|metadata| metadata.modified())
        .ok()
        .map(DateTime::<Utc>::from)
}

fn snapshot_rows(workspace: &Workspace) -> Vec<SnapshotRow> {
    workspace
        .snapshots
        .registry
        .snapshots()
        .iter()
        .map(|snapshot| SnapshotRow {
            id: snapshot.id.value(),
            name: snapshot.name.clone(),
            menu_mode: snapshot.menu_mode,
            categories: snapshot.attributes.enabled().count(),
        })
        .collect()
}
