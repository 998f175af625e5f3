use std::fmt;
use std::path::{Path, PathBuf};

use fiscal_mover::path_to_string;

/// Which kind of entries get relocated for one company.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// Move allow-listed document files into the dated bucket.
    Documents,
    /// Move the inbound/outbound subfolders into the sibling bucket.
    Subfolders,
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Documents => write!(f, "documents"),
            Self::Subfolders => write!(f, "subfolders"),
        }
    }
}

/// Outcome of resolving one company name against the destination folder names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    Matched { folder: String, score: usize },
    Unmatched,
}

/// Result of searching a destination folder for the dated bucket directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BucketSearch {
    Found(PathBuf),
    /// More than one qualifying bucket exists in the subtree.
    Ambiguous(Vec<PathBuf>),
    NotFound,
}

/// Why one company folder can or cannot be processed.
#[derive(Debug, Clone)]
pub enum ProposalStatus {
    Ready {
        dest_folder: PathBuf,
        primary_target: PathBuf,
        alternate_target: PathBuf,
    },
    NoMatch,
    NoBucket {
        dest_folder: PathBuf,
    },
    AmbiguousBucket {
        dest_folder: PathBuf,
        candidates: Vec<PathBuf>,
    },
}

/// One row of the move plan for a single company folder.
///
/// The approval step may flip `approved` and change `target_kind`
/// before the row is executed.
#[derive(Debug, Clone)]
pub struct Proposal {
    pub company: String,
    pub source_path: PathBuf,
    pub status: ProposalStatus,
    pub target_kind: TargetKind,
    pub approved: bool,
}

impl Proposal {
    /// Target directory for the currently selected kind, if the row is executable.
    pub fn target_path(&self) -> Option<&Path> {
        match &self.status {
            ProposalStatus::Ready {
                primary_target,
                alternate_target,
                ..
            } => Some(match self.target_kind {
                TargetKind::Documents => primary_target.as_path(),
                TargetKind::Subfolders => alternate_target.as_path(),
            }),
            _ => None,
        }
    }

    /// One-line status for display in the proposal listing.
    pub fn describe(&self) -> String {
        match &self.status {
            ProposalStatus::Ready { .. } => self
                .target_path()
                .map_or_else(String::new, |path| format!("{} -> {}", self.target_kind, path_to_string(path))),
            ProposalStatus::NoMatch => "no matching destination folder".to_string(),
            ProposalStatus::NoBucket { dest_folder } => {
                format!("no dated bucket under {}", path_to_string(dest_folder))
            }
            ProposalStatus::AmbiguousBucket { dest_folder, candidates } => {
                format!(
                    "{} dated buckets under {}",
                    candidates.len(),
                    path_to_string(dest_folder)
                )
            }
        }
    }
}

/// Terminal outcome of one executor step. Aggregated into the run log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved { from: PathBuf, to: PathBuf },
    SkippedExisting { path: PathBuf },
    /// Pre-existing destination subfolder was deleted before the replacement moved in.
    Replaced { path: PathBuf },
    SourceRemoved { path: PathBuf },
    SourceKept { path: PathBuf },
    Failed { path: PathBuf, error: String },
}

impl MoveOutcome {
    pub const fn is_move(&self) -> bool {
        matches!(self, Self::Moved { .. })
    }
}
