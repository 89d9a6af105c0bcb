//! Two-stage candidate verification.
//!
//! Stage 1 drains the first member through a worker-local handle. Only a
//! candidate that survives it pays for stage 2, which reopens the archive and
//! drains every member. With ZipCrypto about one wrong password in 256 passes
//! the header check byte, and a stored member may even survive its CRC, so
//! stage 2 is what makes a reported password trustworthy.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::error::SearchError;
use crate::error::ZipError;
use crate::zip_archive::ZipArchive;

/// When to run the all-members pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FullCheck {
    /// Always run stage 2, even for single-member archives.
    #[default]
    Always,
    /// Accept a stage-1 pass directly when the archive has one member.
    MultiMemberOnly,
}

/// Which stage rejected a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Probe,
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    Invalid(Stage),
}

/// Worker-local archive handle used for stage 1.
#[derive(Debug)]
pub struct Probe {
    archive: ZipArchive,
}

/// Checks candidates against one archive.
#[derive(Debug, Clone)]
pub struct Verifier {
    path: PathBuf,
    members: usize,
    policy: FullCheck,
}

impl Verifier {
    /// Open the archive once and make sure a search on it makes sense.
    pub fn inspect(path: impl AsRef<Path>, policy: FullCheck) -> Result<Self, SearchError> {
        let path = path.as_ref().to_path_buf();
        let archive = ZipArchive::open(&path).map_err(|source| SearchError::Archive {
            path: path.clone(),
            source,
        })?;

        let members = archive.members();
        if members.is_empty() {
            return Err(SearchError::NoMembers(path));
        }
        if !members.iter().any(|m| m.is_encrypted()) {
            return Err(SearchError::NotEncrypted(path));
        }
        for member in members {
            member.compression().map_err(|source| SearchError::Archive {
                path: path.clone(),
                source,
            })?;
        }
        if !members[0].is_encrypted() {
            warn!(
                member = members[0].name(),
                "first member is not encrypted, every candidate will reach the full check"
            );
        }

        Ok(Self {
            members: members.len(),
            path,
            policy,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn member_count(&self) -> usize {
        self.members
    }

    pub fn policy(&self) -> FullCheck {
        self.policy
    }

    pub fn open_probe(&self) -> Result<Probe, SearchError> {
        let archive = ZipArchive::open(&self.path).map_err(|source| self.archive_error(source))?;
        Ok(Probe { archive })
    }

    pub(crate) fn archive_error(&self, source: ZipError) -> SearchError {
        SearchError::Archive {
            path: self.path.clone(),
            source,
        }
    }

    /// Check one candidate.
    ///
    /// Password failures become [`Verdict::Invalid`]. Any other codec error
    /// would repeat for every candidate and is returned as `Err`.
    pub fn verify(&self, probe: &mut Probe, candidate: &str) -> Result<Verdict, ZipError> {
        if !passes(drain_member(&mut probe.archive, 0, candidate))? {
            return Ok(Verdict::Invalid(Stage::Probe));
        }

        if self.policy == FullCheck::MultiMemberOnly && self.members == 1 {
            return Ok(Verdict::Valid);
        }

        let mut fresh = ZipArchive::open(&self.path)?;
        for index in 0..fresh.members().len() {
            if !passes(drain_member(&mut fresh, index, candidate))? {
                debug!(candidate, member = index, "candidate passed probe but failed full check");
                return Ok(Verdict::Invalid(Stage::Full));
            }
        }
        Ok(Verdict::Valid)
    }
}

/// Bind the candidate if the member is encrypted, then read it to the end.
fn drain_member(archive: &mut ZipArchive, index: usize, candidate: &str) -> Result<(), ZipError> {
    let encrypted = archive
        .members()
        .get(index)
        .ok_or(ZipError::NoSuchMember(index))?
        .is_encrypted();
    if encrypted {
        archive.set_password(index, candidate.as_bytes())?;
    }
    archive.open_member(index)?.drain()?;
    Ok(())
}

fn passes(outcome: Result<(), ZipError>) -> Result<bool, ZipError> {
    match outcome {
        Ok(()) => Ok(true),
        Err(e) if e.is_password_failure() => Ok(false),
        Err(e) => Err(e),
    }
}
