// src/error.rs
//! Error types for the extraction pipeline.
//!
//! Every failure here is local: the orchestrator logs it and moves on to the
//! next game or group. Nothing in this module is ever fatal to a run.

use ego_tree::NodeId;
use thiserror::Error;

/// Why a date/time pair did not produce an instant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFailure {
    #[error("no time text")]
    MissingTime,
    #[error("time not announced yet ({0})")]
    Placeholder(String),
    #[error("game is over or off ({0})")]
    GameOver(String),
    #[error("could not read a date/time from {0:?}")]
    Unparseable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    #[error("event title is empty")]
    EmptyTitle,
    #[error("event ends before it starts")]
    EndNotAfterStart,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    #[error("node {0:?} is no longer in the document")]
    StaleNode(NodeId),
    #[error("markup fragment has no nodes")]
    EmptyFragment,
}

#[derive(Debug, Error)]
pub enum PageError {
    #[error("invalid page address {address:?}: {source}")]
    Address {
        address: String,
        #[source]
        source: url::ParseError,
    },
}

/// Coarse classes of failure, used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Expected element or pattern not found.
    StructuralMiss,
    /// A value was found but did not resolve (date/time, event invariants).
    Unparseable,
    /// The page as a whole cannot be handled.
    UnsupportedPage,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("no layout adapter for host {0:?}")]
    UnsupportedHost(String),
    #[error("address has no date parameter")]
    MissingDateParam,
    #[error("date parameter {0:?} is not YYYY-MM-DD")]
    InvalidDateParam(String),
    #[error("no game identifier in container")]
    MissingGameId,
    #[error("no time element in container")]
    MissingTime,
    #[error("expected two team links, found {found}")]
    TeamLinks { found: usize },
    #[error("team name could not be read")]
    MissingTeamName,
    #[error(transparent)]
    Time(#[from] ParseFailure),
    #[error(transparent)]
    Event(#[from] EventError),
    #[error(transparent)]
    Dom(#[from] DomError),
}

impl ExtractError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ExtractError::UnsupportedHost(_)
            | ExtractError::MissingDateParam
            | ExtractError::InvalidDateParam(_) => FailureKind::UnsupportedPage,
            ExtractError::Time(ParseFailure::MissingTime)
            | ExtractError::MissingGameId
            | ExtractError::MissingTime
            | ExtractError::TeamLinks { .. }
            | ExtractError::MissingTeamName
            | ExtractError::Dom(_) => FailureKind::StructuralMiss,
            ExtractError::Time(_) | ExtractError::Event(_) => FailureKind::Unparseable,
        }
    }
}
