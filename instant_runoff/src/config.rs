// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// The reason a ballot was refused by [`crate::Election::add_ballot`].
///
/// A rejected ballot is not stored. It is up to the caller to ask the voter
/// again, skip the ballot or stop.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub enum BallotRejection {
    /// The ballot does not rank every candidate exactly once.
    WrongLength { expected: usize, found: usize },
    /// A name on the ballot is not part of the roster.
    UnknownCandidate(String),
    /// The same candidate appears at more than one rank.
    DuplicateCandidate(String),
}

impl Error for BallotRejection {}

impl Display for BallotRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BallotRejection::WrongLength { expected, found } => write!(
                f,
                "ballot ranks {} candidates, expected {}",
                found, expected
            ),
            BallotRejection::UnknownCandidate(name) => {
                write!(f, "unknown candidate {:?} on ballot", name)
            }
            BallotRejection::DuplicateCandidate(name) => {
                write!(f, "candidate {:?} is ranked more than once", name)
            }
        }
    }
}

// ******** Output data structures *********

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct EliminationStats {
    pub name: String,
    pub transfers: Vec<(String, u64)>,
}

/// Statistics for one round
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RoundStats {
    pub round: u32,
    pub tally: Vec<(String, u64)>,
    pub tally_results_elected: Vec<String>,
    pub tally_result_eliminated: Vec<EliminationStats>,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct VotingResult {
    pub winner: String,
    /// Smallest count that is a strict majority of the ballots.
    pub threshold: u64,
    pub round_stats: Vec<RoundStats>,
}

/// Errors that prevent the algorithm from completing successfully.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum VotingErrors {
    /// The roster has no candidates.
    EmptyElection,
    /// Every remaining candidate shares the lowest count: no one can be
    /// eliminated without arbitrarily picking the outcome.
    CompleteTie {
        round: u32,
        candidates: Vec<String>,
        count: u64,
    },
}

impl Error for VotingErrors {}

impl Display for VotingErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VotingErrors::EmptyElection => write!(f, "election has no candidates"),
            VotingErrors::CompleteTie {
                round,
                candidates,
                count,
            } => write!(
                f,
                "election ends in a complete tie between {} ({} votes each, round {})",
                candidates.join(", "),
                count,
                round
            ),
        }
    }
}
