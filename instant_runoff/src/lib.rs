/*!
Instant-runoff tabulation for single winner elections.

Every ballot ranks all the candidates. At each round, a ballot counts for its
highest ranked candidate that is still running. A candidate holding strictly
more than half of the ballots wins; otherwise the candidate in last place is
eliminated and its ballots move to their next preference.

```
use instant_runoff::Election;

let mut election = Election::new(&["Alice".to_string(), "Bob".to_string(), "Charlie".to_string()])?;
election.add_ballot(&["Alice", "Bob", "Charlie"])?;
election.add_ballot(&["Bob", "Alice", "Charlie"])?;
election.add_ballot(&["Charlie", "Alice", "Bob"])?;
election.add_ballot(&["Alice", "Charlie", "Bob"])?;

// Bob and Charlie tie for last place: Bob goes first and his ballot moves to Alice.
assert_eq!(election.run_election()?, "Alice");
# Ok::<(), Box<dyn std::error::Error>>(())
```
*/
mod config;
pub mod manual;

use log::{debug, info, warn};

use std::{
    collections::{HashMap, HashSet},
    ops::AddAssign,
};

pub use crate::config::*;

type RoundId = u32;

/// The position of a candidate in the roster of an [`Election`].
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub struct CandidateId(u32);

impl CandidateId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, PartialOrd, Ord, Hash)]
struct VoteCount(u64);

impl VoteCount {
    const EMPTY: VoteCount = VoteCount(0);
    const ONE: VoteCount = VoteCount(1);
}

impl std::iter::Sum for VoteCount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        VoteCount(iter.map(|vc| vc.0).sum())
    }
}

impl AddAssign for VoteCount {
    fn add_assign(&mut self, rhs: VoteCount) {
        self.0 += rhs.0;
    }
}

// Invariant: every candidate of the roster appears exactly once.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
struct Ballot {
    ranks: Vec<CandidateId>,
}

impl Ballot {
    /// The highest ranked candidate that has not been eliminated, if any.
    fn first_valid(&self, eliminated: &HashSet<CandidateId>) -> Option<CandidateId> {
        self.ranks
            .iter()
            .find(|cid| !eliminated.contains(*cid))
            .cloned()
    }
}

/// An instant-runoff election over a fixed roster of candidates.
///
/// Ballots are added one at a time with [`Election::add_ballot`]. Eliminations
/// are permanent: an election is meant to be resolved once, with
/// [`Election::run_election`] or [`Election::run_election_stats`].
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Election {
    candidates: Vec<String>,
    candidate_ids: HashMap<String, CandidateId>,
    ballots: Vec<Ballot>,
    eliminated: HashSet<CandidateId>,
}

impl Election {
    /// Creates an election for the given roster, in order.
    ///
    /// Names are expected to be unique. If a name is repeated, only its first
    /// position is used when reading ballots.
    pub fn new(candidates: &[String]) -> Result<Election, VotingErrors> {
        if candidates.is_empty() {
            return Err(VotingErrors::EmptyElection);
        }
        let mut candidate_ids: HashMap<String, CandidateId> = HashMap::new();
        for (idx, name) in candidates.iter().enumerate() {
            candidate_ids
                .entry(name.clone())
                .or_insert(CandidateId(idx as u32));
        }
        for (idx, name) in candidates.iter().enumerate() {
            debug!("Candidate: {}: {}", idx, name);
        }
        Ok(Election {
            candidates: candidates.to_vec(),
            candidate_ids,
            ballots: Vec::new(),
            eliminated: HashSet::new(),
        })
    }

    /// The roster, in the order given at construction.
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    pub fn num_ballots(&self) -> usize {
        self.ballots.len()
    }

    pub fn num_eliminated(&self) -> usize {
        self.eliminated.len()
    }

    pub fn candidate_id(&self, name: &str) -> Option<CandidateId> {
        self.candidate_ids.get(name).cloned()
    }

    pub fn candidate_name(&self, cid: CandidateId) -> Option<&str> {
        self.candidates.get(cid.index()).map(|s| s.as_str())
    }

    pub fn is_eliminated(&self, name: &str) -> bool {
        self.candidate_id(name)
            .map(|cid| self.eliminated.contains(&cid))
            .unwrap_or(false)
    }

    /// Adds the ranking of one voter, from the most to the least preferred.
    ///
    /// The ballot must rank every candidate of the roster exactly once.
    /// Otherwise it is rejected and the election is left unchanged.
    pub fn add_ballot<S: AsRef<str>>(&mut self, rankings: &[S]) -> Result<(), BallotRejection> {
        if rankings.len() != self.candidates.len() {
            return Err(BallotRejection::WrongLength {
                expected: self.candidates.len(),
                found: rankings.len(),
            });
        }

        let mut ranks: Vec<CandidateId> = Vec::with_capacity(rankings.len());
        for name in rankings.iter().map(|s| s.as_ref()) {
            let cid = self
                .candidate_id(name)
                .ok_or_else(|| BallotRejection::UnknownCandidate(name.to_string()))?;
            ranks.push(cid);
        }

        let mut seen: HashSet<CandidateId> = HashSet::new();
        for cid in ranks.iter() {
            if !seen.insert(*cid) {
                return Err(BallotRejection::DuplicateCandidate(
                    self.candidates[cid.index()].clone(),
                ));
            }
        }

        self.ballots.push(Ballot { ranks });
        Ok(())
    }

    /// The current first-choice count of every remaining candidate.
    ///
    /// Candidates without any support are present with a count of zero.
    /// Eliminated candidates are never present.
    pub fn vote_counts(&self) -> HashMap<String, u64> {
        self.compute_tally()
            .iter()
            .map(|(cid, vc)| (self.candidates[cid.index()].clone(), vc.0))
            .collect()
    }

    /// The candidate holding strictly more than half of all the ballots.
    pub fn majority_winner(&self) -> Option<String> {
        let tally = self.compute_tally();
        self.majority_winner_id(&tally)
            .map(|cid| self.candidates[cid.index()].clone())
    }

    /// All the remaining candidates sharing the lowest count, in roster order.
    pub fn find_last_place(&self) -> Vec<String> {
        let tally = self.compute_tally();
        self.last_place_ids(&tally)
            .iter()
            .map(|cid| self.candidates[cid.index()].clone())
            .collect()
    }

    /// Checks if the given candidates all have the same count.
    ///
    /// Unknown and eliminated candidates count as zero.
    pub fn is_tie<S: AsRef<str>>(&self, candidates: &[S]) -> bool {
        let tally = self.compute_tally();
        let counts: Vec<VoteCount> = candidates
            .iter()
            .map(|name| {
                self.candidate_id(name.as_ref())
                    .and_then(|cid| tally.get(&cid))
                    .cloned()
                    .unwrap_or(VoteCount::EMPTY)
            })
            .collect();
        counts.windows(2).all(|w| w[0] == w[1])
    }

    /// Removes a candidate from the race. Eliminating a candidate twice has
    /// no further effect.
    pub fn eliminate(&mut self, cid: CandidateId) {
        if cid.index() >= self.candidates.len() {
            warn!("eliminate: candidate id {:?} is not in the roster", cid);
            return;
        }
        if self.eliminated.insert(cid) {
            debug!(
                "eliminate: {} ({} eliminated so far)",
                self.candidates[cid.index()],
                self.eliminated.len()
            );
        }
    }

    /// Same as [`Election::eliminate`], by name. Unknown names are ignored.
    pub fn eliminate_candidate(&mut self, name: &str) {
        match self.candidate_id(name) {
            Some(cid) => self.eliminate(cid),
            None => warn!("eliminate_candidate: unknown candidate {:?}", name),
        }
    }

    /// The candidates still running, in roster order.
    pub fn remaining_candidates(&self) -> Vec<String> {
        self.remaining_ids()
            .iter()
            .map(|cid| self.candidates[cid.index()].clone())
            .collect()
    }

    /// Runs the elimination rounds until a candidate holds a majority.
    pub fn run_election(&mut self) -> Result<String, VotingErrors> {
        self.run_election_stats().map(|res| res.winner)
    }

    /// Runs the elimination rounds until a candidate holds a majority, and
    /// returns the statistics of every round.
    ///
    /// When several candidates share the last place, the one that comes
    /// first in the roster is eliminated. If all the remaining candidates
    /// share the last place, the election fails with
    /// [`VotingErrors::CompleteTie`].
    pub fn run_election_stats(&mut self) -> Result<VotingResult, VotingErrors> {
        info!(
            "Processing {:?} ballots, candidates: {:?}",
            self.ballots.len(),
            self.candidates
        );
        let threshold = get_threshold(self.ballots.len());
        debug!("run_election_stats: vote_threshold: {:?}", threshold);

        let mut round_stats: Vec<RoundStats> = Vec::new();
        // Each round elects a winner, fails, or shrinks the remaining candidates.
        loop {
            let round_id: RoundId = round_stats.len() as u32 + 1;
            let tally = self.compute_tally();
            let remaining = self.remaining_ids();
            let tallied: VoteCount = tally.values().cloned().sum();
            debug!(
                "run_election_stats: round {:?} tally: {:?} ({:?} tallied)",
                round_id, tally, tallied
            );

            let mut stats = RoundStats {
                round: round_id,
                tally: remaining
                    .iter()
                    .map(|cid| (self.candidates[cid.index()].clone(), tally[cid].0))
                    .collect(),
                tally_results_elected: Vec::new(),
                tally_result_eliminated: Vec::new(),
            };

            if let Some(cid) = self.majority_winner_id(&tally) {
                let name = self.candidates[cid.index()].clone();
                info!(
                    "Round {:?}: {} is elected with {:?} votes",
                    round_id, name, tally[&cid].0
                );
                stats.tally_results_elected.push(name.clone());
                round_stats.push(stats);
                return Ok(VotingResult {
                    winner: name,
                    threshold: threshold.0,
                    round_stats,
                });
            }

            let last_place = self.last_place_ids(&tally);
            debug!("run_election_stats: last place: {:?}", last_place);
            let loser = match last_place.first() {
                Some(cid) if last_place.len() < remaining.len() => *cid,
                _ => {
                    let count = last_place
                        .first()
                        .and_then(|cid| tally.get(cid))
                        .cloned()
                        .unwrap_or(VoteCount::EMPTY);
                    info!(
                        "Round {:?}: complete tie between {:?} with {:?} votes",
                        round_id, last_place, count.0
                    );
                    return Err(VotingErrors::CompleteTie {
                        round: round_id,
                        candidates: last_place
                            .iter()
                            .map(|cid| self.candidates[cid.index()].clone())
                            .collect(),
                        count: count.0,
                    });
                }
            };

            let elimination = self.elimination_stats(loser);
            info!(
                "Round {:?}: {} is eliminated: {:?} transfers",
                round_id, elimination.name, elimination.transfers
            );
            self.eliminate(loser);
            stats.tally_result_eliminated.push(elimination);
            round_stats.push(stats);
        }
    }

    fn remaining_ids(&self) -> Vec<CandidateId> {
        (0..self.candidates.len())
            .map(|idx| CandidateId(idx as u32))
            .filter(|cid| !self.eliminated.contains(cid))
            .collect()
    }

    fn compute_tally(&self) -> HashMap<CandidateId, VoteCount> {
        // Start with every remaining candidate to capture the ones without votes.
        let mut tally: HashMap<CandidateId, VoteCount> = self
            .remaining_ids()
            .iter()
            .map(|cid| (*cid, VoteCount::EMPTY))
            .collect();
        for b in self.ballots.iter() {
            if let Some(cid) = b.first_valid(&self.eliminated) {
                if let Some(vc) = tally.get_mut(&cid) {
                    *vc += VoteCount::ONE;
                }
            }
        }
        tally
    }

    fn majority_winner_id(&self, tally: &HashMap<CandidateId, VoteCount>) -> Option<CandidateId> {
        let total = self.ballots.len() as u64;
        self.remaining_ids()
            .into_iter()
            .find(|cid| matches!(tally.get(cid), Some(vc) if vc.0 * 2 > total))
    }

    fn last_place_ids(&self, tally: &HashMap<CandidateId, VoteCount>) -> Vec<CandidateId> {
        let min_count: VoteCount = tally.values().min().cloned().unwrap_or(VoteCount::EMPTY);
        self.remaining_ids()
            .into_iter()
            .filter(|cid| tally.get(cid) == Some(&min_count))
            .collect()
    }

    // Where the ballots of a candidate go once it is eliminated.
    fn elimination_stats(&self, loser: CandidateId) -> EliminationStats {
        let mut after: HashSet<CandidateId> = self.eliminated.clone();
        after.insert(loser);

        let mut transfers: HashMap<CandidateId, VoteCount> = HashMap::new();
        for b in self.ballots.iter() {
            if b.first_valid(&self.eliminated) != Some(loser) {
                continue;
            }
            // Ballots rank every candidate and the loser is never the last one
            // running, so a next choice always exists.
            if let Some(cid) = b.first_valid(&after) {
                *transfers.entry(cid).or_insert(VoteCount::EMPTY) += VoteCount::ONE;
            }
        }

        let mut sorted_transfers: Vec<(CandidateId, VoteCount)> = transfers.into_iter().collect();
        sorted_transfers.sort_by_key(|(cid, _)| *cid);
        EliminationStats {
            name: self.candidates[loser.index()].clone(),
            transfers: sorted_transfers
                .iter()
                .map(|(cid, vc)| (self.candidates[cid.index()].clone(), vc.0))
                .collect(),
        }
    }
}

fn get_threshold(num_ballots: usize) -> VoteCount {
    if num_ballots == 0 {
        VoteCount::EMPTY
    } else {
        VoteCount((num_ballots as u64 / 2) + 1)
    }
}
