use log::{debug, info, warn};

use instant_runoff::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::io;
use std::path::Path;

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::rcv::config_reader::*;

pub mod config_reader;
pub mod io_common;
pub mod io_csv;
pub mod io_prompt;

#[derive(Debug, Snafu)]
pub enum RcvError {
    #[snafu(display("Error opening file {path}"))]
    OpeningJson { source: std::io::Error, path: String },
    #[snafu(display("Error parsing JSON: {source}"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Expected a number or a column name"))]
    ParsingJsonNumber {},
    #[snafu(display("Indices start at 1, found {value}"))]
    InvalidIndex { value: usize },
    #[snafu(display("Configuration file has no parent directory"))]
    MissingParentDir {},
    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading CSV line: {source}"))]
    CsvLineParse { source: csv::Error },
    #[snafu(display("CSV line {lineno} is too short"))]
    CsvLineTooShort { lineno: usize },
    #[snafu(display("Error reading the answers: {source}"))]
    Prompt { source: io::Error },
    #[snafu(display("Input ended before all the ballots were collected"))]
    EndOfInput {},
    #[snafu(display("Invalid number of voters: {value:?}"))]
    InvalidVoterCount { value: String },
    #[snafu(display("Error writing summary to {path}"))]
    WritingOutput { source: io::Error, path: String },
    #[snafu(display("No candidates: pass them as arguments or in the configuration file"))]
    MissingCandidates {},
    #[snafu(display("{source}"))]
    Voting { source: VotingErrors },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type RcvResult<T> = Result<T, RcvError>;

/// A ballot, as parsed by the readers.
/// This is before checking it against the candidates.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ParsedBallot {
    pub id: Option<String>,
    pub choices: Vec<String>,
}

fn result_stats_to_json(rs: &VotingResult) -> Vec<JSValue> {
    let mut l: Vec<JSValue> = Vec::new();
    for round_stat in rs.round_stats.iter() {
        let mut tally: JSMap<String, JSValue> = JSMap::new();
        for (name, count) in round_stat.tally.iter() {
            tally.insert(name.clone(), json!(count.to_string()));
        }

        let mut tally_results: Vec<JSValue> = Vec::new();
        for elim_stats in round_stat.tally_result_eliminated.iter() {
            let mut transfers: JSMap<String, JSValue> = JSMap::new();
            for (name, count) in elim_stats.transfers.iter() {
                transfers.insert(name.clone(), json!(count.to_string()));
            }
            tally_results.push(json!({
                "eliminated": elim_stats.name,
                "transfers": transfers
            }));
        }
        for winner_name in round_stat.tally_results_elected.iter() {
            tally_results.push(json!({
                "elected": winner_name,
                "transfers": {}
            }));
        }

        let js = json!({"round": round_stat.round, "tally": tally, "tallyResults": tally_results});
        l.push(js);
    }
    l
}

fn build_summary_js(settings: Option<&OutputSettings>, rv: &VotingResult) -> JSValue {
    let c = OutputConfig {
        contest: settings
            .map(|s| s.contest_name.clone())
            .unwrap_or_else(|| "Election".to_string()),
        date: settings.and_then(|s| s.contest_date.clone()),
        jurisdiction: settings.and_then(|s| s.contest_jurisdiction.clone()),
        office: settings.and_then(|s| s.contest_office.clone()),
        threshold: Some(rv.threshold.to_string()),
    };
    json!({
        "config": c,
        "results": result_stats_to_json(rv) })
}

// The roster given on the command line takes precedence over the configuration.
fn select_candidates(args: &Args, config: Option<&RcvConfig>) -> RcvResult<Vec<String>> {
    let candidates: Vec<String> = if args.candidates.is_empty() {
        config
            .map(|c| c.candidates.iter().map(|rc| rc.name.clone()).collect())
            .unwrap_or_default()
    } else {
        args.candidates.clone()
    };
    ensure!(!candidates.is_empty(), MissingCandidatesSnafu {});
    Ok(candidates)
}

fn read_ranking_data(root_path: &Path, cfs: &FileSource) -> RcvResult<Vec<ParsedBallot>> {
    let p = root_path.join(&cfs.file_path);
    let p2 = p.as_path().display().to_string();
    info!("Attempting to read rank file {:?}", p2);
    match cfs.provider.as_str() {
        "csv" => io_csv::read_csv_ranking(&p2, cfs),
        x => whatever!("Provider not implemented {:?}", x),
    }
}

fn collect_ballots(
    args: &Args,
    config: Option<(&Path, &RcvConfig)>,
    candidates: &[String],
) -> RcvResult<Vec<ParsedBallot>> {
    let mut data: Vec<ParsedBallot> = Vec::new();
    if let Some((config_p, config)) = config {
        let root_p = config_p.parent().context(MissingParentDirSnafu {})?;
        for cfs in config.cvr_file_sources.iter() {
            let mut file_data = read_ranking_data(root_p, cfs)?;
            data.append(&mut file_data);
        }
    }
    if let Some(input) = &args.input {
        let mut file_data = io_csv::read_csv_ranking(input, &FileSource::csv(input))?;
        data.append(&mut file_data);
    }

    let has_sources = args.input.is_some()
        || config
            .map(|(_, c)| !c.cvr_file_sources.is_empty())
            .unwrap_or(false);
    if !has_sources {
        info!("No ballot source, asking for the ballots");
        let stdin = io::stdin();
        let stdout = io::stdout();
        data = io_prompt::prompt_ballots(&mut stdin.lock(), &mut stdout.lock(), candidates)?;
    }
    Ok(data)
}

/// Adds the ballots to the election and returns the number of rejected ballots.
fn validate_ballots(election: &mut Election, parsed_ballots: &[ParsedBallot]) -> usize {
    let mut rejected: usize = 0;
    for pb in parsed_ballots.iter() {
        debug!("Choices for ballot {:?}: {:?}", pb.id, pb.choices);
        if let Err(e) = election.add_ballot(&pb.choices) {
            warn!("Skipping ballot {:?}: {}", pb.id, e);
            rejected += 1;
        }
    }
    rejected
}

fn write_summary(out: &str, pretty_js_stats: &str) -> RcvResult<()> {
    if out == "stdout" {
        println!("{}", pretty_js_stats);
    } else {
        info!("Writing summary to {}", out);
        fs::write(out, pretty_js_stats).context(WritingOutputSnafu { path: out })?;
    }
    Ok(())
}

fn check_summary(summary_p: &str, pretty_js_stats: &str) -> RcvResult<()> {
    let summary_ref = read_summary(summary_p)?;
    debug!("summary: {:?}", summary_ref);
    let pretty_js_summary_ref =
        serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
    if pretty_js_summary_ref != pretty_js_stats {
        warn!("Found differences with the reference string");
        print_diff(pretty_js_summary_ref.as_str(), pretty_js_stats, "\n");
        whatever!("Difference detected between calculated summary and reference summary")
    }
    Ok(())
}

/// Collects the ballots, runs the election and writes or checks the summary.
pub fn run_election(args: &Args) -> RcvResult<VotingResult> {
    let config: Option<RcvConfig> = match &args.config {
        Some(p) => Some(read_config(p)?),
        None => None,
    };
    let candidates = select_candidates(args, config.as_ref())?;
    let mut election = Election::new(&candidates).context(VotingSnafu {})?;

    let config_with_path = match (&args.config, &config) {
        (Some(p), Some(c)) => Some((Path::new(p.as_str()), c)),
        _ => None,
    };
    let ballots = collect_ballots(args, config_with_path, &candidates)?;
    let rejected = validate_ballots(&mut election, &ballots);
    if rejected > 0 {
        warn!(
            "{} ballot(s) accepted, {} rejected",
            election.num_ballots(),
            rejected
        );
    } else {
        info!("{} ballot(s) accepted", election.num_ballots());
    }

    let result = election.run_election_stats().context(VotingSnafu {})?;

    if args.out.is_some() || args.reference.is_some() {
        let result_js = build_summary_js(config.as_ref().map(|c| &c.output_settings), &result);
        let pretty_js_stats =
            serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;
        if let Some(out) = &args.out {
            write_summary(out, &pretty_js_stats)?;
        }
        // The reference summary, if provided for comparison
        if let Some(summary_p) = &args.reference {
            check_summary(summary_p, &pretty_js_stats)?;
        }
    }

    Ok(result)
}
