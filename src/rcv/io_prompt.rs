// Interactive collection of the ballots.

use std::io::{BufRead, Write};

use crate::rcv::*;

fn read_answer<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> RcvResult<String> {
    write!(output, "{}", prompt).context(PromptSnafu {})?;
    output.flush().context(PromptSnafu {})?;
    let mut line = String::new();
    let n = input.read_line(&mut line).context(PromptSnafu {})?;
    ensure!(n > 0, EndOfInputSnafu {});
    Ok(line.trim().to_string())
}

/// Asks for the number of voters, then for a full ranking from every voter.
///
/// A choice is asked again until it names a candidate that this voter did not
/// rank yet, so every collected ballot is complete.
pub fn prompt_ballots<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    candidates: &[String],
) -> RcvResult<Vec<ParsedBallot>> {
    let answer = read_answer(input, output, "Number of voters: ")?;
    let num_voters: usize = answer
        .parse()
        .ok()
        .context(InvalidVoterCountSnafu { value: answer.clone() })?;

    writeln!(output, "\nCandidates: {}", candidates.join(", ")).context(PromptSnafu {})?;
    writeln!(output, "Rank candidates from most preferred (1) to least preferred.\n")
        .context(PromptSnafu {})?;

    let mut res: Vec<ParsedBallot> = Vec::new();
    for voter in 1..=num_voters {
        writeln!(output, "Voter {}:", voter).context(PromptSnafu {})?;
        let mut choices: Vec<String> = Vec::with_capacity(candidates.len());
        for rank in 1..=candidates.len() {
            loop {
                let choice = read_answer(input, output, &format!("  Rank {}: ", rank))?;
                if candidates.contains(&choice) && !choices.contains(&choice) {
                    choices.push(choice);
                    break;
                }
                debug!("prompt_ballots: voter {}: refusing {:?}", voter, choice);
                writeln!(output, "  Invalid choice. Must be a candidate not already ranked.")
                    .context(PromptSnafu {})?;
            }
        }
        writeln!(output).context(PromptSnafu {})?;
        res.push(ParsedBallot {
            id: Some(format!("voter-{}", voter)),
            choices,
        });
    }
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn candidates() -> Vec<String> {
        vec!["Alice".to_string(), "Bob".to_string(), "Charlie".to_string()]
    }

    #[test]
    fn collects_complete_ballots() {
        let mut input = Cursor::new("2\nAlice\nBob\nCharlie\nCharlie\nBob\nAlice\n");
        let mut output: Vec<u8> = Vec::new();
        let ballots = prompt_ballots(&mut input, &mut output, &candidates()).unwrap();
        assert_eq!(ballots.len(), 2);
        assert_eq!(ballots[0].id, Some("voter-1".to_string()));
        assert_eq!(ballots[0].choices, vec!["Alice", "Bob", "Charlie"]);
        assert_eq!(ballots[1].choices, vec!["Charlie", "Bob", "Alice"]);
        let text = String::from_utf8(output).unwrap();
        assert!(text.starts_with("Number of voters: "));
        assert!(text.contains("Candidates: Alice, Bob, Charlie"));
        assert!(text.contains("Voter 2:"));
    }

    #[test]
    fn asks_again_for_unknown_or_repeated_names() {
        let mut input = Cursor::new("1\nDavid\nAlice\nAlice\nBob\nCharlie\n");
        let mut output: Vec<u8> = Vec::new();
        let ballots = prompt_ballots(&mut input, &mut output, &candidates()).unwrap();
        assert_eq!(ballots[0].choices, vec!["Alice", "Bob", "Charlie"]);
        let text = String::from_utf8(output).unwrap();
        assert_eq!(text.matches("Invalid choice").count(), 2);
    }

    #[test]
    fn invalid_voter_count() {
        let mut input = Cursor::new("many\n");
        let mut output: Vec<u8> = Vec::new();
        assert!(matches!(
            prompt_ballots(&mut input, &mut output, &candidates()),
            Err(RcvError::InvalidVoterCount { .. })
        ));
    }

    #[test]
    fn input_ends_early() {
        let mut input = Cursor::new("1\nAlice\n");
        let mut output: Vec<u8> = Vec::new();
        assert!(matches!(
            prompt_ballots(&mut input, &mut output, &candidates()),
            Err(RcvError::EndOfInput {})
        ));
    }

    #[test]
    fn huge_voter_count_stops_at_end_of_input() {
        let mut input = Cursor::new("99999999999999999\nAlice\nBob\nCharlie\n");
        let mut output: Vec<u8> = Vec::new();
        assert!(matches!(
            prompt_ballots(&mut input, &mut output, &candidates()),
            Err(RcvError::EndOfInput { .. })
        ));
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Voter 2:"));
    }
}
