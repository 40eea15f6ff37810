// Primitives for reading CSV files.

use std::fs::File;

use crate::rcv::{
    io_common::{make_default_id, trim_trailing_blanks},
    *,
};

pub fn read_csv_ranking(path: &str, cfs: &FileSource) -> RcvResult<Vec<ParsedBallot>> {
    let default_id = make_default_id(path);

    let id_idx_o = cfs.id_column_index_int()?;
    let choices_start_col = cfs.first_vote_column_index()?;

    let mut res: Vec<ParsedBallot> = Vec::new();
    let (records, first_row) = get_records(path, cfs)?;

    for (idx, line_r) in records.enumerate() {
        let lineno = idx + first_row;
        let line = line_r.context(CsvLineParseSnafu {})?;
        let id = if let Some(id_idx) = id_idx_o {
            line.get(id_idx)
                .context(CsvLineTooShortSnafu { lineno })?
                .trim()
                .to_string()
        } else {
            default_id(lineno)
        };

        let mut choices: Vec<String> = line
            .iter()
            .skip(choices_start_col)
            .map(|s| s.trim().to_string())
            .collect();
        trim_trailing_blanks(&mut choices);
        debug!(
            "read_csv_ranking: lineno: {:?} row: {:?}",
            lineno, &choices
        );

        res.push(ParsedBallot {
            id: Some(id),
            choices,
        });
    }
    Ok(res)
}

fn get_records(path: &str, cfs: &FileSource) -> RcvResult<(csv::StringRecordsIntoIter<File>, usize)> {
    let first_row = cfs.first_vote_row_index()?;
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    let mut records = rdr.into_records();
    // The index starts at 1 to respect most conventions in the excel world
    for _ in 1..first_row {
        _ = records.next();
    }
    Ok((records, first_row))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn testdata(name: &str) -> String {
        format!("{}/testdata/{}", env!("CARGO_MANIFEST_DIR"), name)
    }

    #[test]
    fn plain_csv() {
        let path = testdata("tie/tie_ballots.csv");
        let ballots = read_csv_ranking(&path, &FileSource::csv(&path)).unwrap();
        assert_eq!(
            ballots,
            vec![
                ParsedBallot {
                    id: Some("tie_ballots.csv-00000001".to_string()),
                    choices: vec!["Alice".to_string(), "Bob".to_string()],
                },
                ParsedBallot {
                    id: Some("tie_ballots.csv-00000002".to_string()),
                    choices: vec!["Bob".to_string(), "Alice".to_string()],
                },
            ]
        );
    }

    #[test]
    fn csv_with_header_and_ids() {
        let config = read_config(&testdata("club/club_config.json")).unwrap();
        let cfs = &config.cvr_file_sources[0];
        let ballots = read_csv_ranking(&testdata("club/club_ballots.csv"), cfs).unwrap();
        assert_eq!(ballots.len(), 7);
        assert_eq!(ballots[0].id, Some("v1".to_string()));
        assert_eq!(ballots[0].choices, vec!["Alice", "Bob", "Charlie"]);
        // Trailing empty cells are dropped, inner ones are kept.
        assert_eq!(ballots[5].choices, vec!["Alice", "Alice", "Bob"]);
        assert_eq!(ballots[6].choices, vec!["Bob", "", "Alice"]);
    }

    #[test]
    fn missing_file() {
        let path = testdata("missing.csv");
        assert!(matches!(
            read_csv_ranking(&path, &FileSource::csv(&path)),
            Err(RcvError::CsvOpen { .. })
        ));
    }
}
