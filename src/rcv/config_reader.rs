use crate::rcv::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "contestName")]
    pub contest_name: String,
    #[serde(rename = "contestDate")]
    pub contest_date: Option<String>,
    #[serde(rename = "contestJurisdiction")]
    pub contest_jurisdiction: Option<String>,
    #[serde(rename = "contestOffice")]
    pub contest_office: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub contest: String,
    pub date: Option<String>,
    pub jurisdiction: Option<String>,
    pub office: Option<String>,
    pub threshold: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FileSource {
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "firstVoteColumnIndex")]
    _first_vote_column_index: Option<JSValue>,
    #[serde(rename = "firstVoteRowIndex")]
    _first_vote_row_index: Option<JSValue>,
    #[serde(rename = "idColumnIndex")]
    pub id_column_index: Option<JSValue>,
}

impl FileSource {
    /// A CSV file with choices only: no header, no id column.
    pub fn csv(path: &str) -> FileSource {
        FileSource {
            provider: "csv".to_string(),
            file_path: path.to_string(),
            _first_vote_column_index: None,
            _first_vote_row_index: None,
            id_column_index: None,
        }
    }

    /// 0-based index of the first column holding a choice.
    pub fn first_vote_column_index(&self) -> RcvResult<usize> {
        let x = read_js_index(&self._first_vote_column_index)?.unwrap_or(1);
        Ok(x - 1)
    }

    /// 1-based index of the first row holding a ballot.
    pub fn first_vote_row_index(&self) -> RcvResult<usize> {
        Ok(read_js_index(&self._first_vote_row_index)?.unwrap_or(1))
    }

    /// 0-based index of the column holding the ballot id, if any.
    pub fn id_column_index_int(&self) -> RcvResult<Option<usize>> {
        Ok(read_js_index(&self.id_column_index)?.map(|x| x - 1))
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RcvCandidate {
    pub name: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RcvConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    #[serde(rename = "cvrFileSources", default)]
    pub cvr_file_sources: Vec<FileSource>,
    #[serde(default)]
    pub candidates: Vec<RcvCandidate>,
}

pub fn read_config(path: &str) -> RcvResult<RcvConfig> {
    let config_str = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: RcvConfig = serde_json::from_str(&config_str).context(ParsingJsonSnafu {})?;
    info!("config: {:?}", config);
    Ok(config)
}

pub fn read_summary(path: &str) -> RcvResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    debug!("read summary: {:?}", js["results"]);
    Ok(js)
}

// Indices are 1-based numbers, or Excel-style column names (A, B, ..., AA).
fn read_js_index(x: &Option<JSValue>) -> RcvResult<Option<usize>> {
    let idx = match x {
        None | Some(JSValue::Null) => return Ok(None),
        Some(JSValue::Number(n)) => n
            .as_u64()
            .map(|x| x as usize)
            .context(ParsingJsonNumberSnafu {})?,
        Some(JSValue::String(s)) if !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic()) => s
            .to_ascii_lowercase()
            .chars()
            .try_fold(0usize, |acc, c| {
                acc.checked_mul(26)?
                    .checked_add(c as usize - 'a' as usize + 1)
            })
            .context(ParsingJsonNumberSnafu {})?,
        Some(JSValue::String(s)) => s.parse::<usize>().ok().context(ParsingJsonNumberSnafu {})?,
        _ => return ParsingJsonNumberSnafu {}.fail(),
    };
    ensure!(idx >= 1, InvalidIndexSnafu { value: idx });
    Ok(Some(idx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn source(js: JSValue) -> FileSource {
        serde_json::from_value(js).unwrap()
    }

    #[test]
    fn indices_default_to_the_first_cell() {
        let cfs = FileSource::csv("ballots.csv");
        assert_eq!(cfs.first_vote_column_index().unwrap(), 0);
        assert_eq!(cfs.first_vote_row_index().unwrap(), 1);
        assert_eq!(cfs.id_column_index_int().unwrap(), None);
    }

    #[test]
    fn indices_as_numbers_strings_and_columns() {
        let cfs = source(json!({
            "provider": "csv",
            "filePath": "ballots.csv",
            "firstVoteColumnIndex": "C",
            "firstVoteRowIndex": "2",
            "idColumnIndex": 1
        }));
        assert_eq!(cfs.first_vote_column_index().unwrap(), 2);
        assert_eq!(cfs.first_vote_row_index().unwrap(), 2);
        assert_eq!(cfs.id_column_index_int().unwrap(), Some(0));

        let wide = source(json!({
            "provider": "csv",
            "filePath": "ballots.csv",
            "firstVoteColumnIndex": "AB"
        }));
        assert_eq!(wide.first_vote_column_index().unwrap(), 27);
    }

    #[test]
    fn zero_index_is_refused() {
        let cfs = source(json!({
            "provider": "csv",
            "filePath": "ballots.csv",
            "firstVoteColumnIndex": 0
        }));
        assert!(matches!(
            cfs.first_vote_column_index(),
            Err(RcvError::InvalidIndex { value: 0 })
        ));
    }

    #[test]
    fn oversized_column_name_is_refused() {
        let cfs = source(json!({
            "provider": "csv",
            "filePath": "ballots.csv",
            "firstVoteColumnIndex": "ZZZZZZZZZZZZZZZZZZ"
        }));
        assert!(matches!(
            cfs.first_vote_column_index(),
            Err(RcvError::ParsingJsonNumber { .. })
        ));
    }

    #[test]
    fn minimal_config() {
        let config: RcvConfig = serde_json::from_value(json!({
            "outputSettings": {"contestName": "Test"},
            "candidates": [{"name": "Alice"}, {"name": "Bob"}]
        }))
        .unwrap();
        assert!(config.cvr_file_sources.is_empty());
        assert_eq!(config.candidates.len(), 2);
        assert_eq!(config.output_settings.contest_date, None);
    }
}
