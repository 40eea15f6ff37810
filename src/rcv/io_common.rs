use std::path::Path;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

/// Ids of the ballots that do not carry one: `<file name>-<line number>`.
pub fn make_default_id(path: &str) -> impl Fn(usize) -> String {
    let simplified_file_name = simplify_file_name(path);
    move |lineno| format!("{}-{:08}", simplified_file_name, lineno)
}

/// Drops the empty cells at the end of a row, which spreadsheets often leave behind.
pub fn trim_trailing_blanks(choices: &mut Vec<String>) {
    while choices.last().map(|s| s.is_empty()).unwrap_or(false) {
        choices.pop();
    }
}
