use clap::Parser;

/// This is an instant-runoff voting program.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// The names of the candidates, in order. The order is used to break ties
    /// for the last place. If empty, the candidates are read from the --config file.
    #[clap(value_parser)]
    pub candidates: Vec<String>,

    /// (file path, optional) The file containing the election description in JSON.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) A reference file containing the outcome of an election in JSON format. If provided, rankvote will
    /// check that the tabulated output matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the election will be written in JSON format to the given
    /// location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path or empty) A CSV file with one ballot per line. If neither this option nor a configuration
    /// file with ballot sources is given, the ballots are asked interactively.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
