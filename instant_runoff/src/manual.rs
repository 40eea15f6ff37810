/*!

This is the long-form manual for `instant_runoff` and the `rankvote` program.

## Counting rules

- Every ballot must rank all the candidates, each exactly once. Ballots that
  are too short or too long, that mention an unknown name or that repeat a
  candidate are rejected and do not take part in the count.
- At each round, a ballot counts for its highest ranked candidate that has not
  been eliminated.
- A candidate wins as soon as it holds strictly more than half of all the
  ballots. Exactly half is not enough.
- Otherwise the candidate with the fewest votes is eliminated. When several
  candidates share the last place, the one listed first in the roster is
  eliminated.
- When all the remaining candidates share the last place (for example two
  candidates at 50% each), the election ends in a complete tie and no winner
  is declared.

## Collecting ballots

Without any input file, `rankvote` asks for the ballots interactively:

```bash
rankvote Alice Bob Charlie
```

```text
Number of voters: 2

Candidates: Alice, Bob, Charlie
Rank candidates from most preferred (1) to least preferred.

Voter 1:
  Rank 1: Alice
  Rank 2: Bob
  Rank 3: Charlie
```

An answer that is not a candidate, or a candidate that was already ranked, is
asked again.

### csv

Ballots can also be read from a CSV file. Each column (in order) is considered
to be a choice, and each line is one ballot.

```text
id,choice 1,choice 2,choice 3
v1,Alice,Bob,Charlie
v2,Bob,Charlie,Alice
```

```bash
rankvote Alice Bob Charlie --input ballots.csv
```

From the command line, the file is expected to have no header and no id
column. Use a configuration file to describe other layouts.

## Configuration

The election can be described in a JSON file, following the style of the
[RCVTab program](https://github.com/BrightSpots/rcv/blob/develop/config_file_documentation.txt):

```json
{
  "outputSettings": {
    "contestName": "Club president",
    "contestDate": "2024-03-01"
  },
  "cvrFileSources": [
    {
      "provider": "csv",
      "filePath": "ballots.csv",
      "firstVoteColumnIndex": 2,
      "firstVoteRowIndex": 2,
      "idColumnIndex": 1
    }
  ],
  "candidates": [{ "name": "Alice" }, { "name": "Bob" }, { "name": "Charlie" }]
}
```

Indices are 1-based. `firstVoteRowIndex` is the first line holding a ballot,
so `2` skips a header line. File paths are relative to the configuration
file. Only the `csv` provider is supported.

## Output

The summary of the election is written in JSON with `--out` (a file path or
`stdout`). It is compatible with the [RCVis website](https://rcvis.com/).
With `--reference`, the summary is compared with a reference summary and the
differences are printed.

 */
