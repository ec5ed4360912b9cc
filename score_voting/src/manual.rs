/*!

This is the long-form manual for `score_voting` and `scoretab`.

## Voting methods

* `star` Score Then Automatic Runoff. Each slot holds 0 to 5 stars.
* `approval` Each slot holds 0 (not approved) or 1 (approved).
* `plurality` Like approval, but at most one candidate may be marked.

A ballot is one row of scores, one per candidate. An empty slot counts as 0.
A ballot with a value outside of the range of the method, or with too many
marks for plurality, is counted as out of bounds and ignored. A ballot with no
mark at all is an abstention.

### `star`

Every round elects one candidate among the ones not placed yet:

1. The two candidates with the highest total scores are the finalists.
2. The finalist preferred by more voters wins the round. Ballots that score
   both finalists equally do not count in the runoff.

Ties in the score round are broken in this order, until enough finalists are
found:
 - head to head: the candidates with the most losses against the other tied
   candidates are removed
 - five stars: the candidates with the most five star scores advance
 - tie-break order: the lowest value advances

A tie in the runoff is broken by total score, then by five star count, then by
the tie-break order.

### `approval` and `plurality`

Candidates are placed by decreasing total. Candidates tied on the total are
separated by the tie-break order, unless `breakTiesByOrder` is set to `false`.
In that case the group is placed together.

## Multiple winners

Rounds are run until every candidate is placed. A candidate elected in a round
goes to `elected` while seats are left. A group that does not fit in the
remaining seats goes to `tied`. Everyone else goes to `other`, in the order of
the rounds.

## Tie-break order

The tie-break order is a number per candidate. It is given by `tieBreakOrder`
on every candidate in the configuration. Otherwise, it is drawn from
`randomSeed`: the candidates are sorted by the SHA-256 digest of the seed
followed by their name. Without a seed, the order of the candidates in the
configuration is used.

The tabulation itself never draws random numbers. Running it twice on the same
input gives the same output.

## Input formats

The following formats are supported:
* `csv` Comma Separated Values
* `json` JSON document
* `xlsx` Excel workbook

### `csv`

The first row holds the names of the candidates. Each following row is a
ballot.

```text
id,count,Alice,Bob,Carol
b1,2,5,3,
b2,1,0,4,5
```

The `id` and `count` columns are optional. The `count` column repeats a ballot.
An empty cell is an empty slot. Any other cell must be an integer.

### `json`

```text
{"candidates": ["Alice", "Bob"], "ballots": [[5, 0], [null, 3]]}
```

### `xlsx`

Same layout as `csv`, on the first worksheet or on the one given with
`excelWorksheetName`.

## Configuration

The program accepts a configuration file in JSON:

```text
{
  "outputSettings": {"contestName": "Board election"},
  "cvrFileSources": [{"provider": "csv", "filePath": "ballots.csv", "firstVoteColumnIndex": 3, "countColumnIndex": 2}],
  "candidates": [{"name": "Alice"}, {"name": "Bob"}, {"name": "Carol", "excluded": true}],
  "rules": {"votingMethod": "star", "numberOfWinners": 1, "randomSeed": "1234"}
}
```

FileSource:
 - `firstVoteColumnIndex` (string or number, optional): the first column with scores. Defaults
   to the first column.
 - `firstVoteRowIndex` (string or number, optional): the first row with ballots. Defaults to 2,
   right after the header.
 - `idColumnIndex`, `countColumnIndex` (string or number, optional)
 - `excelWorksheetName` (string, optional): for Excel-based inputs, the name of
 the worksheet in Excel.

Column indexes start at 1. Letters (`A`, `B`, ...) are also accepted.

The column of an excluded candidate is dropped before tabulation.

 */
