// Output formatting — human-facing rendering of reports.

pub mod terminal;
