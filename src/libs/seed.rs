//! Initial board contents used when no snapshot can be restored.

use serde::{Deserialize, Serialize};

/// The five lanes of a fresh board, in display order.
pub const DEFAULT_COLUMNS: [&str; 5] = ["ideas", "selected", "in_progress", "parked", "done"];

/// Demo titles per lane, parallel to [`DEFAULT_COLUMNS`].
const SAMPLE_TITLES: [&[&str]; 5] = [
    &[
        "Ask the AI to make Half-Life 3 as an easter egg in the app",
        "Make the app web-scale",
        "Implement User accounts and Auth/Autz",
    ],
    &["Re-design the API endpoints", "Holistically administrate exceptional synergies"],
    &["Update the README with a screenshot"],
    &["Take over the world", "Review the code"],
    &["Add data persistence", "Write Infrastructure scaffolding for deployment"],
];

/// What a store starts with when there is no prior state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Seed {
    /// No columns, no tasks.
    Empty,
    /// The default columns filled with a handful of demo tasks.
    #[default]
    Sample,
}

impl Seed {
    /// Lanes created before any task is added.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Seed::Empty => &[],
            Seed::Sample => &DEFAULT_COLUMNS,
        }
    }

    /// `(column, title)` pairs to add, in order.
    pub fn tasks(self) -> impl Iterator<Item = (&'static str, &'static str)> {
        let titles: &'static [&'static [&'static str]] = match self {
            Seed::Empty => &[],
            Seed::Sample => &SAMPLE_TITLES,
        };
        self.columns()
            .iter()
            .zip(titles)
            .flat_map(|(column, titles)| titles.iter().map(move |title| (*column, *title)))
    }
}
