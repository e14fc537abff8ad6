use super::store::{BoardView, Placement};
use super::task::Task;
use prettytable::{row, Table};

pub struct View {}

impl View {
    /// Prints every column and its tasks as one table.
    pub fn board(board: &BoardView) {
        Self::board_table(board).printstd();
    }

    pub fn board_table(board: &BoardView) -> Table {
        let mut table = Table::new();

        table.add_row(row!["COLUMN", "#", "ID", "TITLE", "DESCRIPTION"]);
        for column in &board.columns {
            if column.tasks.is_empty() {
                table.add_row(row![column.id, "", "", "", ""]);
                continue;
            }
            for (position, task) in column.tasks.iter().enumerate() {
                let column_id = if position == 0 { column.id.as_str() } else { "" };
                table.add_row(row![column_id, position, task.id, task.title, task.description]);
            }
        }

        table
    }

    /// Prints a single task with its place on the board.
    pub fn task(task: &Task, placement: &Placement) {
        let mut table = Table::new();

        table.add_row(row!["ID", task.id]);
        table.add_row(row!["COLUMN", placement.column]);
        table.add_row(row!["#", placement.index]);
        table.add_row(row!["TITLE", task.title]);
        table.add_row(row!["DESCRIPTION", task.description]);
        table.printstd();
    }
}
