//! Print the counted tree for a path using only the view model.

use codecountlib::{scan, Config, ScanOptions, TreeModel};
use std::env;

fn main() {
    let path = env::args().nth(1).unwrap_or_else(|| ".".to_string());

    let config = Config::default();
    let options = ScanOptions::from_config(&config, &[] as &[&str]).expect("Failed to load types");
    let tree = scan(&path, &options).expect("Failed to scan path");

    let model = TreeModel::new(&tree);
    let mut pending = vec![(model.index(0, 0, None), 0)];
    while let Some((Some(index), depth)) = pending.pop() {
        let cells: Vec<String> = (0..model.column_count())
            .filter_map(|column| model.data(index.sibling_at_column(column)))
            .map(|cell| cell.to_string())
            .collect();
        println!("{}{}", "  ".repeat(depth), cells.join("  "));

        for row in (0..model.row_count(Some(index))).rev() {
            pending.push((model.index(row, 0, Some(index)), depth + 1));
        }
    }

    let summary = tree.summary();
    println!();
    println!(
        "{} files, {} directories, {} errors",
        summary.file_count, summary.dir_count, summary.error_count
    );
}
