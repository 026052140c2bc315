//! Spreadsheet fixtures shared by the unit tests.

use std::path::Path;

use rust_xlsxwriter::Workbook;

pub enum Cell {
    N(f64),
    S(&'static str),
    B(bool),
    Blank,
}

/// Write a single-sheet workbook: `header` in row 0, `rows` below it.
pub fn write_sheet(path: &Path, header: &[&str], rows: &[Vec<Cell>]) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col, name) in header.iter().enumerate() {
        sheet.write_string(0, col as u16, *name).unwrap();
    }
    for (r, row) in rows.iter().enumerate() {
        let r = r as u32 + 1;
        for (col, cell) in row.iter().enumerate() {
            let col = col as u16;
            match cell {
                Cell::N(v) => {
                    sheet.write_number(r, col, *v).unwrap();
                }
                Cell::S(s) => {
                    sheet.write_string(r, col, *s).unwrap();
                }
                Cell::B(b) => {
                    sheet.write_boolean(r, col, *b).unwrap();
                }
                Cell::Blank => {}
            }
        }
    }

    workbook.save(path).unwrap();
}
