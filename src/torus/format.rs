//! Plain-text grid format.
//!
//! ```text
//! <columns>,<rows>
//! <row 0: `columns` chars of '.' or 'x'>
//! ...
//! ```
//!
//! Column count comes first. Row lines may end in `\n` or `\r\n`; anything
//! after the last row is ignored. Input is read as bytes, so a stray
//! non-ASCII byte in a row is a [`FormatError`], not an I/O error.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use tracing::debug;

use super::cell::{CellState, DEAD_CHAR, LIVE_CHAR};
use super::grid::Grid;
use super::snapshot::Snapshot;
use crate::error::{FormatError, Result};

const LIVE_BYTE: u8 = LIVE_CHAR as u8;
const DEAD_BYTE: u8 = DEAD_CHAR as u8;

fn strip_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

fn parse_header(line: &[u8]) -> std::result::Result<(usize, usize), FormatError> {
    let invalid = || FormatError::InvalidHeader {
        line: String::from_utf8_lossy(line).into_owned(),
    };
    let text = std::str::from_utf8(line).map_err(|_| invalid())?;
    let (columns, rows) = text.split_once(',').ok_or_else(invalid)?;
    let columns: usize = columns.trim().parse().map_err(|_| invalid())?;
    let rows: usize = rows.trim().parse().map_err(|_| invalid())?;
    if columns == 0 || rows == 0 {
        return Err(FormatError::InvalidDimensions { columns, rows });
    }
    Ok((columns, rows))
}

fn parse_row(
    row: usize,
    line: &[u8],
    columns: usize,
    cells: &mut Vec<bool>,
) -> std::result::Result<(), FormatError> {
    for (column, &byte) in line.iter().enumerate() {
        match byte {
            LIVE_BYTE => cells.push(true),
            DEAD_BYTE => cells.push(false),
            found if found.is_ascii() => {
                return Err(FormatError::InvalidCharacter {
                    row,
                    column,
                    found: char::from(found),
                });
            }
            found => return Err(FormatError::InvalidByte { row, column, found }),
        }
    }
    if line.len() != columns {
        return Err(FormatError::RowLength {
            row,
            expected: columns,
            found: line.len(),
        });
    }
    Ok(())
}

/// Parse a grid from raw bytes. Rows are ASCII; any other byte is a
/// format error rather than a decoding failure.
pub fn parse_bytes(input: &[u8]) -> std::result::Result<Snapshot, FormatError> {
    let mut lines = input.split_inclusive(|&b| b == b'\n').map(strip_line_ending);
    let header = lines.next().ok_or(FormatError::MissingHeader)?;
    if header.trim_ascii().is_empty() {
        return Err(FormatError::MissingHeader);
    }
    let (columns, rows) = parse_header(header)?;

    // Grows with the input, so a lying header cannot force a huge allocation.
    let mut cells = Vec::new();
    for row in 0..rows {
        let line = lines.next().ok_or(FormatError::MissingRow { row })?;
        parse_row(row, line, columns, &mut cells)?;
    }
    Ok(Snapshot::from_parts(rows, columns, cells))
}

/// Parse a grid from text.
pub fn parse(text: &str) -> std::result::Result<Snapshot, FormatError> {
    parse_bytes(text.as_bytes())
}

/// Parse a grid from a reader.
pub fn read<R: BufRead>(mut reader: R) -> Result<Snapshot> {
    let mut input = Vec::new();
    reader.read_to_end(&mut input)?;
    Ok(parse_bytes(&input)?)
}

fn render_row(grid: &Grid, row: usize, line: &mut String) {
    for col in 0..grid.columns() {
        line.push(match grid.cell_state(row, col) {
            Some(CellState::Alive) => LIVE_CHAR,
            _ => DEAD_CHAR,
        });
    }
    line.push('\n');
}

/// Write `grid` in the text format, `\n` line endings.
pub fn write<W: Write>(grid: &Grid, mut out: W) -> io::Result<()> {
    writeln!(out, "{},{}", grid.columns(), grid.rows())?;
    let mut line = String::with_capacity(grid.columns() + 1);
    for row in 0..grid.rows() {
        line.clear();
        render_row(grid, row, &mut line);
        out.write_all(line.as_bytes())?;
    }
    out.flush()
}

pub fn to_string(grid: &Grid) -> String {
    let mut text = String::with_capacity((grid.columns() + 1) * grid.rows() + 16);
    text.push_str(&format!("{},{}\n", grid.columns(), grid.rows()));
    for row in 0..grid.rows() {
        render_row(grid, row, &mut text);
    }
    text
}

/// Read and build a grid from a file.
pub fn load(path: impl AsRef<Path>) -> Result<Grid> {
    let path = path.as_ref();
    let seed = read(BufReader::new(File::open(path)?))?;
    debug!(
        path = %path.display(),
        rows = seed.rows(),
        columns = seed.columns(),
        population = seed.population(),
        "loaded grid"
    );
    Grid::from_snapshot(&seed)
}

/// Write a grid to a file, replacing any existing content.
pub fn save(grid: &Grid, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    write(grid, BufWriter::new(File::create(path)?))?;
    debug!(path = %path.display(), "saved grid");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{parse, parse_bytes, to_string};
    use crate::error::FormatError;
    use crate::torus::grid::Grid;

    #[test]
    fn header_lists_columns_before_rows() {
        let snap = parse("4,2\n....\n.x..\n").unwrap();
        assert_eq!(snap.columns(), 4);
        assert_eq!(snap.rows(), 2);
        assert!(snap.is_alive(1, 1));
    }

    #[test]
    fn crlf_is_accepted_and_normalised_on_save() {
        let snap = parse("3,2\r\nx..\r\n..x\r\n").unwrap();
        let grid = Grid::from_snapshot(&snap).unwrap();
        assert_eq!(to_string(&grid), "3,2\nx..\n..x\n");
    }

    #[test]
    fn final_row_without_newline_is_accepted() {
        let snap = parse("2,1\nxx").unwrap();
        assert_eq!(snap.population(), 2);
    }

    #[test]
    fn malformed_input_is_reported() {
        assert_eq!(parse(""), Err(FormatError::MissingHeader));
        assert_eq!(
            parse("3;3\n"),
            Err(FormatError::InvalidHeader {
                line: "3;3".to_string()
            })
        );
        assert!(matches!(
            parse("-3,3\n"),
            Err(FormatError::InvalidHeader { .. })
        ));
        assert_eq!(
            parse("0,3\n"),
            Err(FormatError::InvalidDimensions { columns: 0, rows: 3 })
        );
        assert_eq!(parse("2,2\n..\n"), Err(FormatError::MissingRow { row: 1 }));
        assert_eq!(
            parse("3,1\n..\n"),
            Err(FormatError::RowLength {
                row: 0,
                expected: 3,
                found: 2
            })
        );
        assert_eq!(
            parse("3,1\n.o.\n"),
            Err(FormatError::InvalidCharacter {
                row: 0,
                column: 1,
                found: 'o'
            })
        );
    }

    #[test]
    fn non_ascii_row_bytes_are_format_errors() {
        assert_eq!(
            parse_bytes(b"2,1\nx\xff\n"),
            Err(FormatError::InvalidByte {
                row: 0,
                column: 1,
                found: 0xff
            })
        );
        // Multi-byte UTF-8 is rejected at its first byte, before the length check.
        assert_eq!(
            parse("1,1\n\u{e9}\n"),
            Err(FormatError::InvalidByte {
                row: 0,
                column: 0,
                found: 0xc3
            })
        );
        assert!(matches!(
            parse_bytes(b"\xff,1\nx\n"),
            Err(FormatError::InvalidHeader { .. })
        ));
    }
}
