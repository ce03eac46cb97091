//! [`Table`] → CSV text rendering (the write side of this crate).

use crate::{CellValue, Table};

/// Render a table back to CSV text.
///
/// Fields containing a comma, a double quote, or a newline are wrapped in
/// quotes with internal quotes doubled; everything else is written as-is.
/// Numbers render via `f64` display (so `1.0` becomes `1`), booleans as
/// `true`/`false`, and missing cells as empty fields.  The output carries no
/// trailing newline, matching the normalized form the parser accepts.
pub fn format_csv(table: &Table) -> String {
    let mut out = String::new();

    let header: Vec<String> = table.columns.iter().map(|c| escape_field(c)).collect();
    out.push_str(&header.join(","));

    for row in &table.rows {
        out.push('\n');
        let fields: Vec<String> = row
            .cells
            .iter()
            .map(|cell| escape_field(&render_cell(cell)))
            .collect();
        out.push_str(&fields.join(","));
    }

    out
}

fn render_cell(cell: &CellValue) -> String {
    match cell {
        CellValue::Number(n) => n.to_string(),
        CellValue::Text(t) => t.clone(),
        CellValue::Boolean(b) => b.to_string(),
        CellValue::Missing => String::new(),
    }
}

fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_csv_str;
    use crate::Row;

    #[test]
    fn plain_table_renders_without_quotes() {
        let table = parse_csv_str("a,b\n1,2\n3,4").unwrap();
        assert_eq!(format_csv(&table), "a,b\n1,2\n3,4");
    }

    #[test]
    fn round_trip_for_unquoted_input() {
        let src = "name,age,active\nalice,30,true\nbob,41,false";
        let table = parse_csv_str(src).unwrap();
        assert_eq!(format_csv(&table), src);
    }

    #[test]
    fn numbers_render_canonically() {
        // `1.50` parses to 1.5 and re-renders in canonical form.
        let table = parse_csv_str("x\n1.50\n2.0").unwrap();
        assert_eq!(format_csv(&table), "x\n1.5\n2");
    }

    #[test]
    fn comma_field_gets_quoted() {
        let table = Table {
            columns: vec!["name".to_string()],
            rows: vec![Row {
                cells: vec![CellValue::Text("Doe, Jr.".to_string())],
            }],
        };
        assert_eq!(format_csv(&table), "name\n\"Doe, Jr.\"");
    }

    #[test]
    fn embedded_quote_gets_doubled() {
        let table = Table {
            columns: vec!["quote".to_string()],
            rows: vec![Row {
                cells: vec![CellValue::Text("She said \"hi\"".to_string())],
            }],
        };
        assert_eq!(format_csv(&table), "quote\n\"She said \"\"hi\"\"\"");
    }

    #[test]
    fn escaped_output_parses_back_to_same_literals() {
        let original = Table {
            columns: vec!["a".to_string(), "b".to_string()],
            rows: vec![Row {
                cells: vec![
                    CellValue::Text("one, two".to_string()),
                    CellValue::Text("say \"what\", again".to_string()),
                ],
            }],
        };
        let reparsed = parse_csv_str(&format_csv(&original)).unwrap();
        assert_eq!(reparsed, original);
    }

    #[test]
    fn missing_cell_renders_empty() {
        let table = Table {
            columns: vec!["a".to_string(), "b".to_string()],
            rows: vec![Row {
                cells: vec![CellValue::Number(1.0), CellValue::Missing],
            }],
        };
        assert_eq!(format_csv(&table), "a,b\n1,");
    }
}
