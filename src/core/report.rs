use crate::domain::model::MergedRow;
use crate::utils::error::Result;
use serde::Serialize;

const HEADERS: [&str; 6] = [
    "year",
    "cpi",
    "cpi_factor",
    "total_german",
    "total_foreign",
    "total_enrolled",
];

/// 以指定分隔符號輸出，空值為空字串
pub fn to_delimited<T: Serialize>(rows: &[T], delimiter: u8) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    value
        .map(|v| format!("{:.*}", precision, v))
        .unwrap_or_else(|| "NaN".to_string())
}

/// Renders the merged table as right-aligned text columns.
pub fn format_table(rows: &[MergedRow]) -> String {
    let cells: Vec<[String; 6]> = rows
        .iter()
        .map(|r| {
            [
                r.year.to_string(),
                fmt_opt(r.cpi, 1),
                fmt_opt(r.cpi_factor, 6),
                format!("{:.0}", r.total_german),
                format!("{:.0}", r.total_foreign),
                format!("{:.0}", r.total_enrolled),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.len());
        }
    }

    let mut lines = Vec::with_capacity(cells.len() + 1);
    lines.push(
        HEADERS
            .iter()
            .zip(widths.iter())
            .map(|(h, w)| format!("{:>w$}", h, w = *w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in &cells {
        lines.push(
            row.iter()
                .zip(widths.iter())
                .map(|(c, w)| format!("{:>w$}", c, w = *w))
                .collect::<Vec<_>>()
                .join("  "),
        );
    }
    lines.join("\n")
}
