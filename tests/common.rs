#![allow(dead_code)]

use calamine::{Data, Range};

pub fn text(value: &str) -> Data {
    Data::String(value.to_string())
}

/// Build an in-memory sheet from rows of cells; `Data::Empty` cells stay unset
pub fn sheet(rows: Vec<Vec<Data>>) -> Range<Data> {
    let height = rows.len().max(1) as u32;
    let width = rows.iter().map(Vec::len).max().unwrap_or(1).max(1) as u32;
    let mut range = Range::new((0, 0), (height - 1, width - 1));

    for (r, row) in rows.into_iter().enumerate() {
        for (c, cell) in row.into_iter().enumerate() {
            if cell != Data::Empty {
                range.set_value((r as u32, c as u32), cell);
            }
        }
    }
    range
}

/// A liquidity sheet as BCV lays it out: title and header rows, then one
/// row per week with M1 in column 4, M2 in column 6 and the reported
/// variation in column 7. Values are in thousands of bolívares.
pub fn liquidity_sheet(weeks: &[(&str, f64, f64, Data)]) -> Range<Data> {
    let mut rows = vec![
        vec![text("LIQUIDEZ MONETARIA SEMANAL")],
        vec![text("(Miles de Bolívares)")],
        vec![
            text("Semana"),
            text("Monedas y Billetes"),
            text("Depósitos a la Vista"),
            text("Depósitos de Ahorro"),
            text("Dinero (M1)"),
            text("Cuasidinero"),
            text("Liquidez Monetaria (M2)"),
            text("Variación %"),
        ],
    ];

    for (date, m1, m2, variation) in weeks {
        rows.push(vec![
            text(date),
            Data::Float(m1 * 0.1),
            Data::Float(m1 * 0.5),
            Data::Float(m1 * 0.4),
            Data::Float(*m1),
            Data::Float(m2 - m1),
            Data::Float(*m2),
            variation.clone(),
        ]);
    }
    sheet(rows)
}

/// A base monetaria sheet: dates across row 2 (oldest on the left),
/// categories down column 0 and the totals in the `total_label` row
pub fn base_monetaria_sheet(dates: &[&str], totals: &[Data], total_label: &str) -> Range<Data> {
    let mut header = vec![text("Concepto")];
    header.extend(dates.iter().map(|d| text(d)));

    let mut total = vec![text(total_label)];
    total.extend(totals.iter().cloned());

    let mut reserves = vec![text("Reservas Internacionales")];
    reserves.extend(dates.iter().map(|_| Data::Float(1.0)));

    sheet(vec![
        vec![text("BASE MONETARIA")],
        vec![text("(Miles de Bolívares)")],
        header,
        reserves,
        vec![text("FUENTES")],
        total,
    ])
}
