use energymix::{
    chart::{render_bar_chart, render_line_chart, Footer},
    locate::{
        Acceptance, Locator, NumericAxisPivot, Outcome, Strategy, Workbook, GENERATION_SERIES,
    },
    series::{Snapshot, TimeSeries, CAPACITY_ORDER, CAPACITY_YEAR, GENERATION_ORDER},
};
use rust_xlsxwriter::{Workbook as XlsxWorkbook, Worksheet, XlsxError};
use std::{fs, path::Path};
use tempfile::tempdir;

const FUELS: [&str; 9] = [
    "Coal",
    "Natural gas",
    "Nuclear",
    "Hydroelectric",
    "Petroleum",
    "Solar",
    "Wind",
    "Biomass and waste",
    "Geothermal",
];

/// Figure 6 as EIA ships it: a title, blank rows, years across row 5 from column C.
fn write_generation_layout(ws: &mut Worksheet) -> Result<(), XlsxError> {
    ws.set_name("Generation")?;
    ws.write_string(0, 0, "Figure 6. China's electricity generation by fuel, 2014-2023")?;
    for (i, year) in (2014..=2023).enumerate() {
        ws.write_number(5, 2 + i as u16, year as f64)?;
    }
    for (n, fuel) in FUELS.iter().enumerate() {
        let row = 6 + n as u32;
        ws.write_string(row, 0, *fuel)?;
        ws.write_string(row, 1, "terawatthours")?;
        for i in 0..10u16 {
            ws.write_number(row, 2 + i, 100.0 * (n + 1) as f64 + i as f64)?;
        }
    }
    ws.write_string(17, 0, "Source: U.S. Energy Information Administration")?;
    Ok(())
}

fn save(path: &Path, build: impl FnOnce(&mut XlsxWorkbook) -> Result<(), XlsxError>) {
    let mut wb = XlsxWorkbook::new();
    build(&mut wb).unwrap();
    wb.save(path).unwrap();
}

#[test]
fn generation_sheet_falls_through_to_pivot() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("figure6_data.xlsx");
    save(&path, |wb| {
        wb.add_worksheet().set_name("Notes")?.write_string(0, 0, "See Generation tab")?;
        write_generation_layout(wb.add_worksheet())
    });

    let workbook = Workbook::open(&path).unwrap();
    let located = Locator::generation().locate(&workbook).unwrap();

    assert_eq!(located.strategy, "numeric-axis-pivot");
    assert_eq!(located.sheet, "Generation");
    assert_eq!(located.header_row, 5);
    assert_eq!(located.table.height(), 10);
    let m = &located.mapping;
    assert_eq!(m.year.as_ref().unwrap().header, "year");
    for key in ["coal", "natural_gas", "hydro", "non_hydro_renewables", "petroleum", "nuclear"] {
        assert!(m.get(key).is_some(), "{key} not resolved");
    }

    let series = TimeSeries::from_located(&located, &GENERATION_ORDER).unwrap();
    let renewables = series
        .lines
        .iter()
        .find(|l| l.key == "non_hydro_renewables")
        .unwrap();
    // solar 600 + wind 700 + biomass 800 + geothermal 900 in 2014
    assert_eq!(renewables.points[0], (2014.0, 3000.0));
    assert_eq!(renewables.points[9], (2023.0, 3036.0));

    let out = dir.path().join("images").join("gen.svg");
    render_line_chart(&out, "Generation", "Generation (TWh)", &series, &Footer::new(["src"]))
        .unwrap();
    assert!(fs::read_to_string(out).unwrap().contains("Non-hydro Renewables"));
}

#[test]
fn tidy_table_below_a_title_is_found_by_header_scan() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tidy.xlsx");
    save(&path, |wb| {
        let ws = wb.add_worksheet().set_name("Data")?;
        ws.write_string(0, 0, "China electricity generation")?;
        ws.write_string(1, 0, "terawatthours")?;
        for (c, h) in ["Year", "Coal", "Natural Gas", "Nuclear", "Hydro"].iter().enumerate() {
            ws.write_string(3, c as u16, *h)?;
        }
        for (r, year) in (2019..=2023).enumerate() {
            let row = 4 + r as u32;
            ws.write_number(row, 0, year as f64)?;
            for c in 1..5u16 {
                ws.write_number(row, c, 1000.0 * c as f64 + r as f64)?;
            }
        }
        Ok(())
    });

    let located = Locator::generation()
        .locate(&Workbook::open(&path).unwrap())
        .unwrap();

    assert_eq!(located.strategy, "header-scan");
    // offset 2 among non-blank rows, sheet row 3
    assert_eq!(located.header_row, 3);
    assert_eq!(located.table.height(), 5);
    assert_eq!(located.mapping.get("natural_gas").unwrap().header, "Natural Gas");
}

#[test]
fn capacity_header_deep_in_the_sheet() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("figure7_data.xlsx");
    save(&path, |wb| {
        let ws = wb.add_worksheet().set_name("Capacity")?;
        for r in 0..8u32 {
            ws.write_string(r, 0, format!("note {r}"))?;
        }
        let headers = ["Year", "Coal", "Natural gas", "Nuclear", "Hydropower", "Wind", "Solar"];
        for (c, h) in headers.iter().enumerate() {
            ws.write_string(8, c as u16, *h)?;
        }
        for (r, year) in [2023.0, 2024.0].iter().enumerate() {
            let row = 9 + r as u32;
            ws.write_number(row, 0, *year)?;
            for c in 1..7u16 {
                ws.write_number(row, c, 100.0 * c as f64 + r as f64)?;
            }
        }
        Ok(())
    });

    let located = Locator::capacity()
        .locate(&Workbook::open(&path).unwrap())
        .unwrap();
    assert_eq!(located.strategy, "headerless-scan");
    assert_eq!(located.header_row, 8);

    let snapshot = Snapshot::from_located(&located, &CAPACITY_ORDER, CAPACITY_YEAR).unwrap();
    assert_eq!(snapshot.year, Some(2024.0));
    assert_eq!(snapshot.values.first(), Some(&("coal", 101.0)));
    let keys: Vec<_> = snapshot.values.iter().map(|(k, _)| *k).collect();
    assert_eq!(keys, vec!["coal", "natural_gas", "nuclear", "hydro", "wind", "solar"]);

    let out = dir.path().join("cap.svg");
    render_bar_chart(&out, "Capacity", "Capacity (GW)", &snapshot, &Footer::new(["src"]))
        .unwrap();
    assert!(out.exists());
}

#[test]
fn unrecognizable_workbook_reports_every_strategy() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("junk.xlsx");
    save(&path, |wb| {
        let ws = wb.add_worksheet().set_name("Generation")?;
        ws.write_string(0, 0, "Year")?;
        ws.write_string(0, 1, "Coal")?;
        ws.write_string(0, 2, "Nuclear")?;
        ws.write_number(1, 0, 2023.0)?;
        ws.write_number(1, 1, 5000.0)?;
        ws.write_number(1, 2, 430.0)?;
        Ok(())
    });
    let workbook = Workbook::open(&path).unwrap();

    let err = Locator::generation().locate(&workbook).unwrap_err();

    let names: Vec<_> = err.attempts.iter().map(|a| a.strategy).collect();
    assert_eq!(names, vec!["header-scan", "headerless-scan", "numeric-axis-pivot"]);
    assert!(err.attempts[0].candidates >= 1);
    assert!(matches!(
        NumericAxisPivot::new("Generation").search(
            &workbook,
            &GENERATION_SERIES,
            Acceptance::TIMESERIES
        ),
        Outcome::Exhausted { .. }
    ));
}

#[test]
fn missing_file_is_a_workbook_error() {
    let dir = tempdir().unwrap();
    let err = Workbook::open(dir.path().join("absent.xlsx")).unwrap_err();
    assert!(err.to_string().contains("absent.xlsx"));
}
