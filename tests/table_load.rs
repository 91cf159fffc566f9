use nav_sync::table::{load_rows, load_rows_with, ParseStrategy, Row};
use nav_sync::SyncError;
use rust_xlsxwriter::Workbook;
use std::fs::write;
use std::path::Path;
use tempfile::tempdir;

fn write_xlsx(path: &Path, rows: &[[&str; 5]]) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let headers = ["name", "link", "target", "description", "parent_name"];
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header).unwrap();
    }
    for (r, cells) in rows.iter().enumerate() {
        for (col, value) in cells.iter().enumerate() {
            // Leave blanks as genuinely empty cells.
            if !value.is_empty() {
                sheet.write_string(r as u32 + 1, col as u16, *value).unwrap();
            }
        }
    }
    workbook.save(path).unwrap();
}

#[test]
fn test_loads_rows_from_workbook_with_empty_cells_as_blank() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nav.xlsx");
    write_xlsx(
        &path,
        &[
            ["Home", "/home", "", "", ""],
            ["Team", "/about/team", "_blank", "Who we are", "About"],
        ],
    );

    let rows = load_rows(&path).expect("Workbook should load");
    assert_eq!(
        rows,
        vec![
            Row {
                name: "Home".into(),
                link: "/home".into(),
                ..Row::default()
            },
            Row {
                name: "Team".into(),
                link: "/about/team".into(),
                target: "_blank".into(),
                description: "Who we are".into(),
                parent_name: "About".into(),
            },
        ]
    );
}

#[test]
fn test_numeric_cells_are_rendered_as_text() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nav.xlsx");
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, header) in ["name", "link", "target", "description", "parent_name"]
        .iter()
        .enumerate()
    {
        sheet.write_string(0, col as u16, *header).unwrap();
    }
    sheet.write_number(1, 0, 2024.0).unwrap();
    workbook.save(&path).unwrap();

    let rows = load_rows(&path).unwrap();
    assert_eq!(rows[0].name, "2024");
    assert_eq!(rows[0].parent_name, "");
}

#[test]
fn test_falls_back_to_csv_with_same_base_name() {
    let dir = tempdir().unwrap();
    let xlsx = dir.path().join("sample_top_nav.xlsx");
    write(
        dir.path().join("sample_top_nav.csv"),
        "name,link,target,description,parent_name\nHome,/home,,,\nTeam,/about/team,,,About\n",
    )
    .unwrap();

    let rows = load_rows(&xlsx).expect("CSV fallback should load");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].parent_name, "About");
    assert_eq!(rows[1].target, "");
}

#[test]
fn test_unreadable_workbook_also_falls_back() {
    let dir = tempdir().unwrap();
    let xlsx = dir.path().join("nav.xlsx");
    write(&xlsx, b"this is not a zip archive").unwrap();
    write(
        dir.path().join("nav.csv"),
        "parent_name,name,link,description,target\n,Home,/home,,\n",
    )
    .unwrap();

    let rows = load_rows(&xlsx).unwrap();
    assert_eq!(rows[0].name, "Home");
    assert_eq!(rows[0].link, "/home");
}

#[test]
fn test_csv_short_lines_and_blank_lines() {
    let dir = tempdir().unwrap();
    let csv = dir.path().join("nav.csv");
    write(
        &csv,
        "name,link,target,description,parent_name\nHome,/home\n,,,,\nAbout,/about,,,\n",
    )
    .unwrap();

    let rows = load_rows(&csv).unwrap();
    let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Home", "About"]);
    assert_eq!(rows[0].parent_name, "");
}

#[test]
fn test_missing_column_is_fatal() {
    let dir = tempdir().unwrap();
    let csv = dir.path().join("nav.csv");
    write(&csv, "name,link,target,description\nHome,/home,,\n").unwrap();

    let err = load_rows(&csv).unwrap_err();
    match err {
        SyncError::DataLoad { reason, .. } => assert!(reason.contains("parent_name")),
        other => panic!("expected DataLoad, got {other:?}"),
    }
}

#[test]
fn test_errors_when_no_strategy_succeeds() {
    let dir = tempdir().unwrap();
    let xlsx = dir.path().join("absent.xlsx");

    let err = load_rows(&xlsx).unwrap_err();
    let msg = err.to_string();
    assert!(matches!(err, SyncError::DataLoad { .. }));
    assert!(msg.contains("Workbook"), "got: {msg}");
    assert!(msg.contains("absent.csv"), "got: {msg}");
}

#[test]
fn test_strategy_order_is_respected() {
    let dir = tempdir().unwrap();
    let xlsx = dir.path().join("nav.xlsx");
    write_xlsx(&xlsx, &[["FromWorkbook", "", "", "", ""]]);
    write(
        dir.path().join("nav.csv"),
        "name,link,target,description,parent_name\nFromCsv,,,,\n",
    )
    .unwrap();

    let rows = load_rows_with(&xlsx, &[ParseStrategy::DelimitedText, ParseStrategy::Workbook]).unwrap();
    assert_eq!(rows[0].name, "FromCsv");

    let rows = load_rows(&xlsx).unwrap();
    assert_eq!(rows[0].name, "FromWorkbook");
}
