use sketchbench_analysis::chart::{render_records, ChartConfig, ChartError};
use sketchbench_runner::database::StoreError;
use std::fs;

const HEADER: &str = "kmer_size,scaled,sourmash_time,frackmc_time\n";

fn small() -> ChartConfig {
    ChartConfig {
        dpi: 50,
        ..ChartConfig::default()
    }
}

#[test]
fn header_only_records_render_empty_chart() {
    let dir = tempfile::tempdir().unwrap();
    let records = dir.path().join("records");
    let output = dir.path().join("res.png");
    fs::write(&records, HEADER).unwrap();

    assert_eq!(render_records(&records, &output, &small()).unwrap(), 0);
    assert_eq!(png_size(&fs::read(&output).unwrap()), (150, 150));
}

#[test]
fn malformed_records_fail_before_drawing() {
    let dir = tempfile::tempdir().unwrap();
    let records = dir.path().join("records");
    let output = dir.path().join("res.png");
    fs::write(&records, format!("{HEADER}21,1,1.0\n")).unwrap();

    assert!(matches!(
        render_records(&records, &output, &small()),
        Err(ChartError::Store(StoreError::ColumnCount { line: 2, found: 3 }))
    ));
    assert!(!output.exists());
}

/// (width, height) from the IHDR chunk of a PNG file
fn png_size(bytes: &[u8]) -> (u32, u32) {
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    assert_eq!(&bytes[12..16], b"IHDR");

    let field = |offset: usize| u32::from_be_bytes(bytes[offset..offset + 4].try_into().unwrap());
    (field(16), field(20))
}

#[test]
fn one_panel_per_scaled_value() {
    let dir = tempfile::tempdir().unwrap();
    let records = dir.path().join("records");
    let output = dir.path().join("res.png");
    fs::write(
        &records,
        format!("{HEADER}21,1,10.5,2.25\n31,1,11.0,2.5\n21,10,4.0,1.0\n31,10,4.5,1.25\n"),
    )
    .unwrap();

    let config = ChartConfig {
        y_max: None,
        ..small()
    };

    assert_eq!(render_records(&records, &output, &config).unwrap(), 2);

    let panel = config.panel_px();
    assert_eq!(panel, 150);
    assert_eq!(png_size(&fs::read(&output).unwrap()), (2 * panel, panel));
}

#[test]
fn full_grid_renders_side_by_side() {
    let dir = tempfile::tempdir().unwrap();
    let records = dir.path().join("records");
    let output = dir.path().join("res.png");

    let rows: String = [1, 10, 100]
        .iter()
        .flat_map(|scaled| {
            [21, 31, 41, 51, 61, 71]
                .iter()
                .map(move |kmer_size| format!("{kmer_size},{scaled},{}.5,1.25\n", kmer_size / 10))
        })
        .collect();
    fs::write(&records, format!("{HEADER}{rows}")).unwrap();

    let config = small();

    assert_eq!(render_records(&records, &output, &config).unwrap(), 3);
    assert_eq!(
        png_size(&fs::read(&output).unwrap()),
        (3 * config.panel_px(), config.panel_px())
    );
}
