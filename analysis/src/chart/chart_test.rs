use super::{group_by_scaled, render, ChartConfig, ChartGroup};
use sketchbench_runner::{
    database::{Header, ResultTable, TimingResult},
    grid::GridPoint,
};
use std::fs;

fn header() -> Header {
    Header(["kmer_size", "scaled", "sourmash_time", "frackmc_time"].map(str::to_owned))
}

fn row(kmer_size: u32, scaled: u64, reference: f64, candidate: f64) -> TimingResult {
    TimingResult {
        point: GridPoint { kmer_size, scaled },
        reference_seconds: reference,
        candidate_seconds: candidate,
    }
}

#[test]
pub fn groups_keep_first_seen_order() {
    let mut table = ResultTable::new(header());
    table.push(row(31, 100, 3.0, 1.0));
    table.push(row(21, 1, 2.0, 1.0));
    table.push(row(21, 100, 4.0, 1.5));
    table.push(row(31, 1, 5.0, 0.5));

    let groups = group_by_scaled(&table);

    assert_eq!(
        groups.iter().map(|group| group.scaled).collect::<Vec<_>>(),
        vec![100, 1]
    );
    assert_eq!(
        groups[0],
        ChartGroup {
            scaled: 100,
            rows: vec![row(21, 100, 4.0, 1.5), row(31, 100, 3.0, 1.0)],
        }
    );
    assert_eq!(
        groups[1].rows,
        vec![row(21, 1, 2.0, 1.0), row(31, 1, 5.0, 0.5)]
    );
}

#[test]
pub fn groups_cover_every_row() {
    let mut table = ResultTable::new(header());
    for scaled in [1, 10, 100] {
        for kmer_size in [21, 31, 41] {
            table.push(row(kmer_size, scaled, 1.0, 2.0));
        }
    }

    let groups = group_by_scaled(&table);

    assert_eq!(groups.len(), 3);
    assert_eq!(
        groups.iter().map(|group| group.rows.len()).sum::<usize>(),
        table.len()
    );
}

#[test]
pub fn empty_table_has_no_groups() {
    assert!(group_by_scaled(&ResultTable::new(header())).is_empty());
}

#[test]
pub fn x_range_pads_single_points() {
    let group = ChartGroup {
        scaled: 1,
        rows: vec![row(21, 1, 1.0, 1.0)],
    };

    assert_eq!(group.x_range(), 20.0..22.0);
}

#[test]
pub fn sizes_scale_with_dpi() {
    let config = ChartConfig::default();

    assert_eq!(config.panel_px(), 3600);
    assert_eq!(config.px(72.0), 1200.0);

    let small = ChartConfig {
        dpi: 100,
        ..ChartConfig::default()
    };
    assert_eq!(small.panel_px(), 300);
}

#[test]
pub fn empty_table_renders_blank_image() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("res.png");
    let config = ChartConfig {
        dpi: 20,
        ..ChartConfig::default()
    };

    let panels = render(&ResultTable::new(header()), &output, &config).unwrap();

    assert_eq!(panels, 0);
    let bytes = fs::read(&output).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
}

#[test]
pub fn single_row_renders_one_panel() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("res.png");
    let config = ChartConfig {
        dpi: 20,
        y_max: None,
        ..ChartConfig::default()
    };
    let mut table = ResultTable::new(header());
    table.push(row(21, 1000, 0.0, 0.0));

    assert_eq!(render(&table, &output, &config).unwrap(), 1);
    assert!(fs::metadata(&output).unwrap().len() > 0);
}
