//! End-to-end generation against temporary dataset trees.
use std::fs;
use std::num::NonZeroUsize;

use dexprep_core::{
    DexError, EmitOptions, Family, OutputLayout,
    cases::{
        backprop,
        hotspot::{self, HotspotCase},
        kmeans::{self, KmeansCase},
        pathfinder,
    },
    run_families, run_families_with,
};
use dexprep_test_support::{
    fixtures::{DatasetTree, flat_cells, labelled_points},
    tracing::RecordingLayer,
};
use rstest::{fixture, rstest};
use tracing_subscriber::layer::SubscriberExt;

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[fixture]
fn tree() -> DatasetTree {
    match DatasetTree::new() {
        Ok(tree) => tree,
        Err(err) => panic!("failed to create dataset tree: {err}"),
    }
}

fn layout(tree: &DatasetTree) -> OutputLayout {
    OutputLayout::new(tree.data_root(), tree.exe_root())
}

fn binding_line<'a>(text: &'a str, name: &str) -> Option<&'a str> {
    let prefix = format!("{name} = ");
    text.lines().find_map(|line| line.strip_prefix(prefix.as_str()))
}

#[rstest]
fn kmeans_case_drops_labels_and_keeps_every_record(tree: DatasetTree) -> TestResult {
    tree.write_dataset("kmeans", "100", &labelled_points(100, 2))?;
    let case = KmeansCase {
        dataset: "100",
        clusters: 10,
    };

    let path = kmeans::generate_case(&layout(&tree), &case, &EmitOptions::new())?;

    assert_eq!(path, tree.exe_root().join("kmeans/100.dx"));
    let text = fs::read_to_string(&path)?;
    let points_start = text.find("points = [").ok_or("points binding missing")?;
    let points_end = text.find("\nk = 10\n").ok_or("k binding missing")?;
    let points = text
        .get(points_start + "points = ".len()..points_end)
        .ok_or("points literal missing")?;
    let rows: Vec<&str> = points.split(",\n  ").collect();
    assert_eq!(rows.len(), 100);
    assert_eq!(rows.first(), Some(&"[[0.0,1.0]"));
    assert_eq!(rows.last(), Some(&"[198.0,199.0]]"));
    assert!(text.ends_with("result = kmeans points k threshold max_iterations\n"));
    Ok(())
}

#[rstest]
fn kmeans_case_missing_dataset_is_fatal(tree: DatasetTree) {
    let case = KmeansCase {
        dataset: "kdd_cup",
        clusters: 5,
    };
    let err = kmeans::generate_case(&layout(&tree), &case, &EmitOptions::new())
        .expect_err("missing dataset must fail");
    assert!(matches!(err, DexError::DatasetRead { ref path, .. } if path.ends_with("kmeans/kdd_cup")));
}

#[rstest]
fn hotspot_case_rebuilds_grids_and_keeps_short_rows(tree: DatasetTree) -> TestResult {
    tree.write_dataset("hotspot", "temp_3", &flat_cells(9))?;
    tree.write_dataset("hotspot", "power_3", &flat_cells(7))?;
    let case = HotspotCase {
        size: NonZeroUsize::new(3).ok_or("size must be non-zero")?,
    };

    let path = hotspot::generate_case(&layout(&tree), &case, &EmitOptions::new())?;

    assert_eq!(path, tree.exe_root().join("hotspot/3.dx"));
    let text = fs::read_to_string(&path)?;
    assert!(text.starts_with(
        "numIterations = 360\n\
         T = [[0.5,1.5,2.5],\n  [3.5,4.5,5.5],\n  [6.5,7.5,8.5]]\n\
         P = [[0.5,1.5,2.5],\n  [3.5,4.5,5.5],\n  [6.5]]\n\n\
         include \"hotspot.dx\"\n"
    ));
    assert!(text.contains("result = hotspot numIterations T P\n"));
    Ok(())
}

#[rstest]
fn hotspot_case_keeps_grid_cells_verbatim(tree: DatasetTree) -> TestResult {
    tree.write_dataset("hotspot", "temp_2", "6.64e-05\n1e-05\n0\n323.68\n")?;
    tree.write_dataset("hotspot", "power_2", "0\n0\n")?;
    let case = HotspotCase {
        size: NonZeroUsize::new(2).ok_or("size must be non-zero")?,
    };

    let path = hotspot::generate_case(&layout(&tree), &case, &EmitOptions::new())?;

    let text = fs::read_to_string(&path)?;
    assert!(text.starts_with(
        "numIterations = 360\n\
         T = [[6.64e-05,1e-05],\n  [0,323.68]]\n\
         P = [[0,0]]\n"
    ));
    Ok(())
}

#[rstest]
fn backprop_writes_plain_and_ad_variants(tree: DatasetTree) -> TestResult {
    let created = backprop::generate(&layout(&tree), &EmitOptions::new(), &mut |_| {})?;

    let expected = [
        tree.exe_root().join("backprop/512_16_1.dx"),
        tree.exe_root().join("backprop-ad/512_16_1.dx"),
        tree.exe_root().join("backprop/123_16_1.dx"),
        tree.exe_root().join("backprop-ad/123_16_1.dx"),
    ];
    assert_eq!(created, expected);

    for path in created.iter().filter(|path| path.ends_with("512_16_1.dx")) {
        let text = fs::read_to_string(path)?;
        let preamble: Vec<&str> = text.lines().filter(|line| line.contains("= Fin ")).collect();
        assert_eq!(preamble, ["in = Fin 512", "hid = Fin 16", "out = Fin 1"]);
        let values = text
            .lines()
            .take_while(|line| !line.is_empty())
            .filter(|line| line.contains(" = ((for "))
            .count();
        assert_eq!(values, 6);
        assert_eq!(
            binding_line(&text, "inputWeights"),
            Some("((for i j. rand (ixkey (newKey 0) (i, j))) : ({ b: Unit | w: in }=>hid=>Float))")
        );
    }
    Ok(())
}

#[rstest]
fn pathfinder_writes_single_world(tree: DatasetTree) -> TestResult {
    let created = pathfinder::generate(&layout(&tree), &EmitOptions::new(), &mut |_| {})?;
    assert_eq!(created, [tree.exe_root().join("pathfinder/100_100000.dx")]);
    let text = fs::read_to_string(&created[0])?;
    assert_eq!(
        binding_line(&text, "world"),
        Some("((for i j. randInt (ixkey (newKey 0) (i, j))) : (rows=>cols=>Int))")
    );
    Ok(())
}

#[rstest]
fn run_families_rejects_missing_root_without_output() -> TestResult {
    let tree = DatasetTree::without_data_root()?;
    let err = run_families(&layout(&tree), &Family::ALL, &EmitOptions::new())
        .expect_err("missing root must fail");
    assert!(matches!(err, DexError::DatasetRootMissing { ref path } if *path == tree.data_root()));
    assert!(!tree.exe_root().exists());
    Ok(())
}

#[rstest]
fn run_families_follows_fixed_order(tree: DatasetTree) -> TestResult {
    let report = run_families(
        &layout(&tree),
        &[Family::Backprop, Family::Pathfinder],
        &EmitOptions::new().with_echo_result(true),
    )?;

    let order: Vec<Family> = report.families.iter().map(|family| family.family).collect();
    assert_eq!(order, [Family::Pathfinder, Family::Backprop]);
    assert_eq!(report.file_count(), 5);
    assert!(!tree.exe_root().join("kmeans").exists());
    for path in report.created() {
        let text = fs::read_to_string(path)?;
        assert!(text.ends_with("\n\nresult\n"), "missing echo in {}", path.display());
    }
    Ok(())
}

#[rstest]
fn run_families_stops_at_first_failure(tree: DatasetTree) {
    let err = run_families(
        &layout(&tree),
        &[Family::Hotspot, Family::Kmeans],
        &EmitOptions::new(),
    )
    .expect_err("absent hotspot grids must fail");
    assert!(matches!(err, DexError::DatasetRead { ref path, .. } if path.ends_with("hotspot/temp_64")));
    assert!(!tree.exe_root().join("kmeans").exists());
}

#[rstest]
fn run_families_reports_files_written_before_a_failure(tree: DatasetTree) {
    let mut seen = Vec::new();
    let err = run_families_with(
        &layout(&tree),
        &[Family::Pathfinder, Family::Kmeans],
        &EmitOptions::new(),
        &mut |path| seen.push(path.to_path_buf()),
    )
    .expect_err("absent kmeans datasets must fail");

    assert!(matches!(err, DexError::DatasetRead { .. }));
    assert_eq!(seen, [tree.exe_root().join("pathfinder/100_100000.dx")]);
    assert!(seen.iter().all(|path| path.exists()));
}

#[rstest]
fn run_families_reports_unwritable_output_root(tree: DatasetTree) -> TestResult {
    fs::write(tree.exe_root(), "not a directory")?;
    let err = run_families(&layout(&tree), &[Family::Pathfinder], &EmitOptions::new())
        .expect_err("a file in place of the output root must fail");

    match err {
        DexError::CreateDir { ref path, .. } => {
            assert_eq!(*path, tree.exe_root().join("pathfinder"));
        }
        ref other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.code().as_str(), "DEX_CREATE_DIR");
    Ok(())
}

#[rstest]
fn regeneration_is_byte_identical(tree: DatasetTree) -> TestResult {
    let first = pathfinder::generate(&layout(&tree), &EmitOptions::new(), &mut |_| {})?;
    let before = fs::read(&first[0])?;
    let second = pathfinder::generate(&layout(&tree), &EmitOptions::new(), &mut |_| {})?;
    assert_eq!(first, second);
    assert_eq!(fs::read(&second[0])?, before);
    Ok(())
}

#[rstest]
fn generation_reports_created_files(tree: DatasetTree) -> TestResult {
    let recorder = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(recorder.clone());

    let report = tracing::subscriber::with_default(subscriber, || {
        run_families(&layout(&tree), &[Family::Pathfinder], &EmitOptions::new())
    })?;

    let created = recorder.events_with_message("Created descriptor");
    assert_eq!(created.len(), report.file_count());
    assert!(
        created
            .iter()
            .all(|event| event.field("path").is_some_and(|path| path.ends_with("100_100000.dx")))
    );

    let run_span = recorder.span("cases.run").ok_or("cases.run span missing")?;
    assert_eq!(run_span.field("files"), Some("1"));
    let family_span = recorder.span("cases.family").ok_or("cases.family span missing")?;
    assert_eq!(family_span.field("family"), Some("pathfinder"));
    Ok(())
}
