//! Plot session integration tests
//!
//! Drive a session over the in-memory recorder and check the exact command
//! stream gnuplot would have received.

mod common;

use std::fs;

use common::{data_path, recording_session, title, verb};
use implore_gnuplot::{
    Axis, GnuplotError, OutputFormat, PlotConfig, PlotSession, PointData, RecordingBackend,
    SessionState, Style,
};
use tempfile::TempDir;

// === Add ===

#[test]
fn test_first_add_plots_second_replots() {
    let dir = TempDir::new().unwrap();
    let mut plot = recording_session(1, &dir);

    plot.add("a", Style::Points, vec![1i32, 2, 3]).unwrap();
    plot.add("b", Style::Lines, vec![4i32, 5, 6]).unwrap();

    let lines = plot.backend().lines();
    assert_eq!(lines.len(), 2);
    assert_eq!(verb(&lines[0]), "plot");
    assert_eq!(verb(&lines[1]), "replot");
    assert_eq!(title(&lines[0]), Some("a"));
    assert!(lines[1].ends_with("with lines"));
    assert_eq!(plot.active_plot_count(), 2);
}

#[test]
fn test_first_3d_add_uses_splot() {
    let dir = TempDir::new().unwrap();
    let mut plot = recording_session(3, &dir);

    let xyz = [vec![1.0f64, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]];
    plot.add("surface", Style::Points, xyz.clone()).unwrap();
    plot.add("again", Style::Points, xyz).unwrap();

    let lines = plot.backend().lines();
    assert_eq!(verb(&lines[0]), "splot");
    assert_eq!(verb(&lines[1]), "replot");
}

#[test]
fn test_unnamed_series_has_no_title() {
    let dir = TempDir::new().unwrap();
    let mut plot = recording_session(1, &dir);
    plot.add("", Style::Dots, vec![1.0f32]).unwrap();

    let line = &plot.backend().lines()[0];
    assert!(!line.contains("title"));
    assert!(line.ends_with("with dots"));
}

#[test]
fn test_duplicate_name_leaves_state_unchanged() {
    let dir = TempDir::new().unwrap();
    let mut plot = recording_session(1, &dir);
    plot.add("a", Style::Lines, vec![1i64, 2]).unwrap();

    let err = plot.add("a", Style::Dots, vec![9i64]).unwrap_err();
    assert!(matches!(err, GnuplotError::DuplicateName { ref name } if name == "a"));
    assert_eq!(plot.active_plot_count(), 1);
    assert_eq!(plot.backend().lines().len(), 1);
    assert_eq!(plot.style("a").unwrap(), Style::Lines);
    assert_eq!(
        plot.series("a").unwrap().points(),
        &PointData::OneD(vec![1.0, 2.0])
    );
}

#[test]
fn test_dimension_mismatch_sends_nothing() {
    let dir = TempDir::new().unwrap();
    let mut plot = recording_session(2, &dir);

    let err = plot.add("flat", Style::Points, vec![1.0f64, 2.0]).unwrap_err();
    assert!(matches!(
        err,
        GnuplotError::InvalidDimension {
            expected: 2,
            actual: 1
        }
    ));
    let err = plot
        .add("xyz", Style::Points, vec![vec![1i8], vec![2], vec![3]])
        .unwrap_err();
    assert!(matches!(err, GnuplotError::InvalidDimension { .. }));

    assert!(plot.backend().lines().is_empty());
    assert_eq!(plot.active_plot_count(), 0);
}

#[test]
fn test_mismatched_columns_truncate_to_shortest() {
    let dir = TempDir::new().unwrap();
    let mut plot = recording_session(2, &dir);
    plot.add(
        "short",
        Style::Points,
        [vec![1i32, 2, 3, 4, 5], vec![10, 20, 30]],
    )
    .unwrap();

    let path = data_path(&plot.backend().lines()[0]);
    let content = fs::read_to_string(path).unwrap();
    assert_eq!(content, "1 10\n2 20\n3 30\n");
}

#[test]
fn test_float_formatting_in_data_file() {
    let dir = TempDir::new().unwrap();
    let mut plot = recording_session(1, &dir);
    plot.add("f", Style::Points, vec![0.5f64, -1.25, 3.0]).unwrap();

    let path = data_path(&plot.backend().lines()[0]);
    assert_eq!(fs::read_to_string(path).unwrap(), "0.5\n-1.25\n3\n");
}

// === Remove ===

#[test]
fn test_remove_replays_survivor_as_fresh_plot() {
    let dir = TempDir::new().unwrap();
    let mut plot = recording_session(1, &dir);
    plot.add("a", Style::Points, vec![1i32, 2, 3]).unwrap();
    plot.add("b", Style::Points, vec![4i32, 5, 6]).unwrap();
    plot.backend_mut().take_lines();

    plot.remove("a").unwrap();

    let lines = plot.backend().lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(verb(&lines[0]), "plot");
    assert_eq!(title(&lines[0]), Some("b"));
    assert_eq!(plot.active_plot_count(), 1);
    assert_eq!(plot.series_names(), vec!["b"]);
}

#[test]
fn test_remove_replays_in_insertion_order() {
    let dir = TempDir::new().unwrap();
    let mut plot = recording_session(1, &dir);
    for name in ["first", "second", "third", "fourth"] {
        plot.add(name, Style::Points, vec![1.0f64]).unwrap();
    }
    plot.backend_mut().take_lines();

    plot.remove("second").unwrap();

    let lines = plot.backend().lines();
    let titles: Vec<_> = lines.iter().map(|l| title(l).unwrap()).collect();
    assert_eq!(titles, vec!["first", "third", "fourth"]);
    let verbs: Vec<_> = lines.iter().map(|l| verb(l)).collect();
    assert_eq!(verbs, vec!["plot", "replot", "replot"]);
    assert_eq!(plot.active_plot_count(), plot.len());
}

#[test]
fn test_remove_rematerializes_into_new_files() {
    let dir = TempDir::new().unwrap();
    let mut plot = recording_session(1, &dir);
    plot.add("a", Style::Points, vec![1.0f64]).unwrap();
    plot.add("b", Style::Points, vec![2.0f64]).unwrap();
    let old_b = data_path(&plot.backend().lines()[1]);
    plot.backend_mut().take_lines();

    plot.remove("a").unwrap();

    let new_b = data_path(&plot.backend().lines()[0]);
    assert_ne!(old_b, new_b);
    assert_eq!(fs::read_to_string(new_b).unwrap(), "2\n");
}

#[test]
fn test_stale_files_are_cleaned_after_two_replays() {
    let dir = TempDir::new().unwrap();
    let mut plot = recording_session(1, &dir);
    plot.add("a", Style::Points, vec![1.0f64]).unwrap();
    let first = data_path(&plot.backend().lines()[0]);

    plot.remove("missing").unwrap();
    assert!(first.exists());
    plot.remove("missing").unwrap();
    assert!(!first.exists());
}

#[test]
fn test_remove_absent_name_is_not_an_error() {
    let dir = TempDir::new().unwrap();
    let mut plot = recording_session(2, &dir);
    plot.remove("ghost").unwrap();
    assert!(plot.backend().lines().is_empty());
    assert_eq!(plot.active_plot_count(), 0);
}

#[test]
fn test_readd_after_remove_matches_fresh_session() {
    let dir = TempDir::new().unwrap();
    let mut plot = recording_session(1, &dir);
    plot.add("a", Style::Lines, vec![1i16, 2]).unwrap();
    plot.remove("a").unwrap();
    plot.backend_mut().take_lines();

    plot.add("a", Style::Lines, vec![1i16, 2]).unwrap();

    let fresh_dir = TempDir::new().unwrap();
    let mut fresh = recording_session(1, &fresh_dir);
    fresh.add("a", Style::Lines, vec![1i16, 2]).unwrap();

    let shape = |line: &str| {
        let path = data_path(line);
        line.replace(&path.to_string_lossy().to_string(), "<data>")
    };
    assert_eq!(
        shape(&plot.backend().lines()[0]),
        shape(&fresh.backend().lines()[0])
    );
    assert_eq!(plot.active_plot_count(), 1);
}

// === Reset style ===

#[test]
fn test_reset_style_missing_sends_nothing() {
    let dir = TempDir::new().unwrap();
    let mut plot = recording_session(1, &dir);
    plot.add("a", Style::Points, vec![1i32]).unwrap();
    plot.backend_mut().take_lines();

    let err = plot.reset_style("ghost", Style::Lines).unwrap_err();
    assert!(matches!(err, GnuplotError::NotFound { ref name } if name == "ghost"));
    assert!(plot.backend().lines().is_empty());
    assert_eq!(plot.active_plot_count(), 1);
}

#[test]
fn test_reset_style_redraws_others_then_target() {
    let dir = TempDir::new().unwrap();
    let mut plot = recording_session(2, &dir);
    plot.add("a", Style::Points, [vec![1.0f64], vec![1.0]]).unwrap();
    plot.add("b", Style::Points, [vec![2.0f64], vec![2.0]]).unwrap();
    plot.add("c", Style::Points, [vec![3.0f64], vec![3.0]]).unwrap();
    plot.backend_mut().take_lines();

    plot.reset_style("a", Style::Impulses).unwrap();

    let lines = plot.backend().lines();
    assert_eq!(lines.len(), 3);
    assert_eq!(title(&lines[0]), Some("b"));
    assert_eq!(verb(&lines[0]), "plot");
    assert_eq!(title(&lines[1]), Some("c"));
    assert_eq!(title(&lines[2]), Some("a"));
    assert_eq!(verb(&lines[2]), "replot");
    assert!(lines[2].ends_with("with impulses"));
    assert_eq!(plot.style("a").unwrap(), Style::Impulses);
    assert_eq!(plot.active_plot_count(), 3);
    assert_eq!(plot.series_names(), vec!["b", "c", "a"]);
}

#[test]
fn test_reset_style_single_series() {
    let dir = TempDir::new().unwrap();
    let mut plot = recording_session(3, &dir);
    plot.add("only", Style::Points, [vec![1i32], vec![2], vec![3]])
        .unwrap();
    plot.backend_mut().take_lines();

    plot.reset_style("only", Style::Lines).unwrap();

    let lines = plot.backend().lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(verb(&lines[0]), "splot");
    assert!(lines[0].ends_with("with lines"));
}

#[test]
fn test_reset_style_keeps_series_when_write_fails() {
    let dir = TempDir::new().unwrap();
    let mut plot = PlotSession::with_backend_in(
        PlotConfig::new(1),
        RecordingBackend::failing_after(2),
        dir.path(),
    )
    .unwrap();
    plot.add("a", Style::Points, vec![1i32]).unwrap();
    plot.add("b", Style::Points, vec![2i32]).unwrap();

    let err = plot.reset_style("a", Style::Lines).unwrap_err();
    assert!(matches!(err, GnuplotError::Io(_)));
    assert_eq!(plot.series_names(), vec!["b", "a"]);
    assert_eq!(plot.style("a").unwrap(), Style::Lines);
}

// === Save and format ===

#[test]
fn test_save_before_add_is_empty_plot() {
    let dir = TempDir::new().unwrap();
    let mut plot = recording_session(2, &dir);
    let out = dir.path().join("out.png");
    assert!(matches!(
        plot.save(&out, 800, 600),
        Err(GnuplotError::EmptyPlot)
    ));
    assert!(plot.backend().lines().is_empty());
}

#[test]
fn test_save_after_last_removed_is_empty_plot() {
    let dir = TempDir::new().unwrap();
    let mut plot = recording_session(1, &dir);
    plot.add("a", Style::Points, vec![1i32]).unwrap();
    plot.remove("a").unwrap();
    assert!(matches!(
        plot.save(dir.path().join("out.png"), 800, 600),
        Err(GnuplotError::EmptyPlot)
    ));
}

#[test]
fn test_save_sends_terminal_output_replot() {
    let dir = TempDir::new().unwrap();
    let mut plot = recording_session(1, &dir);
    plot.add("a", Style::Points, vec![1i32]).unwrap();
    plot.set_format(OutputFormat::Pdf).unwrap();
    plot.backend_mut().take_lines();

    plot.save("figure.pdf", 640, 480).unwrap();

    assert_eq!(
        plot.backend().lines(),
        [
            "set terminal pdf size 640, 480",
            "set output 'figure.pdf'",
            "replot",
        ]
    );
}

#[test]
fn test_save_rejects_zero_size() {
    let dir = TempDir::new().unwrap();
    let mut plot = recording_session(1, &dir);
    plot.add("a", Style::Points, vec![1i32]).unwrap();
    assert!(matches!(
        plot.save("x.png", 0, 480),
        Err(GnuplotError::InvalidSize { .. })
    ));
}

// === Pass-through commands ===

#[test]
fn test_cosmetic_setters() {
    let dir = TempDir::new().unwrap();
    let mut plot = recording_session(3, &dir);
    plot.set_title("Test Results").unwrap();
    plot.set_labels(&["X-axis", "Y-Axis", "Z-Axis"]).unwrap();
    plot.set_x_range(-2.0, 2.0).unwrap();
    plot.set_log_scale(Axis::X, 2).unwrap();
    plot.set_grid().unwrap();
    plot.set_key_outside().unwrap();

    assert_eq!(
        plot.backend().lines(),
        [
            "set title \"Test Results\"",
            "set xlabel 'X-axis'",
            "set ylabel 'Y-Axis'",
            "set zlabel 'Z-Axis'",
            "set xrange [-2:2]",
            "set logscale x 2",
            "set grid",
            "set key outside",
        ]
    );
    assert_eq!(plot.active_plot_count(), 0);
}

#[test]
fn test_set_labels_count_checked() {
    let dir = TempDir::new().unwrap();
    let mut plot = recording_session(2, &dir);
    assert!(matches!(
        plot.set_labels(&[]),
        Err(GnuplotError::InvalidLabels { count: 0 })
    ));
    assert!(matches!(
        plot.set_labels(&["a", "b", "c", "d"]),
        Err(GnuplotError::InvalidLabels { count: 4 })
    ));
    assert!(plot.backend().lines().is_empty());
}

#[test]
fn test_raw_command_single_line_only() {
    let dir = TempDir::new().unwrap();
    let mut plot = recording_session(2, &dir);
    plot.raw_command("set samples 500").unwrap();
    assert!(matches!(
        plot.raw_command("set grid\nquit"),
        Err(GnuplotError::MalformedCommand(_))
    ));
    assert_eq!(plot.backend().lines(), ["set samples 500"]);
}

// === Functions ===

#[test]
fn test_add_func_2d_samples_function() {
    let dir = TempDir::new().unwrap();
    let mut plot = recording_session(2, &dir);
    plot.add_func_2d("square", Style::Lines, &[0.0, 1.0, 2.0], |x| x * x)
        .unwrap();

    let path = data_path(&plot.backend().lines()[0]);
    assert_eq!(fs::read_to_string(path).unwrap(), "0 0\n1 1\n2 4\n");
}

#[test]
fn test_add_func_3d_uses_shorter_input() {
    let dir = TempDir::new().unwrap();
    let mut plot = recording_session(3, &dir);
    plot.add_func_3d("sum", Style::Points, &[1.0, 2.0, 3.0], &[10.0, 20.0], |x, y| x + y)
        .unwrap();

    let line = &plot.backend().lines()[0];
    assert_eq!(verb(line), "splot");
    assert_eq!(fs::read_to_string(data_path(line)).unwrap(), "1 10 11\n2 20 22\n");
}

#[test]
fn test_add_func_2d_on_3d_session_fails() {
    let dir = TempDir::new().unwrap();
    let mut plot = recording_session(3, &dir);
    assert!(matches!(
        plot.add_func_2d("f", Style::Lines, &[1.0], |x| x),
        Err(GnuplotError::InvalidDimension { .. })
    ));
}

// === Close ===

#[test]
fn test_operations_after_close_fail() {
    let dir = TempDir::new().unwrap();
    let mut plot = recording_session(1, &dir);
    plot.add("a", Style::Points, vec![1i32]).unwrap();
    plot.close().unwrap();

    assert_eq!(plot.state(), SessionState::Closed);
    assert!(matches!(
        plot.add("b", Style::Points, vec![1i32]),
        Err(GnuplotError::SessionClosed)
    ));
    assert!(matches!(plot.remove("a"), Err(GnuplotError::SessionClosed)));
    assert!(matches!(
        plot.reset_style("a", Style::Lines),
        Err(GnuplotError::SessionClosed)
    ));
    assert!(matches!(
        plot.save("x.png", 10, 10),
        Err(GnuplotError::SessionClosed)
    ));
    assert!(matches!(
        plot.set_format(OutputFormat::Svg),
        Err(GnuplotError::SessionClosed)
    ));
    assert!(matches!(
        plot.raw_command("set grid"),
        Err(GnuplotError::SessionClosed)
    ));
    assert!(matches!(plot.set_grid(), Err(GnuplotError::SessionClosed)));
}

#[test]
fn test_close_releases_data_files() {
    let dir = TempDir::new().unwrap();
    let mut plot = recording_session(1, &dir);
    plot.add("a", Style::Points, vec![1i32]).unwrap();
    let path = data_path(&plot.backend().lines()[0]);
    assert!(path.exists());

    plot.close().unwrap();
    assert!(!path.exists());
    assert!(plot.is_empty());
    assert_eq!(plot.active_plot_count(), 0);
}

#[test]
fn test_close_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let mut plot = recording_session(1, &dir);
    plot.close().unwrap();
    plot.close().unwrap();
    plot.close_timeout(std::time::Duration::from_millis(5)).unwrap();
    assert_eq!(plot.backend().close_calls(), 1);
}

#[test]
fn test_drop_releases_data_files() {
    let dir = TempDir::new().unwrap();
    let mut plot = recording_session(2, &dir);
    plot.add("a", Style::Points, [vec![1.0f64], vec![2.0]]).unwrap();
    plot.add("b", Style::Lines, [vec![3.0f64], vec![4.0]]).unwrap();
    plot.remove("a").unwrap();
    let paths: Vec<_> = plot.backend().lines().iter().map(|l| data_path(l)).collect();
    assert!(paths.iter().all(|p| p.exists()));

    drop(plot);

    assert!(paths.iter().all(|p| !p.exists()));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}
