//! End-to-end: build a store with every plot kind and write the document

use ndarray::{Array2, Array3};
use plotski::reader::to_data_source;
use plotski::{
    Capability, DataSource, ImageArray, LayoutNode, LayoutOptions, PlotOptions, PlotStore,
    PlotskiError,
};
use polars::prelude::*;

fn spectrum() -> DataSource {
    DataSource::new()
        .with_column("x", vec![100.0, 200.0, 300.0, 400.0])
        .with_column("y", vec![5.0, 50.0, 20.0, 1.0])
}

fn butterfly() -> DataSource {
    DataSource::new()
        .with_column("x_top", vec![1.0, 2.0, 3.0])
        .with_column("y_top", vec![1.0, 5.0, 2.0])
        .with_column("x_bottom", vec![1.0, 2.0, 3.0])
        .with_column("y_bottom", vec![-2.0, -4.0, -1.0])
}

fn build_store(dir: &std::path::Path) -> PlotStore {
    let mut store = PlotStore::new(dir);
    store.add_tabs(&["spectra", "images"], false).unwrap();

    let row = store.add_row("spectra").unwrap();
    let ms = store
        .plot_mass_spectrum("spectra", spectrum(), Some(&row), PlotOptions::new())
        .unwrap();
    store
        .plot_butterfly_mass_spectrum(
            "spectra",
            butterfly(),
            Some(&row),
            PlotOptions::new().with("add_legend", true),
        )
        .unwrap();
    store
        .plot_multiline_spectrum(
            "spectra",
            DataSource::new()
                .with_column("xs", vec![vec![1.0, 2.0], vec![1.0, 3.0]])
                .with_column("ys", vec![vec![3.0, 4.0], vec![5.0, 6.0]])
                .with_column("colors", vec!["red", "blue"]),
            None,
            PlotOptions::new(),
        )
        .unwrap();

    let plot = store.plot_mut(&ms).unwrap();
    PlotStore::add_box(
        plot,
        DataSource::new().with_column("left", vec![150.0]).with_column("right", vec![250.0]),
        PlotOptions::new(),
    )
    .unwrap();
    PlotStore::add_labels(
        plot,
        DataSource::new()
            .with_column("x", vec![200.0])
            .with_column("y", vec![50.0])
            .with_column("text", vec!["base peak"]),
        PlotOptions::new(),
    )
    .unwrap();
    PlotStore::add_centroids_x(
        plot,
        DataSource::new().with_column("x", vec![300.0]).with_column("y1", vec![20.0]),
        PlotOptions::new().with("line_color", "red"),
    )
    .unwrap();

    let grid = store.add_grid("images").unwrap();
    let heatmap: ImageArray = Array2::from_shape_fn((4, 6), |(r, c)| (r * c) as f64).into();
    store
        .plot_image(
            "images",
            DataSource::new().with_column("image", heatmap),
            Some(&grid),
            PlotOptions::new().with("add_colorbar", true),
        )
        .unwrap();
    let rgba: ImageArray = Array3::<u8>::from_elem((2, 2, 4), 128).into();
    store
        .plot_rgb_image("images", DataSource::new().with_column("image", rgba), Some(&grid), PlotOptions::new())
        .unwrap();
    store
}

#[test]
fn test_document_has_every_figure() {
    let dir = tempfile::tempdir().unwrap();
    let store = build_store(dir.path());

    let layout = store.get_layout(&LayoutOptions::default()).unwrap();
    assert_eq!(layout.figure_count(), 5);
    let LayoutNode::Tabs(panels) = &layout else {
        panic!("expected tabs");
    };
    assert_eq!(
        panels.iter().map(|p| p.title.as_str()).collect::<Vec<_>>(),
        vec!["spectra", "images"]
    );

    let path = store.save(None, false, &LayoutOptions::default()).unwrap();
    let html = std::fs::read_to_string(&path).unwrap();
    assert_eq!(html.matches("vegaEmbed(\"#").count(), 5);
    assert_eq!(html.matches("<div class=\"plotski-tab-panel").count(), 2);
}

#[test]
fn test_layout_serializes_to_json() {
    let dir = tempfile::tempdir().unwrap();
    let store = build_store(dir.path());
    let options = LayoutOptions {
        tab_names: Some(vec!["images".to_string()]),
        always_as_tabs: false,
    };
    let json = serde_json::to_value(store.get_layout(&options).unwrap()).unwrap();
    assert_eq!(json["type"], "column");
}

#[test]
fn test_image_requires_image_field() {
    let mut store = PlotStore::new(".");
    let err = store
        .plot_image("images", spectrum(), None, PlotOptions::new())
        .unwrap_err();
    assert!(matches!(err, PlotskiError::ValidationError(_)));
}

#[test]
fn test_rgba_requires_8_bit() {
    let mut store = PlotStore::new(".");
    let floats: ImageArray = Array2::<f64>::zeros((2, 2)).into();
    let err = store
        .plot_rgb_image("images", DataSource::new().with_column("image", floats), None, PlotOptions::new())
        .unwrap_err();
    assert!(err.to_string().contains("8-bit"));
}

#[test]
fn test_annotation_capabilities_enforced() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = build_store(dir.path());
    let image = store.tab("images").unwrap().containers()[0].plots[0]
        .name
        .clone()
        .unwrap();
    let handle = plotski::PlotHandle {
        tab: "images".to_string(),
        item: "grid #0".to_string(),
        name: image,
    };
    let plot = store.plot_mut(&handle).unwrap();
    assert!(!plot.supports(Capability::Scatter));

    let err = PlotStore::add_scatter(plot, spectrum(), PlotOptions::new()).unwrap_err();
    assert!(matches!(err, PlotskiError::ValidationError(_)));
    PlotStore::add_span(
        plot,
        DataSource::new()
            .with_column("location", vec![1.0])
            .with_column("dimension", vec!["width"]),
        PlotOptions::new(),
    )
    .unwrap();
}

#[test]
fn test_plot_from_dataframe() {
    let df = df! {
        "x" => [1.0, 2.0, 3.0],
        "y" => [10i64, 20, 30],
        "label" => ["a", "b", "c"],
    }
    .unwrap();
    let source = to_data_source(&df).unwrap();

    let mut store = PlotStore::new(".");
    let handle = store.plot_scatter("scatter", source, None, PlotOptions::new()).unwrap();
    let plot = store.plot(&handle).unwrap();
    assert_eq!(plot.source().numbers("y").unwrap(), &[10.0, 20.0, 30.0]);
    assert_eq!(plot.resolved_ranges().0, Some((1.0, 3.0 * 1.05)));
}
