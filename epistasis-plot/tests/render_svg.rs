//! End-to-end: build every figure from a synthetic model and render it to
//! SVG.

use epistasis_core::stats::FDistribution;
use epistasis_core::synthetic::{synthetic_model, synthetic_projection, SyntheticSpec};
use epistasis_plot::render::svg::pixel_size;
use epistasis_plot::{
    bar_with_xbox, magnitude_vs_order, principal_components, render_to_file, render_to_string, BestFitOptions,
    DistributionOptions, FDistributionPlotting, InteractionOptions, MagnitudeOptions, NonlinearPlotting,
    PcaOptions, PlotConfig, RegressionPlotting, ResidualOptions,
};

fn render(fig: &epistasis_core::Figure) -> String {
    render_to_string(fig, &PlotConfig::default()).unwrap()
}

#[test]
fn interaction_chart_renders_labels_and_stars() {
    let model = synthetic_model(&SyntheticSpec::default());
    let fig = bar_with_xbox(&model, &InteractionOptions::default()).unwrap();
    assert_eq!(fig.panels.len(), 2);
    let svg = render(&fig);
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("interaction"));
    assert!(svg.contains("<rect"));
}

#[test]
fn regression_plots_render() {
    let model = synthetic_model(&SyntheticSpec::default());
    let plots = RegressionPlotting::new(&model);
    let svg = render(&plots.correlation((6.0, 4.0)).unwrap());
    assert!(svg.contains("known"));
    assert!(svg.contains("learned"));
    render(&plots.predicted_phenotypes((6.0, 4.0)).unwrap());
    render(
        &plots
            .residuals(&ResidualOptions {
                stem: true,
                ..Default::default()
            })
            .unwrap(),
    );
    render(&plots.best_fit(&BestFitOptions::default()).unwrap());
}

#[test]
fn nonlinear_plots_render() {
    let model = synthetic_model(&SyntheticSpec {
        nonlinear: true,
        ..Default::default()
    });
    let plots = NonlinearPlotting::new(&model);
    let svg = render(&plots.linear_phenotypes().unwrap());
    assert!(svg.contains("linear phenotypes"));
    render(&plots.best_fit(&BestFitOptions::default()).unwrap());
    render(&plots.residuals(&ResidualOptions::default()).unwrap());
}

#[test]
fn distribution_and_magnitude_render() {
    let plots = FDistributionPlotting::new(FDistribution::new(4.0, 12.0));
    let svg = render(&plots.cdf(&DistributionOptions::default()).unwrap());
    assert!(svg.contains("Cumulative distribution function"));

    let model = synthetic_model(&SyntheticSpec::default());
    let svg = render(&magnitude_vs_order(&model, &MagnitudeOptions::default()).unwrap());
    assert!(svg.contains("Magnitude"));
}

#[test]
fn pca_renders_in_3d() {
    let model = synthetic_model(&SyntheticSpec::default());
    let projection = synthetic_projection(&model, 7);
    let svg = render(&principal_components(&projection, &PcaOptions::default()).unwrap());
    assert!(svg.contains("<circle"));
    assert!(svg.contains("<polygon"));
}

#[test]
fn dpi_override_changes_canvas() {
    let model = synthetic_model(&SyntheticSpec::default());
    let fig = RegressionPlotting::new(&model).correlation((6.0, 4.0)).unwrap();
    let cfg = PlotConfig {
        dpi: Some(50),
        ..Default::default()
    };
    assert_eq!(pixel_size(&fig, &cfg), (300, 200));
    let svg = render_to_string(&fig, &cfg).unwrap();
    assert!(svg.contains("width=\"300\""));
    assert!(svg.contains("height=\"200\""));
}

#[test]
fn writes_svg_files() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("interactions.svg");
    let model = synthetic_model(&SyntheticSpec::default());
    let fig = bar_with_xbox(&model, &InteractionOptions::default()).unwrap();
    render_to_file(&fig, &path, &PlotConfig::default()).unwrap();
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("</svg>"));
}

#[test]
fn missing_directory_is_an_io_error() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("missing").join("fig.svg");
    let model = synthetic_model(&SyntheticSpec::default());
    let fig = RegressionPlotting::new(&model).correlation((6.0, 4.0)).unwrap();
    let err = render_to_file(&fig, &path, &PlotConfig::default()).unwrap_err();
    assert!(matches!(err, epistasis_plot::PlotError::Io(_)));
}
