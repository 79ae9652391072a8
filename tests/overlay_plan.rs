mod common;

use common::{position, ticker};
use position_chart_wasm::application::plan_overlays;
use position_chart_wasm::config::OverlayConfig;
use position_chart_wasm::domain::{chart::PriceLineOptions, market_data::Price, trading::Side};

fn describe(plan: &[PriceLineOptions]) -> String {
    plan.iter()
        .map(|line| {
            format!(
                "{:.2} {:?} w{} {} axis={} '{}'",
                line.price.value(),
                line.line_style,
                line.line_width,
                line.color.to_css(),
                line.axis_label_visible,
                line.title
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn mixed_book_plan() {
    let positions = vec![
        position("1", Side::Long, 0.25, 64_000.0),
        position("2", Side::Short, 3.0, 65_500.0),
        position("3", Side::Long, 1.0, 63_250.5),
    ];
    let plan = plan_overlays(&positions, Some(Price::from(64_800.0)), Some(&ticker(64_800.0, -120.0)), &OverlayConfig::default());

    insta::assert_snapshot!(describe(&plan), @r"
    64000.00 Dashed w2 #26a69a axis=true 'Long 0.25 | P&L +200.00'
    65500.00 Dashed w2 #ef5350 axis=true 'Short 3 | P&L +2,100.00'
    63250.50 Dashed w2 #26a69a axis=true 'Long 1 | P&L +1,549.50'
    64800.00 Solid w1 #ef5350 axis=true ''
    ");
}

#[test]
fn nothing_to_draw() {
    assert!(plan_overlays(&[], None, None, &OverlayConfig::default()).is_empty());
}

#[test]
fn serializes_for_the_chart_library() {
    let plan = plan_overlays(&[position("1", Side::Short, 1.0, 10.0)], None, None, &OverlayConfig::default());
    let json = serde_json::to_value(&plan[0]).expect("serializable");
    assert_eq!(json["lineStyle"], 2);
    assert_eq!(json["lineWidth"], 2);
    assert_eq!(json["axisLabelVisible"], true);
    assert_eq!(json["color"], "#ef5350");
    assert_eq!(json["title"], "Short 1 | P&L +0.00");
}
