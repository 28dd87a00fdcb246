use almanac_core::{InsightCategory, Insights};
use almanac_error::NarrativeErrorKind;
use almanac_narrative::{
    DECISION_SCIENCE, KEY_INSIGHTS, MARKET_STRUCTURE, MARKETPLACE_DYNAMICS, PRICING_OPTIMIZATION,
    StepOutputs, find_step, marketplace_steps,
};

fn sample_insights() -> Insights {
    let mut insights = Insights::new();
    insights.push(InsightCategory::DataQuality, "Churn window is 30 days");
    insights.extend(
        InsightCategory::MarketplaceSummary,
        [
            "Supply - Active workers: 1200",
            "Demand - Fill rate: 82%",
            "Top 20% of workplaces post 70% of shifts",
            "Average pay $45/hour",
        ],
    );
    insights.extend(
        InsightCategory::Segments,
        ["seg 1", "seg 2", "seg 3", "seg 4", "seg 5", "seg 6", "seg 7"],
    );
    insights.push(InsightCategory::PriceSensitivity, "Rate +10% lifts claims");
    insights
}

fn prompt_for(name: &str, insights: &Insights, outputs: &StepOutputs) -> String {
    let steps = marketplace_steps();
    find_step(&steps, name).unwrap().build_prompt(insights, outputs)
}

#[test]
fn test_step_order_and_flags() {
    let steps = marketplace_steps();
    let names: Vec<&str> = steps.iter().map(|s| s.name()).collect();
    assert_eq!(
        names,
        [
            "market_structure",
            "marketplace_dynamics",
            "key_segments",
            "segment_examples",
            "strategic_recommendations",
            "next_steps",
            "executive_summary",
            "key_insights",
            "worker_journey",
            "marketplace_equilibrium",
            "behavioral_economics",
            "pricing_optimization",
            "network_effects",
            "longitudinal_trends",
            "retention_interventions",
            "cross_side_matching",
            "competitive_advantage",
            "decision_science",
        ]
    );
    for step in &steps {
        assert_eq!(step.output_file(), format!("{}.md", step.name()));
    }
    assert_eq!(steps.iter().filter(|s| s.is_required()).count(), 8);
}

#[test]
fn test_every_prompt_keeps_its_output_format() {
    let insights = sample_insights();
    let outputs = StepOutputs::new();
    for step in marketplace_steps() {
        let prompt = step.build_prompt(&insights, &outputs);
        assert!(prompt.contains("## Output Format"), "{} lacks output format", step.name());
    }
}

#[test]
fn test_structure_prompt_order_and_segment_limit() {
    let prompt = prompt_for(MARKET_STRUCTURE, &sample_insights(), &StepOutputs::new());

    let quality = prompt.find("Churn window is 30 days").unwrap();
    let summary = prompt.find("Supply - Active workers").unwrap();
    let segments = prompt.find("- seg 1").unwrap();
    let format = prompt.find("## Output Format").unwrap();
    assert!(quality < summary && summary < segments && segments < format);

    assert!(prompt.contains("- seg 5"));
    assert!(!prompt.contains("- seg 6"));
}

#[test]
fn test_dynamics_filters_summary_and_truncates_upstream() {
    let mut outputs = StepOutputs::new();
    outputs.insert(MARKET_STRUCTURE, "s".repeat(3000));
    let prompt = prompt_for(MARKETPLACE_DYNAMICS, &sample_insights(), &outputs);

    assert!(prompt.contains("- Demand - Fill rate: 82%"));
    assert!(!prompt.contains("Average pay"));
    assert!(!prompt.contains("Churn window is 30 days"));
    assert!(prompt.contains(&format!("{}...", "s".repeat(2500))));
    assert!(!prompt.contains(&"s".repeat(2501)));
}

#[test]
fn test_short_upstream_has_no_ellipsis() {
    let mut outputs = StepOutputs::new();
    outputs.insert(MARKET_STRUCTURE, "Short structure findings");
    let prompt = prompt_for(MARKETPLACE_DYNAMICS, &Insights::new(), &outputs);
    assert!(prompt.contains("Short structure findings\n"));
    assert!(!prompt.contains("Short structure findings..."));
}

#[test]
fn test_pricing_keeps_dollar_and_rate_entries() {
    let prompt = prompt_for(PRICING_OPTIMIZATION, &sample_insights(), &StepOutputs::new());
    assert!(prompt.contains("- Average pay $45/hour"));
    assert!(prompt.contains("- Demand - Fill rate: 82%"));
    assert!(!prompt.contains("Supply - Active workers"));
}

#[test]
fn test_decision_science_caps_metrics() {
    let mut insights = Insights::new();
    insights.extend(
        InsightCategory::MarketplaceSummary,
        (0..15).map(|i| format!("Metric {i} average")),
    );
    let prompt = prompt_for(DECISION_SCIENCE, &insights, &StepOutputs::new());
    assert!(prompt.contains("- Metric 9 average"));
    assert!(!prompt.contains("- Metric 10 average"));
}

#[test]
fn test_key_insights_reads_every_core_step() {
    let steps = marketplace_steps();
    let upstream = find_step(&steps, KEY_INSIGHTS).unwrap().upstream();
    assert_eq!(
        upstream,
        [
            "executive_summary",
            "market_structure",
            "marketplace_dynamics",
            "key_segments",
            "strategic_recommendations",
            "next_steps",
        ]
    );
}

#[test]
fn test_builders_are_pure() {
    let insights = sample_insights();
    let mut outputs = StepOutputs::new();
    outputs.insert(MARKET_STRUCTURE, "structure");
    for step in marketplace_steps() {
        assert_eq!(
            step.build_prompt(&insights, &outputs),
            step.build_prompt(&insights, &outputs)
        );
    }
}

#[test]
fn test_unknown_step() {
    let steps = marketplace_steps();
    let err = find_step(&steps, "horoscope").unwrap_err();
    assert_eq!(err.kind, NarrativeErrorKind::UnknownStep("horoscope".to_string()));
}
