//! The marketplace report: eighteen steps from market structure to decision
//! science.
//!
//! The first eight steps carry the core narrative and are required. The
//! remaining ten are specialised analyses whose failure only drops their
//! section from the report.

use crate::step::StepSpec;
use crate::template::{Excerpt, InsightSection, PromptTemplate};
use almanac_core::InsightCategory;

/// Step name of the market structure analysis.
pub const MARKET_STRUCTURE: &str = "market_structure";
/// Step name of the marketplace dynamics analysis.
pub const MARKETPLACE_DYNAMICS: &str = "marketplace_dynamics";
/// Step name of the segment analysis.
pub const KEY_SEGMENTS: &str = "key_segments";
/// Step name of the segment personas.
pub const SEGMENT_EXAMPLES: &str = "segment_examples";
/// Step name of the cross-analysis recommendations.
pub const STRATEGIC_RECOMMENDATIONS: &str = "strategic_recommendations";
/// Step name of the research roadmap.
pub const NEXT_STEPS: &str = "next_steps";
/// Step name of the executive summary.
pub const EXECUTIVE_SUMMARY: &str = "executive_summary";
/// Step name of the key insight digest.
pub const KEY_INSIGHTS: &str = "key_insights";
/// Step name of the worker journey analysis.
pub const WORKER_JOURNEY: &str = "worker_journey";
/// Step name of the equilibrium analysis.
pub const MARKETPLACE_EQUILIBRIUM: &str = "marketplace_equilibrium";
/// Step name of the behavioral economics analysis.
pub const BEHAVIORAL_ECONOMICS: &str = "behavioral_economics";
/// Step name of the pricing strategy analysis.
pub const PRICING_OPTIMIZATION: &str = "pricing_optimization";
/// Step name of the network effects analysis.
pub const NETWORK_EFFECTS: &str = "network_effects";
/// Step name of the longitudinal analysis.
pub const LONGITUDINAL_TRENDS: &str = "longitudinal_trends";
/// Step name of the retention analysis.
pub const RETENTION_INTERVENTIONS: &str = "retention_interventions";
/// Step name of the matching analysis.
pub const CROSS_SIDE_MATCHING: &str = "cross_side_matching";
/// Step name of the competitive advantage analysis.
pub const COMPETITIVE_ADVANTAGE: &str = "competitive_advantage";
/// Step name of the decision science analysis.
pub const DECISION_SCIENCE: &str = "decision_science";

const STRUCTURE_HEADING: &str = "From Step 1 (Market Structure)";
const DYNAMICS_HEADING: &str = "From Step 2 (Market Dynamics)";
const SEGMENTS_HEADING: &str = "From Step 3 (Key Segments)";
const RECOMMENDATIONS_HEADING: &str = "From Step 4 (Strategic Recommendations)";
const PREVIOUS_ANALYSIS: &str = "## Previous Analysis";

/// The full report pipeline in execution order.
///
/// # Examples
///
/// ```
/// use almanac_narrative::{marketplace_steps, validate_steps};
///
/// let steps = marketplace_steps();
/// assert_eq!(steps.len(), 18);
/// assert!(validate_steps(&steps).is_ok());
/// assert!(steps[..8].iter().all(|s| s.is_required()));
/// assert!(steps[8..].iter().all(|s| !s.is_required()));
/// ```
pub fn marketplace_steps() -> Vec<StepSpec> {
    vec![
        StepSpec::required(MARKET_STRUCTURE, "Key Metrics & Patterns", market_structure()),
        StepSpec::required(MARKETPLACE_DYNAMICS, "Marketplace Dynamics", marketplace_dynamics()),
        StepSpec::required(KEY_SEGMENTS, "Key Customer Segments", key_segments()),
        StepSpec::required(SEGMENT_EXAMPLES, "Segment Examples", segment_examples()),
        StepSpec::required(
            STRATEGIC_RECOMMENDATIONS,
            "Strategic Recommendations",
            strategic_recommendations(),
        ),
        StepSpec::required(NEXT_STEPS, "Next Steps", next_steps()),
        StepSpec::required(EXECUTIVE_SUMMARY, "Executive Summary", executive_summary()),
        StepSpec::required(KEY_INSIGHTS, "Key Insights", key_insights()),
        StepSpec::optional(WORKER_JOURNEY, "Worker Journey Analysis", worker_journey()),
        StepSpec::optional(
            MARKETPLACE_EQUILIBRIUM,
            "Marketplace Equilibrium",
            marketplace_equilibrium(),
        ),
        StepSpec::optional(
            BEHAVIORAL_ECONOMICS,
            "Behavioral Economics Factors",
            behavioral_economics(),
        ),
        StepSpec::optional(
            PRICING_OPTIMIZATION,
            "Pricing Optimization Strategy",
            pricing_optimization(),
        ),
        StepSpec::optional(NETWORK_EFFECTS, "Network Effects & Flywheel", network_effects()),
        StepSpec::optional(LONGITUDINAL_TRENDS, "Longitudinal Trends", longitudinal_trends()),
        StepSpec::optional(
            RETENTION_INTERVENTIONS,
            "Retention Interventions",
            retention_interventions(),
        ),
        StepSpec::optional(
            CROSS_SIDE_MATCHING,
            "Cross-Side Matching Optimization",
            cross_side_matching(),
        ),
        StepSpec::optional(
            COMPETITIVE_ADVANTAGE,
            "Sustainable Competitive Advantage",
            competitive_advantage(),
        ),
        StepSpec::optional(DECISION_SCIENCE, "Decision Science Frameworks", decision_science()),
    ]
}

fn section(category: InsightCategory, heading: &str) -> InsightSection {
    InsightSection::all(category, heading)
}

fn market_structure() -> PromptTemplate {
    PromptTemplate::new(
        r#"# Marketplace Analysis Step 1: Market Structure and Network Performance

You are a strategic consultant analyzing a two-sided healthcare staffing marketplace in which workers book per diem shifts at healthcare facilities. Extract meaningful insights about marketplace efficiency, performance bottlenecks and strategic opportunities.

## Context and Data Rules
Workers see shift offers in an app showing location, duration and pay rate. They can claim shifts and cancel bookings; facilities can delete shifts.

IMPORTANT: follow these rules when interpreting the data:
1. Each raw row is a shift offer (a view), not a unique shift. Shift-level metrics such as fill rate must be aggregated by shift id first.
2. A shift can have several workers assigned, so do not assume a one-to-one relationship between shifts and workers.
3. Worker churn uses the 30-day standard: a worker is churned after 30 days of inactivity.
4. Repeated offers of the same shift to the same worker must reflect real price changes, not system artifacts.

## Your Analysis Task
Conduct a rigorous structural analysis of the marketplace:

1. Market Concentration - distribution of activity across workers and workplaces
2. Matching Efficiency - how well the marketplace connects supply and demand
3. Conversion Funnel - each stage from shift posting to completion
4. Price-Volume Relationships - how pay rates affect key marketplace metrics
5. Marketplace Liquidity - transaction volume and matching speed"#,
        r#"

## Analysis Framework
1. Power Law Distribution Analysis - how concentrated is activity among top participants?
2. Market Clearing Efficiency - how well does supply meet demand across time and location?
3. Pareto Principle Validation - does an 80/20 distribution hold here?
4. Liquidity Analysis - are there enough participants for consistent matching?
5. Elasticity Modeling - how sensitive are key metrics to price and timing?
6. Funnel Optimization - where are the largest drop-offs?

## Output Format
Respond in markdown with these sections:
1. Data Quality Assessment
2. Market Structure and Concentration
3. Matching Efficiency Analysis
4. Conversion Funnel Performance
5. Price-Volume Relationships
6. Critical Performance Metrics
7. Strategic Opportunities and Risks

For each section give quantitative insights, patterns, strategic implications and optimization approaches."#,
    )
    .with_data_quality()
    .with_insights(
        "## Available Extracted Insights:",
        vec![
            section(InsightCategory::MarketplaceSummary, "Marketplace Summary Metrics"),
            section(InsightCategory::WorkerMetrics, "Worker Metrics"),
            section(InsightCategory::WorkplaceMetrics, "Workplace Metrics"),
            section(InsightCategory::Segments, "Market Segments").limited(5),
            section(InsightCategory::TimingPatterns, "Timing Patterns"),
            section(InsightCategory::PriceSensitivity, "Price Sensitivity Insights"),
        ],
    )
}

fn marketplace_dynamics() -> PromptTemplate {
    PromptTemplate::new(
        r#"# Marketplace Analysis Step 2: Dynamic Equilibrium and Market Forces

Building on the structural analysis from Step 1, examine the dynamic relationships and forces that drive marketplace behavior.

IMPORTANT:
1. Do not repeat the data quality assessment from Step 1; mention data issues only where they change the dynamic analysis.
2. Reference but do not restate the market structure findings.
3. Focus on new insights about dynamic patterns, not static structure.

## Your Analysis Task
1. Supply-Demand Balance - where and when do shortages or surpluses occur, and why?
2. Price Elasticity Patterns - how do segments respond to price changes, and where are the thresholds?
3. Temporal and Cyclical Patterns - how do dynamics change by hour, weekday and season?
4. Matching Velocity - what speeds up or slows down matching, and how does lead time matter?
5. Marketplace Frictions - what causes cancellations, deletions and no-shows?

Uncover causal mechanisms and feedback loops, not just correlations."#,
        r#"

## Analysis Framework
1. Dynamic Equilibrium Analysis
2. Price Response Functions
3. Temporal Pattern Recognition
4. Feedback Loop Identification
5. Friction-Point Mapping

## Output Format
Respond in markdown with these sections:
1. Impact of Data Structure on Dynamic Analysis (one paragraph at most)
2. Supply-Demand Dynamic Balance
3. Price Response Dynamics
4. Temporal and Cyclical Patterns
5. Marketplace Velocity and Efficiency
6. Friction Points and Transaction Failures
7. Strategic Recommendations for Dynamic Optimization"#,
    )
    .with_insights(
        "## Dynamics-Related Insights:",
        vec![
            section(InsightCategory::PriceSensitivity, "Price Sensitivity Insights"),
            section(InsightCategory::TimingPatterns, "Temporal Patterns"),
            section(InsightCategory::MarketplaceSummary, "Additional Market Dynamics").matching([
                "change", "time", "pattern", "rate", "trend", "demand", "supply",
            ]),
        ],
    )
    .with_excerpts(
        PREVIOUS_ANALYSIS,
        vec![Excerpt::new(MARKET_STRUCTURE, STRUCTURE_HEADING, 2500)],
    )
}

fn key_segments() -> PromptTemplate {
    PromptTemplate::new(
        r#"# Marketplace Analysis Step 3: Key Segments and Behavioral Patterns

Using the structure and dynamics analyses, identify the worker and workplace segments that matter most for marketplace performance.

## Your Analysis Task
1. Worker Segments - distinct groups by engagement, reliability, price sensitivity and timing preferences
2. Workplace Segments - distinct groups by posting behavior, pay practices, cancellation patterns and fill success
3. Segment Economics - which segments create or destroy marketplace value
4. Segment Interactions - which worker and workplace segments match well or poorly
5. Segment Migration - how participants move between segments over time"#,
        r#"

## Output Format
Respond in markdown with these sections:
1. Worker Segmentation - each segment's size, behavior and value
2. Workplace Segmentation - each segment's size, behavior and value
3. High-Value and At-Risk Segments
4. Cross-Segment Matching Patterns
5. Segment-Specific Opportunities

Quantify each segment wherever the data allows."#,
    )
    .with_insights(
        "## Segment-Related Insights:",
        vec![
            section(InsightCategory::Segments, "Identified Market Segments"),
            section(InsightCategory::WorkerMetrics, "Worker Metrics"),
            section(InsightCategory::WorkplaceMetrics, "Workplace Metrics"),
        ],
    )
    .with_excerpts(
        PREVIOUS_ANALYSIS,
        vec![
            Excerpt::new(MARKET_STRUCTURE, STRUCTURE_HEADING, 800),
            Excerpt::new(MARKETPLACE_DYNAMICS, DYNAMICS_HEADING, 800),
        ],
    )
}

fn segment_examples() -> PromptTemplate {
    PromptTemplate::new(
        r#"# Marketplace Analysis: Segment Examples and Profiles

Based on the segment analysis from Step 3, create illustrative examples and personas for the key segments so that product and business teams can act on them.

## Your Task
For each major segment, create a specific example that illustrates:

1. Typical behaviors and patterns
2. Key motivations and pain points
3. Concrete interactions with the marketplace
4. Strategic approaches to serve the segment better"#,
        r#"

## Output Format
Include at least:

1. Two or three worker segment examples, each with a descriptive name, background, typical behaviors, motivations, pain points and recommendations
2. Two or three workplace segment examples with the same structure
3. One or two cross-side matching examples explaining why a match works well or poorly and how to improve it

Each example must be clearly tied to the data-driven segments, not a generic persona."#,
    )
    .with_excerpts(
        "## Previous Segment Analysis",
        vec![Excerpt::new(KEY_SEGMENTS, SEGMENTS_HEADING, 2500)],
    )
}

fn strategic_recommendations() -> PromptTemplate {
    PromptTemplate::new(
        r#"# Marketplace Analysis Step 4: Cross-Analysis Insights and Limited Recommendations

Based on the analysis of marketplace structure (Step 1), dynamics (Step 2) and key segments (Step 3), develop integrated insights across these dimensions and a small set of strategic recommendations.

## Your Analysis Task
1. Cross-Cutting Patterns - connections between structure, dynamics and segments
2. Root Causes - underlying mechanisms that explain several observed patterns
3. Leverage Points - places where a small change would move many metrics
4. Strategic Recommendations - at most five, each tied to specific evidence"#,
        r#"

## Output Format
Respond in markdown with these sections:
1. Cross-Cutting Patterns (the bulk of the response)
2. Underlying Marketplace Mechanisms
3. Key Leverage Points
4. Limited Strategic Recommendations (no more than 20% of the response)

Keep recommendations grounded in the patterns identified above."#,
    )
    .with_excerpts(
        PREVIOUS_ANALYSIS,
        vec![
            Excerpt::new(MARKET_STRUCTURE, STRUCTURE_HEADING, 500),
            Excerpt::new(MARKETPLACE_DYNAMICS, DYNAMICS_HEADING, 500),
            Excerpt::new(KEY_SEGMENTS, SEGMENTS_HEADING, 1000),
        ],
    )
}

fn next_steps() -> PromptTemplate {
    PromptTemplate::new(
        r#"# Marketplace Analysis: Research and Investigation Next Steps

Based on the cross-analysis insights from Step 4, develop a research and investigation roadmap to complete before moving to implementation.

## Your Task
1. Identify the most important knowledge gaps revealed by the analysis
2. Prioritize areas where additional data would be most valuable
3. Propose hypothesis-driven research to confirm key insights
4. Outline analytical approaches that deepen understanding
5. Suggest limited experiments that test key assumptions"#,
        r#"

## Output Format
Respond in markdown with these sections:
1. Critical Knowledge Gaps
2. Priority Research Questions
3. Data Collection Needs
4. Proposed Analyses and Experiments
5. Sequencing and Dependencies

For each item state the hypothesis, the method and the decision it would inform."#,
    )
    .with_excerpts(
        "## Previous Cross-Analysis Insights",
        vec![Excerpt::new(STRATEGIC_RECOMMENDATIONS, RECOMMENDATIONS_HEADING, 2500)],
    )
}

fn executive_summary() -> PromptTemplate {
    PromptTemplate::new(
        r#"# Marketplace Analysis: Executive Summary

Create a concise, high-impact executive summary of the marketplace analysis for senior leadership. Distill only the most important findings.

## Your Task
1. Highlight only the critical marketplace insights, five to seven in total
2. Focus on data patterns and their business implications
3. Present the most surprising and counter-intuitive discoveries
4. Keep strategic direction brief, around 10-15% of the content

All prior analysis steps are complete. Synthesize them rather than repeat them, and use the cross-cutting patterns from Step 4 to choose what to highlight."#,
        r#"

## Output Format
1. Market Overview (two paragraphs at most)
2. Key Marketplace Insights (exactly five bullet points)
3. System Dynamics (two paragraphs at most)
4. Strategic Implications (exactly two bullet points)
5. Future Research (exactly two bullet points)

The whole summary must fit on a single printed page."#,
    )
    .with_excerpts(
        PREVIOUS_ANALYSIS,
        vec![Excerpt::new(STRATEGIC_RECOMMENDATIONS, RECOMMENDATIONS_HEADING, 1500)],
    )
}

fn key_insights() -> PromptTemplate {
    PromptTemplate::new(
        r#"# Marketplace Analysis: Key Insights Extraction

Review all prior analyses and extract the most important, non-obvious insights about how this marketplace works.

## Your Task
1. Select the ten most significant insights across all analyses
2. State each as a single clear finding with its supporting evidence
3. Explain why each matters for the business
4. Flag any insight that rests on uncertain data"#,
        r#"

## Output Format
A numbered list of ten insights. For each give:
- The insight in one sentence
- Supporting evidence with numbers where available
- Business significance
- Confidence level (high, medium or low)"#,
    )
    .with_excerpts(
        PREVIOUS_ANALYSIS,
        vec![
            Excerpt::new(EXECUTIVE_SUMMARY, "Executive Summary", 1000),
            Excerpt::new(MARKET_STRUCTURE, "Step 1: Market Structure", 800),
            Excerpt::new(MARKETPLACE_DYNAMICS, "Step 2: Market Dynamics", 800),
            Excerpt::new(KEY_SEGMENTS, "Step 3: Key Segments", 800),
            Excerpt::new(STRATEGIC_RECOMMENDATIONS, "Step 4: Strategic Recommendations", 800),
            Excerpt::new(NEXT_STEPS, "Implementation Next Steps", 800),
        ],
    )
}

fn worker_journey() -> PromptTemplate {
    PromptTemplate::new(
        r#"# Marketplace Analysis: Worker Journey and Lifecycle

Map the end-to-end worker journey through the marketplace, from first app open to long-term engagement or churn.

## Your Analysis Task
1. Onboarding and first claim - time to first claim and early drop-off
2. Engagement ramp - how claiming frequency develops over the first weeks
3. Habit formation - what distinguishes workers who become regulars
4. Friction moments - where workers cancel, stall or disengage
5. Churn and reactivation - signals that precede 30-day inactivity"#,
        r#"

## Output Format
1. Journey Stages and Conversion Rates
2. Critical Moments of Truth
3. Segment-Specific Journeys
4. Drop-Off Drivers
5. Journey Optimization Opportunities"#,
    )
    .with_insights(
        "## Worker-Specific Insights:",
        vec![
            section(InsightCategory::WorkerMetrics, "Worker Metrics"),
            section(InsightCategory::TimingPatterns, "Worker Timing Patterns")
                .matching(["worker", "claim"]),
        ],
    )
    .with_excerpts(
        PREVIOUS_ANALYSIS,
        vec![
            Excerpt::new(MARKET_STRUCTURE, STRUCTURE_HEADING, 800),
            Excerpt::new(MARKETPLACE_DYNAMICS, DYNAMICS_HEADING, 800),
            Excerpt::new(KEY_SEGMENTS, SEGMENTS_HEADING, 800),
        ],
    )
}

fn marketplace_equilibrium() -> PromptTemplate {
    PromptTemplate::new(
        r#"# Marketplace Analysis: Marketplace Equilibrium

Analyze how supply and demand reach, lose and regain balance in this marketplace.

## Your Analysis Task
1. Equilibrium conditions - when does the market clear and at what price levels?
2. Disequilibrium patterns - persistent shortages or surpluses by time, location or role
3. Adjustment mechanisms - how pay, timing and posting behavior restore balance
4. Stability - how quickly the market recovers from shocks"#,
        r#"

## Output Format
1. Current Equilibrium State
2. Sources of Imbalance
3. Adjustment Speed and Mechanisms
4. Interventions to Improve Market Clearing"#,
    )
    .with_insights(
        "## Equilibrium-Related Insights:",
        vec![
            section(InsightCategory::PriceSensitivity, "Price Sensitivity Insights"),
            section(InsightCategory::TimingPatterns, "Temporal Patterns"),
            section(InsightCategory::WorkplaceMetrics, "Workplace Metrics"),
        ],
    )
    .with_excerpts(
        PREVIOUS_ANALYSIS,
        vec![
            Excerpt::new(MARKET_STRUCTURE, STRUCTURE_HEADING, 800),
            Excerpt::new(MARKETPLACE_DYNAMICS, DYNAMICS_HEADING, 800),
        ],
    )
}

fn behavioral_economics() -> PromptTemplate {
    PromptTemplate::new(
        r#"# Marketplace Analysis: Behavioral Economics Factors

Examine the behavioral drivers behind worker and workplace decisions that pure price models miss.

## Your Analysis Task
1. Reference points and anchoring in how workers perceive pay rates
2. Loss aversion and commitment in claiming and cancellation behavior
3. Present bias in last-minute claiming and posting
4. Social proof and habit in repeat worker-workplace pairings
5. Choice architecture in how offers are presented"#,
        r#"

## Output Format
1. Key Behavioral Patterns Observed
2. Evidence From the Data
3. Segment Differences in Behavior
4. Behavioral Design Interventions"#,
    )
    .with_insights(
        "## Behavior-Related Insights:",
        vec![
            section(InsightCategory::PriceSensitivity, "Price Sensitivity Insights"),
            section(InsightCategory::TimingPatterns, "Behavioral Timing Patterns"),
            section(InsightCategory::Segments, "Segment Behaviors"),
        ],
    )
    .with_excerpts(
        PREVIOUS_ANALYSIS,
        vec![
            Excerpt::new(MARKETPLACE_DYNAMICS, DYNAMICS_HEADING, 800),
            Excerpt::new(KEY_SEGMENTS, SEGMENTS_HEADING, 800),
        ],
    )
}

fn pricing_optimization() -> PromptTemplate {
    PromptTemplate::new(
        r#"# Marketplace Analysis: Pricing Optimization Strategy

Develop a pricing strategy that improves fill rates and marketplace efficiency without overpaying.

## Your Analysis Task
1. Price elasticity by segment, time and lead time
2. Effectiveness of dynamic rate changes
3. Price thresholds that trigger claiming
4. Cost of unfilled shifts versus cost of higher rates"#,
        r#"

## Output Format
1. Current Pricing Effectiveness
2. Elasticity Findings
3. Recommended Pricing Rules
4. Experiments to Validate Pricing Changes"#,
    )
    .with_insights(
        "## Pricing-Related Insights:",
        vec![
            section(InsightCategory::PriceSensitivity, "Price Sensitivity Insights"),
            section(InsightCategory::MarketplaceSummary, "Additional Price-Related Metrics")
                .matching(["price", "rate", "$"]),
        ],
    )
    .with_excerpts(
        PREVIOUS_ANALYSIS,
        vec![
            Excerpt::new(MARKET_STRUCTURE, STRUCTURE_HEADING, 800),
            Excerpt::new(MARKETPLACE_DYNAMICS, DYNAMICS_HEADING, 800),
        ],
    )
}

fn network_effects() -> PromptTemplate {
    PromptTemplate::new(
        r#"# Marketplace Analysis: Network Effects and Flywheel

Assess the strength of network effects and the growth flywheel in this marketplace.

## Your Analysis Task
1. Cross-side effects - does more supply attract more demand and vice versa?
2. Same-side effects - competition or congestion among workers or workplaces
3. Local network density - how concentration shapes liquidity
4. Flywheel components and where the loop is weakest"#,
        r#"

## Output Format
1. Network Effect Strength
2. Concentration and Dependency Risks
3. Flywheel Map
4. Investments That Strengthen the Flywheel"#,
    )
    .with_insights(
        "## Network-Related Insights:",
        vec![
            section(
                InsightCategory::MarketplaceSummary,
                "Concentration and Network Metrics",
            )
            .matching(["concentration", "top"]),
            section(InsightCategory::WorkerMetrics, "Worker Network Metrics"),
            section(InsightCategory::WorkplaceMetrics, "Workplace Network Metrics"),
        ],
    )
    .with_excerpts(
        PREVIOUS_ANALYSIS,
        vec![
            Excerpt::new(MARKET_STRUCTURE, STRUCTURE_HEADING, 800),
            Excerpt::new(MARKETPLACE_DYNAMICS, DYNAMICS_HEADING, 800),
        ],
    )
}

fn longitudinal_trends() -> PromptTemplate {
    PromptTemplate::new(
        r#"# Marketplace Analysis: Longitudinal Trends

Analyze how the marketplace has evolved over the observed period.

## Your Analysis Task
1. Growth or decline in supply, demand and transactions
2. Shifts in fill rate, pay rates and lead times over time
3. Cohort behavior of workers and workplaces
4. Seasonality versus structural change"#,
        r#"

## Output Format
1. Major Trends
2. Cohort Findings
3. Seasonal Versus Structural Effects
4. Forward-Looking Risks and Opportunities"#,
    )
    .with_insights(
        "## Time-Related Insights:",
        vec![
            section(InsightCategory::TimingPatterns, "Temporal Patterns"),
            section(InsightCategory::MarketplaceSummary, "Marketplace Temporal Metrics").matching([
                "time", "day", "week", "month", "trend", "growth", "decline", "change",
            ]),
        ],
    )
    .with_excerpts(
        PREVIOUS_ANALYSIS,
        vec![Excerpt::new(MARKET_STRUCTURE, STRUCTURE_HEADING, 1200)],
    )
}

fn retention_interventions() -> PromptTemplate {
    PromptTemplate::new(
        r#"# Marketplace Analysis: Retention Interventions

Design interventions that retain valuable workers and workplaces.

## Your Analysis Task
1. Churn drivers for workers and workplaces using the 30-day definition
2. Early warning signals of disengagement
3. Value of retained participants over their lifetime
4. Interventions by segment and their expected impact"#,
        r#"

## Output Format
1. Retention Baseline
2. Churn Drivers and Warning Signals
3. Targeted Interventions by Segment
4. Measurement Plan"#,
    )
    .with_insights(
        "## Retention-Related Insights:",
        vec![
            section(InsightCategory::MarketplaceSummary, "Retention Metrics").matching([
                "retention", "churn", "repeat", "loyal", "lifetime", "ltv",
            ]),
            section(InsightCategory::WorkerMetrics, "Worker Retention Metrics"),
            section(InsightCategory::WorkplaceMetrics, "Workplace Retention Metrics"),
        ],
    )
    .with_excerpts(
        PREVIOUS_ANALYSIS,
        vec![
            Excerpt::new(MARKETPLACE_DYNAMICS, DYNAMICS_HEADING, 800),
            Excerpt::new(KEY_SEGMENTS, SEGMENTS_HEADING, 800),
        ],
    )
}

fn cross_side_matching() -> PromptTemplate {
    PromptTemplate::new(
        r#"# Marketplace Analysis: Cross-Side Matching Optimization

Analyze how workers and shifts are matched and how matching could be improved.

## Your Analysis Task
1. Match quality - which pairings lead to completion versus cancellation
2. Search and discovery - how workers find shifts
3. Recommendation and ranking opportunities
4. Repeat pairings and their effect on reliability"#,
        r#"

## Output Format
1. Current Matching Performance
2. High- and Low-Quality Match Patterns
3. Matching Algorithm Opportunities
4. Expected Impact and Tests"#,
    )
    .with_insights(
        "## Matching-Related Insights:",
        vec![
            section(InsightCategory::MarketplaceSummary, "Matching Metrics").matching([
                "match",
                "connect",
                "fill rate",
                "claim rate",
                "recommendation",
            ]),
            section(InsightCategory::WorkerMetrics, "Worker Matching Metrics"),
            section(InsightCategory::WorkplaceMetrics, "Workplace Matching Metrics"),
        ],
    )
    .with_excerpts(
        PREVIOUS_ANALYSIS,
        vec![
            Excerpt::new(MARKETPLACE_DYNAMICS, DYNAMICS_HEADING, 800),
            Excerpt::new(KEY_SEGMENTS, SEGMENTS_HEADING, 800),
        ],
    )
}

fn competitive_advantage() -> PromptTemplate {
    PromptTemplate::new(
        r#"# Marketplace Analysis: Sustainable Competitive Advantage

Identify which marketplace strengths are defensible and how to build durable advantage.

## Your Analysis Task
1. Current sources of advantage visible in the data
2. Vulnerabilities a competitor could exploit
3. Moats from network density, data and reliability
4. Strategic bets that compound over time"#,
        r#"

## Output Format
1. Current Advantages
2. Competitive Vulnerabilities
3. Moat-Building Opportunities
4. Long-Term Strategic Bets"#,
    )
    .with_excerpts(
        PREVIOUS_ANALYSIS,
        vec![
            Excerpt::new(MARKET_STRUCTURE, STRUCTURE_HEADING, 600),
            Excerpt::new(MARKETPLACE_DYNAMICS, DYNAMICS_HEADING, 600),
            Excerpt::new(KEY_SEGMENTS, SEGMENTS_HEADING, 600),
            Excerpt::new(STRATEGIC_RECOMMENDATIONS, RECOMMENDATIONS_HEADING, 600),
        ],
    )
}

fn decision_science() -> PromptTemplate {
    PromptTemplate::new(
        r#"# Marketplace Analysis: Decision Science Frameworks

Translate the analysis into decision frameworks operators can apply repeatedly.

## Your Analysis Task
1. Key recurring decisions in pricing, posting and outreach
2. Metrics and thresholds that should trigger each decision
3. Experimentation design for uncertain decisions
4. Trade-offs between fill rate, cost and worker experience"#,
        r#"

## Output Format
1. Decision Inventory
2. Metric Thresholds and Triggers
3. Experimentation Framework
4. Decision Trade-Off Guide"#,
    )
    .with_insights(
        "## Key Marketplace Metrics:",
        vec![
            section(InsightCategory::MarketplaceSummary, "Marketplace Key Metrics")
                .matching(["rate", "metric", "percentage", "ratio", "average"])
                .limited(10),
        ],
    )
    .with_excerpts(
        PREVIOUS_ANALYSIS,
        vec![
            Excerpt::new(MARKET_STRUCTURE, STRUCTURE_HEADING, 800),
            Excerpt::new(MARKETPLACE_DYNAMICS, DYNAMICS_HEADING, 800),
        ],
    )
}
