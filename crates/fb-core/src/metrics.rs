//! Dashboard metrics: application and outreach summaries, the readiness
//! score, the success funnel, KPI cards, and the pipeline chart series.
//!
//! Everything here is pure arithmetic over counts pulled from the database,
//! so the server can compute a dashboard from plain rows and tests can pin
//! the formulas without SQLite.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{ApplicationStatus, OutreachStatus};

/// Number of points in the pipeline chart.
pub const PIPELINE_POINTS: usize = 30;

const READINESS_SUGGESTIONS: [&str; 5] = [
    "Strengthen traction narrative with 2 new customer proofs.",
    "Clarify runway: attach 12-month cash flow projection.",
    "Tighten GTM milestones with measurable KPIs.",
    "Increase outreach activity to potential investors.",
    "Complete profile information for better AI matching.",
];

// ---------------------------------------------------------------------------
// DateRange
// ---------------------------------------------------------------------------

/// Reporting window requested by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub enum DateRange {
    #[serde(rename = "7d")]
    Week,
    #[default]
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "90d")]
    Quarter,
}

impl DateRange {
    /// Parse a query value; anything unrecognized falls back to 30 days.
    pub fn parse_or_default(value: Option<&str>) -> Self {
        match value {
            Some("7d") => Self::Week,
            Some("90d") => Self::Quarter,
            _ => Self::Month,
        }
    }

    pub fn days(&self) -> i64 {
        match self {
            Self::Week => 7,
            Self::Month => 30,
            Self::Quarter => 90,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Week => "7d",
            Self::Month => "30d",
            Self::Quarter => "90d",
        }
    }
}

// ---------------------------------------------------------------------------
// Summaries
// ---------------------------------------------------------------------------

/// Counts and totals over a user's applications.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSummary {
    pub total_applications: u32,
    pub approved_applications: u32,
    pub rejected_applications: u32,
    pub in_progress_applications: u32,
    pub total_requested: i64,
    pub approved_amount: i64,
    pub success_rate: u32,
}

impl ApplicationSummary {
    /// Summarize `(status, amount_requested)` pairs.
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (ApplicationStatus, i64)>,
    {
        let mut s = Self::default();
        for (status, amount) in rows {
            s.total_applications += 1;
            s.total_requested += amount;
            match status {
                ApplicationStatus::Approved => {
                    s.approved_applications += 1;
                    s.approved_amount += amount;
                }
                ApplicationStatus::Rejected => s.rejected_applications += 1,
                _ => {}
            }
            if status.is_in_progress() {
                s.in_progress_applications += 1;
            }
        }
        s.success_rate = if s.total_applications > 0 {
            (f64::from(s.approved_applications) / f64::from(s.total_applications) * 100.0).round()
                as u32
        } else {
            0
        };
        s
    }
}

/// Counts of a user's outreach by investor response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OutreachSummary {
    pub total: u32,
    pub positive: u32,
    pub neutral: u32,
    pub negative: u32,
    pub pending: u32,
}

impl OutreachSummary {
    pub fn from_statuses<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = OutreachStatus>,
    {
        let mut s = Self::default();
        for status in statuses {
            s.total += 1;
            match status {
                OutreachStatus::Positive => s.positive += 1,
                OutreachStatus::Neutral => s.neutral += 1,
                OutreachStatus::Negative => s.negative += 1,
                OutreachStatus::Pending => s.pending += 1,
            }
        }
        s
    }
}

// ---------------------------------------------------------------------------
// Readiness score
// ---------------------------------------------------------------------------

/// Capped weighted sum of funding activity, clamped to `0..=100`.
///
/// | component              | weight | cap |
/// |------------------------|--------|-----|
/// | applications           | 5      | 30  |
/// | approved applications  | 10     | -   |
/// | outreach               | 2      | 20  |
/// | saved opportunities    | 1      | 15  |
/// | positive responses     | 5      | -   |
pub fn readiness_score(apps: &ApplicationSummary, outreach: &OutreachSummary, saved: u32) -> u32 {
    let score = (apps.total_applications.saturating_mul(5)).min(30)
        + apps.approved_applications.saturating_mul(10)
        + (outreach.total.saturating_mul(2)).min(20)
        + saved.min(15)
        + outreach.positive.saturating_mul(5);
    score.min(100)
}

/// The first three readiness improvement suggestions.
pub fn readiness_suggestions() -> Vec<String> {
    READINESS_SUGGESTIONS
        .iter()
        .take(3)
        .map(|s| (*s).to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Charts and cards
// ---------------------------------------------------------------------------

/// One stage of the success funnel chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct FunnelStage {
    pub label: String,
    pub value: u32,
}

/// Success funnel. The "Awarded" stage is not capped.
pub fn success_funnel(apps: &ApplicationSummary) -> Vec<FunnelStage> {
    let total = apps.total_applications;
    let stage = |label: &str, value: u32| FunnelStage {
        label: label.to_string(),
        value,
    };
    vec![
        stage("Discovery", (total * 15 + 20).min(100)),
        stage("Qualified", (total * 12 + 10).min(100)),
        stage("Submitted", (total * 8 + 5).min(100)),
        stage("Interview", (apps.in_progress_applications * 6 + 3).min(100)),
        stage("Awarded", apps.approved_applications * 20),
    ]
}

/// One point of the pipeline line chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct PipelinePoint {
    pub x: u32,
    pub y: u32,
}

/// Thirty-day pipeline series: a sine wave with a late bump and up to ±5 of
/// jitter from `rng`, clamped to `0..=100`.
pub fn pipeline_series<R: Rng + ?Sized>(rng: &mut R) -> Vec<PipelinePoint> {
    (0..PIPELINE_POINTS)
        .rev()
        .map(|i| {
            let fi = i as f64;
            let bump = if i > 20 { 8.0 } else { 0.0 };
            let base = 30.0 + (fi / 3.0).sin() * 15.0 + bump;
            let jitter: f64 = rng.gen_range(-5.0..5.0);
            let y = (base + jitter).round().clamp(0.0, 100.0) as u32;
            PipelinePoint {
                x: (PIPELINE_POINTS - 1 - i) as u32,
                y,
            }
        })
        .collect()
}

/// Trend badge on a KPI card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct Trend {
    pub delta: String,
    pub up: bool,
}

/// A KPI card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct Kpi {
    pub id: String,
    pub label: String,
    pub value: String,
    pub sublabel: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<Trend>,
    pub icon: String,
}

/// Format a dollar amount in millions with at most two decimals (`$1.2M`).
pub fn format_millions(amount: i64) -> String {
    let millions = (amount as f64 / 1_000_000.0 * 100.0).round() / 100.0;
    format!("${millions}M")
}

/// The four KPI cards shown at the top of the dashboard.
pub fn kpis(apps: &ApplicationSummary, saved: u32) -> Vec<Kpi> {
    let trend = |delta: &str, up: bool| {
        Some(Trend {
            delta: delta.to_string(),
            up,
        })
    };
    vec![
        Kpi {
            id: "total-matches".into(),
            label: "Total Matches".into(),
            value: (saved + apps.total_applications).to_string(),
            sublabel: "This month".into(),
            trend: trend("+12%", true),
            icon: "ChartPie".into(),
        },
        Kpi {
            id: "applications-progress".into(),
            label: "Applications In Progress".into(),
            value: apps.in_progress_applications.to_string(),
            sublabel: "Across programs".into(),
            trend: None,
            icon: "PanelsTopLeft".into(),
        },
        Kpi {
            id: "success-rate".into(),
            label: "Success Rate".into(),
            value: format!("{}%", apps.success_rate),
            sublabel: "Last 90 days".into(),
            trend: trend("+6%", apps.success_rate > 30),
            icon: "TrendingUp".into(),
        },
        Kpi {
            id: "potential-funding".into(),
            label: "Potential Funding".into(),
            value: format_millions(apps.total_requested),
            sublabel: "Eligible amount".into(),
            trend: trend("+15%", true),
            icon: "ChartColumnBig".into(),
        },
    ]
}

/// A recent-activity feed entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct Activity {
    pub id: String,
    pub title: String,
    pub description: String,
    pub time: String,
    pub status: String,
}

/// Recent activity feed. The first entry names the application currently
/// under review, if any.
pub fn activities(under_review: Option<&str>) -> Vec<Activity> {
    let entry = |id: &str, title: String, description: &str, time: &str, status: &str| Activity {
        id: id.to_string(),
        title,
        description: description.to_string(),
        time: time.to_string(),
        status: status.to_string(),
    };
    vec![
        entry(
            "activity-1",
            format!(
                "Application moved to Review: {}",
                under_review.unwrap_or("Recent Application")
            ),
            "Reviewer assigned and initial screening completed.",
            "2h ago",
            "success",
        ),
        entry(
            "activity-2",
            "New match found: AI Innovation Fund".into(),
            "Score 84% match to your profile.",
            "Today, 9:14",
            "default",
        ),
        entry(
            "activity-3",
            "Investor intro available".into(),
            "Warm intro to TechVentures Capital partner.",
            "Yesterday",
            "success",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use ApplicationStatus::*;

    fn demo_apps() -> ApplicationSummary {
        ApplicationSummary::from_rows([
            (UnderReview, 350_000),
            (Submitted, 1_200_000),
            (Draft, 220_000),
            (Rejected, 600_000),
            (Approved, 900_000),
        ])
    }

    #[test]
    fn application_summary_counts() {
        let s = demo_apps();
        assert_eq!(s.total_applications, 5);
        assert_eq!(s.approved_applications, 1);
        assert_eq!(s.rejected_applications, 1);
        assert_eq!(s.in_progress_applications, 3);
        assert_eq!(s.total_requested, 3_270_000);
        assert_eq!(s.approved_amount, 900_000);
        assert_eq!(s.success_rate, 20);
    }

    #[test]
    fn empty_summary_has_zero_success_rate() {
        let s = ApplicationSummary::from_rows([]);
        assert_eq!(s, ApplicationSummary::default());
    }

    #[test]
    fn success_rate_rounds() {
        let s = ApplicationSummary::from_rows([(Approved, 1), (Approved, 1), (Draft, 1)]);
        assert_eq!(s.success_rate, 67);
    }

    #[test]
    fn readiness_of_demo_user() {
        let apps = demo_apps();
        let outreach = OutreachSummary::from_statuses([
            OutreachStatus::Positive,
            OutreachStatus::Neutral,
            OutreachStatus::Pending,
        ]);
        // 25 + 10 + 6 + 2 + 5
        assert_eq!(readiness_score(&apps, &outreach, 2), 48);
    }

    #[test]
    fn readiness_caps_each_component() {
        let apps = ApplicationSummary::from_rows((0..20).map(|_| (Draft, 0)));
        let outreach = OutreachSummary::from_statuses((0..50).map(|_| OutreachStatus::Pending));
        // 30 + 0 + 20 + 15 + 0
        assert_eq!(readiness_score(&apps, &outreach, 99), 65);
    }

    #[test]
    fn readiness_clamps_to_100() {
        let apps = ApplicationSummary::from_rows((0..10).map(|_| (Approved, 0)));
        let outreach = OutreachSummary::from_statuses((0..10).map(|_| OutreachStatus::Positive));
        assert_eq!(readiness_score(&apps, &outreach, 10), 100);
    }

    #[test]
    fn readiness_of_new_user_is_zero() {
        assert_eq!(
            readiness_score(&ApplicationSummary::default(), &OutreachSummary::default(), 0),
            0
        );
    }

    #[test]
    fn funnel_awarded_is_uncapped() {
        let apps = ApplicationSummary::from_rows((0..6).map(|_| (Approved, 0)));
        let funnel = success_funnel(&apps);
        assert_eq!(funnel.len(), 5);
        assert_eq!(funnel[0].value, 100);
        assert_eq!(funnel[3].value, 3);
        assert_eq!(funnel[4].label, "Awarded");
        assert_eq!(funnel[4].value, 120);
    }

    #[test]
    fn pipeline_series_shape_and_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let series = pipeline_series(&mut rng);
        assert_eq!(series.len(), PIPELINE_POINTS);
        for (idx, p) in series.iter().enumerate() {
            assert_eq!(p.x as usize, idx);
            assert!(p.y <= 100);
        }
    }

    #[test]
    fn pipeline_series_is_deterministic_for_seed() {
        let a = pipeline_series(&mut StdRng::seed_from_u64(1));
        let b = pipeline_series(&mut StdRng::seed_from_u64(1));
        assert_eq!(a, b);
    }

    #[test]
    fn millions_formatting() {
        assert_eq!(format_millions(3_270_000), "$3.27M");
        assert_eq!(format_millions(1_200_000), "$1.2M");
        assert_eq!(format_millions(2_000_000), "$2M");
        assert_eq!(format_millions(0), "$0M");
    }

    #[test]
    fn kpi_cards() {
        let cards = kpis(&demo_apps(), 2);
        assert_eq!(cards.len(), 4);
        assert_eq!(cards[0].value, "7");
        assert_eq!(cards[1].value, "3");
        assert!(cards[1].trend.is_none());
        assert_eq!(cards[2].value, "20%");
        assert!(!cards[2].trend.as_ref().unwrap().up);
        assert_eq!(cards[3].value, "$3.27M");
    }

    #[test]
    fn activity_feed_names_review() {
        let feed = activities(Some("Clean Energy Pilot"));
        assert_eq!(feed.len(), 3);
        assert_eq!(feed[0].title, "Application moved to Review: Clean Energy Pilot");
        assert!(activities(None)[0].title.ends_with("Recent Application"));
    }

    #[test]
    fn date_range_fallback() {
        assert_eq!(DateRange::parse_or_default(Some("7d")), DateRange::Week);
        assert_eq!(DateRange::parse_or_default(Some("90d")).days(), 90);
        assert_eq!(DateRange::parse_or_default(Some("1y")), DateRange::Month);
        assert_eq!(DateRange::parse_or_default(None).as_str(), "30d");
    }

    #[test]
    fn suggestions_are_first_three() {
        let s = readiness_suggestions();
        assert_eq!(s.len(), 3);
        assert!(s[0].starts_with("Strengthen traction"));
    }
}
