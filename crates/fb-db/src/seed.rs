//! Demo-data seeding.
//!
//! Loads a fixed set of opportunities, investors, events, and a demo
//! founder's applications, outreach, profile, and analytics. Rows use stable
//! keys and `INSERT OR IGNORE`, so seeding twice leaves the database as it
//! was after the first run. The whole seed runs in one transaction.

use fb_core::{time, Error, Result};
use rusqlite::Connection;
use serde::Serialize;

/// Owner of every per-user fixture row.
pub const DEMO_USER_ID: &str = "demo_user_001";
pub const DEMO_USER_EMAIL: &str = "demo@fundboard.local";

/// Number of fixtures of each kind in the demo set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct SeedCounts {
    pub opportunities: usize,
    pub investors: usize,
    pub events: usize,
    pub applications: usize,
    pub documents: usize,
    pub outreach: usize,
    pub profile: usize,
    pub analytics: usize,
    pub saved: usize,
}

struct OpportunityFixture {
    id: &'static str,
    title: &'static str,
    kind: &'static str,
    industry: &'static str,
    location: &'static str,
    amount: (i64, i64),
    currency: &'static str,
    deadline: &'static str,
    eligibility: &'static str,
    description: &'static str,
    requirements: &'static [&'static str],
    process: &'static [&'static str],
    url: &'static str,
    score: i64,
}

const OPPORTUNITIES: &[OpportunityFixture] = &[
    OpportunityFixture {
        id: "opp_001",
        title: "Green Innovators Grant 2025",
        kind: "grant",
        industry: "Climate",
        location: "Global",
        amount: (50_000, 150_000),
        currency: "USD",
        deadline: "2025-12-15",
        eligibility: "Early-stage startups working on carbon reduction technologies.",
        description: "Support for startups developing scalable solutions that reduce greenhouse gas emissions. Includes mentorship, non-dilutive funding, and access to pilot partners.",
        requirements: &[
            "Incorporated entity under 5 years old",
            "MVP or validated prototype",
            "Impact measurement framework",
        ],
        process: &[
            "Online application (10 pages max)",
            "Initial screening call",
            "Panel review with domain experts",
            "Final decision and terms",
        ],
        url: "https://greeninnovators.org/apply",
        score: 92,
    },
    OpportunityFixture {
        id: "opp_002",
        title: "Helix Ventures Seed Program",
        kind: "vc",
        industry: "AI/ML",
        location: "United States",
        amount: (250_000, 2_000_000),
        currency: "USD",
        deadline: "2026-01-15",
        eligibility: "Technical founding teams with defensible AI moats.",
        description: "Pre-seed and seed checks with hands-on GTM help. Focus on applied AI in healthcare and enterprise automation.",
        requirements: &["2-3 founders", "Early traction or pilots", "Defensible IP or data advantage"],
        process: &["Warm intro preferred", "Partner meeting", "Technical diligence", "Term sheet"],
        url: "https://helix.vc/seed-program",
        score: 78,
    },
    OpportunityFixture {
        id: "opp_003",
        title: "Women in Fintech Angel Collective",
        kind: "angel",
        industry: "Fintech",
        location: "Europe",
        amount: (100_000, 500_000),
        currency: "EUR",
        deadline: "2025-12-01",
        eligibility: "Women-led fintech startups at MVP to early traction stage.",
        description: "Collective of operators and angels investing in inclusive financial innovation across Europe.",
        requirements: &["Female founder/CEO", "Operating in EEA/UK", "Product in market or pilot-ready"],
        process: &["Submit deck", "Screening committee", "Pitch to collective", "Syndication & close"],
        url: "https://womenfintech.angels/apply",
        score: 84,
    },
    OpportunityFixture {
        id: "opp_004",
        title: "Founders Growth Loan",
        kind: "loan",
        industry: "Enterprise",
        location: "United States",
        amount: (150_000, 1_000_000),
        currency: "USD",
        deadline: "2026-02-15",
        eligibility: "Post-revenue SaaS with >$25k MRR.",
        description: "Non-dilutive growth capital with flexible covenants for B2B SaaS. Rapid underwriting and founder-friendly terms.",
        requirements: &["$25k+ MRR", "12+ months runway post-fund", "US entity"],
        process: &["Submit financials", "Underwriting", "Offer", "Funds wired"],
        url: "https://foundersgrowth.com/apply",
        score: 70,
    },
    OpportunityFixture {
        id: "opp_005",
        title: "NSF Small Business Innovation Research",
        kind: "grant",
        industry: "AI/ML",
        location: "United States",
        amount: (275_000, 1_750_000),
        currency: "USD",
        deadline: "2026-03-15",
        eligibility: "US-owned small businesses developing innovative technologies.",
        description: "NSF SBIR supports research and development of innovative technologies with commercial potential.",
        requirements: &["US-owned small business", "Innovative R&D project", "Commercial potential"],
        process: &[
            "Phase I: Feasibility (6 months)",
            "Phase II: R&D (2 years)",
            "Phase III: Commercialization",
        ],
        url: "https://seedfund.nsf.gov/",
        score: 88,
    },
    OpportunityFixture {
        id: "opp_006",
        title: "ClimateTech Accelerator Fund",
        kind: "grant",
        industry: "Climate",
        location: "Global",
        amount: (100_000, 500_000),
        currency: "USD",
        deadline: "2025-12-30",
        eligibility: "Climate technology startups with proven early traction.",
        description: "Acceleration program with funding for climate tech startups focused on mitigation and adaptation.",
        requirements: &["Climate impact focus", "Early traction proven", "Scalable technology"],
        process: &["Online application", "Technical assessment", "Pitch day", "Program selection"],
        url: "https://climatetech.accelerator/fund",
        score: 90,
    },
];

struct InvestorFixture {
    id: &'static str,
    name: &'static str,
    kind: &'static str,
    stages: &'static [&'static str],
    industries: &'static [&'static str],
    geo: &'static [&'static str],
    funding: (i64, i64),
    portfolio: &'static [&'static str],
    email: &'static str,
    linkedin: &'static str,
    website: Option<&'static str>,
    match_score: i64,
}

const INVESTORS: &[InvestorFixture] = &[
    InvestorFixture {
        id: "inv_001",
        name: "GreenWave Ventures",
        kind: "vc",
        stages: &["seed", "series-a"],
        industries: &["ClimateTech", "SaaS"],
        geo: &["na", "eu"],
        funding: (250_000, 5_000_000),
        portfolio: &["EcoGrid", "TerraFlow", "Airspan"],
        email: "partners@greenwave.vc",
        linkedin: "https://linkedin.com/company/greenwave-ventures",
        website: Some("https://greenwave.vc"),
        match_score: 92,
    },
    InvestorFixture {
        id: "inv_002",
        name: "Nova Angels",
        kind: "angel",
        stages: &["pre-seed", "seed"],
        industries: &["AI", "Fintech", "Developer Tools"],
        geo: &["global"],
        funding: (25_000, 250_000),
        portfolio: &["CodeLift", "QubitPay", "SynthAI"],
        email: "intro@novaangels.com",
        linkedin: "https://linkedin.com/in/nova-angels",
        website: None,
        match_score: 84,
    },
    InvestorFixture {
        id: "inv_003",
        name: "Orion Strategic Capital",
        kind: "strategic",
        stages: &["series-a", "series-b", "growth"],
        industries: &["Healthcare", "BioTech"],
        geo: &["na", "eu", "asia"],
        funding: (2_000_000, 20_000_000),
        portfolio: &["BioPrime", "CareLoop"],
        email: "bd@orioncap.com",
        linkedin: "https://linkedin.com/company/orion-strategic",
        website: None,
        match_score: 77,
    },
    InvestorFixture {
        id: "inv_004",
        name: "Latitude Ventures",
        kind: "vc",
        stages: &["seed", "series-a", "series-b"],
        industries: &["Fintech", "SaaS"],
        geo: &["na", "latam"],
        funding: (500_000, 10_000_000),
        portfolio: &["Mintly", "LedgerIQ", "PayBeam"],
        email: "hello@latitude.vc",
        linkedin: "https://linkedin.com/company/latitude-ventures",
        website: None,
        match_score: 71,
    },
    InvestorFixture {
        id: "inv_005",
        name: "TechFounders Collective",
        kind: "angel",
        stages: &["seed", "series-a"],
        industries: &["AI/ML", "Developer Tools"],
        geo: &["na"],
        funding: (100_000, 1_000_000),
        portfolio: &["DevTools Pro", "AI Assistant", "CodeReview AI"],
        email: "founders@techfounders.co",
        linkedin: "https://linkedin.com/company/techfounders",
        website: None,
        match_score: 86,
    },
];

struct EventFixture {
    id: &'static str,
    title: &'static str,
    date: &'static str,
    location: &'static str,
    kind: &'static str,
    industries: &'static [&'static str],
    ai_recommended: bool,
    image_url: &'static str,
    description: &'static str,
    website_url: &'static str,
}

const EVENTS: &[EventFixture] = &[
    EventFixture {
        id: "evt_001",
        title: "SaaS Founders Pitch Night",
        date: "2025-12-14",
        location: "San Francisco, CA",
        kind: "pitch-competition",
        industries: &["SaaS"],
        ai_recommended: true,
        image_url: "https://images.unsplash.com/photo-1521737604893-d14cc237f11d?q=80&w=1200&auto=format&fit=crop",
        description: "Monthly pitch event for SaaS founders to present to VCs and angels.",
        website_url: "https://saasfounders.com/pitch-night",
    },
    EventFixture {
        id: "evt_002",
        title: "ClimateTech Investor Meetup",
        date: "2025-12-05",
        location: "Berlin, Germany",
        kind: "meetup",
        industries: &["ClimateTech"],
        ai_recommended: true,
        image_url: "https://images.unsplash.com/photo-1531415074968-036ba1b575da?q=80&w=1200&auto=format&fit=crop",
        description: "Networking event for climate tech startups and impact investors.",
        website_url: "https://climatetech.berlin/meetup",
    },
    EventFixture {
        id: "evt_003",
        title: "AI Innovators Summit",
        date: "2026-01-02",
        location: "New York, NY",
        kind: "conference",
        industries: &["AI", "Developer Tools"],
        ai_recommended: false,
        image_url: "https://images.unsplash.com/photo-1531297484001-80022131f5a1?q=80&w=1200&auto=format&fit=crop",
        description: "Annual conference showcasing the latest in AI innovation.",
        website_url: "https://aiinnovators.summit",
    },
];

struct ApplicationFixture {
    id: &'static str,
    opportunity_id: &'static str,
    name: &'static str,
    source: &'static str,
    amount_requested: i64,
    status: &'static str,
    submission_date: Option<&'static str>,
    deadline: &'static str,
    next_action: &'static str,
    insights: &'static str,
}

const APPLICATIONS: &[ApplicationFixture] = &[
    ApplicationFixture {
        id: "app_001",
        opportunity_id: "opp_001",
        name: "Clean Energy Pilot - Phase II",
        source: "DOE Innovation Fund",
        amount_requested: 350_000,
        status: "under_review",
        submission_date: Some("2025-06-12"),
        deadline: "2025-06-30",
        next_action: "Respond to reviewer questions",
        insights: "Strong alignment with funding priorities. Increase clarity on milestone KPIs to boost approval odds.",
    },
    ApplicationFixture {
        id: "app_002",
        opportunity_id: "opp_002",
        name: "Community Broadband Expansion",
        source: "NTIA Grants",
        amount_requested: 1_200_000,
        status: "submitted",
        submission_date: Some("2025-05-20"),
        deadline: "2025-07-01",
        next_action: "Await confirmation",
        insights: "Competitive category. Consider adding community impact metrics as an addendum if allowed.",
    },
    ApplicationFixture {
        id: "app_003",
        opportunity_id: "opp_003",
        name: "AgriTech Water Efficiency",
        source: "USDA Innovation Challenge",
        amount_requested: 220_000,
        status: "draft",
        submission_date: None,
        deadline: "2025-07-15",
        next_action: "Complete budget narrative",
        insights: "Draft stage. Use template: 'USDA Narrative v2' to speed up completion by ~45%.",
    },
    ApplicationFixture {
        id: "app_004",
        opportunity_id: "opp_005",
        name: "AI for Public Safety",
        source: "NSF - Secure & Trustworthy",
        amount_requested: 600_000,
        status: "rejected",
        submission_date: Some("2025-04-02"),
        deadline: "2025-04-01",
        next_action: "Review feedback; plan resubmission",
        insights: "Main gaps: evaluation plan rigor and ethics review. Add RCT design and IRB pre-approval.",
    },
    ApplicationFixture {
        id: "app_005",
        opportunity_id: "opp_006",
        name: "Decarbonized Logistics Network",
        source: "Private Foundation A",
        amount_requested: 900_000,
        status: "approved",
        submission_date: Some("2025-03-10"),
        deadline: "2025-03-01",
        next_action: "Post-award onboarding",
        insights: "Approval won with strong cost-benefit analysis. Use this framework for future applications.",
    },
];

/// (id, application, name, type, updated_at)
const DOCUMENTS: &[(&str, &str, &str, &str, &str)] = &[
    ("doc_001", "app_001", "Project_Proposal.pdf", "pdf", "2025-06-10"),
    ("doc_002", "app_001", "Budget.xlsx", "xls", "2025-06-09"),
    ("doc_003", "app_002", "Application_Form.docx", "docx", "2025-05-19"),
    ("doc_004", "app_004", "Reviewer_Feedback.pdf", "pdf", "2025-04-10"),
    ("doc_005", "app_005", "Final_Proposal.pdf", "pdf", "2025-03-05"),
    ("doc_006", "app_005", "Grant_Agreement.pdf", "pdf", "2025-03-15"),
];

/// (id, application, event, at, by)
const HISTORY: &[(&str, &str, &str, &str, Option<&str>)] = &[
    ("hist_001", "app_001", "Submitted application", "2025-06-12T10:15:00Z", Some("alex@boostfund.ai")),
    ("hist_002", "app_001", "Reviewer requested clarifications", "2025-06-18T14:42:00Z", None),
    ("hist_003", "app_002", "Submitted application", "2025-05-20T09:05:00Z", Some("alex@boostfund.ai")),
    ("hist_004", "app_004", "Submitted application", "2025-04-02T12:00:00Z", Some("alex@boostfund.ai")),
    ("hist_005", "app_004", "Decision received (Rejected)", "2025-05-12T08:15:00Z", None),
    ("hist_006", "app_005", "Submitted application", "2025-03-10T09:20:00Z", Some("alex@boostfund.ai")),
    ("hist_007", "app_005", "Decision received (Approved)", "2025-04-01T16:52:00Z", None),
];

/// (id, application, label, done)
const COMPLIANCE: &[(&str, &str, &str, bool)] = &[
    ("comp_001", "app_001", "Signed letters of support", true),
    ("comp_002", "app_001", "Environmental impact statement", false),
    ("comp_003", "app_001", "Financial audit (last FY)", true),
    ("comp_004", "app_002", "501(c)(3) verification", true),
    ("comp_005", "app_002", "Digital equity plan", true),
    ("comp_006", "app_003", "SAM.gov registration", false),
    ("comp_007", "app_004", "Ethics compliance checklist", false),
    ("comp_008", "app_005", "Bank details submitted", true),
    ("comp_009", "app_005", "Post-award reporting schedule", false),
];

struct OutreachFixture {
    id: &'static str,
    investor_id: &'static str,
    kind: &'static str,
    status: &'static str,
    subject: &'static str,
    message: &'static str,
    notes: &'static str,
    scheduled_date: Option<&'static str>,
    created_at: &'static str,
    updated_at: &'static str,
}

const OUTREACH: &[OutreachFixture] = &[
    OutreachFixture {
        id: "outreach_001",
        investor_id: "inv_001",
        kind: "message",
        status: "positive",
        subject: "Intro: CleanTech Startup - Seed Round",
        message: "We're building innovative carbon reduction technology and would love to share our vision...",
        notes: "Interested in learning more. Requested metrics on retention and unit economics.",
        scheduled_date: None,
        created_at: "2025-08-10T10:30:00Z",
        updated_at: "2025-08-10T10:30:00Z",
    },
    OutreachFixture {
        id: "outreach_002",
        investor_id: "inv_004",
        kind: "meeting",
        status: "neutral",
        subject: "Meeting Request - AI Safety Startup",
        message: "Would love to schedule a 30-minute intro call to discuss our AI safety platform.",
        notes: "Stage is a bit early; suggested to reconnect post next milestone.",
        scheduled_date: Some("2025-08-20T14:00:00Z"),
        created_at: "2025-08-18T09:15:00Z",
        updated_at: "2025-08-18T16:45:00Z",
    },
    OutreachFixture {
        id: "outreach_003",
        investor_id: "inv_002",
        kind: "pitch",
        status: "pending",
        subject: "Pitch Request - Nova Angels Demo Day",
        message: "We'd like to be considered for your upcoming demo day presentation.",
        notes: "Waiting for response",
        scheduled_date: None,
        created_at: "2025-11-15T11:20:00Z",
        updated_at: "2025-11-15T11:20:00Z",
    },
];

/// (id, opportunity)
const SAVED: &[(&str, &str)] = &[("saved_001", "opp_001"), ("saved_002", "opp_006")];

fn json(values: &[&str]) -> String {
    serde_json::to_string(values).unwrap_or_else(|_| "[]".to_string())
}

fn date(value: &str) -> Result<String> {
    time::normalize(value)
}

fn exec(conn: &Connection, sql: &str, params: impl rusqlite::Params) -> Result<()> {
    conn.execute(sql, params)
        .map(|_| ())
        .map_err(|e| Error::database(format!("seed failed: {e}")))
}

/// Insert the demo fixtures and return how many of each the set contains.
pub fn seed_demo_data(conn: &Connection) -> Result<SeedCounts> {
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| Error::database(e.to_string()))?;
    let now = time::now();

    exec(
        &tx,
        "INSERT OR IGNORE INTO users (id, name, email, email_verified, image, password_hash, created_at, updated_at)
         VALUES (?1, 'Alex Demo', ?2, 1, NULL, NULL, ?3, ?3)",
        rusqlite::params![DEMO_USER_ID, DEMO_USER_EMAIL, &now],
    )?;

    for o in OPPORTUNITIES {
        exec(
            &tx,
            "INSERT OR IGNORE INTO funding_opportunities
             (id, title, type, industry, location, amount_min, amount_max, currency, deadline,
              eligibility, description, requirements, process, url, score, is_active, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, 1, ?16, ?16)",
            rusqlite::params![
                o.id,
                o.title,
                o.kind,
                o.industry,
                o.location,
                o.amount.0,
                o.amount.1,
                o.currency,
                date(o.deadline)?,
                o.eligibility,
                o.description,
                json(o.requirements),
                json(o.process),
                o.url,
                o.score,
                &now,
            ],
        )?;
    }

    for i in INVESTORS {
        exec(
            &tx,
            "INSERT OR IGNORE INTO investors
             (id, name, type, stages, industries, geo, funding_min, funding_max, portfolio,
              email, linkedin, website, match_score, is_active, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, 1, ?14, ?14)",
            rusqlite::params![
                i.id,
                i.name,
                i.kind,
                json(i.stages),
                json(i.industries),
                json(i.geo),
                i.funding.0,
                i.funding.1,
                json(i.portfolio),
                i.email,
                i.linkedin,
                i.website,
                i.match_score,
                &now,
            ],
        )?;
    }

    for e in EVENTS {
        exec(
            &tx,
            "INSERT OR IGNORE INTO events
             (id, title, date, location, type, industries, ai_recommended, image_url,
              description, website_url, is_active, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, 1, ?11)",
            rusqlite::params![
                e.id,
                e.title,
                date(e.date)?,
                e.location,
                e.kind,
                json(e.industries),
                e.ai_recommended,
                e.image_url,
                e.description,
                e.website_url,
                &now,
            ],
        )?;
    }

    for a in APPLICATIONS {
        let submitted = a.submission_date.map(date).transpose()?;
        exec(
            &tx,
            "INSERT OR IGNORE INTO applications
             (id, user_id, opportunity_id, name, source, amount_requested, status,
              submission_date, deadline, next_action, insights, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12)",
            rusqlite::params![
                a.id,
                DEMO_USER_ID,
                a.opportunity_id,
                a.name,
                a.source,
                a.amount_requested,
                a.status,
                submitted,
                date(a.deadline)?,
                a.next_action,
                a.insights,
                &now,
            ],
        )?;
    }

    for (id, app, name, kind, updated) in DOCUMENTS {
        exec(
            &tx,
            "INSERT OR IGNORE INTO application_documents (id, application_id, name, type, url, updated_at)
             VALUES (?1, ?2, ?3, ?4, NULL, ?5)",
            rusqlite::params![id, app, name, kind, date(updated)?],
        )?;
    }

    for (id, app, event, at, by) in HISTORY {
        exec(
            &tx,
            "INSERT OR IGNORE INTO application_history (id, application_id, event, at, by)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![id, app, event, at, by],
        )?;
    }

    for (id, app, label, done) in COMPLIANCE {
        exec(
            &tx,
            "INSERT OR IGNORE INTO compliance_items (id, application_id, label, done)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![id, app, label, done],
        )?;
    }

    for o in OUTREACH {
        exec(
            &tx,
            "INSERT OR IGNORE INTO user_outreach
             (id, user_id, investor_id, type, status, subject, message, notes, scheduled_date,
              created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            rusqlite::params![
                o.id,
                DEMO_USER_ID,
                o.investor_id,
                o.kind,
                o.status,
                o.subject,
                o.message,
                o.notes,
                o.scheduled_date,
                o.created_at,
                o.updated_at,
            ],
        )?;
    }

    exec(
        &tx,
        "INSERT OR IGNORE INTO startup_profiles
         (id, user_id, name, tagline, stage, industry, region, funding_need, summary, website,
          is_public, created_at, updated_at)
         VALUES ('profile_001', ?1, 'EcoFlow Technologies',
                 'AI-powered carbon tracking for sustainable supply chains', 'seed', 'ClimateTech',
                 'na', 'Raising $1.5M seed round to accelerate growth', ?2,
                 'https://ecoflow.tech', 1, ?3, ?3)",
        rusqlite::params![
            DEMO_USER_ID,
            "EcoFlow uses AI to help enterprises track and reduce their carbon footprint across \
             complex supply chains. We work with Fortune 500 companies to provide real-time carbon \
             analytics and reduction recommendations.",
            &now,
        ],
    )?;

    exec(
        &tx,
        "INSERT OR IGNORE INTO analytics
         (id, user_id, date, total_matches, applications_in_progress, success_rate,
          potential_funding, outreach_count, positive_responses, readiness_score)
         VALUES ('analytics_001', ?1, ?2, 128, 9, 38, 1200000, 18, 7, 72)",
        rusqlite::params![DEMO_USER_ID, &now],
    )?;

    for (id, opp) in SAVED {
        exec(
            &tx,
            "INSERT OR IGNORE INTO user_saved_opportunities (id, user_id, opportunity_id, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![id, DEMO_USER_ID, opp, &now],
        )?;
    }

    tx.commit().map_err(|e| Error::database(e.to_string()))?;

    let counts = SeedCounts {
        opportunities: OPPORTUNITIES.len(),
        investors: INVESTORS.len(),
        events: EVENTS.len(),
        applications: APPLICATIONS.len(),
        documents: DOCUMENTS.len(),
        outreach: OUTREACH.len(),
        profile: 1,
        analytics: 1,
        saved: SAVED.len(),
    };
    tracing::info!(?counts, "demo data seeded");
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::init_memory_pool;
    use crate::queries::{applications, opportunities, profiles, saved};
    use fb_core::{ApplicationId, UserId};

    fn count(conn: &Connection, table: &str) -> i64 {
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn seeds_every_fixture() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        let counts = seed_demo_data(&conn).unwrap();

        assert_eq!(counts.opportunities, 6);
        assert_eq!(counts.investors, 5);
        assert_eq!(counts.events, 3);
        assert_eq!(counts.applications, 5);
        assert_eq!(counts.documents, 6);
        assert_eq!(counts.outreach, 3);
        assert_eq!(counts.saved, 2);

        assert_eq!(count(&conn, "funding_opportunities"), 6);
        assert_eq!(count(&conn, "application_history"), 7);
        assert_eq!(count(&conn, "compliance_items"), 9);
    }

    #[test]
    fn seeding_twice_is_a_no_op() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        seed_demo_data(&conn).unwrap();
        seed_demo_data(&conn).unwrap();

        assert_eq!(count(&conn, "users"), 1);
        assert_eq!(count(&conn, "applications"), 5);
        assert_eq!(count(&conn, "user_saved_opportunities"), 2);
        assert_eq!(count(&conn, "analytics"), 1);
    }

    #[test]
    fn fixtures_read_back_through_models() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        seed_demo_data(&conn).unwrap();
        let demo = UserId::from(DEMO_USER_ID.to_string());

        let top = opportunities::list_opportunities(&conn, &Default::default()).unwrap();
        assert_eq!(top[0].id.as_str(), "opp_001");
        assert_eq!(top[0].deadline, "2025-12-15T00:00:00Z");

        let detail = applications::get_application_detail(&conn, &ApplicationId::from("app_001".to_string()))
            .unwrap()
            .unwrap();
        assert_eq!(detail.documents.len(), 2);
        assert_eq!(detail.history[0].event, "Reviewer requested clarifications");
        assert_eq!(detail.compliance.len(), 3);

        assert_eq!(saved::count_saved(&conn, &demo).unwrap(), 2);
        let profile = profiles::get_profile(&conn, &profiles::ProfileKey::User(demo)).unwrap().unwrap();
        assert_eq!(profile.name, "EcoFlow Technologies");
    }
}
