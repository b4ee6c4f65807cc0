//! Human-readable labels for campaign-change fields and analytics metrics
//!
//! The backend reports raw LinkedIn Marketing API field names. Views show
//! the label instead, and group change labels into filter categories.

/// Campaign-change field names and their labels
const CHANGE_LABELS: &[(&str, &str)] = &[
    ("account", "Account"),
    ("associatedEntity", "Associated Entity"),
    ("audienceExpansionEnabled", "Audience Expansion"),
    ("campaignGroup", "Campaign Group"),
    ("costType", "Cost Type"),
    ("creativeSelection", "Creative Selection"),
    ("creatives", "Creatives"),
    ("dailyBudget", "Daily Budget"),
    ("format", "Format"),
    ("id", "ID"),
    ("locale", "Locale"),
    ("name", "Name"),
    ("objectiveType", "Objective Type"),
    ("offsiteDeliveryEnabled", "Offsite Delivery"),
    ("offsitePreferences", "Offsite Preferences"),
    ("optimizationTargetType", "Optimization Target Type"),
    ("pacingStrategy", "Pacing Strategy"),
    ("runSchedule", "Run Schedule"),
    ("servingStatuses", "Serving Statuses"),
    ("status", "Status"),
    ("storyDeliveryEnabled", "Story Delivery"),
    ("targetingCriteria", "Targeting Criteria"),
    ("test", "Test"),
    ("type", "Campaign Type"),
    ("unitCost", "Unit Cost"),
    ("version", "Version"),
];

/// Metric names shared by the organic and viral variants
const METRIC_LABELS: &[(&str, &str)] = &[
    ("actionClicks", "Action Clicks"),
    ("adUnitClicks", "Ad Unit Clicks"),
    ("approximateMemberReach", "Approximate Member Reach"),
    ("cardClicks", "Card Clicks"),
    ("cardImpressions", "Card Impressions"),
    ("clicks", "Clicks"),
    ("commentLikes", "Comment Likes"),
    ("comments", "Comments"),
    ("companyPageClicks", "Company Page Clicks"),
    ("conversionValueInLocalCurrency", "Conversion Value (Local Currency)"),
    ("costInLocalCurrency", "Cost (Local Currency)"),
    ("costInUsd", "Cost (USD)"),
    ("costPerQualifiedLead", "Cost Per Qualified Lead"),
    ("documentCompletions", "Document Completions"),
    ("documentFirstQuartileCompletions", "Document First Quartile Completions"),
    ("documentMidpointCompletions", "Document Midpoint Completions"),
    ("documentThirdQuartileCompletions", "Document Third Quartile Completions"),
    ("downloadClicks", "Download Clicks"),
    ("externalWebsiteConversions", "External Website Conversions"),
    ("externalWebsitePostClickConversions", "External Website Post-Click Conversions"),
    ("externalWebsitePostViewConversions", "External Website Post-View Conversions"),
    ("follows", "Follows"),
    ("fullScreenPlays", "Full Screen Plays"),
    ("headlineClicks", "Headline Clicks"),
    ("headlineImpressions", "Headline Impressions"),
    ("impressions", "Impressions"),
    ("jobApplications", "Job Applications"),
    ("jobApplyClicks", "Job Apply Clicks"),
    ("landingPageClicks", "Landing Page Clicks"),
    ("leadGenerationMailContactInfoShares", "Lead Generation Mail Contact Info Shares"),
    ("leadGenerationMailInterestedClicks", "Lead Generation Mail Interested Clicks"),
    ("likes", "Likes"),
    ("oneClickLeadFormOpens", "One-Click Lead Form Opens"),
    ("oneClickLeads", "One-Click Leads"),
    ("opens", "Opens"),
    ("otherEngagements", "Other Engagements"),
    ("pivotValues", "Pivot Values"),
    ("postClickJobApplications", "Post-Click Job Applications"),
    ("postClickJobApplyClicks", "Post-Click Job Apply Clicks"),
    ("postClickRegistrations", "Post-Click Registrations"),
    ("postViewJobApplications", "Post-View Job Applications"),
    ("postViewJobApplyClicks", "Post-View Job Apply Clicks"),
    ("postViewRegistrations", "Post-View Registrations"),
    ("qualifiedLeads", "Qualified Leads"),
    ("reactions", "Reactions"),
    ("registrations", "Registrations"),
    ("sends", "Sends"),
    ("shares", "Shares"),
    ("talentLeads", "Talent Leads"),
    ("textUrlClicks", "Text URL Clicks"),
    ("totalEngagements", "Total Engagements"),
    ("validWorkEmailLeads", "Valid Work Email Leads"),
    ("videoCompletions", "Video Completions"),
    ("videoFirstQuartileCompletions", "Video First Quartile Completions"),
    ("videoMidpointCompletions", "Video Midpoint Completions"),
    ("videoStarts", "Video Starts"),
    ("videoThirdQuartileCompletions", "Video Third Quartile Completions"),
    ("videoViews", "Video Views"),
];

/// Metrics that have a `viral*` counterpart reported by the API
const VIRAL_METRICS: &[&str] = &[
    "cardClicks",
    "cardImpressions",
    "clicks",
    "commentLikes",
    "comments",
    "companyPageClicks",
    "documentCompletions",
    "documentFirstQuartileCompletions",
    "documentMidpointCompletions",
    "documentThirdQuartileCompletions",
    "downloadClicks",
    "externalWebsiteConversions",
    "externalWebsitePostClickConversions",
    "externalWebsitePostViewConversions",
    "follows",
    "fullScreenPlays",
    "impressions",
    "jobApplications",
    "jobApplyClicks",
    "landingPageClicks",
    "likes",
    "oneClickLeadFormOpens",
    "oneClickLeads",
    "otherEngagements",
    "postClickJobApplications",
    "postClickJobApplyClicks",
    "postClickRegistrations",
    "postViewJobApplications",
    "postViewJobApplyClicks",
    "postViewRegistrations",
    "reactions",
    "registrations",
    "shares",
    "totalEngagements",
    "videoCompletions",
    "videoFirstQuartileCompletions",
    "videoMidpointCompletions",
    "videoStarts",
    "videoThirdQuartileCompletions",
    "videoViews",
];

/// Filter groups for the change history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeCategory {
    /// Budgets, bids, cost caps, spend type
    Budget,
    /// Audience targeting
    Audience,
    /// Objective, location and language
    ObjectiveLocationLanguage,
    /// Ad type
    AdType,
    /// Status and name changes
    NameStatus,
    /// Creative statuses, names, rotation
    Creatives,
}

impl ChangeCategory {
    pub const ALL: [ChangeCategory; 6] = [
        ChangeCategory::Budget,
        ChangeCategory::Audience,
        ChangeCategory::ObjectiveLocationLanguage,
        ChangeCategory::AdType,
        ChangeCategory::NameStatus,
        ChangeCategory::Creatives,
    ];

    /// Filter key used by the history view
    pub fn key(self) -> &'static str {
        match self {
            ChangeCategory::Budget => "budget",
            ChangeCategory::Audience => "audience",
            ChangeCategory::ObjectiveLocationLanguage => "objLocLang",
            ChangeCategory::AdType => "adType",
            ChangeCategory::NameStatus => "nameStatus",
            ChangeCategory::Creatives => "creatives",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ChangeCategory::Budget => "Budget",
            ChangeCategory::Audience => "Audience",
            ChangeCategory::ObjectiveLocationLanguage => "Objective, Location & Language",
            ChangeCategory::AdType => "Ad Type",
            ChangeCategory::NameStatus => "Name & Status",
            ChangeCategory::Creatives => "Creatives",
        }
    }

    /// Change labels that belong to this category
    pub fn labels(self) -> &'static [&'static str] {
        match self {
            ChangeCategory::Budget => {
                &["Daily Budget", "Unit Cost", "Cost Type", "Pacing Strategy"]
            }
            ChangeCategory::Audience => &["Targeting Criteria", "Audience Expansion"],
            ChangeCategory::ObjectiveLocationLanguage => {
                &["Objective Type", "Location", "Language", "Locale"]
            }
            ChangeCategory::AdType => &["Format", "Ad Type", "Campaign Type"],
            ChangeCategory::NameStatus => &["Status", "Name", "Campaign Group"],
            ChangeCategory::Creatives => &["Creatives", "Creative Selection", "Creative Rotation"],
        }
    }

    /// Category a change label belongs to, if any
    pub fn of(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.labels().contains(&label))
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.key() == key)
    }
}

fn lookup(table: &[(&str, &'static str)], field: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, label)| *label)
}

/// Label for a campaign-change field
pub fn change_label(field: &str) -> Option<&'static str> {
    lookup(CHANGE_LABELS, field)
}

/// Label for an analytics metric, including `viral*` variants
pub fn metric_label(field: &str) -> Option<String> {
    if let Some(label) = lookup(METRIC_LABELS, field) {
        return Some(label.to_string());
    }

    let base = viral_base(field)?;
    if !VIRAL_METRICS.contains(&base.as_str()) {
        return None;
    }
    lookup(METRIC_LABELS, &base).map(|label| format!("Viral {label}"))
}

/// Label to show for any field: change label, then metric label, then the
/// raw name
pub fn display_label(field: &str) -> String {
    change_label(field)
        .map(String::from)
        .or_else(|| metric_label(field))
        .unwrap_or_else(|| field.to_string())
}

// "viralCardClicks" -> "cardClicks"
fn viral_base(field: &str) -> Option<String> {
    let rest = field.strip_prefix("viral")?;
    let mut chars = rest.chars();
    let first = chars.next()?;
    if !first.is_ascii_uppercase() {
        return None;
    }
    Some(first.to_ascii_lowercase().to_string() + chars.as_str())
}
