//! Canned funding assistant.
//!
//! Replies are chosen by keyword, not generated. Attachments always win;
//! otherwise the first matching topic in [`Topic::detect`] order is used.

use serde::{Deserialize, Serialize};

/// File metadata sent along with a chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Attachment {
    pub name: String,
    /// Size in bytes.
    pub size: u64,
}

/// What a reply is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    DocumentReview,
    Opportunities,
    Pitch,
    Application,
    General,
}

impl Topic {
    /// Pick the topic for a message.
    pub fn detect(input: &str, attachments: &[Attachment]) -> Self {
        if !attachments.is_empty() {
            return Self::DocumentReview;
        }
        let lower = input.to_lowercase();
        if lower.contains("grant") || lower.contains("fund") {
            Self::Opportunities
        } else if lower.contains("pitch") || lower.contains("deck") {
            Self::Pitch
        } else if lower.contains("application") {
            Self::Application
        } else {
            Self::General
        }
    }
}

/// Produce the assistant's answer to one message.
pub fn reply(input: &str, attachments: &[Attachment]) -> (Topic, String) {
    let topic = Topic::detect(input, attachments);
    let text = match topic {
        Topic::DocumentReview => {
            let plural = if attachments.len() > 1 { "s" } else { "" };
            format!(
                "Thanks for the document{plural}. I'll analyze structure, clarity, and alignment \
                 with funding criteria. I'll highlight strengths, gaps, and provide a prioritized \
                 revision checklist. Would you like me to focus on budget, impact, or team \
                 sections first?"
            )
        }
        Topic::Opportunities => "Here are steps to identify suitable opportunities: 1) Clarify \
             stage, sector, region, and ticket size. 2) Use our Opportunities page to filter by \
             eligibility. 3) Shortlist 5–8 targets and align timelines. I can draft a \
             prioritized list based on your profile. Shall I proceed?"
            .to_string(),
        Topic::Pitch => "I can review your pitch for narrative, traction, and clarity. Share your \
             deck or paste key sections. I'll provide slide-by-slide suggestions and a concise \
             investor summary."
            .to_string(),
        Topic::Application => "Let's work through your application. Which section are you on? \
             I can propose responses, tighten language, and ensure alignment with evaluation \
             criteria."
            .to_string(),
        Topic::General => "Got it. I can suggest opportunities, craft outreach, refine your \
             pitch, or guide applications. Tell me your goal and constraints (timeline, target \
             amount, sector, region)."
            .to_string(),
    };
    (topic, text)
}

/// Human-readable byte size: `512 B`, `1.5 KB`, `2.0 MB`.
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let kb = bytes as f64 / 1024.0;
    if kb < 1024.0 {
        return format!("{kb:.1} KB");
    }
    format!("{:.1} MB", kb / 1024.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> Attachment {
        Attachment {
            name: name.into(),
            size: 2048,
        }
    }

    #[test]
    fn attachments_take_priority() {
        let (topic, text) = reply("help with my grant", &[file("a.pdf")]);
        assert_eq!(topic, Topic::DocumentReview);
        assert!(text.starts_with("Thanks for the document. "));

        let (_, text) = reply("", &[file("a.pdf"), file("b.pdf")]);
        assert!(text.starts_with("Thanks for the documents. "));
    }

    #[test]
    fn keyword_order() {
        assert_eq!(Topic::detect("Find FUNDING for my pitch", &[]), Topic::Opportunities);
        assert_eq!(Topic::detect("review my deck", &[]), Topic::Pitch);
        assert_eq!(Topic::detect("my application is stuck", &[]), Topic::Application);
        assert_eq!(Topic::detect("hello", &[]), Topic::General);
    }

    #[test]
    fn reply_text_has_no_broken_wrapping() {
        let (_, text) = reply("grant", &[]);
        assert!(!text.contains("  "));
        assert!(text.contains("Shortlist 5–8 targets"));
        let (_, text) = reply("anything", &[]);
        assert!(text.ends_with("(timeline, target amount, sector, region)."));
    }

    #[test]
    fn sizes() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
    }
}
