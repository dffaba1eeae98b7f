//! The five smoke cases
//!
//! Each case is a pure function of a live session: exactly one DOM query and
//! one boolean assertion on its result. Cases share no state and may run in
//! any order.

use crate::config::ProbeTuning;
use crate::probe::Predicate;
use crate::session::PageSession;
use crate::suite::report::CaseStatus;
use crate::Error;

/// Report message when the skills/tools section is missing
pub const SKILLS_FAILURE_MESSAGE: &str = "Skills/Tools section not found in portfolio";

/// A single smoke case
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmokeCase {
    /// Document title carries one of the expected keywords
    PageLoad,
    /// The rendering canvas is present
    CanvasPresence,
    /// Enough navigation-like elements exist
    Navigation,
    /// Project listing text is present
    ProjectListing,
    /// Skills/tools section text is present
    SkillsSection,
}

impl SmokeCase {
    /// All cases, in reporting order
    pub const ALL: [SmokeCase; 5] = [
        SmokeCase::PageLoad,
        SmokeCase::CanvasPresence,
        SmokeCase::Navigation,
        SmokeCase::ProjectListing,
        SmokeCase::SkillsSection,
    ];

    /// Case name as reported
    pub fn name(&self) -> &'static str {
        match self {
            SmokeCase::PageLoad => "page_load",
            SmokeCase::CanvasPresence => "canvas_presence",
            SmokeCase::Navigation => "navigation",
            SmokeCase::ProjectListing => "project_listing",
            SmokeCase::SkillsSection => "skills_section",
        }
    }

    /// Run the case's probe and assertion against a live session
    ///
    /// `Err` means the query itself failed; an unmet assertion is an `Ok`
    /// outcome carrying the failure message.
    pub async fn run(
        &self,
        session: &dyn PageSession,
        tuning: &ProbeTuning,
    ) -> Result<CaseStatus, Error> {
        match self {
            SmokeCase::PageLoad => {
                let title = session.title().await?;
                if tuning.title_keywords.iter().any(|k| title.contains(k.as_str())) {
                    Ok(CaseStatus::Passed)
                } else {
                    Ok(CaseStatus::Failed {
                        message: format!(
                            "title '{}' contains none of {:?}",
                            title, tuning.title_keywords
                        ),
                    })
                }
            }

            SmokeCase::CanvasPresence => {
                let predicate = Predicate::Tag(tuning.canvas_tag.clone());
                let count = session.count(&predicate).await?;
                if count > 0 {
                    Ok(CaseStatus::Passed)
                } else {
                    Ok(CaseStatus::Failed {
                        message: format!("no <{}> element found", tuning.canvas_tag),
                    })
                }
            }

            SmokeCase::Navigation => {
                let predicate = Predicate::NavigationLike {
                    class_marker: tuning.nav_class_marker.clone(),
                };
                let count = session.count(&predicate).await?;
                if count >= tuning.nav_min_count {
                    Ok(CaseStatus::Passed)
                } else {
                    Ok(CaseStatus::Failed {
                        message: format!(
                            "navigation element count assertion failed: {} >= {}",
                            count, tuning.nav_min_count
                        ),
                    })
                }
            }

            SmokeCase::ProjectListing => {
                let predicate =
                    Predicate::TextContainsAny(vec![tuning.project_keyword.clone()]);
                let count = session.count(&predicate).await?;
                if count > 0 {
                    Ok(CaseStatus::Passed)
                } else {
                    Ok(CaseStatus::Failed {
                        message: format!(
                            "no element with text containing '{}' found",
                            tuning.project_keyword
                        ),
                    })
                }
            }

            SmokeCase::SkillsSection => {
                let predicate = Predicate::TextContainsAny(tuning.skills_keywords.clone());
                let count = session.count(&predicate).await?;
                if count > 0 {
                    Ok(CaseStatus::Passed)
                } else {
                    Ok(CaseStatus::Failed {
                        message: SKILLS_FAILURE_MESSAGE.to_string(),
                    })
                }
            }
        }
    }
}
