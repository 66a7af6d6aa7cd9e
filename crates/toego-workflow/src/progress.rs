//! Derived progress views over an edit session.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use toego_domain::{EditPhase, EditSession};

/// Read-only progress summary, suitable for a dashboard or a store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// Rounded percentage of phases entered; 100 exactly at final approval
    pub percentage: u32,
    /// Display labels of the phases strictly after the current one
    pub remaining_phases: Vec<String>,
    /// Coarse completion estimate; `None` until at least one phase has
    /// completed
    pub estimated_completion: Option<String>,
}

pub fn phase_progress(session: &EditSession) -> Progress {
    let total = EditPhase::ORDER.len();
    let index = session.current_phase.index();
    let percentage = (100.0 * (index + 1) as f64 / total as f64).round() as u32;
    let remaining_phases: Vec<String> = EditPhase::ORDER[index + 1..]
        .iter()
        .map(|p| p.display_name().to_string())
        .collect();
    let estimated_completion = estimate_completion(session, remaining_phases.len());
    Progress {
        percentage,
        remaining_phases,
        estimated_completion,
    }
}

/// Mean completed-phase duration times phases left. With no completed phase
/// there is nothing to extrapolate from, so no estimate is given.
fn estimate_completion(session: &EditSession, phases_left: usize) -> Option<String> {
    if phases_left == 0 {
        return None;
    }
    let durations: Vec<Duration> = session
        .phases
        .iter()
        .filter_map(|r| r.completed_at.map(|done| done - r.started_at))
        .collect();
    if durations.is_empty() {
        return None;
    }
    let total = durations
        .iter()
        .fold(Duration::zero(), |acc, d| acc + *d);
    let mean_secs = total.num_seconds() / durations.len() as i64;
    let remaining_secs = mean_secs.max(0) * phases_left as i64;
    Some(format_remaining(remaining_secs))
}

fn format_remaining(secs: i64) -> String {
    const HOUR: i64 = 3_600;
    const DAY: i64 = 86_400;
    if secs < HOUR {
        "<1h".to_string()
    } else if secs < DAY {
        format!("~{}h", (secs + HOUR / 2) / HOUR)
    } else {
        let days = (secs + DAY / 2) / DAY;
        let date = (Utc::now() + Duration::seconds(secs)).format("%Y-%m-%d");
        format!("~{}d ({})", days, date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{advance_phase, create_session};
    use rstest::rstest;

    #[rstest]
    #[case(EditPhase::AiDraft, 14)]
    #[case(EditPhase::StructuralEdit, 29)]
    #[case(EditPhase::LineEdit, 43)]
    #[case(EditPhase::CopyEdit, 57)]
    #[case(EditPhase::Proofread, 71)]
    #[case(EditPhase::HumanReview, 86)]
    #[case(EditPhase::FinalApproval, 100)]
    fn percentage_per_phase(#[case] phase: EditPhase, #[case] expected: u32) {
        let mut session = create_session("project-1", "scene-1");
        while session.current_phase != phase {
            advance_phase(&mut session, 0).unwrap();
        }
        assert_eq!(phase_progress(&session).percentage, expected);
    }

    #[test]
    fn percentage_is_monotonic_and_caps_at_terminal() {
        let mut session = create_session("project-1", "scene-1");
        let mut last = phase_progress(&session).percentage;
        while session.current_phase != EditPhase::FinalApproval {
            advance_phase(&mut session, 0).unwrap();
            let now = phase_progress(&session).percentage;
            assert!(now > last);
            last = now;
        }
        assert_eq!(last, 100);
        assert!(phase_progress(&session).remaining_phases.is_empty());
    }

    #[test]
    fn remaining_phases_are_the_labels_after_current() {
        let session = create_session("project-1", "scene-1");
        let progress = phase_progress(&session);
        assert_eq!(progress.remaining_phases.len(), 6);
        assert_eq!(progress.remaining_phases[0], "Structural edit");
        assert_eq!(progress.remaining_phases[5], "Final approval");
    }

    #[test]
    fn no_estimate_without_completed_phases() {
        let session = create_session("project-1", "scene-1");
        assert_eq!(phase_progress(&session).estimated_completion, None);
    }

    #[test]
    fn estimate_buckets_from_completed_durations() {
        // Two completed 2h phases, four phases left: ~8h
        let mut session = create_session("project-1", "scene-1");
        advance_phase(&mut session, 0).unwrap();
        advance_phase(&mut session, 0).unwrap();
        let now = Utc::now();
        session.phases[0].started_at = now - Duration::hours(4);
        session.phases[0].completed_at = Some(now - Duration::hours(2));
        session.phases[1].started_at = now - Duration::hours(2);
        session.phases[1].completed_at = Some(now);

        let progress = phase_progress(&session);
        assert_eq!(progress.estimated_completion.as_deref(), Some("~8h"));
    }

    #[test]
    fn short_estimates_collapse_to_under_an_hour() {
        let mut session = create_session("project-1", "scene-1");
        advance_phase(&mut session, 0).unwrap();
        let now = Utc::now();
        session.phases[0].started_at = now - Duration::minutes(5);
        session.phases[0].completed_at = Some(now);

        let progress = phase_progress(&session);
        assert_eq!(progress.estimated_completion.as_deref(), Some("<1h"));
    }

    #[test]
    fn long_estimates_report_days_with_a_date() {
        let mut session = create_session("project-1", "scene-1");
        advance_phase(&mut session, 0).unwrap();
        let now = Utc::now();
        session.phases[0].started_at = now - Duration::hours(12);
        session.phases[0].completed_at = Some(now);

        // Five phases left at 12h each: 60h, rounds to three days
        let progress = phase_progress(&session);
        let estimate = progress.estimated_completion.unwrap();
        assert!(estimate.starts_with("~3d ("), "got {estimate}");
    }

    #[test]
    fn format_remaining_buckets() {
        assert_eq!(format_remaining(0), "<1h");
        assert_eq!(format_remaining(3_599), "<1h");
        assert_eq!(format_remaining(3_600), "~1h");
        assert_eq!(format_remaining(9_000), "~3h");
        assert!(format_remaining(200_000).starts_with("~2d ("));
    }
}
