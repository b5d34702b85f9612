use std::collections::{HashMap, HashSet};

use crate::config::{QuotaConfig, RankDef};

/// Outcome of evaluating one member. Rendering (symbols, legend) lives in
/// `ui::report`; this module only decides the status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaStatus {
    OnLeave,
    Exempt,
    Met,
    MetReduced,
    NotMet,
}

/// Highest-authority rank the member holds, scanning the configured order.
/// A member with no recognized rank role is outside the evaluated population.
pub fn effective_rank<'a>(config: &'a QuotaConfig, roles: &HashSet<u64>) -> Option<&'a RankDef> {
    config.ranks.iter().find(|r| roles.contains(&r.role_id))
}

fn rank_index(config: &QuotaConfig, roles: &HashSet<u64>) -> Option<usize> {
    config.ranks.iter().position(|r| roles.contains(&r.role_id))
}

/// Whether the member's effective rank is within the `top` highest-authority
/// ranks. Used for both the supervisor and proxy checks.
pub fn holds_top_rank(config: &QuotaConfig, roles: &HashSet<u64>, top: usize) -> bool {
    rank_index(config, roles).is_some_and(|i| i < top)
}

/// Classify one member. Priority order: leave role, exempt rank, quota
/// comparison (halved when the reduced-quota role is held), then fail-closed
/// for ranks without a configured quota.
pub fn classify(
    config: &QuotaConfig,
    rank: &RankDef,
    roles: &HashSet<u64>,
    logged_hours: f64,
) -> QuotaStatus {
    if roles.contains(&config.leave_role_id) {
        return QuotaStatus::OnLeave;
    }
    if rank.exempt {
        return QuotaStatus::Exempt;
    }
    let Some(mut required) = rank.quota_hours else {
        return QuotaStatus::NotMet;
    };
    let reduced = roles.contains(&config.reduced_role_id);
    if reduced {
        required /= 2.0;
    }
    if logged_hours >= required {
        if reduced {
            QuotaStatus::MetReduced
        } else {
            QuotaStatus::Met
        }
    } else {
        QuotaStatus::NotMet
    }
}

/// One member's evaluation, ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberEvaluation {
    pub subject_id: u64,
    pub rank_name: String,
    pub hours: f64,
    pub status: QuotaStatus,
}

/// Evaluate a roster of `(subject_id, held role ids)` against the summed
/// logged hours. Returns the evaluations to display and the number of members
/// that produced any status at all. The caller clears the shift table only
/// when that count is nonzero; it includes exempt members that `show_exempt`
/// hides from the report, so the display policy never changes the clear
/// decision.
pub fn evaluate_roster(
    config: &QuotaConfig,
    roster: &[(u64, HashSet<u64>)],
    totals: &HashMap<i64, f64>,
) -> (Vec<MemberEvaluation>, usize) {
    let mut visible = Vec::new();
    let mut evaluated = 0usize;
    for (subject_id, roles) in roster {
        if let Some(unit) = config.unit_role_id {
            if !roles.contains(&unit) {
                continue;
            }
        }
        let Some(rank) = effective_rank(config, roles) else {
            continue;
        };
        let hours = totals.get(&(*subject_id as i64)).copied().unwrap_or(0.0);
        let status = classify(config, rank, roles, hours);
        evaluated += 1;
        if status == QuotaStatus::Exempt && !config.show_exempt {
            continue;
        }
        visible.push(MemberEvaluation {
            subject_id: *subject_id,
            rank_name: rank.name.clone(),
            hours,
            status,
        });
    }
    (visible, evaluated)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> QuotaConfig {
        let mut config = QuotaConfig::default();
        config.ranks = vec![
            RankDef { name: "Chief".into(), role_id: 100, quota_hours: None, exempt: true },
            RankDef { name: "Captain".into(), role_id: 101, quota_hours: Some(1.0), exempt: false },
            RankDef { name: "Trooper".into(), role_id: 102, quota_hours: Some(2.0), exempt: false },
            RankDef { name: "Cadet".into(), role_id: 103, quota_hours: None, exempt: false },
        ];
        config.leave_role_id = 200;
        config.reduced_role_id = 201;
        config.supervisor_rank_count = 2;
        config.proxy_rank_count = 1;
        config
    }

    fn roles(ids: &[u64]) -> HashSet<u64> {
        ids.iter().copied().collect()
    }

    #[test]
    fn effective_rank_prefers_highest_authority() {
        let config = test_config();
        let held = roles(&[102, 101]);
        assert_eq!(effective_rank(&config, &held).unwrap().name, "Captain");
        assert!(effective_rank(&config, &roles(&[999])).is_none());
    }

    #[test]
    fn top_rank_checks_respect_thresholds() {
        let config = test_config();
        // Captain is index 1: supervisor (top 2) but not proxy (top 1).
        let captain = roles(&[101]);
        assert!(holds_top_rank(&config, &captain, config.supervisor_rank_count));
        assert!(!holds_top_rank(&config, &captain, config.proxy_rank_count));
        assert!(!holds_top_rank(&config, &roles(&[102]), config.supervisor_rank_count));
        assert!(holds_top_rank(&config, &roles(&[100]), config.proxy_rank_count));
    }

    #[test]
    fn leave_wins_over_everything() {
        let config = test_config();
        let trooper = config.rank_by_name("Trooper").unwrap();
        let chief = config.rank_by_name("Chief").unwrap();
        // Even with quota exceeded, and even for an exempt rank.
        assert_eq!(classify(&config, trooper, &roles(&[102, 200]), 50.0), QuotaStatus::OnLeave);
        assert_eq!(classify(&config, chief, &roles(&[100, 200]), 0.0), QuotaStatus::OnLeave);
    }

    #[test]
    fn exempt_rank_skips_quota() {
        let config = test_config();
        let chief = config.rank_by_name("Chief").unwrap();
        assert_eq!(classify(&config, chief, &roles(&[100]), 0.0), QuotaStatus::Exempt);
    }

    #[test]
    fn quota_comparison_at_boundary() {
        let config = test_config();
        let trooper = config.rank_by_name("Trooper").unwrap();
        assert_eq!(classify(&config, trooper, &roles(&[102]), 2.0), QuotaStatus::Met);
        assert_eq!(classify(&config, trooper, &roles(&[102]), 1.99), QuotaStatus::NotMet);
        // 45m + 80m logged as 0.75 + 1.33 clears the 2.0h bar.
        assert_eq!(classify(&config, trooper, &roles(&[102]), 0.75 + 1.33), QuotaStatus::Met);
        assert_eq!(classify(&config, trooper, &roles(&[102]), 0.75), QuotaStatus::NotMet);
    }

    #[test]
    fn reduced_role_halves_threshold_with_distinct_marker() {
        let config = test_config();
        let trooper = config.rank_by_name("Trooper").unwrap();
        let held = roles(&[102, 201]);
        assert_eq!(classify(&config, trooper, &held, 1.0), QuotaStatus::MetReduced);
        assert_eq!(classify(&config, trooper, &held, 0.99), QuotaStatus::NotMet);
        // Meeting the full threshold still reports the reduced marker.
        assert_eq!(classify(&config, trooper, &held, 2.5), QuotaStatus::MetReduced);
    }

    #[test]
    fn rank_without_quota_fails_closed() {
        let config = test_config();
        let cadet = config.rank_by_name("Cadet").unwrap();
        assert_eq!(classify(&config, cadet, &roles(&[103]), 100.0), QuotaStatus::NotMet);
    }

    #[test]
    fn roster_without_ranked_members_evaluates_nobody() {
        let config = test_config();
        let roster = vec![(1u64, roles(&[999])), (2, roles(&[]))];
        let (visible, evaluated) = evaluate_roster(&config, &roster, &HashMap::new());
        // Zero evaluated means the caller must leave the table untouched.
        assert_eq!(evaluated, 0);
        assert!(visible.is_empty());
    }

    #[test]
    fn exempt_only_roster_still_counts_as_evaluated() {
        let config = test_config();
        let roster = vec![(1u64, roles(&[100]))];
        let (visible, evaluated) = evaluate_roster(&config, &roster, &HashMap::new());
        assert_eq!(evaluated, 1);
        assert_eq!(visible[0].status, QuotaStatus::Exempt);
    }

    #[test]
    fn hiding_exempt_members_does_not_change_the_evaluated_count() {
        let mut config = test_config();
        config.show_exempt = false;
        let roster = vec![(1u64, roles(&[100])), (2, roles(&[102]))];
        let (visible, evaluated) = evaluate_roster(&config, &roster, &HashMap::new());
        // The chief drops out of the report but still counts toward the
        // clear decision.
        assert_eq!(evaluated, 2);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].subject_id, 2);
    }

    #[test]
    fn evaluation_picks_up_logged_totals() {
        let config = test_config();
        let roster = vec![(7u64, roles(&[102]))];
        let totals = HashMap::from([(7i64, 2.58)]);
        let (visible, _) = evaluate_roster(&config, &roster, &totals);
        assert_eq!(visible[0].hours, 2.58);
        assert_eq!(visible[0].status, QuotaStatus::Met);
        assert_eq!(visible[0].rank_name, "Trooper");
    }

    #[test]
    fn unit_role_restricts_the_evaluated_population() {
        let mut config = test_config();
        config.unit_role_id = Some(300);
        let roster = vec![(1u64, roles(&[102, 300])), (2, roles(&[102]))];
        let (visible, evaluated) = evaluate_roster(&config, &roster, &HashMap::new());
        assert_eq!(evaluated, 1);
        assert_eq!(visible[0].subject_id, 1);
    }
}
