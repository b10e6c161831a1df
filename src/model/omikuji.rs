use serde::{Deserialize, Serialize};

use crate::model::fortune::FortuneOutcome;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum QuotaState {
    Allowed,
    Blocked,
}

#[derive(Copy, Clone, Debug)]
pub struct QuotaEvaluation {
    pub state: QuotaState,
    pub prior_count: i32,
    pub unlimited: bool,
}

/// A user draws without limit today iff they belong to this week's rotated
/// cohort or to the in-process daily lucky set.
pub fn unlimited_for(weekly_member: bool, lucky_member: bool) -> bool {
    weekly_member || lucky_member
}

/// The quota decision for one draw event. Anything past the first attempt
/// of the day is blocked unless the user is unlimited; blocked attempts are
/// not graded any further, the count only feeds the commentary label.
pub fn evaluate_quota(prior_count: i32, weekly_member: bool, lucky_member: bool) -> QuotaEvaluation {
    let unlimited = unlimited_for(weekly_member, lucky_member);
    let state = if unlimited || prior_count == 0 {
        QuotaState::Allowed
    } else {
        QuotaState::Blocked
    };
    QuotaEvaluation {
        state,
        prior_count,
        unlimited,
    }
}

pub fn attempt_label(prior_count: i32) -> &'static str {
    if prior_count <= 1 {
        "2回目"
    } else {
        "3回目以上"
    }
}

/// Stored outcome row for one (user, date) key.
#[derive(Deserialize, Serialize, sqlx::FromRow, Clone, Debug)]
pub struct DrawResult {
    pub result: String,
    pub message: String,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DrawResponse {
    Blocked {
        attempt: i32,
        comment: String,
    },
    Drawn {
        lucky_granted: bool,
        pre_comment: String,
        outcome: FortuneOutcome,
        post_comment: String,
    },
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct OutcomePayload {
    pub user_id: i64,
    #[serde(flatten)]
    pub payload: DrawResponse,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::lucky::DailyLuckyGate;
    use rand::rngs::mock::StepRng;

    #[test]
    fn unlimited_truth_table() {
        for weekly in [false, true] {
            for lucky in [false, true] {
                assert_eq!(unlimited_for(weekly, lucky), weekly || lucky);
                let evaluation = evaluate_quota(5, weekly, lucky);
                assert_eq!(evaluation.unlimited, weekly || lucky);
                let expected = if weekly || lucky {
                    QuotaState::Allowed
                } else {
                    QuotaState::Blocked
                };
                assert_eq!(evaluation.state, expected);
            }
        }
    }

    #[test]
    fn first_attempt_of_the_day_is_allowed() {
        let evaluation = evaluate_quota(0, false, false);
        assert_eq!(evaluation.state, QuotaState::Allowed);
        assert_eq!(evaluation.prior_count, 0);
    }

    #[test]
    fn second_attempt_is_blocked_without_unlimited() {
        let evaluation = evaluate_quota(1, false, false);
        assert_eq!(evaluation.state, QuotaState::Blocked);
        assert_eq!(evaluation.prior_count, 1);
    }

    #[test]
    fn lucky_grant_overrides_exhausted_quota() {
        let gate = DailyLuckyGate::new();
        let mut always_grant = StepRng::new(0, 0);
        assert!(gate.maybe_grant(42, &mut always_grant));

        let evaluation = evaluate_quota(2, false, gate.contains(42));
        assert_eq!(evaluation.state, QuotaState::Allowed);
    }

    #[test]
    fn escalation_labels_are_two_level() {
        assert_eq!(attempt_label(1), "2回目");
        assert_eq!(attempt_label(2), "3回目以上");
        assert_eq!(attempt_label(9), "3回目以上");
    }

    #[test]
    fn draw_response_is_tagged_by_status() {
        let blocked = DrawResponse::Blocked {
            attempt: 2,
            comment: "もう引いたやろ".to_string(),
        };
        let value = serde_json::to_value(&blocked).unwrap();
        assert_eq!(value["status"], "blocked");
        assert_eq!(value["attempt"], 2);

        let payload = OutcomePayload {
            user_id: 42,
            payload: blocked,
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["user_id"], 42);
        assert_eq!(value["status"], "blocked");
    }
}
