use dashmap::DashMap;
use rand::Rng;

use crate::shared::constants::DAILY_LUCKY_RATE;

/// Process-wide set of users granted unlimited draws for the rest of the
/// local day. Never persisted; the daily scheduler clears it at midnight
/// JST. All access goes through these accessors, concurrent draw handlers
/// never touch the map directly.
#[derive(Debug, Default)]
pub struct DailyLuckyGate {
    users: DashMap<i64, ()>,
}

impl DailyLuckyGate {
    pub fn new() -> Self {
        DailyLuckyGate {
            users: DashMap::new(),
        }
    }

    pub fn contains(&self, user_id: i64) -> bool {
        self.users.contains_key(&user_id)
    }

    /// Rolls the 1% same-day grant. Only called on an allowed draw for a
    /// user that is not already unlimited.
    pub fn maybe_grant(&self, user_id: i64, rng: &mut impl Rng) -> bool {
        if rng.gen::<f64>() < DAILY_LUCKY_RATE {
            self.users.insert(user_id, ());
            true
        } else {
            false
        }
    }

    pub fn reset_daily(&self) {
        self.users.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    #[test]
    fn forced_roll_grants_and_remembers() {
        let gate = DailyLuckyGate::new();
        let mut always_grant = StepRng::new(0, 0);
        assert!(!gate.contains(1));
        assert!(gate.maybe_grant(1, &mut always_grant));
        assert!(gate.contains(1));
    }

    #[test]
    fn losing_roll_grants_nothing() {
        let gate = DailyLuckyGate::new();
        let mut never_grant = StepRng::new(u64::MAX, 0);
        assert!(!gate.maybe_grant(1, &mut never_grant));
        assert!(!gate.contains(1));
    }

    #[test]
    fn daily_reset_clears_every_grant() {
        let gate = DailyLuckyGate::new();
        let mut always_grant = StepRng::new(0, 0);
        gate.maybe_grant(1, &mut always_grant);
        gate.maybe_grant(2, &mut always_grant);

        gate.reset_daily();

        // A day-D grant no longer exempts the user on day D+1.
        assert!(!gate.contains(1));
        assert!(!gate.contains(2));
    }
}
