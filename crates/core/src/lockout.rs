//! Brute-force lockout policy.
//!
//! An account is `Unlocked` or `Locked`; the state is derived from the
//! persisted `locked_until` column rather than stored. Five consecutive wrong
//! passwords lock the account for thirty minutes from the fifth failure. The
//! lock lapses on its own once `now >= locked_until`.

use chrono::Duration;

use crate::types::Timestamp;

/// Consecutive failed attempts that trigger a lock.
pub const MAX_FAILED_ATTEMPTS: i64 = 5;

/// Lock duration in minutes, measured from the failure that triggered it.
pub const LOCK_DURATION_MINS: i64 = 30;

/// Derived per-account login state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountState {
    Unlocked,
    Locked { until: Timestamp },
}

/// Evaluate the account state at `now`.
pub fn account_state(locked_until: Option<Timestamp>, now: Timestamp) -> AccountState {
    match locked_until {
        Some(until) if now < until => AccountState::Locked { until },
        _ => AccountState::Unlocked,
    }
}

/// The instant a lock triggered at `failed_at` lapses.
pub fn lock_deadline(failed_at: Timestamp) -> Timestamp {
    failed_at + Duration::minutes(LOCK_DURATION_MINS)
}

/// Attempts left before a lock, as reported to the client after a failure.
///
/// Zero once the failure has locked the account.
pub fn attempts_remaining(attempts: i64, locked: bool) -> i64 {
    if locked {
        0
    } else {
        (MAX_FAILED_ATTEMPTS - attempts).max(0)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn no_lock_is_unlocked() {
        assert_eq!(account_state(None, Utc::now()), AccountState::Unlocked);
    }

    #[test]
    fn future_lock_is_locked() {
        let now = Utc::now();
        let until = now + Duration::minutes(5);
        assert_eq!(
            account_state(Some(until), now),
            AccountState::Locked { until }
        );
    }

    #[test]
    fn lock_lapses_exactly_at_deadline() {
        let now = Utc::now();
        assert_eq!(account_state(Some(now), now), AccountState::Unlocked);
        assert_eq!(
            account_state(Some(now - Duration::seconds(1)), now),
            AccountState::Unlocked
        );
    }

    #[test]
    fn deadline_is_thirty_minutes_out() {
        let now = Utc::now();
        assert_eq!(lock_deadline(now) - now, Duration::minutes(30));
    }

    #[test]
    fn remaining_attempts_count_down_then_zero() {
        assert_eq!(attempts_remaining(1, false), 4);
        assert_eq!(attempts_remaining(4, false), 1);
        assert_eq!(attempts_remaining(5, true), 0);
        assert_eq!(attempts_remaining(9, false), 0);
    }
}
