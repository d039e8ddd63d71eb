//! Civic points.
//!
//! A monotonic reputation counter: citizens earn one point per successful
//! verification. There is no path that removes points.

use hazard_map_hazard_models::UserRole;

/// Points a citizen earns for one successful verification.
pub const VERIFICATION_REWARD: u32 = 1;

/// Points earned by an actor of `role` for one successful verification.
///
/// Coordinators and admins verify as part of their duties and earn none.
#[must_use]
pub const fn verification_reward(role: UserRole) -> u32 {
    if role.has_elevated_trust() {
        0
    } else {
        VERIFICATION_REWARD
    }
}

/// Adds `amount` to `current`, saturating at `u32::MAX`.
#[must_use]
pub const fn award(current: u32, amount: u32) -> u32 {
    current.saturating_add(amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn citizens_earn_one_point() {
        assert_eq!(verification_reward(UserRole::Citizen), 1);
        assert_eq!(verification_reward(UserRole::Coordinator), 0);
        assert_eq!(verification_reward(UserRole::Admin), 0);
    }

    #[test]
    fn award_never_wraps() {
        assert_eq!(award(4, 1), 5);
        assert_eq!(award(u32::MAX, 1), u32::MAX);
    }
}
