//! Placeholder training data.
//!
//! Each synthetic traveler gets a random handful of badges and an archetype
//! drawn independently of them, so a classifier fit on this data cannot beat
//! the random-guess baseline by much.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::{Archetype, Badge, BadgeSet, UserRecord};

pub const MIN_BADGES: usize = 3;
pub const MAX_BADGES: usize = 7;

/// Draws a random subset of 3 to 7 distinct badges
pub fn random_badges<R: Rng>(rng: &mut R) -> BadgeSet {
    let count = rng.gen_range(MIN_BADGES..=MAX_BADGES);
    Badge::ALL.choose_multiple(rng, count).copied().collect()
}

/// Generates `count` synthetic users
pub fn generate_users<R: Rng>(count: usize, rng: &mut R) -> Vec<UserRecord> {
    (0..count)
        .map(|_| {
            let badges = random_badges(rng);
            let archetype = *Archetype::ALL
                .choose(rng)
                .unwrap_or(&Archetype::MindfulSeeker);
            UserRecord { badges, archetype }
        })
        .collect()
}
