//! Adaptive neighbor scheduling for pairwise checks.
//!
//! Checking every pair of bodies on every tick costs O(n²). Instead each body
//! holds one [`NeighborLink`] per body it interacts with, counting down the
//! ticks until that pair is examined again. The wait after a check is the
//! time the two bodies would need to close the gap at their combined speed,
//! shortened further when the pair is strongly coupled by gravity.
//!
//! Links are built once, when the owning body is created, and never
//! recomputed. Links to bodies that have since died are skipped and dropped.

use rand::Rng;

use crate::types::{BodyId, MAX_CHECK_INTERVAL, STRONG_GRAVITY_THRESHOLD};

/// Scheduled check of one neighbor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NeighborLink {
    pub other: BodyId,
    pub frames_until_check: u32,
}

/// The neighbor links owned by a single body.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NeighborSet {
    links: Vec<NeighborLink>,
}

impl NeighborSet {
    /// Build links to `others`, spreading the first checks over `[0, n)` ticks.
    pub fn build(others: impl IntoIterator<Item = BodyId>, rng: &mut impl Rng) -> Self {
        let others: Vec<BodyId> = others.into_iter().collect();
        let n = others.len() as u32;
        let links = others
            .into_iter()
            .map(|other| NeighborLink {
                other,
                frames_until_check: rng.gen_range(0..n),
            })
            .collect();
        Self { links }
    }

    /// Count every link down by one tick (floored at zero) and return the
    /// neighbors whose check is due this tick.
    pub fn advance(&mut self) -> Vec<BodyId> {
        self.links
            .iter_mut()
            .filter_map(|link| {
                link.frames_until_check = link.frames_until_check.saturating_sub(1);
                (link.frames_until_check == 0).then_some(link.other)
            })
            .collect()
    }

    /// Add a link to a body created after this set was built.
    pub fn insert(&mut self, other: BodyId, frames_until_check: u32) {
        if self.get(other).is_none() {
            self.links.push(NeighborLink {
                other,
                frames_until_check,
            });
        }
    }

    /// Schedule the next check of `other` in `frames` ticks.
    pub fn rearm(&mut self, other: BodyId, frames: u32) {
        if let Some(link) = self.links.iter_mut().find(|link| link.other == other) {
            link.frames_until_check = frames.max(1);
        }
    }

    /// Stop scheduling `other`.
    pub fn remove(&mut self, other: BodyId) {
        self.links.retain(|link| link.other != other);
    }

    pub fn get(&self, other: BodyId) -> Option<&NeighborLink> {
        self.links.iter().find(|link| link.other == other)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NeighborLink> {
        self.links.iter()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

/// Ticks until a pair could plausibly close a gap of `distance`.
///
/// `max(1, round(distance / (speed_a + speed_b)))`, capped at
/// [`MAX_CHECK_INTERVAL`] so that pairs with no closing speed are still
/// revisited.
pub fn frames_to_close(distance: f64, speed_a: f64, speed_b: f64) -> u32 {
    let closing_speed = speed_a + speed_b;
    let frames = (distance / closing_speed).round();

    if !frames.is_finite() || frames >= MAX_CHECK_INTERVAL as f64 {
        return MAX_CHECK_INTERVAL;
    }
    (frames as u32).max(1)
}

/// Shorten `frames` for strongly coupled pairs.
///
/// When the scaled gravity between the pair exceeds
/// [`STRONG_GRAVITY_THRESHOLD`], the wait is divided by `amplification`.
/// A factor below one therefore lengthens the wait.
pub fn amplified_wait(frames: u32, scaled_force: f64, amplification: f64) -> u32 {
    if scaled_force <= STRONG_GRAVITY_THRESHOLD || amplification <= 0.0 {
        return frames.max(1);
    }

    let shortened = (frames as f64 / amplification).round();
    if !shortened.is_finite() || shortened >= MAX_CHECK_INTERVAL as f64 {
        return MAX_CHECK_INTERVAL;
    }
    (shortened as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn ids(range: std::ops::Range<u32>) -> Vec<BodyId> {
        range.map(BodyId).collect()
    }

    #[test]
    fn test_initial_counters_within_neighbor_count() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let set = NeighborSet::build(ids(1..9), &mut rng);
        assert_eq!(set.len(), 8);
        assert!(set.iter().all(|link| link.frames_until_check < 8));
    }

    #[test]
    fn test_empty_set_builds() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let set = NeighborSet::build(Vec::new(), &mut rng);
        assert!(set.is_empty());
    }

    #[test]
    fn test_advance_reports_due_links() {
        let mut set = NeighborSet {
            links: vec![
                NeighborLink { other: BodyId(1), frames_until_check: 0 },
                NeighborLink { other: BodyId(2), frames_until_check: 1 },
                NeighborLink { other: BodyId(3), frames_until_check: 3 },
            ],
        };

        assert_eq!(set.advance(), vec![BodyId(1), BodyId(2)]);
        assert_eq!(set.get(BodyId(3)).map(|l| l.frames_until_check), Some(2));

        set.rearm(BodyId(1), 5);
        set.rearm(BodyId(2), 0);
        assert_eq!(set.get(BodyId(2)).map(|l| l.frames_until_check), Some(1));

        assert_eq!(set.advance(), vec![BodyId(2)]);
        assert_eq!(set.advance(), vec![BodyId(3)]);
    }

    #[test]
    fn test_remove_stops_scheduling() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut set = NeighborSet::build(ids(1..4), &mut rng);
        set.remove(BodyId(2));
        assert!(set.get(BodyId(2)).is_none());
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_frames_to_close() {
        assert_eq!(frames_to_close(10.0, 0.5, 0.5), 10);
        assert_eq!(frames_to_close(0.01, 1.0, 1.0), 1);
        assert_eq!(frames_to_close(2.6, 1.0, 1.0), 1);
        assert_eq!(frames_to_close(1.0, 0.0, 0.0), MAX_CHECK_INTERVAL);
        assert_eq!(frames_to_close(1e9, 0.001, 0.0), MAX_CHECK_INTERVAL);
    }

    #[test]
    fn test_amplified_wait() {
        // Weak coupling leaves the wait alone
        assert_eq!(amplified_wait(500, 1e-6, 100.0), 500);
        // Strong coupling divides it
        assert_eq!(amplified_wait(500, 1e-3, 100.0), 5);
        // Never below one tick
        assert_eq!(amplified_wait(20, 1.0, 100.0), 1);
        // No amplification configured
        assert_eq!(amplified_wait(20, 1.0, 0.0), 20);
    }

    #[test]
    fn test_amplification_below_one_lengthens_wait() {
        assert_eq!(amplified_wait(4, 1.0, 0.5), 8);
        assert_eq!(amplified_wait(1, 1.0, 0.5), 2);
        // Still capped
        assert_eq!(amplified_wait(9_000, 1.0, 0.5), MAX_CHECK_INTERVAL);
    }
}
