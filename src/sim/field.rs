//! The stream of pipes
//!
//! Pipes are kept in spawn order, which is also left-to-right screen order
//! since every pipe enters at the right edge and scrolls at the same speed.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{Obstacle, PipeLayout};

/// Result of a spawn attempt, as far as the collaborators care
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnOutcome {
    Spawned { id: u32, resumed: bool },
    /// The gap doesn't fit; `first` is true only for the first refusal in a row
    Suspended { first: bool, screen_height: f32, gap_height: f32 },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
    /// Ticks counted by the independent spawn cadence
    spawn_ticks: u64,
    /// Set while spawning is refused for bad geometry
    suspended: bool,
    next_id: u32,
}

impl ObstacleField {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Default::default()
        }
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Obstacle> {
        self.obstacles.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Obstacle> {
        self.obstacles.iter_mut()
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Drop every pipe and restart the spawn cadence
    pub fn clear(&mut self) {
        self.obstacles.clear();
        self.spawn_ticks = 0;
    }

    /// Independent cadence: due on the first tick and every `interval` ticks after
    pub fn spawn_due(&mut self, interval: u32) -> bool {
        let due = self.spawn_ticks % u64::from(interval.max(1)) == 0;
        self.spawn_ticks += 1;
        due
    }

    /// Append a new pipe at the right edge of `screen`.
    ///
    /// A screen too short for the gap is a configuration fault, not a crash:
    /// nothing is spawned and the field stays suspended until a spawn succeeds.
    pub fn spawn<R: Rng>(&mut self, rng: &mut R, screen: Vec2, layout: &PipeLayout) -> SpawnOutcome {
        match Obstacle::spawn(rng, self.next_id, screen, layout) {
            Ok(obstacle) => {
                let id = obstacle.id;
                self.next_id = self.next_id.wrapping_add(1);
                self.obstacles.push(obstacle);
                let resumed = std::mem::replace(&mut self.suspended, false);
                SpawnOutcome::Spawned { id, resumed }
            }
            Err(err) => {
                let first = !std::mem::replace(&mut self.suspended, true);
                if first {
                    log::warn!("Pipe spawning suspended: {err}");
                }
                SpawnOutcome::Suspended {
                    first,
                    screen_height: screen.y,
                    gap_height: layout.gap_height,
                }
            }
        }
    }

    /// Scroll every pipe left by its speed
    pub fn advance_all(&mut self) {
        for obstacle in &mut self.obstacles {
            obstacle.advance();
        }
    }

    /// Keep only pipes still (partly) on screen. Returns how many were dropped.
    pub fn remove_off_screen(&mut self) -> usize {
        let before = self.obstacles.len();
        self.obstacles.retain(|o| !o.is_off_screen());
        before - self.obstacles.len()
    }

    #[cfg(test)]
    pub(crate) fn push(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const LAYOUT: PipeLayout = PipeLayout {
        gap_height: 500.0,
        width: 160.0,
        speed: 12.0,
    };

    #[test]
    fn test_spawn_due_cadence() {
        let mut field = ObstacleField::new();
        let due: Vec<u64> = (0..200u64).filter(|_| field.spawn_due(90)).collect();
        assert_eq!(due.len(), 3); // ticks 0, 90, 180
        field.clear();
        assert!(field.spawn_due(90));
    }

    #[test]
    fn test_ids_increase_in_spawn_order() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut field = ObstacleField::new();
        let screen = Vec2::new(800.0, 1200.0);
        for _ in 0..3 {
            field.spawn(&mut rng, screen, &LAYOUT);
        }
        let ids: Vec<u32> = field.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_suspension_reported_once_then_resumes() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut field = ObstacleField::new();
        let short = Vec2::new(800.0, 900.0);

        let first = field.spawn(&mut rng, short, &LAYOUT);
        assert!(matches!(first, SpawnOutcome::Suspended { first: true, .. }));
        let second = field.spawn(&mut rng, short, &LAYOUT);
        assert!(matches!(second, SpawnOutcome::Suspended { first: false, .. }));
        assert!(field.is_empty());
        assert!(field.is_suspended());

        let ok = field.spawn(&mut rng, Vec2::new(800.0, 1200.0), &LAYOUT);
        assert_eq!(ok, SpawnOutcome::Spawned { id: 1, resumed: true });
        assert!(!field.is_suspended());
    }

    #[test]
    fn test_remove_keeps_survivors_in_order() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut field = ObstacleField::new();
        let screen = Vec2::new(800.0, 1200.0);
        for _ in 0..4 {
            field.spawn(&mut rng, screen, &LAYOUT);
        }
        // Push the first two and the last off screen
        for (i, obs) in field.iter_mut().enumerate() {
            if i != 2 {
                obs.x = -500.0;
            }
        }
        assert_eq!(field.remove_off_screen(), 3);
        let ids: Vec<u32> = field.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![3]);
    }
}
