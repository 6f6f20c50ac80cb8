use crate::level::SpawnerConfig;

/// Tick-counted periodic hostile spawner driven by the level's `spawner`
/// section. At most one spawn per tick.
#[derive(Debug, Clone)]
pub struct HostileSpawner {
    interval_ticks: u32,
    ticks_since_spawn: u32,
    pub spawn_y: f32,
}

impl HostileSpawner {
    pub fn new(config: SpawnerConfig) -> Self {
        Self {
            interval_ticks: config.interval_ticks,
            ticks_since_spawn: 0,
            spawn_y: config.y,
        }
    }

    /// Count one tick; true when a hostile is due.
    pub fn tick(&mut self) -> bool {
        if self.interval_ticks == 0 {
            return false;
        }
        self.ticks_since_spawn += 1;
        if self.ticks_since_spawn >= self.interval_ticks {
            self.ticks_since_spawn = 0;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_per_interval() {
        let mut spawner = HostileSpawner::new(SpawnerConfig {
            interval_ticks: 40,
            y: 0.0,
        });
        let due: Vec<u32> = (1..=200).filter(|_| spawner.tick()).collect();
        assert_eq!(due, vec![40, 80, 120, 160, 200]);
    }

    #[test]
    fn zero_interval_never_fires() {
        let mut spawner = HostileSpawner::new(SpawnerConfig {
            interval_ticks: 0,
            y: 0.0,
        });
        assert!((0..100).all(|_| !spawner.tick()));
    }
}
