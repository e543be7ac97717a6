use labyrinth_kernel::{MoveState, SessionStatus, SimulationWorld};
use serde::Serialize;

/// Read-only queries against a running session.
pub struct SimulationInspector;

impl SimulationInspector {
    pub fn summary(world: &SimulationWorld) -> SimulationSummary {
        let camera = world.camera();
        SimulationSummary {
            tick: world.tick(),
            seed: world.config().seed,
            status: world.session_status(),
            player_position: camera.position.to_array(),
            enemies: world.enemies().len(),
            projectiles: world.projectiles().len(),
            grenades: world.grenades().len(),
            particle_systems: world.particle_systems().len(),
            frozen: world.is_frozen(),
            flash_demo: world.flash_demo(),
            pending_events: world.events().len(),
            dropped_events: world.dropped_events(),
            state_hash: world.state_hash(),
        }
    }

    pub fn enemies(world: &SimulationWorld) -> Vec<EnemyInfo> {
        world
            .enemies()
            .iter()
            .map(|e| EnemyInfo {
                id: e.id.short(),
                position: e.position.to_array(),
                state: e.state,
                health: e.health,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulationSummary {
    pub tick: u64,
    pub seed: u64,
    pub status: SessionStatus,
    pub player_position: [f32; 3],
    pub enemies: usize,
    pub projectiles: usize,
    pub grenades: usize,
    pub particle_systems: usize,
    pub frozen: bool,
    pub flash_demo: bool,
    pub pending_events: usize,
    pub dropped_events: u64,
    pub state_hash: u64,
}

impl std::fmt::Display for SimulationSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [x, y, z] = self.player_position;
        write!(
            f,
            "Session: tick={} seed={} status={:?} player=({x:.2}, {y:.2}, {z:.2}) enemies={} projectiles={} grenades={} particle_systems={} frozen={} flash_demo={} pending_events={} dropped_events={} hash={:016x}",
            self.tick,
            self.seed,
            self.status,
            self.enemies,
            self.projectiles,
            self.grenades,
            self.particle_systems,
            self.frozen,
            self.flash_demo,
            self.pending_events,
            self.dropped_events,
            self.state_hash,
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EnemyInfo {
    pub id: String,
    pub position: [f32; 3],
    pub state: MoveState,
    pub health: u8,
}

impl std::fmt::Display for EnemyInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Enemy [{}] {:?} hp={} pos=({:.2}, {:.2}, {:.2})",
            self.id, self.state, self.health, self.position[0], self.position[1], self.position[2],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labyrinth_input::FrameInput;
    use labyrinth_kernel::SimulationConfig;

    #[test]
    fn summary_fresh_world() {
        let world = SimulationWorld::new(SimulationConfig::with_seed(3));
        let summary = SimulationInspector::summary(&world);
        assert_eq!(summary.tick, 0);
        assert_eq!(summary.seed, 3);
        assert_eq!(summary.enemies, 6);
        assert_eq!(summary.pending_events, 6);
        assert_eq!(summary.status, SessionStatus::Playing);
    }

    #[test]
    fn summary_tracks_advance() {
        let mut world = SimulationWorld::new(SimulationConfig::empty());
        world.advance(1.0 / 60.0, &FrameInput::idle().with_fire());
        let summary = SimulationInspector::summary(&world);
        assert_eq!(summary.tick, 1);
        assert_eq!(summary.projectiles, 1);
        assert_eq!(summary.state_hash, world.state_hash());
    }

    #[test]
    fn summary_reports_toggles() {
        use labyrinth_input::Action;

        let mut world = SimulationWorld::new(SimulationConfig::empty());
        assert!(!SimulationInspector::summary(&world).flash_demo);
        world.advance(1.0 / 60.0, &FrameInput::idle().with_action(Action::ToggleFlashDemo));
        let summary = SimulationInspector::summary(&world);
        assert!(summary.flash_demo);
        assert_eq!(summary.dropped_events, 0);
        assert!(summary.to_string().contains("flash_demo=true"));
    }

    #[test]
    fn enemy_listing() {
        let world = SimulationWorld::new(SimulationConfig::default());
        let enemies = SimulationInspector::enemies(&world);
        assert_eq!(enemies.len(), 6);
        assert!(enemies.iter().all(|e| e.health == 5 && e.state == MoveState::Idle));
        assert!(enemies[0].to_string().contains("hp=5"));
    }

    #[test]
    fn summary_display() {
        let world = SimulationWorld::new(SimulationConfig::default());
        let s = format!("{}", SimulationInspector::summary(&world));
        assert!(s.contains("tick=0"));
        assert!(s.contains("enemies=6"));
    }
}
