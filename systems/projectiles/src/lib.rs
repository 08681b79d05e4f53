#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that resolves projectiles against walls and enemies.

use gremlin_maze_core::{
    collision, Collision, Command, EnemyId, EnemyView, ProjectileId, ProjectileView, Tuning,
    WallView,
};

/// Projectile system that emits hit side effects, removals and travel.
#[derive(Debug, Default)]
pub struct Projectiles {
    killed: Vec<EnemyId>,
    spent: Vec<ProjectileId>,
}

impl Projectiles {
    /// Creates a new projectile system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves every projectile's next position and emits the resulting commands.
    ///
    /// Wall strikes and enemy kills are emitted as they are found. Removals
    /// follow once every projectile was examined, then survivors advance.
    /// An enemy killed earlier in the pass is not hit again.
    pub fn handle(
        &mut self,
        tuning: &Tuning,
        projectiles: &ProjectileView,
        walls: &WallView,
        enemies: &EnemyView,
        out: &mut Vec<Command>,
    ) {
        if projectiles.is_empty() {
            return;
        }

        self.killed.clear();
        self.spent.clear();

        for projectile in projectiles.iter() {
            let next = projectile.position.advanced(
                projectile.direction,
                tuning.projectile_speed_px,
                tuning.tile_size_px,
            );

            let mut spent = match collision::resolve(walls.iter(), next) {
                Collision::None => false,
                Collision::Stone => true,
                Collision::Brick => {
                    if let Some(cell) = collision::struck_brick(walls.iter(), next) {
                        out.push(Command::StrikeWall { cell });
                    }
                    true
                }
            };

            for enemy in enemies.living() {
                if self.killed.contains(&enemy.id) {
                    continue;
                }
                if collision::projectile_hits_enemy(next, enemy.position) {
                    self.killed.push(enemy.id);
                    out.push(Command::KillEnemy { enemy: enemy.id });
                    spent = true;
                }
            }

            if spent {
                self.spent.push(projectile.id);
            }
        }

        out.extend(
            self.spent
                .drain(..)
                .map(|projectile| Command::DespawnProjectile { projectile }),
        );
        out.push(Command::AdvanceProjectiles);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use gremlin_maze_core::{
        Direction, EnemySnapshot, Position, ProjectileSnapshot, TileCell, WallKind, WallSnapshot,
    };

    fn projectile(id: u32, x: f64, y: f64, direction: Direction) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: ProjectileId::new(id),
            position: Position::new(x, y),
            direction,
        }
    }

    fn enemy(id: u32, x: f64, y: f64, alive: bool) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(id),
            position: Position::new(x, y),
            heading: None,
            alive,
        }
    }

    #[test]
    fn idle_pass_emits_nothing() {
        let mut system = Projectiles::new();
        let mut out = Vec::new();
        system.handle(
            &Tuning::default(),
            &ProjectileView::default(),
            &WallView::default(),
            &EnemyView::default(),
            &mut out,
        );
        assert!(out.is_empty());
    }

    #[test]
    fn free_flight_only_advances() {
        let mut system = Projectiles::new();
        let mut out = Vec::new();
        system.handle(
            &Tuning::default(),
            &ProjectileView::from_snapshots(vec![projectile(0, 2.0, 2.0, Direction::Up)]),
            &WallView::default(),
            &EnemyView::default(),
            &mut out,
        );
        assert_eq!(out, vec![Command::AdvanceProjectiles]);
    }

    #[test]
    fn brick_hit_strikes_wall_before_removal() {
        let walls = WallView::from_snapshots(vec![WallSnapshot {
            cell: TileCell::new(3, 1),
            kind: WallKind::Brick,
            stage: None,
            stage_started_at: Duration::ZERO,
        }]);
        let mut system = Projectiles::new();
        let mut out = Vec::new();
        system.handle(
            &Tuning::default(),
            &ProjectileView::from_snapshots(vec![projectile(4, 2.0, 1.0, Direction::Right)]),
            &walls,
            &EnemyView::default(),
            &mut out,
        );
        assert_eq!(
            out,
            vec![
                Command::StrikeWall {
                    cell: TileCell::new(3, 1)
                },
                Command::DespawnProjectile {
                    projectile: ProjectileId::new(4)
                },
                Command::AdvanceProjectiles,
            ]
        );
    }

    #[test]
    fn enemy_is_killed_once_per_pass() {
        let projectiles = ProjectileView::from_snapshots(vec![
            projectile(0, 4.0, 2.0, Direction::Right),
            projectile(1, 4.5, 2.0, Direction::Left),
        ]);
        let enemies = EnemyView::from_snapshots(vec![enemy(7, 4.2, 2.0, true)]);
        let mut system = Projectiles::new();
        let mut out = Vec::new();
        system.handle(
            &Tuning::default(),
            &projectiles,
            &WallView::default(),
            &enemies,
            &mut out,
        );
        assert_eq!(
            out,
            vec![
                Command::KillEnemy {
                    enemy: EnemyId::new(7)
                },
                Command::DespawnProjectile {
                    projectile: ProjectileId::new(0)
                },
                Command::AdvanceProjectiles,
            ]
        );
    }

    #[test]
    fn dead_enemies_are_not_targets() {
        let enemies = EnemyView::from_snapshots(vec![enemy(0, 2.0, 2.0, false)]);
        let mut system = Projectiles::new();
        let mut out = Vec::new();
        system.handle(
            &Tuning::default(),
            &ProjectileView::from_snapshots(vec![projectile(0, 2.0, 2.0, Direction::Down)]),
            &WallView::default(),
            &enemies,
            &mut out,
        );
        assert_eq!(out, vec![Command::AdvanceProjectiles]);
    }

    #[test]
    fn wall_and_enemy_hits_share_one_removal() {
        let walls = WallView::from_snapshots(vec![WallSnapshot {
            cell: TileCell::new(2, 3),
            kind: WallKind::Stone,
            stage: None,
            stage_started_at: Duration::ZERO,
        }]);
        let enemies = EnemyView::from_snapshots(vec![enemy(1, 2.0, 3.4, true)]);
        let mut system = Projectiles::new();
        let mut out = Vec::new();
        system.handle(
            &Tuning::default(),
            &ProjectileView::from_snapshots(vec![projectile(3, 2.0, 2.98, Direction::Down)]),
            &walls,
            &enemies,
            &mut out,
        );
        assert_eq!(
            out,
            vec![
                Command::KillEnemy {
                    enemy: EnemyId::new(1)
                },
                Command::DespawnProjectile {
                    projectile: ProjectileId::new(3)
                },
                Command::AdvanceProjectiles,
            ]
        );
    }
}
