use anyhow::Result;
use log::{debug, info};
use rand::Rng;
use rand::rngs::ThreadRng;

use super::{
    config::GameConfig,
    direction::Direction,
    snake::{Collision, Grid, Position, Snake},
};

/// What a single tick did to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Snake moved one cell
    Moved,
    /// Snake moved onto the food, grew, and the food was relocated
    Ate,
    /// Snake collided and was replaced with a fresh one at the center
    Reset(Collision),
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot<'a> {
    pub segments: &'a [Position],
    pub food: Position,
}

/// One game session: the snake, the food and the buffered input.
///
/// The session never ends on its own; a collision resets the snake in place
/// and play continues.
pub struct Session<R = ThreadRng> {
    grid: Grid,
    snake: Snake,
    food: Position,
    pending_heading: Option<Direction>,
    rng: R,
    ticks: u64,
    resets: u64,
}

impl Session<ThreadRng> {
    pub fn new(config: &GameConfig) -> Result<Self> {
        Self::with_rng(config, rand::thread_rng())
    }
}

impl<R: Rng> Session<R> {
    /// Fails if the config would produce an empty grid
    pub fn with_rng(config: &GameConfig, mut rng: R) -> Result<Self> {
        config.validate()?;
        let grid = config.grid();
        let food = random_cell(&mut rng, grid);
        Ok(Self {
            grid,
            snake: Snake::new(grid),
            food,
            pending_heading: None,
            rng,
            ticks: 0,
            resets: 0,
        })
    }

    /// Buffer a heading change for the next tick, replacing any earlier one
    pub fn request_heading(&mut self, heading: Direction) {
        self.pending_heading = Some(heading);
    }

    /// Run one fixed-rate simulation step
    pub fn tick(&mut self) -> TickOutcome {
        self.ticks += 1;

        if let Some(requested) = self.pending_heading.take() {
            let from = self.snake.heading();
            if self.snake.set_heading(requested) {
                debug!("heading {:?} -> {:?}", from, requested);
            } else {
                debug!("ignored reversal {:?} -> {:?}", from, requested);
            }
        }

        self.snake.advance();

        if let Some(collision) = self.snake.collision() {
            self.resets += 1;
            info!(
                "{:?} at {:?} with length {} on tick {}, resetting (reset #{})",
                collision,
                self.snake.head(),
                self.snake.len(),
                self.ticks,
                self.resets
            );
            // Food stays where it was
            self.snake = Snake::new(self.grid);
            return TickOutcome::Reset(collision);
        }

        if self.snake.head() == self.food {
            self.snake.grow();
            self.food = random_cell(&mut self.rng, self.grid);
            debug!(
                "ate food, length {}, next food at {:?}",
                self.snake.len(),
                self.food
            );
            return TickOutcome::Ate;
        }

        TickOutcome::Moved
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            segments: self.snake.segments(),
            food: self.food,
        }
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Position {
        self.food
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn pending_heading(&self) -> Option<Direction> {
        self.pending_heading
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn resets(&self) -> u64 {
        self.resets
    }
}

/// Uniform over the whole grid; the snake's body is not avoided
fn random_cell<R: Rng>(rng: &mut R, grid: Grid) -> Position {
    Position::new(rng.gen_range(0..grid.width), rng.gen_range(0..grid.height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const RNG_SEED: u64 = 0x5EED_CAFE;

    fn session() -> Session<StdRng> {
        Session::with_rng(&GameConfig::default(), StdRng::seed_from_u64(RNG_SEED)).unwrap()
    }

    fn place_snake(session: &mut Session<StdRng>, segments: &[(i32, i32)], heading: Direction) {
        session.snake = Snake::from_segments(
            session.grid,
            segments.iter().copied().map(Position::from),
            heading,
        )
        .unwrap();
    }

    #[test]
    fn test_new_session() {
        let session = session();
        assert_eq!(session.snake().segments(), &[Position::new(10, 7)]);
        assert_eq!(session.snake().heading(), Direction::Right);
        assert!(session.grid().contains(session.food()));
        assert_eq!(session.pending_heading(), None);
        assert_eq!(session.ticks(), 0);
    }

    #[test]
    fn test_thread_rng_session() {
        let session = Session::new(&GameConfig::default()).unwrap();
        assert_eq!(session.snake().len(), 1);
        assert!(session.grid().contains(session.food()));
    }

    #[test]
    fn test_basic_tick() {
        let mut session = session();
        session.food = Position::new(0, 0);

        assert_eq!(session.tick(), TickOutcome::Moved);
        assert_eq!(session.snake().head(), Position::new(11, 7));
        assert_eq!(session.ticks(), 1);
    }

    #[test]
    fn test_eating_grows_and_relocates_food() {
        let mut session = session();
        place_snake(&mut session, &[(5, 5), (4, 5), (3, 5)], Direction::Right);
        session.food = Position::new(6, 5);

        // Growth happens after the move, so the new segment sits on the
        // already shifted tail
        assert_eq!(session.tick(), TickOutcome::Ate);
        assert_eq!(
            session.snake().segments(),
            &[
                Position::new(6, 5),
                Position::new(5, 5),
                Position::new(4, 5),
                Position::new(4, 5),
            ]
        );
        assert!(session.grid().contains(session.food()));

        session.food = Position::new(0, 0);
        assert_eq!(session.tick(), TickOutcome::Moved);
        assert_eq!(
            session.snake().segments(),
            &[
                Position::new(7, 5),
                Position::new(6, 5),
                Position::new(5, 5),
                Position::new(4, 5),
            ]
        );
    }

    #[test]
    fn test_empty_grid_rejected() {
        let config = GameConfig::new(10, 300);
        assert!(Session::with_rng(&config, StdRng::seed_from_u64(RNG_SEED)).is_err());
        assert!(Session::new(&config).is_err());
    }

    #[test]
    fn test_buffered_heading_applied_on_tick() {
        let mut session = session();
        session.food = Position::new(0, 0);

        session.request_heading(Direction::Down);
        assert_eq!(session.snake().heading(), Direction::Right);

        session.tick();
        assert_eq!(session.snake().head(), Position::new(10, 8));
        assert_eq!(session.pending_heading(), None);
    }

    #[test]
    fn test_last_request_wins() {
        let mut session = session();
        session.food = Position::new(0, 0);

        session.request_heading(Direction::Up);
        session.request_heading(Direction::Down);
        session.tick();

        assert_eq!(session.snake().head(), Position::new(10, 8));
    }

    #[test]
    fn test_reversal_request_is_dropped() {
        let mut session = session();
        session.food = Position::new(0, 0);

        session.request_heading(Direction::Left);
        session.tick();

        assert_eq!(session.snake().heading(), Direction::Right);
        assert_eq!(session.snake().head(), Position::new(11, 7));
    }

    #[test]
    fn test_wall_collision_resets_and_keeps_food() {
        let mut session = session();
        place_snake(&mut session, &[(19, 3), (18, 3)], Direction::Right);
        session.food = Position::new(4, 4);

        assert_eq!(session.tick(), TickOutcome::Reset(Collision::Wall));
        assert_eq!(session.snake().segments(), &[Position::new(10, 7)]);
        assert_eq!(session.snake().heading(), Direction::Right);
        assert_eq!(session.food(), Position::new(4, 4));
        assert_eq!(session.resets(), 1);
    }

    #[test]
    fn test_reset_skips_eat_check() {
        let mut session = session();
        place_snake(&mut session, &[(0, 0)], Direction::Up);
        // Stale food under the fresh snake's spawn cell
        session.food = Position::new(10, 7);

        assert_eq!(session.tick(), TickOutcome::Reset(Collision::Wall));
        assert_eq!(session.snake().len(), 1);
        assert_eq!(session.food(), Position::new(10, 7));
    }

    #[test]
    fn test_self_collision_resets() {
        let mut session = session();
        place_snake(
            &mut session,
            &[(5, 6), (6, 6), (6, 5), (5, 5), (4, 5)],
            Direction::Left,
        );
        session.food = Position::new(0, 0);

        session.request_heading(Direction::Up);
        assert_eq!(session.tick(), TickOutcome::Reset(Collision::SelfCollision));
        assert_eq!(session.snake().len(), 1);
    }

    #[test]
    fn test_length_bounded_by_meals() {
        let mut session = session();
        let turns = [
            Direction::Down,
            Direction::Left,
            Direction::Up,
            Direction::Right,
        ];
        let mut meals = 0;
        let mut previous_len = session.snake().len();

        for tick in 0..2_000 {
            if tick % 7 == 0 {
                session.request_heading(turns[(tick / 7) % turns.len()]);
            }
            match session.tick() {
                TickOutcome::Ate => {
                    meals += 1;
                    assert_eq!(session.snake().len(), previous_len + 1);
                }
                TickOutcome::Moved => assert_eq!(session.snake().len(), previous_len),
                TickOutcome::Reset(_) => meals = 0,
            }
            assert!(session.snake().len() <= meals + 1);
            previous_len = session.snake().len();
        }
    }

    #[test]
    fn test_food_stays_on_grid() {
        let mut rng = StdRng::seed_from_u64(RNG_SEED);
        let grid = Grid::new(3, 2);
        for _ in 0..500 {
            assert!(grid.contains(random_cell(&mut rng, grid)));
        }
    }

    #[test]
    fn test_snapshot_matches_state() {
        let session = session();
        let snapshot = session.snapshot();
        assert_eq!(snapshot.segments, session.snake().segments());
        assert_eq!(snapshot.food, session.food());
    }
}
