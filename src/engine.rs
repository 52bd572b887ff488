use std::sync::mpsc::Sender;

use rand::{Rng, rngs::StdRng};

use crate::{
    error::MazeError,
    generators::{Carver, Generator, Traversal, get_rng},
    maze::{Maze, MazeEvent},
    solution::{PathStep, SolutionMap, reconstruct_path},
};

/// Drives one generation run over one maze.
///
/// The engine never sleeps or draws. Callers pull events one at a time with
/// [`Engine::step`], and may also subscribe a channel that receives a copy of every event
/// as it is pulled. Abandoning the engine between two events leaves the maze consistent.
pub struct Engine<R: Rng = StdRng> {
    maze: Maze,
    walk: Traversal,
    carver: Box<dyn Carver>,
    rng: R,
    generator: Generator,
    finished: bool,
    observer: Option<Sender<MazeEvent>>,
}

impl Engine<StdRng> {
    /// Engine seeded from `seed`, or from the OS when `None`.
    pub fn seeded(
        rows: u16,
        cols: u16,
        generator: Generator,
        seed: Option<u64>,
    ) -> Result<Self, MazeError> {
        Engine::initialize(rows, cols, generator, get_rng(seed))
    }
}

impl<R: Rng> Engine<R> {
    pub fn initialize(
        rows: u16,
        cols: u16,
        generator: Generator,
        rng: R,
    ) -> Result<Self, MazeError> {
        let mut maze = Maze::new(rows, cols)?;
        let walk = Traversal::new(&mut maze);
        let carver = generator.carver(&mut maze, &walk);
        tracing::info!("[engine] {} on a {}x{} maze", generator, rows, cols);
        Ok(Engine {
            maze,
            walk,
            carver,
            rng,
            generator,
            finished: false,
            observer: None,
        })
    }

    /// Sends every event returned by [`Engine::step`] to `observer` as well.
    pub fn with_observer(mut self, observer: Sender<MazeEvent>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn generator(&self) -> Generator {
        self.generator
    }

    pub fn solution(&self) -> &SolutionMap {
        &self.walk.solution
    }

    /// `true` once the algorithm is done and every event has been handed out.
    pub fn is_finished(&self) -> bool {
        self.finished && !self.maze.has_pending_events()
    }

    /// Returns the next event, advancing the algorithm as far as needed to produce one.
    /// Returns `None` once generation is over.
    pub fn step(&mut self) -> Result<Option<MazeEvent>, MazeError> {
        while !self.finished && !self.maze.has_pending_events() {
            let more = self
                .carver
                .advance(&mut self.maze, &mut self.walk, &mut self.rng)?;
            if !more {
                self.finished = true;
                tracing::debug!(
                    "[engine] {} done, {} edges recorded",
                    self.generator,
                    self.walk.solution.len()
                );
            }
        }

        let event = self.maze.next_event();
        if let Some(event) = event {
            let delivered = self.observer.as_ref().map(|o| o.send(event).is_ok());
            // A dropped receiver only means nobody is watching anymore
            if delivered == Some(false) {
                tracing::debug!("[engine] observer disconnected, continuing without it");
                self.observer = None;
            }
        }
        Ok(event)
    }

    /// Drains every remaining event and returns the finished solution map.
    pub fn run_to_completion(&mut self) -> Result<&SolutionMap, MazeError> {
        while self.step()?.is_some() {}
        Ok(&self.walk.solution)
    }

    /// Route from the exit (bottom-right) to the entry (top-left), coloured along a
    /// red-to-yellow gradient. Calling it again gives the same steps.
    ///
    /// # Errors
    /// [`MazeError::Unfinished`] while events are still pending.
    pub fn reconstruct_path(&self) -> Result<Vec<PathStep>, MazeError> {
        if !self.is_finished() {
            return Err(MazeError::Unfinished);
        }
        reconstruct_path(&self.walk.solution, self.maze.entry(), self.maze.exit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_until_done() {
        let mut engine = Engine::seeded(4, 4, Generator::DepthFirst, Some(1)).unwrap();
        assert_eq!(engine.step().unwrap(), Some(MazeEvent::VisitedCell((0, 0))));
        let mut count = 1;
        while engine.step().unwrap().is_some() {
            count += 1;
        }
        assert!(count > 15);
        assert!(engine.is_finished());
        assert_eq!(engine.step().unwrap(), None);
        assert_eq!(engine.solution().len(), 15);
    }

    #[test]
    fn test_path_requires_completion() {
        let mut engine = Engine::seeded(3, 3, Generator::Prims, Some(2)).unwrap();
        assert_eq!(engine.reconstruct_path(), Err(MazeError::Unfinished));
        engine.run_to_completion().unwrap();
        let path = engine.reconstruct_path().unwrap();
        assert!(!path.is_empty());
        assert_eq!(path[0].cell, (2, 2));
        assert_eq!(path, engine.reconstruct_path().unwrap());
    }

    #[test]
    fn test_observer_sees_every_event() {
        let (tx, rx) = std::sync::mpsc::channel();
        let mut engine = Engine::seeded(5, 5, Generator::Ellers, Some(3))
            .unwrap()
            .with_observer(tx);
        let mut pulled = vec![];
        while let Some(event) = engine.step().unwrap() {
            pulled.push(event);
        }
        drop(engine);
        assert_eq!(rx.iter().collect::<Vec<_>>(), pulled);
    }

    #[test]
    fn test_dropped_observer_is_ignored() {
        let (tx, rx) = std::sync::mpsc::channel();
        drop(rx);
        let mut engine = Engine::seeded(3, 3, Generator::Sidewinder, Some(4))
            .unwrap()
            .with_observer(tx);
        assert_eq!(engine.run_to_completion().unwrap().len(), 8);
    }

    #[test]
    fn test_empty_grid_rejected() {
        assert_eq!(
            Engine::seeded(0, 3, Generator::BinaryTree, Some(0)).err(),
            Some(MazeError::EmptyGrid { rows: 0, cols: 3 })
        );
    }
}
