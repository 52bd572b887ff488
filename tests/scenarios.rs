use mazegen::{
    Engine, Generator, MazeError,
    maze::{Direction, MazeEvent},
    solution::Rgb,
};

fn drain(engine: &mut Engine) -> Vec<MazeEvent> {
    let mut events = vec![];
    while let Some(event) = engine.step().unwrap() {
        events.push(event);
    }
    events
}

#[test]
fn depth_first_five_by_five() {
    let mut engine = Engine::seeded(5, 5, Generator::DepthFirst, Some(2024)).unwrap();
    let solution = engine.run_to_completion().unwrap();
    assert_eq!(solution.len(), 24);
    assert_eq!(solution.parent((0, 0)), None);
    for row in 0..5 {
        for col in 0..5 {
            assert!(solution.depth((row, col)).unwrap() <= 24);
        }
    }
}

#[test]
fn single_row_is_a_horizontal_chain() {
    for generator in Generator::ALL {
        let mut engine = Engine::seeded(1, 5, generator, Some(17)).unwrap();
        let events = drain(&mut engine);
        assert!(
            events.iter().all(|e| !matches!(
                e,
                MazeEvent::OpenedWall {
                    direction: Direction::Up | Direction::Down,
                    ..
                }
            )),
            "{} carved vertically in a single row",
            generator
        );
        let solution = engine.solution();
        assert_eq!(solution.len(), 4);
        assert!((1..5).all(|c| solution.parent((0, c)) == Some((0, c - 1))));

        let path = engine.reconstruct_path().unwrap();
        assert_eq!(path.len(), 4);
        assert!(path.iter().all(|step| step.direction == Direction::Left));
    }
}

#[test]
fn single_cell_maze_has_empty_path() {
    for generator in Generator::ALL {
        let mut engine = Engine::seeded(1, 1, generator, Some(0)).unwrap();
        assert!(engine.run_to_completion().unwrap().is_empty());
        assert!(engine.reconstruct_path().unwrap().is_empty());
    }
}

#[test]
fn same_seed_same_maze_and_events() {
    for generator in Generator::ALL {
        let mut first = Engine::seeded(9, 7, generator, Some(99)).unwrap();
        let mut second = Engine::seeded(9, 7, generator, Some(99)).unwrap();
        assert_eq!(drain(&mut first), drain(&mut second), "{}", generator);
        assert_eq!(first.solution(), second.solution());
        assert_eq!(
            first.reconstruct_path().unwrap(),
            second.reconstruct_path().unwrap()
        );
    }
}

#[test]
fn path_runs_from_exit_to_entry_with_gradient() {
    let mut engine = Engine::seeded(12, 12, Generator::Prims, Some(5)).unwrap();
    engine.run_to_completion().unwrap();
    let path = engine.reconstruct_path().unwrap();
    assert_eq!(path[0].cell, (11, 11));
    assert_eq!(path[0].color, Rgb::new(255, 0, 0));

    // Each step leads to the next one, and the last step lands on the entry
    for pair in path.windows(2) {
        assert_eq!(pair[0].direction.step(pair[0].cell), Some(pair[1].cell));
    }
    let last = path.last().unwrap();
    assert_eq!(last.direction.step(last.cell), Some((0, 0)));

    // Green never decreases along the route
    assert!(path.windows(2).all(|p| p[0].color.g <= p[1].color.g));
    assert!(path.iter().all(|s| s.color.r == 255 && s.color.b == 0));
}

#[test]
fn rejects_empty_dimensions() {
    assert!(matches!(
        Engine::seeded(3, 0, Generator::Ellers, None),
        Err(MazeError::EmptyGrid { rows: 3, cols: 0 })
    ));
}

#[test]
fn caller_supplied_rng() {
    use rand::{SeedableRng, rngs::StdRng};

    let rng = StdRng::seed_from_u64(3);
    let mut engine = Engine::initialize(6, 6, Generator::HuntAndKill, rng).unwrap();
    assert_eq!(engine.run_to_completion().unwrap().len(), 35);
}
