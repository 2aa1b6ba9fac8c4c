use std::time::Duration;

use hex_cascade_core::{
    Action, ActivationKind, Block, BlockKind, Board, Cause, ColorId, Command, Difficulty,
    Direction, Event, Footprint, GameConfig, HexCoord, Rejection, Timing,
};
use hex_cascade_world::{self as world, query, World};

const RED: u8 = 0;
const BLUE: u8 = 1;

fn cell(q: i32, r: i32) -> HexCoord {
    HexCoord::new(q, r)
}

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

fn block(color: u8, direction: Direction) -> Block {
    Block::normal(ColorId::new(color).expect("palette colour"), direction)
}

fn board_with(blocks: &[(HexCoord, Block)]) -> Board {
    let mut board = Board::empty(Footprint::square(6));
    for (coord, block) in blocks {
        let _ = board.place(*coord, *block).expect("fixture cell in bounds");
    }
    board
}

fn world_with(blocks: &[(HexCoord, Block)]) -> World {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::LoadBoard {
            board: board_with(blocks),
        },
        &mut events,
    );
    world
}

fn run(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    events
}

fn tick(world: &mut World, millis: u64) -> Vec<Event> {
    run(world, Command::Tick { dt: ms(millis) })
}

/// Three reds on row 0 once the block at (2, 1) slides north-west.
fn red_row_fixture() -> Vec<(HexCoord, Block)> {
    vec![
        (cell(0, 0), block(RED, Direction::East)),
        (cell(1, 0), block(RED, Direction::East)),
        (cell(2, 1), block(RED, Direction::NorthWest)),
    ]
}

#[test]
fn matched_blocks_linger_until_the_purge_deadline() {
    let mut world = world_with(&red_row_fixture());

    let events = run(
        &mut world,
        Command::MoveBlock {
            from: cell(2, 1),
            to: cell(2, 0),
        },
    );
    let matched = vec![cell(0, 0), cell(1, 0), cell(2, 0)];
    assert_eq!(
        events,
        vec![
            Event::BlockMoved {
                from: cell(2, 1),
                to: cell(2, 0),
            },
            Event::CellsDestroyed {
                cause: Cause::Match,
                cells: matched.clone(),
                score: 3,
            },
        ]
    );
    assert_eq!(query::marked_cells(&world), matched);
    assert_eq!(query::purge_deadline(&world), Some(ms(300)));
    assert!(!query::is_settled(&world));

    assert_eq!(tick(&mut world, 299), vec![Event::TimeAdvanced { dt: ms(299) }]);
    assert_eq!(query::board(&world).occupied_count(), 3);

    assert_eq!(
        tick(&mut world, 1),
        vec![
            Event::TimeAdvanced { dt: ms(1) },
            Event::CellsPurged { cells: matched },
        ]
    );
    assert_eq!(query::board(&world).occupied_count(), 0);
    assert_eq!(query::purge_deadline(&world), None);
    assert!(query::is_settled(&world));
    assert_eq!(query::clock(&world), ms(300));
}

#[test]
fn group_of_four_promotes_the_moved_block() {
    let mut fixture = red_row_fixture();
    fixture.push((cell(3, 0), block(RED, Direction::East)));
    let mut world = world_with(&fixture);

    let events = run(
        &mut world,
        Command::MoveBlock {
            from: cell(2, 1),
            to: cell(2, 0),
        },
    );

    assert_eq!(
        events,
        vec![
            Event::BlockMoved {
                from: cell(2, 1),
                to: cell(2, 0),
            },
            Event::BlockPromoted { cell: cell(2, 0) },
            Event::CellsDestroyed {
                cause: Cause::Match,
                cells: vec![cell(0, 0), cell(1, 0), cell(3, 0)],
                score: 4,
            },
        ]
    );
    let promoted = query::board(&world).get(cell(2, 0)).copied();
    assert_eq!(promoted.map(|block| block.kind()), Some(BlockKind::Special));
    assert!(!promoted.is_some_and(|block| block.is_marked()));

    let _ = tick(&mut world, 300);
    let red = ColorId::new(RED).expect("palette colour");
    let remaining: Vec<(HexCoord, BlockKind)> = query::board(&world)
        .iter()
        .filter(|(_, block)| block.color() == Some(red))
        .map(|(coord, block)| (coord, block.kind()))
        .collect();
    assert_eq!(remaining, vec![(cell(2, 0), BlockKind::Special)]);
}

#[test]
fn new_resolutions_push_the_purge_deadline_back() {
    let mut fixture = red_row_fixture();
    fixture.push((cell(3, 4), block(BLUE, Direction::East)));
    let mut world = world_with(&fixture);

    let _ = run(
        &mut world,
        Command::MoveBlock {
            from: cell(2, 1),
            to: cell(2, 0),
        },
    );
    let _ = tick(&mut world, 200);
    let destroyed = run(&mut world, Command::DestroyNearest { cell: cell(3, 4) });
    assert_eq!(
        destroyed,
        vec![Event::CellsDestroyed {
            cause: Cause::Destroy,
            cells: vec![cell(3, 4)],
            score: 1,
        }]
    );
    assert_eq!(query::purge_deadline(&world), Some(ms(500)));

    assert_eq!(tick(&mut world, 200), vec![Event::TimeAdvanced { dt: ms(200) }]);
    assert_eq!(
        tick(&mut world, 100),
        vec![
            Event::TimeAdvanced { dt: ms(100) },
            Event::CellsPurged {
                cells: vec![cell(0, 0), cell(1, 0), cell(2, 0), cell(3, 4)],
            },
        ]
    );
}

#[test]
fn bomb_detonates_after_the_activation_delay() {
    let center = cell(2, 2);
    let mut fixture: Vec<(HexCoord, Block)> = center
        .neighbors()
        .into_iter()
        .map(|neighbor| (neighbor, block(BLUE, Direction::SouthWest)))
        .collect();
    fixture[1] = (center.neighbors()[1], Block::stone());
    let mut world = world_with(&fixture);

    assert_eq!(
        run(&mut world, Command::PlaceBomb { cell: center }),
        vec![Event::BlockPlaced {
            cell: center,
            kind: ActivationKind::Bomb,
            due: ms(500),
        }]
    );
    assert_eq!(query::pending_activations(&world).len(), 1);
    assert_eq!(tick(&mut world, 499), vec![Event::TimeAdvanced { dt: ms(499) }]);

    let events = tick(&mut world, 1);
    let [Event::TimeAdvanced { .. }, Event::CellsDestroyed {
        cause: Cause::Bomb,
        cells,
        score,
    }] = events.as_slice()
    else {
        panic!("unexpected events: {events:?}");
    };
    assert_eq!(cells.len(), 7);
    assert_eq!(*score, 7);
    assert!(query::board(&world).is_vacant(center), "bomb cell clears at once");
    assert_eq!(query::marked_cells(&world).len(), 6);
    assert_eq!(query::purge_deadline(&world), Some(ms(800)));
    assert!(query::pending_activations(&world).is_empty());

    let purged = tick(&mut world, 300);
    assert!(matches!(
        purged.as_slice(),
        [Event::TimeAdvanced { .. }, Event::CellsPurged { cells }] if cells.len() == 6
    ));
    assert_eq!(query::board(&world).occupied_count(), 0);
}

#[test]
fn bomb_surrounded_by_six_blocks_clears_seven_cells() {
    let center = cell(2, 2);
    let fixture: Vec<(HexCoord, Block)> = center
        .neighbors()
        .into_iter()
        .enumerate()
        .map(|(index, neighbor)| {
            let color = if index % 2 == 0 { RED } else { BLUE };
            (neighbor, block(color, Direction::East))
        })
        .collect();
    let mut world = world_with(&fixture);

    let _ = run(&mut world, Command::PlaceBomb { cell: center });
    let events = tick(&mut world, 500);

    let mut expected: Vec<HexCoord> = center.neighbors().to_vec();
    expected.push(center);
    expected.sort();
    assert_eq!(
        events,
        vec![
            Event::TimeAdvanced { dt: ms(500) },
            Event::CellsDestroyed {
                cause: Cause::Bomb,
                cells: expected,
                score: 7,
            },
        ]
    );
    assert!(query::board(&world).is_vacant(center));

    let _ = tick(&mut world, 300);
    assert_eq!(query::board(&world).occupied_count(), 0);
}

#[test]
fn extreme_coordinates_are_rejected_as_out_of_bounds() {
    let mut world = world_with(&red_row_fixture());
    let far = [
        cell(i32::MAX, 3),
        cell(i32::MIN, 5),
        cell(0, i32::MAX),
        cell(i32::MAX, i32::MIN),
    ];

    for target in far {
        for (command, action) in [
            (Command::PlaceBomb { cell: target }, Action::PlaceBomb),
            (Command::PlaceWildcard { cell: target }, Action::PlaceWildcard),
            (Command::DestroyNearest { cell: target }, Action::Destroy),
            (Command::RotateBlock { cell: target }, Action::Rotate),
            (
                Command::PaintCell {
                    cell: target,
                    brush: None,
                },
                Action::Paint,
            ),
            (
                Command::MoveBlock {
                    from: cell(2, 1),
                    to: target,
                },
                Action::Move,
            ),
        ] {
            let events = run(&mut world, command);
            let [Event::ActionRejected { action: got, reason, .. }] = events.as_slice() else {
                panic!("unexpected events for {target:?}: {events:?}");
            };
            assert_eq!(*got, action);
            let expected = if action == Action::Move {
                Rejection::WrongDirection
            } else {
                Rejection::OutOfBounds
            };
            assert_eq!(*reason, expected, "{action:?} at {target:?}");
        }
    }

    let events = run(
        &mut world,
        Command::MoveBlock {
            from: cell(i32::MAX, 3),
            to: cell(i32::MIN, 3),
        },
    );
    assert!(matches!(
        events.as_slice(),
        [Event::ActionRejected {
            reason: Rejection::EmptySource,
            ..
        }]
    ));
    assert_eq!(query::board(&world), &board_with(&red_row_fixture()));
}

#[test]
fn wildcard_resolves_against_its_neighbours() {
    let mut world = world_with(&[
        (cell(3, 2), block(RED, Direction::East)),
        (cell(4, 2), block(RED, Direction::East)),
    ]);

    let _ = run(&mut world, Command::PlaceWildcard { cell: cell(2, 2) });
    let events = tick(&mut world, 500);

    assert_eq!(
        events,
        vec![
            Event::TimeAdvanced { dt: ms(500) },
            Event::CellsDestroyed {
                cause: Cause::Wildcard,
                cells: vec![cell(2, 2), cell(3, 2), cell(4, 2)],
                score: 3,
            },
        ]
    );
}

#[test]
fn wildcard_purged_before_its_deadline_never_resolves() {
    let mut world = world_with(&[
        (cell(3, 2), block(RED, Direction::East)),
        (cell(4, 2), block(RED, Direction::East)),
    ]);

    let _ = run(&mut world, Command::PlaceWildcard { cell: cell(2, 2) });
    let destroyed = run(&mut world, Command::DestroyNearest { cell: cell(2, 2) });
    assert_eq!(
        destroyed,
        vec![Event::CellsDestroyed {
            cause: Cause::Destroy,
            cells: vec![cell(2, 2)],
            score: 1,
        }]
    );

    assert_eq!(
        tick(&mut world, 500),
        vec![
            Event::TimeAdvanced { dt: ms(500) },
            Event::CellsPurged {
                cells: vec![cell(2, 2)],
            },
        ]
    );
    assert_eq!(query::board(&world).occupied_count(), 2);
}

#[test]
fn purge_runs_before_activations_due_at_the_same_instant() {
    let timing = Timing {
        purge_grace: ms(500),
        activation_delay: ms(500),
    };
    let config = GameConfig::square(6, Difficulty::Easy, 5)
        .expect("valid footprint")
        .with_timing(timing);
    let mut world = World::new();
    let _ = run(&mut world, Command::NewGame { config });

    let mut fixture = red_row_fixture();
    fixture.push((cell(4, 0), block(RED, Direction::SouthWest)));
    fixture.push((cell(5, 0), block(RED, Direction::SouthWest)));
    let _ = run(
        &mut world,
        Command::LoadBoard {
            board: board_with(&fixture),
        },
    );

    let _ = run(
        &mut world,
        Command::MoveBlock {
            from: cell(2, 1),
            to: cell(2, 0),
        },
    );
    let _ = run(&mut world, Command::PlaceWildcard { cell: cell(3, 0) });

    let events = tick(&mut world, 500);
    assert_eq!(
        events,
        vec![
            Event::TimeAdvanced { dt: ms(500) },
            Event::CellsPurged {
                cells: vec![cell(0, 0), cell(1, 0), cell(2, 0)],
            },
            Event::CellsDestroyed {
                cause: Cause::Wildcard,
                cells: vec![cell(3, 0), cell(4, 0), cell(5, 0)],
                score: 3,
            },
        ]
    );
    assert_eq!(query::purge_deadline(&world), Some(ms(1_000)));
}

#[test]
fn purge_command_clears_marked_blocks_immediately() {
    let mut world = world_with(&red_row_fixture());
    let _ = run(
        &mut world,
        Command::MoveBlock {
            from: cell(2, 1),
            to: cell(2, 0),
        },
    );

    let events = run(&mut world, Command::PurgeMarked);

    assert_eq!(
        events,
        vec![Event::CellsPurged {
            cells: vec![cell(0, 0), cell(1, 0), cell(2, 0)],
        }]
    );
    assert_eq!(query::purge_deadline(&world), None);
    assert!(run(&mut world, Command::PurgeMarked).is_empty());
}

#[test]
fn invalid_intents_leave_the_board_untouched() {
    let mut world = world_with(&[
        (cell(0, 0), block(RED, Direction::East)),
        (cell(1, 0), Block::stone()),
    ]);
    let before = query::board(&world).clone();

    let events = [
        run(
            &mut world,
            Command::MoveBlock {
                from: cell(0, 0),
                to: cell(0, 1),
            },
        ),
        run(&mut world, Command::PlaceBomb { cell: cell(1, 0) }),
        run(&mut world, Command::PlaceWildcard { cell: cell(-3, 0) }),
        run(&mut world, Command::DestroyNearest { cell: cell(3, 3) }),
        run(&mut world, Command::DestroyNearest { cell: cell(1, 0) }),
    ]
    .concat();

    let rejections: Vec<(Action, Rejection)> = events
        .iter()
        .map(|event| match event {
            Event::ActionRejected { action, reason, .. } => (*action, *reason),
            other => panic!("unexpected event {other:?}"),
        })
        .collect();
    assert_eq!(
        rejections,
        vec![
            (Action::Move, Rejection::WrongDirection),
            (Action::PlaceBomb, Rejection::Occupied),
            (Action::PlaceWildcard, Rejection::OutOfBounds),
            (Action::Destroy, Rejection::EmptyTarget),
            (Action::Destroy, Rejection::StoneTarget),
        ]
    );
    assert_eq!(query::board(&world), &before);
    assert!(query::pending_activations(&world).is_empty());
}

#[test]
fn editor_paints_and_erases_cells() {
    let mut world = world_with(&[]);
    let target = cell(2, 2);
    let brush = hex_cascade_core::Brush::Block {
        color: ColorId::new(BLUE).expect("palette colour"),
        direction: Direction::NorthWest,
    };

    let painted = run(
        &mut world,
        Command::PaintCell {
            cell: target,
            brush: Some(brush),
        },
    );
    assert_eq!(
        painted,
        vec![Event::CellPainted {
            cell: target,
            block: Some(brush.block()),
        }]
    );
    assert_eq!(query::board(&world).get(target), Some(&brush.block()));

    let _ = run(
        &mut world,
        Command::PaintCell {
            cell: target,
            brush: None,
        },
    );
    assert!(query::board(&world).is_vacant(target));
}
