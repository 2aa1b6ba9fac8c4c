use std::time::Duration;

use hex_cascade_core::{
    ActivationKind, Block, Board, Cause, ColorId, Command, Direction, Event, Footprint, HexCoord,
};
use hex_cascade_system_session::{GameOver, Refusal, Session, SessionConfig, Tool};

fn open_board() -> Board {
    Board::empty(Footprint::square(4))
}

fn stalled_board() -> Board {
    let mut board = Board::empty(Footprint::new(2, 1));
    let color = ColorId::new(0).expect("palette colour");
    for q in 0..2 {
        let _ = board
            .place(HexCoord::new(q, 0), Block::normal(color, Direction::East))
            .expect("in bounds");
    }
    board
}

fn destroyed(cause: Cause, score: u32) -> Event {
    Event::CellsDestroyed {
        cause,
        cells: Vec::new(),
        score,
    }
}

#[test]
fn scores_accumulate_from_every_cause() {
    let mut session = Session::default();
    session.handle(
        &[
            destroyed(Cause::Match, 3),
            destroyed(Cause::Bomb, 7),
            destroyed(Cause::Wildcard, 5),
        ],
        &open_board(),
        true,
    );
    assert_eq!(session.score(), 15);
}

#[test]
fn confirmed_tool_uses_drain_stock() {
    let mut session = Session::default();
    let cell = HexCoord::new(1, 1);

    for _ in 0..3 {
        assert_eq!(session.admit(&Command::PlaceBomb { cell }), Ok(()));
        session.handle(
            &[Event::BlockPlaced {
                cell,
                kind: ActivationKind::Bomb,
                due: Duration::from_millis(500),
            }],
            &open_board(),
            false,
        );
    }

    assert_eq!(session.stock(Tool::Bomb), Some(0));
    assert_eq!(session.stock(Tool::Wildcard), Some(3));
    assert_eq!(
        session.admit(&Command::PlaceBomb { cell }),
        Err(Refusal::OutOfStock(Tool::Bomb))
    );
    assert_eq!(session.admit(&Command::MoveBlock { from: cell, to: cell }), Ok(()));
}

#[test]
fn destroy_tool_consumes_stock_but_matches_do_not() {
    let mut session = Session::default();
    session.handle(
        &[destroyed(Cause::Destroy, 3), destroyed(Cause::Match, 3)],
        &open_board(),
        true,
    );
    assert_eq!(session.stock(Tool::Destroy), Some(2));
}

#[test]
fn unlimited_tools_never_run_out() {
    let config = SessionConfig {
        unlimited_tools: true,
        ..SessionConfig::default()
    };
    let mut session = Session::new(config);
    let cell = HexCoord::new(0, 0);

    for _ in 0..10 {
        session.handle(
            &[Event::BlockRotated {
                cell,
                direction: Direction::East,
            }],
            &open_board(),
            true,
        );
    }

    assert_eq!(session.stock(Tool::Rotate), None);
    assert!(session.can_use(Tool::Rotate));
}

#[test]
fn challenge_countdown_ends_the_game() {
    let mut session = Session::new(SessionConfig::default().challenge_mode());
    assert_eq!(session.remaining(), Some(Duration::from_secs(180)));

    session.handle(
        &[Event::TimeAdvanced {
            dt: Duration::from_secs(179),
        }],
        &open_board(),
        true,
    );
    assert_eq!(session.game_over(), None);

    session.handle(
        &[Event::TimeAdvanced {
            dt: Duration::from_secs(2),
        }],
        &open_board(),
        true,
    );
    assert_eq!(session.game_over(), Some(GameOver::TimeUp));
    assert_eq!(session.remaining(), Some(Duration::ZERO));
    assert_eq!(
        session.admit(&Command::RotateBlock {
            cell: HexCoord::new(0, 0)
        }),
        Err(Refusal::GameOver(GameOver::TimeUp))
    );
    assert_eq!(session.admit(&Command::PurgeMarked), Ok(()));
}

#[test]
fn stalled_board_ends_the_game_once_settled() {
    let mut session = Session::default();
    let board = stalled_board();

    session.handle(&[], &board, false);
    assert_eq!(session.game_over(), None, "pending effects may still open cells");

    session.handle(&[], &board, true);
    assert_eq!(session.game_over(), Some(GameOver::Stalled));
}

#[test]
fn new_board_resets_the_session() {
    let mut session = Session::new(SessionConfig::default().challenge_mode());
    session.handle(
        &[
            destroyed(Cause::Destroy, 4),
            Event::TimeAdvanced {
                dt: Duration::from_secs(200),
            },
        ],
        &open_board(),
        true,
    );
    assert_eq!(session.game_over(), Some(GameOver::TimeUp));

    session.handle(
        &[Event::BoardLoaded {
            footprint: Footprint::square(4),
        }],
        &open_board(),
        true,
    );

    assert_eq!(session.score(), 0);
    assert_eq!(session.game_over(), None);
    assert_eq!(session.stock(Tool::Destroy), Some(3));
    assert_eq!(session.remaining(), Some(Duration::from_secs(180)));
}
