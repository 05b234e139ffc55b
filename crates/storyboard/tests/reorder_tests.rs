/// End-to-end reorder scenarios: resolver intents feeding the board through
/// the update queue, the way both storyboard views drive a drag.
use storyboard::{
    resolve_drop, BoardCommand, Bounds, DragSession, FlowAxis, Point, Shot, ShotBoard, ShotStatus,
    UpdateQueue,
};

fn seeded_board(n: usize) -> (ShotBoard, Vec<storyboard::ShotId>) {
    let mut board = ShotBoard::new();
    let ids = (0..n)
        .map(|i| {
            board.append(Shot::new(
                format!("shot {}", i + 1),
                format!("prompt {}", i + 1),
                "EXT. HARBOR - NIGHT",
            ))
        })
        .collect();
    (board, ids)
}

fn assert_numbering(board: &ShotBoard) {
    let numbers: Vec<usize> = board.shots().iter().map(|s| s.number).collect();
    let expected: Vec<usize> = (1..=board.len()).collect();
    assert_eq!(numbers, expected, "numbers must be 1..=N in order");
}

#[test]
fn numbering_survives_arbitrary_edit_sequences() {
    let (mut board, ids) = seeded_board(6);

    board.move_shot(ids[5], ids[0], true);
    assert_numbering(&board);
    board.remove(ids[2]);
    assert_numbering(&board);
    board.move_shot(ids[0], ids[4], false);
    assert_numbering(&board);
    board.append(Shot::new("late", "late", "INT. DECK - DAY"));
    assert_numbering(&board);
    board.remove(ids[5]);
    assert_numbering(&board);
    board.move_shot(ids[1], ids[3], true);
    assert_numbering(&board);

    // No duplicate ids survived the shuffle.
    let mut seen: Vec<_> = board.shots().iter().map(|s| s.id).collect();
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), board.len());
}

#[test]
fn list_drag_reorders_through_resolver_intent() {
    let (mut board, ids) = seeded_board(3);

    // Vertical list: cards stacked at y = 0, 90, 180, each 80 tall.
    let card_bounds = |index: usize| Bounds::new(0.0, index as f32 * 90.0, 240.0, 80.0);

    // Drag shot 3 and drop it on the top half of shot 1's card.
    let mut session = DragSession::begin(ids[2]);
    session.hover(resolve_drop(
        FlowAxis::Vertical,
        Point::new(100.0, 10.0),
        ids[0],
        card_bounds(0),
    ));
    let (dragged, intent) = session.finish().expect("drop landed on a target");
    board.move_shot(dragged, intent.target, intent.before);

    let order: Vec<_> = board.shots().iter().map(|s| s.id).collect();
    assert_eq!(order, vec![ids[2], ids[0], ids[1]]);
    assert_numbering(&board);
}

#[test]
fn timeline_drag_uses_the_same_board_mutation() {
    let (mut board, ids) = seeded_board(3);

    // Horizontal strip: cells at x = 0, 120, 240, each 100 wide.
    let cell_bounds = |index: usize| Bounds::new(index as f32 * 120.0, 0.0, 100.0, 48.0);

    // Drag shot 1 past the midpoint of shot 3's cell.
    let mut session = DragSession::begin(ids[0]);
    session.hover(resolve_drop(
        FlowAxis::Horizontal,
        Point::new(330.0, 20.0),
        ids[2],
        cell_bounds(2),
    ));
    let (dragged, intent) = session.finish().expect("drop landed on a target");
    assert!(!intent.before);
    board.move_shot(dragged, intent.target, intent.before);

    let order: Vec<_> = board.shots().iter().map(|s| s.id).collect();
    assert_eq!(order, vec![ids[1], ids[2], ids[0]]);
    assert_numbering(&board);
}

#[test]
fn job_completion_waits_for_the_drag_to_end() {
    let (mut board, ids) = seeded_board(2);
    let mut queue = UpdateQueue::new();
    board.set_status(ids[0], ShotStatus::Generating).unwrap();

    // Pointer-down: the queue holds.
    queue.hold();
    let session = DragSession::begin(ids[1]);

    // A render job finishes mid-drag; its mutations defer.
    queue
        .submit(
            &mut board,
            BoardCommand::SetStatus {
                id: ids[0],
                status: ShotStatus::Completed,
            },
        )
        .unwrap();
    assert_eq!(board.get(ids[0]).unwrap().status, ShotStatus::Generating);

    // Pointer-up without a target: no move, then the backlog drains.
    assert!(session.finish().is_none());
    let applied = queue.release(&mut board);
    assert_eq!(applied, 1);
    assert_eq!(board.get(ids[0]).unwrap().status, ShotStatus::Completed);
}
