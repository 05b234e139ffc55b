use crossbeam_channel::{unbounded, Receiver, Sender};
use serde::{Deserialize, Serialize};

use crate::{BoardError, Shot, ShotId, ShotStatus};

/// Emitted after every mutating board operation. The shot list and the
/// timeline strip are two subscribers of the same board; both redraw from
/// the ordered sequence when an event arrives.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum BoardEvent {
    Appended(ShotId),
    Removed(ShotId),
    Reordered { id: ShotId, index: usize },
    StatusChanged { id: ShotId, status: ShotStatus },
    ThumbnailChanged(ShotId),
}

/// Ordered shot sequence with derived numbering.
///
/// Numbering invariant: `shot.number == 1 + index` at all times; a full
/// renumber pass runs after every insert, delete, and move. Operations on
/// ids that no longer exist are silent no-ops.
#[derive(Default)]
pub struct ShotBoard {
    shots: Vec<Shot>,
    subscribers: Vec<Sender<BoardEvent>>,
}

impl ShotBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer. Disconnected receivers are pruned on the next
    /// notification.
    pub fn subscribe(&mut self) -> Receiver<BoardEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    fn notify(&mut self, event: BoardEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    pub fn shots(&self) -> &[Shot] {
        &self.shots
    }

    pub fn len(&self) -> usize {
        self.shots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shots.is_empty()
    }

    pub fn get(&self, id: ShotId) -> Option<&Shot> {
        self.shots.iter().find(|s| s.id == id)
    }

    fn index_of(&self, id: ShotId) -> Option<usize> {
        self.shots.iter().position(|s| s.id == id)
    }

    /// Insert at the end and assign the next sequential number.
    pub fn append(&mut self, mut shot: Shot) -> ShotId {
        shot.number = self.shots.len() + 1;
        let id = shot.id;
        self.shots.push(shot);
        self.notify(BoardEvent::Appended(id));
        id
    }

    /// Delete the matching shot and renumber the remainder. No-op when the
    /// id is gone.
    pub fn remove(&mut self, id: ShotId) {
        if let Some(idx) = self.index_of(id) {
            self.shots.remove(idx);
            self.renumber();
            self.notify(BoardEvent::Removed(id));
        }
    }

    /// Reorder `dragged` next to `target`. No-op when either id is missing
    /// or the two are the same shot.
    ///
    /// The target index is recomputed *after* the dragged shot is removed;
    /// computing it first is off by one whenever the dragged shot precedes
    /// the target.
    pub fn move_shot(&mut self, dragged: ShotId, target: ShotId, insert_before: bool) {
        if dragged == target {
            return;
        }
        let Some(from) = self.index_of(dragged) else {
            return;
        };
        if self.index_of(target).is_none() {
            return;
        }

        let shot = self.shots.remove(from);
        let Some(target_idx) = self.index_of(target) else {
            // Unreachable given the check above; put the shot back unchanged.
            self.shots.insert(from, shot);
            return;
        };
        let insert_at = if insert_before {
            target_idx
        } else {
            target_idx + 1
        };
        self.shots.insert(insert_at, shot);
        self.renumber();
        self.notify(BoardEvent::Reordered {
            id: dragged,
            index: insert_at,
        });
    }

    /// Transition a shot's status. Stale ids are ignored; a same-status call
    /// is a no-op; backwards or skipping transitions are rejected.
    pub fn set_status(&mut self, id: ShotId, status: ShotStatus) -> Result<(), BoardError> {
        let Some(idx) = self.index_of(id) else {
            return Ok(());
        };
        let current = self.shots[idx].status;
        if current == status {
            return Ok(());
        }
        if !current.can_transition_to(status) {
            return Err(BoardError::InvalidTransition {
                from: current,
                to: status,
            });
        }
        self.shots[idx].status = status;
        self.notify(BoardEvent::StatusChanged { id, status });
        Ok(())
    }

    /// Attach a generated image reference. No-op when the id is gone.
    pub fn set_thumbnail(&mut self, id: ShotId, thumbnail: impl Into<String>) {
        if let Some(idx) = self.index_of(id) {
            self.shots[idx].thumbnail = Some(thumbnail.into());
            self.notify(BoardEvent::ThumbnailChanged(id));
        }
    }

    fn renumber(&mut self) {
        for (i, shot) in self.shots.iter_mut().enumerate() {
            shot.number = i + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(descriptions: &[&str]) -> (ShotBoard, Vec<ShotId>) {
        let mut board = ShotBoard::new();
        let ids = descriptions
            .iter()
            .map(|d| board.append(Shot::new(*d, *d, "INT. TEST - DAY")))
            .collect();
        (board, ids)
    }

    fn numbers(board: &ShotBoard) -> Vec<usize> {
        board.shots().iter().map(|s| s.number).collect()
    }

    fn order(board: &ShotBoard) -> Vec<ShotId> {
        board.shots().iter().map(|s| s.id).collect()
    }

    #[test]
    fn append_assigns_sequential_numbers() {
        let (board, _) = board_with(&["a", "b", "c"]);
        assert_eq!(numbers(&board), vec![1, 2, 3]);
    }

    #[test]
    fn move_before_recomputes_index_after_removal() {
        // Worked example: [1,2,3]; move(3, 1, before) -> order [3,1,2],
        // numbers [1,2,3]; remove(1) -> order [3,2], numbers [1,2].
        let (mut board, ids) = board_with(&["one", "two", "three"]);
        board.move_shot(ids[2], ids[0], true);
        assert_eq!(order(&board), vec![ids[2], ids[0], ids[1]]);
        assert_eq!(numbers(&board), vec![1, 2, 3]);

        board.remove(ids[0]);
        assert_eq!(order(&board), vec![ids[2], ids[1]]);
        assert_eq!(numbers(&board), vec![1, 2]);
    }

    #[test]
    fn move_when_dragged_precedes_target() {
        let (mut board, ids) = board_with(&["a", "b", "c", "d"]);
        // Dragging "a" after "c": removal shifts c's index from 2 to 1.
        board.move_shot(ids[0], ids[2], false);
        assert_eq!(order(&board), vec![ids[1], ids[2], ids[0], ids[3]]);
        assert_eq!(numbers(&board), vec![1, 2, 3, 4]);
    }

    #[test]
    fn move_round_trip_shifts_by_one_slot() {
        let (mut board, ids) = board_with(&["a", "b", "c"]);
        board.move_shot(ids[0], ids[1], true);
        assert_eq!(order(&board), vec![ids[0], ids[1], ids[2]]);
        board.move_shot(ids[0], ids[1], false);
        assert_eq!(order(&board), vec![ids[1], ids[0], ids[2]]);
    }

    #[test]
    fn move_is_noop_for_missing_or_self() {
        let (mut board, ids) = board_with(&["a", "b"]);
        let before = order(&board);
        board.move_shot(ids[0], ids[0], true);
        board.move_shot(ShotId(1), ids[0], true);
        board.move_shot(ids[0], ShotId(1), false);
        assert_eq!(order(&board), before);
        assert_eq!(numbers(&board), vec![1, 2]);
    }

    #[test]
    fn remove_missing_is_silent() {
        let (mut board, _) = board_with(&["a", "b"]);
        board.remove(ShotId(1));
        assert_eq!(board.len(), 2);
    }

    #[test]
    fn set_status_walks_the_state_machine() {
        let (mut board, ids) = board_with(&["a"]);
        board.set_status(ids[0], ShotStatus::Generating).unwrap();
        board.set_status(ids[0], ShotStatus::Completed).unwrap();
        let err = board
            .set_status(ids[0], ShotStatus::Generating)
            .unwrap_err();
        assert!(matches!(err, BoardError::InvalidTransition { .. }));
        // Stale id: silently ignored.
        board.set_status(ShotId(1), ShotStatus::Generating).unwrap();
    }

    #[test]
    fn mutations_notify_every_subscriber() {
        let mut board = ShotBoard::new();
        let list_view = board.subscribe();
        let timeline_view = board.subscribe();

        let id = board.append(Shot::new("a", "a", "scene"));
        board.set_status(id, ShotStatus::Generating).unwrap();
        board.remove(id);

        let list_events: Vec<_> = list_view.try_iter().collect();
        let timeline_events: Vec<_> = timeline_view.try_iter().collect();
        assert_eq!(list_events.len(), 3);
        assert_eq!(list_events, timeline_events);
        assert_eq!(list_events[0], BoardEvent::Appended(id));
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let mut board = ShotBoard::new();
        drop(board.subscribe());
        let live = board.subscribe();
        board.append(Shot::new("a", "a", "scene"));
        assert_eq!(live.try_iter().count(), 1);
    }
}
