use std::collections::VecDeque;

use crate::{BoardError, Shot, ShotBoard, ShotId, ShotStatus};

/// One board mutation, expressed as data so every edit, whether a user
/// gesture or a job completion, funnels through the same queue.
#[derive(Debug, Clone)]
pub enum BoardCommand {
    Append(Shot),
    Remove(ShotId),
    Move {
        dragged: ShotId,
        target: ShotId,
        insert_before: bool,
    },
    SetStatus {
        id: ShotId,
        status: ShotStatus,
    },
    SetThumbnail {
        id: ShotId,
        thumbnail: String,
    },
}

impl BoardCommand {
    fn apply(self, board: &mut ShotBoard) -> Result<(), BoardError> {
        match self {
            BoardCommand::Append(shot) => {
                board.append(shot);
                Ok(())
            }
            BoardCommand::Remove(id) => {
                board.remove(id);
                Ok(())
            }
            BoardCommand::Move {
                dragged,
                target,
                insert_before,
            } => {
                board.move_shot(dragged, target, insert_before);
                Ok(())
            }
            BoardCommand::SetStatus { id, status } => board.set_status(id, status),
            BoardCommand::SetThumbnail { id, thumbnail } => {
                board.set_thumbnail(id, thumbnail);
                Ok(())
            }
        }
    }
}

/// FIFO mutation queue that keeps pointer drags re-entrant safe.
///
/// While held (a drag is in flight), submitted commands accumulate instead
/// of applying, so a job completion can never reshuffle the board under the
/// user's pointer. The backlog drains in order on release. Commands that
/// fail during the drain (e.g. a status transition made stale by the drag)
/// are skipped, the same degrade-to-no-op the board applies to missing ids.
#[derive(Default)]
pub struct UpdateQueue {
    pending: VecDeque<BoardCommand>,
    held: bool,
}

impl UpdateQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply immediately, or enqueue when the queue is held.
    pub fn submit(
        &mut self,
        board: &mut ShotBoard,
        command: BoardCommand,
    ) -> Result<(), BoardError> {
        if self.held {
            self.pending.push_back(command);
            Ok(())
        } else {
            command.apply(board)
        }
    }

    /// Start deferring: called on pointer-down of a drag.
    pub fn hold(&mut self) {
        self.held = true;
    }

    /// Stop deferring and drain the backlog in FIFO order. Returns how many
    /// commands applied cleanly.
    pub fn release(&mut self, board: &mut ShotBoard) -> usize {
        self.held = false;
        let mut applied = 0;
        while let Some(command) = self.pending.pop_front() {
            if command.apply(board).is_ok() {
                applied += 1;
            }
        }
        applied
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_applies_immediately_when_not_held() {
        let mut board = ShotBoard::new();
        let mut queue = UpdateQueue::new();
        queue
            .submit(&mut board, BoardCommand::Append(Shot::new("a", "a", "s")))
            .unwrap();
        assert_eq!(board.len(), 1);
        assert_eq!(queue.pending(), 0);
    }

    #[test]
    fn held_queue_defers_until_release() {
        let mut board = ShotBoard::new();
        let id = board.append(Shot::new("a", "a", "s"));
        let mut queue = UpdateQueue::new();

        queue.hold();
        queue
            .submit(
                &mut board,
                BoardCommand::SetStatus {
                    id,
                    status: ShotStatus::Generating,
                },
            )
            .unwrap();
        assert_eq!(board.get(id).unwrap().status, ShotStatus::Pending);
        assert_eq!(queue.pending(), 1);

        let applied = queue.release(&mut board);
        assert_eq!(applied, 1);
        assert_eq!(board.get(id).unwrap().status, ShotStatus::Generating);
    }

    #[test]
    fn release_skips_commands_made_stale_by_the_drag() {
        let mut board = ShotBoard::new();
        let id = board.append(Shot::new("a", "a", "s"));
        let mut queue = UpdateQueue::new();

        queue.hold();
        queue
            .submit(
                &mut board,
                BoardCommand::SetStatus {
                    id,
                    status: ShotStatus::Completed,
                },
            )
            .unwrap();
        queue
            .submit(
                &mut board,
                BoardCommand::SetThumbnail {
                    id,
                    thumbnail: "thumb".into(),
                },
            )
            .unwrap();

        // Pending -> Completed skips a state; only the thumbnail lands.
        let applied = queue.release(&mut board);
        assert_eq!(applied, 1);
        assert_eq!(board.get(id).unwrap().status, ShotStatus::Pending);
        assert_eq!(board.get(id).unwrap().thumbnail.as_deref(), Some("thumb"));
    }
}
