//=========================================================================
// Transition Queue
//=========================================================================
//
// Queue for scene transitions.
//
// Scenes queue transitions here while they are being stepped. The
// application applies the queue at the frame boundary, once the current
// scene has finished rendering.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::SceneId;

//=== Scene Transition ====================================================

/// A requested change of the current scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneTransition {
    /// Makes the given scene current.
    Goto(SceneId),

    /// Moves to the next scene in registration order, wrapping to the first.
    Next,
}

//=== Transition Queue ====================================================

/// FIFO of pending scene transitions.
#[derive(Debug, Default)]
pub struct TransitionQueue {
    queue: Vec<SceneTransition>,
}

impl TransitionQueue {
    /// Creates a new empty transition queue.
    pub fn new() -> Self {
        Self { queue: Vec::new() }
    }

    /// Queues a transition for the next frame boundary.
    pub fn push(&mut self, transition: SceneTransition) {
        self.queue.push(transition);
    }

    /// Returns an iterator over the queued transitions, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &SceneTransition> {
        self.queue.iter()
    }

    /// Returns true if no transition is queued.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the number of queued transitions.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Drops every queued transition without applying it.
    pub fn clear(&mut self) {
        self.queue.clear()
    }

    /// Takes all queued transitions, leaving the queue empty.
    ///
    /// Transitions queued while the taken batch is applied wait for the
    /// next boundary.
    pub fn take(&mut self) -> Vec<SceneTransition> {
        std::mem::take(&mut self.queue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_preserves_order_and_empties_queue() {
        let mut queue = TransitionQueue::new();
        queue.push(SceneTransition::Next);
        queue.push(SceneTransition::Goto(SceneId::new(3)));

        assert_eq!(
            queue.take(),
            vec![SceneTransition::Next, SceneTransition::Goto(SceneId::new(3))]
        );
        assert!(queue.is_empty());
    }
}
