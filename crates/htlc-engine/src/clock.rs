//! Clock collaborator: the current block height.

/// Source of the current block height.
pub trait Clock {
    fn current_height(&self) -> u64;
}

/// A fixed block height, advanced explicitly by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct BlockHeight(pub u64);

impl BlockHeight {
    /// Move forward by `blocks`.
    pub fn advance(&mut self, blocks: u64) {
        self.0 = self.0.saturating_add(blocks);
    }
}

impl Clock for BlockHeight {
    fn current_height(&self) -> u64 {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn current_height(&self) -> u64 {
        (**self).current_height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_moves_height() {
        let mut clock = BlockHeight(10);
        clock.advance(50);
        assert_eq!(clock.current_height(), 60);
    }

    #[test]
    fn advance_saturates() {
        let mut clock = BlockHeight(u64::MAX - 1);
        clock.advance(5);
        assert_eq!(clock.current_height(), u64::MAX);
    }
}
