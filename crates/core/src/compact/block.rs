use crate::tokenize::Line;

/// A repeating window of template lines being ridden.
#[derive(Debug, Clone)]
pub(crate) struct SimilarityBlock {
    /// Lines that established the pattern, oldest first. Never empty.
    pub(crate) template: Vec<Line>,
    /// Template position the latest line was matched against.
    pub(crate) cursor: usize,
    /// Cycles confirmed while riding, i.e. the cursor reached the last
    /// template position with a passing score.
    pub(crate) repeats: u64,
}

impl SimilarityBlock {
    pub(crate) fn new(template: Vec<Line>) -> Self {
        debug_assert!(!template.is_empty());
        Self {
            template,
            cursor: 0,
            repeats: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.template.len()
    }

    /// Moves to the template line the next input must match.
    pub(crate) fn advance(&mut self) -> &Line {
        self.cursor = (self.cursor + 1) % self.len();
        &self.template[self.cursor]
    }

    pub(crate) fn at_cycle_end(&self) -> bool {
        self.cursor + 1 == self.len()
    }

    /// Copies of the template folded into the footer. A single-line block
    /// never gets to confirm the copy that established it, so it is added here.
    pub(crate) fn folded(&self) -> u64 {
        self.repeats + u64::from(self.len() == 1)
    }
}

#[derive(Debug, Default)]
pub(crate) enum BlockState {
    #[default]
    Idle,
    InBlock(SimilarityBlock),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_wraps_around_the_template() {
        let template = vec![Line::new("a1"), Line::new("b1"), Line::new("c1")];
        let mut block = SimilarityBlock::new(template);
        assert_eq!(block.advance().text, "b1");
        assert!(!block.at_cycle_end());
        assert_eq!(block.advance().text, "c1");
        assert!(block.at_cycle_end());
        assert_eq!(block.advance().text, "a1");
        assert_eq!(block.cursor, 0);
    }

    #[test]
    fn single_line_blocks_fold_one_extra_copy() {
        let mut single = SimilarityBlock::new(vec![Line::new("a1")]);
        single.repeats = 3;
        assert_eq!(single.folded(), 4);

        let mut pair = SimilarityBlock::new(vec![Line::new("a1"), Line::new("b1")]);
        pair.repeats = 3;
        assert_eq!(pair.folded(), 3);
    }
}
