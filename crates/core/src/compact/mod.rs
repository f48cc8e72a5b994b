use std::io::{self, Write};
use std::mem;

use crate::emit::{Emitter, Mismatch};
use crate::history::HistoryRing;
use crate::similarity::line_similarity;
use crate::tokenize::{Line, is_noise};
use crate::types::{CompactOptions, CompactStats};

mod block;


use block::{BlockState, SimilarityBlock};

/// Collapses runs of near-identical lines from a single input stream.
///
/// Lines are fed one at a time with [`Compactor::push_line`]. Every line that
/// is not skipped as noise is eventually written exactly once: verbatim, as a
/// template line of a collapsed block, or folded into a block's
/// "repeated N more times" footer. Call [`Compactor::finish`] at end of input
/// to break any open block and drain what is still buffered.
#[derive(Debug)]
pub struct Compactor<W: Write> {
    first_threshold: f64,
    keep_threshold: f64,
    debug: bool,
    history: HistoryRing,
    state: BlockState,
    emitter: Emitter<W>,
    stats: CompactStats,
}

impl<W: Write> Compactor<W> {
    pub fn new(out: W, options: &CompactOptions) -> Self {
        Self {
            first_threshold: options.first_similarity_threshold,
            keep_threshold: options.keep_similarity_threshold,
            debug: options.debug,
            history: HistoryRing::new(options.history_capacity),
            state: BlockState::Idle,
            emitter: Emitter::new(out, options.color, options.progress_interval),
            stats: CompactStats::default(),
        }
    }

    pub fn stats(&self) -> &CompactStats {
        &self.stats
    }

    pub fn push_line(&mut self, raw: &str) -> io::Result<()> {
        if is_noise(raw) {
            self.stats.skipped_short = self.stats.skipped_short.saturating_add(1);
            return Ok(());
        }
        let line = Line::new(raw);

        if let BlockState::InBlock(mut block) = mem::take(&mut self.state) {
            let score = line_similarity(&block.advance().tokens, &line.tokens);
            if score > self.keep_threshold {
                if block.at_cycle_end() {
                    block.repeats += 1;
                    if self.emitter.progress_due() {
                        self.emitter.progress(block.folded())?;
                        self.stats.progress_notices += 1;
                    }
                }
                self.state = BlockState::InBlock(block);
                self.remember(line);
                return Ok(());
            }
            // The breaking line is judged again below as if we had been idle.
            self.break_block(block, Some((line.text.as_str(), score)))?;
        }

        self.establish_or_hold(&line)?;
        self.remember(line);
        Ok(())
    }

    /// Ends the stream: breaks an open block and flushes every buffered line.
    pub fn finish(mut self) -> io::Result<(CompactStats, W)> {
        if let BlockState::InBlock(mut block) = mem::take(&mut self.state) {
            block.advance();
            self.break_block(block, None)?;
        }

        let pending = self.pending();
        for line in self.history.recent(pending) {
            self.emitter.line(&line.text)?;
            self.stats.emitted += 1;
        }
        debug_assert_eq!(self.stats.emitted, self.stats.consumed);

        self.emitter.flush()?;
        Ok((self.stats, self.emitter.into_inner()))
    }

    /// Lines read but not yet accounted for by any output.
    fn pending(&self) -> usize {
        (self.stats.consumed - self.stats.emitted) as usize
    }

    fn remember(&mut self, line: Line) {
        self.history.push(line);
        self.stats.consumed += 1;
    }

    fn establish_or_hold(&mut self, line: &Line) -> io::Result<()> {
        let pending = self.pending();
        debug_assert!(pending <= self.history.capacity());

        let reach = pending.min(self.history.len());
        let matched = (0..reach).find(|&offset| {
            self.history.back(offset).is_some_and(|prev| {
                line_similarity(&prev.tokens, &line.tokens) > self.first_threshold
            })
        });

        if let Some(offset) = matched {
            let block_len = offset + 1;
            for prev in self.history.recent(pending).take(pending - block_len) {
                self.emitter.line(&prev.text)?;
                self.stats.emitted += 1;
            }
            let template = self.history.recent(block_len).cloned().collect();
            self.state = BlockState::InBlock(SimilarityBlock::new(template));
            return Ok(());
        }

        // The slot about to be reused holds the oldest pending line.
        if pending >= self.history.capacity()
            && let Some(oldest) = self.history.back(pending - 1)
        {
            self.emitter.line(&oldest.text)?;
            self.stats.emitted += 1;
        }
        Ok(())
    }

    fn break_block(
        &mut self,
        block: SimilarityBlock,
        breaking: Option<(&str, f64)>,
    ) -> io::Result<()> {
        let block_len = block.len();

        if block.repeats > 0 {
            let folded = block.folded();
            self.emitter.block(&block.template, folded)?;
            let len = block_len as u64;
            self.stats.emitted += len * (1 + folded);
            self.stats.lines_folded += len * folded;
            self.stats.blocks_collapsed += 1;
            return Ok(());
        }

        // No cycle completed. The template lines matched so far are flushed,
        // each highlighted against the line that matched it.
        self.stats.false_starts += 1;
        let matched = block.cursor;
        for (i, template) in block.template.iter().take(matched).enumerate() {
            let actual = self
                .history
                .back(matched - 1 - i)
                .map_or("", |l| l.text.as_str());
            self.emitter.diff(&template.text, actual)?;
            self.stats.emitted += 1;
        }

        if self.debug {
            self.emitter.mismatch(&Mismatch {
                position: block.cursor,
                block_len,
                template: &block.template[block.cursor].text,
                breaking,
            })?;
        }
        Ok(())
    }
}
