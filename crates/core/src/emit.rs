use std::io::{self, Write};
use std::time::{Duration, Instant};

use crate::tokenize::Line;

#[derive(Debug, Clone, Copy)]
pub(crate) struct Palette {
    pub(crate) matched: &'static str,
    pub(crate) block: &'static str,
    pub(crate) footer: &'static str,
    pub(crate) progress: &'static str,
    pub(crate) notice: &'static str,
    pub(crate) mismatch: &'static str,
    pub(crate) reset: &'static str,
}

impl Palette {
    pub(crate) const ANSI: Palette = Palette {
        matched: "\x1b[1;38m",
        block: "\x1b[1;100m",
        footer: "\x1b[1;38m",
        progress: "\x1b[1;90m",
        notice: "\x1b[1;35m",
        mismatch: "\x1b[1;31m",
        reset: "\x1b[0m",
    };

    pub(crate) const PLAIN: Palette = Palette {
        matched: "",
        block: "",
        footer: "",
        progress: "",
        notice: "",
        mismatch: "",
        reset: "",
    };

    pub(crate) fn new(color: bool) -> Self {
        if color { Self::ANSI } else { Self::PLAIN }
    }
}

/// Why a block that never completed a cycle was abandoned.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Mismatch<'a> {
    pub(crate) position: usize,
    pub(crate) block_len: usize,
    pub(crate) template: &'a str,
    /// `None` when the input ended inside the block.
    pub(crate) breaking: Option<(&'a str, f64)>,
}

/// Writes compacted output and remembers when it last did so.
#[derive(Debug)]
pub(crate) struct Emitter<W: Write> {
    out: W,
    palette: Palette,
    progress_interval: Duration,
    last_output: Instant,
}

impl<W: Write> Emitter<W> {
    pub(crate) fn new(out: W, color: bool, progress_interval: Duration) -> Self {
        Self {
            out,
            palette: Palette::new(color),
            progress_interval,
            last_output: Instant::now(),
        }
    }

    pub(crate) fn line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")?;
        self.touch();
        Ok(())
    }

    pub(crate) fn block(&mut self, template: &[Line], folded: u64) -> io::Result<()> {
        let p = self.palette;
        for line in template {
            writeln!(self.out, "{}{}{}", p.block, line.text, p.reset)?;
        }
        writeln!(
            self.out,
            "{}\t\t\t\t{}-- repeated {folded} more times --{}",
            p.reset, p.footer, p.reset
        )?;
        self.touch();
        Ok(())
    }

    pub(crate) fn diff(&mut self, template: &str, actual: &str) -> io::Result<()> {
        writeln!(self.out, "{}", render_diff(template, actual, self.palette))?;
        self.touch();
        Ok(())
    }

    pub(crate) fn mismatch(&mut self, mismatch: &Mismatch<'_>) -> io::Result<()> {
        let p = self.palette;
        match mismatch.breaking {
            Some((line, score)) => {
                writeln!(
                    self.out,
                    "{}--- pattern broke at position {} of {} (similarity {score:.2}) ---{}",
                    p.notice,
                    mismatch.position + 1,
                    mismatch.block_len,
                    p.reset
                )?;
                writeln!(self.out, "{}-{}{line}{}", p.notice, p.mismatch, p.reset)?;
            }
            None => {
                writeln!(
                    self.out,
                    "{}--- pattern broke at end of input (position {} of {}) ---{}",
                    p.notice,
                    mismatch.position + 1,
                    mismatch.block_len,
                    p.reset
                )?;
            }
        }
        writeln!(self.out, " {}{}{}", p.mismatch, mismatch.template, p.reset)?;
        writeln!(self.out, "{}---{}", p.notice, p.reset)?;
        self.touch();
        Ok(())
    }

    pub(crate) fn progress_due(&self) -> bool {
        self.last_output.elapsed() >= self.progress_interval
    }

    pub(crate) fn progress(&mut self, repeats: u64) -> io::Result<()> {
        let p = self.palette;
        writeln!(
            self.out,
            "{}... work in progress ({repeats} repeats) ...{}",
            p.progress, p.reset
        )?;
        self.out.flush()?;
        self.touch();
        Ok(())
    }

    pub(crate) fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub(crate) fn into_inner(self) -> W {
        self.out
    }

    fn touch(&mut self) {
        self.last_output = Instant::now();
    }
}

/// Renders `template` with every character that also appears at the same
/// position of `actual` highlighted. Escapes are written only where the
/// match state flips.
pub(crate) fn render_diff(template: &str, actual: &str, palette: Palette) -> String {
    let mut out = String::with_capacity(template.len() + 16);
    let mut others = actual.chars();
    let mut highlighted = false;
    for ch in template.chars() {
        let same = others.next() == Some(ch);
        if same != highlighted {
            out.push_str(if same { palette.matched } else { palette.reset });
            highlighted = same;
        }
        out.push(ch);
    }
    out.push_str(palette.reset);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> Emitter<Vec<u8>> {
        Emitter::new(Vec::new(), false, Duration::from_secs(2))
    }

    fn output(emitter: Emitter<Vec<u8>>) -> String {
        String::from_utf8_lossy(&emitter.into_inner()).into_owned()
    }

    #[test]
    fn render_diff_plain_is_the_template() {
        assert_eq!(render_diff("abc def", "abX", Palette::PLAIN), "abc def");
    }

    #[test]
    fn render_diff_highlights_matching_runs() {
        let out = render_diff("abcd", "abXd", Palette::ANSI);
        assert_eq!(out, "\x1b[1;38mab\x1b[0mc\x1b[1;38md\x1b[0m");
    }

    #[test]
    fn render_diff_handles_shorter_actual() {
        let out = render_diff("abc", "a", Palette::ANSI);
        assert_eq!(out, "\x1b[1;38ma\x1b[0mbc\x1b[0m");
    }

    #[test]
    fn block_prints_template_then_footer() -> io::Result<()> {
        let mut emitter = plain();
        emitter.block(&[Line::new("a1 b"), Line::new("a2 c")], 3)?;
        assert_eq!(
            output(emitter),
            "a1 b\na2 c\n\t\t\t\t-- repeated 3 more times --\n"
        );
        Ok(())
    }

    #[test]
    fn block_highlights_each_line_in_color() -> io::Result<()> {
        let mut emitter = Emitter::new(Vec::new(), true, Duration::from_secs(2));
        emitter.block(&[Line::new("xx")], 1)?;
        assert_eq!(
            output(emitter),
            "\x1b[1;100mxx\x1b[0m\n\x1b[0m\t\t\t\t\x1b[1;38m-- repeated 1 more times --\x1b[0m\n"
        );
        Ok(())
    }

    #[test]
    fn progress_is_due_only_after_quiet_period() -> io::Result<()> {
        let mut emitter = Emitter::new(Vec::new(), false, Duration::from_secs(3600));
        assert!(!emitter.progress_due());
        emitter.line("hello")?;
        assert!(!emitter.progress_due());

        let mut eager = Emitter::new(Vec::new(), false, Duration::ZERO);
        assert!(eager.progress_due());
        eager.progress(7)?;
        assert_eq!(output(eager), "... work in progress (7 repeats) ...\n");
        Ok(())
    }

    #[test]
    fn mismatch_shows_both_lines() -> io::Result<()> {
        let mut emitter = plain();
        emitter.mismatch(&Mismatch {
            position: 1,
            block_len: 2,
            template: "t0 beta",
            breaking: Some(("t9 gamma", 0.25)),
        })?;
        assert_eq!(
            output(emitter),
            "--- pattern broke at position 2 of 2 (similarity 0.25) ---\n-t9 gamma\n t0 beta\n---\n"
        );
        Ok(())
    }
}
