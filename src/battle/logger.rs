//! Narration sinks.

/// Receives human-readable narration lines as the battle unfolds.
pub trait BattleLogger {
    fn log(&mut self, line: &str);

    /// Whether verbose lines (formula breakdowns, RNG-driven gate results)
    /// should be produced at all.
    fn should_log_details(&self) -> bool {
        false
    }
}

/// Collects every line in order.
#[derive(Debug, Clone, Default)]
pub struct ListBattleLogger {
    lines: Vec<String>,
    details: bool,
}

impl ListBattleLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_details() -> Self {
        Self {
            lines: Vec::new(),
            details: true,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    pub fn contains(&self, fragment: &str) -> bool {
        self.lines.iter().any(|line| line.contains(fragment))
    }
}

impl BattleLogger for ListBattleLogger {
    fn log(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }

    fn should_log_details(&self) -> bool {
        self.details
    }
}

/// Discards everything. Used when the AI simulates hypothetical moves.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpBattleLogger;

impl BattleLogger for NoOpBattleLogger {
    fn log(&mut self, _line: &str) {}
}

/// Records into a list while forwarding to a caller-supplied sink.
pub(crate) struct TeeLogger<'a> {
    pub(crate) list: ListBattleLogger,
    sink: &'a mut dyn BattleLogger,
}

impl<'a> TeeLogger<'a> {
    pub(crate) fn new(sink: &'a mut dyn BattleLogger) -> Self {
        Self {
            list: ListBattleLogger::new(),
            sink,
        }
    }
}

impl BattleLogger for TeeLogger<'_> {
    fn log(&mut self, line: &str) {
        self.list.log(line);
        self.sink.log(line);
    }

    fn should_log_details(&self) -> bool {
        self.sink.should_log_details()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_logger_collects_in_order() {
        let mut logger = ListBattleLogger::new();
        logger.log("first");
        logger.log("second");
        assert_eq!(logger.lines(), ["first", "second"]);
        assert!(!logger.should_log_details());
        assert!(ListBattleLogger::with_details().should_log_details());
    }

    #[test]
    fn test_tee_logger_forwards() {
        let mut sink = ListBattleLogger::with_details();
        {
            let mut tee = TeeLogger::new(&mut sink);
            tee.log("hello");
            assert!(tee.should_log_details());
            assert_eq!(tee.list.lines(), ["hello"]);
        }
        assert!(sink.contains("hello"));
    }
}
