//! Construction options for a skip list.

/// Options a [`SkipList`](crate::SkipList) is built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Initial height ceiling; head and tail span levels `0..=max_level`.
    pub max_level: usize,
    /// Emit a debug event for every per-level splice.
    pub verbose: bool,
}

impl Config {
    pub fn new(max_level: usize) -> Config {
        return Config {
            max_level,
            ..Config::default()
        };
    }

    pub fn verbose(mut self, verbose: bool) -> Config {
        self.verbose = verbose;
        return self;
    }
}

impl Default for Config {
    fn default() -> Self {
        return Config {
            max_level: 2,
            verbose: false,
        };
    }
}
