// src/pipeline/stage.rs

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;

/// The six pipeline stage families, in dependency order.
///
/// The derived ordering follows pipeline depth, so `Stage::Store <
/// Stage::Backtest` reads as "store happens before backtest".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum Stage {
    Collect,
    Clean,
    Store,
    Aggregate,
    Backtest,
    Visualize,
}

impl Stage {
    /// The task-id prefix for this stage family.
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Collect => "collect",
            Stage::Clean => "clean",
            Stage::Store => "store",
            Stage::Aggregate => "aggregate",
            Stage::Backtest => "backtest",
            Stage::Visualize => "visualize",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "collect" => Ok(Stage::Collect),
            "clean" => Ok(Stage::Clean),
            "store" => Ok(Stage::Store),
            "aggregate" => Ok(Stage::Aggregate),
            "backtest" => Ok(Stage::Backtest),
            "visualize" => Ok(Stage::Visualize),
            other => Err(format!(
                "invalid stage: {other} (expected collect, clean, store, aggregate, backtest or visualize)"
            )),
        }
    }
}
