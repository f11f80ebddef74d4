//! Operator planning surface: `Evaluation` and `OpPlan`.
//!
//! Every `Seq` carries the lineage of operators that built it. The lineage
//! is for inspection only; it never drives evaluation.

use serde::Serialize;

/// How an operator consumes its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Evaluation {
    /// Produces elements itself (vector, range, generator, resource).
    Source,
    /// Pulls upstream one element at a time, on demand.
    Streaming,
    /// Must drain upstream (or hold a bounded window of it) before producing
    /// output. Unbounded upstreams make these operators never yield.
    BufferedUpstream,
    /// Streams upstream but fully buffers a second input on first pull.
    BufferedOther,
}

impl Evaluation {
    pub fn is_lazy(self) -> bool {
        matches!(self, Evaluation::Source | Evaluation::Streaming)
    }
}

/// One step in a sequence's lineage.
#[derive(Debug, Clone, Serialize)]
pub struct OpPlan {
    /// Human-readable operator name (stable).
    pub name: &'static str,

    pub evaluation: Evaluation,

    /// Lineage of the second input for binary operators (join, zip, set ops).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub side_input: Vec<OpPlan>,
}

impl OpPlan {
    pub fn new(name: &'static str, evaluation: Evaluation) -> Self {
        Self {
            name,
            evaluation,
            side_input: vec![],
        }
    }

    pub fn source(name: &'static str) -> Self {
        Self::new(name, Evaluation::Source)
    }

    pub fn streaming(name: &'static str) -> Self {
        Self::new(name, Evaluation::Streaming)
    }

    pub fn buffered(name: &'static str) -> Self {
        Self::new(name, Evaluation::BufferedUpstream)
    }

    pub fn buffered_other(name: &'static str) -> Self {
        Self::new(name, Evaluation::BufferedOther)
    }

    pub fn with_side_input(mut self, lineage: &[OpPlan]) -> Self {
        self.side_input = lineage.to_vec();
        self
    }
}
