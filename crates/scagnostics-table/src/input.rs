//! Tagged caller input, resolved once at the boundary

use scagnostics_core::{ScagResult, ScagnosticsEngine, ScagnosticsResult};

use crate::pairwise::PairwiseScagnostics;
use crate::schema::Table;

/// Input accepted by the front end
#[derive(Debug, Clone)]
pub enum ScagnosticsInput {
    /// Two coordinate sequences
    Pair { x: Vec<f64>, y: Vec<f64> },
    /// A table whose column pairs are evaluated one by one
    Table(Table),
}

/// Output matching the shape of the input
#[derive(Debug)]
pub enum ScagnosticsOutput {
    Single(ScagnosticsResult),
    Pairwise(PairwiseScagnostics),
}

impl ScagnosticsInput {
    /// Run `engine` on a pair, or validate a table and return its pair iterator
    pub fn evaluate(self, engine: &ScagnosticsEngine) -> ScagResult<ScagnosticsOutput> {
        match self {
            ScagnosticsInput::Pair { x, y } => {
                Ok(ScagnosticsOutput::Single(engine.compute(&x, &y)?))
            }
            ScagnosticsInput::Table(table) => Ok(ScagnosticsOutput::Pairwise(
                PairwiseScagnostics::new(table, engine.clone())?,
            )),
        }
    }
}

impl From<Table> for ScagnosticsInput {
    fn from(table: Table) -> Self {
        ScagnosticsInput::Table(table)
    }
}

impl From<(Vec<f64>, Vec<f64>)> for ScagnosticsInput {
    fn from((x, y): (Vec<f64>, Vec<f64>)) -> Self {
        ScagnosticsInput::Pair { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scagnostics_core::{InvalidInputError, ScagnosticsError};

    #[test]
    fn test_pair_input() {
        let input = ScagnosticsInput::from((vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 4.0]));
        let output = input.evaluate(&ScagnosticsEngine::default()).unwrap();
        let ScagnosticsOutput::Single(result) = output else {
            panic!("expected a single result");
        };
        assert_eq!(result.counts.retained, 3);
    }

    #[test]
    fn test_pair_input_error() {
        let input = ScagnosticsInput::Pair {
            x: vec![0.0, 1.0],
            y: vec![0.0],
        };
        assert_eq!(
            input.evaluate(&ScagnosticsEngine::default()).unwrap_err(),
            ScagnosticsError::InvalidInput(InvalidInputError::LengthMismatch { x_len: 2, y_len: 1 })
        );
    }

    #[test]
    fn test_table_input() {
        let table = Table::from_f64_columns([
            ("a", vec![0.0, 1.0, 2.0]),
            ("b", vec![2.0, 1.0, 0.0]),
            ("c", vec![1.0, 0.0, 1.0]),
        ]);
        let output = ScagnosticsInput::from(table)
            .evaluate(&ScagnosticsEngine::default())
            .unwrap();
        let ScagnosticsOutput::Pairwise(pairs) = output else {
            panic!("expected pairwise output");
        };
        assert_eq!(pairs.len(), 3);
    }
}
