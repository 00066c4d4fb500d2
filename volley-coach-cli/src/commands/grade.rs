use anyhow::{ensure, Result};
use clap::Args;

use volley_coach::models::ScoreCombination;

use super::Session;
use crate::output::{print_combination, print_json};

#[derive(Args)]
pub struct GradeCommand {
    /// Frame score on 0-100
    score: f64,

    /// Sequence score on 0-100; blended with the frame score when given
    #[arg(short, long)]
    sequence: Option<f64>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

fn check_range(name: &str, value: f64) -> Result<()> {
    ensure!(
        (0.0..=100.0).contains(&value),
        "{} must be between 0 and 100, got {}",
        name,
        value
    );
    Ok(())
}

impl GradeCommand {
    pub async fn execute(self, session: &Session) -> Result<()> {
        check_range("Score", self.score)?;
        let service = session.service(None)?;

        let combination = match self.sequence {
            Some(sequence) => {
                check_range("Sequence score", sequence)?;
                service.combine_scores(self.score, sequence)
            }
            None => {
                let aggregator = service.aggregator();
                ScoreCombination {
                    frame_score: self.score,
                    sequence_score: 0.0,
                    combined_score: self.score as u32,
                    grade: aggregator.grade(self.score).into(),
                    level: aggregator.level(self.score),
                }
            }
        };

        if session.json(self.json) {
            print_json(&combination)
        } else {
            print_combination(&combination);
            Ok(())
        }
    }
}
