use anyhow::{bail, Result};
use clap::{Args, ValueEnum};
use std::path::PathBuf;

use volley_coach::models::AggregationMode;
use volley_coach::ScoringProfile;

use super::Session;
use crate::input::read_sequence;
use crate::output::{print_json, print_sequence_report};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Best frame blended with smoothness and completeness
    Sequence,
    /// Representative frame blended with the sequence aggregate
    Representative,
}

impl From<ModeArg> for AggregationMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Sequence => AggregationMode::Sequence,
            ModeArg::Representative => AggregationMode::Representative,
        }
    }
}

#[derive(Args)]
pub struct AnalyzeCommand {
    /// JSON file holding an array of landmark frames (`null` = no body detected)
    file: PathBuf,

    /// Aggregation path
    #[arg(short, long, value_enum, default_value = "sequence")]
    mode: ModeArg,

    /// Scoring profile (tolerant or strict), overriding the configuration
    #[arg(short, long)]
    profile: Option<ScoringProfile>,

    /// Print the full result as JSON
    #[arg(long)]
    json: bool,
}

impl AnalyzeCommand {
    pub async fn execute(self, session: &Session) -> Result<()> {
        let frames = read_sequence(&self.file)?;
        if frames.is_empty() {
            bail!("{} contains no frames", self.file.display());
        }

        let service = session.service(self.profile)?;
        tracing::debug!(
            "Analyzing {} frames from {} with the {} profile",
            frames.len(),
            self.file.display(),
            service.profile()
        );

        let result = service
            .analyze_sequence_concurrent(frames, self.mode.into())
            .await?;

        if session.json(self.json) {
            print_json(&result)
        } else {
            print_sequence_report(&result, session.config.output.show_measurements);
            Ok(())
        }
    }
}
