use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use volley_coach::ScoringProfile;

use super::Session;
use crate::input::read_frame;
use crate::output::{print_frame_report, print_json};

#[derive(Args)]
pub struct FrameCommand {
    /// JSON file holding one landmark frame, or an array of frames
    file: PathBuf,

    /// Frame to score when the file holds an array
    #[arg(short, long)]
    index: Option<usize>,

    /// Scoring profile (tolerant or strict), overriding the configuration
    #[arg(short, long)]
    profile: Option<ScoringProfile>,

    /// Print the full analysis as JSON
    #[arg(long)]
    json: bool,
}

impl FrameCommand {
    pub async fn execute(self, session: &Session) -> Result<()> {
        let frame = read_frame(&self.file, self.index)?;
        let analysis = session.service(self.profile)?.analyze_frame(frame.as_ref());

        if session.json(self.json) {
            print_json(&analysis)
        } else {
            print_frame_report(&analysis, session.config.output.show_measurements);
            Ok(())
        }
    }
}
