use anyhow::Result;
use colored::{ColoredString, Colorize};
use serde::Serialize;

use volley_coach::models::{
    CombinedResult, Feedback, FeedbackKind, FrameAnalysis, FrameMeasurements, Grade, GradeInfo,
    LevelInfo, ScoreBreakdown, ScoreCombination,
};

const RULE: &str = "────────────────────────────────";

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn grade_label(grade: Grade) -> ColoredString {
    let letter = grade.to_string();
    match grade {
        Grade::S => letter.bright_magenta().bold(),
        Grade::A => letter.green().bold(),
        Grade::B => letter.cyan().bold(),
        Grade::C => letter.yellow().bold(),
        Grade::D => letter.red().bold(),
    }
}

fn feedback_line(line: &Feedback) -> String {
    match line.kind {
        FeedbackKind::Info => format!("  {}", line.message.bold()),
        FeedbackKind::Affirmation => format!("  {} {}", "✓".green(), line.message),
        FeedbackKind::Suggestion => format!("  {} {}", "•".yellow(), line.message),
        FeedbackKind::Correction => format!("  {} {}", "✗".red(), line.message),
    }
}

fn print_grade(grade: &GradeInfo, level: &LevelInfo) {
    println!("Grade:          {}  {}", grade_label(grade.grade), grade.description);
    let status = if level.passed {
        "passed".green()
    } else {
        "not passed".red()
    };
    println!("Level:          {} ({})", level.level, status);
    if let Some(next) = level.next_level {
        println!("Next level:     {}", next);
    }
    println!("                {}", level.message.dimmed());
}

fn print_breakdown(breakdown: &ScoreBreakdown) {
    println!("Breakdown:");
    for (name, pct) in [
        ("arm", breakdown.arm),
        ("body", breakdown.body),
        ("position", breakdown.position),
        ("stability", breakdown.stability),
    ] {
        println!("  {:<10} {:>5.1}%", name, pct);
    }
}

fn print_measurements(measurements: &FrameMeasurements) {
    println!("Measurements:");
    for (name, value) in [
        ("body scale", measurements.body_scale),
        ("left arm", measurements.left_arm_angle),
        ("right arm", measurements.right_arm_angle),
        ("arm gap", measurements.arm_gap_angle),
        ("left knee", measurements.left_knee_angle),
        ("right knee", measurements.right_knee_angle),
        ("wrist pos", measurements.wrist_position_ratio),
        ("visibility", measurements.mean_visibility),
    ] {
        match value {
            Some(value) => println!("  {:<10} {:>7.2}", name, value),
            None => println!("  {:<10} {:>7}", name, "n/a".dimmed()),
        }
    }
}

fn print_feedback(feedback: &[Feedback]) {
    println!("Feedback:");
    for line in feedback {
        println!("{}", feedback_line(line));
    }
}

/// Human-readable report of a sequence analysis
pub fn print_sequence_report(result: &CombinedResult, show_measurements: bool) {
    println!("Forearm Pass Analysis");
    println!("{}", RULE);
    println!();
    println!(
        "Combined score: {}",
        result.combined_score.to_string().bold()
    );
    print_grade(&result.grade, &result.level);
    println!();
    println!(
        "Frames:         {} ({} valid)",
        result.total_frames, result.valid_frames
    );
    println!(
        "Best frame:     #{} scoring {}",
        result.best_frame_index, result.best_frame_score.total
    );
    println!(
        "Sequence:       {:.1} (smoothness {:.1}, completeness {:.1}, consistency {:.1})",
        result.sequence_score,
        result.sequence_metrics.smoothness,
        result.sequence_metrics.completeness,
        result.sequence_metrics.consistency
    );
    println!();
    print_breakdown(&result.breakdown);
    if show_measurements {
        println!();
        print_measurements(&result.best_frame_score.measurements);
    }
    println!();
    print_feedback(&result.feedback);
}

/// Human-readable report of a single frame
pub fn print_frame_report(analysis: &FrameAnalysis, show_measurements: bool) {
    let score = &analysis.frame_score;

    println!("Frame Analysis");
    println!("{}", RULE);
    println!();
    println!("Frame score:    {}", score.total.to_string().bold());
    println!(
        "Sub-scores:     arm {:.1}, body {:.1}, position {:.1}, stability {:.1}",
        score.arm, score.body, score.position, score.stability
    );
    print_grade(&analysis.grade, &analysis.level);
    println!();
    print_breakdown(&analysis.breakdown);
    if show_measurements {
        println!();
        print_measurements(&score.measurements);
    }
    println!();
    print_feedback(&score.feedback);
}

/// Human-readable grade of a caller-supplied score pair
pub fn print_combination(combination: &ScoreCombination) {
    println!(
        "Combined score: {}",
        combination.combined_score.to_string().bold()
    );
    print_grade(&combination.grade, &combination.level);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feedback_markers() {
        colored::control::set_override(false);
        assert_eq!(
            feedback_line(&Feedback::correction("Arms too wide")),
            "  ✗ Arms too wide"
        );
        assert_eq!(
            feedback_line(&Feedback::affirmation("Good")),
            "  ✓ Good"
        );
    }
}
