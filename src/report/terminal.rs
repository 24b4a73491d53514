use console::{style, StyledObject};
use voicepulse::analysis::insight;
use voicepulse::{util, AnalysisResult, Category, Confidence};

const BAR_WIDTH: usize = 20;

/// Print scores, insight and the underlying features.
pub fn print_result(r: &AnalysisResult) {
    println!();
    println!("  {}  {}", style("Energy ").bold(), score_line(r.scores.energy));
    println!("  {}  {}", style("Tension").bold(), score_line(r.scores.tension));
    println!("  {}  {}", style("Clarity").bold(), score_line(r.scores.clarity));
    println!();
    println!("  {}", category_style(r.category, &r.insight));
    println!("  Confidence: {}", confidence_label(r.confidence));
    println!();

    let f = &r.features;
    println!("  {}", style("Features").dim());
    println!("     Level:     {}", format_db(util::rms_db(f.rms)));
    if f.pitch_mean > 0.0 {
        println!(
            "     Pitch:     {:.1} Hz (variation {:.3})",
            f.pitch_mean, f.pitch_variance
        );
    } else {
        println!("     Pitch:     {}", style("not detected").yellow());
    }
    println!("     Voiced:    {:.0}%", f.voiced_ratio * 100.0);
    println!("     Centroid:  {:.0} Hz", f.spectral_centroid);
    println!("     ZCR:       {:.3}", f.zero_crossing_rate);
    println!("     Jitter:    {:.3}", f.jitter_proxy);
    println!("     Shimmer:   {:.3}", f.shimmer_proxy);
    println!("     Duration:  {:.1}s", f.duration_seconds);
}

/// Print the insight table in evaluation order.
pub fn print_rules() {
    for rule in insight::rules_by_priority() {
        println!(
            "  {:>3}  {:<16} {}",
            style(rule.priority).cyan(),
            style(rule.id).bold(),
            rule.message
        );
    }
}

fn score_line(score: u8) -> String {
    format!("{} {:>3}", score_bar(score), score)
}

/// Fixed-width bar: one filled cell per 5 points.
fn score_bar(score: u8) -> String {
    let filled = (score.min(100) as usize * BAR_WIDTH + 50) / 100;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

fn category_style(category: Category, text: &str) -> StyledObject<String> {
    let styled = style(text.to_string());
    match category {
        Category::Warning => styled.yellow(),
        Category::Positive => styled.green(),
        Category::Neutral => styled,
    }
}

fn confidence_label(confidence: Confidence) -> String {
    match confidence {
        Confidence::High => format!("{}", style("high").green()),
        Confidence::Medium => format!("{}", style("medium").yellow()),
        Confidence::Low => format!("{}", style("low").red()),
    }
}

fn format_db(db: f32) -> String {
    if db.is_finite() {
        format!("{db:.1} dBFS")
    } else {
        "silent".into()
    }
}
