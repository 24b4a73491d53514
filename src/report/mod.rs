pub mod terminal;

use anyhow::{Context, Result};
use voicepulse::AnalysisResult;

/// Print a result either as styled terminal output or pretty JSON.
pub fn render(result: &AnalysisResult, json: bool) -> Result<()> {
    if json {
        println!("{}", to_json(result)?);
    } else {
        terminal::print_result(result);
    }
    Ok(())
}

pub fn to_json(result: &AnalysisResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("Failed to serialize analysis result")
}
