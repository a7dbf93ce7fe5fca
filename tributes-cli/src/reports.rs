use anyhow::Result;
use colored::Colorize;
use std::io::Write;

use tributes_game::{RoundSummary, RoundType};

use crate::runner::GameRecord;

fn rgb(color: u32) -> (u8, u8, u8) {
    let [_, r, g, b] = color.to_be_bytes();
    (r, g, b)
}

pub fn generate_console_report(out: &mut dyn Write, records: &[GameRecord]) -> Result<()> {
    for record in records {
        writeln!(out)?;
        writeln!(
            out,
            "{}",
            format!("🏹 {} (game {})", record.title, record.index + 1)
                .bright_cyan()
                .bold()
        )?;
        writeln!(out, "{}", "================================".cyan())?;
        writeln!(out, "{}", record.reaping.title.bold())?;
        writeln!(out, "{}", record.reaping.description)?;
        writeln!(out)?;

        for round in &record.rounds {
            write_console_round(out, round)?;
        }

        let (r, g, b) = rgb(record.winner.color);
        writeln!(out, "{}", record.winner.title.truecolor(r, g, b).bold())?;
        writeln!(
            out,
            "🏆 {}",
            record.winner.description.bright_yellow().bold()
        )?;
        writeln!(out, "{}", record.winner.footer.dimmed())?;

        let leaders = record.leaderboard();
        if !leaders.is_empty() {
            writeln!(out)?;
            writeln!(out, "{}", "⚔️ Kills".bright_yellow().bold())?;
            for tribute in leaders {
                writeln!(out, "   {} - {}", tribute.display(), tribute.kills)?;
            }
        }
    }
    Ok(())
}

fn write_console_round(out: &mut dyn Write, round: &RoundSummary) -> Result<()> {
    let (r, g, b) = rgb(round.color);
    writeln!(out, "{}", round.title.truecolor(r, g, b).bold())?;
    writeln!(out, "{}", round.description.italic())?;
    for message in &round.messages {
        if round.round == RoundType::Fallen {
            writeln!(out, "   {}", message.red())?;
        } else {
            writeln!(out, "   • {message}")?;
        }
    }
    writeln!(out, "{}", round.footer.dimmed())?;
    writeln!(out)?;
    Ok(())
}

pub fn generate_json_report(out: &mut dyn Write, records: &[GameRecord]) -> Result<()> {
    let json_output = serde_json::to_string_pretty(records)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report(out: &mut dyn Write, records: &[GameRecord]) -> Result<()> {
    for record in records {
        writeln!(out, "# {}\n", record.title)?;
        writeln!(out, "## {}\n", record.reaping.title)?;
        for line in record.reaping.description.lines() {
            writeln!(out, "- {line}")?;
        }
        writeln!(out)?;

        for round in &record.rounds {
            writeln!(out, "### {}\n", round.title)?;
            writeln!(out, "_{}_\n", round.description)?;
            for message in &round.messages {
                writeln!(out, "- {message}")?;
            }
            if !round.messages.is_empty() {
                writeln!(out)?;
            }
            writeln!(out, "> {}\n", round.footer)?;
        }

        writeln!(out, "## 🏆 {}\n", record.winner.title)?;
        writeln!(out, "**{}**\n", record.winner.description)?;
        let leaders = record.leaderboard();
        if !leaders.is_empty() {
            writeln!(out, "| Tribute | District | Kills |")?;
            writeln!(out, "|---|---|---|")?;
            for tribute in leaders {
                writeln!(
                    out,
                    "| {} | {} | {} |",
                    tribute.name, tribute.district, tribute.kills
                )?;
            }
            writeln!(out)?;
        }
    }
    Ok(())
}
