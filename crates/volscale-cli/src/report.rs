//! Outcome reporting: human-readable table or JSON lines.

use anyhow::bail;

use volscale_core::ResizeOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

impl Format {
    pub fn parse(s: &str) -> anyhow::Result<Self> {
        match s {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => bail!("unknown output format: {other} (expected text or json)"),
        }
    }
}

pub fn print(outcomes: &[ResizeOutcome], format: Format) {
    match format {
        Format::Text => print_table(outcomes),
        Format::Json => print_json(outcomes),
    }
}

fn print_table(outcomes: &[ResizeOutcome]) {
    println!(
        "{:30} {:>11} {:>22} {:>22} {:>5} {:>5} {}",
        "Volume", "Level", "used [B]", "allocated [B]", "used%", "snap%", "Action"
    );
    for outcome in outcomes {
        println!("{}", table_row(outcome));
    }
}

fn table_row(outcome: &ResizeOutcome) -> String {
    let name = if outcome.volume_name.is_empty() {
        outcome.volume_id.to_string()
    } else {
        outcome.volume_name.clone()
    };
    let level = outcome
        .service_level
        .map(|l| l.ui_name())
        .unwrap_or("-");
    let used_percent = if outcome.previous_size > 0 {
        format!("{}", outcome.used_bytes * 100 / outcome.previous_size)
    } else {
        "-".to_string()
    };
    let action = if outcome.applied {
        format!("resized to {} B", outcome.proposed_size)
    } else {
        outcome
            .skip_reason
            .map(|r| r.to_string())
            .unwrap_or_default()
    };
    format!(
        "{:30} {:>11} {:>22} {:>22} {:>5} {:>5} {}",
        name,
        level,
        outcome.used_bytes,
        outcome.previous_size,
        used_percent,
        outcome.snap_reserve_percent,
        action
    )
}

fn print_json(outcomes: &[ResizeOutcome]) {
    for outcome in outcomes {
        match serde_json::to_string(outcome) {
            Ok(line) => println!("{line}"),
            Err(e) => eprintln!("cannot serialize outcome: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use volscale_core::{ServiceLevel, SkipReason, VolumeId};

    #[test]
    fn parses_known_formats() {
        assert_eq!(Format::parse("text").unwrap(), Format::Text);
        assert_eq!(Format::parse("json").unwrap(), Format::Json);
        assert!(Format::parse("yaml").is_err());
    }

    #[test]
    fn table_row_carries_level_usage_and_reserve() {
        let outcome = ResizeOutcome {
            volume_id: VolumeId::new("us-east4", "7a1b"),
            volume_name: "vol1".to_string(),
            service_level: Some(ServiceLevel::Standard),
            used_bytes: 800,
            previous_size: 1000,
            proposed_size: 1250,
            snap_reserve_percent: 10,
            applied: true,
            skip_reason: None,
        };
        let row = table_row(&outcome);
        // The level is reported under its UI name.
        assert!(row.contains("premium"));
        assert!(row.contains("800"));
        // 800 of 1000 bytes used.
        assert!(row.contains("80"));
        assert!(row.contains("resized to 1250 B"));
    }

    #[test]
    fn fetch_failure_row_degrades_gracefully() {
        let outcome = ResizeOutcome::fetch_failed(VolumeId::new("us-east4", "ghost"));
        let row = table_row(&outcome);
        assert!(row.contains("us-east4/ghost"));
        assert!(row.contains(&SkipReason::FetchFailed.to_string()));
        // Level and used% fall back to a placeholder.
        assert!(row.contains("  -"));
    }
}
