//! # CLI Command Implementations

use crate::api;
use crate::config::Settings;
use heartquest_core::{BitwiseChallenge, QuestEngine, QuestError, StageId};
use std::path::Path;

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server. Flags override the config file and environment.
pub async fn cmd_server(
    config: Option<&Path>,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), QuestError> {
    let mut settings = Settings::load(config)?;
    if let Some(host) = host {
        settings.host = host;
    }
    if let Some(port) = port {
        settings.port = port;
    }

    println!("HeartQuest Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Address:      {}", settings.addr());
    println!("  Rate limit:   {} req/s", settings.rate_limit);
    println!("  Session idle: {}s", settings.session_idle_secs);
    println!(
        "  Admin:        {}",
        if settings.api_key.is_some() {
            "enabled"
        } else {
            "disabled"
        }
    );
    println!();
    println!("Endpoints:");
    println!("  POST /journey/start   - Begin the quest");
    println!("  GET  /quest/{{stage}}   - View a stage");
    println!("  POST /quest/{{stage}}   - Submit an answer");
    println!("  GET  /reward          - The reward");
    println!("  GET  /health          - Health check");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    api::run_server(settings).await
}

// =============================================================================
// STAGES COMMAND
// =============================================================================

/// List the stage catalogue.
pub fn cmd_stages(json_mode: bool) -> Result<(), QuestError> {
    let catalogue = api::StagesResponse::default();

    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&catalogue).unwrap_or_default()
        );
        return Ok(());
    }

    println!("HeartQuest Stages");
    println!("=================");
    for info in &catalogue.stages {
        println!(
            "  {}. {:<16} /quest/{:<12} ({:?})",
            info.order, info.name, info.slug, info.kind
        );
    }
    Ok(())
}

// =============================================================================
// CHECK COMMAND
// =============================================================================

/// Parse `"a,b"` into Bitwise operands.
fn parse_operands(raw: &str) -> Result<BitwiseChallenge, QuestError> {
    let (a, b) = raw
        .split_once(',')
        .ok_or_else(|| QuestError::InvalidOperands(format!("expected 'a,b', got '{}'", raw)))?;
    let parse = |s: &str| {
        s.trim()
            .parse::<u32>()
            .map_err(|e| QuestError::InvalidOperands(format!("'{}': {}", s.trim(), e)))
    };
    BitwiseChallenge::new(parse(a)?, parse(b)?)
}

/// Validate an answer offline, without any session.
pub fn cmd_check(
    json_mode: bool,
    stage: &str,
    answer: Option<&str>,
    operands: Option<&str>,
) -> Result<(), QuestError> {
    let stage: StageId = stage.parse()?;
    let pending = match (stage, operands) {
        (_, Some(raw)) => Some(parse_operands(raw)?),
        (StageId::Bitwise, None) => {
            return Err(QuestError::InvalidOperands(
                "the bitwise stage needs --operands a,b".to_string(),
            ));
        }
        (_, None) => None,
    };

    let result = QuestEngine::validate(stage, answer, pending.as_ref());

    if json_mode {
        let output = serde_json::json!({
            "stage": stage.slug(),
            "correct": result.is_ok(),
            "reason": result.err(),
            "next": QuestEngine::advance_from(stage),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    match result {
        Ok(()) => println!("{}: correct", stage.name()),
        Err(reason) => println!("{}: incorrect ({})", stage.name(), reason),
    }
    Ok(())
}
