//! schemagraph - schema.org JSON-LD graph compiler.

mod cli;

use anyhow::{Context, Result, bail};
use clap::Parser;
use cli::{Cli, Commands};
use schemagraph::{
    SiteConfig,
    arbitrate::Stripper,
    breadcrumb::resolve_trail,
    diagnostic::{CheckSpec, DiagnosticResult, Status, evaluate, site_health},
    emit,
    log,
    source::{Fixture, MemoryStore, Sources},
};
use std::{
    fs,
    io::{self, Read},
    path::Path,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match &cli.command {
        Commands::Render { fixture, report } => render(&config, fixture, *report),
        Commands::Trail { fixture } => trail(&config, fixture),
        Commands::Check {
            input,
            target_type,
            spec,
        } => check(input, target_type.as_deref(), spec.as_deref()),
        Commands::Strip { input } => strip(&config, input),
        Commands::Health { fixture } => health(&config, fixture.as_deref()),
    }
}

/// Load and validate configuration from CLI arguments
fn load_config(cli: &Cli) -> Result<SiteConfig> {
    let root = cli.root.as_deref().unwrap_or(Path::new("./"));
    let config_path = root.join(&cli.config);

    let mut config = if config_path.exists() {
        SiteConfig::from_path(&config_path)?
    } else if cli.config_optional() {
        SiteConfig::default()
    } else {
        bail!("Config file not found: {}", config_path.display())
    };

    if let Some(url) = &cli.base_url {
        config.base.url = url.clone();
        config.normalize();
    }

    if !cli.config_optional() {
        config.validate()?;
    }
    Ok(config)
}

fn render(config: &SiteConfig, fixture: &Path, report: bool) -> Result<()> {
    let (ctx, store) = load_fixture(fixture)?;
    let sources = Sources::new(&store).with_commerce(&store);

    if report {
        let compiled = emit::compile(config, &ctx, sources);
        println!("{}", serde_json::to_string_pretty(&compiled.validation)?);
        return Ok(());
    }

    match emit::render(config, &ctx, sources) {
        Some(script) => println!("{script}"),
        None => log!("render"; "nothing to emit for {}", ctx.url),
    }
    Ok(())
}

fn trail(config: &SiteConfig, fixture: &Path) -> Result<()> {
    let (ctx, store) = load_fixture(fixture)?;
    let trail = resolve_trail(&ctx, config, &store);
    println!("{}", serde_json::to_string_pretty(&trail)?);
    Ok(())
}

fn check(input: &Path, target_type: Option<&str>, spec: Option<&Path>) -> Result<()> {
    let spec = match (spec, target_type) {
        (Some(path), _) => CheckSpec::from_path(path)?,
        (None, Some(target)) => CheckSpec::for_type(target),
        (None, None) => CheckSpec::default(),
    };
    let text = read_input(input)?;
    let result = evaluate(&text, &spec);

    print_result(spec.target_type.as_deref().unwrap_or("document"), &result);
    if result.status == Status::Error {
        bail!("check failed in {} phase", result.phase);
    }
    Ok(())
}

fn strip(config: &SiteConfig, input: &Path) -> Result<()> {
    let stripper = Stripper::new(config.arbitration.strip_patterns.as_slice())?;
    let html = read_input(input)?;
    let (text, removed) = stripper.strip(&html);
    log!("strip"; "removed {} foreign block(s)", removed);
    print!("{text}");
    Ok(())
}

fn health(config: &SiteConfig, fixture: Option<&Path>) -> Result<()> {
    let store = match fixture {
        Some(path) => load_fixture(path)?.1,
        None => MemoryStore::new(),
    };

    let checks = site_health(config, Sources::new(&store));
    let failed = checks
        .iter()
        .filter(|check| check.result.status == Status::Error)
        .count();
    for check in &checks {
        print_result(&check.type_name, &check.result);
    }

    if failed > 0 {
        bail!("{failed} of {} health checks failed", checks.len());
    }
    log!("health"; "all {} checks passed", checks.len());
    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

fn load_fixture(path: &Path) -> Result<(schemagraph::PageContext, MemoryStore)> {
    let fixture = Fixture::from_path(path)
        .with_context(|| format!("failed to load fixture {}", path.display()))?;
    Ok(fixture.into_parts())
}

/// Read a file, or stdin for `-`.
fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn print_result(label: &str, result: &DiagnosticResult) {
    let module = match result.status {
        Status::Error => "error",
        Status::Warning => "warn",
        Status::Info => "check",
    };
    log!(module; "{}: {}", label, result.message);
    for detail in &result.details {
        log!(module; "  {}", detail);
    }
}
