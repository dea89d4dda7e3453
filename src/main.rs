use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use enumgen::banner;
use enumgen::config::EnumSpec;
use enumgen::generator::RustGenerator;
use enumgen::resolver::{self, CaseConversionConfig};
use enumgen::schema;

#[derive(Parser)]
#[command(name = "enumgen")]
#[command(about = "Declarative YAML enumeration specs compiled to Rust enum companions")]
#[command(version)]
struct Cli {
    /// Enumeration spec file (*.enum.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Skip the rustfmt pass over the generated source
    #[arg(long)]
    skip_format: bool,

    /// Print the resolved definition before emission
    #[arg(short, long)]
    debug: bool,

    /// Replace the output file if it already exists
    #[arg(long)]
    overwrite: bool,

    /// Install the *.enum.yaml JSON Schema into a VS Code project
    #[arg(long, value_name = "PROJECT_DIR")]
    vscode: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(project) = &cli.vscode {
        return schema::install_vscode(project);
    }

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => anyhow::bail!("missing --config path"),
    };

    validate_config_path(&config_path)?;
    run_generation(&cli, &config_path)
}

fn validate_config_path(path: &Path) -> Result<()> {
    let name = path.to_string_lossy();
    if !name.ends_with(".enum.yaml") {
        anyhow::bail!("{} must be a .enum.yaml file", name);
    }
    if !path.is_file() {
        anyhow::bail!("invalid config path {}", name);
    }
    Ok(())
}

fn run_generation(cli: &Cli, config_path: &Path) -> Result<()> {
    println!("enumgen v{}", env!("CARGO_PKG_VERSION"));
    println!("{}", "=".repeat(50));

    println!("\n[1/4] Loading {}...", config_path.display());
    let mut spec = EnumSpec::load(config_path)
        .with_context(|| format!("can't load config path {}", config_path.display()))?;

    // CLI flags win over the spec document.
    if cli.skip_format {
        spec.skip_format = true;
    }
    if cli.debug {
        spec.debug = true;
    }

    let output_path = spec
        .output_path
        .clone()
        .unwrap_or_else(|| config_path.with_extension("rs"));

    let cfg = CaseConversionConfig::from_spec(&spec.serialize)?;
    let header_lines = header_lines(&spec)?;

    println!("\n[2/4] Resolving {} values...", spec.values.len());
    let definition = resolver::resolve(&spec, &output_path, &header_lines, &cfg)?;
    println!(
        "  Resolved {} as {} ({} values)",
        definition.package_name,
        definition.type_name,
        definition.values.len()
    );

    if spec.debug {
        println!("{definition:#?}");
    }

    println!("\n[3/4] Generating source...");
    let mut source = RustGenerator::new(&definition).generate();
    if spec.skip_format {
        println!("  Skipping rustfmt");
    } else {
        source = format_source(source);
    }

    println!("\n[4/4] Writing output...");
    write_output(&output_path, &source, cli.overwrite)?;

    println!("\n{}", "=".repeat(50));
    println!(
        "Done! Generated {} with {} values",
        definition.type_name,
        definition.values.len()
    );

    Ok(())
}

/// Header text, in priority order: inline `header`, then the file named by
/// `header-from`, then the default DO-NOT-EDIT lines.
fn header_lines(spec: &EnumSpec) -> Result<Vec<String>> {
    if let Some(header) = &spec.header {
        return Ok(header.lines().map(str::to_string).collect());
    }

    if let Some(path) = &spec.header_from {
        let text = fs::read_to_string(path)
            .with_context(|| format!("can't read header-from path {}", path.display()))?;
        return Ok(text.lines().map(str::to_string).collect());
    }

    Ok(banner::DEFAULT_HEADER.iter().map(|s| s.to_string()).collect())
}

/// Pipe the source through rustfmt when available. A missing or failing
/// formatter downgrades to a warning; the unformatted source still ships.
fn format_source(source: String) -> String {
    let child = Command::new("rustfmt")
        .args(["--edition", "2021"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn();

    let mut child = match child {
        Ok(child) => child,
        Err(err) => {
            eprintln!("  Warning: rustfmt unavailable ({err}), emitting unformatted source");
            return source;
        }
    };

    if let Some(mut stdin) = child.stdin.take() {
        if stdin.write_all(source.as_bytes()).is_err() {
            eprintln!("  Warning: rustfmt rejected input, emitting unformatted source");
            let _ = child.wait();
            return source;
        }
    }

    match child.wait_with_output() {
        Ok(output) if output.status.success() && !output.stdout.is_empty() => {
            String::from_utf8_lossy(&output.stdout).into_owned()
        }
        _ => {
            eprintln!("  Warning: rustfmt failed, emitting unformatted source");
            source
        }
    }
}

fn write_output(path: &Path, source: &str, overwrite: bool) -> Result<()> {
    if path.exists() {
        if !overwrite {
            println!(
                "  {} already exists, skipping (pass --overwrite to replace)",
                path.display()
            );
            return Ok(());
        }

        let existing = fs::read_to_string(path)
            .with_context(|| format!("can't read {}", path.display()))?;
        if existing == source {
            println!("  No changes for {}", path.display());
            return Ok(());
        }
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("can't create {}", parent.display()))?;
        }
    }

    fs::write(path, source).with_context(|| format!("can't write {}", path.display()))?;
    println!("  Written {}", path.display());

    Ok(())
}
