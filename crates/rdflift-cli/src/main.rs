mod log_buffer;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use log_buffer::LogBuffer;
use rdflift_catalog::{capture, DatabaseCatalog, PostgresCatalog};
use rdflift_core::{
    syntax, Config, DatabaseConfig, DatabaseSnapshot, Diagnostic, PrefixMap, RdfFormat,
    SchemaSnapshot, Severity, TripleSet, ValidationReport,
};
use rdflift_engine::{
    DirectMapper, MappingConfiguration, MappingDocument, MappingExecutor, MappingGenerator,
    QualityValidator, TemplateGenerator,
};

/// Config file looked up in the working directory
const DEFAULT_CONFIG: &str = "rdflift.toml";

/// Triples shown by `direct --verbose`
const SAMPLE_TRIPLES: usize = 5;

/// rdflift - Relational data to RDF
#[derive(Parser)]
#[command(name = "rdflift")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: rdflift.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read schema, row counts and rows from the configured database
    Capture {
        /// Output file for the database snapshot
        #[arg(short, long, default_value = "snapshot.json")]
        output: PathBuf,

        /// Maximum rows read per table (default: direct_mapping.row_limit)
        #[arg(long)]
        row_limit: Option<usize>,
    },

    /// Map every table of a snapshot to RDF
    Direct {
        /// Database snapshot (JSON)
        snapshot: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// RDF format (default: rdf_format from config)
        #[arg(short, long)]
        format: Option<String>,

        /// Maximum rows mapped per table
        #[arg(long)]
        row_limit: Option<usize>,
    },

    /// Show per-table size estimates for a schema
    Stats {
        /// Schema or database snapshot (JSON)
        schema: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate a starter mapping configuration from table metadata
    Template {
        /// Schema or database snapshot (JSON)
        schema: PathBuf,

        /// Tables to include (or all if not specified)
        #[arg(short, long)]
        table: Vec<String>,

        /// Output file for the mapping configuration (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate or render R2RML mapping configurations
    R2rml {
        #[command(subcommand)]
        command: R2rmlCommands,
    },

    /// Apply a mapping configuration to the rows of a snapshot
    Execute {
        /// Mapping configuration (JSON)
        mapping: PathBuf,

        /// Database snapshot (JSON)
        snapshot: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// RDF format (default: rdf_format from config)
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Check the quality of an RDF document
    Validate {
        /// RDF document
        input: PathBuf,

        /// Input format (default: from the file extension)
        #[arg(short, long)]
        format: Option<String>,

        /// Schema or database snapshot for the completeness check
        #[arg(short, long)]
        schema: Option<PathBuf>,

        /// Mapping configuration restricting the completeness check
        #[arg(short = 'm', long)]
        mapping: Option<PathBuf>,

        /// Output file for the quality report
        #[arg(short, long, default_value = "quality-report.json")]
        output: PathBuf,

        /// Also output markdown report
        #[arg(long)]
        markdown: Option<PathBuf>,

        /// Only check syntax and structure
        #[arg(long, conflicts_with = "completeness_only")]
        quick: bool,

        /// Only check syntax and completeness (requires --schema)
        #[arg(long, requires = "schema")]
        completeness_only: bool,
    },

    /// Convert an RDF document between formats
    Convert {
        /// RDF document
        input: PathBuf,

        /// Target format
        #[arg(short, long)]
        to: String,

        /// Source format (default: from the file extension)
        #[arg(long)]
        from: Option<String>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum R2rmlCommands {
    /// Check a mapping configuration and list every problem
    Validate {
        /// Mapping configuration (JSON)
        mapping: PathBuf,
    },

    /// Render a mapping configuration as R2RML triples
    Generate {
        /// Mapping configuration (JSON)
        mapping: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// RDF format (default: rdf_format from config)
        #[arg(short, long)]
        format: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let logs = init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref(), cli.verbose)?;

    if cli.verbose {
        eprintln!("{} {}", "Base namespace:".cyan(), config.base_namespace);
    }

    let failed = match cli.command {
        Commands::Capture { output, row_limit } => {
            capture_command(&config, &output, row_limit, cli.verbose).await?
        }
        Commands::Direct {
            snapshot,
            output,
            format,
            row_limit,
        } => direct_command(
            &config,
            &snapshot,
            output.as_deref(),
            format.as_deref(),
            row_limit,
            cli.verbose,
        )?,
        Commands::Stats { schema, json } => stats_command(&schema, json)?,
        Commands::Template {
            schema,
            table,
            output,
        } => template_command(&config, &schema, &table, output.as_deref(), cli.verbose)?,
        Commands::R2rml { command } => match command {
            R2rmlCommands::Validate { mapping } => r2rml_validate_command(&config, &mapping)?,
            R2rmlCommands::Generate {
                mapping,
                output,
                format,
            } => r2rml_generate_command(
                &config,
                &mapping,
                output.as_deref(),
                format.as_deref(),
                cli.verbose,
            )?,
        },
        Commands::Execute {
            mapping,
            snapshot,
            output,
            format,
        } => execute_command(
            &config,
            &mapping,
            &snapshot,
            output.as_deref(),
            format.as_deref(),
            cli.verbose,
        )?,
        Commands::Validate {
            input,
            format,
            schema,
            mapping,
            output,
            markdown,
            quick,
            completeness_only,
        } => validate_command(
            &config,
            &ValidateArgs {
                input,
                format,
                schema,
                mapping,
                output,
                markdown,
                quick,
                completeness_only,
            },
            cli.verbose,
        )?,
        Commands::Convert {
            input,
            to,
            from,
            output,
        } => convert_command(&config, &input, &to, from.as_deref(), output.as_deref())?,
    };

    if cli.verbose {
        print_log_stats(&logs);
    }

    // Exit with error code if there are errors
    if failed {
        std::process::exit(1);
    }

    Ok(())
}

/// Install the stderr formatter and the in-memory log buffer
fn init_tracing(verbose: bool) -> LogBuffer {
    let logs = LogBuffer::default();
    let default_level = if verbose { "info" } else { "warn" };

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(logs.layer())
        .init();

    logs
}

fn load_config(path: Option<&Path>, verbose: bool) -> Result<Config> {
    let config = if let Some(config_path) = path {
        Config::from_file(config_path)
            .with_context(|| format!("Failed to load config {}", config_path.display()))?
    } else if Path::new(DEFAULT_CONFIG).exists() {
        Config::from_file(Path::new(DEFAULT_CONFIG))?
    } else {
        if verbose {
            eprintln!("{}", "No config file found, using defaults".yellow());
        }
        Config::default()
    };
    Ok(config)
}

/// Capture command - read a database into a snapshot file
async fn capture_command(
    config: &Config,
    output: &Path,
    row_limit: Option<usize>,
    verbose: bool,
) -> Result<bool> {
    let catalog = open_catalog(config, verbose).await?;

    if verbose {
        eprintln!("{}", "Testing database connection...".cyan());
    }
    catalog
        .test_connection()
        .await
        .map_err(|e| anyhow!("Failed to connect to database: {}", e))?;

    let row_limit = row_limit.unwrap_or(config.direct_mapping.row_limit);
    if verbose {
        eprintln!("{}", "✓ Connection successful".green());
        eprintln!("{} {} rows per table...", "Capturing up to".cyan(), row_limit);
    }

    let snapshot = capture(catalog.as_ref(), row_limit).await?;
    snapshot
        .save_to_file(output)
        .with_context(|| format!("Failed to write snapshot {}", output.display()))?;

    println!(
        "Captured {} tables and {} rows from {}",
        snapshot.schema.tables.len(),
        snapshot.row_total(),
        catalog.name()
    );
    for (table, reason) in &snapshot.failures {
        println!("  {} {}: {}", "⚠".yellow(), table, reason);
    }
    println!("{} {}", "Snapshot saved to:".green(), output.display());

    Ok(false)
}

/// Connect to the database named by the `[database]` section or `DATABASE_URL`
async fn open_catalog(config: &Config, verbose: bool) -> Result<Box<dyn DatabaseCatalog>> {
    let url = std::env::var("DATABASE_URL").ok();

    let Some(db) = &config.database else {
        let url = url.ok_or_else(|| {
            anyhow!(
                "No database configuration found. Add a [database] section to {} \
                 or set DATABASE_URL.",
                DEFAULT_CONFIG
            )
        })?;
        if verbose {
            eprintln!("{}", "Connecting with DATABASE_URL...".cyan());
        }
        return Ok(Box::new(PostgresCatalog::from_connection_string(&url, "public").await?));
    };

    match db.database_type.to_lowercase().as_str() {
        "postgres" | "postgresql" => {}
        other => bail!("Unsupported database type '{}'. Supported: postgres", other),
    }

    if verbose {
        eprintln!("{} {}...", "Connecting to".cyan(), db.database_type);
    }

    let tls = db.settings.get("sslmode").is_some_and(|mode| mode == "require");
    let catalog = match db.settings.get("connection_string").or(url.as_ref()) {
        Some(conn_str) if tls => {
            PostgresCatalog::from_connection_string_with_tls(conn_str, &db.schema).await?
        }
        Some(conn_str) => PostgresCatalog::from_connection_string(conn_str, &db.schema).await?,
        None => {
            let port = match db.settings.get("port") {
                Some(port) => port
                    .parse::<u16>()
                    .with_context(|| format!("Invalid port '{}'", port))?,
                None => 5432,
            };
            PostgresCatalog::connect(
                setting(db, "host")?,
                port,
                setting(db, "database")?,
                setting(db, "user")?,
                setting(db, "password")?,
                &db.schema,
            )
            .await?
        }
    };

    Ok(Box::new(catalog))
}

fn setting<'a>(db: &'a DatabaseConfig, key: &str) -> Result<&'a String> {
    db.settings
        .get(key)
        .ok_or_else(|| anyhow!("PostgreSQL requires '{}' in database settings", key))
}

/// Direct command - map a snapshot with the direct mapping rules
fn direct_command(
    config: &Config,
    snapshot_path: &Path,
    output: Option<&Path>,
    format: Option<&str>,
    row_limit: Option<usize>,
    verbose: bool,
) -> Result<bool> {
    let format = resolve_format(format, output, &config.rdf_format)?;
    let snapshot = load_snapshot(snapshot_path, verbose)?;

    let mut mapper = DirectMapper::from_config(config);
    if let Some(limit) = row_limit {
        mapper = mapper.with_row_limit(limit);
    }

    let mapping = mapper.map(&snapshot.schema, &snapshot);
    print_diagnostics(&mapping.diagnostics);

    let prefixes = prefixes(config);
    let text = syntax::serialize(&mapping.triples, format, &prefixes)?;
    write_output(output, &text)?;

    let stats = &mapping.stats;
    eprintln!(
        "Mapped {} rows from {} of {} tables into {} triples ({})",
        stats.rows_mapped,
        stats.tables_mapped,
        stats.tables,
        mapping.triples.len(),
        format.name()
    );
    if stats.rows_skipped > 0 {
        eprintln!("  {} rows skipped", stats.rows_skipped.to_string().yellow());
    }
    if !stats.truncated_tables.is_empty() {
        eprintln!(
            "  {} row limit {} reached for: {}",
            "⚠".yellow(),
            mapper.row_limit(),
            stats.truncated_tables.join(", ")
        );
    }
    if verbose {
        print_sample(&mapping.triples, &prefixes);
    }

    Ok(false)
}

/// Stats command - size estimates from captured row counts
fn stats_command(schema_path: &Path, json: bool) -> Result<bool> {
    let schema = load_schema(schema_path)?;
    let stats = DirectMapper::statistics(&schema);

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(false);
    }

    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{}", "Schema Statistics".bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());
    println!();

    println!("{} {}", "Tables:".bold(), stats.total_tables);
    println!("{} {}", "Rows:".bold(), stats.total_rows);
    println!();

    for table in &stats.tables {
        let rows = table
            .rows
            .map(|r| r.to_string())
            .unwrap_or_else(|| "?".to_string());
        let triples = table
            .estimated_triples
            .map(|t| format!("~{} triples", t))
            .unwrap_or_else(|| "unknown size".dimmed().to_string());
        println!(
            "  {} ({} columns, {} rows, {})",
            table.table.green(),
            table.columns,
            rows,
            triples
        );
    }

    println!();
    println!("{}", "=".repeat(60).bright_blue());

    Ok(false)
}

/// Template command - starter mapping configuration for tables
fn template_command(
    config: &Config,
    schema_path: &Path,
    tables: &[String],
    output: Option<&Path>,
    verbose: bool,
) -> Result<bool> {
    let schema = load_schema(schema_path)?;
    let generator = TemplateGenerator::new(&config.base_namespace)?;

    for name in tables {
        if schema.find_table(name).is_none() {
            bail!("Table '{}' not found in {}", name, schema_path.display());
        }
    }

    let mut maps = Vec::new();
    for table in &schema.tables {
        if !tables.is_empty() && !tables.contains(&table.name) {
            continue;
        }
        match generator.for_table(table) {
            Ok(map) => {
                if verbose {
                    eprintln!("  {} {}", "✓".green(), map.id);
                }
                maps.push(map);
            }
            Err(e) => eprintln!("  {} {}: {}", "⚠ Skipped".yellow(), table.name, e),
        }
    }

    let mapping = MappingConfiguration::new(maps);
    write_output(output, &mapping.to_document().to_json()?)?;
    eprintln!("Generated {} triples maps", mapping.triples_maps.len());

    Ok(false)
}

/// R2RML validate command - report every problem of a mapping document
fn r2rml_validate_command(config: &Config, mapping_path: &Path) -> Result<bool> {
    let document = MappingDocument::from_file(mapping_path)?;
    let generator = MappingGenerator::from_config(config)?;
    let validation = generator.validate(&document);

    if validation.valid {
        println!(
            "{} {} is a valid mapping configuration",
            "✓".green(),
            mapping_path.display()
        );
        return Ok(false);
    }

    println!(
        "{} {} has {} problems:",
        "✗".red(),
        mapping_path.display(),
        validation.errors.len()
    );
    print_diagnostics(&validation.diagnostics());

    Ok(true)
}

/// R2RML generate command - render a mapping document as RDF
fn r2rml_generate_command(
    config: &Config,
    mapping_path: &Path,
    output: Option<&Path>,
    format: Option<&str>,
    verbose: bool,
) -> Result<bool> {
    let format = resolve_format(format, output, &config.rdf_format)?;
    let generator = MappingGenerator::from_config(config)?;

    let Some(mapping) = load_mapping(mapping_path)? else {
        return Ok(true);
    };

    if verbose {
        eprintln!(
            "{} {} triples maps...",
            "Rendering".cyan(),
            mapping.triples_maps.len()
        );
    }

    let text = generator.render(&mapping, format)?;
    write_output(output, &text)?;

    Ok(false)
}

/// Execute command - data triples from a mapping configuration
fn execute_command(
    config: &Config,
    mapping_path: &Path,
    snapshot_path: &Path,
    output: Option<&Path>,
    format: Option<&str>,
    verbose: bool,
) -> Result<bool> {
    let format = resolve_format(format, output, &config.rdf_format)?;
    let Some(mapping) = load_mapping(mapping_path)? else {
        return Ok(true);
    };
    let snapshot = load_snapshot(snapshot_path, verbose)?;

    let execution = MappingExecutor::new(config.direct_mapping.row_limit).execute(
        &mapping,
        Some(&snapshot.schema),
        &snapshot,
    )?;
    print_diagnostics(&execution.diagnostics);

    let text = syntax::serialize(&execution.triples, format, &prefixes(config))?;
    write_output(output, &text)?;

    eprintln!(
        "Executed {} triples maps over {} rows into {} triples",
        mapping.triples_maps.len(),
        execution.rows_read,
        execution.triples.len()
    );

    Ok(execution
        .diagnostics
        .iter()
        .any(|d| d.severity == Severity::Error))
}

struct ValidateArgs {
    input: PathBuf,
    format: Option<String>,
    schema: Option<PathBuf>,
    mapping: Option<PathBuf>,
    output: PathBuf,
    markdown: Option<PathBuf>,
    quick: bool,
    completeness_only: bool,
}

/// Validate command - quality report for an RDF document
fn validate_command(config: &Config, args: &ValidateArgs, verbose: bool) -> Result<bool> {
    let format = resolve_format(
        args.format.as_deref(),
        Some(args.input.as_path()),
        &config.rdf_format,
    )?;
    let text = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;

    let schema = args.schema.as_deref().map(load_schema).transpose()?;
    let mapping = match &args.mapping {
        Some(path) => match load_mapping(path)? {
            Some(mapping) => Some(mapping),
            None => return Ok(true),
        },
        None => None,
    };

    if verbose {
        eprintln!(
            "{} {} as {}...",
            "Validating".cyan(),
            args.input.display(),
            format.name()
        );
    }

    let validator = QualityValidator::from_config(config);
    let report = match (&schema, args.quick, args.completeness_only) {
        (_, true, _) => validator.validate_quick(&text, format),
        (Some(schema), _, true) => {
            validator.check_completeness(&text, format, schema, mapping.as_ref())
        }
        _ => validator.validate(&text, format, mapping.as_ref(), schema.as_ref()),
    };

    // Save JSON report
    report.save_to_file(&args.output)?;

    if verbose {
        eprintln!("{} {}", "Report saved to:".green(), args.output.display());
    }

    // Save markdown report if requested
    if let Some(md_path) = &args.markdown {
        std::fs::write(md_path, generate_markdown_report(&report))?;
        if verbose {
            eprintln!("{} {}", "Markdown report saved to:".green(), md_path.display());
        }
    }

    print_report_summary(&report);

    Ok(report.has_errors())
}

/// Convert command - parse in one format, write in another
fn convert_command(
    config: &Config,
    input: &Path,
    to: &str,
    from: Option<&str>,
    output: Option<&Path>,
) -> Result<bool> {
    let from = resolve_format(from, Some(input), &config.rdf_format)?;
    let to = syntax::parse_format(to).ok_or_else(|| anyhow!("Unknown RDF format '{}'", to))?;
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let converted = syntax::convert(&text, from, to, &prefixes(config))?;
    write_output(output, &converted.text)?;

    eprintln!(
        "Converted {} triples from {} to {}",
        converted.triples,
        from.name(),
        to.name()
    );

    Ok(false)
}

/// Pick the RDF format from an explicit name, then a file extension, then the config
fn resolve_format(name: Option<&str>, path: Option<&Path>, fallback: &str) -> Result<RdfFormat> {
    if let Some(name) = name {
        return syntax::parse_format(name).ok_or_else(|| anyhow!("Unknown RDF format '{}'", name));
    }

    let from_extension = path
        .and_then(|p| p.extension())
        .and_then(|ext| ext.to_str())
        .and_then(syntax::parse_format);

    match from_extension {
        Some(format) => Ok(format),
        None => syntax::parse_format(fallback)
            .ok_or_else(|| anyhow!("Unknown RDF format '{}' in config", fallback)),
    }
}

fn prefixes(config: &Config) -> PrefixMap {
    PrefixMap::standard(&config.base_namespace, &config.mapping_namespace())
}

fn load_snapshot(path: &Path, verbose: bool) -> Result<DatabaseSnapshot> {
    if verbose {
        eprintln!("{} {}", "Loading snapshot from:".cyan(), path.display());
    }
    DatabaseSnapshot::from_file(path)
        .with_context(|| format!("Failed to load snapshot {}", path.display()))
}

/// Load a schema from a schema file or from the schema part of a database snapshot
fn load_schema(path: &Path) -> Result<SchemaSnapshot> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    if let Ok(snapshot) = DatabaseSnapshot::from_json(&contents) {
        return Ok(snapshot.schema);
    }
    SchemaSnapshot::from_json(&contents)
        .with_context(|| format!("{} is neither a schema nor a database snapshot", path.display()))
}

/// Load and check a mapping configuration, printing every problem when invalid
fn load_mapping(path: &Path) -> Result<Option<MappingConfiguration>> {
    let document = MappingDocument::from_file(path)?;
    let validation = document.validate();
    if !validation.valid {
        eprintln!(
            "{} {} is not a valid mapping configuration:",
            "✗".red(),
            path.display()
        );
        print_diagnostics(&validation.diagnostics());
        return Ok(None);
    }
    Ok(Some(document.to_configuration()?))
}

fn write_output(output: Option<&Path>, text: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("{} {}", "Output saved to:".green(), path.display());
        }
        None => print!("{}", text),
    }
    Ok(())
}

fn severity_label(severity: Severity) -> colored::ColoredString {
    match severity {
        Severity::Error => "ERROR".red().bold(),
        Severity::Warn => "WARN".yellow().bold(),
        Severity::Info => "INFO".cyan(),
    }
}

/// Print diagnostics to stderr
fn print_diagnostics(diagnostics: &[Diagnostic]) {
    for diag in diagnostics {
        eprintln!("  [{}] {}: {}", severity_label(diag.severity), diag.code, diag.message);
        if let Some(loc) = &diag.location {
            eprintln!("    at {}", loc);
        }
    }
}

fn print_sample(triples: &TripleSet, prefixes: &PrefixMap) {
    if triples.is_empty() {
        return;
    }
    eprintln!("{}", "Sample triples:".bold());
    for quad in triples.iter().take(SAMPLE_TRIPLES) {
        eprintln!(
            "  {} {} {} .",
            prefixes.render_subject(quad.subject),
            prefixes.render_named_node(quad.predicate),
            prefixes.render_term(quad.object)
        );
    }
}

fn print_log_stats(logs: &LogBuffer) {
    if logs.is_empty() {
        return;
    }
    let stats = logs.stats();
    eprintln!(
        "{} {} events ({} errors, {} warnings)",
        "Log:".cyan(),
        stats.total,
        stats.error,
        stats.warn
    );
    for level in [tracing::Level::ERROR, tracing::Level::WARN] {
        for entry in logs.by_level(level) {
            eprintln!("  {}", entry);
        }
    }
}

/// Print report summary to stdout
fn print_report_summary(report: &ValidationReport) {
    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{}", "RDF Quality Report".bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());
    println!();

    println!("Version: {}", report.version);
    println!("Timestamp: {}", report.timestamp);
    println!();

    let score = format!("{}/100", report.score);
    let score = if report.score >= 80 {
        score.green().bold()
    } else if report.score >= 50 {
        score.yellow().bold()
    } else {
        score.red().bold()
    };
    println!("{} {}", "Score:".bold(), score);
    println!();

    println!("{}", "Summary:".bold());
    println!("  Passed:   {}", report.passed.len().to_string().green());

    if !report.errors.is_empty() {
        println!("  Errors:   {}", report.errors.len().to_string().red().bold());
    } else {
        println!("  Errors:   {}", report.errors.len().to_string().green());
    }

    if !report.warnings.is_empty() {
        println!("  Warnings: {}", report.warnings.len().to_string().yellow());
    } else {
        println!("  Warnings: {}", report.warnings.len().to_string().green());
    }
    println!();

    let metrics = &report.metrics;
    println!("{}", "Metrics:".bold());
    println!("  Triples:            {}", metrics.total_triples);
    println!("  Subjects:           {}", metrics.unique_subjects);
    println!("  Predicates:         {}", metrics.unique_predicates);
    println!("  Broken references:  {}", metrics.broken_references);
    if let (Some(completeness), Some(expected)) = (metrics.completeness, metrics.expected_resources)
    {
        println!("  Completeness:       {:.1}% of {} rows", completeness, expected);
    }
    println!("  Validation time:    {:.3}s", metrics.validation_time);
    println!();

    if report.errors.is_empty() && report.warnings.is_empty() {
        println!("{}", "✓ No issues found!".green().bold());
    } else {
        println!("{}", "Diagnostics:".bold());
        for diag in report.diagnostics() {
            if diag.severity == Severity::Info {
                continue;
            }
            println!("  [{}] {}: {}", severity_label(diag.severity), diag.code, diag.message);
        }
    }

    println!();
    println!("{}", "=".repeat(60).bright_blue());
}

/// Generate markdown report
fn generate_markdown_report(report: &ValidationReport) -> String {
    let mut md = String::new();

    md.push_str("# RDF Quality Report\n\n");
    md.push_str(&format!("**Version:** {}\n\n", report.version));
    md.push_str(&format!("**Timestamp:** {}\n\n", report.timestamp));
    md.push_str(&format!("**Score:** {}/100\n\n", report.score));

    md.push_str("## Summary\n\n");
    md.push_str(&format!("- Passed: {}\n", report.passed.len()));
    md.push_str(&format!("- Errors: {}\n", report.errors.len()));
    md.push_str(&format!("- Warnings: {}\n", report.warnings.len()));
    md.push('\n');

    let metrics = &report.metrics;
    md.push_str("## Metrics\n\n");
    md.push_str("| Metric | Value |\n|---|---|\n");
    md.push_str(&format!("| Triples | {} |\n", metrics.total_triples));
    md.push_str(&format!("| Unique subjects | {} |\n", metrics.unique_subjects));
    md.push_str(&format!("| Unique predicates | {} |\n", metrics.unique_predicates));
    md.push_str(&format!("| Unique objects | {} |\n", metrics.unique_objects));
    md.push_str(&format!("| Broken references | {} |\n", metrics.broken_references));
    if let Some(completeness) = metrics.completeness {
        md.push_str(&format!("| Completeness | {:.1}% |\n", completeness));
    }
    md.push_str(&format!(
        "| Literals | {:.1}% |\n",
        metrics.literal_percentage
    ));
    md.push('\n');

    if report.errors.is_empty() && report.warnings.is_empty() {
        md.push_str("✅ **No issues found!**\n");
    } else {
        md.push_str("## Diagnostics\n\n");

        for diag in report.diagnostics() {
            let severity_emoji = match diag.severity {
                Severity::Error => "❌",
                Severity::Warn => "⚠️",
                Severity::Info => continue,
            };

            md.push_str(&format!("### {} {} - {}\n\n", severity_emoji, diag.severity, diag.code));
            md.push_str(&format!("{}\n\n", diag.message));
        }
    }

    if !report.passed.is_empty() {
        md.push_str("## Passed Checks\n\n");
        for finding in &report.passed {
            md.push_str(&format!("- `{}` {}\n", finding.code, finding.message));
        }
    }

    md
}
