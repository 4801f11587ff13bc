//! `warp-label` — generate WARP2 Charger package labels and print them.
//!
//! One invocation is one run: validate the request, patch the EZPL template,
//! resolve serial numbers (literal or provisioned), and deliver the combined
//! byte stream to the printer or to stdout. Every failure is fatal and
//! fail-closed — no output is emitted for a failed run.

mod config;

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use chrono::Datelike;
use clap::Parser;
use warp_label::{
    BuildDate, LabelRequest, PatchedLabel, RequestFields, SerialAssignment, Template, assemble,
};
use warp_label_print_client::{Printer, PrinterTimeouts, TcpPrinter};
use warp_label_provision::{
    DEFAULT_TIMEOUT, HttpSerialSource, LiteralSerialSource, PasswordFile,
};

use crate::config::{Settings, ToolConfig};

// ── CLI definition ──────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "warp-label",
    disable_version_flag = true,
    about = "Generate WARP2 Charger package labels and send them to the label printer"
)]
struct Cli {
    /// Type code, e.g. WARP2-CS-11KW-50 (optionally TF- prefixed).
    type_code: String,

    /// Firmware version as printed on the label, e.g. 2.17.
    version: String,

    /// Serial number (ten digits starting with 5), or "-" to fetch fresh
    /// serial numbers from the provisioning service.
    serial_number: String,

    /// Build date as YYYY-MM.
    build_date: String,

    /// Number of distinct labels to generate, each with its own serial.
    #[arg(short, long, default_value_t = 1)]
    instances: u32,

    /// Physical copies the printer makes of each label.
    #[arg(short, long, default_value_t = 1)]
    copies: u32,

    /// Write the raw EZPL stream to stdout instead of the printer.
    #[arg(short, long)]
    stdout: bool,

    /// Accept a build date earlier than the current month.
    #[arg(long)]
    force_build_date: bool,

    /// Validate and patch only: print a summary to stderr, emit nothing.
    #[arg(long)]
    dry_run: bool,

    /// EZPL template file.
    #[arg(long)]
    template: Option<PathBuf>,

    /// Printer host[:port] (port defaults to 9100).
    #[arg(long)]
    printer: Option<String>,

    /// JSON config file overriding the deployment defaults.
    #[arg(long)]
    config: Option<PathBuf>,
}

// ── Main ────────────────────────────────────────────────────────────────────

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let file_config = match cli.config.as_deref() {
        Some(path) => config::load(path)?,
        None => ToolConfig::default(),
    };
    let settings = Settings::resolve(
        cli.printer.as_deref(),
        cli.template.as_deref(),
        file_config,
    );

    let request = LabelRequest::validate(
        &RequestFields {
            type_code: &cli.type_code,
            version: &cli.version,
            serial_number: &cli.serial_number,
            build_date: &cli.build_date,
            instances: cli.instances,
            copies: cli.copies,
            allow_past_build_date: cli.force_build_date,
        },
        current_month(),
    )?;

    // Template and (if needed) credentials are read in full before any
    // network or printer I/O.
    let raw = fs::read(&settings.template)
        .with_context(|| format!("cannot read template {}", settings.template.display()))?;
    let template = Template::new(raw)?;
    let label = template.patch(&request)?;

    if cli.dry_run {
        print_summary(&request);
        return Ok(());
    }

    let data = resolve_serials(&label, &request, &settings)?;

    if cli.stdout {
        let mut out = std::io::stdout().lock();
        out.write_all(&data).context("cannot write to stdout")?;
        out.flush().context("cannot write to stdout")?;
    } else {
        let mut printer = TcpPrinter::connect(&settings.printer_addr, PrinterTimeouts::default())?;
        printer.send_raw(&data)?;
    }

    Ok(())
}

/// Fill in one serial per instance and concatenate the instance documents.
fn resolve_serials(
    label: &PatchedLabel,
    request: &LabelRequest,
    settings: &Settings,
) -> Result<Vec<u8>> {
    let data = match &request.serial {
        SerialAssignment::Literal(serial) => {
            let mut source = LiteralSerialSource::new(serial.clone());
            assemble(label, request.instances, &mut source)?
        }
        SerialAssignment::Auto => {
            let credentials =
                PasswordFile::new(settings.provision_user.clone(), &settings.password_file);
            let mut source =
                HttpSerialSource::new(&settings.provision_url, &credentials, DEFAULT_TIMEOUT)?;
            assemble(label, request.instances, &mut source)?
        }
    };
    Ok(data)
}

/// The current year-month for the build-date freshness guard.
fn current_month() -> BuildDate {
    let now = chrono::Local::now();
    BuildDate {
        year: now.year() as u16,
        month: now.month() as u8,
    }
}

/// Human summary for --dry-run. Goes to stderr; stdout stays reserved for
/// the label byte stream.
fn print_summary(request: &LabelRequest) {
    let product = &request.product;
    eprintln!("type:        {}", product.literal());
    eprintln!("description: {}", product.description());
    eprintln!("current:     {}", product.power().current_label());
    eprintln!("ean13:       {}", String::from_utf8_lossy(product.ean13()));
    eprintln!("version:     {}", request.version);
    eprintln!("build date:  {}", request.build_date);
    match &request.serial {
        SerialAssignment::Auto => eprintln!("serial:      auto-assigned"),
        SerialAssignment::Literal(serial) => eprintln!("serial:      {serial}"),
    }
    eprintln!("instances:   {}", request.instances);
    eprintln!("copies:      {}", request.copies);
}
