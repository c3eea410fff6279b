//! Command handlers

use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use chrono::{Datelike, Utc};
use tracing::debug;

use fleetcost_app::fleet_store::preview;
use fleetcost_app::logging::init_tracing;
use fleetcost_app::repository::open_fleet_store;
use fleetcost_app::Config;
use fleetcost_domain::model::{EquipmentInput, EquipmentRecord, EquipmentStatus};
use fleetcost_domain::service::{quality_alerts, validate_form, FilterUpdate, SortKey, SortOrder};
use fleetcost_infra::csv_report::write_fleet_report;
use fleetcost_types::{Error, OutputFormat, Result};

use crate::cli::{Cli, Commands, EquipmentArgs};
use crate::output;

pub fn execute(cli: Cli) -> Result<()> {
    init_tracing(cli.verbose);

    // Load config
    let mut config = Config::load()?;

    // Override from CLI args
    if let Some(ref dir) = cli.data_dir {
        config.data_dir = Some(dir.clone());
    }
    let format = cli.format.unwrap_or(config.output_format);
    debug!(data_dir = ?config.data_dir, %format, "configuration resolved");

    match &cli.command {
        Commands::List {
            category,
            search,
            sort,
            order,
        } => cmd_list(
            &config,
            format,
            FilterUpdate {
                category: category.clone(),
                search: search.clone(),
                sort_by: *sort,
                sort_order: *order,
            },
        ),

        Commands::Show { id } => cmd_show(&config, format, id),

        Commands::Add { equipment, force } => cmd_add(&config, format, equipment, *force),

        Commands::Update {
            id,
            equipment,
            force,
        } => cmd_update(&config, format, id, equipment, *force),

        Commands::Remove { id } => cmd_remove(&config, format, id),

        Commands::Status { id, status } => cmd_status(&config, format, id, *status),

        Commands::Duplicate { id } => cmd_duplicate(&config, format, id),

        Commands::Stats { by_category } => cmd_stats(&config, format, *by_category),

        Commands::Attention => cmd_attention(&config, format),

        Commands::Recent { limit } => cmd_recent(&config, format, *limit),

        Commands::Calc { equipment } => cmd_calc(format, equipment),

        Commands::Presets => output::output_presets(format),

        Commands::Export { output, csv } => cmd_export(&config, output.clone(), *csv),

        Commands::Import { file, dry_run } => cmd_import(&config, format, file, *dry_run),

        Commands::Config {
            show,
            set_data_dir,
            set_output,
            set_category,
            set_sort,
            set_order,
            reset,
        } => cmd_config(
            *show,
            set_data_dir.clone(),
            *set_output,
            set_category.clone(),
            *set_sort,
            *set_order,
            *reset,
        ),
    }
}

fn current_year() -> i32 {
    Utc::now().year()
}

/// Print validation problems and alerts; refuse invalid input unless forced
fn check_input(input: &EquipmentInput, force: bool) -> Result<()> {
    let validation = validate_form(input);
    let alerts = quality_alerts(&input.calculate(), &input.usage);
    output::report_checks(&validation, &alerts);

    if !validation.is_valid && !force {
        return Err(Error::Validation(format!(
            "{} (use --force to save anyway)",
            validation.summary()
        )));
    }
    Ok(())
}

fn cmd_list(config: &Config, format: OutputFormat, update: FilterUpdate) -> Result<()> {
    let mut store = open_fleet_store(config)?;
    store.set_filter(update);
    output::output_equipment_list(format, store.derived_view())
}

fn cmd_show(config: &Config, format: OutputFormat, id: &str) -> Result<()> {
    let store = open_fleet_store(config)?;
    let (record, metrics) = store
        .with_metrics(id, current_year())
        .ok_or_else(|| Error::NotFound(id.to_string()))?;
    output::output_record(format, record, &metrics)
}

fn cmd_add(config: &Config, format: OutputFormat, equipment: &EquipmentArgs, force: bool) -> Result<()> {
    let mut input = EquipmentInput::default();
    equipment.apply_to(&mut input);
    check_input(&input, force)?;

    let mut store = open_fleet_store(config)?;
    let record = store.add(input)?;
    output::output_saved(format, "Added", &record)
}

fn cmd_update(
    config: &Config,
    format: OutputFormat,
    id: &str,
    equipment: &EquipmentArgs,
    force: bool,
) -> Result<()> {
    let mut store = open_fleet_store(config)?;
    let mut input = store
        .get_by_id(id)
        .map(EquipmentRecord::input)
        .ok_or_else(|| Error::NotFound(id.to_string()))?;
    equipment.apply_to(&mut input);
    check_input(&input, force)?;

    let record = store.update(id, input)?;
    output::output_saved(format, "Updated", &record)
}

fn cmd_remove(config: &Config, format: OutputFormat, id: &str) -> Result<()> {
    let mut store = open_fleet_store(config)?;
    let removed = store.remove(id)?;
    output::output_removed(format, id, removed)
}

fn cmd_status(config: &Config, format: OutputFormat, id: &str, status: EquipmentStatus) -> Result<()> {
    let mut store = open_fleet_store(config)?;
    let record = store.set_status(id, status)?;
    output::output_saved(format, "Updated", &record)
}

fn cmd_duplicate(config: &Config, format: OutputFormat, id: &str) -> Result<()> {
    let mut store = open_fleet_store(config)?;
    let record = store.duplicate(id)?;
    output::output_saved(format, "Added", &record)
}

fn cmd_stats(config: &Config, format: OutputFormat, by_category: bool) -> Result<()> {
    let store = open_fleet_store(config)?;
    let stats = store.stats();
    let breakdown = by_category.then(|| store.category_breakdown());
    output::output_stats(format, &stats, breakdown.as_ref())
}

fn cmd_attention(config: &Config, format: OutputFormat) -> Result<()> {
    let store = open_fleet_store(config)?;
    let flagged: Vec<EquipmentRecord> = store
        .needing_attention(current_year())
        .into_iter()
        .cloned()
        .collect();
    output::output_equipment_list(format, &flagged)
}

fn cmd_recent(config: &Config, format: OutputFormat, limit: usize) -> Result<()> {
    let store = open_fleet_store(config)?;
    output::output_equipment_list(format, &store.recent(limit))
}

fn cmd_calc(format: OutputFormat, equipment: &EquipmentArgs) -> Result<()> {
    let mut input = EquipmentInput::default();
    equipment.apply_to(&mut input);
    output::output_preview(format, &preview(&input))
}

fn cmd_export(config: &Config, out_path: Option<PathBuf>, csv: bool) -> Result<()> {
    let store = open_fleet_store(config)?;

    if csv {
        match out_path {
            Some(path) => {
                let writer = BufWriter::new(File::create(&path)?);
                write_fleet_report(writer, store.derived_view())?;
                eprintln!("Wrote {} row(s) to {}", store.derived_view().len(), path.display());
            }
            None => write_fleet_report(io::stdout().lock(), store.derived_view())?,
        }
        return Ok(());
    }

    let snapshot = store.export()?;
    let path = out_path.unwrap_or_else(|| PathBuf::from(&snapshot.suggested_filename));
    fs::write(&path, &snapshot.payload)?;
    println!(
        "Exported {} record(s) to {}",
        snapshot.document.equipment.len(),
        path.display()
    );
    Ok(())
}

fn cmd_import(config: &Config, format: OutputFormat, file: &Path, dry_run: bool) -> Result<()> {
    if !file.exists() {
        return Err(Error::InvalidImport(format!("file not found: {}", file.display())));
    }
    let payload = fs::read_to_string(file)?;

    let mut store = open_fleet_store(config)?;
    let outcome = if dry_run {
        store.import_preview(&payload)?
    } else {
        store.import(&payload)?
    };
    output::output_import(format, &outcome, dry_run)
}

fn cmd_config(
    show: bool,
    set_data_dir: Option<PathBuf>,
    set_output: Option<OutputFormat>,
    set_category: Option<String>,
    set_sort: Option<SortKey>,
    set_order: Option<SortOrder>,
    reset: bool,
) -> Result<()> {
    if reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("\n{}", config);
        return Ok(());
    }

    let mut config = Config::load()?;
    let mut modified = false;

    if let Some(dir) = set_data_dir {
        config.data_dir = Some(dir);
        modified = true;
    }

    if let Some(output_format) = set_output {
        config.output_format = output_format;
        modified = true;
    }

    if let Some(category) = set_category {
        config.default_category = category;
        modified = true;
    }

    if let Some(sort_by) = set_sort {
        config.default_sort_by = sort_by;
        modified = true;
    }

    if let Some(sort_order) = set_order {
        config.default_sort_order = sort_order;
        modified = true;
    }

    if modified {
        config.save()?;
        println!("Configuration updated");
    }

    if show || !modified {
        println!("{}", config);
    }

    Ok(())
}
