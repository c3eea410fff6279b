//! CLI definition using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use fleetcost_domain::model::{
    EquipmentInput, EquipmentStatus, MaintenanceLevel, ResaleValue, UsagePreset,
};
use fleetcost_domain::service::{SortKey, SortOrder};
use fleetcost_types::OutputFormat;

#[derive(Parser)]
#[command(name = "fleetcost")]
#[command(author = "yuuji")]
#[command(version)]
#[command(about = "Equipment fleet operating cost and hourly rate calculator")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Store directory. Uses config value if not specified.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List equipment through the category filter, search, and sort
    List {
        /// Category to show ("All" for every category)
        #[arg(long, short = 'c')]
        category: Option<String>,

        /// Case-insensitive search on name, make, and model
        #[arg(long, short = 's')]
        search: Option<String>,

        /// Sort key (name, cost, date, category)
        #[arg(long)]
        sort: Option<SortKey>,

        /// Sort order (asc, desc)
        #[arg(long)]
        order: Option<SortOrder>,
    },

    /// Show one record with its cost breakdown
    Show {
        id: String,
    },

    /// Add a new piece of equipment
    Add {
        #[command(flatten)]
        equipment: EquipmentArgs,

        /// Save even if the input fails validation
        #[arg(long)]
        force: bool,
    },

    /// Update fields of an existing record
    Update {
        id: String,

        #[command(flatten)]
        equipment: EquipmentArgs,

        /// Save even if the input fails validation
        #[arg(long)]
        force: bool,
    },

    /// Remove a record
    Remove {
        id: String,
    },

    /// Set the lifecycle status of a record
    Status {
        id: String,

        /// New status (active, maintenance, retired)
        status: EquipmentStatus,
    },

    /// Copy a record under a new id
    Duplicate {
        id: String,
    },

    /// Fleet totals
    Stats {
        /// Also break totals down per category
        #[arg(long)]
        by_category: bool,
    },

    /// Records with high hourly cost, high age, or low utilization
    Attention,

    /// Most recently added records
    Recent {
        /// Number of records to show
        #[arg(long, short = 'n', default_value_t = 5)]
        limit: usize,
    },

    /// Preview costs and alerts for input without saving it
    Calc {
        #[command(flatten)]
        equipment: EquipmentArgs,
    },

    /// Show usage presets, maintenance tiers, and categories
    Presets,

    /// Export the fleet as a JSON document (or a CSV report)
    Export {
        /// Output file (defaults to the suggested file name)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Write the current list view as CSV instead
        #[arg(long)]
        csv: bool,
    },

    /// Merge an exported JSON document into the fleet
    Import {
        /// Exported JSON file
        file: PathBuf,

        /// Report what would be added without saving
        #[arg(long)]
        dry_run: bool,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set store directory
        #[arg(long)]
        set_data_dir: Option<PathBuf>,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Set default category filter
        #[arg(long)]
        set_category: Option<String>,

        /// Set default sort key
        #[arg(long)]
        set_sort: Option<SortKey>,

        /// Set default sort order
        #[arg(long)]
        set_order: Option<SortOrder>,

        /// Reset to default configuration
        #[arg(long)]
        reset: bool,
    },
}

/// Equipment input fields; omitted flags leave the field unchanged
#[derive(Args, Debug, Clone, Default)]
pub struct EquipmentArgs {
    /// Equipment name
    #[arg(long)]
    pub name: Option<String>,

    /// Model year
    #[arg(long)]
    pub year: Option<i32>,

    /// Category (e.g. "Skid Steer")
    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub make: Option<String>,

    #[arg(long)]
    pub model: Option<String>,

    #[arg(long)]
    pub serial_number: Option<String>,

    /// Usage preset (light, moderate, heavy); explicit days/hours win
    #[arg(long)]
    pub usage: Option<UsagePreset>,

    #[arg(long)]
    pub days_per_year: Option<f64>,

    #[arg(long)]
    pub hours_per_day: Option<f64>,

    #[arg(long)]
    pub purchase_price: Option<f64>,

    /// Manual resale value, overriding the estimate
    #[arg(long, conflicts_with = "auto_resale")]
    pub resale_value: Option<f64>,

    /// Drop a manual resale value and use the estimate
    #[arg(long)]
    pub auto_resale: bool,

    #[arg(long)]
    pub years_of_service: Option<f64>,

    #[arg(long)]
    pub daily_fuel_cost: Option<f64>,

    /// Maintenance level (minimal, standard, intense, custom)
    #[arg(long)]
    pub maintenance: Option<MaintenanceLevel>,

    /// Annual maintenance cost, used with --maintenance custom
    #[arg(long)]
    pub custom_maintenance_cost: Option<f64>,

    /// Annual insurance cost
    #[arg(long)]
    pub insurance: Option<f64>,
}

impl EquipmentArgs {
    /// Overlay the given flags onto `input`
    pub fn apply_to(&self, input: &mut EquipmentInput) {
        let identity = &mut input.identity;
        if let Some(ref name) = self.name {
            identity.equipment_name = name.clone();
        }
        if self.year.is_some() {
            identity.year = self.year;
        }
        if let Some(ref category) = self.category {
            identity.category = category.clone();
        }
        if let Some(ref make) = self.make {
            identity.make = make.clone();
        }
        if let Some(ref model) = self.model {
            identity.model = model.clone();
        }
        if self.serial_number.is_some() {
            identity.serial_number = self.serial_number.clone();
        }

        let usage = &mut input.usage;
        if let Some(preset) = self.usage {
            usage.days_per_year = Some(preset.days_per_year());
            usage.hours_per_day = Some(preset.hours_per_day());
        }
        if self.days_per_year.is_some() {
            usage.days_per_year = self.days_per_year;
        }
        if self.hours_per_day.is_some() {
            usage.hours_per_day = self.hours_per_day;
        }

        let financial = &mut input.financial;
        if self.purchase_price.is_some() {
            financial.purchase_price = self.purchase_price;
        }
        if let Some(value) = self.resale_value {
            financial.resale = ResaleValue::Manual(value);
        } else if self.auto_resale {
            financial.resale = ResaleValue::Auto;
        }
        if self.years_of_service.is_some() {
            financial.years_of_service = self.years_of_service;
        }
        if self.daily_fuel_cost.is_some() {
            financial.daily_fuel_cost = self.daily_fuel_cost;
        }
        if self.maintenance.is_some() {
            financial.maintenance_level = self.maintenance;
        }
        if self.custom_maintenance_cost.is_some() {
            financial.custom_maintenance_cost = self.custom_maintenance_cost;
        }
        if self.insurance.is_some() {
            financial.annual_insurance_cost = self.insurance;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_add_args_build_input() {
        let cli = Cli::parse_from([
            "fleetcost",
            "add",
            "--name",
            "Mulcher 1",
            "--make",
            "Caterpillar",
            "--usage",
            "moderate",
            "--hours-per-day",
            "7",
            "--maintenance",
            "Custom",
            "--custom-maintenance-cost",
            "3100",
            "--resale-value",
            "9000",
        ]);
        let Commands::Add { equipment, force } = cli.command else {
            panic!("expected add");
        };
        assert!(!force);

        let mut input = EquipmentInput::default();
        equipment.apply_to(&mut input);
        assert_eq!(input.identity.equipment_name, "Mulcher 1");
        assert_eq!(input.usage.days_per_year, Some(200.0));
        assert_eq!(input.usage.hours_per_day, Some(7.0));
        assert_eq!(input.financial.maintenance_level, Some(MaintenanceLevel::Custom));
        assert_eq!(input.financial.resale, ResaleValue::Manual(9000.0));
    }

    #[test]
    fn test_update_leaves_unset_fields() {
        let cli = Cli::parse_from(["fleetcost", "update", "abc", "--auto-resale", "-f", "json"]);
        assert_eq!(cli.format, Some(OutputFormat::Json));
        let Commands::Update { id, equipment, .. } = cli.command else {
            panic!("expected update");
        };
        assert_eq!(id, "abc");

        let mut input = EquipmentInput::default();
        input.identity.make = "Bandit".to_string();
        input.financial.resale = ResaleValue::Manual(5000.0);
        equipment.apply_to(&mut input);
        assert_eq!(input.identity.make, "Bandit");
        assert_eq!(input.financial.resale, ResaleValue::Auto);
    }

    #[test]
    fn test_status_and_sort_values_parse() {
        let cli = Cli::parse_from(["fleetcost", "status", "abc", "retired"]);
        assert!(matches!(
            cli.command,
            Commands::Status { status: EquipmentStatus::Retired, .. }
        ));

        let cli = Cli::parse_from(["fleetcost", "list", "--sort", "cost", "--order", "desc"]);
        assert!(matches!(
            cli.command,
            Commands::List { sort: Some(SortKey::Cost), order: Some(SortOrder::Desc), .. }
        ));

        assert!(Cli::try_parse_from(["fleetcost", "status", "abc", "sold"]).is_err());
    }
}
