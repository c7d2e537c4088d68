//! CLI command definitions.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::blood::Urgency;
use crate::forms::{DonorForm, RequestForm};

/// Serve command arguments.
#[derive(Debug, Args)]
pub struct ServeCommand {
    /// Address to listen on (overrides `server.bind`)
    #[arg(short, long, value_name = "ADDR")]
    pub bind: Option<SocketAddr>,
}

/// Donor registration arguments.
///
/// Fields left out start blank and fail validation unless filled in
/// interactively.
#[derive(Debug, Default, Args)]
pub struct DonateCommand {
    /// Donor's full name
    #[arg(long)]
    pub full_name: Option<String>,

    /// Age in years (18 to 65)
    #[arg(long)]
    pub age: Option<String>,

    /// Male, Female, Other, or "Prefer not to say"
    #[arg(long)]
    pub gender: Option<String>,

    /// Blood type, e.g. O+ or AB-
    #[arg(long)]
    pub blood_type: Option<String>,

    /// Phone number
    #[arg(long)]
    pub contact_number: Option<String>,

    /// Email address
    #[arg(long)]
    pub email: Option<String>,

    /// Postal address
    #[arg(long)]
    pub address: Option<String>,

    /// Relevant medical history
    #[arg(long)]
    pub medical_history: Option<String>,

    /// Prompt for each field, re-asking only fields that fail validation.
    /// Enter keeps the shown value and `-` clears it
    #[arg(short, long)]
    pub interactive: bool,
}

impl DonateCommand {
    /// Form values from the given flags.
    #[must_use]
    pub fn to_form(&self) -> DonorForm {
        let defaults = DonorForm::default();
        DonorForm {
            full_name: self.full_name.clone().unwrap_or(defaults.full_name),
            age: self.age.clone().unwrap_or(defaults.age),
            gender: self.gender.clone().unwrap_or(defaults.gender),
            blood_type: self.blood_type.clone().unwrap_or(defaults.blood_type),
            contact_number: self.contact_number.clone().unwrap_or(defaults.contact_number),
            email: self.email.clone().unwrap_or(defaults.email),
            address: self.address.clone().unwrap_or(defaults.address),
            medical_history: self.medical_history.clone().unwrap_or(defaults.medical_history),
        }
    }
}

/// Blood request arguments.
#[derive(Debug, Default, Args)]
pub struct RequestCommand {
    /// Requester's name
    #[arg(long)]
    pub name: Option<String>,

    /// Requester's phone number
    #[arg(long)]
    pub contact_number: Option<String>,

    /// Blood type needed
    #[arg(long)]
    pub blood_type: Option<String>,

    /// Units needed [default: 1]
    #[arg(long)]
    pub quantity: Option<String>,

    /// Treating hospital
    #[arg(long)]
    pub hospital_name: Option<String>,

    /// Patient's name
    #[arg(long)]
    pub patient_name: Option<String>,

    /// How soon the blood is needed [default: Normal]
    #[arg(long, value_enum)]
    pub urgency: Option<UrgencyArg>,

    /// Patient's condition
    #[arg(long)]
    pub patient_condition: Option<String>,

    /// Prompt for each field, re-asking only fields that fail validation.
    /// Enter keeps the shown value and `-` clears it
    #[arg(short, long)]
    pub interactive: bool,
}

impl RequestCommand {
    /// Form values from the given flags.
    #[must_use]
    pub fn to_form(&self) -> RequestForm {
        let defaults = RequestForm::default();
        RequestForm {
            name: self.name.clone().unwrap_or(defaults.name),
            contact_number: self.contact_number.clone().unwrap_or(defaults.contact_number),
            blood_type: self.blood_type.clone().unwrap_or(defaults.blood_type),
            quantity: self.quantity.clone().unwrap_or(defaults.quantity),
            hospital_name: self.hospital_name.clone().unwrap_or(defaults.hospital_name),
            patient_name: self.patient_name.clone().unwrap_or(defaults.patient_name),
            urgency: self
                .urgency
                .map_or(defaults.urgency, |u| Urgency::from(u).label().to_string()),
            patient_condition: self
                .patient_condition
                .clone()
                .unwrap_or(defaults.patient_condition),
        }
    }
}

/// Urgency argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UrgencyArg {
    /// Routine request
    Normal,
    /// Needed soon
    Urgent,
    /// Needed immediately
    Critical,
}

impl From<UrgencyArg> for Urgency {
    fn from(arg: UrgencyArg) -> Self {
        match arg {
            UrgencyArg::Normal => Self::Normal,
            UrgencyArg::Urgent => Self::Urgent,
            UrgencyArg::Critical => Self::Critical,
        }
    }
}

/// Inventory listing arguments.
#[derive(Debug, Args)]
pub struct InventoryCommand {
    /// Only this blood type ("all" for any)
    #[arg(short, long)]
    pub blood_type: Option<String>,

    /// Only this status: Low, Medium, High ("all" for any)
    #[arg(short, long)]
    pub status: Option<String>,

    /// Text to find in the blood type or location
    #[arg(long)]
    pub search: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One line per row
    #[default]
    Plain,
    /// Aligned columns
    Table,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_donate_flags_fill_form() {
        let cmd = DonateCommand {
            full_name: Some("Ada Obi".to_string()),
            age: Some("30".to_string()),
            ..DonateCommand::default()
        };
        let form = cmd.to_form();
        assert_eq!(form.full_name, "Ada Obi");
        assert_eq!(form.age, "30");
        assert!(form.email.is_empty());
    }

    #[test]
    fn test_request_flags_keep_initial_values() {
        let form = RequestCommand::default().to_form();
        assert_eq!(form, RequestForm::default());

        let cmd = RequestCommand {
            quantity: Some("3".to_string()),
            urgency: Some(UrgencyArg::Critical),
            ..RequestCommand::default()
        };
        let form = cmd.to_form();
        assert_eq!(form.quantity, "3");
        assert_eq!(form.urgency, "Critical");
    }

    #[test]
    fn test_urgency_arg_conversion() {
        assert_eq!(Urgency::from(UrgencyArg::Normal), Urgency::Normal);
        assert_eq!(Urgency::from(UrgencyArg::Urgent), Urgency::Urgent);
        assert_eq!(Urgency::from(UrgencyArg::Critical), Urgency::Critical);
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Plain);
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        assert!(format!("{cmd:?}").contains("Show"));
    }
}
