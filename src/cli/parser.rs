use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for phainspect
/// Field inspections, checklist responses and dashboard over SQLite
#[derive(Parser)]
#[command(
    name = "phainspect",
    version = env!("CARGO_PKG_VERSION"),
    about = "PHA field inspections: checklist responses, PMI tasks, attachments, dashboard and REST API",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Create a backup copy of the database
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long)]
        compress: bool,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Load demo inspectors and inspections
    Seed,

    /// Create, inspect and update inspections
    Inspection {
        #[command(subcommand)]
        action: InspectionCmd,
    },

    /// Checklist areas and their items
    Area {
        #[command(subcommand)]
        action: AreaCmd,
    },

    /// Checklist responses of an inspection
    Response {
        #[command(subcommand)]
        action: ResponseCmd,
    },

    /// Preventive maintenance tasks
    Pmi {
        #[command(subcommand)]
        action: PmiCmd,
    },

    /// Photos attached to an inspection
    Image {
        #[command(subcommand)]
        action: ImageCmd,
    },

    /// Inspector and tenant signatures
    Signature {
        #[command(subcommand)]
        action: SignatureCmd,
    },

    /// Per-site status counts
    Dashboard {
        #[arg(long, help = "Service area: SS, CS, AMPB or PAPMC")]
        area: Option<String>,

        #[arg(long)]
        year: Option<i32>,

        #[arg(long, help = "Month (1-12)")]
        month: Option<u32>,

        #[arg(long = "site", help = "Restrict to one site code")]
        site: Option<String>,

        #[arg(long, help = "Print the summary as JSON")]
        json: bool,
    },

    /// Inspector registry
    Inspector {
        #[command(subcommand)]
        action: InspectorCmd,
    },

    /// Session token of the current inspector
    Auth {
        #[command(subcommand)]
        action: AuthCmd,
    },

    /// Export inspections
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, help = "Only inspections with this status")]
        status: Option<String>,

        #[arg(long = "site", help = "Only inspections of this site code")]
        site: Option<String>,

        #[arg(long, help = "Only inspections of this service area")]
        area: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Run the REST API server
    Serve {
        #[arg(long, value_name = "HOST:PORT", help = "Listen address (default from config)")]
        addr: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum InspectionCmd {
    /// List inspections ordered by SO number
    List {
        #[arg(long)]
        status: Option<String>,

        #[arg(long, help = "Service area: SS, CS, AMPB or PAPMC")]
        area: Option<String>,

        #[arg(long = "site")]
        site: Option<String>,

        #[arg(long, default_value_t = 0, help = "Page number (0-based)")]
        page: usize,

        #[arg(long)]
        size: Option<usize>,
    },

    /// Show one inspection with its progress
    Show { so: String },

    /// Create a new inspection
    Create {
        #[arg(long)]
        unit: String,

        #[arg(long = "site")]
        site_code: String,

        #[arg(long = "site-name")]
        site_name: Option<String>,

        #[arg(long)]
        address: String,

        #[arg(long)]
        division: Option<String>,

        #[arg(long)]
        tenant: Option<String>,

        #[arg(long = "tenant-phone")]
        tenant_phone: Option<String>,

        #[arg(long = "br-size")]
        br_size: Option<u32>,

        #[arg(long)]
        hardwired: bool,

        #[arg(long)]
        inspector: Option<String>,

        #[arg(long, help = "Start date (YYYY-MM-DD)")]
        date: Option<String>,

        #[arg(long, help = "Start time (HH:MM[:SS])")]
        time: Option<String>,
    },

    /// Partial update of an inspection
    Update {
        so: String,

        #[arg(long)]
        status: Option<String>,

        #[arg(long = "start-time")]
        start_time: Option<String>,

        #[arg(long = "end-date")]
        end_date: Option<String>,

        #[arg(long = "end-time")]
        end_time: Option<String>,

        #[arg(long)]
        tenant: Option<String>,

        #[arg(long = "tenant-phone")]
        tenant_phone: Option<String>,

        #[arg(long = "tenant-available")]
        tenant_available: Option<bool>,

        #[arg(long = "smoke")]
        smoke_detectors: Option<u32>,

        #[arg(long = "co")]
        co_detectors: Option<u32>,
    },

    /// Close an inspection
    Submit {
        so: String,

        #[arg(long = "end-time")]
        end_time: Option<String>,

        #[arg(long = "completion-date")]
        completion_date: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum AreaCmd {
    /// List checklist areas
    List,

    /// List the items of one area
    Items { area: String },
}

#[derive(Subcommand)]
pub enum ResponseCmd {
    /// Record the answer for one checklist item
    Set {
        so: String,
        item: String,

        #[arg(help = "OK, NA or Def")]
        response: String,

        #[arg(long = "scope")]
        scope_of_work: Option<String>,

        #[arg(long = "material")]
        material_description: Option<String>,

        #[arg(long = "service")]
        service_id: Option<String>,

        #[arg(long = "activity")]
        activity_code: Option<String>,

        #[arg(long = "tenant-charge")]
        tenant_charge: bool,

        #[arg(long)]
        urgent: bool,

        #[arg(long)]
        rrp: bool,
    },

    /// List the responses of an inspection
    List { so: String },

    /// Show one response
    Show { so: String, item: String },

    /// Delete one response
    Del { so: String, item: String },

    /// Answered items against the checklist
    Progress { so: String },
}

#[derive(Subcommand)]
pub enum PmiCmd {
    /// List PMI categories
    Categories,

    /// List the tasks of one category
    Items { category: String },

    /// Record a PMI task result
    Set {
        so: String,
        item: String,

        #[arg(long)]
        category: String,

        #[arg(long, help = "Mark the task as not completed")]
        pending: bool,

        #[arg(long)]
        notes: Option<String>,
    },

    /// List PMI results of an inspection
    List { so: String },

    /// Delete one PMI result
    Del { so: String, item: String },
}

#[derive(Subcommand)]
pub enum ImageCmd {
    /// Attach a photo file to an inspection
    Upload {
        so: String,
        path: String,

        #[arg(long)]
        item: Option<String>,

        #[arg(long)]
        caption: Option<String>,

        #[arg(long = "mime", help = "MIME type (guessed from the extension when omitted)")]
        mime_type: Option<String>,
    },

    /// List image metadata
    List { so: String },

    /// Write the decoded image to a file
    Get {
        so: String,
        id: String,

        #[arg(long, value_name = "FILE")]
        out: String,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Delete an image
    Del { so: String, id: String },
}

#[derive(Subcommand)]
pub enum SignatureCmd {
    /// Attach a signature image
    Upload {
        so: String,

        #[arg(help = "inspector or tenant")]
        kind: String,

        path: String,

        #[arg(long = "by")]
        signed_by: String,
    },

    /// List signature metadata
    List { so: String },

    /// Write the decoded signature to a file
    Get {
        so: String,
        kind: String,

        #[arg(long, value_name = "FILE")]
        out: String,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Delete a signature
    Del { so: String, kind: String },
}

#[derive(Subcommand)]
pub enum InspectorCmd {
    /// Register an inspector
    Add {
        id: String,
        name: String,

        #[arg(long = "vehicle")]
        vehicle_tag: Option<String>,
    },

    /// List registered inspectors
    List,

    /// Mark an inspector inactive
    Deactivate { id: String },
}

#[derive(Subcommand)]
pub enum AuthCmd {
    /// Store a bearer token
    Login {
        #[arg(long)]
        token: String,

        #[arg(long)]
        inspector: Option<String>,
    },

    /// Show the current session
    Status,

    /// Clear the session
    Logout,
}
