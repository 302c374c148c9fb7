use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "scribe",
    bin_name = "scribe",
    version,
    disable_help_subcommand = true
)]
#[command(about = "Terminal client for your notes, with autosave and trash", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an account on the users service
    #[command(display_order = 1)]
    Register { username: String },

    /// Log in and remember the session token
    #[command(display_order = 2)]
    Login { username: String },

    /// Forget the stored session token
    #[command(display_order = 3)]
    Logout,

    /// List notes, most recently updated first
    #[command(alias = "ls", display_order = 10)]
    List {
        /// Only notes whose title or text contains this term
        #[arg(short, long)]
        search: Option<String>,

        /// Show the start of each note below its title
        #[arg(long)]
        peek: bool,
    },

    /// Show a note
    #[command(alias = "v", display_order = 11)]
    View {
        /// Index of the note in `scribe list`
        index: usize,
    },

    /// Edit a note interactively (a new note when no index is given)
    #[command(alias = "e", display_order = 12)]
    Edit {
        /// Index of the note in `scribe list`
        index: Option<usize>,
    },

    /// Move notes to the trash
    #[command(alias = "rm", display_order = 13)]
    Delete {
        /// Indexes of the notes (e.g. 1 3 5)
        #[arg(required = true, num_args = 1..)]
        indexes: Vec<usize>,
    },

    /// List trashed notes, most recently trashed first
    #[command(display_order = 20)]
    Trash,

    /// Bring trashed notes back
    #[command(display_order = 21)]
    Restore {
        /// Indexes in `scribe trash`
        #[arg(required = true, num_args = 1..)]
        indexes: Vec<usize>,
    },

    /// Permanently delete trashed notes
    #[command(display_order = 22)]
    Purge {
        /// Indexes in `scribe trash`
        #[arg(required = true, num_args = 1..)]
        indexes: Vec<usize>,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show configuration
    #[command(display_order = 30)]
    Config {
        #[command(subcommand)]
        action: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print a commented scribe.toml with every default
    Gen,
    /// Print the config file location
    Path,
}
