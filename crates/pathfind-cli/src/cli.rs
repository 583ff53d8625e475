use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use pathfind_core::presentation::NsfwDisplayMode;
use pathfind_core::{BookmarkFilter, BookmarkSort};

#[derive(Parser)]
#[command(name = "pathfind")]
#[command(about = "Browse, filter and save PathFind bookmarks from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// CLI profile name holding the server configuration
    #[arg(long, global = true, value_name = "NAME")]
    pub profile: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List bookmarks
    #[command(alias = "ls")]
    List {
        /// Flag filter
        #[arg(long, value_enum, default_value_t = FilterArg::All)]
        filter: FilterArg,
        /// Sort order
        #[arg(long, value_enum, default_value_t = SortArg::Newest)]
        sort: SortArg,
        /// Free-text search
        #[arg(short, long)]
        search: Option<String>,
        /// Only bookmarks carrying this tag
        #[arg(long, conflicts_with = "collection")]
        tag: Option<String>,
        /// Only bookmarks in this collection (ID)
        #[arg(long)]
        collection: Option<String>,
        /// Number of pages to fetch
        #[arg(short, long, default_value = "1")]
        pages: u32,
        /// How NSFW bookmarks are shown (overrides the profile setting)
        #[arg(long, value_name = "MODE")]
        nsfw: Option<NsfwDisplayMode>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a bookmark
    Delete {
        /// Bookmark ID or unique ID prefix
        id: String,
    },
    /// Toggle the archived flag of a bookmark
    Archive {
        /// Bookmark ID or unique ID prefix
        id: String,
    },
    /// Toggle the read-later flag of a bookmark
    ReadLater {
        /// Bookmark ID or unique ID prefix
        id: String,
    },
    /// List tags with bookmark counts
    Tags {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List collections
    Collections {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Save a link (reads stdin when no argument is given)
    #[command(alias = "add")]
    Save {
        /// URL, or text containing a URL
        input: Vec<String>,
        /// Title to store instead of the suggested one
        #[arg(long)]
        title: Option<String>,
        /// Tags to attach (repeatable)
        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<String>,
        /// Mark as read later
        #[arg(long)]
        read_later: bool,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Configure CLI profiles
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Manage the API key for a profile
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum FilterArg {
    All,
    ReadLater,
    Archived,
}

impl From<FilterArg> for BookmarkFilter {
    fn from(value: FilterArg) -> Self {
        match value {
            FilterArg::All => Self::All,
            FilterArg::ReadLater => Self::ReadLater,
            FilterArg::Archived => Self::Archived,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum SortArg {
    Newest,
    Oldest,
    TitleAsc,
    TitleDesc,
}

impl From<SortArg> for BookmarkSort {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::Newest => Self::Newest,
            SortArg::Oldest => Self::Oldest,
            SortArg::TitleAsc => Self::TitleAsc,
            SortArg::TitleDesc => Self::TitleDesc,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Initialize or update a profile
    Init {
        /// Profile name to initialize
        #[arg(long, value_name = "NAME")]
        profile: Option<String>,
        /// PathFind server URL
        #[arg(long, value_name = "URL")]
        server_url: Option<String>,
        /// Default NSFW display mode (blur, hide, show)
        #[arg(long, value_name = "MODE")]
        nsfw_display: Option<NsfwDisplayMode>,
        /// Keep current active profile instead of activating this one
        #[arg(long)]
        no_activate: bool,
    },
    /// Show the resolved profile
    Show,
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Verify an API key against the server and store it in the keychain
    Login {
        /// Optional profile override
        #[arg(long, value_name = "NAME")]
        profile: Option<String>,
        /// PathFind API key
        #[arg(long, value_name = "KEY")]
        api_key: String,
    },
    /// Show auth status for profile
    Status {
        /// Optional profile override
        #[arg(long, value_name = "NAME")]
        profile: Option<String>,
    },
    /// Forget the stored API key
    Logout {
        /// Optional profile override
        #[arg(long, value_name = "NAME")]
        profile: Option<String>,
    },
}
