use clap::{Parser, Subcommand};
use kunj::commands::*;
use kunj::core::{
    error::{KunjError, Result},
    print_error,
};
use std::env;

#[derive(Parser)]
#[command(name = "kunj")]
#[command(about = "Branch metadata, auto-stash and AI-assisted commits on top of git")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a branch and switch to it, stashing changes on the current one
    Create {
        /// Name of the new branch
        name: String,
        /// Start point (defaults to the current HEAD)
        #[arg(long)]
        from: Option<String>,
        /// Description stored with the branch
        #[arg(long = "desc")]
        description: Option<String>,
        /// Tag to attach (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Leave uncommitted changes in place
        #[arg(long)]
        no_stash: bool,
    },
    /// Switch branches, auto-stashing and restoring uncommitted work
    Switch {
        /// Target branch (shows a menu when omitted)
        branch: Option<String>,
        /// Create the branch if it does not exist
        #[arg(short = 'c', long)]
        create: bool,
        /// Leave uncommitted changes in place
        #[arg(long)]
        no_stash: bool,
    },
    /// List branches with their metadata
    List {
        /// Only branches that look like work in progress
        #[arg(long, conflicts_with_all = ["configured", "all"])]
        wip: bool,
        /// Only branches with stored metadata
        #[arg(long, conflicts_with = "all")]
        configured: bool,
        /// Include remote branches
        #[arg(long)]
        all: bool,
    },
    /// Commit staged changes with a generated or given message
    Commit {
        /// Stage all changes first
        #[arg(short = 'a', long)]
        all: bool,
        /// Use this message instead of generating one
        #[arg(short = 'm', long)]
        message: Option<String>,
        /// Accept the generated message without asking
        #[arg(short = 'y', long)]
        yes: bool,
        /// Skip the AI provider and use the file-based message
        #[arg(long)]
        no_ai: bool,
    },
    /// Stash the current branch's changes or manage existing stashes
    Stash {
        /// List stashes with their owning branch
        #[arg(long, conflicts_with_all = ["pop", "apply", "drop"])]
        list: bool,
        /// Pop a stash by index, or the current branch's latest auto-stash
        #[arg(long, num_args = 0..=1, value_name = "INDEX", conflicts_with_all = ["apply", "drop"])]
        pop: Option<Option<usize>>,
        /// Apply a stash by index and keep it
        #[arg(long, value_name = "INDEX", conflicts_with = "drop")]
        apply: Option<usize>,
        /// Drop a stash by index
        #[arg(long, value_name = "INDEX")]
        drop: Option<usize>,
    },
    /// Create a pull request or show pull request status
    Pr {
        /// Pull request title (generated when omitted)
        #[arg(long)]
        title: Option<String>,
        /// Pull request body (generated when omitted)
        #[arg(long)]
        body: Option<String>,
        /// Base branch (defaults to pr.baseBranch)
        #[arg(long)]
        base: Option<String>,
        /// Open as a draft
        #[arg(long)]
        draft: bool,
        /// Show the current branch's pull request and checks
        #[arg(long, conflicts_with = "list")]
        status: bool,
        /// List open pull requests
        #[arg(long)]
        list: bool,
    },
    /// Read or change configuration
    Config {
        /// Set a dotted key to a value
        #[arg(long, num_args = 2, value_names = ["KEY", "VALUE"])]
        set: Option<Vec<String>>,
        /// Print the merged value of a dotted key
        #[arg(long, value_name = "KEY")]
        get: Option<String>,
        /// Print the merged configuration
        #[arg(long)]
        list: bool,
        /// Edit settings interactively
        #[arg(long)]
        interactive: bool,
        /// Write to ~/.kunj/config.json instead of the repository
        #[arg(long)]
        global: bool,
    },
    /// Show, set or clear a branch note
    BranchNote {
        /// Note text
        text: Vec<String>,
        /// Branch to edit (defaults to the current one)
        #[arg(long)]
        branch: Option<String>,
        /// Remove the note
        #[arg(long)]
        clear: bool,
    },
    /// Show, add, remove or clear branch tags
    BranchTag {
        /// Tags to add (or remove with --remove)
        tags: Vec<String>,
        /// Branch to edit (defaults to the current one)
        #[arg(long)]
        branch: Option<String>,
        /// Remove the given tags instead of adding them
        #[arg(long, conflicts_with = "clear")]
        remove: bool,
        /// Remove every tag
        #[arg(long)]
        clear: bool,
    },
    /// Show, set or clear a branch description
    BranchDesc {
        /// Description text
        text: Vec<String>,
        /// Branch to edit (defaults to the current one)
        #[arg(long)]
        branch: Option<String>,
        /// Remove the description
        #[arg(long)]
        clear: bool,
    },
    /// Show the work log or append a note to it
    Log {
        /// Note to append to today's log
        note: Vec<String>,
        /// Show yesterday's log
        #[arg(long, conflicts_with = "date")]
        yesterday: bool,
        /// Show the log for a date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
        /// Summarize the previous working day and current WIP branches
        #[arg(long)]
        standup: bool,
    },
    /// Write the global configuration
    Setup {
        /// Use defaults without asking
        #[arg(long)]
        defaults: bool,
    },
    /// Delete a branch and its metadata
    Delete {
        /// Branch to delete
        branch: String,
        /// Delete even if not merged
        #[arg(short = 'f', long)]
        force: bool,
    },
    /// Rename a branch and move its metadata
    Rename {
        /// Current name
        old: String,
        /// New name
        new: String,
    },
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Create {
            name,
            from,
            description,
            tags,
            no_stash,
        } => execute_create(CreateOptions {
            name,
            from,
            description,
            tags,
            no_stash,
        }),
        Commands::Switch {
            branch,
            create,
            no_stash,
        } => execute_switch(branch, create, no_stash),
        Commands::List {
            wip,
            configured,
            all,
        } => {
            let filter = if wip {
                ListFilter::Wip
            } else if configured {
                ListFilter::Configured
            } else if all {
                ListFilter::All
            } else {
                ListFilter::Local
            };
            execute_list(filter)
        }
        Commands::Commit {
            all,
            message,
            yes,
            no_ai,
        } => execute_commit(CommitOptions {
            all,
            message,
            yes,
            no_ai,
        }),
        Commands::Stash {
            list,
            pop,
            apply,
            drop,
        } => {
            let action = match (list, pop, apply, drop) {
                (true, ..) => StashAction::List,
                (_, Some(index), ..) => StashAction::Pop(index),
                (_, _, Some(index), _) => StashAction::Apply(index),
                (_, _, _, Some(index)) => StashAction::Drop(index),
                _ => StashAction::Save,
            };
            execute_stash(action)
        }
        Commands::Pr {
            title,
            body,
            base,
            draft,
            status,
            list,
        } => execute_pr(PrOptions {
            title,
            body,
            base,
            draft,
            status,
            list,
        }),
        Commands::Config {
            set,
            get,
            list,
            interactive,
            global,
        } => execute_config(ConfigOptions {
            set,
            get,
            list,
            interactive,
            global,
        }),
        Commands::BranchNote {
            text,
            branch,
            clear,
        } => execute_branch_text(TextField::Note, text, branch, clear),
        Commands::BranchTag {
            tags,
            branch,
            remove,
            clear,
        } => execute_branch_tag(tags, branch, remove, clear),
        Commands::BranchDesc {
            text,
            branch,
            clear,
        } => execute_branch_text(TextField::Description, text, branch, clear),
        Commands::Log {
            note,
            yesterday,
            date,
            standup,
        } => execute_log(LogOptions {
            note,
            yesterday,
            date,
            standup,
        }),
        Commands::Setup { defaults } => execute_setup(defaults),
        Commands::Delete { branch, force } => execute_delete(branch, force),
        Commands::Rename { old, new } => execute_rename(old, new),
    }
}

fn main() {
    let cli = Cli::parse();

    // Configure logging based on --debug flag
    if cli.debug {
        env::set_var("RUST_LOG", "debug");
    } else {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    if let Err(e) = run(cli.command) {
        match e {
            // Usage help was already printed by the command
            KunjError::UsageReported => {}
            KunjError::NotInGitRepo => print_error("Not in a git repository"),
            e => print_error(&e.to_string()),
        }
        std::process::exit(1);
    }
}
