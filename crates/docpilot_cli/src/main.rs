//! `docpilot` command-line entry point.
//!
//! # Responsibility
//! - Drive project assembly, refinement and export from a terminal.
//! - Load `.env` and process configuration once, then inject collaborators.
//!
//! # Invariants
//! - The acting user is always explicit (`--user` or `DOCPILOT_USER`).
//! - `refine` without `--apply` never writes.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use docpilot_api::{ApiResponse, AuthenticatedUser, DocpilotApi, SectionPatch};
use docpilot_core::db::{open_db, reset_db};
use docpilot_core::{CoreConfig, ErrorKind, GenerationError, Project, TextGenerator};
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

/// AI-assisted business document assembler
#[derive(Parser)]
#[command(name = "docpilot")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Acting user id
    #[arg(long, global = true, env = "DOCPILOT_USER")]
    user: Option<Uuid>,

    /// Database file (overrides DOCPILOT_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a project and generate one section per title
    Create {
        /// Project title
        #[arg(long)]
        title: String,

        /// Output format (docx, pptx)
        #[arg(long = "type", default_value = "docx")]
        doc_type: String,

        /// Section titles, in document order
        #[arg(long = "section", required = true)]
        sections: Vec<String>,
    },

    /// List projects owned by the acting user
    List,

    /// Show one project with its sections
    Show {
        project: Uuid,

        /// Also print notes and feedback
        #[arg(long)]
        annotations: bool,
    },

    /// Preview a refinement of one section
    Refine {
        section: Uuid,

        /// Refinement instruction
        #[arg(long)]
        instruction: String,

        /// Commit the previewed text after printing it
        #[arg(long)]
        apply: bool,
    },

    /// Overwrite content, notes or feedback of one section
    Update {
        section: Uuid,

        #[arg(long)]
        content: Option<String>,

        #[arg(long)]
        notes: Option<String>,

        #[arg(long)]
        feedback: Option<String>,
    },

    /// Export a project as a .docx or .pptx file
    Export {
        project: Uuid,

        /// Output path (defaults to a name derived from the title)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Delete a project and its sections
    Delete { project: Uuid },

    /// Drop and recreate all tables
    ResetDb {
        /// Confirm data loss
        #[arg(long)]
        yes: bool,
    },

    /// Print core health-check and version
    Ping,
}

/// Stand-in for commands that never generate text.
struct NoGenerator;

impl TextGenerator for NoGenerator {
    fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        Err(GenerationError::Transport(
            "no generation backend configured".to_string(),
        ))
    }
}

fn main() -> Result<()> {
    // Missing .env is fine; variables may come from the shell.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let mut config = CoreConfig::from_env().context("invalid configuration")?;
    if let Some(db) = cli.db.clone() {
        config.db_path = db;
    }
    if let Some(log_dir) = &config.log_dir {
        docpilot_core::init_logging(&config.log_level, log_dir)
            .context("failed to initialize logging")?;
    }

    run(cli.command, &config, cli.user)
}

fn run(command: Commands, config: &CoreConfig, user: Option<Uuid>) -> Result<()> {
    match command {
        Commands::Ping => {
            println!("docpilot_core ping={}", docpilot_core::ping());
            println!("docpilot_core version={}", docpilot_core::core_version());
        }
        Commands::ResetDb { yes } => {
            if !yes {
                bail!("reset-db drops every project; pass --yes to confirm");
            }
            let mut conn = open_db(&config.db_path)?;
            reset_db(&mut conn)?;
            println!("reset {}", config.db_path.display());
        }
        Commands::Create {
            title,
            doc_type,
            sections,
        } => {
            let user = &acting_user(user)?;
            let api = DocpilotApi::from_config(config)?;
            let project = payload(api.create_project(user, &title, &doc_type, &sections))?;
            print_project(&project, false);
        }
        Commands::List => {
            let user = &acting_user(user)?;
            let api = offline_api(config);
            for summary in payload(api.list_owned_projects(user))? {
                println!("{}  {}  {}", summary.id, summary.doc_type, summary.title);
            }
        }
        Commands::Show {
            project,
            annotations,
        } => {
            let user = &acting_user(user)?;
            let api = offline_api(config);
            print_project(&payload(api.get_project(user, project))?, annotations);
        }
        Commands::Refine {
            section,
            instruction,
            apply,
        } => {
            let user = &acting_user(user)?;
            let api = DocpilotApi::from_config(config)?;
            let preview = payload(api.preview_refine(user, section, &instruction))?;
            println!("{}", preview.content);
            if apply {
                let patch = SectionPatch {
                    content: Some(preview.content),
                    ..SectionPatch::default()
                };
                payload(api.update_section(user, section, patch))?;
                eprintln!("committed section {section}");
            }
        }
        Commands::Update {
            section,
            content,
            notes,
            feedback,
        } => {
            let user = &acting_user(user)?;
            let api = offline_api(config);
            let patch = SectionPatch {
                content,
                notes,
                feedback,
            };
            let updated = payload(api.update_section(user, section, patch))?;
            println!("updated section {} ({})", updated.id, updated.title);
        }
        Commands::Export { project, out } => {
            let user = &acting_user(user)?;
            let api = offline_api(config);
            let document = payload(api.export_document(user, project))?;
            let path = out.unwrap_or_else(|| PathBuf::from(&document.file_name));
            std::fs::write(&path, &document.bytes)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("wrote {} ({} bytes)", path.display(), document.bytes.len());
        }
        Commands::Delete { project } => {
            let user = &acting_user(user)?;
            let api = offline_api(config);
            payload(api.delete_project(user, project))?;
            println!("deleted project {project}");
        }
    }
    Ok(())
}

fn acting_user(user: Option<Uuid>) -> Result<AuthenticatedUser> {
    user.map(AuthenticatedUser::new)
        .ok_or_else(|| anyhow!("--user or DOCPILOT_USER is required"))
}

fn offline_api(config: &CoreConfig) -> DocpilotApi {
    DocpilotApi::new(config.db_path.clone(), Arc::new(NoGenerator))
}

fn payload<T>(response: ApiResponse<T>) -> Result<T> {
    match response.payload {
        Some(value) if response.ok => Ok(value),
        _ => {
            let kind = response.error_kind.map_or("internal", ErrorKind::as_str);
            bail!("[{kind}] {}", response.message)
        }
    }
}

fn print_project(project: &Project, annotations: bool) {
    println!("{}  {}  {}", project.id, project.doc_type, project.title);
    for section in &project.sections {
        println!();
        println!("## {}  [{}]", section.title, section.id);
        println!("{}", section.content);
        if annotations {
            if !section.notes.is_empty() {
                println!("notes: {}", section.notes);
            }
            if !section.feedback.is_empty() {
                println!("feedback: {}", section.feedback);
            }
        }
    }
}
